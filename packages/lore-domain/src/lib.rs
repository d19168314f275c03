pub mod pii;
pub mod similarity;
pub mod text;

mod candidate;

pub use candidate::Candidate;
