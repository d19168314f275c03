// crates.io
use serde::{Deserialize, Serialize};

// self
use lore_domain::{Candidate, similarity, text};

/// How the shortlist ended up ordered. `None` means reranking was not
/// requested for the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RerankStrategy {
	Embed,
	Token,
	None,
}

impl RerankStrategy {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Embed => "embed",
			Self::Token => "token",
			Self::None => "none",
		}
	}
}

/// Outcome of an embed-strategy pass. `Fallback` hands the shortlist back so
/// the token strategy can rerun from scratch; partial embed scores are
/// overwritten wholesale, never mixed into the response.
pub(crate) enum EmbedAttempt {
	Ranked(Vec<Candidate>),
	Fallback(Vec<Candidate>),
}

/// Scores the shortlist by cosine similarity between the query embedding and
/// each candidate embedding. Any candidate without an embedding aborts the
/// pass.
pub(crate) fn embed_rerank(query_embedding: &[f32], candidates: Vec<Candidate>) -> EmbedAttempt {
	let mut out = candidates;

	for index in 0..out.len() {
		let score = match out[index].embedding.as_deref() {
			Some(embedding) => similarity::cosine_similarity(query_embedding, embedding),
			None => return EmbedAttempt::Fallback(reset_rerank_scores(out)),
		};

		out[index].score_rerank = Some(score);
	}

	sort_by_rerank(&mut out);

	EmbedAttempt::Ranked(out)
}

/// Scores the shortlist by how many distinct query tokens each candidate
/// text contains. Needs no collaborator and cannot fail.
pub(crate) fn token_rerank(query_tokens: &[String], candidates: Vec<Candidate>) -> Vec<Candidate> {
	let mut out = candidates;

	for candidate in &mut out {
		candidate.score_rerank =
			Some(text::count_token_hits(query_tokens, &candidate.text) as f32);
	}

	sort_by_rerank(&mut out);

	out
}

// Descending rerank score; ties keep the fused order. The sort is stable, so
// candidates tied on both scores stay in their incoming order.
fn sort_by_rerank(candidates: &mut [Candidate]) {
	candidates.sort_by(|a, b| {
		b.score_rerank
			.partial_cmp(&a.score_rerank)
			.unwrap_or(std::cmp::Ordering::Equal)
			.then_with(|| {
				b.score_fused.partial_cmp(&a.score_fused).unwrap_or(std::cmp::Ordering::Equal)
			})
	});
}

fn reset_rerank_scores(mut candidates: Vec<Candidate>) -> Vec<Candidate> {
	for candidate in &mut candidates {
		candidate.score_rerank = None;
	}

	candidates
}
