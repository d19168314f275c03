/// One retrieved chunk, scored as it moves through the ranking pipeline.
///
/// `score_semantic` and `score_lex` arrive with the chunk from retrieval.
/// `score_fused` and `score_rerank` are filled in by the fusion and rerank
/// stages and are never read from the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
	pub id: String,
	pub tenant_id: String,
	pub source: String,
	pub text: String,
	pub score_semantic: Option<f32>,
	pub score_lex: Option<f32>,
	pub score_fused: Option<f32>,
	pub score_rerank: Option<f32>,
	pub embedding: Option<Vec<f32>>,
}
