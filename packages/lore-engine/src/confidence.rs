// self
use lore_domain::{Candidate, text};

const COVERAGE_WEIGHT: f32 = 0.6;
const STRENGTH_WEIGHT: f32 = 0.4;
const STRENGTH_DEPTH: usize = 3;

/// Blends token coverage over the used sentences with the mean fused score
/// of the top-ranked candidates, clamped to `[0, 1]`.
pub(crate) fn confidence(
	query_tokens: &[String],
	candidates: &[Candidate],
	used_sentences: &[String],
) -> f32 {
	let coverage = token_coverage(query_tokens, used_sentences);
	let strength = retrieval_strength(candidates);

	(COVERAGE_WEIGHT * coverage + STRENGTH_WEIGHT * strength).clamp(0., 1.)
}

fn token_coverage(query_tokens: &[String], used_sentences: &[String]) -> f32 {
	if query_tokens.is_empty() || used_sentences.is_empty() {
		return 0.;
	}

	let hits = used_sentences
		.iter()
		.map(|sentence| text::count_token_hits(query_tokens, sentence))
		.sum::<usize>();

	hits as f32 / (query_tokens.len() * used_sentences.len()) as f32
}

fn retrieval_strength(candidates: &[Candidate]) -> f32 {
	let top = &candidates[..candidates.len().min(STRENGTH_DEPTH)];

	if top.is_empty() {
		return 0.;
	}

	let sum = top.iter().map(|candidate| candidate.score_fused.unwrap_or(0.)).sum::<f32>();

	sum / top.len() as f32
}
