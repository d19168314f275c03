// self
use lore_domain::Candidate;

use crate::pipeline::Mode;

/// Combines the raw semantic and lexical signals into `score_fused` and
/// orders by it, descending, with candidate id as the deterministic tie
/// break. Single-signal modes drop candidates that lack the signal; hybrid
/// treats a missing component as zero.
pub(crate) fn fuse(candidates: Vec<Candidate>, mode: Mode, alpha: f32) -> Vec<Candidate> {
	let mut out = candidates
		.into_iter()
		.filter_map(|mut candidate| {
			let fused = match mode {
				Mode::Semantic => candidate.score_semantic?,
				Mode::Lexical => candidate.score_lex?,
				Mode::Hybrid => {
					let semantic = candidate.score_semantic.unwrap_or(0.);
					let lex = candidate.score_lex.unwrap_or(0.);

					alpha * semantic + (1. - alpha) * lex
				},
			};

			candidate.score_fused = Some(fused);

			Some(candidate)
		})
		.collect::<Vec<_>>();

	out.sort_by(|a, b| {
		b.score_fused
			.partial_cmp(&a.score_fused)
			.unwrap_or(std::cmp::Ordering::Equal)
			.then_with(|| a.id.cmp(&b.id))
	});

	out
}

#[cfg(test)]
mod tests {
	use super::*;

	fn candidate(id: &str, semantic: Option<f32>, lex: Option<f32>) -> Candidate {
		Candidate {
			id: id.into(),
			tenant_id: "t-1".into(),
			source: format!("https://docs.example/{id}"),
			text: "body".into(),
			score_semantic: semantic,
			score_lex: lex,
			score_fused: None,
			score_rerank: None,
			embedding: None,
		}
	}

	#[test]
	fn hybrid_blends_both_signals() {
		let alpha = 0.6_f32;
		let out = fuse(vec![candidate("a", Some(0.5), Some(1.))], Mode::Hybrid, alpha);

		assert_eq!(out[0].score_fused, Some(alpha * 0.5 + (1. - alpha) * 1.));
	}

	#[test]
	fn hybrid_treats_missing_signals_as_zero() {
		let out = fuse(
			vec![candidate("a", Some(1.), None), candidate("b", None, Some(1.))],
			Mode::Hybrid,
			0.6,
		);

		assert_eq!(out.len(), 2);
		assert_eq!(out[0].id, "a");
		assert_eq!(out[0].score_fused, Some(0.6));
		assert_eq!(out[1].score_fused, Some(0.4));
	}

	#[test]
	fn semantic_mode_drops_candidates_without_semantic_score() {
		let out = fuse(
			vec![candidate("a", Some(0.9), None), candidate("b", None, Some(0.9))],
			Mode::Semantic,
			0.6,
		);

		assert_eq!(out.len(), 1);
		assert_eq!(out[0].id, "a");
		assert_eq!(out[0].score_fused, Some(0.9));
	}

	#[test]
	fn lexical_mode_drops_candidates_without_lexical_score() {
		let out = fuse(
			vec![candidate("a", Some(0.9), None), candidate("b", None, Some(0.7))],
			Mode::Lexical,
			0.6,
		);

		assert_eq!(out.len(), 1);
		assert_eq!(out[0].id, "b");
	}

	#[test]
	fn orders_descending_with_id_tie_break() {
		let out = fuse(
			vec![
				candidate("c", Some(0.5), Some(0.5)),
				candidate("a", Some(0.5), Some(0.5)),
				candidate("b", Some(0.9), Some(0.9)),
			],
			Mode::Hybrid,
			0.6,
		);
		let ids = out.iter().map(|candidate| candidate.id.as_str()).collect::<Vec<_>>();

		assert_eq!(ids, ["b", "a", "c"]);
	}

	#[test]
	fn empty_input_stays_empty() {
		assert!(fuse(Vec::new(), Mode::Hybrid, 0.6).is_empty());
	}
}
