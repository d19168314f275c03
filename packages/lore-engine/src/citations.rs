// std
use std::collections::HashSet;

// crates.io
use serde::{Deserialize, Serialize};

// self
use lore_domain::Candidate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citation {
	pub url: String,
	pub snippet: String,
	pub highlights: Vec<Highlight>,
}

/// Character span within the owning snippet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Highlight {
	pub start: usize,
	pub end: usize,
}

/// Builds at most `max_citations` citations from the ranked candidates,
/// keeping the first candidate seen per distinct source.
pub(crate) fn make_citations(
	candidates: &[Candidate],
	used_sentences: &[String],
	max_citations: usize,
	snippet_max_chars: usize,
) -> Vec<Citation> {
	let mut seen = HashSet::new();
	let mut out = Vec::new();

	for candidate in candidates {
		if out.len() >= max_citations {
			break;
		}
		if !seen.insert(candidate.source.clone()) {
			continue;
		}

		let snippet = truncate_snippet(&candidate.text, snippet_max_chars);
		let highlights = compute_highlights(&candidate.text, &snippet, used_sentences);

		out.push(Citation { url: candidate.source.clone(), snippet, highlights });
	}

	out
}

/// Cuts `text` to at most `max_chars` characters, preferring the longest
/// prefix that ends on a sentence boundary or a word boundary. Hard cut when
/// the text has no boundary at all.
fn truncate_snippet(text: &str, max_chars: usize) -> String {
	let chars = text.chars().collect::<Vec<_>>();

	if chars.len() <= max_chars {
		return text.to_string();
	}

	let mut cut = 0;

	for (index, &ch) in chars.iter().enumerate().take(max_chars + 1) {
		if matches!(ch, '.' | '!' | '?') && index < max_chars {
			let next_is_boundary = chars.get(index + 1).is_none_or(|next| next.is_whitespace());

			if next_is_boundary {
				cut = cut.max(index + 1);
			}
		}
		if ch.is_whitespace() {
			cut = cut.max(index);
		}
	}

	if cut == 0 {
		cut = max_chars;
	}

	chars[..cut].iter().collect::<String>().trim_end().to_string()
}

// The snippet is always a prefix of the candidate text, so sentence offsets
// in the text map one-to-one onto the snippet. Sentences that fall outside
// the snippet, or come from another candidate, are skipped.
fn compute_highlights(text: &str, snippet: &str, used_sentences: &[String]) -> Vec<Highlight> {
	let snippet_chars = snippet.chars().count();
	let mut out = Vec::new();

	for sentence in used_sentences {
		let Some(byte_start) = text.find(sentence.as_str()) else {
			continue;
		};
		let start = text[..byte_start].chars().count();
		let end = start + sentence.chars().count();

		if end <= snippet_chars {
			out.push(Highlight { start, end });
		}
	}

	out.sort_by_key(|highlight| highlight.start);
	out.dedup();

	// Spans must stay disjoint.
	let mut disjoint = Vec::<Highlight>::with_capacity(out.len());

	for highlight in out {
		if disjoint.last().is_some_and(|prev| highlight.start < prev.end) {
			continue;
		}

		disjoint.push(highlight);
	}

	disjoint
}

#[cfg(test)]
mod tests {
	use super::*;

	fn candidate(id: &str, source: &str, text: &str) -> Candidate {
		Candidate {
			id: id.into(),
			tenant_id: "t-1".into(),
			source: source.into(),
			text: text.into(),
			score_semantic: None,
			score_lex: None,
			score_fused: Some(0.5),
			score_rerank: None,
			embedding: None,
		}
	}

	#[test]
	fn dedupes_sources_and_caps_the_count() {
		let candidates = vec![
			candidate("a", "https://docs.example/a", "First."),
			candidate("b", "https://docs.example/b", "Second."),
			candidate("c", "https://docs.example/a", "Duplicate source."),
			candidate("d", "https://docs.example/d", "Fourth."),
			candidate("e", "https://docs.example/e", "Fifth."),
		];
		let citations = make_citations(&candidates, &[], 3, 220);
		let urls = citations.iter().map(|citation| citation.url.as_str()).collect::<Vec<_>>();

		assert_eq!(
			urls,
			["https://docs.example/a", "https://docs.example/b", "https://docs.example/d"]
		);
		assert_eq!(citations[0].snippet, "First.");
	}

	#[test]
	fn snippet_prefers_the_sentence_boundary() {
		let text = format!("Install the storm collar. {}", "x".repeat(300));

		assert_eq!(truncate_snippet(&text, 220), "Install the storm collar.");
	}

	#[test]
	fn snippet_takes_the_longest_boundary_within_the_limit() {
		// A sentence ends at 26 chars, but later word boundaries fit too.
		let text = format!("Install the storm collar. Then seal the {}", "x".repeat(300));
		let snippet = truncate_snippet(&text, 40);

		assert_eq!(snippet, "Install the storm collar. Then seal the");
	}

	#[test]
	fn snippet_hard_cuts_unbroken_text() {
		let text = "x".repeat(400);
		let snippet = truncate_snippet(&text, 220);

		assert_eq!(snippet.chars().count(), 220);
	}

	#[test]
	fn snippet_keeps_short_text_unchanged() {
		assert_eq!(truncate_snippet("Short text.", 220), "Short text.");
	}

	#[test]
	fn decimal_points_do_not_end_the_snippet() {
		let text = format!("Torque to 3.5 Nm exactly {}", "x".repeat(300));
		let snippet = truncate_snippet(&text, 16);

		// The cut lands on the word boundary, not inside "3.5".
		assert_eq!(snippet, "Torque to 3.5 Nm");
	}

	#[test]
	fn highlights_cover_used_sentences_inside_the_snippet() {
		let text = "Slide the collar down. Seal the joint with mastic.";
		let candidates = vec![candidate("a", "https://docs.example/a", text)];
		let used = vec!["Seal the joint with mastic.".to_string()];
		let citations = make_citations(&candidates, &used, 3, 220);

		assert_eq!(citations[0].highlights, [Highlight { start: 23, end: 50 }]);

		let snippet = &citations[0].snippet;
		let span = snippet
			.chars()
			.skip(citations[0].highlights[0].start)
			.take(citations[0].highlights[0].end - citations[0].highlights[0].start)
			.collect::<String>();

		assert_eq!(span, used[0]);
	}

	#[test]
	fn highlights_skip_sentences_outside_the_snippet() {
		let text = format!("Intro words here. {} Final sentence to use.", "pad ".repeat(80));
		let candidates = vec![candidate("a", "https://docs.example/a", &text)];
		let used = vec!["Intro words here.".to_string(), "Final sentence to use.".to_string()];
		let citations = make_citations(&candidates, &used, 3, 220);

		assert_eq!(citations[0].highlights, [Highlight { start: 0, end: 17 }]);
	}

	#[test]
	fn highlights_skip_sentences_from_other_candidates() {
		let candidates = vec![candidate("a", "https://docs.example/a", "Local sentence only.")];
		let used = vec!["A sentence from somewhere else.".to_string()];
		let citations = make_citations(&candidates, &used, 3, 220);

		assert!(citations[0].highlights.is_empty());
	}

	#[test]
	fn overlapping_highlights_are_collapsed() {
		let text = "Seal the joint. Seal the joint fully.";
		let candidates = vec![candidate("a", "https://docs.example/a", text)];
		// "Seal the joint" prefixes both sentences; find() anchors both at 0.
		let used = vec!["Seal the joint.".to_string(), "Seal the joint".to_string()];
		let citations = make_citations(&candidates, &used, 3, 220);

		assert_eq!(citations[0].highlights, [Highlight { start: 0, end: 15 }]);
	}
}
