// self
use lore_domain::{Candidate, text};

/// Walks the ranked candidates in order and collects every sentence that
/// contains at least one query token, joined by single spaces. Collection
/// stops outright the first time a sentence would push the answer past
/// `max_chars`; later, shorter sentences are not considered.
pub(crate) fn synthesize(
	query_tokens: &[String],
	candidates: &[Candidate],
	max_chars: usize,
) -> (String, Vec<String>) {
	let mut answer = String::new();
	let mut answer_chars = 0;
	let mut used = Vec::new();

	'candidates: for candidate in candidates {
		for sentence in text::split_sentences(&candidate.text) {
			if text::count_token_hits(query_tokens, &sentence) == 0 {
				continue;
			}

			let sentence_chars = sentence.chars().count();
			let projected =
				if answer.is_empty() { sentence_chars } else { answer_chars + 1 + sentence_chars };

			if projected > max_chars {
				break 'candidates;
			}
			if !answer.is_empty() {
				answer.push(' ');
			}

			answer.push_str(&sentence);
			answer_chars = projected;
			used.push(sentence);
		}
	}

	(answer, used)
}
