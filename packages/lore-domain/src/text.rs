use std::collections::HashSet;

/// Hard cap on query tokens considered by reranking and synthesis.
pub const MAX_QUERY_TOKENS: usize = 8;

/// Lowercases the query, splits on anything that is not ASCII alphanumeric,
/// and keeps the first `max_terms` distinct tokens in query order.
pub fn tokenize_query(query: &str, max_terms: usize) -> Vec<String> {
	let mut normalized = String::with_capacity(query.len());

	for ch in query.chars() {
		if ch.is_ascii_alphanumeric() {
			normalized.push(ch.to_ascii_lowercase());
		} else {
			normalized.push(' ');
		}
	}

	let mut out = Vec::new();
	let mut seen = HashSet::new();

	for token in normalized.split_whitespace() {
		if seen.insert(token) {
			out.push(token.to_string());
		}
		if out.len() >= max_terms {
			break;
		}
	}

	out
}

/// Splits text into sentences on `.`, `!`, or `?` followed by whitespace or
/// end-of-string. A trailing unterminated fragment counts as a sentence.
/// Sentences are trimmed; empty ones are dropped.
pub fn split_sentences(text: &str) -> Vec<String> {
	let chars: Vec<(usize, char)> = text.char_indices().collect();
	let mut out = Vec::new();
	let mut start = 0;

	for (pos, &(idx, ch)) in chars.iter().enumerate() {
		if !matches!(ch, '.' | '!' | '?') {
			continue;
		}

		let at_boundary = match chars.get(pos + 1) {
			Some(&(_, next)) => next.is_whitespace(),
			None => true,
		};

		if at_boundary {
			let end = idx + ch.len_utf8();
			let sentence = text[start..end].trim();

			if !sentence.is_empty() {
				out.push(sentence.to_string());
			}

			start = end;
		}
	}

	let tail = text[start..].trim();

	if !tail.is_empty() {
		out.push(tail.to_string());
	}

	out
}

/// Number of distinct query tokens appearing in `text` as case-insensitive
/// substrings, each token counted at most once.
pub fn count_token_hits(tokens: &[String], text: &str) -> usize {
	if tokens.is_empty() {
		return 0;
	}

	let text = text.to_lowercase();

	tokens.iter().filter(|token| text.contains(token.as_str())).count()
}
