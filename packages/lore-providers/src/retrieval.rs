// std
use std::time::Duration;

// crates.io
use color_eyre::{Result, eyre};
use reqwest::Client;
use serde_json::Value;
// self
use lore_domain::Candidate;

pub async fn retrieve(
	cfg: &lore_config::RetrievalProviderConfig,
	tenant_id: &str,
	query: &str,
	mode: &str,
	limit: u32,
) -> Result<Vec<Candidate>> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let body = serde_json::json!({
		"tenant_id": tenant_id,
		"query": query,
		"mode": mode,
		"limit": limit,
	});
	let res = client
		.post(url)
		.headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;

	parse_retrieval_response(json, tenant_id)
}

fn parse_retrieval_response(json: Value, tenant_id: &str) -> Result<Vec<Candidate>> {
	let items = json
		.get("candidates")
		.and_then(|v| v.as_array())
		.ok_or_else(|| eyre::eyre!("Retrieval response is missing candidates array."))?;
	let mut out = Vec::with_capacity(items.len());

	for item in items {
		let embedding = match item.get("embedding").and_then(|v| v.as_array()) {
			Some(values) => {
				let mut vec = Vec::with_capacity(values.len());
				for value in values {
					let number = value.as_f64().ok_or_else(|| {
						eyre::eyre!("Candidate embedding value must be numeric.")
					})?;
					vec.push(number as f32);
				}
				Some(vec)
			},
			None => None,
		};

		out.push(Candidate {
			id: required_str(item, "id")?,
			tenant_id: tenant_id.to_string(),
			source: required_str(item, "source")?,
			text: required_str(item, "text")?,
			score_semantic: item.get("score_semantic").and_then(|v| v.as_f64()).map(|v| v as f32),
			score_lex: item.get("score_lex").and_then(|v| v.as_f64()).map(|v| v as f32),
			score_fused: None,
			score_rerank: None,
			embedding,
		});
	}

	Ok(out)
}

fn required_str(item: &Value, field: &str) -> Result<String> {
	item.get(field)
		.and_then(|v| v.as_str())
		.map(|v| v.to_string())
		.ok_or_else(|| eyre::eyre!("Candidate is missing {field}."))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_candidates_with_optional_fields() {
		let json = serde_json::json!({
			"candidates": [
				{
					"id": "c1",
					"source": "doc-a",
					"text": "Install the storm collar.",
					"score_semantic": 0.9,
					"score_lex": 0.4,
					"embedding": [0.1, 0.2]
				},
				{
					"id": "c2",
					"source": "doc-b",
					"text": "Unrelated passage.",
					"score_semantic": 0.3
				}
			]
		});
		let parsed = parse_retrieval_response(json, "t1").expect("parse failed");

		assert_eq!(parsed.len(), 2);
		assert_eq!(parsed[0].tenant_id, "t1");
		assert_eq!(parsed[0].embedding.as_deref(), Some(&[0.1_f32, 0.2][..]));
		assert_eq!(parsed[1].score_lex, None);
		assert_eq!(parsed[1].embedding, None);
		assert_eq!(parsed[1].score_fused, None);
	}

	#[test]
	fn rejects_candidate_without_id() {
		let json = serde_json::json!({
			"candidates": [ { "source": "doc-a", "text": "x" } ]
		});
		assert!(parse_retrieval_response(json, "t1").is_err());
	}
}
