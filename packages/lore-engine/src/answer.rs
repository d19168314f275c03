// crates.io
use time::OffsetDateTime;

// self
use lore_domain::pii;

use crate::{
	LoreEngine, Result,
	cache::{self, CachedResponse},
	citations::{self, Citation},
	confidence,
	rerank::RerankStrategy,
	synthesize,
};

/// Returned instead of the synthesized text when confidence falls below the
/// abstention threshold.
pub const ABSTENTION_MESSAGE: &str = "Not enough supporting evidence was found to answer \
	confidently; see the citations for related sources.";

/// Returned instead of the synthesized text when it would echo redaction
/// markers.
pub const PII_REFUSAL_MESSAGE: &str = "The answer was withheld because it would surface redacted \
	personal data; consult the cited sources directly.";

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct AnswerRequest {
	pub tenant_id: String,
	pub query: String,
	pub mode: String,
	pub k: Option<u32>,
	pub rerank: Option<bool>,
	pub rerank_topk: Option<u32>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct AnswerResponse {
	pub answer: String,
	pub citations: Vec<Citation>,
	pub confidence: f32,
	pub rerank_used: RerankStrategy,
	pub pii_blocked: bool,
}

impl LoreEngine {
	pub async fn answer(&self, req: AnswerRequest) -> Result<AnswerResponse> {
		let params = self.validate_params(
			&req.tenant_id,
			&req.query,
			&req.mode,
			req.k,
			req.rerank,
			req.rerank_topk,
		)?;
		let key = cache::build_query_cache_key(
			"answer",
			&params.tenant_id,
			&params.query,
			params.mode.as_str(),
			params.rerank,
			params.k,
			params.rerank_topk,
		);

		if let Some(CachedResponse::Answer(cached)) =
			self.cache.get(&key, OffsetDateTime::now_utc())
		{
			tracing::debug!(
				cache_key_prefix = cache::cache_key_prefix(&key),
				"Answer cache hit."
			);

			return Ok(cached);
		}

		let ranked = self.ranked_candidates(&params).await?;
		let (synthesized, used_sentences) = synthesize::synthesize(
			&ranked.query_tokens,
			&ranked.candidates,
			self.cfg.answer.max_chars as usize,
		);
		let citations = citations::make_citations(
			&ranked.candidates,
			&used_sentences,
			self.cfg.answer.max_citations as usize,
			self.cfg.answer.snippet_max_chars as usize,
		);
		let mut confidence =
			confidence::confidence(&ranked.query_tokens, &ranked.candidates, &used_sentences);
		let pii_blocked = pii::contains_pii_markers(&synthesized);
		let answer = if pii_blocked {
			confidence = 0.;

			tracing::warn!("Synthesized answer surfaced redaction markers; withholding it.");

			PII_REFUSAL_MESSAGE.to_string()
		} else if confidence < self.cfg.answer.abstention_threshold {
			self.telemetry.record_abstention();

			ABSTENTION_MESSAGE.to_string()
		} else {
			synthesized
		};
		let response = AnswerResponse {
			answer,
			citations,
			confidence,
			rerank_used: ranked.strategy,
			pii_blocked,
		};

		self.telemetry.record_answer(params.mode, ranked.strategy != RerankStrategy::None);
		tracing::debug!(
			mode = params.mode.as_str(),
			strategy = ranked.strategy.as_str(),
			confidence = response.confidence,
			citations = response.citations.len(),
			pii_blocked = response.pii_blocked,
			"Answer completed."
		);
		self.cache.put(key, CachedResponse::Answer(response.clone()), OffsetDateTime::now_utc());

		Ok(response)
	}
}
