// self
use lore_domain::{Candidate, text};

use crate::{
	Error, LoreEngine, Result, fuse,
	rerank::{self, EmbedAttempt, RerankStrategy},
};

const RERANK_TOPK_MIN: u32 = 3;
const RERANK_TOPK_MAX: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mode {
	Semantic,
	Lexical,
	Hybrid,
}

impl Mode {
	pub(crate) fn parse(raw: &str) -> Result<Self> {
		match raw {
			"semantic" => Ok(Self::Semantic),
			"lexical" => Ok(Self::Lexical),
			"hybrid" => Ok(Self::Hybrid),
			_ => Err(Error::InvalidRequest {
				message: format!("Unknown mode {raw:?}; expected semantic, lexical, or hybrid."),
			}),
		}
	}

	pub(crate) fn as_str(self) -> &'static str {
		match self {
			Self::Semantic => "semantic",
			Self::Lexical => "lexical",
			Self::Hybrid => "hybrid",
		}
	}
}

/// Request parameters after validation and default resolution, shared by the
/// search and answer operations.
pub(crate) struct RankParams {
	pub(crate) tenant_id: String,
	pub(crate) query: String,
	pub(crate) mode: Mode,
	pub(crate) k: u32,
	pub(crate) rerank: bool,
	pub(crate) rerank_topk: u32,
}

/// The ranked candidate list a response is assembled from, together with the
/// strategy that produced the order and the tokens the query reduced to.
pub(crate) struct RankedSet {
	pub(crate) candidates: Vec<Candidate>,
	pub(crate) strategy: RerankStrategy,
	pub(crate) query_tokens: Vec<String>,
}

impl LoreEngine {
	/// Rejects malformed parameters before any retrieval happens; no partial
	/// work is performed for an invalid request.
	pub(crate) fn validate_params(
		&self,
		tenant_id: &str,
		query: &str,
		mode: &str,
		k: Option<u32>,
		rerank: Option<bool>,
		rerank_topk: Option<u32>,
	) -> Result<RankParams> {
		let tenant_id = tenant_id.trim();

		if tenant_id.is_empty() {
			return Err(Error::InvalidRequest { message: "tenant_id is required.".into() });
		}

		let query = query.trim();

		if query.is_empty() {
			return Err(Error::InvalidRequest { message: "query must be non-empty.".into() });
		}

		let mode = Mode::parse(mode)?;
		let k = k.unwrap_or(self.cfg.search.limits.top_k).max(1);
		let rerank = rerank.unwrap_or(false);
		let rerank_topk = rerank_topk.unwrap_or(self.cfg.search.limits.rerank_top_k);

		if !(RERANK_TOPK_MIN..=RERANK_TOPK_MAX).contains(&rerank_topk) {
			return Err(Error::InvalidRequest {
				message: format!(
					"rerank_topk must be between {RERANK_TOPK_MIN} and {RERANK_TOPK_MAX}."
				),
			});
		}

		Ok(RankParams {
			tenant_id: tenant_id.into(),
			query: query.into(),
			mode,
			k,
			rerank,
			rerank_topk,
		})
	}

	/// Retrieves, fuses, and (when requested) reranks. Returns the final
	/// ranked list: fused order truncated to `k` without reranking, or the
	/// reranked shortlist truncated to `rerank_topk` with it.
	pub(crate) async fn ranked_candidates(&self, params: &RankParams) -> Result<RankedSet> {
		let query_tokens = text::tokenize_query(&params.query, text::MAX_QUERY_TOKENS);
		let candidates = self
			.providers
			.retrieval
			.retrieve(
				&self.cfg.providers.retrieval,
				&params.tenant_id,
				&params.query,
				params.mode.as_str(),
				retrieve_limit(params, &self.cfg.search.limits),
			)
			.await
			.map_err(|source| Error::RetrievalUnavailable { message: source.to_string() })?;
		let mut fused = fuse::fuse(candidates, params.mode, self.cfg.search.fusion.alpha);

		if !params.rerank {
			fused.truncate(params.k as usize);
			self.telemetry.record_rerank(RerankStrategy::None);

			return Ok(RankedSet {
				candidates: fused,
				strategy: RerankStrategy::None,
				query_tokens,
			});
		}

		let mut shortlist = fused;

		shortlist.truncate((params.rerank_topk as usize).saturating_mul(2));

		let attempt = match self
			.providers
			.embedding
			.embed_query(&self.cfg.providers.embedding, &params.query)
			.await
		{
			Ok(query_embedding) => rerank::embed_rerank(&query_embedding, shortlist),
			Err(source) => {
				tracing::warn!(
					error = %source,
					"Embedding provider unavailable; falling back to token rerank."
				);

				EmbedAttempt::Fallback(shortlist)
			},
		};
		let (mut candidates, strategy) = match attempt {
			EmbedAttempt::Ranked(ranked) => (ranked, RerankStrategy::Embed),
			EmbedAttempt::Fallback(shortlist) => {
				(rerank::token_rerank(&query_tokens, shortlist), RerankStrategy::Token)
			},
		};

		candidates.truncate(params.rerank_topk as usize);
		self.telemetry.record_rerank(strategy);

		Ok(RankedSet { candidates, strategy, query_tokens })
	}
}

// Always over-fetch past `k` so fusion and the rerank shortlist have a real
// pool to work with.
fn retrieve_limit(params: &RankParams, limits: &lore_config::SearchLimits) -> u32 {
	let base = limits.candidate_k.max(params.k);

	if params.rerank { base.max(params.rerank_topk.saturating_mul(2)) } else { base }
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn mode_parses_exact_lowercase_names() {
		assert_eq!(Mode::parse("semantic").ok(), Some(Mode::Semantic));
		assert_eq!(Mode::parse("lexical").ok(), Some(Mode::Lexical));
		assert_eq!(Mode::parse("hybrid").ok(), Some(Mode::Hybrid));
		assert!(Mode::parse("Hybrid").is_err());
		assert!(Mode::parse("cosine").is_err());
	}

	#[test]
	fn retrieve_limit_covers_the_rerank_shortlist() {
		let limits = lore_config::SearchLimits { top_k: 10, candidate_k: 20, rerank_top_k: 10 };
		let params = RankParams {
			tenant_id: "t-1".into(),
			query: "q".into(),
			mode: Mode::Hybrid,
			k: 10,
			rerank: true,
			rerank_topk: 40,
		};

		assert_eq!(retrieve_limit(&params, &limits), 80);
	}

	#[test]
	fn retrieve_limit_never_drops_below_k() {
		let limits = lore_config::SearchLimits { top_k: 10, candidate_k: 20, rerank_top_k: 10 };
		let params = RankParams {
			tenant_id: "t-1".into(),
			query: "q".into(),
			mode: Mode::Hybrid,
			k: 64,
			rerank: false,
			rerank_topk: 10,
		};

		assert_eq!(retrieve_limit(&params, &limits), 64);
	}
}
