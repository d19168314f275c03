// crates.io
use time::OffsetDateTime;

// self
use crate::{
	LoreEngine, Result,
	cache::{self, CachedResponse},
};

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SearchRequest {
	pub tenant_id: String,
	pub query: String,
	pub mode: String,
	pub k: Option<u32>,
	pub rerank: Option<bool>,
	pub rerank_topk: Option<u32>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SearchItem {
	pub id: String,
	pub source: String,
	pub text: String,
	pub score_fused: f32,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub score_rerank: Option<f32>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SearchResponse {
	pub results: Vec<SearchItem>,
	pub reranked: bool,
}

impl LoreEngine {
	pub async fn search(&self, req: SearchRequest) -> Result<SearchResponse> {
		let params = self.validate_params(
			&req.tenant_id,
			&req.query,
			&req.mode,
			req.k,
			req.rerank,
			req.rerank_topk,
		)?;
		let key = cache::build_query_cache_key(
			"search",
			&params.tenant_id,
			&params.query,
			params.mode.as_str(),
			params.rerank,
			params.k,
			params.rerank_topk,
		);

		if let Some(CachedResponse::Search(cached)) =
			self.cache.get(&key, OffsetDateTime::now_utc())
		{
			tracing::debug!(
				cache_key_prefix = cache::cache_key_prefix(&key),
				"Search cache hit."
			);

			return Ok(cached);
		}

		let ranked = self.ranked_candidates(&params).await?;
		let results = ranked
			.candidates
			.iter()
			.take(params.k as usize)
			.map(|candidate| SearchItem {
				id: candidate.id.clone(),
				source: candidate.source.clone(),
				text: candidate.text.clone(),
				score_fused: candidate.score_fused.unwrap_or(0.),
				score_rerank: candidate.score_rerank,
			})
			.collect();
		let response = SearchResponse { results, reranked: params.rerank };

		tracing::debug!(
			mode = params.mode.as_str(),
			strategy = ranked.strategy.as_str(),
			results = response.results.len(),
			"Search completed."
		);
		self.cache.put(key, CachedResponse::Search(response.clone()), OffsetDateTime::now_utc());

		Ok(response)
	}
}
