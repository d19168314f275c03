// std
use std::{
	hash::{Hash, Hasher},
	sync::Mutex,
};

// crates.io
use ahash::AHashMap;
use serde_json::Value;
use time::{Duration, OffsetDateTime};

// self
use crate::{answer::AnswerResponse, search::SearchResponse};

const CACHE_SCHEMA_VERSION: u32 = 1;

/// A memoized pipeline response. Search and answer entries share one key
/// space; the hashed payload's `kind` field keeps them apart.
#[derive(Debug, Clone)]
pub(crate) enum CachedResponse {
	Search(SearchResponse),
	Answer(AnswerResponse),
}

struct CacheSlot {
	response: CachedResponse,
	inserted_at: OffsetDateTime,
}

/// Short-TTL memo in front of the query pipeline, sharded so unrelated keys
/// rarely contend on one lock. Expired entries are evicted lazily on access.
pub(crate) struct QueryCache {
	shards: Vec<Mutex<AHashMap<String, CacheSlot>>>,
	ttl: Duration,
	enabled: bool,
}

impl QueryCache {
	pub(crate) fn new(cfg: &lore_config::SearchCache) -> Self {
		let shards = (0..cfg.shards.max(1)).map(|_| Mutex::new(AHashMap::new())).collect();

		Self { shards, ttl: Duration::seconds(cfg.ttl_secs as i64), enabled: cfg.enabled }
	}

	pub(crate) fn get(&self, key: &str, now: OffsetDateTime) -> Option<CachedResponse> {
		if !self.enabled {
			return None;
		}

		let mut shard = self.shard(key).lock().ok()?;

		match shard.get(key) {
			Some(slot) if now - slot.inserted_at <= self.ttl => Some(slot.response.clone()),
			Some(_) => {
				shard.remove(key);

				None
			},
			None => None,
		}
	}

	pub(crate) fn put(&self, key: String, response: CachedResponse, now: OffsetDateTime) {
		if !self.enabled {
			return;
		}

		let Ok(mut shard) = self.shard(&key).lock() else {
			return;
		};

		shard.insert(key, CacheSlot { response, inserted_at: now });
	}

	fn shard(&self, key: &str) -> &Mutex<AHashMap<String, CacheSlot>> {
		let mut hasher = std::collections::hash_map::DefaultHasher::new();

		key.hash(&mut hasher);

		&self.shards[hasher.finish() as usize % self.shards.len()]
	}
}

/// Deterministic key over everything that can change a response. The query
/// is trimmed and lowercased so cosmetic variants share an entry.
pub(crate) fn build_query_cache_key(
	kind: &str,
	tenant_id: &str,
	query: &str,
	mode: &str,
	rerank: bool,
	k: u32,
	rerank_topk: u32,
) -> String {
	let payload = serde_json::json!({
		"kind": kind,
		"schema_version": CACHE_SCHEMA_VERSION,
		"tenant_id": tenant_id,
		"query": query.trim().to_lowercase(),
		"mode": mode,
		"rerank": rerank,
		"k": k,
		"rerank_topk": rerank_topk,
	});

	hash_cache_key(&payload)
}

fn hash_cache_key(payload: &Value) -> String {
	blake3::hash(payload.to_string().as_bytes()).to_hex().to_string()
}

/// First 12 hex chars, enough to correlate log lines without logging keys.
pub(crate) fn cache_key_prefix(key: &str) -> &str {
	&key[..key.len().min(12)]
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{SearchItem, SearchResponse};

	fn cache_cfg(ttl_secs: u64, enabled: bool) -> lore_config::SearchCache {
		lore_config::SearchCache { enabled, ttl_secs, shards: 4 }
	}

	fn response(marker: &str) -> CachedResponse {
		CachedResponse::Search(SearchResponse {
			results: vec![SearchItem {
				id: marker.to_string(),
				source: "https://docs.example/a".to_string(),
				text: "body".to_string(),
				score_fused: 0.5,
				score_rerank: None,
			}],
			reranked: false,
		})
	}

	fn marker(cached: &CachedResponse) -> Option<String> {
		match cached {
			CachedResponse::Search(response) => {
				response.results.first().map(|item| item.id.clone())
			},
			CachedResponse::Answer(_) => None,
		}
	}

	fn key(query: &str) -> String {
		build_query_cache_key("search", "t-1", query, "hybrid", false, 10, 10)
	}

	#[test]
	fn hit_within_ttl_and_eviction_after() {
		let cache = QueryCache::new(&cache_cfg(60, true));
		let t0 = OffsetDateTime::UNIX_EPOCH;

		cache.put(key("storm collar"), response("first"), t0);

		let hit = cache.get(&key("storm collar"), t0 + Duration::seconds(59));

		assert_eq!(hit.as_ref().and_then(marker).as_deref(), Some("first"));
		assert!(cache.get(&key("storm collar"), t0 + Duration::seconds(61)).is_none());
		// The expired slot is gone, not just skipped.
		assert!(cache.get(&key("storm collar"), t0).is_none());
	}

	#[test]
	fn put_overwrites_existing_entry() {
		let cache = QueryCache::new(&cache_cfg(60, true));
		let t0 = OffsetDateTime::UNIX_EPOCH;

		cache.put(key("q"), response("first"), t0);
		cache.put(key("q"), response("second"), t0 + Duration::seconds(1));

		let hit = cache.get(&key("q"), t0 + Duration::seconds(2));

		assert_eq!(hit.as_ref().and_then(marker).as_deref(), Some("second"));
	}

	#[test]
	fn disabled_cache_never_hits() {
		let cache = QueryCache::new(&cache_cfg(60, false));
		let t0 = OffsetDateTime::UNIX_EPOCH;

		cache.put(key("q"), response("first"), t0);

		assert!(cache.get(&key("q"), t0).is_none());
	}

	#[test]
	fn key_normalizes_query_whitespace_and_case() {
		assert_eq!(key("  Storm Collar  "), key("storm collar"));
	}

	#[test]
	fn key_separates_every_parameter() {
		let base = build_query_cache_key("search", "t-1", "q", "hybrid", false, 10, 10);

		for other in [
			build_query_cache_key("answer", "t-1", "q", "hybrid", false, 10, 10),
			build_query_cache_key("search", "t-2", "q", "hybrid", false, 10, 10),
			build_query_cache_key("search", "t-1", "q2", "hybrid", false, 10, 10),
			build_query_cache_key("search", "t-1", "q", "lexical", false, 10, 10),
			build_query_cache_key("search", "t-1", "q", "hybrid", true, 10, 10),
			build_query_cache_key("search", "t-1", "q", "hybrid", false, 5, 10),
			build_query_cache_key("search", "t-1", "q", "hybrid", false, 10, 20),
		] {
			assert_ne!(base, other);
		}
	}

	#[test]
	fn concurrent_access_stays_consistent() {
		let cache = QueryCache::new(&cache_cfg(60, true));
		let t0 = OffsetDateTime::UNIX_EPOCH;

		std::thread::scope(|scope| {
			for worker in 0..8 {
				let cache = &cache;

				scope.spawn(move || {
					for round in 0..100 {
						let entry = format!("w{worker}-r{round}");

						cache.put(key("shared"), response(&entry), t0);

						if let Some(hit) = cache.get(&key("shared"), t0) {
							// Entries are swapped atomically; a reader never
							// observes a torn value.
							let seen = marker(&hit);

							assert!(seen.is_some());
						}
					}
				});
			}
		});
	}

	#[test]
	fn key_prefix_is_short_and_stable() {
		let key = key("q");

		assert_eq!(cache_key_prefix(&key).len(), 12);
		assert!(key.starts_with(cache_key_prefix(&key)));
	}
}
