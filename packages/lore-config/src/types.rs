use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub providers: Providers,
	#[serde(default)]
	pub search: Search,
	#[serde(default)]
	pub answer: Answer,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Providers {
	pub retrieval: RetrievalProviderConfig,
	pub embedding: EmbeddingProviderConfig,
}

#[derive(Debug, Deserialize)]
pub struct RetrievalProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub timeout_ms: u64,
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct EmbeddingProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub dimensions: u32,
	pub timeout_ms: u64,
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Search {
	pub fusion: SearchFusion,
	pub limits: SearchLimits,
	pub cache: SearchCache,
}
impl Default for Search {
	fn default() -> Self {
		Self {
			fusion: SearchFusion::default(),
			limits: SearchLimits::default(),
			cache: SearchCache::default(),
		}
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SearchFusion {
	/// Weight of the semantic score in hybrid fusion; the lexical score gets `1 - alpha`.
	pub alpha: f32,
}
impl Default for SearchFusion {
	fn default() -> Self {
		Self { alpha: 0.6 }
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SearchLimits {
	pub top_k: u32,
	pub candidate_k: u32,
	pub rerank_top_k: u32,
}
impl Default for SearchLimits {
	fn default() -> Self {
		Self { top_k: 10, candidate_k: 50, rerank_top_k: 10 }
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SearchCache {
	pub enabled: bool,
	pub ttl_secs: u64,
	pub shards: u32,
}
impl Default for SearchCache {
	fn default() -> Self {
		Self { enabled: true, ttl_secs: 60, shards: 16 }
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Answer {
	pub max_chars: u32,
	pub max_citations: u32,
	pub snippet_max_chars: u32,
	pub abstention_threshold: f32,
}
impl Default for Answer {
	fn default() -> Self {
		Self {
			max_chars: 700,
			max_citations: 3,
			snippet_max_chars: 220,
			abstention_threshold: 0.25,
		}
	}
}
