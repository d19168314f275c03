pub mod answer;
pub mod search;

mod cache;
mod citations;
mod confidence;
mod error;
mod fuse;
mod pipeline;
mod rerank;
mod synthesize;
mod telemetry;

use std::{future::Future, pin::Pin, sync::Arc};

pub use answer::{ABSTENTION_MESSAGE, AnswerRequest, AnswerResponse, PII_REFUSAL_MESSAGE};
pub use citations::{Citation, Highlight};
pub use error::{Error, Result};
use lore_config::{Config, EmbeddingProviderConfig, RetrievalProviderConfig};
use lore_domain::Candidate;
use lore_providers::{embedding, retrieval};
pub use rerank::RerankStrategy;
pub use search::{SearchItem, SearchRequest, SearchResponse};
pub use telemetry::TelemetrySnapshot;

use crate::{cache::QueryCache, telemetry::Telemetry};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait RetrievalProvider
where
	Self: Send + Sync,
{
	fn retrieve<'a>(
		&'a self,
		cfg: &'a RetrievalProviderConfig,
		tenant_id: &'a str,
		query: &'a str,
		mode: &'a str,
		limit: u32,
	) -> BoxFuture<'a, color_eyre::Result<Vec<Candidate>>>;
}

pub trait EmbeddingProvider
where
	Self: Send + Sync,
{
	fn embed_query<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		query: &'a str,
	) -> BoxFuture<'a, color_eyre::Result<Vec<f32>>>;
}

#[derive(Clone)]
pub struct Providers {
	pub retrieval: Arc<dyn RetrievalProvider>,
	pub embedding: Arc<dyn EmbeddingProvider>,
}

pub struct LoreEngine {
	pub cfg: Config,
	pub providers: Providers,
	cache: QueryCache,
	telemetry: Telemetry,
}

struct DefaultProviders;

impl RetrievalProvider for DefaultProviders {
	fn retrieve<'a>(
		&'a self,
		cfg: &'a RetrievalProviderConfig,
		tenant_id: &'a str,
		query: &'a str,
		mode: &'a str,
		limit: u32,
	) -> BoxFuture<'a, color_eyre::Result<Vec<Candidate>>> {
		Box::pin(retrieval::retrieve(cfg, tenant_id, query, mode, limit))
	}
}

impl EmbeddingProvider for DefaultProviders {
	fn embed_query<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		query: &'a str,
	) -> BoxFuture<'a, color_eyre::Result<Vec<f32>>> {
		Box::pin(embedding::embed_query(cfg, query))
	}
}

impl Providers {
	pub fn new(
		retrieval: Arc<dyn RetrievalProvider>,
		embedding: Arc<dyn EmbeddingProvider>,
	) -> Self {
		Self { retrieval, embedding }
	}
}

impl Default for Providers {
	fn default() -> Self {
		let provider = Arc::new(DefaultProviders);
		Self { retrieval: provider.clone(), embedding: provider }
	}
}

impl LoreEngine {
	pub fn new(cfg: Config) -> Self {
		Self::with_providers(cfg, Providers::default())
	}

	pub fn with_providers(cfg: Config, providers: Providers) -> Self {
		let cache = QueryCache::new(&cfg.search.cache);

		Self { cfg, providers, cache, telemetry: Telemetry::default() }
	}

	/// Point-in-time copy of the pipeline counters.
	pub fn telemetry_snapshot(&self) -> TelemetrySnapshot {
		self.telemetry.snapshot()
	}
}
