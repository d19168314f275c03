//! Provider doubles and fixtures shared by the engine and API test suites.

use std::sync::atomic::{AtomicUsize, Ordering};

use color_eyre::eyre::eyre;

use lore_config::{
	Answer, Config, EmbeddingProviderConfig, Providers, RetrievalProviderConfig, Search, Service,
};
use lore_domain::Candidate;
use lore_engine::{BoxFuture, EmbeddingProvider, RetrievalProvider};

pub const TEST_TENANT: &str = "tenant-a";

/// Serves a fixed candidate set, filtered by tenant and truncated to the
/// requested limit, and counts how often it was asked.
pub struct CannedRetrieval {
	candidates: Vec<Candidate>,
	calls: AtomicUsize,
}

impl CannedRetrieval {
	pub fn new(candidates: Vec<Candidate>) -> Self {
		Self { candidates, calls: AtomicUsize::new(0) }
	}

	pub fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}
}

impl RetrievalProvider for CannedRetrieval {
	fn retrieve<'a>(
		&'a self,
		_cfg: &'a RetrievalProviderConfig,
		tenant_id: &'a str,
		_query: &'a str,
		_mode: &'a str,
		limit: u32,
	) -> BoxFuture<'a, color_eyre::Result<Vec<Candidate>>> {
		self.calls.fetch_add(1, Ordering::SeqCst);

		let mut out = self
			.candidates
			.iter()
			.filter(|candidate| candidate.tenant_id == tenant_id)
			.cloned()
			.collect::<Vec<_>>();

		out.truncate(limit as usize);

		Box::pin(async move { Ok(out) })
	}
}

pub struct FailingRetrieval {
	calls: AtomicUsize,
}

impl FailingRetrieval {
	pub fn new() -> Self {
		Self { calls: AtomicUsize::new(0) }
	}

	pub fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}
}

impl Default for FailingRetrieval {
	fn default() -> Self {
		Self::new()
	}
}

impl RetrievalProvider for FailingRetrieval {
	fn retrieve<'a>(
		&'a self,
		_cfg: &'a RetrievalProviderConfig,
		_tenant_id: &'a str,
		_query: &'a str,
		_mode: &'a str,
		_limit: u32,
	) -> BoxFuture<'a, color_eyre::Result<Vec<Candidate>>> {
		self.calls.fetch_add(1, Ordering::SeqCst);

		Box::pin(async { Err(eyre!("Retrieval backend is down.")) })
	}
}

/// Returns a fixed query embedding and counts calls, so tests can assert
/// whether the embed strategy was attempted.
pub struct CannedEmbedding {
	vector: Vec<f32>,
	calls: AtomicUsize,
}

impl CannedEmbedding {
	pub fn new(vector: Vec<f32>) -> Self {
		Self { vector, calls: AtomicUsize::new(0) }
	}

	pub fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}
}

impl EmbeddingProvider for CannedEmbedding {
	fn embed_query<'a>(
		&'a self,
		_cfg: &'a EmbeddingProviderConfig,
		_query: &'a str,
	) -> BoxFuture<'a, color_eyre::Result<Vec<f32>>> {
		self.calls.fetch_add(1, Ordering::SeqCst);

		let vector = self.vector.clone();

		Box::pin(async move { Ok(vector) })
	}
}

pub struct FailingEmbedding {
	calls: AtomicUsize,
}

impl FailingEmbedding {
	pub fn new() -> Self {
		Self { calls: AtomicUsize::new(0) }
	}

	pub fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}
}

impl Default for FailingEmbedding {
	fn default() -> Self {
		Self::new()
	}
}

impl EmbeddingProvider for FailingEmbedding {
	fn embed_query<'a>(
		&'a self,
		_cfg: &'a EmbeddingProviderConfig,
		_query: &'a str,
	) -> BoxFuture<'a, color_eyre::Result<Vec<f32>>> {
		self.calls.fetch_add(1, Ordering::SeqCst);

		Box::pin(async { Err(eyre!("Embedding backend is down.")) })
	}
}

pub fn candidate(
	id: &str,
	source: &str,
	text: &str,
	score_semantic: Option<f32>,
	score_lex: Option<f32>,
	embedding: Option<Vec<f32>>,
) -> Candidate {
	Candidate {
		id: id.into(),
		tenant_id: TEST_TENANT.into(),
		source: source.into(),
		text: text.into(),
		score_semantic,
		score_lex,
		score_fused: None,
		score_rerank: None,
		embedding,
	}
}

/// A complete config with loopback provider endpoints. Tests that exercise
/// providers through doubles never dial them.
pub fn config() -> Config {
	Config {
		service: Service { http_bind: "127.0.0.1:0".into(), log_level: "info".into() },
		providers: Providers {
			retrieval: RetrievalProviderConfig {
				provider_id: "test-retrieval".into(),
				api_base: "http://127.0.0.1:9".into(),
				api_key: "test-key".into(),
				path: "/v1/retrieve".into(),
				timeout_ms: 250,
				default_headers: serde_json::Map::new(),
			},
			embedding: EmbeddingProviderConfig {
				provider_id: "test-embedding".into(),
				api_base: "http://127.0.0.1:9".into(),
				api_key: "test-key".into(),
				path: "/v1/embeddings".into(),
				model: "test-embed".into(),
				dimensions: 8,
				timeout_ms: 250,
				default_headers: serde_json::Map::new(),
			},
		},
		search: Search::default(),
		answer: Answer::default(),
	}
}
