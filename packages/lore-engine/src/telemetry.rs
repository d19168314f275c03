// std
use std::sync::atomic::{AtomicU64, Ordering};

// crates.io
use serde::Serialize;

// self
use crate::{pipeline::Mode, rerank::RerankStrategy};

/// Fire-and-forget pipeline counters. Recording never blocks and never fails
/// a request.
#[derive(Debug, Default)]
pub(crate) struct Telemetry {
	answers_semantic: AtomicU64,
	answers_lexical: AtomicU64,
	answers_hybrid: AtomicU64,
	answers_reranked: AtomicU64,
	abstentions: AtomicU64,
	rerank_embed: AtomicU64,
	rerank_token: AtomicU64,
	rerank_none: AtomicU64,
}

/// Point-in-time counter values, readable by operators and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TelemetrySnapshot {
	pub answers_semantic: u64,
	pub answers_lexical: u64,
	pub answers_hybrid: u64,
	pub answers_reranked: u64,
	pub abstentions: u64,
	pub rerank_embed: u64,
	pub rerank_token: u64,
	pub rerank_none: u64,
}

impl Telemetry {
	pub(crate) fn record_answer(&self, mode: Mode, reranked: bool) {
		let counter = match mode {
			Mode::Semantic => &self.answers_semantic,
			Mode::Lexical => &self.answers_lexical,
			Mode::Hybrid => &self.answers_hybrid,
		};

		counter.fetch_add(1, Ordering::Relaxed);

		if reranked {
			self.answers_reranked.fetch_add(1, Ordering::Relaxed);
		}

		tracing::debug!(mode = mode.as_str(), reranked, "Recorded answer.");
	}

	pub(crate) fn record_abstention(&self) {
		self.abstentions.fetch_add(1, Ordering::Relaxed);

		tracing::debug!("Recorded abstention.");
	}

	pub(crate) fn record_rerank(&self, strategy: RerankStrategy) {
		let counter = match strategy {
			RerankStrategy::Embed => &self.rerank_embed,
			RerankStrategy::Token => &self.rerank_token,
			RerankStrategy::None => &self.rerank_none,
		};

		counter.fetch_add(1, Ordering::Relaxed);

		tracing::debug!(strategy = strategy.as_str(), "Recorded rerank strategy.");
	}

	pub(crate) fn snapshot(&self) -> TelemetrySnapshot {
		TelemetrySnapshot {
			answers_semantic: self.answers_semantic.load(Ordering::Relaxed),
			answers_lexical: self.answers_lexical.load(Ordering::Relaxed),
			answers_hybrid: self.answers_hybrid.load(Ordering::Relaxed),
			answers_reranked: self.answers_reranked.load(Ordering::Relaxed),
			abstentions: self.abstentions.load(Ordering::Relaxed),
			rerank_embed: self.rerank_embed.load(Ordering::Relaxed),
			rerank_token: self.rerank_token.load(Ordering::Relaxed),
			rerank_none: self.rerank_none.load(Ordering::Relaxed),
		}
	}
}
