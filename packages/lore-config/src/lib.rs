mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Answer, Config, EmbeddingProviderConfig, Providers, RetrievalProviderConfig, Search,
	SearchCache, SearchFusion, SearchLimits, Service,
};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}

	for (label, key) in [
		("retrieval", &cfg.providers.retrieval.api_key),
		("embedding", &cfg.providers.embedding.api_key),
	] {
		if key.trim().is_empty() {
			return Err(Error::Validation {
				message: format!("Provider {label} api_key must be non-empty."),
			});
		}
	}
	for (label, timeout_ms) in [
		("providers.retrieval", cfg.providers.retrieval.timeout_ms),
		("providers.embedding", cfg.providers.embedding.timeout_ms),
	] {
		if timeout_ms == 0 {
			return Err(Error::Validation {
				message: format!("{label}.timeout_ms must be greater than zero."),
			});
		}
	}

	if cfg.providers.embedding.dimensions == 0 {
		return Err(Error::Validation {
			message: "providers.embedding.dimensions must be greater than zero.".to_string(),
		});
	}
	if !cfg.search.fusion.alpha.is_finite() {
		return Err(Error::Validation {
			message: "search.fusion.alpha must be a finite number.".to_string(),
		});
	}
	if !(0.0..=1.0).contains(&cfg.search.fusion.alpha) {
		return Err(Error::Validation {
			message: "search.fusion.alpha must be in the range 0.0-1.0.".to_string(),
		});
	}
	if cfg.search.limits.top_k == 0 {
		return Err(Error::Validation {
			message: "search.limits.top_k must be greater than zero.".to_string(),
		});
	}
	if cfg.search.limits.candidate_k == 0 {
		return Err(Error::Validation {
			message: "search.limits.candidate_k must be greater than zero.".to_string(),
		});
	}
	if !(3..=50).contains(&cfg.search.limits.rerank_top_k) {
		return Err(Error::Validation {
			message: "search.limits.rerank_top_k must be in the range 3-50.".to_string(),
		});
	}
	if cfg.search.cache.ttl_secs == 0 {
		return Err(Error::Validation {
			message: "search.cache.ttl_secs must be greater than zero.".to_string(),
		});
	}
	if cfg.search.cache.shards == 0 {
		return Err(Error::Validation {
			message: "search.cache.shards must be greater than zero.".to_string(),
		});
	}
	if cfg.answer.max_chars == 0 {
		return Err(Error::Validation {
			message: "answer.max_chars must be greater than zero.".to_string(),
		});
	}
	if cfg.answer.max_citations == 0 {
		return Err(Error::Validation {
			message: "answer.max_citations must be greater than zero.".to_string(),
		});
	}
	if cfg.answer.snippet_max_chars == 0 {
		return Err(Error::Validation {
			message: "answer.snippet_max_chars must be greater than zero.".to_string(),
		});
	}
	if !cfg.answer.abstention_threshold.is_finite() {
		return Err(Error::Validation {
			message: "answer.abstention_threshold must be a finite number.".to_string(),
		});
	}
	if !(0.0..=1.0).contains(&cfg.answer.abstention_threshold) {
		return Err(Error::Validation {
			message: "answer.abstention_threshold must be in the range 0.0-1.0.".to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	while cfg.providers.retrieval.api_base.ends_with('/') {
		cfg.providers.retrieval.api_base.pop();
	}
	while cfg.providers.embedding.api_base.ends_with('/') {
		cfg.providers.embedding.api_base.pop();
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn minimal_toml() -> &'static str {
		r#"
			[service]
			http_bind = "127.0.0.1:8080"
			log_level = "info"

			[providers.retrieval]
			provider_id = "local"
			api_base = "http://127.0.0.1:9200/"
			api_key = "key"
			path = "/v1/retrieve"
			timeout_ms = 1000
			default_headers = {}

			[providers.embedding]
			provider_id = "local"
			api_base = "http://127.0.0.1:9300"
			api_key = "key"
			path = "/v1/embeddings"
			model = "m"
			dimensions = 4
			timeout_ms = 1000
			default_headers = {}
		"#
	}

	#[test]
	fn minimal_config_gets_defaults() {
		let mut cfg: Config = toml::from_str(minimal_toml()).expect("Failed to parse config.");

		normalize(&mut cfg);
		validate(&cfg).expect("Failed to validate config.");

		assert_eq!(cfg.search.fusion.alpha, 0.6);
		assert_eq!(cfg.search.cache.ttl_secs, 60);
		assert_eq!(cfg.answer.max_chars, 700);
		assert_eq!(cfg.answer.max_citations, 3);
		assert_eq!(cfg.answer.snippet_max_chars, 220);
		assert_eq!(cfg.answer.abstention_threshold, 0.25);
		assert_eq!(cfg.providers.retrieval.api_base, "http://127.0.0.1:9200");
	}

	#[test]
	fn rejects_alpha_out_of_range() {
		let mut cfg: Config = toml::from_str(minimal_toml()).expect("Failed to parse config.");

		cfg.search.fusion.alpha = 1.5;

		assert!(matches!(validate(&cfg), Err(Error::Validation { .. })));
	}

	#[test]
	fn rejects_rerank_top_k_out_of_range() {
		let mut cfg: Config = toml::from_str(minimal_toml()).expect("Failed to parse config.");

		cfg.search.limits.rerank_top_k = 51;

		assert!(matches!(validate(&cfg), Err(Error::Validation { .. })));
	}

	#[test]
	fn rejects_blank_http_bind() {
		let mut cfg: Config = toml::from_str(minimal_toml()).expect("Failed to parse config.");

		cfg.service.http_bind = "   ".to_string();

		assert!(matches!(validate(&cfg), Err(Error::Validation { .. })));
	}
}
