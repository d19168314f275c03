use std::sync::Arc;

use lore_engine::LoreEngine;

#[derive(Clone)]
pub struct AppState {
	pub engine: Arc<LoreEngine>,
}
impl AppState {
	pub fn new(config: lore_config::Config) -> Self {
		Self { engine: Arc::new(LoreEngine::new(config)) }
	}
}
