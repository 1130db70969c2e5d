use super::*;

#[derive(Clone)]
pub(super) struct AppState {
    pub(super) generator: Arc<LevelGenerator>,
}

impl AppState {
    pub(super) fn new(generator: LevelGenerator) -> Self {
        Self {
            generator: Arc::new(generator),
        }
    }

    pub(super) fn config(&self) -> &LevelConfig {
        self.generator.config()
    }
}
