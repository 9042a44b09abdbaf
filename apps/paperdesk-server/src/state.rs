//! Application state management

use std::sync::Arc;

use crate::config::{Config, LimitsConfig};

/// Shared application state
///
/// Requests are independent, so configuration is the only shared value.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config }),
        }
    }

    /// Get the request limits
    pub fn limits(&self) -> &LimitsConfig {
        &self.inner.config.limits
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
