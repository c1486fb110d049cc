//! Application state management

use std::sync::Arc;

use crate::config::Config;
use crate::pipeline::InvoicePipeline;

/// Shared application state
///
/// Cheap to clone; everything inside is read-only after construction, so
/// concurrent requests share nothing mutable.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    pipeline: InvoicePipeline,
}

impl AppState {
    /// Create a new application state
    pub fn new(config: Config, pipeline: InvoicePipeline) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, pipeline }),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the extraction pipeline
    pub fn pipeline(&self) -> &InvoicePipeline {
        &self.inner.pipeline
    }
}
