//! Application state management

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::config::Config;
use crate::options::PdfOptions;
use crate::renderer::{PdfRenderer, WkHtmlToPdf};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    renderer: Arc<dyn PdfRenderer>,
    /// Default options applied beneath query and body options
    defaults: RwLock<PdfOptions>,
}

impl AppState {
    /// Create state backed by the configured wkhtmltopdf binary
    pub fn new(config: Config) -> Self {
        let renderer = Arc::new(WkHtmlToPdf::from_config(&config.renderer));
        Self::with_renderer(config, renderer)
    }

    /// Create state with an explicit renderer
    pub fn with_renderer(config: Config, renderer: Arc<dyn PdfRenderer>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                renderer,
                defaults: RwLock::new(PdfOptions::default()),
            }),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the renderer
    pub fn renderer(&self) -> &dyn PdfRenderer {
        self.inner.renderer.as_ref()
    }

    /// Snapshot of the current default options
    pub async fn defaults(&self) -> PdfOptions {
        self.inner.defaults.read().await.clone()
    }

    /// Replace the default options in one step
    pub async fn replace_defaults(&self, options: PdfOptions) -> PdfOptions {
        let mut guard = self.inner.defaults.write().await;
        std::mem::replace(&mut *guard, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Orientation;

    #[tokio::test]
    async fn test_replace_defaults() {
        let state = AppState::new(Config::default());
        assert_eq!(state.defaults().await, PdfOptions::default());

        let landscape = PdfOptions {
            orientation: Orientation::Landscape,
            ..PdfOptions::default()
        };
        let previous = state.replace_defaults(landscape.clone()).await;
        assert_eq!(previous, PdfOptions::default());
        assert_eq!(state.defaults().await, landscape);

        // Clones share the same defaults
        let clone = state.clone();
        assert_eq!(clone.defaults().await.orientation, Orientation::Landscape);
    }
}
