use std::sync::Arc;

use cadview_db::store::CorrelationStore;
use cadview_onshape::OnshapeClient;
use cadview_pipeline::TranslationPipeline;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Correlation records shared by the webhook and poll handlers.
    pub store: Arc<dyn CorrelationStore>,
    /// Remote CAD service client, also used directly by passthrough routes.
    pub onshape: Arc<dyn OnshapeClient>,
    /// Translation lifecycle wired to `onshape` and `store`.
    pub pipeline: Arc<TranslationPipeline>,
}

impl AppState {
    pub fn new(
        config: ServerConfig,
        onshape: Arc<dyn OnshapeClient>,
        store: Arc<dyn CorrelationStore>,
    ) -> Self {
        let pipeline = TranslationPipeline::new(
            Arc::clone(&onshape),
            Arc::clone(&store),
            &config.webhook_callback_root_url,
        );
        Self {
            config: Arc::new(config),
            store,
            onshape,
            pipeline: Arc::new(pipeline),
        }
    }
}
