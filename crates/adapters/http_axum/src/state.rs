//! Shared per-resource state for axum handlers.

use std::sync::Arc;

use backsync_app::ports::ModelSource;
use backsync_app::services::crud_service::CrudService;

/// State shared by the handlers of one mounted resource.
///
/// Generic over the model source to avoid dynamic dispatch. `Clone` is
/// implemented manually so the source itself does not need to be `Clone`;
/// only the `Arc` wrapper is cloned.
pub struct AppState<S> {
    /// CRUD dispatch service for this resource.
    pub service: Arc<CrudService<S>>,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
        }
    }
}

impl<S> AppState<S>
where
    S: ModelSource + Send + Sync + 'static,
{
    /// Create state from a dispatch service.
    pub fn new(service: CrudService<S>) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}
