//! Backbone-style REST endpoints.
//!
//! Both routes accept any verb and funnel the raw method token into the
//! dispatch service, so the verb switch lives in one place. The router only
//! decides whether a path identifier is present.

pub mod resource;

use axum::Router;
use axum::routing::any;

use backsync_app::ports::ModelSource;
use backsync_app::services::crud_service::CrudService;

use crate::state::AppState;

/// Build the router for one mounted resource, rooted at the collection.
///
/// ```text
/// POST   /        create
/// GET    /        list
/// GET    /{id}    read
/// PUT    /{id}    update
/// DELETE /{id}    delete
/// ```
///
/// Any other verb reaches the dispatcher and fails as invalid usage.
pub fn routes<S>(service: CrudService<S>) -> Router
where
    S: ModelSource + Send + Sync + 'static,
{
    Router::new()
        .route("/", any(resource::collection::<S>))
        .route("/{id}", any(resource::single::<S>))
        .with_state(AppState::new(service))
}
