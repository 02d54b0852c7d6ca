//! Request decoding and response mapping for one mounted resource.

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::Value;

use backsync_app::ports::ModelSource;
use backsync_app::services::crud_service::{CollectionRequest, SingleRequest};
use backsync_domain::id::ModelId;

use crate::error::ApiError;
use crate::state::AppState;

/// Possible responses from the single-resource endpoint.
pub enum SingleResponse {
    /// Model created.
    Created(Json<Value>),
    /// Model read or updated.
    Ok(Json<Value>),
    /// Model deleted; no body.
    NoContent,
}

impl IntoResponse for SingleResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
            Self::Ok(json) => json.into_response(),
            Self::NoContent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

/// Possible responses from the collection endpoint.
pub enum CollectionResponse {
    /// Collection listing.
    Listed(Json<Vec<Value>>),
    /// Verb fell through to single-resource dispatch (POST creates here;
    /// payload-identified PUTs land here too).
    Single(SingleResponse),
}

impl IntoResponse for CollectionResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Listed(json) => json.into_response(),
            Self::Single(single) => single.into_response(),
        }
    }
}

/// `ANY /{collection}` — list on GET, single-resource dispatch otherwise.
///
/// # Errors
///
/// Any [`ApiError`] produced by the dispatch service.
pub async fn collection<S>(
    State(state): State<AppState<S>>,
    method: Method,
    Query(query): Query<Vec<(String, String)>>,
    body: Bytes,
) -> Result<CollectionResponse, ApiError>
where
    S: ModelSource + Send + Sync + 'static,
{
    if method == Method::GET {
        let items = state
            .service
            .handle_collection(CollectionRequest { query })
            .await?;
        return Ok(CollectionResponse::Listed(Json(items)));
    }

    let response = dispatch_single(&state, &method, None, &body).await?;
    Ok(CollectionResponse::Single(response))
}

/// `ANY /{collection}/{id}` — single-resource dispatch with a path id.
///
/// # Errors
///
/// Any [`ApiError`] produced by the dispatch service.
pub async fn single<S>(
    State(state): State<AppState<S>>,
    method: Method,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<SingleResponse, ApiError>
where
    S: ModelSource + Send + Sync + 'static,
{
    dispatch_single(&state, &method, Some(ModelId::from(id)), &body).await
}

/// Run the dispatcher and map its result onto a status per verb.
async fn dispatch_single<S>(
    state: &AppState<S>,
    method: &Method,
    id: Option<ModelId>,
    body: &Bytes,
) -> Result<SingleResponse, ApiError>
where
    S: ModelSource + Send + Sync + 'static,
{
    let request = SingleRequest {
        method: method.as_str().to_string(),
        id,
        body: body.to_vec(),
    };
    let result = state.service.handle_single(request).await?;

    Ok(match result {
        Some(value) if *method == Method::POST => SingleResponse::Created(Json(value)),
        Some(value) => SingleResponse::Ok(Json(value)),
        None => SingleResponse::NoContent,
    })
}
