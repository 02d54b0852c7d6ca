//! Axum router assembly.

use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

/// Assemble the top-level axum [`Router`].
///
/// Mounts each `(collection, routes)` pair under `/api/{collection}`, adds
/// a `/health` probe, and layers request/response logging through the
/// `tracing` ecosystem.
pub fn build<I>(resources: I) -> Router
where
    I: IntoIterator<Item = (String, Router)>,
{
    let mut api = Router::new();
    for (collection, routes) in resources {
        api = api.nest(&format!("/{collection}"), routes);
    }

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
}

async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde::Serialize;
    use serde_json::{Map, Value, json};
    use tower::ServiceExt;

    use backsync_app::ports::{Model, ModelSource};
    use backsync_app::services::crud_service::CrudService;
    use backsync_domain::error::{CrudError, NotFoundError};
    use backsync_domain::filter::Filter;
    use backsync_domain::id::ModelId;
    use backsync_domain::schema::Schema;
    use backsync_domain::values::Values;

    use crate::api;

    /// Canned source serving a single stored model with id 1.
    struct StubSource {
        schema: Schema,
    }

    impl StubSource {
        fn new() -> Self {
            Self {
                schema: Schema::new(["id", "name"]),
            }
        }

        fn model(&self, id: Option<ModelId>) -> StubModel {
            StubModel {
                schema: self.schema.clone(),
                id,
                name: "widget".to_string(),
            }
        }
    }

    impl ModelSource for StubSource {
        type Model = StubModel;

        async fn get_model(&self, id: Option<&ModelId>) -> Result<StubModel, CrudError> {
            match id {
                None => Ok(self.model(None)),
                Some(ModelId::Int(1)) => Ok(self.model(Some(ModelId::Int(1)))),
                Some(other) => Err(NotFoundError {
                    model: "items".to_string(),
                    id: other.to_string(),
                }
                .into()),
            }
        }
    }

    #[derive(Serialize)]
    struct StubModel {
        #[serde(skip)]
        schema: Schema,
        id: Option<ModelId>,
        name: String,
    }

    impl Model for StubModel {
        fn id(&self) -> Option<&ModelId> {
            self.id.as_ref()
        }

        fn schema(&self) -> &Schema {
            &self.schema
        }

        fn apply(&mut self, values: Values) -> Result<(), CrudError> {
            if let Some(Value::String(name)) = values.get("name") {
                self.name = name.clone();
            }
            Ok(())
        }

        async fn insert(&mut self) -> Result<(), CrudError> {
            self.id = Some(ModelId::Int(1));
            Ok(())
        }

        async fn update(&mut self) -> Result<(), CrudError> {
            Ok(())
        }

        async fn delete(&mut self) -> Result<(), CrudError> {
            self.id = None;
            Ok(())
        }

        async fn find_all(&self, _filters: &[Filter]) -> Result<Vec<Self>, CrudError> {
            Ok(vec![StubModel {
                schema: self.schema.clone(),
                id: Some(ModelId::Int(1)),
                name: self.name.clone(),
            }])
        }

        fn as_map(&self) -> Option<Map<String, Value>> {
            let mut map = Map::new();
            if let Some(id) = &self.id {
                map.insert("id".to_string(), id.to_json());
            }
            map.insert("name".to_string(), Value::from(self.name.clone()));
            Some(map)
        }
    }

    fn app() -> Router {
        super::build([(
            "items".to_string(),
            api::routes(CrudService::new(StubSource::new())),
        )])
    }

    async fn body_json(body: Body) -> Value {
        let bytes = body.collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    }

    #[tokio::test]
    async fn should_return_ok_on_health_check() {
        let response = app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn should_list_collection() {
        let response = app()
            .oneshot(Request::get("/api/items").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response.into_body()).await;
        assert_eq!(body, json!([{"id": 1, "name": "widget"}]));
    }

    #[tokio::test]
    async fn should_create_with_201() {
        let response = app()
            .oneshot(
                Request::post("/api/items")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"name":"gizmo"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response.into_body()).await;
        assert_eq!(body, json!({"id": 1, "name": "gizmo"}));
    }

    #[tokio::test]
    async fn should_create_even_with_malformed_body() {
        let response = app()
            .oneshot(
                Request::post("/api/items")
                    .body(Body::from("definitely not json"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn should_read_single_model() {
        let response = app()
            .oneshot(Request::get("/api/items/1").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response.into_body()).await;
        assert_eq!(body, json!({"id": 1, "name": "widget"}));
    }

    #[tokio::test]
    async fn should_return_404_for_unknown_id() {
        let response = app()
            .oneshot(Request::get("/api/items/7").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response.into_body()).await;
        assert_eq!(body, json!({"error": "no items with id 7"}));
    }

    #[tokio::test]
    async fn should_return_204_on_delete() {
        let response = app()
            .oneshot(Request::delete("/api/items/1").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert!(bytes.is_empty());
    }

    #[tokio::test]
    async fn should_return_400_for_unsupported_verb() {
        let response = app()
            .oneshot(
                Request::patch("/api/items/1")
                    .body(Body::from(r#"{"name":"gizmo"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response.into_body()).await;
        assert_eq!(body, json!({"error": "invalid CRUD controller usage: PATCH"}));
    }

    #[tokio::test]
    async fn should_return_404_for_unknown_collection() {
        let response = app()
            .oneshot(Request::get("/api/widgets").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
