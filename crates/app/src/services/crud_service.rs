//! CRUD dispatch — maps HTTP verbs onto model lifecycle operations.
//!
//! The verb mapping follows the Backbone sync convention:
//!
//! ```text
//! create -> POST   /collection
//! read   -> GET    /collection[/id]
//! update -> PUT    /collection/id
//! delete -> DELETE /collection/id
//! ```
//!
//! The dispatcher never routes on verbs itself; transports funnel every
//! method token into [`CrudService::handle_single`] and the switch happens
//! in one place.

use serde_json::Value;

use backsync_domain::error::{CrudError, UsageError};
use backsync_domain::filter::Filter;
use backsync_domain::id::ModelId;
use backsync_domain::method::Method;
use backsync_domain::values::Values;

use crate::ports::{Model, ModelSource};

/// Where the identifier for a PUT comes from.
///
/// The two conventions are mutually exclusive, so every service picks one
/// explicitly at construction time. Verbs other than PUT always use the
/// path parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UpdateIdSource {
    /// The path parameter, same as every other verb.
    #[default]
    PathParam,
    /// A required `id` key inside the JSON payload, stripped before the
    /// remaining values are applied.
    Payload,
}

/// One decoded request against a single resource.
#[derive(Debug, Clone)]
pub struct SingleRequest {
    /// Raw HTTP method token as received from the transport.
    pub method: String,
    /// Identifier extracted from the request path, if any.
    pub id: Option<ModelId>,
    /// Raw request body; empty means no body.
    pub body: Vec<u8>,
}

/// One decoded request against a collection.
#[derive(Debug, Clone, Default)]
pub struct CollectionRequest {
    /// Query parameters in wire order.
    pub query: Vec<(String, String)>,
}

/// Generic CRUD dispatcher over a model-provider strategy.
///
/// Resolves a target model through the injected [`ModelSource`], performs
/// the lifecycle operation implied by the HTTP verb, and renders JSON
/// response data. One instance per mounted resource.
pub struct CrudService<S> {
    source: S,
    update_id: UpdateIdSource,
}

impl<S: ModelSource> CrudService<S> {
    /// Create a service backed by the given model source, resolving PUT
    /// identifiers from the path parameter.
    pub fn new(source: S) -> Self {
        Self {
            source,
            update_id: UpdateIdSource::default(),
        }
    }

    /// Select where PUT identifiers come from.
    #[must_use]
    pub fn with_update_id_source(mut self, update_id: UpdateIdSource) -> Self {
        self.update_id = update_id;
        self
    }

    /// Dispatch a single-resource request.
    ///
    /// Returns the rendered model for POST, GET, and PUT, and `None` for
    /// DELETE (no response body). The body decodes leniently: absence or
    /// garbage acts as an empty value set, never an error.
    ///
    /// # Errors
    ///
    /// [`UsageError::UnsupportedMethod`] for verbs outside the mapping,
    /// [`UsageError::MissingId`] for DELETE without an identifier (checked
    /// before the model source is consulted) and for PUT under
    /// [`UpdateIdSource::Payload`] without a usable `id` key, plus whatever
    /// the model source and lifecycle calls report.
    #[tracing::instrument(skip(self, request), fields(method = %request.method, id = ?request.id))]
    pub async fn handle_single(&self, request: SingleRequest) -> Result<Option<Value>, CrudError> {
        let method: Method = request.method.parse()?;
        let mut values = Values::decode(&request.body);
        let id = self.resolve_id(method, request.id, &mut values)?;

        let mut model = self.source.get_model(id.as_ref()).await?;

        match method {
            Method::Post => {
                model.apply(values)?;
                model.insert().await?;
            }
            Method::Get => {}
            Method::Put => {
                model.apply(values)?;
                model.update().await?;
            }
            Method::Delete => {
                model.delete().await?;
                return Ok(None);
            }
        }

        render(&model).map(Some)
    }

    /// Dispatch a collection listing.
    ///
    /// Query parameters whose key exactly matches a schema column become
    /// equality filters; unknown keys are silently ignored. The result is
    /// always an array, empty result set included.
    ///
    /// # Errors
    ///
    /// Whatever the model source and the collection query report.
    #[tracing::instrument(skip(self, request), fields(params = request.query.len()))]
    pub async fn handle_collection(
        &self,
        request: CollectionRequest,
    ) -> Result<Vec<Value>, CrudError> {
        let model = self.source.get_model(None).await?;

        let filters: Vec<Filter> = request
            .query
            .into_iter()
            .filter(|(column, _)| model.schema().contains(column))
            .map(|(column, value)| Filter::equals(column, value))
            .collect();

        let items = model.find_all(&filters).await?;
        items.iter().map(render).collect()
    }

    /// Resolve the effective identifier for this request.
    ///
    /// DELETE requires an identifier; the check runs here so a missing id
    /// fails before any model is resolved.
    fn resolve_id(
        &self,
        method: Method,
        path_id: Option<ModelId>,
        values: &mut Values,
    ) -> Result<Option<ModelId>, UsageError> {
        let id = match (method, self.update_id) {
            (Method::Put, UpdateIdSource::Payload) => {
                let raw = values.remove("id").ok_or(UsageError::MissingId)?;
                Some(ModelId::from_json(&raw).ok_or(UsageError::MissingId)?)
            }
            _ => path_id,
        };

        if method == Method::Delete && id.is_none() {
            return Err(UsageError::MissingId);
        }

        Ok(id)
    }
}

/// Render a model into response data: the flat-map hook when present,
/// otherwise the model serialized as-is.
fn render<M: Model>(model: &M) -> Result<Value, CrudError> {
    match model.as_map() {
        Some(map) => Ok(Value::Object(map)),
        None => Ok(serde_json::to_value(model)?),
    }
}
