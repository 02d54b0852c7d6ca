//! Model port — the storage-facing contract the dispatcher drives.

use std::future::Future;

use serde::Serialize;
use serde_json::{Map, Value};

use backsync_domain::error::CrudError;
use backsync_domain::filter::Filter;
use backsync_domain::id::ModelId;
use backsync_domain::schema::Schema;
use backsync_domain::values::Values;

/// One persistable resource instance plus its collection query surface.
///
/// Implementations decide what a row is and how it persists; the
/// dispatcher only sequences lifecycle calls. The `Serialize` bound is the
/// fallback response rendering for models without a flat-map hook.
pub trait Model: Serialize + Sized + Send {
    /// Identifier assigned by storage, if the instance is persisted.
    fn id(&self) -> Option<&ModelId>;

    /// Column names this model accepts, primary key included.
    fn schema(&self) -> &Schema;

    /// Merge decoded body values into the instance.
    ///
    /// Which keys are honored is the implementation's concern; classic ORMs
    /// drop unknown columns and the primary key.
    ///
    /// # Errors
    ///
    /// Propagates whatever the implementation reports; a failed apply
    /// aborts the request.
    fn apply(&mut self, values: Values) -> Result<(), CrudError>;

    /// Persist the instance as a new row, assigning its identifier.
    fn insert(&mut self) -> impl Future<Output = Result<(), CrudError>> + Send;

    /// Persist changes to the already-stored row.
    fn update(&mut self) -> impl Future<Output = Result<(), CrudError>> + Send;

    /// Remove the row from storage.
    fn delete(&mut self) -> impl Future<Output = Result<(), CrudError>> + Send;

    /// Run the collection query with the given equality filters applied.
    ///
    /// Called on an unloaded model. Every filter column is a schema column
    /// by the time it arrives here.
    fn find_all(
        &self,
        filters: &[Filter],
    ) -> impl Future<Output = Result<Vec<Self>, CrudError>> + Send;

    /// Flat key/value rendering used for response documents.
    ///
    /// `None` makes the dispatcher fall back to serializing the model
    /// as-is.
    fn as_map(&self) -> Option<Map<String, Value>> {
        None
    }
}

/// Strategy resolving an optional identifier into a [`Model`].
///
/// This is the sole per-resource customization surface the dispatcher
/// requires: `None` yields a fresh unsaved model, `Some(id)` the stored
/// one.
pub trait ModelSource {
    /// Model type this source produces.
    type Model: Model;

    /// Resolve `id` into a model.
    ///
    /// Fails with [`CrudError::NotFound`] when `id` matches nothing, or
    /// with a storage error when the lookup itself breaks.
    fn get_model(
        &self,
        id: Option<&ModelId>,
    ) -> impl Future<Output = Result<Self::Model, CrudError>> + Send;
}
