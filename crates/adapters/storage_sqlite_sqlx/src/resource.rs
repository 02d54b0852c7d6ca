//! Table-backed implementation of the model port.
//!
//! A [`SqliteResource`] discovers the live schema of one table at startup
//! and hands out [`SqliteModel`] instances whose column values travel as a
//! JSON map. No per-table Rust types are required; the table definition is
//! the contract.

use std::sync::Arc;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use sqlx::sqlite::SqliteRow;
use sqlx::{Column, QueryBuilder, Row, SqlitePool, TypeInfo, ValueRef};
use uuid::Uuid;

use backsync_app::ports::{Model, ModelSource};
use backsync_domain::error::{CrudError, NotFoundError};
use backsync_domain::filter::Filter;
use backsync_domain::id::ModelId;
use backsync_domain::schema::Schema;
use backsync_domain::values::Values;

use crate::error::StorageError;

type SqliteQuery<'q> = sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>>;

/// Column metadata discovered from the live table.
#[derive(Debug)]
struct TableInfo {
    name: String,
    primary_key: String,
    /// True when the primary key is INTEGER-declared; such keys are
    /// assigned by the database, text keys are generated as UUIDs.
    integer_key: bool,
    columns: Vec<ColumnInfo>,
    schema: Schema,
}

#[derive(Debug)]
struct ColumnInfo {
    name: String,
    /// BOOLEAN-declared columns store 0/1 and render as JSON booleans.
    boolean: bool,
}

/// `SQLite`-backed model source for one table.
#[derive(Debug)]
pub struct SqliteResource {
    pool: SqlitePool,
    table: Arc<TableInfo>,
}

impl SqliteResource {
    /// Open a source over `table`, discovering its columns from the live
    /// database.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::PrimaryKey`] when the table is missing, has
    /// no primary key, or has a composite one; otherwise any database
    /// error.
    pub async fn open(pool: SqlitePool, table: &str) -> Result<Self, StorageError> {
        let rows = sqlx::query(&format!("PRAGMA table_info({})", quote(table)))
            .fetch_all(&pool)
            .await?;

        let mut columns = Vec::with_capacity(rows.len());
        let mut primary_key = None;
        let mut integer_key = false;

        for row in &rows {
            let name: String = row.try_get("name")?;
            let declared: String = row.try_get("type")?;
            let pk: i64 = row.try_get("pk")?;
            let declared = declared.to_ascii_uppercase();

            if pk == 1 {
                integer_key = declared.contains("INT");
                primary_key = Some(name.clone());
            } else if pk > 1 {
                return Err(StorageError::PrimaryKey(table.to_string()));
            }

            columns.push(ColumnInfo {
                boolean: declared.contains("BOOL"),
                name,
            });
        }

        let Some(primary_key) = primary_key else {
            return Err(StorageError::PrimaryKey(table.to_string()));
        };

        let schema = Schema::new(columns.iter().map(|column| column.name.clone()));

        Ok(Self {
            pool,
            table: Arc::new(TableInfo {
                name: table.to_string(),
                primary_key,
                integer_key,
                columns,
                schema,
            }),
        })
    }

    /// Name of the table this source serves.
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table.name
    }

    fn empty_model(&self) -> SqliteModel {
        SqliteModel {
            pool: self.pool.clone(),
            table: Arc::clone(&self.table),
            id: None,
            row: Map::new(),
        }
    }
}

impl ModelSource for SqliteResource {
    type Model = SqliteModel;

    async fn get_model(&self, id: Option<&ModelId>) -> Result<SqliteModel, CrudError> {
        let Some(id) = id else {
            return Ok(self.empty_model());
        };

        let mut model = self.empty_model();
        model.load(id).await?;
        Ok(model)
    }
}

/// One row of a table-backed resource.
///
/// Column values are held as a column to JSON value map; the primary key
/// is part of the map once the model has been loaded or saved.
#[derive(Debug)]
pub struct SqliteModel {
    pool: SqlitePool,
    table: Arc<TableInfo>,
    id: Option<ModelId>,
    row: Map<String, Value>,
}

impl SqliteModel {
    async fn load(&mut self, id: &ModelId) -> Result<(), CrudError> {
        let sql = format!(
            "SELECT * FROM {} WHERE {} = ?",
            quote(&self.table.name),
            quote(&self.table.primary_key),
        );
        let row = bind_id(sqlx::query(&sql), id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        let Some(row) = row else {
            return Err(NotFoundError {
                model: self.table.name.clone(),
                id: id.to_string(),
            }
            .into());
        };

        self.row = decode_row(&row, &self.table).map_err(StorageError::from)?;
        self.id = id_from_row(&self.row, &self.table);
        Ok(())
    }

    async fn reload(&mut self) -> Result<(), CrudError> {
        let Some(id) = self.id.clone() else {
            return Ok(());
        };
        self.load(&id).await
    }

    /// Columns that participate in writes: applied values on schema
    /// columns, primary key excluded.
    fn write_columns(&self) -> Vec<(&str, &Value)> {
        self.table
            .columns
            .iter()
            .filter(|column| column.name != self.table.primary_key)
            .filter_map(|column| {
                self.row
                    .get(&column.name)
                    .map(|value| (column.name.as_str(), value))
            })
            .collect()
    }
}

impl Model for SqliteModel {
    fn id(&self) -> Option<&ModelId> {
        self.id.as_ref()
    }

    fn schema(&self) -> &Schema {
        &self.table.schema
    }

    fn apply(&mut self, values: Values) -> Result<(), CrudError> {
        for (column, value) in values.into_map() {
            if column == self.table.primary_key || !self.table.schema.contains(&column) {
                continue;
            }
            self.row.insert(column, value);
        }
        Ok(())
    }

    async fn insert(&mut self) -> Result<(), CrudError> {
        if self.id.is_none() && !self.table.integer_key {
            self.id = Some(ModelId::Text(Uuid::new_v4().to_string()));
        }

        let id_value = self.id.as_ref().map(ModelId::to_json);
        let result = {
            let mut pairs: Vec<(&str, &Value)> = Vec::new();
            if let Some(value) = &id_value {
                pairs.push((self.table.primary_key.as_str(), value));
            }
            pairs.extend(self.write_columns());

            if pairs.is_empty() {
                sqlx::query(&format!(
                    "INSERT INTO {} DEFAULT VALUES",
                    quote(&self.table.name)
                ))
                .execute(&self.pool)
                .await
            } else {
                let mut builder = QueryBuilder::new(format!(
                    "INSERT INTO {} (",
                    quote(&self.table.name)
                ));
                for (index, (column, _)) in pairs.iter().enumerate() {
                    if index > 0 {
                        builder.push(", ");
                    }
                    builder.push(quote(column));
                }
                builder.push(") VALUES (");
                for (index, (_, value)) in pairs.iter().enumerate() {
                    if index > 0 {
                        builder.push(", ");
                    }
                    bind_value(&mut builder, value)?;
                }
                builder.push(")");
                builder.build().execute(&self.pool).await
            }
        }
        .map_err(StorageError::from)?;

        if self.id.is_none() {
            self.id = Some(ModelId::Int(result.last_insert_rowid()));
        }

        self.reload().await
    }

    async fn update(&mut self) -> Result<(), CrudError> {
        let Some(id) = self.id.clone() else {
            return Err(StorageError::Unloaded("update").into());
        };

        {
            let pairs = self.write_columns();
            if pairs.is_empty() {
                return self.reload().await;
            }

            let mut builder =
                QueryBuilder::new(format!("UPDATE {} SET ", quote(&self.table.name)));
            for (index, (column, value)) in pairs.iter().enumerate() {
                if index > 0 {
                    builder.push(", ");
                }
                builder.push(quote(column));
                builder.push(" = ");
                bind_value(&mut builder, value)?;
            }
            builder.push(format!(" WHERE {} = ", quote(&self.table.primary_key)));
            push_id(&mut builder, &id);

            builder
                .build()
                .execute(&self.pool)
                .await
                .map_err(StorageError::from)?;
        }

        self.reload().await
    }

    async fn delete(&mut self) -> Result<(), CrudError> {
        let Some(id) = self.id.clone() else {
            return Err(StorageError::Unloaded("delete").into());
        };

        let sql = format!(
            "DELETE FROM {} WHERE {} = ?",
            quote(&self.table.name),
            quote(&self.table.primary_key),
        );
        bind_id(sqlx::query(&sql), &id)
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        self.id = None;
        self.row.clear();
        Ok(())
    }

    /// Filter columns are checked against the discovered schema before
    /// any SQL runs; `SQLite` reads an unknown double-quoted identifier
    /// as a string literal, not an error. Filter values are bound as
    /// text, and type affinity makes numeric strings match numeric
    /// columns, so booleans filter as `0` and `1`.
    async fn find_all(&self, filters: &[Filter]) -> Result<Vec<Self>, CrudError> {
        for filter in filters {
            if !self.table.schema.contains(&filter.column) {
                return Err(StorageError::Column {
                    table: self.table.name.clone(),
                    column: filter.column.clone(),
                }
                .into());
            }
        }

        let mut builder = QueryBuilder::new(format!("SELECT * FROM {}", quote(&self.table.name)));
        for (index, filter) in filters.iter().enumerate() {
            builder.push(if index == 0 { " WHERE " } else { " AND " });
            builder.push(quote(&filter.column));
            builder.push(" = ");
            builder.push_bind(filter.value.clone());
        }
        builder.push(format!(" ORDER BY {}", quote(&self.table.primary_key)));

        let rows = builder
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        let mut items = Vec::with_capacity(rows.len());
        for row in &rows {
            let map = decode_row(row, &self.table).map_err(StorageError::from)?;
            items.push(Self {
                pool: self.pool.clone(),
                table: Arc::clone(&self.table),
                id: id_from_row(&map, &self.table),
                row: map,
            });
        }
        Ok(items)
    }

    fn as_map(&self) -> Option<Map<String, Value>> {
        Some(self.row.clone())
    }
}

impl Serialize for SqliteModel {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.row.len()))?;
        for (column, value) in &self.row {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

/// Quote an identifier for direct inclusion in SQL.
///
/// The table name comes from configuration; column names are discovered
/// from `PRAGMA table_info` or checked against that schema before they
/// reach SQL. Quoting keeps unusual names working.
fn quote(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

fn bind_id<'q>(query: SqliteQuery<'q>, id: &ModelId) -> SqliteQuery<'q> {
    match id {
        ModelId::Int(number) => query.bind(*number),
        ModelId::Text(text) => query.bind(text.clone()),
    }
}

fn push_id(builder: &mut QueryBuilder<'_, sqlx::Sqlite>, id: &ModelId) {
    match id {
        ModelId::Int(number) => {
            builder.push_bind(*number);
        }
        ModelId::Text(text) => {
            builder.push_bind(text.clone());
        }
    }
}

/// Bind a JSON value as its natural `SQLite` storage class.
///
/// Booleans store as 0/1, arrays and objects as JSON text.
fn bind_value(
    builder: &mut QueryBuilder<'_, sqlx::Sqlite>,
    value: &Value,
) -> Result<(), StorageError> {
    match value {
        Value::Null => {
            builder.push_bind(None::<String>);
        }
        Value::Bool(flag) => {
            builder.push_bind(i64::from(*flag));
        }
        Value::Number(number) => {
            if let Some(integer) = number.as_i64() {
                builder.push_bind(integer);
            } else {
                builder.push_bind(number.as_f64().unwrap_or_default());
            }
        }
        Value::String(text) => {
            builder.push_bind(text.clone());
        }
        structured => {
            builder.push_bind(serde_json::to_string(structured)?);
        }
    }
    Ok(())
}

fn id_from_row(row: &Map<String, Value>, table: &TableInfo) -> Option<ModelId> {
    row.get(&table.primary_key).and_then(ModelId::from_json)
}

/// Decode a full row into a column to JSON value map.
///
/// Storage classes map directly; integers in BOOLEAN-declared columns come
/// back as JSON booleans, blobs as lossy UTF-8 text.
fn decode_row(row: &SqliteRow, table: &TableInfo) -> Result<Map<String, Value>, sqlx::Error> {
    let mut map = Map::new();
    for column in row.columns() {
        let name = column.name();
        let boolean = table
            .columns
            .iter()
            .any(|known| known.boolean && known.name == name);
        map.insert(
            name.to_string(),
            decode_column(row, column.ordinal(), boolean)?,
        );
    }
    Ok(map)
}

fn decode_column(row: &SqliteRow, index: usize, boolean: bool) -> Result<Value, sqlx::Error> {
    let raw = row.try_get_raw(index)?;
    if raw.is_null() {
        return Ok(Value::Null);
    }

    match raw.type_info().name() {
        "INTEGER" => {
            let number: i64 = row.try_get(index)?;
            Ok(if boolean {
                Value::Bool(number != 0)
            } else {
                Value::from(number)
            })
        }
        "REAL" => Ok(Value::from(row.try_get::<f64, _>(index)?)),
        "BLOB" => {
            let bytes: Vec<u8> = row.try_get(index)?;
            Ok(Value::from(String::from_utf8_lossy(&bytes).into_owned()))
        }
        _ => Ok(Value::from(row.try_get::<String, _>(index)?)),
    }
}
