//! Catalogue Storage Layer
//!
//! Implements the `ModelStore` trait using SQLite.
//!
//! # Architecture
//!
//! - One `models` table; the natural key (`name`) carries a UNIQUE constraint
//! - Store-managed `created_at` / `updated_at` timestamps (UTC)
//! - Every write runs in its own transaction together with the read-back of the
//!   canonical row, so a failed write leaves nothing behind
//!
//! # Examples
//!
//! ```no_run
//! use catalogue_store::SqliteStore;
//!
//! let store = SqliteStore::new(":memory:").unwrap();
//! // Store is now ready for record operations
//! ```

#![warn(missing_docs)]

use catalogue_domain::traits::{ModelStore, StoreFailure};
use catalogue_domain::{CreateModel, ModelId, ModelRecord, UpdateModel};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row, ToSql};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

const SELECT_COLUMNS: &str = "SELECT id, name, display_name, organization, release_date, description, license, metadata, created_at, updated_at FROM models";

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Natural key already taken
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    /// Any other constraint (NOT NULL, CHECK) rejected the write
    #[error("Constraint violated: {0}")]
    ConstraintViolation(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(rusqlite::Error),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(ref failure, ref message) = e {
            if failure.code == rusqlite::ErrorCode::ConstraintViolation {
                let detail = message.clone().unwrap_or_else(|| failure.to_string());
                return match failure.extended_code {
                    rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                    | rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
                        StoreError::UniqueViolation(detail)
                    }
                    _ => StoreError::ConstraintViolation(detail),
                };
            }
        }
        StoreError::Database(e)
    }
}

impl StoreFailure for StoreError {
    fn is_unique_violation(&self) -> bool {
        matches!(self, StoreError::UniqueViolation(_))
    }
}

/// SQLite-based implementation of ModelStore
///
/// # Thread Safety
///
/// SQLite connections are not `Sync`. Share a store between tasks by wrapping
/// it in a mutex; each operation is short and never awaits.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Create a new SqliteStore with the given database path
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use catalogue_store::SqliteStore;
    ///
    /// let store = SqliteStore::new("catalogue.db").unwrap();
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Create a store backed by a private in-memory database
    pub fn in_memory() -> Result<Self, StoreError> {
        Self::new(":memory:")
    }

    /// Initialize the database schema
    fn initialize_schema(&self) -> Result<(), StoreError> {
        let schema = include_str!("schema.sql");
        self.conn.execute_batch(schema)?;
        Ok(())
    }

    /// Number of stored records
    pub fn count(&self) -> Result<usize, StoreError> {
        let count: i64 = self.conn.query_row("SELECT COUNT(*) FROM models", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn metadata_to_text(
        metadata: &Option<serde_json::Map<String, serde_json::Value>>,
    ) -> Result<Option<String>, StoreError> {
        metadata
            .as_ref()
            .map(|m| serde_json::to_string(m))
            .transpose()
            .map_err(|e| StoreError::InvalidData(format!("Unserializable metadata: {}", e)))
    }

    fn text_to_metadata(
        text: Option<String>,
    ) -> Result<Option<serde_json::Map<String, serde_json::Value>>, StoreError> {
        text.map(|t| serde_json::from_str(&t))
            .transpose()
            .map_err(|e| StoreError::InvalidData(format!("Stored metadata is not a JSON object: {}", e)))
    }

    /// Convert a result row into a ModelRecord
    fn row_to_record(row: &Row<'_>) -> rusqlite::Result<ModelRecord> {
        let metadata_text: Option<String> = row.get(7)?;
        let metadata = Self::text_to_metadata(metadata_text).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(7, rusqlite::types::Type::Text, Box::new(e))
        })?;

        Ok(ModelRecord {
            id: ModelId::from_value(row.get(0)?),
            name: row.get(1)?,
            display_name: row.get(2)?,
            organization: row.get(3)?,
            release_date: row.get(4)?,
            description: row.get(5)?,
            license: row.get(6)?,
            metadata,
            created_at: row.get::<_, DateTime<Utc>>(8)?,
            updated_at: row.get::<_, DateTime<Utc>>(9)?,
        })
    }

    fn select_by_id(conn: &Connection, id: ModelId) -> Result<Option<ModelRecord>, StoreError> {
        let record = conn
            .query_row(
                &format!("{} WHERE id = ?1", SELECT_COLUMNS),
                params![id.value()],
                Self::row_to_record,
            )
            .optional()?;
        Ok(record)
    }
}

impl ModelStore for SqliteStore {
    type Error = StoreError;

    fn find_by_name(&self, name: &str) -> Result<Option<ModelRecord>, Self::Error> {
        let record = self
            .conn
            .query_row(
                &format!("{} WHERE name = ?1", SELECT_COLUMNS),
                params![name],
                Self::row_to_record,
            )
            .optional()?;
        Ok(record)
    }

    fn create(&mut self, model: &CreateModel) -> Result<ModelRecord, Self::Error> {
        let metadata = Self::metadata_to_text(&model.metadata)?;
        let now = Utc::now();

        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO models (name, display_name, organization, release_date, description, license, metadata, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                &model.name,
                &model.display_name,
                &model.organization,
                &model.release_date,
                &model.description,
                &model.license,
                &metadata,
                &now,
                &now,
            ],
        )?;
        let id = ModelId::from_value(tx.last_insert_rowid());

        let record = Self::select_by_id(&tx, id)?.ok_or_else(|| {
            StoreError::InvalidData(format!("Inserted row {} could not be read back", id))
        })?;
        tx.commit()?;

        debug!("Created model '{}' with id {}", record.name, record.id);
        Ok(record)
    }

    fn get(&self, id: ModelId) -> Result<Option<ModelRecord>, Self::Error> {
        Self::select_by_id(&self.conn, id)
    }

    fn update(&mut self, id: ModelId, changes: &UpdateModel) -> Result<Option<ModelRecord>, Self::Error> {
        let mut sql = String::from("UPDATE models SET updated_at = ?");
        let mut params: Vec<Box<dyn ToSql>> = vec![Box::new(Utc::now())];

        if let Some(name) = &changes.name {
            sql.push_str(", name = ?");
            params.push(Box::new(name.clone()));
        }
        if let Some(display_name) = &changes.display_name {
            sql.push_str(", display_name = ?");
            params.push(Box::new(display_name.clone()));
        }
        if let Some(organization) = &changes.organization {
            sql.push_str(", organization = ?");
            params.push(Box::new(organization.clone()));
        }
        if let Some(release_date) = changes.release_date {
            sql.push_str(", release_date = ?");
            params.push(Box::new(release_date));
        }
        if let Some(description) = &changes.description {
            sql.push_str(", description = ?");
            params.push(Box::new(description.clone()));
        }
        if let Some(license) = &changes.license {
            sql.push_str(", license = ?");
            params.push(Box::new(license.clone()));
        }
        if changes.metadata.is_some() {
            sql.push_str(", metadata = ?");
            params.push(Box::new(Self::metadata_to_text(&changes.metadata)?));
        }

        sql.push_str(" WHERE id = ?");
        params.push(Box::new(id.value()));

        let tx = self.conn.transaction()?;
        let param_refs: Vec<&dyn ToSql> = params.iter().map(|p| p.as_ref()).collect();
        let changed = tx.execute(&sql, &param_refs[..])?;
        if changed == 0 {
            return Ok(None);
        }
        let record = Self::select_by_id(&tx, id)?;
        tx.commit()?;

        Ok(record)
    }

    fn delete(&mut self, id: ModelId) -> Result<bool, Self::Error> {
        let deleted = self
            .conn
            .execute("DELETE FROM models WHERE id = ?1", params![id.value()])?;
        Ok(deleted > 0)
    }
}
