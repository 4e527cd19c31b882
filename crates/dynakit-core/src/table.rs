//! A table bound to its key schema.

use dynakit_model::types::TableDescription;

use crate::error::{Error, Result};
use crate::item::{DeleteItemRequest, GetItemRequest, PutItemRequest, UpdateItemRequest};
use crate::query::QueryRequest;
use crate::scan::ScanRequest;
use crate::schema::{AttributeDefinition, ItemKey, KeySchema};
use crate::value::{Item, Value};

/// Name and key schema of one table. Builders created from a handle encode
/// key values as the declared key types.
#[derive(Debug, Clone)]
pub struct TableHandle {
    name: String,
    schema: KeySchema,
    description: Option<TableDescription>,
}

impl TableHandle {
    /// Bind `name` to a known schema.
    pub fn new(name: impl Into<String>, schema: KeySchema) -> Self {
        Self {
            name: name.into(),
            schema,
            description: None,
        }
    }

    /// Bind a described table.
    pub fn from_description(description: TableDescription) -> Result<Self> {
        let schema = KeySchema::from_description(&description)?;
        let name = description
            .table_name
            .clone()
            .filter(|n| !n.is_empty())
            .ok_or_else(|| Error::MissingKeyDefinition("table description has no name".to_owned()))?;
        Ok(Self {
            name,
            schema,
            description: Some(description),
        })
    }

    /// Attach the description returned by the store.
    #[must_use]
    pub fn with_description(mut self, description: TableDescription) -> Self {
        self.description = Some(description);
        self
    }

    /// Table name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Key schema.
    #[must_use]
    pub fn schema(&self) -> &KeySchema {
        &self.schema
    }

    /// Hash key definition.
    #[must_use]
    pub fn hash_key(&self) -> &AttributeDefinition {
        self.schema.hash_key()
    }

    /// Range key definition, if any.
    #[must_use]
    pub fn range_key(&self) -> Option<&AttributeDefinition> {
        self.schema.range_key()
    }

    /// Whether the table has a range key.
    #[must_use]
    pub fn has_range_key(&self) -> bool {
        self.schema.has_range_key()
    }

    /// The description this handle was built from, if any.
    #[must_use]
    pub fn description(&self) -> Option<&TableDescription> {
        self.description.as_ref()
    }

    /// Key of one item.
    #[must_use]
    pub fn key(&self, hash: impl Into<Value>, range: Option<Value>) -> ItemKey {
        self.schema.key(hash.into(), range)
    }

    /// Read one item.
    #[must_use]
    pub fn get_item(&self, hash: impl Into<Value>, range: Option<Value>) -> GetItemRequest {
        GetItemRequest::new(self.name.clone(), self.key(hash, range))
    }

    /// Write one item.
    #[must_use]
    pub fn put_item(&self, item: Item) -> PutItemRequest {
        PutItemRequest::new(self.name.clone(), item)
    }

    /// Update one item with an update expression.
    #[must_use]
    pub fn update_item(
        &self,
        hash: impl Into<Value>,
        range: Option<Value>,
        expression: impl Into<String>,
    ) -> UpdateItemRequest {
        UpdateItemRequest::new(self.name.clone(), self.key(hash, range), expression)
    }

    /// Delete one item.
    #[must_use]
    pub fn delete_item(&self, hash: impl Into<Value>, range: Option<Value>) -> DeleteItemRequest {
        DeleteItemRequest::new(self.name.clone(), self.key(hash, range))
    }

    /// Query items sharing `hash`. Range conditions added with
    /// [`QueryRequest::range`] use this table's range key.
    #[must_use]
    pub fn query(&self, hash: impl Into<Value>) -> QueryRequest {
        let request = QueryRequest::new(self.name.clone(), self.schema.hash_key().key(hash));
        match self.schema.range_key() {
            Some(range) => request.range_key(range.clone()),
            None => request,
        }
    }

    /// Scan the whole table.
    #[must_use]
    pub fn scan(&self) -> ScanRequest {
        ScanRequest::new(self.name.clone())
    }
}
