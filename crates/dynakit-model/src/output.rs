//! Operation output types.
//!
//! Outputs are decoded from store responses, so every field tolerates being
//! absent (`#[serde(default)]`). The three write operations and the two read
//! operations share a response shape each and are exposed under per-operation
//! aliases.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::attribute_value::WireItem;
use crate::types::{ConsumedCapacity, ItemCollectionMetrics, TableDescription};

// ---------------------------------------------------------------------------
// Table management
// ---------------------------------------------------------------------------

/// Output of `CreateTable`, `UpdateTable` and `DeleteTable`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TableDescriptionOutput {
    /// The properties of the table after the operation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_description: Option<TableDescription>,
}

/// Output for the `CreateTable` operation.
pub type CreateTableOutput = TableDescriptionOutput;
/// Output for the `UpdateTable` operation.
pub type UpdateTableOutput = TableDescriptionOutput;
/// Output for the `DeleteTable` operation.
pub type DeleteTableOutput = TableDescriptionOutput;

/// Output for the `DescribeTable` operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeTableOutput {
    /// The properties of the table.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<TableDescription>,
}

/// Output for the `ListTables` operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListTablesOutput {
    /// Table names of this page.
    #[serde(default)]
    pub table_names: Vec<String>,

    /// Where to resume; absent on the last page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_evaluated_table_name: Option<String>,
}

// ---------------------------------------------------------------------------
// Item CRUD
// ---------------------------------------------------------------------------

/// Output of `PutItem`, `UpdateItem` and `DeleteItem`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WriteItemOutput {
    /// The item image requested with `ReturnValues`, empty otherwise.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub attributes: WireItem,

    /// The capacity units consumed by the operation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consumed_capacity: Option<ConsumedCapacity>,

    /// Information about item collections modified by the operation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_collection_metrics: Option<ItemCollectionMetrics>,
}

/// Output for the `PutItem` operation.
pub type PutItemOutput = WriteItemOutput;
/// Output for the `UpdateItem` operation.
pub type UpdateItemOutput = WriteItemOutput;
/// Output for the `DeleteItem` operation.
pub type DeleteItemOutput = WriteItemOutput;

/// Output for the `GetItem` operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetItemOutput {
    /// The item, absent or empty when no item has the given key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<WireItem>,

    /// The capacity units consumed by the operation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consumed_capacity: Option<ConsumedCapacity>,
}

// ---------------------------------------------------------------------------
// Query & Scan
// ---------------------------------------------------------------------------

/// One page of `Query` or `Scan` results.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReadPageOutput {
    /// Matching items. Absent with `Select=COUNT`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<WireItem>,

    /// Number of items after filtering.
    #[serde(default)]
    pub count: i64,

    /// Number of items evaluated before filtering.
    #[serde(default)]
    pub scanned_count: i64,

    /// Where to resume; empty on the last page.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub last_evaluated_key: WireItem,

    /// The capacity units consumed by the operation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consumed_capacity: Option<ConsumedCapacity>,
}

/// Output for the `Query` operation.
pub type QueryOutput = ReadPageOutput;
/// Output for the `Scan` operation.
pub type ScanOutput = ReadPageOutput;
