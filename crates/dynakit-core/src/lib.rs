//! Typed client for DynamoDB-style document stores.
//!
//! Native [`Value`]s are encoded to wire attribute values by the [`codec`],
//! using the declared key types of a [`KeySchema`] where one is known. Request
//! builders ([`GetItemRequest`], [`QueryRequest`], ...) assemble model inputs
//! without I/O; the [`Client`] submits them through a pluggable [`Transport`].
//! Multi-page reads resume from a [`PageCursor`], and counts over all pages
//! are summed by `count_with_delay`.
#![allow(clippy::doc_markdown)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod codec;
pub mod condition;
pub mod config;
pub mod error;
pub mod item;
pub mod pagination;
pub mod query;
pub mod scan;
pub mod schema;
pub mod stream;
pub mod table;
pub mod transport;
pub mod value;

pub use client::{Client, CreateTableRequest, StreamSetting, UpdateTableRequest};
pub use condition::Condition;
pub use config::ClientConfig;
pub use error::{CountError, Error, Result};
pub use item::{
    DeleteItemRequest, GetItemRequest, GetItemResult, ItemOption, ItemOptions, PutItemRequest,
    UpdateItemRequest, WriteItemResult,
};
pub use pagination::{CountTotals, Page, PageCursor, Pageable};
pub use query::QueryRequest;
pub use scan::ScanRequest;
pub use schema::{AttributeDefinition, AttributeType, ItemKey, KeySchema, KeyValue};
pub use stream::{DescribeStreamOptions, ListStreamsRequest, StreamRecordExt};
pub use table::TableHandle;
pub use transport::{Transport, TransportError};
pub use value::{Item, Number, Value};
