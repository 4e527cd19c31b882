//! Wire model types for dynakit.
//!
//! This crate describes the JSON request/response protocol of a DynamoDB-style
//! document store: the tagged `AttributeValue` union, every operation input and
//! output, the shared enums, change-stream shapes and the store's error
//! envelope. The protocol is plain JSON with `PascalCase` field names, so the
//! types are hand-written serde derives.
#![allow(clippy::doc_markdown)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::module_name_repetitions)]

pub mod attribute_value;
pub mod error;
pub mod input;
pub mod operations;
pub mod output;
pub mod stream;
pub mod types;

pub use attribute_value::{AttributeValue, WireItem};
pub use error::{ServiceError, ServiceErrorCode};
pub use operations::Operation;
