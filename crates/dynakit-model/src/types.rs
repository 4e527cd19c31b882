//! Shared wire types.
//!
//! Structs use `#[serde(rename_all = "PascalCase")]` to match the store's API.
//! Enums are declared through [`wire_enum!`] which maps idiomatic Rust variant
//! names to the `SCREAMING_SNAKE_CASE` spelling used on the wire and provides
//! `as_str` plus `Display`.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::attribute_value::{AttributeValue, WireItem};

/// Declare a wire enum whose variants serialize to fixed strings.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $(
                $(#[$vmeta:meta])*
                $variant:ident => $wire:literal,
            )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            /// Returns the wire-format string representation.
            #[must_use]
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

pub(crate) use wire_enum;

/// Convert epoch seconds (possibly fractional) as returned by the store.
#[must_use]
pub fn epoch_to_datetime(seconds: f64) -> Option<DateTime<Utc>> {
    #[allow(clippy::cast_possible_truncation)]
    let whole = seconds.trunc() as i64;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let nanos = (seconds.fract().abs() * 1e9) as u32;
    DateTime::from_timestamp(whole, nanos)
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

wire_enum! {
    /// Role of an attribute in a key schema.
    pub enum KeyType {
        /// Partition key.
        Hash => "HASH",
        /// Sort key.
        Range => "RANGE",
    }
}

wire_enum! {
    /// Declared wire type of an attribute.
    ///
    /// Table keys only ever use `S`, `N` or `B`; the set types appear when a
    /// caller declares how a non-key attribute must be encoded.
    pub enum AttributeType {
        /// String.
        S => "S",
        /// Number.
        N => "N",
        /// Binary.
        B => "B",
        /// String set.
        Ss => "SS",
        /// Number set.
        Ns => "NS",
        /// Binary set.
        Bs => "BS",
    }
}

wire_enum! {
    /// Current status of a table.
    pub enum TableStatus {
        /// The table is being created.
        Creating => "CREATING",
        /// The table is ready for use.
        Active => "ACTIVE",
        /// The table is being deleted.
        Deleting => "DELETING",
        /// The table is being updated.
        Updating => "UPDATING",
    }
}

wire_enum! {
    /// Projection type for secondary indexes.
    #[derive(Default)]
    pub enum ProjectionType {
        /// All attributes are projected.
        #[default]
        All => "ALL",
        /// Only index and primary keys.
        KeysOnly => "KEYS_ONLY",
        /// Keys plus the listed non-key attributes.
        Include => "INCLUDE",
    }
}

wire_enum! {
    /// What a change stream captures when an item is modified.
    pub enum StreamViewType {
        /// Only the key attributes of the modified item.
        KeysOnly => "KEYS_ONLY",
        /// The item as it appears after modification.
        NewImage => "NEW_IMAGE",
        /// The item as it appeared before modification.
        OldImage => "OLD_IMAGE",
        /// Both images.
        NewAndOldImages => "NEW_AND_OLD_IMAGES",
    }
}

wire_enum! {
    /// Status of a secondary index.
    pub enum IndexStatus {
        /// The index is being created.
        Creating => "CREATING",
        /// The index is being updated.
        Updating => "UPDATING",
        /// The index is being deleted.
        Deleting => "DELETING",
        /// The index is ready.
        Active => "ACTIVE",
    }
}

wire_enum! {
    /// Which item image a write operation returns.
    #[derive(Default)]
    pub enum ReturnValue {
        /// Nothing is returned.
        #[default]
        None => "NONE",
        /// All attributes as they were before the operation.
        AllOld => "ALL_OLD",
        /// Only updated attributes as they were before the operation.
        UpdatedOld => "UPDATED_OLD",
        /// All attributes as they are after the operation.
        AllNew => "ALL_NEW",
        /// Only updated attributes as they are after the operation.
        UpdatedNew => "UPDATED_NEW",
    }
}

wire_enum! {
    /// Controls whether consumed capacity is reported.
    #[derive(Default)]
    pub enum ReturnConsumedCapacity {
        /// Report table and index consumption.
        #[serde(alias = "INDEXED")]
        Indexes => "INDEXES",
        /// Report the total only.
        Total => "TOTAL",
        /// Do not report.
        #[default]
        None => "NONE",
    }
}

impl ReturnConsumedCapacity {
    /// `TOTAL` when `consumed` is set, `NONE` otherwise.
    #[must_use]
    pub fn from_flag(consumed: bool) -> Self {
        if consumed { Self::Total } else { Self::None }
    }
}

wire_enum! {
    /// Controls whether item collection metrics are returned for writes.
    #[derive(Default)]
    pub enum ReturnItemCollectionMetrics {
        /// Return size estimates.
        Size => "SIZE",
        /// Do not return metrics.
        #[default]
        None => "NONE",
    }
}

wire_enum! {
    /// Attributes returned by `Query` and `Scan`.
    #[derive(Default)]
    pub enum Select {
        /// All attributes.
        #[default]
        AllAttributes => "ALL_ATTRIBUTES",
        /// All attributes projected into the queried index.
        AllProjectedAttributes => "ALL_PROJECTED_ATTRIBUTES",
        /// Only the attributes named in `AttributesToGet` or the projection.
        SpecificAttributes => "SPECIFIC_ATTRIBUTES",
        /// Only the number of matching items.
        Count => "COUNT",
    }
}

wire_enum! {
    /// Comparison operator for key conditions and filters.
    pub enum ComparisonOperator {
        /// Equal to.
        Eq => "EQ",
        /// Not equal to.
        Ne => "NE",
        /// Less than or equal to.
        Le => "LE",
        /// Less than.
        Lt => "LT",
        /// Greater than or equal to.
        Ge => "GE",
        /// Greater than.
        Gt => "GT",
        /// Value starts with the operand.
        BeginsWith => "BEGINS_WITH",
        /// Value lies between two operands, inclusive.
        Between => "BETWEEN",
        /// Attribute does not exist.
        Null => "NULL",
        /// Attribute exists.
        NotNull => "NOT_NULL",
        /// Value contains the operand.
        Contains => "CONTAINS",
        /// Value does not contain the operand.
        NotContains => "NOT_CONTAINS",
        /// Value is one of the operands.
        In => "IN",
    }
}

impl ComparisonOperator {
    /// Parse the wire spelling (case-insensitive).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let op = match name.to_ascii_uppercase().as_str() {
            "EQ" => Self::Eq,
            "NE" => Self::Ne,
            "LE" => Self::Le,
            "LT" => Self::Lt,
            "GE" => Self::Ge,
            "GT" => Self::Gt,
            "BEGINS_WITH" => Self::BeginsWith,
            "BETWEEN" => Self::Between,
            "NULL" => Self::Null,
            "NOT_NULL" => Self::NotNull,
            "CONTAINS" => Self::Contains,
            "NOT_CONTAINS" => Self::NotContains,
            "IN" => Self::In,
            _ => return None,
        };
        Some(op)
    }
}

// ---------------------------------------------------------------------------
// Structs - Key Schema & Attributes
// ---------------------------------------------------------------------------

/// An element of the key schema for a table or index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct KeySchemaElement {
    /// The name of the key attribute.
    pub attribute_name: String,
    /// `HASH` or `RANGE`.
    pub key_type: KeyType,
}

/// An attribute name with its declared type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AttributeDefinition {
    /// The name of the attribute.
    pub attribute_name: String,
    /// The declared type.
    pub attribute_type: AttributeType,
}

// ---------------------------------------------------------------------------
// Structs - Throughput
// ---------------------------------------------------------------------------

/// Provisioned throughput settings (input).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProvisionedThroughput {
    /// Read capacity units.
    pub read_capacity_units: i64,
    /// Write capacity units.
    pub write_capacity_units: i64,
}

/// Provisioned throughput description (output) with change timestamps.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProvisionedThroughputDescription {
    /// Read capacity units.
    pub read_capacity_units: i64,
    /// Write capacity units.
    pub write_capacity_units: i64,
    /// Number of decreases performed today.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_decreases_today: Option<i64>,
    /// Last increase, epoch seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_increase_date_time: Option<f64>,
    /// Last decrease, epoch seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_decrease_date_time: Option<f64>,
}

impl ProvisionedThroughputDescription {
    /// Time of the last capacity increase.
    #[must_use]
    pub fn last_increase_time(&self) -> Option<DateTime<Utc>> {
        self.last_increase_date_time.and_then(epoch_to_datetime)
    }

    /// Time of the last capacity decrease.
    #[must_use]
    pub fn last_decrease_time(&self) -> Option<DateTime<Utc>> {
        self.last_decrease_date_time.and_then(epoch_to_datetime)
    }
}

// ---------------------------------------------------------------------------
// Structs - Secondary Indexes
// ---------------------------------------------------------------------------

/// Projection settings for a secondary index.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Projection {
    /// Which attributes are projected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projection_type: Option<ProjectionType>,
    /// Non-key attributes projected with `INCLUDE`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub non_key_attributes: Vec<String>,
}

/// Local secondary index definition (input for `CreateTable`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LocalSecondaryIndex {
    /// Index name.
    pub index_name: String,
    /// Index key schema.
    pub key_schema: Vec<KeySchemaElement>,
    /// Projected attributes.
    pub projection: Projection,
}

/// Local secondary index description.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LocalSecondaryIndexDescription {
    /// Index name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index_name: Option<String>,
    /// Index key schema.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub key_schema: Vec<KeySchemaElement>,
    /// Projected attributes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projection: Option<Projection>,
    /// Index size in bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index_size_bytes: Option<i64>,
    /// Items in the index.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_count: Option<i64>,
}

/// Global secondary index description.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GlobalSecondaryIndexDescription {
    /// Index name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index_name: Option<String>,
    /// Index key schema.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub key_schema: Vec<KeySchemaElement>,
    /// Projected attributes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projection: Option<Projection>,
    /// Index status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index_status: Option<IndexStatus>,
    /// Index throughput.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provisioned_throughput: Option<ProvisionedThroughputDescription>,
    /// Index size in bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index_size_bytes: Option<i64>,
    /// Items in the index.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_count: Option<i64>,
}

// ---------------------------------------------------------------------------
// Structs - Streams & Table Description
// ---------------------------------------------------------------------------

/// Change-stream settings of a table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StreamSpecification {
    /// Whether the stream is enabled.
    pub stream_enabled: bool,
    /// What the stream captures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream_view_type: Option<StreamViewType>,
}

/// Description of a table, returned by the table lifecycle operations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TableDescription {
    /// Table name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,
    /// Table status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_status: Option<TableStatus>,
    /// Key schema.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub key_schema: Vec<KeySchemaElement>,
    /// Declared attributes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attribute_definitions: Vec<AttributeDefinition>,
    /// Creation time, epoch seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_date_time: Option<f64>,
    /// Number of items.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_count: Option<i64>,
    /// Table size in bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_size_bytes: Option<i64>,
    /// Table ARN.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_arn: Option<String>,
    /// Throughput settings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provisioned_throughput: Option<ProvisionedThroughputDescription>,
    /// Global secondary indexes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub global_secondary_indexes: Vec<GlobalSecondaryIndexDescription>,
    /// Local secondary indexes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub local_secondary_indexes: Vec<LocalSecondaryIndexDescription>,
    /// Stream settings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream_specification: Option<StreamSpecification>,
    /// ARN of the latest stream.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_stream_arn: Option<String>,
    /// Label of the latest stream.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_stream_label: Option<String>,
}

impl TableDescription {
    /// Table creation time.
    #[must_use]
    pub fn creation_time(&self) -> Option<DateTime<Utc>> {
        self.creation_date_time.and_then(epoch_to_datetime)
    }

    /// Look up the declared definition of an attribute.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&AttributeDefinition> {
        self.attribute_definitions
            .iter()
            .find(|a| a.attribute_name == name)
    }
}

// ---------------------------------------------------------------------------
// Structs - Consumed Capacity & Metrics
// ---------------------------------------------------------------------------

/// Capacity consumed by one table or index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Capacity {
    /// Read units.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_capacity_units: Option<f64>,
    /// Write units.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub write_capacity_units: Option<f64>,
    /// Total units.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity_units: Option<f64>,
}

/// Capacity consumed by an operation. Informational only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ConsumedCapacity {
    /// The table that was affected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,
    /// Total capacity units consumed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity_units: Option<f64>,
    /// Read units consumed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_capacity_units: Option<f64>,
    /// Write units consumed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub write_capacity_units: Option<f64>,
    /// Table share, reported with `INDEXES`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<Capacity>,
    /// Per local index share.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub local_secondary_indexes: HashMap<String, Capacity>,
    /// Per global index share.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub global_secondary_indexes: HashMap<String, Capacity>,
}

impl ConsumedCapacity {
    /// Total units, `0.0` when the store did not report them.
    #[must_use]
    pub fn units(&self) -> f64 {
        self.capacity_units.unwrap_or_default()
    }
}

/// Size estimate of an item collection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ItemCollectionMetrics {
    /// Partition key of the collection.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub item_collection_key: WireItem,
    /// Lower and upper bound of the collection size, in GB.
    #[serde(
        rename = "SizeEstimateRangeGB",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub size_estimate_range_gb: Vec<f64>,
}

// ---------------------------------------------------------------------------
// Structs - Conditions
// ---------------------------------------------------------------------------

/// A comparison used in `KeyConditions`, `QueryFilter` and `ScanFilter`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Condition {
    /// The comparison operator.
    pub comparison_operator: ComparisonOperator,
    /// Operands, omitted for `NULL` and `NOT_NULL`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attribute_value_list: Vec<AttributeValue>,
}
