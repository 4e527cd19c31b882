//! Change-stream wire types.
//!
//! Stream records are the one place where the store uses `camelCase` keys
//! (`eventID`, `awsRegion`, `dynamodb`); everything else is `PascalCase`.

use serde::{Deserialize, Serialize};

use crate::attribute_value::WireItem;
use crate::types::{KeySchemaElement, StreamViewType, epoch_to_datetime, wire_enum};

wire_enum! {
    /// Where a shard iterator starts reading.
    #[derive(Default)]
    pub enum ShardIteratorType {
        /// Oldest untrimmed record of the shard.
        #[default]
        TrimHorizon => "TRIM_HORIZON",
        /// Just after the most recent record.
        Latest => "LATEST",
        /// At the given sequence number.
        AtSequenceNumber => "AT_SEQUENCE_NUMBER",
        /// Right after the given sequence number.
        AfterSequenceNumber => "AFTER_SEQUENCE_NUMBER",
    }
}

impl ShardIteratorType {
    /// Whether the iterator type needs a sequence number.
    #[must_use]
    pub fn needs_sequence_number(self) -> bool {
        matches!(self, Self::AtSequenceNumber | Self::AfterSequenceNumber)
    }
}

wire_enum! {
    /// Lifecycle state of a stream.
    pub enum StreamStatus {
        /// Being enabled.
        Enabling => "ENABLING",
        /// Recording changes.
        Enabled => "ENABLED",
        /// Being disabled.
        Disabling => "DISABLING",
        /// No longer recording.
        Disabled => "DISABLED",
    }
}

wire_enum! {
    /// Kind of change captured by a record.
    pub enum EventName {
        /// A new item was added.
        Insert => "INSERT",
        /// An existing item was updated.
        Modify => "MODIFY",
        /// An item was deleted.
        Remove => "REMOVE",
    }
}

// ---------------------------------------------------------------------------
// Descriptions
// ---------------------------------------------------------------------------

/// Range of sequence numbers held by a shard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SequenceNumberRange {
    /// First sequence number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starting_sequence_number: Option<String>,
    /// Last sequence number, absent while the shard is open.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ending_sequence_number: Option<String>,
}

/// A shard of a stream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Shard {
    /// Shard identifier.
    pub shard_id: String,
    /// Parent shard, if this shard was split from another.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_shard_id: Option<String>,
    /// Sequence numbers held by the shard.
    #[serde(default)]
    pub sequence_number_range: SequenceNumberRange,
}

impl Shard {
    /// Whether the shard still receives records.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.sequence_number_range.ending_sequence_number.is_none()
    }
}

/// Summary entry returned by `ListStreams`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StreamSummary {
    /// Stream ARN.
    pub stream_arn: String,
    /// Table the stream belongs to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,
    /// Stream label (a timestamp).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream_label: Option<String>,
}

/// Full description of a stream.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StreamDescription {
    /// Stream ARN.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream_arn: Option<String>,
    /// Stream label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream_label: Option<String>,
    /// Stream status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream_status: Option<StreamStatus>,
    /// What the stream captures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream_view_type: Option<StreamViewType>,
    /// Table the stream belongs to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,
    /// Key schema of the table.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub key_schema: Vec<KeySchemaElement>,
    /// When the stream was requested, epoch seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_request_date_time: Option<f64>,
    /// Shards of this page.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub shards: Vec<Shard>,
    /// Where to resume listing shards.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_evaluated_shard_id: Option<String>,
}

impl StreamDescription {
    /// When the stream was requested.
    #[must_use]
    pub fn creation_request_time(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        self.creation_request_date_time.and_then(epoch_to_datetime)
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// Item-level change carried by a record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StreamRecord {
    /// Key attributes of the changed item.
    #[serde(default, skip_serializing_if = "WireItem::is_empty")]
    pub keys: WireItem,
    /// Item after the change.
    #[serde(default, skip_serializing_if = "WireItem::is_empty")]
    pub new_image: WireItem,
    /// Item before the change.
    #[serde(default, skip_serializing_if = "WireItem::is_empty")]
    pub old_image: WireItem,
    /// Position of the record in the shard.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequence_number: Option<String>,
    /// Size of the record in bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<i64>,
    /// What the stream captured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream_view_type: Option<StreamViewType>,
    /// Approximate time of the change, epoch seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approximate_creation_date_time: Option<f64>,
}

/// A change record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Record {
    /// Region of the table.
    #[serde(rename = "awsRegion", skip_serializing_if = "Option::is_none")]
    pub aws_region: Option<String>,
    /// Unique record identifier.
    #[serde(rename = "eventID", skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
    /// Kind of change.
    #[serde(rename = "eventName", skip_serializing_if = "Option::is_none")]
    pub event_name: Option<EventName>,
    /// Source service.
    #[serde(rename = "eventSource", skip_serializing_if = "Option::is_none")]
    pub event_source: Option<String>,
    /// Record format version.
    #[serde(rename = "eventVersion", skip_serializing_if = "Option::is_none")]
    pub event_version: Option<String>,
    /// The change itself.
    #[serde(rename = "dynamodb", default)]
    pub dynamodb: StreamRecord,
}

// ---------------------------------------------------------------------------
// Inputs & outputs
// ---------------------------------------------------------------------------

/// Input for the `ListStreams` operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListStreamsInput {
    /// Only list streams of this table.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,
    /// Maximum number of streams.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i32>,
    /// Stream where the previous page stopped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusive_start_stream_arn: Option<String>,
}

/// Output for the `ListStreams` operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListStreamsOutput {
    /// Streams of this page.
    #[serde(default)]
    pub streams: Vec<StreamSummary>,
    /// Where to resume; absent on the last page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_evaluated_stream_arn: Option<String>,
}

/// Input for the `DescribeStream` operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeStreamInput {
    /// Stream to describe.
    pub stream_arn: String,
    /// Maximum number of shards.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i32>,
    /// Shard where the previous page stopped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusive_start_shard_id: Option<String>,
}

/// Output for the `DescribeStream` operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeStreamOutput {
    /// The stream.
    #[serde(default)]
    pub stream_description: StreamDescription,
}

/// Input for the `GetShardIterator` operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetShardIteratorInput {
    /// Stream of the shard.
    pub stream_arn: String,
    /// Shard to read.
    pub shard_id: String,
    /// Starting position.
    pub shard_iterator_type: ShardIteratorType,
    /// Sequence number for the `*_SEQUENCE_NUMBER` positions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequence_number: Option<String>,
}

/// Output for the `GetShardIterator` operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetShardIteratorOutput {
    /// The iterator, absent when the shard is closed and fully read.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shard_iterator: Option<String>,
}

/// Input for the `GetRecords` operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetRecordsInput {
    /// Iterator to read from.
    pub shard_iterator: String,
    /// Maximum number of records.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i32>,
}

/// Output for the `GetRecords` operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetRecordsOutput {
    /// Records read.
    #[serde(default)]
    pub records: Vec<Record>,
    /// Iterator for the next read; absent once a closed shard is exhausted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_shard_iterator: Option<String>,
}
