//! Operation enum.

use std::fmt;

/// All operations the client can submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    // Table management
    /// Create a new table.
    CreateTable,
    /// Delete a table.
    DeleteTable,
    /// Describe a table.
    DescribeTable,
    /// Change throughput or stream settings of a table.
    UpdateTable,
    /// List table names.
    ListTables,

    // Item CRUD
    /// Put (insert or replace) an item.
    PutItem,
    /// Get an item by primary key.
    GetItem,
    /// Update an item.
    UpdateItem,
    /// Delete an item by primary key.
    DeleteItem,

    // Query & Scan
    /// Query items by key condition.
    Query,
    /// Scan all items in a table.
    Scan,

    // Streams
    /// List change streams.
    ListStreams,
    /// Describe a change stream and its shards.
    DescribeStream,
    /// Obtain an iterator into a shard.
    GetShardIterator,
    /// Read records from a shard iterator.
    GetRecords,
}

impl Operation {
    /// Every operation, in declaration order.
    pub const ALL: [Self; 15] = [
        Self::CreateTable,
        Self::DeleteTable,
        Self::DescribeTable,
        Self::UpdateTable,
        Self::ListTables,
        Self::PutItem,
        Self::GetItem,
        Self::UpdateItem,
        Self::DeleteItem,
        Self::Query,
        Self::Scan,
        Self::ListStreams,
        Self::DescribeStream,
        Self::GetShardIterator,
        Self::GetRecords,
    ];

    /// Returns the operation name string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreateTable => "CreateTable",
            Self::DeleteTable => "DeleteTable",
            Self::DescribeTable => "DescribeTable",
            Self::UpdateTable => "UpdateTable",
            Self::ListTables => "ListTables",
            Self::PutItem => "PutItem",
            Self::GetItem => "GetItem",
            Self::UpdateItem => "UpdateItem",
            Self::DeleteItem => "DeleteItem",
            Self::Query => "Query",
            Self::Scan => "Scan",
            Self::ListStreams => "ListStreams",
            Self::DescribeStream => "DescribeStream",
            Self::GetShardIterator => "GetShardIterator",
            Self::GetRecords => "GetRecords",
        }
    }

    /// Parse an operation name string.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.as_str() == name)
    }

    /// Whether the operation targets the streams endpoint.
    #[must_use]
    pub fn is_stream(&self) -> bool {
        matches!(
            self,
            Self::ListStreams | Self::DescribeStream | Self::GetShardIterator | Self::GetRecords
        )
    }

    /// The `X-Amz-Target` header value a transport sends for this operation.
    #[must_use]
    pub fn target(&self) -> String {
        let prefix = if self.is_stream() {
            "DynamoDBStreams_20120810"
        } else {
            "DynamoDB_20120810"
        };
        format!("{prefix}.{}", self.as_str())
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
