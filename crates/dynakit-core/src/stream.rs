//! Change-stream reads.

use tracing::debug;

use dynakit_model::Operation;
use dynakit_model::stream::{
    DescribeStreamInput, DescribeStreamOutput, GetRecordsInput, GetRecordsOutput,
    GetShardIteratorInput, GetShardIteratorOutput, ListStreamsInput, ListStreamsOutput,
    ShardIteratorType, StreamDescription, StreamRecord,
};

use crate::client::Client;
use crate::codec;
use crate::error::Result;
use crate::value::Item;

/// Parameters of a `ListStreams` call.
#[derive(Debug, Clone, Default)]
pub struct ListStreamsRequest {
    table_name: Option<String>,
    limit: Option<i32>,
    start_after: Option<String>,
}

impl ListStreamsRequest {
    /// List every stream.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Only streams of `table`.
    #[must_use]
    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table_name = Some(table.into());
        self
    }

    /// At most `limit` streams per page.
    #[must_use]
    pub fn limit(mut self, limit: i32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Continue after the stream `arn`.
    #[must_use]
    pub fn start_after(mut self, arn: impl Into<String>) -> Self {
        self.start_after = Some(arn.into());
        self
    }

    fn to_input(&self) -> ListStreamsInput {
        ListStreamsInput {
            table_name: self.table_name.clone(),
            limit: self.limit,
            exclusive_start_stream_arn: self.start_after.clone(),
        }
    }
}

/// Paging of the shard list returned by `DescribeStream`.
#[derive(Debug, Clone, Default)]
pub struct DescribeStreamOptions {
    /// At most this many shards.
    pub limit: Option<i32>,
    /// Continue after this shard.
    pub start_after_shard: Option<String>,
}

impl Client {
    /// One page of streams.
    pub async fn list_streams(&self, request: &ListStreamsRequest) -> Result<ListStreamsOutput> {
        let output: ListStreamsOutput = self
            .execute(Operation::ListStreams, &request.to_input())
            .await?;
        debug!(streams = output.streams.len(), "streams listed");
        Ok(output)
    }

    /// Describe a stream and (part of) its shards.
    pub async fn describe_stream(
        &self,
        stream_arn: &str,
        options: &DescribeStreamOptions,
    ) -> Result<StreamDescription> {
        let input = DescribeStreamInput {
            stream_arn: stream_arn.to_owned(),
            limit: options.limit,
            exclusive_start_shard_id: options.start_after_shard.clone(),
        };
        let output: DescribeStreamOutput = self
            .execute(Operation::DescribeStream, &input)
            .await
            .map_err(|e| e.not_found_as(stream_arn))?;
        Ok(output.stream_description)
    }

    /// Position an iterator in a shard. Returns `None` when a closed shard has
    /// nothing left to read.
    pub async fn get_shard_iterator(
        &self,
        stream_arn: &str,
        shard_id: &str,
        iterator_type: ShardIteratorType,
        sequence_number: Option<&str>,
    ) -> Result<Option<String>> {
        let input = GetShardIteratorInput {
            stream_arn: stream_arn.to_owned(),
            shard_id: shard_id.to_owned(),
            shard_iterator_type: iterator_type,
            sequence_number: sequence_number.map(str::to_owned),
        };
        let output: GetShardIteratorOutput = self
            .execute(Operation::GetShardIterator, &input)
            .await
            .map_err(|e| e.not_found_as(shard_id))?;
        Ok(output.shard_iterator)
    }

    /// Read records from an iterator.
    pub async fn get_records(&self, iterator: &str, limit: Option<i32>) -> Result<GetRecordsOutput> {
        let input = GetRecordsInput {
            shard_iterator: iterator.to_owned(),
            limit,
        };
        let output: GetRecordsOutput = self.execute(Operation::GetRecords, &input).await?;
        debug!(
            records = output.records.len(),
            more = output.next_shard_iterator.is_some(),
            "records read"
        );
        Ok(output)
    }
}

/// Native views of the item images carried by a stream record.
pub trait StreamRecordExt {
    /// Key attributes of the changed item.
    fn keys_item(&self) -> Result<Item>;
    /// Item after the change; empty when the stream does not capture it.
    fn new_image_item(&self) -> Result<Item>;
    /// Item before the change; empty when the stream does not capture it.
    fn old_image_item(&self) -> Result<Item>;
}

impl StreamRecordExt for StreamRecord {
    fn keys_item(&self) -> Result<Item> {
        codec::decode_item(&self.keys)
    }

    fn new_image_item(&self) -> Result<Item> {
        codec::decode_item(&self.new_image)
    }

    fn old_image_item(&self) -> Result<Item> {
        codec::decode_item(&self.old_image)
    }
}
