//! Change-stream reads.

#[cfg(test)]
mod tests {
    use dynakit_core::{DescribeStreamOptions, ListStreamsRequest, StreamRecordExt, Value};
    use dynakit_model::stream::{EventName, ShardIteratorType};
    use dynakit_model::{Operation, ServiceErrorCode};
    use serde_json::json;

    use crate::{FakeTransport, client};

    const ARN: &str = "arn:aws:dynamodb:us-east-1:000000000000:table/events/stream/label";

    #[tokio::test]
    async fn test_should_walk_stream_from_listing_to_records() -> anyhow::Result<()> {
        let transport = FakeTransport::new();
        transport
            .respond(json!({"Streams": [{"StreamArn": ARN, "TableName": "events", "StreamLabel": "label"}]}))
            .respond(json!({
                "StreamDescription": {
                    "StreamArn": ARN,
                    "StreamStatus": "ENABLED",
                    "StreamViewType": "NEW_AND_OLD_IMAGES",
                    "Shards": [{
                        "ShardId": "shard-0001",
                        "SequenceNumberRange": {"StartingSequenceNumber": "100"}
                    }]
                }
            }))
            .respond(json!({"ShardIterator": "iter-1"}))
            .respond(json!({
                "Records": [{
                    "eventID": "e1",
                    "eventName": "INSERT",
                    "dynamodb": {
                        "Keys": {"user": {"S": "u1"}},
                        "NewImage": {"user": {"S": "u1"}, "ts": {"N": "7"}},
                        "SequenceNumber": "100"
                    }
                }],
                "NextShardIterator": "iter-2"
            }));
        let client = client(&transport);

        let listed = client
            .list_streams(&ListStreamsRequest::new().table("events"))
            .await?;
        assert_eq!(listed.streams[0].stream_arn, ARN);

        let description = client
            .describe_stream(ARN, &DescribeStreamOptions::default())
            .await?;
        let shard = &description.shards[0];
        assert!(shard.is_open());

        let iterator = client
            .get_shard_iterator(ARN, &shard.shard_id, ShardIteratorType::TrimHorizon, None)
            .await?
            .ok_or_else(|| anyhow::anyhow!("shard unexpectedly closed"))?;
        assert_eq!(iterator, "iter-1");

        let batch = client.get_records(&iterator, Some(100)).await?;
        assert_eq!(batch.next_shard_iterator.as_deref(), Some("iter-2"));
        let record = &batch.records[0];
        assert_eq!(record.event_name, Some(EventName::Insert));
        let image = record.dynamodb.new_image_item()?;
        assert_eq!(image["ts"], Value::Int(7));
        assert!(record.dynamodb.old_image_item()?.is_empty());

        let requests = transport.requests();
        let operations: Vec<Operation> = requests.iter().map(|r| r.operation).collect();
        assert_eq!(
            operations,
            [
                Operation::ListStreams,
                Operation::DescribeStream,
                Operation::GetShardIterator,
                Operation::GetRecords
            ]
        );
        assert_eq!(requests[2].body["ShardIteratorType"], "TRIM_HORIZON");
        assert_eq!(requests[3].body, json!({"ShardIterator": "iter-1", "Limit": 100}));
        Ok(())
    }

    #[tokio::test]
    async fn test_should_map_unknown_stream_to_not_found() {
        let transport = FakeTransport::new();
        transport.fail(ServiceErrorCode::ResourceNotFoundException, "no such stream");
        let client = client(&transport);

        let err = client
            .describe_stream(ARN, &DescribeStreamOptions::default())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_should_report_closed_shard_without_iterator() {
        let transport = FakeTransport::new();
        transport.respond(json!({}));
        let client = client(&transport);

        let iterator = client
            .get_shard_iterator(
                ARN,
                "shard-0000",
                ShardIteratorType::AfterSequenceNumber,
                Some("99"),
            )
            .await
            .unwrap();
        assert!(iterator.is_none());
        assert_eq!(transport.requests()[0].body["SequenceNumber"], "99");
    }
}
