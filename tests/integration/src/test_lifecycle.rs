//! Table lifecycle and table handles.

#[cfg(test)]
mod tests {
    use dynakit_core::{
        AttributeDefinition, CreateTableRequest, Error, StreamSetting, UpdateTableRequest, Value,
    };
    use dynakit_model::types::{ComparisonOperator, StreamViewType, TableStatus};
    use dynakit_model::{Operation, ServiceErrorCode};
    use serde_json::json;

    use crate::{FakeTransport, client};

    fn events_description() -> serde_json::Value {
        json!({
            "Table": {
                "TableName": "events",
                "TableStatus": "ACTIVE",
                "KeySchema": [
                    {"AttributeName": "user", "KeyType": "HASH"},
                    {"AttributeName": "ts", "KeyType": "RANGE"}
                ],
                "AttributeDefinitions": [
                    {"AttributeName": "user", "AttributeType": "S"},
                    {"AttributeName": "ts", "AttributeType": "N"}
                ],
                "ItemCount": 7
            }
        })
    }

    #[tokio::test]
    async fn test_should_list_tables_across_pages() {
        let transport = FakeTransport::new();
        transport
            .respond(json!({"TableNames": ["a", "b"], "LastEvaluatedTableName": "b"}))
            .respond(json!({"TableNames": ["c"]}));
        let client = client(&transport);

        let names = client.list_tables().await.unwrap();
        assert_eq!(names, ["a", "b", "c"]);

        let requests = transport.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[1].body, json!({"ExclusiveStartTableName": "b"}));
    }

    #[tokio::test]
    async fn test_should_map_missing_table_to_not_found() {
        let transport = FakeTransport::new();
        transport.fail(
            ServiceErrorCode::ResourceNotFoundException,
            "Requested resource not found",
        );
        let client = client(&transport);

        let err = client.table("ghost").await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "not found: ghost");
    }

    #[tokio::test]
    async fn test_should_bind_described_table_and_query_typed_range() {
        let transport = FakeTransport::new();
        transport
            .respond(events_description())
            .respond(json!({"Items": [], "Count": 0, "ScannedCount": 0}));
        let client = client(&transport);

        let events = client.table("events").await.unwrap();
        assert_eq!(events.name(), "events");
        assert!(events.has_range_key());
        assert_eq!(
            events.description().and_then(|d| d.table_status),
            Some(TableStatus::Active)
        );

        events
            .query("u1")
            .range(ComparisonOperator::Ge, vec![Value::from("10")])
            .exec(&client)
            .await
            .unwrap();

        let query = &transport.requests()[1];
        assert_eq!(query.operation, Operation::Query);
        assert_eq!(
            query.body["KeyConditions"],
            json!({
                "user": {"ComparisonOperator": "EQ", "AttributeValueList": [{"S": "u1"}]},
                "ts": {"ComparisonOperator": "GE", "AttributeValueList": [{"N": "10"}]}
            })
        );
    }

    #[tokio::test]
    async fn test_should_reject_three_key_table_before_submitting() {
        let transport = FakeTransport::new();
        let client = client(&transport);
        let request = CreateTableRequest::new(
            "bad",
            vec![
                AttributeDefinition::string("a"),
                AttributeDefinition::string("b"),
                AttributeDefinition::string("c"),
            ],
        );

        let err = client.create_table(&request).await.unwrap_err();
        assert!(matches!(err, Error::TooManyKeys(3)));
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn test_should_create_table_with_stream_and_return_handle() {
        let transport = FakeTransport::new();
        transport.respond(json!({
            "TableDescription": {"TableName": "events", "TableStatus": "CREATING"}
        }));
        let client = client(&transport);
        let request = CreateTableRequest::new(
            "events",
            vec![AttributeDefinition::string("user"), AttributeDefinition::number("ts")],
        )
        .throughput(5, 5)
        .stream(StreamSetting::Enabled(StreamViewType::NewAndOldImages));

        let handle = client.create_table_handle(&request).await.unwrap();
        assert_eq!(handle.range_key().map(|d| d.name.as_str()), Some("ts"));

        let body = &transport.requests()[0].body;
        assert_eq!(body["ProvisionedThroughput"]["ReadCapacityUnits"], 5);
        assert_eq!(
            body["StreamSpecification"],
            json!({"StreamEnabled": true, "StreamViewType": "NEW_AND_OLD_IMAGES"})
        );
        assert_eq!(body["KeySchema"][1], json!({"AttributeName": "ts", "KeyType": "RANGE"}));
    }

    #[tokio::test]
    async fn test_should_update_and_delete_table() {
        let transport = FakeTransport::new();
        transport
            .respond(json!({"TableDescription": {"TableName": "events", "TableStatus": "UPDATING"}}))
            .respond(json!({"TableDescription": {"TableName": "events", "TableStatus": "DELETING"}}));
        let client = client(&transport);

        let updated = client
            .update_table(&UpdateTableRequest::new("events").stream(StreamSetting::Disabled))
            .await
            .unwrap();
        assert_eq!(updated.table_status, Some(TableStatus::Updating));

        let deleted = client.delete_table("events").await.unwrap();
        assert_eq!(deleted.table_status, Some(TableStatus::Deleting));

        let requests = transport.requests();
        assert_eq!(
            requests[0].body,
            json!({"TableName": "events", "StreamSpecification": {"StreamEnabled": false}})
        );
        assert_eq!(requests[1].operation, Operation::DeleteTable);
    }
}
