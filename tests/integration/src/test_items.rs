//! Single-item operations end to end.

#[cfg(test)]
mod tests {
    use dynakit_core::{AttributeDefinition, Item, ItemOption, KeySchema, TableHandle, Value};
    use dynakit_model::Operation;
    use dynakit_model::types::{ReturnConsumedCapacity, ReturnValue};
    use serde_json::json;

    use crate::{FakeTransport, client};

    fn users() -> TableHandle {
        TableHandle::new("users", KeySchema::new(AttributeDefinition::string("id")))
    }

    #[tokio::test]
    async fn test_should_return_none_for_missing_item() {
        let transport = FakeTransport::new();
        transport.respond(json!({}));
        let client = client(&transport);

        let result = users().get_item("ghost", None).exec(&client).await.unwrap();
        assert!(result.item.is_none());

        let requests = transport.requests();
        assert_eq!(requests[0].operation, Operation::GetItem);
        assert_eq!(
            requests[0].body,
            json!({"TableName": "users", "Key": {"id": {"S": "ghost"}}})
        );
    }

    #[tokio::test]
    async fn test_should_decode_found_item() {
        let transport = FakeTransport::new();
        transport.respond(json!({
            "Item": {"id": {"S": "u1"}, "age": {"N": "42"}, "score": {"N": "1.5"}},
            "ConsumedCapacity": {"TableName": "users", "CapacityUnits": 0.5}
        }));
        let client = client(&transport);

        let result = users()
            .get_item("u1", None)
            .consistent_read(true)
            .return_consumed_capacity(ReturnConsumedCapacity::Total)
            .exec(&client)
            .await
            .unwrap();
        let item = result.item.clone().unwrap();
        assert_eq!(item["age"], Value::Int(42));
        assert_eq!(item["score"], Value::Float(1.5));
        assert!((result.consumed_units() - 0.5).abs() < f64::EPSILON);

        let body = &transport.requests()[0].body;
        assert_eq!(body["ConsistentRead"], true);
        assert_eq!(body["ReturnConsumedCapacity"], "TOTAL");
    }

    #[tokio::test]
    async fn test_should_send_update_with_last_wins_options() {
        let transport = FakeTransport::new();
        transport.respond(json!({"Attributes": {"id": {"S": "u1"}, "age": {"N": "43"}}}));
        let client = client(&transport);

        let result = users()
            .update_item("u1", None, "SET age = :age")
            .options([
                ItemOption::ReturnValues(ReturnValue::AllOld),
                ItemOption::AttributeValues(Item::from([(":age".to_owned(), Value::from(43))])),
                ItemOption::ReturnValues(ReturnValue::AllNew),
            ])
            .exec(&client)
            .await
            .unwrap();
        assert_eq!(result.attributes.unwrap()["age"], Value::Int(43));

        let body = &transport.requests()[0].body;
        assert_eq!(body["UpdateExpression"], "SET age = :age");
        assert_eq!(body["ReturnValues"], "ALL_NEW");
        assert_eq!(body["ExpressionAttributeValues"], json!({":age": {"N": "43"}}));
    }

    #[tokio::test]
    async fn test_should_not_submit_when_key_is_incomplete() {
        let transport = FakeTransport::new();
        let client = client(&transport);
        let events = TableHandle::new(
            "events",
            KeySchema::new(AttributeDefinition::string("user"))
                .with_range(AttributeDefinition::number("ts")),
        );

        let err = events.delete_item("u1", None).exec(&client).await.unwrap_err();
        assert!(matches!(err, dynakit_core::Error::MissingKeyDefinition(_)));
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn test_should_surface_conditional_failure() {
        let transport = FakeTransport::new();
        transport.fail(
            dynakit_model::ServiceErrorCode::ConditionalCheckFailedException,
            "The conditional request failed",
        );
        let client = client(&transport);

        let err = users()
            .put_item(Item::from([("id".to_owned(), Value::from("u1"))]))
            .option(ItemOption::ConditionExpression(
                "attribute_not_exists(id)".to_owned(),
            ))
            .exec(&client)
            .await
            .unwrap_err();
        match err {
            dynakit_core::Error::TransportFailure(e) => assert_eq!(
                e.service().map(|s| s.code.as_str()),
                Some("ConditionalCheckFailedException")
            ),
            other => panic!("unexpected error: {other}"),
        }
    }
}
