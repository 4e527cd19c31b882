//! Multi-page reads and counting.

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use dynakit_core::{AttributeDefinition, KeySchema, ScanRequest, TableHandle, Value};
    use dynakit_model::{Operation, ServiceErrorCode};
    use serde_json::json;
    use tokio::time::Instant;

    use crate::{FakeTransport, client};

    fn page(count: i64, last_key: Option<&str>) -> serde_json::Value {
        let mut body = json!({
            "Count": count,
            "ScannedCount": count + 2,
            "ConsumedCapacity": {"TableName": "events", "CapacityUnits": 0.5}
        });
        if let Some(key) = last_key {
            body["LastEvaluatedKey"] = json!({"id": {"S": key}});
        }
        body
    }

    #[tokio::test(start_paused = true)]
    async fn test_should_count_three_pages_with_two_waits() {
        let transport = FakeTransport::new();
        transport
            .respond(page(10, Some("k10")))
            .respond(page(10, Some("k20")))
            .respond(page(5, None));
        let client = client(&transport);
        let delay = Duration::from_millis(100);

        let started = Instant::now();
        let totals = ScanRequest::new("events")
            .count_with_delay(&client, delay)
            .await
            .unwrap();
        let waited = started.elapsed();

        assert_eq!(totals.count, 25);
        assert_eq!(totals.scanned_count, 31);
        assert_eq!(totals.requests, 3);
        assert!((totals.consumed_units - 1.5).abs() < f64::EPSILON);
        assert_eq!(transport.request_count(), 3);
        assert!(waited >= delay * 2, "waited {waited:?}");
        assert!(waited < delay * 3, "waited {waited:?}");

        let requests = transport.requests();
        assert!(requests.iter().all(|r| r.operation == Operation::Scan));
        assert!(requests.iter().all(|r| r.body["Select"] == "COUNT"));
        assert!(requests[0].body.get("ExclusiveStartKey").is_none());
        assert_eq!(requests[1].body["ExclusiveStartKey"], json!({"id": {"S": "k10"}}));
        assert_eq!(requests[2].body["ExclusiveStartKey"], json!({"id": {"S": "k20"}}));
    }

    #[tokio::test(start_paused = true)]
    async fn test_should_not_wait_after_single_page() {
        let transport = FakeTransport::new();
        transport.respond(page(4, None));
        let client = client(&transport);

        let started = Instant::now();
        let totals = ScanRequest::new("events")
            .count_with_delay(&client, Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(totals.count, 4);
        assert_eq!(totals.requests, 1);
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[tokio::test]
    async fn test_should_return_partial_totals_on_failure() {
        let transport = FakeTransport::new();
        transport
            .respond(page(10, Some("k10")))
            .fail(
                ServiceErrorCode::ProvisionedThroughputExceededException,
                "slow down",
            );
        let client = client(&transport);

        let err = ScanRequest::new("events")
            .count_with_delay(&client, Duration::ZERO)
            .await
            .unwrap_err();
        assert_eq!(err.totals.count, 10);
        assert_eq!(err.totals.requests, 1);
        assert!(matches!(
            err.source,
            dynakit_core::Error::TransportFailure(_)
        ));
    }

    #[tokio::test]
    async fn test_should_follow_cursors_when_reading_all_items() {
        let transport = FakeTransport::new();
        transport
            .respond(json!({
                "Items": [{"user": {"S": "u1"}, "ts": {"N": "1"}}],
                "Count": 1,
                "ScannedCount": 1,
                "LastEvaluatedKey": {"user": {"S": "u1"}, "ts": {"N": "1"}}
            }))
            .respond(json!({
                "Items": [{"user": {"S": "u1"}, "ts": {"N": "2"}}],
                "Count": 1,
                "ScannedCount": 1
            }));
        let client = client(&transport);
        let events = TableHandle::new(
            "events",
            KeySchema::new(AttributeDefinition::string("user"))
                .with_range(AttributeDefinition::number("ts")),
        );

        let items = events.query("u1").limit(1).exec_all(&client).await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1]["ts"], Value::Int(2));

        let requests = transport.requests();
        assert_eq!(requests[0].operation, Operation::Query);
        assert_eq!(
            requests[1].body["ExclusiveStartKey"],
            json!({"user": {"S": "u1"}, "ts": {"N": "1"}})
        );
        assert!(requests[1].body.get("Select").is_none());
    }

    #[tokio::test]
    async fn test_should_resume_single_page_from_cursor() {
        let transport = FakeTransport::new();
        transport
            .respond(json!({"Items": [], "Count": 0, "ScannedCount": 3, "LastEvaluatedKey": {"id": {"S": "k3"}}}))
            .respond(json!({"Items": [{"id": {"S": "k4"}}], "Count": 1, "ScannedCount": 1}));
        let client = client(&transport);

        let first = ScanRequest::new("events").limit(3).exec(&client).await.unwrap();
        assert!(first.items.is_empty());
        let cursor = first.next_cursor.unwrap();

        let second = ScanRequest::new("events")
            .limit(3)
            .start_from(cursor)
            .exec(&client)
            .await
            .unwrap();
        assert!(!second.has_more());
        assert_eq!(second.items[0]["id"], Value::from("k4"));
    }
}
