//! Codec behavior observed through the client.

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use dynakit_core::{Value, codec};
    use serde_json::json;

    use crate::{FakeTransport, client};

    #[test]
    fn test_should_encode_native_item_to_wire_json() {
        let item: HashMap<String, Value> = HashMap::from([
            ("id".to_owned(), Value::from("u1")),
            ("age".to_owned(), Value::from(42)),
            ("tags".to_owned(), Value::from(vec!["a", "b"])),
        ]);
        let wire = codec::encode_item(&item).unwrap();
        assert_eq!(
            serde_json::to_value(&wire).unwrap(),
            json!({"id": {"S": "u1"}, "age": {"N": "42"}, "tags": {"L": [{"S": "a"}, {"S": "b"}]}})
        );
    }

    #[test]
    fn test_should_lose_float_type_of_whole_numbers() {
        let wire = codec::encode(&Value::from(3.0_f64)).unwrap();
        assert_eq!(serde_json::to_value(&wire).unwrap(), json!({"N": "3"}));
        assert_eq!(codec::decode(&wire).unwrap(), Value::Int(3));
    }

    #[tokio::test]
    async fn test_should_omit_absent_attributes_from_put() {
        let transport = FakeTransport::new();
        transport.respond(json!({}));
        let client = client(&transport);

        let item = HashMap::from([
            ("id".to_owned(), Value::from("u1")),
            ("nick".to_owned(), Value::from("")),
            ("deleted".to_owned(), Value::Null),
        ]);
        dynakit_core::PutItemRequest::new("users", item)
            .exec(&client)
            .await
            .unwrap();

        let requests = transport.requests();
        assert_eq!(requests[0].body["Item"], json!({"id": {"S": "u1"}}));
    }
}
