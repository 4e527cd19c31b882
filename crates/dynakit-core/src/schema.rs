//! Attribute definitions and table key schemas.

use std::fmt;

use dynakit_model::WireItem;
use dynakit_model::types::{self, ComparisonOperator, KeySchemaElement, KeyType, TableDescription};

pub use dynakit_model::types::AttributeType;

use crate::codec;
use crate::condition::Condition;
use crate::error::{Error, Result};
use crate::value::Value;

/// An attribute name with the wire type its values must be encoded as.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttributeDefinition {
    /// The attribute name.
    pub name: String,
    /// The declared wire type.
    pub attr_type: AttributeType,
}

impl AttributeDefinition {
    /// Create a definition.
    pub fn new(name: impl Into<String>, attr_type: AttributeType) -> Self {
        Self {
            name: name.into(),
            attr_type,
        }
    }

    /// A string attribute.
    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, AttributeType::S)
    }

    /// A number attribute.
    pub fn number(name: impl Into<String>) -> Self {
        Self::new(name, AttributeType::N)
    }

    /// A binary attribute.
    pub fn binary(name: impl Into<String>) -> Self {
        Self::new(name, AttributeType::B)
    }

    /// Build a condition on this attribute, encoding the operands as the
    /// declared type.
    pub fn condition(&self, operator: ComparisonOperator, values: &[Value]) -> Result<Condition> {
        let condition =
            Condition::new(operator, codec::encode_attribute_values(self, values)?);
        condition.validate()?;
        Ok(condition)
    }

    /// Equality condition on this attribute.
    pub fn eq(&self, value: &Value) -> Result<Condition> {
        self.condition(ComparisonOperator::Eq, std::slice::from_ref(value))
    }

    /// Pair this definition with a value.
    pub fn key(&self, value: impl Into<Value>) -> KeyValue {
        KeyValue {
            definition: self.clone(),
            value: value.into(),
        }
    }
}

impl fmt::Display for AttributeDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.attr_type)
    }
}

impl From<&types::AttributeDefinition> for AttributeDefinition {
    fn from(def: &types::AttributeDefinition) -> Self {
        Self::new(def.attribute_name.clone(), def.attribute_type)
    }
}

impl From<&AttributeDefinition> for types::AttributeDefinition {
    fn from(def: &AttributeDefinition) -> Self {
        Self {
            attribute_name: def.name.clone(),
            attribute_type: def.attr_type,
        }
    }
}

/// A key attribute and the value it should be encoded from.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyValue {
    /// How to encode the value.
    pub definition: AttributeDefinition,
    /// The native value.
    pub value: Value,
}

impl KeyValue {
    /// Encode into a name and wire value.
    pub fn encode(&self) -> Result<(String, dynakit_model::AttributeValue)> {
        codec::encode_attribute(&self.definition, &self.value)
    }
}

/// The primary key of one item, encoded when a request is assembled.
///
/// A key built against a [`KeySchema`] remembers a missing or unexpected range
/// value and reports it from [`ItemKey::encode`]. Null or empty-string parts are
/// reported there too.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemKey {
    hash: KeyValue,
    range: Option<KeyValue>,
    problem: Option<String>,
}

impl ItemKey {
    /// A hash-only key.
    #[must_use]
    pub fn new(hash: KeyValue) -> Self {
        Self {
            hash,
            range: None,
            problem: None,
        }
    }

    /// Add the range part.
    #[must_use]
    pub fn with_range(mut self, range: KeyValue) -> Self {
        self.range = Some(range);
        self
    }

    /// The hash part.
    #[must_use]
    pub fn hash(&self) -> &KeyValue {
        &self.hash
    }

    /// The range part, if any.
    #[must_use]
    pub fn range(&self) -> Option<&KeyValue> {
        self.range.as_ref()
    }

    /// Encode into a wire key.
    pub fn encode(&self) -> Result<WireItem> {
        if let Some(problem) = &self.problem {
            return Err(Error::MissingKeyDefinition(problem.clone()));
        }
        let mut key = WireItem::with_capacity(2);
        for part in std::iter::once(&self.hash).chain(self.range.as_ref()) {
            if part.value.is_absent() {
                return Err(Error::MissingKeyDefinition(format!(
                    "key {} has no value",
                    part.definition.name
                )));
            }
            let (name, av) = part.encode()?;
            key.insert(name, av);
        }
        Ok(key)
    }
}

/// The key attributes of a table: one hash key and an optional range key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySchema {
    hash: AttributeDefinition,
    range: Option<AttributeDefinition>,
}

impl KeySchema {
    /// A hash-only schema.
    #[must_use]
    pub fn new(hash: AttributeDefinition) -> Self {
        Self { hash, range: None }
    }

    /// Add a range key.
    #[must_use]
    pub fn with_range(mut self, range: AttributeDefinition) -> Self {
        self.range = Some(range);
        self
    }

    /// Build from an ordered list of key definitions: hash first, then range.
    pub fn from_definitions(definitions: Vec<AttributeDefinition>) -> Result<Self> {
        let count = definitions.len();
        let mut iter = definitions.into_iter();
        match (iter.next(), iter.next(), count) {
            (None, _, _) => Err(Error::MissingKeyDefinition(
                "a table needs a hash key".to_owned(),
            )),
            (Some(hash), range, 1 | 2) => Ok(Self { hash, range }),
            _ => Err(Error::TooManyKeys(count)),
        }
    }

    /// Build from a table description.
    pub fn from_description(description: &TableDescription) -> Result<Self> {
        if description.key_schema.len() > 2 {
            return Err(Error::TooManyKeys(description.key_schema.len()));
        }
        let resolve = |element: &KeySchemaElement| {
            description
                .attribute(&element.attribute_name)
                .map(AttributeDefinition::from)
                .ok_or_else(|| {
                    Error::MissingKeyDefinition(format!(
                        "no attribute definition for key {}",
                        element.attribute_name
                    ))
                })
        };

        let mut hash = None;
        let mut range = None;
        for element in &description.key_schema {
            match element.key_type {
                KeyType::Hash => hash = Some(resolve(element)?),
                KeyType::Range => range = Some(resolve(element)?),
            }
        }
        let hash = hash.ok_or_else(|| {
            Error::MissingKeyDefinition(format!(
                "table {} has no hash key",
                description.table_name.as_deref().unwrap_or_default()
            ))
        })?;
        Ok(Self { hash, range })
    }

    /// The hash key.
    #[must_use]
    pub fn hash_key(&self) -> &AttributeDefinition {
        &self.hash
    }

    /// The range key, if any.
    #[must_use]
    pub fn range_key(&self) -> Option<&AttributeDefinition> {
        self.range.as_ref()
    }

    /// Whether the schema has a range key.
    #[must_use]
    pub fn has_range_key(&self) -> bool {
        self.range.is_some()
    }

    /// Number of key attributes (1 or 2).
    #[must_use]
    pub fn len(&self) -> usize {
        1 + usize::from(self.range.is_some())
    }

    /// Always `false`: a schema has at least a hash key.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Build an item key. A missing range value on a range table, or a range
    /// value on a hash-only table, is reported when the key is encoded.
    #[must_use]
    pub fn key(&self, hash: Value, range: Option<Value>) -> ItemKey {
        let mut key = ItemKey::new(self.hash.key(hash));
        match (&self.range, range) {
            (Some(def), Some(value)) => key.range = Some(def.key(value)),
            (Some(def), None) => {
                key.problem = Some(format!("range key {} requires a value", def.name));
            }
            (None, Some(_)) => {
                key.problem = Some(format!(
                    "range value given but the schema only has hash key {}",
                    self.hash.name
                ));
            }
            (None, None) => {}
        }
        key
    }

    /// Wire key schema elements.
    #[must_use]
    pub fn key_schema_elements(&self) -> Vec<KeySchemaElement> {
        let mut elements = vec![KeySchemaElement {
            attribute_name: self.hash.name.clone(),
            key_type: KeyType::Hash,
        }];
        if let Some(range) = &self.range {
            elements.push(KeySchemaElement {
                attribute_name: range.name.clone(),
                key_type: KeyType::Range,
            });
        }
        elements
    }

    /// Wire attribute definitions of the key attributes.
    #[must_use]
    pub fn attribute_definitions(&self) -> Vec<types::AttributeDefinition> {
        std::iter::once(&self.hash)
            .chain(self.range.as_ref())
            .map(types::AttributeDefinition::from)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use dynakit_model::AttributeValue;

    use super::*;

    fn description(json: &str) -> TableDescription {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_should_parse_hash_and_range_from_description() {
        let desc = description(
            r#"{
                "TableName": "events",
                "KeySchema": [
                    {"AttributeName": "ts", "KeyType": "RANGE"},
                    {"AttributeName": "user", "KeyType": "HASH"}
                ],
                "AttributeDefinitions": [
                    {"AttributeName": "user", "AttributeType": "S"},
                    {"AttributeName": "ts", "AttributeType": "N"}
                ]
            }"#,
        );
        let schema = KeySchema::from_description(&desc).unwrap();
        assert_eq!(schema.hash_key(), &AttributeDefinition::string("user"));
        assert_eq!(schema.range_key(), Some(&AttributeDefinition::number("ts")));
        assert_eq!(schema.len(), 2);
    }

    #[test]
    fn test_should_require_hash_key() {
        let desc = description(
            r#"{"TableName":"t","KeySchema":[{"AttributeName":"a","KeyType":"RANGE"}],
                "AttributeDefinitions":[{"AttributeName":"a","AttributeType":"S"}]}"#,
        );
        let err = KeySchema::from_description(&desc).unwrap_err();
        assert!(matches!(err, Error::MissingKeyDefinition(_)));
    }

    #[test]
    fn test_should_require_definition_for_key() {
        let desc = description(
            r#"{"TableName":"t","KeySchema":[{"AttributeName":"a","KeyType":"HASH"}]}"#,
        );
        assert!(matches!(
            KeySchema::from_description(&desc),
            Err(Error::MissingKeyDefinition(_))
        ));
    }

    #[test]
    fn test_should_reject_more_than_two_keys() {
        let defs = vec![
            AttributeDefinition::string("a"),
            AttributeDefinition::string("b"),
            AttributeDefinition::string("c"),
        ];
        assert!(matches!(
            KeySchema::from_definitions(defs),
            Err(Error::TooManyKeys(3))
        ));
        assert!(matches!(
            KeySchema::from_definitions(vec![]),
            Err(Error::MissingKeyDefinition(_))
        ));
    }

    #[test]
    fn test_should_encode_key_with_declared_types() {
        let schema = KeySchema::new(AttributeDefinition::string("user"))
            .with_range(AttributeDefinition::number("ts"));
        let key = schema
            .key(Value::from("u1"), Some(Value::from("17")))
            .encode()
            .unwrap();
        assert_eq!(key["user"], AttributeValue::S("u1".to_owned()));
        assert_eq!(key["ts"], AttributeValue::N("17".to_owned()));
    }

    #[test]
    fn test_should_defer_missing_range_error_to_encode() {
        let schema = KeySchema::new(AttributeDefinition::string("user"))
            .with_range(AttributeDefinition::number("ts"));
        let key = schema.key(Value::from("u1"), None);
        let err = key.encode().unwrap_err();
        assert_eq!(
            err.to_string(),
            "missing key definition: range key ts requires a value"
        );
    }

    #[test]
    fn test_should_reject_absent_key_values() {
        let schema = KeySchema::new(AttributeDefinition::string("id"))
            .with_range(AttributeDefinition::number("ts"));
        let both = schema.key(Value::from(""), Some(Value::Null));
        assert!(matches!(both.encode(), Err(Error::MissingKeyDefinition(_))));
        let range = schema.key(Value::from("u1"), Some(Value::Null));
        assert_eq!(
            range.encode().unwrap_err().to_string(),
            "missing key definition: key ts has no value"
        );
        let hash_only = KeySchema::new(AttributeDefinition::string("id"));
        assert!(matches!(
            hash_only.key(Value::Null, None).encode(),
            Err(Error::MissingKeyDefinition(_))
        ));
    }

    #[test]
    fn test_should_reject_range_value_on_hash_only_schema() {
        let schema = KeySchema::new(AttributeDefinition::string("user"));
        let key = schema.key(Value::from("u1"), Some(Value::from(1)));
        assert!(matches!(key.encode(), Err(Error::MissingKeyDefinition(_))));
    }

    #[test]
    fn test_should_emit_wire_schema() {
        let schema = KeySchema::new(AttributeDefinition::string("user"))
            .with_range(AttributeDefinition::number("ts"));
        let json = serde_json::to_value(schema.key_schema_elements()).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                {"AttributeName": "user", "KeyType": "HASH"},
                {"AttributeName": "ts", "KeyType": "RANGE"}
            ])
        );
        assert_eq!(schema.attribute_definitions().len(), 2);
    }

    #[test]
    fn test_should_build_condition_from_definition() {
        let def = AttributeDefinition::number("ts");
        let cond = def
            .condition(ComparisonOperator::Between, &[Value::from(1), Value::from("9")])
            .unwrap();
        assert_eq!(
            cond.operands(),
            &[AttributeValue::N("1".to_owned()), AttributeValue::N("9".to_owned())]
        );
        let eq = def.eq(&Value::from(5)).unwrap();
        assert_eq!(eq.operator(), ComparisonOperator::Eq);
    }

    #[test]
    fn test_should_reject_wrong_arity_from_definition() {
        let def = AttributeDefinition::number("ts");
        let err = def
            .condition(ComparisonOperator::Eq, &[Value::from(1), Value::from(2)])
            .unwrap_err();
        assert!(matches!(err, Error::InvalidConditionOperands(_)));
    }
}
