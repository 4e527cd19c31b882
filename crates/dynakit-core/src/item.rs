//! Single-item operations: get, put, update and delete.
//!
//! Builders hold native values; nothing is encoded until [`GetItemRequest::to_input`]
//! (or the equivalent on the other builders) assembles the wire input. `exec`
//! is the only step that performs I/O.
//!
//! Write options are [`ItemOption`] values applied in order to an
//! [`ItemOptions`] struct. Applying an option never fails, and a later option
//! replaces an earlier one for the same field.

use std::collections::HashMap;

use dynakit_model::input::{DeleteItemInput, GetItemInput, PutItemInput, UpdateItemInput};
use dynakit_model::output::{GetItemOutput, WriteItemOutput};
use dynakit_model::types::{
    ConsumedCapacity, ItemCollectionMetrics, ReturnConsumedCapacity, ReturnItemCollectionMetrics,
    ReturnValue,
};
use dynakit_model::{AttributeValue, Operation};
use tracing::debug;

use crate::client::Client;
use crate::codec;
use crate::error::Result;
use crate::schema::ItemKey;
use crate::value::Item;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// One write option.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemOption {
    /// Condition the write must satisfy.
    ConditionExpression(String),
    /// `#name` placeholders used in expressions.
    AttributeNames(HashMap<String, String>),
    /// `:value` placeholders used in expressions, as native values.
    AttributeValues(Item),
    /// Level of capacity reporting.
    ReturnConsumedCapacity(ReturnConsumedCapacity),
    /// Whether to report item collection metrics.
    ReturnItemCollectionMetrics(ReturnItemCollectionMetrics),
    /// Which item image to return.
    ReturnValues(ReturnValue),
}

/// Options shared by put, update and delete.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemOptions {
    /// Condition the write must satisfy.
    pub condition_expression: Option<String>,
    /// `#name` placeholders.
    pub attribute_names: HashMap<String, String>,
    /// `:value` placeholders.
    pub attribute_values: Item,
    /// Level of capacity reporting.
    pub return_consumed_capacity: Option<ReturnConsumedCapacity>,
    /// Whether to report item collection metrics.
    pub return_item_collection_metrics: Option<ReturnItemCollectionMetrics>,
    /// Which item image to return.
    pub return_values: Option<ReturnValue>,
}

impl ItemOptions {
    /// Apply one option, replacing any earlier value of the same field.
    pub fn apply(&mut self, option: ItemOption) {
        match option {
            ItemOption::ConditionExpression(expr) => self.condition_expression = Some(expr),
            ItemOption::AttributeNames(names) => self.attribute_names = names,
            ItemOption::AttributeValues(values) => self.attribute_values = values,
            ItemOption::ReturnConsumedCapacity(mode) => self.return_consumed_capacity = Some(mode),
            ItemOption::ReturnItemCollectionMetrics(mode) => {
                self.return_item_collection_metrics = Some(mode);
            }
            ItemOption::ReturnValues(mode) => self.return_values = Some(mode),
        }
    }

    fn encoded_values(&self) -> Result<HashMap<String, AttributeValue>> {
        codec::encode_expression_values(&self.attribute_values)
    }
}

impl FromIterator<ItemOption> for ItemOptions {
    fn from_iter<I: IntoIterator<Item = ItemOption>>(iter: I) -> Self {
        let mut options = Self::default();
        for option in iter {
            options.apply(option);
        }
        options
    }
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// Result of a get.
#[derive(Debug, Clone, Default)]
pub struct GetItemResult {
    /// The item; `None` when no item has the key.
    pub item: Option<Item>,
    /// Capacity consumed, when reported.
    pub consumed_capacity: Option<ConsumedCapacity>,
}

impl GetItemResult {
    fn from_output(output: GetItemOutput) -> Result<Self> {
        let item = match output.item {
            Some(item) if !item.is_empty() => Some(codec::decode_item(&item)?),
            _ => None,
        };
        Ok(Self {
            item,
            consumed_capacity: output.consumed_capacity,
        })
    }

    /// Consumed units, `0.0` when not reported.
    #[must_use]
    pub fn consumed_units(&self) -> f64 {
        self.consumed_capacity
            .as_ref()
            .map_or(0.0, ConsumedCapacity::units)
    }
}

/// Result of a put, update or delete.
#[derive(Debug, Clone, Default)]
pub struct WriteItemResult {
    /// The image requested with `ReturnValues`; `None` when none was returned.
    pub attributes: Option<Item>,
    /// Capacity consumed, when reported.
    pub consumed_capacity: Option<ConsumedCapacity>,
    /// Item collection metrics, when requested.
    pub item_collection_metrics: Option<ItemCollectionMetrics>,
}

impl WriteItemResult {
    fn from_output(output: WriteItemOutput) -> Result<Self> {
        let attributes = if output.attributes.is_empty() {
            None
        } else {
            Some(codec::decode_item(&output.attributes)?)
        };
        Ok(Self {
            attributes,
            consumed_capacity: output.consumed_capacity,
            item_collection_metrics: output.item_collection_metrics,
        })
    }

    /// Consumed units, `0.0` when not reported.
    #[must_use]
    pub fn consumed_units(&self) -> f64 {
        self.consumed_capacity
            .as_ref()
            .map_or(0.0, ConsumedCapacity::units)
    }
}

// ---------------------------------------------------------------------------
// Get
// ---------------------------------------------------------------------------

/// Reads one item by key.
#[derive(Debug, Clone)]
pub struct GetItemRequest {
    table: String,
    key: ItemKey,
    attributes_to_get: Vec<String>,
    projection_expression: Option<String>,
    attribute_names: HashMap<String, String>,
    consistent_read: Option<bool>,
    return_consumed_capacity: Option<ReturnConsumedCapacity>,
}

impl GetItemRequest {
    /// Read the item with `key` from `table`.
    pub fn new(table: impl Into<String>, key: ItemKey) -> Self {
        Self {
            table: table.into(),
            key,
            attributes_to_get: Vec::new(),
            projection_expression: None,
            attribute_names: HashMap::new(),
            consistent_read: None,
            return_consumed_capacity: None,
        }
    }

    /// Only return these attributes (legacy form).
    #[must_use]
    pub fn attributes_to_get<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attributes_to_get = names.into_iter().map(Into::into).collect();
        self
    }

    /// Only return the attributes named by the expression.
    #[must_use]
    pub fn projection_expression(mut self, expression: impl Into<String>) -> Self {
        self.projection_expression = Some(expression.into());
        self
    }

    /// `#name` placeholders used in the projection.
    #[must_use]
    pub fn attribute_names(mut self, names: HashMap<String, String>) -> Self {
        self.attribute_names = names;
        self
    }

    /// Use a strongly consistent read.
    #[must_use]
    pub fn consistent_read(mut self, consistent: bool) -> Self {
        self.consistent_read = Some(consistent);
        self
    }

    /// Level of capacity reporting.
    #[must_use]
    pub fn return_consumed_capacity(mut self, mode: ReturnConsumedCapacity) -> Self {
        self.return_consumed_capacity = Some(mode);
        self
    }

    /// Assemble the wire input.
    pub fn to_input(&self) -> Result<GetItemInput> {
        Ok(GetItemInput {
            table_name: self.table.clone(),
            key: self.key.encode()?,
            attributes_to_get: self.attributes_to_get.clone(),
            projection_expression: self.projection_expression.clone(),
            expression_attribute_names: self.attribute_names.clone(),
            consistent_read: self.consistent_read,
            return_consumed_capacity: self.return_consumed_capacity,
        })
    }

    /// Submit the request.
    pub async fn exec(&self, client: &Client) -> Result<GetItemResult> {
        let input = self.to_input()?;
        let output: GetItemOutput = client.execute(Operation::GetItem, &input).await?;
        let result = GetItemResult::from_output(output)?;
        debug!(table = %self.table, found = result.item.is_some(), "get item");
        Ok(result)
    }
}

// ---------------------------------------------------------------------------
// Put / Update / Delete
// ---------------------------------------------------------------------------

macro_rules! impl_item_options {
    ($ty:ty) => {
        impl $ty {
            /// Apply one option.
            #[must_use]
            pub fn option(mut self, option: ItemOption) -> Self {
                self.options.apply(option);
                self
            }

            /// Apply several options in order.
            #[must_use]
            pub fn options(mut self, options: impl IntoIterator<Item = ItemOption>) -> Self {
                for option in options {
                    self.options.apply(option);
                }
                self
            }

            /// The options applied so far.
            #[must_use]
            pub fn current_options(&self) -> &ItemOptions {
                &self.options
            }
        }
    };
}

/// Writes a whole item, replacing any existing one with the same key.
#[derive(Debug, Clone)]
pub struct PutItemRequest {
    table: String,
    item: Item,
    options: ItemOptions,
}

impl_item_options!(PutItemRequest);

impl PutItemRequest {
    /// Write `item` into `table`.
    pub fn new(table: impl Into<String>, item: Item) -> Self {
        Self {
            table: table.into(),
            item,
            options: ItemOptions::default(),
        }
    }

    /// Assemble the wire input. Absent attributes are left out of the item.
    pub fn to_input(&self) -> Result<PutItemInput> {
        Ok(PutItemInput {
            table_name: self.table.clone(),
            item: codec::encode_item(&self.item)?,
            condition_expression: self.options.condition_expression.clone(),
            expression_attribute_names: self.options.attribute_names.clone(),
            expression_attribute_values: self.options.encoded_values()?,
            return_values: self.options.return_values,
            return_consumed_capacity: self.options.return_consumed_capacity,
            return_item_collection_metrics: self.options.return_item_collection_metrics,
        })
    }

    /// Submit the request.
    pub async fn exec(&self, client: &Client) -> Result<WriteItemResult> {
        let input = self.to_input()?;
        debug!(table = %self.table, attributes = input.item.len(), "put item");
        let output: WriteItemOutput = client.execute(Operation::PutItem, &input).await?;
        WriteItemResult::from_output(output)
    }
}

/// Applies an update expression to one item.
#[derive(Debug, Clone)]
pub struct UpdateItemRequest {
    table: String,
    key: ItemKey,
    update_expression: Option<String>,
    options: ItemOptions,
}

impl_item_options!(UpdateItemRequest);

impl UpdateItemRequest {
    /// Update the item with `key` using `expression` (e.g. `SET #n = :v`).
    pub fn new(table: impl Into<String>, key: ItemKey, expression: impl Into<String>) -> Self {
        let expression = expression.into();
        Self {
            table: table.into(),
            key,
            update_expression: (!expression.is_empty()).then_some(expression),
            options: ItemOptions::default(),
        }
    }

    /// Assemble the wire input.
    pub fn to_input(&self) -> Result<UpdateItemInput> {
        Ok(UpdateItemInput {
            table_name: self.table.clone(),
            key: self.key.encode()?,
            update_expression: self.update_expression.clone(),
            condition_expression: self.options.condition_expression.clone(),
            expression_attribute_names: self.options.attribute_names.clone(),
            expression_attribute_values: self.options.encoded_values()?,
            return_values: self.options.return_values,
            return_consumed_capacity: self.options.return_consumed_capacity,
            return_item_collection_metrics: self.options.return_item_collection_metrics,
        })
    }

    /// Submit the request.
    pub async fn exec(&self, client: &Client) -> Result<WriteItemResult> {
        let input = self.to_input()?;
        debug!(table = %self.table, "update item");
        let output: WriteItemOutput = client.execute(Operation::UpdateItem, &input).await?;
        WriteItemResult::from_output(output)
    }
}

/// Deletes one item by key.
#[derive(Debug, Clone)]
pub struct DeleteItemRequest {
    table: String,
    key: ItemKey,
    options: ItemOptions,
}

impl_item_options!(DeleteItemRequest);

impl DeleteItemRequest {
    /// Delete the item with `key` from `table`.
    pub fn new(table: impl Into<String>, key: ItemKey) -> Self {
        Self {
            table: table.into(),
            key,
            options: ItemOptions::default(),
        }
    }

    /// Assemble the wire input.
    pub fn to_input(&self) -> Result<DeleteItemInput> {
        Ok(DeleteItemInput {
            table_name: self.table.clone(),
            key: self.key.encode()?,
            condition_expression: self.options.condition_expression.clone(),
            expression_attribute_names: self.options.attribute_names.clone(),
            expression_attribute_values: self.options.encoded_values()?,
            return_values: self.options.return_values,
            return_consumed_capacity: self.options.return_consumed_capacity,
            return_item_collection_metrics: self.options.return_item_collection_metrics,
        })
    }

    /// Submit the request.
    pub async fn exec(&self, client: &Client) -> Result<WriteItemResult> {
        let input = self.to_input()?;
        debug!(table = %self.table, "delete item");
        let output: WriteItemOutput = client.execute(Operation::DeleteItem, &input).await?;
        WriteItemResult::from_output(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::AttributeDefinition;
    use crate::value::Value;

    fn key() -> ItemKey {
        ItemKey::new(AttributeDefinition::string("id").key("u1"))
    }

    #[test]
    fn test_should_keep_last_option_value() {
        let request = DeleteItemRequest::new("users", key())
            .option(ItemOption::ConditionExpression("attribute_exists(id)".to_owned()))
            .option(ItemOption::ReturnValues(ReturnValue::AllOld))
            .option(ItemOption::ConditionExpression("attribute_not_exists(id)".to_owned()))
            .option(ItemOption::ReturnValues(ReturnValue::None));
        let input = request.to_input().unwrap();
        assert_eq!(
            input.condition_expression.as_deref(),
            Some("attribute_not_exists(id)")
        );
        assert_eq!(input.return_values, Some(ReturnValue::None));
    }

    #[test]
    fn test_should_replace_placeholder_maps_not_merge() {
        let options: ItemOptions = [
            ItemOption::AttributeNames(HashMap::from([("#a".to_owned(), "a".to_owned())])),
            ItemOption::AttributeNames(HashMap::from([("#b".to_owned(), "b".to_owned())])),
        ]
        .into_iter()
        .collect();
        assert_eq!(options.attribute_names.len(), 1);
        assert!(options.attribute_names.contains_key("#b"));
    }

    #[test]
    fn test_should_encode_expression_values() {
        let request = UpdateItemRequest::new("users", key(), "SET age = :age, nick = :nick")
            .options([ItemOption::AttributeValues(Item::from([
                (":age".to_owned(), Value::from(43)),
                (":nick".to_owned(), Value::Null),
            ]))]);
        let input = request.to_input().unwrap();
        assert_eq!(
            input.expression_attribute_values[":age"],
            AttributeValue::N("43".to_owned())
        );
        assert_eq!(
            input.expression_attribute_values[":nick"],
            AttributeValue::Null(true)
        );
        assert_eq!(
            input.update_expression.as_deref(),
            Some("SET age = :age, nick = :nick")
        );
    }

    #[test]
    fn test_should_omit_unset_options_from_put() {
        let item = Item::from([
            ("id".to_owned(), Value::from("u1")),
            ("bio".to_owned(), Value::from("")),
        ]);
        let json = serde_json::to_value(PutItemRequest::new("users", item).to_input().unwrap())
            .unwrap();
        assert_eq!(
            json,
            serde_json::json!({"TableName": "users", "Item": {"id": {"S": "u1"}}})
        );
    }

    #[test]
    fn test_should_assemble_get_with_legacy_projection() {
        let input = GetItemRequest::new("users", key())
            .attributes_to_get(["id", "age"])
            .consistent_read(true)
            .return_consumed_capacity(ReturnConsumedCapacity::from_flag(true))
            .to_input()
            .unwrap();
        let json = serde_json::to_value(&input).unwrap();
        assert_eq!(json["AttributesToGet"], serde_json::json!(["id", "age"]));
        assert_eq!(json["ConsistentRead"], true);
        assert_eq!(json["ReturnConsumedCapacity"], "TOTAL");
    }

    #[test]
    fn test_should_report_empty_get_as_not_found() {
        let output: GetItemOutput = serde_json::from_str(
            r#"{"Item":{},"ConsumedCapacity":{"TableName":"users","CapacityUnits":0.5}}"#,
        )
        .unwrap();
        let result = GetItemResult::from_output(output).unwrap();
        assert!(result.item.is_none());
        assert!((result.consumed_units() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_should_report_missing_previous_image_as_none() {
        let result = WriteItemResult::from_output(WriteItemOutput::default()).unwrap();
        assert!(result.attributes.is_none());
        assert!(result.consumed_units().abs() < f64::EPSILON);
    }
}
