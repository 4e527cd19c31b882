//! `Query` requests.

use std::collections::HashMap;
use std::time::Duration;

use dynakit_model::Operation;
use dynakit_model::input::QueryInput;
use dynakit_model::types::{ComparisonOperator, ReturnConsumedCapacity, Select};

use crate::client::Client;
use crate::codec;
use crate::condition::{Condition, ConditionMap};
use crate::error::{CountError, Error, Result};
use crate::pagination::{self, CountTotals, Page, PageCursor, Pageable};
use crate::schema::{AttributeDefinition, KeyValue};
use crate::value::{Item, Value};

/// A key condition kept in native form until the request is assembled.
#[derive(Debug, Clone, PartialEq)]
struct KeyCondition {
    definition: Option<AttributeDefinition>,
    operator: ComparisonOperator,
    values: Vec<Value>,
}

impl KeyCondition {
    fn encode(&self) -> Result<(String, Condition)> {
        let definition = self.definition.as_ref().ok_or_else(|| {
            Error::MissingKeyDefinition(format!(
                "{} range condition given but the table has no range key",
                self.operator
            ))
        })?;
        let condition = definition.condition(self.operator, &self.values)?;
        Ok((definition.name.clone(), condition))
    }
}

/// Reads items sharing a hash key, optionally narrowed by a range condition.
#[derive(Debug, Clone)]
pub struct QueryRequest {
    table: String,
    index_name: Option<String>,
    hash: Option<KeyCondition>,
    range_key: Option<AttributeDefinition>,
    range: Option<KeyCondition>,
    key_condition_expression: Option<String>,
    query_filter: HashMap<String, Condition>,
    filter_expression: Option<String>,
    projection_expression: Option<String>,
    attribute_names: HashMap<String, String>,
    attribute_values: Item,
    attributes_to_get: Vec<String>,
    limit: Option<i32>,
    start: Option<PageCursor>,
    select: Option<Select>,
    consistent_read: Option<bool>,
    scan_forward: Option<bool>,
    return_consumed_capacity: Option<ReturnConsumedCapacity>,
}

impl QueryRequest {
    fn empty(table: String) -> Self {
        Self {
            table,
            index_name: None,
            hash: None,
            range_key: None,
            range: None,
            key_condition_expression: None,
            query_filter: HashMap::new(),
            filter_expression: None,
            projection_expression: None,
            attribute_names: HashMap::new(),
            attribute_values: Item::new(),
            attributes_to_get: Vec::new(),
            limit: None,
            start: None,
            select: None,
            consistent_read: None,
            scan_forward: None,
            return_consumed_capacity: None,
        }
    }

    /// Query `table` for items whose hash key equals `hash`.
    pub fn new(table: impl Into<String>, hash: KeyValue) -> Self {
        let mut request = Self::empty(table.into());
        request.hash = Some(KeyCondition {
            definition: Some(hash.definition),
            operator: ComparisonOperator::Eq,
            values: vec![hash.value],
        });
        request
    }

    /// Query `table` with a key condition expression such as `id = :id`.
    pub fn with_key_expression(table: impl Into<String>, expression: impl Into<String>) -> Self {
        let mut request = Self::empty(table.into());
        request.key_condition_expression = Some(expression.into());
        request
    }

    /// Declare the range key, so [`QueryRequest::range`] knows how to encode.
    #[must_use]
    pub fn range_key(mut self, definition: AttributeDefinition) -> Self {
        self.range_key = Some(definition);
        self
    }

    /// Narrow by a condition on the declared range key.
    #[must_use]
    pub fn range(mut self, operator: ComparisonOperator, values: Vec<Value>) -> Self {
        self.range = Some(KeyCondition {
            definition: self.range_key.clone(),
            operator,
            values,
        });
        self
    }

    /// Narrow by a condition on an explicitly given range attribute.
    #[must_use]
    pub fn range_on(
        mut self,
        definition: AttributeDefinition,
        operator: ComparisonOperator,
        values: Vec<Value>,
    ) -> Self {
        self.range = Some(KeyCondition {
            definition: Some(definition),
            operator,
            values,
        });
        self
    }

    /// Query a secondary index instead of the table.
    #[must_use]
    pub fn index(mut self, name: impl Into<String>) -> Self {
        self.index_name = Some(name.into());
        self
    }

    /// Add (or replace) a legacy filter condition on `attribute`.
    #[must_use]
    pub fn filter(mut self, attribute: impl Into<String>, condition: Condition) -> Self {
        self.query_filter.insert(attribute.into(), condition);
        self
    }

    /// Filter with an expression.
    #[must_use]
    pub fn filter_expression(mut self, expression: impl Into<String>) -> Self {
        self.filter_expression = Some(expression.into());
        self
    }

    /// Only return the attributes named by the expression.
    #[must_use]
    pub fn projection_expression(mut self, expression: impl Into<String>) -> Self {
        self.projection_expression = Some(expression.into());
        self
    }

    /// `#name` placeholders.
    #[must_use]
    pub fn attribute_names(mut self, names: HashMap<String, String>) -> Self {
        self.attribute_names = names;
        self
    }

    /// `:value` placeholders.
    #[must_use]
    pub fn attribute_values(mut self, values: Item) -> Self {
        self.attribute_values = values;
        self
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

    /// Evaluate at most `limit` items per page.
    #[must_use]
    pub fn limit(mut self, limit: i32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Resume after a cursor returned by an earlier page.
    #[must_use]
    pub fn start_from(mut self, cursor: PageCursor) -> Self {
        self.start = Some(cursor);
        self
    }

    /// Which attributes to return.
    #[must_use]
    pub fn select(mut self, select: Select) -> Self {
        self.select = Some(select);
        self
    }

    /// Return counts only.
    #[must_use]
    pub fn count_only(self) -> Self {
        self.select(Select::Count)
    }

    /// Use strongly consistent reads.
    #[must_use]
    pub fn consistent_read(mut self, consistent: bool) -> Self {
        self.consistent_read = Some(consistent);
        self
    }

    /// Traverse the range key in ascending (`true`) or descending order.
    #[must_use]
    pub fn scan_forward(mut self, forward: bool) -> Self {
        self.scan_forward = Some(forward);
        self
    }

    /// Level of capacity reporting.
    #[must_use]
    pub fn return_consumed_capacity(mut self, mode: ReturnConsumedCapacity) -> Self {
        self.return_consumed_capacity = Some(mode);
        self
    }

    /// Read one page.
    pub async fn exec(&self, client: &Client) -> Result<Page> {
        pagination::fetch_page(client, self).await
    }

    /// Read every page and collect the items.
    pub async fn exec_all(&self, client: &Client) -> Result<Vec<Item>> {
        pagination::fetch_all(client, self).await
    }

    /// Count matching items over all pages, waiting `delay` between pages.
    pub async fn count_with_delay(
        &self,
        client: &Client,
        delay: Duration,
    ) -> Result<CountTotals, CountError> {
        pagination::count_with_delay(client, self, delay).await
    }

    /// Count matching items with the client's configured delay.
    pub async fn count(&self, client: &Client) -> Result<CountTotals, CountError> {
        self.count_with_delay(client, client.count_delay()).await
    }
}

fn encode_conditions<'a>(
    conditions: impl IntoIterator<Item = (&'a String, &'a Condition)>,
) -> Result<ConditionMap> {
    conditions
        .into_iter()
        .map(|(name, condition)| {
            condition.validate()?;
            Ok((name.clone(), condition.clone().into()))
        })
        .collect()
}

impl Pageable for QueryRequest {
    const OPERATION: Operation = Operation::Query;
    type Input = QueryInput;

    fn table_name(&self) -> &str {
        &self.table
    }

    fn set_start_cursor(&mut self, cursor: Option<PageCursor>) {
        self.start = cursor;
    }

    fn set_count_only(&mut self) {
        self.select = Some(Select::Count);
        self.attributes_to_get.clear();
        self.projection_expression = None;
    }

    fn to_input(&self) -> Result<QueryInput> {
        if self.hash.is_none() && self.key_condition_expression.is_none() {
            return Err(Error::MissingKeyDefinition(
                "a query needs a hash key condition or a key condition expression".to_owned(),
            ));
        }

        let mut key_conditions = ConditionMap::new();
        for key_condition in self.hash.iter().chain(self.range.iter()) {
            let (name, condition) = key_condition.encode()?;
            key_conditions.insert(name, condition.into());
        }

        Ok(QueryInput {
            table_name: self.table.clone(),
            index_name: self.index_name.clone(),
            key_conditions,
            key_condition_expression: self.key_condition_expression.clone(),
            query_filter: encode_conditions(&self.query_filter)?,
            filter_expression: self.filter_expression.clone(),
            projection_expression: self.projection_expression.clone(),
            attributes_to_get: self.attributes_to_get.clone(),
            expression_attribute_names: self.attribute_names.clone(),
            expression_attribute_values: codec::encode_expression_values(&self.attribute_values)?,
            scan_index_forward: self.scan_forward,
            limit: self.limit,
            exclusive_start_key: self
                .start
                .as_ref()
                .map(|c| c.as_key().clone())
                .unwrap_or_default(),
            select: self.select,
            consistent_read: self.consistent_read,
            return_consumed_capacity: self.return_consumed_capacity,
        })
    }
}
