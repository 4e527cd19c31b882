//! `Scan` requests.

use std::collections::HashMap;
use std::time::Duration;

use dynakit_model::Operation;
use dynakit_model::input::ScanInput;
use dynakit_model::types::{ReturnConsumedCapacity, Select};

use crate::client::Client;
use crate::codec;
use crate::condition::{Condition, ConditionMap};
use crate::error::{CountError, Result};
use crate::pagination::{self, CountTotals, Page, PageCursor, Pageable};
use crate::value::Item;

/// Reads every item of a table or index, optionally filtered.
#[derive(Debug, Clone)]
pub struct ScanRequest {
    table: String,
    index_name: Option<String>,
    scan_filter: HashMap<String, Condition>,
    filter_expression: Option<String>,
    projection_expression: Option<String>,
    attribute_names: HashMap<String, String>,
    attribute_values: Item,
    attributes_to_get: Vec<String>,
    limit: Option<i32>,
    start: Option<PageCursor>,
    segment: Option<(i32, i32)>,
    select: Option<Select>,
    consistent_read: Option<bool>,
    return_consumed_capacity: Option<ReturnConsumedCapacity>,
}

impl ScanRequest {
    /// Scan `table`.
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            index_name: None,
            scan_filter: HashMap::new(),
            filter_expression: None,
            projection_expression: None,
            attribute_names: HashMap::new(),
            attribute_values: Item::new(),
            attributes_to_get: Vec::new(),
            limit: None,
            start: None,
            segment: None,
            select: None,
            consistent_read: None,
            return_consumed_capacity: None,
        }
    }

    /// Scan a secondary index instead of the table.
    #[must_use]
    pub fn index(mut self, name: impl Into<String>) -> Self {
        self.index_name = Some(name.into());
        self
    }

    /// Add (or replace) the filter condition on `attribute`.
    #[must_use]
    pub fn with_filter(mut self, attribute: impl Into<String>, condition: Condition) -> Self {
        self.scan_filter.insert(attribute.into(), condition);
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

    /// Handle only `segment` out of `total` of a parallel scan.
    #[must_use]
    pub fn segment(mut self, segment: i32, total: i32) -> Self {
        self.segment = Some((segment, total));
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

impl Pageable for ScanRequest {
    const OPERATION: Operation = Operation::Scan;
    type Input = ScanInput;

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

    fn to_input(&self) -> Result<ScanInput> {
        let mut scan_filter = ConditionMap::with_capacity(self.scan_filter.len());
        for (name, condition) in &self.scan_filter {
            condition.validate()?;
            scan_filter.insert(name.clone(), condition.clone().into());
        }

        Ok(ScanInput {
            table_name: self.table.clone(),
            index_name: self.index_name.clone(),
            scan_filter,
            filter_expression: self.filter_expression.clone(),
            projection_expression: self.projection_expression.clone(),
            attributes_to_get: self.attributes_to_get.clone(),
            expression_attribute_names: self.attribute_names.clone(),
            expression_attribute_values: codec::encode_expression_values(&self.attribute_values)?,
            limit: self.limit,
            exclusive_start_key: self
                .start
                .as_ref()
                .map(|c| c.as_key().clone())
                .unwrap_or_default(),
            segment: self.segment.map(|(segment, _)| segment),
            total_segments: self.segment.map(|(_, total)| total),
            select: self.select,
            consistent_read: self.consistent_read,
            return_consumed_capacity: self.return_consumed_capacity,
        })
    }
}
