//! Multi-page reads shared by `Query` and `Scan`.
//!
//! A [`Pageable`] request is executed one page at a time. Each [`Page`] carries
//! the cursor to resume from; an absent cursor means the results are
//! exhausted. [`count_with_delay`] drives the page loop in count-only mode.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use dynakit_model::output::ReadPageOutput;
use dynakit_model::types::ConsumedCapacity;
use dynakit_model::{Operation, WireItem};

use crate::client::Client;
use crate::codec;
use crate::error::{CountError, Result};
use crate::value::Item;

/// Opaque marker to resume a read after the last evaluated key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageCursor(WireItem);

impl PageCursor {
    /// Wrap a wire key. Returns `None` for an empty key, which means "no more
    /// pages".
    #[must_use]
    pub fn from_key(key: WireItem) -> Option<Self> {
        if key.is_empty() { None } else { Some(Self(key)) }
    }

    /// The wire key.
    #[must_use]
    pub fn as_key(&self) -> &WireItem {
        &self.0
    }

    /// Unwrap into the wire key.
    #[must_use]
    pub fn into_key(self) -> WireItem {
        self.0
    }
}

/// One page of results.
#[derive(Debug, Clone, Default)]
pub struct Page {
    /// Decoded items. Empty in count-only mode.
    pub items: Vec<Item>,
    /// Where the next page starts; `None` on the last page.
    pub next_cursor: Option<PageCursor>,
    /// Items matched after filtering.
    pub count: i64,
    /// Items evaluated before filtering.
    pub scanned_count: i64,
    /// Capacity the page consumed, when reported.
    pub consumed_capacity: Option<ConsumedCapacity>,
}

impl Page {
    /// Decode a wire page.
    pub fn from_output(output: ReadPageOutput) -> Result<Self> {
        let items = output
            .items
            .iter()
            .map(codec::decode_item)
            .collect::<Result<_>>()?;
        Ok(Self {
            items,
            next_cursor: PageCursor::from_key(output.last_evaluated_key),
            count: output.count,
            scanned_count: output.scanned_count,
            consumed_capacity: output.consumed_capacity,
        })
    }

    /// Whether more pages follow.
    #[must_use]
    pub fn has_more(&self) -> bool {
        self.next_cursor.is_some()
    }

    /// Consumed units, `0.0` when not reported.
    #[must_use]
    pub fn consumed_units(&self) -> f64 {
        self.consumed_capacity
            .as_ref()
            .map_or(0.0, ConsumedCapacity::units)
    }
}

/// Totals of a count over all pages.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CountTotals {
    /// Sum of `Count`.
    pub count: i64,
    /// Sum of `ScannedCount`.
    pub scanned_count: i64,
    /// Sum of consumed capacity units.
    pub consumed_units: f64,
    /// Requests that succeeded.
    pub requests: usize,
}

impl CountTotals {
    fn add(&mut self, page: &Page) {
        self.count += page.count;
        self.scanned_count += page.scanned_count;
        self.consumed_units += page.consumed_units();
        self.requests += 1;
    }
}

/// A request that reads results page by page.
pub trait Pageable: Clone + Send + Sync {
    /// The operation submitted for each page.
    const OPERATION: Operation;

    /// The wire input.
    type Input: Serialize + Send + Sync;

    /// The table being read.
    fn table_name(&self) -> &str;

    /// Resume after `cursor`, or start from the beginning with `None`.
    fn set_start_cursor(&mut self, cursor: Option<PageCursor>);

    /// Ask for counts only. A projection cannot be combined with a count and
    /// is dropped.
    fn set_count_only(&mut self);

    /// Assemble the wire input.
    fn to_input(&self) -> Result<Self::Input>;
}

/// Read one page.
pub async fn fetch_page<P: Pageable>(client: &Client, request: &P) -> Result<Page> {
    let input = request.to_input()?;
    let output: ReadPageOutput = client.execute(P::OPERATION, &input).await?;
    let page = Page::from_output(output)?;
    debug!(
        operation = %P::OPERATION,
        table = request.table_name(),
        count = page.count,
        more = page.has_more(),
        "page read"
    );
    Ok(page)
}

/// Read every page and collect the items.
pub async fn fetch_all<P: Pageable>(client: &Client, request: &P) -> Result<Vec<Item>> {
    let mut request = request.clone();
    let mut items = Vec::new();
    loop {
        let page = fetch_page(client, &request).await?;
        items.extend(page.items);
        match page.next_cursor {
            Some(cursor) => request.set_start_cursor(Some(cursor)),
            None => return Ok(items),
        }
    }
}

/// Count matching items over all pages.
///
/// Works on a count-only copy of `request`. After every page that returns a
/// cursor the loop waits `delay` (when non-zero) before asking for the next
/// one, so N pages cost N requests and N-1 waits. A failure stops the loop and
/// returns the totals of the pages read so far. Dropping the future cancels
/// both the round trip and the wait.
pub async fn count_with_delay<P: Pageable>(
    client: &Client,
    request: &P,
    delay: Duration,
) -> Result<CountTotals, CountError> {
    let mut request = request.clone();
    request.set_count_only();
    let mut totals = CountTotals::default();

    loop {
        let page = match fetch_page(client, &request).await {
            Ok(page) => page,
            Err(source) => return Err(CountError { totals, source }),
        };
        totals.add(&page);

        let Some(cursor) = page.next_cursor else {
            break;
        };
        request.set_start_cursor(Some(cursor));
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    debug!(
        table = request.table_name(),
        count = totals.count,
        scanned = totals.scanned_count,
        requests = totals.requests,
        "count finished"
    );
    Ok(totals)
}
