//! Evaluation context and clock injection

use bandwork_core::Record;
use chrono::{Local, NaiveDateTime};
use std::collections::BTreeMap;

static EMPTY_RECORD: Record = BTreeMap::new();

/// Source of the current time for `NOW()`, `TODAY()` and the date variables
pub trait Clock: Send + Sync {
    /// Current local date and time
    fn now(&self) -> NaiveDateTime;
}

/// Wall clock in the local time zone
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock frozen at one instant, for deterministic output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

static SYSTEM_CLOCK: SystemClock = SystemClock;

/// Everything a formula can see while it is evaluated
///
/// The row slices are read-only snapshots owned by the caller; the
/// pagination pass fills `page_detail_rows` before any page aggregate runs.
#[derive(Clone, Copy)]
pub struct EvaluationContext<'a> {
    /// Master record
    pub record: &'a Record,
    /// Current detail row, when evaluating inside a detail band
    pub detail_row: Option<&'a Record>,
    /// Every detail row of the dataset
    pub all_detail_rows: &'a [Record],
    /// Detail rows of the current page
    pub page_detail_rows: &'a [Record],
    /// 0-based index of the current detail row in the whole dataset
    pub row_index: usize,
    /// 1-based page number
    pub page_number: usize,
    pub total_pages: usize,
    pub clock: &'a dyn Clock,
}

impl<'a> EvaluationContext<'a> {
    /// Context with no data, page 1 of 1
    pub fn simple() -> EvaluationContext<'static> {
        EvaluationContext::new(&EMPTY_RECORD)
    }

    /// Context over a master record
    pub fn new(record: &'a Record) -> Self {
        Self {
            record,
            detail_row: None,
            all_detail_rows: &[],
            page_detail_rows: &[],
            row_index: 0,
            page_number: 1,
            total_pages: 1,
            clock: &SYSTEM_CLOCK,
        }
    }

    pub fn with_detail_row(mut self, row: &'a Record) -> Self {
        self.detail_row = Some(row);
        self
    }

    /// Set the full dataset and the current page's rows
    pub fn with_rows(mut self, all: &'a [Record], page: &'a [Record]) -> Self {
        self.all_detail_rows = all;
        self.page_detail_rows = page;
        self
    }

    /// Set the row index, page number and page count
    pub fn with_position(mut self, row_index: usize, page_number: usize, total_pages: usize) -> Self {
        self.row_index = row_index;
        self.page_number = page_number;
        self.total_pages = total_pages;
        self
    }

    pub fn with_clock(mut self, clock: &'a dyn Clock) -> Self {
        self.clock = clock;
        self
    }

    /// The same context positioned on another detail row
    ///
    /// Used by aggregates to evaluate their argument once per row.
    pub fn for_row(&self, row: &'a Record) -> Self {
        Self {
            detail_row: Some(row),
            ..*self
        }
    }

    /// Current time from the injected clock
    pub fn now(&self) -> NaiveDateTime {
        self.clock.now()
    }
}

impl std::fmt::Debug for EvaluationContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvaluationContext")
            .field("record", &self.record)
            .field("detail_row", &self.detail_row)
            .field("all_detail_rows", &self.all_detail_rows.len())
            .field("page_detail_rows", &self.page_detail_rows.len())
            .field("row_index", &self.row_index)
            .field("page_number", &self.page_number)
            .field("total_pages", &self.total_pages)
            .finish()
    }
}

impl Default for EvaluationContext<'static> {
    fn default() -> Self {
        EvaluationContext::simple()
    }
}
