//! Data generator that produces the address book and sales order tables.
//!
//! Generates deterministic, FK-consistent data: one seeded RNG, consumed
//! entities first and sales orders second. Swapping the phases changes every
//! row after the first table.

pub mod address_book;
pub mod sales_order;

pub use address_book::{generate_address_book, AddressBookRecord};
pub use sales_order::{generate_sales_orders, price_line, LinePricing, SalesOrderRecord};

use crate::fake::FakeData;
use chrono::{Months, NaiveDate};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

/// Column naming used in the CSV header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderStyle {
    /// Descriptive field names (`id`, `name`, ...)
    #[default]
    Generic,
    /// Legacy JDE column names (`ABAN8`, `ABALPH`, ...)
    Jde,
}

impl std::str::FromStr for HeaderStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "generic" => Ok(HeaderStyle::Generic),
            "jde" => Ok(HeaderStyle::Jde),
            _ => Err(format!(
                "Unknown header style: {}. Valid options: generic, jde",
                s
            )),
        }
    }
}

impl std::fmt::Display for HeaderStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HeaderStyle::Generic => write!(f, "generic"),
            HeaderStyle::Jde => write!(f, "jde"),
        }
    }
}

/// A generated table that knows its file name and column headers.
///
/// Field order of the `Serialize` impl must match the column order.
pub trait FixtureTable: Serialize {
    /// JDE table id, also the file stem (`F0101`).
    const TABLE: &'static str;
    const GENERIC_COLUMNS: &'static [&'static str];
    const JDE_COLUMNS: &'static [&'static str];

    fn columns(style: HeaderStyle) -> &'static [&'static str] {
        match style {
            HeaderStyle::Generic => Self::GENERIC_COLUMNS,
            HeaderStyle::Jde => Self::JDE_COLUMNS,
        }
    }

    /// Field values in column order, as they appear in the CSV body.
    fn fields(&self) -> Vec<String>;

    fn file_name() -> String {
        format!("{}.csv", Self::TABLE)
    }
}

/// Both generated tables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    pub address_book: Vec<AddressBookRecord>,
    pub sales_orders: Vec<SalesOrderRecord>,
}

impl Dataset {
    pub fn customer_ids(&self) -> Vec<i64> {
        self.address_book.iter().map(|r| r.id).collect()
    }
}

/// Start of a trailing window of `months` ending at `as_of`.
pub(crate) fn window_start(as_of: NaiveDate, months: u32) -> anyhow::Result<NaiveDate> {
    as_of
        .checked_sub_months(Months::new(months))
        .ok_or_else(|| anyhow::anyhow!("cannot go back {} months from {}", months, as_of))
}

/// Main data generator
pub struct Generator {
    fake: FakeData<StdRng>,
    as_of: NaiveDate,
}

impl Generator {
    /// `as_of` is the "today" that both trailing date windows end on.
    pub fn new(seed: u64, as_of: NaiveDate) -> Self {
        Self {
            fake: FakeData::new(StdRng::seed_from_u64(seed)),
            as_of,
        }
    }

    /// Generate the address book, then sales orders referencing it.
    pub fn generate(&mut self, entities: usize, transactions: usize) -> anyhow::Result<Dataset> {
        let mut data = Dataset {
            address_book: generate_address_book(&mut self.fake, entities, self.as_of)?,
            sales_orders: Vec::new(),
        };
        let ids = data.customer_ids();
        data.sales_orders = generate_sales_orders(&mut self.fake, &ids, transactions, self.as_of)?;
        Ok(data)
    }
}
