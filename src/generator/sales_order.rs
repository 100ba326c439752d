//! F4211 Sales Order Detail: the transactional fact table.

use super::{window_start, FixtureTable};
use crate::decimal::Scaled;
use crate::fake::{FakeData, UniqueInts};
use crate::julian;
use chrono::NaiveDate;
use rand::Rng;
use serde::Serialize;

pub const DOC_ID_MIN: i64 = 1;
pub const DOC_ID_MAX: i64 = 1_000_000;

/// Order type `SO`: sales order.
pub const DOC_TYPE: &str = "SO";

pub const QUANTITY_MIN: i64 = 1;
pub const QUANTITY_MAX: i64 = 100;

/// Unit price bounds, scaled: $10.00 to $500.00.
pub const UNIT_PRICE_MIN: i64 = 1_000;
pub const UNIT_PRICE_MAX: i64 = 50_000;

/// `order_date` falls within this many months before the as-of date.
pub const ORDER_WINDOW_MONTHS: u32 = 12;

/// One sales order line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SalesOrderRecord {
    /// SDDOCO
    pub doc_id: i64,
    /// SDDCTO
    pub doc_type: &'static str,
    /// SDAN8, references F0101.ABAN8
    pub entity_ref: i64,
    /// SDLITM, EAN-13
    pub item_code: String,
    /// SDTRDJ, Julian
    pub order_date: u32,
    /// SDUORG, two implied decimals
    pub quantity_scaled: i64,
    /// SDAEXP, two implied decimals
    pub extended_amount_scaled: i64,
}

impl FixtureTable for SalesOrderRecord {
    const TABLE: &'static str = "F4211";
    const GENERIC_COLUMNS: &'static [&'static str] = &[
        "doc_id",
        "doc_type",
        "entity_ref",
        "item_code",
        "order_date",
        "quantity_scaled",
        "extended_amount_scaled",
    ];
    const JDE_COLUMNS: &'static [&'static str] = &[
        "SDDOCO", "SDDCTO", "SDAN8", "SDLITM", "SDTRDJ", "SDUORG", "SDAEXP",
    ];

    fn fields(&self) -> Vec<String> {
        vec![
            self.doc_id.to_string(),
            self.doc_type.to_string(),
            self.entity_ref.to_string(),
            self.item_code.clone(),
            self.order_date.to_string(),
            self.quantity_scaled.to_string(),
            self.extended_amount_scaled.to_string(),
        ]
    }
}

/// Scaled quantity and extended amount for one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinePricing {
    pub quantity: Scaled,
    pub extended_amount: Scaled,
}

/// Price a line from a whole-unit quantity and a scaled unit price.
///
/// Both outputs carry two implied decimals. The extended amount multiplies the
/// scaled price by the *unscaled* quantity; multiplying the two scaled values
/// would carry four.
pub fn price_line(raw_quantity: i64, unit_price: Scaled) -> LinePricing {
    LinePricing {
        quantity: Scaled::from_units(raw_quantity),
        extended_amount: unit_price.times(raw_quantity),
    }
}

/// Generate `count` order lines, each referencing one of `customer_ids`.
///
/// Customers are sampled with replacement. An empty customer list with a
/// non-zero count fails immediately.
pub fn generate_sales_orders<R: Rng>(
    fake: &mut FakeData<R>,
    customer_ids: &[i64],
    count: usize,
    as_of: NaiveDate,
) -> anyhow::Result<Vec<SalesOrderRecord>> {
    if count == 0 {
        return Ok(Vec::new());
    }
    if customer_ids.is_empty() {
        anyhow::bail!(
            "cannot generate {} sales orders: address book has no customers to reference",
            count
        );
    }

    let mut doc_ids = UniqueInts::new(DOC_ID_MIN, DOC_ID_MAX);
    doc_ids.reserve("document numbers", count)?;
    let oldest = window_start(as_of, ORDER_WINDOW_MONTHS)?;

    let mut rows = Vec::with_capacity(count);
    for _ in 0..count {
        let order_date = fake.date_between(oldest, as_of);
        let units = fake.int_range(QUANTITY_MIN, QUANTITY_MAX);
        let unit_price = Scaled(fake.int_range(UNIT_PRICE_MIN, UNIT_PRICE_MAX));
        let pricing = price_line(units, unit_price);

        let doc_id = doc_ids.draw(fake)?;
        let entity_ref = *fake
            .pick(customer_ids)
            .ok_or_else(|| anyhow::anyhow!("customer pool is empty"))?;
        let item_code = fake.ean13();

        rows.push(SalesOrderRecord {
            doc_id,
            doc_type: DOC_TYPE,
            entity_ref,
            item_code,
            order_date: julian::encode(order_date),
            quantity_scaled: pricing.quantity.raw(),
            extended_amount_scaled: pricing.extended_amount.raw(),
        });
    }

    Ok(rows)
}
