//! F0101 Address Book Master: the customer dimension.

use super::{window_start, FixtureTable};
use crate::fake::{FakeData, UniqueInts};
use crate::julian;
use chrono::NaiveDate;
use rand::Rng;
use serde::Serialize;

pub const ID_MIN: i64 = 10_000;
pub const ID_MAX: i64 = 99_999;

/// Search type `C`: customer.
pub const TYPE_CODE: &str = "C";

/// Category code 01 values (region/segment).
pub const CATEGORY_CODES: &[&str] = &["100", "200", "300"];

/// `updated_on` falls within this many months before the as-of date.
pub const UPDATED_WINDOW_MONTHS: u32 = 24;

/// One address book row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddressBookRecord {
    /// ABAN8
    pub id: i64,
    /// ABALPH
    pub name: String,
    /// ABAT1
    pub type_code: &'static str,
    /// ABAC01
    pub category_code: &'static str,
    /// ABUPMJ, Julian
    pub updated_on: u32,
}

impl FixtureTable for AddressBookRecord {
    const TABLE: &'static str = "F0101";
    const GENERIC_COLUMNS: &'static [&'static str] =
        &["id", "name", "type_code", "category_code", "updated_on"];
    const JDE_COLUMNS: &'static [&'static str] = &["ABAN8", "ABALPH", "ABAT1", "ABAC01", "ABUPMJ"];

    fn fields(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.type_code.to_string(),
            self.category_code.to_string(),
            self.updated_on.to_string(),
        ]
    }
}

/// Generate `count` customers with unique address numbers.
///
/// Asking for more rows than there are address numbers is an error, checked
/// before anything is drawn.
pub fn generate_address_book<R: Rng>(
    fake: &mut FakeData<R>,
    count: usize,
    as_of: NaiveDate,
) -> anyhow::Result<Vec<AddressBookRecord>> {
    let mut ids = UniqueInts::new(ID_MIN, ID_MAX);
    ids.reserve("address numbers", count)?;
    let oldest = window_start(as_of, UPDATED_WINDOW_MONTHS)?;

    let mut rows = Vec::with_capacity(count);
    for _ in 0..count {
        let id = ids.draw(fake)?;
        let name = fake.company_name();
        let category_code = *fake
            .pick(CATEGORY_CODES)
            .ok_or_else(|| anyhow::anyhow!("no category codes configured"))?;
        let updated = fake.date_between(oldest, as_of);

        rows.push(AddressBookRecord {
            id,
            name,
            type_code: TYPE_CODE,
            category_code,
            updated_on: julian::encode(updated),
        });
    }

    Ok(rows)
}
