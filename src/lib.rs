//! Mock JD Edwards ERP fixtures.
//!
//! Generates deterministic, FK-consistent F0101 (address book) and F4211
//! (sales order detail) tables that carry the legacy encodings: Julian
//! `CYYDDD` dates and integers with implied decimals.
//!
//! # Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use jde_fixtures::{julian, Generator};
//!
//! let as_of = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
//! let data = Generator::new(42, as_of).generate(50, 200).unwrap();
//!
//! assert_eq!(data.address_book.len(), 50);
//! assert_eq!(julian::encode(NaiveDate::from_ymd_opt(2023, 1, 1).unwrap()), 123001);
//! ```

pub mod config;
pub mod decimal;
pub mod fake;
pub mod generator;
pub mod julian;
pub mod validate;
pub mod writer;

pub use config::GenerateConfig;
pub use decimal::Scaled;
pub use generator::{AddressBookRecord, Dataset, Generator, HeaderStyle, SalesOrderRecord};
pub use julian::JulianDate;
pub use writer::{write_dataset, WriteReport};
