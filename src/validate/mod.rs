//! Validate module for generated fixture files.
//!
//! Reads `F0101.csv` and `F4211.csv` back from an output directory and checks
//! the invariants the generator promises:
//! - header rows match one of the known header styles
//! - unique, in-range address and document numbers
//! - fixed and categorical codes
//! - Julian dates that resolve to real calendar days
//! - implicit-decimal quantities and extended amounts
//! - EAN-13 item codes
//! - FK referential integrity (every `entity_ref` is a known customer)

use crate::fake::is_valid_ean13;
use crate::generator::address_book::{CATEGORY_CODES, ID_MAX, ID_MIN, TYPE_CODE};
use crate::generator::sales_order::{
    DOC_ID_MAX, DOC_ID_MIN, DOC_TYPE, QUANTITY_MAX, QUANTITY_MIN, UNIT_PRICE_MAX, UNIT_PRICE_MIN,
};
use crate::generator::{AddressBookRecord, FixtureTable, HeaderStyle, SalesOrderRecord};
use crate::julian::JulianDate;
use ahash::{AHashMap, AHashSet};
use anyhow::Context;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Maximum number of issues to collect; counting continues past it
const MAX_ISSUES: usize = 1000;

/// Issue severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
            Severity::Warning => write!(f, "WARNING"),
            Severity::Info => write!(f, "INFO"),
        }
    }
}

/// Where in the fixture files an issue was found
#[derive(Debug, Clone, Serialize)]
pub struct Location {
    pub table: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<&'static str>,
}

/// A validation issue found in the fixture files
#[derive(Debug, Clone, Serialize)]
pub struct ValidationIssue {
    pub code: &'static str,
    pub severity: Severity,
    pub message: String,
    pub location: Location,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] table={}",
            self.severity, self.code, self.location.table
        )?;
        if let Some(line) = self.location.line {
            write!(f, " line={}", line)?;
        }
        if let Some(column) = self.location.column {
            write!(f, " column={}", column)?;
        }
        write!(f, ": {}", self.message)
    }
}

/// Validation options
#[derive(Debug, Clone)]
pub struct ValidateOptions {
    pub dir: PathBuf,
}

/// Validation summary with collected issues
#[derive(Debug, Serialize)]
pub struct ValidationSummary {
    pub dir: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header_style: Option<HeaderStyle>,
    pub issues: Vec<ValidationIssue>,
    pub summary: SummaryStats,
    pub checks: CheckResults,
}

#[derive(Debug, Serialize)]
pub struct SummaryStats {
    pub errors: usize,
    pub warnings: usize,
    pub info: usize,
    pub customers: usize,
    pub sales_orders: usize,
}

#[derive(Debug, Serialize)]
pub struct CheckResults {
    pub headers: CheckStatus,
    pub keys: CheckStatus,
    pub codes: CheckStatus,
    pub julian_dates: CheckStatus,
    pub implicit_decimals: CheckStatus,
    pub item_codes: CheckStatus,
    pub fk_integrity: CheckStatus,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Ok,
    Failed(usize),
}

impl CheckStatus {
    fn from_count(count: usize) -> Self {
        if count == 0 {
            CheckStatus::Ok
        } else {
            CheckStatus::Failed(count)
        }
    }
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckStatus::Ok => write!(f, "OK"),
            CheckStatus::Failed(n) => write!(f, "{} issues", n),
        }
    }
}

impl ValidationSummary {
    pub fn has_errors(&self) -> bool {
        self.summary.errors > 0
    }

    pub fn has_warnings(&self) -> bool {
        self.summary.warnings > 0
    }
}

/// Which check an issue code counts against
fn check_for(code: &str) -> &'static str {
    match code {
        "HEADER" => "headers",
        "DUPLICATE_KEY" | "KEY_RANGE" => "keys",
        "CODE_VALUE" => "codes",
        "JULIAN_DATE" => "julian_dates",
        "IMPLICIT_DECIMAL" => "implicit_decimals",
        "ITEM_CODE" => "item_codes",
        "FK_MISSING_PARENT" => "fk_integrity",
        _ => "parse",
    }
}

/// Fixture file validator
pub struct Validator {
    options: ValidateOptions,
    issues: Vec<ValidationIssue>,
    header_style: Option<HeaderStyle>,
    check_counts: AHashMap<&'static str, usize>,
    errors: usize,
    warnings: usize,
    info: usize,
    customer_ids: AHashSet<i64>,
    referenced: AHashSet<i64>,
    customers: usize,
    sales_orders: usize,
}

impl Validator {
    pub fn new(options: ValidateOptions) -> Self {
        Self {
            options,
            issues: Vec::new(),
            header_style: None,
            check_counts: AHashMap::new(),
            errors: 0,
            warnings: 0,
            info: 0,
            customer_ids: AHashSet::new(),
            referenced: AHashSet::new(),
            customers: 0,
            sales_orders: 0,
        }
    }

    fn add_issue(
        &mut self,
        severity: Severity,
        code: &'static str,
        location: Location,
        message: impl Into<String>,
    ) {
        match severity {
            Severity::Error => {
                self.errors += 1;
                *self.check_counts.entry(check_for(code)).or_insert(0) += 1;
            }
            Severity::Warning => self.warnings += 1,
            Severity::Info => self.info += 1,
        }

        if self.issues.len() < MAX_ISSUES {
            self.issues.push(ValidationIssue {
                code,
                severity,
                message: message.into(),
                location,
            });
        }
    }

    fn error(&mut self, code: &'static str, location: Location, message: impl Into<String>) {
        self.add_issue(Severity::Error, code, location, message);
    }

    pub fn validate(mut self) -> anyhow::Result<ValidationSummary> {
        let dir = self.options.dir.clone();
        self.scan_address_book(&dir)?;
        self.scan_sales_orders(&dir)?;

        let unreferenced = self.customer_ids.difference(&self.referenced).count();
        if unreferenced > 0 && self.sales_orders > 0 {
            self.add_issue(
                Severity::Info,
                "UNREFERENCED_CUSTOMER",
                Location {
                    table: AddressBookRecord::TABLE,
                    line: None,
                    column: None,
                },
                format!("{} customers have no sales orders", unreferenced),
            );
        }

        let count = |check: &str| self.check_counts.get(check).copied().unwrap_or(0);
        let checks = CheckResults {
            headers: CheckStatus::from_count(count("headers")),
            keys: CheckStatus::from_count(count("keys")),
            codes: CheckStatus::from_count(count("codes")),
            julian_dates: CheckStatus::from_count(count("julian_dates")),
            implicit_decimals: CheckStatus::from_count(count("implicit_decimals")),
            item_codes: CheckStatus::from_count(count("item_codes")),
            fk_integrity: CheckStatus::from_count(count("fk_integrity")),
        };

        Ok(ValidationSummary {
            dir,
            header_style: self.header_style,
            summary: SummaryStats {
                errors: self.errors,
                warnings: self.warnings,
                info: self.info,
                customers: self.customers,
                sales_orders: self.sales_orders,
            },
            issues: self.issues,
            checks,
        })
    }

    fn open<T: FixtureTable>(&mut self, dir: &Path) -> anyhow::Result<csv::Reader<std::fs::File>> {
        let path = dir.join(T::file_name());
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(&path)
            .with_context(|| format!("Cannot open fixture file: {}", path.display()))?;

        let headers = reader
            .headers()
            .with_context(|| format!("Cannot read header row: {}", path.display()))?
            .clone();
        let found: Vec<&str> = headers.iter().collect();
        let style = [HeaderStyle::Generic, HeaderStyle::Jde]
            .into_iter()
            .find(|s| T::columns(*s) == found.as_slice());

        let location = Location {
            table: T::TABLE,
            line: Some(1),
            column: None,
        };
        match (style, self.header_style) {
            (None, _) => self.error(
                "HEADER",
                location,
                format!(
                    "unrecognised header {:?}, expected {:?} or {:?}",
                    found,
                    T::GENERIC_COLUMNS,
                    T::JDE_COLUMNS
                ),
            ),
            (Some(s), Some(prev)) if s != prev => self.add_issue(
                Severity::Warning,
                "HEADER",
                location,
                format!("header style {} differs from {} used by the other table", s, prev),
            ),
            (Some(s), _) => self.header_style = Some(s),
        }

        Ok(reader)
    }

    /// Parse an integer field, reporting a PARSE issue when it is not one
    fn int_field(
        &mut self,
        table: &'static str,
        line: Option<u64>,
        column: &'static str,
        record: &csv::StringRecord,
        index: usize,
    ) -> Option<i64> {
        let raw = record.get(index).unwrap_or("");
        match raw.trim().parse::<i64>() {
            Ok(v) => Some(v),
            Err(_) => {
                self.error(
                    "PARSE",
                    Location {
                        table,
                        line,
                        column: Some(column),
                    },
                    format!("expected an integer, found {:?}", raw),
                );
                None
            }
        }
    }

    fn check_julian(&mut self, location: Location, value: i64) {
        let decoded = u32::try_from(value)
            .map_err(anyhow::Error::from)
            .and_then(crate::julian::decode)
            .and_then(|j: JulianDate| j.to_date());
        if let Err(e) = decoded {
            self.error("JULIAN_DATE", location, format!("{}: {}", value, e));
        }
    }

    fn scan_address_book(&mut self, dir: &Path) -> anyhow::Result<()> {
        const T: &str = AddressBookRecord::TABLE;
        let mut reader = self.open::<AddressBookRecord>(dir)?;

        for result in reader.records() {
            let record = result.with_context(|| format!("Cannot read {} row", T))?;
            let line = record.position().map(|p| p.line());
            let at = |column| Location {
                table: T,
                line,
                column: Some(column),
            };
            self.customers += 1;

            if let Some(id) = self.int_field(T, line, "id", &record, 0) {
                if !(ID_MIN..=ID_MAX).contains(&id) {
                    self.error(
                        "KEY_RANGE",
                        at("id"),
                        format!("address number {} outside {}..={}", id, ID_MIN, ID_MAX),
                    );
                }
                if !self.customer_ids.insert(id) {
                    self.error(
                        "DUPLICATE_KEY",
                        at("id"),
                        format!("address number {} repeated", id),
                    );
                }
            }

            let type_code = record.get(2).unwrap_or("");
            if type_code != TYPE_CODE {
                self.error(
                    "CODE_VALUE",
                    at("type_code"),
                    format!("search type {:?}, expected {:?}", type_code, TYPE_CODE),
                );
            }
            let category = record.get(3).unwrap_or("");
            if !CATEGORY_CODES.contains(&category) {
                self.error(
                    "CODE_VALUE",
                    at("category_code"),
                    format!("category code {:?} not in {:?}", category, CATEGORY_CODES),
                );
            }

            if let Some(updated) = self.int_field(T, line, "updated_on", &record, 4) {
                self.check_julian(at("updated_on"), updated);
            }
        }

        Ok(())
    }

    fn scan_sales_orders(&mut self, dir: &Path) -> anyhow::Result<()> {
        const T: &str = SalesOrderRecord::TABLE;
        let mut reader = self.open::<SalesOrderRecord>(dir)?;
        let mut doc_ids = AHashSet::new();

        for result in reader.records() {
            let record = result.with_context(|| format!("Cannot read {} row", T))?;
            let line = record.position().map(|p| p.line());
            let at = |column| Location {
                table: T,
                line,
                column: Some(column),
            };
            self.sales_orders += 1;

            if let Some(doc_id) = self.int_field(T, line, "doc_id", &record, 0) {
                if !(DOC_ID_MIN..=DOC_ID_MAX).contains(&doc_id) {
                    self.error(
                        "KEY_RANGE",
                        at("doc_id"),
                        format!(
                            "document number {} outside {}..={}",
                            doc_id,
                            DOC_ID_MIN,
                            DOC_ID_MAX,
                        ),
                    );
                }
                if !doc_ids.insert(doc_id) {
                    self.error(
                        "DUPLICATE_KEY",
                        at("doc_id"),
                        format!("document number {} repeated", doc_id),
                    );
                }
            }

            let doc_type = record.get(1).unwrap_or("");
            if doc_type != DOC_TYPE {
                self.error(
                    "CODE_VALUE",
                    at("doc_type"),
                    format!("order type {:?}, expected {:?}", doc_type, DOC_TYPE),
                );
            }

            if let Some(entity_ref) = self.int_field(T, line, "entity_ref", &record, 2) {
                self.referenced.insert(entity_ref);
                if !self.customer_ids.contains(&entity_ref) {
                    self.error(
                        "FK_MISSING_PARENT",
                        at("entity_ref"),
                        format!(
                            "address number {} not found in {}",
                            entity_ref,
                            AddressBookRecord::TABLE,
                        ),
                    );
                }
            }

            let item_code = record.get(3).unwrap_or("");
            if !is_valid_ean13(item_code) {
                self.error(
                    "ITEM_CODE",
                    at("item_code"),
                    format!("{:?} is not a valid EAN-13", item_code),
                );
            }

            if let Some(order_date) = self.int_field(T, line, "order_date", &record, 4) {
                self.check_julian(at("order_date"), order_date);
            }

            let quantity = self.int_field(T, line, "quantity_scaled", &record, 5);
            let amount = self.int_field(T, line, "extended_amount_scaled", &record, 6);
            if let (Some(quantity), Some(amount)) = (quantity, amount) {
                self.check_pricing(
                    at("quantity_scaled"),
                    at("extended_amount_scaled"),
                    quantity,
                    amount,
                );
            }
        }

        Ok(())
    }

    fn check_pricing(&mut self, qty_at: Location, amount_at: Location, quantity: i64, amount: i64) {
        let units = quantity / 100;
        if quantity % 100 != 0 || !(QUANTITY_MIN..=QUANTITY_MAX).contains(&units) {
            self.error(
                "IMPLICIT_DECIMAL",
                qty_at,
                format!(
                    "quantity {} is not a whole unit count {}..={} scaled by 100",
                    quantity, QUANTITY_MIN, QUANTITY_MAX
                ),
            );
            return;
        }
        if amount % units != 0 {
            self.error(
                "IMPLICIT_DECIMAL",
                amount_at,
                format!("extended amount {} is not a multiple of {} units", amount, units),
            );
            return;
        }
        let unit_price = amount / units;
        if !(UNIT_PRICE_MIN..=UNIT_PRICE_MAX).contains(&unit_price) {
            self.error(
                "IMPLICIT_DECIMAL",
                amount_at,
                format!(
                    "implied unit price {} outside {}..={} (scaled twice?)",
                    unit_price, UNIT_PRICE_MIN, UNIT_PRICE_MAX
                ),
            );
        }
    }
}

/// Validate the fixture files in `options.dir`.
pub fn run(options: ValidateOptions) -> anyhow::Result<ValidationSummary> {
    Validator::new(options).validate()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::Generator;
    use crate::writer::write_dataset;
    use chrono::NaiveDate;
    use std::fs;
    use tempfile::TempDir;

    fn write_fixtures(style: HeaderStyle) -> TempDir {
        let dir = TempDir::new().unwrap();
        let as_of = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let data = Generator::new(42, as_of).generate(20, 100).unwrap();
        write_dataset(dir.path(), &data, style).unwrap();
        dir
    }

    fn validate(dir: &Path) -> ValidationSummary {
        run(ValidateOptions {
            dir: dir.to_path_buf(),
        })
        .unwrap()
    }

    #[test]
    fn test_generated_fixtures_pass() {
        for style in [HeaderStyle::Generic, HeaderStyle::Jde] {
            let dir = write_fixtures(style);
            let summary = validate(dir.path());
            assert!(!summary.has_errors(), "{:?}", summary.issues);
            assert_eq!(summary.header_style, Some(style));
            assert_eq!(summary.summary.customers, 20);
            assert_eq!(summary.summary.sales_orders, 100);
            assert!(matches!(summary.checks.fk_integrity, CheckStatus::Ok));
        }
    }

    #[test]
    fn test_detects_dangling_reference() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("F0101.csv"),
            "id,name,type_code,category_code,updated_on\n10001,Acme,C,100,124001\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("F4211.csv"),
            "doc_id,doc_type,entity_ref,item_code,order_date,quantity_scaled,extended_amount_scaled\n\
             1,SO,10001,4006381333931,124010,1000,10500\n\
             2,SO,55555,4006381333931,124010,1000,10500\n",
        )
        .unwrap();

        let summary = validate(dir.path());
        assert!(matches!(summary.checks.fk_integrity, CheckStatus::Failed(1)));
        let issue = summary
            .issues
            .iter()
            .find(|i| i.code == "FK_MISSING_PARENT")
            .unwrap();
        assert_eq!(issue.location.line, Some(3));
    }

    #[test]
    fn test_detects_double_scaling() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("F0101.csv"),
            "id,name,type_code,category_code,updated_on\n10001,Acme,C,100,124001\n",
        )
        .unwrap();
        // 1000 * 1050: both sides scaled
        fs::write(
            dir.path().join("F4211.csv"),
            "doc_id,doc_type,entity_ref,item_code,order_date,quantity_scaled,extended_amount_scaled\n\
             1,SO,10001,4006381333931,124010,1000,1050000\n",
        )
        .unwrap();

        let summary = validate(dir.path());
        assert!(matches!(summary.checks.implicit_decimals, CheckStatus::Failed(1)));
    }

    #[test]
    fn test_detects_bad_values() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("F0101.csv"),
            "id,name,type_code,category_code,updated_on\n\
             10001,Acme,C,100,123366\n\
             10001,Acme,X,400,124001\n\
             5,Tiny,C,200,abc\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("F4211.csv"),
            "doc_id,doc_type,entity_ref,item_code,order_date,quantity_scaled,extended_amount_scaled\n\
             1,SO,10001,4006381333932,124010,1050,10500\n",
        )
        .unwrap();

        let summary = validate(dir.path());
        assert!(matches!(summary.checks.julian_dates, CheckStatus::Failed(1)));
        assert!(matches!(summary.checks.keys, CheckStatus::Failed(2)));
        assert!(matches!(summary.checks.codes, CheckStatus::Failed(2)));
        assert!(matches!(summary.checks.item_codes, CheckStatus::Failed(1)));
        assert!(matches!(summary.checks.implicit_decimals, CheckStatus::Failed(1)));
        assert!(summary.issues.iter().any(|i| i.code == "PARSE"));
    }

    #[test]
    fn test_issue_list_is_capped_but_counts_are_not() {
        let dir = TempDir::new().unwrap();
        let mut f0101 = String::from("id,name,type_code,category_code,updated_on\n");
        for i in 0..1200 {
            f0101.push_str(&format!("{},Acme,X,100,124001\n", 10000 + i));
        }
        fs::write(dir.path().join("F0101.csv"), f0101).unwrap();
        fs::write(
            dir.path().join("F4211.csv"),
            "doc_id,doc_type,entity_ref,item_code,order_date,quantity_scaled,extended_amount_scaled\n",
        )
        .unwrap();

        let summary = validate(dir.path());
        assert_eq!(summary.issues.len(), MAX_ISSUES);
        assert_eq!(summary.summary.errors, 1200);
        assert!(matches!(summary.checks.codes, CheckStatus::Failed(1200)));
    }

    #[test]
    fn test_unknown_header() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("F0101.csv"), "a,b,c,d,e\n").unwrap();
        fs::write(
            dir.path().join("F4211.csv"),
            "SDDOCO,SDDCTO,SDAN8,SDLITM,SDTRDJ,SDUORG,SDAEXP\n",
        )
        .unwrap();
        let summary = validate(dir.path());
        assert!(matches!(summary.checks.headers, CheckStatus::Failed(1)));
        assert_eq!(summary.header_style, Some(HeaderStyle::Jde));
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let dir = TempDir::new().unwrap();
        let err = run(ValidateOptions {
            dir: dir.path().to_path_buf(),
        })
        .unwrap_err();
        assert!(err.to_string().contains("F0101.csv"));
    }
}
