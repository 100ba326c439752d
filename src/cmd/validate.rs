//! Validate command CLI handler.

use crate::validate::{self, ValidateOptions};
use std::path::PathBuf;
use std::time::Instant;

pub fn run(dir: PathBuf, strict: bool, json: bool) -> anyhow::Result<()> {
    if !dir.is_dir() {
        anyhow::bail!("fixture directory does not exist: {}", dir.display());
    }

    if !json {
        eprintln!("Validating fixtures in: {}", dir.display());
        eprintln!();
    }

    let start_time = Instant::now();
    let summary = validate::run(ValidateOptions { dir })?;
    let elapsed = start_time.elapsed();

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        for issue in &summary.issues {
            eprintln!("{}", issue);
        }

        if !summary.issues.is_empty() {
            eprintln!();
        }

        eprintln!("Validation summary:");
        if let Some(style) = summary.header_style {
            eprintln!("  Header style: {}", style);
        }
        eprintln!("  Customers (F0101): {}", summary.summary.customers);
        eprintln!("  Sales orders (F4211): {}", summary.summary.sales_orders);
        eprintln!("  Time: {:.3?}", elapsed);
        eprintln!();
        eprintln!("  Checks:");
        eprintln!("    - Headers:           {}", summary.checks.headers);
        eprintln!("    - Keys:              {}", summary.checks.keys);
        eprintln!("    - Codes:             {}", summary.checks.codes);
        eprintln!("    - Julian dates:      {}", summary.checks.julian_dates);
        eprintln!("    - Implicit decimals: {}", summary.checks.implicit_decimals);
        eprintln!("    - Item codes:        {}", summary.checks.item_codes);
        eprintln!("    - FK integrity:      {}", summary.checks.fk_integrity);
        eprintln!();
        eprintln!(
            "  Total: {} errors, {} warnings",
            summary.summary.errors, summary.summary.warnings
        );
        eprintln!();

        if summary.has_errors() {
            eprintln!("Result: FAILED");
        } else if summary.has_warnings() && strict {
            eprintln!("Result: FAILED (--strict mode, warnings treated as errors)");
        } else if summary.has_warnings() {
            eprintln!("Result: PASSED (with warnings)");
        } else {
            eprintln!("Result: PASSED");
        }
    }

    if summary.has_errors() || (strict && summary.has_warnings()) {
        std::process::exit(1);
    }

    Ok(())
}
