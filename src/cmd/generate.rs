//! Generate command CLI handler.

use crate::config::{GenerateConfig, GenerateOverrides};
use crate::decimal::Scaled;
use crate::generator::{
    AddressBookRecord, Dataset, FixtureTable, Generator, HeaderStyle, SalesOrderRecord,
};
use crate::julian;
use crate::writer::{self, WriteReport};
use chrono::NaiveDate;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;

/// Rows of each table echoed in the summary
const SAMPLE_ROWS: usize = 3;

#[derive(Serialize)]
struct GenerateSummary<'a> {
    seed: u64,
    as_of: NaiveDate,
    header_style: HeaderStyle,
    #[serde(flatten)]
    output: &'a WriteReport,
}

#[allow(clippy::too_many_arguments)]
pub fn run(
    entities: Option<usize>,
    transactions: Option<usize>,
    seed: Option<u64>,
    output: Option<PathBuf>,
    as_of: Option<NaiveDate>,
    headers: Option<String>,
    config: Option<PathBuf>,
    progress: bool,
    json: bool,
) -> anyhow::Result<()> {
    let headers = headers
        .map(|h| h.parse::<HeaderStyle>().map_err(|e| anyhow::anyhow!(e)))
        .transpose()?;

    let config = GenerateConfig::resolve(
        config.as_deref(),
        GenerateOverrides {
            entities,
            transactions,
            seed,
            output_dir: output,
            as_of,
            headers,
        },
    )?;
    let as_of = config.effective_as_of();

    if !json {
        eprintln!(
            "Generating {} customers and {} sales order lines [seed: {}, as of: {}]",
            config.entities, config.transactions, config.seed, as_of
        );
    }

    let start_time = Instant::now();

    let pb = if progress && !json {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {msg}")?
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
        );
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb.set_message(format!("Generating {}...", AddressBookRecord::TABLE));
        Some(pb)
    } else {
        None
    };

    let mut gen = Generator::new(config.seed, as_of);
    let data = gen.generate(config.entities, config.transactions)?;

    if let Some(ref pb) = pb {
        pb.set_message(format!("Writing to {}...", config.output_dir.display()));
    }

    let report = writer::write_dataset(&config.output_dir, &data, config.headers)?;

    if let Some(pb) = pb {
        pb.finish_with_message("done");
    }

    let elapsed = start_time.elapsed();

    if json {
        let summary = GenerateSummary {
            seed: config.seed,
            as_of,
            header_style: config.headers,
            output: &report,
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    for file in &report.files {
        eprintln!("  {} rows -> {}", file.rows, file.path.display());
    }
    eprintln!("  Time: {:.3?}", elapsed);
    eprintln!();

    print_summary(&data, &report, config.headers)?;
    Ok(())
}

fn print_summary(data: &Dataset, report: &WriteReport, style: HeaderStyle) -> anyhow::Result<()> {
    let rule = "=".repeat(60);
    println!("{}", rule);
    println!("JD Edwards fixture summary");
    println!("{}", rule);

    for file in &report.files {
        println!(
            "{}: {} rows ({} bytes, sha256 {})",
            file.table, file.rows, file.bytes, file.sha256
        );
    }

    println!();
    println!(
        "Sample {} (first {} rows):",
        AddressBookRecord::TABLE,
        SAMPLE_ROWS
    );
    print_rows(&data.address_book, style);

    if let Some(first) = data.address_book.first() {
        let decoded = julian::decode(first.updated_on)?;
        println!();
        println!("Sample Julian date: {}", decoded);
        println!(
            "  -> Decoded: C={}, YY={:02}, DDD={:03} ({})",
            decoded.century,
            decoded.year_of_century,
            decoded.day_of_year,
            decoded.to_date()?
        );
    }

    println!();
    println!(
        "Sample {} (first {} rows):",
        SalesOrderRecord::TABLE,
        SAMPLE_ROWS
    );
    print_rows(&data.sales_orders, style);

    if let Some(first) = data.sales_orders.first() {
        let amount = Scaled(first.extended_amount_scaled);
        let quantity = Scaled(first.quantity_scaled);
        println!();
        println!("Sample extended amount (raw): {}", amount.raw());
        println!("  -> Actual USD: {}", amount.to_currency());
        println!("  -> Quantity: {} ({} raw)", quantity, quantity.raw());
    }

    println!("{}", rule);
    Ok(())
}

/// Print the first rows of a table as aligned columns.
fn print_rows<T: FixtureTable>(rows: &[T], style: HeaderStyle) {
    let mut table: Vec<Vec<String>> =
        vec![T::columns(style).iter().map(|c| c.to_string()).collect()];
    table.extend(rows.iter().take(SAMPLE_ROWS).map(|row| row.fields()));

    let widths: Vec<usize> = (0..table[0].len())
        .map(|i| {
            table
                .iter()
                .map(|r| r.get(i).map_or(0, |f| f.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();
    for row in &table {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(field, width)| format!("{:>width$}", field, width = width))
            .collect();
        println!("  {}", line.join("  "));
    }
}
