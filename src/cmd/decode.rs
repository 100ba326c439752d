//! Decode command CLI handler.

use crate::decimal::Scaled;
use crate::julian::JulianDate;

pub fn run(date: Option<String>, amount: Option<i64>) -> anyhow::Result<()> {
    if let Some(date) = date {
        let julian: JulianDate = date.parse()?;
        println!("Julian date: {}", julian);
        println!(
            "  C={} YY={:02} DDD={:03}",
            julian.century, julian.year_of_century, julian.day_of_year
        );
        match julian.to_date() {
            Ok(calendar) => println!("  -> {}", calendar),
            Err(e) => println!("  -> not a calendar date: {}", e),
        }
    }

    if let Some(raw) = amount {
        let scaled = Scaled(raw);
        println!("Implicit decimal: {}", raw);
        println!("  -> {} ({})", scaled, scaled.to_currency());
    }

    Ok(())
}
