//! Implicit-decimal integers.
//!
//! JDE stores quantities and money as plain integers with the decimal point
//! implied by the column (two places for the columns generated here), so
//! `$10.50` lives on disk as `1050`.

use std::fmt;

/// Implied decimal places for every scaled column in this crate.
pub const SCALE_DIGITS: u32 = 2;

/// `10^SCALE_DIGITS`.
pub const SCALE: i64 = 10_i64.pow(SCALE_DIGITS);

/// An integer carrying [`SCALE_DIGITS`] implied decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Scaled(pub i64);

impl Scaled {
    /// Scale a whole number of units up, `10` -> `1000`.
    pub fn from_units(units: i64) -> Self {
        Scaled(units * SCALE)
    }

    /// The stored integer.
    pub fn raw(self) -> i64 {
        self.0
    }

    /// Whole units, truncating any fractional part.
    pub fn units(self) -> i64 {
        self.0 / SCALE
    }

    /// Fractional part in hundredths.
    pub fn cents(self) -> i64 {
        (self.0 % SCALE).abs()
    }

    /// Multiply by a whole number. Scale stays at two places, so this is the
    /// only correct way to extend a scaled price by an unscaled quantity.
    pub fn times(self, count: i64) -> Self {
        Scaled(self.0 * count)
    }

    /// Render as currency with thousands separators, `1234567` -> `$12,345.67`.
    pub fn to_currency(self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let units = group_thousands(self.units().unsigned_abs());
        format!("{}${}.{:02}", sign, units, self.cents())
    }
}

impl fmt::Display for Scaled {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.units().unsigned_abs(), self.cents())
    }
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
