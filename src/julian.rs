//! JDE Julian dates (`CYYDDD`).
//!
//! The legacy format packs a calendar date into six digits:
//!
//! - `C`   century flag, `0` before 2000 and `1` from 2000 on
//! - `YY`  year within the century, zero padded
//! - `DDD` ordinal day of the year, `001`..=`366`
//!
//! 2023-01-01 encodes as `123001`, 1999-12-31 as `099365` (stored as the
//! integer `99365`). Years from 2100 on alias onto 2000-2099; the format has
//! no way to tell them apart and neither does this module.

use chrono::{Datelike, NaiveDate};
use std::fmt;
use std::str::FromStr;

/// Largest value that still fits in six digits.
pub const MAX_ENCODED: u32 = 999_999;

/// Encode a calendar date as a `CYYDDD` integer.
pub fn encode(date: NaiveDate) -> u32 {
    JulianDate::from_date(date).encode()
}

/// Split a `CYYDDD` integer into its three fields.
pub fn decode(value: u32) -> anyhow::Result<JulianDate> {
    if value > MAX_ENCODED {
        anyhow::bail!("Julian date {} has more than six digits", value);
    }
    format!("{:06}", value).parse()
}

/// A decoded `CYYDDD` value.
///
/// Field-level only: resolving it back to a calendar date needs the 100-year
/// window, see [`JulianDate::to_date`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JulianDate {
    pub century: u8,
    pub year_of_century: u8,
    pub day_of_year: u16,
}

impl JulianDate {
    pub fn from_date(date: NaiveDate) -> Self {
        let century = if date.year() >= 2000 { 1 } else { 0 };
        Self {
            century,
            year_of_century: date.year().rem_euclid(100) as u8,
            day_of_year: date.ordinal() as u16,
        }
    }

    /// The packed integer form.
    pub fn encode(&self) -> u32 {
        u32::from(self.century) * 100_000
            + u32::from(self.year_of_century) * 1_000
            + u32::from(self.day_of_year)
    }

    /// Resolve against the standard JDE window: `C=0` is the 1900s, `C=1` the 2000s.
    pub fn to_date(&self) -> anyhow::Result<NaiveDate> {
        if self.century > 1 {
            anyhow::bail!("century flag {} is outside the 1900/2000 window", self.century);
        }
        let year = 1900 + 100 * i32::from(self.century) + i32::from(self.year_of_century);
        NaiveDate::from_yo_opt(year, u32::from(self.day_of_year)).ok_or_else(|| {
            anyhow::anyhow!("day {} does not exist in year {}", self.day_of_year, year)
        })
    }
}

impl fmt::Display for JulianDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{:02}{:03}",
            self.century, self.year_of_century, self.day_of_year
        )
    }
}

impl FromStr for JulianDate {
    type Err = anyhow::Error;

    /// Accepts the padded text form (`099365`) as well as the bare integer
    /// rendering CSV files carry (`99365`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.len() > 6 || !s.bytes().all(|b| b.is_ascii_digit()) {
            anyhow::bail!("invalid Julian date: {:?} (expected up to six digits CYYDDD)", s);
        }
        let padded = format!("{:0>6}", s);

        let century: u8 = padded[0..1].parse()?;
        let year_of_century: u8 = padded[1..3].parse()?;
        let day_of_year: u16 = padded[3..6].parse()?;
        if !(1..=366).contains(&day_of_year) {
            anyhow::bail!("invalid Julian date {}: day of year {} out of range", s, day_of_year);
        }

        Ok(Self {
            century,
            year_of_century,
            day_of_year,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_encode_known_dates() {
        assert_eq!(encode(ymd(2023, 1, 1)), 123001);
        assert_eq!(encode(ymd(1999, 12, 31)), 99365);
        assert_eq!(encode(ymd(2024, 12, 31)), 124366);
        assert_eq!(encode(ymd(2000, 1, 1)), 100001);
        assert_eq!(encode(ymd(1900, 1, 1)), 1);
    }

    #[test]
    fn test_display_is_zero_padded() {
        let j = JulianDate::from_date(ymd(1999, 12, 31));
        assert_eq!(j.to_string(), "099365");
    }

    #[test]
    fn test_2100_aliases_2000() {
        assert_eq!(encode(ymd(2100, 3, 1)), encode(ymd(2000, 3, 1)) - 1);
        assert_eq!(encode(ymd(2100, 1, 1)), encode(ymd(2000, 1, 1)));
    }

    #[test]
    fn test_decode_fields() {
        let j = decode(123001).unwrap();
        assert_eq!(j.century, 1);
        assert_eq!(j.year_of_century, 23);
        assert_eq!(j.day_of_year, 1);

        let j = decode(99365).unwrap();
        assert_eq!(j.century, 0);
        assert_eq!(j.year_of_century, 99);
        assert_eq!(j.day_of_year, 365);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode(1_000_000).is_err());
        assert!(decode(123000).is_err());
        assert!(decode(123367).is_err());
        assert!("12a001".parse::<JulianDate>().is_err());
        assert!("".parse::<JulianDate>().is_err());
        assert!("1230011".parse::<JulianDate>().is_err());
    }

    #[test]
    fn test_round_trip_1900_to_2099() {
        let mut date = ymd(1900, 1, 1);
        let end = ymd(2099, 12, 31);
        while date <= end {
            let decoded = decode(encode(date)).unwrap();
            assert_eq!(decoded.century, if date.year() >= 2000 { 1 } else { 0 });
            assert_eq!(i32::from(decoded.year_of_century), date.year() % 100);
            assert_eq!(u32::from(decoded.day_of_year), date.ordinal());
            assert_eq!(decoded.to_date().unwrap(), date);
            date = date.succ_opt().unwrap();
        }
    }

    #[test]
    fn test_injective_within_year() {
        for year in [1999, 2000, 2023, 2024] {
            let mut seen = HashSet::new();
            let mut date = ymd(year, 1, 1);
            while date.year() == year {
                assert!(seen.insert(encode(date)), "duplicate code for {}", date);
                date = date.succ_opt().unwrap();
            }
        }
    }

    #[test]
    fn test_to_date_rejects_missing_leap_day() {
        // 2023 has no day 366
        let j: JulianDate = "123366".parse().unwrap();
        assert!(j.to_date().is_err());
        let j: JulianDate = "124366".parse().unwrap();
        assert_eq!(j.to_date().unwrap(), ymd(2024, 12, 31));
    }

    #[test]
    fn test_to_date_rejects_unknown_century() {
        let j: JulianDate = "223001".parse().unwrap();
        assert!(j.to_date().is_err());
    }
}
