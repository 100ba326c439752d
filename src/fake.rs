//! Fake data generation helpers.
//!
//! Every draw goes through the one RNG owned by [`FakeData`], so the order of
//! calls is the order of the output. Callers pass the handle explicitly.

use ahash::AHashSet;
use chrono::NaiveDate;
use ::fake::faker::company::en::CompanyName;
use ::fake::rand::rngs::StdRng as FakeRng;
use ::fake::rand::SeedableRng as _;
use ::fake::Fake;
use rand::{Rng, RngExt};

/// Length of an EAN-13 item code, check digit included.
pub const EAN13_LEN: usize = 13;

/// Fake data generator with deterministic RNG
pub struct FakeData<R: Rng> {
    rng: R,
}

impl<R: Rng> FakeData<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Generate a company name
    pub fn company_name(&mut self) -> String {
        // Seed a fake-compatible rng from the shared handle
        let mut seed = [0u8; 32];
        self.rng.fill_bytes(&mut seed);
        let mut fake_rng = FakeRng::from_seed(seed);
        CompanyName().fake_with_rng(&mut fake_rng)
    }

    /// Generate a random integer in range (inclusive)
    pub fn int_range(&mut self, min: i64, max: i64) -> i64 {
        self.rng.random_range(min..=max)
    }

    /// Pick a random element from a slice, `None` if it is empty
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        Some(&items[self.rng.random_range(0..items.len())])
    }

    /// Uniform date in `[start, end]`, both ends included
    pub fn date_between(&mut self, start: NaiveDate, end: NaiveDate) -> NaiveDate {
        let (start, end) = if start <= end { (start, end) } else { (end, start) };
        let span = (end - start).num_days();
        let offset = self.rng.random_range(0..=span);
        start + chrono::Duration::days(offset)
    }

    /// Generate a 13-digit EAN barcode with a valid check digit
    pub fn ean13(&mut self) -> String {
        let mut digits: Vec<u8> = (0..EAN13_LEN - 1)
            .map(|_| self.rng.random_range(0..10u8))
            .collect();
        digits.push(ean13_check_digit(&digits));
        digits.iter().map(|d| char::from(b'0' + d)).collect()
    }
}

/// Check digit over the first twelve digits: weights alternate 1, 3.
pub fn ean13_check_digit(digits: &[u8]) -> u8 {
    let sum: u32 = digits
        .iter()
        .take(EAN13_LEN - 1)
        .enumerate()
        .map(|(i, &d)| u32::from(d) * if i % 2 == 0 { 1 } else { 3 })
        .sum();
    ((10 - sum % 10) % 10) as u8
}

/// True if `code` is thirteen ASCII digits ending in the right check digit.
pub fn is_valid_ean13(code: &str) -> bool {
    if code.len() != EAN13_LEN || !code.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    let digits: Vec<u8> = code.bytes().map(|b| b - b'0').collect();
    ean13_check_digit(&digits) == digits[EAN13_LEN - 1]
}

/// Draws integers from `[min, max]` without replacement.
#[derive(Debug)]
pub struct UniqueInts {
    min: i64,
    max: i64,
    seen: AHashSet<i64>,
}

impl UniqueInts {
    pub fn new(min: i64, max: i64) -> Self {
        Self {
            min,
            max,
            seen: AHashSet::new(),
        }
    }

    /// Number of distinct values in the range.
    pub fn capacity(&self) -> u64 {
        (self.max - self.min + 1).max(0) as u64
    }

    /// Fail up front if `count` more values cannot be drawn.
    pub fn reserve(&mut self, what: &str, count: usize) -> anyhow::Result<()> {
        let available = self.capacity() - self.seen.len() as u64;
        if count as u64 > available {
            anyhow::bail!(
                "cannot draw {} unique {} from [{}, {}]: only {} values available",
                count,
                what,
                self.min,
                self.max,
                available
            );
        }
        self.seen.reserve(count);
        Ok(())
    }

    /// Next unused value; rejection sampling against the values drawn so far.
    pub fn draw<R: Rng>(&mut self, fake: &mut FakeData<R>) -> anyhow::Result<i64> {
        if self.seen.len() as u64 >= self.capacity() {
            anyhow::bail!("unique value space [{}, {}] exhausted", self.min, self.max);
        }
        loop {
            let value = fake.int_range(self.min, self.max);
            if self.seen.insert(value) {
                return Ok(value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn fake(seed: u64) -> FakeData<StdRng> {
        FakeData::new(StdRng::seed_from_u64(seed))
    }

    #[test]
    fn test_deterministic_generation() {
        let mut fake1 = fake(42);
        let mut fake2 = fake(42);

        assert_eq!(fake1.company_name(), fake2.company_name());
        assert_eq!(fake1.ean13(), fake2.ean13());
        assert_eq!(fake1.int_range(1, 100), fake2.int_range(1, 100));
    }

    #[test]
    fn test_company_name_not_empty() {
        let mut fake = fake(7);
        for _ in 0..20 {
            assert!(!fake.company_name().trim().is_empty());
        }
    }

    #[test]
    fn test_company_name_draws_from_shared_rng() {
        let mut with_name = fake(11);
        let mut without = fake(11);
        let name = with_name.company_name();
        assert_eq!(name, fake(11).company_name());

        let a: Vec<i64> = (0..8).map(|_| with_name.int_range(0, 1_000_000)).collect();
        let b: Vec<i64> = (0..8).map(|_| without.int_range(0, 1_000_000)).collect();
        assert_ne!(a, b);
    }

    #[test]
    fn test_ean13_valid() {
        let mut fake = fake(42);
        for _ in 0..200 {
            let code = fake.ean13();
            assert_eq!(code.len(), 13);
            assert!(is_valid_ean13(&code), "bad check digit: {}", code);
        }
    }

    #[test]
    fn test_known_ean13() {
        assert!(is_valid_ean13("4006381333931"));
        assert!(!is_valid_ean13("4006381333932"));
        assert!(!is_valid_ean13("400638133393"));
        assert!(!is_valid_ean13("40063813339a1"));
    }

    #[test]
    fn test_date_between_inclusive() {
        let mut fake = fake(1);
        let day = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(fake.date_between(day, day), day);

        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
        let mut hit_start = false;
        let mut hit_end = false;
        for _ in 0..500 {
            let d = fake.date_between(start, end);
            assert!(d >= start && d <= end);
            hit_start |= d == start;
            hit_end |= d == end;
        }
        assert!(hit_start && hit_end);
    }

    #[test]
    fn test_pick_empty() {
        let mut fake = fake(1);
        let empty: [i64; 0] = [];
        assert!(fake.pick(&empty).is_none());
        assert_eq!(fake.pick(&[5]), Some(&5));
    }

    #[test]
    fn test_unique_ints_fill_whole_range() {
        let mut fake = fake(3);
        let mut pool = UniqueInts::new(1, 50);
        pool.reserve("ids", 50).unwrap();
        let mut values: Vec<i64> = (0..50).map(|_| pool.draw(&mut fake).unwrap()).collect();
        values.sort_unstable();
        assert_eq!(values, (1..=50).collect::<Vec<_>>());
        assert!(pool.draw(&mut fake).is_err());
    }

    #[test]
    fn test_unique_ints_reserve_rejects_overflow() {
        let mut pool = UniqueInts::new(10000, 99999);
        assert_eq!(pool.capacity(), 90000);
        assert!(pool.reserve("ids", 90000).is_ok());
        let err = pool.reserve("ids", 90001).unwrap_err();
        assert!(err.to_string().contains("90001"));
    }
}
