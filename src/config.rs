//! Table sizing.
//!
//! Bucket counts are fixed for the lifetime of a table, so they are chosen
//! up front. `for_expected_entries` rounds an expected entry count up to a
//! prime, which spreads keys better under the modulo reduction.

use crate::error::{Error, Result};

/// Bucket count used by `TableConfig::default()`.
pub const DEFAULT_BUCKET_COUNT: usize = 11;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct TableConfig {
    bucket_count: usize,
}

impl TableConfig {
    pub const fn new(bucket_count: usize) -> Self {
        Self { bucket_count }
    }

    /// Size a table for roughly `expected` entries: the smallest prime that
    /// is at least `expected` (and at least 2).
    pub fn for_expected_entries(expected: usize) -> Self {
        Self::new(next_prime(expected))
    }

    pub fn bucket_count(&self) -> usize {
        self.bucket_count
    }

    pub fn validate(&self) -> Result<()> {
        if self.bucket_count == 0 {
            return Err(Error::InvalidArgument("bucket count must be positive"));
        }
        Ok(())
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BUCKET_COUNT)
    }
}

fn is_prime(n: usize) -> bool {
    if n < 2 {
        return false;
    }
    if n < 4 {
        return true;
    }
    if n % 2 == 0 || n % 3 == 0 {
        return false;
    }
    let mut i = 5;
    while i * i <= n {
        if n % i == 0 || n % (i + 2) == 0 {
            return false;
        }
        i += 6;
    }
    true
}

/// Smallest prime `>= n`, never less than 2.
pub fn next_prime(n: usize) -> usize {
    let mut candidate = n.max(2);
    while !is_prime(candidate) {
        candidate += 1;
    }
    candidate
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_prime_rounds_up() {
        assert_eq!(next_prime(0), 2);
        assert_eq!(next_prime(2), 2);
        assert_eq!(next_prime(4), 5);
        assert_eq!(next_prime(24), 29);
        assert_eq!(next_prime(97), 97);
        assert_eq!(next_prime(121), 127);
    }

    #[test]
    fn zero_buckets_is_invalid() {
        assert!(matches!(
            TableConfig::new(0).validate(),
            Err(Error::InvalidArgument(_))
        ));
        assert!(TableConfig::new(1).validate().is_ok());
        assert!(TableConfig::default().validate().is_ok());
    }

    #[test]
    fn expected_entries_pick_a_prime() {
        let c = TableConfig::for_expected_entries(10);
        assert_eq!(c.bucket_count(), 11);
        assert!(c.validate().is_ok());
    }
}
