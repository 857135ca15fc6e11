//! Behavior tables and key hashers.
//!
//! A behavior table is the set of operations a container applies to the
//! elements it owns: `copy` on the way in, `free` on the way out, `equal` for
//! searches, and `print` for display. Containers receive the table by value
//! at construction and keep it for their whole lifetime; they never look at
//! an element except through it.

use crate::error::CopyError;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use hashbrown::hash_map::DefaultHashBuilder;

/// Per-role element operations.
///
/// Contract relied on by every container:
/// - `copy` returns a value independent of its source; freeing the source
///   must not change what the copy prints or compares equal to.
/// - `free` is called exactly once for every element the container owns,
///   either when it is removed or when the container is dropped.
///
/// Containers clone their table into the sub-structures they create, so a
/// table should be cheap to clone (zero-sized, or a shared handle).
pub trait Behavior<T> {
    /// Produce an owned copy of `elem`.
    fn copy(&self, elem: &T) -> Result<T, CopyError>;

    /// Release an owned element.
    #[inline]
    fn free(&self, elem: T) {
        drop(elem);
    }

    fn equal(&self, a: &T, b: &T) -> bool;

    fn print(&self, elem: &T, out: &mut dyn fmt::Write) -> fmt::Result;
}

/// Table derived from `Clone`, `PartialEq` and `Display`: copies clone,
/// frees drop, and each element prints on its own line.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Standard;

impl<T> Behavior<T> for Standard
where
    T: Clone + PartialEq + fmt::Display,
{
    #[inline]
    fn copy(&self, elem: &T) -> Result<T, CopyError> {
        Ok(elem.clone())
    }

    #[inline]
    fn equal(&self, a: &T, b: &T) -> bool {
        a == b
    }

    fn print(&self, elem: &T, out: &mut dyn fmt::Write) -> fmt::Result {
        writeln!(out, "{}", elem)
    }
}

/// Maps a key to a bucket-independent hash. Must be deterministic in the
/// key's content for as long as the key lives in a table.
pub trait KeyHasher<K: ?Sized> {
    fn hash_key(&self, key: &K) -> u64;
}

impl<K, F> KeyHasher<K> for F
where
    K: ?Sized,
    F: Fn(&K) -> u64,
{
    #[inline]
    fn hash_key(&self, key: &K) -> u64 {
        self(key)
    }
}

/// Hashes keys through their `Hash` impl with a fixed `BuildHasher`.
#[derive(Clone, Debug, Default)]
pub struct StdHash<S = DefaultHashBuilder> {
    build: S,
}

impl StdHash {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S> StdHash<S> {
    pub fn with_hasher(build: S) -> Self {
        Self { build }
    }
}

impl<K, S> KeyHasher<K> for StdHash<S>
where
    K: ?Sized + Hash,
    S: BuildHasher,
{
    #[inline]
    fn hash_key(&self, key: &K) -> u64 {
        self.build.hash_one(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Invariant: a copy is independent of its source; dropping the source
    /// leaves the copy's equality and printed form unchanged.
    #[test]
    fn standard_copy_is_independent() {
        let original = String::from("height");
        let copy = Standard.copy(&original).unwrap();
        let probe = original.clone();
        Standard.free(original);

        assert!(Standard.equal(&copy, &probe));
        let mut out = String::new();
        Standard.print(&copy, &mut out).unwrap();
        assert_eq!(out, "height\n");
    }

    #[test]
    fn standard_equal_uses_partial_eq() {
        assert!(Standard.equal(&3, &3));
        assert!(!Standard.equal(&3, &4));
    }

    /// Invariant: the same key content hashes identically across calls and
    /// across separately constructed keys.
    #[test]
    fn std_hash_is_content_deterministic() {
        let h = StdHash::new();
        let a = String::from("C-137");
        let b = String::from("C-137");
        assert_eq!(h.hash_key(&a), h.hash_key(&b));
        assert_eq!(h.hash_key(&a), h.hash_key(&a));
    }

    #[test]
    fn closures_are_key_hashers() {
        let len_hash = |k: &String| k.len() as u64;
        assert_eq!(len_hash.hash_key(&"abcd".to_string()), 4);
    }
}
