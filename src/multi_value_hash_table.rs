//! MultiValueHashTable: one key, many values.
//!
//! Built on `HashTable` with a `LinkedList` of values as the stored value.
//! Lists are moved into the table rather than copied, and a key disappears
//! as soon as its last value is removed, so every stored list is non-empty.

use crate::behavior::{Behavior, KeyHasher, Standard, StdHash};
use crate::config::TableConfig;
use crate::error::{Error, Result};
use crate::hash_table::HashTable;
use crate::linked_list::{LinkedList, Lists};
use core::fmt;
use log::trace;

pub struct MultiValueHashTable<K, V, KB = Standard, VB = Standard, H = StdHash>
where
    KB: Behavior<K> + Clone,
    VB: Behavior<V> + Clone,
{
    table: HashTable<K, LinkedList<V, VB>, KB, Lists, H>,
    // Cloned into each fresh value list.
    value_behavior: VB,
}

impl<K, V> MultiValueHashTable<K, V>
where
    K: core::hash::Hash,
    Standard: Behavior<K> + Behavior<V>,
{
    pub fn with_buckets(bucket_count: usize) -> Result<Self> {
        Self::new(Standard, Standard, StdHash::new(), bucket_count)
    }
}

impl<K, V, KB, VB, H> MultiValueHashTable<K, V, KB, VB, H>
where
    KB: Behavior<K> + Clone,
    VB: Behavior<V> + Clone,
    H: KeyHasher<K>,
{
    /// Fails with `InvalidArgument` when `bucket_count` is zero.
    pub fn new(key_behavior: KB, value_behavior: VB, hasher: H, bucket_count: usize) -> Result<Self> {
        Self::with_config(
            key_behavior,
            value_behavior,
            hasher,
            TableConfig::new(bucket_count),
        )
    }

    pub fn with_config(
        key_behavior: KB,
        value_behavior: VB,
        hasher: H,
        config: TableConfig,
    ) -> Result<Self> {
        let table = HashTable::with_config(key_behavior, Lists, hasher, config)?;
        Ok(Self {
            table,
            value_behavior,
        })
    }

    /// Copy `value` onto the list for `key`, creating the key if needed.
    ///
    /// A failed copy leaves the table as it was: for a new key, the fresh
    /// list and its value copy are freed before the error is returned.
    pub fn add(&mut self, key: &K, value: &V) -> Result<()> {
        if let Some(list) = self.table.get_mut(key) {
            return list.append(value);
        }
        let mut list = LinkedList::new(self.value_behavior.clone());
        list.append(value)?;
        self.table.insert_owned(key, list)?;
        trace!("new key added, {} keys", self.table.len());
        Ok(())
    }

    /// The live list of values stored under `key`, in insertion order.
    ///
    /// Unlike `HashTable::lookup` this lends out the table's own list rather
    /// than a copy; it stays owned by the table and can only change through
    /// `add` and `remove`.
    pub fn lookup(&self, key: &K) -> Option<&LinkedList<V, VB>> {
        self.table.get(key)
    }

    /// Remove the first value equal to `value` from the list for `key`. The
    /// key itself goes once its list is empty.
    ///
    /// `NotFound` if the key is absent or the value is not in its list.
    pub fn remove(&mut self, key: &K, value: &V) -> Result<()> {
        let list = self.table.get_mut(key).ok_or(Error::NotFound)?;
        list.delete(value)?;
        if list.is_empty() {
            self.table.remove(key)?;
            trace!("last value removed, key dropped");
        }
        Ok(())
    }

    /// Print `key` once, then each of its values in insertion order.
    pub fn display_by_key(&self, key: &K, out: &mut dyn fmt::Write) -> Result<()> {
        let list = self.table.get(key).ok_or(Error::NotFound)?;
        self.table.key_behavior().print(key, out)?;
        list.print_all(out)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.table.contains_key(key)
    }

    /// Total number of values across all keys.
    pub fn value_count(&self) -> usize {
        self.table.iter().map(|(_, list)| list.len()).sum()
    }

    pub fn bucket_count(&self) -> usize {
        self.table.bucket_count()
    }

    pub fn occupied_buckets(&self) -> usize {
        self.table.occupied_buckets()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &LinkedList<V, VB>)> {
        self.table.iter()
    }
}

impl<K, V, KB, VB, H> fmt::Debug for MultiValueHashTable<K, V, KB, VB, H>
where
    K: fmt::Debug,
    V: fmt::Debug,
    KB: Behavior<K> + Clone,
    VB: Behavior<V> + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.table, f)
    }
}
