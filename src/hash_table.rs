//! HashTable: fixed bucket array, each bucket absent or a LinkedList of
//! KeyValuePairs.
//!
//! A bucket goes from absent to occupied on the first insert that hashes to
//! it and back to absent when a removal empties it. The bucket count never
//! changes, so chains grow with the number of keys sharing a slot.

use crate::behavior::{Behavior, KeyHasher, Standard, StdHash};
use crate::config::TableConfig;
use crate::error::{Error, Result};
use crate::key_value_pair::{KeyValuePair, Pairs};
use crate::linked_list::LinkedList;
use core::fmt;
use log::{debug, trace};

type Bucket<K, V, KB, VB> = LinkedList<KeyValuePair<K, V, KB, VB>, Pairs>;

pub struct HashTable<K, V, KB = Standard, VB = Standard, H = StdHash>
where
    KB: Behavior<K> + Clone,
    VB: Behavior<V> + Clone,
{
    buckets: Box<[Option<Bucket<K, V, KB, VB>>]>,
    key_behavior: KB,
    value_behavior: VB,
    hasher: H,
    len: usize,
}

impl<K, V> HashTable<K, V>
where
    K: core::hash::Hash,
    Standard: Behavior<K> + Behavior<V>,
{
    /// Table over `Clone + PartialEq + Display` keys and values, hashing
    /// keys through their `Hash` impl.
    pub fn with_buckets(bucket_count: usize) -> Result<Self> {
        Self::new(Standard, Standard, StdHash::new(), bucket_count)
    }
}

impl<K, V, KB, VB, H> HashTable<K, V, KB, VB, H>
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
        config.validate()?;
        let buckets = (0..config.bucket_count()).map(|_| None).collect();
        debug!("hash table created with {} buckets", config.bucket_count());
        Ok(Self {
            buckets,
            key_behavior,
            value_behavior,
            hasher,
            len: 0,
        })
    }

    fn bucket_index(&self, key: &K) -> usize {
        (self.hasher.hash_key(key) % self.buckets.len() as u64) as usize
    }

    fn bucket(&self, key: &K) -> Option<&Bucket<K, V, KB, VB>> {
        self.buckets[self.bucket_index(key)].as_ref()
    }

    fn find_pair(&self, key: &K) -> Option<&KeyValuePair<K, V, KB, VB>> {
        self.bucket(key)?.find(|p| p.matches_key(key))
    }

    fn ensure_vacant(&self, idx: usize, key: &K) -> Result<()> {
        let taken = self.buckets[idx]
            .as_ref()
            .is_some_and(|b| b.find(|p| p.matches_key(key)).is_some());
        if taken {
            debug!("insert rejected: key already present in bucket {}", idx);
            return Err(Error::DuplicateKey);
        }
        Ok(())
    }

    fn link(&mut self, idx: usize, pair: KeyValuePair<K, V, KB, VB>) {
        self.buckets[idx]
            .get_or_insert_with(|| {
                trace!("bucket {} occupied", idx);
                LinkedList::new(Pairs)
            })
            .append_owned(pair);
        self.len += 1;
    }

    /// Copy `key` and `value` into the table.
    ///
    /// Fails with `DuplicateKey` if an equal key is present (checked before
    /// anything is copied) and with `Copy` if either copy fails. A failed
    /// insert leaves the table exactly as it was.
    pub fn insert(&mut self, key: &K, value: &V) -> Result<()> {
        let idx = self.bucket_index(key);
        self.ensure_vacant(idx, key)?;
        let pair = KeyValuePair::new(
            key,
            value,
            self.key_behavior.clone(),
            self.value_behavior.clone(),
        )
        .map_err(|e| {
            debug!("insert into bucket {} failed: {}", idx, e);
            e
        })?;
        self.link(idx, pair);
        Ok(())
    }

    // Copies the key but moves the value in. On failure the value is freed
    // through the value table.
    pub(crate) fn insert_owned(&mut self, key: &K, value: V) -> Result<()> {
        let idx = self.bucket_index(key);
        if let Err(e) = self.ensure_vacant(idx, key) {
            self.value_behavior.free(value);
            return Err(e);
        }
        let pair = KeyValuePair::with_owned_value(
            key,
            value,
            self.key_behavior.clone(),
            self.value_behavior.clone(),
        )?;
        self.link(idx, pair);
        Ok(())
    }

    /// Owned copy of the value stored under `key`.
    ///
    /// The caller owns the result. Contrast with
    /// `MultiValueHashTable::lookup`, which lends out the stored list.
    pub fn lookup(&self, key: &K) -> Result<Option<V>> {
        self.find_pair(key)
            .map(KeyValuePair::value_copy)
            .transpose()
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.find_pair(key).map(KeyValuePair::value)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let idx = self.bucket_index(key);
        self.buckets[idx]
            .as_mut()?
            .find_mut(|p| p.matches_key(key))
            .map(|p| p.value_mut())
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.find_pair(key).is_some()
    }

    /// Remove and free the pair stored under `key`. An emptied bucket is
    /// torn down and returns to absent.
    pub fn remove(&mut self, key: &K) -> Result<()> {
        let idx = self.bucket_index(key);
        let emptied = {
            let bucket = self.buckets[idx].as_mut().ok_or(Error::NotFound)?;
            bucket.delete_by(|p| p.matches_key(key))?;
            bucket.is_empty()
        };
        self.len -= 1;
        if emptied {
            self.buckets[idx] = None;
            trace!("bucket {} emptied", idx);
        }
        Ok(())
    }

    /// Print every pair, bucket by bucket in index order and in insertion
    /// order within a bucket. This is not global insertion order.
    pub fn display_all(&self, out: &mut dyn fmt::Write) -> Result<()> {
        for bucket in self.buckets.iter().flatten() {
            bucket.print_all(out)?;
        }
        Ok(())
    }

    /// Entries in the same order `display_all` prints them.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.buckets
            .iter()
            .flatten()
            .flat_map(|b| b.iter())
            .map(|p| (p.key(), p.value()))
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Buckets currently holding a list.
    pub fn occupied_buckets(&self) -> usize {
        self.buckets.iter().filter(|b| b.is_some()).count()
    }

    pub fn key_behavior(&self) -> &KB {
        &self.key_behavior
    }

    pub fn value_behavior(&self) -> &VB {
        &self.value_behavior
    }
}

impl<K, V, KB, VB, H> fmt::Debug for HashTable<K, V, KB, VB, H>
where
    K: fmt::Debug,
    V: fmt::Debug,
    KB: Behavior<K> + Clone,
    VB: Behavior<V> + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries = self
            .buckets
            .iter()
            .flatten()
            .flat_map(|b| b.iter())
            .map(|p| (p.key(), p.value()));
        f.debug_map().entries(entries).finish()
    }
}
