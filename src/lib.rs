//! chained-hashtable: generic containers that own their elements through
//! caller-supplied behavior tables.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a small family of containers for opaque elements, where the
//!   container decides when to copy, compare, print and release an element
//!   but the caller decides how, by handing over a `Behavior<T>` table at
//!   construction.
//! - Layers:
//!   - LinkedList<T, B>: singly-linked sequence of owned copies. Nodes sit
//!     in a slot arena and are linked by key; append walks to the tail.
//!   - KeyValuePair<K, V, KB, VB>: one owned key and one owned value, each
//!     with its own table.
//!   - HashTable<K, V, KB, VB, H>: fixed array of buckets, each absent or a
//!     LinkedList of pairs. Buckets appear on first insert and disappear when
//!     emptied. Keys are unique.
//!   - MultiValueHashTable<K, V, KB, VB, H>: HashTable whose values are
//!     LinkedLists of caller values. A key exists exactly while its list is
//!     non-empty.
//!
//! Constraints
//! - Ownership: every element a container holds is a copy it made (or a
//!   value moved into it) and is released through the table's `free`
//!   exactly once, on removal or when the container is dropped.
//! - Failure atomicity: an operation whose copy fails leaves the container
//!   unchanged and frees any partial copies before returning the error.
//! - No resizing: the bucket count is fixed at creation. Use
//!   `TableConfig::for_expected_entries` to size a table up front.
//!
//! Lookups
//! - `HashTable::lookup` returns an owned copy of the value; the caller
//!   keeps it independent of the table.
//! - `MultiValueHashTable::lookup` lends the table's own value list. It
//!   cannot outlive the borrow and cannot be freed or edited through it.
//!
//! Concurrency
//! - No interior mutability and no locks; every mutation takes `&mut self`.
//!   A container is `Send`/`Sync` when its elements, tables and hasher are,
//!   so sharing one across threads means wrapping the whole table in a
//!   `Mutex` or `RwLock`.
//!
//! Logging
//! - `trace!`/`debug!` records through the `log` facade: bucket creation
//!   and teardown, rejected duplicates, failed copies. Nothing is printed
//!   unless the host installs a logger.
//!
//! Notes and non-goals
//! - Display order of a HashTable is bucket order, not insertion order.
//! - No ordered iteration or range queries.
//! - `Instrumented` wraps any table with call counters and optional copy
//!   failures; it is public so callers can use it as a leak detector.

pub mod behavior;
pub mod config;
pub mod error;
pub mod hash_table;
mod hash_table_proptest;
pub mod instrumented;
pub mod key_value_pair;
pub mod linked_list;
pub mod multi_value_hash_table;

// Public surface
pub use behavior::{Behavior, KeyHasher, Standard, StdHash};
pub use config::TableConfig;
pub use error::{CopyError, Error, Result};
pub use hash_table::HashTable;
pub use key_value_pair::KeyValuePair;
pub use linked_list::LinkedList;
pub use multi_value_hash_table::MultiValueHashTable;
