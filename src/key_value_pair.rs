//! KeyValuePair: one owned key copy and one owned value copy, each released
//! through its own behavior table.

use crate::behavior::Behavior;
use crate::error::{CopyError, Result};
use core::fmt;
use core::mem::ManuallyDrop;

pub struct KeyValuePair<K, V, KB, VB>
where
    KB: Behavior<K>,
    VB: Behavior<V>,
{
    // Both slots are filled from construction until `Drop` hands them to
    // their tables' `free`.
    key: ManuallyDrop<K>,
    value: ManuallyDrop<V>,
    key_behavior: KB,
    value_behavior: VB,
}

impl<K, V, KB, VB> KeyValuePair<K, V, KB, VB>
where
    KB: Behavior<K>,
    VB: Behavior<V>,
{
    fn from_parts(key: K, value: V, key_behavior: KB, value_behavior: VB) -> Self {
        Self {
            key: ManuallyDrop::new(key),
            value: ManuallyDrop::new(value),
            key_behavior,
            value_behavior,
        }
    }

    fn copy_parts(
        key: &K,
        value: &V,
        key_behavior: KB,
        value_behavior: VB,
    ) -> core::result::Result<Self, CopyError> {
        let key = key_behavior.copy(key)?;
        let value = match value_behavior.copy(value) {
            Ok(v) => v,
            Err(e) => {
                key_behavior.free(key);
                return Err(e);
            }
        };
        Ok(Self::from_parts(key, value, key_behavior, value_behavior))
    }

    /// Copy `key` and `value` into a new pair. If the value copy fails the
    /// key copy is freed before the error is returned.
    pub fn new(key: &K, value: &V, key_behavior: KB, value_behavior: VB) -> Result<Self> {
        Ok(Self::copy_parts(key, value, key_behavior, value_behavior)?)
    }

    /// Copy `key` and take ownership of `value` as is. If the key copy fails
    /// the value is freed through `value_behavior`.
    pub fn with_owned_value(
        key: &K,
        value: V,
        key_behavior: KB,
        value_behavior: VB,
    ) -> Result<Self> {
        let key = match key_behavior.copy(key) {
            Ok(k) => k,
            Err(e) => {
                value_behavior.free(value);
                return Err(e.into());
            }
        };
        Ok(Self::from_parts(key, value, key_behavior, value_behavior))
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    pub(crate) fn value_mut(&mut self) -> &mut V {
        &mut self.value
    }

    pub fn key_copy(&self) -> Result<K> {
        Ok(self.key_behavior.copy(&self.key)?)
    }

    pub fn value_copy(&self) -> Result<V> {
        Ok(self.value_behavior.copy(&self.value)?)
    }

    pub fn matches_key(&self, key: &K) -> bool {
        self.key_behavior.equal(&self.key, key)
    }

    pub fn display_key(&self, out: &mut dyn fmt::Write) -> Result<()> {
        self.key_behavior.print(&self.key, out)?;
        Ok(())
    }

    pub fn display_value(&self, out: &mut dyn fmt::Write) -> Result<()> {
        self.value_behavior.print(&self.value, out)?;
        Ok(())
    }

    /// Key then value. Both are attempted even if the key fails to print.
    pub fn display_both(&self, out: &mut dyn fmt::Write) -> Result<()> {
        let key = self.display_key(out);
        let value = self.display_value(out);
        key.and(value)
    }

    pub fn try_clone(&self) -> core::result::Result<Self, CopyError>
    where
        KB: Clone,
        VB: Clone,
    {
        Self::copy_parts(
            &self.key,
            &self.value,
            self.key_behavior.clone(),
            self.value_behavior.clone(),
        )
    }
}

impl<K, V, KB, VB> Drop for KeyValuePair<K, V, KB, VB>
where
    KB: Behavior<K>,
    VB: Behavior<V>,
{
    fn drop(&mut self) {
        // Neither slot is touched again after being taken.
        let key = unsafe { ManuallyDrop::take(&mut self.key) };
        self.key_behavior.free(key);
        let value = unsafe { ManuallyDrop::take(&mut self.value) };
        self.value_behavior.free(value);
    }
}

impl<K, V, KB, VB> fmt::Debug for KeyValuePair<K, V, KB, VB>
where
    K: fmt::Debug,
    V: fmt::Debug,
    KB: Behavior<K>,
    VB: Behavior<V>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyValuePair")
            .field("key", &*self.key)
            .field("value", &*self.value)
            .finish()
    }
}

/// Behavior table for bucket lists. Pairs carry their own key and value
/// tables, so this one is stateless: pairs are equal when their keys are.
#[derive(Copy, Clone, Debug, Default)]
pub struct Pairs;

impl<K, V, KB, VB> Behavior<KeyValuePair<K, V, KB, VB>> for Pairs
where
    KB: Behavior<K> + Clone,
    VB: Behavior<V> + Clone,
{
    fn copy(
        &self,
        pair: &KeyValuePair<K, V, KB, VB>,
    ) -> core::result::Result<KeyValuePair<K, V, KB, VB>, CopyError> {
        pair.try_clone()
    }

    fn equal(&self, a: &KeyValuePair<K, V, KB, VB>, b: &KeyValuePair<K, V, KB, VB>) -> bool {
        a.matches_key(b.key())
    }

    fn print(&self, pair: &KeyValuePair<K, V, KB, VB>, out: &mut dyn fmt::Write) -> fmt::Result {
        pair.display_both(out).map_err(|_| fmt::Error)
    }
}
