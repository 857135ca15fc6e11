//! Call-counting behavior tables.
//!
//! `Instrumented<B>` forwards to an inner table and records every call in a
//! shared `CallCounts`. Comparing `copies()` with `frees()` after a container
//! is dropped shows whether every owned copy was released exactly once. It
//! can also be armed to fail copies, which drives the rollback paths.

use crate::behavior::{Behavior, Standard};
use crate::error::CopyError;
use core::cell::Cell;
use core::fmt;
use std::rc::Rc;

#[derive(Debug, Default)]
struct Counters {
    copies: Cell<usize>,
    frees: Cell<usize>,
    equals: Cell<usize>,
    prints: Cell<usize>,
    // Remaining copies allowed before failing; `None` never fails.
    copy_budget: Cell<Option<usize>>,
}

/// Shared view of the counters behind one or more `Instrumented` tables.
/// Clones observe the same counters.
#[derive(Clone, Debug, Default)]
pub struct CallCounts(Rc<Counters>);

impl CallCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Successful copies made.
    pub fn copies(&self) -> usize {
        self.0.copies.get()
    }

    pub fn frees(&self) -> usize {
        self.0.frees.get()
    }

    pub fn equals(&self) -> usize {
        self.0.equals.get()
    }

    pub fn prints(&self) -> usize {
        self.0.prints.get()
    }

    /// Copies not yet freed. Negative means something was freed that this
    /// table never copied.
    pub fn outstanding(&self) -> isize {
        self.copies() as isize - self.frees() as isize
    }

    /// Let the next `n` copies succeed, then fail every copy after that.
    pub fn fail_copies_after(&self, n: usize) {
        self.0.copy_budget.set(Some(n));
    }

    pub fn stop_failing(&self) {
        self.0.copy_budget.set(None);
    }

    fn take_copy_permit(&self) -> bool {
        match self.0.copy_budget.get() {
            None => true,
            Some(0) => false,
            Some(n) => {
                self.0.copy_budget.set(Some(n - 1));
                true
            }
        }
    }

    fn bump(cell: &Cell<usize>) {
        cell.set(cell.get() + 1);
    }
}

#[derive(Clone, Debug, Default)]
pub struct Instrumented<B = Standard> {
    inner: B,
    counts: CallCounts,
}

impl<B> Instrumented<B> {
    pub fn new(inner: B) -> Self {
        Self::with_counts(inner, CallCounts::new())
    }

    /// Share `counts` with other tables, e.g. to total key and value frees.
    pub fn with_counts(inner: B, counts: CallCounts) -> Self {
        Self { inner, counts }
    }

    pub fn counts(&self) -> &CallCounts {
        &self.counts
    }
}

impl<T, B> Behavior<T> for Instrumented<B>
where
    B: Behavior<T>,
{
    fn copy(&self, elem: &T) -> Result<T, CopyError> {
        if !self.counts.take_copy_permit() {
            return Err(CopyError);
        }
        let copy = self.inner.copy(elem)?;
        CallCounts::bump(&self.counts.0.copies);
        Ok(copy)
    }

    fn free(&self, elem: T) {
        CallCounts::bump(&self.counts.0.frees);
        self.inner.free(elem);
    }

    fn equal(&self, a: &T, b: &T) -> bool {
        CallCounts::bump(&self.counts.0.equals);
        self.inner.equal(a, b)
    }

    fn print(&self, elem: &T, out: &mut dyn fmt::Write) -> fmt::Result {
        CallCounts::bump(&self.counts.0.prints);
        self.inner.print(elem, out)
    }
}
