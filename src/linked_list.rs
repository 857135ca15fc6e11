//! LinkedList: singly-linked sequence of owned element copies.
//!
//! Nodes live in a generational slot arena owned by the list and are linked
//! by slot keys, head to tail. Every node in the arena is reachable from
//! `head`, so the arena's length is the list's length.

use crate::behavior::Behavior;
use crate::error::{CopyError, Error, Result};
use core::fmt;
use slotmap::{DefaultKey, SlotMap};

#[derive(Debug)]
struct Node<T> {
    data: T,
    next: Option<DefaultKey>,
}

pub struct LinkedList<T, B>
where
    B: Behavior<T>,
{
    head: Option<DefaultKey>,
    nodes: SlotMap<DefaultKey, Node<T>>,
    behavior: B,
}

impl<T, B> LinkedList<T, B>
where
    B: Behavior<T>,
{
    pub fn new(behavior: B) -> Self {
        Self {
            head: None,
            nodes: SlotMap::with_key(),
            behavior,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    pub fn behavior(&self) -> &B {
        &self.behavior
    }

    // Walks the whole chain; the list keeps no tail pointer.
    fn tail(&self) -> Option<DefaultKey> {
        let mut cur = self.head?;
        while let Some(next) = self.nodes.get(cur).and_then(|n| n.next) {
            cur = next;
        }
        Some(cur)
    }

    fn link_after(&mut self, tail: Option<DefaultKey>, data: T) -> DefaultKey {
        let k = self.nodes.insert(Node { data, next: None });
        match tail.and_then(|t| self.nodes.get_mut(t)) {
            Some(t) => t.next = Some(k),
            None => self.head = Some(k),
        }
        k
    }

    fn locate<F>(&self, mut pred: F) -> Option<DefaultKey>
    where
        F: FnMut(&T) -> bool,
    {
        let mut cur = self.head;
        while let Some(k) = cur {
            let node = self.nodes.get(k)?;
            if pred(&node.data) {
                return Some(k);
            }
            cur = node.next;
        }
        None
    }

    // Unlinks the first element matching `pred` and hands back ownership.
    fn unlink_where<F>(&mut self, mut pred: F) -> Option<T>
    where
        F: FnMut(&B, &T) -> bool,
    {
        let mut prev: Option<DefaultKey> = None;
        let mut cur = self.head;
        while let Some(k) = cur {
            let node = self.nodes.get(k)?;
            if pred(&self.behavior, &node.data) {
                let next = node.next;
                match prev.and_then(|p| self.nodes.get_mut(p)) {
                    Some(p) => p.next = next,
                    None => self.head = next,
                }
                return self.nodes.remove(k).map(|n| n.data);
            }
            prev = Some(k);
            cur = node.next;
        }
        None
    }

    /// Copy `elem` through the behavior table and link the copy at the tail.
    /// O(n). On a failed copy the list is unchanged.
    pub fn append(&mut self, elem: &T) -> Result<()> {
        let data = self.behavior.copy(elem)?;
        self.append_owned(data);
        Ok(())
    }

    /// Link an element the caller already owns at the tail, without copying.
    pub fn append_owned(&mut self, elem: T) {
        let tail = self.tail();
        self.link_after(tail, elem);
    }

    /// Remove and free the first element equal to `key`.
    pub fn delete(&mut self, key: &T) -> Result<()> {
        let data = self
            .unlink_where(|b, d| b.equal(d, key))
            .ok_or(Error::NotFound)?;
        self.behavior.free(data);
        Ok(())
    }

    /// Remove and free the first element matching `pred`.
    pub fn delete_by<F>(&mut self, mut pred: F) -> Result<()>
    where
        F: FnMut(&T) -> bool,
    {
        let data = self.unlink_where(|_, d| pred(d)).ok_or(Error::NotFound)?;
        self.behavior.free(data);
        Ok(())
    }

    /// Owned copy of the first element equal to `key`. The caller owns the
    /// result; the list's element is untouched.
    pub fn search_by_key(&self, key: &T) -> Result<Option<T>> {
        let copy = self
            .find(|d| self.behavior.equal(d, key))
            .map(|d| self.behavior.copy(d))
            .transpose()?;
        Ok(copy)
    }

    /// Owned copy of the element at `index`, `None` past the end. O(n).
    pub fn get_by_index(&self, index: usize) -> Result<Option<T>> {
        let copy = self
            .get(index)
            .map(|d| self.behavior.copy(d))
            .transpose()?;
        Ok(copy)
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.iter().nth(index)
    }

    pub fn contains(&self, elem: &T) -> bool {
        self.find(|d| self.behavior.equal(d, elem)).is_some()
    }

    pub fn find<F>(&self, pred: F) -> Option<&T>
    where
        F: FnMut(&T) -> bool,
    {
        let k = self.locate(pred)?;
        self.nodes.get(k).map(|n| &n.data)
    }

    pub fn find_mut<F>(&mut self, pred: F) -> Option<&mut T>
    where
        F: FnMut(&T) -> bool,
    {
        let k = self.locate(pred)?;
        self.nodes.get_mut(k).map(|n| &mut n.data)
    }

    /// Print every element head to tail. Stops at the first failing print.
    pub fn print_all(&self, out: &mut dyn fmt::Write) -> Result<()> {
        self.print_elements(out)?;
        Ok(())
    }

    fn print_elements(&self, out: &mut dyn fmt::Write) -> fmt::Result {
        self.iter().try_for_each(|d| self.behavior.print(d, out))
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            nodes: &self.nodes,
            cur: self.head,
            remaining: self.nodes.len(),
        }
    }

    /// Deep copy through the behavior table. If any element fails to copy,
    /// the partial copy is dropped, freeing what it already holds.
    pub fn try_clone(&self) -> core::result::Result<Self, CopyError>
    where
        B: Clone,
    {
        let mut copy = LinkedList::new(self.behavior.clone());
        let mut tail = None;
        for d in self.iter() {
            let data = self.behavior.copy(d)?;
            tail = Some(copy.link_after(tail, data));
        }
        Ok(copy)
    }
}

impl<T, B> Drop for LinkedList<T, B>
where
    B: Behavior<T>,
{
    fn drop(&mut self) {
        let mut cur = self.head.take();
        while let Some(k) = cur {
            match self.nodes.remove(k) {
                Some(node) => {
                    cur = node.next;
                    self.behavior.free(node.data);
                }
                None => break,
            }
        }
    }
}

/// Iterator over elements in insertion order.
pub struct Iter<'a, T> {
    nodes: &'a SlotMap<DefaultKey, Node<T>>,
    cur: Option<DefaultKey>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let node = self.nodes.get(self.cur?)?;
        self.cur = node.next;
        self.remaining = self.remaining.saturating_sub(1);
        Some(&node.data)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> ExactSizeIterator for Iter<'a, T> {}

impl<'a, T, B> IntoIterator for &'a LinkedList<T, B>
where
    B: Behavior<T>,
{
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T, B> fmt::Debug for LinkedList<T, B>
where
    T: fmt::Debug,
    B: Behavior<T>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T, B> fmt::Display for LinkedList<T, B>
where
    B: Behavior<T>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.print_elements(f)
    }
}

/// Behavior table for lists stored as elements of another container. Each
/// list carries its own element table, so this one is stateless: copying is
/// a deep copy, freeing drops the list (which frees its elements), equality
/// is element-wise.
#[derive(Copy, Clone, Debug, Default)]
pub struct Lists;

impl<T, B> Behavior<LinkedList<T, B>> for Lists
where
    B: Behavior<T> + Clone,
{
    fn copy(&self, list: &LinkedList<T, B>) -> core::result::Result<LinkedList<T, B>, CopyError> {
        list.try_clone()
    }

    fn equal(&self, a: &LinkedList<T, B>, b: &LinkedList<T, B>) -> bool {
        a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| a.behavior.equal(x, y))
    }

    fn print(&self, list: &LinkedList<T, B>, out: &mut dyn fmt::Write) -> fmt::Result {
        list.print_elements(out)
    }
}
