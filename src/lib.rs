//! # sorted-value-map
//!
//! A map whose entries are kept ordered by **value**, stored in a dense sorted
//! `Vec` alongside a `HashMap` index from key to value.
//!
//! Lookups by key are O(1), lookups by position are O(1), searches by value are
//! O(log n). Inserting or removing shifts the tail of the vector, so writes are
//! O(n). This is not a balanced tree: it trades write cost for a flat,
//! cache-friendly, randomly indexable layout.
//!
//! ## Example
//!
//! ```rust
//! use sorted_value_map::SortedValueMap;
//!
//! let mut scores = SortedValueMap::new();
//! scores.insert("carol", 72);
//! scores.insert("alice", 95);
//! scores.insert("bob", 61);
//!
//! assert_eq!(scores.get_key(0), Some(&"bob"));
//! assert_eq!(scores.index_of("alice"), Some(2));
//!
//! // Keys are unique: re-inserting reports a no-op.
//! assert_eq!(scores.insert("bob", 100), None);
//! assert_eq!(scores.value_of("bob"), Some(&61));
//! ```
//!
//! ## Ties
//!
//! Entries whose values compare equal are kept in insertion order: a new entry
//! is placed after every existing entry with an equal value. [`index_of`]
//! always resolves to the queried key, even inside a run of equal values.
//!
//! [`index_of`]: SortedValueMap::index_of

#![forbid(unsafe_code)]

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::hash::Hash;
use std::iter::FusedIterator;
use std::ops::Range;

pub mod compare;
pub use compare::{Compare, Natural, Reverse};

#[cfg(feature = "serde")]
mod serde_impl;

// =============================================================================
// Entry
// =============================================================================

/// A key-value pair stored in the ordered sequence.
///
/// Entries are immutable once inserted; to change a value use
/// [`SortedValueMap::replace`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Entry<K, V> {
    key: K,
    value: V,
}

impl<K, V> Entry<K, V> {
    #[inline]
    pub fn key(&self) -> &K {
        &self.key
    }

    #[inline]
    pub fn value(&self) -> &V {
        &self.value
    }

    #[inline]
    pub fn into_parts(self) -> (K, V) {
        (self.key, self.value)
    }
}

impl<K, V> From<Entry<K, V>> for (K, V) {
    fn from(entry: Entry<K, V>) -> Self {
        entry.into_parts()
    }
}

// =============================================================================
// SortedValueMap
// =============================================================================

/// A key-value map ordered by value under a [`Compare`] implementation.
///
/// Two structures are kept in lockstep:
/// - `entries`: the ordered sequence, sorted by `cmp` over values
/// - `index`: key -> current value, for O(1) existence checks and search probes
///
/// Both are private, and every mutation updates them back to back with nothing
/// fallible in between, so callers never observe one without the other.
#[derive(Clone)]
pub struct SortedValueMap<K, V, C = Natural> {
    entries: Vec<Entry<K, V>>,
    index: HashMap<K, V>,
    cmp: C,
}

impl<K, V> SortedValueMap<K, V, Natural> {
    /// Creates an empty map ordered by `V`'s natural (`PartialOrd`) order.
    ///
    /// # Examples
    /// ```rust
    /// use sorted_value_map::SortedValueMap;
    ///
    /// let map = SortedValueMap::<&str, u32>::new();
    /// assert!(map.is_empty());
    /// ```
    pub fn new() -> Self {
        Self::with_comparator(Natural)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_comparator(capacity, Natural)
    }
}

impl<K, V, C> SortedValueMap<K, V, C> {
    /// Creates an empty map ordered by `cmp`.
    ///
    /// # Examples
    /// ```rust
    /// use sorted_value_map::SortedValueMap;
    ///
    /// let mut map = SortedValueMap::with_comparator(|a: &String, b: &String| {
    ///     a.to_lowercase().cmp(&b.to_lowercase())
    /// });
    /// map.insert(1, "beta".to_string());
    /// map.insert(2, "Alpha".to_string());
    /// assert_eq!(map.get(0).map(String::as_str), Some("Alpha"));
    /// ```
    pub fn with_comparator(cmp: C) -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
            cmp,
        }
    }

    pub fn with_capacity_and_comparator(capacity: usize, cmp: C) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
            cmp,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn comparator(&self) -> &C {
        &self.cmp
    }

    /// Value at `position` in sorted order, or `None` when out of bounds.
    #[inline]
    pub fn get(&self, position: usize) -> Option<&V> {
        self.entries.get(position).map(|e| &e.value)
    }

    /// Key at `position` in sorted order, or `None` when out of bounds.
    #[inline]
    pub fn get_key(&self, position: usize) -> Option<&K> {
        self.entries.get(position).map(|e| &e.key)
    }

    #[inline]
    pub fn get_entry(&self, position: usize) -> Option<&Entry<K, V>> {
        self.entries.get(position)
    }

    #[inline]
    pub fn first(&self) -> Option<&Entry<K, V>> {
        self.entries.first()
    }

    #[inline]
    pub fn last(&self) -> Option<&Entry<K, V>> {
        self.entries.last()
    }

    /// The ordered sequence as a read-only slice.
    #[inline]
    pub fn as_slice(&self) -> &[Entry<K, V>] {
        &self.entries
    }

    /// Returns an independent copy of the ordered sequence.
    pub fn to_vec(&self) -> Vec<Entry<K, V>>
    where
        K: Clone,
        V: Clone,
    {
        self.entries.clone()
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.entries.iter(),
        }
    }

    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &K> + ExactSizeIterator + '_ {
        self.entries.iter().map(|e| &e.key)
    }

    pub fn values(&self) -> impl DoubleEndedIterator<Item = &V> + ExactSizeIterator + '_ {
        self.entries.iter().map(|e| &e.value)
    }

    /// Calls `f(value, key, position, self)` for every entry in ascending order
    /// and collects the results.
    ///
    /// # Examples
    /// ```rust
    /// use sorted_value_map::SortedValueMap;
    ///
    /// let map: SortedValueMap<_, _> = [("x", 3), ("y", 1)].into();
    /// let labels = map.map(|v, k, i, _| format!("{i}:{k}={v}"));
    /// assert_eq!(labels, vec!["0:y=1", "1:x=3"]);
    /// ```
    pub fn map<T, F>(&self, mut f: F) -> Vec<T>
    where
        F: FnMut(&V, &K, usize, &Self) -> T,
    {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, e)| f(&e.value, &e.key, i, self))
            .collect()
    }

    /// Values, in ascending order, for which `f(value, key, position, self)`
    /// returns `true`.
    pub fn filter<F>(&self, mut f: F) -> Vec<&V>
    where
        F: FnMut(&V, &K, usize, &Self) -> bool,
    {
        self.entries
            .iter()
            .enumerate()
            .filter(|(i, e)| f(&e.value, &e.key, *i, self))
            .map(|(_, e)| &e.value)
            .collect()
    }

    pub fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(&V, &K, usize, &Self),
    {
        for (i, e) in self.entries.iter().enumerate() {
            f(&e.value, &e.key, i, self);
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
    }

    /// Removes every entry, yielding them in ascending order.
    pub fn drain(&mut self) -> std::vec::Drain<'_, Entry<K, V>> {
        self.index.clear();
        self.entries.drain(..)
    }

    pub fn shrink_to_fit(&mut self)
    where
        K: Eq + Hash,
    {
        self.entries.shrink_to_fit();
        self.index.shrink_to_fit();
    }

    /// Approximate heap bytes held by both structures.
    pub fn memory_usage(&self) -> usize {
        self.entries.capacity() * std::mem::size_of::<Entry<K, V>>()
            + self.index.capacity() * (std::mem::size_of::<(K, V)>() + 1)
    }
}

impl<K, V, C> SortedValueMap<K, V, C>
where
    K: Hash + Eq + Clone,
    V: Clone,
    C: Compare<V>,
{
    /// Builds a map from `pairs`, inserting each through [`insert`] in the
    /// input's iteration order. Later duplicates of a key are ignored.
    ///
    /// # Examples
    /// ```rust
    /// use std::collections::HashMap;
    /// use sorted_value_map::{Reverse, SortedValueMap};
    ///
    /// let input = HashMap::from([("a", 3), ("b", 1), ("c", 2)]);
    /// let map = SortedValueMap::from_pairs_with(input, Reverse);
    /// assert_eq!(map.values().copied().collect::<Vec<_>>(), vec![3, 2, 1]);
    /// ```
    ///
    /// [`insert`]: SortedValueMap::insert
    pub fn from_pairs_with<I>(pairs: I, cmp: C) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let pairs = pairs.into_iter();
        let mut map = Self::with_capacity_and_comparator(pairs.size_hint().0, cmp);
        map.insert_many(pairs);
        map
    }

    /// Inserts `key -> value` at its sorted position.
    ///
    /// Returns the position of the new entry, or `None` if `key` is already
    /// present (in which case nothing changes).
    ///
    /// # Examples
    /// ```rust
    /// use sorted_value_map::SortedValueMap;
    ///
    /// let mut map = SortedValueMap::new();
    /// assert_eq!(map.insert('a', 5), Some(0));
    /// assert_eq!(map.insert('b', 1), Some(0));
    /// assert_eq!(map.insert('c', 3), Some(1));
    /// assert_eq!(map.insert('a', 0), None);
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Option<usize> {
        if self.index.contains_key(&key) {
            return None;
        }

        let position = self.upper_bound(&value);
        let (index_key, index_value) = (key.clone(), value.clone());

        self.index.insert(index_key, index_value);
        self.entries.insert(position, Entry { key, value });
        Some(position)
    }

    /// Inserts every pair and returns the position reported by the first
    /// successful insert of the batch, or `None` if every key was present.
    ///
    /// The returned position is not adjusted for shifts caused by later
    /// inserts in the same batch.
    pub fn insert_many<I>(&mut self, pairs: I) -> Option<usize>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut first = None;
        for (key, value) in pairs {
            let position = self.insert(key, value);
            if first.is_none() {
                first = position;
            }
        }
        first
    }

    /// Same as [`insert_many`](Self::insert_many), for map-shaped input.
    pub fn insert_from_map<M>(&mut self, map: M) -> Option<usize>
    where
        M: IntoIterator<Item = (K, V)>,
    {
        self.insert_many(map)
    }

    /// Replaces the value stored for `key`, moving the entry to its new sorted
    /// position. Returns the previous value, or `None` if `key` was new.
    pub fn replace(&mut self, key: K, value: V) -> Option<V> {
        let old = self.remove(&key).map(|e| e.value);
        self.insert(key, value);
        old
    }

    #[inline]
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.contains_key(key)
    }

    /// `true` iff every key yielded by `keys` is present.
    pub fn contains_all<'a, Q, I>(&self, keys: I) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized + 'a,
        I: IntoIterator<Item = &'a Q>,
    {
        keys.into_iter().all(|k| self.contains(k))
    }

    /// Current value of `key`, via the index.
    #[inline]
    pub fn value_of<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.get(key)
    }

    /// Position of `key` in sorted order.
    ///
    /// Binary-searches for the run of entries whose value compares equal to
    /// the key's stored value, then scans that run for the key itself, so the
    /// result is exact even when several keys share a value.
    ///
    /// # Examples
    /// ```rust
    /// use sorted_value_map::SortedValueMap;
    ///
    /// let mut map = SortedValueMap::new();
    /// map.insert_many([("a", 1), ("b", 1), ("c", 1)]);
    /// assert_eq!(map.index_of("c"), Some(2));
    /// assert_eq!(map.index_of("z"), None);
    /// ```
    pub fn index_of<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let probe = self.index.get(key)?;
        let start = self.lower_bound(probe);
        let found = self.entries[start..]
            .iter()
            .take_while(|e| self.cmp.compare(&e.value, probe) == Ordering::Equal)
            .position(|e| Borrow::<Q>::borrow(&e.key) == key)
            .map(|offset| start + offset);

        // An inconsistent comparator can leave the key outside the probed run.
        found.or_else(|| {
            self.entries
                .iter()
                .position(|e| Borrow::<Q>::borrow(&e.key) == key)
        })
    }

    /// Binary search by value.
    ///
    /// `Ok(position)` of some entry comparing equal to `value`, or
    /// `Err(position)` where such an entry would be inserted.
    pub fn search(&self, value: &V) -> Result<usize, usize> {
        self.entries
            .binary_search_by(|e| self.cmp.compare(&e.value, value))
    }

    /// Positions of all entries whose value compares equal to `value`.
    pub fn positions_of_value(&self, value: &V) -> Range<usize> {
        self.lower_bound(value)..self.upper_bound(value)
    }

    /// Removes `key`, returning its entry.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<Entry<K, V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let position = self.index_of(key)?;
        self.remove_at(position)
    }

    /// Removes the entry at `position`, or returns `None` when out of bounds.
    pub fn remove_at(&mut self, position: usize) -> Option<Entry<K, V>> {
        if position >= self.entries.len() {
            return None;
        }

        let entry = self.entries.remove(position);
        let indexed = self.index.remove(&entry.key);
        debug_assert!(indexed.is_some(), "entry key missing from index");
        Some(entry)
    }

    /// Removes the entry with the highest position.
    pub fn pop(&mut self) -> Option<Entry<K, V>> {
        let entry = self.entries.pop()?;
        self.index.remove(&entry.key);
        Some(entry)
    }

    /// Removes up to `count` entries from the end, returned in ascending order.
    pub fn pop_many(&mut self, count: usize) -> Vec<Entry<K, V>> {
        let at = self.entries.len().saturating_sub(count);
        let tail = self.entries.split_off(at);
        for entry in &tail {
            self.index.remove(&entry.key);
        }
        tail
    }

    /// Removes the entry with the lowest position.
    pub fn shift(&mut self) -> Option<Entry<K, V>> {
        self.remove_at(0)
    }

    /// Removes up to `count` entries from the front, returned in ascending order.
    pub fn shift_many(&mut self, count: usize) -> Vec<Entry<K, V>> {
        let count = count.min(self.entries.len());
        let head: Vec<_> = self.entries.drain(..count).collect();
        for entry in &head {
            self.index.remove(&entry.key);
        }
        head
    }

    /// Keeps only the entries for which `f(key, value)` returns `true`.
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&K, &V) -> bool,
    {
        let index = &mut self.index;
        self.entries.retain(|e| {
            if f(&e.key, &e.value) {
                return true;
            }
            index.remove(&e.key);
            false
        });
    }

    /// First position whose value is not less than `value`.
    fn lower_bound(&self, value: &V) -> usize {
        self.entries
            .partition_point(|e| self.cmp.compare(&e.value, value) == Ordering::Less)
    }

    /// First position whose value is greater than `value`.
    fn upper_bound(&self, value: &V) -> usize {
        self.entries
            .partition_point(|e| self.cmp.compare(&e.value, value) != Ordering::Greater)
    }
}

impl<K, V> Default for SortedValueMap<K, V, Natural> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, C> PartialEq for SortedValueMap<K, V, C>
where
    K: PartialEq,
    V: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<K, V, C> std::fmt::Debug for SortedValueMap<K, V, C>
where
    K: std::fmt::Debug,
    V: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V> FromIterator<(K, V)> for SortedValueMap<K, V, Natural>
where
    K: Hash + Eq + Clone,
    V: Clone + PartialOrd,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_pairs_with(iter, Natural)
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for SortedValueMap<K, V, Natural>
where
    K: Hash + Eq + Clone,
    V: Clone + PartialOrd,
{
    fn from(pairs: [(K, V); N]) -> Self {
        Self::from_pairs_with(pairs, Natural)
    }
}

impl<K, V, C> Extend<(K, V)> for SortedValueMap<K, V, C>
where
    K: Hash + Eq + Clone,
    V: Clone,
    C: Compare<V>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.insert_many(iter);
    }
}

impl<'a, K, V, C> IntoIterator for &'a SortedValueMap<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, C> IntoIterator for SortedValueMap<K, V, C> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            inner: self.entries.into_iter(),
        }
    }
}

// =============================================================================
// Iterators
// =============================================================================

pub struct Iter<'a, K, V> {
    inner: std::slice::Iter<'a, Entry<K, V>>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|e| (&e.key, &e.value))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|e| (&e.key, &e.value))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
impl<K, V> FusedIterator for Iter<'_, K, V> {}

pub struct IntoIter<K, V> {
    inner: std::vec::IntoIter<Entry<K, V>>,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(Entry::into_parts)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(Entry::into_parts)
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}
impl<K, V> FusedIterator for IntoIter<K, V> {}


#[cfg(test)]
mod proptests;
