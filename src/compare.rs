//! Value comparators.
//!
//! A [`SortedValueMap`](crate::SortedValueMap) orders its entries by value
//! through a [`Compare`] implementation chosen at construction time. The
//! comparator must be consistent across calls; an inconsistent one leaves the
//! map's order unspecified (but never unsafe).

use std::cmp::Ordering;

/// Ordering over values of type `V`.
///
/// Implemented for any `Fn(&V, &V) -> Ordering`, so a closure can be passed
/// wherever a comparator is expected.
pub trait Compare<V: ?Sized> {
    fn compare(&self, a: &V, b: &V) -> Ordering;
}

impl<V: ?Sized, F> Compare<V> for F
where
    F: Fn(&V, &V) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &V, b: &V) -> Ordering {
        self(a, b)
    }
}

/// Ascending `PartialOrd` order. Incomparable pairs (`NaN`) compare `Equal`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Natural;

impl<V: PartialOrd + ?Sized> Compare<V> for Natural {
    #[inline]
    fn compare(&self, a: &V, b: &V) -> Ordering {
        a.partial_cmp(b).unwrap_or(Ordering::Equal)
    }
}

/// Descending `PartialOrd` order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Reverse;

impl<V: PartialOrd + ?Sized> Compare<V> for Reverse {
    #[inline]
    fn compare(&self, a: &V, b: &V) -> Ordering {
        b.partial_cmp(a).unwrap_or(Ordering::Equal)
    }
}

/// Orders values by a projection.
///
/// ```rust
/// use sorted_value_map::{compare::ByKey, SortedValueMap};
///
/// let mut map = SortedValueMap::with_comparator(ByKey(|s: &String| s.len()));
/// map.insert(1, "ccc".to_string());
/// map.insert(2, "a".to_string());
/// assert_eq!(map.get_key(0), Some(&2));
/// ```
#[derive(Clone, Copy, Debug)]
pub struct ByKey<F>(pub F);

impl<V, T, F> Compare<V> for ByKey<F>
where
    F: Fn(&V) -> T,
    T: Ord,
{
    #[inline]
    fn compare(&self, a: &V, b: &V) -> Ordering {
        (self.0)(a).cmp(&(self.0)(b))
    }
}

/// Named wrapper around a comparison closure.
///
/// Closures already implement [`Compare`]; this exists so the comparator type
/// can be spelled out in a struct field or type alias.
#[derive(Clone, Copy)]
pub struct FnCompare<F>(pub F);

impl<V: ?Sized, F> Compare<V> for FnCompare<F>
where
    F: Fn(&V, &V) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &V, b: &V) -> Ordering {
        (self.0)(a, b)
    }
}

impl<F> std::fmt::Debug for FnCompare<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FnCompare(..)")
    }
}
