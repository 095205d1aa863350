use super::*;

use proptest::prelude::*;
use proptest_derive::Arbitrary;
use std::collections::BTreeMap;
use std::fmt::Debug;

fn validate_map<K, V, C>(m: &SortedValueMap<K, V, C>)
where
    K: Hash + Eq + Clone + Debug,
    V: Clone + PartialEq + Debug,
    C: Compare<V>,
{
    assert_eq!(
        m.index.len(),
        m.entries.len(),
        "index and ordered sequence must hold the same number of keys"
    );

    for (i, e) in m.entries.iter().enumerate() {
        assert_eq!(
            m.index.get(&e.key),
            Some(&e.value),
            "index must hold the entry's value (key={:?})",
            e.key
        );
        assert_eq!(m.index_of(&e.key), Some(i), "index_of must be exact");
    }

    for pair in m.entries.windows(2) {
        assert_ne!(
            m.cmp.compare(&pair[0].value, &pair[1].value),
            Ordering::Greater,
            "entries must be sorted: {:?} before {:?}",
            pair[0],
            pair[1]
        );
    }
}

/// Reference model: a plain vector kept sorted by linear scan, ties appended
/// after equal values.
struct Model<C> {
    items: Vec<(u8, i8)>,
    cmp: C,
}

impl<C: Compare<i8>> Model<C> {
    fn position(&self, key: u8) -> Option<usize> {
        self.items.iter().position(|(k, _)| *k == key)
    }

    fn insert(&mut self, key: u8, value: i8) -> Option<usize> {
        if self.position(key).is_some() {
            return None;
        }
        let at = self
            .items
            .iter()
            .take_while(|(_, v)| self.cmp.compare(v, &value) != Ordering::Greater)
            .count();
        self.items.insert(at, (key, value));
        Some(at)
    }

    fn remove_at(&mut self, at: usize) -> Option<(u8, i8)> {
        (at < self.items.len()).then(|| self.items.remove(at))
    }
}

// Small key and value domains so duplicates and ties are frequent.
#[derive(Clone, Debug, Arbitrary)]
enum Op {
    #[proptest(weight = 5)]
    Insert(
        #[proptest(strategy = "0u8..48")] u8,
        #[proptest(strategy = "-8i8..8")] i8,
    ),
    #[proptest(weight = 2)]
    Remove(#[proptest(strategy = "0u8..48")] u8),
    RemoveAt(#[proptest(strategy = "0usize..64")] usize),
    Replace(
        #[proptest(strategy = "0u8..48")] u8,
        #[proptest(strategy = "-8i8..8")] i8,
    ),
    IndexOf(#[proptest(strategy = "0u8..48")] u8),
    Pop,
    Shift,
    PopMany(#[proptest(strategy = "0usize..4")] usize),
    ShiftMany(#[proptest(strategy = "0usize..4")] usize),
    RetainEvenKeys,
}

fn run_ops<C>(ops: Vec<Op>, cmp: C) -> Result<(), TestCaseError>
where
    C: Compare<i8> + Clone,
{
    let mut m: SortedValueMap<u8, i8, C> = SortedValueMap::with_comparator(cmp.clone());
    let mut model = Model {
        items: Vec::new(),
        cmp,
    };

    for op in ops {
        match op {
            Op::Insert(key, value) => {
                prop_assert_eq!(m.insert(key, value), model.insert(key, value));
            }
            Op::Remove(key) => {
                let expected = model.position(key).and_then(|at| model.remove_at(at));
                prop_assert_eq!(m.remove(&key).map(Entry::into_parts), expected);
            }
            Op::RemoveAt(at) => {
                prop_assert_eq!(m.remove_at(at).map(Entry::into_parts), model.remove_at(at));
            }
            Op::Replace(key, value) => {
                let old = model
                    .position(key)
                    .and_then(|at| model.remove_at(at))
                    .map(|(_, v)| v);
                model.insert(key, value);
                prop_assert_eq!(m.replace(key, value), old);
            }
            Op::IndexOf(key) => {
                prop_assert_eq!(m.index_of(&key), model.position(key));
                prop_assert_eq!(m.contains(&key), model.position(key).is_some());
            }
            Op::Pop => {
                prop_assert_eq!(m.pop().map(Entry::into_parts), model.items.pop());
            }
            Op::Shift => {
                prop_assert_eq!(m.shift().map(Entry::into_parts), model.remove_at(0));
            }
            Op::PopMany(n) => {
                let at = model.items.len().saturating_sub(n);
                let expected = model.items.split_off(at);
                let got: Vec<_> = m.pop_many(n).into_iter().map(Entry::into_parts).collect();
                prop_assert_eq!(got, expected);
            }
            Op::ShiftMany(n) => {
                let n = n.min(model.items.len());
                let expected: Vec<_> = model.items.drain(..n).collect();
                let got: Vec<_> = m.shift_many(n).into_iter().map(Entry::into_parts).collect();
                prop_assert_eq!(got, expected);
            }
            Op::RetainEvenKeys => {
                model.items.retain(|(k, _)| k % 2 == 0);
                m.retain(|k, _| k % 2 == 0);
            }
        }

        prop_assert_eq!(m.len(), model.items.len());
    }

    validate_map(&m);
    let got: Vec<(u8, i8)> = m.iter().map(|(k, v)| (*k, *v)).collect();
    prop_assert_eq!(got, model.items);
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        max_shrink_iters: 50_000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_equivalence_natural(ops in prop::collection::vec(any::<Op>(), 0..=500)) {
        run_ops(ops, Natural)?;
    }

    #[test]
    fn prop_equivalence_reverse(ops in prop::collection::vec(any::<Op>(), 0..=500)) {
        run_ops(ops, Reverse)?;
    }

    #[test]
    fn prop_equivalence_closure(ops in prop::collection::vec(any::<Op>(), 0..=500)) {
        // Coarse buckets: many distinct values compare equal.
        run_ops(ops, |a: &i8, b: &i8| (a / 4).cmp(&(b / 4)))?;
    }

    #[test]
    fn prop_sorted_after_every_insert(pairs in prop::collection::vec((any::<u16>(), any::<i32>()), 0..=300)) {
        let mut m = SortedValueMap::new();
        let mut seen = BTreeMap::new();
        for (key, value) in pairs {
            let fresh = !seen.contains_key(&key);
            seen.entry(key).or_insert(value);

            let inserted = m.insert(key, value);
            prop_assert_eq!(inserted.is_some(), fresh);
            if let Some(at) = inserted {
                prop_assert_eq!(m.get(at), Some(&value));
                prop_assert_eq!(m.get_key(at), Some(&key));
                prop_assert_eq!(m.index_of(&key), Some(at));
            }
            prop_assert!(m.values().zip(m.values().skip(1)).all(|(a, b)| a <= b));
        }

        prop_assert_eq!(m.len(), seen.len());
        for (key, value) in &seen {
            prop_assert_eq!(m.value_of(key), Some(value));
        }
        validate_map(&m);
    }

    #[test]
    fn prop_from_pairs_is_order_independent(pairs in prop::collection::btree_map(any::<u8>(), any::<i16>(), 0..=64)) {
        let forward: SortedValueMap<u8, i16> = pairs.iter().map(|(k, v)| (*k, *v)).collect();
        let backward: SortedValueMap<u8, i16> = pairs.iter().rev().map(|(k, v)| (*k, *v)).collect();

        let mut expected: Vec<i16> = pairs.values().copied().collect();
        expected.sort();
        prop_assert_eq!(forward.values().copied().collect::<Vec<_>>(), expected.clone());
        prop_assert_eq!(backward.values().copied().collect::<Vec<_>>(), expected);
        validate_map(&forward);
        validate_map(&backward);
    }
}

fn for_each_permutation<T: Clone>(items: &[T], mut f: impl FnMut(Vec<T>)) {
    fn rec<T: Clone>(items: &[T], used: &mut [bool], out: &mut Vec<T>, f: &mut impl FnMut(Vec<T>)) {
        if out.len() == items.len() {
            f(out.clone());
            return;
        }
        for i in 0..items.len() {
            if used[i] {
                continue;
            }
            used[i] = true;
            out.push(items[i].clone());
            rec(items, used, out, f);
            out.pop();
            used[i] = false;
        }
    }

    let mut used = vec![false; items.len()];
    let mut out = Vec::with_capacity(items.len());
    rec(items, &mut used, &mut out, &mut f);
}

// Three keys share a value so every order exercises the tie path.
const PAIRS: [(&str, u32); 6] = [("a", 2), ("b", 0), ("c", 2), ("d", 1), ("e", 2), ("f", 0)];

#[test]
fn exhaustive_insert_order_small_set() {
    for_each_permutation(&PAIRS, |perm| {
        let mut m = SortedValueMap::new();
        for &(k, v) in &perm {
            assert!(m.insert(k, v).is_some());
        }

        validate_map(&m);
        let values: Vec<u32> = m.values().copied().collect();
        assert_eq!(values, vec![0, 0, 1, 2, 2, 2]);

        // Equal values keep the order they were inserted in.
        let twos: Vec<&str> = perm.iter().filter(|(_, v)| *v == 2).map(|(k, _)| *k).collect();
        let got: Vec<&str> = m.as_slice()[3..].iter().map(|e| *e.key()).collect();
        assert_eq!(got, twos);
    });
}

#[test]
fn exhaustive_remove_order_small_set() {
    let base: SortedValueMap<&str, u32> = PAIRS.into();

    for_each_permutation(&PAIRS, |perm| {
        let mut m = base.clone();
        let mut len = m.len();

        for (k, v) in perm {
            assert_eq!(m.remove(k).map(Entry::into_parts), Some((k, v)));
            assert_eq!(m.remove(k), None);
            len -= 1;
            assert_eq!(m.len(), len);
            assert!(!m.contains(k));
            validate_map(&m);
        }
        assert!(m.is_empty());
        assert!(m.index.is_empty());
    });
}
