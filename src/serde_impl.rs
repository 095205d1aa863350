//! `serde` support: a map serializes as its ordered sequence of
//! `(key, value)` pairs and deserializes by re-inserting each pair, so the
//! sort order and key uniqueness are re-established on load.

use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;

use serde::de::{Deserialize, Deserializer, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeSeq, Serializer};

use crate::{Compare, SortedValueMap};

impl<K, V, C> Serialize for SortedValueMap<K, V, C>
where
    K: Serialize,
    V: Serialize,
{
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for pair in self.iter() {
            seq.serialize_element(&pair)?;
        }
        seq.end()
    }
}

struct PairsVisitor<K, V, C> {
    _marker: PhantomData<fn() -> SortedValueMap<K, V, C>>,
}

impl<'de, K, V, C> Visitor<'de> for PairsVisitor<K, V, C>
where
    K: Deserialize<'de> + Hash + Eq + Clone,
    V: Deserialize<'de> + Clone,
    C: Compare<V> + Default,
{
    type Value = SortedValueMap<K, V, C>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a sequence of (key, value) pairs")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let capacity = seq.size_hint().unwrap_or(0).min(4096);
        let mut map = SortedValueMap::with_capacity_and_comparator(capacity, C::default());
        while let Some((key, value)) = seq.next_element::<(K, V)>()? {
            map.insert(key, value);
        }
        Ok(map)
    }
}

impl<'de, K, V, C> Deserialize<'de> for SortedValueMap<K, V, C>
where
    K: Deserialize<'de> + Hash + Eq + Clone,
    V: Deserialize<'de> + Clone,
    C: Compare<V> + Default,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_seq(PairsVisitor {
            _marker: PhantomData,
        })
    }
}
