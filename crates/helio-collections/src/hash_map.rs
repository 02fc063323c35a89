//! Open-addressing hash table over integral keys.
//!
//! [`HashMap`] stores every entry in one contiguous array. Collisions
//! are resolved by in-array chaining: a colliding entry is placed in
//! the nearest vacant slot found by linear probing and linked onto the
//! tail of the chain through its home slot via a next-index, so chains
//! live inside the same backing array rather than external buckets.
//! Chains passing through a foreign home slot may merge; each slot has
//! at most one incoming link.
//!
//! Keys are restricted to integral types by the sealed [`IntKey`]
//! trait. The hash is the splitmix64 finalizer over the key bits,
//! reduced modulo capacity; the hasher is a type parameter so tests
//! (and callers with known key distributions) can substitute their
//! own.

use crate::vector::Vector;

mod sealed {
    pub trait Sealed {}
}

/// Integral key marker.
///
/// Implemented for the built-in integer types only; a non-integral key
/// type is a compile-time error.
pub trait IntKey: Copy + Eq + Default + sealed::Sealed {
    /// The key's bit pattern, widened (or truncated) to 64 bits, as
    /// fed to the hasher. Equality checks always use the full key.
    fn into_bits(self) -> u64;
}

macro_rules! impl_int_key {
    ($($ty:ty),* $(,)?) => {
        $(
            impl sealed::Sealed for $ty {}
            impl IntKey for $ty {
                fn into_bits(self) -> u64 {
                    self as u64
                }
            }
        )*
    };
}

impl_int_key!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);

/// Hash strategy mapping key bits to a slot distribution.
pub trait KeyHasher {
    /// Mix the key bits. The result is reduced modulo capacity by the
    /// map.
    fn hash(&self, bits: u64) -> u64;
}

/// Default hasher: the splitmix64 finalizer.
#[derive(Clone, Copy, Debug, Default)]
pub struct SplitMix64;

impl KeyHasher for SplitMix64 {
    fn hash(&self, bits: u64) -> u64 {
        let mut x = bits.wrapping_add(0x9E37_79B9_7F4A_7C15);
        x = (x ^ (x >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        x = (x ^ (x >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        x ^ (x >> 31)
    }
}

struct Entry<K, T> {
    key: K,
    value: Option<T>,
    next: Option<usize>,
}

impl<K: Default, T> Default for Entry<K, T> {
    fn default() -> Self {
        Self {
            key: K::default(),
            value: None,
            next: None,
        }
    }
}

/// Open-addressing hash map with in-array collision chains.
///
/// Load factor is kept at or below 0.7: an insert that would exceed it
/// rehashes into a table of double the capacity (or 8, from empty)
/// first.
pub struct HashMap<K, T, H = SplitMix64> {
    entries: Vector<Entry<K, T>>,
    len: usize,
    hasher: H,
}

impl<K: IntKey, T> HashMap<K, T> {
    /// Create an empty map with the default hasher, without
    /// allocating.
    pub fn new() -> Self {
        Self::with_hasher(SplitMix64)
    }
}

impl<K: IntKey, T, H: KeyHasher> HashMap<K, T, H> {
    /// Create an empty map with a caller-supplied hasher.
    pub fn with_hasher(hasher: H) -> Self {
        Self {
            entries: Vector::new(),
            len: 0,
            hasher,
        }
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the map holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of slots in the backing array.
    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    fn home(&self, key: K) -> usize {
        (self.hasher.hash(key.into_bits()) % self.capacity() as u64) as usize
    }

    /// Insert or overwrite. Returns the previous value for the key, if
    /// any.
    pub fn insert(&mut self, key: K, value: T) -> Option<T> {
        if (self.len + 1) * 10 > self.capacity() * 7 {
            let grown = usize::max(self.capacity() * 2, 8);
            self.rehash(grown);
        }

        // Walk the chain through the home slot looking for the key.
        let mut idx = self.home(key);
        loop {
            let entry = &mut self.entries[idx];
            if entry.value.is_some() && entry.key == key {
                return entry.value.replace(value);
            }
            match entry.next {
                Some(nx) => idx = nx,
                None => break,
            }
        }

        // idx is now the tail of the chain through the home slot, or
        // the home slot itself. Claim the nearest vacant slot by
        // linear probe and link it on. The load-factor bound
        // guarantees a vacant slot exists.
        let cap = self.capacity();
        let mut probe = idx;
        while self.entries[probe].value.is_some() {
            probe = (probe + 1) % cap;
        }
        self.entries[probe].key = key;
        self.entries[probe].value = Some(value);
        if probe != idx {
            self.entries[idx].next = Some(probe);
        }
        self.len += 1;
        None
    }

    fn find_with_parent(&self, key: K) -> Option<(usize, Option<usize>)> {
        if self.len == 0 {
            return None;
        }
        let mut parent = None;
        let mut idx = self.home(key);
        loop {
            let entry = &self.entries[idx];
            if entry.value.is_some() && entry.key == key {
                return Some((idx, parent));
            }
            parent = Some(idx);
            idx = entry.next?;
        }
    }

    /// The value for `key`, if present. Pure read; never materializes
    /// an entry.
    pub fn get(&self, key: K) -> Option<&T> {
        let (idx, _) = self.find_with_parent(key)?;
        self.entries[idx].value.as_ref()
    }

    /// Mutable access to the value for `key`, if present.
    pub fn get_mut(&mut self, key: K) -> Option<&mut T> {
        let (idx, _) = self.find_with_parent(key)?;
        self.entries[idx].value.as_mut()
    }

    /// Whether `key` has a live entry. Agrees with [`get`](Self::get)
    /// by construction.
    pub fn contains(&self, key: K) -> bool {
        self.find_with_parent(key).is_some()
    }

    /// The value for `key`, inserting a default first if absent.
    ///
    /// This is the explicit opt-in for read-through materialization;
    /// use [`get`](Self::get) for side-effect-free lookup.
    pub fn get_or_insert_default(&mut self, key: K) -> &mut T
    where
        T: Default,
    {
        if self.find_with_parent(key).is_none() {
            self.insert(key, T::default());
        }
        let (idx, _) = self
            .find_with_parent(key)
            .expect("key present after insert");
        self.entries[idx].value.as_mut().expect("found entry is taken")
    }

    /// Remove `key`, returning its value.
    ///
    /// The chain suffix past the erased entry is unlinked and
    /// reinserted: payloads shift back toward the freed slots and the
    /// links are rebuilt, so every surviving key stays reachable from
    /// its home slot and no tombstones remain.
    pub fn erase(&mut self, key: K) -> Option<T> {
        let (idx, parent) = self.find_with_parent(key)?;
        let removed = self.entries[idx].value.take();
        self.len -= 1;
        if let Some(p) = parent {
            self.entries[p].next = None;
        }

        let mut cursor = self.entries[idx].next.take();
        self.entries[idx].key = K::default();

        let mut displaced: Vector<(K, T)> = Vector::new();
        while let Some(nx) = cursor {
            let value = self.entries[nx]
                .value
                .take()
                .expect("chained entry is taken");
            let key = self.entries[nx].key;
            cursor = self.entries[nx].next.take();
            self.entries[nx].key = K::default();
            self.len -= 1;
            displaced.push((key, value));
        }
        while !displaced.is_empty() {
            let (k, v) = displaced.erase_index(0);
            self.insert(k, v);
        }

        removed
    }

    /// Rehash into a table of exactly `n` slots. No-op if `n` does not
    /// exceed the current capacity. Every live mapping is reinserted.
    pub fn reserve(&mut self, n: usize) {
        if n > self.capacity() {
            self.rehash(n);
        }
    }

    fn rehash(&mut self, n: usize) {
        let mut fresh = Vector::new();
        fresh.resize(n);
        let mut old = std::mem::replace(&mut self.entries, fresh);
        self.len = 0;
        for entry in old.iter_mut() {
            if let Some(value) = entry.value.take() {
                self.insert(entry.key, value);
            }
        }
    }

    /// Drop every entry, retaining capacity.
    pub fn clear(&mut self) {
        for entry in self.entries.iter_mut() {
            *entry = Entry::default();
        }
        self.len = 0;
    }

    /// Iterate over live `(key, value)` pairs in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (K, &T)> {
        self.entries
            .iter()
            .filter_map(|e| e.value.as_ref().map(|v| (e.key, v)))
    }
}

impl<K: IntKey, T> Default for HashMap<K, T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_get_overwrite() {
        let mut map = HashMap::new();
        assert_eq!(map.insert(1u32, "a"), None);
        assert_eq!(map.insert(2u32, "b"), None);
        assert_eq!(map.get(1), Some(&"a"));
        assert_eq!(map.get(2), Some(&"b"));
        assert_eq!(map.insert(1, "c"), Some("a"));
        assert_eq!(map.get(1), Some(&"c"));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn get_is_side_effect_free() {
        let mut map: HashMap<u64, u32> = HashMap::new();
        map.insert(7, 1);
        assert_eq!(map.get(8), None);
        assert!(!map.contains(8));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn get_or_insert_default_materializes() {
        let mut map: HashMap<u64, u32> = HashMap::new();
        assert!(!map.contains(5));
        *map.get_or_insert_default(5) += 3;
        assert!(map.contains(5));
        assert_eq!(map.get(5), Some(&3));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn erase_returns_value() {
        let mut map = HashMap::new();
        map.insert(10i32, "x");
        assert_eq!(map.erase(10), Some("x"));
        assert_eq!(map.erase(10), None);
        assert!(!map.contains(10));
        assert_eq!(map.len(), 0);
    }

    #[test]
    fn negative_keys_hash_fine() {
        let mut map = HashMap::new();
        map.insert(-3i64, "neg");
        map.insert(3i64, "pos");
        assert_eq!(map.get(-3), Some(&"neg"));
        assert_eq!(map.get(3), Some(&"pos"));
    }

    #[test]
    fn load_factor_stays_at_or_below_seven_tenths() {
        let mut map = HashMap::new();
        for k in 0u64..200 {
            map.insert(k, k * 2);
            assert!(
                map.len() * 10 <= map.capacity() * 7,
                "load factor exceeded after inserting {k}"
            );
        }
    }

    #[test]
    fn rehash_preserves_every_mapping() {
        let mut map = HashMap::new();
        for k in 0u64..100 {
            map.insert(k, k + 1000);
        }
        map.reserve(1024);
        assert_eq!(map.capacity(), 1024);
        assert_eq!(map.len(), 100);
        for k in 0u64..100 {
            assert_eq!(map.get(k), Some(&(k + 1000)));
        }
    }

    /// Sends every key to slot 0, forcing one maximal chain.
    #[derive(Default)]
    struct Collide;

    impl KeyHasher for Collide {
        fn hash(&self, _bits: u64) -> u64 {
            0
        }
    }

    #[test]
    fn colliding_keys_chain_and_stay_reachable() {
        let mut map: HashMap<u32, u32, Collide> = HashMap::with_hasher(Collide);
        for k in 0..5 {
            map.insert(k, k * 100);
        }
        for k in 0..5 {
            assert_eq!(map.get(k), Some(&(k * 100)), "key {k} lost in chain");
        }
    }

    #[test]
    fn erase_chain_head_shifts_back() {
        let mut map: HashMap<u32, u32, Collide> = HashMap::with_hasher(Collide);
        map.insert(1, 10);
        map.insert(2, 20);
        map.insert(3, 30);
        assert_eq!(map.erase(1), Some(10));
        assert_eq!(map.get(2), Some(&20));
        assert_eq!(map.get(3), Some(&30));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn erase_chain_interior_and_tail() {
        let mut map: HashMap<u32, u32, Collide> = HashMap::with_hasher(Collide);
        for k in 1..=4 {
            map.insert(k, k);
        }
        assert_eq!(map.erase(2), Some(2));
        assert_eq!(map.erase(4), Some(4));
        assert_eq!(map.get(1), Some(&1));
        assert_eq!(map.get(3), Some(&3));
        assert!(!map.contains(2));
        assert!(!map.contains(4));
    }

    /// Identity hasher: home slot is the key modulo capacity.
    #[derive(Default)]
    struct Identity;

    impl KeyHasher for Identity {
        fn hash(&self, bits: u64) -> u64 {
            bits
        }
    }

    #[test]
    fn erase_keeps_merged_chains_reachable() {
        // Keys 0 and 8 share home slot 0 (capacity 8); key 1's home
        // slot is occupied by 8's spill, so its chain merges with
        // theirs. Erasing the head must not strand the merged keys.
        let mut map: HashMap<u64, &str, Identity> = HashMap::with_hasher(Identity);
        map.insert(0, "zero");
        map.insert(8, "eight");
        map.insert(1, "one");
        map.insert(16, "sixteen");
        assert_eq!(map.capacity(), 8);

        assert_eq!(map.erase(0), Some("zero"));
        assert_eq!(map.get(8), Some(&"eight"));
        assert_eq!(map.get(1), Some(&"one"));
        assert_eq!(map.get(16), Some(&"sixteen"));
    }

    #[test]
    fn iter_visits_every_live_entry_once() {
        let mut map = HashMap::new();
        for k in 0u32..10 {
            map.insert(k, k);
        }
        map.erase(3);
        map.erase(7);
        let mut seen: Vec<u32> = map.iter().map(|(k, _)| k).collect();
        seen.sort_unstable();
        assert_eq!(seen, [0, 1, 2, 4, 5, 6, 8, 9]);
    }

    #[cfg(not(miri))]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        #[derive(Clone, Debug)]
        enum Op {
            Insert(u16, i32),
            Erase(u16),
        }

        fn op_strategy() -> impl Strategy<Value = Op> {
            // Keys drawn from a small range so chains and merges occur
            // constantly.
            prop_oneof![
                (0u16..64, any::<i32>()).prop_map(|(k, v)| Op::Insert(k, v)),
                (0u16..64).prop_map(Op::Erase),
            ]
        }

        proptest! {
            #[test]
            fn matches_std_hashmap_model(ops in proptest::collection::vec(op_strategy(), 1..128)) {
                let mut map: HashMap<u16, i32> = HashMap::new();
                let mut model = std::collections::HashMap::new();
                for op in ops {
                    match op {
                        Op::Insert(k, v) => {
                            prop_assert_eq!(map.insert(k, v), model.insert(k, v));
                            prop_assert!(map.len() * 10 <= map.capacity() * 7);
                        }
                        Op::Erase(k) => {
                            prop_assert_eq!(map.erase(k), model.remove(&k));
                        }
                    }
                    prop_assert_eq!(map.len(), model.len());
                }
                for (&k, &v) in &model {
                    prop_assert_eq!(map.get(k), Some(&v));
                }
                prop_assert_eq!(map.iter().count(), model.len());
            }
        }
    }
}
