use crate::error::{Error, Result};
use crate::primes::LargestPrimeIterator;
use std::cmp::max;
use std::mem;

const DEFAULT_HASH_BASE: u64 = 31;
const HASH_SEED: u64 = 31415;

/// Probe behavior counters, see [`LinearProbeTable::statistics`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ProbeStats {
    /// Operations that had to step past at least one occupied slot.
    pub conflicts: usize,
    /// Total number of displacement steps across all operations.
    pub probe_total: usize,
    /// The longest probe chain seen so far.
    pub probe_max: usize,
    /// Times the table grew and reinserted everything.
    pub rehashes: usize,
}

struct Probe {
    hit: Option<usize>,
    vacant: Option<usize>,
    steps: usize,
}

/// A string keyed hash table using linear probing for conflict resolution.
/// Table sizes are primes drawn from [`LargestPrimeIterator`]; the table
/// rehashes to roughly double its size whenever more than half the slots
/// are occupied, so probe chains stay short. Unlike the ordered maps,
/// inserting an existing key overwrites and returns the previous value.
///
/// # Examples
/// ```
/// use rankmap::probe::LinearProbeTable;
///
/// let mut t = LinearProbeTable::new(4);
/// t.insert("iron", 90);
/// assert_eq!(t.insert("iron", 95), Some(90));
/// assert_eq!(t.get("iron"), Ok(&95));
/// assert!(t.get("gold").is_err());
/// ```
pub struct LinearProbeTable<V> {
    slots: Vec<Option<(String, V)>>,
    len: usize,
    hash_base: u64,
    sizes: LargestPrimeIterator,
    stats: ProbeStats,
}

impl<V> LinearProbeTable<V> {
    /// A table sized for about expected_size entries.
    pub fn new(expected_size: usize) -> Self {
        Self::with_hash_base(expected_size, DEFAULT_HASH_BASE)
    }

    /// Same, with a custom base for the polynomial string hash.
    pub fn with_hash_base(expected_size: usize, hash_base: u64) -> Self {
        let mut sizes = LargestPrimeIterator::new(max(expected_size * 2, 5), 2);
        let cap = sizes.next().unwrap_or(3);
        let mut slots = Vec::with_capacity(cap);
        slots.resize_with(cap, || None);
        LinearProbeTable {
            slots,
            len: 0,
            hash_base,
            sizes,
            stats: ProbeStats::default(),
        }
    }

    // polynomial string hash reduced mod the table size at every step
    fn hash(&self, key: &str) -> usize {
        let size = self.slots.len() as u64;
        let mut value = 0u64;
        let mut a = HASH_SEED;
        for ch in key.chars() {
            value = (ch as u64 + a.wrapping_mul(value)) % size;
            a = a.wrapping_mul(self.hash_base) % (size - 1);
        }
        value as usize
    }

    // walk the cluster starting at the key's home slot: stop at the key
    // itself or at the first empty slot
    fn probe(&self, key: &str) -> Probe {
        let mut pos = self.hash(key);
        let mut steps = 0;
        for _ in 0..self.slots.len() {
            match &self.slots[pos] {
                None => {
                    return Probe {
                        hit: None,
                        vacant: Some(pos),
                        steps,
                    }
                }
                Some((k, _)) if k == key => {
                    return Probe {
                        hit: Some(pos),
                        vacant: None,
                        steps,
                    }
                }
                Some(_) => {
                    pos = (pos + 1) % self.slots.len();
                    steps += 1;
                }
            }
        }
        Probe {
            hit: None,
            vacant: None,
            steps,
        }
    }

    fn note(&mut self, steps: usize) {
        if steps > 0 {
            self.stats.conflicts += 1;
        }
        self.stats.probe_total += steps;
        self.stats.probe_max = max(self.stats.probe_max, steps);
    }

    // probe for a slot and write the binding, growing the count for a fresh
    // key. The load factor bound guarantees a vacancy.
    fn place(&mut self, key: String, value: V) -> Option<V> {
        let p = self.probe(&key);
        self.note(p.steps);
        match (p.hit, p.vacant) {
            (Some(pos), _) => self.slots[pos].replace((key, value)).map(|(_, v)| v),
            (None, Some(pos)) => {
                self.slots[pos] = Some((key, value));
                self.len += 1;
                None
            }
            (None, None) => panic!("probe table full"),
        }
    }

    /// Bind key -> value, returning the previous value if the key was
    /// already present. Amortized O(K) for a key of length K; grows the
    /// table when it is more than half full.
    pub fn insert(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        if self.len > self.slots.len() / 2 {
            self.rehash();
        }
        self.place(key.into(), value)
    }

    /// Look up the value for key. Fails with [`Error::KeyNotFound`] if the
    /// key is absent.
    pub fn get(&self, key: &str) -> Result<&V> {
        let pos = self.probe(key).hit.ok_or(Error::KeyNotFound)?;
        self.slots[pos]
            .as_ref()
            .map(|(_, v)| v)
            .ok_or(Error::KeyNotFound)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.probe(key).hit.is_some()
    }

    /// Remove the binding for key and return its value. Fails with
    /// [`Error::KeyNotFound`] if the key is absent. The rest of the probe
    /// cluster is reinserted so later lookups still find their slots.
    pub fn remove(&mut self, key: &str) -> Result<V> {
        let p = self.probe(key);
        self.note(p.steps);
        let pos = p.hit.ok_or(Error::KeyNotFound)?;
        let (_, value) = self.slots[pos].take().ok_or(Error::KeyNotFound)?;
        self.len -= 1;
        let mut next = (pos + 1) % self.slots.len();
        while let Some((k, v)) = self.slots[next].take() {
            self.len -= 1;
            self.place(k, v);
            next = (next + 1) % self.slots.len();
        }
        Ok(value)
    }

    // grow to the next prime size and reinsert every binding
    fn rehash(&mut self) {
        self.stats.rehashes += 1;
        let cap = self.sizes.next().unwrap_or(self.slots.len() * 2 + 1);
        let mut slots = Vec::with_capacity(cap);
        slots.resize_with(cap, || None);
        let old = mem::replace(&mut self.slots, slots);
        self.len = 0;
        for slot in old {
            if let Some((k, v)) = slot {
                self.place(k, v);
            }
        }
    }

    /// Every key currently in the table, in no particular order.
    pub fn keys(&self) -> Vec<&str> {
        self.slots
            .iter()
            .filter_map(|s| s.as_ref().map(|(k, _)| k.as_str()))
            .collect()
    }

    /// Every value currently in the table, in no particular order.
    pub fn values(&self) -> Vec<&V> {
        self.slots
            .iter()
            .filter_map(|s| s.as_ref().map(|(_, v)| v))
            .collect()
    }

    /// The number of bindings. O(1).
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == self.slots.len()
    }

    /// The current number of slots, always prime.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Counters describing probe behavior since the table was created.
    pub fn statistics(&self) -> ProbeStats {
        self.stats
    }
}
