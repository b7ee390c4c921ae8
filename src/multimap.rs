use crate::avl::{Iter, Tree};
use crate::error::{Error, Result};
use std::{
    borrow::Borrow,
    cmp::{Eq, Ord, PartialEq},
    default::Default,
    fmt::{self, Debug, Formatter},
    iter::FromIterator,
    mem, slice,
};

/// The values bound to one key. A key holds a bare value until the first
/// duplicate insert promotes it to a collection; later duplicates append.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Values<V> {
    Single(V),
    Many(Vec<V>),
}

impl<V> Values<V> {
    pub fn as_slice(&self) -> &[V] {
        match self {
            Values::Single(v) => slice::from_ref(v),
            Values::Many(vs) => vs,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Values::Single(_) => 1,
            Values::Many(vs) => vs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_vec(self) -> Vec<V> {
        match self {
            Values::Single(v) => vec![v],
            Values::Many(vs) => vs,
        }
    }

    fn push(&mut self, value: V) {
        let vs = match mem::replace(self, Values::Many(Vec::new())) {
            Values::Single(v) => vec![v, value],
            Values::Many(mut vs) => {
                vs.push(value);
                vs
            }
        };
        *self = Values::Many(vs);
    }
}

/// An ordered map where duplicate keys aggregate instead of failing: every
/// insert under an already bound key appends to that key's value
/// collection, leaving the tree's shape and key count unchanged. Everything
/// else, including the order statistics queries, works as in
/// [`crate::map::Map`]; both are thin shells over the same balanced tree,
/// differing only in the merge policy handed to it.
///
/// # Examples
/// ```
/// use rankmap::multimap::MultiMap;
///
/// let mut m = MultiMap::new();
/// m.insert("pickaxe", 10);
/// m.insert("pickaxe", 25);
/// m.insert("shovel", 5);
///
/// assert_eq!(m.get("pickaxe"), Ok(&[10, 25][..]));
/// assert_eq!(m.len(), 2);
/// ```
#[derive(Clone)]
pub struct MultiMap<K: Ord, V> {
    len: usize,
    root: Tree<K, Values<V>>,
}

impl<K: Ord, V> Default for MultiMap<K, V> {
    fn default() -> MultiMap<K, V> {
        MultiMap::new()
    }
}

impl<K: Ord, V: PartialEq> PartialEq for MultiMap<K, V> {
    fn eq(&self, other: &MultiMap<K, V>) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<K: Ord, V: Eq> Eq for MultiMap<K, V> {}

impl<K: Ord + Debug, V: Debug> Debug for MultiMap<K, V> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for MultiMap<K, V> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut m = MultiMap::new();
        m.extend(iter);
        m
    }
}

impl<K: Ord, V> Extend<(K, V)> for MultiMap<K, V> {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.insert(k, v)
        }
    }
}

impl<'a, K: Ord, V> IntoIterator for &'a MultiMap<K, V> {
    type Item = (&'a K, &'a [V]);
    type IntoIter = MultiIter<'a, K, V>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Lazy ascending iterator over (key, values) pairs of a [`MultiMap`].
pub struct MultiIter<'a, K: Ord, V> {
    inner: Iter<'a, K, Values<V>>,
}

impl<'a, K: Ord, V> Iterator for MultiIter<'a, K, V> {
    type Item = (&'a K, &'a [V]);
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, vs)| (k, vs.as_slice()))
    }
}

impl<K: Ord, V> MultiMap<K, V> {
    /// Create a new empty multimap.
    pub fn new() -> Self {
        MultiMap {
            len: 0,
            root: Tree::new(),
        }
    }

    /// Insert v under k. A fresh key gets a new node; a bound key keeps its
    /// node and appends v to its collection, so the tree's shape and the
    /// key count never change on a duplicate. Runs in log(N) time.
    pub fn insert(&mut self, k: K, v: V) {
        let root = mem::take(&mut self.root);
        let (root, res) = root.insert(k, Values::Single(v), &mut |cur, incoming| {
            match incoming {
                Values::Single(v) => cur.push(v),
                Values::Many(vs) => {
                    for v in vs {
                        cur.push(v)
                    }
                }
            }
            Ok(())
        });
        self.root = root;
        // the merge policy never fails
        if let Ok(true) = res {
            self.len += 1
        }
    }

    /// Remove k and every value bound to it. Fails with
    /// [`Error::KeyNotFound`] if k is not bound, leaving the map untouched.
    pub fn remove<Q>(&mut self, k: &Q) -> Result<Values<V>>
    where
        Q: ?Sized + Ord,
        K: Borrow<Q>,
    {
        let root = mem::take(&mut self.root);
        let (root, res) = root.remove(k);
        self.root = root;
        res.map(|vs| {
            self.len -= 1;
            vs
        })
    }

    /// The values bound to k, oldest first. Fails with
    /// [`Error::KeyNotFound`] if k is not bound.
    pub fn get<Q>(&self, k: &Q) -> Result<&[V]>
    where
        Q: ?Sized + Ord,
        K: Borrow<Q>,
    {
        self.root.get(k).map(Values::as_slice).ok_or(Error::KeyNotFound)
    }

    pub fn contains_key<Q>(&self, k: &Q) -> bool
    where
        Q: ?Sized + Ord,
        K: Borrow<Q>,
    {
        self.root.get(k).is_some()
    }

    /// The smallest key and its values, or None if the map is empty.
    pub fn min(&self) -> Option<(&K, &[V])> {
        self.root.min().map(|(k, vs)| (k, vs.as_slice()))
    }

    /// The largest key and its values, or None if the map is empty.
    pub fn max(&self) -> Option<(&K, &[V])> {
        self.root.max().map(|(k, vs)| (k, vs.as_slice()))
    }

    /// The 1-indexed position of k among the distinct keys, if bound.
    pub fn rank<Q>(&self, k: &Q) -> Option<usize>
    where
        Q: ?Sized + Ord,
        K: Borrow<Q>,
    {
        self.root.rank(k)
    }

    /// The entry at the given 1-indexed rank among the distinct keys.
    pub fn select(&self, rank: usize) -> Option<(&K, &[V])> {
        self.root.select(rank).map(|(k, vs)| (k, vs.as_slice()))
    }

    /// The value collections whose key rank lies in [i, j], ascending. Out
    /// of range ranks shrink the result rather than failing, as in
    /// [`crate::map::Map::range_between`].
    pub fn range_between(&self, i: usize, j: usize) -> Vec<&[V]> {
        self.root
            .range_between(i, j)
            .into_iter()
            .map(Values::as_slice)
            .collect()
    }

    /// The number of distinct keys. O(1).
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterate over (key, values) pairs in ascending key order.
    pub fn iter(&self) -> MultiIter<'_, K, V> {
        MultiIter {
            inner: self.root.iter(),
        }
    }
}

impl<K: Ord, V> MultiMap<K, V> {
    #[allow(dead_code)]
    pub(crate) fn invariant(&self) {
        self.root.invariant(self.len)
    }
}
