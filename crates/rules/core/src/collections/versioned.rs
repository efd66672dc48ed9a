use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::marker::PhantomData;

/// Monotonic mutation counter of a [`VersionedMap`].
pub type Revision = u64;

/// A sorted map that stamps every mutation with a new revision.
///
/// Consumers remember the revision they last rendered and compare it with
/// [`revision`](Self::revision) to learn whether anything changed.
/// [`as_single_revision`](Self::as_single_revision) groups several mutations
/// so they are observed as a single step.
#[derive(Clone, Debug)]
pub struct VersionedMap<K, V> {
    entries: BTreeMap<K, V>,
    revision: Revision,
    /// `Some(dirty)` while inside a batch.
    batch: Option<bool>,
}

impl<K, V> Default for VersionedMap<K, V> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
            revision: 0,
            batch: None,
        }
    }
}

impl<K: Ord, V> VersionedMap<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn revision(&self) -> Revision {
        self.revision
    }

    fn touch(&mut self) {
        match &mut self.batch {
            Some(dirty) => *dirty = true,
            None => self.revision += 1,
        }
    }

    /// Inserts or replaces `key`. Always counts as a mutation.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let previous = self.entries.insert(key, value);
        self.touch();
        previous
    }

    /// Removes `key`. Only counts as a mutation if the key was present.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let removed = self.entries.remove(key);
        if removed.is_some() {
            self.touch();
        }
        removed
    }

    /// Removes every entry. Only counts as a mutation if the map was non-empty.
    pub fn clear(&mut self) {
        if !self.entries.is_empty() {
            self.entries.clear();
            self.touch();
        }
    }

    /// Keeps the entries for which `keep` returns true.
    pub fn retain(&mut self, mut keep: impl FnMut(&K, &mut V) -> bool) {
        let before = self.entries.len();
        self.entries.retain(|k, v| keep(k, v));
        if self.entries.len() != before {
            self.touch();
        }
    }

    /// Runs `f` with every mutation it performs coalesced into at most one
    /// revision bump. Nested calls join the outermost batch.
    pub fn as_single_revision<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        if self.batch.is_some() {
            return f(self);
        }
        self.batch = Some(false);
        let result = f(self);
        if self.batch.take() == Some(true) {
            self.revision += 1;
        }
        result
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.entries.get(key)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.entries.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.keys()
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Read-only, revision-stamped map that can be projected into derived views.
///
/// Values are handed out by value; implementors hold cheaply clonable values.
pub trait ProjectableMap<K, V> {
    /// Revision of the underlying storage.
    fn revision(&self) -> Revision;

    fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized;

    /// Entries in key order.
    fn entries(&self) -> Box<dyn Iterator<Item = (&K, V)> + '_>;

    fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.get_key_value(key).map(|(_, value)| value)
    }

    fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.get_key_value(key).is_some()
    }

    fn len(&self) -> usize {
        self.entries().count()
    }

    fn is_empty(&self) -> bool {
        self.entries().next().is_none()
    }

    /// A lazy view whose entries are `select(value, key)`; entries for which
    /// the selector returns `None` are hidden.
    fn projected<U, F>(&self, select: F) -> Projected<'_, Self, V, F>
    where
        F: Fn(&V, &K) -> Option<U>,
    {
        Projected {
            base: self,
            select,
            _value: PhantomData,
        }
    }
}

impl<K: Ord, V: Clone> ProjectableMap<K, V> for VersionedMap<K, V> {
    fn revision(&self) -> Revision {
        self.revision
    }

    fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.entries
            .get_key_value(key)
            .map(|(k, v)| (k, v.clone()))
    }

    fn entries(&self) -> Box<dyn Iterator<Item = (&K, V)> + '_> {
        Box::new(self.entries.iter().map(|(k, v)| (k, v.clone())))
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// A derived view over a [`ProjectableMap`]. Holds no storage of its own.
pub struct Projected<'a, M: ?Sized, V, F> {
    base: &'a M,
    select: F,
    _value: PhantomData<fn() -> V>,
}

impl<K, V, U, M, F> ProjectableMap<K, U> for Projected<'_, M, V, F>
where
    M: ProjectableMap<K, V> + ?Sized,
    F: Fn(&V, &K) -> Option<U>,
{
    fn revision(&self) -> Revision {
        self.base.revision()
    }

    fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, U)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let (k, v) = self.base.get_key_value(key)?;
        (self.select)(&v, k).map(|u| (k, u))
    }

    fn entries(&self) -> Box<dyn Iterator<Item = (&K, U)> + '_> {
        Box::new(
            self.base
                .entries()
                .filter_map(move |(k, v)| (self.select)(&v, k).map(|u| (k, u))),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> VersionedMap<String, i64> {
        let mut map = VersionedMap::new();
        map.insert("a".to_string(), 1);
        map.insert("b".to_string(), 2);
        map.insert("c".to_string(), 3);
        map
    }

    #[test]
    fn every_mutation_bumps_the_revision() {
        let mut map = sample();
        assert_eq!(map.revision(), 3);

        map.insert("a".to_string(), 10);
        assert_eq!(map.revision(), 4);

        map.remove("b");
        assert_eq!(map.revision(), 5);

        map.clear();
        assert_eq!(map.revision(), 6);
        assert!(map.is_empty());
    }

    #[test]
    fn no_op_removals_do_not_bump() {
        let mut map = sample();
        let before = map.revision();
        assert_eq!(map.remove("zzz"), None);
        map.retain(|_, _| true);
        assert_eq!(map.revision(), before);

        let mut empty: VersionedMap<String, i64> = VersionedMap::new();
        empty.clear();
        assert_eq!(empty.revision(), 0);
    }

    #[test]
    fn batches_bump_at_most_once() {
        let mut map = sample();
        let before = map.revision();

        map.as_single_revision(|m| {
            m.remove("a");
            m.insert("d".to_string(), 4);
            m.as_single_revision(|inner| inner.insert("e".to_string(), 5));
            m.clear();
            m.insert("f".to_string(), 6);
        });
        assert_eq!(map.revision(), before + 1);
        assert_eq!(map.len(), 1);

        let before = map.revision();
        let removed = map.as_single_revision(|m| m.remove("missing"));
        assert_eq!(removed, None);
        assert_eq!(map.revision(), before);
    }

    #[test]
    fn projection_filters_and_shares_the_revision() {
        let mut map = sample();
        {
            let odd = map.projected(|v: &i64, _k: &String| (v % 2 == 1).then(|| v * 10));
            assert_eq!(odd.revision(), map.revision());
            assert!(odd.contains_key("a"));
            assert!(!odd.contains_key("b"));
            assert!(!odd.contains_key("zzz"));
            assert_eq!(odd.get("c"), Some(30));
            assert_eq!(odd.len(), 2);
            let keys: Vec<_> = odd.entries().map(|(k, _)| k.clone()).collect();
            assert_eq!(keys, vec!["a".to_string(), "c".to_string()]);
        }

        map.insert("b".to_string(), 7);
        let odd = map.projected(|v: &i64, _k: &String| (v % 2 == 1).then_some(*v));
        assert_eq!(odd.revision(), map.revision());
        assert_eq!(odd.get("b"), Some(7));
        assert_eq!(odd.len(), 3);
    }

    #[test]
    fn projections_compose() {
        let map = sample();
        let doubled = map.projected(|v: &i64, _k: &String| Some(v * 2));
        let big = doubled.projected(|v: &i64, _k: &String| (*v > 2).then_some(*v));
        assert_eq!(big.revision(), map.revision());
        assert_eq!(big.len(), 2);
        assert!(!big.contains_key("a"));
        assert_eq!(big.get("c"), Some(6));
    }
}
