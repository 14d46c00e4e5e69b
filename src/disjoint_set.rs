use fnv::FnvHashMap;

use crate::cells::Cartesian2DCoordinate;

/// Union-find over grid coordinates.
///
/// Each key points at another key; a key pointing at itself is the representative of its
/// set. `union` only ever redirects one root at another root so chains never loop.
/// There is no path compression and no union by rank: the points-to map is observable and
/// must stay exactly as the unions left it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisjointSet {
    points_to: FnvHashMap<Cartesian2DCoordinate, Cartesian2DCoordinate>,
}

impl DisjointSet {
    pub fn new<I>(keys: I) -> DisjointSet
        where I: IntoIterator<Item = Cartesian2DCoordinate>
    {
        let keys = keys.into_iter();
        let mut points_to = FnvHashMap::with_capacity_and_hasher(keys.size_hint().0,
                                                                 Default::default());
        for key in keys {
            points_to.insert(key, key);
        }
        DisjointSet { points_to }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points_to.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points_to.is_empty()
    }

    #[inline]
    pub fn contains(&self, key: Cartesian2DCoordinate) -> bool {
        self.points_to.contains_key(&key)
    }

    /// Where `key` points, without following the chain.
    #[inline]
    pub fn points_to(&self, key: Cartesian2DCoordinate) -> Option<Cartesian2DCoordinate> {
        self.points_to.get(&key).cloned()
    }

    /// The representative of the set containing `key`, or None for an unregistered key.
    pub fn try_find(&self, key: Cartesian2DCoordinate) -> Option<Cartesian2DCoordinate> {
        let mut current = key;
        loop {
            let next = *self.points_to.get(&current)?;
            if next == current {
                return Some(current);
            }
            current = next;
        }
    }

    /// The representative of the set containing `key`.
    ///
    /// Panics if `key` was never registered: asking about a cell outside the grid is a bug
    /// in the caller.
    pub fn find(&self, key: Cartesian2DCoordinate) -> Cartesian2DCoordinate {
        match self.try_find(key) {
            Some(root) => root,
            None => panic!("disjoint set has no entry for {:?}", key),
        }
    }

    /// Point root `a` at root `b`.
    ///
    /// Panics if either key is unregistered or is not currently a root.
    pub fn union(&mut self, a: Cartesian2DCoordinate, b: Cartesian2DCoordinate) {
        assert_eq!(self.points_to(b), Some(b), "union target {:?} is not a root", b);
        match self.points_to.get_mut(&a) {
            Some(target) if *target == a => *target = b,
            _ => panic!("union source {:?} is not a root", a),
        }
    }

    /// Every (key, points-to) pair, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (Cartesian2DCoordinate, Cartesian2DCoordinate)> + '_ {
        self.points_to.iter().map(|(k, v)| (*k, *v))
    }
}
