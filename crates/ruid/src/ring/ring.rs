use std::{
    collections::{HashMap, hash_map::Entry},
    sync::Arc,
};

#[cfg(feature = "tracing")]
use tracing::instrument;

use super::{Md5Hasher, PlacementHasher, RingConfig};
use crate::{Base64Ext, Error, Id, Result, Ruid};

/// Derived lookup state, rebuilt from scratch on every membership change.
#[derive(Clone, Debug)]
struct Placement<ID> {
    /// Placement point -> owning node.
    ring: HashMap<ID, Arc<str>>,
    /// Every key of `ring`, ascending.
    sorted: Vec<ID>,
}

impl<ID> Default for Placement<ID> {
    fn default() -> Self {
        Self {
            ring: HashMap::new(),
            sorted: Vec::new(),
        }
    }
}

/// Weighted consistent-hashing ring mapping IDs to named nodes.
///
/// Each node gets a number of virtual placement points proportional to its
/// share of the total weight:
///
/// ```text
/// base   = max(config.virtual_nodes, max weight)
/// factor = max(1, node_count * weight * base / total_weight)
/// ```
///
/// Point `i` of node `n` comes from the digest of `"{n}-{i}"`, chunked into
/// as many IDs as fit ([`Id::extract_ids`]). Each node also owns its primary
/// key, the first ID of the digest of its bare name. Two nodes with the same
/// primary key are a configuration error ([`Error::RingConflict`]).
///
/// [`Ring::get`] returns the owner of the first point at or after the ID,
/// wrapping to the smallest point past the end. The answer depends only on the
/// current membership, never on the order changes were applied in.
///
/// Every mutation builds a complete new table and only then replaces the old
/// one, so a failed rebuild leaves the ring exactly as it was. A zero weight
/// still yields one point; call [`Ring::remove`] to take a node out.
///
/// The summed factors are capped by [`RingConfig::max_replicas`]; a membership
/// needing more fails with [`Error::RingTooLarge`] before anything is hashed.
/// The base grows with the heaviest weight, so weights far above
/// `virtual_nodes` need a raised limit.
///
/// Shares follow weights loosely at the default base of 50: a 1:2:4 ring
/// lands each node within about ±20% of its weight-proportional share.
/// Raising [`RingConfig::virtual_nodes`] tightens that (about ±15% at 1000).
///
/// Mutations take `&mut self`; share a ring between threads through
/// [`SharedRing`](crate::SharedRing) or an equivalent read-write lock.
///
/// # Example
///
/// ```
/// use ruid::Ring;
///
/// let mut ring: Ring = Ring::weighted([("shard-a", 1), ("shard-b", 2)]).unwrap();
/// let id = ruid::new();
/// let owner = ring.get(id).unwrap().to_owned();
/// assert!(owner == "shard-a" || owner == "shard-b");
///
/// ring.remove(["shard-a", "shard-b"]).unwrap();
/// assert_eq!(ring.get(id), None);
/// ```
#[derive(Clone, Debug)]
pub struct Ring<ID = Ruid, H = Md5Hasher>
where
    ID: Id,
    H: PlacementHasher,
{
    config: RingConfig,
    weights: HashMap<String, u64>,
    table: Placement<ID>,
    hasher: H,
}

impl<ID: Id> Ring<ID, Md5Hasher> {
    /// Builds a ring where every node has the default weight.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RingConflict`] if two nodes share a primary key, or
    /// [`Error::RingTooLarge`] if the weights need too many replicas.
    pub fn new<I, S>(nodes: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_config(RingConfig::default(), nodes)
    }

    /// Builds a ring from explicit node weights.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RingConflict`] if two nodes share a primary key, or
    /// [`Error::RingTooLarge`] if the weights need too many replicas.
    pub fn weighted<I, S>(weights: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, u64)>,
        S: Into<String>,
    {
        Self::weighted_with_config(RingConfig::default(), weights)
    }

    /// Like [`Ring::new`], with explicit tuning.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RingConflict`] if two nodes share a primary key, or
    /// [`Error::RingTooLarge`] if the weights need too many replicas.
    pub fn with_config<I, S>(config: RingConfig, nodes: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let weight = config.default_weight;
        Self::weighted_with_config(config, nodes.into_iter().map(|node| (node, weight)))
    }

    /// Like [`Ring::weighted`], with explicit tuning.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RingConflict`] if two nodes share a primary key, or
    /// [`Error::RingTooLarge`] if the weights need too many replicas.
    pub fn weighted_with_config<I, S>(config: RingConfig, weights: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, u64)>,
        S: Into<String>,
    {
        Self::with_hasher(config, weights, Md5Hasher)
    }
}

impl<ID, H> Ring<ID, H>
where
    ID: Id,
    H: PlacementHasher,
{
    /// Builds a ring that places nodes with a custom digest.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RingConflict`] if two nodes share a primary key, or
    /// [`Error::RingTooLarge`] if the weights need too many replicas.
    pub fn with_hasher<I, S>(config: RingConfig, weights: I, hasher: H) -> Result<Self>
    where
        I: IntoIterator<Item = (S, u64)>,
        S: Into<String>,
    {
        let mut ring = Self {
            config,
            weights: HashMap::new(),
            table: Placement::default(),
            hasher,
        };
        let weights = weights
            .into_iter()
            .map(|(node, weight)| (node.into(), weight))
            .collect();
        ring.publish(weights)?;
        Ok(ring)
    }

    /// Merges `weights` into the node set, adding new nodes and re-weighting
    /// existing ones.
    ///
    /// Rebuilds only if something actually changed; returns whether it did.
    /// Re-announcing the current membership is free.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RingConflict`] if the merged set has two nodes with
    /// the same primary key, or [`Error::RingTooLarge`] if it needs too many
    /// replicas. The ring is left unchanged.
    pub fn update<I, S>(&mut self, weights: I) -> Result<bool>
    where
        I: IntoIterator<Item = (S, u64)>,
        S: Into<String>,
    {
        let mut next = self.weights.clone();
        let mut changed = false;
        for (node, weight) in weights {
            let node = node.into();
            if next.get(&node) != Some(&weight) {
                next.insert(node, weight);
                changed = true;
            }
        }
        if changed {
            self.publish(next)?;
        }
        Ok(changed)
    }

    /// Adds `nodes` at the default weight, overwriting any existing weight.
    /// Always rebuilds.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RingConflict`] if a new node collides with an existing
    /// primary key, or [`Error::RingTooLarge`] if the set needs too many
    /// replicas. The ring is left unchanged.
    pub fn append<I, S>(&mut self, nodes: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut next = self.weights.clone();
        for node in nodes {
            next.insert(node.into(), self.config.default_weight);
        }
        self.publish(next)
    }

    /// Removes `nodes`. Unknown names are ignored. Always rebuilds.
    ///
    /// # Errors
    ///
    /// Removal cannot introduce a conflict, but the rebuild shares the
    /// fallible path with every other mutation.
    pub fn remove<I, S>(&mut self, nodes: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut next = self.weights.clone();
        for node in nodes {
            next.remove(node.as_ref());
        }
        self.publish(next)
    }

    /// Returns the node owning `id`, or `None` if the ring has no nodes.
    pub fn get(&self, id: ID) -> Option<&str> {
        self.locate(id).map(|node| &**node)
    }

    /// Routes an arbitrary byte key: digests it, takes the first ID of the
    /// digest and looks that up.
    pub fn get_key(&self, key: impl AsRef<[u8]>) -> Option<&str> {
        let digest = self.hasher.digest(key.as_ref());
        ID::extract_ids(&digest).next().and_then(|id| self.get(id))
    }

    pub(crate) fn locate(&self, id: ID) -> Option<&Arc<str>> {
        let sorted = &self.table.sorted;
        if sorted.is_empty() {
            return None;
        }
        let hash = id.self_hash();
        let mut pos = sorted.partition_point(|point| *point < hash);
        if pos == sorted.len() {
            pos = 0;
        }
        self.table.ring.get(&sorted[pos])
    }

    /// The primary placement key of `node`: the first ID extracted from the
    /// digest of its name. Defined for any name, member or not.
    pub fn key(&self, node: &str) -> Option<ID> {
        let digest = self.hasher.digest(node.as_bytes());
        ID::extract_ids(&digest).next().map(|id| id.self_hash())
    }

    pub fn config(&self) -> &RingConfig {
        &self.config
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn weight(&self, node: &str) -> Option<u64> {
        self.weights.get(node).copied()
    }

    pub fn weights(&self) -> &HashMap<String, u64> {
        &self.weights
    }

    pub fn contains(&self, node: &str) -> bool {
        self.weights.contains_key(node)
    }

    /// Number of distinct placement points.
    pub fn point_count(&self) -> usize {
        self.table.sorted.len()
    }

    /// Placement points in ascending order, paired with their owner.
    pub fn points(&self) -> impl Iterator<Item = (ID, &str)> + '_ {
        self.table
            .sorted
            .iter()
            .filter_map(|point| self.table.ring.get(point).map(|node| (*point, &**node)))
    }

    fn publish(&mut self, weights: HashMap<String, u64>) -> Result<()> {
        let table = self.circle(&weights)?;
        self.weights = weights;
        self.table = table;
        Ok(())
    }

    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip_all, fields(nodes = weights.len()))
    )]
    fn circle(&self, weights: &HashMap<String, u64>) -> Result<Placement<ID>> {
        if weights.is_empty() {
            return Ok(Placement::default());
        }

        // Sorted so replicas that land on the same key resolve the same way
        // on every build.
        let mut nodes: Vec<(&str, u64)> = weights.iter().map(|(n, w)| (n.as_str(), *w)).collect();
        nodes.sort_unstable_by(|a, b| a.0.cmp(b.0));

        let node_count = nodes.len() as u128;
        let total: u128 = nodes.iter().map(|&(_, w)| u128::from(w)).sum();
        let heaviest = nodes.iter().map(|&(_, w)| w).max().unwrap_or(0);
        let base = u128::from(self.config.virtual_nodes.max(heaviest));

        let factors: Vec<u64> = nodes
            .iter()
            .map(|&(_, weight)| replica_factor(node_count, u128::from(weight), base, total))
            .collect();
        let replicas: u128 = factors.iter().map(|&f| u128::from(f)).sum();
        if replicas > u128::from(self.config.max_replicas) {
            #[cfg(feature = "tracing")]
            tracing::warn!(replicas, limit = self.config.max_replicas, "ring too large");
            return Err(Error::RingTooLarge {
                replicas,
                limit: self.config.max_replicas,
            });
        }

        let mut ring = HashMap::new();
        let mut names = Vec::with_capacity(nodes.len());
        for (&(node, _), &factor) in nodes.iter().zip(&factors) {
            let name: Arc<str> = Arc::from(node);
            for i in 0..factor {
                let digest = self.hasher.digest(format!("{node}-{i}").as_bytes());
                for point in ID::extract_ids(&digest) {
                    ring.insert(point, Arc::clone(&name));
                }
            }
            names.push(name);
        }

        let mut primaries: HashMap<ID, &Arc<str>> = HashMap::with_capacity(names.len());
        for name in &names {
            let Some(key) = self.key(name) else {
                continue;
            };
            match primaries.entry(key) {
                Entry::Occupied(first) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(first = %first.get(), second = %name, ?key, "ring nodes conflict");
                    return Err(Error::RingConflict {
                        first: first.get().to_string(),
                        second: name.to_string(),
                        key: key.encode(),
                    });
                }
                Entry::Vacant(slot) => {
                    slot.insert(name);
                    ring.insert(key, Arc::clone(name));
                }
            }
        }

        let mut sorted: Vec<ID> = ring.keys().copied().collect();
        sorted.sort_unstable();

        #[cfg(feature = "tracing")]
        tracing::debug!(points = sorted.len(), "rebuilt placement table");

        Ok(Placement { ring, sorted })
    }
}

/// Virtual points for one node, never fewer than one.
fn replica_factor(node_count: u128, weight: u128, base: u128, total: u128) -> u64 {
    if total == 0 {
        return 1;
    }
    let factor = node_count.saturating_mul(weight).saturating_mul(base) / total;
    u64::try_from(factor).unwrap_or(u64::MAX).max(1)
}
