/// Virtual-node density used when no node outweighs it.
pub const VIRTUAL_NODES: u64 = 50;

/// Weight given to nodes added without an explicit weight.
pub const DEFAULT_WEIGHT: u64 = 1;

/// Upper bound on the virtual replicas a single rebuild may hash, summed over
/// all nodes. Each replica costs one digest and yields up to two points.
pub const MAX_REPLICAS: u64 = 1 << 18;

/// Tuning for a [`Ring`](crate::Ring).
///
/// # Example
///
/// ```
/// use ruid::RingConfig;
///
/// let config = RingConfig::default().with_virtual_nodes(200);
/// assert_eq!(config.virtual_nodes, 200);
/// assert_eq!(config.default_weight, 1);
/// ```
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RingConfig {
    /// Lower bound on the virtual-node base. The effective base is the larger
    /// of this and the heaviest node's weight.
    pub virtual_nodes: u64,
    /// Weight used by [`Ring::new`](crate::Ring::new) and
    /// [`Ring::append`](crate::Ring::append).
    pub default_weight: u64,
    /// Largest total replica count a rebuild accepts. Memberships whose
    /// weights would need more fail with
    /// [`Error::RingTooLarge`](crate::Error::RingTooLarge).
    pub max_replicas: u64,
}

impl Default for RingConfig {
    fn default() -> Self {
        Self {
            virtual_nodes: VIRTUAL_NODES,
            default_weight: DEFAULT_WEIGHT,
            max_replicas: MAX_REPLICAS,
        }
    }
}

impl RingConfig {
    #[must_use]
    pub const fn with_virtual_nodes(mut self, virtual_nodes: u64) -> Self {
        self.virtual_nodes = virtual_nodes;
        self
    }

    #[must_use]
    pub const fn with_default_weight(mut self, default_weight: u64) -> Self {
        self.default_weight = default_weight;
        self
    }

    #[must_use]
    pub const fn with_max_replicas(mut self, max_replicas: u64) -> Self {
        self.max_replicas = max_replicas;
        self
    }
}
