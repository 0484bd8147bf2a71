// Search vertex: where the agent stands plus the projected world and
// inventory it would have after following the path that led here.
//
// Identity is position-only. Two paths that reach the same block with
// different projections are the same vertex for the closed set; the search
// keeps whichever arrived with the lower cost. `Eq`/`Hash` are implemented by
// hand to make that explicit.

use crate::inventory::ProjectedInventory;
use crate::level::ProjectedLevel;
use crate::types::Vec3i;
use std::hash::{Hash, Hasher};

#[derive(Clone, Debug)]
pub struct NodeState {
    /// Feet position of the agent.
    pub position: Vec3i,
    pub level: ProjectedLevel,
    pub inventory: ProjectedInventory,
}

impl NodeState {
    pub fn new(position: Vec3i, level: ProjectedLevel, inventory: ProjectedInventory) -> Self {
        Self {
            position,
            level,
            inventory,
        }
    }

    /// Same position, projections, and inventory delta.
    pub fn same_projection(&self, other: &Self) -> bool {
        self.position == other.position
            && self.level == other.level
            && self.inventory == other.inventory
    }
}

impl PartialEq for NodeState {
    fn eq(&self, other: &Self) -> bool {
        self.position == other.position
    }
}

impl Eq for NodeState {}

impl Hash for NodeState {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.position.hash(state);
    }
}
