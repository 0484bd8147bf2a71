// blockpath_planner: route planning for agents in a voxel block world.
//
// Given a start position, a read-only view of the world, the agent's
// inventory, and a goal, the planner finds a cheap sequence of world actions
// (walk, jump, fall, gap jump, mine through, bridge, tower up, dig down) that
// gets the agent there. Every edge is simulated against a projected copy of
// the world and inventory, so a plan can mine a block early and place what
// it dropped later. The crate has no networking or game-client dependencies:
// the caller supplies blocks through `BlockAccessor` and executes the
// returned `WorldAction`s.
//
// Module overview:
// - `pathfinding.rs`: RouteFinder, weighted A* driver, outcomes, batch planning.
// - `graph.rs`:       MovementGraph, the adjacency function over search nodes.
// - `movement/`:      Movement templates (straight, diagonal, parkour, up, down).
// - `goal.rs`:        Goal scorers (position, column, height, escape, dynamic).
// - `node.rs`:        NodeState, the search vertex (position + projections).
// - `level.rs`:       ProjectedLevel, copy-on-write world overlay.
// - `inventory.rs`:   ProjectedInventory, copy-on-write inventory overlay.
// - `costs.rs`:       Movement cost constants and the mining-time formula.
// - `action.rs`:      WorldAction, the executable output, with tick budgets.
// - `block.rs`:       BlockType, BlockState, and the BlockAccessor trait.
// - `registry.rs`:    BlockRegistry, per-block physical properties.
// - `item.rs`:        Items, tools, and the inventory snapshot.
// - `world.rs`:       VoxelWorld, a sparse in-memory BlockAccessor.
// - `config.rs`:      PlannerConfig, budgets and path constraints (JSON).
// - `error.rs`:       PlanError for malformed input.
// - `types.rs`:       Vec3i, BlockFace, Cardinal.
//
// **Critical constraint: determinism.** A search is a pure function of its
// inputs. Hash maps are only used for lookups, never iterated to make a
// decision, and open-set ties are broken by a fixed rule.

pub mod action;
pub mod block;
pub mod config;
pub mod costs;
pub mod error;
pub mod goal;
pub mod graph;
pub mod inventory;
pub mod item;
pub mod level;
pub mod movement;
pub mod node;
pub mod pathfinding;
pub mod registry;
pub mod types;
pub mod world;

pub use action::WorldAction;
pub use block::{BlockAccessor, BlockState, BlockType};
pub use config::PlannerConfig;
pub use error::{PlanError, Result};
pub use goal::{AwayFromPosGoal, DynamicGoal, GoalScorer, PosGoal, XzGoal, YGoal};
pub use item::{InventorySnapshot, ItemStack, ItemType, ToolKind, ToolTier};
pub use pathfinding::{
    CancelToken, NotFoundReason, PlanJob, Route, RouteFinder, RouteOutcome, SearchOptions,
    SearchReport, SearchStats, plan_batch,
};
pub use registry::BlockRegistry;
pub use types::Vec3i;
pub use world::{LoadedBounds, VoxelWorld};
