// Test-only fixtures for end-to-end route planning scenarios.
//
// `Scenario` is a small fluent builder over a real `VoxelWorld` and
// `InventorySnapshot`: lay blocks down, hand the agent items, pick a goal,
// then `plan` from a start position through the real `RouteFinder`. Nothing
// here replaces planner logic; it only removes the boilerplate of wiring the
// shared registry, snapshots, and goal into a finder.
//
// Most scenarios stand the agent at (0, 1, 0) on a stone block at the
// origin, with the default build height of -64..320.
//
// See also: `tests/pathfinding.rs` for the scenario suite, `tests/properties.rs`
// for randomized invariants.

use std::sync::{Arc, Once};

use blockpath_planner::{
    BlockRegistry, BlockType, GoalScorer, InventorySnapshot, ItemStack, LoadedBounds,
    PlannerConfig, PosGoal, RouteFinder, RouteOutcome, SearchOptions, SearchReport, Vec3i,
    VoxelWorld,
};

/// Where most scenarios start.
pub const ORIGIN_FEET: Vec3i = Vec3i::new(0, 1, 0);

const MIN_Y: i32 = -64;
const MAX_Y: i32 = 320;

static TRACING: Once = Once::new();

/// Install a `RUST_LOG`-filtered subscriber once per test binary. Quiet by
/// default; run with `RUST_LOG=blockpath_planner=debug` to trace a search.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

pub struct Scenario {
    registry: Arc<BlockRegistry>,
    world: VoxelWorld,
    inventory: InventorySnapshot,
    config: PlannerConfig,
    options: SearchOptions,
}

impl Default for Scenario {
    fn default() -> Self {
        Self::new()
    }
}

impl Scenario {
    /// An all-air world with stone under `ORIGIN_FEET`.
    pub fn new() -> Self {
        init_tracing();
        let registry = Arc::new(BlockRegistry::vanilla());
        let mut world = VoxelWorld::new(Arc::clone(&registry), MIN_Y, MAX_Y);
        world.set(Vec3i::ZERO, BlockType::Stone);
        Self {
            registry,
            world,
            inventory: InventorySnapshot::new(),
            config: PlannerConfig::default(),
            options: SearchOptions::default(),
        }
    }

    pub fn block(mut self, pos: Vec3i, block: BlockType) -> Self {
        self.world.set(pos, block);
        self
    }

    /// Fill the inclusive box spanned by `a` and `b`.
    pub fn fill(mut self, a: Vec3i, b: Vec3i, block: BlockType) -> Self {
        self.world.fill(a, b, block);
        self
    }

    /// Only the given horizontal rectangle is loaded.
    pub fn loaded(mut self, bounds: LoadedBounds) -> Self {
        self.world = self.world.with_loaded_bounds(bounds);
        self
    }

    pub fn item(mut self, stack: ItemStack) -> Self {
        self.inventory = self.inventory.with_stack(stack);
        self
    }

    pub fn config(mut self, config: PlannerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn options(mut self, options: SearchOptions) -> Self {
        self.options = options;
        self
    }

    pub fn world(&self) -> &VoxelWorld {
        &self.world
    }

    /// A finder for `goal` over the current world and inventory.
    pub fn finder(&self, goal: impl GoalScorer + 'static) -> RouteFinder {
        RouteFinder::new(
            Arc::new(self.world.clone()),
            Arc::clone(&self.registry),
            Arc::new(self.inventory.clone()),
            Arc::new(goal),
            self.config.clone(),
        )
        .expect("scenario config is valid")
        .with_options(self.options)
    }

    /// Plan from `ORIGIN_FEET` to `goal`.
    pub fn plan_to(&self, goal: Vec3i) -> SearchReport {
        self.plan_from(ORIGIN_FEET, PosGoal::new(goal))
    }

    pub fn plan_from(&self, start: Vec3i, goal: impl GoalScorer + 'static) -> SearchReport {
        self.finder(goal)
            .find(start)
            .expect("scenario start is valid")
    }
}

/// Number of actions in a found route, or `None` for any other outcome.
pub fn found_len(report: &SearchReport) -> Option<usize> {
    match &report.outcome {
        RouteOutcome::Found(route) => Some(route.actions.len()),
        _ => None,
    }
}
