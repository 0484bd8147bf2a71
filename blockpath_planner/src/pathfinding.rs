// Weighted A* over the implicit movement graph.
//
// The open set is a `BinaryHeap` of `OpenEntry` with reversed ordering (a
// min-heap on `f = g + weight * h`). Ties on `f` go to the larger `g`, then
// to the entry generated first, so the search is a pure function of its
// inputs. Nodes live in an arena `Vec` and point at their parent by index;
// `best` maps each discovered position to the arena index of its cheapest
// known route, and `closed` holds expanded positions. When a cheaper route to
// a queued position turns up, the new entry simply supersedes the old one,
// which is skipped as stale when it is eventually popped.
//
// Node identity is the feet position alone: once a position is expanded, a
// later route that reaches it with a different world or inventory
// projection is ignored.
//
// A search ends in one of these ways:
// - the goal's `is_finished` accepts a popped node (`Found`);
// - an expansion reads unloaded terrain. The route to the node closest to
//   the goal is returned with a trailing `Recalculate` (`Partial`), unless
//   that node is the start (`NotFound(AlreadyClosest)`);
// - the open set runs dry (`NotFound(Exhausted)`);
// - the iteration or wall-clock budget runs out (`NotFound(BudgetExceeded)`);
// - the caller's `CancelToken` fires (`Cancelled`). The token is checked
//   once per pop, before anything else.
//
// See also: `graph.rs` for the adjacency function, `goal.rs` for the
// heuristic and termination test, `config.rs` for the budgets.
//
// **Critical constraint: determinism.** The same world, inventory, goal, and
// config always produce the same route. Nothing here iterates a hash map to
// make a decision.

use crate::action::WorldAction;
use crate::block::BlockAccessor;
use crate::config::PlannerConfig;
use crate::error::{PlanError, Result};
use crate::goal::GoalScorer;
use crate::graph::MovementGraph;
use crate::inventory::ProjectedInventory;
use crate::item::InventorySnapshot;
use crate::level::ProjectedLevel;
use crate::node::NodeState;
use crate::registry::BlockRegistry;
use crate::types::Vec3i;
use rayon::prelude::*;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// One position along a route, with the cost of reaching it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteStep {
    pub position: Vec3i,
    pub g: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// Actions in execution order.
    pub actions: Vec<WorldAction>,
    pub total_cost: f64,
    /// Positions from the start to the end of the route, inclusive.
    pub steps: Vec<RouteStep>,
}

impl Route {
    pub fn end(&self) -> Option<Vec3i> {
        self.steps.last().map(|step| step.position)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotFoundReason {
    /// Every reachable position was expanded.
    Exhausted,
    /// The iteration or time budget ran out first.
    BudgetExceeded,
    /// Loaded terrain ends before the agent can get any closer.
    AlreadyClosest,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum RouteOutcome {
    Found(Route),
    /// A route to the edge of loaded terrain, ending in `Recalculate`.
    Partial(Route),
    NotFound(NotFoundReason),
    Cancelled,
}

impl RouteOutcome {
    pub fn route(&self) -> Option<&Route> {
        match self {
            RouteOutcome::Found(route) | RouteOutcome::Partial(route) => Some(route),
            RouteOutcome::NotFound(_) | RouteOutcome::Cancelled => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, RouteOutcome::Found(_))
    }

    fn label(&self) -> &'static str {
        match self {
            RouteOutcome::Found(_) => "found",
            RouteOutcome::Partial(_) => "partial",
            RouteOutcome::NotFound(NotFoundReason::Exhausted) => "exhausted",
            RouteOutcome::NotFound(NotFoundReason::BudgetExceeded) => "budget exceeded",
            RouteOutcome::NotFound(NotFoundReason::AlreadyClosest) => "already closest",
            RouteOutcome::Cancelled => "cancelled",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchStats {
    /// Nodes taken off the open set and expanded.
    pub expansions: u64,
    /// Feasible edges returned by the graph across all expansions.
    pub generated_edges: u64,
    pub elapsed: Duration,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchReport {
    pub outcome: RouteOutcome,
    pub stats: SearchStats,
}

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOptions {
    /// Prepend a move to the start block so the agent centres itself first.
    pub requires_repositioning: bool,
}

/// Cooperative cancellation flag shared between a search and its caller.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, AtomicOrdering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(AtomicOrdering::Relaxed)
    }
}

// ---------------------------------------------------------------------------
// Search internals
// ---------------------------------------------------------------------------

struct RouteNode {
    state: NodeState,
    parent: Option<usize>,
    /// Actions of the edge that led here.
    actions: SmallVec<[WorldAction; 4]>,
    g: f64,
    /// Unweighted goal score.
    h: f64,
}

/// Entry in the open set (min-heap via reversed ordering).
struct OpenEntry {
    index: usize,
    f: f64,
    g: f64,
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenEntry {}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Smallest f is "greatest"; then largest g; then oldest entry.
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| self.g.total_cmp(&other.g))
            .then_with(|| other.index.cmp(&self.index))
    }
}

fn reconstruct(arena: &[RouteNode], end: usize, trailer: Option<WorldAction>) -> Route {
    let mut chain = Vec::new();
    let mut cursor = Some(end);
    while let Some(index) = cursor {
        chain.push(index);
        cursor = arena[index].parent;
    }
    chain.reverse();

    let mut actions = Vec::new();
    let mut steps = Vec::with_capacity(chain.len());
    for &index in &chain {
        let node = &arena[index];
        actions.extend(node.actions.iter().cloned());
        steps.push(RouteStep {
            position: node.state.position,
            g: node.g,
        });
    }
    actions.extend(trailer);
    Route {
        actions,
        total_cost: arena[end].g,
        steps,
    }
}

// ---------------------------------------------------------------------------
// RouteFinder
// ---------------------------------------------------------------------------

/// A configured search against one world and inventory snapshot.
///
/// Cheap to share: every input is behind an `Arc`, and `find` keeps all of
/// its mutable state on the stack.
#[derive(Clone)]
pub struct RouteFinder {
    graph: MovementGraph,
    level: ProjectedLevel,
    inventory: ProjectedInventory,
    goal: Arc<dyn GoalScorer>,
    options: SearchOptions,
}

impl RouteFinder {
    /// Fails with `InvalidConfig` if `config` does not validate.
    pub fn new(
        accessor: Arc<dyn BlockAccessor>,
        registry: Arc<BlockRegistry>,
        inventory: Arc<InventorySnapshot>,
        goal: Arc<dyn GoalScorer>,
        config: PlannerConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            graph: MovementGraph::new(config),
            level: ProjectedLevel::new(accessor, Arc::clone(&registry)),
            inventory: ProjectedInventory::new(inventory, registry),
            goal,
            options: SearchOptions::default(),
        })
    }

    pub fn with_options(mut self, options: SearchOptions) -> Self {
        self.options = options;
        self
    }

    pub fn config(&self) -> &PlannerConfig {
        self.graph.config()
    }

    pub fn find(&self, start: Vec3i) -> Result<SearchReport> {
        self.find_cancellable(start, &CancelToken::new())
    }

    pub fn find_cancellable(&self, start: Vec3i, cancel: &CancelToken) -> Result<SearchReport> {
        self.check_start(start)?;
        let mut search = Search::new(self, start);
        let outcome = search.run(cancel);
        let stats = SearchStats {
            elapsed: search.started.elapsed(),
            ..search.stats
        };
        info!(
            outcome = outcome.label(),
            elapsed_ms = stats.elapsed.as_millis() as u64,
            expansions = stats.expansions,
            "route search finished"
        );
        Ok(SearchReport { outcome, stats })
    }

    fn check_start(&self, start: Vec3i) -> Result<()> {
        if self.level.is_outside_build_height(start.y) {
            return Err(PlanError::StartOutsideWorld(start));
        }
        let feet = self.level.block_state(start);
        let floor = start.down(1);
        if feet.is_void()
            || (!self.level.is_outside_build_height(floor.y)
                && self.level.block_state(floor).is_void())
        {
            return Err(PlanError::StartUnloaded(start));
        }
        if feet.is_full_block() {
            return Err(PlanError::StartInsideSolid(start));
        }
        Ok(())
    }
}

struct Search<'a> {
    finder: &'a RouteFinder,
    arena: Vec<RouteNode>,
    open: BinaryHeap<OpenEntry>,
    best: FxHashMap<Vec3i, usize>,
    closed: FxHashSet<Vec3i>,
    /// Arena index of the node with the lowest goal score so far.
    closest: usize,
    stats: SearchStats,
    started: Instant,
    last_progress: Instant,
}

impl<'a> Search<'a> {
    fn new(finder: &'a RouteFinder, start: Vec3i) -> Self {
        let now = Instant::now();
        let mut actions = SmallVec::new();
        if finder.options.requires_repositioning {
            actions.push(WorldAction::MoveTo {
                pos: start,
                diagonal: false,
            });
        }
        let h = finder.goal.score(start);
        debug!(%start, h, "starting route search");

        let mut best = FxHashMap::default();
        best.insert(start, 0);
        let mut open = BinaryHeap::new();
        open.push(OpenEntry {
            index: 0,
            f: finder.config().heuristic_weight * h,
            g: 0.0,
        });
        Self {
            finder,
            arena: vec![RouteNode {
                state: NodeState::new(start, finder.level.clone(), finder.inventory.clone()),
                parent: None,
                actions,
                g: 0.0,
                h,
            }],
            open,
            best,
            closed: FxHashSet::default(),
            closest: 0,
            stats: SearchStats::default(),
            started: now,
            last_progress: now,
        }
    }

    fn run(&mut self, cancel: &CancelToken) -> RouteOutcome {
        let finder = self.finder;
        let config = finder.config();
        let deadline = config.max_duration().map(|budget| self.started + budget);

        loop {
            if cancel.is_cancelled() {
                return RouteOutcome::Cancelled;
            }
            if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
                return RouteOutcome::NotFound(NotFoundReason::BudgetExceeded);
            }
            let Some(entry) = self.open.pop() else {
                return RouteOutcome::NotFound(NotFoundReason::Exhausted);
            };
            let current = entry.index;
            let pos = self.arena[current].state.position;
            if self.closed.contains(&pos) || self.best.get(&pos) != Some(&current) {
                continue;
            }
            if finder.goal.is_finished(&self.arena[current].state) {
                return RouteOutcome::Found(reconstruct(&self.arena, current, None));
            }
            if self.stats.expansions >= config.max_iterations {
                return RouteOutcome::NotFound(NotFoundReason::BudgetExceeded);
            }

            self.closed.insert(pos);
            self.stats.expansions += 1;
            debug!(%pos, g = self.arena[current].g, "expanding");
            self.log_progress();

            let edges = match finder.graph.edges(&self.arena[current].state) {
                Ok(edges) => edges,
                Err(out) => {
                    warn!(
                        node = %pos,
                        unloaded = %out.pos,
                        "reached unloaded terrain, returning partial route"
                    );
                    return self.partial();
                }
            };
            self.stats.generated_edges += edges.len() as u64;

            let parent_g = self.arena[current].g;
            for edge in edges {
                let resolution = edge.resolution;
                let next = resolution.next.position;
                if self.closed.contains(&next) {
                    continue;
                }
                let g = parent_g + resolution.cost;
                if let Some(&known) = self.best.get(&next)
                    && self.arena[known].g <= g
                {
                    continue;
                }
                let h = finder.goal.score(next);
                let index = self.arena.len();
                debug!(pos = %next, g, "queued node");
                self.arena.push(RouteNode {
                    state: resolution.next,
                    parent: Some(current),
                    actions: resolution.actions,
                    g,
                    h,
                });
                self.best.insert(next, index);
                if h < self.arena[self.closest].h {
                    self.closest = index;
                }
                self.open.push(OpenEntry {
                    index,
                    f: g + config.heuristic_weight * h,
                    g,
                });
            }
        }
    }

    fn partial(&self) -> RouteOutcome {
        if self.closest == 0 {
            return RouteOutcome::NotFound(NotFoundReason::AlreadyClosest);
        }
        RouteOutcome::Partial(reconstruct(
            &self.arena,
            self.closest,
            Some(WorldAction::Recalculate),
        ))
    }

    fn log_progress(&mut self) {
        let now = Instant::now();
        if now.duration_since(self.last_progress) < self.finder.config().progress_log_interval() {
            return;
        }
        self.last_progress = now;
        let closest = &self.arena[self.closest];
        info!(
            open = self.open.len(),
            expansions = self.stats.expansions,
            closest = %closest.state.position,
            distance = closest.h,
            "still searching for route"
        );
    }
}

// ---------------------------------------------------------------------------
// Fleet planning
// ---------------------------------------------------------------------------

/// One agent's search in a batch.
#[derive(Clone)]
pub struct PlanJob {
    pub finder: RouteFinder,
    pub start: Vec3i,
}

/// Run independent searches in parallel, one result per job in job order.
pub fn plan_batch(jobs: &[PlanJob]) -> Vec<Result<SearchReport>> {
    jobs.par_iter()
        .map(|job| job.finder.find(job.start))
        .collect()
}
