// Adjacency function of the implicit search graph.
//
// The graph is never materialised. `MovementGraph` holds the fixed table of
// movement templates and, for one `NodeState`, runs every template that the
// path constraints allow against a fresh `BlockReader` (so the blocks around
// the node are read at most once per expansion), keeping the feasible edges
// in template order. The function is pure with respect to its input node and
// holds no mutable state, so one `MovementGraph` can serve any number of
// concurrent searches.
//
// See also: `movement/` for the templates, `pathfinding.rs` for the search
// driver that calls `edges` once per expanded node.

use crate::config::PlannerConfig;
use crate::error::OutOfLevel;
use crate::movement::{BlockReader, EdgeResolution, GraphAction};
use crate::node::NodeState;
use tracing::debug;

/// One feasible edge out of a node.
#[derive(Clone, Debug)]
pub struct GraphEdge {
    pub action: GraphAction,
    pub resolution: EdgeResolution,
}

#[derive(Clone, Debug)]
pub struct MovementGraph {
    config: PlannerConfig,
    actions: Vec<GraphAction>,
}

impl MovementGraph {
    pub fn new(config: PlannerConfig) -> Self {
        let actions = GraphAction::all()
            .into_iter()
            .filter(|action| !action.impossible(&config))
            .collect();
        Self { config, actions }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Templates that survive the hard checks for this config.
    pub fn actions(&self) -> &[GraphAction] {
        &self.actions
    }

    /// Every feasible edge out of `node`, in template order.
    ///
    /// Fails with `OutOfLevel` as soon as any template reads unloaded
    /// terrain; the edges found so far are discarded.
    pub fn edges(&self, node: &NodeState) -> Result<Vec<GraphEdge>, OutOfLevel> {
        let mut blocks = BlockReader::new(node);
        let mut edges = Vec::new();
        for action in &self.actions {
            if let Some(resolution) = action.resolve(&mut blocks, &self.config)? {
                edges.push(GraphEdge {
                    action: *action,
                    resolution,
                });
            }
        }
        debug!(pos = %node.position, edges = edges.len(), "expanded node");
        Ok(edges)
    }
}
