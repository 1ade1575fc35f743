//! Budgeted A* over the passability layer.
//!
//! Edge cost is the step length (1 or √2) times the cost multiplier of the
//! tile being entered. The source tile's multiplier plays no part, so a
//! route and its reverse can differ in cost. The heuristic is octile
//! distance (Manhattan when diagonals are off) scaled by the cheapest
//! multiplier on the map, which never overestimates.
//!
//! Everything a search touches (node table, open heap, best-partial
//! tracker) lives on the stack of one call. The node table only holds tiles
//! the search has reached, so the work done by a call grows with its node
//! budget, not with the size of the map.

use std::collections::hash_map::Entry;
use std::collections::{BinaryHeap, HashMap};

use battlegrid_core::{Locomotion, TerrainQuery, TilePos};

use crate::distance::{manhattan, octile};
use crate::neighbors::Neighbors;
use crate::node::{NO_PARENT, Node, NodeRef, NodeState};
use crate::passability::PassabilityLayer;

/// Inputs that stay fixed for a whole search.
#[derive(Copy, Clone, Debug)]
pub(crate) struct SearchParams {
    pub(crate) node_budget: usize,
    pub(crate) heuristic_scale: f64,
    pub(crate) diagonals: bool,
}

/// Tile chain produced by a search.
#[derive(Debug)]
pub(crate) struct SearchOutcome {
    pub(crate) tiles: Vec<TilePos>,
    pub(crate) expanded: usize,
    /// Tiles that got a node table entry.
    pub(crate) touched: usize,
    /// False when the node budget ran out and `tiles` leads to the expanded
    /// node closest to the goal instead.
    pub(crate) reached_goal: bool,
}

pub(crate) fn heuristic(from: TilePos, to: TilePos, params: &SearchParams) -> f64 {
    let d = if params.diagonals {
        octile(from, to)
    } else {
        f64::from(manhattan(from, to))
    };
    d * params.heuristic_scale
}

impl<T: TerrainQuery> PassabilityLayer<T> {
    /// Run A* from `start` to `goal`, both of which must be on the grid and
    /// passable for `loco`.
    ///
    /// Returns `None` when the goal is unreachable. When more than
    /// `params.node_budget` nodes would be expanded, returns the chain to
    /// the expanded node with the lowest heuristic seen so far.
    pub(crate) fn astar(
        &self,
        start: TilePos,
        goal: TilePos,
        loco: Locomotion,
        params: &SearchParams,
    ) -> Option<SearchOutcome> {
        let bounds = self.bounds();
        let start_idx = bounds.index_of(start)?;
        let goal_idx = bounds.index_of(goal)?;

        let budget = params.node_budget.max(1);
        let mut nodes: HashMap<usize, Node> = HashMap::new();
        let mut open: BinaryHeap<NodeRef> = BinaryHeap::new();
        let mut neighbors = Neighbors::new();

        nodes.insert(
            start_idx,
            Node {
                g: 0.0,
                parent: NO_PARENT,
                state: NodeState::Open,
            },
        );
        open.push(NodeRef {
            idx: start_idx,
            f: heuristic(start, goal, params),
            g: 0.0,
        });

        let mut expanded = 0usize;
        let mut best_idx = start_idx;
        let mut best_h = f64::INFINITY;

        let reached_goal = 'search: loop {
            let Some(current) = open.pop() else {
                log::trace!("open set exhausted after {expanded} expansions: {start} -> {goal}");
                return None;
            };
            let ci = current.idx;

            // Skip entries superseded by a cheaper push or already closed.
            let Some(node) = nodes.get_mut(&ci) else {
                continue;
            };
            if node.state != NodeState::Open || current.g > node.g {
                continue;
            }
            if ci == goal_idx {
                break 'search true;
            }
            if expanded >= budget {
                break 'search false;
            }
            expanded += 1;
            node.state = NodeState::Closed;
            let current_g = node.g;

            let cp = bounds.tile_at(ci);
            let h = heuristic(cp, goal, params);
            if h < best_h {
                best_h = h;
                best_idx = ci;
            }

            let steps = neighbors.steps(cp, params.diagonals, |t| self.is_passable(t, loco));
            for step in steps {
                let Some(ni) = bounds.index_of(step.to) else {
                    continue;
                };
                let tentative_g = current_g + step.len * self.cost_multiplier(step.to);
                let n = match nodes.entry(ni) {
                    Entry::Occupied(e) => {
                        let n = e.into_mut();
                        if n.state == NodeState::Closed || tentative_g >= n.g {
                            continue;
                        }
                        n
                    }
                    Entry::Vacant(e) => e.insert(Node::default()),
                };
                n.g = tentative_g;
                n.parent = ci;
                n.state = NodeState::Open;
                open.push(NodeRef {
                    idx: ni,
                    f: tentative_g + heuristic(step.to, goal, params),
                    g: tentative_g,
                });
            }
        };

        let end_idx = if reached_goal {
            goal_idx
        } else {
            log::debug!(
                "node budget {budget} reached: {start} -> {goal}, settling for {}",
                bounds.tile_at(best_idx)
            );
            best_idx
        };

        // Parent chain back to the start, then flipped.
        let mut tiles = Vec::new();
        let mut ci = end_idx;
        while ci != NO_PARENT {
            tiles.push(bounds.tile_at(ci));
            ci = nodes.get(&ci).map_or(NO_PARENT, |n| n.parent);
        }
        tiles.reverse();

        Some(SearchOutcome {
            tiles,
            expanded,
            touched: nodes.len(),
            reached_goal,
        })
    }

    /// Total cost of walking `tiles` in order under the search's edge rule.
    ///
    /// Consecutive entries may be any distance apart along a straight or
    /// 45° line; every tile entered on the way is charged.
    pub fn route_cost(&self, tiles: &[TilePos]) -> f64 {
        crate::postprocess::expand_polyline(tiles)
            .windows(2)
            .map(|w| {
                let d = w[1] - w[0];
                let len = if d.x != 0 && d.z != 0 {
                    crate::neighbors::DIAGONAL_STEP
                } else {
                    crate::neighbors::ORTHOGONAL_STEP
                };
                len * self.cost_multiplier(w[1])
            })
            .sum()
    }
}
