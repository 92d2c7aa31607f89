//! Derived attributes: leaf flags, descendant counts and depths.
//!
//! Everything here is iterative. A three-colour depth-first walk over child
//! edges yields a post-order (children before parents) and detects cycles;
//! descendant sets are then merged bottom-up from a memo arena indexed by
//! node, and each set is released once every parent edge has consumed it.

use std::mem;

use tracing::debug;

use crate::error::{OntologyError, Result};
use crate::model::term::TermNode;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Color {
    Unvisited,
    InProgress,
    Done,
}

/// Fill in `is_leaf`, `descendant_count` and `depth` for every node.
pub fn compute_derived(nodes: &mut [TermNode]) -> Result<()> {
    for node in nodes.iter_mut() {
        node.is_leaf = node.children.is_empty();
    }

    let order = post_order(nodes)?;
    count_descendants(nodes, &order);
    assign_depths(nodes, &order);

    debug!(nodes = nodes.len(), "computed derived attributes");
    Ok(())
}

/// Post-order over child edges, failing on the first back edge.
fn post_order(nodes: &[TermNode]) -> Result<Vec<usize>> {
    let mut color = vec![Color::Unvisited; nodes.len()];
    let mut order = Vec::with_capacity(nodes.len());
    let mut stack: Vec<(usize, usize)> = Vec::new();

    for start in 0..nodes.len() {
        if color[start] != Color::Unvisited {
            continue;
        }
        color[start] = Color::InProgress;
        stack.push((start, 0));

        while let Some(top) = stack.len().checked_sub(1) {
            let (node, next) = stack[top];
            match nodes[node].children.get(next) {
                Some(edge) => {
                    stack[top].1 += 1;
                    let child = edge.target;
                    match color[child] {
                        Color::Unvisited => {
                            color[child] = Color::InProgress;
                            stack.push((child, 0));
                        }
                        Color::InProgress => {
                            return Err(OntologyError::CycleDetected {
                                id: nodes[child].id.clone(),
                            });
                        }
                        Color::Done => {}
                    }
                }
                None => {
                    color[node] = Color::Done;
                    order.push(node);
                    stack.pop();
                }
            }
        }
    }

    Ok(order)
}

/// Exact descendant counts: a node reachable along several paths counts once.
///
/// Descendant sets hold distinct indices. A child's set is moved rather than
/// copied into its last consuming parent, so chains and trees stay linear.
fn count_descendants(nodes: &mut [TermNode], order: &[usize]) {
    let mut memo: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
    let mut pending_parents: Vec<usize> = nodes.iter().map(|n| n.parents.len()).collect();

    for &node in order {
        let fan_out = nodes[node].children.len();
        let mut descendants: Vec<usize> = Vec::new();

        for i in 0..fan_out {
            let child = nodes[node].children[i].target;
            pending_parents[child] -= 1;
            let inherited = if pending_parents[child] == 0 {
                mem::take(&mut memo[child])
            } else {
                memo[child].clone()
            };
            if descendants.is_empty() {
                descendants = inherited;
            } else {
                descendants.extend(inherited);
            }
            descendants.push(child);
        }
        if fan_out > 1 {
            descendants.sort_unstable();
            descendants.dedup();
        }

        nodes[node].descendant_count = descendants.len();
        if pending_parents[node] > 0 {
            memo[node] = descendants;
        }
    }
}

/// Longest parent chain above each node, walking parents before children.
fn assign_depths(nodes: &mut [TermNode], order: &[usize]) {
    for &node in order.iter().rev() {
        let depth = nodes[node].depth;
        for i in 0..nodes[node].children.len() {
            let child = nodes[node].children[i].target;
            if nodes[child].depth < depth + 1 {
                nodes[child].depth = depth + 1;
            }
        }
    }
}
