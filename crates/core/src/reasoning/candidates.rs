use std::collections::{HashSet, VecDeque};

use indexmap::IndexMap;
use tracing::debug;

use crate::domain::product::ProductId;
use crate::errors::DomainError;
use crate::graph::{KnowledgeGraph, NodeKey};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CandidateSearch {
    /// Candidate product -> depth at which it was first reached, in
    /// discovery order.
    pub candidates: IndexMap<ProductId, usize>,
    /// Nodes dequeued during the search, the start node included.
    pub nodes_visited: usize,
}

/// Level-order search from `start`. Nodes at `max_depth` are visited but not
/// expanded; hub nodes are traversed but never reported as candidates.
pub fn find_candidates(
    graph: &KnowledgeGraph,
    start: &ProductId,
    max_depth: usize,
) -> Result<CandidateSearch, DomainError> {
    let start_key = NodeKey::product(start);
    if !graph.contains(&start_key) {
        return Err(DomainError::InvariantViolation(format!(
            "requested product `{start}` has no node in the knowledge graph"
        )));
    }

    let mut visited: HashSet<&NodeKey> = HashSet::from([&start_key]);
    let mut queue = VecDeque::from([(&start_key, 0usize)]);
    let mut search = CandidateSearch::default();

    while let Some((current, depth)) = queue.pop_front() {
        search.nodes_visited += 1;
        if depth >= max_depth {
            continue;
        }

        for neighbor in graph.neighbors(current) {
            if !visited.insert(neighbor) {
                continue;
            }
            queue.push_back((neighbor, depth + 1));

            let node = graph.node(neighbor).ok_or_else(|| {
                DomainError::InvariantViolation(format!(
                    "adjacency references unknown node `{neighbor}`"
                ))
            })?;
            if let Some(product_id) = node.product_id() {
                search.candidates.entry(product_id.clone()).or_insert(depth + 1);
            }
        }
    }

    debug!(
        event_name = "reasoning.bfs.completed",
        start = %start,
        max_depth,
        nodes_visited = search.nodes_visited,
        candidates = search.candidates.len(),
        "candidate search completed"
    );

    Ok(search)
}
