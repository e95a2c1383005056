//! Required and forbidden adjacency constraints between rooms.
//!
//! Both edge sets are undirected and stored as ordered `(low, high)` id
//! pairs, so iteration order is stable across runs.

use std::collections::{BTreeSet, VecDeque};

use serde::{Deserialize, Serialize};

use crate::room::{Room, RoomId};

/// Which edge set an edge belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EdgeKind {
    Required,
    Forbidden,
}

fn edge_key(a: RoomId, b: RoomId) -> (RoomId, RoomId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Undirected required/forbidden edge sets over registered room ids.
///
/// Serialize-only: the node count and adjacency lists must agree, which
/// only [`register`](Self::register) and [`add`](Self::add) guarantee.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConstraintGraph {
    /// Registered node count; ids `0..nodes` are valid.
    nodes: usize,
    required: BTreeSet<(RoomId, RoomId)>,
    forbidden: BTreeSet<(RoomId, RoomId)>,
    /// id → required neighbors, in insertion order.
    required_adj: Vec<Vec<RoomId>>,
    /// id → forbidden neighbors, in insertion order.
    forbidden_adj: Vec<Vec<RoomId>>,
}

impl ConstraintGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the next room id. Ids are dense and assigned in order.
    pub fn register(&mut self) -> RoomId {
        let id = RoomId(self.nodes);
        self.nodes += 1;
        self.required_adj.push(Vec::new());
        self.forbidden_adj.push(Vec::new());
        id
    }

    pub fn contains(&self, id: RoomId) -> bool {
        id.0 < self.nodes
    }

    /// Add an edge. Returns `false` (and changes nothing) when either end is
    /// unregistered, the edge is a self-loop, or it already exists.
    pub fn add(&mut self, kind: EdgeKind, a: RoomId, b: RoomId) -> bool {
        if !self.contains(a) || !self.contains(b) || a == b {
            return false;
        }
        let (set, adj) = match kind {
            EdgeKind::Required => (&mut self.required, &mut self.required_adj),
            EdgeKind::Forbidden => (&mut self.forbidden, &mut self.forbidden_adj),
        };
        if !set.insert(edge_key(a, b)) {
            return false;
        }
        adj[a.0].push(b);
        adj[b.0].push(a);
        true
    }

    pub fn add_required(&mut self, a: RoomId, b: RoomId) -> bool {
        self.add(EdgeKind::Required, a, b)
    }

    pub fn add_forbidden(&mut self, a: RoomId, b: RoomId) -> bool {
        self.add(EdgeKind::Forbidden, a, b)
    }

    pub fn is_required(&self, a: RoomId, b: RoomId) -> bool {
        self.required.contains(&edge_key(a, b))
    }

    pub fn is_forbidden(&self, a: RoomId, b: RoomId) -> bool {
        self.forbidden.contains(&edge_key(a, b))
    }

    pub fn required_edges(&self) -> impl Iterator<Item = (RoomId, RoomId)> + '_ {
        self.required.iter().copied()
    }

    pub fn forbidden_edges(&self) -> impl Iterator<Item = (RoomId, RoomId)> + '_ {
        self.forbidden.iter().copied()
    }

    pub fn required_count(&self) -> usize {
        self.required.len()
    }

    pub fn forbidden_count(&self) -> usize {
        self.forbidden.len()
    }

    pub fn required_neighbors(&self, id: RoomId) -> &[RoomId] {
        self.required_adj
            .get(id.0)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn forbidden_neighbors(&self, id: RoomId) -> &[RoomId] {
        self.forbidden_adj
            .get(id.0)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Number of required-adjacency edges touching `id`.
    pub fn required_degree(&self, id: RoomId) -> usize {
        self.required_neighbors(id).len()
    }

    /// Connected components of the required graph, largest first.
    ///
    /// Components are ranked by `(member count, total area)` descending;
    /// ties keep discovery order. Members within a component are listed in
    /// BFS order from the lowest id.
    pub fn clusters(&self, rooms: &[Room]) -> Vec<Vec<RoomId>> {
        let mut visited = vec![false; self.nodes];
        let mut clusters = Vec::new();

        for start in 0..self.nodes {
            if visited[start] {
                continue;
            }
            let mut cluster = Vec::new();
            let mut queue = VecDeque::new();
            visited[start] = true;
            queue.push_back(RoomId(start));

            while let Some(current) = queue.pop_front() {
                cluster.push(current);
                for &next in self.required_neighbors(current) {
                    if !visited[next.0] {
                        visited[next.0] = true;
                        queue.push_back(next);
                    }
                }
            }
            clusters.push(cluster);
        }

        let priority = |cluster: &Vec<RoomId>| {
            let area: i64 = cluster
                .iter()
                .filter_map(|id| rooms.get(id.0))
                .map(Room::area)
                .sum();
            (cluster.len(), area)
        };
        clusters.sort_by(|a, b| priority(b).cmp(&priority(a)));
        clusters
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(n: usize) -> ConstraintGraph {
        let mut g = ConstraintGraph::new();
        for _ in 0..n {
            g.register();
        }
        g
    }

    #[test]
    fn test_unregistered_edge_is_noop() {
        let mut g = graph(2);
        assert!(!g.add_required(RoomId(0), RoomId(5)));
        assert!(!g.add_forbidden(RoomId(7), RoomId(1)));
        assert_eq!(g.required_count(), 0);
        assert_eq!(g.forbidden_count(), 0);
        assert!(g.required_neighbors(RoomId(0)).is_empty());
    }

    #[test]
    fn test_edges_are_undirected_and_deduplicated() {
        let mut g = graph(3);
        assert!(g.add_required(RoomId(2), RoomId(0)));
        assert!(!g.add_required(RoomId(0), RoomId(2)));
        assert!(g.is_required(RoomId(0), RoomId(2)));
        assert!(g.is_required(RoomId(2), RoomId(0)));
        assert_eq!(g.required_edges().collect::<Vec<_>>(), vec![(RoomId(0), RoomId(2))]);
        assert_eq!(g.required_degree(RoomId(2)), 1);
    }

    #[test]
    fn test_self_loop_rejected() {
        let mut g = graph(1);
        assert!(!g.add_forbidden(RoomId(0), RoomId(0)));
    }

    #[test]
    fn test_required_and_forbidden_are_separate() {
        let mut g = graph(2);
        g.add_forbidden(RoomId(0), RoomId(1));
        assert!(g.is_forbidden(RoomId(1), RoomId(0)));
        assert!(!g.is_required(RoomId(1), RoomId(0)));
        assert_eq!(g.required_degree(RoomId(0)), 0);
    }

    #[test]
    fn test_clusters_largest_first() {
        let rooms: Vec<Room> = (0..5)
            .map(|i| Room::new(RoomId(i), format!("r{i}"), 2, 2, 0))
            .collect();
        let mut g = graph(5);
        g.add_required(RoomId(3), RoomId(4));
        g.add_required(RoomId(0), RoomId(1));
        g.add_required(RoomId(1), RoomId(2));

        let clusters = g.clusters(&rooms);
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0], vec![RoomId(0), RoomId(1), RoomId(2)]);
        assert_eq!(clusters[1], vec![RoomId(3), RoomId(4)]);
    }

    #[test]
    fn test_isolated_rooms_form_singleton_clusters() {
        let rooms = vec![
            Room::new(RoomId(0), "small", 1, 1, 0),
            Room::new(RoomId(1), "big", 5, 5, 0),
        ];
        let g = graph(2);
        let clusters = g.clusters(&rooms);
        assert_eq!(clusters, vec![vec![RoomId(1)], vec![RoomId(0)]]);
    }
}
