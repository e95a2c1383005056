//! Adjacency scoring.
//!
//! `score = satisfied required − 2 × violated forbidden`, counting only
//! edges whose endpoints are both placed. A perfect layout scores exactly
//! the number of required edges.

use serde::{Deserialize, Serialize};

use crate::adjacency::ConstraintGraph;
use crate::room::{Room, RoomId};

/// Penalty applied per forbidden pair that shares a wall.
pub const FORBIDDEN_PENALTY: i64 = 2;

/// Breakdown of how a layout meets its adjacency constraints. Pairs are
/// room names in registration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjacencyReport {
    pub score: i64,
    pub max_score: i64,
    /// Required pairs that share a wall.
    pub satisfied: Vec<(String, String)>,
    /// Required pairs that do not (or have an unplaced end).
    pub unmet: Vec<(String, String)>,
    /// Forbidden pairs that share a wall.
    pub violated: Vec<(String, String)>,
    /// Forbidden pairs that do not.
    pub respected: Vec<(String, String)>,
}

impl AdjacencyReport {
    pub fn is_perfect(&self) -> bool {
        self.score == self.max_score && self.violated.is_empty()
    }
}

/// Fast score without the per-pair breakdown.
pub fn score(rooms: &[Room], graph: &ConstraintGraph) -> i64 {
    let walls = |(a, b): (RoomId, RoomId)| rooms[a.0].shares_wall_with(&rooms[b.0]);
    let satisfied = graph.required_edges().filter(|&e| walls(e)).count() as i64;
    let violated = graph.forbidden_edges().filter(|&e| walls(e)).count() as i64;
    satisfied - FORBIDDEN_PENALTY * violated
}

/// Full per-pair evaluation of the current layout.
pub fn evaluate(rooms: &[Room], graph: &ConstraintGraph) -> AdjacencyReport {
    let mut report = AdjacencyReport {
        max_score: graph.required_count() as i64,
        ..AdjacencyReport::default()
    };
    let pair = |a: &Room, b: &Room| (a.name.clone(), b.name.clone());

    for (a, b) in graph.required_edges() {
        let (ra, rb) = (&rooms[a.0], &rooms[b.0]);
        if ra.shares_wall_with(rb) {
            report.satisfied.push(pair(ra, rb));
        } else {
            report.unmet.push(pair(ra, rb));
        }
    }
    for (a, b) in graph.forbidden_edges() {
        let (ra, rb) = (&rooms[a.0], &rooms[b.0]);
        if ra.shares_wall_with(rb) {
            report.violated.push(pair(ra, rb));
        } else {
            report.respected.push(pair(ra, rb));
        }
    }

    report.score =
        report.satisfied.len() as i64 - FORBIDDEN_PENALTY * report.violated.len() as i64;
    report
}
