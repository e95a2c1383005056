//! Run outcomes and layout statistics.
//!
//! Everything here is plain serde data so callers can persist or display
//! it; the engine itself never writes files.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::adjacency::ConstraintGraph;
use crate::floor::FloorShape;
use crate::room::Room;
use crate::scoring::{self, AdjacencyReport};

/// Summary of one `generate_layout` run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutOutcome {
    /// Every room placed.
    pub success: bool,
    pub score: i64,
    pub max_score: i64,
    pub satisfied_pairs: Vec<(String, String)>,
    pub violated_pairs: Vec<(String, String)>,
    pub unmet_pairs: Vec<(String, String)>,
    pub placed_rooms: usize,
    pub total_rooms: usize,
    pub attempts: u32,
    pub nodes_explored: usize,
    pub timed_out: bool,
    /// Seed the run used, when the engine seeded its own RNG.
    pub seed: Option<u64>,
}

/// Externally visible geometry of one room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomPlacement {
    pub name: String,
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub width: i32,
    pub height: i32,
    pub rotated: bool,
    pub original_width: i32,
    pub original_height: i32,
    pub max_expansion: u32,
}

impl From<&Room> for RoomPlacement {
    fn from(room: &Room) -> Self {
        Self {
            name: room.name.clone(),
            x: room.position.map(|p| p.x),
            y: room.position.map(|p| p.y),
            width: room.width,
            height: room.height,
            rotated: room.rotated,
            original_width: room.original_width,
            original_height: room.original_height,
            max_expansion: room.max_expansion,
        }
    }
}

/// Growth statistics for one placed room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomUsage {
    pub name: String,
    pub original: (i32, i32),
    pub current: (i32, i32),
    pub growth_used: i64,
    pub max_expansion: u32,
    /// Area gained over the original, in percent.
    pub area_increase_pct: f64,
}

/// Space utilization and adjacency statistics for the current layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutReport {
    pub floor_area: i64,
    pub room_area: i64,
    /// `room_area / floor_area`, in `0.0..=1.0`.
    pub utilization: f64,
    pub placed_rooms: usize,
    pub total_rooms: usize,
    pub rooms: Vec<RoomUsage>,
    pub adjacency: AdjacencyReport,
    pub forbidden_edges: usize,
}

impl LayoutReport {
    pub fn build(floor: &FloorShape, rooms: &[Room], graph: &ConstraintGraph) -> Self {
        let floor_area = floor.area();
        let placed: Vec<&Room> = rooms.iter().filter(|r| r.is_placed()).collect();
        let room_area: i64 = placed.iter().map(|r| r.area()).sum();
        let utilization = if floor_area > 0 {
            room_area as f64 / floor_area as f64
        } else {
            0.0
        };

        let usage = placed
            .iter()
            .map(|r| {
                let original = r.original_area();
                let area_increase_pct = if original > 0 {
                    (r.area() - original) as f64 / original as f64 * 100.0
                } else {
                    0.0
                };
                RoomUsage {
                    name: r.name.clone(),
                    original: (r.original_width, r.original_height),
                    current: (r.width, r.height),
                    growth_used: r.growth_used(),
                    max_expansion: r.max_expansion,
                    area_increase_pct,
                }
            })
            .collect();

        Self {
            floor_area,
            room_area,
            utilization,
            placed_rooms: placed.len(),
            total_rooms: rooms.len(),
            rooms: usage,
            adjacency: scoring::evaluate(rooms, graph),
            forbidden_edges: graph.forbidden_count(),
        }
    }
}

fn fmt_pairs(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .map(|(a, b)| format!("{a} - {b}"))
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Display for LayoutReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Floor area: {} square units", self.floor_area)?;
        writeln!(f, "Room area: {} square units", self.room_area)?;
        writeln!(f, "Space utilization: {:.2}%", self.utilization * 100.0)?;
        writeln!(
            f,
            "Rooms placed: {}/{}",
            self.placed_rooms, self.total_rooms
        )?;
        writeln!(
            f,
            "Adjacency score: {}/{}",
            self.adjacency.score, self.adjacency.max_score
        )?;
        writeln!(f, "Adjacent pairs: {}", fmt_pairs(&self.adjacency.satisfied))?;
        writeln!(f, "Non-adjacency constraints: {}", self.forbidden_edges)?;
        writeln!(
            f,
            "Non-adjacency violations: {}",
            self.adjacency.violated.len()
        )?;
        if !self.adjacency.violated.is_empty() {
            writeln!(
                f,
                "Violated non-adjacent pairs: {}",
                fmt_pairs(&self.adjacency.violated)
            )?;
        }
        writeln!(f)?;
        writeln!(f, "Room Expansion Statistics:")?;
        for r in &self.rooms {
            writeln!(
                f,
                "{}: {}x{} -> {}x{} ({:.1}% increase, expansion used: {}/{})",
                r.name,
                r.original.0,
                r.original.1,
                r.current.0,
                r.current.1,
                r.area_increase_pct,
                r.growth_used,
                r.max_expansion
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::floor::Region;
    use crate::room::RoomId;

    fn layout() -> (FloorShape, Vec<Room>, ConstraintGraph) {
        let floor = FloorShape::new(vec![Region::new(0, 0, 10, 10)]).unwrap();
        let mut graph = ConstraintGraph::new();
        let mut a = Room::new(graph.register(), "Kitchen", 4, 5, 3);
        a.place_at(0, 0);
        a.width += 1;
        let mut b = Room::new(graph.register(), "Pantry", 2, 2, 0);
        b.place_at(5, 0);
        let c = Room::new(graph.register(), "Cellar", 3, 3, 0);
        graph.add_required(RoomId(0), RoomId(1));
        graph.add_forbidden(RoomId(1), RoomId(2));
        (floor, vec![a, b, c], graph)
    }

    #[test]
    fn test_report_statistics() {
        let (floor, rooms, graph) = layout();
        let report = LayoutReport::build(&floor, &rooms, &graph);
        assert_eq!(report.floor_area, 100);
        assert_eq!(report.room_area, 25 + 4);
        assert!((report.utilization - 0.29).abs() < 1e-9);
        assert_eq!(report.placed_rooms, 2);
        assert_eq!(report.total_rooms, 3);
        assert_eq!(report.rooms[0].growth_used, 1);
        assert!((report.rooms[0].area_increase_pct - 25.0).abs() < 1e-9);
        assert_eq!(report.adjacency.score, 1);
    }

    #[test]
    fn test_report_display() {
        let (floor, rooms, graph) = layout();
        let text = LayoutReport::build(&floor, &rooms, &graph).to_string();
        assert!(text.contains("Space utilization: 29.00%"));
        assert!(text.contains("Adjacency score: 1/1"));
        assert!(text.contains("Adjacent pairs: Kitchen - Pantry"));
        assert!(text.contains("Kitchen: 4x5 -> 5x5 (25.0% increase, expansion used: 1/3)"));
        assert!(!text.contains("Cellar:"));
    }

    #[test]
    fn test_placement_of_unplaced_room() {
        let (_, rooms, _) = layout();
        let p = RoomPlacement::from(&rooms[2]);
        assert_eq!((p.x, p.y), (None, None));
        assert_eq!((p.width, p.height), (3, 3));
    }
}
