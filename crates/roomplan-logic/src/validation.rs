//! Structural validation of a finished layout.
//!
//! Pure functions over the floor, rooms and constraint graph that return
//! validation errors. Hard invariants (overlap, containment, budget,
//! forbidden walls) are errors; soft ones (unmet required walls, unplaced
//! or isolated rooms) are warnings.

use crate::adjacency::ConstraintGraph;
use crate::floor::FloorShape;
use crate::room::Room;

/// A layout validation finding.
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub category: &'static str,
    pub severity: Severity,
    pub message: String,
}

/// Finding severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// Whether any finding is an [`Severity::Error`].
pub fn has_errors(findings: &[ValidationError]) -> bool {
    findings.iter().any(|f| f.severity == Severity::Error)
}

// ── A. Room geometry (per-room) ─────────────────────────────────────────

/// Check that no room has zero or negative dimensions.
pub fn check_room_dimensions(rooms: &[Room]) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for r in rooms {
        if r.width <= 0 || r.height <= 0 {
            errors.push(ValidationError {
                category: "room_geometry",
                severity: Severity::Error,
                message: format!(
                    "Room {} has non-positive dimensions: {}×{}",
                    r.name, r.width, r.height
                ),
            });
        }
    }
    errors
}

/// Check that every placed room lies inside the floor union.
pub fn check_rooms_within_floor(floor: &FloorShape, rooms: &[Room]) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for r in rooms {
        let Some(rect) = r.rect() else { continue };
        if !floor.contains_rect(&rect) {
            errors.push(ValidationError {
                category: "room_containment",
                severity: Severity::Error,
                message: format!(
                    "Room {} at ({}, {}) size {}×{} leaves the floor",
                    r.name, rect.x, rect.y, rect.width, rect.height
                ),
            });
        }
    }
    errors
}

/// Check that growth stays within `0..=max_expansion` and never shrinks a
/// room below its original size.
pub fn check_expansion_budgets(rooms: &[Room]) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for r in rooms {
        let (w0, h0) = r.oriented_original();
        let used = r.growth_used();
        if r.width < w0 || r.height < h0 || used > r.max_expansion as i64 {
            errors.push(ValidationError {
                category: "expansion_budget",
                severity: Severity::Error,
                message: format!(
                    "Room {} used {} of {} expansion ({}×{} from {}×{})",
                    r.name, used, r.max_expansion, r.width, r.height, w0, h0
                ),
            });
        }
    }
    errors
}

/// Warn about rooms the search could not place.
pub fn check_unplaced_rooms(rooms: &[Room]) -> Vec<ValidationError> {
    rooms
        .iter()
        .filter(|r| !r.is_placed())
        .map(|r| ValidationError {
            category: "room_unplaced",
            severity: Severity::Warning,
            message: format!("Room {} was not placed", r.name),
        })
        .collect()
}

// ── B. Room-to-room (pairwise) ──────────────────────────────────────────

/// Check that no two placed rooms overlap. Touching edges are fine.
pub fn check_room_overlaps(rooms: &[Room]) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for i in 0..rooms.len() {
        for j in (i + 1)..rooms.len() {
            let (a, b) = (&rooms[i], &rooms[j]);
            if let (Some(ra), Some(rb)) = (a.rect(), b.rect()) {
                if ra.intersects(&rb) {
                    errors.push(ValidationError {
                        category: "room_overlap",
                        severity: Severity::Error,
                        message: format!("Rooms {} and {} overlap", a.name, b.name),
                    });
                }
            }
        }
    }
    errors
}

/// Warn about placed rooms that share no wall with any other room.
pub fn check_isolated_rooms(rooms: &[Room]) -> Vec<ValidationError> {
    if rooms.iter().filter(|r| r.is_placed()).count() < 2 {
        return Vec::new();
    }
    rooms
        .iter()
        .filter(|r| r.is_placed())
        .filter(|r| !rooms.iter().any(|o| o.id != r.id && r.shares_wall_with(o)))
        .map(|r| ValidationError {
            category: "room_isolated",
            severity: Severity::Warning,
            message: format!("Room {} shares no wall with another room", r.name),
        })
        .collect()
}

// ── C. Adjacency constraints ────────────────────────────────────────────

/// Check that no forbidden pair shares a wall.
pub fn check_forbidden_adjacency(rooms: &[Room], graph: &ConstraintGraph) -> Vec<ValidationError> {
    graph
        .forbidden_edges()
        .filter(|(a, b)| rooms[a.0].shares_wall_with(&rooms[b.0]))
        .map(|(a, b)| ValidationError {
            category: "forbidden_adjacency",
            severity: Severity::Error,
            message: format!(
                "Rooms {} and {} must not share a wall",
                rooms[a.0].name, rooms[b.0].name
            ),
        })
        .collect()
}

/// Warn about required pairs that do not share a wall.
pub fn check_required_adjacency(rooms: &[Room], graph: &ConstraintGraph) -> Vec<ValidationError> {
    graph
        .required_edges()
        .filter(|(a, b)| !rooms[a.0].shares_wall_with(&rooms[b.0]))
        .map(|(a, b)| ValidationError {
            category: "required_adjacency",
            severity: Severity::Warning,
            message: format!(
                "Rooms {} and {} should share a wall",
                rooms[a.0].name, rooms[b.0].name
            ),
        })
        .collect()
}

// ── Master validation ───────────────────────────────────────────────────

/// Run all layout validations and return combined results.
pub fn validate_all(
    floor: &FloorShape,
    rooms: &[Room],
    graph: &ConstraintGraph,
) -> Vec<ValidationError> {
    let mut all = Vec::new();
    all.extend(check_room_dimensions(rooms));
    all.extend(check_rooms_within_floor(floor, rooms));
    all.extend(check_expansion_budgets(rooms));
    all.extend(check_unplaced_rooms(rooms));
    all.extend(check_room_overlaps(rooms));
    all.extend(check_isolated_rooms(rooms));
    all.extend(check_forbidden_adjacency(rooms, graph));
    all.extend(check_required_adjacency(rooms, graph));
    all
}
