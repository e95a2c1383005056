//! Candidate-position generation shared by every search strategy.
//!
//! Candidates come in priority order: positions flush against each placed
//! required neighbor (plus partial-wall offsets), then uniform samples from
//! regions large enough to hold the room. Every candidate returned is valid
//! against the supplied [`Occupancy`].

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::adjacency::ConstraintGraph;
use crate::floor::{FloorShape, Region};
use crate::room::{Position, Rect, Room, RoomId};
use crate::spatial::SpatialIndex;
use crate::state::PlacementState;

/// What the search can see of already committed rooms.
pub trait Occupancy {
    /// Whether `rect` strictly intersects a committed room other than
    /// `excluding`.
    fn overlaps(&self, excluding: Option<RoomId>, rect: &Rect) -> bool;

    /// Footprint of `id` if it is committed.
    fn placed_rect(&self, id: RoomId) -> Option<Rect>;

    fn is_free(&self, id: RoomId, rect: &Rect) -> bool {
        !self.overlaps(Some(id), rect)
    }
}

/// Occupancy of the live room list, optionally accelerated by the grid
/// index.
pub struct LiveOccupancy<'a> {
    pub rooms: &'a [Room],
    pub index: Option<&'a SpatialIndex>,
}

impl Occupancy for LiveOccupancy<'_> {
    fn overlaps(&self, excluding: Option<RoomId>, rect: &Rect) -> bool {
        match self.index {
            Some(index) => index.overlaps(excluding, rect),
            None => self
                .rooms
                .iter()
                .filter(|r| Some(r.id) != excluding)
                .filter_map(Room::rect)
                .any(|other| other.intersects(rect)),
        }
    }

    fn placed_rect(&self, id: RoomId) -> Option<Rect> {
        self.rooms.get(id.0).and_then(Room::rect)
    }
}

impl Occupancy for PlacementState {
    fn overlaps(&self, excluding: Option<RoomId>, rect: &Rect) -> bool {
        PlacementState::overlaps(self, excluding, rect)
    }

    fn placed_rect(&self, id: RoomId) -> Option<Rect> {
        self.get(id).map(|p| p.rect)
    }
}

/// Inputs for one candidate query.
#[derive(Debug, Clone, Copy)]
pub struct CandidateRequest<'a> {
    pub floor: &'a FloorShape,
    pub graph: &'a ConstraintGraph,
    pub room: RoomId,
    pub width: i32,
    pub height: i32,
    /// Reject candidates sharing a wall with a committed forbidden neighbor.
    pub check_forbidden: bool,
    /// Stop once this many candidates are found.
    pub limit: usize,
    /// Uniform samples to draw after the neighbor-derived positions.
    pub random_samples: usize,
}

impl CandidateRequest<'_> {
    fn rect_at(&self, x: i32, y: i32) -> Rect {
        Rect::new(x, y, self.width, self.height)
    }

    /// Floor containment, no overlap and (optionally) no forbidden wall.
    pub fn is_valid<O: Occupancy + ?Sized>(&self, occupancy: &O, rect: &Rect) -> bool {
        if !self.floor.contains_rect(rect) || !occupancy.is_free(self.room, rect) {
            return false;
        }
        !self.check_forbidden || !creates_forbidden_wall(self.graph, occupancy, self.room, rect)
    }
}

/// Whether `rect` for `room` would share a wall with any committed
/// forbidden neighbor.
pub fn creates_forbidden_wall<O: Occupancy + ?Sized>(
    graph: &ConstraintGraph,
    occupancy: &O,
    room: RoomId,
    rect: &Rect,
) -> bool {
    graph
        .forbidden_neighbors(room)
        .iter()
        .filter_map(|&n| occupancy.placed_rect(n))
        .any(|other| other.shares_wall(rect))
}

/// Positions flush against `neighbor` on all four sides, followed by
/// partial-wall offsets for `1..min(w, h)` of the neighbor.
pub fn neighbor_positions(neighbor: &Rect, width: i32, height: i32) -> Vec<(i32, i32)> {
    let (nx, ny, nw, nh) = (neighbor.x, neighbor.y, neighbor.width, neighbor.height);
    let mut out = vec![
        (nx + nw, ny),     // right
        (nx - width, ny),  // left
        (nx, ny + nh),     // above
        (nx, ny - height), // below
    ];
    for offset in 1..nw.min(nh) {
        out.extend_from_slice(&[
            (nx + nw, ny + offset),
            (nx + nw, ny - offset),
            (nx - width, ny + offset),
            (nx - width, ny - offset),
            (nx + offset, ny + nh),
            (nx - offset, ny + nh),
            (nx + offset, ny - height),
            (nx - offset, ny - height),
        ]);
    }
    out
}

/// Valid positions for `request.room`, best first, deduplicated.
pub fn candidate_positions<O, R>(
    request: &CandidateRequest<'_>,
    occupancy: &O,
    rng: &mut R,
) -> Vec<Position>
where
    O: Occupancy + ?Sized,
    R: Rng + ?Sized,
{
    let mut out = Vec::new();
    let mut seen = HashSet::new();
    if request.limit == 0 {
        return out;
    }

    let mut push = |x: i32, y: i32, out: &mut Vec<Position>| {
        let rect = request.rect_at(x, y);
        if !seen.contains(&(x, y)) && request.is_valid(occupancy, &rect) {
            seen.insert((x, y));
            out.push(Position { x, y });
        }
        out.len() >= request.limit
    };

    for &neighbor in request.graph.required_neighbors(request.room) {
        let Some(rect) = occupancy.placed_rect(neighbor) else {
            continue;
        };
        for (x, y) in neighbor_positions(&rect, request.width, request.height) {
            if push(x, y, &mut out) {
                return out;
            }
        }
    }

    let fitting: Vec<&Region> = request
        .floor
        .regions()
        .iter()
        .filter(|r| r.fits(request.width, request.height))
        .collect();
    if fitting.is_empty() {
        return out;
    }
    for _ in 0..request.random_samples {
        let Some(region) = fitting.choose(rng) else {
            break;
        };
        let x = rng.gen_range(region.x..=region.x + region.width - request.width);
        let y = rng.gen_range(region.y..=region.y + region.height - request.height);
        if push(x, y, &mut out) {
            break;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Placement;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn square_floor() -> FloorShape {
        FloorShape::new(vec![Region::new(0, 0, 12, 12)]).unwrap()
    }

    fn two_rooms() -> (Vec<Room>, ConstraintGraph) {
        let mut graph = ConstraintGraph::new();
        let a = graph.register();
        let b = graph.register();
        graph.add_required(a, b);
        let mut hub = Room::new(a, "hub", 4, 4, 0);
        hub.place_at(4, 4);
        (vec![hub, Room::new(b, "spoke", 2, 3, 0)], graph)
    }

    fn request<'a>(floor: &'a FloorShape, graph: &'a ConstraintGraph) -> CandidateRequest<'a> {
        CandidateRequest {
            floor,
            graph,
            room: RoomId(1),
            width: 2,
            height: 3,
            check_forbidden: true,
            limit: 4,
            random_samples: 0,
        }
    }

    #[test]
    fn test_neighbor_positions_order() {
        let positions = neighbor_positions(&Rect::new(4, 4, 4, 4), 2, 3);
        assert_eq!(&positions[..4], &[(8, 4), (2, 4), (4, 8), (4, 1)]);
        // Three offsets of eight positions each.
        assert_eq!(positions.len(), 4 + 3 * 8);
    }

    #[test]
    fn test_flush_candidates_come_first_and_share_walls() {
        let floor = square_floor();
        let (rooms, graph) = two_rooms();
        let live = LiveOccupancy {
            rooms: &rooms,
            index: None,
        };
        let mut rng = StdRng::seed_from_u64(1);
        let found = candidate_positions(&request(&floor, &graph), &live, &mut rng);
        assert_eq!(found.len(), 4);
        let hub = Rect::new(4, 4, 4, 4);
        for p in &found {
            assert!(Rect::new(p.x, p.y, 2, 3).shares_wall(&hub));
        }
    }

    #[test]
    fn test_candidates_stay_in_floor() {
        let floor = square_floor();
        let (mut rooms, graph) = two_rooms();
        rooms[0].place_at(0, 0);
        let live = LiveOccupancy {
            rooms: &rooms,
            index: None,
        };
        let mut rng = StdRng::seed_from_u64(1);
        let req = CandidateRequest {
            limit: 100,
            ..request(&floor, &graph)
        };
        for p in candidate_positions(&req, &live, &mut rng) {
            assert!(floor.contains_rect(&Rect::new(p.x, p.y, 2, 3)));
        }
    }

    #[test]
    fn test_forbidden_neighbor_filters_candidates() {
        let floor = square_floor();
        let mut graph = ConstraintGraph::new();
        let a = graph.register();
        let b = graph.register();
        graph.add_forbidden(a, b);
        let state = PlacementState::new().with(Placement {
            room: a,
            rect: Rect::new(0, 0, 12, 6),
            rotated: false,
        });
        let mut rng = StdRng::seed_from_u64(3);
        let req = CandidateRequest {
            limit: 50,
            random_samples: 300,
            ..request(&floor, &graph)
        };
        let found = candidate_positions(&req, &state, &mut rng);
        assert!(!found.is_empty());
        assert!(found.iter().all(|p| p.y > 6));

        let unchecked = CandidateRequest {
            check_forbidden: false,
            ..req
        };
        let mut rng = StdRng::seed_from_u64(3);
        let found = candidate_positions(&unchecked, &state, &mut rng);
        assert!(found.iter().any(|p| p.y == 6));
    }

    #[test]
    fn test_random_samples_respect_region_fit() {
        let floor =
            FloorShape::new(vec![Region::new(0, 0, 3, 3), Region::new(10, 10, 6, 6)]).unwrap();
        let graph = {
            let mut g = ConstraintGraph::new();
            g.register();
            g
        };
        let req = CandidateRequest {
            room: RoomId(0),
            width: 5,
            height: 5,
            limit: 10,
            random_samples: 50,
            ..request(&floor, &graph)
        };
        let mut rng = StdRng::seed_from_u64(9);
        let found = candidate_positions(&req, &PlacementState::new(), &mut rng);
        assert!(!found.is_empty());
        assert!(found.iter().all(|p| p.x >= 10 && p.y >= 10));
        let unique: HashSet<_> = found.iter().map(|p| (p.x, p.y)).collect();
        assert_eq!(unique.len(), found.len());
    }
}
