//! Slide rooms toward the origin until nothing moves.

use crate::candidates::Occupancy;
use crate::plan::FloorPlan;
use crate::room::{Rect, RoomId};

impl FloorPlan {
    /// Whether `id` may occupy `rect` during compaction. Compaction keeps
    /// each room inside one region, which is stricter than placement.
    fn can_slide_to(&self, id: RoomId, rect: &Rect) -> bool {
        self.floor.region_containing(rect).is_some()
            && self.occupancy().is_free(id, rect)
            && !self.creates_forbidden_adjacency(id, rect)
    }

    /// Move rooms one unit at a time toward lower `x`, then lower `y`, in
    /// ascending `(x, y)` order, repeating full passes to a fixed point.
    /// Returns the number of unit moves made.
    pub fn compact(&mut self) -> usize {
        let mut moves = 0;
        loop {
            let mut order: Vec<(i32, i32, RoomId)> = self
                .rooms
                .iter()
                .filter_map(|r| r.position.map(|p| (p.x, p.y, r.id)))
                .collect();
            order.sort();

            let mut moved = false;
            for (_, _, id) in order {
                for (dx, dy) in [(-1, 0), (0, -1)] {
                    while let Some(rect) = self.rooms[id.0].rect() {
                        let next = rect.translated(dx, dy);
                        if !self.can_slide_to(id, &next) {
                            break;
                        }
                        self.set_rect(id, next);
                        moves += 1;
                        moved = true;
                    }
                }
            }
            if !moved {
                break;
            }
        }
        moves
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::floor::{FloorShape, Region};

    fn l_floor() -> FloorShape {
        FloorShape::new(vec![Region::new(0, 0, 10, 4), Region::new(0, 4, 4, 6)]).unwrap()
    }

    #[test]
    fn test_rooms_slide_to_origin() {
        let mut p = FloorPlan::new(l_floor());
        let a = p.add_room("a", 2, 2, 0).unwrap();
        let b = p.add_room("b", 2, 2, 0).unwrap();
        p.place_room(a, 5, 1);
        p.place_room(b, 8, 0);
        assert!(p.compact() > 0);
        assert_eq!(p.rooms()[0].rect(), Some(Rect::new(0, 0, 2, 2)));
        assert_eq!(p.rooms()[1].rect(), Some(Rect::new(2, 0, 2, 2)));
    }

    #[test]
    fn test_compaction_reaches_fixed_point() {
        let mut p = FloorPlan::new(l_floor());
        let a = p.add_room("a", 3, 3, 0).unwrap();
        let b = p.add_room("b", 2, 4, 0).unwrap();
        p.place_room(a, 1, 6);
        p.place_room(b, 6, 0);
        p.compact();
        assert_eq!(p.compact(), 0);
        for room in p.rooms() {
            assert!(p.floor().region_containing(&room.rect().unwrap()).is_some());
        }
    }

    #[test]
    fn test_room_stays_within_single_region() {
        let mut p = FloorPlan::new(l_floor());
        let a = p.add_room("a", 3, 3, 0).unwrap();
        p.place_room(a, 1, 6);
        p.compact();
        // Sliding down would straddle the two regions, so it stops at y = 4.
        assert_eq!(p.rooms()[0].rect(), Some(Rect::new(0, 4, 3, 3)));
    }

    #[test]
    fn test_forbidden_pair_never_touches() {
        let mut p = FloorPlan::new(l_floor());
        let a = p.add_room("a", 2, 2, 0).unwrap();
        let b = p.add_room("b", 2, 2, 0).unwrap();
        p.add_forbidden_adjacency("a", "b").unwrap();
        p.place_room(a, 0, 0);
        p.place_room(b, 6, 0);
        p.compact();
        assert_eq!(p.rooms()[1].rect(), Some(Rect::new(3, 0, 2, 2)));
        assert!(!p.shares_wall("a", "b"));
    }
}
