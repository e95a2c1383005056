//! Grid-bucketed overlap index.
//!
//! Each placed room is registered in every 2×2 cell its footprint touches.
//! Overlap queries only look at rooms sharing a cell with the query rect and
//! then apply the exact intersection test, so the bucketing never changes an
//! answer, only how many rooms are compared.

use std::collections::HashMap;

use crate::room::{Rect, Room, RoomId};

/// Side length of one grid cell, in floor units.
pub const GRID_CELL_SIZE: i32 = 2;

/// Inclusive range of grid cells covered by a rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellSpan {
    pub min_x: i32,
    pub max_x: i32,
    pub min_y: i32,
    pub max_y: i32,
}

impl CellSpan {
    /// Cells from `floor(x / 2)` to `floor((x + w - 1) / 2)` on each axis.
    pub fn of(rect: &Rect) -> Self {
        Self {
            min_x: rect.x.div_euclid(GRID_CELL_SIZE),
            max_x: (rect.right() - 1).div_euclid(GRID_CELL_SIZE),
            min_y: rect.y.div_euclid(GRID_CELL_SIZE),
            max_y: (rect.top() - 1).div_euclid(GRID_CELL_SIZE),
        }
    }

    pub fn intersects(&self, other: &CellSpan) -> bool {
        self.min_x <= other.max_x
            && other.min_x <= self.max_x
            && self.min_y <= other.max_y
            && other.min_y <= self.max_y
    }

    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> {
        let (min_y, max_y) = (self.min_y, self.max_y);
        (self.min_x..=self.max_x).flat_map(move |cx| (min_y..=max_y).map(move |cy| (cx, cy)))
    }
}

/// Cell → rooms registered in that cell.
///
/// The map is only ever queried for presence, never iterated to make a
/// decision, so its hash order does not leak into layouts.
#[derive(Debug, Clone, Default)]
pub struct SpatialIndex {
    cells: HashMap<(i32, i32), Vec<(RoomId, Rect)>>,
    rooms: usize,
}

impl SpatialIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `room` under its current footprint. Unplaced rooms are
    /// ignored.
    pub fn insert(&mut self, room: &Room) {
        let Some(rect) = room.rect() else {
            return;
        };
        for cell in CellSpan::of(&rect).cells() {
            self.cells.entry(cell).or_default().push((room.id, rect));
        }
        self.rooms += 1;
    }

    /// Deregister `room` using its current footprint. Must be called before
    /// the room's geometry changes.
    pub fn remove(&mut self, room: &Room) {
        let Some(rect) = room.rect() else {
            return;
        };
        let mut found = false;
        for cell in CellSpan::of(&rect).cells() {
            if let Some(bucket) = self.cells.get_mut(&cell) {
                let before = bucket.len();
                bucket.retain(|(id, _)| *id != room.id);
                found |= bucket.len() != before;
                if bucket.is_empty() {
                    self.cells.remove(&cell);
                }
            }
        }
        if found {
            self.rooms -= 1;
        }
    }

    /// Whether `rect` strictly intersects any indexed room other than
    /// `excluding`.
    pub fn overlaps(&self, excluding: Option<RoomId>, rect: &Rect) -> bool {
        CellSpan::of(rect).cells().any(|cell| {
            self.cells.get(&cell).is_some_and(|bucket| {
                bucket
                    .iter()
                    .any(|(id, other)| Some(*id) != excluding && rect.intersects(other))
            })
        })
    }

    pub fn clear(&mut self) {
        self.cells.clear();
        self.rooms = 0;
    }

    /// Drop everything and re-register all placed rooms.
    pub fn rebuild(&mut self, rooms: &[Room]) {
        self.clear();
        for room in rooms {
            self.insert(room);
        }
    }

    /// Number of rooms currently registered.
    pub fn len(&self) -> usize {
        self.rooms
    }

    pub fn is_empty(&self) -> bool {
        self.rooms == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placed(id: usize, x: i32, y: i32, w: i32, h: i32) -> Room {
        let mut r = Room::new(RoomId(id), format!("r{id}"), w, h, 0);
        r.place_at(x, y);
        r
    }

    #[test]
    fn test_cell_span_uses_floor_division() {
        let span = CellSpan::of(&Rect::new(-3, 1, 4, 2));
        assert_eq!(
            span,
            CellSpan {
                min_x: -2,
                max_x: 0,
                min_y: 0,
                max_y: 1
            }
        );
        assert_eq!(span.cells().count(), 6);
    }

    #[test]
    fn test_odd_flush_rooms_share_cell_but_do_not_overlap() {
        let mut index = SpatialIndex::new();
        index.insert(&placed(0, 0, 0, 3, 3));
        // Both footprints cover cell column 1; they only touch along x = 3.
        assert!(!index.overlaps(None, &Rect::new(3, 0, 3, 3)));
        assert!(index.overlaps(None, &Rect::new(2, 0, 3, 3)));
    }

    #[test]
    fn test_excluding_self() {
        let mut index = SpatialIndex::new();
        let room = placed(4, 2, 2, 4, 4);
        index.insert(&room);
        assert!(!index.overlaps(Some(RoomId(4)), &Rect::new(3, 3, 4, 4)));
        assert!(index.overlaps(Some(RoomId(1)), &Rect::new(3, 3, 4, 4)));
    }

    #[test]
    fn test_remove_then_reinsert() {
        let mut index = SpatialIndex::new();
        let mut room = placed(0, 0, 0, 4, 4);
        index.insert(&room);
        assert_eq!(index.len(), 1);

        index.remove(&room);
        assert!(index.is_empty());
        assert!(!index.overlaps(None, &Rect::new(0, 0, 4, 4)));

        room.place_at(10, 10);
        index.insert(&room);
        assert!(!index.overlaps(None, &Rect::new(0, 0, 4, 4)));
        assert!(index.overlaps(None, &Rect::new(11, 11, 1, 1)));
    }

    #[test]
    fn test_unplaced_rooms_are_ignored() {
        let mut index = SpatialIndex::new();
        let room = Room::new(RoomId(0), "ghost", 4, 4, 0);
        index.insert(&room);
        index.remove(&room);
        assert_eq!(index.len(), 0);
    }

    #[test]
    fn test_rebuild_matches_brute_force() {
        let rooms = vec![
            placed(0, 0, 0, 5, 3),
            placed(1, 5, 0, 2, 7),
            placed(2, 0, 3, 5, 4),
        ];
        let mut index = SpatialIndex::new();
        index.rebuild(&rooms);
        assert_eq!(index.len(), 3);

        for x in -2..9 {
            for y in -2..9 {
                let query = Rect::new(x, y, 2, 3);
                let brute = rooms
                    .iter()
                    .filter_map(Room::rect)
                    .any(|r| r.intersects(&query));
                assert_eq!(index.overlaps(None, &query), brute, "query {query:?}");
            }
        }
    }
}
