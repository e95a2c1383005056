//! Minimum-adjacency enforcement: no placed room is left isolated if a
//! flush spot next to some other room is available.

use crate::plan::FloorPlan;
use crate::room::{Rect, RoomId};

impl FloorPlan {
    /// Whether `id` shares a wall with any other placed room.
    pub fn has_any_wall(&self, id: RoomId) -> bool {
        let room = &self.rooms[id.0];
        self.rooms
            .iter()
            .any(|other| other.id != id && room.shares_wall_with(other))
    }

    /// Flush positions around `anchor` for a `width`×`height` room, in
    /// left, right, above, below order.
    fn flush_spots(anchor: &Rect, width: i32, height: i32) -> [Rect; 4] {
        [
            Rect::new(anchor.x - width, anchor.y, width, height),
            Rect::new(anchor.right(), anchor.y, width, height),
            Rect::new(anchor.x, anchor.top(), width, height),
            Rect::new(anchor.x, anchor.y - height, width, height),
        ]
    }

    /// Move each isolated placed room to the first flush spot, against any
    /// other placed room in registration order, that is in-floor,
    /// overlap-free, free of forbidden walls and actually shares a wall.
    /// Rooms with no such spot stay where they are. Returns the number of
    /// rooms moved.
    pub fn enforce_minimum_adjacency(&mut self) -> usize {
        let mut moved = 0;
        for i in 0..self.rooms.len() {
            let id = RoomId(i);
            let Some(current) = self.rooms[i].rect() else {
                continue;
            };
            if self.has_any_wall(id) {
                continue;
            }

            let target = self
                .rooms
                .iter()
                .filter(|other| other.id != id)
                .filter_map(|other| other.rect())
                .flat_map(|anchor| Self::flush_spots(&anchor, current.width, current.height))
                .find(|spot| self.is_valid_live(id, spot) && self.touches_any(id, spot));

            match target {
                Some(spot) => {
                    log::debug!(
                        "moving isolated room {} to ({}, {})",
                        self.rooms[i].name,
                        spot.x,
                        spot.y
                    );
                    self.set_rect(id, spot);
                    moved += 1;
                }
                None => log::debug!("room {} stays isolated", self.rooms[i].name),
            }
        }
        moved
    }

    fn touches_any(&self, id: RoomId, rect: &Rect) -> bool {
        self.rooms
            .iter()
            .filter(|other| other.id != id)
            .filter_map(|other| other.rect())
            .any(|other| other.shares_wall(rect))
    }
}
