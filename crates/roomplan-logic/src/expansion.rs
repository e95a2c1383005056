//! Greedy room growth into leftover floor space.
//!
//! Rooms are visited in registration order. Each room tries its four sides
//! in a shuffled order and, per side, grows by the largest increment that
//! still fits until nothing fits. The result depends on visit order and on
//! the RNG; it is not an optimal packing.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::plan::FloorPlan;
use crate::room::{Rect, RoomId};

/// Side of a room that moves outward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Right,
    Down,
    Left,
    Up,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Right,
        Direction::Down,
        Direction::Left,
        Direction::Up,
    ];

    /// `rect` with this side pushed out by `amount`.
    pub fn grow(self, rect: &Rect, amount: i32) -> Rect {
        let Rect {
            x,
            y,
            width,
            height,
        } = *rect;
        match self {
            Direction::Right => Rect::new(x, y, width + amount, height),
            Direction::Left => Rect::new(x - amount, y, width + amount, height),
            Direction::Up => Rect::new(x, y, width, height + amount),
            Direction::Down => Rect::new(x, y - amount, width, height + amount),
        }
    }
}

impl FloorPlan {
    /// Whether `id` may grow `amount` units on `direction`: within budget,
    /// inside the floor, overlap-free and not touching a forbidden neighbor.
    pub fn can_expand(&self, id: RoomId, direction: Direction, amount: i32) -> bool {
        let room = &self.rooms[id.0];
        let Some(rect) = room.rect() else {
            return false;
        };
        if !room.can_grow_by(amount) {
            return false;
        }
        self.is_valid_live(id, &direction.grow(&rect, amount))
    }

    /// Grow every placed room as far as its budget and the layout allow.
    /// Returns the total growth applied, in units.
    pub fn expand_rooms<R: Rng + ?Sized>(&mut self, increments: &[i32], rng: &mut R) -> i64 {
        let mut total = 0i64;
        for i in 0..self.rooms.len() {
            let id = RoomId(i);
            if !self.rooms[i].is_placed() {
                continue;
            }

            let mut directions = Direction::ALL;
            directions.shuffle(rng);
            for direction in directions {
                for &step in increments {
                    while self.can_expand(id, direction, step) {
                        if let Some(rect) = self.rooms[i].rect() {
                            self.set_rect(id, direction.grow(&rect, step));
                            total += step as i64;
                        }
                    }
                }
            }
        }
        if total > 0 {
            log::debug!("expansion grew rooms by {total} units");
        }
        total
    }
}
