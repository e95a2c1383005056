//! Room records and the integer rectangle geometry they are built on.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Dense index of a room inside a [`FloorPlan`](crate::plan::FloorPlan).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RoomId(pub usize);

/// Axis-aligned integer rectangle. `x`/`y` is the lower-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn top(&self) -> i32 {
        self.y + self.height
    }

    /// `(left, right, bottom, top)`.
    pub fn boundaries(&self) -> (i32, i32, i32, i32) {
        (self.x, self.right(), self.y, self.top())
    }

    pub fn area(&self) -> i64 {
        self.width as i64 * self.height as i64
    }

    /// Strict open-rectangle intersection. Rectangles that only touch along
    /// an edge or at a corner do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.top()
            && self.top() > other.y
    }

    /// True when the two rectangles share a wall segment of positive length.
    ///
    /// This is the only notion of "adjacent" used anywhere in the engine:
    /// touching at a corner, or overlapping, is not sharing a wall.
    pub fn shares_wall(&self, other: &Rect) -> bool {
        let (l1, r1, b1, t1) = self.boundaries();
        let (l2, r2, b2, t2) = other.boundaries();

        if r1 == l2 || r2 == l1 {
            return b1.max(b2) < t1.min(t2);
        }
        if t1 == b2 || t2 == b1 {
            return l1.max(l2) < r1.min(r2);
        }
        false
    }

    pub fn translated(&self, dx: i32, dy: i32) -> Rect {
        Rect::new(self.x + dx, self.y + dy, self.width, self.height)
    }
}

/// Lower-left corner of a placed room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

/// A named room: immutable original size, mutable current geometry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub name: String,
    pub original_width: i32,
    pub original_height: i32,
    pub width: i32,
    pub height: i32,
    pub position: Option<Position>,
    pub rotated: bool,
    pub max_expansion: u32,
}

impl Room {
    pub fn new(
        id: RoomId,
        name: impl Into<String>,
        width: i32,
        height: i32,
        max_expansion: u32,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            original_width: width,
            original_height: height,
            width,
            height,
            position: None,
            rotated: false,
            max_expansion,
        }
    }

    pub fn is_placed(&self) -> bool {
        self.position.is_some()
    }

    /// Current footprint, or `None` while unplaced.
    pub fn rect(&self) -> Option<Rect> {
        self.position
            .map(|p| Rect::new(p.x, p.y, self.width, self.height))
    }

    /// Footprint this room would have at `(x, y)` with its current size.
    pub fn rect_at(&self, x: i32, y: i32) -> Rect {
        Rect::new(x, y, self.width, self.height)
    }

    pub fn place_at(&mut self, x: i32, y: i32) {
        self.position = Some(Position { x, y });
    }

    pub fn unplace(&mut self) {
        self.position = None;
    }

    /// Swap width and height. Applying it twice restores the room.
    pub fn rotate(&mut self) {
        std::mem::swap(&mut self.width, &mut self.height);
        self.rotated = !self.rotated;
    }

    /// Original size in the current orientation.
    pub fn oriented_original(&self) -> (i32, i32) {
        if self.rotated {
            (self.original_height, self.original_width)
        } else {
            (self.original_width, self.original_height)
        }
    }

    /// Unplace, un-rotate and drop any expansion.
    pub fn reset(&mut self) {
        self.position = None;
        self.rotated = false;
        self.width = self.original_width;
        self.height = self.original_height;
    }

    /// Orientation-adjusted growth over both axes.
    pub fn growth_used(&self) -> i64 {
        let (w, h) = self.oriented_original();
        (self.width - w) as i64 + (self.height - h) as i64
    }

    /// Whether growing by `amount` more units would stay within budget.
    pub fn can_grow_by(&self, amount: i32) -> bool {
        self.growth_used() + amount as i64 <= self.max_expansion as i64
    }

    pub fn area(&self) -> i64 {
        self.width as i64 * self.height as i64
    }

    pub fn original_area(&self) -> i64 {
        self.original_width as i64 * self.original_height as i64
    }

    /// Whether both rooms are placed and share a wall.
    pub fn shares_wall_with(&self, other: &Room) -> bool {
        match (self.rect(), other.rect()) {
            (Some(a), Some(b)) => a.shares_wall(&b),
            _ => false,
        }
    }
}

impl fmt::Display for Room {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Room {} [{}x{}]", self.name, self.width, self.height)?;
        let (w, h) = self.oriented_original();
        if self.growth_used() != 0 {
            write!(f, " (expanded from {}x{}", w, h)?;
            if self.rotated {
                write!(f, " and rotated")?;
            }
            write!(f, ")")?;
        } else if self.rotated {
            write!(
                f,
                " (rotated from {}x{})",
                self.original_width, self.original_height
            )?;
        }
        match self.position {
            Some(p) => write!(f, " at ({}, {})", p.x, p.y)?,
            None => write!(f, " unplaced")?,
        }
        write!(f, " (max expansion: {})", self.max_expansion)
    }
}
