//! Search-branch state for breadth-first placement.
//!
//! A [`PlacementState`] is a persistent singly linked list of committed
//! placements. Extending a state allocates one new head and shares the rest,
//! so forking a branch is O(1) and no branch can observe another's
//! additions.

use std::rc::Rc;

use crate::room::{Rect, RoomId};
use crate::spatial::CellSpan;

/// One committed room in a search branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub room: RoomId,
    pub rect: Rect,
    pub rotated: bool,
}

#[derive(Debug)]
struct Link {
    placement: Placement,
    cells: CellSpan,
    parent: Option<Rc<Link>>,
}

/// Immutable, structurally shared branch state.
#[derive(Debug, Clone, Default)]
pub struct PlacementState {
    head: Option<Rc<Link>>,
    len: usize,
    skipped: usize,
}

impl PlacementState {
    pub fn new() -> Self {
        Self::default()
    }

    /// A new state with `placement` committed on top of this one.
    pub fn with(&self, placement: Placement) -> Self {
        let link = Link {
            cells: CellSpan::of(&placement.rect),
            placement,
            parent: self.head.clone(),
        };
        Self {
            head: Some(Rc::new(link)),
            len: self.len + 1,
            skipped: self.skipped,
        }
    }

    /// A new state recording that one room could not be placed.
    pub fn with_skip(&self) -> Self {
        Self {
            head: self.head.clone(),
            len: self.len,
            skipped: self.skipped + 1,
        }
    }

    /// Number of committed placements.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of rooms this branch gave up on.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    fn links(&self) -> impl Iterator<Item = &Link> {
        std::iter::successors(self.head.as_deref(), |link| link.parent.as_deref())
    }

    /// Placements, most recent first.
    pub fn placements(&self) -> impl Iterator<Item = &Placement> {
        self.links().map(|link| &link.placement)
    }

    pub fn get(&self, room: RoomId) -> Option<&Placement> {
        self.placements().find(|p| p.room == room)
    }

    /// Whether `rect` strictly intersects any committed placement other than
    /// `excluding`. Placements whose cell span is disjoint are skipped
    /// without the exact test.
    pub fn overlaps(&self, excluding: Option<RoomId>, rect: &Rect) -> bool {
        let span = CellSpan::of(rect);
        self.links().any(|link| {
            Some(link.placement.room) != excluding
                && link.cells.intersects(&span)
                && link.placement.rect.intersects(rect)
        })
    }
}
