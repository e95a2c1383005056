//! Floor boundary as a union of axis-aligned rectangular regions.
//!
//! The union may be non-convex (an L-shape, a U-shape), so containment of a
//! rectangle is decided cell by cell rather than against a bounding box.

use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, Result};
use crate::room::Rect;

/// One rectangle contributing to the floor shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Region {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn contains_point(&self, x: i32, y: i32) -> bool {
        self.x <= x && x < self.x + self.width && self.y <= y && y < self.y + self.height
    }

    /// Whether `rect` lies entirely inside this single region.
    pub fn contains_rect(&self, rect: &Rect) -> bool {
        rect.x >= self.x
            && rect.y >= self.y
            && rect.right() <= self.x + self.width
            && rect.top() <= self.y + self.height
    }

    /// Whether a `width`×`height` room could fit in this region at all.
    pub fn fits(&self, width: i32, height: i32) -> bool {
        self.width >= width && self.height >= height
    }

    pub fn area(&self) -> i64 {
        self.width as i64 * self.height as i64
    }
}

/// Ordered, non-empty set of regions whose union is the usable floor.
///
/// Serialized as the bare region list. Deserializing goes through
/// [`FloorShape::new`], so an empty or degenerate floor is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Region>", into = "Vec<Region>")]
pub struct FloorShape {
    regions: Vec<Region>,
}

impl TryFrom<Vec<Region>> for FloorShape {
    type Error = LayoutError;

    fn try_from(regions: Vec<Region>) -> Result<Self> {
        Self::new(regions)
    }
}

impl From<FloorShape> for Vec<Region> {
    fn from(floor: FloorShape) -> Self {
        floor.regions
    }
}

impl FloorShape {
    /// Build a floor from explicit regions. Every region must have positive
    /// width and height.
    pub fn new(regions: Vec<Region>) -> Result<Self> {
        if regions.is_empty() {
            return Err(LayoutError::EmptyFloor);
        }
        for (index, r) in regions.iter().enumerate() {
            if r.width <= 0 || r.height <= 0 {
                return Err(LayoutError::InvalidRegion {
                    index,
                    width: r.width,
                    height: r.height,
                });
            }
        }
        Ok(Self { regions })
    }

    /// Build a floor from `(width, height)` bands stacked upward from the
    /// origin, each starting at `x = 0`.
    pub fn stacked(bands: &[(i32, i32)]) -> Result<Self> {
        let mut regions = Vec::with_capacity(bands.len());
        let mut y = 0;
        for &(width, height) in bands {
            regions.push(Region::new(0, y, width, height));
            y += height;
        }
        Self::new(regions)
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Bounding extent `(max(x + width), max(y + height))` over all regions.
    pub fn bounds(&self) -> (i32, i32) {
        let w = self.regions.iter().map(|r| r.x + r.width).max().unwrap_or(0);
        let h = self.regions.iter().map(|r| r.y + r.height).max().unwrap_or(0);
        (w, h)
    }

    pub fn contains_point(&self, x: i32, y: i32) -> bool {
        self.regions.iter().any(|r| r.contains_point(x, y))
    }

    /// True iff every unit cell covered by `rect` is inside some region.
    ///
    /// Cost is O(w·h·regions); room sizes are small integers so this stays
    /// cheap, but do not call it over huge rectangles in a tight loop.
    pub fn contains_rect(&self, rect: &Rect) -> bool {
        if rect.width <= 0 || rect.height <= 0 {
            return false;
        }
        // Fast path: one region covers it all.
        if self.region_containing(rect).is_some() {
            return true;
        }
        for dx in 0..rect.width {
            for dy in 0..rect.height {
                if !self.contains_point(rect.x + dx, rect.y + dy) {
                    return false;
                }
            }
        }
        true
    }

    /// First region that fully contains `rect` on its own.
    pub fn region_containing(&self, rect: &Rect) -> Option<&Region> {
        self.regions.iter().find(|r| r.contains_rect(rect))
    }

    /// Region with the largest area (first one on ties).
    pub fn largest_region(&self) -> &Region {
        let mut best = &self.regions[0];
        for r in &self.regions[1..] {
            if r.area() > best.area() {
                best = r;
            }
        }
        best
    }

    /// Area of the union of all regions. Overlapping regions are counted
    /// once.
    pub fn area(&self) -> i64 {
        let mut xs: Vec<i32> = Vec::with_capacity(self.regions.len() * 2);
        let mut ys: Vec<i32> = Vec::with_capacity(self.regions.len() * 2);
        for r in &self.regions {
            xs.push(r.x);
            xs.push(r.x + r.width);
            ys.push(r.y);
            ys.push(r.y + r.height);
        }
        xs.sort_unstable();
        xs.dedup();
        ys.sort_unstable();
        ys.dedup();

        let mut total = 0i64;
        for xi in xs.windows(2) {
            for yi in ys.windows(2) {
                // Each compressed cell is either fully inside a region or not at all.
                if self.contains_point(xi[0], yi[0]) {
                    total += (xi[1] - xi[0]) as i64 * (yi[1] - yi[0]) as i64;
                }
            }
        }
        total
    }
}
