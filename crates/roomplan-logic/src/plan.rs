//! The engine facade: build a floor plan, run a layout, read the result.
//!
//! A [`FloorPlan`] owns the floor shape, the rooms, the constraint graph and
//! the overlap index. Every geometry change goes through the helpers here so
//! the index always matches the committed room positions.
//!
//! ```
//! use roomplan_logic::config::LayoutConfig;
//! use roomplan_logic::floor::{FloorShape, Region};
//! use roomplan_logic::plan::FloorPlan;
//!
//! let floor = FloorShape::new(vec![Region::new(0, 0, 10, 10)]).unwrap();
//! let mut plan = FloorPlan::new(floor);
//! plan.add_room("Kitchen", 4, 3, 2).unwrap();
//! plan.add_room("Pantry", 2, 2, 0).unwrap();
//! plan.add_required_adjacency("Kitchen", "Pantry").unwrap();
//!
//! let outcome = plan.generate_layout(&LayoutConfig::new(50, None, true, true, Some(1))).unwrap();
//! assert!(outcome.success);
//! assert!(plan.room("Pantry").unwrap().is_placed());
//! ```

use std::collections::HashMap;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::adjacency::{ConstraintGraph, EdgeKind};
use crate::candidates::{creates_forbidden_wall, LiveOccupancy, Occupancy};
use crate::config::{validate_config, EngineFeatures, LayoutConfig, SearchStrategy};
use crate::error::{LayoutError, Result};
use crate::floor::FloorShape;
use crate::report::{LayoutOutcome, LayoutReport, RoomPlacement};
use crate::room::{Rect, Room, RoomId};
use crate::scoring;
use crate::search::Snapshot;
use crate::spatial::SpatialIndex;
use crate::validation::{self, ValidationError};

/// Rooms placed inside an irregular floor under adjacency constraints.
#[derive(Debug, Clone)]
pub struct FloorPlan {
    pub(crate) floor: FloorShape,
    pub(crate) features: EngineFeatures,
    pub(crate) rooms: Vec<Room>,
    pub(crate) graph: ConstraintGraph,
    pub(crate) index: SpatialIndex,
    lookup: HashMap<String, RoomId>,
}

impl FloorPlan {
    pub fn new(floor: FloorShape) -> Self {
        Self::with_features(floor, EngineFeatures::default())
    }

    pub fn with_features(floor: FloorShape, features: EngineFeatures) -> Self {
        Self {
            floor,
            features,
            rooms: Vec::new(),
            graph: ConstraintGraph::new(),
            index: SpatialIndex::new(),
            lookup: HashMap::new(),
        }
    }

    // ── Construction ───────────────────────────────────────────────────

    /// Register an unplaced room. Names are unique.
    pub fn add_room(
        &mut self,
        name: impl Into<String>,
        width: i32,
        height: i32,
        max_expansion: u32,
    ) -> Result<RoomId> {
        let name = name.into();
        if width <= 0 || height <= 0 {
            return Err(LayoutError::InvalidRoomSize {
                name,
                width,
                height,
            });
        }
        if self.lookup.contains_key(&name) {
            return Err(LayoutError::DuplicateRoom(name));
        }
        let id = self.graph.register();
        self.lookup.insert(name.clone(), id);
        self.rooms.push(Room::new(id, name, width, height, max_expansion));
        Ok(id)
    }

    /// Require `a` and `b` to share a wall.
    pub fn add_required_adjacency(&mut self, a: &str, b: &str) -> Result<()> {
        self.add_constraint(EdgeKind::Required, a, b)
    }

    /// Forbid `a` and `b` from sharing a wall.
    pub fn add_forbidden_adjacency(&mut self, a: &str, b: &str) -> Result<()> {
        self.add_constraint(EdgeKind::Forbidden, a, b)
    }

    fn add_constraint(&mut self, kind: EdgeKind, a: &str, b: &str) -> Result<()> {
        let (id_a, id_b) = match (self.lookup.get(a), self.lookup.get(b)) {
            (Some(&x), Some(&y)) => (x, y),
            (None, _) => return Err(self.unknown(kind, a, b, a)),
            (_, None) => return Err(self.unknown(kind, a, b, b)),
        };
        self.graph.add(kind, id_a, id_b);
        Ok(())
    }

    fn unknown(&self, kind: EdgeKind, a: &str, b: &str, missing: &str) -> LayoutError {
        log::warn!("dropping {kind:?} adjacency {a:?} - {b:?}: no room named {missing:?}");
        LayoutError::UnknownRoom(missing.to_string())
    }

    // ── Read ───────────────────────────────────────────────────────────

    pub fn floor(&self) -> &FloorShape {
        &self.floor
    }

    pub fn features(&self) -> EngineFeatures {
        self.features
    }

    pub fn graph(&self) -> &ConstraintGraph {
        &self.graph
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn room(&self, name: &str) -> Option<&Room> {
        self.lookup.get(name).map(|id| &self.rooms[id.0])
    }

    pub fn room_id(&self, name: &str) -> Option<RoomId> {
        self.lookup.get(name).copied()
    }

    /// Current geometry of every room, in registration order.
    pub fn placements(&self) -> Vec<RoomPlacement> {
        self.rooms.iter().map(RoomPlacement::from).collect()
    }

    /// Whether two named rooms are both placed and share a wall.
    pub fn shares_wall(&self, a: &str, b: &str) -> bool {
        match (self.room(a), self.room(b)) {
            (Some(ra), Some(rb)) => ra.shares_wall_with(rb),
            _ => false,
        }
    }

    pub fn report(&self) -> LayoutReport {
        LayoutReport::build(&self.floor, &self.rooms, &self.graph)
    }

    /// Structural checks of the current layout.
    pub fn validate(&self) -> Vec<ValidationError> {
        validation::validate_all(&self.floor, &self.rooms, &self.graph)
    }

    // ── Run ────────────────────────────────────────────────────────────

    /// Run the configured search and post passes with an RNG seeded from
    /// `config.seed` (or a fresh seed, reported in the outcome).
    pub fn generate_layout(&mut self, config: &LayoutConfig) -> Result<LayoutOutcome> {
        check_config(config)?;
        let seed = config.seed.unwrap_or_else(rand::random);
        if config.seed.is_none() {
            log::info!("no seed configured, using {seed}");
        }
        let mut rng = StdRng::seed_from_u64(seed);
        let mut outcome = self.generate_layout_with_rng(config, &mut rng)?;
        outcome.seed = Some(seed);
        Ok(outcome)
    }

    /// Same as [`generate_layout`](Self::generate_layout) with a caller
    /// supplied RNG.
    pub fn generate_layout_with_rng<R: Rng + ?Sized>(
        &mut self,
        config: &LayoutConfig,
        rng: &mut R,
    ) -> Result<LayoutOutcome> {
        check_config(config)?;
        let started = Instant::now();
        let deadline = config.timeout.map(|t| started + t);
        log::info!(
            "layout: {} rooms, {} required / {} forbidden edges, strategy {:?}",
            self.rooms.len(),
            self.graph.required_count(),
            self.graph.forbidden_count(),
            config.strategy
        );

        let result = match config.strategy {
            SearchStrategy::RandomRestart => self.search_random_restart(config, deadline, rng),
            SearchStrategy::BreadthFirst => self.search_breadth_first(config, deadline, rng),
            SearchStrategy::ClusterGrowth => self.search_cluster_growth(config, deadline, rng),
        };

        match &result.snapshot {
            Some(snapshot) => self.apply_snapshot(snapshot),
            None => self.reset_rooms(),
        }

        if result.complete {
            if self.features.minimum_adjacency {
                let moved = self.enforce_minimum_adjacency();
                log::debug!("minimum adjacency moved {moved} rooms");
            }
            if config.enable_compaction && self.features.compaction {
                let steps = self.compact();
                log::debug!("compaction applied {steps} unit moves");
            }
        }

        let adjacency = scoring::evaluate(&self.rooms, &self.graph);
        let placed_rooms = self.rooms.iter().filter(|r| r.is_placed()).count();
        let outcome = LayoutOutcome {
            success: result.complete && placed_rooms == self.rooms.len(),
            score: adjacency.score,
            max_score: adjacency.max_score,
            satisfied_pairs: adjacency.satisfied,
            violated_pairs: adjacency.violated,
            unmet_pairs: adjacency.unmet,
            placed_rooms,
            total_rooms: self.rooms.len(),
            attempts: result.attempts,
            nodes_explored: result.nodes,
            timed_out: result.timed_out,
            seed: None,
        };
        log::info!(
            "layout finished in {:?}: success={} score={}/{} placed={}/{}",
            started.elapsed(),
            outcome.success,
            outcome.score,
            outcome.max_score,
            outcome.placed_rooms,
            outcome.total_rooms
        );
        Ok(outcome)
    }

    // ── Geometry helpers ───────────────────────────────────────────────

    pub(crate) fn occupancy(&self) -> LiveOccupancy<'_> {
        LiveOccupancy {
            rooms: &self.rooms,
            index: self.features.spatial_indexing.then_some(&self.index),
        }
    }

    /// Whether `rect` for `id` would share a wall with a placed forbidden
    /// neighbor. Always false when forbidden adjacency is disabled.
    pub(crate) fn creates_forbidden_adjacency(&self, id: RoomId, rect: &Rect) -> bool {
        self.features.forbidden_adjacency
            && creates_forbidden_wall(&self.graph, &self.occupancy(), id, rect)
    }

    /// In-floor, overlap-free and forbidden-safe.
    pub(crate) fn is_valid_live(&self, id: RoomId, rect: &Rect) -> bool {
        self.floor.contains_rect(rect)
            && self.occupancy().is_free(id, rect)
            && !self.creates_forbidden_adjacency(id, rect)
    }

    /// Place an unplaced room and register it in the index.
    pub(crate) fn place_room(&mut self, id: RoomId, x: i32, y: i32) {
        let room = &mut self.rooms[id.0];
        self.index.remove(room);
        room.place_at(x, y);
        self.index.insert(room);
    }

    /// Replace a placed room's footprint, keeping the index consistent.
    pub(crate) fn set_rect(&mut self, id: RoomId, rect: Rect) {
        let room = &mut self.rooms[id.0];
        self.index.remove(room);
        room.place_at(rect.x, rect.y);
        room.width = rect.width;
        room.height = rect.height;
        self.index.insert(room);
    }

    /// Unplace, un-rotate and shrink every room; empty the index.
    pub(crate) fn reset_rooms(&mut self) {
        for room in &mut self.rooms {
            room.reset();
        }
        self.index.clear();
    }

    pub(crate) fn apply_snapshot(&mut self, snapshot: &Snapshot) {
        snapshot.restore(&mut self.rooms);
        self.index.rebuild(&self.rooms);
    }

    /// Search order: most required edges first, then largest area. Stable,
    /// so ties keep registration order.
    pub(crate) fn placement_order(&self) -> Vec<RoomId> {
        let mut order: Vec<RoomId> = self.rooms.iter().map(|r| r.id).collect();
        order.sort_by(|a, b| {
            let key = |id: &RoomId| {
                (
                    self.graph.required_degree(*id),
                    self.rooms[id.0].original_area(),
                )
            };
            key(b).cmp(&key(a))
        });
        order
    }

    pub(crate) fn placed_count(&self) -> usize {
        self.rooms.iter().filter(|r| r.is_placed()).count()
    }
}

fn check_config(config: &LayoutConfig) -> Result<()> {
    let errors = validate_config(config);
    if errors.is_empty() {
        Ok(())
    } else {
        log::warn!("rejecting layout config: {errors:?}");
        Err(LayoutError::InvalidConfig(errors))
    }
}
