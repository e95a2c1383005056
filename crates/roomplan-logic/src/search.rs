//! Placement search.
//!
//! Three strategies share the same candidate generator and the same notion
//! of "best": a complete layout beats any partial one, more placed rooms
//! beat fewer, and a higher score breaks the tie. Each strategy returns a
//! [`SearchResult`]; the caller commits its snapshot.
//!
//! | Strategy | Shape | Budget |
//! |----------|-------|--------|
//! | Random restart | greedy attempts, first valid candidate | `max_attempts`, timeout |
//! | Breadth-first | FIFO over persistent [`PlacementState`]s | `max_nodes`, `max_depth`, timeout |
//! | Cluster growth | BFS through required edges, one cluster at a time | `max_attempts`, timeout |

use std::collections::{BTreeSet, VecDeque};
use std::time::Instant;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::candidates::{candidate_positions, CandidateRequest};
use crate::config::LayoutConfig;
use crate::plan::FloorPlan;
use crate::room::{Position, Rect, Room, RoomId};
use crate::scoring;
use crate::state::{Placement, PlacementState};

/// Cluster growth picks among this many best-ranked candidates.
const CLUSTER_TOP_CANDIDATES: usize = 5;

/// Geometry of one room inside a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedShape {
    pub rect: Rect,
    pub rotated: bool,
}

/// Per-room geometry captured from a candidate layout, indexed by room id.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Snapshot(pub Vec<Option<PlacedShape>>);

impl Snapshot {
    pub fn capture(rooms: &[Room]) -> Self {
        Self(
            rooms
                .iter()
                .map(|r| {
                    r.rect().map(|rect| PlacedShape {
                        rect,
                        rotated: r.rotated,
                    })
                })
                .collect(),
        )
    }

    /// Reset every room, then re-apply the captured geometry.
    pub fn restore(&self, rooms: &mut [Room]) {
        for (room, shape) in rooms.iter_mut().zip(&self.0) {
            room.reset();
            if let Some(shape) = shape {
                if shape.rotated {
                    room.rotate();
                }
                room.width = shape.rect.width;
                room.height = shape.rect.height;
                room.place_at(shape.rect.x, shape.rect.y);
            }
        }
    }

    pub fn placed(&self) -> usize {
        self.0.iter().filter(|s| s.is_some()).count()
    }
}

/// What a strategy found.
#[derive(Debug, Clone, Default)]
pub struct SearchResult {
    /// Whether `snapshot` places every room.
    pub complete: bool,
    pub snapshot: Option<Snapshot>,
    pub score: i64,
    pub placed: usize,
    /// Breadth-first states dequeued.
    pub nodes: usize,
    pub attempts: u32,
    pub timed_out: bool,
}

impl SearchResult {
    /// Keep `snapshot` if it ranks above the current best.
    fn offer(&mut self, snapshot: Snapshot, complete: bool, score: i64) -> bool {
        let placed = snapshot.placed();
        let better = self.snapshot.is_none()
            || (complete, placed, score) > (self.complete, self.placed, self.score);
        if better {
            self.snapshot = Some(snapshot);
            self.complete = complete;
            self.placed = placed;
            self.score = score;
        }
        better
    }

    fn is_perfect(&self, perfect: i64) -> bool {
        self.complete && self.score >= perfect
    }
}

fn expired(deadline: Option<Instant>) -> bool {
    deadline.is_some_and(|d| Instant::now() >= d)
}

impl FloorPlan {
    fn candidate_request(&self, id: RoomId, width: i32, height: i32) -> CandidateRequest<'_> {
        CandidateRequest {
            floor: &self.floor,
            graph: &self.graph,
            room: id,
            width,
            height,
            check_forbidden: self.features.forbidden_adjacency,
            limit: 0,
            random_samples: 0,
        }
    }

    /// Live candidates for `id` in its current orientation.
    fn live_candidates<R: Rng + ?Sized>(
        &self,
        id: RoomId,
        limit: usize,
        random_samples: usize,
        rng: &mut R,
    ) -> Vec<Position> {
        let room = &self.rooms[id.0];
        let request = CandidateRequest {
            limit,
            random_samples,
            ..self.candidate_request(id, room.width, room.height)
        };
        candidate_positions(&request, &self.occupancy(), rng)
    }

    /// Place `id` at its first valid candidate, rotating once if needed.
    fn place_first_candidate<R: Rng + ?Sized>(
        &mut self,
        id: RoomId,
        config: &LayoutConfig,
        rng: &mut R,
    ) -> bool {
        for turn in 0..2 {
            if turn == 1 {
                self.rooms[id.0].rotate();
            }
            let found = self.live_candidates(id, 1, config.random_samples, rng);
            if let Some(p) = found.first() {
                self.place_room(id, p.x, p.y);
                return true;
            }
        }
        false
    }

    fn expansion_enabled(&self, config: &LayoutConfig) -> bool {
        config.enable_expansion && self.features.expansion
    }

    /// Expand (if enabled) and score the live layout, then offer it.
    fn evaluate_candidate<R: Rng + ?Sized>(
        &mut self,
        config: &LayoutConfig,
        complete: bool,
        best: &mut SearchResult,
        rng: &mut R,
    ) -> i64 {
        if self.expansion_enabled(config) {
            self.expand_rooms(&config.expansion_increments, rng);
        }
        let score = scoring::score(&self.rooms, &self.graph);
        best.offer(Snapshot::capture(&self.rooms), complete, score);
        score
    }

    // ── Random restart ─────────────────────────────────────────────────

    pub(crate) fn search_random_restart<R: Rng + ?Sized>(
        &mut self,
        config: &LayoutConfig,
        deadline: Option<Instant>,
        rng: &mut R,
    ) -> SearchResult {
        let order = self.placement_order();
        let perfect = self.graph.required_count() as i64;
        let mut best = SearchResult::default();

        for attempt in 0..config.max_attempts {
            if expired(deadline) {
                best.timed_out = true;
                break;
            }
            best.attempts += 1;

            self.reset_rooms();
            for room in &mut self.rooms {
                if rng.gen_bool(0.5) {
                    room.rotate();
                }
            }

            let have_complete = best.complete;
            let mut complete = true;
            for &id in &order {
                if !self.place_first_candidate(id, config, rng) {
                    complete = false;
                    if have_complete {
                        break;
                    }
                }
            }
            if !complete && have_complete {
                continue;
            }

            let score = self.evaluate_candidate(config, complete, &mut best, rng);
            log::debug!(
                "attempt {attempt}: placed {}/{} score {score}",
                self.placed_count(),
                self.rooms.len()
            );
            if best.is_perfect(perfect) {
                break;
            }
        }
        best
    }

    // ── Breadth-first ──────────────────────────────────────────────────

    pub(crate) fn search_breadth_first<R: Rng + ?Sized>(
        &mut self,
        config: &LayoutConfig,
        deadline: Option<Instant>,
        rng: &mut R,
    ) -> SearchResult {
        let order = self.placement_order();
        let perfect = self.graph.required_count() as i64;
        let max_depth = config.max_depth.unwrap_or(order.len()).min(order.len());
        let mut best = SearchResult {
            attempts: 1,
            ..SearchResult::default()
        };

        let mut queue = VecDeque::new();
        queue.push_back((0usize, PlacementState::new()));

        while let Some((depth, state)) = queue.pop_front() {
            if expired(deadline) {
                best.timed_out = true;
                break;
            }
            if best.nodes >= config.max_nodes {
                log::debug!("breadth-first node budget exhausted");
                break;
            }
            best.nodes += 1;

            if depth >= max_depth {
                let complete = state.skipped() == 0 && state.len() == order.len();
                self.apply_state(&state);
                self.evaluate_candidate(config, complete, &mut best, rng);
                if best.is_perfect(perfect) {
                    break;
                }
                continue;
            }

            let id = order[depth];
            let (w, h) = (
                self.rooms[id.0].original_width,
                self.rooms[id.0].original_height,
            );
            let mut pushed = false;
            for rotated in [false, true] {
                if rotated && w == h {
                    continue;
                }
                let (cw, ch) = if rotated { (h, w) } else { (w, h) };
                let request = CandidateRequest {
                    limit: config.bfs_fan_out,
                    random_samples: config.random_samples,
                    ..self.candidate_request(id, cw, ch)
                };
                for p in candidate_positions(&request, &state, rng) {
                    if queue.len() >= config.bfs_queue_limit {
                        break;
                    }
                    let placement = Placement {
                        room: id,
                        rect: Rect::new(p.x, p.y, cw, ch),
                        rotated,
                    };
                    queue.push_back((depth + 1, state.with(placement)));
                    pushed = true;
                }
            }
            if !pushed && queue.len() < config.bfs_queue_limit {
                queue.push_back((depth + 1, state.with_skip()));
            }

            if best.nodes % 1000 == 0 {
                log::debug!(
                    "breadth-first: {} nodes, depth {depth}, queue {}",
                    best.nodes,
                    queue.len()
                );
            }
        }
        best
    }

    /// Materialize a branch state onto the live rooms.
    fn apply_state(&mut self, state: &PlacementState) {
        self.reset_rooms();
        for p in state.placements() {
            let room = &mut self.rooms[p.room.0];
            if p.rotated {
                room.rotate();
            }
            room.place_at(p.rect.x, p.rect.y);
        }
        self.index.rebuild(&self.rooms);
    }

    // ── Cluster growth ─────────────────────────────────────────────────

    pub(crate) fn search_cluster_growth<R: Rng + ?Sized>(
        &mut self,
        config: &LayoutConfig,
        deadline: Option<Instant>,
        rng: &mut R,
    ) -> SearchResult {
        let clusters = self.graph.clusters(&self.rooms);
        let perfect = self.graph.required_count() as i64;
        let mut best = SearchResult::default();

        for attempt in 0..config.max_attempts {
            if expired(deadline) {
                best.timed_out = true;
                break;
            }
            best.attempts += 1;

            self.reset_rooms();
            for room in &mut self.rooms {
                if rng.gen_bool(0.5) {
                    room.rotate();
                }
            }

            let have_complete = best.complete;
            let mut complete = true;
            for cluster in &clusters {
                if !self.grow_cluster(cluster, config, rng) {
                    complete = false;
                    if have_complete {
                        break;
                    }
                }
            }
            if !complete && have_complete {
                continue;
            }

            let score = self.evaluate_candidate(config, complete, &mut best, rng);
            log::debug!("cluster attempt {attempt}: score {score}");
            if best.is_perfect(perfect) {
                break;
            }
        }
        best
    }

    /// Place one cluster breadth-first along its required edges. Returns
    /// whether every member was placed.
    fn grow_cluster<R: Rng + ?Sized>(
        &mut self,
        cluster: &[RoomId],
        config: &LayoutConfig,
        rng: &mut R,
    ) -> bool {
        let mut remaining: BTreeSet<RoomId> = cluster.iter().copied().collect();
        let mut all_placed = true;

        if self.placed_count() == 0 {
            if let Some(start) = self.largest_of(cluster) {
                remaining.remove(&start);
                if !self.place_centered(start, config, rng) {
                    all_placed = false;
                }
            }
        }

        let mut queue: VecDeque<RoomId> = remaining
            .iter()
            .copied()
            .filter(|&id| self.has_placed_neighbor(id))
            .collect();

        while !remaining.is_empty() {
            let id = match queue.pop_front() {
                Some(id) => id,
                None => match self.largest_of(&remaining.iter().copied().collect::<Vec<_>>()) {
                    Some(id) => id,
                    None => break,
                },
            };
            if !remaining.remove(&id) {
                continue;
            }

            if self.place_best_ranked(id, config, rng) {
                for &next in self.graph.required_neighbors(id) {
                    if remaining.contains(&next) && !queue.contains(&next) {
                        queue.push_back(next);
                    }
                }
            } else {
                all_placed = false;
            }
        }
        all_placed
    }

    fn largest_of(&self, ids: &[RoomId]) -> Option<RoomId> {
        let mut best: Option<RoomId> = None;
        for &id in ids {
            let area = self.rooms[id.0].area();
            if best.map_or(true, |b| area > self.rooms[b.0].area()) {
                best = Some(id);
            }
        }
        best
    }

    fn has_placed_neighbor(&self, id: RoomId) -> bool {
        self.graph
            .required_neighbors(id)
            .iter()
            .any(|n| self.rooms[n.0].is_placed())
    }

    /// Center `id` in the largest region, falling back to any candidate.
    fn place_centered<R: Rng + ?Sized>(
        &mut self,
        id: RoomId,
        config: &LayoutConfig,
        rng: &mut R,
    ) -> bool {
        let region = *self.floor.largest_region();
        let room = &self.rooms[id.0];
        let (w, h) = (room.width, room.height);
        let x = (region.x + (region.width - w) / 2)
            .min(region.x + region.width - w)
            .max(region.x);
        let y = (region.y + (region.height - h) / 2)
            .min(region.y + region.height - h)
            .max(region.y);
        if self.is_valid_live(id, &Rect::new(x, y, w, h)) {
            self.place_room(id, x, y);
            return true;
        }
        self.place_first_candidate(id, config, rng)
    }

    /// Place `id` where it shares walls with the most placed required
    /// neighbors, choosing randomly among equally ranked top candidates.
    fn place_best_ranked<R: Rng + ?Sized>(
        &mut self,
        id: RoomId,
        config: &LayoutConfig,
        rng: &mut R,
    ) -> bool {
        let neighbors: Vec<Rect> = self
            .graph
            .required_neighbors(id)
            .iter()
            .filter_map(|n| self.rooms[n.0].rect())
            .collect();
        let samples = if neighbors.is_empty() {
            config.random_samples
        } else {
            0
        };

        for turn in 0..2 {
            if turn == 1 {
                self.rooms[id.0].rotate();
            }
            let (w, h) = (self.rooms[id.0].width, self.rooms[id.0].height);
            let found = self.live_candidates(id, config.max_positions_per_room, samples, rng);
            let mut ranked: Vec<(Position, usize)> = found
                .into_iter()
                .map(|p| {
                    let rect = Rect::new(p.x, p.y, w, h);
                    let walls = neighbors.iter().filter(|n| n.shares_wall(&rect)).count();
                    (p, walls)
                })
                .collect();
            ranked.sort_by(|a, b| b.1.cmp(&a.1));
            ranked.truncate(CLUSTER_TOP_CANDIDATES);

            let Some(top) = ranked.first().map(|r| r.1) else {
                continue;
            };
            let ties: Vec<Position> = ranked
                .iter()
                .filter(|r| r.1 == top)
                .map(|r| r.0)
                .collect();
            if let Some(p) = ties.choose(rng) {
                self.place_room(id, p.x, p.y);
                return true;
            }
        }
        false
    }
}
