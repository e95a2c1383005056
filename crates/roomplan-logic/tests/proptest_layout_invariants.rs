//! Property-based invariant tests for layout geometry and search.
//!
//! These tests verify structural invariants that must hold for any valid
//! inputs:
//!
//! 1. Shared walls are symmetric.
//! 2. Rooms that share a wall never overlap.
//! 3. Shared walls survive translating both rooms together.
//! 4. Rotating a room twice restores it.
//! 5. The spatial index agrees with a brute-force overlap scan.
//! 6. Any finished layout is overlap-free, in-floor and within budget.
//! 7. Forbidden pairs never share a wall after a run.

use proptest::prelude::*;
use roomplan_logic::config::LayoutConfig;
use roomplan_logic::floor::{FloorShape, Region};
use roomplan_logic::plan::FloorPlan;
use roomplan_logic::room::{Rect, Room, RoomId};
use roomplan_logic::spatial::SpatialIndex;

// ── Helpers ─────────────────────────────────────────────────────────────

fn rect_strategy() -> impl Strategy<Value = Rect> {
    (-20i32..=20, -20i32..=20, 1i32..=8, 1i32..=8)
        .prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
}

fn room_strategy() -> impl Strategy<Value = Room> {
    (1i32..=9, 1i32..=9, 0u32..=6, any::<bool>()).prop_map(|(w, h, budget, rotated)| {
        let mut room = Room::new(RoomId(0), "r", w, h, budget);
        if rotated {
            room.rotate();
        }
        room
    })
}

/// Rooms as `(width, height, budget)` and edges as index pairs.
type Scenario = (Vec<(i32, i32, u32)>, Vec<(usize, usize)>, Vec<(usize, usize)>, u64);

fn scenario_strategy() -> impl Strategy<Value = Scenario> {
    prop::collection::vec((1i32..=5, 1i32..=5, 0u32..=4), 2..=6).prop_flat_map(|rooms| {
        let n = rooms.len();
        (
            Just(rooms),
            prop::collection::vec((0..n, 0..n), 0..=5),
            prop::collection::vec((0..n, 0..n), 0..=2),
            any::<u64>(),
        )
    })
}

fn build_plan(scenario: &Scenario) -> FloorPlan {
    let (rooms, required, forbidden, _) = scenario;
    let floor = FloorShape::new(vec![Region::new(0, 0, 12, 8), Region::new(0, 8, 6, 6)])
        .expect("valid floor");
    let mut plan = FloorPlan::new(floor);
    for (i, &(w, h, budget)) in rooms.iter().enumerate() {
        plan.add_room(format!("room{i}"), w, h, budget).expect("unique positive room");
    }
    // Self-loops and duplicates are silently ignored by the graph.
    for &(a, b) in required {
        let _ = plan.add_required_adjacency(&format!("room{a}"), &format!("room{b}"));
    }
    for &(a, b) in forbidden {
        let _ = plan.add_forbidden_adjacency(&format!("room{a}"), &format!("room{b}"));
    }
    plan
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Shared walls are symmetric
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn shares_wall_symmetric(a in rect_strategy(), b in rect_strategy()) {
        prop_assert_eq!(
            a.shares_wall(&b),
            b.shares_wall(&a),
            "shares_wall is not symmetric: a={:?}, b={:?}",
            a, b
        );
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Rooms that share a wall never overlap
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn shared_wall_excludes_overlap(a in rect_strategy(), b in rect_strategy()) {
        if a.shares_wall(&b) {
            prop_assert!(!a.intersects(&b), "{:?} and {:?} overlap", a, b);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Translation invariance
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn shares_wall_translation_invariant(
        a in rect_strategy(),
        b in rect_strategy(),
        dx in -50i32..=50,
        dy in -50i32..=50,
    ) {
        prop_assert_eq!(
            a.shares_wall(&b),
            a.translated(dx, dy).shares_wall(&b.translated(dx, dy))
        );
        prop_assert_eq!(
            a.intersects(&b),
            a.translated(dx, dy).intersects(&b.translated(dx, dy))
        );
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Rotation is an involution
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn rotate_twice_is_identity(room in room_strategy()) {
        let mut twice = room.clone();
        twice.rotate();
        prop_assert_eq!((twice.width, twice.height), (room.height, room.width));
        prop_assert_eq!(twice.growth_used(), 0);
        twice.rotate();
        prop_assert_eq!(twice, room);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Spatial index agrees with brute force
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn spatial_index_matches_linear_scan(
        placed in prop::collection::vec(rect_strategy(), 0..12),
        query in rect_strategy(),
    ) {
        let rooms: Vec<Room> = placed
            .iter()
            .enumerate()
            .map(|(i, r)| {
                let mut room = Room::new(RoomId(i), format!("r{i}"), r.width, r.height, 0);
                room.place_at(r.x, r.y);
                room
            })
            .collect();
        let mut index = SpatialIndex::new();
        index.rebuild(&rooms);
        prop_assert_eq!(index.len(), rooms.len());

        let brute = placed.iter().any(|r| r.intersects(&query));
        prop_assert_eq!(index.overlaps(None, &query), brute);

        if let Some(first) = rooms.first() {
            let brute_excluding = placed[1..].iter().any(|r| r.intersects(&query));
            prop_assert_eq!(index.overlaps(Some(first.id), &query), brute_excluding);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Finished layouts are structurally sound
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn layout_is_overlap_free_and_contained(scenario in scenario_strategy()) {
        let mut plan = build_plan(&scenario);
        let config = LayoutConfig::new(15, None, true, true, Some(scenario.3));
        let outcome = plan.generate_layout(&config).expect("valid config");

        let rects: Vec<Rect> = plan.rooms().iter().filter_map(|r| r.rect()).collect();
        prop_assert_eq!(rects.len(), outcome.placed_rooms);
        for (i, a) in rects.iter().enumerate() {
            prop_assert!(plan.floor().contains_rect(a), "{:?} leaves the floor", a);
            for b in &rects[i + 1..] {
                prop_assert!(!a.intersects(b), "{:?} overlaps {:?}", a, b);
            }
        }
        for room in plan.rooms() {
            prop_assert!(room.growth_used() >= 0);
            prop_assert!(room.growth_used() <= i64::from(room.max_expansion));
        }
        prop_assert!(outcome.score <= outcome.max_score);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 7. Forbidden pairs stay apart
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn forbidden_pairs_never_share_a_wall(scenario in scenario_strategy()) {
        let mut plan = build_plan(&scenario);
        let config = LayoutConfig::new(15, None, true, true, Some(scenario.3));
        let outcome = plan.generate_layout(&config).expect("valid config");

        prop_assert!(
            outcome.violated_pairs.is_empty(),
            "violated: {:?}",
            outcome.violated_pairs
        );
        for &(a, b) in &scenario.2 {
            if a != b {
                let (a, b) = (format!("room{a}"), format!("room{b}"));
                prop_assert!(!plan.shares_wall(&a, &b), "{} touches {}", a, b);
            }
        }
    }
}
