//! Pure room layout synthesis.
//!
//! This crate places named rectangular rooms inside an irregular floor made
//! of axis-aligned regions, honoring "must share a wall" and "must not share
//! a wall" constraints, then grows and compacts the result. It does no I/O:
//! every input and output is plain data, and every random decision draws
//! from a caller-visible RNG so runs are reproducible from a seed.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`adjacency`] | Required/forbidden edge sets, adjacency clusters |
//! | [`candidates`] | Flush, partial-wall and random candidate positions |
//! | [`compaction`] | Slide rooms toward the origin to a fixed point |
//! | [`config`] | Run budget, strategy, feature flags and validation |
//! | [`enforcement`] | Move isolated rooms flush against a neighbor |
//! | [`error`] | `LayoutError` for construction and config failures |
//! | [`expansion`] | Budgeted greedy growth into leftover space |
//! | [`floor`] | Regions and the non-convex floor union |
//! | [`plan`] | `FloorPlan` facade: build, run, read, report |
//! | [`report`] | Run outcome, per-room placements, utilization stats |
//! | [`room`] | Rooms, integer rectangles and the shared-wall predicate |
//! | [`scoring`] | Adjacency score and per-pair breakdown |
//! | [`search`] | Random-restart, breadth-first and cluster-growth search |
//! | [`spatial`] | 2×2 grid index for overlap queries |
//! | [`state`] | Structurally shared breadth-first branch state |
//! | [`validation`] | Post-hoc layout checks (overlap, containment, budget) |

pub mod adjacency;
pub mod candidates;
pub mod compaction;
pub mod config;
pub mod enforcement;
pub mod error;
pub mod expansion;
pub mod floor;
pub mod plan;
pub mod report;
pub mod room;
pub mod scoring;
pub mod search;
pub mod spatial;
pub mod state;
pub mod validation;

pub use config::{EngineFeatures, LayoutConfig, SearchStrategy};
pub use error::{LayoutError, Result};
pub use floor::{FloorShape, Region};
pub use plan::FloorPlan;
pub use report::{LayoutOutcome, LayoutReport, RoomPlacement};
