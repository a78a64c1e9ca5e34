//! `ps-core` — foundational types for the `rust_ped` pedestrian simulator.
//!
//! This crate is a dependency of every other `ps-*` crate.  It intentionally
//! has no `ps-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `AgentId`, `StageId`, `JourneyId`                     |
//! | [`point`]       | `Point` — planar coordinate and 2-D vector maths      |
//! | [`time`]        | `Step`, `SimClock` (fixed timestep `dt`)              |
//! | [`rng`]         | `SimRng` (seeded, deterministic)                      |
//! | [`error`]       | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public value types.  |

pub mod error;
pub mod ids;
pub mod point;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use ids::{AgentId, JourneyId, StageId};
pub use point::Point;
pub use rng::SimRng;
pub use time::{SimClock, Step};
