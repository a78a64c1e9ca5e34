//! `ps-model` — operational models: how agents pick a velocity each step.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                            |
//! |-------------|---------------------------------------------------------------------|
//! | [`context`] | `StepContext<'a>` (read-only step snapshot), `NeighbourIndex`       |
//! | [`model`]   | `OperationalModel` trait                                            |
//! | [`speed`]   | `CollisionFreeSpeedModel`, its builder, cut-off and standoff consts |
//! | [`error`]   | `ModelConfigError`, `ModelResult<T>`                                |
//!
//! # Design notes
//!
//! A simulation step is split in two:
//!
//! 1. **Velocity phase** (optionally parallel): for every live agent call
//!    `OperationalModel::compute_velocity`.  All reads go through
//!    `&StepContext`; nothing is mutated.
//!
//! 2. **Apply phase** (sequential, ascending `AgentId`): ps-sim integrates
//!    positions and handles stage transitions.
//!
//! Because the velocity phase never mutates, `OperationalModel` only needs
//! to be `Send + Sync`, and the result is identical whichever order agents
//! are evaluated in.

pub mod context;
pub mod error;
pub mod model;
pub mod speed;


pub use context::{NeighbourIndex, StepContext};
pub use error::{ModelConfigError, ModelResult};
pub use model::OperationalModel;
pub use speed::{
    CollisionFreeSpeedModel, CollisionFreeSpeedModelBuilder, CUTOFF_DECAY_LENGTHS, STANDOFF_FRACTION,
};
