//! `ps-agent` — agent state and storage for the `rust_ped` simulator.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                     |
//! |----------------|--------------------------------------------------------------|
//! | [`parameters`] | `AgentParameters` (`v0`, `radius`, `time_gap`) + validation  |
//! | [`agent`]      | `Agent` (live state), `AgentSpec` (what `add_agent` receives) |
//! | [`registry`]   | `AgentRegistry` — `BTreeMap<AgentId, Agent>`, monotonic ids  |
//! | [`snapshot`]   | `AgentSnapshot`, `Agents` (owned, restartable sequence)      |
//! | [`error`]      | `AgentError`, `AgentResult<T>`                               |
//!
//! # Ordering
//!
//! Agents are keyed by `AgentId` in a `BTreeMap`, so every iteration (the
//! velocity phase, the apply phase, snapshots) visits agents in ascending id
//! order.  Ids start at 1 and are never reused, even after removal.

pub mod agent;
pub mod error;
pub mod parameters;
pub mod registry;
pub mod snapshot;


pub use agent::{Agent, AgentSpec};
pub use error::{AgentError, AgentResult};
pub use parameters::AgentParameters;
pub use registry::AgentRegistry;
pub use snapshot::{AgentSnapshot, Agents};
