//! `ps-scenario` — scenario files and the host-facing session lifecycle.
//!
//! A [`Scenario`] is plain data: a walkable boundary, one or more exit
//! polygons, agent start positions and the model/agent parameters.  It is
//! read from TOML or JSON and turned into a ready [`Simulation`] by
//! [`Scenario::build_simulation`].
//!
//! [`Session`] owns at most one simulation and exposes the
//! init → step → reset cycle a host application drives frame by frame:
//!
//! ```text
//!   NotStarted ──init──▶ Running ──step (last agent leaves)──▶ Finished
//!        ▲                  │                                     │
//!        └──── step error ──┘◀──────────── reset ─────────────────┘
//! ```
//!
//! [`Simulation`]: ps_sim::Simulation

pub mod error;
pub mod scenario;
pub mod session;


pub use error::{ScenarioError, ScenarioResult};
pub use scenario::{AgentParams, ModelParams, Scenario};
pub use session::{Session, SessionStatus};
