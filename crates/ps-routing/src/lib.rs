//! `ps-routing` — navigational stages and the journeys that chain them.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                  |
//! |--------------|-----------------------------------------------------------|
//! | [`stage`]    | `Stage` (`Exit` polygon / `Waypoint` circle), `StageKind` |
//! | [`journey`]  | `JourneyDescription` (mutable), `Journey` (immutable)     |
//! | [`registry`] | `RouteRegistry` — dense id-indexed stages and journeys    |
//! | [`error`]    | `RoutingError`, `RoutingResult<T>`                        |
//!
//! # Journey model (summary)
//!
//! A journey is an ordered list of stage ids.  An agent holds an index into
//! its journey; reaching a waypoint advances the index, reaching an exit
//! removes the agent:
//!
//! ```text
//! Waypoint(a) ──reached──▶ Waypoint(b) ──reached──▶ Exit(c) ──inside──▶ removed
//! ```
//!
//! Stages and journeys are never removed, so ids stay valid for the lifetime
//! of the registry.

pub mod error;
pub mod journey;
pub mod registry;
pub mod stage;


pub use error::{RoutingError, RoutingResult};
pub use journey::{Journey, JourneyDescription};
pub use registry::RouteRegistry;
pub use stage::{Stage, StageKind};
