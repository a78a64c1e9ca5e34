//! `ps-sim` — the simulation loop for the rust_ped framework.
//!
//! # Step loop
//!
//! ```text
//! iterate():
//!   ① Targets   — resolve each agent's current stage to a target point
//!                 (dangling references terminate the simulation).
//!   ② Velocity  — OperationalModel::compute_velocity for every agent
//!                 (parallel with the `parallel` feature).
//!   ③ Apply     — in ascending AgentId order:
//!                   position += velocity · dt
//!                   waypoint reached → advance to the next journey stage
//!                   exit reached     → remove the agent
//!   ④ Advance   — step counter + 1, back to `Ready`.
//! ```
//!
//! # State machine
//!
//! ```text
//! Ready ──iterate()──▶ Stepping ──ok──▶ Ready
//!                         │
//!                         └──invariant violated──▶ Terminated (final)
//! ```
//!
//! # Cargo features
//!
//! | Feature    | Effect                                             |
//! |------------|----------------------------------------------------|
//! | `parallel` | Runs the velocity phase on Rayon's thread pool.    |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! let geometry = Arc::new(GeometryBuilder::new().add_accessible_area(room).build()?);
//! let model = Arc::new(CollisionFreeSpeedModelBuilder::default().build()?);
//! let mut sim = SimulationBuilder::new(geometry, model).dt(0.01).build()?;
//!
//! let exit = sim.add_exit_stage(exit_polygon)?;
//! let journey = sim.add_journey(&JourneyDescription::new().with_stage(exit))?;
//! sim.add_agent(AgentSpec::new(Point::new(1.0, 5.0), journey, exit))?;
//! sim.run_until_empty(10_000, &mut NoopObserver)?;
//! ```

pub mod builder;
pub mod error;
pub mod observer;
pub mod sim;

#[cfg(test)]
mod tests;

pub use builder::SimulationBuilder;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver};
pub use sim::{SimState, Simulation, StepReport};
