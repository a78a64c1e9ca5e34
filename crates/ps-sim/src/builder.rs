//! Fluent builder for constructing a [`Simulation`].

use std::sync::Arc;

use ps_core::SimClock;
use ps_geometry::Geometry;
use ps_model::OperationalModel;
use tracing::info;

use crate::{SimResult, Simulation};

/// Fluent builder for [`Simulation<M>`].
///
/// # Required inputs
///
/// - `Arc<Geometry>` — from [`ps_geometry::GeometryBuilder`]
/// - `Arc<M>` where `M: OperationalModel` — e.g. a
///   [`ps_model::CollisionFreeSpeedModel`]
///
/// Both are immutable and may be shared by any number of simulations.
///
/// # Optional inputs (have defaults)
///
/// | Method                 | Default                  |
/// |------------------------|--------------------------|
/// | `.dt(secs)`            | `0.01`                   |
/// | `.output_interval(n)`  | `1` (snapshot every step) |
pub struct SimulationBuilder<M: OperationalModel> {
    geometry:        Arc<Geometry>,
    model:           Arc<M>,
    dt:              f64,
    output_interval: u64,
}

impl<M: OperationalModel> SimulationBuilder<M> {
    pub const DEFAULT_DT: f64 = 0.01;

    pub fn new(geometry: Arc<Geometry>, model: Arc<M>) -> Self {
        Self {
            geometry,
            model,
            dt:              Self::DEFAULT_DT,
            output_interval: 1,
        }
    }

    /// Seconds per step.  Must be finite and > 0.
    pub fn dt(mut self, dt: f64) -> Self {
        self.dt = dt;
        self
    }

    /// Call `SimObserver::on_snapshot` every `n` steps (0 disables snapshots).
    pub fn output_interval(mut self, n: u64) -> Self {
        self.output_interval = n;
        self
    }

    pub fn build(self) -> SimResult<Simulation<M>> {
        let clock = SimClock::new(self.dt)?;
        info!(
            dt = self.dt,
            walls = self.geometry.wall_count(),
            area = self.geometry.area(),
            "simulation created"
        );
        Ok(Simulation::from_parts(self.geometry, self.model, clock, self.output_interval))
    }
}
