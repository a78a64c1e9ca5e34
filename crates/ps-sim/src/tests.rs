//! Integration tests for ps-sim.

use std::sync::Arc;

use ps_agent::AgentSpec;
use ps_core::{JourneyId, Point, StageId};
use ps_geometry::{Geometry, GeometryBuilder, Polygon};
use ps_model::{CollisionFreeSpeedModel, CollisionFreeSpeedModelBuilder};
use ps_routing::JourneyDescription;

use crate::{Simulation, SimulationBuilder};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn square_room(size: f64) -> Arc<Geometry> {
    let mut b = GeometryBuilder::new();
    b.add_accessible_area(Polygon::rectangle(Point::new(0.0, 0.0), Point::new(size, size)));
    Arc::new(b.build().unwrap())
}

fn default_model() -> Arc<CollisionFreeSpeedModel> {
    Arc::new(CollisionFreeSpeedModelBuilder::default().build().unwrap())
}

fn sim_in_room(size: f64) -> Simulation {
    SimulationBuilder::new(square_room(size), default_model())
        .dt(0.01)
        .build()
        .unwrap()
}

/// Register an exit spanning `min..max` and a single-stage journey to it.
fn exit_route(sim: &mut Simulation, min: (f64, f64), max: (f64, f64)) -> (StageId, JourneyId) {
    let exit = sim
        .add_exit_stage(Polygon::rectangle(Point::new(min.0, min.1), Point::new(max.0, max.1)))
        .unwrap();
    let journey = sim.add_journey(&JourneyDescription::new().with_stage(exit)).unwrap();
    (exit, journey)
}

fn spec(x: f64, y: f64, journey: JourneyId, stage: StageId) -> AgentSpec {
    AgentSpec::new(Point::new(x, y), journey, stage)
}

// ── SimulationBuilder validation ──────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use super::*;
    use crate::{SimError, SimState};

    #[test]
    fn builds_with_defaults() {
        let sim: Simulation = SimulationBuilder::new(square_room(10.0), default_model())
            .build()
            .unwrap();
        assert_eq!(sim.dt(), 0.01);
        assert_eq!(sim.output_interval(), 1);
        assert_eq!(sim.state(), SimState::Ready);
        assert_eq!(sim.agent_count(), 0);
        assert_eq!(sim.current_step().0, 0);
    }

    #[test]
    fn invalid_dt_rejected() {
        for bad in [0.0, -0.01, f64::NAN, f64::INFINITY] {
            let result = SimulationBuilder::new(square_room(10.0), default_model())
                .dt(bad)
                .build();
            assert!(
                matches!(result, Err(SimError::InvalidTimeStep(_))),
                "dt {bad} should be rejected"
            );
        }
    }

    #[test]
    fn geometry_and_model_are_shared() {
        let geometry = square_room(10.0);
        let model = default_model();
        let a: Simulation = SimulationBuilder::new(Arc::clone(&geometry), Arc::clone(&model))
            .build()
            .unwrap();
        let b: Simulation = SimulationBuilder::new(Arc::clone(&geometry), Arc::clone(&model))
            .build()
            .unwrap();
        assert!(Arc::ptr_eq(a.geometry(), b.geometry()));
        assert!(Arc::ptr_eq(a.model(), b.model()));
    }
}

// ── Stages, journeys and agents ───────────────────────────────────────────────

#[cfg(test)]
mod registry_tests {
    use ps_agent::AgentParameters;
    use ps_core::AgentId;

    use super::*;
    use crate::SimError;

    #[test]
    fn exit_with_two_points_rejected() {
        let mut sim = sim_in_room(10.0);
        let err = sim
            .add_exit_stage(Polygon::from_coords(&[[1.0, 1.0], [2.0, 2.0]]))
            .unwrap_err();
        assert!(matches!(err, SimError::InvalidGeometry(_)));
    }

    #[test]
    fn negative_waypoint_distance_rejected() {
        let mut sim = sim_in_room(10.0);
        assert!(matches!(
            sim.add_waypoint_stage(Point::new(5.0, 5.0), -1.0),
            Err(SimError::InvalidWaypoint(_))
        ));
    }

    #[test]
    fn journey_with_unknown_stage_rejected() {
        let mut sim = sim_in_room(10.0);
        let desc = JourneyDescription::new().with_stage(StageId(5));
        assert_eq!(sim.add_journey(&desc), Err(SimError::UnknownStage(StageId(5))));
    }

    #[test]
    fn empty_journey_rejected() {
        let mut sim = sim_in_room(10.0);
        assert_eq!(sim.add_journey(&JourneyDescription::new()), Err(SimError::EmptyJourney));
    }

    #[test]
    fn agent_ids_start_at_one() {
        let mut sim = sim_in_room(10.0);
        let (exit, journey) = exit_route(&mut sim, (8.5, 4.5), (9.5, 5.5));
        let a = sim.add_agent(spec(1.0, 2.0, journey, exit)).unwrap();
        let b = sim.add_agent(spec(1.0, 4.0, journey, exit)).unwrap();
        assert_eq!(a, AgentId(1));
        assert_eq!(b, AgentId(2));
        assert_eq!(sim.agent_count(), 2);
    }

    #[test]
    fn agent_with_unknown_journey_rejected() {
        let mut sim = sim_in_room(10.0);
        let (exit, _) = exit_route(&mut sim, (8.5, 4.5), (9.5, 5.5));
        assert_eq!(
            sim.add_agent(spec(1.0, 5.0, JourneyId(9), exit)),
            Err(SimError::UnknownJourney(JourneyId(9)))
        );
    }

    #[test]
    fn agent_with_unknown_stage_rejected() {
        let mut sim = sim_in_room(10.0);
        let (_, journey) = exit_route(&mut sim, (8.5, 4.5), (9.5, 5.5));
        assert_eq!(
            sim.add_agent(spec(1.0, 5.0, journey, StageId(9))),
            Err(SimError::UnknownStage(StageId(9)))
        );
    }

    #[test]
    fn agent_with_foreign_stage_rejected() {
        let mut sim = sim_in_room(10.0);
        let (_, journey) = exit_route(&mut sim, (8.5, 4.5), (9.5, 5.5));
        let other = sim.add_waypoint_stage(Point::new(2.0, 2.0), 0.5).unwrap();
        assert_eq!(
            sim.add_agent(spec(1.0, 5.0, journey, other)),
            Err(SimError::StageNotInJourney { stage: other, journey })
        );
    }

    #[test]
    fn agent_may_start_mid_journey() {
        let mut sim = sim_in_room(10.0);
        let wp = sim.add_waypoint_stage(Point::new(5.0, 5.0), 0.5).unwrap();
        let exit = sim
            .add_exit_stage(Polygon::rectangle(Point::new(8.5, 4.5), Point::new(9.5, 5.5)))
            .unwrap();
        let journey = sim
            .add_journey(&JourneyDescription::new().with_stage(wp).with_stage(exit))
            .unwrap();
        let id = sim.add_agent(spec(1.0, 5.0, journey, exit)).unwrap();
        assert_eq!(sim.agent(id).unwrap().stage_index, 1);
    }

    #[test]
    fn agent_with_bad_parameters_rejected() {
        let mut sim = sim_in_room(10.0);
        let (exit, journey) = exit_route(&mut sim, (8.5, 4.5), (9.5, 5.5));
        let bad = spec(1.0, 5.0, journey, exit).with_parameters(AgentParameters::new(1.2, -0.3, 1.0));
        assert!(matches!(sim.add_agent(bad), Err(SimError::InvalidAgentParameters(_))));
    }

    #[test]
    fn agent_outside_geometry_rejected() {
        let mut sim = sim_in_room(10.0);
        let (exit, journey) = exit_route(&mut sim, (8.5, 4.5), (9.5, 5.5));
        assert!(matches!(
            sim.add_agent(spec(11.0, 5.0, journey, exit)),
            Err(SimError::AgentOutsideGeometry { .. })
        ));
        assert_eq!(sim.agent_count(), 0);
    }

    #[test]
    fn double_removal_fails() {
        let mut sim = sim_in_room(10.0);
        let (exit, journey) = exit_route(&mut sim, (8.5, 4.5), (9.5, 5.5));
        let id = sim.add_agent(spec(1.0, 5.0, journey, exit)).unwrap();
        sim.remove_agent(id).unwrap();
        assert_eq!(sim.remove_agent(id), Err(SimError::UnknownAgent(id)));
    }

    #[test]
    fn agents_twice_without_iterate_identical() {
        let mut sim = sim_in_room(10.0);
        let (exit, journey) = exit_route(&mut sim, (8.5, 4.5), (9.5, 5.5));
        sim.add_agent(spec(1.0, 2.0, journey, exit)).unwrap();
        sim.add_agent(spec(1.0, 7.0, journey, exit)).unwrap();
        let first: Vec<_> = sim.agents().collect();
        let second: Vec<_> = sim.agents().collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn snapshot_unaffected_by_iterate() {
        let mut sim = sim_in_room(10.0);
        let (exit, journey) = exit_route(&mut sim, (8.5, 4.5), (9.5, 5.5));
        sim.add_agent(spec(1.0, 5.0, journey, exit)).unwrap();
        let before = sim.agents();
        sim.iterate().unwrap();
        assert_eq!(before.clone().next().unwrap().position, Point::new(1.0, 5.0));
        assert_ne!(sim.agents().next().unwrap().position, Point::new(1.0, 5.0));
    }
}

// ── Movement ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod movement_tests {
    use super::*;

    #[test]
    fn straight_line_at_desired_speed() {
        let mut sim = sim_in_room(10.0);
        let (exit, journey) = exit_route(&mut sim, (8.5, 4.5), (9.5, 5.5));
        let id = sim.add_agent(spec(1.0, 5.0, journey, exit)).unwrap();

        let mut last_x = 1.0;
        for _ in 0..100 {
            sim.iterate().unwrap();
            let p = sim.agent(id).unwrap().position;
            assert!(p.x > last_x, "x must strictly increase: {} -> {}", last_x, p.x);
            let speed = (p.x - last_x) / sim.dt();
            assert!((speed - 1.2).abs() < 1e-6, "speed {speed}");
            assert!((p.y - 5.0).abs() < 1e-9);
            last_x = p.x;
        }
    }

    #[test]
    fn straight_line_agent_leaves_through_exit() {
        let mut sim = sim_in_room(10.0);
        let (exit, journey) = exit_route(&mut sim, (8.5, 4.5), (9.5, 5.5));
        sim.add_agent(spec(1.0, 5.0, journey, exit)).unwrap();
        let mut steps = 0;
        while sim.agent_count() > 0 {
            sim.iterate().unwrap();
            steps += 1;
            assert!(steps < 700, "agent never reached the exit");
        }
        // 7.5 m at 1.2 m/s with dt 0.01.
        assert!((620..=630).contains(&steps), "took {steps} steps");
    }

    #[test]
    fn side_by_side_agents_separate() {
        let mut sim = sim_in_room(10.0);
        let (exit, journey) = exit_route(&mut sim, (9.0, 0.0), (10.0, 10.0));
        let a = sim.add_agent(spec(2.0, 4.65, journey, exit)).unwrap();
        let b = sim.add_agent(spec(2.0, 5.35, journey, exit)).unwrap();

        let gap = |sim: &Simulation| {
            sim.agent(a).unwrap().position.distance(sim.agent(b).unwrap().position)
        };
        let start = gap(&sim);
        let mut last = start;
        for _ in 0..200 {
            sim.iterate().unwrap();
            let d = gap(&sim);
            assert!(d >= 0.6, "agents overlap: {d}");
            assert!(d >= last - 1e-12, "distance shrank: {last} -> {d}");
            last = d;
        }
        assert!(last > start + 0.1, "agents did not separate: {start} -> {last}");
    }

    #[test]
    fn agent_crosses_between_adjacent_rooms() {
        let mut b = GeometryBuilder::new();
        b.add_accessible_area(Polygon::rectangle(Point::new(0.0, 0.0), Point::new(10.0, 10.0)));
        b.add_accessible_area(Polygon::rectangle(Point::new(10.0, 0.0), Point::new(20.0, 10.0)));
        let mut sim = SimulationBuilder::new(Arc::new(b.build().unwrap()), default_model())
            .dt(0.01)
            .build()
            .unwrap();
        let (exit, journey) = exit_route(&mut sim, (18.0, 0.0), (19.0, 10.0));
        let id = sim.add_agent(spec(5.0, 5.0, journey, exit)).unwrap();

        let mut steps = 0;
        while sim.agent_count() > 0 {
            sim.iterate().unwrap();
            steps += 1;
            if let Some(agent) = sim.agent(id) {
                assert!((agent.position.y - 5.0).abs() < 1e-9, "deflected at {}", agent.position);
            }
            assert!(steps < 1200, "agent never crossed into the second room");
        }
        // 13 m at 1.2 m/s with dt 0.01.
        assert!((1080..=1090).contains(&steps), "took {steps} steps");
    }

    #[test]
    fn converging_agents_keep_apart_at_small_exit() {
        let mut sim = sim_in_room(10.0);
        let (exit, journey) = exit_route(&mut sim, (8.9, 4.9), (9.1, 5.1));
        let a = sim.add_agent(spec(2.0, 3.5, journey, exit)).unwrap();
        let b = sim.add_agent(spec(2.0, 6.5, journey, exit)).unwrap();

        let mut closest = f64::INFINITY;
        for _ in 0..1500 {
            sim.iterate().unwrap();
            let (Some(pa), Some(pb)) = (sim.agent(a), sim.agent(b)) else {
                break;
            };
            closest = closest.min(pa.position.distance(pb.position));
        }
        assert!(closest >= 0.6, "agents overlapped: closest {closest}");
        assert!(closest < 1.0, "agents never met: closest {closest}");
    }

    #[test]
    fn head_on_agents_pass_each_other() {
        let mut sim = sim_in_room(10.0);
        let (east_exit, east) = exit_route(&mut sim, (9.0, 0.0), (10.0, 10.0));
        let (west_exit, west) = exit_route(&mut sim, (0.0, 0.0), (1.0, 10.0));
        let a = sim.add_agent(spec(3.0, 5.0, east, east_exit)).unwrap();
        let b = sim.add_agent(spec(7.0, 5.0, west, west_exit)).unwrap();

        let mut closest = f64::INFINITY;
        let mut steps = 0;
        while sim.agent_count() > 0 {
            sim.iterate().unwrap();
            steps += 1;
            if let (Some(pa), Some(pb)) = (sim.agent(a), sim.agent(b)) {
                closest = closest.min(pa.position.distance(pb.position));
            }
            assert!(steps < 3000, "agents still blocking each other after {steps} steps");
        }
        assert!(closest >= 0.6, "agents overlapped: closest {closest}");
    }

    #[test]
    fn waypoint_advances_to_next_stage() {
        let mut sim = sim_in_room(10.0);
        let wp = sim.add_waypoint_stage(Point::new(5.0, 5.0), 0.5).unwrap();
        let exit = sim
            .add_exit_stage(Polygon::rectangle(Point::new(8.5, 4.5), Point::new(9.5, 5.5)))
            .unwrap();
        let journey = sim
            .add_journey(&JourneyDescription::new().with_stage(wp).with_stage(exit))
            .unwrap();
        let id = sim.add_agent(spec(1.0, 5.0, journey, wp)).unwrap();

        // 3.5 m to the waypoint radius takes ~292 steps.
        for _ in 0..400 {
            sim.iterate().unwrap();
        }
        let agent = sim.agent(id).unwrap();
        assert_eq!(agent.stage_id, exit);
        assert_eq!(agent.stage_index, 1);
    }

    #[test]
    fn final_waypoint_is_kept_as_target() {
        let mut sim = sim_in_room(10.0);
        let wp = sim.add_waypoint_stage(Point::new(5.0, 5.0), 0.5).unwrap();
        let journey = sim.add_journey(&JourneyDescription::new().with_stage(wp)).unwrap();
        let id = sim.add_agent(spec(4.0, 5.0, journey, wp)).unwrap();
        for _ in 0..300 {
            sim.iterate().unwrap();
        }
        let agent = sim.agent(id).unwrap();
        assert_eq!(agent.stage_id, wp);
        assert!(agent.position.distance(Point::new(5.0, 5.0)) < 0.05);
    }

    #[test]
    fn identical_setups_are_deterministic() {
        let run = || {
            let mut sim = sim_in_room(10.0);
            let (exit, journey) = exit_route(&mut sim, (9.0, 0.0), (10.0, 10.0));
            for y in [2.0, 2.7, 3.4, 4.1, 4.8] {
                sim.add_agent(spec(2.0, y, journey, exit)).unwrap();
            }
            for _ in 0..150 {
                sim.iterate().unwrap();
            }
            sim.agents().collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }
}

// ── Exits and removal ─────────────────────────────────────────────────────────

#[cfg(test)]
mod exit_tests {
    use super::*;

    #[test]
    fn agent_entering_exit_is_removed() {
        let mut sim = sim_in_room(10.0);
        let (exit, journey) = exit_route(&mut sim, (8.5, 4.5), (9.5, 5.5));
        let id = sim.add_agent(spec(8.495, 5.0, journey, exit)).unwrap();
        let stay = sim.add_agent(spec(1.0, 5.0, journey, exit)).unwrap();

        let report = sim.iterate().unwrap();
        assert_eq!(report.removed, vec![id]);
        assert_eq!(report.live_agents, 1);
        assert_eq!(sim.removed_agents_last_step(), &[id]);
        assert!(sim.agents().all(|a| a.id != id));
        assert!(sim.agents().any(|a| a.id == stay));

        sim.iterate().unwrap();
        assert!(sim.removed_agents_last_step().is_empty());
    }

    #[test]
    fn end_to_end_evacuation() {
        let mut sim = sim_in_room(20.0);
        let (exit, journey) = exit_route(&mut sim, (19.0, 0.0), (20.0, 20.0));
        for y in [2.0, 6.0, 10.0, 14.0, 18.0] {
            sim.add_agent(spec(1.0, y, journey, exit)).unwrap();
        }

        let mut steps = 0;
        while sim.agent_count() > 0 {
            sim.iterate().unwrap();
            steps += 1;
            assert!(steps <= 2000, "agents still inside after 2000 steps");
        }
        assert!(sim.elapsed_time() > 0.0);
    }
}

// ── Observers and run helpers ─────────────────────────────────────────────────

#[cfg(test)]
mod run_tests {
    use ps_agent::AgentRegistry;
    use ps_core::{AgentId, Step};

    use super::*;
    use crate::{NoopObserver, SimObserver, StepReport};

    #[derive(Default)]
    struct Counter {
        starts:    usize,
        ends:      usize,
        snapshots: Vec<Step>,
        removed:   Vec<AgentId>,
        sim_ends:  usize,
    }

    impl SimObserver for Counter {
        fn on_step_start(&mut self, _s: Step) { self.starts += 1; }
        fn on_step_end(&mut self, _r: &StepReport) { self.ends += 1; }
        fn on_snapshot(&mut self, s: Step, _t: f64, _a: &AgentRegistry) { self.snapshots.push(s); }
        fn on_agent_removed(&mut self, _s: Step, a: AgentId) { self.removed.push(a); }
        fn on_sim_end(&mut self, _s: Step) { self.sim_ends += 1; }
    }

    #[test]
    fn run_steps_calls_hooks() {
        let mut sim: Simulation = SimulationBuilder::new(square_room(10.0), default_model())
            .output_interval(5)
            .build()
            .unwrap();
        let (exit, journey) = exit_route(&mut sim, (8.5, 4.5), (9.5, 5.5));
        sim.add_agent(spec(1.0, 5.0, journey, exit)).unwrap();

        let mut obs = Counter::default();
        sim.run_steps(10, &mut obs).unwrap();
        assert_eq!(obs.starts, 10);
        assert_eq!(obs.ends, 10);
        assert_eq!(obs.snapshots, vec![Step(5), Step(10)]);
        assert_eq!(obs.sim_ends, 1);
        assert_eq!(sim.current_step(), Step(10));
        assert!((sim.elapsed_time() - 0.1).abs() < 1e-12);
    }

    #[test]
    fn run_until_empty_stops_early() {
        let mut sim = sim_in_room(10.0);
        let (exit, journey) = exit_route(&mut sim, (8.5, 4.5), (9.5, 5.5));
        let id = sim.add_agent(spec(8.4, 5.0, journey, exit)).unwrap();

        let mut obs = Counter::default();
        let steps = sim.run_until_empty(1_000, &mut obs).unwrap();
        assert!(steps < 20, "ran {steps} steps");
        assert_eq!(obs.removed, vec![id]);
        assert_eq!(sim.agent_count(), 0);
    }

    #[test]
    fn run_until_empty_respects_cap() {
        let mut sim = sim_in_room(10.0);
        let (exit, journey) = exit_route(&mut sim, (8.5, 4.5), (9.5, 5.5));
        sim.add_agent(spec(1.0, 5.0, journey, exit)).unwrap();
        let steps = sim.run_until_empty(50, &mut NoopObserver).unwrap();
        assert_eq!(steps, 50);
        assert_eq!(sim.agent_count(), 1);
    }

    #[test]
    fn empty_simulation_still_steps() {
        let mut sim = sim_in_room(10.0);
        let report = sim.iterate().unwrap();
        assert_eq!(report.step, Step(0));
        assert_eq!(report.live_agents, 0);
        assert_eq!(sim.current_step(), Step(1));
    }
}

// ── Termination ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod termination_tests {
    use ps_agent::Agent;
    use ps_core::Step;
    use ps_model::{OperationalModel, StepContext};

    use super::*;
    use crate::{SimError, SimState};

    /// Model that produces a non-finite velocity.
    struct Broken;

    impl OperationalModel for Broken {
        fn compute_velocity(&self, _a: &Agent, _t: Point, _c: &StepContext<'_>) -> Point {
            Point::new(f64::NAN, 0.0)
        }
    }

    fn broken_sim() -> Simulation<Broken> {
        let mut sim = SimulationBuilder::new(square_room(10.0), Arc::new(Broken))
            .build()
            .unwrap();
        let exit = sim
            .add_exit_stage(Polygon::rectangle(Point::new(8.5, 4.5), Point::new(9.5, 5.5)))
            .unwrap();
        let journey = sim.add_journey(&JourneyDescription::new().with_stage(exit)).unwrap();
        sim.add_agent(spec(1.0, 5.0, journey, exit)).unwrap();
        sim
    }

    #[test]
    fn non_finite_position_terminates() {
        let mut sim = broken_sim();
        assert!(matches!(sim.iterate(), Err(SimError::Invariant(_))));
        assert_eq!(sim.state(), SimState::Terminated);
    }

    #[test]
    fn terminated_simulation_refuses_iteration() {
        let mut sim = broken_sim();
        let _ = sim.iterate();
        assert_eq!(sim.iterate(), Err(SimError::Terminated));
        assert_eq!(sim.iterate(), Err(SimError::Terminated));
        assert_eq!(sim.current_step(), Step(0));
    }
}
