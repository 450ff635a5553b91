use dw_core::{AgentId, ResourceId, Team, Vec2};
use log::info;

use crate::agent::Agent;
use crate::clock::SimClock;
use crate::config::SimConfig;
use crate::context::SimContext;
use crate::error::{SimError, SimResult};
use crate::event::{EventLog, SimEvent, SimEventKind};
use crate::fleet::Fleet;
use crate::snapshot::{AgentView, Snapshot};
use crate::spawn::SpawnScheduler;
use crate::world::World;

/// The top-level simulation driver.
///
/// Owns the world, fleet, spawn scheduler, clock, and event log. Each
/// [`Simulation::tick`] is one synchronous pass: every agent in creation
/// order, then the spawn scheduler.
pub struct Simulation {
    config: SimConfig,
    world: World,
    fleet: Fleet,
    spawner: SpawnScheduler,
    clock: SimClock,
    events: EventLog,
    next_status: f64,
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("tick", &self.clock.tick())
            .field("agents", &self.fleet.len())
            .field("resources", &self.world.resource_count())
            .field("events", &self.events.len())
            .finish()
    }
}

impl Simulation {
    /// Create a ready-to-run match: seeded world, initial resources, and a
    /// full fleet for both teams.
    pub fn new(config: SimConfig) -> Self {
        let mut sim = Self::empty(config);
        for _ in 0..sim.config.initial_resources {
            if let Some(resource) = sim.world.try_spawn_resource() {
                sim.record(
                    SimEventKind::ResourceSpawned {
                        resource: resource.id,
                    },
                    format!("{} placed at {}", resource.id, resource.position),
                );
            }
        }
        sim.rebuild_fleet();
        info!(
            "simulation started: {} agents, {} resources, seed {}",
            sim.fleet.len(),
            sim.world.resource_count(),
            sim.config.seed
        );
        sim
    }

    /// Create a simulation with an empty pool and no agents, for scripted
    /// setups via [`Simulation::spawn_agent`] and [`Simulation::insert_resource`].
    pub fn empty(config: SimConfig) -> Self {
        let config = config.sanitized();
        let world = World::new(&config);
        let fleet = Fleet::new(&config);
        let spawner = SpawnScheduler::new(config.spawn_rate);
        let events = EventLog::new(config.max_events);
        Self {
            next_status: config.status_interval,
            config,
            world,
            fleet,
            spawner,
            clock: SimClock::new(),
            events,
        }
    }

    /// Advance the simulation by `dt` seconds.
    pub fn tick(&mut self, dt: f32) -> SimResult<()> {
        if !dt.is_finite() || dt < 0.0 {
            return Err(SimError::InvalidTimeStep(dt));
        }

        self.clock.advance(dt);

        let mut ctx = SimContext {
            world: &mut self.world,
            clock: &self.clock,
            events: &mut self.events,
            dt,
        };
        self.fleet.tick(&mut ctx);
        self.spawner.tick(&mut ctx);

        self.check_invariants()?;
        self.report_status();
        Ok(())
    }

    /// Advance the simulation by `steps` ticks of `dt` seconds.
    pub fn run(&mut self, dt: f32, steps: u64) -> SimResult<()> {
        for _ in 0..steps {
            self.tick(dt)?;
        }
        Ok(())
    }

    /// Advance by at least `seconds` in ticks of `dt`. Returns the tick count.
    pub fn run_for(&mut self, seconds: f32, dt: f32) -> SimResult<u64> {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(SimError::InvalidTimeStep(dt));
        }
        let steps = (seconds.max(0.0) / dt).ceil() as u64;
        self.run(dt, steps)?;
        Ok(steps)
    }

    /// Clear the pool, restart the spawn timer, and rebuild both rosters at
    /// the current size. Scores, the clock, and the event log carry over.
    pub fn reset(&mut self) {
        self.world.clear_resources();
        self.spawner.reset();
        self.rebuild_fleet();
    }

    /// Zero both team scores.
    pub fn reset_scores(&mut self) {
        self.world.reset_scores();
    }

    /// Resize both rosters (clamped to 1..=5) by rebuilding them from
    /// scratch. Returns the clamped size.
    pub fn set_fleet_size(&mut self, size: usize) -> usize {
        self.config.fleet_size = self.fleet.set_fleet_size(size, &mut self.world);
        self.record_rebuild();
        self.config.fleet_size
    }

    /// Broadcast a new speed (clamped to 1..=10). Returns the clamped value.
    pub fn set_speed(&mut self, speed: f32) -> f32 {
        self.config.speed = self.fleet.set_speed(speed);
        self.config.speed
    }

    /// Change the spawn interval (clamped to 0.5..=10). Returns the clamped value.
    pub fn set_spawn_rate(&mut self, rate: f32) -> f32 {
        self.config.spawn_rate = self.spawner.set_rate(rate);
        self.config.spawn_rate
    }

    /// Broadcast path visibility.
    pub fn set_path_visible(&mut self, visible: bool) {
        self.config.path_visible = visible;
        self.fleet.set_path_visible(visible);
    }

    /// Toggle target reservation for searching agents.
    pub fn set_reserve_targets(&mut self, reserve: bool) {
        self.config.reserve_targets = reserve;
        self.fleet.set_reserve_targets(reserve);
    }

    /// Add one agent at an exact position. It is ticked after every
    /// existing agent.
    pub fn spawn_agent(&mut self, team: Team, position: Vec2) -> AgentId {
        self.fleet.spawn_agent(team, position)
    }

    /// Place a resource at an exact position. `None` when the pool is full.
    pub fn insert_resource(&mut self, position: Vec2) -> Option<ResourceId> {
        self.world.insert_resource(position)
    }

    /// Build a renderer snapshot of the current state.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            tick: self.clock.tick(),
            elapsed: self.clock.elapsed(),
            scores: self.world.scores(),
            bases: self.world.bases().to_vec(),
            resources: self.world.resources().copied().collect(),
            agents: self
                .fleet
                .agents()
                .iter()
                .map(|a| AgentView::of(a, &self.world))
                .collect(),
        }
    }

    /// Look up a live agent.
    pub fn agent(&self, id: AgentId) -> SimResult<&Agent> {
        self.fleet.agent(id).ok_or(SimError::AgentNotFound(id))
    }

    /// The shared world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Both rosters.
    pub fn fleet(&self) -> &Fleet {
        &self.fleet
    }

    /// The spawn timer.
    pub fn spawner(&self) -> &SpawnScheduler {
        &self.spawner
    }

    /// The simulation clock.
    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    /// Everything that happened so far (subject to `max_events`).
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// The effective configuration, including runtime changes.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// The current tick number.
    pub fn current_tick(&self) -> u64 {
        self.clock.tick()
    }

    fn rebuild_fleet(&mut self) {
        self.fleet.rebuild(&mut self.world);
        self.record_rebuild();
    }

    fn record_rebuild(&mut self) {
        let per_team = self.fleet.size();
        self.record(
            SimEventKind::FleetRebuilt { per_team },
            format!("fleet rebuilt with {per_team} agents per team"),
        );
    }

    fn record(&mut self, kind: SimEventKind, description: String) {
        self.events
            .push(SimEvent::new(self.clock.tick(), kind, description));
    }

    fn check_invariants(&self) -> SimResult<()> {
        for agent in self.fleet.agents() {
            agent
                .check_invariants()
                .map_err(|detail| SimError::InvariantViolation {
                    agent: agent.id(),
                    detail,
                })?;
        }
        Ok(())
    }

    fn report_status(&mut self) {
        let interval = self.config.status_interval;
        if interval <= 0.0 || self.clock.elapsed() < self.next_status {
            return;
        }
        let scores = self.world.scores();
        info!(
            "t={:.1}s: {} resources on field, {} agents (A {} / B {}), score A {} / B {}",
            self.clock.elapsed(),
            self.world.resource_count(),
            self.fleet.len(),
            self.fleet.agents_of(Team::A).count(),
            self.fleet.agents_of(Team::B).count(),
            scores.a,
            scores.b
        );
        while self.next_status <= self.clock.elapsed() {
            self.next_status += interval;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::AgentState;

    fn quiet() -> SimConfig {
        SimConfig::default()
            .with_initial_resources(0)
            .with_spawn_rate(10.0)
    }

    #[test]
    fn new_builds_full_match() {
        let sim = Simulation::new(SimConfig::default());
        assert_eq!(sim.fleet().len(), 6);
        assert_eq!(sim.world().resource_count(), 3);
        assert_eq!(sim.current_tick(), 0);
        assert!(!sim.events().is_empty());
    }

    #[test]
    fn empty_has_no_agents_or_resources() {
        let sim = Simulation::empty(SimConfig::default());
        assert!(sim.fleet().is_empty());
        assert_eq!(sim.world().resource_count(), 0);
    }

    #[test]
    fn rejects_invalid_time_steps() {
        let mut sim = Simulation::empty(quiet());
        assert!(matches!(sim.tick(-0.1), Err(SimError::InvalidTimeStep(_))));
        assert!(matches!(
            sim.tick(f32::NAN),
            Err(SimError::InvalidTimeStep(_))
        ));
        assert!(sim.run_for(1.0, 0.0).is_err());
        assert_eq!(sim.current_tick(), 0);
    }

    #[test]
    fn zero_time_step_changes_nothing_but_the_tick() {
        let mut sim = Simulation::empty(quiet());
        let id = sim.spawn_agent(Team::A, Vec2::ZERO);
        sim.insert_resource(Vec2::new(3.0, 0.0)).unwrap();
        sim.tick(0.0).unwrap();
        sim.tick(0.0).unwrap();
        let agent = sim.agent(id).unwrap();
        assert_eq!(agent.position(), Vec2::ZERO);
        assert_eq!(agent.state(), AgentState::MovingToTarget);
        assert_eq!(sim.current_tick(), 2);
    }

    #[test]
    fn run_for_counts_ticks() {
        let mut sim = Simulation::empty(quiet());
        assert_eq!(sim.run_for(1.0, 0.25).unwrap(), 4);
        assert_eq!(sim.current_tick(), 4);
        assert!((sim.clock().elapsed() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn spawner_refills_pool_over_time() {
        let mut sim = Simulation::empty(SimConfig::default().with_spawn_rate(0.5));
        sim.run(0.5, 4).unwrap();
        assert_eq!(sim.world().resource_count(), 4);
    }

    #[test]
    fn unknown_agent_lookup_fails() {
        let sim = Simulation::new(SimConfig::default());
        assert!(matches!(
            sim.agent(AgentId(9_999)),
            Err(SimError::AgentNotFound(_))
        ));
    }

    #[test]
    fn reset_clears_pool_and_rebuilds_fleet() {
        let mut sim = Simulation::new(SimConfig::default());
        let before: Vec<AgentId> = sim.fleet().agents().iter().map(Agent::id).collect();
        sim.run(0.1, 30).unwrap();
        sim.reset();
        assert_eq!(sim.world().resource_count(), 0);
        assert_eq!(sim.fleet().len(), 6);
        assert!(
            sim.fleet()
                .agents()
                .iter()
                .all(|a| !before.contains(&a.id()) && a.state() == AgentState::Searching)
        );
        assert!((sim.spawner().time_until_next() - 3.0).abs() < 1e-5);
    }

    #[test]
    fn reset_keeps_scores_until_cleared() {
        let mut sim = Simulation::empty(quiet());
        sim.spawn_agent(Team::A, Vec2::ZERO);
        sim.insert_resource(Vec2::ZERO).unwrap();
        sim.run(0.1, 25).unwrap();
        assert_eq!(sim.world().score(Team::A), 1);

        sim.reset();
        assert_eq!(sim.world().score(Team::A), 1);
        sim.reset_scores();
        assert_eq!(sim.world().scores().total(), 0);
    }

    #[test]
    fn runtime_settings_are_clamped_and_recorded() {
        let mut sim = Simulation::new(SimConfig::default());
        assert_eq!(sim.set_fleet_size(8), 5);
        assert_eq!(sim.fleet().len(), 10);
        assert!((sim.set_speed(0.0) - 1.0).abs() < f32::EPSILON);
        assert!((sim.set_spawn_rate(20.0) - 10.0).abs() < f32::EPSILON);
        sim.set_path_visible(true);

        let config = sim.config();
        assert_eq!(config.fleet_size, 5);
        assert!((config.speed - 1.0).abs() < f32::EPSILON);
        assert!(config.path_visible);
        assert!(sim.snapshot().agents.iter().all(|a| a.path_visible));
    }

    #[test]
    fn snapshot_reflects_world() {
        let mut sim = Simulation::empty(quiet());
        let id = sim.spawn_agent(Team::B, Vec2::new(2.0, 0.0));
        sim.insert_resource(Vec2::new(4.0, 0.0)).unwrap();
        sim.tick(0.1).unwrap();

        let snap = sim.snapshot();
        assert_eq!(snap.tick, 1);
        assert_eq!(snap.resources.len(), 1);
        assert_eq!(snap.bases.len(), 2);
        let view = &snap.agents[0];
        assert_eq!(view.id, id);
        assert_eq!(view.state, AgentState::MovingToTarget);
        assert_eq!(view.path, vec![Vec2::new(2.0, 0.0), Vec2::new(4.0, 0.0)]);
        assert_eq!(snap.agents_of(Team::A).count(), 0);
    }

    #[test]
    fn same_seed_same_outcome() {
        let play = |seed| {
            let mut sim = Simulation::new(SimConfig::default().with_seed(seed));
            sim.run(0.05, 600).unwrap();
            (
                sim.world().scores(),
                sim.events()
                    .iter()
                    .map(|e| e.description.clone())
                    .collect::<Vec<_>>(),
            )
        };
        assert_eq!(play(7), play(7));
    }

    #[test]
    fn long_match_keeps_invariants() {
        let mut sim = Simulation::new(SimConfig::default().with_fleet_size(5).with_spawn_rate(0.5));
        for _ in 0..2_000 {
            sim.tick(0.05).unwrap();
            assert!(sim.world().resource_count() <= crate::world::POOL_CAPACITY);
            for agent in sim.fleet().agents() {
                assert_eq!(
                    agent.carrying(),
                    matches!(
                        agent.state(),
                        AgentState::Returning | AgentState::Unloading
                    )
                );
                assert_eq!(
                    agent.target().is_some(),
                    matches!(
                        agent.state(),
                        AgentState::MovingToTarget | AgentState::Collecting
                    )
                );
            }
        }
        assert!(sim.world().scores().total() > 0);
    }
}
