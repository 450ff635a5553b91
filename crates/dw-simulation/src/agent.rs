use std::collections::HashSet;
use std::fmt;

use dw_core::geometry::distance;
use dw_core::{AgentId, ResourceId, Team, Vec2};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::clock::TIMER_EPSILON;
use crate::config::SimConfig;
use crate::context::SimContext;
use crate::event::SimEventKind;
use crate::steering::steer;
use crate::world::World;

/// An agent closer than this to its target starts collecting.
pub const COLLECT_RANGE: f32 = 0.3;
/// A returning agent closer than this to its base starts unloading.
pub const UNLOAD_RANGE: f32 = 1.0;

/// The phase of an agent's harvesting cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentState {
    /// Looking for the nearest resource.
    Searching,
    /// Travelling to a chosen resource.
    MovingToTarget,
    /// Stationary at the resource while the collection countdown runs.
    Collecting,
    /// Carrying a resource home.
    Returning,
    /// Stationary at the base while the unload countdown runs.
    Unloading,
}

impl fmt::Display for AgentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Searching => write!(f, "searching"),
            Self::MovingToTarget => write!(f, "moving"),
            Self::Collecting => write!(f, "collecting"),
            Self::Returning => write!(f, "returning"),
            Self::Unloading => write!(f, "unloading"),
        }
    }
}

/// Per-agent tuning shared by the whole fleet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentParams {
    /// Seconds spent collecting.
    pub collection_time: f32,
    /// Seconds spent unloading.
    pub unload_time: f32,
    /// Distance within which peers repel.
    pub avoidance_radius: f32,
}

impl Default for AgentParams {
    fn default() -> Self {
        Self::from(&SimConfig::default())
    }
}

impl From<&SimConfig> for AgentParams {
    fn from(config: &SimConfig) -> Self {
        Self {
            collection_time: config.collection_time,
            unload_time: config.unload_time,
            avoidance_radius: config.avoidance_radius,
        }
    }
}

/// What an agent sees of its peers during its own update.
#[derive(Debug, Clone, Copy)]
pub struct Peers<'a> {
    /// Positions of every other live agent.
    pub positions: &'a [Vec2],
    /// Resources that must not be picked as a new target.
    pub claimed: &'a HashSet<ResourceId>,
}

// The state carries its own payload, so a target only exists while moving
// or collecting, and the cargo only while returning or unloading.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Task {
    Searching,
    MovingToTarget { target: ResourceId },
    Collecting { target: ResourceId, remaining: f32 },
    Returning,
    Unloading { remaining: f32 },
}

/// An autonomous collector.
#[derive(Debug, Clone)]
pub struct Agent {
    id: AgentId,
    team: Team,
    position: Vec2,
    speed: f32,
    path_visible: bool,
    params: AgentParams,
    task: Task,
}

impl Agent {
    /// Create a searching agent.
    pub fn new(id: AgentId, team: Team, position: Vec2, speed: f32, params: AgentParams) -> Self {
        Self {
            id,
            team,
            position,
            speed,
            path_visible: false,
            params,
            task: Task::Searching,
        }
    }

    /// Stable identifier.
    pub fn id(&self) -> AgentId {
        self.id
    }

    /// Owning team.
    pub fn team(&self) -> Team {
        self.team
    }

    /// Current position.
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Current speed in units per second.
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Change the speed.
    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    /// Whether the renderer should draw this agent's path.
    pub fn path_visible(&self) -> bool {
        self.path_visible
    }

    /// Show or hide the path.
    pub fn set_path_visible(&mut self, visible: bool) {
        self.path_visible = visible;
    }

    /// The active state.
    pub fn state(&self) -> AgentState {
        match self.task {
            Task::Searching => AgentState::Searching,
            Task::MovingToTarget { .. } => AgentState::MovingToTarget,
            Task::Collecting { .. } => AgentState::Collecting,
            Task::Returning => AgentState::Returning,
            Task::Unloading { .. } => AgentState::Unloading,
        }
    }

    /// Whether the agent holds a resource.
    pub fn carrying(&self) -> bool {
        matches!(self.task, Task::Returning | Task::Unloading { .. })
    }

    /// The resource the agent is heading for or collecting.
    pub fn target(&self) -> Option<ResourceId> {
        match self.task {
            Task::MovingToTarget { target } | Task::Collecting { target, .. } => Some(target),
            _ => None,
        }
    }

    /// Seconds left on the collection countdown.
    pub fn collection_timer(&self) -> Option<f32> {
        match self.task {
            Task::Collecting { remaining, .. } => Some(remaining),
            _ => None,
        }
    }

    /// Seconds left on the unload countdown.
    pub fn unload_timer(&self) -> Option<f32> {
        match self.task {
            Task::Unloading { remaining } => Some(remaining),
            _ => None,
        }
    }

    /// Where the agent is currently headed, if anywhere.
    ///
    /// Resources never move, so for a live target this is fixed; the home
    /// base is fixed too.
    pub fn destination(&self, world: &World) -> Option<Vec2> {
        match self.task {
            Task::Searching => None,
            Task::MovingToTarget { target } | Task::Collecting { target, .. } => {
                world.resource(target).map(|r| r.position)
            }
            Task::Returning | Task::Unloading { .. } => Some(world.base(self.team).position),
        }
    }

    /// Path for visualization: the current position, then the destination if
    /// there is one. Recomputed on every call.
    pub fn path(&self, world: &World) -> Vec<Vec2> {
        let mut path = vec![self.position];
        path.extend(self.destination(world));
        path
    }

    /// Advance the state machine by `ctx.dt` seconds.
    pub fn tick(&mut self, ctx: &mut SimContext<'_>, peers: &Peers<'_>) {
        match self.task {
            Task::Searching => self.search(ctx, peers),
            Task::MovingToTarget { target } => self.move_to_target(ctx, peers, target),
            Task::Collecting { target, remaining } => self.collect(ctx, target, remaining),
            Task::Returning => self.return_to_base(ctx, peers),
            Task::Unloading { remaining } => self.unload(ctx, remaining),
        }
    }

    /// Describe what is wrong with this agent, if anything.
    pub fn check_invariants(&self) -> Result<(), String> {
        if !self.position.is_finite() {
            return Err(format!("non-finite position {}", self.position));
        }
        if !self.speed.is_finite() || self.speed < 0.0 {
            return Err(format!("invalid speed {}", self.speed));
        }
        match self.task {
            Task::Collecting { remaining, .. } | Task::Unloading { remaining }
                if !remaining.is_finite() =>
            {
                Err(format!("non-finite countdown {remaining}"))
            }
            _ => Ok(()),
        }
    }

    fn search(&mut self, ctx: &mut SimContext<'_>, peers: &Peers<'_>) {
        let Some(resource) = ctx
            .world
            .find_nearest_resource(self.position, peers.claimed)
            .copied()
        else {
            return;
        };
        self.task = Task::MovingToTarget {
            target: resource.id,
        };
        debug!(
            "{} ({}) targets {} at {}",
            self.id, self.team, resource.id, resource.position
        );
        ctx.emit(
            SimEventKind::TargetAcquired {
                agent: self.id,
                resource: resource.id,
            },
            format!("{} heads for {}", self.id, resource.id),
        );
    }

    fn move_to_target(&mut self, ctx: &mut SimContext<'_>, peers: &Peers<'_>, target: ResourceId) {
        let Some(resource) = ctx.world.resource(target).copied() else {
            self.task = Task::Searching;
            debug!("{} lost {target}, searching again", self.id);
            ctx.emit(
                SimEventKind::TargetLost {
                    agent: self.id,
                    resource: target,
                },
                format!("{} lost {target} to a competitor", self.id),
            );
            return;
        };

        self.advance_towards(resource.position, ctx.dt, peers.positions);

        if distance(self.position, resource.position) < COLLECT_RANGE {
            self.task = Task::Collecting {
                target,
                remaining: self.params.collection_time,
            };
            ctx.emit(
                SimEventKind::CollectionStarted {
                    agent: self.id,
                    resource: target,
                },
                format!("{} started collecting {target}", self.id),
            );
        }
    }

    fn collect(&mut self, ctx: &mut SimContext<'_>, target: ResourceId, remaining: f32) {
        let remaining = remaining - ctx.dt;
        if remaining > TIMER_EPSILON {
            self.task = Task::Collecting { target, remaining };
            return;
        }

        if ctx.world.collect(target, self.team) {
            self.task = Task::Returning;
            let scores = ctx.world.scores();
            ctx.emit(
                SimEventKind::Collected {
                    agent: self.id,
                    team: self.team,
                    resource: target,
                    scores,
                },
                format!(
                    "{} collected {target} for {} (A {} / B {})",
                    self.id, self.team, scores.a, scores.b
                ),
            );
        } else {
            self.task = Task::Searching;
            debug!("{} was beaten to {target}", self.id);
            ctx.emit(
                SimEventKind::CollectionLost {
                    agent: self.id,
                    resource: target,
                },
                format!("{} was beaten to {target}", self.id),
            );
        }
    }

    fn return_to_base(&mut self, ctx: &mut SimContext<'_>, peers: &Peers<'_>) {
        let home = ctx.world.base(self.team).position;
        self.advance_towards(home, ctx.dt, peers.positions);

        if distance(self.position, home) < UNLOAD_RANGE {
            self.task = Task::Unloading {
                remaining: self.params.unload_time,
            };
            ctx.emit(
                SimEventKind::UnloadStarted { agent: self.id },
                format!("{} unloading at {} base", self.id, self.team),
            );
        }
    }

    fn unload(&mut self, ctx: &mut SimContext<'_>, remaining: f32) {
        let remaining = remaining - ctx.dt;
        if remaining > TIMER_EPSILON {
            self.task = Task::Unloading { remaining };
            return;
        }
        self.task = Task::Searching;
        ctx.emit(
            SimEventKind::Unloaded {
                agent: self.id,
                team: self.team,
            },
            format!("{} unloaded", self.id),
        );
    }

    fn advance_towards(&mut self, destination: Vec2, dt: f32, neighbors: &[Vec2]) {
        let heading = steer(
            self.position,
            destination,
            neighbors,
            self.params.avoidance_radius,
        );
        let step = (self.speed * dt).min(distance(self.position, destination));
        self.position += heading * step;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::SimClock;
    use crate::event::EventLog;

    struct Harness {
        world: World,
        clock: SimClock,
        events: EventLog,
        claimed: HashSet<ResourceId>,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                world: World::new(&SimConfig::default()),
                clock: SimClock::new(),
                events: EventLog::new(0),
                claimed: HashSet::new(),
            }
        }

        fn step(&mut self, agent: &mut Agent, dt: f32, neighbors: &[Vec2]) {
            self.clock.advance(dt);
            let mut ctx = SimContext {
                world: &mut self.world,
                clock: &self.clock,
                events: &mut self.events,
                dt,
            };
            let peers = Peers {
                positions: neighbors,
                claimed: &self.claimed,
            };
            agent.tick(&mut ctx, &peers);
        }
    }

    fn agent_at(team: Team, x: f32, y: f32) -> Agent {
        Agent::new(
            AgentId(1),
            team,
            Vec2::new(x, y),
            5.0,
            AgentParams::default(),
        )
    }

    #[test]
    fn new_agent_is_searching_and_empty() {
        let agent = agent_at(Team::A, 0.0, 0.0);
        assert_eq!(agent.state(), AgentState::Searching);
        assert!(!agent.carrying());
        assert!(agent.target().is_none());
        assert!(agent.collection_timer().is_none());
    }

    #[test]
    fn searching_without_resources_stays_put() {
        let mut h = Harness::new();
        let mut agent = agent_at(Team::A, 1.0, 1.0);
        h.step(&mut agent, 0.1, &[]);
        assert_eq!(agent.state(), AgentState::Searching);
        assert_eq!(agent.position(), Vec2::new(1.0, 1.0));
    }

    #[test]
    fn searching_acquires_nearest_target() {
        let mut h = Harness::new();
        let _far = h.world.insert_resource(Vec2::new(5.0, 0.0)).unwrap();
        let near = h.world.insert_resource(Vec2::new(2.0, 0.0)).unwrap();
        let mut agent = agent_at(Team::A, 0.0, 0.0);
        h.step(&mut agent, 0.1, &[]);
        assert_eq!(agent.state(), AgentState::MovingToTarget);
        assert_eq!(agent.target(), Some(near));
        assert_eq!(agent.path(&h.world), vec![Vec2::ZERO, Vec2::new(2.0, 0.0)]);
    }

    #[test]
    fn searching_skips_claimed_targets() {
        let mut h = Harness::new();
        let near = h.world.insert_resource(Vec2::new(1.0, 0.0)).unwrap();
        let far = h.world.insert_resource(Vec2::new(4.0, 0.0)).unwrap();
        h.claimed.insert(near);
        let mut agent = agent_at(Team::A, 0.0, 0.0);
        h.step(&mut agent, 0.1, &[]);
        assert_eq!(agent.target(), Some(far));
    }

    #[test]
    fn moving_never_overshoots_target() {
        let mut h = Harness::new();
        h.world.insert_resource(Vec2::new(1.0, 0.0)).unwrap();
        let mut agent = agent_at(Team::A, 0.0, 0.0);
        h.step(&mut agent, 0.1, &[]);
        // One big step: 5 units/s * 1 s would overshoot by 4.
        h.step(&mut agent, 1.0, &[]);
        assert_eq!(agent.position(), Vec2::new(1.0, 0.0));
        assert_eq!(agent.state(), AgentState::Collecting);
        assert_eq!(agent.collection_timer(), Some(2.0));
    }

    #[test]
    fn losing_target_reverts_to_searching() {
        let mut h = Harness::new();
        let id = h.world.insert_resource(Vec2::new(5.0, 0.0)).unwrap();
        let mut agent = agent_at(Team::A, 0.0, 0.0);
        h.step(&mut agent, 0.1, &[]);
        assert_eq!(agent.target(), Some(id));

        assert!(h.world.collect(id, Team::B));
        h.step(&mut agent, 0.1, &[]);
        assert_eq!(agent.state(), AgentState::Searching);
        assert!(agent.target().is_none());
        assert_eq!(agent.path(&h.world), vec![agent.position()]);
        assert!(
            h.events
                .iter()
                .any(|e| matches!(e.kind, SimEventKind::TargetLost { .. }))
        );
    }

    #[test]
    fn collecting_is_stationary_until_timer_elapses() {
        let mut h = Harness::new();
        h.world.insert_resource(Vec2::new(0.1, 0.0)).unwrap();
        let mut agent = agent_at(Team::B, 0.0, 0.0);
        h.step(&mut agent, 0.1, &[]);
        h.step(&mut agent, 0.1, &[]);
        assert_eq!(agent.state(), AgentState::Collecting);
        let parked = agent.position();

        for _ in 0..19 {
            h.step(&mut agent, 0.1, &[Vec2::new(0.2, 0.0)]);
            assert_eq!(agent.state(), AgentState::Collecting);
            assert_eq!(agent.position(), parked);
        }
        h.step(&mut agent, 0.1, &[]);
        assert_eq!(agent.state(), AgentState::Returning);
        assert!(agent.carrying());
        assert_eq!(h.world.score(Team::B), 1);
    }

    #[test]
    fn successful_collect_heads_for_own_base() {
        for team in Team::ALL {
            let mut h = Harness::new();
            h.world.insert_resource(Vec2::ZERO).unwrap();
            let mut agent = agent_at(team, 0.0, 0.0);
            h.step(&mut agent, 0.1, &[]);
            h.step(&mut agent, 0.1, &[]);
            h.step(&mut agent, 2.0, &[]);
            assert_eq!(agent.state(), AgentState::Returning);
            assert!(agent.carrying());
            assert_eq!(
                agent.destination(&h.world),
                Some(h.world.base(team).position)
            );
            assert_ne!(
                agent.destination(&h.world),
                Some(h.world.base(team.opponent()).position)
            );
        }
    }

    #[test]
    fn collect_race_loser_searches_again() {
        let mut h = Harness::new();
        let id = h.world.insert_resource(Vec2::ZERO).unwrap();
        let mut agent = agent_at(Team::A, 0.0, 0.0);
        h.step(&mut agent, 0.1, &[]);
        h.step(&mut agent, 0.1, &[]);
        assert_eq!(agent.state(), AgentState::Collecting);

        // A competitor takes it during the countdown.
        assert!(h.world.collect(id, Team::B));
        h.step(&mut agent, 2.0, &[]);
        assert_eq!(agent.state(), AgentState::Searching);
        assert!(!agent.carrying());
        assert_eq!(h.world.score(Team::A), 0);
    }

    #[test]
    fn full_cycle_returns_to_searching() {
        let mut h = Harness::new();
        h.world.insert_resource(Vec2::new(-6.0, 0.0)).unwrap();
        let mut agent = agent_at(Team::A, -6.5, 0.0);

        let mut seen = HashSet::new();
        for _ in 0..200 {
            h.step(&mut agent, 0.05, &[]);
            seen.insert(agent.state());
            assert_eq!(
                agent.carrying(),
                matches!(
                    agent.state(),
                    AgentState::Returning | AgentState::Unloading
                )
            );
            if seen.contains(&AgentState::Unloading) && agent.state() == AgentState::Searching {
                break;
            }
        }
        assert_eq!(seen.len(), 5, "visited {seen:?}");
        assert_eq!(agent.state(), AgentState::Searching);
        assert!(!agent.carrying());
        assert_eq!(h.world.score(Team::A), 1);
    }

    #[test]
    fn speed_broadcast_changes_step_length() {
        let mut h = Harness::new();
        h.world.insert_resource(Vec2::new(50.0, 0.0)).unwrap();
        let mut agent = agent_at(Team::A, 0.0, 0.0);
        agent.set_speed(2.0);
        h.step(&mut agent, 0.1, &[]);
        h.step(&mut agent, 1.0, &[]);
        assert!((agent.position().x - 2.0).abs() < 1e-5);
    }

    #[test]
    fn invariant_check_flags_nan_position() {
        let mut agent = agent_at(Team::A, 0.0, 0.0);
        assert!(agent.check_invariants().is_ok());
        agent.position = Vec2::new(f32::NAN, 0.0);
        assert!(agent.check_invariants().is_err());
    }
}
