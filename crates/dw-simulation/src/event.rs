use std::collections::VecDeque;

use dw_core::{AgentId, ResourceId, Team};

use crate::world::Scores;

/// What kind of simulation event occurred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimEventKind {
    // Pool
    /// The spawn scheduler added a resource to the pool.
    ResourceSpawned {
        /// The new resource.
        resource: ResourceId,
    },

    // Agent lifecycle
    /// A searching agent picked a target.
    TargetAcquired {
        /// The agent that picked a target.
        agent: AgentId,
        /// The chosen resource.
        resource: ResourceId,
    },
    /// An agent's target vanished while it was travelling.
    TargetLost {
        /// The agent that lost its target.
        agent: AgentId,
        /// The resource that is no longer in the pool.
        resource: ResourceId,
    },
    /// An agent reached its target and started the collection countdown.
    CollectionStarted {
        /// The collecting agent.
        agent: AgentId,
        /// The resource being collected.
        resource: ResourceId,
    },
    /// An agent won a resource and scored for its team.
    Collected {
        /// The winning agent.
        agent: AgentId,
        /// The team credited with the point.
        team: Team,
        /// The resource removed from the pool.
        resource: ResourceId,
        /// Both team scores after the collection.
        scores: Scores,
    },
    /// An agent finished collecting but a competitor had already taken the resource.
    CollectionLost {
        /// The losing agent.
        agent: AgentId,
        /// The contested resource.
        resource: ResourceId,
    },
    /// A returning agent reached its base.
    UnloadStarted {
        /// The unloading agent.
        agent: AgentId,
    },
    /// An agent finished unloading and resumed searching.
    Unloaded {
        /// The agent that unloaded.
        agent: AgentId,
        /// Its team.
        team: Team,
    },

    // Fleet
    /// Both rosters were destroyed and rebuilt.
    FleetRebuilt {
        /// Agents created for each team.
        per_team: usize,
    },
}

impl SimEventKind {
    /// Check whether a given agent is involved in this event.
    pub fn involves_agent(&self, id: AgentId) -> bool {
        match self {
            Self::TargetAcquired { agent, .. }
            | Self::TargetLost { agent, .. }
            | Self::CollectionStarted { agent, .. }
            | Self::Collected { agent, .. }
            | Self::CollectionLost { agent, .. }
            | Self::UnloadStarted { agent }
            | Self::Unloaded { agent, .. } => *agent == id,
            Self::ResourceSpawned { .. } | Self::FleetRebuilt { .. } => false,
        }
    }

    /// Check whether a given resource is involved in this event.
    pub fn involves_resource(&self, id: ResourceId) -> bool {
        match self {
            Self::ResourceSpawned { resource }
            | Self::TargetAcquired { resource, .. }
            | Self::TargetLost { resource, .. }
            | Self::CollectionStarted { resource, .. }
            | Self::Collected { resource, .. }
            | Self::CollectionLost { resource, .. } => *resource == id,
            Self::UnloadStarted { .. } | Self::Unloaded { .. } | Self::FleetRebuilt { .. } => {
                false
            }
        }
    }
}

/// One entry in the [`EventLog`].
#[derive(Debug, Clone)]
pub struct SimEvent {
    /// Tick during which it happened.
    pub tick: u64,
    /// Structured payload.
    pub kind: SimEventKind,
    /// One-line summary for logs and the CLI.
    pub description: String,
}

impl SimEvent {
    /// Build an event.
    pub fn new(tick: u64, kind: SimEventKind, description: impl Into<String>) -> Self {
        Self {
            tick,
            kind,
            description: description.into(),
        }
    }
}

/// Bounded history of simulation events, oldest first.
///
/// With a capacity of 0 the log keeps everything. Otherwise it behaves as a
/// ring buffer and counts what it had to drop.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: VecDeque<SimEvent>,
    capacity: usize,
    dropped: u64,
}

impl EventLog {
    /// An empty log holding at most `capacity` events (0 = unbounded).
    pub fn new(capacity: usize) -> Self {
        Self {
            events: VecDeque::new(),
            capacity,
            dropped: 0,
        }
    }

    /// Record an event, evicting the oldest one when full.
    pub fn push(&mut self, event: SimEvent) {
        if self.capacity > 0 && self.events.len() == self.capacity {
            self.events.pop_front();
            self.dropped += 1;
        }
        self.events.push_back(event);
    }

    /// Retained events, oldest first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &SimEvent> + ExactSizeIterator {
        self.events.iter()
    }

    /// Events recorded during `tick`.
    pub fn at_tick(&self, tick: u64) -> impl Iterator<Item = &SimEvent> {
        self.events.iter().filter(move |e| e.tick == tick)
    }

    /// Events naming `id` as the acting agent.
    pub fn for_agent(&self, id: AgentId) -> impl Iterator<Item = &SimEvent> {
        self.events.iter().filter(move |e| e.kind.involves_agent(id))
    }

    /// Events that touch resource `id`.
    pub fn for_resource(&self, id: ResourceId) -> impl Iterator<Item = &SimEvent> {
        self.events.iter().filter(move |e| e.kind.involves_resource(id))
    }

    /// Successful collections, for scoreboards.
    pub fn collections(&self) -> impl Iterator<Item = &SimEvent> {
        self.events
            .iter()
            .filter(|e| matches!(e.kind, SimEventKind::Collected { .. }))
    }

    /// Number of retained events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether nothing is retained.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events evicted so far to respect the capacity.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lost(agent: u64, resource: u64) -> SimEventKind {
        SimEventKind::CollectionLost {
            agent: AgentId(agent),
            resource: ResourceId(resource),
        }
    }

    #[test]
    fn queries_filter_by_tick_agent_and_resource() {
        let mut log = EventLog::new(0);
        log.push(SimEvent::new(1, lost(1, 10), "a1 lost r10"));
        log.push(SimEvent::new(
            1,
            SimEventKind::UnloadStarted { agent: AgentId(2) },
            "a2 unloading",
        ));
        log.push(SimEvent::new(
            2,
            SimEventKind::TargetAcquired {
                agent: AgentId(1),
                resource: ResourceId(11),
            },
            "a1 targets r11",
        ));

        assert_eq!(log.len(), 3);
        assert_eq!(log.at_tick(1).count(), 2);
        assert_eq!(log.at_tick(3).count(), 0);
        assert_eq!(log.for_agent(AgentId(1)).count(), 2);
        assert_eq!(log.for_agent(AgentId(2)).count(), 1);
        assert_eq!(log.for_resource(ResourceId(11)).count(), 1);
        assert_eq!(log.collections().count(), 0);
    }

    #[test]
    fn full_log_evicts_oldest() {
        let mut log = EventLog::new(2);
        for tick in 0..5 {
            log.push(SimEvent::new(tick, lost(1, 1), "lost"));
        }
        let ticks: Vec<u64> = log.iter().map(|e| e.tick).collect();
        assert_eq!(ticks, vec![3, 4]);
        assert_eq!(log.dropped(), 3);
    }

    #[test]
    fn unbounded_log_keeps_everything() {
        let mut log = EventLog::new(0);
        for tick in 0..100 {
            log.push(SimEvent::new(tick, lost(1, 1), "lost"));
        }
        assert_eq!(log.len(), 100);
        assert_eq!(log.dropped(), 0);
        assert!(!log.is_empty());
    }

    #[test]
    fn involvement_follows_variant_fields() {
        let a1 = AgentId(1);
        let a2 = AgentId(2);
        let r = ResourceId(9);

        let kind = SimEventKind::Collected {
            agent: a1,
            team: Team::A,
            resource: r,
            scores: Scores::default(),
        };
        assert!(kind.involves_agent(a1));
        assert!(!kind.involves_agent(a2));
        assert!(kind.involves_resource(r));

        let kind = SimEventKind::ResourceSpawned { resource: r };
        assert!(!kind.involves_agent(a1));
        assert!(kind.involves_resource(r));

        let kind = SimEventKind::Unloaded {
            agent: a2,
            team: Team::B,
        };
        assert!(kind.involves_agent(a2));
        assert!(!kind.involves_resource(r));

        let kind = SimEventKind::FleetRebuilt { per_team: 3 };
        assert!(!kind.involves_agent(a1));
        assert!(!kind.involves_resource(r));
    }
}
