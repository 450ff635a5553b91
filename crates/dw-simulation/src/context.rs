use crate::clock::SimClock;
use crate::event::{EventLog, SimEvent, SimEventKind};
use crate::world::World;

/// Mutable context passed to agents and the spawn scheduler each tick.
///
/// Agents never own the world; they get it here, by reference, for the
/// duration of their own update.
pub struct SimContext<'a> {
    /// The shared resource pool, bases, and scores.
    pub world: &'a mut World,
    /// The simulation clock, already advanced for this tick.
    pub clock: &'a SimClock,
    /// Event sink for this tick.
    pub events: &'a mut EventLog,
    /// Seconds elapsed during this tick.
    pub dt: f32,
}

impl SimContext<'_> {
    /// Emit a simulation event at the current tick.
    pub fn emit(&mut self, kind: SimEventKind, description: impl Into<String>) {
        self.events
            .push(SimEvent::new(self.clock.tick(), kind, description));
    }

    /// The current tick number.
    pub fn tick(&self) -> u64 {
        self.clock.tick()
    }
}
