use log::debug;

use crate::clock::TIMER_EPSILON;
use crate::config::{SimConfig, clamp_spawn_rate};
use crate::context::SimContext;
use crate::event::SimEventKind;

/// Periodic timer that asks the world for a new resource every `rate` seconds.
///
/// Runs independently of the agents. A long tick may fire it several times.
#[derive(Debug, Clone)]
pub struct SpawnScheduler {
    rate: f32,
    elapsed: f32,
}

impl SpawnScheduler {
    /// Create a scheduler; `rate` is clamped to the valid range.
    pub fn new(rate: f32) -> Self {
        Self {
            rate: clamp_spawn_rate(rate, SimConfig::default().spawn_rate),
            elapsed: 0.0,
        }
    }

    /// Seconds between spawn attempts.
    pub fn rate(&self) -> f32 {
        self.rate
    }

    /// Change the interval. Returns the clamped value. Time already waited
    /// counts toward the new interval.
    pub fn set_rate(&mut self, rate: f32) -> f32 {
        self.rate = clamp_spawn_rate(rate, self.rate);
        self.rate
    }

    /// Seconds until the next attempt.
    pub fn time_until_next(&self) -> f32 {
        (self.rate - self.elapsed).max(0.0)
    }

    /// Restart the countdown from zero.
    pub fn reset(&mut self) {
        self.elapsed = 0.0;
    }

    /// Advance the timer by `ctx.dt`, spawning once per elapsed interval.
    /// Returns how many resources were actually added.
    pub fn tick(&mut self, ctx: &mut SimContext<'_>) -> usize {
        self.elapsed += ctx.dt;
        let mut spawned = 0;
        while self.elapsed + TIMER_EPSILON >= self.rate {
            self.elapsed = (self.elapsed - self.rate).max(0.0);
            match ctx.world.try_spawn_resource() {
                Some(resource) => {
                    spawned += 1;
                    ctx.emit(
                        SimEventKind::ResourceSpawned {
                            resource: resource.id,
                        },
                        format!("{} appeared at {}", resource.id, resource.position),
                    );
                }
                None => debug!("pool full, skipping spawn"),
            }
        }
        spawned
    }
}
