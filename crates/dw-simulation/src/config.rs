use dw_core::{Bounds, Vec2};
use log::warn;
use serde::{Deserialize, Serialize};

/// Smallest fleet size per team.
pub const FLEET_SIZE_MIN: usize = 1;
/// Largest fleet size per team.
pub const FLEET_SIZE_MAX: usize = 5;
/// Slowest allowed agent speed, in units per second.
pub const SPEED_MIN: f32 = 1.0;
/// Fastest allowed agent speed, in units per second.
pub const SPEED_MAX: f32 = 10.0;
/// Shortest allowed spawn interval, in seconds.
pub const SPAWN_RATE_MIN: f32 = 0.5;
/// Longest allowed spawn interval, in seconds.
pub const SPAWN_RATE_MAX: f32 = 10.0;

/// Configuration for a simulation run.
///
/// Every field has a default matching the reference match setup, so a
/// partial JSON document is enough to override a few values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// RNG seed for deterministic simulation.
    pub seed: u64,
    /// Width of the field in map units.
    pub map_width: f32,
    /// Height of the field in map units.
    pub map_height: f32,
    /// Rectangle in which resources are spawned. Clamped to the map.
    pub spawn_area: Bounds,
    /// Home base of team A.
    pub base_a: Vec2,
    /// Home base of team B.
    pub base_b: Vec2,
    /// Resources placed in the pool when the simulation starts.
    pub initial_resources: usize,
    /// Agents per team.
    pub fleet_size: usize,
    /// Agent speed in units per second, shared by both teams.
    pub speed: f32,
    /// Seconds between spawn attempts.
    pub spawn_rate: f32,
    /// Seconds an agent spends collecting a resource.
    pub collection_time: f32,
    /// Seconds an agent spends unloading at its base.
    pub unload_time: f32,
    /// Distance within which neighbouring agents repel each other.
    pub avoidance_radius: f32,
    /// Whether agents expose their path to the renderer.
    pub path_visible: bool,
    /// Skip resources already targeted by another agent when searching.
    pub reserve_targets: bool,
    /// Maximum event log size (oldest events dropped when exceeded). 0 = unlimited.
    pub max_events: usize,
    /// Seconds between status log lines. 0 disables them.
    pub status_interval: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            map_width: 20.0,
            map_height: 12.0,
            spawn_area: Bounds::centered(12.0, 8.0),
            base_a: Vec2::new(-8.0, 0.0),
            base_b: Vec2::new(8.0, 0.0),
            initial_resources: 3,
            fleet_size: 3,
            speed: 5.0,
            spawn_rate: 3.0,
            collection_time: 2.0,
            unload_time: 1.0,
            avoidance_radius: 1.0,
            path_visible: false,
            reserve_targets: false,
            max_events: 0,
            status_interval: 2.0,
        }
    }
}

impl SimConfig {
    /// Set the RNG seed for deterministic simulation.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the number of agents per team.
    pub fn with_fleet_size(mut self, size: usize) -> Self {
        self.fleet_size = size;
        self
    }

    /// Set the shared agent speed.
    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    /// Set the spawn interval in seconds.
    pub fn with_spawn_rate(mut self, rate: f32) -> Self {
        self.spawn_rate = rate;
        self
    }

    /// Set how many resources are placed at start.
    pub fn with_initial_resources(mut self, count: usize) -> Self {
        self.initial_resources = count;
        self
    }

    /// Set the collection countdown in seconds.
    pub fn with_collection_time(mut self, seconds: f32) -> Self {
        self.collection_time = seconds;
        self
    }

    /// Set the avoidance radius.
    pub fn with_avoidance_radius(mut self, radius: f32) -> Self {
        self.avoidance_radius = radius;
        self
    }

    /// Toggle path visibility for every agent.
    pub fn with_path_visible(mut self, visible: bool) -> Self {
        self.path_visible = visible;
        self
    }

    /// Toggle target reservation on selection.
    pub fn with_reserve_targets(mut self, reserve: bool) -> Self {
        self.reserve_targets = reserve;
        self
    }

    /// Set the maximum event log size (0 = unlimited).
    pub fn with_max_events(mut self, max: usize) -> Self {
        self.max_events = max;
        self
    }

    /// Set the status log interval (0 disables it).
    pub fn with_status_interval(mut self, seconds: f64) -> Self {
        self.status_interval = seconds;
        self
    }

    /// The whole field as a rectangle centred on the origin.
    pub fn map_bounds(&self) -> Bounds {
        Bounds::centered(self.map_width, self.map_height)
    }

    /// Return a copy with every value clamped into its valid range.
    ///
    /// Out-of-range values are pulled to the nearest bound; non-finite values
    /// fall back to the defaults. Nothing is rejected.
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        let map_width = non_negative("map width", self.map_width, defaults.map_width);
        let map_height = non_negative("map height", self.map_height, defaults.map_height);
        let map = Bounds::centered(map_width, map_height);
        Self {
            map_width,
            map_height,
            spawn_area: map.intersect(&self.spawn_area),
            base_a: finite_point("base A", self.base_a, defaults.base_a),
            base_b: finite_point("base B", self.base_b, defaults.base_b),
            fleet_size: clamp_fleet_size(self.fleet_size),
            speed: clamp_speed(self.speed, defaults.speed),
            spawn_rate: clamp_spawn_rate(self.spawn_rate, defaults.spawn_rate),
            collection_time: non_negative(
                "collection time",
                self.collection_time,
                defaults.collection_time,
            ),
            unload_time: non_negative("unload time", self.unload_time, defaults.unload_time),
            avoidance_radius: non_negative(
                "avoidance radius",
                self.avoidance_radius,
                defaults.avoidance_radius,
            ),
            status_interval: if self.status_interval.is_finite() {
                self.status_interval.max(0.0)
            } else {
                defaults.status_interval
            },
            ..self
        }
    }
}

/// Clamp a fleet size into `FLEET_SIZE_MIN..=FLEET_SIZE_MAX`.
pub fn clamp_fleet_size(size: usize) -> usize {
    let clamped = size.clamp(FLEET_SIZE_MIN, FLEET_SIZE_MAX);
    if clamped != size {
        warn!("fleet size {size} out of range, using {clamped}");
    }
    clamped
}

/// Clamp a speed into `SPEED_MIN..=SPEED_MAX`; non-finite input keeps `current`.
pub fn clamp_speed(speed: f32, current: f32) -> f32 {
    clamp_finite("speed", speed, current, SPEED_MIN, SPEED_MAX)
}

/// Clamp a spawn interval into `SPAWN_RATE_MIN..=SPAWN_RATE_MAX`; non-finite
/// input keeps `current`.
pub fn clamp_spawn_rate(rate: f32, current: f32) -> f32 {
    clamp_finite("spawn rate", rate, current, SPAWN_RATE_MIN, SPAWN_RATE_MAX)
}

fn clamp_finite(name: &str, value: f32, current: f32, min: f32, max: f32) -> f32 {
    if !value.is_finite() {
        warn!("{name} {value} is not a number, keeping {current}");
        return current;
    }
    let clamped = value.clamp(min, max);
    if clamped != value {
        warn!("{name} {value} out of range, using {clamped}");
    }
    clamped
}

fn non_negative(name: &str, value: f32, fallback: f32) -> f32 {
    if !value.is_finite() {
        warn!("{name} {value} is not a number, using {fallback}");
        return fallback;
    }
    if value < 0.0 {
        warn!("{name} {value} is negative, using 0");
        return 0.0;
    }
    value
}

fn finite_point(name: &str, value: Vec2, fallback: Vec2) -> Vec2 {
    if value.is_finite() {
        value
    } else {
        warn!("{name} {value} is not finite, using {fallback}");
        fallback
    }
}
