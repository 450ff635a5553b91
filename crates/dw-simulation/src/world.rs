use std::collections::{BTreeMap, HashSet};

use dw_core::geometry::distance;
use dw_core::{Bounds, IdAllocator, ResourceId, Team, Vec2};
use log::debug;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::config::SimConfig;

/// Maximum number of live resources in the pool.
pub const POOL_CAPACITY: usize = 15;
/// Spawn candidates closer than this to a base are rejected.
pub const BASE_CLEARANCE: f32 = 2.0;
/// Candidate positions drawn before the last one is accepted regardless.
pub const MAX_SPAWN_ATTEMPTS: usize = 10;

/// A collectible point on the field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    /// Pool key.
    pub id: ResourceId,
    /// Where the resource lies. Resources never move.
    pub position: Vec2,
}

/// A team's home base.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Base {
    /// Owning team.
    pub team: Team,
    /// Fixed position.
    pub position: Vec2,
}

/// Per-team collection counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scores {
    /// Resources collected by team A.
    pub a: u32,
    /// Resources collected by team B.
    pub b: u32,
}

impl Scores {
    /// Score of one team.
    pub fn get(&self, team: Team) -> u32 {
        match team {
            Team::A => self.a,
            Team::B => self.b,
        }
    }

    fn increment(&mut self, team: Team) {
        match team {
            Team::A => self.a += 1,
            Team::B => self.b += 1,
        }
    }

    /// Resources collected by both teams together.
    pub fn total(&self) -> u32 {
        self.a + self.b
    }
}

/// The shared simulation state: resource pool, bases, and scores.
///
/// The world is the only owner of the pool. Agents refer to resources by id
/// and go through [`World::collect`] to take one; [`World::try_spawn_resource`]
/// is the only way resources appear.
#[derive(Debug, Clone)]
pub struct World {
    bounds: Bounds,
    spawn_area: Bounds,
    bases: [Base; 2],
    resources: BTreeMap<ResourceId, Resource>,
    scores: Scores,
    ids: IdAllocator,
    rng: StdRng,
}

impl World {
    /// Build an empty world from a configuration, seeding the RNG from it.
    pub fn new(config: &SimConfig) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(config.seed))
    }

    /// Build an empty world with an explicitly injected random source.
    pub fn with_rng(config: &SimConfig, rng: StdRng) -> Self {
        let bounds = config.map_bounds();
        Self {
            bounds,
            spawn_area: bounds.intersect(&config.spawn_area),
            bases: [
                Base {
                    team: Team::A,
                    position: config.base_a,
                },
                Base {
                    team: Team::B,
                    position: config.base_b,
                },
            ],
            resources: BTreeMap::new(),
            scores: Scores::default(),
            ids: IdAllocator::new(),
            rng,
        }
    }

    /// The nearest live resource to `position`, skipping ids in `excluding`.
    ///
    /// Ties go to the first resource in pool order (ascending id).
    pub fn find_nearest_resource(
        &self,
        position: Vec2,
        excluding: &HashSet<ResourceId>,
    ) -> Option<&Resource> {
        let mut nearest: Option<(&Resource, f32)> = None;
        for resource in self.resources.values() {
            if excluding.contains(&resource.id) {
                continue;
            }
            let d = distance(position, resource.position);
            debug_assert!(d >= 0.0, "negative distance {d}");
            if nearest.is_none_or(|(_, best)| d < best) {
                nearest = Some((resource, d));
            }
        }
        nearest.map(|(resource, _)| resource)
    }

    /// Spawn one resource unless the pool is full.
    ///
    /// Candidates within [`BASE_CLEARANCE`] of either base are redrawn, up to
    /// [`MAX_SPAWN_ATTEMPTS`] draws; after that the last draw is used as is.
    pub fn try_spawn_resource(&mut self) -> Option<Resource> {
        if self.resources.len() >= POOL_CAPACITY {
            return None;
        }
        let (position, attempts) = self.pick_spawn_position();
        let resource = Resource {
            id: self.ids.next_resource(),
            position,
        };
        self.resources.insert(resource.id, resource);
        debug!(
            "spawned {} at {position} after {attempts} attempt(s), {} in pool",
            resource.id,
            self.resources.len()
        );
        Some(resource)
    }

    fn pick_spawn_position(&mut self) -> (Vec2, usize) {
        let mut candidate = self.spawn_area.random_point(&mut self.rng);
        let mut attempts = 1;
        while attempts < MAX_SPAWN_ATTEMPTS && self.near_base(candidate) {
            candidate = self.spawn_area.random_point(&mut self.rng);
            attempts += 1;
        }
        (candidate, attempts)
    }

    /// Whether `point` is closer than [`BASE_CLEARANCE`] to either base.
    pub fn near_base(&self, point: Vec2) -> bool {
        self.bases
            .iter()
            .any(|b| distance(point, b.position) < BASE_CLEARANCE)
    }

    /// Place a resource at an exact position, for scripted setups.
    /// Respects the pool capacity.
    pub fn insert_resource(&mut self, position: Vec2) -> Option<ResourceId> {
        if self.resources.len() >= POOL_CAPACITY {
            return None;
        }
        let id = self.ids.next_resource();
        self.resources.insert(id, Resource { id, position });
        Some(id)
    }

    /// Take a resource for `team`.
    ///
    /// Returns `true` and scores only for the first caller; every later call
    /// with the same id sees it gone and returns `false`.
    pub fn collect(&mut self, id: ResourceId, team: Team) -> bool {
        if self.resources.remove(&id).is_none() {
            return false;
        }
        self.scores.increment(team);
        debug!(
            "{team} collected {id}, score A {} / B {}",
            self.scores.a, self.scores.b
        );
        true
    }

    /// Score of one team.
    pub fn score(&self, team: Team) -> u32 {
        self.scores.get(team)
    }

    /// Both scores.
    pub fn scores(&self) -> Scores {
        self.scores
    }

    /// Zero both scores.
    pub fn reset_scores(&mut self) {
        self.scores = Scores::default();
    }

    /// Look up a live resource.
    pub fn resource(&self, id: ResourceId) -> Option<&Resource> {
        self.resources.get(&id)
    }

    /// All live resources in pool order.
    pub fn resources(&self) -> impl Iterator<Item = &Resource> {
        self.resources.values()
    }

    /// Number of live resources.
    pub fn resource_count(&self) -> usize {
        self.resources.len()
    }

    /// Destroy every live resource.
    pub fn clear_resources(&mut self) {
        self.resources.clear();
    }

    /// The home base of `team`.
    pub fn base(&self, team: Team) -> &Base {
        &self.bases[team.index()]
    }

    /// Both bases, team A first.
    pub fn bases(&self) -> &[Base; 2] {
        &self.bases
    }

    /// The whole field.
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Where resources may spawn.
    pub fn spawn_area(&self) -> Bounds {
        self.spawn_area
    }

    /// A random point within `half_extent` of `center`, kept on the field.
    pub fn scatter_near(&mut self, center: Vec2, half_extent: Vec2) -> Vec2 {
        let area = Bounds::new(center - half_extent, center + half_extent);
        self.bounds.clamp(area.random_point(&mut self.rng))
    }
}
