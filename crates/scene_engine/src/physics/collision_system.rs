//! Broad and narrow phase over every registered collider
//!
//! Detection is split into two phases:
//! - broad phase: every unordered pair of attached colliders, minus
//!   static/static pairs, pairs on the same object or on an object and one
//!   of its ancestors, pairs filtered out by layers and pairs whose world
//!   bounds are disjoint
//! - narrow phase: the exact shape test
//!
//! The system does not know about the scene. Callers hand it the world-space
//! colliders of one tick and get the contacts back. Overlapping object
//! pairs are remembered across ticks to derive Enter / Stay / Exit.

use std::collections::{HashMap, HashSet};

use crate::events::OverlapPhase;
use crate::foundation::collections::{ColliderHandle, GameObjectId};
use super::collision::{Contact, WorldShape};
use super::collision_layers::CollisionLayers;

/// Unordered pair of overlapping game objects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CollisionPair {
    /// Object with the smaller id
    pub object_a: GameObjectId,
    /// Object with the larger id
    pub object_b: GameObjectId,
}

impl CollisionPair {
    /// Create a pair (always stores the smaller id first)
    pub fn new(a: GameObjectId, b: GameObjectId) -> Self {
        if a <= b {
            Self { object_a: a, object_b: b }
        } else {
            Self { object_a: b, object_b: a }
        }
    }

    /// Whether `object` is one side of the pair
    pub fn contains(&self, object: GameObjectId) -> bool {
        self.object_a == object || self.object_b == object
    }
}

/// One collider as seen by a detection pass
#[derive(Debug, Clone)]
pub struct ColliderEntry {
    /// Collider handle
    pub handle: ColliderHandle,
    /// Owning game object
    pub owner: GameObjectId,
    /// Parent chain of the owner, nearest first
    pub ancestors: Vec<GameObjectId>,
    /// Shape placed in world space for this tick
    pub shape: WorldShape,
    /// Static collider
    pub is_static: bool,
    /// Trigger collider
    pub is_trigger: bool,
    /// Collision layer
    pub layer: CollisionLayers,
    /// Collision mask
    pub mask: CollisionLayers,
}

impl ColliderEntry {
    /// Same owner, or one owner hangs below the other
    fn is_attached_to(&self, other: &ColliderEntry) -> bool {
        self.owner == other.owner || self.ancestors.contains(&other.owner) || other.ancestors.contains(&self.owner)
    }
}

/// An intersecting collider pair found by the narrow phase
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactPair {
    /// First collider
    pub a: ColliderHandle,
    /// Second collider
    pub b: ColliderHandle,
    /// Owner of `a`
    pub owner_a: GameObjectId,
    /// Owner of `b`
    pub owner_b: GameObjectId,
    /// Separation data; the normal points from `b` toward `a`
    pub contact: Contact,
    /// Either side is a trigger, so no response is applied
    pub is_trigger: bool,
}

/// Result of one detection pass
#[derive(Debug, Default)]
pub struct DetectionReport {
    /// Intersecting pairs in detection order
    pub contacts: Vec<ContactPair>,
    /// Pairs skipped because no test exists for their shapes
    pub unsupported: Vec<(ColliderHandle, ColliderHandle)>,
}

/// Insertion-ordered set of object pairs with their trigger flag
#[derive(Debug, Default)]
struct PairSet {
    order: Vec<CollisionPair>,
    triggers: HashMap<CollisionPair, bool>,
}

impl PairSet {
    fn insert(&mut self, pair: CollisionPair, is_trigger: bool) {
        match self.triggers.get_mut(&pair) {
            Some(trigger) => *trigger |= is_trigger,
            None => {
                self.triggers.insert(pair, is_trigger);
                self.order.push(pair);
            }
        }
    }

    fn contains(&self, pair: &CollisionPair) -> bool {
        self.triggers.contains_key(pair)
    }

    fn iter(&self) -> impl Iterator<Item = (CollisionPair, bool)> + '_ {
        self.order.iter().map(|pair| (*pair, self.triggers.get(pair).copied().unwrap_or(false)))
    }

    fn remove_object(&mut self, object: GameObjectId) -> Vec<(CollisionPair, bool)> {
        let removed: Vec<_> = self.iter().filter(|(pair, _)| pair.contains(object)).collect();
        self.order.retain(|pair| !pair.contains(object));
        self.triggers.retain(|pair, _| !pair.contains(object));
        removed
    }

    fn clear(&mut self) {
        self.order.clear();
        self.triggers.clear();
    }

    fn len(&self) -> usize {
        self.order.len()
    }
}

/// Overlap phase change for one object pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairTransition {
    /// Object pair
    pub pair: CollisionPair,
    /// Phase reached this tick
    pub phase: OverlapPhase,
    /// Whether a trigger was involved
    pub is_trigger: bool,
}

/// Broad + narrow phase collision detection with overlap tracking
#[derive(Debug, Default)]
pub struct PhysicsCollisionSystem {
    /// Object pairs overlapping in the current tick
    current_pairs: PairSet,
    /// Object pairs overlapping in the previous tick
    previous_pairs: PairSet,
    /// Collider pairs already warned about
    reported_unsupported: HashSet<(ColliderHandle, ColliderHandle)>,
    /// Log every contact at debug level
    pub debug_enabled: bool,
}

impl PhysicsCollisionSystem {
    /// Create a new collision system
    pub fn new() -> Self {
        Self::default()
    }

    /// Run both phases over this tick's colliders
    pub fn detect_collisions(&mut self, entries: &[ColliderEntry]) -> DetectionReport {
        std::mem::swap(&mut self.current_pairs, &mut self.previous_pairs);
        self.current_pairs.clear();

        let mut report = DetectionReport::default();
        for (i, j) in Self::broad_phase(entries) {
            self.narrow_phase(&entries[i], &entries[j], &mut report);
        }
        report
    }

    /// Candidate index pairs that survive the cheap rejections
    fn broad_phase(entries: &[ColliderEntry]) -> Vec<(usize, usize)> {
        let bounds: Vec<_> = entries.iter().map(|entry| entry.shape.bounds()).collect();
        let mut candidates = Vec::new();

        for i in 0..entries.len() {
            for j in (i + 1)..entries.len() {
                let (a, b) = (&entries[i], &entries[j]);
                if (a.is_static && b.is_static) || a.is_attached_to(b) {
                    continue;
                }
                if !CollisionLayers::should_collide(a.layer, a.mask, b.layer, b.mask) {
                    continue;
                }
                if !bounds[i].intersects(&bounds[j]) {
                    continue;
                }
                candidates.push((i, j));
            }
        }
        candidates
    }

    /// Exact shape test for one candidate pair
    fn narrow_phase(&mut self, a: &ColliderEntry, b: &ColliderEntry, report: &mut DetectionReport) {
        match a.shape.contact(&b.shape) {
            Ok(Some(contact)) => {
                let is_trigger = a.is_trigger || b.is_trigger;
                if self.debug_enabled {
                    log::debug!(
                        "Contact {:?}/{:?}: normal {:?} depth {}",
                        a.handle, b.handle, contact.normal, contact.depth
                    );
                }
                self.current_pairs.insert(CollisionPair::new(a.owner, b.owner), is_trigger);
                report.contacts.push(ContactPair {
                    a: a.handle,
                    b: b.handle,
                    owner_a: a.owner,
                    owner_b: b.owner,
                    contact,
                    is_trigger,
                });
            }
            Ok(None) => {}
            Err(err) => {
                let key = if a.handle <= b.handle { (a.handle, b.handle) } else { (b.handle, a.handle) };
                if self.reported_unsupported.insert(key) {
                    log::warn!("Skipping collider pair {:?}/{:?}: {err}", a.handle, b.handle);
                }
                report.unsupported.push(key);
            }
        }
    }

    /// Pairs that started overlapping this tick
    pub fn get_collision_entered(&self) -> Vec<CollisionPair> {
        self.current_pairs
            .iter()
            .filter(|(pair, _)| !self.previous_pairs.contains(pair))
            .map(|(pair, _)| pair)
            .collect()
    }

    /// Pairs that stopped overlapping this tick
    pub fn get_collision_exited(&self) -> Vec<CollisionPair> {
        self.previous_pairs
            .iter()
            .filter(|(pair, _)| !self.current_pairs.contains(pair))
            .map(|(pair, _)| pair)
            .collect()
    }

    /// Enter / Stay for every current pair, then Exit for every lost pair
    pub fn transitions(&self) -> Vec<PairTransition> {
        let ongoing = self.current_pairs.iter().map(|(pair, is_trigger)| PairTransition {
            pair,
            phase: if self.previous_pairs.contains(&pair) { OverlapPhase::Stay } else { OverlapPhase::Enter },
            is_trigger,
        });
        let ended = self
            .previous_pairs
            .iter()
            .filter(|(pair, _)| !self.current_pairs.contains(pair))
            .map(|(pair, is_trigger)| PairTransition { pair, phase: OverlapPhase::Exit, is_trigger });
        ongoing.chain(ended).collect()
    }

    /// Whether the two objects overlapped in the last tick
    pub fn is_overlapping(&self, a: GameObjectId, b: GameObjectId) -> bool {
        self.current_pairs.contains(&CollisionPair::new(a, b))
    }

    /// Number of overlapping object pairs in the last tick
    pub fn overlap_count(&self) -> usize {
        self.current_pairs.len()
    }

    /// Forget a removed object; returns the overlaps it was part of
    pub fn forget_object(&mut self, object: GameObjectId) -> Vec<PairTransition> {
        self.previous_pairs.remove_object(object);
        self.current_pairs
            .remove_object(object)
            .into_iter()
            .map(|(pair, is_trigger)| PairTransition { pair, phase: OverlapPhase::Exit, is_trigger })
            .collect()
    }
}
