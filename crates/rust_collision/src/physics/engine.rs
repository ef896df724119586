//! # Physics Engine
//!
//! [`PhysicsEngine`] is the context object gameplay code talks to. It owns the
//! [`CollisionRegistry`] and the [`PhysicsConfig`]; queries, raycasts and the
//! movement resolver are implemented on it in their own modules.
//!
//! Engines are independent of each other: a game can run one per level or one
//! per test without any shared state.
//!
//! ## Tick contract
//!
//! Call [`PhysicsEngine::update`] once per tick before any query or move of
//! that tick. Queries read the box snapshot taken there, so every query of a
//! tick sees the same world regardless of the order entities move in.

use super::registry::{Collider, CollisionRegistry, EntityRef};
use crate::core::config::PhysicsConfig;
use crate::entities::{CollisionClass, CollisionEntity};
use crate::foundation::math::Rect;
use log::{debug, info};
use std::sync::Arc;

/// Whether `candidate` takes part in a query asked on behalf of `asking`
pub(crate) fn can_collide<A>(candidate: &dyn CollisionEntity, asking: Option<&A>) -> bool
where
    A: CollisionEntity + ?Sized,
{
    if !candidate.has_collision() {
        return false;
    }

    match asking {
        None => true,
        Some(asking) => candidate.id() != asking.id() && asking.can_collide_with(candidate),
    }
}

/// Collision and movement resolution for one world
pub struct PhysicsEngine {
    registry: CollisionRegistry,
    config: PhysicsConfig,
}

impl PhysicsEngine {
    /// Create an engine with the default configuration
    pub fn new() -> Self {
        Self::with_config(PhysicsConfig::default())
    }

    /// Create an engine from a configuration
    pub fn with_config(config: PhysicsConfig) -> Self {
        let registry = CollisionRegistry::new();
        registry.set_bound(config.world_bound);
        info!(
            "Physics engine created (raycast policy {:?}, tunneling safeguard {})",
            config.raycast_policy, config.tunneling_safeguard
        );

        Self { registry, config }
    }

    /// The configuration this engine runs with
    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    /// The underlying registry
    pub fn registry(&self) -> &CollisionRegistry {
        &self.registry
    }

    /// Register a collidable entity. See [`CollisionRegistry::add`].
    pub fn add(&self, entity: EntityRef) {
        self.registry.add(entity);
    }

    /// Unregister an entity. See [`CollisionRegistry::remove`].
    pub fn remove<E: CollisionEntity + ?Sized>(&self, entity: &E) {
        self.registry.remove(entity);
    }

    /// Drop every registered entity and the world bound
    pub fn clear(&self) {
        self.registry.clear();
    }

    /// Outer boundary of the playable world
    pub fn bound(&self) -> Option<Rect> {
        self.registry.bound()
    }

    /// Set or clear the outer boundary of the playable world
    pub fn set_bound(&self, bound: Option<Rect>) {
        self.registry.set_bound(bound);
    }

    /// Collision boxes of a class as of the last [`update`](Self::update)
    pub fn boxes(&self, class: CollisionClass) -> Vec<Rect> {
        self.registry.boxes(class)
    }

    /// Registered entities of a class
    pub fn entities(&self, class: CollisionClass) -> Arc<[EntityRef]> {
        self.registry.entities(class)
    }

    /// Take this tick's snapshot of every registered collision box
    pub fn update(&self) {
        self.registry.refresh();
    }

    /// Hook for the environment: an entity was spawned
    pub fn on_entity_added(&self, entity: EntityRef) {
        self.add(entity);
    }

    /// Hook for the environment: an entity was despawned
    pub fn on_entity_removed<E: CollisionEntity + ?Sized>(&self, entity: &E) {
        self.remove(entity);
    }

    /// Hook for the environment: the playable area changed
    pub fn on_environment_bounds_changed(&self, bound: Option<Rect>) {
        debug!("World bound changed to {:?}", bound);
        self.set_bound(bound);
    }

    /// Snapshot entries of `class` that take part in a query for `asking`
    pub(crate) fn candidates<'a, A>(
        &self,
        class: CollisionClass,
        asking: Option<&'a A>,
    ) -> impl Iterator<Item = Collider> + 'a
    where
        A: CollisionEntity + ?Sized,
    {
        self.registry
            .snapshot(class)
            .to_vec()
            .into_iter()
            .filter(move |collider| can_collide(collider.entity.as_ref(), asking))
    }
}

impl Default for PhysicsEngine {
    fn default() -> Self {
        Self::new()
    }
}
