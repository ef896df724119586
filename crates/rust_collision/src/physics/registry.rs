//! Collision registry
//!
//! Bookkeeping of every collidable entity, partitioned by [`CollisionClass`],
//! plus the per-tick snapshot of their collision boxes.
//!
//! Each bucket is copy-on-write: readers clone an `Arc` of the current slice
//! and iterate it without holding any lock, writers build a new slice and swap
//! it in. Entities can therefore be registered from a loader thread while the
//! tick thread is iterating.

use crate::entities::{CollisionClass, CollisionEntity, EntityId};
use crate::foundation::math::Rect;
use log::{debug, trace, warn};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Shared handle to a registered entity
pub type EntityRef = Arc<dyn CollisionEntity>;

/// One entry of the per-tick snapshot: an entity and the collision box it had
/// when the snapshot was taken
#[derive(Clone)]
pub struct Collider {
    /// The registered entity
    pub entity: EntityRef,
    /// Its collision box at snapshot time
    pub bounds: Rect,
}

impl fmt::Debug for Collider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collider")
            .field("entity", &self.entity.id())
            .field("bounds", &self.bounds)
            .finish()
    }
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

/// Registered entities of one class and their snapshot
struct Bucket {
    entities: RwLock<Arc<[EntityRef]>>,
    snapshot: RwLock<Arc<[Collider]>>,
}

impl Bucket {
    fn new() -> Self {
        Self {
            entities: RwLock::new(Arc::from(Vec::new())),
            snapshot: RwLock::new(Arc::from(Vec::new())),
        }
    }

    fn entities(&self) -> Arc<[EntityRef]> {
        Arc::clone(&read(&self.entities))
    }

    fn snapshot(&self) -> Arc<[Collider]> {
        Arc::clone(&read(&self.snapshot))
    }

    fn contains(&self, id: EntityId) -> bool {
        self.entities().iter().any(|entity| entity.id() == id)
    }

    fn insert(&self, entity: &EntityRef) -> bool {
        let mut entities = write(&self.entities);
        if entities.iter().any(|registered| registered.id() == entity.id()) {
            return false;
        }

        let mut next = entities.to_vec();
        next.push(Arc::clone(entity));
        *entities = Arc::from(next);
        true
    }

    fn remove(&self, id: EntityId) -> bool {
        let mut entities = write(&self.entities);
        if !entities.iter().any(|registered| registered.id() == id) {
            return false;
        }

        let next: Vec<EntityRef> = entities
            .iter()
            .filter(|registered| registered.id() != id)
            .cloned()
            .collect();
        *entities = Arc::from(next);
        true
    }

    fn clear(&self) {
        *write(&self.entities) = Arc::from(Vec::new());
        *write(&self.snapshot) = Arc::from(Vec::new());
    }

    fn refresh(&self) {
        let snapshot: Arc<[Collider]> = self
            .entities()
            .iter()
            .map(|entity| Collider {
                entity: Arc::clone(entity),
                bounds: entity.collision_box(),
            })
            .collect();
        *write(&self.snapshot) = snapshot;
    }
}

/// Registry of all collidable entities
///
/// STATIC and DYNAMIC entities live in their own bucket and in the ANY bucket.
/// NONE entities are never registered.
pub struct CollisionRegistry {
    // serializes add/remove/clear so the class and ANY buckets never disagree
    writer: Mutex<()>,
    static_bucket: Bucket,
    dynamic_bucket: Bucket,
    any_bucket: Bucket,
    bound: RwLock<Option<Rect>>,
}

impl CollisionRegistry {
    /// Create an empty registry without a world bound
    pub fn new() -> Self {
        Self {
            writer: Mutex::new(()),
            static_bucket: Bucket::new(),
            dynamic_bucket: Bucket::new(),
            any_bucket: Bucket::new(),
            bound: RwLock::new(None),
        }
    }

    fn bucket(&self, class: CollisionClass) -> Option<&Bucket> {
        match class {
            CollisionClass::Static => Some(&self.static_bucket),
            CollisionClass::Dynamic => Some(&self.dynamic_bucket),
            CollisionClass::Any => Some(&self.any_bucket),
            CollisionClass::None => None,
        }
    }

    fn lock_writer(&self) -> MutexGuard<'_, ()> {
        self.writer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn buckets(&self) -> [&Bucket; 3] {
        [&self.static_bucket, &self.dynamic_bucket, &self.any_bucket]
    }

    /// Register an entity under its current collision class.
    ///
    /// NONE entities are ignored, as are entities that report the
    /// query-only ANY class. Registering an entity twice has no effect.
    /// Registration is atomic with respect to [`remove_id`](Self::remove_id):
    /// a concurrent removal sees the entity in both of its buckets or in
    /// neither. Readers do not take part in this ordering.
    pub fn add(&self, entity: EntityRef) {
        let class = entity.collision_class();
        let bucket = match class {
            CollisionClass::Static | CollisionClass::Dynamic => self.bucket(class),
            CollisionClass::Any => {
                warn!("Entity {} reports CollisionClass::Any, which is query-only; not registered", entity.id());
                return;
            }
            CollisionClass::None => {
                trace!("Entity {} has CollisionClass::None; not registered", entity.id());
                return;
            }
        };

        let _writer = self.lock_writer();
        if let Some(bucket) = bucket {
            bucket.insert(&entity);
        }
        if self.any_bucket.insert(&entity) {
            debug!("Registered entity {} as {:?}", entity.id(), class);
        }
    }

    /// Unregister an entity. Unknown entities are ignored.
    ///
    /// The entity is looked up by id in every bucket, so it is found even if
    /// its class changed after registration.
    pub fn remove<E: CollisionEntity + ?Sized>(&self, entity: &E) {
        self.remove_id(entity.id());
    }

    /// Unregister an entity by id
    pub fn remove_id(&self, id: EntityId) {
        let _writer = self.lock_writer();
        let mut removed = false;
        for bucket in self.buckets() {
            removed |= bucket.remove(id);
        }

        if removed {
            debug!("Unregistered entity {}", id);
        }
    }

    /// Whether an entity is registered
    pub fn contains(&self, id: EntityId) -> bool {
        self.any_bucket.contains(id)
    }

    /// Empty every bucket and snapshot and drop the world bound
    pub fn clear(&self) {
        let _writer = self.lock_writer();
        for bucket in self.buckets() {
            bucket.clear();
        }
        *write(&self.bound) = None;
        debug!("Cleared collision registry");
    }

    /// Rebuild every snapshot from the registered entities' current boxes.
    ///
    /// Called exactly once per tick, before any query or move of that tick.
    pub fn refresh(&self) {
        for bucket in self.buckets() {
            bucket.refresh();
        }
    }

    /// Registered entities of a class, in registration order
    pub fn entities(&self, class: CollisionClass) -> Arc<[EntityRef]> {
        self.bucket(class)
            .map_or_else(|| Arc::from(Vec::new()), Bucket::entities)
    }

    /// The snapshot of a class taken at the last [`refresh`](Self::refresh)
    pub fn snapshot(&self, class: CollisionClass) -> Arc<[Collider]> {
        self.bucket(class)
            .map_or_else(|| Arc::from(Vec::new()), Bucket::snapshot)
    }

    /// Collision boxes of a class taken at the last [`refresh`](Self::refresh)
    pub fn boxes(&self, class: CollisionClass) -> Vec<Rect> {
        self.snapshot(class).iter().map(|collider| collider.bounds).collect()
    }

    /// Number of registered entities of a class
    pub fn len(&self, class: CollisionClass) -> usize {
        self.bucket(class).map_or(0, |bucket| bucket.entities().len())
    }

    /// Whether no entity is registered at all
    pub fn is_empty(&self) -> bool {
        self.len(CollisionClass::Any) == 0
    }

    /// Outer boundary of the playable world
    pub fn bound(&self) -> Option<Rect> {
        *read(&self.bound)
    }

    /// Set or clear the outer boundary of the playable world
    pub fn set_bound(&self, bound: Option<Rect>) {
        *write(&self.bound) = bound;
    }
}

impl Default for CollisionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Body, MobileEntity};
    use crate::foundation::math::Point;
    use crate::physics::PhysicsEngine;
    use std::thread;

    fn dynamic_body() -> Arc<Body> {
        Arc::new(Body::new(10.0, 10.0, 10.0, 10.0))
    }

    fn wall() -> Arc<Body> {
        Arc::new(Body::static_box(Rect::new(0.0, 25.0, 100.0, 10.0)))
    }

    #[test]
    fn test_add_registers_class_and_any() {
        let registry = CollisionRegistry::new();
        registry.add(wall());
        registry.add(dynamic_body());

        assert_eq!(registry.len(CollisionClass::Static), 1);
        assert_eq!(registry.len(CollisionClass::Dynamic), 1);
        assert_eq!(registry.len(CollisionClass::Any), 2);
        assert_eq!(registry.len(CollisionClass::None), 0);
    }

    #[test]
    fn test_none_class_is_ignored() {
        let registry = CollisionRegistry::new();
        let ghost = Arc::new(Body::new(0.0, 0.0, 5.0, 5.0).with_class(CollisionClass::None));
        registry.add(ghost.clone());

        assert!(registry.is_empty());
        registry.remove(ghost.as_ref());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_add_twice_does_not_duplicate() {
        let registry = CollisionRegistry::new();
        let body = dynamic_body();
        registry.add(body.clone());
        registry.add(body);

        assert_eq!(registry.len(CollisionClass::Any), 1);
        assert_eq!(registry.len(CollisionClass::Dynamic), 1);
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let registry = CollisionRegistry::new();
        registry.add(wall());
        registry.remove(dynamic_body().as_ref());

        assert_eq!(registry.len(CollisionClass::Any), 1);
    }

    #[test]
    fn test_remove_after_class_change() {
        let registry = CollisionRegistry::new();
        let body = dynamic_body();
        registry.add(body.clone());
        body.set_collision_class(CollisionClass::Static);
        registry.remove(body.as_ref());

        assert!(registry.is_empty());
        assert_eq!(registry.len(CollisionClass::Dynamic), 0);
    }

    #[test]
    fn test_snapshot_is_frozen_until_refresh() {
        let registry = CollisionRegistry::new();
        let body = dynamic_body();
        registry.add(body.clone());

        assert!(registry.boxes(CollisionClass::Any).is_empty());

        registry.refresh();
        assert_eq!(registry.boxes(CollisionClass::Any), vec![Rect::new(10.0, 10.0, 10.0, 10.0)]);

        body.set_location(Point::new(50.0, 50.0));
        assert_eq!(registry.boxes(CollisionClass::Dynamic), vec![Rect::new(10.0, 10.0, 10.0, 10.0)]);

        registry.refresh();
        assert_eq!(registry.boxes(CollisionClass::Dynamic), vec![Rect::new(50.0, 50.0, 10.0, 10.0)]);
    }

    #[test]
    fn test_clear_drops_everything() {
        let registry = CollisionRegistry::new();
        registry.add(wall());
        registry.set_bound(Some(Rect::new(0.0, 0.0, 100.0, 100.0)));
        registry.refresh();
        registry.clear();

        assert!(registry.is_empty());
        assert!(registry.boxes(CollisionClass::Any).is_empty());
        assert_eq!(registry.bound(), None);
    }

    #[test]
    fn test_queries_run_during_concurrent_registration() {
        let engine = Arc::new(PhysicsEngine::new());
        let wall = wall();
        let wall_id = wall.id();
        engine.add(wall);
        engine.update();

        let writer = {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                let registry = engine.registry();
                for _ in 0..200 {
                    let body: EntityRef = dynamic_body();
                    registry.add(Arc::clone(&body));
                    registry.refresh();
                    registry.remove_id(body.id());
                    registry.refresh();
                }
            })
        };

        let mut rounds = 0;
        while rounds < 100 || !writer.is_finished() {
            assert!(engine.collides_rect(&Rect::new(40.0, 28.0, 4.0, 4.0)));
            assert_eq!(engine.boxes(CollisionClass::Static), vec![Rect::new(0.0, 25.0, 100.0, 10.0)]);

            let hit = engine.raycast(Point::new(50.0, 0.0), 0.0).unwrap();
            assert_eq!(hit.entity.id(), wall_id);
            assert!((hit.distance - 25.0).abs() < 1e-9);

            let entities = engine.registry().entities(CollisionClass::Any);
            assert!(entities.len() <= 2);
            assert!(entities.iter().any(|entity| entity.id() == wall_id));
            rounds += 1;
        }

        writer.join().unwrap();
        engine.update();
        assert_eq!(engine.registry().len(CollisionClass::Any), 1);
        assert_eq!(engine.boxes(CollisionClass::Any).len(), 1);
    }

    #[test]
    fn test_racing_add_and_remove_keep_buckets_consistent() {
        let registry = Arc::new(CollisionRegistry::new());

        for _ in 0..50 {
            let body: EntityRef = dynamic_body();
            let id = body.id();
            let adder = {
                let registry = Arc::clone(&registry);
                let body = Arc::clone(&body);
                thread::spawn(move || {
                    for _ in 0..20 {
                        registry.add(Arc::clone(&body));
                    }
                })
            };
            let remover = {
                let registry = Arc::clone(&registry);
                thread::spawn(move || {
                    for _ in 0..20 {
                        registry.remove_id(id);
                    }
                })
            };
            adder.join().unwrap();
            remover.join().unwrap();

            let in_dynamic = registry
                .entities(CollisionClass::Dynamic)
                .iter()
                .any(|entity| entity.id() == id);
            assert_eq!(registry.contains(id), in_dynamic);
            registry.remove_id(id);
        }

        assert!(registry.is_empty());
        assert_eq!(registry.len(CollisionClass::Dynamic), 0);
    }
}
