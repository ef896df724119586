//! A ready-made, thread-safe collidable entity
//!
//! [`Body`] is what most games register with the physics engine: a visual box
//! with an aligned collision box, a collision class, an optional pairwise
//! filter and a list of collision listeners. Mutable state sits behind an
//! `RwLock` so a body can be shared (`Arc<Body>`) between the registry, the
//! tick thread and loaders.

use super::collision::{CollisionClass, CollisionEntity, CollisionEvent, MobileEntity};
use super::id::EntityId;
use crate::foundation::align::{Align, Valign};
use crate::foundation::math::{Point, Rect, Vec2};
use log::warn;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Pairwise collision filter
pub type CollisionFilter = Box<dyn Fn(&dyn CollisionEntity) -> bool + Send + Sync>;

/// Callback fired when a movement involving the body is blocked
pub type CollisionListener = Arc<dyn Fn(&CollisionEvent) + Send + Sync>;

#[derive(Debug, Clone)]
struct BodyState {
    location: Point,
    size: Vec2,
    collision_size: Vec2,
    align: Align,
    valign: Valign,
    collision: bool,
    class: CollisionClass,
    angle: f64,
    turn_on_move: bool,
}

impl BodyState {
    fn collision_offset(&self) -> Vec2 {
        Vec2::new(
            self.align.offset(self.size.x, self.collision_size.x),
            self.valign.offset(self.size.y, self.collision_size.y),
        )
    }

    fn collision_box_at(&self, location: Point) -> Rect {
        Rect::at(location + self.collision_offset(), self.collision_size.x, self.collision_size.y)
    }
}

/// Thread-safe collidable, movable entity
pub struct Body {
    id: EntityId,
    state: RwLock<BodyState>,
    filter: Option<CollisionFilter>,
    listeners: Mutex<Vec<CollisionListener>>,
}

impl Body {
    /// Create a dynamic body at `(x, y)` whose collision box covers its whole
    /// visual box
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            id: EntityId::next(),
            state: RwLock::new(BodyState {
                location: Point::new(x, y),
                size: Vec2::new(width, height),
                collision_size: Vec2::new(width, height),
                align: Align::Center,
                valign: Valign::Down,
                collision: true,
                class: CollisionClass::Dynamic,
                angle: 0.0,
                turn_on_move: false,
            }),
            filter: None,
            listeners: Mutex::new(Vec::new()),
        }
    }

    /// Create a static obstacle covering `rect`
    pub fn static_box(rect: Rect) -> Self {
        Self::new(rect.x, rect.y, rect.width, rect.height)
            .with_class(CollisionClass::Static)
            .with_align(Align::Left, Valign::Top)
    }

    /// Use an explicit collision box size instead of the visual size
    pub fn with_collision_box(self, width: f64, height: f64) -> Self {
        self.write().collision_size = Vec2::new(width, height);
        self
    }

    /// Set where the collision box sits inside the visual box
    pub fn with_align(self, align: Align, valign: Valign) -> Self {
        {
            let mut state = self.write();
            state.align = align;
            state.valign = valign;
        }
        self
    }

    /// Set the collision class
    pub fn with_class(self, class: CollisionClass) -> Self {
        self.set_collision_class(class);
        self
    }

    /// Enable or disable collision
    pub fn with_collision(self, collision: bool) -> Self {
        self.set_collision(collision);
        self
    }

    /// Make the body face the target of every move
    pub fn with_turn_on_move(self, turn_on_move: bool) -> Self {
        self.write().turn_on_move = turn_on_move;
        self
    }

    /// Install a pairwise collision filter
    pub fn with_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&dyn CollisionEntity) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Box::new(filter));
        self
    }

    /// Use a caller-provided id (e.g. the id of an outer entity system)
    pub fn with_id(mut self, id: EntityId) -> Self {
        self.id = id;
        self
    }

    /// Enable or disable collision
    pub fn set_collision(&self, collision: bool) {
        self.write().collision = collision;
    }

    /// Change the collision class.
    ///
    /// [`CollisionClass::Any`] is rejected. A body that is already registered
    /// must be removed and re-added for the change to reach the registry.
    pub fn set_collision_class(&self, class: CollisionClass) {
        if !class.is_assignable() {
            warn!("CollisionClass::Any cannot be assigned to {}; it is only used to filter queries", self.id);
            return;
        }

        self.write().class = class;
    }

    /// Resize the visual box
    pub fn set_size(&self, width: f64, height: f64) {
        self.write().size = Vec2::new(width, height);
    }

    /// Resize the collision box
    pub fn set_collision_box_size(&self, width: f64, height: f64) {
        self.write().collision_size = Vec2::new(width, height);
    }

    /// Change the collision box alignment
    pub fn set_align(&self, align: Align, valign: Valign) {
        let mut state = self.write();
        state.align = align;
        state.valign = valign;
    }

    /// Register a collision listener.
    ///
    /// Listeners run without any lock held on the body, so they may move it,
    /// move other entities or register further listeners.
    pub fn add_collision_listener<F>(&self, listener: F)
    where
        F: Fn(&CollisionEvent) + Send + Sync + 'static,
    {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::new(listener));
    }

    fn read(&self) -> RwLockReadGuard<'_, BodyState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, BodyState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl CollisionEntity for Body {
    fn id(&self) -> EntityId {
        self.id
    }

    fn collision_box(&self) -> Rect {
        let state = self.read();
        state.collision_box_at(state.location)
    }

    fn collision_class(&self) -> CollisionClass {
        self.read().class
    }

    fn has_collision(&self) -> bool {
        let state = self.read();
        state.collision && state.collision_size.x > 0.0 && state.collision_size.y > 0.0
    }

    fn can_collide_with(&self, other: &dyn CollisionEntity) -> bool {
        self.filter.as_ref().map_or(true, |filter| filter(other))
    }

    fn on_collision(&self, event: &CollisionEvent) {
        // the list is copied so a listener can re-enter the engine
        let listeners = self.listeners.lock().unwrap_or_else(PoisonError::into_inner).clone();
        for listener in &listeners {
            listener(event);
        }
    }
}

impl MobileEntity for Body {
    fn location(&self) -> Point {
        self.read().location
    }

    fn set_location(&self, location: Point) {
        self.write().location = location;
    }

    fn size(&self) -> Vec2 {
        self.read().size
    }

    fn collision_box_size(&self) -> Vec2 {
        self.read().collision_size
    }

    fn collision_box_offset(&self) -> Vec2 {
        self.read().collision_offset()
    }

    fn angle(&self) -> f64 {
        self.read().angle
    }

    fn set_angle(&self, angle: f64) {
        self.write().angle = angle;
    }

    fn turn_on_move(&self) -> bool {
        self.read().turn_on_move
    }

    fn collision_box_at(&self, location: Point) -> Rect {
        self.read().collision_box_at(location)
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Body")
            .field("id", &self.id)
            .field("state", &*self.read())
            .field("filtered", &self.filter.is_some())
            .finish_non_exhaustive()
    }
}
