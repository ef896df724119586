//! Overlap of a probe box with the registered collision boxes

use super::registry::EntityRef;
use crate::entities::EntityId;
use crate::foundation::math::Rect;
use std::fmt;

/// Union of all overlap rectangles found for one probe box, together with the
/// entities that produced them
#[derive(Clone)]
pub struct Intersection {
    /// Union of the individual overlap rectangles
    pub bounds: Rect,
    /// Entities overlapping the probe, in registration order
    pub involved: Vec<EntityRef>,
}

impl Intersection {
    /// Start a new intersection from a single overlap
    pub fn new(bounds: Rect, entity: EntityRef) -> Self {
        Self {
            bounds,
            involved: vec![entity],
        }
    }

    /// Merge another overlap into this one
    pub fn merge(&mut self, bounds: Rect, entity: EntityRef) {
        self.bounds = self.bounds.union(&bounds);
        self.involved.push(entity);
    }

    /// Fold overlaps into an intersection; `None` when there are none
    pub fn collect<I>(overlaps: I) -> Option<Self>
    where
        I: IntoIterator<Item = (Rect, EntityRef)>,
    {
        overlaps.into_iter().fold(None, |acc, (bounds, entity)| match acc {
            Some(mut intersection) => {
                intersection.merge(bounds, entity);
                Some(intersection)
            }
            None => Some(Self::new(bounds, entity)),
        })
    }

    /// Ids of the involved entities
    pub fn ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.involved.iter().map(|entity| entity.id())
    }
}

impl fmt::Debug for Intersection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Intersection")
            .field("bounds", &self.bounds)
            .field("involved", &self.ids().collect::<Vec<_>>())
            .finish()
    }
}
