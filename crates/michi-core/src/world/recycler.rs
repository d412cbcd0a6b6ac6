//! Segment recycler - conveyor-belt streaming for a pooled collection

use crate::world::recyclable::{Recyclable, Visibility};

/// Owns one recyclable collection and scrolls it every tick
#[derive(Debug, Clone)]
pub struct SegmentRecycler<T> {
    items: Vec<T>,
    total_wraps: u64,
}

impl<T> Default for SegmentRecycler<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total_wraps: 0,
        }
    }
}

impl<T: Recyclable> SegmentRecycler<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items,
            total_wraps: 0,
        }
    }

    /// Scroll every item by `world_speed`; returns the wraps applied this tick
    pub fn update(&mut self, world_speed: f64) -> u32 {
        let wraps: u32 = self
            .items
            .iter_mut()
            .map(|item| item.recycle(world_speed))
            .sum();
        self.total_wraps += u64::from(wraps);
        wraps
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Wraps applied since creation
    pub fn total_wraps(&self) -> u64 {
        self.total_wraps
    }

    pub fn set_visibility(&mut self, visibility: Visibility) {
        for item in &mut self.items {
            item.entity_mut().visibility = visibility;
        }
    }

    /// Items the renderer should draw
    pub fn visible(&self) -> impl Iterator<Item = &T> {
        self.items.iter().filter(|item| item.entity().is_visible())
    }
}
