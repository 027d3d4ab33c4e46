//! Structure-of-arrays instance storage
//!
//! One column per field, all columns the same length. Slots are appended at
//! the end and removed with swap-remove, so the live slots are always the
//! dense range `0..len`.

use crate::foundation::math::Mat4;

use super::instance::{TransformInstance, UnitId};
use super::pose::Pose;

#[derive(Debug, Default)]
pub(super) struct InstanceData {
    pub unit: Vec<UnitId>,
    pub world: Vec<Mat4>,
    pub local: Vec<Pose>,
    pub parent: Vec<TransformInstance>,
    pub first_child: Vec<TransformInstance>,
    pub next_sibling: Vec<TransformInstance>,
    pub prev_sibling: Vec<TransformInstance>,
    pub changed: Vec<bool>,
    capacity: usize,
}

impl InstanceData {
    pub fn with_capacity(capacity: usize) -> Self {
        let mut data = Self::default();
        if capacity > 0 {
            data.allocate(capacity);
        }
        data
    }

    pub fn len(&self) -> usize {
        self.unit.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Reserve room for `num` slots in every column
    pub fn allocate(&mut self, num: usize) {
        assert!(num > self.len(), "allocate({num}) must exceed the current size {}", self.len());

        let additional = num - self.len();
        self.unit.reserve_exact(additional);
        self.world.reserve_exact(additional);
        self.local.reserve_exact(additional);
        self.parent.reserve_exact(additional);
        self.first_child.reserve_exact(additional);
        self.next_sibling.reserve_exact(additional);
        self.prev_sibling.reserve_exact(additional);
        self.changed.reserve_exact(additional);

        log::debug!("Instance table capacity {} -> {}", self.capacity, num);
        self.capacity = num;
    }

    fn grow(&mut self) {
        self.allocate(self.capacity * 2 + 1);
    }

    /// Append a root slot with no links and a clear changed flag
    pub fn push(&mut self, unit: UnitId, local: Pose, world: Mat4) -> usize {
        if self.len() == self.capacity {
            self.grow();
        }

        let index = self.len();
        self.unit.push(unit);
        self.world.push(world);
        self.local.push(local);
        self.parent.push(TransformInstance::INVALID);
        self.first_child.push(TransformInstance::INVALID);
        self.next_sibling.push(TransformInstance::INVALID);
        self.prev_sibling.push(TransformInstance::INVALID);
        self.changed.push(false);
        index
    }

    /// Move the last slot into `index` and shrink by one
    ///
    /// Returns the index the moved slot used to occupy. Links pointing at
    /// that index are left for the caller to repoint.
    pub fn swap_remove(&mut self, index: usize) -> usize {
        let last = self.len() - 1;

        self.unit.swap_remove(index);
        self.world.swap_remove(index);
        self.local.swap_remove(index);
        self.parent.swap_remove(index);
        self.first_child.swap_remove(index);
        self.next_sibling.swap_remove(index);
        self.prev_sibling.swap_remove(index);
        self.changed.swap_remove(index);

        last
    }
}
