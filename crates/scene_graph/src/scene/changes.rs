//! Per-frame change feed
//!
//! A slot is marked changed whenever its world matrix is recomputed or
//! overwritten. Consumers drain the feed once per frame with
//! [`SceneGraph::get_changed`], then the owner resets it with
//! [`SceneGraph::clear_changed`]. No history is kept across a reset.

use crate::foundation::math::Mat4;

use super::instance::{TransformInstance, UnitId};
use super::scene_graph::SceneGraph;

impl SceneGraph {
    /// Reset every changed flag
    pub fn clear_changed(&mut self) {
        self.data.changed.fill(false);
    }

    /// Append `(unit, world pose)` for every changed slot to the output buffers
    ///
    /// The buffers are not cleared first, so a driver can reuse them across
    /// frames by clearing them itself.
    pub fn get_changed(&self, units: &mut Vec<UnitId>, world_poses: &mut Vec<Mat4>) {
        for (unit, world) in self.iter_changed() {
            units.push(unit);
            world_poses.push(*world);
        }
    }

    /// Borrowing iterator over changed `(unit, world pose)` pairs, in slot order
    pub fn iter_changed(&self) -> ChangedIter<'_> {
        ChangedIter {
            graph: self,
            index: 0,
        }
    }

    /// Number of changed slots
    pub fn changed_count(&self) -> usize {
        self.data.changed.iter().filter(|&&changed| changed).count()
    }

    /// Whether the world pose of `i` changed since the last reset
    pub fn is_changed(&self, i: TransformInstance) -> bool {
        self.check(i);
        self.data.changed[i.index()]
    }
}

/// Iterator over changed slots, see [`SceneGraph::iter_changed`]
#[derive(Debug, Clone)]
pub struct ChangedIter<'a> {
    graph: &'a SceneGraph,
    index: usize,
}

impl<'a> Iterator for ChangedIter<'a> {
    type Item = (UnitId, &'a Mat4);

    fn next(&mut self) -> Option<Self::Item> {
        let data = &self.graph.data;
        while self.index < data.len() {
            let i = self.index;
            self.index += 1;
            if data.changed[i] {
                return Some((data.unit[i], &data.world[i]));
            }
        }
        None
    }
}
