//! Scene graph: instance lifecycle and identity lookup

use std::collections::HashMap;

use crate::config::SceneGraphConfig;
use crate::foundation::math::{Mat4, Quat, Vec3};

use super::instance::{TransformInstance, UnitId};
use super::instance_table::InstanceData;
use super::pose::Pose;

/// Hierarchical transform store
///
/// Holds one transform per unit. Hierarchy, pose and change-feed operations
/// live in sibling modules as further `impl` blocks.
///
/// Misuse is fatal: creating a second transform for a unit panics, and so
/// does passing an invalid or stale [`TransformInstance`] (checked with a
/// descriptive message in debug builds, by slice indexing otherwise).
#[derive(Debug)]
pub struct SceneGraph {
    pub(super) data: InstanceData,
    pub(super) map: HashMap<UnitId, u32>,
    pub(super) pose_tolerance: f32,
    /// Reused by subtree propagation to avoid recursion
    pub(super) work_stack: Vec<(Mat4, TransformInstance)>,
}

impl SceneGraph {
    /// Create an empty graph with default configuration
    pub fn new() -> Self {
        Self::with_config(&SceneGraphConfig::default())
    }

    /// Create an empty graph from explicit configuration
    pub fn with_config(config: &SceneGraphConfig) -> Self {
        Self {
            data: InstanceData::with_capacity(config.initial_capacity),
            map: HashMap::with_capacity(config.initial_capacity),
            pose_tolerance: config.pose_tolerance,
            work_stack: Vec::new(),
        }
    }

    /// Create a root transform for `unit` from a local pose matrix
    ///
    /// # Panics
    ///
    /// If `unit` already has a transform.
    pub fn create(&mut self, unit: UnitId, pose: &Mat4) -> TransformInstance {
        self.create_from_pose(unit, Pose::from_matrix(pose))
    }

    /// Create a root transform for `unit` from position, rotation and scale
    ///
    /// # Panics
    ///
    /// If `unit` already has a transform.
    pub fn create_trs(
        &mut self,
        unit: UnitId,
        position: Vec3,
        rotation: Quat,
        scale: Vec3,
    ) -> TransformInstance {
        self.create_from_pose(unit, Pose::new(position, rotation, scale))
    }

    /// Create a root transform for `unit` from a decomposed local pose
    ///
    /// The new slot has no links and a clear changed flag; its world matrix
    /// equals its local pose.
    ///
    /// # Panics
    ///
    /// If `unit` already has a transform.
    pub fn create_from_pose(&mut self, unit: UnitId, pose: Pose) -> TransformInstance {
        assert!(
            !self.map.contains_key(&unit),
            "Unit {unit:?} already has a transform"
        );

        let index = self.data.push(unit, pose, pose.to_matrix());
        self.map.insert(unit, index as u32);

        let instance = TransformInstance::from_index(index);
        log::trace!("Created transform {instance} for unit {unit:?}");
        instance
    }

    /// Destroy the transform `i`, recycling its slot
    ///
    /// The last slot is moved into the freed one, so the handle of the unit
    /// that lived there changes; look it up again with [`get`](Self::get).
    /// A node that is still linked is first unlinked from its parent, and its
    /// children become roots that keep their world placement.
    pub fn destroy(&mut self, i: TransformInstance) {
        self.check(i);

        if self.data.parent[i.index()].is_valid() || self.data.first_child[i.index()].is_valid() {
            log::debug!("Destroying transform {i} while still linked; detaching it first");
            self.unlink(i);
            self.detach_children(i);
        }

        let index = i.index();
        let unit = self.data.unit[index];
        let moved_from = self.data.swap_remove(index);
        self.map.remove(&unit);

        if moved_from != index {
            let moved_unit = self.data.unit[index];
            self.map.insert(moved_unit, index as u32);
            self.repoint_links(TransformInstance::from_index(moved_from), i);
        }

        log::trace!("Destroyed transform {i} of unit {unit:?}");
    }

    /// Transform of `unit`, or [`TransformInstance::INVALID`] if it has none
    pub fn get(&self, unit: UnitId) -> TransformInstance {
        self.map
            .get(&unit)
            .map_or(TransformInstance::INVALID, |&index| {
                TransformInstance::from_index(index as usize)
            })
    }

    /// Transform of `unit`, if it has one
    pub fn lookup(&self, unit: UnitId) -> Option<TransformInstance> {
        self.get(unit).to_option()
    }

    /// Unit owning the transform `i`
    pub fn unit(&self, i: TransformInstance) -> UnitId {
        self.check(i);
        self.data.unit[i.index()]
    }

    /// Number of live transforms
    pub fn num_nodes(&self) -> usize {
        self.data.len()
    }

    /// Whether the graph holds no transforms
    pub fn is_empty(&self) -> bool {
        self.data.len() == 0
    }

    /// Slots available before the table grows again
    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    /// Make room for at least `additional` more transforms
    pub fn reserve(&mut self, additional: usize) {
        let wanted = self.data.len() + additional;
        if wanted > self.data.capacity() {
            self.data.allocate(wanted);
        }
    }

    /// Tolerance this graph was configured with for pose validation
    pub const fn pose_tolerance(&self) -> f32 {
        self.pose_tolerance
    }

    pub(super) fn check(&self, i: TransformInstance) {
        debug_assert!(
            i.is_valid() && i.index() < self.data.len(),
            "Invalid or stale transform instance {i} (graph holds {} nodes)",
            self.data.len()
        );
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}
