//! Local pose accessors and world matrix propagation

use crate::foundation::math::{self, Mat4, Quat, Vec3};

use super::instance::TransformInstance;
use super::pose::Pose;
use super::scene_graph::SceneGraph;

impl SceneGraph {
    /// Set the local position of `i` and update its subtree
    pub fn set_local_position(&mut self, i: TransformInstance, position: Vec3) {
        self.check(i);
        self.data.local[i.index()].position = position;
        self.propagate_from(i);
    }

    /// Set the local rotation of `i` and update its subtree
    pub fn set_local_rotation(&mut self, i: TransformInstance, rotation: Quat) {
        self.check(i);
        self.data.local[i.index()].rotation = math::basis_from_quat(&rotation);
        self.propagate_from(i);
    }

    /// Set the local scale of `i` and update its subtree
    pub fn set_local_scale(&mut self, i: TransformInstance, scale: Vec3) {
        self.check(i);
        self.data.local[i.index()].scale = scale;
        self.propagate_from(i);
    }

    /// Set the whole local pose of `i` from a matrix and update its subtree
    pub fn set_local_pose(&mut self, i: TransformInstance, pose: &Mat4) {
        self.set_local_transform(i, Pose::from_matrix(pose));
    }

    /// Set the whole local pose of `i` and update its subtree
    pub fn set_local_transform(&mut self, i: TransformInstance, pose: Pose) {
        self.check(i);
        self.data.local[i.index()] = pose;
        self.propagate_from(i);
    }

    /// Local position of `i`
    pub fn local_position(&self, i: TransformInstance) -> Vec3 {
        self.check(i);
        self.data.local[i.index()].position
    }

    /// Local rotation of `i`
    pub fn local_rotation(&self, i: TransformInstance) -> Quat {
        self.check(i);
        self.data.local[i.index()].rotation_quat()
    }

    /// Local scale of `i`
    pub fn local_scale(&self, i: TransformInstance) -> Vec3 {
        self.check(i);
        self.data.local[i.index()].scale
    }

    /// Local pose of `i` as a matrix, composed on demand
    pub fn local_pose(&self, i: TransformInstance) -> Mat4 {
        self.check(i);
        self.data.local[i.index()].to_matrix()
    }

    /// Local pose of `i` in decomposed form
    pub fn local_transform(&self, i: TransformInstance) -> Pose {
        self.check(i);
        self.data.local[i.index()]
    }

    /// World position of `i`
    pub fn world_position(&self, i: TransformInstance) -> Vec3 {
        self.check(i);
        math::translation(&self.data.world[i.index()])
    }

    /// World rotation of `i`, with scale stripped from the basis
    pub fn world_rotation(&self, i: TransformInstance) -> Quat {
        self.check(i);
        let basis = math::orthonormalize(&math::basis(&self.data.world[i.index()]));
        math::quat_from_basis(&basis)
    }

    /// Cached world matrix of `i`
    pub fn world_pose(&self, i: TransformInstance) -> Mat4 {
        self.check(i);
        self.data.world[i.index()]
    }

    /// Overwrite the world matrix of `i` directly
    ///
    /// For collaborators that drive placement themselves, such as a physics
    /// simulation. The local pose is left alone and children are not
    /// updated; they catch up the next time the local pose of `i` changes.
    pub fn set_world_pose(&mut self, i: TransformInstance, pose: &Mat4) {
        self.check(i);
        self.data.world[i.index()] = *pose;
        self.data.changed[i.index()] = true;
    }

    fn propagate_from(&mut self, i: TransformInstance) {
        let parent = self.data.parent[i.index()];
        let parent_world = if parent.is_valid() {
            self.data.world[parent.index()]
        } else {
            Mat4::identity()
        };
        self.transform(&parent_world, i);
    }

    /// Recompute the world matrices of `i` and its subtree, depth-first
    ///
    /// Every visited node is marked changed. Children are visited in sibling
    /// order, each subtree before the next sibling.
    pub(super) fn transform(&mut self, parent_world: &Mat4, i: TransformInstance) {
        let mut stack = std::mem::take(&mut self.work_stack);

        let world = parent_world * self.data.local[i.index()].to_matrix();
        self.data.world[i.index()] = world;
        self.data.changed[i.index()] = true;

        let child = self.data.first_child[i.index()];
        if child.is_valid() {
            stack.push((world, child));
        }

        while let Some((parent_world, node)) = stack.pop() {
            let n = node.index();
            let world = parent_world * self.data.local[n].to_matrix();
            self.data.world[n] = world;
            self.data.changed[n] = true;

            let next = self.data.next_sibling[n];
            if next.is_valid() {
                stack.push((parent_world, next));
            }
            let child = self.data.first_child[n];
            if child.is_valid() {
                stack.push((world, child));
            }
        }

        self.work_stack = stack;
    }
}
