//! Parent/child links and world-space preserving re-parenting

use crate::foundation::math::{self, Mat4};

use super::instance::TransformInstance;
use super::pose::Pose;
use super::scene_graph::SceneGraph;

impl SceneGraph {
    /// Link `child` under `parent`, keeping the child's world placement
    ///
    /// The child is unlinked from any previous parent first and appended at
    /// the end of `parent`'s children. Its local pose is rewritten relative to
    /// the parent's current world matrix and its subtree is re-propagated, so
    /// only the local pose and the links change.
    ///
    /// # Panics
    ///
    /// If `parent` is `child` itself or one of its descendants.
    pub fn link(&mut self, child: TransformInstance, parent: TransformInstance) {
        self.check(child);
        self.check(parent);
        assert!(
            child != parent && !self.is_ancestor(child, parent),
            "Linking {child} under {parent} would create a cycle"
        );

        self.unlink(child);

        let c = child.index();
        let p = parent.index();

        let first = self.data.first_child[p];
        if first.is_valid() {
            let mut last = first;
            while self.data.next_sibling[last.index()].is_valid() {
                last = self.data.next_sibling[last.index()];
            }
            self.data.next_sibling[last.index()] = child;
            self.data.prev_sibling[c] = last;
        } else {
            self.data.first_child[p] = child;
            self.data.prev_sibling[c] = TransformInstance::INVALID;
        }
        self.data.next_sibling[c] = TransformInstance::INVALID;
        self.data.parent[c] = parent;

        let parent_world = self.data.world[p];
        self.data.local[c] = relative_pose(&parent_world, &self.data.world[c]);
        self.transform(&parent_world, child);

        log::trace!("Linked {child} under {parent}");
    }

    /// Detach `child` from its parent, if it has one
    ///
    /// The world matrix is untouched: the child stays where it is and its
    /// local pose is rewritten from that world matrix, making it a root.
    pub fn unlink(&mut self, child: TransformInstance) {
        self.check(child);

        let c = child.index();
        let parent = self.data.parent[c];
        if !parent.is_valid() {
            return;
        }

        let prev = self.data.prev_sibling[c];
        let next = self.data.next_sibling[c];

        if prev.is_valid() {
            self.data.next_sibling[prev.index()] = next;
        } else {
            self.data.first_child[parent.index()] = next;
        }
        if next.is_valid() {
            self.data.prev_sibling[next.index()] = prev;
        }

        self.data.parent[c] = TransformInstance::INVALID;
        self.data.next_sibling[c] = TransformInstance::INVALID;
        self.data.prev_sibling[c] = TransformInstance::INVALID;

        self.data.local[c] = Pose::from_matrix(&self.data.world[c]);

        log::trace!("Unlinked {child} from {parent}");
    }

    /// Parent of `i`, or [`TransformInstance::INVALID`] for a root
    pub fn parent(&self, i: TransformInstance) -> TransformInstance {
        self.check(i);
        self.data.parent[i.index()]
    }

    /// First child of `i`
    pub fn first_child(&self, i: TransformInstance) -> TransformInstance {
        self.check(i);
        self.data.first_child[i.index()]
    }

    /// Next sibling of `i`
    pub fn next_sibling(&self, i: TransformInstance) -> TransformInstance {
        self.check(i);
        self.data.next_sibling[i.index()]
    }

    /// Previous sibling of `i`
    pub fn prev_sibling(&self, i: TransformInstance) -> TransformInstance {
        self.check(i);
        self.data.prev_sibling[i.index()]
    }

    /// Direct children of `i` in link order
    pub fn children(&self, i: TransformInstance) -> Children<'_> {
        self.check(i);
        Children {
            next_sibling: &self.data.next_sibling,
            current: self.data.first_child[i.index()],
        }
    }

    /// Whether `ancestor` lies on the parent chain of `i`
    pub fn is_ancestor(&self, ancestor: TransformInstance, i: TransformInstance) -> bool {
        self.check(i);
        let mut node = self.data.parent[i.index()];
        while node.is_valid() {
            if node == ancestor {
                return true;
            }
            node = self.data.parent[node.index()];
        }
        false
    }

    pub(super) fn detach_children(&mut self, i: TransformInstance) {
        loop {
            let child = self.data.first_child[i.index()];
            if !child.is_valid() {
                break;
            }
            self.unlink(child);
        }
    }

    /// Repoint every link that referenced `from` to `to`
    ///
    /// Used after swap-remove moved the slot at `from` into `to`.
    pub(super) fn repoint_links(&mut self, from: TransformInstance, to: TransformInstance) {
        let t = to.index();

        let parent = self.data.parent[t];
        if parent.is_valid() && self.data.first_child[parent.index()] == from {
            self.data.first_child[parent.index()] = to;
        }

        let prev = self.data.prev_sibling[t];
        if prev.is_valid() {
            self.data.next_sibling[prev.index()] = to;
        }

        let next = self.data.next_sibling[t];
        if next.is_valid() {
            self.data.prev_sibling[next.index()] = to;
        }

        let mut child = self.data.first_child[t];
        while child.is_valid() {
            self.data.parent[child.index()] = to;
            child = self.data.next_sibling[child.index()];
        }
    }
}

/// Local pose that places a node at `child_world` under `parent_world`
///
/// A singular parent (a collapsed scale axis) cannot be inverted; its
/// orthonormalized basis is used instead.
fn relative_pose(parent_world: &Mat4, child_world: &Mat4) -> Pose {
    let parent_inverse = parent_world.try_inverse().unwrap_or_else(|| {
        log::warn!("Parent world matrix is singular; linking against its orthonormal basis");
        rigid_inverse(&math::orthonormalize_pose(parent_world))
    });

    Pose::from_matrix(&(parent_inverse * child_world))
}

/// Inverse of a rotation-plus-translation matrix
fn rigid_inverse(m: &Mat4) -> Mat4 {
    let rotation_t = math::basis(m).transpose();
    let position = -(rotation_t * math::translation(m));
    math::compose(&position, &rotation_t, &math::Vec3::new(1.0, 1.0, 1.0))
}

/// Iterator over the direct children of a node
#[derive(Debug, Clone)]
pub struct Children<'a> {
    next_sibling: &'a [TransformInstance],
    current: TransformInstance,
}

impl Iterator for Children<'_> {
    type Item = TransformInstance;

    fn next(&mut self) -> Option<Self::Item> {
        let child = self.current.to_option()?;
        self.current = self.next_sibling[child.index()];
        Some(child)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{Quat, Vec3};
    use crate::scene::UnitId;
    use approx::assert_relative_eq;
    use slotmap::SlotMap;

    const EPSILON: f32 = 1e-4;

    fn graph_with(n: usize) -> (SceneGraph, Vec<TransformInstance>) {
        let mut units: SlotMap<UnitId, ()> = SlotMap::with_key();
        let mut graph = SceneGraph::new();
        let nodes = (0..n)
            .map(|k| {
                graph.create(
                    units.insert(()),
                    &Mat4::new_translation(&Vec3::new(k as f32, 0.0, 0.0)),
                )
            })
            .collect();
        (graph, nodes)
    }

    #[test]
    fn test_children_keep_link_order() {
        let (mut graph, nodes) = graph_with(4);

        graph.link(nodes[3], nodes[0]);
        graph.link(nodes[1], nodes[0]);
        graph.link(nodes[2], nodes[0]);

        let children: Vec<_> = graph.children(nodes[0]).collect();
        assert_eq!(children, vec![nodes[3], nodes[1], nodes[2]]);
        assert_eq!(graph.first_child(nodes[0]), nodes[3]);
        assert!(!graph.prev_sibling(nodes[3]).is_valid());
        assert_eq!(graph.next_sibling(nodes[3]), nodes[1]);
        assert_eq!(graph.prev_sibling(nodes[2]), nodes[1]);
        assert!(!graph.next_sibling(nodes[2]).is_valid());
        graph.validate().unwrap();
    }

    #[test]
    fn test_unlink_first_middle_last() {
        let (mut graph, nodes) = graph_with(5);
        for &child in &nodes[1..] {
            graph.link(child, nodes[0]);
        }

        graph.unlink(nodes[1]);
        assert_eq!(graph.first_child(nodes[0]), nodes[2]);
        assert!(!graph.prev_sibling(nodes[2]).is_valid());

        graph.unlink(nodes[3]);
        assert_eq!(graph.next_sibling(nodes[2]), nodes[4]);
        assert_eq!(graph.prev_sibling(nodes[4]), nodes[2]);

        graph.unlink(nodes[4]);
        assert!(!graph.next_sibling(nodes[2]).is_valid());

        let children: Vec<_> = graph.children(nodes[0]).collect();
        assert_eq!(children, vec![nodes[2]]);
        for &detached in &[nodes[1], nodes[3], nodes[4]] {
            assert!(!graph.parent(detached).is_valid());
            assert!(!graph.next_sibling(detached).is_valid());
            assert!(!graph.prev_sibling(detached).is_valid());
        }
        graph.validate().unwrap();
    }

    #[test]
    fn test_unlink_root_is_noop() {
        let (mut graph, nodes) = graph_with(1);

        graph.unlink(nodes[0]);

        assert!(!graph.parent(nodes[0]).is_valid());
        assert_relative_eq!(graph.world_position(nodes[0]), Vec3::zeros(), epsilon = EPSILON);
    }

    #[test]
    fn test_relink_moves_between_parents() {
        let (mut graph, nodes) = graph_with(3);
        graph.link(nodes[2], nodes[0]);

        // No explicit unlink needed
        graph.link(nodes[2], nodes[1]);

        assert_eq!(graph.children(nodes[0]).count(), 0);
        assert_eq!(graph.children(nodes[1]).collect::<Vec<_>>(), vec![nodes[2]]);
        assert_eq!(graph.parent(nodes[2]), nodes[1]);
        graph.validate().unwrap();
    }

    #[test]
    fn test_link_preserves_world_under_rotated_parent() {
        let (mut graph, nodes) = graph_with(2);
        graph.set_local_rotation(nodes[0], Quat::from_axis_angle(&Vec3::y_axis(), 1.2));
        graph.set_local_scale(nodes[1], Vec3::new(0.5, 2.0, 1.5));
        let before = graph.world_pose(nodes[1]);

        graph.link(nodes[1], nodes[0]);

        assert_relative_eq!(graph.world_pose(nodes[1]), before, epsilon = EPSILON);
        // Parent has unit scale, so the child keeps its own scale
        assert_relative_eq!(graph.local_scale(nodes[1]), Vec3::new(0.5, 2.0, 1.5), epsilon = EPSILON);
    }

    #[test]
    fn test_link_preserves_world_under_scaled_parent() {
        let (mut graph, nodes) = graph_with(2);
        graph.set_local_scale(nodes[0], Vec3::new(2.0, 2.0, 2.0));
        let before = graph.world_pose(nodes[1]);

        graph.link(nodes[1], nodes[0]);

        assert_relative_eq!(graph.world_pose(nodes[1]), before, epsilon = EPSILON);
        graph.validate_poses().unwrap();
    }

    #[test]
    fn test_link_under_singular_parent() {
        let (mut graph, nodes) = graph_with(2);
        graph.set_local_scale(nodes[0], Vec3::new(1.0, 0.0, 1.0));

        graph.link(nodes[1], nodes[0]);

        assert_eq!(graph.parent(nodes[1]), nodes[0]);
        assert!(graph.world_pose(nodes[1]).iter().all(|v| v.is_finite()));
    }

    #[test]
    #[should_panic(expected = "would create a cycle")]
    fn test_link_under_descendant_panics() {
        let (mut graph, nodes) = graph_with(3);
        graph.link(nodes[1], nodes[0]);
        graph.link(nodes[2], nodes[1]);

        graph.link(nodes[0], nodes[2]);
    }

    #[test]
    #[should_panic(expected = "would create a cycle")]
    fn test_link_to_self_panics() {
        let (mut graph, nodes) = graph_with(1);
        graph.link(nodes[0], nodes[0]);
    }

    #[test]
    fn test_is_ancestor() {
        let (mut graph, nodes) = graph_with(3);
        graph.link(nodes[1], nodes[0]);
        graph.link(nodes[2], nodes[1]);

        assert!(graph.is_ancestor(nodes[0], nodes[2]));
        assert!(graph.is_ancestor(nodes[1], nodes[2]));
        assert!(!graph.is_ancestor(nodes[2], nodes[0]));
        assert!(!graph.is_ancestor(nodes[2], nodes[2]));
    }

    #[test]
    fn test_rigid_inverse() {
        let m = math::compose(
            &Vec3::new(1.0, -2.0, 3.0),
            &math::basis_from_quat(&Quat::from_euler_angles(0.2, 0.4, -0.6)),
            &Vec3::new(1.0, 1.0, 1.0),
        );

        assert_relative_eq!(rigid_inverse(&m) * m, Mat4::identity(), epsilon = EPSILON);
    }
}
