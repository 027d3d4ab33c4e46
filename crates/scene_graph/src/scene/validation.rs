//! Consistency checks over the instance table, identity map and hierarchy

use thiserror::Error;

use crate::foundation::math::Mat4;

use super::instance::{TransformInstance, UnitId};
use super::scene_graph::SceneGraph;

/// Invariant violations found by [`SceneGraph::validate`] and
/// [`SceneGraph::validate_poses`]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneGraphError {
    /// Identity map and instance table disagree on the number of units
    #[error("Identity map holds {entries} units but the table holds {nodes} nodes")]
    MapSizeMismatch {
        /// Entries in the identity map
        entries: usize,
        /// Live slots in the instance table
        nodes: usize,
    },

    /// A slot's unit does not map back to that slot
    #[error("Unit {unit:?} in slot {instance} maps to {mapped}")]
    UnmappedSlot {
        /// Unit stored in the slot
        unit: UnitId,
        /// The slot
        instance: TransformInstance,
        /// Where the identity map points instead
        mapped: TransformInstance,
    },

    /// A hierarchy link points past the end of the table
    #[error("{link} link of {instance} points at {target}, outside the table")]
    LinkOutOfRange {
        /// Node holding the link
        instance: TransformInstance,
        /// Which link
        link: &'static str,
        /// Where it points
        target: TransformInstance,
    },

    /// A node in a parent's child list does not point back at that parent
    #[error("{child} is listed under {expected} but its parent is {actual}")]
    ParentMismatch {
        /// The child
        child: TransformInstance,
        /// Parent whose list contains the child
        expected: TransformInstance,
        /// Parent recorded on the child
        actual: TransformInstance,
    },

    /// `prev_sibling` does not mirror `next_sibling`
    #[error("Sibling list broken at {instance}: expected previous sibling {expected}, found {actual}")]
    BrokenSiblingLink {
        /// Node whose previous link is wrong
        instance: TransformInstance,
        /// Node that precedes it in the list
        expected: TransformInstance,
        /// Recorded previous sibling
        actual: TransformInstance,
    },

    /// A root carries sibling links
    #[error("Root {instance} has sibling links")]
    RootHasSiblings {
        /// The root
        instance: TransformInstance,
    },

    /// A node has a parent but is missing from its child list
    #[error("{instance} has parent {parent} but is not among its children")]
    OrphanedChild {
        /// The node
        instance: TransformInstance,
        /// Its recorded parent
        parent: TransformInstance,
    },

    /// Parent chain or sibling list loops
    #[error("Hierarchy cycle through {instance}")]
    Cycle {
        /// A node on the cycle
        instance: TransformInstance,
    },

    /// Cached world matrix differs from parent world times local pose
    #[error("World pose of {instance} is stale (max deviation {deviation})")]
    StaleWorldPose {
        /// The node
        instance: TransformInstance,
        /// Largest per-element difference
        deviation: f32,
    },
}

impl SceneGraph {
    /// Check the identity map and every hierarchy invariant
    pub fn validate(&self) -> Result<(), SceneGraphError> {
        let data = &self.data;
        let len = data.len();

        if self.map.len() != len {
            return Err(SceneGraphError::MapSizeMismatch {
                entries: self.map.len(),
                nodes: len,
            });
        }

        for index in 0..len {
            let instance = TransformInstance::from_index(index);
            let mapped = self.get(data.unit[index]);
            if mapped != instance {
                return Err(SceneGraphError::UnmappedSlot {
                    unit: data.unit[index],
                    instance,
                    mapped,
                });
            }

            let links = [
                ("parent", data.parent[index]),
                ("first_child", data.first_child[index]),
                ("next_sibling", data.next_sibling[index]),
                ("prev_sibling", data.prev_sibling[index]),
            ];
            for (link, target) in links {
                if target.is_valid() && target.index() >= len {
                    return Err(SceneGraphError::LinkOutOfRange {
                        instance,
                        link,
                        target,
                    });
                }
            }

            if !data.parent[index].is_valid()
                && (data.next_sibling[index].is_valid() || data.prev_sibling[index].is_valid())
            {
                return Err(SceneGraphError::RootHasSiblings { instance });
            }
        }

        let mut listed = vec![false; len];
        for index in 0..len {
            let parent = TransformInstance::from_index(index);
            let mut prev = TransformInstance::INVALID;
            let mut child = data.first_child[index];
            let mut steps = 0;

            while child.is_valid() {
                steps += 1;
                if steps > len {
                    return Err(SceneGraphError::Cycle { instance: child });
                }

                let c = child.index();
                if data.parent[c] != parent {
                    return Err(SceneGraphError::ParentMismatch {
                        child,
                        expected: parent,
                        actual: data.parent[c],
                    });
                }
                if data.prev_sibling[c] != prev {
                    return Err(SceneGraphError::BrokenSiblingLink {
                        instance: child,
                        expected: prev,
                        actual: data.prev_sibling[c],
                    });
                }

                listed[c] = true;
                prev = child;
                child = data.next_sibling[c];
            }
        }

        for index in 0..len {
            let instance = TransformInstance::from_index(index);
            let parent = data.parent[index];
            if parent.is_valid() && !listed[index] {
                return Err(SceneGraphError::OrphanedChild { instance, parent });
            }

            let mut node = parent;
            let mut depth = 0;
            while node.is_valid() {
                depth += 1;
                if depth > len {
                    return Err(SceneGraphError::Cycle { instance });
                }
                node = data.parent[node.index()];
            }
        }

        Ok(())
    }

    /// Check that every cached world matrix equals its recomposed value
    ///
    /// Uses the configured pose tolerance, scaled by the magnitude of the
    /// expected matrix. A node overwritten with
    /// [`set_world_pose`](Self::set_world_pose) is reported here until its
    /// local pose is next mutated.
    pub fn validate_poses(&self) -> Result<(), SceneGraphError> {
        let data = &self.data;

        for index in 0..data.len() {
            let parent = data.parent[index];
            let parent_world = if parent.is_valid() {
                data.world[parent.index()]
            } else {
                Mat4::identity()
            };

            let expected = parent_world * data.local[index].to_matrix();
            let deviation = (data.world[index] - expected).amax();
            if deviation > self.pose_tolerance * expected.amax().max(1.0) {
                return Err(SceneGraphError::StaleWorldPose {
                    instance: TransformInstance::from_index(index),
                    deviation,
                });
            }
        }

        Ok(())
    }
}
