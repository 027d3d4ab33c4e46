//! # Scene Graph
//!
//! A data-oriented hierarchical transform store for a simulated world.
//!
//! ## Features
//!
//! - **Structure-of-arrays storage**: one slot per positioned unit, indexed by
//!   plain integer handles that survive table growth
//! - **Hierarchy**: parent/child/sibling links with world-space preserving
//!   re-parenting
//! - **Eager propagation**: every local mutation recomputes the affected
//!   subtree's world matrices before returning
//! - **Change feed**: per-slot dirty flags drained once per frame by
//!   rendering, audio or physics consumers
//!
//! ## Quick Start
//!
//! ```rust
//! use scene_graph::prelude::*;
//! use slotmap::SlotMap;
//!
//! let mut units: SlotMap<UnitId, ()> = SlotMap::with_key();
//! let mut graph = SceneGraph::new();
//!
//! let root = graph.create(units.insert(()), &Mat4::identity());
//! let arm = graph.create_trs(
//!     units.insert(()),
//!     Vec3::new(1.0, 0.0, 0.0),
//!     Quat::identity(),
//!     Vec3::new(1.0, 1.0, 1.0),
//! );
//! graph.link(arm, root);
//! graph.set_local_position(root, Vec3::new(0.0, 5.0, 0.0));
//!
//! assert!((graph.world_position(arm) - Vec3::new(1.0, 5.0, 0.0)).norm() < 1e-5);
//!
//! let mut changed_units = Vec::new();
//! let mut world_poses = Vec::new();
//! graph.get_changed(&mut changed_units, &mut world_poses);
//! graph.clear_changed();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names)]

pub mod foundation;
pub mod config;
pub mod scene;

/// Common imports for scene graph users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, SceneGraphConfig},
        foundation::math::{Mat3, Mat4, Quat, Vec3},
        scene::{Pose, SceneGraph, SceneGraphError, TransformInstance, UnitId},
    };
}
