//! Hierarchical transform store
//!
//! Maintains local and world poses for every positioned unit in a world,
//! supports re-parenting that preserves world-space placement, and exposes a
//! per-frame change feed.
//!
//! ## Architecture
//!
//! ```text
//! Identity Map (UnitId -> slot)
//!      ↓
//! Instance Table (structure of arrays, swap-remove)
//!      ↓
//! Hierarchy (parent / first child / sibling links)
//!      ↓
//! Pose propagation (world = parent_world * local)
//!      ↓
//! Change feed (drained once per frame)
//! ```
//!
//! All mutation is single-threaded and eager: when a mutating call returns,
//! every world matrix in the affected subtree is already up to date.

mod instance;
mod pose;
mod instance_table;
mod scene_graph;
mod hierarchy;
mod propagation;
mod changes;
mod validation;

#[cfg(test)]
mod tests;

pub use instance::{TransformInstance, UnitId};
pub use pose::Pose;
pub use scene_graph::SceneGraph;
pub use hierarchy::Children;
pub use changes::ChangedIter;
pub use validation::SceneGraphError;
