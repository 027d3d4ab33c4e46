//! Scenario tests exercising the graph the way a world and its per-frame
//! consumers drive it


use slotmap::SlotMap;

use crate::foundation::math::Mat4;
use crate::scene::{SceneGraph, TransformInstance, UnitId};

/// Identity system stand-in minting unit ids
pub(super) struct Units(SlotMap<UnitId, ()>);

impl Units {
    pub fn new() -> Self {
        Self(SlotMap::with_key())
    }

    pub fn mint(&mut self) -> UnitId {
        self.0.insert(())
    }
}

pub(super) fn spawn(graph: &mut SceneGraph, units: &mut Units, pose: &Mat4) -> TransformInstance {
    graph.create(units.mint(), pose)
}
