//! Unit identifiers and transform instance handles

use std::fmt;

slotmap::new_key_type! {
    /// Identity of the object a transform belongs to
    ///
    /// Minted and owned by the world's identity system (typically a
    /// `SlotMap<UnitId, _>`). The scene graph only uses it as a lookup key.
    pub struct UnitId;
}

/// Handle to one slot of the instance table
///
/// A plain index, so it stays meaningful when the table grows. It is
/// invalidated by [`SceneGraph::destroy`](super::SceneGraph::destroy) of the
/// same slot, which recycles the slot for another unit.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransformInstance(u32);

impl TransformInstance {
    /// The "no instance" sentinel
    pub const INVALID: Self = Self(u32::MAX);

    pub(super) const fn from_index(index: usize) -> Self {
        Self(index as u32)
    }

    /// Whether this handle refers to a slot at all
    ///
    /// A valid handle can still be stale if its slot was destroyed.
    pub const fn is_valid(self) -> bool {
        self.0 != u32::MAX
    }

    /// Slot index in the instance table
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// `None` for the sentinel
    pub const fn to_option(self) -> Option<Self> {
        if self.is_valid() {
            Some(self)
        } else {
            None
        }
    }
}

impl Default for TransformInstance {
    fn default() -> Self {
        Self::INVALID
    }
}

impl fmt::Debug for TransformInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "TransformInstance({})", self.0)
        } else {
            f.write_str("TransformInstance(INVALID)")
        }
    }
}

impl fmt::Display for TransformInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "#{}", self.0)
        } else {
            f.write_str("#invalid")
        }
    }
}
