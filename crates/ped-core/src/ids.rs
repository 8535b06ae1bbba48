//! Strongly typed, zero-cost identifier wrappers.
//!
//! Index-like IDs (`NodeId`, `AreaId`, `SpawnerId`, `LineId`) are plain
//! integers: they index into vectors that never shrink.  Agents are created
//! and destroyed all the time, so `AgentId` is a generational `slotmap` key
//! instead: a stale `AgentId` held by a scheduled continuation simply fails
//! to resolve once its agent is gone.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID".
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Index of a roadmap node (waypoint, door, waiting area, spawn or goal).
    pub struct NodeId(u32);
}

typed_id! {
    /// Index of a waiting area in the allocator's registry.
    pub struct AreaId(u32);
}

typed_id! {
    /// Index of a continuous spawner.
    pub struct SpawnerId(u32);
}

typed_id! {
    /// A train line.  Line ids start at 1; "no line" is `Option::None`.
    pub struct LineId(u8);
}

impl LineId {
    /// Map a raw line number to an optional line (`0` means "no line").
    pub fn from_raw(raw: u8) -> Option<LineId> {
        (raw != 0).then_some(LineId(raw))
    }

    /// The line served by the platform side containing plane coordinate `x`.
    ///
    /// The station is laid out with line 1 on the `x >= 0` side and line 2 on
    /// the `x < 0` side.  Waiting-area scoring and the yellow-line buffer
    /// both rely on this convention.
    #[inline]
    pub fn for_side(x: f32) -> LineId {
        if x >= 0.0 { LineId(1) } else { LineId(2) }
    }
}

slotmap::new_key_type! {
    /// Generational handle of a live agent.
    pub struct AgentId;
}
