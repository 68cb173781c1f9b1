//! Transient entity handles
//!
//! The host refers to live entities (bots in particular) by a 32-bit handle
//! combining an entity index with a serial number. The serial changes when the
//! slot is recycled, so a handle goes stale on respawn or reconnect while the
//! bot's display name survives.
//!
//! # Handle Format
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                           u32 raw value                          │
//! ├─────────────────────────────┬───────────────────────────────────┤
//! │    Serial Number (17 bits)  │      Entity Index (15 bits)       │
//! │         bits 15-31          │           bits 0-14               │
//! └─────────────────────────────┴───────────────────────────────────┘
//! ```

use std::fmt;

/// Maximum entity index bits (15 bits = 32768 entities)
pub const MAX_EDICT_BITS: u32 = 15;

/// Maximum number of entities
pub const MAX_EDICTS: u32 = 1 << MAX_EDICT_BITS;

/// Invalid handle sentinel value
pub const INVALID_EHANDLE_INDEX: u32 = 0xFFFFFFFF;

const INDEX_MASK: u32 = MAX_EDICTS - 1;

/// Handle to a live entity owned by the host
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityHandle(u32);

impl EntityHandle {
    /// Create a handle from its raw value
    #[inline]
    pub const fn from_raw(value: u32) -> Self {
        Self(value)
    }

    /// Create the invalid sentinel handle
    #[inline]
    pub const fn invalid() -> Self {
        Self(INVALID_EHANDLE_INDEX)
    }

    /// Raw 32-bit value
    #[inline]
    pub const fn raw(&self) -> u32 {
        self.0
    }

    /// Entity index (lower 15 bits)
    #[inline]
    pub const fn index(&self) -> u32 {
        self.0 & INDEX_MASK
    }

    /// Serial number (upper 17 bits)
    #[inline]
    pub const fn serial(&self) -> u32 {
        self.0 >> MAX_EDICT_BITS
    }

    /// Whether this is not the invalid sentinel
    ///
    /// A well-formed handle can still be stale; only the host can tell.
    #[inline]
    pub const fn is_valid(&self) -> bool {
        self.index() != INDEX_MASK
    }
}

impl Default for EntityHandle {
    fn default() -> Self {
        Self::invalid()
    }
}

impl fmt::Debug for EntityHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(
                f,
                "EntityHandle(index={}, serial={})",
                self.index(),
                self.serial()
            )
        } else {
            write!(f, "EntityHandle(invalid)")
        }
    }
}

impl fmt::Display for EntityHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "{}:{}", self.index(), self.serial())
        } else {
            write!(f, "invalid")
        }
    }
}
