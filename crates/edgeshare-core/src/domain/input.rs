//! Platform-independent input identifiers.
//!
//! A key event carries two identities:
//!
//! - [`KeyId`] – *what* the key means (a platform-independent symbol), used by
//!   the receiver to synthesize the right character.
//! - [`KeyButton`] – *which physical key* produced it.  Repeats and releases are
//!   matched to their press by button, never by symbol, because the symbol can
//!   change while the key is held (e.g. Shift pressed in between).

use serde::{Deserialize, Serialize};

/// Platform-independent key symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyId(pub u32);

/// Physical key code used to pair a key-down with its repeats and key-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyButton(pub u16);

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ButtonId {
    Left,
    Middle,
    Right,
    /// Additional buttons (4 = back, 5 = forward, ...).
    Extra(u8),
}

/// Bitmask of active modifier keys and toggle locks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModifierMask(pub u16);

impl ModifierMask {
    pub const NONE: ModifierMask = ModifierMask(0);
    pub const SHIFT: ModifierMask = ModifierMask(1 << 0);
    pub const CONTROL: ModifierMask = ModifierMask(1 << 1);
    pub const ALT: ModifierMask = ModifierMask(1 << 2);
    pub const META: ModifierMask = ModifierMask(1 << 3);
    pub const SUPER: ModifierMask = ModifierMask(1 << 4);
    pub const ALT_GR: ModifierMask = ModifierMask(1 << 5);
    pub const CAPS_LOCK: ModifierMask = ModifierMask(1 << 12);
    pub const NUM_LOCK: ModifierMask = ModifierMask(1 << 13);
    pub const SCROLL_LOCK: ModifierMask = ModifierMask(1 << 14);

    /// All toggle-lock bits.
    pub const TOGGLES: ModifierMask =
        ModifierMask(Self::CAPS_LOCK.0 | Self::NUM_LOCK.0 | Self::SCROLL_LOCK.0);

    /// Returns `true` if every bit of `other` is set in `self`.
    pub fn contains(self, other: ModifierMask) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns only the toggle-lock bits (caps, num, scroll).
    pub fn toggles(self) -> ModifierMask {
        ModifierMask(self.0 & Self::TOGGLES.0)
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl std::ops::BitOr for ModifierMask {
    type Output = ModifierMask;

    fn bitor(self, rhs: ModifierMask) -> ModifierMask {
        ModifierMask(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for ModifierMask {
    fn bitor_assign(&mut self, rhs: ModifierMask) {
        self.0 |= rhs.0;
    }
}

/// Identifier of a screen option.
///
/// The set of recognised ids belongs to the configuration subsystem; the core
/// only forwards them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OptionId(pub u32);

/// One option setting pushed to every screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenOption {
    pub id: OptionId,
    pub value: i32,
}

/// An ordered list of option settings.
pub type OptionsList = Vec<ScreenOption>;
