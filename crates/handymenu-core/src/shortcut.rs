//! Key-chord values bound to collections.
//!
//! A [`Shortcut`] is compared by exact key-code and modifier-mask equality.
//! Display strings are for humans only and never take part in identity.

use std::fmt;
use std::ops::BitOr;

use serde::{Deserialize, Serialize};

/// Modifier-key bitmask, using the host's device-independent flag layout.
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Modifiers(u32);

impl Modifiers {
    /// No modifier held.
    pub const NONE: Self = Self(0);
    /// Caps Lock.
    pub const CAPS_LOCK: Self = Self(1 << 16);
    /// Shift.
    pub const SHIFT: Self = Self(1 << 17);
    /// Control.
    pub const CONTROL: Self = Self(1 << 18);
    /// Option / Alt.
    pub const OPTION: Self = Self(1 << 19);
    /// Command.
    pub const COMMAND: Self = Self(1 << 20);
    /// Function key.
    pub const FUNCTION: Self = Self(1 << 23);

    /// Bits that identify a modifier regardless of which physical key
    /// (left or right) produced it. The low 16 bits are device-dependent.
    pub const DEVICE_INDEPENDENT_MASK: u32 = 0xFFFF_0000;

    /// Wrap a raw modifier word without normalising it.
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// The raw modifier word.
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Drop the device-dependent bits.
    #[must_use]
    pub const fn normalized(self) -> Self {
        Self(self.0 & Self::DEVICE_INDEPENDENT_MASK)
    }

    /// Whether every bit of `other` is set in `self`.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Whether no modifier bit is set.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for Modifiers {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl fmt::Display for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [(Modifiers, &str); 6] = [
            (Modifiers::FUNCTION, "fn"),
            (Modifiers::CONTROL, "ctrl"),
            (Modifiers::OPTION, "opt"),
            (Modifiers::SHIFT, "shift"),
            (Modifiers::CAPS_LOCK, "caps"),
            (Modifiers::COMMAND, "cmd"),
        ];
        let names: Vec<&str> = NAMES
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect();
        f.write_str(&names.join("+"))
    }
}

/// A key chord: virtual key code plus modifier mask.
///
/// The mask is always normalised, whether the value comes from a key event
/// or from persisted bytes.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawShortcut")]
pub struct Shortcut {
    key_code: u16,
    modifiers: Modifiers,
}

/// Wire form of a shortcut before normalisation.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawShortcut {
    key_code: u16,
    modifiers: Modifiers,
}

impl From<RawShortcut> for Shortcut {
    fn from(raw: RawShortcut) -> Self {
        Self::new(raw.key_code, raw.modifiers)
    }
}

impl Shortcut {
    /// Build a shortcut from an incoming key event, normalising the
    /// modifier mask so left/right variants of a modifier compare equal.
    pub fn new(key_code: u16, modifiers: Modifiers) -> Self {
        Self {
            key_code,
            modifiers: modifiers.normalized(),
        }
    }

    /// Host virtual key code.
    pub const fn key_code(self) -> u16 {
        self.key_code
    }

    /// Normalised modifier mask.
    pub const fn modifiers(self) -> Modifiers {
        self.modifiers
    }
}

impl fmt::Display for Shortcut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.is_empty() {
            write!(f, "key{}", self.key_code)
        } else {
            write!(f, "{}+key{}", self.modifiers, self.key_code)
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_strips_device_dependent_bits() {
        // 0x08 is the left-command device bit
        let raw = Modifiers::from_bits(Modifiers::COMMAND.bits() | 0x08);
        let shortcut = Shortcut::new(18, raw);
        assert_eq!(shortcut.modifiers, Modifiers::COMMAND);
        assert_eq!(shortcut, Shortcut::new(18, Modifiers::COMMAND));
    }

    #[test]
    fn equality_is_exact_on_key_and_mask() {
        let cmd_1 = Shortcut::new(18, Modifiers::COMMAND);
        let cmd_shift_1 = Shortcut::new(18, Modifiers::COMMAND | Modifiers::SHIFT);
        let cmd_2 = Shortcut::new(19, Modifiers::COMMAND);
        assert_ne!(cmd_1, cmd_shift_1);
        assert_ne!(cmd_1, cmd_2);
    }

    #[test]
    fn display_lists_modifiers_in_host_order() {
        let s = Shortcut::new(18, Modifiers::COMMAND | Modifiers::SHIFT | Modifiers::CONTROL);
        assert_eq!(s.to_string(), "ctrl+shift+cmd+key18");
        assert_eq!(Shortcut::new(53, Modifiers::NONE).to_string(), "key53");
    }

    #[test]
    fn wire_format_is_key_code_and_integer_mask() {
        let s = Shortcut::new(18, Modifiers::COMMAND);
        let json = serde_json::to_value(s).unwrap();
        assert_eq!(json, serde_json::json!({"keyCode": 18, "modifiers": 1_048_576}));
        let back: Shortcut = serde_json::from_value(json).unwrap();
        assert_eq!(back, s);
    }

    #[test]
    fn decoding_strips_device_dependent_bits() {
        let json = serde_json::json!({"keyCode": 18, "modifiers": 1_048_584});
        let decoded: Shortcut = serde_json::from_value(json).unwrap();
        assert_eq!(decoded.modifiers(), Modifiers::COMMAND);
        assert_eq!(decoded, Shortcut::new(18, Modifiers::COMMAND));
    }

    #[test]
    fn contains_checks_all_bits() {
        let m = Modifiers::COMMAND | Modifiers::OPTION;
        assert!(m.contains(Modifiers::COMMAND));
        assert!(m.contains(Modifiers::COMMAND | Modifiers::OPTION));
        assert!(!m.contains(Modifiers::SHIFT));
        assert!(Modifiers::NONE.is_empty());
    }
}
