// Holdaccent Key Type
// Represents a single physical key code from Linux input-event-codes.h

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// Represents a single keyboard key code.
///
/// This is a newtype wrapper around u16 for type safety.
/// The numeric values match Linux input-event-codes.h definitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Key(pub u16);

impl Key {
    pub const ESC: Key = Key(1);
    pub const ENTER: Key = Key(28);
    pub const LEFT_SHIFT: Key = Key(42);
    pub const RIGHT_SHIFT: Key = Key(54);
    pub const SPACE: Key = Key(57);
    pub const LEFT: Key = Key(105);
    pub const RIGHT: Key = Key(106);
    pub const UNKNOWN: Key = Key(240);

    /// Get the name of this key
    pub fn name(self) -> &'static str {
        key_name(self.0)
    }

    /// Physical key that produces `ch` on a US layout.
    ///
    /// Characters without a key of their own (anything outside printable
    /// ASCII) map to [`Key::UNKNOWN`].
    pub fn for_char(ch: char) -> Key {
        let lower = ch.to_ascii_lowercase();
        KEY_TABLE
            .iter()
            .find(|(_, _, base, shifted)| *base == Some(lower) || *shifted == Some(ch))
            .map(|(code, _, _, _)| Key(*code))
            .unwrap_or(Key::UNKNOWN)
    }
}

impl From<u16> for Key {
    fn from(code: u16) -> Self {
        Key(code)
    }
}

impl From<Key> for u16 {
    fn from(key: Key) -> Self {
        key.0
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Key {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        key_from_name(s).ok_or_else(|| format!("Unknown key: {}", s))
    }
}

// (code, name, unshifted char, shifted char)
const KEY_TABLE: &[(u16, &str, Option<char>, Option<char>)] = &[
    (1, "ESC", None, None),
    (2, "KEY_1", Some('1'), Some('!')),
    (3, "KEY_2", Some('2'), Some('@')),
    (4, "KEY_3", Some('3'), Some('#')),
    (5, "KEY_4", Some('4'), Some('$')),
    (6, "KEY_5", Some('5'), Some('%')),
    (7, "KEY_6", Some('6'), Some('^')),
    (8, "KEY_7", Some('7'), Some('&')),
    (9, "KEY_8", Some('8'), Some('*')),
    (10, "KEY_9", Some('9'), Some('(')),
    (11, "KEY_0", Some('0'), Some(')')),
    (12, "MINUS", Some('-'), Some('_')),
    (13, "EQUAL", Some('='), Some('+')),
    (14, "BACKSPACE", None, None),
    (15, "TAB", None, None),
    (16, "Q", Some('q'), None),
    (17, "W", Some('w'), None),
    (18, "E", Some('e'), None),
    (19, "R", Some('r'), None),
    (20, "T", Some('t'), None),
    (21, "Y", Some('y'), None),
    (22, "U", Some('u'), None),
    (23, "I", Some('i'), None),
    (24, "O", Some('o'), None),
    (25, "P", Some('p'), None),
    (26, "LEFT_BRACE", Some('['), Some('{')),
    (27, "RIGHT_BRACE", Some(']'), Some('}')),
    (28, "ENTER", None, None),
    (29, "LEFT_CTRL", None, None),
    (30, "A", Some('a'), None),
    (31, "S", Some('s'), None),
    (32, "D", Some('d'), None),
    (33, "F", Some('f'), None),
    (34, "G", Some('g'), None),
    (35, "H", Some('h'), None),
    (36, "J", Some('j'), None),
    (37, "K", Some('k'), None),
    (38, "L", Some('l'), None),
    (39, "SEMICOLON", Some(';'), Some(':')),
    (40, "APOSTROPHE", Some('\''), Some('"')),
    (41, "GRAVE", Some('`'), Some('~')),
    (42, "LEFT_SHIFT", None, None),
    (43, "BACKSLASH", Some('\\'), Some('|')),
    (44, "Z", Some('z'), None),
    (45, "X", Some('x'), None),
    (46, "C", Some('c'), None),
    (47, "V", Some('v'), None),
    (48, "B", Some('b'), None),
    (49, "N", Some('n'), None),
    (50, "M", Some('m'), None),
    (51, "COMMA", Some(','), Some('<')),
    (52, "DOT", Some('.'), Some('>')),
    (53, "SLASH", Some('/'), Some('?')),
    (54, "RIGHT_SHIFT", None, None),
    (56, "LEFT_ALT", None, None),
    (57, "SPACE", Some(' '), None),
    (58, "CAPSLOCK", None, None),
    (97, "RIGHT_CTRL", None, None),
    (100, "RIGHT_ALT", None, None),
    (102, "HOME", None, None),
    (103, "UP", None, None),
    (104, "PAGE_UP", None, None),
    (105, "LEFT", None, None),
    (106, "RIGHT", None, None),
    (107, "END", None, None),
    (108, "DOWN", None, None),
    (109, "PAGE_DOWN", None, None),
    (110, "INSERT", None, None),
    (111, "DELETE", None, None),
    (125, "LEFT_META", None, None),
    (126, "RIGHT_META", None, None),
    (240, "UNKNOWN", None, None),
];

/// Display name for a key code
pub fn key_name(code: u16) -> &'static str {
    static KEY_NAMES: OnceLock<Vec<&'static str>> = OnceLock::new();
    KEY_NAMES
        .get_or_init(|| {
            let mut names = vec!["UNKNOWN"; 0x100];
            names[0] = "RESERVED";
            for (code, name, _, _) in KEY_TABLE {
                names[*code as usize] = *name;
            }
            names
        })
        .get(code as usize)
        .copied()
        .unwrap_or("UNKNOWN")
}

/// Try to parse a key name to a key code
///
/// Accepts the canonical names plus a few aliases (`ESCAPE`, `SHIFT`,
/// `LEFT_ARROW`, `RIGHT_ARROW`, bare digits).
pub fn key_from_name(name: &str) -> Option<Key> {
    let name_upper = name.trim().to_uppercase();
    let alias = match name_upper.as_str() {
        "ESCAPE" => Some(1),
        "RETURN" => Some(28),
        "SHIFT" => Some(42),
        "CTRL" | "CONTROL" => Some(29),
        "ALT" => Some(56),
        "LEFT_ARROW" | "LEFTARROW" => Some(105),
        "RIGHT_ARROW" | "RIGHTARROW" => Some(106),
        _ => None,
    };
    if let Some(code) = alias {
        return Some(Key(code));
    }

    if name_upper.len() == 1 && name_upper.as_bytes()[0].is_ascii_digit() {
        return Some(Key::for_char(name_upper.as_bytes()[0] as char));
    }

    KEY_TABLE
        .iter()
        .find(|(_, n, _, _)| *n == name_upper)
        .map(|(code, _, _, _)| Key(*code))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_name() {
        assert_eq!(Key::SPACE.name(), "SPACE");
        assert_eq!(Key::LEFT.name(), "LEFT");
        assert_eq!(Key::from(30).name(), "A");
        assert_eq!(key_name(0x2ff), "UNKNOWN");
    }

    #[test]
    fn test_key_from_name() {
        assert_eq!(key_from_name("space"), Some(Key::SPACE));
        assert_eq!(key_from_name("Left"), Some(Key::LEFT));
        assert_eq!(key_from_name("right_arrow"), Some(Key::RIGHT));
        assert_eq!(key_from_name("shift"), Some(Key::LEFT_SHIFT));
        assert_eq!(key_from_name("7"), Some(Key::from(8)));
        assert_eq!(key_from_name("nonsense"), None);
        assert_eq!("A".parse::<Key>(), Ok(Key::from(30)));
    }

    #[test]
    fn test_key_for_char() {
        assert_eq!(Key::for_char('a'), Key::from(30));
        assert_eq!(Key::for_char('A'), Key::from(30));
        assert_eq!(Key::for_char(' '), Key::SPACE);
        assert_eq!(Key::for_char('?'), Key::from(53));
        assert_eq!(Key::for_char('ä'), Key::UNKNOWN);
    }
}
