// Holdaccent Leader Keys
// Which physical keys confirm a pending substitution

use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

use crate::Key;

/// The key (or keys) that, pressed while a substitution is pending,
/// commit the substitute instead of the literal character.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, EnumIter, AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum LeaderKey {
    #[default]
    Space,
    LeftArrow,
    RightArrow,
    SpaceOrLeft,
    SpaceOrRight,
    LeftOrRight,
    All,
}

impl LeaderKey {
    /// Parse a persisted leader value, falling back to [`LeaderKey::Space`]
    /// for anything unrecognized.
    pub fn parse_or_default(value: &str) -> Self {
        match value.trim().parse::<LeaderKey>() {
            Ok(leader) => leader,
            Err(_) => {
                log::warn!("Unknown LeaderKey '{}', falling back to Space", value);
                LeaderKey::Space
            }
        }
    }

    /// Check whether `key` is one of the keys this leader accepts
    pub fn matches(self, key: Key) -> bool {
        let space = key == Key::SPACE;
        let left = key == Key::LEFT;
        let right = key == Key::RIGHT;

        match self {
            LeaderKey::Space => space,
            LeaderKey::LeftArrow => left,
            LeaderKey::RightArrow => right,
            LeaderKey::SpaceOrLeft => space || left,
            LeaderKey::SpaceOrRight => space || right,
            LeaderKey::LeftOrRight => left || right,
            LeaderKey::All => space || left || right,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_leader_matches() {
        assert!(LeaderKey::Space.matches(Key::SPACE));
        assert!(!LeaderKey::Space.matches(Key::LEFT));

        assert!(LeaderKey::LeftOrRight.matches(Key::LEFT));
        assert!(LeaderKey::LeftOrRight.matches(Key::RIGHT));
        assert!(!LeaderKey::LeftOrRight.matches(Key::SPACE));

        assert!(LeaderKey::SpaceOrRight.matches(Key::RIGHT));
        assert!(!LeaderKey::SpaceOrRight.matches(Key::LEFT));
    }

    #[test]
    fn test_all_matches_every_leader_and_nothing_else() {
        for key in [Key::SPACE, Key::LEFT, Key::RIGHT] {
            assert!(LeaderKey::All.matches(key));
        }
        assert!(!LeaderKey::All.matches(Key::from(30)));
        assert!(!LeaderKey::All.matches(Key::ENTER));
    }

    #[test]
    fn test_leader_round_trips_through_display() {
        for leader in LeaderKey::iter() {
            assert_eq!(leader.to_string().parse::<LeaderKey>(), Ok(leader));
        }
    }

    #[test]
    fn test_parse_or_default() {
        assert_eq!(LeaderKey::parse_or_default("leftorright"), LeaderKey::LeftOrRight);
        assert_eq!(LeaderKey::parse_or_default(" All "), LeaderKey::All);
        assert_eq!(LeaderKey::parse_or_default("Enter"), LeaderKey::Space);
        assert_eq!(LeaderKey::parse_or_default(""), LeaderKey::Space);
    }
}
