use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the two competing teams. Immutable once assigned to an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Team {
    /// The team whose base sits on the left (west) edge of the field.
    A,
    /// The team whose base sits on the right (east) edge of the field.
    B,
}

impl Team {
    /// Both teams, in roster order.
    pub const ALL: [Team; 2] = [Team::A, Team::B];

    /// The opposing team.
    pub fn opponent(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }

    /// Position of this team in [`Team::ALL`], for per-team arrays.
    pub fn index(self) -> usize {
        match self {
            Self::A => 0,
            Self::B => 1,
        }
    }

    /// Parse a team name; accepts `a`/`b` as well as the `blue`/`red` aliases.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "a" | "blue" => Some(Self::A),
            "b" | "red" => Some(Self::B),
            _ => None,
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A => write!(f, "team A"),
            Self::B => write!(f, "team B"),
        }
    }
}
