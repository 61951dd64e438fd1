use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::domain::DomainError;

/// Starting health for every seat in a match.
pub const STARTING_HEALTH: i32 = 100;

/// One of the four targetable body locations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Part {
    Head,
    Chest,
    Groin,
    Legs,
}

impl Part {
    pub const ALL: [Part; 4] = [Part::Head, Part::Chest, Part::Groin, Part::Legs];

    /// Base damage dealt by an unblocked attack on this part.
    pub const fn damage(self) -> u32 {
        match self {
            Part::Head => 30,
            Part::Chest => 20,
            Part::Groin => 25,
            Part::Legs => 15,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Part::Head => "head",
            Part::Chest => "chest",
            Part::Groin => "groin",
            Part::Legs => "legs",
        }
    }
}

impl fmt::Display for Part {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Part {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "head" => Ok(Part::Head),
            "chest" => Ok(Part::Chest),
            "groin" => Ok(Part::Groin),
            "legs" => Ok(Part::Legs),
            other => Err(DomainError::InvalidPart(other.to_string())),
        }
    }
}

/// A committed choice for one round: where to strike and what to cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Action {
    pub attack: Part,
    pub block: Part,
}

impl Action {
    pub fn new(attack: Part, block: Part) -> Self {
        Self { attack, block }
    }

    /// Parse raw client strings; both must name a known part.
    pub fn parse(attack: &str, block: &str) -> Result<Self, DomainError> {
        Ok(Self {
            attack: attack.parse()?,
            block: block.parse()?,
        })
    }
}
