//! Simulation mode.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How outcomes are weighted across a simulation's branches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    /// Outcomes weighted by real-world probability data.
    #[default]
    #[serde(rename = "realistic")]
    Realistic,
    /// Positive and negative outcomes weighted equally.
    #[serde(rename = "50/50")]
    FiftyFifty,
    /// Surprising and improbable outcomes allowed.
    #[serde(rename = "random")]
    Random,
}

impl Mode {
    /// Canonical string form, matching the serialized representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Realistic => "realistic",
            Mode::FiftyFifty => "50/50",
            Mode::Random => "random",
        }
    }

    /// Parse a mode string leniently: anything unrecognized is treated as
    /// `Realistic` rather than rejected, so untrusted mode inputs can never
    /// fail validation.
    pub fn parse(s: &str) -> Mode {
        match s {
            "50/50" => Mode::FiftyFifty,
            "random" => Mode::Random,
            _ => Mode::Realistic,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Mode::parse(s))
    }
}
