use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Feature-flag level gating which commands a registry exposes.
///
/// Tiers are totally ordered: `Legacy < Beta < Stable`. A command tagged with
/// a minimum tier is reachable from any registry configured at that tier or
/// above, so raising the configured tier only ever reveals commands.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum AccessTier {
    /// Flat commands available in every build.
    Legacy,
    /// Commands with subcommands.
    #[default]
    Beta,
    /// Fully tested commands.
    Stable,
}

impl AccessTier {
    pub const ALL: [AccessTier; 3] = [AccessTier::Legacy, AccessTier::Beta, AccessTier::Stable];

    /// Returns true when a command requiring `required` is visible to a
    /// registry configured at `self`.
    pub fn allows(self, required: AccessTier) -> bool {
        required <= self
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AccessTier::Legacy => "legacy",
            AccessTier::Beta => "beta",
            AccessTier::Stable => "stable",
        }
    }
}

impl fmt::Display for AccessTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccessTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "legacy" => Ok(AccessTier::Legacy),
            "beta" => Ok(AccessTier::Beta),
            "stable" => Ok(AccessTier::Stable),
            other => Err(format!(
                "unknown access tier '{other}' (expected legacy, beta, or stable)"
            )),
        }
    }
}
