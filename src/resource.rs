//! JSON API sub-resources.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

/// A read-only sub-resource of the device's JSON API.
///
/// `Display` gives the path segment appended to the client endpoint.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    /// Device information (`/json/info`).
    #[strum(serialize = "info")]
    Info,
    /// Current light state (`/json/state`).
    #[strum(serialize = "state")]
    State,
    /// Stored presets (`/json/presets`).
    #[strum(serialize = "presets")]
    Presets,
    /// Device configuration (`/json/cfg`).
    #[strum(serialize = "cfg")]
    #[serde(rename = "cfg")]
    Config,
}

impl Resource {
    /// Full URL of this resource below `endpoint`.
    pub fn url(&self, endpoint: &str) -> String {
        format!("{endpoint}/{self}")
    }
}
