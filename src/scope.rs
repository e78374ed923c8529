//! Audit scope: which slice of the provider account a run looks at.

use serde::{Deserialize, Serialize};

/// Opaque addressing information passed through to the provider client.
/// The engine never interprets these fields; it only threads them to every
/// collector so a run is scoped consistently.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scope {
    pub region: Option<String>,
    pub profile: Option<String>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }
}
