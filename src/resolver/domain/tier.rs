//! Caller roles and the access tiers each role walks through.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Role of the component invoking a capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallerRole {
    /// Orchestrator that may hold direct references to enabling services.
    Orchestrator,
    /// Enabling service calling a peer capability.
    EnablingService,
}

impl CallerRole {
    /// Returns the canonical representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Orchestrator => "orchestrator",
            Self::EnablingService => "enabling_service",
        }
    }

    /// Returns the ordered tiers tried for this role.
    ///
    /// The in-process enabling-service tier only applies to orchestrators
    /// and is skipped when `enabling_service_tier` is off.
    #[must_use]
    pub fn chain(self, enabling_service_tier: bool) -> Vec<AccessTier> {
        let direct = matches!(self, Self::Orchestrator) && enabling_service_tier;
        direct
            .then_some(AccessTier::EnablingService)
            .into_iter()
            .chain([AccessTier::SoaApi, AccessTier::Gateway])
            .collect()
    }
}

impl fmt::Display for CallerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One link in a fallback chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessTier {
    /// Direct in-process call on an enabling service held by the caller.
    EnablingService,
    /// Handler behind a registered `soa_api` contract.
    SoaApi,
    /// Realm-scoped lookup through the access gateway.
    Gateway,
}

impl AccessTier {
    /// Returns the canonical representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EnablingService => "enabling_service",
            Self::SoaApi => "soa_api",
            Self::Gateway => "gateway",
        }
    }
}

impl fmt::Display for AccessTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered list of tiers tried during one invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TierTrail(Vec<AccessTier>);

impl TierTrail {
    /// Creates a trail from tiers in the order they were tried.
    #[must_use]
    pub const fn new(tiers: Vec<AccessTier>) -> Self {
        Self(tiers)
    }

    /// Returns the number of tiers tried.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether no tier was tried.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the tiers in order.
    #[must_use]
    pub fn tiers(&self) -> &[AccessTier] {
        &self.0
    }
}

impl fmt::Display for TierTrail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tiers = self.0.iter();
        if let Some(first) = tiers.next() {
            write!(f, "{first}")?;
        }
        for tier in tiers {
            write!(f, " -> {tier}")?;
        }
        Ok(())
    }
}

impl FromIterator<AccessTier> for TierTrail {
    fn from_iter<I: IntoIterator<Item = AccessTier>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
