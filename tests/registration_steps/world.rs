//! Shared world state for curator registration BDD scenarios.

use curator::capability::domain::{CapabilityContracts, HandlerRef, RestApiContract, SoaApiContract};
use curator::capability::services::RegisterCapabilityRequest;
use curator::curator::Curator;
use curator::envelope::ResponseEnvelope;
use rstest::fixture;

/// Scenario world for registration behaviour tests.
pub struct RegistrationWorld {
    /// The facade under test.
    pub curator: Curator,
    /// Envelope returned by the last registration.
    pub last_envelope: Option<ResponseEnvelope>,
}

impl RegistrationWorld {
    /// Creates a world around an empty in-memory curator.
    #[must_use]
    pub fn new() -> Self {
        Self {
            curator: Curator::in_memory(),
            last_envelope: None,
        }
    }

    /// Returns the last registration envelope.
    pub fn last_envelope(&self) -> Result<&ResponseEnvelope, eyre::Report> {
        self.last_envelope
            .as_ref()
            .ok_or_else(|| eyre::eyre!("no registration recorded in scenario world"))
    }
}

impl Default for RegistrationWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> RegistrationWorld {
    RegistrationWorld::default()
}

/// Builds a capability request exposing `name` over `soa_api` and a public
/// `rest_api` endpoint.
pub fn capability_request(
    service: &str,
    name: &str,
    realm: &str,
) -> Result<RegisterCapabilityRequest, eyre::Report> {
    let handler = HandlerRef::new(format!("{service}.{name}"))?;
    let contracts = CapabilityContracts::new()
        .with_soa_api(SoaApiContract::new(
            name,
            format!("/soa/{name}"),
            "POST",
            handler,
        )?)
        .with_rest_api(RestApiContract::new(format!("/api/v1/{name}"), "POST")?);
    Ok(RegisterCapabilityRequest::new(service, name, realm, contracts)
        .with_description(format!("{name} exposed by {service}")))
}
