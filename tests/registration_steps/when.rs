//! When steps for curator registration BDD scenarios.

use super::world::{RegistrationWorld, capability_request};
use curator::agent::services::RegisterAgentRequest;
use curator::capability::domain::CapabilityContracts;
use curator::capability::services::RegisterCapabilityRequest;
use curator::route::services::RegisterRouteRequest;
use rstest_bdd_macros::when;

#[when(r#""{service}" registers capability "{name}" in realm "{realm}""#)]
fn register_capability(
    world: &mut RegistrationWorld,
    service: String,
    name: String,
    realm: String,
) -> Result<(), eyre::Report> {
    let request = capability_request(&service, &name, &realm)?;
    world.last_envelope = Some(world.curator.register_capability(request));
    Ok(())
}

#[when(r#""{service}" registers capability "{name}" in realm "{realm}" without contracts"#)]
fn register_capability_without_contracts(
    world: &mut RegistrationWorld,
    service: String,
    name: String,
    realm: String,
) {
    let request =
        RegisterCapabilityRequest::new(service, name, realm, CapabilityContracts::new());
    world.last_envelope = Some(world.curator.register_capability(request));
}

#[when(r#""{service}" registers route "{method}" "{path}""#)]
fn register_route(world: &mut RegistrationWorld, service: String, method: String, path: String) {
    let request = RegisterRouteRequest::new(path, method, "business_enablement", service);
    world.last_envelope = Some(world.curator.register_route(request));
}

#[when(r#"agent "{agent_id}" registers without capabilities"#)]
fn register_agent_without_capabilities(world: &mut RegistrationWorld, agent_id: String) {
    let request = RegisterAgentRequest::new(
        agent_id.as_str(),
        "Insights Agent",
        "solution",
        Vec::<String>::new(),
    );
    world.last_envelope = Some(world.curator.register_agent(request));
}

#[when(r#"service "{service}" is unregistered"#)]
fn unregister_service(world: &mut RegistrationWorld, service: String) {
    world.last_envelope = Some(world.curator.unregister_service(&service));
}
