//! Given steps for tiered access BDD scenarios.

use super::world::{AccessWorld, rejecting, three_pages, unreachable_dependency};
use curator::realm::Realm;
use rstest_bdd_macros::given;

#[given("a resolver with no capabilities")]
fn resolver_without_capabilities(world: &mut AccessWorld) {
    world.curator.reset();
}

#[given(r#"a resolver with "{capability}" served over soa_api by "{service}""#)]
fn capability_served_over_soa(
    world: &mut AccessWorld,
    capability: String,
    service: String,
) -> Result<(), eyre::Report> {
    world.serve_over_soa(&service, &capability, three_pages())
}

#[given(r#"a resolver with "{capability}" failing over soa_api with code "{code}""#)]
fn capability_failing_over_soa(
    world: &mut AccessWorld,
    capability: String,
    code: String,
) -> Result<(), eyre::Report> {
    world.serve_over_soa("FileParser", &capability, rejecting(code))
}

#[given(r#"the orchestrator holds an unavailable enabling service for "{capability}""#)]
fn unavailable_enabling_service(world: &mut AccessWorld, capability: String) {
    world
        .enabling_services
        .push((capability, unreachable_dependency()));
}

#[given(r#"the gateway grants "{capability}""#)]
fn gateway_grants(world: &mut AccessWorld, capability: String) {
    for realm in Realm::ALL {
        world.gateway.grant(realm, capability.as_str(), three_pages());
    }
}
