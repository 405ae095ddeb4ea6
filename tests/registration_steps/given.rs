//! Given steps for curator registration BDD scenarios.

use super::world::{RegistrationWorld, capability_request};
use curator::route::services::RegisterRouteRequest;
use curator::service::services::RegisterServiceRequest;
use eyre::WrapErr;
use rstest_bdd_macros::given;

#[given("an empty curator")]
fn an_empty_curator(world: &mut RegistrationWorld) {
    world.curator.reset();
}

#[given(r#""{service}" has registered capability "{name}" in realm "{realm}""#)]
fn capability_registered(
    world: &mut RegistrationWorld,
    service: String,
    name: String,
    realm: String,
) -> Result<(), eyre::Report> {
    world
        .curator
        .register_capability_typed(capability_request(&service, &name, &realm)?)
        .wrap_err("register capability for scenario")?;
    Ok(())
}

#[given(r#""{service}" has registered route "{method}" "{path}""#)]
fn route_registered(
    world: &mut RegistrationWorld,
    service: String,
    method: String,
    path: String,
) -> Result<(), eyre::Report> {
    world
        .curator
        .register_route_typed(RegisterRouteRequest::new(
            path,
            method,
            "business_enablement",
            service,
        ))
        .wrap_err("register route for scenario")?;
    Ok(())
}

#[given(r#"service "{service}" is registered"#)]
fn service_registered(world: &mut RegistrationWorld, service: String) -> Result<(), eyre::Report> {
    world
        .curator
        .register_service_typed(RegisterServiceRequest::new(service))
        .wrap_err("register service for scenario")?;
    Ok(())
}
