//! Then steps for curator registration BDD scenarios.

use super::world::RegistrationWorld;
use curator::realm::Realm;
use curator::route::domain::HttpMethod;
use curator::route::services::RouteFilter;
use rstest_bdd_macros::then;

#[then("the registration succeeds")]
fn registration_succeeds(world: &RegistrationWorld) -> Result<(), eyre::Report> {
    let envelope = world.last_envelope()?;
    if !envelope.success() {
        return Err(eyre::eyre!("expected success, got {envelope:?}"));
    }
    Ok(())
}

#[then(r#"the registration fails with code "{code}""#)]
fn registration_fails_with(world: &RegistrationWorld, code: String) -> Result<(), eyre::Report> {
    let envelope = world.last_envelope()?;
    if envelope.success() || envelope.error_code() != Some(code.as_str()) {
        return Err(eyre::eyre!("expected failure with {code}, got {envelope:?}"));
    }
    Ok(())
}

#[then(r#"discovering "{query}" in realm "{realm}" returns only "{name}""#)]
fn discovery_returns_only(
    world: &RegistrationWorld,
    query: String,
    realm: String,
    name: String,
) -> Result<(), eyre::Report> {
    let found = world
        .curator
        .discover_capabilities(realm.parse::<Realm>()?, &query);
    let names: Vec<&str> = found
        .iter()
        .map(|record| record.capability_name().as_str())
        .collect();
    if names != [name.as_str()] {
        return Err(eyre::eyre!("expected only '{name}', discovered {names:?}"));
    }
    Ok(())
}

#[then(r#"discovering "{query}" in realm "{realm}" returns {count:usize} capabilities"#)]
fn discovery_returns_count(
    world: &RegistrationWorld,
    query: String,
    realm: String,
    count: usize,
) -> Result<(), eyre::Report> {
    let found = world
        .curator
        .discover_capabilities(realm.parse::<Realm>()?, &query);
    if found.len() != count {
        return Err(eyre::eyre!(
            "expected {count} capabilities, discovered {}",
            found.len()
        ));
    }
    Ok(())
}

#[then(
    r#"capability "{name}" in realm "{realm}" owned by "{service}" is at version {version:u64}"#
)]
fn capability_at_version(
    world: &RegistrationWorld,
    name: String,
    realm: String,
    service: String,
    version: u64,
) -> Result<(), eyre::Report> {
    let stored = world
        .curator
        .capabilities()
        .get_versioned(&service, &name, realm.parse::<Realm>()?)
        .ok_or_else(|| eyre::eyre!("capability '{name}' owned by '{service}' not found"))?;
    if stored.version() != version {
        return Err(eyre::eyre!(
            "expected version {version}, found {}",
            stored.version()
        ));
    }
    Ok(())
}

#[then(r#"route "{method}" "{path}" is defined by "{service}""#)]
fn route_defined_by(
    world: &RegistrationWorld,
    method: String,
    path: String,
    service: String,
) -> Result<(), eyre::Report> {
    let route = world
        .curator
        .get_route(&path, HttpMethod::try_from(method.as_str())?)
        .ok_or_else(|| eyre::eyre!("route {method} {path} not registered"))?;
    if route.defined_by() != service {
        return Err(eyre::eyre!(
            "expected {method} {path} defined by '{service}', found '{}'",
            route.defined_by()
        ));
    }
    Ok(())
}

#[then(r#"no routes are defined by "{service}""#)]
fn no_routes_defined_by(world: &RegistrationWorld, service: String) -> Result<(), eyre::Report> {
    let routes = world
        .curator
        .discover_routes_matching(&RouteFilter::any().defined_by(service.as_str()));
    if !routes.is_empty() {
        return Err(eyre::eyre!("expected no routes for '{service}', found {routes:?}"));
    }
    Ok(())
}

#[then(r#"service "{service}" is not registered"#)]
fn service_not_registered(world: &RegistrationWorld, service: String) -> Result<(), eyre::Report> {
    if let Some(record) = world.curator.discover_service_by_name(&service) {
        return Err(eyre::eyre!("expected '{service}' to be gone, found {record:?}"));
    }
    Ok(())
}
