//! Unit tests for the route registry service.

use std::sync::Arc;

use crate::envelope::ErrorCode;
use crate::realm::Realm;
use crate::route::{
    domain::{HttpMethod, RouteDomainError},
    services::{RegisterRouteRequest, RouteFilter, RouteRegistry, RouteRegistryError},
};
use crate::store::{RecordStore, StoreError};
use mockable::DefaultClock;
use rstest::{fixture, rstest};

type TestRegistry = RouteRegistry<DefaultClock>;

#[fixture]
fn registry() -> TestRegistry {
    RouteRegistry::new(Arc::new(RecordStore::with_default_clock()))
}

fn files_route(owner: &str) -> RegisterRouteRequest {
    RegisterRouteRequest::new("/api/v1/files", "POST", "BusinessEnablement", owner)
}

#[rstest]
fn register_then_get_returns_route(registry: TestRegistry) {
    let registered = registry
        .register(files_route("FileParser").with_capability_name("parse_file"))
        .expect("registration should succeed");

    assert!(registered.outcome().is_created());
    let found = registry
        .get("/api/v1/files", HttpMethod::Post)
        .expect("route should be found");
    assert_eq!(&found, registered.record());
    assert_eq!(found.capability_name(), Some("parse_file"));
}

#[rstest]
fn same_owner_reregistration_is_idempotent(registry: TestRegistry) {
    registry
        .register(files_route("FileParser"))
        .expect("first registration");

    let second = registry
        .register(files_route("FileParser").with_description("upload"))
        .expect("restart re-registration");

    assert_eq!(second.outcome().version(), 2);
    assert_eq!(registry.count(), 1);
}

#[rstest]
fn different_owner_conflicts_and_attribution_is_kept(registry: TestRegistry) {
    registry
        .register(files_route("FileParser"))
        .expect("first registration");

    let err = registry
        .register(files_route("OtherService"))
        .expect_err("second owner must conflict");

    assert!(matches!(err, RouteRegistryError::Store(StoreError::Conflict { .. })));
    assert_eq!(err.error_code(), ErrorCode::Conflict);
    let routes = registry.discover(None);
    assert_eq!(routes.len(), 1);
    assert_eq!(routes.first().map(|route| route.defined_by()), Some("FileParser"));
}

#[rstest]
#[case(RegisterRouteRequest::new("files", "POST", "Solution", "svc"))]
#[case(RegisterRouteRequest::new("/files", "BREW", "Solution", "svc"))]
#[case(RegisterRouteRequest::new("/files", "GET", "Nowhere", "svc"))]
#[case(RegisterRouteRequest::new("/files", "GET", "Solution", ""))]
fn malformed_requests_are_validation_errors(
    registry: TestRegistry,
    #[case] request: RegisterRouteRequest,
) {
    let err = registry.register(request).expect_err("must be rejected");

    assert!(matches!(err, RouteRegistryError::Domain(_)));
    assert_eq!(err.error_code(), ErrorCode::ValidationError);
}

#[rstest]
fn discover_filters_by_realm_and_sorts(registry: TestRegistry) {
    for (path, method, realm) in [
        ("/b", "GET", "Solution"),
        ("/a", "POST", "Solution"),
        ("/a", "GET", "Solution"),
        ("/c", "GET", "Journey"),
    ] {
        registry
            .register(RegisterRouteRequest::new(path, method, realm, "svc"))
            .expect("registration");
    }

    let solution: Vec<(String, HttpMethod)> = registry
        .discover(Some(Realm::Solution))
        .into_iter()
        .map(|route| (route.path().as_str().to_owned(), route.method()))
        .collect();

    assert_eq!(
        solution,
        vec![
            ("/a".to_owned(), HttpMethod::Get),
            ("/a".to_owned(), HttpMethod::Post),
            ("/b".to_owned(), HttpMethod::Get),
        ]
    );
    assert_eq!(registry.discover(None).len(), 4);
}

#[rstest]
fn discover_matching_combines_constraints(registry: TestRegistry) {
    registry
        .register(
            RegisterRouteRequest::new("/x", "GET", "Solution", "alpha").with_pillar("content"),
        )
        .expect("registration");
    registry
        .register(RegisterRouteRequest::new("/y", "GET", "Solution", "beta").with_pillar("content"))
        .expect("registration");
    registry
        .register(RegisterRouteRequest::new("/z", "GET", "Solution", "alpha"))
        .expect("registration");

    let filter = RouteFilter::any().defined_by("alpha").in_pillar("content");
    let matched = registry.discover_matching(&filter);

    assert_eq!(matched.len(), 1);
    assert_eq!(matched.first().map(|route| route.path().as_str()), Some("/x"));
}

#[rstest]
fn deregister_requires_owner(registry: TestRegistry) {
    registry
        .register(files_route("FileParser"))
        .expect("registration");

    let denied = registry.deregister("/api/v1/files", HttpMethod::Post, "OtherService");
    assert!(matches!(denied, Err(RouteRegistryError::Store(StoreError::Conflict { .. }))));

    registry
        .deregister("/api/v1/files", HttpMethod::Post, "FileParser")
        .expect("owner removal");
    assert!(registry.get("/api/v1/files", HttpMethod::Post).is_none());
}

#[rstest]
fn deregister_unknown_route_is_not_found(registry: TestRegistry) {
    let err = registry
        .deregister("/missing", HttpMethod::Get, "svc")
        .expect_err("nothing to remove");

    assert_eq!(err.error_code(), ErrorCode::NotFound);
}

#[rstest]
fn get_with_invalid_path_is_a_miss(registry: TestRegistry) {
    assert!(registry.get("not-a-path", HttpMethod::Get).is_none());
}

#[rstest]
fn domain_error_is_preserved() {
    let err = RouteRegistryError::from(RouteDomainError::EmptyDefinedBy);
    assert_eq!(err.to_string(), "route defined_by must not be empty");
}
