//! Unit tests for service registry orchestration.

use std::sync::Arc;

use crate::envelope::ErrorCode;
use crate::realm::Realm;
use crate::service::{
    domain::{ServiceDomainError, ServiceState},
    services::{RegisterServiceRequest, ServiceRegistry, ServiceRegistryError, ServiceUpdate},
};
use crate::store::{RecordStore, StoreError};
use mockable::DefaultClock;
use rstest::{fixture, rstest};

type TestRegistry = ServiceRegistry<DefaultClock>;

#[fixture]
fn registry() -> TestRegistry {
    ServiceRegistry::new(Arc::new(RecordStore::with_default_clock()))
}

fn file_parser() -> RegisterServiceRequest {
    RegisterServiceRequest::new("FileParser")
        .with_service_type("content_processing")
        .with_realm("business_enablement")
        .with_location("10.0.0.4", 9000)
        .with_capabilities(["parse_file".to_owned()])
        .with_health_check_endpoint("/health")
}

#[rstest]
fn registered_service_round_trips(registry: TestRegistry) {
    let registered = registry.register(file_parser()).expect("registration");

    let stored = registry.get("FileParser").expect("service is registered");

    assert_eq!(&stored, registered.record());
    assert_eq!(stored.service_id(), "FileParser-10.0.0.4-9000");
    assert_eq!(stored.state(), ServiceState::Active);
    assert_eq!(stored.realm(), Some(Realm::BusinessEnablement));
    assert!(registered.outcome().is_created());
}

#[rstest]
fn reregistration_replaces_the_instance(registry: TestRegistry) {
    registry.register(file_parser()).expect("first registration");

    let second = registry
        .register(RegisterServiceRequest::new("FileParser").with_location("10.0.0.9", 9000))
        .expect("restart");

    assert_eq!(second.outcome().version(), 2);
    assert_eq!(registry.count(), 1);
    assert_eq!(
        registry.get("FileParser").map(|service| service.address().to_owned()),
        Some("10.0.0.9".to_owned())
    );
}

#[rstest]
#[case(RegisterServiceRequest::new("  "), ServiceDomainError::EmptyServiceName)]
#[case(
    RegisterServiceRequest::new("svc").with_location("host", 0),
    ServiceDomainError::InvalidPort
)]
#[case(
    RegisterServiceRequest::new("svc").with_health_check_endpoint("health"),
    ServiceDomainError::InvalidHealthCheckEndpoint("health".to_owned())
)]
fn invalid_requests_are_validation_errors(
    registry: TestRegistry,
    #[case] request: RegisterServiceRequest,
    #[case] expected: ServiceDomainError,
) {
    let err = registry.register(request).expect_err("must be rejected");

    assert_eq!(err, ServiceRegistryError::Domain(expected));
    assert_eq!(err.error_code(), ErrorCode::ValidationError);
}

#[rstest]
fn unknown_realm_is_rejected(registry: TestRegistry) {
    let err = registry
        .register(RegisterServiceRequest::new("svc").with_realm("agentic"))
        .expect_err("unknown realm");

    assert!(matches!(
        err,
        ServiceRegistryError::Domain(ServiceDomainError::InvalidRealm(_))
    ));
}

#[rstest]
fn update_merges_into_the_stored_record(registry: TestRegistry) {
    registry.register(file_parser()).expect("registration");

    let updated = registry
        .update(
            "FileParser",
            ServiceUpdate::new()
                .with_capabilities(["parse_file".to_owned(), "convert_file".to_owned()])
                .with_tags(["v2".to_owned()]),
        )
        .expect("update");

    assert_eq!(updated.capabilities(), ["parse_file", "convert_file"]);
    assert_eq!(updated.tags(), ["v2"]);
    assert_eq!(updated.address(), "10.0.0.4");
    assert_eq!(updated.health_check_endpoint(), Some("/health"));
    let stored = registry.get_versioned("FileParser").expect("still registered");
    assert_eq!(stored.version(), 2);
}

#[rstest]
fn invalid_update_leaves_the_record_untouched(registry: TestRegistry) {
    registry.register(file_parser()).expect("registration");

    let err = registry
        .update("FileParser", ServiceUpdate::new().with_port(0).with_tags(["x".to_owned()]))
        .expect_err("port zero");

    assert_eq!(err, ServiceRegistryError::Domain(ServiceDomainError::InvalidPort));
    let stored = registry.get_versioned("FileParser").expect("still registered");
    assert_eq!(stored.version(), 1);
    assert!(stored.record().tags().is_empty());
}

#[rstest]
#[case(ServiceState::Inactive)]
#[case(ServiceState::Maintenance)]
#[case(ServiceState::Deprecated)]
#[case(ServiceState::Draining)]
#[case(ServiceState::Active)]
fn set_state_moves_between_lifecycle_states(registry: TestRegistry, #[case] state: ServiceState) {
    registry.register(file_parser()).expect("registration");

    let updated = registry.set_state("FileParser", state).expect("state change");

    assert_eq!(updated.state(), state);
    assert_eq!(registry.get("FileParser").map(|service| service.state()), Some(state));
}

#[rstest]
fn update_state_by_name_parses_the_state(registry: TestRegistry) {
    registry.register(file_parser()).expect("registration");

    let updated = registry
        .update("FileParser", ServiceUpdate::new().with_state("draining"))
        .expect("state change");
    assert_eq!(updated.state(), ServiceState::Draining);

    let err = registry
        .update("FileParser", ServiceUpdate::new().with_state("paused"))
        .expect_err("unknown state");
    assert!(matches!(
        err,
        ServiceRegistryError::Domain(ServiceDomainError::InvalidState(_))
    ));
}

#[rstest]
fn unknown_service_updates_are_not_found(registry: TestRegistry) {
    let err = registry
        .set_state("Ghost", ServiceState::Maintenance)
        .expect_err("not registered");

    assert_eq!(err, ServiceRegistryError::NotFound("Ghost".to_owned()));
    assert_eq!(err.error_code(), ErrorCode::NotFound);
}

#[rstest]
fn list_filters_by_realm_and_sorts_by_name(registry: TestRegistry) {
    for (name, realm) in [
        ("Telemetry", "smart_city"),
        ("FileParser", "business_enablement"),
        ("Librarian", "smart_city"),
    ] {
        registry
            .register(RegisterServiceRequest::new(name).with_realm(realm))
            .expect("registration");
    }
    registry
        .register(RegisterServiceRequest::new("Unscoped"))
        .expect("registration");

    let smart_city: Vec<String> = registry
        .list(Some(Realm::SmartCity))
        .into_iter()
        .map(|service| service.service_name().to_owned())
        .collect();

    assert_eq!(smart_city, vec!["Librarian".to_owned(), "Telemetry".to_owned()]);
    assert_eq!(registry.list(None).len(), 4);
}

#[rstest]
fn deregister_removes_and_reports_missing(registry: TestRegistry) {
    registry.register(file_parser()).expect("registration");

    registry.deregister("FileParser").expect("removal");
    assert_eq!(registry.count(), 0);

    let err = registry.deregister("FileParser").expect_err("already gone");
    assert_eq!(err.error_code(), ErrorCode::NotFound);
}

#[rstest]
fn closed_store_rejects_registration() {
    let store = Arc::new(RecordStore::with_default_clock());
    let registry = ServiceRegistry::new(Arc::clone(&store));
    store.close();

    let err = registry.register(file_parser()).expect_err("closed");

    assert_eq!(err, ServiceRegistryError::Store(StoreError::Closed));
}
