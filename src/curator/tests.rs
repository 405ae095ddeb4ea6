//! Unit tests for the discovery facade.

use super::Curator;
use crate::agent::services::{AgentFilter, RegisterAgentRequest};
use crate::capability::domain::{
    CapabilityContracts, CapabilityState, HandlerRef, McpToolContract, RestApiContract,
    SoaApiContract,
};
use crate::capability::services::RegisterCapabilityRequest;
use crate::envelope::ErrorCode;
use crate::policy::domain::MeshPolicies;
use crate::policy::services::ReportPolicyRequest;
use crate::realm::Realm;
use crate::route::domain::HttpMethod;
use crate::route::services::RegisterRouteRequest;
use crate::service::domain::ServiceState;
use crate::service::services::{RegisterServiceRequest, ServiceUpdate};
use rstest::{fixture, rstest};
use serde_json::json;
use std::time::Duration;

#[fixture]
fn curator() -> Curator {
    Curator::in_memory()
}

fn parse_file(service: &str) -> RegisterCapabilityRequest {
    let handler = HandlerRef::new("file_parser.parse").expect("valid handler");
    let contracts = CapabilityContracts::new()
        .with_soa_api(
            SoaApiContract::new("parse_file", "/soa/parse_file", "POST", handler)
                .expect("valid soa contract"),
        )
        .with_rest_api(RestApiContract::new("/api/v1/files", "POST").expect("valid rest contract"));
    RegisterCapabilityRequest::new(service, "parse_file", "BusinessEnablement", contracts)
}

#[rstest]
fn capability_registration_tracks_endpoint_routes(curator: Curator) {
    let registration = curator
        .register_capability_typed(parse_file("FileParser"))
        .expect("registration should succeed");

    assert_eq!(registration.tracked_routes().len(), 2);
    assert!(registration.route_conflicts().is_empty());
    let route = curator
        .get_route("/api/v1/files", HttpMethod::Post)
        .expect("route tracked");
    assert_eq!(route.defined_by(), "FileParser");
    assert_eq!(route.capability_name(), Some("parse_file"));
}

#[rstest]
fn route_conflict_does_not_fail_capability_registration(curator: Curator) {
    let claimed = curator.register_route(RegisterRouteRequest::new(
        "/api/v1/files",
        "POST",
        "BusinessEnablement",
        "Gateway",
    ));
    assert!(claimed.success());

    let envelope = curator.register_capability(parse_file("FileParser"));

    assert!(envelope.success());
    let conflicts = envelope
        .data()
        .and_then(|data| data.get("route_conflicts"))
        .and_then(|value| value.as_array())
        .map(Vec::len);
    assert_eq!(conflicts, Some(1));
    assert_eq!(
        curator
            .get_route("/api/v1/files", HttpMethod::Post)
            .map(|route| route.defined_by().to_owned()),
        Some("Gateway".to_owned())
    );
}

#[rstest]
fn second_service_offering_capability_reports_route_conflicts(curator: Curator) {
    assert!(curator.register_capability(parse_file("FileParser")).success());

    let envelope = curator.register_capability(parse_file("BackupParser"));

    assert!(envelope.success());
    assert_eq!(
        envelope
            .data()
            .and_then(|data| data.get("route_conflicts"))
            .and_then(|value| value.as_array())
            .map(Vec::len),
        Some(2)
    );
    assert!(curator
        .get_capability("BackupParser", "parse_file", Realm::BusinessEnablement)
        .is_some());
    assert_eq!(
        curator
            .get_route("/api/v1/files", HttpMethod::Post)
            .map(|route| route.defined_by().to_owned()),
        Some("FileParser".to_owned())
    );
}

#[rstest]
fn route_conflict_envelope_carries_code(curator: Curator) {
    let claimed = curator.register_route(RegisterRouteRequest::new(
        "/api/v1/files",
        "POST",
        "Solution",
        "Gateway",
    ));
    assert!(claimed.success());

    let envelope = curator.register_route(RegisterRouteRequest::new(
        "/api/v1/files",
        "POST",
        "Solution",
        "Impostor",
    ));

    assert!(!envelope.success());
    assert!(envelope.has_error_code(ErrorCode::Conflict));
    assert!(envelope.data().is_none());
    assert!(envelope.error().is_some());
}

#[rstest]
fn validation_failure_envelope(curator: Curator) {
    let envelope = curator.register_capability(RegisterCapabilityRequest::new(
        "svc",
        "empty",
        "Solution",
        CapabilityContracts::new(),
    ));

    assert!(envelope.has_error_code(ErrorCode::ValidationError));
}

#[rstest]
fn deregistering_capability_releases_tracked_routes(curator: Curator) {
    curator
        .register_capability_typed(parse_file("FileParser"))
        .expect("registration");

    let envelope =
        curator.deregister_capability("FileParser", "parse_file", Realm::BusinessEnablement);

    assert!(envelope.success());
    assert_eq!(
        envelope.data().and_then(|data| data.get("released_routes")),
        Some(&json!(2))
    );
    assert!(curator.discover_routes(None).is_empty());
}

#[rstest]
fn facade_serves_every_registry(curator: Curator) {
    curator
        .register_capability_typed(parse_file("FileParser"))
        .expect("capability");
    assert!(
        curator
            .register_agent(RegisterAgentRequest::new(
                "planner",
                "Planner",
                "Solution",
                ["plan".to_owned()],
            ))
            .success()
    );
    assert!(
        curator
            .report_policy(ReportPolicyRequest::new(
                "FileParser",
                "business_enablement",
                MeshPolicies::new().with_timeout("30s"),
            ))
            .success()
    );

    assert_eq!(curator.discover_capabilities(Realm::BusinessEnablement, "parse").len(), 1);
    assert_eq!(curator.discover_agents(&AgentFilter::any()).len(), 1);
    assert!(curator.get_agent("planner").is_some());
    assert!(curator.get_policy_report("FileParser").is_some());
    assert_eq!(curator.get_policy_aggregate().len(), 1);

    let status = curator.status();
    assert_eq!(
        (status.capabilities, status.agents, status.routes, status.policy_reports),
        (1, 1, 2, 1)
    );
    assert_eq!(status.total_records(), 5);
    assert!(!status.closed);
}

#[rstest]
fn state_changes_flow_through_facade(curator: Curator) {
    curator
        .register_capability_typed(parse_file("FileParser"))
        .expect("registration");

    let envelope = curator.set_capability_state(
        "FileParser",
        "parse_file",
        Realm::BusinessEnablement,
        CapabilityState::Maintenance,
    );

    assert!(envelope.success());
    assert_eq!(
        curator
            .get_capability("FileParser", "parse_file", Realm::BusinessEnablement)
            .map(|record| record.state()),
        Some(CapabilityState::Maintenance)
    );
}

#[rstest]
fn missing_records_deregister_as_not_found(curator: Curator) {
    assert!(curator.deregister_agent("ghost").has_error_code(ErrorCode::NotFound));
    assert!(curator.withdraw_policy("ghost").has_error_code(ErrorCode::NotFound));
    assert!(
        curator
            .deregister_route("/ghost", HttpMethod::Get, "svc")
            .has_error_code(ErrorCode::NotFound)
    );
}

#[rstest]
fn reset_empties_and_close_rejects(curator: Curator) {
    curator
        .register_capability_typed(parse_file("FileParser"))
        .expect("registration");

    curator.reset();
    assert_eq!(curator.status().total_records(), 0);

    curator.close();
    let envelope = curator.register_capability(parse_file("FileParser"));
    assert!(envelope.has_error_code(ErrorCode::RegistryClosed));
    assert!(curator.status().closed);
}

#[rstest]
fn clones_share_the_store(curator: Curator) {
    let other = curator.clone();

    other
        .register_capability_typed(parse_file("FileParser"))
        .expect("registration");

    assert!(
        curator
            .get_capability("FileParser", "parse_file", Realm::BusinessEnablement)
            .is_some()
    );
}

fn summarise(service: &str) -> RegisterCapabilityRequest {
    let contracts = CapabilityContracts::new().with_mcp_tool(
        McpToolContract::new("summarise", json!({"type": "object"})).expect("valid tool"),
    );
    RegisterCapabilityRequest::new(service, "summarise", "Solution", contracts)
}

fn register_file_parser_estate(curator: &Curator) {
    assert!(
        curator
            .register_service(RegisterServiceRequest::new("FileParser"))
            .success()
    );
    curator
        .register_capability_typed(parse_file("FileParser"))
        .expect("capability");
    curator
        .register_capability_typed(summarise("FileParser"))
        .expect("tool capability");
    assert!(
        curator
            .register_route(RegisterRouteRequest::new(
                "/api/v1/files/status",
                "GET",
                "BusinessEnablement",
                "FileParser",
            ))
            .success()
    );
    assert!(
        curator
            .report_policy(ReportPolicyRequest::new(
                "FileParser",
                "mesh-sidecar",
                MeshPolicies::new().with_timeout("30s"),
            ))
            .success()
    );
}

#[rstest]
fn unregistering_service_removes_everything_it_owns(curator: Curator) {
    register_file_parser_estate(&curator);
    curator
        .register_capability_typed(summarise("Insights"))
        .expect("unrelated capability");

    let removed = curator
        .unregister_service_typed("FileParser")
        .expect("service is registered");

    assert_eq!(removed.service().service_name(), "FileParser");
    assert_eq!(removed.capabilities().len(), 2);
    assert_eq!(removed.released_routes(), 3);
    assert!(removed.policy_withdrawn());
    let status = curator.status();
    assert_eq!(
        (
            status.services,
            status.capabilities,
            status.routes,
            status.policy_reports
        ),
        (0, 1, 0, 0)
    );
    assert!(
        curator
            .get_capability("Insights", "summarise", Realm::Solution)
            .is_some()
    );
}

#[rstest]
fn unregistering_unknown_service_is_not_found(curator: Curator) {
    curator
        .register_capability_typed(parse_file("FileParser"))
        .expect("capability without a service record");

    let envelope = curator.unregister_service("FileParser");

    assert!(envelope.has_error_code(ErrorCode::NotFound));
    assert_eq!(curator.status().capabilities, 1);
}

#[rstest]
fn service_lifecycle_flows_through_facade(curator: Curator) {
    let registered = curator.register_service(
        RegisterServiceRequest::new("FileParser").with_location("10.0.0.4", 9000),
    );
    assert_eq!(
        registered.data().and_then(|data| data.get("service_id")),
        Some(&json!("FileParser-10.0.0.4-9000"))
    );

    let updated = curator.update_service(
        "FileParser",
        ServiceUpdate::new().with_tags(["v2".to_owned()]),
    );
    assert!(updated.success());
    let state = curator.update_service_state("FileParser", ServiceState::Maintenance);
    assert_eq!(
        state.data().and_then(|data| data.get("state")),
        Some(&json!("maintenance"))
    );

    let service = curator
        .discover_service_by_name("FileParser")
        .expect("registered");
    assert_eq!(service.tags(), ["v2"]);
    assert_eq!(service.state(), ServiceState::Maintenance);
    assert_eq!(curator.get_registered_services(), vec![service]);
    assert!(
        curator
            .update_service_state("Ghost", ServiceState::Active)
            .has_error_code(ErrorCode::NotFound)
    );
}

#[rstest]
#[tokio::test]
async fn graceful_shutdown_drains_before_unregistering(curator: Curator) {
    register_file_parser_estate(&curator);
    let shutting_down = curator.clone();
    let shutdown = tokio::spawn(async move {
        shutting_down
            .graceful_shutdown("FileParser", Duration::from_millis(200))
            .await
    });

    let mut state = None;
    for _ in 0..100 {
        tokio::task::yield_now().await;
        state = curator
            .discover_service_by_name("FileParser")
            .map(|service| service.state());
        if state == Some(ServiceState::Draining) {
            break;
        }
    }
    assert_eq!(state, Some(ServiceState::Draining));
    assert!(
        curator
            .capabilities()
            .find_invocable("parse_file", Realm::BusinessEnablement)
            .is_empty()
    );

    let envelope = shutdown.await.expect("shutdown task should not panic");

    assert!(envelope.success());
    assert!(curator.discover_service_by_name("FileParser").is_none());
    assert_eq!(curator.status().total_records(), 0);
}

#[rstest]
#[tokio::test]
async fn graceful_shutdown_of_unknown_service_is_not_found(curator: Curator) {
    let envelope = curator.graceful_shutdown("Ghost", Duration::ZERO).await;

    assert!(envelope.has_error_code(ErrorCode::NotFound));
}
