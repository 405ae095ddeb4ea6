//! Unit tests for agent registry orchestration.

use std::sync::Arc;

use crate::agent::{
    domain::AgentDomainError,
    services::{AgentFilter, AgentRegistry, AgentRegistryError, RegisterAgentRequest},
};
use crate::envelope::ErrorCode;
use crate::realm::Realm;
use crate::store::{RecordStore, StoreError};
use mockable::DefaultClock;
use rstest::{fixture, rstest};
use serde_json::json;

type TestRegistry = AgentRegistry<DefaultClock>;

#[fixture]
fn registry() -> TestRegistry {
    AgentRegistry::new(Arc::new(RecordStore::with_default_clock()))
}

fn request(agent_id: &str, realm: &str, capabilities: &[&str]) -> RegisterAgentRequest {
    RegisterAgentRequest::new(
        agent_id,
        format!("{agent_id} agent"),
        realm,
        capabilities.iter().map(|value| (*value).to_owned()),
    )
}

fn seed(registry: &TestRegistry) {
    for agent in [
        request("planner", "Solution", &["plan", "analyse"])
            .with_specialization("roadmap")
            .with_required_roles(["operator".to_owned()]),
        request("analyst", "Solution", &["analyse"]).with_specialization("finance"),
        request("guide", "Journey", &["guide", "plan"]),
    ] {
        registry.register(agent).expect("seed registration");
    }
}

#[rstest]
fn register_then_get_round_trips(registry: TestRegistry) {
    let registered = registry
        .register(
            request("planner", "Solution", &["plan"])
                .with_agent_api("agents.planner.run", Some("plans work".to_owned()))
                .with_mcp_tools(["parse_file".to_owned()]),
        )
        .expect("registration should succeed");

    assert_eq!(registry.get("planner").as_ref(), Some(registered.record()));
}

#[rstest]
fn restart_reregistration_updates_in_place(registry: TestRegistry) {
    registry
        .register(request("planner", "Solution", &["plan"]))
        .expect("first registration");

    let second = registry
        .register(request("planner", "Solution", &["plan", "analyse"]))
        .expect("restart");

    assert_eq!(second.outcome().version(), 2);
    assert_eq!(registry.count(), 1);
}

#[rstest]
fn other_agent_reusing_identifier_conflicts(registry: TestRegistry) {
    registry
        .register(RegisterAgentRequest::new(
            "agent_1",
            "InsightsAgent",
            "Solution",
            ["generate_insights".to_owned()],
        ))
        .expect("first registration");

    let err = registry
        .register(RegisterAgentRequest::new(
            "agent_1",
            "RoadmapAgent",
            "Solution",
            ["plan".to_owned()],
        ))
        .expect_err("identifier is taken");

    assert!(matches!(err, AgentRegistryError::Store(StoreError::Conflict { .. })));
    assert_eq!(err.error_code(), ErrorCode::Conflict);
    let stored = registry.get_versioned("agent_1").expect("original kept");
    assert_eq!(stored.record().agent_name(), "InsightsAgent");
    assert_eq!(stored.version(), 1);
}

#[rstest]
fn empty_capabilities_always_fail(registry: TestRegistry) {
    let err = registry
        .register(request("idle", "Solution", &[]))
        .expect_err("must fail fast");

    assert_eq!(
        err,
        AgentRegistryError::Domain(AgentDomainError::NoCapabilities("idle".to_owned()))
    );
    assert_eq!(err.error_code(), ErrorCode::ValidationError);
    assert_eq!(registry.count(), 0);
}

#[rstest]
fn exposed_tool_is_a_validation_error(registry: TestRegistry) {
    let err = registry
        .register(
            request("rogue", "Solution", &["plan"]).with_contracts_json(json!({
                "mcp_tools": [{ "tool_name": "rogue_tool", "input_schema": { "type": "object" } }]
            })),
        )
        .expect_err("agents never expose tools");

    assert_eq!(err.error_code(), ErrorCode::ValidationError);
    assert!(registry.get("rogue").is_none());
}

#[rstest]
#[case(AgentFilter::any(), vec!["analyst", "guide", "planner"])]
#[case(AgentFilter::any().in_realm(Realm::Solution), vec!["analyst", "planner"])]
#[case(AgentFilter::any().with_capability("PLAN"), vec!["guide", "planner"])]
#[case(AgentFilter::any().in_realm(Realm::Solution).with_capability("plan"), vec!["planner"])]
#[case(AgentFilter::any().with_specialization("Finance"), vec!["analyst"])]
#[case(AgentFilter::any().with_required_role("operator"), vec!["planner"])]
#[case(AgentFilter::any().in_realm(Realm::Experience), vec![])]
fn discover_intersects_present_fields(
    registry: TestRegistry,
    #[case] filter: AgentFilter,
    #[case] expected: Vec<&str>,
) {
    seed(&registry);

    let ids: Vec<String> = registry
        .discover(&filter)
        .into_iter()
        .map(|agent| agent.agent_id().as_str().to_owned())
        .collect();

    assert_eq!(ids, expected);
}

#[rstest]
fn deregister_removes_and_reports_missing(registry: TestRegistry) {
    seed(&registry);

    registry.deregister("guide").expect("removal");
    assert_eq!(registry.list().len(), 2);

    let err = registry.deregister("guide").expect_err("already gone");
    assert_eq!(err, AgentRegistryError::NotFound("guide".to_owned()));
    assert_eq!(err.error_code(), ErrorCode::NotFound);
}
