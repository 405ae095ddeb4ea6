//! When steps for tiered access BDD scenarios.

use super::world::{AccessWorld, run_async};
use curator::realm::Realm;
use curator::resolver::services::CallerContext;
use rstest_bdd_macros::when;
use serde_json::json;

#[when(r#"the orchestrator invokes "{capability}""#)]
fn orchestrator_invokes(world: &mut AccessWorld, capability: String) {
    let ctx = world.with_enabling_services(CallerContext::orchestrator(Realm::Solution));
    let resolver = world.resolver();
    let report = run_async(resolver.invoke(&capability, json!({"file_id": "f-1"}), &ctx));
    world.last_report = Some(report);
}

#[when(r#"an enabling service invokes "{capability}""#)]
fn enabling_service_invokes(world: &mut AccessWorld, capability: String) {
    let ctx = CallerContext::enabling_service(Realm::BusinessEnablement);
    let resolver = world.resolver();
    let report = run_async(resolver.invoke(&capability, json!({"file_id": "f-1"}), &ctx));
    world.last_report = Some(report);
}
