//! Then steps for tiered access BDD scenarios.

use super::world::AccessWorld;
use rstest_bdd_macros::then;
use serde_json::Value;

#[then("the invocation returns {pages:u64} pages")]
fn invocation_returns_pages(world: &AccessWorld, pages: u64) -> Result<(), eyre::Report> {
    let envelope = world.last_report()?.envelope();
    let returned = envelope
        .data()
        .and_then(|data| data.get("pages"))
        .and_then(Value::as_u64);
    if returned != Some(pages) {
        return Err(eyre::eyre!("expected {pages} pages, got {envelope:?}"));
    }
    Ok(())
}

#[then(r#"the invocation fails with code "{code}""#)]
fn invocation_fails_with(world: &AccessWorld, code: String) -> Result<(), eyre::Report> {
    let envelope = world.last_report()?.envelope();
    if envelope.success() || envelope.error_code() != Some(code.as_str()) {
        return Err(eyre::eyre!("expected failure with {code}, got {envelope:?}"));
    }
    Ok(())
}

#[then(r#"the failure message mentions "{fragment}""#)]
fn failure_message_mentions(world: &AccessWorld, fragment: String) -> Result<(), eyre::Report> {
    let envelope = world.last_report()?.envelope();
    if !envelope
        .message()
        .is_some_and(|message| message.contains(fragment.as_str()))
    {
        return Err(eyre::eyre!("expected message containing '{fragment}', got {envelope:?}"));
    }
    Ok(())
}

#[then(r#"the attempted tier positions are "{positions}""#)]
fn attempted_positions(world: &AccessWorld, positions: String) -> Result<(), eyre::Report> {
    let expected = positions
        .split(',')
        .map(|position| position.trim().parse::<usize>())
        .collect::<Result<Vec<_>, _>>()?;
    let actual = world.last_report()?.attempted_positions();
    if actual != expected {
        return Err(eyre::eyre!("expected positions {expected:?}, got {actual:?}"));
    }
    Ok(())
}
