//! Unit tests for route domain values.

use crate::realm::Realm;
use crate::route::domain::{
    HttpMethod, ParseHttpMethodError, RouteDomainError, RouteId, RoutePath, RouteRecord,
};
use rstest::rstest;

#[rstest]
#[case("get", HttpMethod::Get)]
#[case(" POST ", HttpMethod::Post)]
#[case("Delete", HttpMethod::Delete)]
#[case("options", HttpMethod::Options)]
fn methods_parse_case_insensitively(#[case] input: &str, #[case] expected: HttpMethod) {
    assert_eq!(HttpMethod::try_from(input), Ok(expected));
}

#[rstest]
fn unknown_method_is_rejected() {
    assert_eq!(
        HttpMethod::try_from("FETCH"),
        Err(ParseHttpMethodError("FETCH".to_owned()))
    );
}

#[rstest]
#[case("")]
#[case("   ")]
#[case("api/v1/files")]
fn paths_must_be_absolute(#[case] input: &str) {
    assert!(matches!(
        RoutePath::new(input),
        Err(RouteDomainError::InvalidPath(_))
    ));
}

#[rstest]
fn route_id_is_stable_sha256_of_method_and_path() {
    let path = RoutePath::new(" /api/v1/files ").expect("valid path");
    let id = RouteId::derive(HttpMethod::Post, &path);

    assert_eq!(id.as_str().len(), 64);
    assert!(id.as_str().chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    let trimmed = RoutePath::new("/api/v1/files").expect("valid path");
    assert_eq!(id, RouteId::derive(HttpMethod::Post, &trimmed));
}

#[rstest]
fn route_id_distinguishes_methods() {
    let path = RoutePath::new("/api/v1/files").expect("valid path");

    assert_ne!(
        RouteId::derive(HttpMethod::Get, &path),
        RouteId::derive(HttpMethod::Post, &path)
    );
}

#[rstest]
fn record_requires_defining_identity() {
    let path = RoutePath::new("/health").expect("valid path");

    let result = RouteRecord::new(path, HttpMethod::Get, Realm::SmartCity, "  ");

    assert_eq!(result, Err(RouteDomainError::EmptyDefinedBy));
}

#[rstest]
fn record_serialises_uppercase_method() {
    let path = RoutePath::new("/api/v1/files").expect("valid path");
    let record = RouteRecord::new(path, HttpMethod::Post, Realm::BusinessEnablement, "FileParser")
        .expect("valid record")
        .with_pillar("content");

    let json = serde_json::to_value(&record).expect("serialise");

    assert_eq!(json["method"], "POST");
    assert_eq!(json["realm"], "business_enablement");
    assert_eq!(json["pillar"], "content");
    assert!(json.get("description").is_none());
}
