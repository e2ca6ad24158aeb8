//! Resolver and dual lookup against mock lookup services.

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ipsight::{
    Endpoint, IpVersion, Provider, Resolution, ResolveError, Resolver, ResolverConfig,
};

fn endpoint(server: &MockServer, provider: Provider, route: &str) -> Endpoint {
    Endpoint::new(provider, format!("{}{}", server.uri(), route))
}

fn resolver(ipv4: Vec<Endpoint>, ipv6: Vec<Endpoint>) -> Resolver {
    Resolver::new(ResolverConfig {
        ipv4,
        ipv6,
        ..Default::default()
    })
    .expect("client should build")
}

async fn mount_json(server: &MockServer, route: &str, status: u16, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn failing_rich_provider_falls_back_to_ipinfo() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ipapi"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    mount_json(
        &server,
        "/ipinfo",
        200,
        json!({"ip": "93.184.216.34", "loc": "37.3,-122.0", "org": "Example ISP"}),
    )
    .await;

    let resolver = resolver(
        vec![
            endpoint(&server, Provider::Ipapi, "/ipapi"),
            endpoint(&server, Provider::Ipinfo, "/ipinfo"),
        ],
        vec![],
    );
    let record = resolver.resolve(IpVersion::V4).await.unwrap();

    assert_eq!(record.address, "93.184.216.34");
    assert_eq!(record.latitude, Some(37.3));
    assert_eq!(record.longitude, Some(-122.0));
    assert_eq!(record.isp.as_deref(), Some("Example ISP"));
    assert_eq!(record.org.as_deref(), Some("Example ISP"));
    assert_eq!(record.version, IpVersion::V4);
}

#[tokio::test]
async fn wrong_version_answer_is_skipped() {
    let server = MockServer::start().await;
    mount_json(&server, "/first", 200, json!({"ip": "2001:db8::10"})).await;
    mount_json(&server, "/second", 200, json!({"ip": "198.51.100.10"})).await;

    let resolver = resolver(
        vec![
            endpoint(&server, Provider::Bare, "/first"),
            endpoint(&server, Provider::Bare, "/second"),
        ],
        vec![],
    );
    let record = resolver.resolve(IpVersion::V4).await.unwrap();
    assert_eq!(record.address, "198.51.100.10");
}

#[tokio::test]
async fn exhausted_v6_list_is_not_found() {
    let server = MockServer::start().await;
    mount_json(&server, "/v4-only", 200, json!({"ip": "198.51.100.11"})).await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
        .mount(&server)
        .await;
    mount_json(&server, "/limited", 429, json!({"error": true})).await;

    let resolver = resolver(
        vec![],
        vec![
            endpoint(&server, Provider::Bare, "/v4-only"),
            endpoint(&server, Provider::Ipapi, "/broken"),
            endpoint(&server, Provider::Ipapi, "/limited"),
            Endpoint::new(Provider::Bare, "http://127.0.0.1:1/unreachable"),
        ],
    );
    let result = resolver.resolve(IpVersion::V6).await;
    assert_eq!(result, Err(ResolveError::NotFound(IpVersion::V6)));
}

#[tokio::test]
async fn reported_error_payload_is_skipped() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "/ipapi",
        200,
        json!({"ip": "198.51.100.12", "error": true, "reason": "RateLimited"}),
    )
    .await;
    mount_json(&server, "/ipify", 200, json!({"ip": "198.51.100.13"})).await;

    let resolver = resolver(
        vec![
            endpoint(&server, Provider::Ipapi, "/ipapi"),
            endpoint(&server, Provider::Bare, "/ipify"),
        ],
        vec![],
    );
    let record = resolver.resolve(IpVersion::V4).await.unwrap();
    assert_eq!(record.address, "198.51.100.13");
    assert_eq!(record.city, None);
}

#[tokio::test]
async fn lower_priority_endpoints_are_not_contacted_after_a_match() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "/ipapi",
        200,
        json!({"ip": "198.51.100.14", "city": "Norwell", "country": "US", "country_name": "United States"}),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/fallback"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ip": "198.51.100.15"})))
        .expect(0)
        .mount(&server)
        .await;

    let resolver = resolver(
        vec![
            endpoint(&server, Provider::Ipapi, "/ipapi"),
            endpoint(&server, Provider::Bare, "/fallback"),
        ],
        vec![],
    );
    let record = resolver.resolve(IpVersion::V4).await.unwrap();
    assert_eq!(record.city.as_deref(), Some("Norwell"));
    assert_eq!(record.country.as_deref(), Some("US"));
}

#[tokio::test]
async fn plain_text_bare_answer_is_accepted() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/text"))
        .respond_with(ResponseTemplate::new(200).set_body_string("2001:db8::20\n"))
        .mount(&server)
        .await;

    let resolver = resolver(vec![], vec![endpoint(&server, Provider::Bare, "/text")]);
    let record = resolver.resolve(IpVersion::V6).await.unwrap();
    assert_eq!(record.address, "2001:db8::20");
    assert_eq!(record.version, IpVersion::V6);
}

#[tokio::test]
async fn dual_lookup_with_only_v4_is_partial_success() {
    let server = MockServer::start().await;
    mount_json(&server, "/v4", 200, json!({"ip": "198.51.100.16"})).await;
    Mock::given(method("GET"))
        .and(path("/v6"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let resolver = resolver(
        vec![endpoint(&server, Provider::Bare, "/v4")],
        vec![endpoint(&server, Provider::Bare, "/v6")],
    );
    let found = resolver.resolve_both().await.unwrap();
    assert_eq!(
        found.v4.as_ref().map(|r| r.address.as_str()),
        Some("198.51.100.16")
    );
    assert!(found.v6.is_none());
    assert_eq!(found.status(), Resolution::Partial);
}

#[tokio::test]
async fn dual_lookup_with_both_versions_is_complete() {
    let server = MockServer::start().await;
    mount_json(&server, "/v4", 200, json!({"ip": "198.51.100.17"})).await;
    mount_json(&server, "/v6", 200, json!({"ip": "2001:db8::17"})).await;

    let resolver = resolver(
        vec![endpoint(&server, Provider::Bare, "/v4")],
        vec![endpoint(&server, Provider::Bare, "/v6")],
    );
    let found = resolver.resolve_both().await.unwrap();
    assert_eq!(found.status(), Resolution::Complete);
    assert_eq!(found.v6.unwrap().version, IpVersion::V6);
}

#[tokio::test]
async fn dual_lookup_with_nothing_is_aggregate_failure() {
    let server = MockServer::start().await;
    // a v4-only network: the dual stack endpoint still answers with v4
    mount_json(&server, "/any", 200, json!({"ip": "198.51.100.18"})).await;
    Mock::given(method("GET"))
        .and(path("/down"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let resolver = resolver(
        vec![endpoint(&server, Provider::Ipinfo, "/down")],
        vec![endpoint(&server, Provider::Bare, "/any")],
    );
    let result = resolver.resolve_both().await;
    assert_eq!(result, Err(ResolveError::Unavailable));
    assert_eq!(
        ResolveError::Unavailable.to_string(),
        "Unable to fetch IP address information. Please try again."
    );
}

#[tokio::test]
async fn each_dual_lookup_resolves_from_scratch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ip": "198.51.100.19"})))
        .expect(2)
        .mount(&server)
        .await;

    let resolver = resolver(vec![endpoint(&server, Provider::Bare, "/v4")], vec![]);
    let first = resolver.resolve_both().await.unwrap();
    let second = resolver.resolve_both().await.unwrap();
    assert_eq!(first, second);
}
