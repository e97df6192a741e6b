//! DNS-over-HTTPS wire contract and end-to-end checks against a mock resolver.

use dnsauth_client::{AuthChecker, CheckConfig, DohClient, TxtResolver};
use dnsauth_core::{
    CheckTarget, DkimSelector, DmarcPolicy, DnsAuthError, RecordType, SpfProviders,
    TransportError,
};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> DohClient {
    DohClient::builder()
        .endpoint(format!("{}/dns-query", server.uri()))
        .build()
        .unwrap()
}

async fn mount_txt(server: &MockServer, name: &str, data: &[&str]) {
    let body = if data.is_empty() {
        json!({ "Status": 0 })
    } else {
        let answers: Vec<_> = data
            .iter()
            .map(|d| json!({ "name": name, "type": 16, "TTL": 300, "data": d }))
            .collect();
        json!({ "Status": 0, "Answer": answers })
    };

    Mock::given(method("GET"))
        .and(path("/dns-query"))
        .and(query_param("name", name))
        .and(query_param("type", "TXT"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_status(server: &MockServer, name: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path("/dns-query"))
        .and(query_param("name", name))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

#[tokio::test]
async fn sends_dns_json_accept_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/dns-query"))
        .and(query_param("name", "example.com"))
        .and(query_param("type", "TXT"))
        .and(header("accept", "application/dns-json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Status": 0,
            "Answer": [{ "name": "example.com", "type": 16, "data": "\"hello\"" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let answers = client_for(&server)
        .query("example.com", RecordType::Txt)
        .await
        .unwrap();

    assert_eq!(answers.len(), 1);
    assert_eq!(answers[0].name, "example.com");
    assert_eq!(answers[0].record_type, 16);
    assert_eq!(answers[0].unquoted_data(), "hello");
}

#[tokio::test]
async fn missing_answer_section_is_empty_not_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/dns-query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "Status": 3 })))
        .mount(&server)
        .await;

    let answers = client_for(&server)
        .query("nothing.example.com", RecordType::Txt)
        .await
        .unwrap();
    assert!(answers.is_empty());
}

#[tokio::test]
async fn http_failure_carries_status_description() {
    let server = MockServer::start().await;
    mount_status(&server, "example.com", 500).await;

    let err = client_for(&server)
        .query("example.com", RecordType::Txt)
        .await
        .unwrap_err();

    match err {
        TransportError::Status { code, reason } => {
            assert_eq!(code, 500);
            assert_eq!(reason, "Internal Server Error");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn malformed_json_is_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/dns-query"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .query("example.com", RecordType::Txt)
        .await
        .unwrap_err();
    assert!(matches!(err, TransportError::Json(_)));
}

#[tokio::test]
async fn fully_configured_domain_end_to_end() {
    let server = MockServer::start().await;
    mount_txt(&server, "example.com", &["\"v=spf1 include:providerA.example -all\""]).await;
    for selector in DkimSelector::ALL {
        let name = selector.subdomain("example.com");
        mount_txt(&server, &name, &["\"v=DKIM1; k=rsa; p=MIGf\""]).await;
    }
    mount_txt(&server, "_dmarc.example.com", &["\"v=DMARC1; p=reject;\""]).await;

    let report = client_for(&server)
        .checker()
        .providers(SpfProviders::new("providerA.example", "providerB.example"))
        .check(&CheckTarget::parse("example.com").unwrap())
        .await
        .unwrap();

    assert_eq!(report.score, 100);
    assert!(report.spf.has_exactly_one);
    assert!(report.spf.has_provider_a);
    assert!(!report.spf.has_provider_b);
    assert_eq!(report.dmarc.policy, Some(DmarcPolicy::Reject));
}

#[tokio::test]
async fn bare_domain_end_to_end() {
    let server = MockServer::start().await;
    mount_txt(&server, "example.com", &[]).await;
    for selector in DkimSelector::ALL {
        mount_txt(&server, &selector.subdomain("example.com"), &[]).await;
    }
    mount_txt(&server, "_dmarc.example.com", &[]).await;

    let report = client_for(&server)
        .checker()
        .check(&CheckTarget::parse("example.com").unwrap())
        .await
        .unwrap();

    assert_eq!(report.score, 0);
    assert!(!report.spf.exists);
    assert_eq!(report.dkim.present_count(), 0);
    assert!(!report.dmarc.exists);
}

#[tokio::test]
async fn spf_transport_failure_is_fatal() {
    let server = MockServer::start().await;
    mount_status(&server, "example.com", 503).await;
    mount_txt(&server, "_dmarc.example.com", &["\"v=DMARC1; p=none\""]).await;

    let err = client_for(&server)
        .checker()
        .check(&CheckTarget::parse("example.com").unwrap())
        .await
        .unwrap_err();

    assert!(matches!(err, DnsAuthError::Evaluation(_)));
    assert_eq!(
        err.to_string(),
        "SPF check failed: DNS query failed: Service Unavailable"
    );
}

#[tokio::test]
async fn selector_and_dmarc_failures_are_not_fatal() {
    let server = MockServer::start().await;
    mount_txt(&server, "example.com", &["\"v=spf1 -all\""]).await;
    mount_txt(&server, "bh._domainkey.example.com", &["\"v=DKIM1; p=x\""]).await;
    mount_status(&server, "ba._domainkey.example.com", 500).await;
    mount_status(&server, "_dmarc.example.com", 502).await;
    // Remaining selectors are unmatched and get wiremock's 404.

    let report = client_for(&server)
        .checker()
        .check(&CheckTarget::parse("example.com").unwrap())
        .await
        .unwrap();

    assert!(report.dkim.is_present(DkimSelector::Bh));
    assert!(!report.dkim.is_present(DkimSelector::Ba));
    assert!(!report.dmarc.exists);
    assert_eq!(report.score, 48);
}

#[tokio::test]
async fn check_config_sets_resolver_and_providers() {
    let server = MockServer::start().await;
    mount_txt(&server, "example.com", &["\"v=spf1 include:mail.example -all\""]).await;

    let config = CheckConfig::default()
        .resolver(format!("{}/dns-query", server.uri()))
        .providers(SpfProviders::new("mail.example", "other.example"));
    let report = AuthChecker::from_config(&config)
        .unwrap()
        .check(&CheckTarget::parse("example.com").unwrap())
        .await
        .unwrap();

    assert!(report.spf.has_provider_a);
    assert!(!report.spf.has_provider_b);
    assert_eq!(report.score, 40);
}

#[tokio::test]
async fn check_config_timeout_bounds_each_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/dns-query"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "Status": 0 }))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let config = CheckConfig::default()
        .resolver(format!("{}/dns-query", server.uri()))
        .timeout_secs(1);
    let err = AuthChecker::from_config(&config)
        .unwrap()
        .check(&CheckTarget::parse("example.com").unwrap())
        .await
        .unwrap_err();

    assert!(matches!(err, DnsAuthError::Evaluation(TransportError::Http(_))));
}
