//! Username sweep feeding breach attachment and scoring.

use lookout_core::{Category, ScanningConfig, Username};
use lookout_intel::{
    attach_breach, calculate_risk, correlate, identity_confidence, BreachChecker, BreachStatus,
    ConfidenceInputs, EmailLookup, Level,
};
use lookout_probe::{CheckStrategy, ProbeDefinition, ProbeRegistry};
use lookout_scanner::{ReconOrchestrator, StaticTransport};
use std::sync::Arc;
use std::time::Duration;

fn github() -> ProbeDefinition {
    ProbeDefinition::new(
        "GitHub",
        "https://github.com/{}",
        Category::Developer,
        CheckStrategy::StatusCode,
        false,
    )
    .expect("valid definition")
}

fn reddit() -> ProbeDefinition {
    ProbeDefinition::new(
        "Reddit",
        "https://www.reddit.com/user/{}",
        Category::Social,
        CheckStrategy::StatusCode,
        false,
    )
    .expect("valid definition")
}

#[tokio::test]
async fn test_breach_attachment_lifts_radar_and_scores() {
    let transport = Arc::new(
        StaticTransport::new()
            .with_response("https://github.com/octo", 200, "<title>octo</title>")
            .with_response("https://www.reddit.com/user/octo", 200, "<title>octo</title>")
            .with_response(
                "https://api.github.com/users/octo/events/public",
                200,
                r#"[{"type": "PushEvent", "payload": {"commits": [{"author": {"email": "octo@corp.test"}}]}}]"#,
            )
            .with_response(
                "https://cavalier.hudsonrock.com/api/json/v2/preview/search-by-login/osint-tools?login=octo%40corp.test",
                200,
                r#"{"stealers": [{"computer_name": "WORKSTATION"}]}"#,
            ),
    );

    let registry = ProbeRegistry::from_definitions(vec![github(), reddit()]);
    let username = Username::new("octo").expect("valid username");
    let mut report = ReconOrchestrator::new(registry, transport.clone(), &ScanningConfig::default())
        .run(&username)
        .await;

    assert_eq!(report.radar.breach, 0);

    let breach = BreachChecker::new(transport.clone(), Duration::from_secs(5), Duration::from_secs(10))
        .check(username.as_str())
        .await;
    assert_eq!(breach.status, BreachStatus::Danger);

    assert!(attach_breach(&mut report.results, "GitHub", &breach));
    report.refresh_radar();
    assert_eq!(report.radar.breach, 100);
    assert_eq!(report.radar.dev, 25);
    assert_eq!(report.radar.social, 20);

    let correlation = correlate(&report.results, false, false);
    assert_eq!(correlation.linked_platforms, vec!["GitHub", "Reddit"]);
    let risk = calculate_risk(&correlation);
    assert_eq!(risk.risk_score, 30);
    assert_eq!(risk.level, Level::Medium);

    let email = EmailLookup::new(transport, Duration::from_secs(5))
        .lookup("octo@corp.test")
        .await;
    let confidence = identity_confidence(&ConfidenceInputs {
        found_platforms: report.found_count(),
        email: Some(&email),
        profile_email_exposed: breach.email.is_some(),
        phone_valid: false,
    });
    // 30 reuse + 10 valid + 15 variations + 20 exposed
    assert_eq!(confidence.confidence_score, 75);
    assert_eq!(confidence.level, Level::High);
}
