//! End-to-end sweeps over scripted transports.

use lookout_core::{Category, ScanningConfig, Username};
use lookout_probe::{CheckStrategy, ProbeDefinition, ProbeRegistry};
use lookout_scanner::alts;
use lookout_scanner::pivots::{DORK_KEY, GRAVATAR_KEY};
use lookout_scanner::{
    ArchiveResolver, MetadataExtractor, NameTableClassifier, RadarStats, ReconOrchestrator,
    ResultOrigin, StaticTransport, RADAR_CEILING,
};
use std::collections::HashSet;
use std::sync::Arc;

fn definition(name: &str, category: Category, check: CheckStrategy) -> ProbeDefinition {
    ProbeDefinition::new(
        name,
        format!("https://{}.test/u/{{}}", name.to_lowercase()),
        category,
        check,
        false,
    )
    .expect("valid definition")
}

fn bob() -> Username {
    Username::new("bob").expect("valid username")
}

fn orchestrator(registry: ProbeRegistry, transport: StaticTransport) -> ReconOrchestrator {
    ReconOrchestrator::new(registry, Arc::new(transport), &ScanningConfig::default())
}

#[tokio::test]
async fn test_single_social_hit() {
    let registry = ProbeRegistry::from_definitions(vec![definition(
        "Alpha",
        Category::Social,
        CheckStrategy::StatusCode,
    )]);
    let transport = StaticTransport::new().with_response("https://alpha.test/u/bob", 200, "");

    let report = orchestrator(registry, transport).run(&bob()).await;

    let hits = report.platform_hits();
    assert_eq!(hits.len(), 1);
    assert!(hits["Alpha"].found);
    assert_eq!(
        report.radar,
        RadarStats {
            social: 20,
            ..RadarStats::default()
        }
    );
}

#[tokio::test]
async fn test_social_miss_with_snapshot_becomes_archive() {
    let registry = ProbeRegistry::from_definitions(vec![definition(
        "Alpha",
        Category::Social,
        CheckStrategy::StatusCode,
    )]);
    let transport = StaticTransport::new()
        .with_response("https://alpha.test/u/bob", 404, "gone")
        .with_response(
            ArchiveResolver::lookup_url("https://alpha.test/u/bob"),
            200,
            r#"{"url": "https://alpha.test/u/bob", "archived_snapshots": {"closest": {"status": "200", "available": true, "url": "http://web.archive.org/web/20200101000000/https://alpha.test/u/bob", "timestamp": "20200101000000"}}}"#,
        );

    let report = orchestrator(registry, transport).run(&bob()).await;

    let hits = report.platform_hits();
    assert_eq!(hits.len(), 1);
    let alpha = hits["Alpha"];
    assert_eq!(alpha.category, Category::Archive);
    assert_eq!(alpha.origin, ResultOrigin::Archive);
    assert!(alpha.found);
    // Archive entries count toward neither Social nor Dev
    assert_eq!(report.radar.social, 0);
}

#[tokio::test]
async fn test_tech_miss_suggests_alts() {
    let registry = ProbeRegistry::from_definitions(vec![definition(
        "Alpha",
        Category::Tech,
        CheckStrategy::StatusCode,
    )]);

    let report = orchestrator(registry, StaticTransport::new())
        .run(&Username::new("tester").expect("valid username"))
        .await;

    assert_eq!(report.found_count(), 0);
    assert!(report.alts.contains(&alts::leet("tester")));
    assert!(report.alts.contains(&"tester123".to_string()));
}

#[tokio::test]
async fn test_archive_only_for_social_misses() {
    let registry = ProbeRegistry::from_definitions(vec![
        definition("Hit", Category::Social, CheckStrategy::StatusCode),
        definition("Miss", Category::Social, CheckStrategy::StatusCode),
        definition("Dev", Category::Developer, CheckStrategy::StatusCode),
    ]);
    let transport = Arc::new(StaticTransport::new().with_response("https://hit.test/u/bob", 200, ""));

    ReconOrchestrator::new(registry, transport.clone(), &ScanningConfig::default())
        .run(&bob())
        .await;

    assert!(transport.was_called(&ArchiveResolver::lookup_url("https://miss.test/u/bob")));
    assert!(!transport.was_called(&ArchiveResolver::lookup_url("https://hit.test/u/bob")));
    assert!(!transport.was_called(&ArchiveResolver::lookup_url("https://dev.test/u/bob")));
}

#[tokio::test]
async fn test_string_match_phrase_beats_status() {
    let registry = ProbeRegistry::from_definitions(vec![definition(
        "Forum",
        Category::Forum,
        CheckStrategy::StringMatch {
            error_msg: "User not found".to_string(),
        },
    )]);
    let transport = StaticTransport::new().with_response(
        "https://forum.test/u/bob",
        200,
        "<html><h2>User not found</h2></html>",
    );

    let report = orchestrator(registry, transport).run(&bob()).await;

    assert!(report.platform_hits().is_empty());
}

#[tokio::test]
async fn test_result_keys_come_from_registry() {
    let names = ["Alpha", "Beta", "Gamma", "Delta", "Instagram"];
    let registry = ProbeRegistry::from_definitions(
        names
            .iter()
            .map(|n| definition(n, Category::Social, CheckStrategy::StatusCode)),
    );
    let mut transport = StaticTransport::new();
    for name in &names[..3] {
        transport = transport.with_response(
            format!("https://{}.test/u/bob", name.to_lowercase()),
            200,
            "",
        );
    }
    transport = transport.with_failure("https://delta.test/u/bob", "connection reset");

    let report = orchestrator(registry, transport).run(&bob()).await;

    let allowed: HashSet<&str> = names
        .iter()
        .copied()
        .chain([GRAVATAR_KEY, DORK_KEY])
        .collect();
    for key in report.results.keys() {
        assert!(allowed.contains(key.as_str()), "unexpected key {key}");
    }
    assert_eq!(report.platform_hits().len(), 3);
    assert!(report.results.contains_key(DORK_KEY));
    assert_eq!(report.radar.social, 60);
}

#[tokio::test]
async fn test_rich_profiles_saturate_radar() {
    let profile = r#"<html><head>
        <title>Maria Lopez</title>
        <meta name="description" content="contact: maria@example.org">
    </head></html>"#;

    let mut definitions = Vec::new();
    let mut transport = StaticTransport::new();
    for i in 0..12 {
        let social = definition(&format!("Social{i}"), Category::Social, CheckStrategy::StatusCode);
        let dev = definition(&format!("Dev{i}"), Category::Developer, CheckStrategy::StatusCode);
        for def in [&social, &dev] {
            transport = transport.with_response(def.resolve_url(&bob()), 200, profile);
        }
        definitions.push(social);
        definitions.push(dev);
    }

    let report = orchestrator(ProbeRegistry::from_definitions(definitions), transport)
        .with_extractor(
            MetadataExtractor::new().with_classifier(Arc::new(NameTableClassifier::common_names())),
        )
        .run(&bob())
        .await;

    assert_eq!(report.radar.social, RADAR_CEILING);
    assert_eq!(report.radar.dev, RADAR_CEILING);
    assert_eq!(report.radar.contact, RADAR_CEILING);
    assert_eq!(report.radar.geo, RADAR_CEILING);
    assert_eq!(report.radar.breach, 0);
    assert!(report.alts.is_empty());
}

#[tokio::test]
async fn test_report_serializes() {
    let report = orchestrator(ProbeRegistry::new(), StaticTransport::new())
        .run(&bob())
        .await;

    let json = serde_json::to_value(&report).expect("serialize report");
    assert_eq!(json["identifier"], "bob");
    assert_eq!(json["results"][DORK_KEY]["platform"], "Google");
    assert_eq!(json["radar"]["Social"], 0);
    assert!(json["alts"].as_array().is_some_and(|a| !a.is_empty()));
}
