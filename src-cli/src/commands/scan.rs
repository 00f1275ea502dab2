//! The `scan` command: username sweep, optional email, breach and phone
//! checks, scoring, then persistence as a new case.

use crate::cli::ScanArgs;
use crate::state::AppState;
use anyhow::Context;
use lookout_case::{CaseFile, CaseScope, EvidenceInput};
use lookout_core::{CaseId, Username};
use lookout_intel::{
    attach_breach, calculate_risk, check_dob_exposure, correlate, identity_confidence,
    phone_lookup, weekday_index, BreachChecker, BreachReport, ConfidenceInputs, Correlation,
    EmailLookup, EmailReport, IdentityConfidence, PhoneReport, RiskAssessment,
};
use lookout_scanner::{
    MetadataExtractor, NameTableClassifier, RadarAxis, ReconOrchestrator, ReconReport,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

/// Breach axis value once stealer logs list the address.
const BREACH_DANGER_SCORE: u32 = 100;

/// Contact axis points for a valid phone number.
const PHONE_CONTACT_POINTS: u32 = 50;

/// Result key that carries a breach attachment.
const BREACH_PLATFORM: &str = "GitHub";

/// Inputs to one investigation.
#[derive(Debug, Clone, Default)]
pub struct ScanRequest {
    /// Username to sweep
    pub username: String,
    /// Email address for lookup and breach check
    pub email: Option<String>,
    /// Phone number in international form
    pub phone: Option<String>,
    /// Date of birth, `YYYY-MM-DD`
    pub dob: Option<String>,
    /// Case name, defaulting to one derived from the username
    pub case_name: Option<String>,
    /// Analyst recorded on the case and its evidence
    pub analyst: String,
}

impl From<ScanArgs> for ScanRequest {
    fn from(args: ScanArgs) -> Self {
        Self {
            username: args.username,
            email: args.email,
            phone: args.phone,
            dob: args.dob,
            case_name: args.case_name,
            analyst: args.analyst,
        }
    }
}

/// Everything stored in a case's `investigation.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Investigation {
    /// Username sweep with radar
    pub recon: ReconReport,
    /// Email lookup, when an address was given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<EmailReport>,
    /// Breach check on the address's local part
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breach: Option<BreachReport>,
    /// Phone analysis, when a number was given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<PhoneReport>,
    /// Linked platforms and exposure flags
    pub correlation: Correlation,
    /// Exposure risk
    pub risk: RiskAssessment,
    /// Identity confidence
    pub confidence: IdentityConfidence,
    /// Account creation dates per weekday, Monday first
    pub created_weekdays: [u32; 7],
}

/// A stored investigation and the case it went into.
#[derive(Debug, Clone, Serialize)]
pub struct ScanOutcome {
    /// Case holding the investigation
    pub case_id: CaseId,
    /// What was stored
    pub investigation: Investigation,
}

/// Run an investigation and store it as a new case.
pub async fn run_scan(state: &AppState, request: ScanRequest) -> anyhow::Result<ScanOutcome> {
    let username = Username::new(&request.username)
        .with_context(|| format!("invalid username: {}", request.username))?;

    // Reject a malformed date before any request goes out.
    if let Some(dob) = &request.dob {
        check_dob_exposure(std::iter::empty::<&str>(), dob)?;
    }

    let investigation = investigate(state, &username, &request).await?;

    let case_name = request
        .case_name
        .clone()
        .unwrap_or_else(|| format!("Investigation: {username}"));
    let scope = CaseScope {
        username: true,
        email: request.email.is_some(),
        phone: request.phone.is_some(),
    };
    let metadata = state
        .store
        .create_case(&case_name, &request.analyst, scope)
        .context("failed to create case")?;
    let case_id = metadata.case_id;

    state
        .store
        .update_case(&case_id, CaseFile::Investigation, &investigation)
        .context("failed to store investigation")?;

    let mut hits: Vec<_> = investigation.recon.platform_hits().into_values().collect();
    hits.sort_by(|a, b| a.platform.cmp(&b.platform));
    for hit in hits {
        state.store.add_evidence(
            &case_id,
            EvidenceInput {
                platform: Some(hit.platform.clone()),
                url: Some(hit.url.clone()),
                analyst: request.analyst.clone(),
                ..EvidenceInput::default()
            },
        )?;
    }

    info!("Stored investigation of {} as case {}", username, case_id);

    Ok(ScanOutcome {
        case_id,
        investigation,
    })
}

async fn investigate(
    state: &AppState,
    username: &Username,
    request: &ScanRequest,
) -> anyhow::Result<Investigation> {
    let extractor =
        MetadataExtractor::new().with_classifier(Arc::new(NameTableClassifier::common_names()));
    let orchestrator = ReconOrchestrator::new(
        state.registry.clone(),
        state.transport.clone(),
        &state.config.scanning,
    )
    .with_extractor(extractor);

    let mut recon = orchestrator.run(username).await;

    let intel = &state.config.intel;
    let mut email_report = None;
    let mut breach = None;

    if let Some(address) = &request.email {
        let report = EmailLookup::new(state.transport.clone(), intel.lookup_timeout())
            .lookup(address)
            .await;

        if let Some(local) = report.local_part().filter(|_| report.valid) {
            let checker = BreachChecker::new(
                state.transport.clone(),
                intel.lookup_timeout(),
                intel.breach_timeout(),
            );
            let checked = checker.check(local).await;
            if checked.is_compromised() {
                if !attach_breach(&mut recon.results, BREACH_PLATFORM, &checked) {
                    debug!("No {} result to attach breach data to", BREACH_PLATFORM);
                }
                recon.refresh_radar();
                recon.radar.set(RadarAxis::Breach, BREACH_DANGER_SCORE);
            }
            breach = Some(checked);
        }
        email_report = Some(report);
    }

    let phone = request.phone.as_deref().map(phone_lookup);
    let phone_valid = phone.as_ref().is_some_and(|p| p.valid);
    if phone_valid {
        recon.radar.add(RadarAxis::Contact, PHONE_CONTACT_POINTS);
    }

    let dob_exposed = match &request.dob {
        Some(dob) => check_dob_exposure(profile_texts(&recon), dob)?,
        None => false,
    };

    let correlation = correlate(&recon.results, phone_valid, dob_exposed);
    let risk = calculate_risk(&correlation);
    let confidence = identity_confidence(&ConfidenceInputs {
        found_platforms: recon.found_count(),
        email: email_report.as_ref(),
        profile_email_exposed: breach.as_ref().is_some_and(|b| b.email.is_some()),
        phone_valid,
    });
    let created_weekdays = created_weekdays(&recon);

    Ok(Investigation {
        recon,
        email: email_report,
        breach,
        phone,
        correlation,
        risk,
        confidence,
        created_weekdays,
    })
}

/// Titles and bios of every found profile.
fn profile_texts(recon: &ReconReport) -> Vec<&str> {
    recon
        .results
        .values()
        .filter(|r| r.found)
        .filter_map(|r| r.metadata.as_ref())
        .flat_map(|m| [m.title.as_deref(), m.bio.as_deref()])
        .flatten()
        .collect()
}

fn created_weekdays(recon: &ReconReport) -> [u32; 7] {
    let mut days = [0; 7];
    for created in recon
        .results
        .values()
        .filter_map(|r| r.metadata.as_ref()?.created_at.as_deref())
    {
        if let Some(day) = weekday_index(created).and_then(|d| usize::try_from(d).ok()) {
            days[day] += 1;
        }
    }
    days
}

/// Print a human summary, or the whole outcome as JSON.
pub fn print_outcome(outcome: &ScanOutcome, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(outcome)?);
        return Ok(());
    }

    let inv = &outcome.investigation;
    let recon = &inv.recon;

    println!("Case {}", outcome.case_id);
    println!("Target: {}", recon.identifier);

    let mut hits: Vec<_> = recon.results.values().filter(|r| r.found).collect();
    hits.sort_by(|a, b| a.platform.cmp(&b.platform));
    println!("\nFound on {} sources:", hits.len());
    for hit in hits {
        println!("  {:<16} {}", hit.platform, hit.url);
        for secret in hit.secrets() {
            println!("      {secret}");
        }
    }

    if let Some(dork) = recon.results.values().find(|r| r.is_synthetic()) {
        println!("\nManual search: {}", dork.url);
    }

    if !recon.alts.is_empty() {
        println!("\nAlternate usernames: {}", recon.alts.join(", "));
    }

    let radar = &recon.radar;
    println!(
        "\nRadar  Social {}  Dev {}  Contact {}  Breach {}  Geo {}",
        radar.social, radar.dev, radar.contact, radar.breach, radar.geo
    );

    if let Some(breach) = &inv.breach {
        match &breach.timeline_event {
            Some(event) => println!("Breach: {event}"),
            None => println!("Breach: {:?}", breach.status),
        }
    }

    if let Some(phone) = &inv.phone {
        match (&phone.details, &phone.error) {
            (Some(details), _) => println!(
                "Phone: {} ({}, {})",
                details.format_e164,
                details.country,
                details.line_type.label()
            ),
            (None, Some(error)) => println!("Phone: invalid ({error})"),
            (None, None) => println!("Phone: invalid"),
        }
    }

    println!("Risk: {} ({:?})", inv.risk.risk_score, inv.risk.level);
    println!(
        "Identity confidence: {} ({:?})",
        inv.confidence.confidence_score, inv.confidence.level
    );
    for reason in &inv.confidence.reasons {
        println!("  - {reason}");
    }

    Ok(())
}
