use std::io::Write;
use std::sync::Arc;

use eyre::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use triage_cli::interview::{self, Command};
use triage_cli::{aws, config};
use triage_core::models::risk::RiskAssessment;
use triage_core::models::severity::SeverityLevel;
use triage_core::models::submission::SurveySubmission;
use triage_engine::decision::TriageDecisionService;
use triage_engine::error::IntakeError;
use triage_engine::escalation::{EmergencyEscalationChannel, RaiseOutcome};
use triage_engine::followup::FollowUpScheduler;
use triage_engine::hospital::StaticHospitalDirectory;
use triage_engine::intake;
use triage_engine::listeners::{AlertListener, AuditLogListener, HospitalLookupListener};
use triage_gateway::bedrock::BedrockProvider;
use triage_gateway::gateway::TextCompletionGateway;
use triage_risk::parallel::score_all;
use triage_storage::store::KeyValueStore;
use triage_survey::orchestrator::SurveyOrchestrator;
use triage_survey::registry::SurveyRegistry;
use triage_survey::session::Advance;
use triage_survey::surveys::general_symptoms;

const LOG_FORMAT_ENV: &str = "TRIAGE_LOG_FORMAT";
const REFERRAL_LIMIT: usize = 3;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing();

    let mut args = std::env::args().skip(1);
    let survey_id = args
        .next()
        .unwrap_or_else(|| general_symptoms::ID.to_string());
    let actor_id = args.next().unwrap_or_else(|| "local".to_string());

    let cfg = config::load_config()?;
    let sdk_config = aws::build_aws_config(&cfg.region, &cfg.credentials).await;
    let store = aws::build_store(&cfg.storage, &sdk_config);

    let provider = Arc::new(BedrockProvider::from_config(&sdk_config, cfg.model_id.clone()));
    let service = TriageDecisionService::new(
        TextCompletionGateway::new(provider),
        cfg.decision_settings(),
    );

    let alerts = Arc::new(AlertListener::new());
    let mut alert_rx = alerts.subscribe();
    let mut channel = EmergencyEscalationChannel::new()
        .with_listener(Arc::new(AuditLogListener))
        .with_listener(alerts)
        .with_store(store.clone());
    let mut referral_rx = None;
    if !cfg.hospitals.is_empty() {
        let directory = StaticHospitalDirectory::new(cfg.hospitals.clone());
        let hospitals = Arc::new(HospitalLookupListener::new(
            Arc::new(directory),
            REFERRAL_LIMIT,
        ));
        referral_rx = Some(hospitals.subscribe());
        channel = channel.with_listener(hospitals);
    }

    let mut orchestrator = SurveyOrchestrator::new(SurveyRegistry::builtin());
    let resumed = orchestrator.restore(&actor_id, store.as_ref()).await?
        && orchestrator
            .session(&actor_id)
            .is_some_and(|s| s.definition().id == survey_id);
    if resumed {
        println!("Resuming your previous answers.");
    } else {
        let session = orchestrator.start(&actor_id, &survey_id)?;
        println!("{}", session.definition().title);
        println!("Type :back to return to the previous question, :quit to stop.");
    }

    let Some(submission) = run_survey(&mut orchestrator, &actor_id, store.as_ref()).await? else {
        println!("\nProgress saved. Run again to continue.");
        return Ok(());
    };
    orchestrator.persist(&actor_id, store.as_ref()).await?;

    let risk = score_risk(&submission).await?;
    for assessment in &risk {
        println!(
            "\n{}: {} (score {:.2})",
            assessment.condition, assessment.level, assessment.score
        );
    }

    let decision = service.decide(&submission, &cfg.patient, &risk).await;
    println!("\n{}", serde_json::to_string_pretty(&decision.result)?);

    if let Some(mut event) = decision.emergency {
        if let Some(location) = cfg.location {
            event = event.with_coordinates(location);
        }
        match channel.raise(event).await {
            RaiseOutcome::Dispatched(report) => {
                info!(
                    listeners = channel.listener_count(),
                    delivered = report.delivered(),
                    failed = report.failed(),
                    "emergency dispatched"
                );
                if let Ok(alert) = alert_rx.try_recv() {
                    println!("\n!!! {}\n{}", alert.title, alert.recommended_action);
                }
                if let Some(Ok(referral)) = referral_rx.as_mut().map(|rx| rx.try_recv()) {
                    println!("Nearest emergency departments:");
                    for facility in referral.facilities {
                        println!(
                            "  - {} ({:.1} km) {}",
                            facility.name,
                            facility.distance_km.unwrap_or_default(),
                            facility.address
                        );
                    }
                }
            }
            RaiseOutcome::Suppressed => {
                println!("\nAn emergency alert for you is already active.");
            }
        }
    }

    let (scheduler, mut replies) = FollowUpScheduler::new(cfg.follow_up, 1);
    scheduler.schedule(&actor_id, follow_up_message(decision.result.severity));
    if let Some(reply) = replies.recv().await {
        println!("\n{}", reply.message);
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    // JSON for log shippers; plain text otherwise
    if std::env::var(LOG_FORMAT_ENV).is_ok_and(|v| v.eq_ignore_ascii_case("json")) {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Walk the actor through the survey on stdin. `None` when the user quit
/// or input ended; progress is persisted in that case.
async fn run_survey(
    orchestrator: &mut SurveyOrchestrator,
    actor_id: &str,
    store: &dyn KeyValueStore,
) -> Result<Option<SurveySubmission>> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let session = orchestrator
            .session(actor_id)
            .ok_or_else(|| eyre::eyre!("no survey in progress for {actor_id}"))?;
        let step = session.current_step().clone();
        let total = session.definition().steps.len();
        println!("{}", interview::render_step(&step, session.step_index(), total));
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            orchestrator.persist(actor_id, store).await?;
            return Ok(None);
        };

        match interview::parse_input(&step, &line) {
            Ok(Command::Quit) => {
                orchestrator.persist(actor_id, store).await?;
                return Ok(None);
            }
            Ok(Command::Back) => {
                orchestrator.previous(actor_id)?;
                continue;
            }
            Ok(Command::Answer(value)) => {
                if let Err(e) = orchestrator.answer(actor_id, &step.id, value) {
                    println!("  {e}");
                    continue;
                }
            }
            Ok(Command::Skip) => {}
            Err(e) => {
                println!("  {e}");
                continue;
            }
        }

        match orchestrator.next(actor_id) {
            Ok(Advance::Completed(submission)) => return Ok(Some(submission)),
            Ok(Advance::Moved { .. }) => orchestrator.persist(actor_id, store).await?,
            Err(e) => println!("  {e}"),
        }
    }
}

async fn score_risk(submission: &SurveySubmission) -> Result<Vec<RiskAssessment>> {
    let requests = match intake::risk_requests_from(submission) {
        Ok(requests) => requests,
        Err(IntakeError::NotRiskScreening(_)) => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    Ok(score_all(requests)
        .await
        .into_iter()
        .filter_map(|scored| match scored.result {
            Ok(assessment) => Some(assessment),
            Err(e) => {
                warn!(family = %scored.family, error = %e, "risk scoring failed");
                None
            }
        })
        .collect())
}

fn follow_up_message(severity: SeverityLevel) -> &'static str {
    match severity {
        SeverityLevel::Green => {
            "A clinician reviewed your answers: self-care at home is appropriate. Come back if anything changes."
        }
        SeverityLevel::Yellow => {
            "A clinician reviewed your answers: please book a doctor's visit within the next two days."
        }
        SeverityLevel::Red => {
            "A clinician reviewed your answers: go to an emergency department now or call your local emergency number."
        }
    }
}
