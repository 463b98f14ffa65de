//! Hangouts - headless hangout client
//!
//! Joins one hangout as a member, keeps a local session in sync with the
//! REST API and the signal feed, and reports the result once the hangout
//! concludes.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use hangout_app::{HangoutController, NoticeLevel, Result};
use hangout_core::{ClientConfig, ConclusionResult, Database, HangoutId, HangoutSection, MemberId};
use hangout_net::{FeedEvent, HangoutApi, HttpApi, SignalFeed};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "hangouts", version, about = "Follow a hangout from the terminal")]
struct Args {
    /// Config file (defaults to the platform config directory)
    #[arg(long, env = "HANGOUTS_CONFIG")]
    config: Option<PathBuf>,

    /// Hangout to join
    #[arg(long)]
    hangout: String,

    /// Your member id within the hangout
    #[arg(long)]
    member: i64,

    /// Section to open instead of the last one viewed
    #[arg(long)]
    section: Option<HangoutSection>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // Initialize logging
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_filter));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(filter)
        .init();

    tracing::info!(hangout_id = %args.hangout, member = args.member, "Starting hangouts");

    match run(args, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Hangout client failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn load_config(args: &Args) -> hangout_core::Result<ClientConfig> {
    let path = match &args.config {
        Some(path) => path.clone(),
        None => ClientConfig::default_path()?,
    };
    ClientConfig::load(&path)
}

async fn run(args: Args, config: ClientConfig) -> Result<()> {
    let db = Database::open(&ClientConfig::data_dir()?.join("hangouts.db"))?;

    let api = HttpApi::new(
        config.server.api_base_url.clone(),
        Duration::from_secs(config.server.request_timeout_secs),
    )?;
    let controller =
        HangoutController::bootstrap(api, &args.hangout, MemberId(args.member), config.limits.clone())
            .await?;

    let hangout_id = HangoutId::new(args.hangout.as_str());
    let section = match args.section {
        Some(section) => section,
        None => db.sections().load_or_default(&hangout_id)?,
    };
    controller.enter_section(section);
    db.sections().save(&hangout_id, section)?;

    controller.refresh_suggestions().await;
    controller.refresh_availability().await;
    controller.settle_conclusion().await;
    let mut announced = false;
    report(&controller, &mut announced);

    let mut feed =
        SignalFeed::subscribe(config.server.signal_addr.as_str(), &args.hangout, args.member).await?;

    loop {
        tokio::select! {
            event = feed.next_event() => match event {
                Some(FeedEvent::Signal(signal)) => {
                    controller.apply_signal(signal).await;
                    // Retries the final tally if an earlier fetch failed
                    controller.settle_conclusion().await;
                    report(&controller, &mut announced);
                }
                Some(FeedEvent::Disconnected) | None => {
                    tracing::warn!("Signal feed disconnected");
                    break;
                }
            },
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted, leaving hangout");
                break;
            }
        }

        if controller.with_session(|s| s.is_deleted()) {
            break;
        }
    }

    feed.close().await;
    controller.leave_section();
    Ok(())
}

/// Log pending notices and, once the final counts are loaded, the result
fn report<A: HangoutApi>(controller: &HangoutController<A>, announced: &mut bool) {
    for notice in controller.take_notices() {
        match notice.level {
            NoticeLevel::Info => tracing::info!(field = ?notice.field, "{}", notice),
            NoticeLevel::Warning => tracing::warn!(field = ?notice.field, "{}", notice),
            NoticeLevel::Error => tracing::error!(field = ?notice.field, "{}", notice),
        }
    }

    if *announced {
        return;
    }
    let outcome = match controller.outcome() {
        Some(outcome) => outcome,
        None => return,
    };
    *announced = true;

    match outcome {
        ConclusionResult::SingleWinner(winner) => {
            tracing::info!(
                title = %winner.title,
                start = %winner.start,
                votes = winner.votes_count,
                "Hangout concluded"
            );
        }
        ConclusionResult::Tie(tied) => {
            let titles: Vec<&str> = tied.iter().map(|s| s.title.as_str()).collect();
            tracing::info!(?titles, "Hangout concluded in a tie");
        }
        ConclusionResult::Failed => {
            tracing::info!("Hangout concluded without any suggestions");
        }
    }
}
