//! CLI entrypoint for colloquy
//!
//! Wires the layers together with dependency injection and runs a debate
//! end to end against the offline persona gateway: seed a room, create a
//! discussion, execute it, print the transcript.

use anyhow::{Result, bail};
use clap::Parser;
use colloquy_application::ports::discussion_journal::DiscussionJournal;
use colloquy_application::{CreateDiscussionInput, DiscussionOrchestrator};
use colloquy_domain::{AgentId, AgentProfile, Intensity, Topic, TurnStatus};
use colloquy_infrastructure::{
    ConfigLoader, InMemoryAgentDirectory, InMemoryDiscussionStore, InMemoryRoomDirectory,
    JsonlDiscussionJournal, LexicalRetriever, PersonaStubGateway,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "colloquy", about = "Multi-agent persona debates in a shared room")]
struct Cli {
    /// Topic to debate
    topic: Option<String>,

    /// Pacing: low, normal, or high
    #[arg(short, long)]
    intensity: Option<String>,

    /// How many of the stock personas join (2-3)
    #[arg(short, long, default_value_t = 2)]
    participants: usize,

    /// Path to a config file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Skip all config files and use built-in defaults
    #[arg(long)]
    no_config: bool,

    /// Write a JSONL journal of lifecycle events to this path
    #[arg(long)]
    journal: Option<PathBuf>,

    /// Suppress the transcript header
    #[arg(short, long)]
    quiet: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Stock personas for the offline demo
fn stock_profiles() -> Vec<AgentProfile> {
    vec![
        AgentProfile::new(
            "aurora",
            "Aurora",
            "A relentless optimist who believes every problem has a bold solution",
        )
        .with_style_tag("upbeat"),
        AgentProfile::new(
            "basalt",
            "Basalt",
            "A hard skeptic who stress-tests every claim before accepting it",
        )
        .with_style_tag("dry"),
        AgentProfile::new(
            "cinder",
            "Cinder",
            "A pragmatist who keeps pulling the debate back to what ships this quarter",
        ),
    ]
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let file_config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).map_err(|e| anyhow::anyhow!(e.to_string()))?
    };

    let intensity: Intensity = match &cli.intensity {
        Some(value) => value.parse()?,
        None => file_config.discussion.intensity()?,
    };

    if !(2..=3).contains(&cli.participants) {
        bail!("--participants must be 2 or 3");
    }

    let topic_text = cli
        .topic
        .clone()
        .unwrap_or_else(|| "Should the team rewrite the legacy service or refactor it?".to_string());

    // === Dependency Injection ===

    let store = Arc::new(InMemoryDiscussionStore::new());

    let rooms = Arc::new(InMemoryRoomDirectory::new());
    rooms.add_message("demo-room", "origin-1", "casey", topic_text.clone());

    let agents = Arc::new(InMemoryAgentDirectory::new());
    let profiles: Vec<AgentProfile> = stock_profiles().into_iter().take(cli.participants).collect();
    let participant_ids: Vec<AgentId> = profiles.iter().map(|p| p.id().clone()).collect();
    for profile in profiles {
        agents.add_profile(profile);
    }

    let retriever = Arc::new(LexicalRetriever::new());
    retriever.index(
        "demo-room",
        "decision-log",
        "Last quarter the team decided to freeze new features on the legacy service",
    );
    retriever.index(
        "demo-room",
        "postmortem",
        "The rewrite of the billing pipeline overran its estimate by four months",
    );

    let gateway = Arc::new(PersonaStubGateway::new());

    let mut orchestrator = DiscussionOrchestrator::new(
        store,
        rooms,
        agents,
        retriever,
        gateway,
        file_config.to_orchestrator_config(),
    );

    let journal_path = cli
        .journal
        .clone()
        .or_else(|| file_config.journal.path.clone().map(PathBuf::from));
    if let Some(path) = journal_path
        && let Some(journal) = JsonlDiscussionJournal::new(&path)
    {
        info!("Journaling lifecycle events to {}", journal.path().display());
        let journal: Arc<dyn DiscussionJournal> = Arc::new(journal);
        orchestrator = orchestrator.with_journal(journal);
    }

    // === Run one debate end to end ===

    let input = CreateDiscussionInput::new("demo-room", "origin-1", participant_ids)
        .with_topic(Topic::new(topic_text.as_str())?)
        .with_intensity(intensity);

    let discussion = orchestrator.create_discussion(input).await?;
    info!("Created discussion {}", discussion.id());

    if !cli.quiet {
        println!();
        println!("Topic: {}", topic_text);
        println!(
            "Participants: {} | Intensity: {} ({} turns)",
            discussion
                .participants()
                .iter()
                .map(|a| a.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            intensity,
            intensity.turn_limit(discussion.participants().len()),
        );
        println!();
    }

    let report = orchestrator.execute_discussion(discussion.id(), "cli").await?;

    for turn in &report.snapshot.turns {
        match turn.status {
            TurnStatus::Failed => {
                println!(
                    "[{}] {} failed: {}",
                    turn.sequence,
                    turn.agent_id,
                    turn.error.as_deref().unwrap_or("unknown error")
                );
            }
            _ => println!("[{}] {}: {}", turn.sequence, turn.agent_id, turn.content),
        }
    }

    println!();
    println!("Final state: {}", report.snapshot.state());
    if let Some(reason) = report.snapshot.discussion.failure_reason() {
        println!("Failure reason: {}", reason);
    }

    Ok(())
}
