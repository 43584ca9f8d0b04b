//! Action engine simulator binary.
//!
//! Loads a catalog, starts the runtime against in-memory collaborators,
//! invokes the scripted actions and advances the clock.
//!
//! ```bash
//! SIM_ACTIONS="Carouse@Tavern,Smuggle@Docks" SIM_HOURS=12 cargo run -p actions-sim
//! ```

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::broadcast::error::RecvError;

use actions_content::{ActionLoader, ConfigLoader};
use actions_core::{CharacterId, EngineConfig, ResourceKind};
use actions_runtime::{
    Event, GameClock, InMemoryResources, Runtime, StaticActorDirectory, Topic, TrackerEvent,
};
use actions_sim::{SimConfig, report};

const PROTAGONIST: CharacterId = CharacterId(1);
const TICK_TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = SimConfig::from_env();

    let catalog = match &config.actions_path {
        Some(path) => ActionLoader::load_catalog(path)?,
        None => ActionLoader::builtin_catalog()?,
    };
    let engine = match &config.engine_config_path {
        Some(path) => ConfigLoader::load(path)?,
        None => EngineConfig::default(),
    };
    tracing::info!("Loaded {} actions", catalog.len());

    let clock = Arc::new(GameClock::new());
    let resources = Arc::new(InMemoryResources::new(config.money, config.influence));
    let actors = (0..config.members).fold(
        StaticActorDirectory::new().with_protagonist(PROTAGONIST, config.rate),
        |actors, index| actors.with_member(CharacterId(100 + index), config.rate),
    );

    let runtime = Runtime::builder()
        .engine_config(engine)
        .catalog(catalog)
        .time_source(clock.clone())
        .resources(resources.clone())
        .actors(Arc::new(actors))
        .build()
        .await?;
    let handle = runtime.handle();

    let mut action_events = handle.subscribe(Topic::Action);
    let logger = tokio::spawn(async move {
        loop {
            match action_events.recv().await {
                Ok(Event::Action(event)) => tracing::info!("{}", report::describe(&event)),
                Ok(_) => {}
                Err(RecvError::Lagged(missed)) => {
                    tracing::warn!("Event log lagged, {} events skipped", missed);
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    for (index, planned) in config.script.iter().enumerate() {
        match handle.invoke(&planned.name, planned.target(index)).await {
            Ok(receipt) => tracing::info!(
                "Invoked {} as {} ({})",
                receipt.action,
                receipt.instance,
                receipt.state
            ),
            Err(e) => tracing::warn!("Invocation of {} failed: {}", planned.name, e),
        }
    }

    let mut ticks = handle.subscribe(Topic::Tracker);
    for _ in 0..config.hours {
        if !handle.tracked().await?.subscribed {
            tracing::info!("Nothing left to track at {}", clock.now());
            break;
        }
        let hour = clock.advance();
        tokio::time::timeout(TICK_TIMEOUT, async {
            loop {
                match ticks.recv().await {
                    Ok(Event::Tracker(TrackerEvent::TickProcessed { hour: processed, .. }))
                        if processed == hour =>
                    {
                        return Ok(());
                    }
                    Ok(_) | Err(RecvError::Lagged(_)) => {}
                    Err(RecvError::Closed) => return Err(anyhow::anyhow!("event bus closed")),
                }
            }
        })
        .await
        .with_context(|| format!("engine did not process {hour}"))??;
    }

    let tracked = handle.tracked().await?;
    println!("hour:       {}", clock.now());
    println!("money:      {}", resources.balance(ResourceKind::Money));
    println!("influence:  {}", resources.balance(ResourceKind::Influence));
    println!(
        "tracked:    {} indicator, {} repeatable",
        tracked.indicator.len(),
        tracked.repeatable.len()
    );

    drop(ticks);
    drop(handle);
    runtime.shutdown().await?;
    logger.await?;

    Ok(())
}
