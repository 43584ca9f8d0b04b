//! High-level runtime orchestrator.
//!
//! The runtime owns the engine worker, wires up command/event channels, and
//! exposes a builder-based API for plugging in the collaborators.

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

use actions_core::{ActionCatalog, EngineConfig};

use crate::api::{ActorDirectory, EngineHandle, ResourceStore, Result, RuntimeError, TimeSource};
use crate::events::{Event, EventBus, Topic};
use crate::workers::{Command, EngineWorker};

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub engine: EngineConfig,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            event_buffer_size: 100,
            command_buffer_size: 32,
        }
    }
}

/// Main runtime hosting the action engine
///
/// [`EngineHandle`] provides a cloneable façade for clients.
pub struct Runtime {
    handle: EngineHandle,
    worker_handle: JoinHandle<()>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    pub fn handle(&self) -> EngineHandle {
        self.handle.clone()
    }

    /// Subscribe to events from a specific topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.handle.subscribe(topic)
    }

    /// Shutdown the runtime gracefully
    ///
    /// The worker exits once every outstanding [`EngineHandle`] clone has
    /// been dropped.
    pub async fn shutdown(self) -> Result<()> {
        drop(self.handle);

        self.worker_handle.await.map_err(RuntimeError::WorkerJoin)?;

        Ok(())
    }
}

/// Builder for [`Runtime`].
///
/// All four collaborators are required.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    catalog: Option<Arc<ActionCatalog>>,
    time_source: Option<Arc<dyn TimeSource>>,
    resources: Option<Arc<dyn ResourceStore>>,
    actors: Option<Arc<dyn ActorDirectory>>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            catalog: None,
            time_source: None,
            resources: None,
            actors: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Override only the engine section of the configuration
    pub fn engine_config(mut self, engine: EngineConfig) -> Self {
        self.config.engine = engine;
        self
    }

    pub fn catalog(mut self, catalog: impl Into<Arc<ActionCatalog>>) -> Self {
        self.catalog = Some(catalog.into());
        self
    }

    pub fn time_source(mut self, time_source: Arc<dyn TimeSource>) -> Self {
        self.time_source = Some(time_source);
        self
    }

    pub fn resources(mut self, resources: Arc<dyn ResourceStore>) -> Self {
        self.resources = Some(resources);
        self
    }

    pub fn actors(mut self, actors: Arc<dyn ActorDirectory>) -> Self {
        self.actors = Some(actors);
        self
    }

    /// Build the runtime and spawn the engine worker
    pub async fn build(self) -> Result<Runtime> {
        let catalog = self.catalog.ok_or(RuntimeError::MissingCatalog)?;
        let time_source = self.time_source.ok_or(RuntimeError::MissingTimeSource)?;
        let resources = self.resources.ok_or(RuntimeError::MissingResources)?;
        let actors = self.actors.ok_or(RuntimeError::MissingActors)?;

        let (command_tx, command_rx) = mpsc::channel::<Command>(self.config.command_buffer_size);
        let event_bus = EventBus::with_capacity(self.config.event_buffer_size);

        let handle = EngineHandle::new(command_tx, event_bus.clone());

        let worker = EngineWorker::new(
            catalog,
            &self.config.engine,
            command_rx,
            event_bus,
            time_source,
            resources,
            actors,
        );

        let worker_handle = tokio::spawn(async move {
            worker.run().await;
        });

        Ok(Runtime {
            handle,
            worker_handle,
        })
    }
}
