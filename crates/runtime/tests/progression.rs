//! Tick-driven progression of indicator and repeatable instances.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{Semaphore, broadcast};

use actions_core::{
    ActionCatalog, ActionDefinition, CharacterId, CharacterStat, EngineConfig, Hour,
    InstanceState, LocationId, ResourceKind, Target,
};
use actions_runtime::{
    ActionEvent, CancelReason, EngineHandle, Event, GameClock, InMemoryResources, ResourceStore,
    Runtime, Selection, StaticActorDirectory, Topic, TrackerEvent,
};

const HERO: CharacterId = CharacterId(1);
const RECRUIT: CharacterId = CharacterId(20);
const CAPTAIN: CharacterId = CharacterId(21);

struct Harness {
    _runtime: Runtime,
    handle: EngineHandle,
    clock: Arc<GameClock>,
    resources: Arc<InMemoryResources>,
    actors: Arc<StaticActorDirectory>,
    actions: broadcast::Receiver<Event>,
    ticks: broadcast::Receiver<Event>,
}

impl Harness {
    async fn new(
        definitions: Vec<ActionDefinition>,
        resources: InMemoryResources,
        actors: StaticActorDirectory,
    ) -> Self {
        let resources = Arc::new(resources);
        Self::build(
            definitions,
            EngineConfig::new().with_chance_seed(7),
            resources.clone(),
            resources,
            actors,
        )
        .await
    }

    /// Runs the engine against `store` while balances are read from `resources`.
    async fn build(
        definitions: Vec<ActionDefinition>,
        config: EngineConfig,
        store: Arc<dyn ResourceStore>,
        resources: Arc<InMemoryResources>,
        actors: StaticActorDirectory,
    ) -> Self {
        let catalog = ActionCatalog::load(definitions).expect("definitions are valid");
        let clock = Arc::new(GameClock::new());
        let actors = Arc::new(actors);

        let runtime = Runtime::builder()
            .engine_config(config)
            .catalog(catalog)
            .time_source(clock.clone())
            .resources(store)
            .actors(actors.clone())
            .build()
            .await
            .expect("runtime should build");
        let handle = runtime.handle();
        let actions = handle.subscribe(Topic::Action);
        let ticks = handle.subscribe(Topic::Tracker);

        Self {
            _runtime: runtime,
            handle,
            clock,
            resources,
            actors,
            actions,
            ticks,
        }
    }

    /// Advances the clock and waits until the engine has processed the tick.
    async fn tick(&mut self) -> Hour {
        let hour = self.clock.advance();
        wait_for(&mut self.ticks, |event| {
            matches!(event, Event::Tracker(TrackerEvent::TickProcessed { hour: h, .. }) if *h == hour)
        })
        .await;
        hour
    }

    async fn next_action_event(&mut self, wanted: impl Fn(&ActionEvent) -> bool) -> ActionEvent {
        match wait_for(&mut self.actions, |event| {
            matches!(event, Event::Action(action) if wanted(action))
        })
        .await
        {
            Event::Action(action) => action,
            other => panic!("unexpected event {other:?}"),
        }
    }

    fn money(&self) -> i64 {
        self.resources.balance(ResourceKind::Money)
    }

    fn influence(&self) -> i64 {
        self.resources.balance(ResourceKind::Influence)
    }
}

/// Holds every read until a permit is released.
struct GatedResources {
    inner: Arc<InMemoryResources>,
    gate: Semaphore,
}

impl GatedResources {
    fn new(inner: Arc<InMemoryResources>, open_reads: usize) -> Self {
        Self {
            inner,
            gate: Semaphore::new(open_reads),
        }
    }

    fn release(&self, reads: usize) {
        self.gate.add_permits(reads);
    }

    async fn pass(&self) {
        self.gate.acquire().await.expect("gate is never closed").forget();
    }

    async fn drained(&self) {
        tokio::time::timeout(Duration::from_secs(2), async {
            while self.gate.available_permits() > 0 {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("released reads should be consumed");
    }
}

#[async_trait]
impl ResourceStore for GatedResources {
    async fn money(&self) -> i64 {
        self.pass().await;
        self.inner.money().await
    }

    async fn influence(&self) -> i64 {
        self.pass().await;
        self.inner.influence().await
    }

    fn adjust(&self, kind: ResourceKind, delta: i64) {
        self.inner.adjust(kind, delta);
    }
}

async fn wait_for(
    events: &mut broadcast::Receiver<Event>,
    wanted: impl Fn(&Event) -> bool,
) -> Event {
    tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            let event = events.recv().await.expect("event stream open");
            if wanted(&event) {
                return event;
            }
        }
    })
    .await
    .expect("expected event within timeout")
}

fn target() -> Target {
    Target::location(LocationId(9), "Library")
}

fn study() -> ActionDefinition {
    ActionDefinition::new("Study")
        .duration(4)
        .progress_indicator(10.0)
        .fixed_progression(3.0)
        .types(["Indicator", "Personal"])
        .effects(["IncreaseCharacterStat intelligence 1"])
}

fn collect_dues() -> ActionDefinition {
    ActionDefinition::new("Collect Dues")
        .progress_indicator(5.0)
        .fixed_progression(5.0)
        .types(["Repeatable", "Personal"])
        .conditions(["PlayerHasMoneyValue >= 10"])
        .effects(["AddInfluence 1"])
        .costs(["RemoveMoney 10"])
}

fn patrol() -> ActionDefinition {
    ActionDefinition::new("Patrol")
        .progress_indicator(5.0)
        .fixed_progression(4.0)
        .types(["Repeatable", "Organization"])
        .conditions(["PlayerHasMoneyValue >= 10"])
        .effects(["AddInfluence 1"])
        .costs(["RemoveMoney 10"])
}

#[tokio::test]
async fn indicator_action_completes_once_threshold_is_reached() {
    let mut harness = Harness::new(
        vec![study()],
        InMemoryResources::new(0, 0),
        StaticActorDirectory::new().with_protagonist(HERO, 0.0),
    )
    .await;

    let receipt = harness
        .handle
        .invoke("Study", target())
        .await
        .expect("study should start");
    assert_eq!(receipt.state, InstanceState::Pending);

    for expected in [3.0, 6.0, 9.0] {
        harness.tick().await;
        let instance = harness
            .handle
            .instance(receipt.instance)
            .await
            .unwrap()
            .expect("still tracked");
        assert_eq!(instance.current_progression(), expected);
        assert_eq!(harness.actors.stat(HERO, CharacterStat::Intelligence), 0);
    }

    let hour = harness.tick().await;
    let completed = harness
        .next_action_event(|event| matches!(event, ActionEvent::Completed { .. }))
        .await;
    assert_eq!(
        completed,
        ActionEvent::Completed {
            instance: receipt.instance,
            action: "Study".into(),
            target: target(),
            hour: Some(hour),
        }
    );
    assert_eq!(harness.actors.stat(HERO, CharacterStat::Intelligence), 1);
    assert_eq!(harness.handle.instance(receipt.instance).await.unwrap(), None);
    assert_eq!(harness.handle.current_action(HERO).await.unwrap(), None);
}

#[tokio::test]
async fn actor_rate_adds_to_fixed_progression() {
    let mut harness = Harness::new(
        vec![study()],
        InMemoryResources::new(0, 0),
        StaticActorDirectory::new().with_protagonist(HERO, 2.0),
    )
    .await;

    let receipt = harness.handle.invoke("Study", target()).await.unwrap();

    harness.tick().await;
    let instance = harness
        .handle
        .instance(receipt.instance)
        .await
        .unwrap()
        .expect("still tracked");
    assert_eq!(instance.current_progression(), 5.0);
    assert_eq!(instance.calculated_progression(), 5.0);

    harness.tick().await;
    harness
        .next_action_event(|event| matches!(event, ActionEvent::Completed { .. }))
        .await;
}

#[tokio::test]
async fn repeatable_action_cycles_until_conditions_fail() {
    let mut harness = Harness::new(
        vec![collect_dues()],
        InMemoryResources::new(35, 0),
        StaticActorDirectory::new().with_protagonist(HERO, 0.0),
    )
    .await;

    let receipt = harness
        .handle
        .invoke("Collect Dues", target())
        .await
        .expect("dues should start");
    assert_eq!(harness.money(), 25);

    for cycle in 1..=2 {
        harness.tick().await;
        let repeated = harness
            .next_action_event(|event| matches!(event, ActionEvent::Repeated { .. }))
            .await;
        assert_eq!(
            repeated,
            ActionEvent::Repeated {
                instance: receipt.instance,
                cycle,
            }
        );
        assert_eq!(harness.influence(), i64::from(cycle));
    }
    assert_eq!(harness.money(), 5);

    harness.tick().await;
    let cancelled = harness
        .next_action_event(|event| matches!(event, ActionEvent::Cancelled { .. }))
        .await;
    assert!(matches!(
        cancelled,
        ActionEvent::Cancelled {
            reason: CancelReason::ConditionsNotMet,
            ..
        }
    ));

    // Effects of the final completion stay; its cost was never paid.
    assert_eq!(harness.influence(), 3);
    assert_eq!(harness.money(), 5);
    assert_eq!(harness.handle.current_action(HERO).await.unwrap(), None);
}

#[tokio::test]
async fn organization_repeatable_runs_on_selected_member() {
    let mut harness = Harness::new(
        vec![patrol()],
        InMemoryResources::new(35, 0),
        StaticActorDirectory::new()
            .with_protagonist(HERO, 0.0)
            .with_member(RECRUIT, 0.0)
            .with_member(CAPTAIN, 1.0),
    )
    .await;
    harness.actors.queue_selection(Selection::Chosen(CAPTAIN));

    let receipt = harness
        .handle
        .invoke("Patrol", target())
        .await
        .expect("patrol should start");
    assert_eq!(receipt.actor, CAPTAIN);
    assert_eq!(receipt.state, InstanceState::Pending);
    assert_eq!(harness.money(), 25);
    assert_eq!(
        harness.handle.current_action(CAPTAIN).await.unwrap(),
        Some(receipt.instance)
    );
    assert_eq!(harness.handle.current_action(RECRUIT).await.unwrap(), None);
    assert_eq!(harness.handle.current_action(HERO).await.unwrap(), None);

    // Fixed progression alone is 4; only the captain's rate completes a
    // cycle every hour.
    for cycle in 1..=2 {
        harness.tick().await;
        let repeated = harness
            .next_action_event(|event| matches!(event, ActionEvent::Repeated { .. }))
            .await;
        assert_eq!(
            repeated,
            ActionEvent::Repeated {
                instance: receipt.instance,
                cycle,
            }
        );
        let instance = harness
            .handle
            .instance(receipt.instance)
            .await
            .unwrap()
            .expect("still tracked");
        assert_eq!(instance.calculated_progression(), 5.0);
        assert_eq!(instance.actor(), Some(CAPTAIN));
    }
    assert_eq!(harness.money(), 5);
    assert_eq!(harness.influence(), 2);

    harness.tick().await;
    let cancelled = harness
        .next_action_event(|event| matches!(event, ActionEvent::Cancelled { .. }))
        .await;
    assert!(matches!(
        cancelled,
        ActionEvent::Cancelled {
            reason: CancelReason::ConditionsNotMet,
            ..
        }
    ));

    assert_eq!(harness.influence(), 3);
    assert_eq!(harness.money(), 5);
    assert_eq!(harness.handle.current_action(CAPTAIN).await.unwrap(), None);
    assert_eq!(harness.handle.instance(receipt.instance).await.unwrap(), None);
    assert_eq!(harness.clock.subscriber_count(), 0);
}

#[tokio::test]
async fn tick_subscription_follows_tracked_instances() {
    let mut harness = Harness::new(
        vec![study()],
        InMemoryResources::new(0, 0),
        StaticActorDirectory::new().with_protagonist(HERO, 0.0),
    )
    .await;

    assert_eq!(harness.clock.subscriber_count(), 0);
    assert!(!harness.handle.tracked().await.unwrap().subscribed);

    let receipt = harness.handle.invoke("Study", target()).await.unwrap();
    let tracked = harness.handle.tracked().await.unwrap();
    assert!(tracked.subscribed);
    assert_eq!(tracked.indicator, vec![receipt.instance]);
    assert_eq!(harness.clock.subscriber_count(), 1);

    // Completion on the fourth tick releases the subscription before the
    // tick is reported as processed.
    for _ in 0..4 {
        harness.tick().await;
    }

    assert_eq!(harness.clock.subscriber_count(), 0);
    let tracked = harness.handle.tracked().await.unwrap();
    assert!(!tracked.subscribed);
    assert!(tracked.indicator.is_empty());
}

#[tokio::test]
async fn missing_rate_drops_instance_from_tracking() {
    let mut harness = Harness::new(
        vec![study()],
        InMemoryResources::new(0, 0),
        StaticActorDirectory::new()
            .with_protagonist(HERO, 0.0)
            .without_rate(HERO),
    )
    .await;

    let receipt = harness.handle.invoke("Study", target()).await.unwrap();

    harness.tick().await;
    let cancelled = harness
        .next_action_event(|event| matches!(event, ActionEvent::Cancelled { .. }))
        .await;

    match cancelled {
        ActionEvent::Cancelled {
            instance,
            reason: CancelReason::TrackingFailed { error },
            ..
        } => {
            assert_eq!(instance, receipt.instance);
            assert!(error.contains("progression"), "{error}");
        }
        other => panic!("unexpected event {other:?}"),
    }
    assert_eq!(harness.handle.current_action(HERO).await.unwrap(), None);
    assert_eq!(harness.actors.stat(HERO, CharacterStat::Intelligence), 0);
}

#[tokio::test]
async fn stopping_tracked_instance_keeps_paid_costs() {
    let mut harness = Harness::new(
        vec![collect_dues()],
        InMemoryResources::new(20, 0),
        StaticActorDirectory::new().with_protagonist(HERO, 0.0),
    )
    .await;

    let receipt = harness.handle.invoke("Collect Dues", target()).await.unwrap();
    assert_eq!(harness.money(), 10);

    harness
        .handle
        .stop(receipt.instance)
        .await
        .expect("stop should be accepted");

    let cancelled = harness
        .next_action_event(|event| matches!(event, ActionEvent::Cancelled { .. }))
        .await;
    assert!(matches!(
        cancelled,
        ActionEvent::Cancelled {
            reason: CancelReason::Stopped,
            ..
        }
    ));
    assert_eq!(harness.clock.subscriber_count(), 0);

    assert_eq!(harness.money(), 10);
    assert_eq!(harness.influence(), 0);
    assert_eq!(harness.handle.instance(receipt.instance).await.unwrap(), None);
    assert!(harness.handle.stop(receipt.instance).await.is_err());
}

#[tokio::test]
async fn reverification_answer_after_stop_is_discarded() {
    let resources = Arc::new(InMemoryResources::new(35, 0));
    let store = Arc::new(GatedResources::new(resources.clone(), 1));
    let mut harness = Harness::build(
        vec![collect_dues()],
        EngineConfig::new().with_chance_seed(7),
        store.clone(),
        resources,
        StaticActorDirectory::new().with_protagonist(HERO, 0.0),
    )
    .await;

    let receipt = harness.handle.invoke("Collect Dues", target()).await.unwrap();
    store.drained().await;
    assert_eq!(harness.money(), 25);

    // The cycle completes and its re-verification waits on the gate.
    harness.tick().await;
    let instance = harness
        .handle
        .instance(receipt.instance)
        .await
        .unwrap()
        .expect("still tracked");
    assert_eq!(instance.state(), InstanceState::Reverifying);
    assert_eq!(harness.influence(), 1);

    harness
        .handle
        .stop(receipt.instance)
        .await
        .expect("stop should be accepted");
    let cancelled = harness
        .next_action_event(|event| matches!(event, ActionEvent::Cancelled { .. }))
        .await;
    assert!(matches!(
        cancelled,
        ActionEvent::Cancelled {
            reason: CancelReason::Stopped,
            ..
        }
    ));

    store.release(1);
    store.drained().await;
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(harness.handle.current_action(HERO).await.unwrap(), None);

    while let Ok(event) = harness.actions.try_recv() {
        assert!(
            !matches!(event, Event::Action(ActionEvent::Repeated { .. })),
            "stopped instance repeated: {event:?}"
        );
    }
    assert_eq!(harness.money(), 25);
    assert_eq!(harness.influence(), 1);
    assert_eq!(harness.handle.instance(receipt.instance).await.unwrap(), None);
    assert!(harness.handle.tracked().await.unwrap().repeatable.is_empty());
}

#[tokio::test]
async fn stalled_reverification_cancels_with_timeout() {
    let resources = Arc::new(InMemoryResources::new(35, 0));
    let store = Arc::new(GatedResources::new(resources.clone(), 1));
    let mut harness = Harness::build(
        vec![collect_dues()],
        EngineConfig::new()
            .with_chance_seed(7)
            .with_verification_timeout_ms(30),
        store,
        resources,
        StaticActorDirectory::new().with_protagonist(HERO, 0.0),
    )
    .await;

    let receipt = harness.handle.invoke("Collect Dues", target()).await.unwrap();
    assert_eq!(harness.money(), 25);

    harness.tick().await;
    let cancelled = harness
        .next_action_event(|event| matches!(event, ActionEvent::Cancelled { .. }))
        .await;
    assert_eq!(
        cancelled,
        ActionEvent::Cancelled {
            instance: receipt.instance,
            action: "Collect Dues".into(),
            target: target(),
            reason: CancelReason::Timeout,
        }
    );

    // Effects of the completed cycle stay; the next cost is never paid.
    assert_eq!(harness.influence(), 1);
    assert_eq!(harness.money(), 25);
    assert_eq!(harness.handle.current_action(HERO).await.unwrap(), None);
    assert_eq!(harness.clock.subscriber_count(), 0);
}
