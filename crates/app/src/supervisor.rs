//! Controller supervisor: one periodic task per configured controller.
//!
//! Each controller gets its own [`ControlEngine`] driven by a
//! [`tokio::time::interval`]. Ticks of one controller never overlap: a tick
//! that runs late makes the interval skip the missed slots rather than
//! bursting. The latest successful [`TickSnapshot`] is published on a
//! `watch` channel so readers always see the newest value.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use dryplug_domain::controller::ControllerConfig;
use dryplug_domain::error::{DryPlugError, NotFoundError, ValidationError};
use dryplug_domain::id::ControllerKey;
use dryplug_domain::snapshot::TickSnapshot;

use crate::engine::ControlEngine;
use crate::ports::{ActuatorGateway, Clock, EngineStateStore, SensorGateway};

/// Default polling period between two ticks of the same controller.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Read-only view of a supervised controller.
#[derive(Debug, Clone)]
pub struct ControllerView {
    pub config: Arc<ControllerConfig>,
    /// Latest successful tick, `None` until the first one.
    pub snapshot: Option<TickSnapshot>,
}

struct ControllerHandle {
    config: Arc<ControllerConfig>,
    snapshots: watch::Receiver<Option<TickSnapshot>>,
    task: JoinHandle<()>,
}

type Table = HashMap<ControllerKey, ControllerHandle>;

/// Owns the per-controller tasks and the lookup table used by the outer
/// surfaces.
pub struct ControllerSupervisor<S, A, St, C> {
    sensors: Arc<S>,
    actuator: Arc<A>,
    store: Arc<St>,
    clock: Arc<C>,
    poll_interval: Duration,
    controllers: RwLock<Table>,
}

impl<S, A, St, C> ControllerSupervisor<S, A, St, C>
where
    S: SensorGateway + Send + Sync + 'static,
    A: ActuatorGateway + Send + Sync + 'static,
    St: EngineStateStore + Send + Sync + 'static,
    C: Clock + Send + Sync + 'static,
{
    pub fn new(
        sensors: Arc<S>,
        actuator: Arc<A>,
        store: Arc<St>,
        clock: Arc<C>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            sensors,
            actuator,
            store,
            clock,
            poll_interval,
            controllers: RwLock::new(HashMap::new()),
        }
    }

    /// Restore the controller's persisted state and start ticking it.
    ///
    /// The first tick runs immediately.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::DuplicateController`] when a controller
    /// with the same key is already supervised.
    pub async fn spawn(&self, config: ControllerConfig) -> Result<(), DryPlugError> {
        if self.read().contains_key(&config.key) {
            return Err(ValidationError::DuplicateController(config.key.to_string()).into());
        }

        let config = Arc::new(config);
        let mut engine = ControlEngine::new(
            ControllerConfig::clone(&config),
            Arc::clone(&self.sensors),
            Arc::clone(&self.actuator),
            Arc::clone(&self.store),
        );
        engine.hydrate().await;

        let (tx, rx) = watch::channel(None);
        let mut table = self.write();
        // Another spawn of the same key may have won while hydrating.
        if table.contains_key(&config.key) {
            return Err(ValidationError::DuplicateController(config.key.to_string()).into());
        }
        let task = tokio::spawn(run_controller(
            engine,
            Arc::clone(&self.clock),
            self.poll_interval,
            tx,
        ));
        tracing::info!(
            controller = %config.key,
            name = %config.name,
            interval_secs = self.poll_interval.as_secs(),
            "controller started"
        );
        table.insert(
            config.key.clone(),
            ControllerHandle {
                config,
                snapshots: rx,
                task,
            },
        );
        Ok(())
    }

    /// Latest snapshot of one controller.
    ///
    /// # Errors
    ///
    /// Returns [`DryPlugError::NotFound`] if the key is not supervised.
    pub fn get(&self, key: &ControllerKey) -> Result<ControllerView, DryPlugError> {
        self.read()
            .get(key)
            .map(ControllerHandle::view)
            .ok_or_else(|| not_found(key))
    }

    /// Every supervised controller, ordered by key.
    pub fn list(&self) -> Vec<ControllerView> {
        let mut views: Vec<_> = self.read().values().map(ControllerHandle::view).collect();
        views.sort_by(|a, b| a.config.key.cmp(&b.config.key));
        views
    }

    /// Subscribe to the snapshots of one controller.
    pub fn subscribe(&self, key: &ControllerKey) -> Option<watch::Receiver<Option<TickSnapshot>>> {
        self.read().get(key).map(|handle| handle.snapshots.clone())
    }

    /// Turn a controller's auto-control toggle on or off.
    ///
    /// # Errors
    ///
    /// Returns [`DryPlugError::NotFound`] for an unknown key, or the
    /// actuator's error when the toggle could not be switched.
    pub async fn set_auto_control(&self, key: &ControllerKey, on: bool) -> Result<(), DryPlugError> {
        let entity = self
            .read()
            .get(key)
            .map(|handle| handle.config.auto_control_entity())
            .ok_or_else(|| not_found(key))?;
        self.actuator.set_switch(&entity, on).await?;
        tracing::info!(controller = %key, on, "auto-control toggled");
        Ok(())
    }

    /// Stop a controller and forget its persisted state.
    ///
    /// # Errors
    ///
    /// Returns [`DryPlugError::NotFound`] for an unknown key, or the store's
    /// error when the persisted state could not be deleted.
    pub async fn remove(&self, key: &ControllerKey) -> Result<(), DryPlugError> {
        let handle = self.write().remove(key).ok_or_else(|| not_found(key))?;
        handle.stop().await;
        self.store.delete(&key.storage_key()).await?;
        tracing::info!(controller = %key, "controller removed");
        Ok(())
    }

    /// Stop every controller task. Persisted state is kept.
    pub async fn shutdown(&self) {
        let handles: Vec<_> = self.write().drain().map(|(_, handle)| handle).collect();
        let count = handles.len();
        for handle in handles {
            handle.stop().await;
        }
        tracing::info!(count, "controllers stopped");
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Table> {
        self.controllers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Table> {
        self.controllers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl<S, A, St, C> Drop for ControllerSupervisor<S, A, St, C> {
    fn drop(&mut self) {
        let table = self
            .controllers
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        for handle in table.values() {
            handle.task.abort();
        }
    }
}

impl ControllerHandle {
    fn view(&self) -> ControllerView {
        ControllerView {
            config: Arc::clone(&self.config),
            snapshot: *self.snapshots.borrow(),
        }
    }

    async fn stop(self) {
        self.task.abort();
        // Cancellation is the expected outcome.
        let _ = self.task.await;
    }
}

fn not_found(key: &ControllerKey) -> DryPlugError {
    NotFoundError {
        entity: "Controller",
        id: key.to_string(),
    }
    .into()
}

async fn run_controller<S, A, St, C>(
    mut engine: ControlEngine<Arc<S>, Arc<A>, Arc<St>>,
    clock: Arc<C>,
    period: Duration,
    snapshots: watch::Sender<Option<TickSnapshot>>,
) where
    S: SensorGateway + Send + Sync,
    A: ActuatorGateway + Send + Sync,
    St: EngineStateStore + Send + Sync,
    C: Clock,
{
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;
        match engine.tick(clock.now()).await {
            Ok(snapshot) => {
                tracing::debug!(
                    controller = %engine.config().key,
                    status = %snapshot.status(),
                    "tick completed"
                );
                snapshots.send_replace(Some(snapshot));
            }
            Err(err) if err.is_transient() => {
                tracing::warn!(
                    controller = %engine.config().key,
                    error = ?err,
                    "skipping tick, readings unusable"
                );
            }
            Err(err) => {
                tracing::error!(
                    controller = %engine.config().key,
                    error = ?err,
                    "tick failed"
                );
            }
        }
    }
}
