//! Async driver that feeds a fix stream into a proximity tracker.

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

use super::events::{HuntCommand, HuntEvent, HuntSummary};
use crate::location::RawFix;
use crate::store::PersistFailure;
use crate::tracker::{HuntPhase, ProximityHint, ProximityTracker, UpdateOutcome};

/// Default capacity of the event broadcast channel.
pub const DEFAULT_EVENT_CAPACITY: usize = 64;

/// Configuration for a hunt session.
#[derive(Debug, Clone)]
pub struct HuntSessionConfig {
    /// Acknowledge found treasures immediately instead of waiting for the UI.
    pub auto_acknowledge: bool,
    /// Capacity of the event broadcast channel.
    pub event_capacity: usize,
}

impl Default for HuntSessionConfig {
    fn default() -> Self {
        Self {
            auto_acknowledge: false,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

/// Handle for talking to a running hunt session.
///
/// Cheap to clone. Commands are fire-and-forget; results arrive as
/// [`HuntEvent`]s on [`subscribe`](Self::subscribe).
#[derive(Debug, Clone)]
pub struct HuntHandle {
    commands: mpsc::UnboundedSender<HuntCommand>,
    events: broadcast::Sender<HuntEvent>,
}

impl HuntHandle {
    /// Subscribe to session events.
    pub fn subscribe(&self) -> broadcast::Receiver<HuntEvent> {
        self.events.subscribe()
    }

    /// Send a command. Returns false if the session has ended.
    pub fn send(&self, command: HuntCommand) -> bool {
        self.commands.send(command).is_ok()
    }

    /// Dismiss the found treasure.
    pub fn acknowledge(&self) -> bool {
        self.send(HuntCommand::Acknowledge)
    }

    /// Re-seed the hunt from the store.
    pub fn reload(&self) -> bool {
        self.send(HuntCommand::Reload)
    }

    /// End the session.
    pub fn shutdown(&self) -> bool {
        self.send(HuntCommand::Shutdown)
    }
}

/// A hunt session: one tracker, one fix stream, many event subscribers.
///
/// # Usage
///
/// ```ignore
/// let session = HuntSession::new(tracker, HuntSessionConfig::default());
/// let handle = session.handle();
/// let mut events = handle.subscribe();
/// let task = session.spawn(fix_rx, None);
///
/// while let Ok(event) = events.recv().await {
///     if let HuntEvent::Found { treasure, .. } = event {
///         println!("Found {}", treasure.id);
///         handle.acknowledge();
///     }
/// }
/// let summary = task.await?;
/// ```
///
/// Without `auto_acknowledge`, a find stops the session reading fixes until
/// [`HuntHandle::acknowledge`] (or a reset). Fixes delivered meanwhile stay
/// queued in the channel, so a closed stream does not end the session while
/// a find is pending.
///
/// The session ends when the fix stream closes or on
/// [`HuntCommand::Shutdown`]; either way the tracker is reset.
pub struct HuntSession {
    tracker: ProximityTracker,
    config: HuntSessionConfig,
    commands_rx: mpsc::UnboundedReceiver<HuntCommand>,
    handle: HuntHandle,
}

impl HuntSession {
    /// Wrap a tracker. The tracker should already be initialized.
    pub fn new(tracker: ProximityTracker, config: HuntSessionConfig) -> Self {
        let (commands, commands_rx) = mpsc::unbounded_channel();
        let (events, _) = broadcast::channel(config.event_capacity.max(1));
        Self {
            tracker,
            config,
            commands_rx,
            handle: HuntHandle { commands, events },
        }
    }

    /// Get a handle to the session. Subscribe before spawning to see
    /// the initial [`HuntEvent::Started`].
    pub fn handle(&self) -> HuntHandle {
        self.handle.clone()
    }

    /// Run the session on the current Tokio runtime.
    ///
    /// `failures` carries mark-found errors from a
    /// [`BackgroundStore`](crate::store::BackgroundStore) worker.
    pub fn spawn(
        self,
        fixes: mpsc::Receiver<RawFix>,
        failures: Option<mpsc::UnboundedReceiver<PersistFailure>>,
    ) -> JoinHandle<HuntSummary> {
        tokio::spawn(self.run(fixes, failures))
    }

    /// Run the session to completion on the calling task.
    pub async fn run(
        mut self,
        mut fixes: mpsc::Receiver<RawFix>,
        mut failures: Option<mpsc::UnboundedReceiver<PersistFailure>>,
    ) -> HuntSummary {
        let mut summary = HuntSummary::default();

        tracing::info!(remaining = self.tracker.remaining(), "Hunt session started");
        self.emit(HuntEvent::Started {
            remaining: self.tracker.remaining(),
        });

        loop {
            tokio::select! {
                biased;

                command = self.commands_rx.recv() => {
                    match command {
                        Some(HuntCommand::Shutdown) | None => break,
                        Some(command) => self.handle_command(command),
                    }
                }

                failure = recv_failure(&mut failures) => {
                    match failure {
                        Some(failure) => self.emit(HuntEvent::StoreFailed {
                            treasure: Some(failure.id),
                            error: failure.error,
                        }),
                        // Worker gone; stop polling it
                        None => failures = None,
                    }
                }

                // Unread fixes stay queued until the find is acknowledged
                fix = fixes.recv(), if !self.awaiting_acknowledge() => {
                    match fix {
                        Some(fix) => self.handle_fix(fix, &mut summary),
                        None => {
                            tracing::debug!("Fix stream closed");
                            break;
                        }
                    }
                }
            }
        }

        self.tracker.reset();
        self.emit(HuntEvent::Stopped);
        tracing::info!(
            fixes_received = summary.fixes_received,
            fixes_evaluated = summary.fixes_evaluated,
            fixes_rejected = summary.fixes_rejected,
            found = summary.found.len(),
            "Hunt session ended"
        );

        summary
    }

    fn awaiting_acknowledge(&self) -> bool {
        !self.config.auto_acknowledge && self.tracker.phase() == HuntPhase::Found
    }

    fn handle_fix(&mut self, fix: RawFix, summary: &mut HuntSummary) {
        summary.fixes_received += 1;

        let outcome = self.tracker.on_raw_fix(fix);
        if outcome.was_evaluated() {
            summary.fixes_evaluated += 1;
        }

        match outcome {
            UpdateOutcome::Rejected(e) => {
                summary.fixes_rejected += 1;
                self.emit(HuntEvent::FixRejected {
                    reason: e.to_string(),
                });
            }
            UpdateOutcome::Evaluated { nearest_distance } => {
                let config = self.tracker.config();
                let hint = ProximityHint::from_distance(
                    nearest_distance,
                    config.find_radius_m,
                    config.warm_radius_m,
                );
                self.emit(HuntEvent::Distance {
                    meters: nearest_distance,
                    hint,
                    remaining: self.tracker.remaining(),
                });
            }
            UpdateOutcome::Found {
                treasure,
                distance,
                persisted,
            } => {
                summary.found.push(treasure.id.clone());
                let id = treasure.id.clone();
                self.emit(HuntEvent::Found { treasure, distance });

                if !persisted {
                    self.emit(HuntEvent::StoreFailed {
                        treasure: Some(id),
                        error: "failed to mark treasure as found".to_string(),
                    });
                }

                if self.config.auto_acknowledge {
                    self.acknowledge();
                }
            }
            UpdateOutcome::Idle | UpdateOutcome::Paused | UpdateOutcome::Debounced => {}
        }
    }

    fn handle_command(&mut self, command: HuntCommand) {
        match command {
            HuntCommand::Acknowledge => self.acknowledge(),
            HuntCommand::Reload => match self.tracker.load_from_store() {
                Ok(remaining) => self.emit(HuntEvent::Started { remaining }),
                Err(e) => self.emit(HuntEvent::StoreFailed {
                    treasure: None,
                    error: e.to_string(),
                }),
            },
            HuntCommand::Reset => self.tracker.reset(),
            HuntCommand::Shutdown => {}
        }
    }

    fn acknowledge(&mut self) {
        match self.tracker.acknowledge_found() {
            Ok(treasure) => {
                let remaining = self.tracker.remaining();
                self.emit(HuntEvent::Acknowledged {
                    treasure,
                    remaining,
                });
                if remaining == 0 {
                    tracing::info!("All treasures found");
                    self.emit(HuntEvent::Exhausted);
                }
            }
            Err(e) => tracing::debug!(error = %e, "Ignoring acknowledge"),
        }
    }

    fn emit(&self, event: HuntEvent) {
        // No subscribers is fine
        let _ = self.handle.events.send(event);
    }
}

async fn recv_failure(
    failures: &mut Option<mpsc::UnboundedReceiver<PersistFailure>>,
) -> Option<PersistFailure> {
    match failures {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}
