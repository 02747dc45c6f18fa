//! `hunt` - replay location fixes against the placed treasures.
//!
//! Fixes are newline-delimited JSON read from `--fixes FILE` or stdin.
//!
//! A file is a recording, so it is replayed at the pace it was recorded:
//! fixes with timestamps keep their recorded gaps, others are spaced just
//! past the debounce interval. Stdin is treated as a live feed and read as
//! it arrives.
//!
//! When fixes come from a file, a found treasure pauses the hunt until Enter
//! is pressed on stdin; if stdin closes first the hunt ends. When fixes come
//! from stdin, or with `--auto-ack`, finds are acknowledged immediately.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::AsyncBufReadExt;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use treasure_hunt::location::{forward_fixes, forward_fixes_paced, JsonLinesSource, ReplayPace};
use treasure_hunt::session::{HuntEvent, HuntHandle, HuntSession, HuntSessionConfig, HuntSummary};
use treasure_hunt::store::{BackgroundStore, TreasureStore};
use treasure_hunt::tracker::{ProximityTracker, SystemClock, TrackerConfig};

use super::common::Context;
use crate::error::CliError;

/// Buffered fixes between the reader thread and the session.
const FIX_CHANNEL_CAPACITY: usize = 256;

/// Added to the debounce interval when spacing untimestamped replayed fixes,
/// so delivery jitter cannot land them inside the window.
const REPLAY_MARGIN: Duration = Duration::from_millis(50);

/// Run a hunt to completion.
pub fn run(ctx: &Context, fixes: Option<PathBuf>, auto_ack: bool) -> Result<(), CliError> {
    let input: Box<dyn BufRead + Send> = match &fixes {
        Some(path) => {
            let file = File::open(path).map_err(|error| CliError::FileRead {
                path: path.display().to_string(),
                error,
            })?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(BufReader::new(io::stdin())),
    };

    // Stdin can't carry both fixes and keypresses
    let interactive = fixes.is_some() && !auto_ack;
    let pace = fixes
        .is_some()
        .then(|| replay_pace(&ctx.config.tracker_config()));

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::Runtime(e.to_string()))?;

    let result = runtime.block_on(hunt(ctx, input, pace, interactive));
    // A pending stdin read would otherwise block runtime drop
    runtime.shutdown_background();

    if let Some(summary) = result? {
        println!();
        println!(
            "Hunt over: {} fix(es), {} evaluated, {} rejected, {} found",
            summary.fixes_received,
            summary.fixes_evaluated,
            summary.fixes_rejected,
            summary.found.len()
        );
    }
    Ok(())
}

/// Pacing for a recorded fix file.
fn replay_pace(config: &TrackerConfig) -> ReplayPace {
    ReplayPace::new(config.debounce_interval + REPLAY_MARGIN)
}

async fn hunt(
    ctx: &Context,
    input: Box<dyn BufRead + Send>,
    pace: Option<ReplayPace>,
    interactive: bool,
) -> Result<Option<HuntSummary>, CliError> {
    let file_store: Arc<dyn TreasureStore> = Arc::new(ctx.open_store());
    let (failure_tx, failure_rx) = mpsc::unbounded_channel();
    let (store, store_worker) = BackgroundStore::spawn(file_store, Some(failure_tx));

    let mut tracker = ProximityTracker::with_config(
        Arc::new(store),
        Arc::new(SystemClock),
        ctx.config.tracker_config(),
    );

    let remaining = tracker.load_from_store()?;
    if remaining == 0 {
        println!("No treasures to find. Hide one with 'treasure-hunt place'.");
        return Ok(None);
    }

    let session = HuntSession::new(
        tracker,
        HuntSessionConfig {
            auto_acknowledge: !interactive,
            ..Default::default()
        },
    );
    let handle = session.handle();
    let mut events = handle.subscribe();

    let (fix_tx, fix_rx) = mpsc::channel(FIX_CHANNEL_CAPACITY);
    let reader = tokio::task::spawn_blocking(move || {
        let source = JsonLinesSource::new(input);
        match pace {
            Some(pace) => forward_fixes_paced(source, fix_tx, pace),
            None => forward_fixes(source, fix_tx),
        }
    });

    let session_task = session.spawn(fix_rx, Some(failure_rx));

    let mut keypresses = interactive.then(|| tokio::spawn(acknowledge_on_enter(handle.clone())));
    let mut stdin_open = keypresses.is_some();
    let mut find_pending = false;

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(HuntEvent::Stopped) => break,
                Ok(event) => {
                    match &event {
                        HuntEvent::Found { .. } => find_pending = true,
                        HuntEvent::Acknowledged { .. } => find_pending = false,
                        _ => {}
                    }
                    if let Some(line) = render_event(&event, interactive) {
                        println!("{}", line);
                    }
                    if interactive && find_pending && !stdin_open {
                        end_unacknowledged(&handle);
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Display fell behind, skipped hunt events");
                }
                Err(RecvError::Closed) => break,
            },

            _ = keypresses_done(&mut keypresses), if stdin_open => {
                stdin_open = false;
                if find_pending {
                    end_unacknowledged(&handle);
                }
            }
        }
    }

    if let Some(task) = keypresses {
        task.abort();
    }

    let summary = session_task
        .await
        .map_err(|e| CliError::Runtime(e.to_string()))?;

    // The session dropped its tracker, so the worker drains and exits
    if let Err(e) = store_worker.await {
        tracing::warn!(error = %e, "Store worker ended abnormally");
    }

    match reader.await {
        Ok(forwarded) => tracing::debug!(forwarded, "Location source finished"),
        Err(e) => tracing::warn!(error = %e, "Location reader ended abnormally"),
    }

    Ok(Some(summary))
}

/// Acknowledge a find for every line read from stdin, until stdin closes.
async fn acknowledge_on_enter(handle: HuntHandle) {
    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    while let Ok(Some(_)) = lines.next_line().await {
        if !handle.acknowledge() {
            return;
        }
    }
    tracing::debug!("Stdin closed, no further acknowledgments");
}

async fn keypresses_done(task: &mut Option<JoinHandle<()>>) {
    match task {
        Some(task) => {
            let _ = task.await;
        }
        None => std::future::pending().await,
    }
}

/// A find is waiting for Enter but nothing can deliver it.
fn end_unacknowledged(handle: &HuntHandle) {
    println!("Stdin closed before the find was acknowledged, ending hunt.");
    tracing::info!("Ending hunt with an unacknowledged find");
    handle.shutdown();
}

/// Text shown for a session event, if any.
fn render_event(event: &HuntEvent, interactive: bool) -> Option<String> {
    match event {
        HuntEvent::Started { remaining } => {
            Some(format!("Hunting {} treasure(s)...", remaining))
        }
        HuntEvent::Distance {
            meters,
            hint,
            remaining,
        } => Some(format!(
            "Nearest treasure: {:.1} m  {}  ({} remaining)",
            meters, hint, remaining
        )),
        HuntEvent::Found { treasure, distance } => {
            let mut text = format!(
                "*** Treasure found! \"{}\" ({:.2} m away) ***",
                treasure.id, distance
            );
            if interactive {
                text.push_str("\nPress Enter to keep hunting.");
            }
            Some(text)
        }
        HuntEvent::StoreFailed { treasure, error } => Some(match treasure {
            Some(id) => format!("Warning: could not save \"{}\": {}", id, error),
            None => format!("Warning: treasure store unavailable: {}", error),
        }),
        HuntEvent::Acknowledged { remaining, .. } if *remaining > 0 => {
            Some(format!("{} treasure(s) left.", remaining))
        }
        HuntEvent::Acknowledged { .. } => None,
        HuntEvent::Exhausted => Some("Congratulations! You found all the treasures!".to_string()),
        HuntEvent::FixRejected { reason } => Some(format!("Ignoring fix: {}", reason)),
        HuntEvent::Stopped => None,
    }
}
