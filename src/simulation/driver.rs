//! Async frame loop for a mounted map view
//!
//! One task owns the view and multiplexes item snapshots, frame ticks and
//! the shutdown signal with a biased `select!`. Each branch runs to
//! completion before the next is polled, and item changes are polled ahead
//! of ticks.

use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{interval, Instant, MissedTickBehavior};

use crate::city::MapItem;
use crate::render::RenderSink;
use crate::simulation::view::MapView;

/// Totals reported when the loop stops
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FrameSummary {
    pub frames: u64,
    pub reconciliations: u64,
    pub arrivals: u64,
}

/// Drive `view` until `shutdown` turns true or its sender is dropped
///
/// The view is torn down before this returns, whichever way the loop ends.
pub async fn run_frames<S: RenderSink>(
    mut view: MapView<S>,
    frame_interval: Duration,
    mut items: watch::Receiver<Vec<MapItem>>,
    mut shutdown: watch::Receiver<bool>,
) -> FrameSummary {
    let mut summary = FrameSummary::default();
    let started = Instant::now();
    let mut frames = interval(frame_interval);
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let initial = items.borrow_and_update().clone();
    if !view.set_items(&initial).unchanged {
        summary.reconciliations += 1;
    }

    let mut items_open = true;
    loop {
        if *shutdown.borrow() {
            break;
        }

        tokio::select! {
            biased;

            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
            changed = items.changed(), if items_open => {
                match changed {
                    Ok(()) => {
                        let snapshot = items.borrow_and_update().clone();
                        if !view.set_items(&snapshot).unchanged {
                            summary.reconciliations += 1;
                        }
                    }
                    Err(_) => {
                        tracing::debug!("item sender dropped, keeping last snapshot");
                        items_open = false;
                    }
                }
            }
            _ = frames.tick() => {
                let now_ms = started.elapsed().as_secs_f64() * 1000.0;
                let report = view.tick(now_ms);
                summary.frames += 1;
                summary.arrivals += report.arrived as u64;
            }
        }
    }

    view.teardown();
    tracing::info!(
        frames = summary.frames,
        reconciliations = summary.reconciliations,
        "frame loop stopped"
    );
    summary
}
