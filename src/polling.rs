// THEORY:
// The polling loop is the live-capture driver: every `period` it grabs a frame from a
// `CaptureAdapter`, runs it through the `CardPipeline`, and hands the areas to a
// `RenderAdapter`.
//
// One cycle always runs to completion before the next tick is awaited. Ticks that
// fall due while a cycle is still busy are skipped rather than queued, so a slow
// frame never causes a burst of catch-up cycles. A frame the pipeline rejects is
// logged and dropped; capture and render failures end the loop.

use crate::adapters::{CaptureAdapter, RenderAdapter};
use crate::error::AdapterError;
use crate::pipeline::CardPipeline;
use std::time::Duration;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info, warn};

/// How often a frame is grabbed when no period is configured.
pub const DEFAULT_POLL_PERIOD: Duration = Duration::from_millis(200);

/// Shortest period the loop accepts. `tokio::time::interval` rejects a zero period.
pub const MIN_POLL_PERIOD: Duration = Duration::from_millis(1);

/// Counters for one run of the loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopStats {
    pub frames_rendered: u64,
    pub frames_dropped: u64,
}

pub struct PollingLoop {
    pipeline: CardPipeline,
    period: Duration,
    max_cycles: Option<u64>,
}

impl PollingLoop {
    pub fn new(pipeline: CardPipeline) -> Self {
        Self {
            pipeline,
            period: DEFAULT_POLL_PERIOD,
            max_cycles: None,
        }
    }

    /// Sets the tick period, clamped to at least `MIN_POLL_PERIOD`.
    pub fn with_period(mut self, period: Duration) -> Self {
        self.period = period.max(MIN_POLL_PERIOD);
        self
    }

    /// Stops after this many cycles even if the capture source has more frames.
    pub fn with_max_cycles(mut self, max_cycles: u64) -> Self {
        self.max_cycles = Some(max_cycles);
        self
    }

    /// Runs until the capture source is exhausted or `max_cycles` is reached.
    pub async fn run<C, R>(&self, capture: &mut C, render: &mut R) -> Result<LoopStats, AdapterError>
    where
        C: CaptureAdapter,
        R: RenderAdapter,
    {
        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut stats = LoopStats::default();
        info!(period_ms = self.period.as_millis() as u64, "polling loop started");

        let mut cycle = 0u64;
        while self.max_cycles.is_none_or(|max| cycle < max) {
            ticker.tick().await;
            cycle += 1;

            let Some(frame) = capture.capture()? else {
                debug!(cycle, "capture source exhausted");
                break;
            };

            match self
                .pipeline
                .process_frame(&frame.data, frame.width, frame.height)
            {
                Ok(areas) => {
                    render.render(&frame, &areas)?;
                    stats.frames_rendered += 1;
                }
                Err(e) => {
                    warn!(cycle, error = %e, "dropping frame");
                    stats.frames_dropped += 1;
                }
            }
        }

        info!(
            rendered = stats.frames_rendered,
            dropped = stats.frames_dropped,
            "polling loop finished"
        );
        Ok(stats)
    }
}
