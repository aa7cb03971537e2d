//! Concurrent frame evaluation
//!
//! Every frame is scored through a [`FrameScorer`] with at most `workers`
//! calls in flight. The permits belong to the evaluator, so the cap holds
//! across back-to-back evaluations too. Results are consumed by a single
//! loop that owns the [`FrameTally`], so no counter is ever shared between
//! tasks.
//!
//! In first-hit mode the first `Yes` ends the run: a cancel flag stops
//! queued frames from being scored and in-flight calls are aborted, their
//! results discarded.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::domain::model::*;
use crate::domain::rules::VerdictRules;
use crate::ports::FrameScorer;

/// Scores a frame sequence and reduces it to one verdict
pub struct FrameEvaluator {
    scorer: Arc<dyn FrameScorer>,
    workers: usize,
    permits: Arc<Semaphore>,
    mode: AggregationMode,
}

impl FrameEvaluator {
    /// `workers` is clamped to at least one
    pub fn new(scorer: Arc<dyn FrameScorer>, workers: usize, mode: AggregationMode) -> Self {
        let workers = workers.max(1);
        Self {
            scorer,
            workers,
            permits: Arc::new(Semaphore::new(workers)),
            mode,
        }
    }

    pub fn mode(&self) -> AggregationMode {
        self.mode
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Evaluate all frames. An empty sequence is `No`.
    pub async fn evaluate(&self, frames: Vec<Frame>) -> FrameReport {
        if frames.is_empty() {
            info!("No frames to evaluate");
            return FrameReport::empty(self.mode);
        }

        let started = Instant::now();
        let dispatched = frames.len();
        info!(
            "Evaluating {} frames with {} workers ({} mode)",
            dispatched,
            self.workers.min(dispatched),
            self.mode.name()
        );

        let cancelled = Arc::new(AtomicBool::new(false));
        let mut join_set = JoinSet::new();

        for frame in frames {
            let scorer = Arc::clone(&self.scorer);
            let semaphore = Arc::clone(&self.permits);
            let cancelled = Arc::clone(&cancelled);

            join_set.spawn(async move {
                let _permit = semaphore.acquire_owned().await.ok()?;
                if cancelled.load(Ordering::Acquire) {
                    return None;
                }
                let index = frame.index;
                let assessment = scorer.score_frame(frame).await;
                Some((index, assessment))
            });
        }

        let mut tally = FrameTally::new();
        let mut first_hit = None;

        while let Some(joined) = join_set.join_next().await {
            let (index, assessment) = match joined {
                Ok(Some(outcome)) => outcome,
                Ok(None) => continue,
                Err(e) => {
                    warn!("Frame task failed: {}", e);
                    tally.record(Verdict::Error);
                    continue;
                }
            };

            info!(frame = index, verdict = %assessment.verdict, "Frame evaluated");
            if let Some(reply) = &assessment.reply {
                debug!(frame = index, reply = %reply, "Frame reply");
            }
            tally.record(assessment.verdict);

            if matches!(self.mode, AggregationMode::FirstHit) && assessment.verdict.is_yes() {
                first_hit = Some(index);
                cancelled.store(true, Ordering::Release);
                join_set.abort_all();
                break;
            }
        }

        let verdict = match self.mode {
            AggregationMode::FirstHit if first_hit.is_some() => Verdict::Yes,
            AggregationMode::FirstHit => Verdict::No,
            AggregationMode::Threshold(policy) => VerdictRules::decide_threshold(&tally, &policy),
        };

        let report = FrameReport {
            verdict,
            mode: self.mode,
            tally,
            dispatched,
            first_hit,
        };

        match (report.mode, report.first_hit) {
            (AggregationMode::FirstHit, Some(index)) => info!(
                "Frame {} violates policy, {} frames abandoned",
                index,
                report.abandoned()
            ),
            (AggregationMode::Threshold(policy), _) => info!(
                "{} of {} valid frames flagged ({}), threshold {}%, {} errors",
                tally.yes_count(),
                tally.valid(),
                tally
                    .percentage()
                    .map(|pct| format!("{:.1}%", pct))
                    .unwrap_or_else(|| "n/a".to_string()),
                policy.percent(),
                tally.errors()
            ),
            _ => {}
        }
        info!(
            "Frame verdict: {} in {:.2}s",
            report.verdict,
            started.elapsed().as_secs_f64()
        );

        report
    }
}
