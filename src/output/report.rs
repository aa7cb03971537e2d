//! Report rendering

use std::fmt::Write;
use std::time::Duration;

use serde::Serialize;

use crate::app::VideoReport;
use crate::domain::model::*;
use crate::error::{ScreenError, ScreenResult};
use crate::output::ReportFormat;
use crate::utils::Utils;

const RULE: &str = "============================================================";

#[derive(Serialize)]
struct ImageReport<'a> {
    image_path: &'a str,
    verdict: Verdict,
    reply: Option<&'a str>,
}

/// Renders reports in the requested format
pub struct ReportRenderer {
    format: ReportFormat,
}

impl ReportRenderer {
    pub fn new(format: ReportFormat) -> Self {
        Self { format }
    }

    /// Render a single-video report
    pub fn render_video(&self, report: &VideoReport) -> ScreenResult<String> {
        match self.format {
            ReportFormat::Text => Ok(Self::video_text(report)),
            _ => self.structured(report),
        }
    }

    /// Render a batch summary
    pub fn render_batch(&self, summary: &BatchSummary) -> ScreenResult<String> {
        match self.format {
            ReportFormat::Text => Ok(Self::batch_text(summary)),
            _ => self.structured(summary),
        }
    }

    /// Render a single-image report
    pub fn render_image(&self, image_path: &str, assessment: &Assessment) -> ScreenResult<String> {
        let report = ImageReport {
            image_path,
            verdict: assessment.verdict,
            reply: assessment.reply.as_deref(),
        };
        match self.format {
            ReportFormat::Text => Ok(Self::image_text(&report)),
            _ => self.structured(&report),
        }
    }

    fn structured<T: Serialize>(&self, value: &T) -> ScreenResult<String> {
        let rendered = match self.format {
            ReportFormat::Yaml => serde_yaml::to_string(value)
                .map_err(|e| ScreenError::decode(format!("failed to render YAML: {}", e)))?,
            _ => serde_json::to_string_pretty(value)
                .map_err(|e| ScreenError::decode(format!("failed to render JSON: {}", e)))?,
        };
        Ok(rendered)
    }

    fn video_text(report: &VideoReport) -> String {
        let frames = &report.frames;
        let tally = &frames.tally;
        let mut out = String::new();

        let _ = writeln!(out, "{}", RULE);
        let _ = writeln!(out, "Video:         {}", report.video_path);
        let _ = writeln!(out, "Text verdict:  {}", report.text.verdict);
        let _ = writeln!(out, "Transcript:    {} characters", report.transcript_chars);
        let _ = writeln!(
            out,
            "Frame verdict: {} ({} mode)",
            frames.verdict,
            frames.mode.name()
        );

        match frames.mode {
            AggregationMode::FirstHit => {
                if let Some(index) = frames.first_hit {
                    let _ = writeln!(
                        out,
                        "  first violating frame: {} ({} of {} frames scored)",
                        index,
                        tally.total(),
                        frames.dispatched
                    );
                } else {
                    let _ = writeln!(
                        out,
                        "  {} frames scored, {} errors",
                        tally.total(),
                        tally.errors()
                    );
                }
            }
            AggregationMode::Threshold(policy) => {
                let _ = writeln!(
                    out,
                    "  {} of {} valid frames flagged ({}), threshold {}%, {} errors",
                    tally.yes_count(),
                    tally.valid(),
                    Utils::format_ratio(tally.yes_count(), tally.valid()),
                    policy.percent(),
                    tally.errors()
                );
            }
        }

        if let Some(path) = &report.kept_audio {
            let _ = writeln!(out, "Audio kept:    {}", path.display());
        }
        let _ = writeln!(
            out,
            "Elapsed:       {}",
            Utils::format_duration(Duration::from_secs_f64(report.elapsed_secs.max(0.0)))
        );
        let _ = writeln!(out, "{}", RULE);
        let _ = writeln!(
            out,
            "FINAL VERDICT: {}",
            if report.final_verdict.is_violation() {
                "VIOLATION (Yes)"
            } else {
                "SAFE (No)"
            }
        );
        out
    }

    fn image_text(report: &ImageReport<'_>) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", RULE);
        let _ = writeln!(out, "Image:         {}", report.image_path);
        let _ = writeln!(out, "Verdict:       {}", report.verdict);
        let _ = writeln!(out, "{}", RULE);
        let _ = writeln!(
            out,
            "FINAL VERDICT: {}",
            if report.verdict == Verdict::Yes {
                "VIOLATION (Yes)"
            } else {
                "SAFE (No)"
            }
        );
        out
    }

    fn batch_text(summary: &BatchSummary) -> String {
        let mut out = String::new();

        let _ = writeln!(out, "{}", RULE);
        let _ = writeln!(out, "Scan results ({} files)", summary.total());
        let _ = writeln!(out, "{}", RULE);
        for entry in &summary.entries {
            let _ = writeln!(out, "{:<6} {}", entry.verdict.as_str(), entry.path);
        }
        let _ = writeln!(out, "{}", RULE);

        let violated = summary.violated();
        let _ = writeln!(out, "Violated: {}", violated.len());
        for entry in &violated {
            let _ = writeln!(out, "  - {}", entry.path);
        }
        let _ = writeln!(out, "Safe:     {}", summary.safe().len());
        let errored = summary.errored();
        let _ = writeln!(out, "Errors:   {}", errored.len());
        for entry in &errored {
            let _ = writeln!(out, "  - {}", entry.path);
        }

        let _ = writeln!(out, "{}", RULE);
        if summary.any_violation() {
            let _ = writeln!(out, "Policy violations found");
        } else {
            let _ = writeln!(out, "No violations found");
        }
        out
    }
}
