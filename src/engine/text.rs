//! Transcript evaluation

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::model::Assessment;
use crate::ports::TextScorer;

/// Judges a transcript against the text policy
pub struct TextEvaluator {
    scorer: Arc<dyn TextScorer>,
}

impl TextEvaluator {
    pub fn new(scorer: Arc<dyn TextScorer>) -> Self {
        Self { scorer }
    }

    /// Empty or whitespace-only text is `No` without consulting the scorer
    pub async fn evaluate(&self, text: &str) -> Assessment {
        if text.trim().is_empty() {
            debug!("Transcript is empty, skipping text check");
            return Assessment::no();
        }

        let assessment = self.scorer.score_text(text).await;
        info!("Text verdict: {}", assessment.verdict);
        assessment
    }
}
