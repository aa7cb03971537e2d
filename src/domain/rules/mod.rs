// Domain rules - Verdict reduction policies

use crate::domain::model::*;

/// Rules for turning per-unit verdicts into a decision
pub struct VerdictRules;

impl VerdictRules {
    /// Decide a threshold-mode run from its final tally.
    ///
    /// A run with no valid frames is `No`.
    pub fn decide_threshold(tally: &FrameTally, policy: &ThresholdPolicy) -> Verdict {
        if policy.is_met(tally.yes_count(), tally.valid()) {
            Verdict::Yes
        } else {
            Verdict::No
        }
    }

    /// OR of the text and frame verdicts. Only an explicit Yes counts; an
    /// Error on either side is treated as not-Yes.
    pub fn combine(text: Verdict, frames: Verdict) -> FinalVerdict {
        if text.is_yes() || frames.is_yes() {
            FinalVerdict::Yes
        } else {
            FinalVerdict::No
        }
    }

    /// `combine` over raw backend replies
    pub fn combine_replies(text: &str, frames: &str) -> FinalVerdict {
        Self::combine(Verdict::from_reply(text), Verdict::from_reply(frames))
    }
}
