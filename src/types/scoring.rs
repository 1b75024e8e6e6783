use serde::{Deserialize, Serialize};

/// A normalized [0,1] scalar summarizing one heuristic facet of evidence.
pub type Signal = f32;

/// Raw feature values fed to the score combinator. Each is clamped to
/// [0,1] before weighting; `commit_burst` is already the blended
/// `max(burst, bulk * 0.8)` value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureInputs {
    pub config: Signal,
    pub commit_language: Signal,
    pub commit_burst: Signal,
    pub comment: Signal,
    pub repetition: Signal,
    pub structure: Signal,
}

impl FeatureInputs {
    /// Signal list used for evidence-strength accounting, in fixed order.
    pub fn as_list(&self) -> [Signal; 6] {
        [
            self.config,
            self.commit_language,
            self.commit_burst,
            self.comment,
            self.repetition,
            self.structure,
        ]
    }
}
