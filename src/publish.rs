use crate::types::report::RepoAnalysis;
#[cfg(test)]
use std::sync::Mutex;

/// Best-effort delivery of completed analyses. Publication is
/// fire-and-forget: no acknowledgement, no retry, and a failure to deliver
/// must never surface as an analysis failure.
pub trait ResultSink: Send + Sync {
    fn publish(&self, analysis: &RepoAnalysis);
}

/// Logs each delivery; the default sink for CLI runs.
pub struct LogSink;

impl ResultSink for LogSink {
    fn publish(&self, analysis: &RepoAnalysis) {
        tracing::info!(
            repo = %analysis.repo_id,
            stage = ?analysis.stage,
            score = analysis.slop_score,
            confidence = ?analysis.confidence,
            "analysis published"
        );
    }
}

/// Broadcasts to every registered sink. An empty sink list is not an error.
#[derive(Default)]
pub struct FanoutSink {
    sinks: Vec<Box<dyn ResultSink>>,
}

impl FanoutSink {
    pub fn new(sinks: Vec<Box<dyn ResultSink>>) -> Self {
        Self { sinks }
    }

    pub fn publish(&self, analysis: &RepoAnalysis) {
        for sink in &self.sinks {
            sink.publish(analysis);
        }
    }
}

/// Collects published analyses; test instrumentation.
#[cfg(test)]
#[derive(Default)]
pub struct CollectSink {
    published: Mutex<Vec<RepoAnalysis>>,
}

#[cfg(test)]
impl CollectSink {
    pub fn drain(&self) -> Vec<RepoAnalysis> {
        self.published
            .lock()
            .map(|mut published| published.drain(..).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
impl ResultSink for CollectSink {
    fn publish(&self, analysis: &RepoAnalysis) {
        if let Ok(mut published) = self.published.lock() {
            published.push(analysis.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::report::{CacheMeta, Confidence, Diagnostics, ScoreBreakdown, Stage};
    use chrono::Utc;
    use std::sync::Arc;

    fn record(stage: Stage) -> RepoAnalysis {
        RepoAnalysis {
            repo_id: "octo/slop".to_string(),
            slop_score: 10,
            confidence: Confidence::Low,
            stage,
            indicators: vec![],
            breakdown: ScoreBreakdown::default(),
            contributions: vec![],
            diagnostics: Diagnostics::default(),
            cache: CacheMeta::default(),
            analyzed_at: Utc::now(),
        }
    }

    #[test]
    fn fanout_with_no_sinks_is_a_no_op() {
        let fanout = FanoutSink::default();
        fanout.publish(&record(Stage::Final));
    }

    #[test]
    fn fanout_reaches_every_sink() {
        let first = Arc::new(CollectSink::default());
        let second = Arc::new(CollectSink::default());

        struct Shared(Arc<CollectSink>);
        impl ResultSink for Shared {
            fn publish(&self, analysis: &RepoAnalysis) {
                self.0.publish(analysis);
            }
        }

        let fanout = FanoutSink::new(vec![
            Box::new(Shared(Arc::clone(&first))),
            Box::new(Shared(Arc::clone(&second))),
        ]);
        fanout.publish(&record(Stage::Provisional));
        fanout.publish(&record(Stage::Final));

        assert_eq!(first.drain().len(), 2);
        assert_eq!(second.drain().len(), 2);
    }
}
