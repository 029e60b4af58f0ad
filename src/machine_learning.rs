use anyhow::Result;
use async_trait::async_trait;

/// Optional text-classification capability, injected into the scanner at
/// construction. Implementations may call out to a model service; the
/// scanner swallows every failure, so an implementation can simply return
/// errors when the backend is down.
#[async_trait]
pub trait TextClassifier: Send + Sync {
    /// Phishing probability for the given text, in [0, 1].
    async fn score_text(&self, text: &str) -> Result<f64>;
}

/// Default hook: contributes nothing, never fails. Keeps the scoring
/// pipeline deterministic when no model is wired up.
#[derive(Debug, Default)]
pub struct NoopClassifier;

#[async_trait]
impl TextClassifier for NoopClassifier {
    async fn score_text(&self, _text: &str) -> Result<f64> {
        Ok(0.0)
    }
}
