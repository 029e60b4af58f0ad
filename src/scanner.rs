use crate::category::{self, CategoryMatch, GENERAL_ICON, GENERAL_LABEL};
use crate::config::EngineConfig;
use crate::domain_utils::DomainUtils;
use crate::explanation::{self, Explanation};
use crate::link_analyzer::{FlaggedUrl, LinkAnalysis, LinkAnalyzer};
use crate::machine_learning::{NoopClassifier, TextClassifier};
use crate::scoring::{self, Calibrator, IdentityCalibrator, RiskBand};
use crate::sender_analyzer::SenderAnalyzer;
use crate::signal::ComponentResult;
use crate::text_analyzer::TextAnalyzer;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use uuid::Uuid;

/// One message to score. Immutable once constructed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanInput {
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub sender_address: Option<String>,
    #[serde(default)]
    pub sender_display_name: Option<String>,
    #[serde(default)]
    pub urls: Vec<String>,
    #[serde(default)]
    pub tenant_id: Option<String>,
}

impl ScanInput {
    fn is_empty(&self) -> bool {
        self.body.trim().is_empty()
            && self.subject.as_deref().map_or(true, |s| s.trim().is_empty())
            && self.urls.is_empty()
    }
}

/// Resolved category for display; "General" when nothing matched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedCategory {
    pub label: String,
    pub icon: String,
}

/// Complete scan verdict. Owned by the caller; the engine keeps nothing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanResult {
    pub scan_id: String,
    pub score: u32,
    pub band: RiskBand,
    pub band_label: String,
    pub band_color: String,
    pub category: ResolvedCategory,
    pub category_match: Option<CategoryMatch>,
    pub explanation: Explanation,
    pub text: ComponentResult,
    pub links: ComponentResult,
    pub sender: ComponentResult,
    pub url_count: usize,
    pub flagged_urls: Vec<FlaggedUrl>,
    pub duration_ms: u64,
    pub timestamp: DateTime<Utc>,
}

/// Sequences the analyzers, classifier, aggregator, and explanation builder
/// for one message. Stateless between calls; safe to share across tasks.
pub struct Scanner {
    config: EngineConfig,
    classifier: Box<dyn TextClassifier>,
    calibrator: Box<dyn Calibrator>,
    text_analyzer: TextAnalyzer,
    link_analyzer: LinkAnalyzer,
    sender_analyzer: SenderAnalyzer,
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new()
    }
}

impl Scanner {
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
            classifier: Box::new(NoopClassifier),
            calibrator: Box::new(IdentityCalibrator),
            text_analyzer: TextAnalyzer::new(),
            link_analyzer: LinkAnalyzer::new(),
            sender_analyzer: SenderAnalyzer::new(),
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_classifier(mut self, classifier: Box<dyn TextClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_calibrator(mut self, calibrator: Box<dyn Calibrator>) -> Self {
        self.calibrator = calibrator;
        self
    }

    /// Score one message. Never fails: malformed fields degrade to penalty
    /// scores, a broken classifier hook contributes nothing, and an entirely
    /// empty input returns the zero/safe result.
    pub async fn analyze(&self, input: &ScanInput) -> ScanResult {
        let started = Instant::now();

        if input.is_empty() {
            log::debug!("Empty scan input, returning safe result");
            return self.empty_result(started);
        }

        let sender_domain = input
            .sender_address
            .as_deref()
            .and_then(DomainUtils::extract_domain);

        let mut text = self.text_analyzer.analyze(
            input.subject.as_deref(),
            &input.body,
            sender_domain.as_deref(),
        );

        // The classifier only ever sees the redacted working copy.
        let combined = match input.subject.as_deref() {
            Some(s) if !s.is_empty() => format!("{s}\n{}", input.body),
            _ => input.body.clone(),
        };
        let redacted = self.text_analyzer.redact_pii(&combined);
        match self.classifier.score_text(&redacted).await {
            Ok(probability) => TextAnalyzer::apply_nlp_score(&mut text, probability),
            Err(e) => log::debug!("Classifier hook unavailable, contributing 0: {e}"),
        }

        let LinkAnalysis {
            result: mut links,
            url_count,
            flagged_urls,
        } = self.link_analyzer.analyze_all(&input.urls);

        let mut sender = self.sender_analyzer.analyze(
            input.sender_address.as_deref(),
            input.sender_display_name.as_deref(),
        );

        text.dedup_flags();
        links.dedup_flags();
        sender.dedup_flags();

        let category_match = category::classify(&redacted, &text, &links, &sender);

        let resolved = self.config.resolve(input.tenant_id.as_deref());
        let score = scoring::aggregate(
            text.score,
            links.score,
            sender.score,
            &resolved.weights,
            self.calibrator.as_ref(),
        );
        let band = RiskBand::for_score(score, &resolved.bands);

        let explanation =
            explanation::build(&text, &links, &sender, category_match.as_ref());

        let category = match &category_match {
            Some(m) => ResolvedCategory {
                label: m.label.clone(),
                icon: m.icon.clone(),
            },
            None => ResolvedCategory {
                label: GENERAL_LABEL.to_string(),
                icon: GENERAL_ICON.to_string(),
            },
        };

        ScanResult {
            scan_id: Uuid::new_v4().to_string(),
            score,
            band,
            band_label: band.label().to_string(),
            band_color: band.color().to_string(),
            category,
            category_match,
            explanation,
            text,
            links,
            sender,
            url_count,
            flagged_urls,
            duration_ms: started.elapsed().as_millis() as u64,
            timestamp: Utc::now(),
        }
    }

    /// Text analysis on its own, for composition and testing.
    pub fn analyze_text(
        &self,
        subject: Option<&str>,
        body: &str,
        sender_domain: Option<&str>,
    ) -> ComponentResult {
        self.text_analyzer.analyze(subject, body, sender_domain)
    }

    pub fn analyze_url(&self, url: &str) -> ComponentResult {
        self.link_analyzer.analyze_url(url)
    }

    pub fn analyze_all_urls(&self, urls: &[String]) -> LinkAnalysis {
        self.link_analyzer.analyze_all(urls)
    }

    pub fn analyze_sender(
        &self,
        address: Option<&str>,
        display_name: Option<&str>,
    ) -> ComponentResult {
        self.sender_analyzer.analyze(address, display_name)
    }

    pub fn classify_category(
        &self,
        text: &str,
        text_result: &ComponentResult,
        link_result: &ComponentResult,
        sender_result: &ComponentResult,
    ) -> Option<CategoryMatch> {
        category::classify(text, text_result, link_result, sender_result)
    }

    fn empty_result(&self, started: Instant) -> ScanResult {
        let text = ComponentResult::empty();
        let links = ComponentResult::empty();
        let sender = ComponentResult::empty();
        let explanation = explanation::build(&text, &links, &sender, None);
        ScanResult {
            scan_id: Uuid::new_v4().to_string(),
            score: 0,
            band: RiskBand::Safe,
            band_label: RiskBand::Safe.label().to_string(),
            band_color: RiskBand::Safe.color().to_string(),
            category: ResolvedCategory {
                label: GENERAL_LABEL.to_string(),
                icon: GENERAL_ICON.to_string(),
            },
            category_match: None,
            explanation,
            text,
            links,
            sender,
            url_count: 0,
            flagged_urls: Vec::new(),
            duration_ms: started.elapsed().as_millis() as u64,
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::FlagCode;
    use anyhow::anyhow;
    use async_trait::async_trait;

    fn phishing_input() -> ScanInput {
        ScanInput {
            body: "URGENT: Act now! Your Bank of America account has been suspended due to \
                   suspicious activity. Click here to verify your account immediately or it \
                   will be closed permanently. - Bank security team"
                .to_string(),
            subject: Some("Account suspended".to_string()),
            sender_address: Some("security@bank-alert.xyz".to_string()),
            sender_display_name: Some("Bank of America".to_string()),
            urls: vec!["http://user@bank-alert-login.xyz/account/verify".to_string()],
            tenant_id: None,
        }
    }

    #[tokio::test]
    async fn phishing_scenario_is_high_risk() {
        let scanner = Scanner::new();
        let result = scanner.analyze(&phishing_input()).await;

        assert_eq!(result.band, RiskBand::HighRisk);
        assert_eq!(result.category.label, "Banking/Financial Scam");
        assert!(result.text.has_flag(FlagCode::Urgency));
        assert!(result.text.has_flag(FlagCode::Action));
        assert!(result.sender.has_flag(FlagCode::SuspiciousSenderTld));
        assert!(result.score >= 70);
        assert_eq!(result.url_count, 1);
    }

    #[tokio::test]
    async fn benign_message_scores_zero() {
        let scanner = Scanner::new();
        let input = ScanInput {
            body: "Weekly standup reminder, see you at 10am".to_string(),
            subject: Some("Standup".to_string()),
            sender_address: Some("colleague@company.com".to_string()),
            sender_display_name: Some("Colleague".to_string()),
            urls: Vec::new(),
            tenant_id: None,
        };
        let result = scanner.analyze(&input).await;

        assert_eq!(result.score, 0);
        assert_eq!(result.band, RiskBand::Safe);
        assert_eq!(result.category.label, "General");
        assert!(result.explanation.findings.is_empty());
    }

    #[tokio::test]
    async fn ip_login_url_scores_55() {
        let scanner = Scanner::new();
        let analysis = scanner.analyze_all_urls(&["http://192.168.1.5/login".to_string()]);
        assert_eq!(analysis.result.score, 55);
        assert_eq!(analysis.result.flags.len(), 2);
        assert_eq!(analysis.url_count, 1);
    }

    #[tokio::test]
    async fn empty_input_is_safe_noop() {
        let scanner = Scanner::new();
        let input = ScanInput {
            sender_address: Some("someone@somewhere.xyz".to_string()),
            ..Default::default()
        };
        let result = scanner.analyze(&input).await;
        assert_eq!(result.score, 0);
        assert_eq!(result.band, RiskBand::Safe);
        assert!(result.sender.flags.is_empty());
    }

    #[tokio::test]
    async fn analyze_is_idempotent_modulo_identity_fields() {
        let scanner = Scanner::new();
        let input = phishing_input();
        let first = scanner.analyze(&input).await;
        let second = scanner.analyze(&input).await;

        assert_eq!(first.score, second.score);
        assert_eq!(first.band, second.band);
        assert_eq!(first.text.flags, second.text.flags);
        assert_eq!(first.links.flags, second.links.flags);
        assert_eq!(first.sender.flags, second.sender.flags);
        assert_ne!(first.scan_id, second.scan_id);
    }

    struct FailingClassifier;

    #[async_trait]
    impl TextClassifier for FailingClassifier {
        async fn score_text(&self, _text: &str) -> anyhow::Result<f64> {
            Err(anyhow!("model backend down"))
        }
    }

    struct ConfidentClassifier;

    #[async_trait]
    impl TextClassifier for ConfidentClassifier {
        async fn score_text(&self, _text: &str) -> anyhow::Result<f64> {
            Ok(0.95)
        }
    }

    #[tokio::test]
    async fn failing_classifier_contributes_nothing() {
        let noop_scanner = Scanner::new();
        let failing_scanner = Scanner::new().with_classifier(Box::new(FailingClassifier));
        let input = phishing_input();

        let baseline = noop_scanner.analyze(&input).await;
        let degraded = failing_scanner.analyze(&input).await;
        assert_eq!(baseline.score, degraded.score);
        assert!(!degraded.text.has_flag(FlagCode::NlpModel));
    }

    #[tokio::test]
    async fn confident_classifier_raises_text_score() {
        let scanner = Scanner::new().with_classifier(Box::new(ConfidentClassifier));
        let input = ScanInput {
            body: "please act now and claim your prize".to_string(),
            ..Default::default()
        };
        let result = scanner.analyze(&input).await;
        assert!(result.text.has_flag(FlagCode::NlpModel));
        // 12 (urgency) + 10 (financial "prize") + round(0.95 * 40) = 60
        assert_eq!(result.text.score, 60);
    }

    #[tokio::test]
    async fn tenant_weights_change_the_aggregate() {
        use crate::config::{ComponentWeights, TenantConfig};

        let mut config = EngineConfig::default();
        config.tenants.insert(
            "strict".to_string(),
            TenantConfig {
                weights: Some(ComponentWeights {
                    text: 0.1,
                    url: 0.1,
                    sender: 0.8,
                }),
                bands: None,
            },
        );
        let scanner = Scanner::new().with_config(config);

        let mut input = phishing_input();
        let default_result = scanner.analyze(&input).await;
        input.tenant_id = Some("strict".to_string());
        let strict_result = scanner.analyze(&input).await;

        assert_ne!(default_result.score, strict_result.score);
    }

    #[tokio::test]
    async fn all_scores_stay_in_range() {
        let scanner = Scanner::new();
        let result = scanner.analyze(&phishing_input()).await;
        for score in [
            result.score,
            result.text.score,
            result.links.score,
            result.sender.score,
        ] {
            assert!(score <= 100);
        }
    }
}
