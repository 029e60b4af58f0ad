use crate::domain_utils::DomainUtils;
use crate::patterns;
use crate::signal::{ComponentResult, Flag, FlagCode};
use regex::Regex;

/// Number of independent checks the analyzer runs (the NLP hook is applied
/// separately by the orchestrator and does not count toward confidence).
const CHECK_COUNT: usize = 10;

/// Words after a greeting that address a role, not a person. These are left
/// in the working copy; redacting them would blind the regional/grammar
/// tables to "dear beloved", "dear customer," and friends.
const GENERIC_GREETING_TARGETS: &[&str] = &[
    "customer", "user", "beloved", "friend", "member", "sir", "madam", "all", "team", "valued",
];

const URGENCY_CAP: u32 = 30;
const THREAT_CAP: u32 = 30;
const FINANCIAL_CAP: u32 = 27;
const ACTION_CAP: u32 = 25;
const REGIONAL_CAP: u32 = 20;
const GRAMMAR_CAP: u32 = 10;

/// Scores free text for social-engineering patterns.
///
/// All analysis runs on a redacted working copy so flag messages, logs, and
/// telemetry never retain email addresses, phone numbers, card numbers, or
/// greeting names from the original message. The caller's text is not mutated.
pub struct TextAnalyzer {
    email_regex: Regex,
    card_regex: Regex,
    phone_regex: Regex,
    greeting_regex: Regex,
    punct_run_regex: Regex,
}

impl Default for TextAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextAnalyzer {
    pub fn new() -> Self {
        Self {
            email_regex: Regex::new(r"\b[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}\b")
                .unwrap(),
            // 16 digits, optionally grouped by spaces or dashes
            card_regex: Regex::new(r"\b(?:\d[ -]?){15}\d\b").unwrap(),
            // 8+ digit runs with common phone separators
            phone_regex: Regex::new(r"\+?\d[\d\s().-]{6,}\d").unwrap(),
            greeting_regex: Regex::new(r"(?i)\b(dear|hello|hi|hey)\s+([A-Za-z][A-Za-z'-]*)")
                .unwrap(),
            punct_run_regex: Regex::new(r"!{2,}|\?{2,}").unwrap(),
        }
    }

    /// Redact PII from a working copy of the text. Card numbers are matched
    /// before phone numbers so a 16-digit group is not half-eaten by the
    /// looser phone pattern. Generic greeting targets ("dear customer",
    /// "my dear friend") are not names and stay untouched; several pattern
    /// table entries match on exactly that phrasing.
    pub fn redact_pii(&self, text: &str) -> String {
        let mut redacted = self.email_regex.replace_all(text, "[email]").to_string();
        redacted = self.card_regex.replace_all(&redacted, "[card]").to_string();
        redacted = self.phone_regex.replace_all(&redacted, "[phone]").to_string();
        redacted = self
            .greeting_regex
            .replace_all(&redacted, |caps: &regex::Captures| {
                let greeting = caps.get(1).map_or("", |m| m.as_str());
                let target = caps.get(2).map_or("", |m| m.as_str());
                if GENERIC_GREETING_TARGETS.contains(&target.to_lowercase().as_str()) {
                    caps.get(0).map_or("", |m| m.as_str()).to_string()
                } else {
                    format!("{greeting} [name]")
                }
            })
            .to_string();
        redacted
    }

    /// Run all checks over subject + body. `sender_domain` enables the
    /// brand-mention/domain-mismatch cross-check when known.
    pub fn analyze(
        &self,
        subject: Option<&str>,
        body: &str,
        sender_domain: Option<&str>,
    ) -> ComponentResult {
        let combined = match subject {
            Some(s) if !s.is_empty() => format!("{s}\n{body}"),
            _ => body.to_string(),
        };
        let redacted = self.redact_pii(&combined);
        let lower = redacted.to_lowercase();

        let mut score: u32 = 0;
        let mut flags = Vec::new();
        let mut fired = 0usize;

        let keyword_checks: [(FlagCode, &[&str], u32, u32, &str); 6] = [
            (
                FlagCode::Urgency,
                patterns::URGENCY_KEYWORDS,
                12,
                URGENCY_CAP,
                "Urgency pressure language",
            ),
            (
                FlagCode::Threat,
                patterns::THREAT_KEYWORDS,
                15,
                THREAT_CAP,
                "Threat of negative consequences",
            ),
            (
                FlagCode::Financial,
                patterns::FINANCIAL_KEYWORDS,
                10,
                FINANCIAL_CAP,
                "Financial bait",
            ),
            (
                FlagCode::Action,
                patterns::ACTION_KEYWORDS,
                8,
                ACTION_CAP,
                "Request for immediate action",
            ),
            (
                FlagCode::Regional,
                patterns::REGIONAL_KEYWORDS,
                10,
                REGIONAL_CAP,
                "Phrasing typical of advance-fee scams",
            ),
            (
                FlagCode::Grammar,
                patterns::GRAMMAR_KEYWORDS,
                8,
                GRAMMAR_CAP,
                "Grammar patterns common in scam mail",
            ),
        ];

        for (code, table, per_hit, cap, label) in keyword_checks {
            let hits = matched_keywords(&lower, table);
            if !hits.is_empty() {
                score += (hits.len() as u32 * per_hit).min(cap);
                fired += 1;
                flags.push(Flag::new(code, format!("{label}: {}", excerpt(&hits))));
            }
        }

        // Impersonation needs corroboration: a single brand mention is normal
        // in legitimate mail, two or more role/brand words are not.
        let impersonation_hits = matched_keywords(&lower, patterns::IMPERSONATION_KEYWORDS);
        if impersonation_hits.len() >= 2 {
            score += 15;
            fired += 1;
            flags.push(Flag::new(
                FlagCode::Impersonation,
                format!(
                    "Multiple authority references: {}",
                    excerpt(&impersonation_hits)
                ),
            ));
        }

        if caps_ratio(&redacted) > 0.3 && body.len() > 50 {
            score += 10;
            fired += 1;
            flags.push(Flag::new(
                FlagCode::Caps,
                "Excessive capitalization (shouting)",
            ));
        }

        if self.punct_run_regex.find_iter(&redacted).count() >= 3 {
            score += 8;
            fired += 1;
            flags.push(Flag::new(
                FlagCode::Punctuation,
                "Repeated exclamation/question marks",
            ));
        }

        if let Some(domain) = sender_domain {
            if let Some((brand, expected)) = self.brand_domain_mismatch(&lower, domain) {
                score += 20;
                fired += 1;
                flags.push(Flag::new(
                    FlagCode::DomainMismatch,
                    format!("Mentions {brand} but sender domain is not {expected}"),
                ));
            }
        }

        ComponentResult {
            score: score.min(100),
            flags,
            confidence: Some(fired as f64 / CHECK_COUNT as f64),
        }
    }

    /// Fold the NLP hook's phishing probability into an existing text result.
    /// Only probabilities above 0.6 contribute; the hook never lowers a score.
    pub fn apply_nlp_score(result: &mut ComponentResult, probability: f64) {
        if probability > 0.6 {
            let bonus = (probability * 40.0).round() as u32;
            result.score = (result.score + bonus).min(100);
            result.flags.push(Flag::new(
                FlagCode::NlpModel,
                format!("Language model rated this text {:.0}% phishing-like", probability * 100.0),
            ));
        }
    }

    fn brand_domain_mismatch(
        &self,
        lower_text: &str,
        sender_domain: &str,
    ) -> Option<(&'static str, &'static str)> {
        let sender = DomainUtils::canonicalize(sender_domain);
        for (brand, expected) in patterns::BRAND_DOMAINS {
            if patterns::contains_keyword(lower_text, brand)
                && !DomainUtils::matches_domain_list(&sender, &[expected])
            {
                return Some((brand, expected));
            }
        }
        None
    }
}

fn matched_keywords<'a>(lower_text: &str, table: &[&'a str]) -> Vec<&'a str> {
    table
        .iter()
        .filter(|kw| patterns::contains_keyword(lower_text, kw))
        .copied()
        .collect()
}

/// Render up to three matched keywords for a flag message.
fn excerpt(hits: &[&str]) -> String {
    let shown: Vec<String> = hits.iter().take(3).map(|h| format!("\"{h}\"")).collect();
    if hits.len() > 3 {
        format!("{} (+{} more)", shown.join(", "), hits.len() - 3)
    } else {
        shown.join(", ")
    }
}

fn caps_ratio(text: &str) -> f64 {
    let mut letters = 0usize;
    let mut upper = 0usize;
    for c in text.chars() {
        if c.is_alphabetic() {
            letters += 1;
            if c.is_uppercase() {
                upper += 1;
            }
        }
    }
    if letters == 0 {
        0.0
    } else {
        upper as f64 / letters as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redacts_emails_phones_cards_and_greeting_names() {
        let analyzer = TextAnalyzer::new();
        let text = "Dear Alice, contact bob@example.com or call 555-123-4567. \
                    Card: 4111 1111 1111 1111";
        let redacted = analyzer.redact_pii(text);

        assert!(!redacted.contains("bob@example.com"));
        assert!(!redacted.contains("4111"));
        assert!(!redacted.contains("555-123-4567"));
        assert!(redacted.contains("Dear [name]"));
        assert!(redacted.contains("[email]"));
        assert!(redacted.contains("[card]"));
        assert!(redacted.contains("[phone]"));
    }

    #[test]
    fn generic_greetings_survive_redaction() {
        let analyzer = TextAnalyzer::new();

        // A personal name after a greeting is still redacted.
        let redacted = analyzer.redact_pii("Dear Alice, hello Bob");
        assert_eq!(redacted, "Dear [name], hello [name]");

        // Role greetings are table bait, not PII.
        let redacted = analyzer.redact_pii("Dear Customer, my dear friend");
        assert_eq!(redacted, "Dear Customer, my dear friend");
    }

    #[test]
    fn greeting_phrases_still_reach_the_tables() {
        let analyzer = TextAnalyzer::new();

        let result = analyzer.analyze(None, "dear beloved, my dear friend", None);
        assert!(result.has_flag(FlagCode::Regional));

        let result = analyzer.analyze(None, "Dear customer, we writes to you", None);
        assert!(result.has_flag(FlagCode::Grammar));
    }

    #[test]
    fn short_keywords_need_word_boundaries() {
        let analyzer = TextAnalyzer::new();

        let result = analyzer.analyze(None, "what a wonderful day for the first time", None);
        assert!(!result.has_flag(FlagCode::Financial));
        assert_eq!(result.score, 0);

        let result = analyzer.analyze(None, "you have won a prize", None);
        assert!(result.has_flag(FlagCode::Financial));
    }

    #[test]
    fn redaction_does_not_mutate_input() {
        let analyzer = TextAnalyzer::new();
        let original = "mail me at carol@test.org";
        let _ = analyzer.redact_pii(original);
        assert!(original.contains("carol@test.org"));
    }

    #[test]
    fn urgency_hits_are_capped() {
        let analyzer = TextAnalyzer::new();
        // Five distinct urgency keywords: 5 * 12 = 60, capped at 30.
        let body = "urgent! act now, last chance, final notice, respond now";
        let result = analyzer.analyze(None, body, None);
        let urgency_only = analyzer.analyze(None, "urgent matter", None);
        assert!(result.score >= 30);
        assert_eq!(urgency_only.score, 12);
        assert!(result.has_flag(FlagCode::Urgency));
    }

    #[test]
    fn single_impersonation_hit_scores_nothing() {
        let analyzer = TextAnalyzer::new();
        let result = analyzer.analyze(None, "I bought this on amazon yesterday", None);
        assert!(!result.has_flag(FlagCode::Impersonation));

        let result = analyzer.analyze(None, "amazon security team requires action", None);
        assert!(result.has_flag(FlagCode::Impersonation));
    }

    #[test]
    fn caps_check_needs_length_and_ratio() {
        let analyzer = TextAnalyzer::new();
        let shouty = "YOUR ACCOUNT NEEDS ATTENTION PLEASE READ THIS WHOLE MESSAGE NOW OK";
        let result = analyzer.analyze(None, shouty, None);
        assert!(result.has_flag(FlagCode::Caps));

        let short = "HELP";
        let result = analyzer.analyze(None, short, None);
        assert!(!result.has_flag(FlagCode::Caps));
    }

    #[test]
    fn punctuation_runs_counted_per_run() {
        let analyzer = TextAnalyzer::new();
        let body = "Really??? Act fast!! Don't wait!!!";
        let result = analyzer.analyze(None, body, None);
        assert!(result.has_flag(FlagCode::Punctuation));

        let two_runs = "Really?? Yes!!";
        let result = analyzer.analyze(None, two_runs, None);
        assert!(!result.has_flag(FlagCode::Punctuation));
    }

    #[test]
    fn brand_mention_with_wrong_sender_domain_is_flagged() {
        let analyzer = TextAnalyzer::new();
        let body = "your paypal balance is on hold";
        let result = analyzer.analyze(None, body, Some("scam-mail.xyz"));
        assert!(result.has_flag(FlagCode::DomainMismatch));

        let result = analyzer.analyze(None, body, Some("service.paypal.com"));
        assert!(!result.has_flag(FlagCode::DomainMismatch));
    }

    #[test]
    fn clean_text_scores_zero() {
        let analyzer = TextAnalyzer::new();
        let result = analyzer.analyze(
            Some("Weekly standup"),
            "Weekly standup reminder, see you at 10am",
            Some("company.com"),
        );
        assert_eq!(result.score, 0);
        assert!(result.flags.is_empty());
        assert_eq!(result.confidence, Some(0.0));
    }

    #[test]
    fn nlp_score_applied_above_threshold() {
        let mut result = ComponentResult::empty();
        TextAnalyzer::apply_nlp_score(&mut result, 0.9);
        assert_eq!(result.score, 36);
        assert!(result.has_flag(FlagCode::NlpModel));

        let mut result = ComponentResult::empty();
        TextAnalyzer::apply_nlp_score(&mut result, 0.5);
        assert_eq!(result.score, 0);
        assert!(result.flags.is_empty());
    }

    #[test]
    fn score_never_exceeds_100() {
        let analyzer = TextAnalyzer::new();
        let body = "URGENT!!! act now!!! last chance??? your account is suspended and locked, \
                    legal action and penalty follow. you won the lottery jackpot prize, claim \
                    your cash reward and tax refund. click here to verify your account and \
                    update your payment. dear beloved, kindly do the needful, revert back. \
                    bank paypal amazon security team";
        let result = analyzer.analyze(None, body, Some("evil.tk"));
        assert!(result.score <= 100);
        assert!(result.confidence.unwrap() <= 1.0);
    }
}
