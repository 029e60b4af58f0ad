use crate::domain_utils::DomainUtils;
use crate::patterns;
use crate::signal::{ComponentResult, Flag, FlagCode};
use regex::Regex;

const LONG_DOMAIN_THRESHOLD: usize = 30;

/// Scores a sender address/display-name pair for impersonation and domain
/// anomalies. A missing address is not an error; there is simply no signal.
pub struct SenderAnalyzer {
    digit_run_regex: Regex,
}

impl Default for SenderAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl SenderAnalyzer {
    pub fn new() -> Self {
        Self {
            digit_run_regex: Regex::new(r"\d{3,}").unwrap(),
        }
    }

    pub fn analyze(&self, address: Option<&str>, display_name: Option<&str>) -> ComponentResult {
        let address = match address {
            Some(a) if !a.trim().is_empty() => a.trim(),
            _ => return ComponentResult::empty(),
        };

        let domain = match DomainUtils::extract_domain(address) {
            Some(d) => d,
            None => {
                return ComponentResult {
                    score: 30,
                    flags: vec![Flag::new(
                        FlagCode::MalformedAddress,
                        format!("Sender address \"{address}\" has no domain part"),
                    )],
                    confidence: None,
                }
            }
        };

        let mut score: u32 = 0;
        let mut flags = Vec::new();
        let display = display_name.map(normalize_display).unwrap_or_default();

        if let Some((brand, expected_label)) = self.display_name_mismatch(&display, &domain) {
            score += 30;
            flags.push(Flag::new(
                FlagCode::Mismatch,
                format!("Display name claims \"{brand}\" but address domain is {domain} (expected {expected_label})"),
            ));
        }

        if self.free_provider_impersonation(&display, &domain) {
            score += 35;
            flags.push(Flag::new(
                FlagCode::FreeProviderImpersonation,
                format!("Organizational display name behind a consumer mailbox ({domain})"),
            ));
        }

        if let Some(tld) = DomainUtils::tld(&domain) {
            if patterns::SUSPICIOUS_TLDS.contains(&tld.as_str()) {
                score += 20;
                flags.push(Flag::new(
                    FlagCode::SuspiciousSenderTld,
                    format!("Sender domain uses the heavily-abused .{tld} TLD"),
                ));
            }
        }

        // Digit runs in the name part only; the TLD never carries digits
        // legitimately anyway.
        let name_part = domain
            .rsplit_once('.')
            .map(|(name, _tld)| name)
            .unwrap_or(&domain);
        if self.digit_run_regex.is_match(name_part) {
            score += 15;
            flags.push(Flag::new(
                FlagCode::NumericDomain,
                format!("Sender domain {domain} contains a long digit run"),
            ));
        }

        if domain.len() > LONG_DOMAIN_THRESHOLD {
            score += 10;
            flags.push(Flag::new(
                FlagCode::LongDomain,
                format!("Sender domain is {} characters long", domain.len()),
            ));
        }

        ComponentResult {
            score: score.min(100),
            flags,
            confidence: None,
        }
    }

    /// Display name claims a known company whose registrable label is absent
    /// from the sender's domain label.
    fn display_name_mismatch(
        &self,
        display: &str,
        domain: &str,
    ) -> Option<(&'static str, String)> {
        if display.is_empty() {
            return None;
        }
        let domain_label = DomainUtils::base_label(domain);
        for (brand, expected) in patterns::BRAND_DOMAINS {
            if display.contains(brand) {
                let expected_label = DomainUtils::base_label(expected);
                if !domain_label.contains(&expected_label) {
                    return Some((brand, expected_label));
                }
                return None;
            }
        }
        None
    }

    fn free_provider_impersonation(&self, display: &str, domain: &str) -> bool {
        if display.is_empty() {
            return false;
        }
        if !patterns::FREE_EMAIL_PROVIDERS.contains(&domain) {
            return false;
        }
        patterns::ORG_DISPLAY_KEYWORDS
            .iter()
            .any(|kw| display.contains(kw))
            || patterns::BRAND_DOMAINS
                .iter()
                .any(|(brand, _)| display.contains(brand))
    }
}

/// Case-fold and strip everything but letters, collapsing runs of other
/// characters to single spaces, so "PayPal--Support!!" matches "paypal support".
fn normalize_display(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut last_space = true;
    for c in name.to_lowercase().chars() {
        if c.is_alphabetic() {
            out.push(c);
            last_space = false;
        } else if !last_space {
            out.push(' ');
            last_space = true;
        }
    }
    out.trim().to_string()
}
