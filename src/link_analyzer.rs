use crate::domain_utils::DomainUtils;
use crate::patterns;
use crate::signal::{ComponentResult, Flag, FlagCode};
use serde::{Deserialize, Serialize};
use url::{Host, Url};

/// Display truncation for recorded URLs. Full URLs stay out of results so a
/// kilometer-long tracking link cannot blow up a rendered report.
const URL_DISPLAY_LEN: usize = 80;

const LONG_URL_THRESHOLD: usize = 150;
const ENCODED_SEQ_THRESHOLD: usize = 3;
const EXCESS_SUBDOMAIN_THRESHOLD: usize = 4;

/// One URL that contributed signal, with its individual result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlaggedUrl {
    pub url: String,
    pub result: ComponentResult,
}

/// Aggregate over all URLs in a message: worst-case score, the union of all
/// fired flags, and the per-URL breakdown for anything that scored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkAnalysis {
    pub result: ComponentResult,
    pub url_count: usize,
    pub flagged_urls: Vec<FlaggedUrl>,
}

/// Scores URLs for structural phishing indicators.
pub struct LinkAnalyzer;

impl Default for LinkAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl LinkAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Score a single URL. Trusted domains short-circuit to 0 before any
    /// other check; a URL we cannot parse gets a fixed penalty and no
    /// further analysis.
    pub fn analyze_url(&self, raw: &str) -> ComponentResult {
        let parsed = parse_lenient(raw);
        let url = match parsed {
            Some(u) => u,
            None => {
                return ComponentResult {
                    score: 50,
                    flags: vec![Flag::new(
                        FlagCode::InvalidUrl,
                        format!("Unparseable URL: {}", truncate(raw, URL_DISPLAY_LEN)),
                    )],
                    confidence: None,
                }
            }
        };

        let host = match url.host() {
            Some(h) => h,
            None => {
                return ComponentResult {
                    score: 50,
                    flags: vec![Flag::new(
                        FlagCode::InvalidUrl,
                        format!("URL has no host: {}", truncate(raw, URL_DISPLAY_LEN)),
                    )],
                    confidence: None,
                }
            }
        };

        let mut score: u32 = 0;
        let mut flags = Vec::new();

        match host {
            Host::Domain(domain) => {
                let domain = DomainUtils::canonicalize(domain);

                // Trusted domains override every other signal.
                if DomainUtils::matches_domain_list(&domain, patterns::TRUSTED_DOMAINS) {
                    return ComponentResult {
                        score: 0,
                        flags: vec![Flag::new(
                            FlagCode::TrustedDomain,
                            format!("{domain} is on the trusted allowlist"),
                        )],
                        confidence: None,
                    };
                }

                if let Some(tld) = DomainUtils::tld(&domain) {
                    if patterns::SUSPICIOUS_TLDS.contains(&tld.as_str()) {
                        score += 25;
                        flags.push(Flag::new(
                            FlagCode::SuspiciousTld,
                            format!(".{tld} domains are heavily abused by phishing campaigns"),
                        ));
                    }
                }

                if DomainUtils::subdomain_count(&domain) >= EXCESS_SUBDOMAIN_THRESHOLD {
                    score += 20;
                    flags.push(Flag::new(
                        FlagCode::ExcessSubdomains,
                        format!("Unusually deep subdomain nesting in {domain}"),
                    ));
                }

                if let Some(brand) = self.typosquat_match(&domain) {
                    score += 35;
                    flags.push(Flag::new(
                        FlagCode::Typosquat,
                        format!("{domain} imitates {brand}"),
                    ));
                }

                if DomainUtils::matches_domain_list(&domain, patterns::URL_SHORTENERS) {
                    score += 15;
                    flags.push(Flag::new(
                        FlagCode::Shortener,
                        format!("{domain} is a URL shortener hiding the real destination"),
                    ));
                }
            }
            Host::Ipv4(_) | Host::Ipv6(_) => {
                score += 40;
                flags.push(Flag::new(
                    FlagCode::IpAddress,
                    "Link points at a raw IP address instead of a domain",
                ));
            }
        }

        let path = url.path().to_lowercase();
        if patterns::SUSPICIOUS_PATH_KEYWORDS
            .iter()
            .any(|kw| path.contains(kw))
        {
            score += 15;
            flags.push(Flag::new(
                FlagCode::SuspiciousPath,
                "URL path mimics a login/verification page",
            ));
        }

        if raw.contains('@') {
            score += 30;
            flags.push(Flag::new(
                FlagCode::AtSymbol,
                "URL contains '@', a trick to hide the real destination",
            ));
        }

        if raw.len() > LONG_URL_THRESHOLD {
            score += 10;
            flags.push(Flag::new(
                FlagCode::LongUrl,
                format!("Unusually long URL ({} characters)", raw.len()),
            ));
        }

        if count_encoded_sequences(raw) > ENCODED_SEQ_THRESHOLD {
            score += 15;
            flags.push(Flag::new(
                FlagCode::EncodedChars,
                "Heavy percent-encoding obscures the URL contents",
            ));
        }

        ComponentResult {
            score: score.min(100),
            flags,
            confidence: None,
        }
    }

    /// Run the per-URL function over every link and reduce to the worst case.
    pub fn analyze_all(&self, urls: &[String]) -> LinkAnalysis {
        let mut aggregate = ComponentResult::empty();
        let mut flagged_urls = Vec::new();

        for raw in urls {
            let result = self.analyze_url(raw);
            aggregate.score = aggregate.score.max(result.score);
            aggregate.flags.extend(result.flags.clone());
            if result.score > 0 {
                flagged_urls.push(FlaggedUrl {
                    url: truncate(raw, URL_DISPLAY_LEN),
                    result,
                });
            }
        }

        aggregate.dedup_flags();

        LinkAnalysis {
            result: aggregate,
            url_count: urls.len(),
            flagged_urls,
        }
    }

    /// Typosquat detection: literal fake variants first, then edit distance
    /// 1-2 between the registrable base label and the brand name. Distance 0
    /// is the genuine domain, never a squat.
    fn typosquat_match(&self, domain: &str) -> Option<&'static str> {
        let base = DomainUtils::base_label(domain);

        for brand in patterns::BRAND_REFS {
            for fake in brand.fakes {
                if fake_variant_match(domain, fake) {
                    return Some(brand.domain);
                }
            }
        }

        for brand in patterns::BRAND_REFS {
            if base == brand.name {
                continue;
            }
            let prefix: String = brand.name.chars().take(3).collect();
            if base.contains(&prefix) {
                let distance = edit_distance(&base, brand.name);
                if (1..=2).contains(&distance) {
                    return Some(brand.domain);
                }
            }
        }

        None
    }
}

/// Anchored containment for known fake variants. A single-token variant must
/// stand alone between dots/hyphens, so "aple" flags aple.com but not
/// naples.com or staple.com; hyphenated variants ("pay-pal") keep plain
/// substring containment.
fn fake_variant_match(domain: &str, fake: &str) -> bool {
    if fake.contains('-') {
        return domain.contains(fake);
    }
    domain
        .split('.')
        .any(|label| label.split('-').any(|token| token == fake))
}

/// Classic DP edit distance; insertion, deletion, and substitution each
/// cost 1. Rolling single-row formulation.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut row: Vec<usize> = (0..=b.len()).collect();
    for (i, ca) in a.iter().enumerate() {
        let mut prev_diag = row[0];
        row[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = if ca == cb { 0 } else { 1 };
            let next = (row[j] + 1).min(row[j + 1] + 1).min(prev_diag + cost);
            prev_diag = row[j + 1];
            row[j + 1] = next;
        }
    }
    row[b.len()]
}

/// Parse a URL, tolerating missing schemes the way mail clients do.
fn parse_lenient(raw: &str) -> Option<Url> {
    if let Ok(url) = Url::parse(raw) {
        return Some(url);
    }
    if !raw.contains("://") {
        if let Ok(url) = Url::parse(&format!("http://{raw}")) {
            return Some(url);
        }
    }
    None
}

fn count_encoded_sequences(raw: &str) -> usize {
    let bytes = raw.as_bytes();
    let mut count = 0;
    for window in bytes.windows(3) {
        if window[0] == b'%'
            && window[1].is_ascii_hexdigit()
            && window[2].is_ascii_hexdigit()
        {
            count += 1;
        }
    }
    count
}

fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max).collect();
        format!("{cut}…")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trusted_domain_overrides_everything() {
        let analyzer = LinkAnalyzer::new();
        // Long path and encoded chars would otherwise fire.
        let url = format!(
            "https://mail.google.com/login/verify/{}%41%42%43%44%45",
            "x".repeat(160)
        );
        let result = analyzer.analyze_url(&url);
        assert_eq!(result.score, 0);
        assert_eq!(result.flags.len(), 1);
        assert_eq!(result.flags[0].code, FlagCode::TrustedDomain);
    }

    #[test]
    fn ip_address_plus_login_path() {
        let analyzer = LinkAnalyzer::new();
        let result = analyzer.analyze_url("http://192.168.1.5/login");
        assert_eq!(result.score, 55);
        assert!(result.has_flag(FlagCode::IpAddress));
        assert!(result.has_flag(FlagCode::SuspiciousPath));
        assert_eq!(result.flags.len(), 2);
    }

    #[test]
    fn typosquat_by_edit_distance() {
        let analyzer = LinkAnalyzer::new();
        // "g00gle" vs "google": distance 2 via literal fake list and DP both.
        let result = analyzer.analyze_url("http://g00gle.com/");
        assert!(result.has_flag(FlagCode::Typosquat));

        // "googie" is not in the fake list; caught by edit distance alone.
        let result = analyzer.analyze_url("http://googie.com/");
        assert!(result.has_flag(FlagCode::Typosquat));
    }

    #[test]
    fn fake_variants_match_whole_tokens_only() {
        let analyzer = LinkAnalyzer::new();

        // "aple" is a known Apple fake, but only as a standalone label/token.
        for clean in ["https://naples.com/", "https://staple.com/shop"] {
            let result = analyzer.analyze_url(clean);
            assert!(
                !result.has_flag(FlagCode::Typosquat),
                "false typosquat on {clean}"
            );
        }

        let result = analyzer.analyze_url("http://aple.com/signin");
        assert!(result.has_flag(FlagCode::Typosquat));

        let result = analyzer.analyze_url("http://secure-paypa1.com/");
        assert!(result.has_flag(FlagCode::Typosquat));

        // Hyphenated variants still match by containment.
        let result = analyzer.analyze_url("http://pay-pal-billing.com/");
        assert!(result.has_flag(FlagCode::Typosquat));
    }

    #[test]
    fn exact_brand_domain_is_not_a_typosquat() {
        let analyzer = LinkAnalyzer::new();
        // netflix.com is not on the trusted allowlist, so the typosquat path
        // actually runs; distance 0 must not match.
        let result = analyzer.analyze_url("https://netflix.com/account");
        assert!(!result.has_flag(FlagCode::Typosquat));
    }

    #[test]
    fn edit_distance_basics() {
        assert_eq!(edit_distance("google", "google"), 0);
        assert_eq!(edit_distance("g00gle", "google"), 2);
        assert_eq!(edit_distance("gogle", "google"), 1);
        assert_eq!(edit_distance("", "abc"), 3);
        assert_eq!(edit_distance("kitten", "sitting"), 3);
    }

    #[test]
    fn invalid_url_is_terminal() {
        let analyzer = LinkAnalyzer::new();
        let result = analyzer.analyze_url("http://exa mple.com/??");
        assert_eq!(result.score, 50);
        assert_eq!(result.flags.len(), 1);
        assert_eq!(result.flags[0].code, FlagCode::InvalidUrl);
    }

    #[test]
    fn scheme_less_url_is_tolerated() {
        let analyzer = LinkAnalyzer::new();
        let result = analyzer.analyze_url("bit.ly/3xYzAbC");
        assert!(result.has_flag(FlagCode::Shortener));
    }

    #[test]
    fn at_symbol_and_length_and_encoding() {
        let analyzer = LinkAnalyzer::new();
        let url = format!(
            "http://example-site.com/a@b/%41%42%43%44{}",
            "y".repeat(150)
        );
        let result = analyzer.analyze_url(&url);
        assert!(result.has_flag(FlagCode::AtSymbol));
        assert!(result.has_flag(FlagCode::LongUrl));
        assert!(result.has_flag(FlagCode::EncodedChars));
    }

    #[test]
    fn excess_subdomains() {
        let analyzer = LinkAnalyzer::new();
        let result = analyzer.analyze_url("http://a.b.c.d.example-host.net/");
        assert!(result.has_flag(FlagCode::ExcessSubdomains));

        let result = analyzer.analyze_url("http://a.b.c.example-host.net/");
        assert!(!result.has_flag(FlagCode::ExcessSubdomains));
    }

    #[test]
    fn aggregate_takes_worst_case_and_unions_flags() {
        let analyzer = LinkAnalyzer::new();
        let urls = vec![
            "https://mail.google.com/inbox".to_string(),
            "http://192.168.1.5/login".to_string(),
            "http://bit.ly/x".to_string(),
        ];
        let analysis = analyzer.analyze_all(&urls);
        assert_eq!(analysis.url_count, 3);
        assert_eq!(analysis.result.score, 55);
        assert!(analysis.result.has_flag(FlagCode::IpAddress));
        assert!(analysis.result.has_flag(FlagCode::Shortener));
        // Trusted URL scored 0 and is not recorded as flagged.
        assert_eq!(analysis.flagged_urls.len(), 2);
    }

    #[test]
    fn empty_url_list() {
        let analyzer = LinkAnalyzer::new();
        let analysis = analyzer.analyze_all(&[]);
        assert_eq!(analysis.url_count, 0);
        assert_eq!(analysis.result.score, 0);
        assert!(analysis.flagged_urls.is_empty());
    }
}
