//! Static pattern tables used by the signal analyzers.
//!
//! All tables are read-only after first access and safe to share across
//! concurrent scans. Version bumps go with any table edit so downstream
//! consumers can correlate score changes with data changes.

pub const PATTERN_TABLES_VERSION: &str = "2026.08.1";

/// Urgency pressure keywords (+12 each, capped in the text analyzer).
pub const URGENCY_KEYWORDS: &[&str] = &[
    "urgent",
    "immediately",
    "act now",
    "right away",
    "expires today",
    "expires soon",
    "within 24 hours",
    "within 48 hours",
    "last chance",
    "final notice",
    "final warning",
    "don't delay",
    "limited time",
    "time sensitive",
    "respond now",
];

/// Threat/consequence keywords.
pub const THREAT_KEYWORDS: &[&str] = &[
    "suspended",
    "suspend",
    "terminated",
    "deactivated",
    "locked",
    "closed permanently",
    "legal action",
    "lawsuit",
    "arrest",
    "police",
    "penalty",
    "unauthorized access",
    "unusual activity",
    "suspicious activity",
    "account compromised",
];

/// Financial bait keywords.
pub const FINANCIAL_KEYWORDS: &[&str] = &[
    "prize",
    "winner",
    "won",
    "lottery",
    "jackpot",
    "inheritance",
    "million dollars",
    "cash reward",
    "refund",
    "tax refund",
    "compensation",
    "unclaimed funds",
    "beneficiary",
    "wire transfer",
    "bitcoin",
    "gift card",
];

/// Authority-impersonation keywords. Two or more distinct hits are required
/// before the text analyzer awards any points.
pub const IMPERSONATION_KEYWORDS: &[&str] = &[
    "bank",
    "paypal",
    "amazon",
    "apple",
    "microsoft",
    "google",
    "netflix",
    "irs",
    "revenue service",
    "customs",
    "post office",
    "customer service",
    "security team",
    "support team",
    "account team",
    "billing department",
];

/// Action-request keywords.
pub const ACTION_KEYWORDS: &[&str] = &[
    "click here",
    "click below",
    "click the link",
    "verify your account",
    "verify your identity",
    "confirm your account",
    "update your information",
    "update your payment",
    "login here",
    "sign in here",
    "download attachment",
    "open the attachment",
    "call this number",
    "reply with your",
];

/// Regional/dialect scam phrasing seen in advance-fee and romance scams.
pub const REGIONAL_KEYWORDS: &[&str] = &[
    "dear beloved",
    "dearest one",
    "god bless you",
    "my dear friend",
    "business proposal",
    "next of kin",
    "foreign partner",
    "modalities",
    "kindly do the needful",
    "revert back",
];

/// Grammar-error indicators common in mass-produced scam text.
pub const GRAMMAR_KEYWORDS: &[&str] = &[
    "kindly",
    "do needful",
    "your's",
    "informations",
    "advices",
    "dear customer,",
    "dear user,",
    "valued costumer",
];

/// Domains that short-circuit link analysis to score 0. Subdomains match.
pub const TRUSTED_DOMAINS: &[&str] = &[
    "google.com",
    "gmail.com",
    "youtube.com",
    "microsoft.com",
    "office.com",
    "live.com",
    "outlook.com",
    "apple.com",
    "icloud.com",
    "amazon.com",
    "paypal.com",
    "facebook.com",
    "instagram.com",
    "linkedin.com",
    "twitter.com",
    "x.com",
    "github.com",
    "wikipedia.org",
    "dropbox.com",
    "adobe.com",
    "salesforce.com",
    "zoom.us",
    "slack.com",
];

/// TLDs with very high abuse rates relative to legitimate registrations.
pub const SUSPICIOUS_TLDS: &[&str] = &[
    "tk", "ml", "ga", "cf", "gq", "xyz", "top", "club", "work", "click", "link", "info", "buzz",
    "rest", "icu", "cam", "bar", "monster", "quest", "cfd",
];

/// Known URL shortener hosts.
pub const URL_SHORTENERS: &[&str] = &[
    "bit.ly",
    "tinyurl.com",
    "t.co",
    "goo.gl",
    "ow.ly",
    "is.gd",
    "buff.ly",
    "rebrand.ly",
    "cutt.ly",
    "shorturl.at",
    "rb.gy",
    "tiny.cc",
];

/// Path segments that suggest a credential-harvesting page.
pub const SUSPICIOUS_PATH_KEYWORDS: &[&str] = &[
    "login", "signin", "sign-in", "verify", "verification", "account", "secure", "security",
    "update", "confirm", "password", "banking", "wallet", "recover",
];

/// Consumer mailbox providers; legitimate organizations do not send
/// official notices from these.
pub const FREE_EMAIL_PROVIDERS: &[&str] = &[
    "gmail.com",
    "yahoo.com",
    "hotmail.com",
    "outlook.com",
    "live.com",
    "aol.com",
    "icloud.com",
    "mail.com",
    "protonmail.com",
    "proton.me",
    "gmx.com",
    "yandex.com",
];

/// Organizational role words in a display name that clash with a consumer
/// mailbox address.
pub const ORG_DISPLAY_KEYWORDS: &[&str] = &[
    "bank", "support", "security", "admin", "billing", "service", "official", "helpdesk",
];

/// Reference brand for typosquat detection: canonical name, registrable
/// domain, and fake variants observed in the wild.
pub struct BrandRef {
    pub name: &'static str,
    pub domain: &'static str,
    pub fakes: &'static [&'static str],
}

/// Typosquat reference map. The link analyzer first checks the literal fake
/// variants, then falls back to edit distance against the brand name.
pub const BRAND_REFS: &[BrandRef] = &[
    BrandRef {
        name: "google",
        domain: "google.com",
        fakes: &["g00gle", "goggle", "gooogle", "googel"],
    },
    BrandRef {
        name: "paypal",
        domain: "paypal.com",
        fakes: &["paypa1", "paypall", "payp4l", "pay-pal"],
    },
    BrandRef {
        name: "amazon",
        domain: "amazon.com",
        fakes: &["amaz0n", "arnazon", "amazonn", "amazan"],
    },
    BrandRef {
        name: "apple",
        domain: "apple.com",
        fakes: &["app1e", "aple", "appie", "apple-id"],
    },
    BrandRef {
        name: "microsoft",
        domain: "microsoft.com",
        fakes: &["micr0soft", "rnicrosoft", "microsofty", "mircosoft"],
    },
    BrandRef {
        name: "netflix",
        domain: "netflix.com",
        fakes: &["netfl1x", "netflixx", "netfiix"],
    },
    BrandRef {
        name: "facebook",
        domain: "facebook.com",
        fakes: &["faceb00k", "facebok", "faceboook"],
    },
    BrandRef {
        name: "chase",
        domain: "chase.com",
        fakes: &["chasse", "chas3", "chase-bank"],
    },
    BrandRef {
        name: "wellsfargo",
        domain: "wellsfargo.com",
        fakes: &["wellsfarg0", "welsfargo", "wells-fargo-secure"],
    },
];

/// Brands whose mention in message text is cross-checked against the sender
/// domain ("domain mismatch" signal). Kept separate from BRAND_REFS because
/// display names mention brands the typosquat map does not track.
pub const BRAND_DOMAINS: &[(&str, &str)] = &[
    ("google", "google.com"),
    ("gmail", "google.com"),
    ("paypal", "paypal.com"),
    ("amazon", "amazon.com"),
    ("apple", "apple.com"),
    ("microsoft", "microsoft.com"),
    ("outlook", "microsoft.com"),
    ("netflix", "netflix.com"),
    ("facebook", "facebook.com"),
    ("instagram", "instagram.com"),
    ("linkedin", "linkedin.com"),
    ("chase", "chase.com"),
    ("wells fargo", "wellsfargo.com"),
    ("bank of america", "bankofamerica.com"),
    ("citibank", "citibank.com"),
    ("hsbc", "hsbc.com"),
    ("dhl", "dhl.com"),
    ("fedex", "fedex.com"),
    ("ups", "ups.com"),
    ("usps", "usps.com"),
];

/// Check a lowercased text for a table entry. Single-word entries only match
/// on word boundaries so "won" cannot fire inside "wonderful" or "irs" inside
/// "first"; multi-word phrases are unambiguous and match as substrings.
pub fn contains_keyword(lower_text: &str, keyword: &str) -> bool {
    if keyword.contains(' ') {
        return lower_text.contains(keyword);
    }
    lower_text.match_indices(keyword).any(|(i, _)| {
        let before = lower_text[..i].chars().next_back();
        let after = lower_text[i + keyword.len()..].chars().next();
        !before.is_some_and(|c| c.is_alphanumeric())
            && !after.is_some_and(|c| c.is_alphanumeric())
    })
}
