use crate::patterns;
use crate::signal::{ComponentResult, FlagCode};
use serde::{Deserialize, Serialize};

/// A scam category: weighted keyword evidence plus display metadata.
/// Severity is a small integer used for tie-breaking and explanation tone.
#[derive(Debug)]
pub struct Category {
    pub label: &'static str,
    pub icon: &'static str,
    pub severity: u32,
    pub min_match: u32,
    /// (keyword, weight) pairs; weights default to 1 where nothing stronger
    /// is justified.
    pub keywords: &'static [(&'static str, u32)],
    pub tip: &'static str,
}

/// Result of classification: the winning category, what matched, and a
/// snapshot of the corroborating signal scores at decision time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryMatch {
    pub label: String,
    pub icon: String,
    pub severity: u32,
    pub matched_keywords: Vec<String>,
    pub match_score: u32,
    pub confidence: f64,
    pub text_score: u32,
    pub url_score: u32,
    pub sender_score: u32,
}

pub const CATEGORIES: &[Category] = &[
    Category {
        label: "Banking/Financial Scam",
        icon: "🏦",
        severity: 5,
        min_match: 2,
        keywords: &[
            ("bank", 1),
            ("account", 1),
            ("verify", 2),
            ("suspended", 2),
            ("transaction", 1),
            ("statement", 1),
            ("debit", 1),
            ("balance", 1),
            ("online banking", 2),
            ("wire transfer", 2),
        ],
        tip: "Banks never ask you to verify credentials by email. Call the number on your card instead.",
    },
    Category {
        label: "Lottery/Prize Scam",
        icon: "🎰",
        severity: 4,
        min_match: 2,
        keywords: &[
            ("lottery", 2),
            ("winner", 2),
            ("prize", 2),
            ("jackpot", 2),
            ("congratulations", 1),
            ("claim", 1),
            ("lucky draw", 2),
            ("selected", 1),
        ],
        tip: "You cannot win a lottery you never entered. Real prizes never require an upfront fee.",
    },
    Category {
        label: "Delivery/Package Scam",
        icon: "📦",
        severity: 3,
        min_match: 2,
        keywords: &[
            ("package", 2),
            ("delivery", 2),
            ("parcel", 2),
            ("tracking", 2),
            ("shipment", 1),
            ("courier", 1),
            ("customs", 1),
            ("failed delivery", 2),
            ("redelivery", 2),
        ],
        tip: "Track packages only through the carrier's official site, never through emailed links.",
    },
    Category {
        label: "Tech Support Scam",
        icon: "💻",
        severity: 4,
        min_match: 2,
        keywords: &[
            ("virus", 2),
            ("malware", 2),
            ("infected", 2),
            ("tech support", 2),
            ("remote access", 2),
            ("computer", 1),
            ("license expired", 2),
            ("call our technician", 2),
        ],
        tip: "Microsoft and Apple never email you about viruses on your machine. Do not grant remote access.",
    },
    Category {
        label: "Government/Tax Scam",
        icon: "🏛",
        severity: 5,
        min_match: 2,
        keywords: &[
            ("irs", 2),
            ("tax refund", 2),
            ("tax", 1),
            ("social security", 2),
            ("warrant", 2),
            ("court", 1),
            ("fine", 1),
            ("benefits", 1),
        ],
        tip: "Tax agencies contact you by post, not by threatening emails demanding immediate payment.",
    },
    Category {
        label: "Romance Scam",
        icon: "💘",
        severity: 3,
        min_match: 2,
        keywords: &[
            ("my love", 2),
            ("soulmate", 2),
            ("darling", 2),
            ("lonely", 1),
            ("widow", 1),
            ("true love", 2),
            ("send money", 2),
        ],
        tip: "Be wary of online contacts who profess strong feelings quickly and then ask for money.",
    },
    Category {
        label: "Job Offer Scam",
        icon: "💼",
        severity: 3,
        min_match: 2,
        keywords: &[
            ("work from home", 2),
            ("no experience", 2),
            ("earn money", 2),
            ("weekly salary", 2),
            ("hiring", 1),
            ("part time", 1),
            ("opportunity", 1),
        ],
        tip: "Legitimate employers never charge fees or ask for bank details before hiring you.",
    },
    Category {
        label: "Crypto/Investment Scam",
        icon: "📈",
        severity: 4,
        min_match: 2,
        keywords: &[
            ("bitcoin", 2),
            ("crypto", 2),
            ("double your", 2),
            ("guaranteed returns", 2),
            ("investment", 1),
            ("trading", 1),
            ("profit", 1),
            ("wallet", 1),
        ],
        tip: "Guaranteed crypto returns are always fraud. No legitimate investment doubles your money.",
    },
];

/// Fallback shown when no category clears its threshold.
pub const GENERAL_LABEL: &str = "General";
pub const GENERAL_ICON: &str = "🛡";
pub const GENERAL_TIP: &str =
    "Stay skeptical of unexpected messages asking you to click, pay, or share personal details.";

/// Assigns the best-matching scam category, if any.
///
/// Corroboration rule: one flag from either the link or the sender analyzer
/// lowers a category's match threshold by one (floor 0). Alternatively a
/// single matched keyword suffices when the text signal alone is already
/// strong (score >= 50).
pub fn classify(
    text: &str,
    text_result: &ComponentResult,
    link_result: &ComponentResult,
    sender_result: &ComponentResult,
) -> Option<CategoryMatch> {
    let lower = text.to_lowercase();

    let mut best: Option<(&Category, Vec<String>, u32)> = None;
    for category in CATEGORIES {
        let mut matched = Vec::new();
        let mut score = 0u32;
        for (keyword, weight) in category.keywords {
            if patterns::contains_keyword(&lower, keyword) {
                matched.push(keyword.to_string());
                score += weight;
            }
        }
        if matched.is_empty() {
            continue;
        }
        let better = match &best {
            None => true,
            Some((current, _, current_score)) => {
                score > *current_score
                    || (score == *current_score && category.severity > current.severity)
            }
        };
        if better {
            best = Some((category, matched, score));
        }
    }

    let (category, matched, match_score) = best?;

    // A trusted-domain note is informational, not evidence against the
    // message; only real link findings lower the bar.
    let corroborated = link_result
        .flags
        .iter()
        .any(|f| f.code != FlagCode::TrustedDomain)
        || !sender_result.flags.is_empty();
    let effective_min = if corroborated {
        category.min_match.saturating_sub(1)
    } else {
        category.min_match
    };

    let strong_text_single = matched.len() == 1 && text_result.score >= 50;
    if match_score < effective_min && !strong_text_single {
        return None;
    }

    Some(CategoryMatch {
        label: category.label.to_string(),
        icon: category.icon.to_string(),
        severity: category.severity,
        confidence: match_score as f64 / category.keywords.len() as f64,
        matched_keywords: matched,
        match_score,
        text_score: text_result.score,
        url_score: link_result.score,
        sender_score: sender_result.score,
    })
}
