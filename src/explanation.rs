use crate::category::{CategoryMatch, GENERAL_TIP};
use crate::signal::{ComponentResult, FlagCode};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Fixed blend used only to pick the explanation's tone. Deliberately
/// independent of the aggregator's tenant weights so wording stays stable
/// across tenants with the same evidence.
const BLEND_TEXT: f64 = 0.4;
const BLEND_URL: f64 = 0.4;
const BLEND_SENDER: f64 = 0.2;

const URGENCY_TIP: &str =
    "Scammers manufacture urgency so you act before thinking. Slow down and verify independently.";
const THREAT_TIP: &str =
    "Threats of suspension or legal trouble are pressure tactics. Real organizations give notice through official channels.";
const LINK_TIP: &str =
    "Hover over links before clicking and type important addresses yourself instead of following emailed links.";
const MISMATCH_TIP: &str =
    "Check that the sender's actual email domain matches who they claim to be.";

const LINK_CODES: &[FlagCode] = &[
    FlagCode::InvalidUrl,
    FlagCode::IpAddress,
    FlagCode::SuspiciousTld,
    FlagCode::ExcessSubdomains,
    FlagCode::Typosquat,
    FlagCode::Shortener,
    FlagCode::SuspiciousPath,
    FlagCode::AtSymbol,
    FlagCode::LongUrl,
    FlagCode::EncodedChars,
];

const MISMATCH_CODES: &[FlagCode] = &[
    FlagCode::DomainMismatch,
    FlagCode::Mismatch,
    FlagCode::FreeProviderImpersonation,
];

/// Snapshot of the component scores the explanation was built from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ComponentScores {
    pub text: u32,
    pub url: u32,
    pub sender: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explanation {
    pub summary: String,
    pub findings: Vec<String>,
    pub tips: Vec<String>,
    pub component_scores: ComponentScores,
}

/// Convert component flags and the category verdict into a prioritized,
/// deduplicated explanation with at least one educational tip.
pub fn build(
    text: &ComponentResult,
    link: &ComponentResult,
    sender: &ComponentResult,
    category: Option<&CategoryMatch>,
) -> Explanation {
    let component_scores = ComponentScores {
        text: text.score,
        url: link.score,
        sender: sender.score,
    };

    let informational_only = |r: &ComponentResult| {
        r.flags
            .iter()
            .all(|f| f.code == FlagCode::TrustedDomain)
    };

    if informational_only(text) && informational_only(link) && informational_only(sender) {
        return Explanation {
            summary: "No phishing indicators found. This message looks safe.".to_string(),
            findings: Vec::new(),
            tips: vec![GENERAL_TIP.to_string()],
            component_scores,
        };
    }

    let mut blended = BLEND_TEXT * text.score as f64
        + BLEND_URL * link.score as f64
        + BLEND_SENDER * sender.score as f64;
    if let Some(m) = category {
        blended += (m.severity * 10) as f64;
    }

    // High-risk wording demands corroboration beyond keyword evidence: a
    // strong link or sender signal. Text alone only ever reaches "caution".
    let corroborated = link.score > 20 || sender.score > 15;
    let summary = if blended >= 70.0 && corroborated {
        match category {
            Some(m) => format!(
                "High risk: this message matches known {} tactics. Do not click links or reply.",
                m.label
            ),
            None => "High risk: this message shows multiple strong phishing signals. Do not click links or reply.".to_string(),
        }
    } else if blended >= 70.0 {
        "Caution: the wording is suspicious, but no corroborating link or sender evidence was found. Verify through another channel before acting.".to_string()
    } else if blended >= 30.0 {
        "Caution: this message shows some signs of a scam. Verify the sender before acting on it.".to_string()
    } else {
        "Low concern: only weak signals fired. Stay alert for requests for money or credentials.".to_string()
    };

    let mut findings = Vec::new();
    let mut seen = HashSet::new();
    for result in [text, link, sender] {
        for flag in &result.flags {
            if flag.code != FlagCode::TrustedDomain && seen.insert(flag.message.clone()) {
                findings.push(flag.message.clone());
            }
        }
    }
    if let Some(m) = category {
        let line = format!(
            "Matches {} patterns: {}",
            m.label,
            m.matched_keywords.join(", ")
        );
        if seen.insert(line.clone()) {
            findings.push(line);
        }
    }

    let mut tips = Vec::new();
    let any_flag = |codes: &[FlagCode]| {
        [text, link, sender]
            .iter()
            .any(|r| codes.iter().any(|c| r.has_flag(*c)))
    };
    if any_flag(&[FlagCode::Urgency]) {
        tips.push(URGENCY_TIP.to_string());
    }
    if any_flag(&[FlagCode::Threat]) {
        tips.push(THREAT_TIP.to_string());
    }
    if any_flag(LINK_CODES) {
        tips.push(LINK_TIP.to_string());
    }
    if any_flag(MISMATCH_CODES) {
        tips.push(MISMATCH_TIP.to_string());
    }
    if tips.is_empty() {
        match category {
            Some(m) => tips.push(category_tip(&m.label)),
            None => tips.push(GENERAL_TIP.to_string()),
        }
    }

    Explanation {
        summary,
        findings,
        tips,
        component_scores,
    }
}

fn category_tip(label: &str) -> String {
    crate::category::CATEGORIES
        .iter()
        .find(|c| c.label == label)
        .map(|c| c.tip.to_string())
        .unwrap_or_else(|| GENERAL_TIP.to_string())
}
