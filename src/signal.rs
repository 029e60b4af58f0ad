use serde::{Deserialize, Serialize};

/// Closed set of signal codes across all analyzers. Codes let callers filter
/// and aggregate findings without parsing rendered messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlagCode {
    // Text analyzer
    Urgency,
    Threat,
    Financial,
    Impersonation,
    Action,
    Regional,
    Grammar,
    Caps,
    Punctuation,
    DomainMismatch,
    NlpModel,
    // Link analyzer
    InvalidUrl,
    TrustedDomain,
    IpAddress,
    SuspiciousTld,
    ExcessSubdomains,
    Typosquat,
    Shortener,
    SuspiciousPath,
    AtSymbol,
    LongUrl,
    EncodedChars,
    // Sender analyzer
    MalformedAddress,
    Mismatch,
    FreeProviderImpersonation,
    SuspiciousSenderTld,
    NumericDomain,
    LongDomain,
}

/// One fired signal: a stable code plus a rendered human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flag {
    pub code: FlagCode,
    pub message: String,
}

impl Flag {
    pub fn new(code: FlagCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Output of one signal analyzer: a 0-100 score, the flags that fired, and
/// an optional confidence in [0.0, 1.0].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentResult {
    pub score: u32,
    pub flags: Vec<Flag>,
    pub confidence: Option<f64>,
}

impl ComponentResult {
    pub fn empty() -> Self {
        Self {
            score: 0,
            flags: Vec::new(),
            confidence: None,
        }
    }

    /// Collapse duplicate (code, message) pairs, preserving first-seen order.
    pub fn dedup_flags(&mut self) {
        let mut seen = std::collections::HashSet::new();
        self.flags
            .retain(|f| seen.insert((f.code, f.message.clone())));
    }

    pub fn has_flag(&self, code: FlagCode) -> bool {
        self.flags.iter().any(|f| f.code == code)
    }
}
