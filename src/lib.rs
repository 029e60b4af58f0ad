pub mod category;
pub mod config;
pub mod domain_utils;
pub mod explanation;
pub mod link_analyzer;
pub mod machine_learning;
pub mod patterns;
pub mod scanner;
pub mod scoring;
pub mod sender_analyzer;
pub mod signal;
pub mod statistics;
pub mod text_analyzer;

pub use config::{BandBoundaries, ComponentWeights, EngineConfig, TenantConfig};
pub use explanation::Explanation;
pub use link_analyzer::{LinkAnalysis, LinkAnalyzer};
pub use machine_learning::{NoopClassifier, TextClassifier};
pub use scanner::{ScanInput, ScanResult, Scanner};
pub use scoring::{Calibrator, IdentityCalibrator, RiskBand};
pub use sender_analyzer::SenderAnalyzer;
pub use signal::{ComponentResult, Flag, FlagCode};
pub use statistics::StatisticsCollector;
pub use text_analyzer::TextAnalyzer;
