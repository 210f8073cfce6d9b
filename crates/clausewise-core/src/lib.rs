pub mod category;
pub mod clause;
pub mod config;
pub mod context;
pub mod details;
pub mod risk;
pub mod segment;
pub mod summary;

pub use category::{CategorySet, ClauseCategory, ClauseMarker, categorize, markers};
pub use clause::Clause;
pub use config::{AnalyzerConfig, ConfigError, OperatingMode};
pub use context::{ContextRetriever, LegalContext, NoContext, StaticContext};
pub use risk::{RiskAssessment, RiskLevel};
pub use segment::{Segmenter, segment};
pub use summary::{DocumentSummary, SummaryPoint};
