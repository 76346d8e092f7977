//! Error taxonomy shared by the simulator and the optimizer.

use thiserror::Error;

/// Every failure kind the core can raise.
///
/// Propagation policy is local-recover-first: most of these are caught and
/// folded into counters (rejected builds, fallback flags) rather than
/// bubbling out of `optimize()`. See the optimizer module for how each
/// variant is actually handled.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("invalid build for {kind}: {reason}")]
    InvalidBuild { kind: String, reason: String },

    #[error("simulation aborted at stage {final_stage}: {reason}")]
    SimulationAbort { final_stage: i32, reason: String },

    #[error("parallel batch backend unavailable: {0}")]
    BatchBackendUnavailable(String),

    #[error("progress sink unavailable: {0}")]
    ProgressSinkUnavailable(String),

    #[error("report sink unavailable: {0}")]
    ReportSinkUnavailable(String),

    #[error("failed to read config file {path}: {source}")]
    ConfigIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    ConfigParse {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

pub type Result<T> = std::result::Result<T, SimError>;

/// One rule violation surfaced by `validate()`. A build can fail several
/// invariants at once; callers get the whole list rather than the first.
#[derive(Debug, Clone, PartialEq)]
pub enum Violation {
    UnknownKey { category: &'static str, key: String },
    TalentBudgetExceeded { spent: i32, budget: i32 },
    AttributeBudgetExceeded { spent: i32, budget: i32 },
    OverMax { category: &'static str, key: String, level: i32, max: i32 },
    MissingPrerequisite { key: String, prereq: String, required: i32 },
    PointGateViolation { key: String, required: i32, spent: i32 },
    ExclusionViolation { a: String, b: String },
    RequiresAllMaxedViolation { key: String },
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Violation::UnknownKey { category, key } => {
                write!(f, "unknown {category} key '{key}'")
            }
            Violation::TalentBudgetExceeded { spent, budget } => {
                write!(f, "talent points {spent} exceed budget {budget}")
            }
            Violation::AttributeBudgetExceeded { spent, budget } => {
                write!(f, "attribute points {spent} exceed budget {budget}")
            }
            Violation::OverMax { category, key, level, max } => {
                write!(f, "{category} '{key}' at level {level} exceeds max {max}")
            }
            Violation::MissingPrerequisite { key, prereq, required } => {
                write!(f, "'{key}' requires '{prereq}' at level >= {required}")
            }
            Violation::PointGateViolation { key, required, spent } => {
                write!(
                    f,
                    "'{key}' is point-gated behind {required} points spent elsewhere, only {spent} spent"
                )
            }
            Violation::ExclusionViolation { a, b } => {
                write!(f, "'{a}' and '{b}' are mutually exclusive")
            }
            Violation::RequiresAllMaxedViolation { key } => {
                write!(f, "'{key}' requires every other talent maxed first")
            }
        }
    }
}
