use thiserror::Error;

use crate::stage::Stage;

/// The transient error taxonomy from §7: every variant here means "drop this
/// cycle, the engine keeps running". Each carries the stage it occurred in so
/// metrics and logs can attribute it without parsing a message string.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DropReason {
    #[error("[{stage}] malformed wire payload")]
    MalformedWire { stage: Stage },
    #[error("[{stage}] unrecognized payload discriminant")]
    UnknownVariant { stage: Stage },
    #[error("[{stage}] pool cache miss and refresh fetch timed out")]
    StaleMiss { stage: Stage },
    #[error("[{stage}] referenced pool id not resolvable")]
    PoolUnknown { stage: Stage },
    #[error("[{stage}] sizer found no profitable size")]
    NoProfitableSize { stage: Stage },
    #[error("[{stage}] expected profit below configured threshold")]
    BelowThreshold { stage: Stage },
    #[error("[{stage}] cumulative elapsed exceeded the pipeline budget")]
    BudgetExceeded { stage: Stage },
    #[error("[{stage}] relay timed out")]
    RelayTimeout { stage: Stage },
    #[error("[{stage}] relay rejected the bundle")]
    RelayRejected { stage: Stage }
}

impl DropReason {
    pub fn stage(&self) -> Stage {
        match self {
            DropReason::MalformedWire { stage }
            | DropReason::UnknownVariant { stage }
            | DropReason::StaleMiss { stage }
            | DropReason::PoolUnknown { stage }
            | DropReason::NoProfitableSize { stage }
            | DropReason::BelowThreshold { stage }
            | DropReason::BudgetExceeded { stage }
            | DropReason::RelayTimeout { stage }
            | DropReason::RelayRejected { stage } => *stage
        }
    }

    /// Stable snake_case kind, independent of the `Display` message, for use
    /// as a metrics label.
    pub fn kind(&self) -> &'static str {
        match self {
            DropReason::MalformedWire { .. } => "malformed_wire",
            DropReason::UnknownVariant { .. } => "unknown_variant",
            DropReason::StaleMiss { .. } => "stale_miss",
            DropReason::PoolUnknown { .. } => "pool_unknown",
            DropReason::NoProfitableSize { .. } => "no_profitable_size",
            DropReason::BelowThreshold { .. } => "below_threshold",
            DropReason::BudgetExceeded { .. } => "budget_exceeded",
            DropReason::RelayTimeout { .. } => "relay_timeout",
            DropReason::RelayRejected { .. } => "relay_rejected"
        }
    }
}

/// Fatal-at-startup configuration errors (§7's "Config" class).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error(
        "enable_sandwich=true requires simulation_only=true; refusing to start with a live \
         sandwich strategy"
    )]
    SandwichWithoutSimulationOnly,
    #[error("failed to parse configuration: {0}")]
    Malformed(String)
}
