//! The per-transaction state machine (§4.8): `Ingested -> Parsed -> Filtered
//! -> Simulated -> Sized -> Viable -> Built -> Dispatched`, terminal states
//! `Dispatched` or `Dropped{stage, reason}`.

use vanguard_types::{Bundle, DropReason, RelayOutcome, Stage};

/// Where one pipeline cycle landed.
#[derive(Debug, Clone)]
pub enum CycleOutcome {
    /// Terminal success: the bundle was handed to the relay dispatcher.
    /// `outcomes` records every relay's response.
    Dispatched { bundle: Bundle, outcomes: Vec<RelayOutcome> },
    /// Terminal drop. `reason` is `None` only for a Filter-stage rejection,
    /// which §4.8 calls out as "not an error" — counted, but not part of
    /// the typed `DropReason` taxonomy.
    Dropped { stage: Stage, reason: Option<DropReason> }
}

impl CycleOutcome {
    pub fn stage_reached(&self) -> Stage {
        match self {
            CycleOutcome::Dispatched { .. } => Stage::Submit,
            CycleOutcome::Dropped { stage, .. } => *stage
        }
    }

    pub fn is_dispatched(&self) -> bool {
        matches!(self, CycleOutcome::Dispatched { .. })
    }
}
