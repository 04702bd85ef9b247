use std::fmt;

/// One step of the per-transaction pipeline, used to tag latency samples,
/// drop reasons, and budget-exceeded errors so telemetry can attribute them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Ingest,
    Filter,
    Simulate,
    Size,
    Viability,
    Build,
    Submit
}

impl Stage {
    /// All stages in pipeline order, for iterating latency tables.
    pub const ALL: [Stage; 7] = [
        Stage::Ingest,
        Stage::Filter,
        Stage::Simulate,
        Stage::Size,
        Stage::Viability,
        Stage::Build,
        Stage::Submit
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Ingest => "ingest",
            Stage::Filter => "filter",
            Stage::Simulate => "simulate",
            Stage::Size => "size",
            Stage::Viability => "viability",
            Stage::Build => "build",
            Stage::Submit => "submit"
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
