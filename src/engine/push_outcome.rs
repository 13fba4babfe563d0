use strum::Display;

/// What happened to a pushed measurement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum PushOutcome {
    /// Handed to the sink
    Emitted,

    /// Recognized, but a dimension rule rejected one of its labels
    Filtered,

    /// The metric name is not mapped in the resolved scope
    Unmapped,
}

impl PushOutcome {
    /// Whether the metric was recognized, regardless of whether it was emitted
    #[must_use]
    pub const fn is_accepted(self) -> bool {
        !matches!(self, Self::Unmapped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_accepted() {
        assert!(PushOutcome::Emitted.is_accepted());
        assert!(PushOutcome::Filtered.is_accepted());
        assert!(!PushOutcome::Unmapped.is_accepted());
    }
}
