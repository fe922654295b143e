//! Domain error types.
//!
//! Validation failures for value objects built during a query. Distinct from
//! the loading and index-build errors, which identify offending feed records.

/// Domain-level errors for itinerary construction.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DomainError {
    /// Leg boards and alights at the same stop, or travels backwards in time
    #[error("invalid leg: {0}")]
    InvalidLeg(&'static str),

    /// Second leg uses the same trip as the first (a continuation, not a transfer)
    #[error("second leg continues the same trip")]
    ContinuationNotTransfer,

    /// Second leg departs before the first leg arrives
    #[error("transfer boards before the first leg arrives")]
    TransferBeforeArrival,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = DomainError::InvalidLeg("board and alight stop are the same");
        assert_eq!(
            err.to_string(),
            "invalid leg: board and alight stop are the same"
        );

        assert_eq!(
            DomainError::ContinuationNotTransfer.to_string(),
            "second leg continues the same trip"
        );

        assert_eq!(
            DomainError::TransferBeforeArrival.to_string(),
            "transfer boards before the first leg arrives"
        );
    }
}
