use std::fmt;

use chrono::{DateTime, Utc};

/// Gateway-reported payment status. The gateway vocabulary is an open set,
/// so anything outside the known outcomes lands in `Other` and is handled
/// deliberately (logged, never misrouted).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
    Other(String),
}

impl PaymentStatus {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "pending" => Self::Pending,
            "approved" => Self::Approved,
            "rejected" => Self::Rejected,
            "cancelled" => Self::Cancelled,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Cancelled => "cancelled",
            Self::Other(raw) => raw,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One buyer's attempt to pay for one product, keyed by the gateway
/// transaction identifier. Rows start `pending` and are only ever mutated
/// by the reconciliation loop.
#[derive(Debug, Clone)]
pub struct Purchase {
    pub payment_id: String,
    pub buyer_id: i64,
    pub product_key: String,
    pub status: PaymentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewPurchase {
    pub payment_id: String,
    pub buyer_id: i64,
    pub product_key: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_statuses() {
        assert_eq!(PaymentStatus::parse("pending"), PaymentStatus::Pending);
        assert_eq!(PaymentStatus::parse("approved"), PaymentStatus::Approved);
        assert_eq!(PaymentStatus::parse("rejected"), PaymentStatus::Rejected);
        assert_eq!(PaymentStatus::parse("cancelled"), PaymentStatus::Cancelled);
    }

    #[test]
    fn unknown_status_is_preserved_verbatim() {
        let status = PaymentStatus::parse("in_process");
        assert_eq!(status, PaymentStatus::Other("in_process".to_string()));
        assert_eq!(status.as_str(), "in_process");
        assert!(!status.is_pending());
    }

    #[test]
    fn round_trips_through_as_str() {
        for raw in ["pending", "approved", "rejected", "cancelled", "charged_back"] {
            assert_eq!(PaymentStatus::parse(raw).as_str(), raw);
        }
    }
}
