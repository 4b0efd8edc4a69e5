//! # Lifecycle Policies
//!
//! Branch-wide switches for the two lifecycle behaviours that differ between
//! inns.
//!
//! | Policy | Default | Alternative |
//! |---|---|---|
//! | [`CancellationPolicy`] | `retain`: bill left untouched | `void`: outstanding balance written off |
//! | [`ServiceAttachPolicy`] | `ongoing_only`: closed bookings reject services | `any_status` |

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::types::BookingStatus;

/// What happens to the bill when its booking is cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum CancellationPolicy {
    /// Keep room charge, services and payments as they are.
    #[default]
    Retain,
    /// Raise the discount so that total equals what was paid.
    Void,
}

/// Which bookings accept new service lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ServiceAttachPolicy {
    /// Only ongoing bookings.
    #[default]
    OngoingOnly,
    /// Any booking, including completed and cancelled ones.
    AnyStatus,
}

impl ServiceAttachPolicy {
    /// Whether a booking in `status` may receive a new service line.
    pub fn allows(&self, status: BookingStatus) -> bool {
        match self {
            ServiceAttachPolicy::OngoingOnly => status == BookingStatus::Ongoing,
            ServiceAttachPolicy::AnyStatus => true,
        }
    }
}

/// The full set of lifecycle policies handed to inn-db.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LifecyclePolicy {
    pub cancellation: CancellationPolicy,
    pub service_attach: ServiceAttachPolicy,
}

// =============================================================================
// Parsing (environment configuration)
// =============================================================================

impl FromStr for CancellationPolicy {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "retain" => Ok(CancellationPolicy::Retain),
            "void" => Ok(CancellationPolicy::Void),
            _ => Err(ValidationError::NotAllowed {
                field: "cancellation_policy".to_string(),
                allowed: vec!["retain".to_string(), "void".to_string()],
            }),
        }
    }
}

impl FromStr for ServiceAttachPolicy {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ongoing_only" => Ok(ServiceAttachPolicy::OngoingOnly),
            "any_status" => Ok(ServiceAttachPolicy::AnyStatus),
            _ => Err(ValidationError::NotAllowed {
                field: "service_policy".to_string(),
                allowed: vec!["ongoing_only".to_string(), "any_status".to_string()],
            }),
        }
    }
}

impl fmt::Display for CancellationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CancellationPolicy::Retain => "retain",
            CancellationPolicy::Void => "void",
        })
    }
}

impl fmt::Display for ServiceAttachPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ServiceAttachPolicy::OngoingOnly => "ongoing_only",
            ServiceAttachPolicy::AnyStatus => "any_status",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let p = LifecyclePolicy::default();
        assert_eq!(p.cancellation, CancellationPolicy::Retain);
        assert_eq!(p.service_attach, ServiceAttachPolicy::OngoingOnly);
    }

    #[test]
    fn test_parse() {
        assert_eq!("void".parse::<CancellationPolicy>().unwrap(), CancellationPolicy::Void);
        assert_eq!(" Retain ".parse::<CancellationPolicy>().unwrap(), CancellationPolicy::Retain);
        assert_eq!(
            "any_status".parse::<ServiceAttachPolicy>().unwrap(),
            ServiceAttachPolicy::AnyStatus
        );
        assert!("refund".parse::<CancellationPolicy>().is_err());
        assert!("".parse::<ServiceAttachPolicy>().is_err());
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for p in [CancellationPolicy::Retain, CancellationPolicy::Void] {
            assert_eq!(p.to_string().parse::<CancellationPolicy>().unwrap(), p);
        }
    }

    #[test]
    fn test_service_gate() {
        let strict = ServiceAttachPolicy::OngoingOnly;
        assert!(strict.allows(BookingStatus::Ongoing));
        assert!(!strict.allows(BookingStatus::Completed));
        assert!(!strict.allows(BookingStatus::Cancelled));

        let open = ServiceAttachPolicy::AnyStatus;
        assert!(open.allows(BookingStatus::Cancelled));
    }
}
