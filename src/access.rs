//! Payment gating for course content and certificates.
//!
//! Everything here is pure: callers load the free-mode window, the course
//! pricing and the user's orders, then ask for a decision at a given instant.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::{
    entity::{
        courses,
        free_mode_settings,
        payment_orders::{self, PaymentStatus},
    },
    error::AppError,
};

/// Global window during which every course is free.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FreeModeWindow {
    pub is_enabled: bool,
    pub start_at: Option<DateTime<Utc>>,
    pub end_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FreeModePhase {
    Disabled,
    Upcoming,
    Active,
    Finished,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WindowError {
    #[error("start and end dates are required to enable free mode")]
    MissingBounds,
    #[error("end date must be after start date")]
    EndNotAfterStart,
}

impl From<WindowError> for AppError {
    fn from(err: WindowError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl FreeModeWindow {
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Both bounds are inclusive and must be present.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.phase(now) == FreeModePhase::Active
    }

    pub fn phase(&self, now: DateTime<Utc>) -> FreeModePhase {
        if !self.is_enabled {
            return FreeModePhase::Disabled;
        }
        match (self.start_at, self.end_at) {
            (Some(start), Some(_)) if now < start => FreeModePhase::Upcoming,
            (Some(_), Some(end)) if now > end => FreeModePhase::Finished,
            (Some(_), Some(_)) => FreeModePhase::Active,
            _ => FreeModePhase::Disabled,
        }
    }

    /// Instant a countdown should target: the end while active, the start while upcoming.
    pub fn countdown_to(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self.phase(now) {
            FreeModePhase::Active => self.end_at,
            FreeModePhase::Upcoming => self.start_at,
            FreeModePhase::Disabled | FreeModePhase::Finished => None,
        }
    }

    /// Checks applied before a window is saved. Disabled windows are stored as given.
    pub fn validate(&self) -> Result<(), WindowError> {
        if !self.is_enabled {
            return Ok(());
        }
        match (self.start_at, self.end_at) {
            (Some(start), Some(end)) if end > start => Ok(()),
            (Some(_), Some(_)) => Err(WindowError::EndNotAfterStart),
            _ => Err(WindowError::MissingBounds),
        }
    }
}

impl From<&free_mode_settings::Model> for FreeModeWindow {
    fn from(model: &free_mode_settings::Model) -> Self {
        Self {
            is_enabled: model.is_enabled,
            start_at: model.start_at.map(|dt| dt.with_timezone(&Utc)),
            end_at: model.end_at.map(|dt| dt.with_timezone(&Utc)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoursePricing {
    pub payment_enabled: bool,
    pub price: i64,
}

impl CoursePricing {
    pub fn is_payable(&self) -> bool {
        self.payment_enabled && self.price > 0
    }
}

impl From<&courses::Model> for CoursePricing {
    fn from(model: &courses::Model) -> Self {
        Self {
            payment_enabled: model.payment_enabled,
            price: model.price,
        }
    }
}

/// The parts of an order the gate looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderSnapshot {
    pub status: PaymentStatus,
    pub created_at: DateTime<Utc>,
}

impl From<&payment_orders::Model> for OrderSnapshot {
    fn from(model: &payment_orders::Model) -> Self {
        Self {
            status: model.status,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

/// Current status of an order log: the most recent order by creation time.
pub fn latest_status(orders: &[OrderSnapshot]) -> Option<PaymentStatus> {
    orders
        .iter()
        .max_by_key(|order| order.created_at)
        .map(|order| order.status)
}

pub fn has_approved(orders: &[OrderSnapshot]) -> bool {
    orders
        .iter()
        .any(|order| order.status == PaymentStatus::Approved)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AccessStatus {
    Approved,
    Free,
    FreeMode,
    AwaitingVerification,
    Rejected,
    Pending,
    PaymentRequired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct AccessDecision {
    pub locked: bool,
    pub price: i64,
    pub status_label: AccessStatus,
    pub payment_status: Option<PaymentStatus>,
}

/// Decide whether a user may view a course's paid content.
///
/// An approved order unlocks the course for good, whatever the free-mode state.
pub fn course_access(
    pricing: CoursePricing,
    window: &FreeModeWindow,
    orders: &[OrderSnapshot],
    now: DateTime<Utc>,
) -> AccessDecision {
    let payment_status = latest_status(orders);
    let status_label = if has_approved(orders) {
        AccessStatus::Approved
    } else if !pricing.is_payable() {
        AccessStatus::Free
    } else if window.is_active(now) {
        AccessStatus::FreeMode
    } else {
        label_for_latest(payment_status)
    };

    AccessDecision {
        locked: is_unpaid(status_label),
        price: pricing.price,
        status_label,
        payment_status,
    }
}

/// Certificates are never waived by free mode.
pub fn certificate_access(price: i64, orders: &[OrderSnapshot]) -> AccessDecision {
    let payment_status = latest_status(orders);
    let status_label = if has_approved(orders) {
        AccessStatus::Approved
    } else {
        label_for_latest(payment_status)
    };

    AccessDecision {
        locked: status_label != AccessStatus::Approved,
        price,
        status_label,
        payment_status,
    }
}

fn label_for_latest(status: Option<PaymentStatus>) -> AccessStatus {
    match status {
        Some(PaymentStatus::AwaitingVerification) => AccessStatus::AwaitingVerification,
        Some(PaymentStatus::Rejected) => AccessStatus::Rejected,
        Some(PaymentStatus::Pending) => AccessStatus::Pending,
        Some(PaymentStatus::Approved) => AccessStatus::Approved,
        None => AccessStatus::PaymentRequired,
    }
}

fn is_unpaid(label: AccessStatus) -> bool {
    matches!(
        label,
        AccessStatus::PaymentRequired
            | AccessStatus::AwaitingVerification
            | AccessStatus::Rejected
            | AccessStatus::Pending
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap()
    }

    fn paid(price: i64) -> CoursePricing {
        CoursePricing {
            payment_enabled: true,
            price,
        }
    }

    fn order(status: PaymentStatus, minutes_ago: i64) -> OrderSnapshot {
        OrderSnapshot {
            status,
            created_at: now() - Duration::minutes(minutes_ago),
        }
    }

    fn active_window() -> FreeModeWindow {
        FreeModeWindow {
            is_enabled: true,
            start_at: Some(now() - Duration::days(1)),
            end_at: Some(now() + Duration::days(1)),
        }
    }

    #[test]
    fn paid_course_without_orders_is_locked() {
        let decision = course_access(paid(1000), &FreeModeWindow::disabled(), &[], now());
        assert!(decision.locked);
        assert_eq!(decision.price, 1000);
        assert_eq!(decision.status_label, AccessStatus::PaymentRequired);
        assert_eq!(decision.payment_status, None);
    }

    #[test]
    fn active_free_mode_unlocks_every_course() {
        let decision = course_access(paid(1500), &active_window(), &[], now());
        assert!(!decision.locked);
        assert_eq!(decision.status_label, AccessStatus::FreeMode);
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let window = active_window();
        assert!(window.is_active(window.start_at.unwrap()));
        assert!(window.is_active(window.end_at.unwrap()));
        assert!(!window.is_active(window.end_at.unwrap() + Duration::seconds(1)));
    }

    #[test]
    fn approved_order_unlocks_regardless_of_free_mode() {
        let orders = [order(PaymentStatus::Approved, 30)];
        for window in [FreeModeWindow::disabled(), active_window()] {
            let decision = course_access(paid(1000), &window, &orders, now());
            assert!(!decision.locked);
            assert_eq!(decision.status_label, AccessStatus::Approved);
        }
    }

    #[test]
    fn approval_in_older_order_still_grants_access() {
        let orders = [
            order(PaymentStatus::Approved, 120),
            order(PaymentStatus::Rejected, 10),
        ];
        let decision = course_access(paid(1000), &FreeModeWindow::disabled(), &orders, now());
        assert!(!decision.locked);
        assert_eq!(decision.payment_status, Some(PaymentStatus::Rejected));
    }

    #[test]
    fn latest_order_drives_the_label() {
        let orders = [
            order(PaymentStatus::Rejected, 60),
            order(PaymentStatus::AwaitingVerification, 5),
        ];
        let decision = course_access(paid(900), &FreeModeWindow::disabled(), &orders, now());
        assert!(decision.locked);
        assert_eq!(decision.status_label, AccessStatus::AwaitingVerification);
    }

    #[test]
    fn unpriced_or_disabled_courses_are_free() {
        let zero = course_access(paid(0), &FreeModeWindow::disabled(), &[], now());
        assert!(!zero.locked);
        assert_eq!(zero.status_label, AccessStatus::Free);

        let disabled = CoursePricing {
            payment_enabled: false,
            price: 500,
        };
        let decision = course_access(disabled, &FreeModeWindow::disabled(), &[], now());
        assert!(!decision.locked);
    }

    #[test]
    fn deleted_approval_locks_again() {
        let orders = [order(PaymentStatus::Approved, 1)];
        let before = course_access(paid(1000), &FreeModeWindow::disabled(), &orders, now());
        assert!(!before.locked);
        let after = course_access(paid(1000), &FreeModeWindow::disabled(), &[], now());
        assert!(after.locked);
    }

    #[test]
    fn certificates_ignore_free_mode() {
        let decision = certificate_access(1000, &[]);
        assert!(decision.locked);
        let decision = certificate_access(1000, &[order(PaymentStatus::Approved, 1)]);
        assert!(!decision.locked);
    }

    #[test]
    fn window_phases() {
        let window = active_window();
        assert_eq!(window.phase(now() - Duration::days(2)), FreeModePhase::Upcoming);
        assert_eq!(window.phase(now()), FreeModePhase::Active);
        assert_eq!(window.phase(now() + Duration::days(2)), FreeModePhase::Finished);
        assert_eq!(window.countdown_to(now()), window.end_at);
        assert_eq!(window.countdown_to(now() - Duration::days(2)), window.start_at);
        assert_eq!(window.countdown_to(now() + Duration::days(2)), None);

        let no_bounds = FreeModeWindow {
            is_enabled: true,
            start_at: None,
            end_at: None,
        };
        assert_eq!(no_bounds.phase(now()), FreeModePhase::Disabled);
    }

    #[test]
    fn enabling_requires_ordered_bounds() {
        let mut window = active_window();
        assert_eq!(window.validate(), Ok(()));

        window.end_at = window.start_at;
        assert_eq!(window.validate(), Err(WindowError::EndNotAfterStart));

        window.end_at = None;
        assert_eq!(window.validate(), Err(WindowError::MissingBounds));

        window.is_enabled = false;
        assert_eq!(window.validate(), Ok(()));
    }
}
