//! Business logic services

pub mod appointments;
pub mod availability;
pub mod deposits;
pub mod holds;
pub mod notifications;
pub mod payments;
pub mod schedule;

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};

use crate::{
    clock::{Clock, SystemClock},
    config::{BookingConfig, NotificationsConfig, PaymentsConfig},
    error::{AppError, AppResult},
    repository::Repository,
};

/// Parse a YYYY-MM-DD schedule date
pub(crate) fn parse_date(raw: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| AppError::Validation(format!("Invalid date '{}' (use YYYY-MM-DD)", raw)))
}

/// Parse an HH:MM schedule time
pub(crate) fn parse_time(raw: &str) -> AppResult<NaiveTime> {
    NaiveTime::parse_from_str(raw, "%H:%M")
        .map_err(|_| AppError::Validation(format!("Invalid time '{}' (use HH:MM)", raw)))
}

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub availability: availability::AvailabilityService,
    pub holds: holds::HoldsService,
    pub appointments: appointments::AppointmentsService,
    pub deposits: deposits::DepositsService,
    pub notifications: notifications::NotificationsService,
    pub schedule: schedule::ScheduleService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(
        repository: Repository,
        booking: BookingConfig,
        payments_config: PaymentsConfig,
        notifications_config: NotificationsConfig,
    ) -> Self {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let gateway: Arc<dyn payments::PaymentGateway> =
            Arc::new(payments::HttpPaymentGateway::new(payments_config));
        let notifications = notifications::NotificationsService::new(notifications_config);

        let deposits = deposits::DepositsService::new(
            repository.clone(),
            gateway,
            clock.clone(),
            booking.clone(),
        );

        Self {
            availability: availability::AvailabilityService::new(
                repository.clone(),
                clock.clone(),
                booking.clone(),
            ),
            holds: holds::HoldsService::new(
                repository.clone(),
                deposits.clone(),
                clock.clone(),
                booking.clone(),
            ),
            appointments: appointments::AppointmentsService::new(
                repository.clone(),
                notifications.clone(),
                clock,
                booking,
            ),
            schedule: schedule::ScheduleService::new(repository),
            deposits,
            notifications,
        }
    }
}
