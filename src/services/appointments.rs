//! Appointment lifecycle: creation (staff and hold paths) and the
//! guarded status state machine.

use std::sync::Arc;

use chrono::NaiveDate;
use rand::Rng;
use uuid::Uuid;

use crate::{
    clock::{salon_now, Clock},
    config::BookingConfig,
    error::{AppError, AppResult},
    models::{
        appointment::{CreateAppointment, RescheduleAppointment},
        enums::{AppointmentStatus, CreatedVia, DepositStatus},
        Appointment, Deposit,
    },
    repository::{appointments::NewAppointmentRow, Repository},
    services::{
        notifications::{AppointmentEvent, NotificationsService},
        parse_date, parse_time,
    },
};

/// Unambiguous alphabet for desk-readable confirmation codes
const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

fn confirmation_code() -> String {
    let mut rng = rand::thread_rng();
    (0..6)
        .map(|_| CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())] as char)
        .collect()
}

#[derive(Clone)]
pub struct AppointmentsService {
    repository: Repository,
    notifications: NotificationsService,
    clock: Arc<dyn Clock>,
    booking: BookingConfig,
}

impl AppointmentsService {
    pub fn new(
        repository: Repository,
        notifications: NotificationsService,
        clock: Arc<dyn Clock>,
        booking: BookingConfig,
    ) -> Self {
        Self { repository, notifications, clock, booking }
    }

    /// Get appointment by ID
    pub async fn get(&self, id: Uuid) -> AppResult<Appointment> {
        self.repository.appointments.get(id).await
    }

    /// List appointments, optionally narrowed to professional and day
    pub async fn list(
        &self,
        salon_id: Uuid,
        professional_id: Option<Uuid>,
        date: Option<NaiveDate>,
    ) -> AppResult<Vec<Appointment>> {
        self.repository.appointments.list(salon_id, professional_id, date).await
    }

    /// Staff direct path. Shares the hold path's agenda lock and overlap
    /// predicate inside the insert transaction, so bypassing holds never
    /// bypasses the no-double-booking invariant.
    pub async fn create_staff(
        &self,
        salon_id: Uuid,
        req: &CreateAppointment,
    ) -> AppResult<Appointment> {
        let date = parse_date(&req.date)?;
        let start_time = parse_time(&req.start_time)?;

        let service = self
            .repository
            .catalog
            .get_service(salon_id, req.service_id)
            .await?;
        if !service.active {
            return Err(AppError::Validation("Service is not active".to_string()));
        }
        self.repository
            .catalog
            .get_professional(salon_id, req.professional_id)
            .await?;
        self.repository.catalog.get_client(salon_id, req.client_id).await?;

        let row = NewAppointmentRow {
            salon_id,
            professional_id: req.professional_id,
            client_id: req.client_id,
            service_id: req.service_id,
            date,
            start_time,
            duration_minutes: service.duration_minutes,
            created_via: CreatedVia::Staff,
            reschedule_of: None,
            confirmation_code: confirmation_code(),
            notes: req.notes.clone(),
        };
        self.repository
            .appointments
            .insert_guarded(&row, self.clock.now_utc())
            .await
    }

    /// Consume a hold into an appointment (non-deposit online path, or
    /// finalization after payment). A pending deposit gates consumption.
    pub async fn create_from_hold(
        &self,
        hold_id: Uuid,
        client_id: Option<Uuid>,
        notes: Option<String>,
    ) -> AppResult<Appointment> {
        if let Some(deposit) = self.repository.deposits.get_by_hold(hold_id).await? {
            match deposit.status {
                DepositStatus::Paid => {}
                DepositStatus::Pending => {
                    return Err(AppError::DepositNotPaid(
                        "A deposit is required and has not been paid yet".to_string(),
                    ));
                }
                DepositStatus::Expired | DepositStatus::Refunded => {
                    return Err(AppError::HoldExpired(
                        "The deposit window closed; acquire a new slot".to_string(),
                    ));
                }
            }
        }

        let (appointment, _hold) = self
            .repository
            .appointments
            .insert_from_hold(hold_id, client_id, notes, confirmation_code(), self.clock.now_utc())
            .await?;
        tracing::info!(appointment_id = %appointment.id, hold_id = %hold_id, "hold consumed into appointment");
        Ok(appointment)
    }

    /// Finalize a deposit-gated booking after the gateway confirmed
    /// payment; the hold already carries client and service.
    pub async fn finalize_deposit_booking(&self, deposit: &Deposit) -> AppResult<Appointment> {
        self.create_from_hold(deposit.hold_id, None, None).await
    }

    /// SCHEDULED -> CONFIRMED
    pub async fn confirm(&self, id: Uuid) -> AppResult<Appointment> {
        let appointment = self
            .repository
            .appointments
            .transition(id, &[AppointmentStatus::Scheduled], AppointmentStatus::Confirmed)
            .await?;
        self.notify(AppointmentEvent::Confirmed, &appointment).await;
        Ok(appointment)
    }

    /// SCHEDULED|CONFIRMED -> STARTED (service begins)
    pub async fn start(&self, id: Uuid) -> AppResult<Appointment> {
        self.repository
            .appointments
            .transition(
                id,
                &[AppointmentStatus::Scheduled, AppointmentStatus::Confirmed],
                AppointmentStatus::Started,
            )
            .await
    }

    /// STARTED -> COMPLETED (terminal; precondition for the POS ticket)
    pub async fn complete(&self, id: Uuid) -> AppResult<Appointment> {
        self.repository
            .appointments
            .transition(id, &[AppointmentStatus::Started], AppointmentStatus::Completed)
            .await
    }

    /// CONFIRMED|STARTED -> NO_SHOW, only once the scheduled start has
    /// passed in salon-local time
    pub async fn no_show(&self, id: Uuid) -> AppResult<Appointment> {
        let appointment = self.repository.appointments.get(id).await?;
        let now_local = salon_now(self.clock.as_ref(), self.booking.utc_offset_minutes);
        if appointment.starts_at() > now_local {
            return Err(AppError::InvalidTransition(format!(
                "Appointment {} has not reached its scheduled start yet",
                id
            )));
        }

        let appointment = self
            .repository
            .appointments
            .transition(
                id,
                &[AppointmentStatus::Confirmed, AppointmentStatus::Started],
                AppointmentStatus::NoShow,
            )
            .await?;
        self.notify(AppointmentEvent::NoShow, &appointment).await;
        Ok(appointment)
    }

    /// Cancel from any non-terminal state, recording reason and actor
    pub async fn cancel(
        &self,
        id: Uuid,
        reason: Option<String>,
        actor: Option<String>,
    ) -> AppResult<Appointment> {
        let appointment = self
            .repository
            .appointments
            .cancel(
                id,
                &[
                    AppointmentStatus::Scheduled,
                    AppointmentStatus::Confirmed,
                    AppointmentStatus::Started,
                ],
                reason,
                actor,
            )
            .await?;
        self.notify(AppointmentEvent::Cancelled, &appointment).await;
        Ok(appointment)
    }

    /// Cancel + recreate. The original is never edited in place, so its
    /// history and any linked hold or deposit stay traceable.
    pub async fn reschedule(
        &self,
        id: Uuid,
        req: &RescheduleAppointment,
        actor: Option<String>,
    ) -> AppResult<(Appointment, Appointment)> {
        let new_date = parse_date(&req.date)?;
        let new_start_time = parse_time(&req.start_time)?;

        let original = self.repository.appointments.get(id).await?;
        let professional_id = req.professional_id.unwrap_or(original.professional_id);
        if professional_id != original.professional_id {
            self.repository
                .catalog
                .get_professional(original.salon_id, professional_id)
                .await?;
        }

        let (cancelled, replacement) = self
            .repository
            .appointments
            .reschedule(
                id,
                professional_id,
                new_date,
                new_start_time,
                confirmation_code(),
                actor,
                self.clock.now_utc(),
            )
            .await?;
        self.notify(AppointmentEvent::Cancelled, &cancelled).await;
        Ok((cancelled, replacement))
    }

    /// Fire-and-forget: a notification failure never rolls back a
    /// committed transition
    async fn notify(&self, event: AppointmentEvent, appointment: &Appointment) {
        match self
            .repository
            .catalog
            .get_client(appointment.salon_id, appointment.client_id)
            .await
        {
            Ok(client) => self.notifications.dispatch(event, appointment, &client),
            Err(e) => {
                tracing::warn!(appointment_id = %appointment.id, error = %e, "could not load client for notification");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confirmation_codes_use_the_unambiguous_alphabet() {
        for _ in 0..50 {
            let code = confirmation_code();
            assert_eq!(code.len(), 6);
            assert!(code.bytes().all(|b| CODE_ALPHABET.contains(&b)));
        }
    }
}
