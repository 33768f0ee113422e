//! Availability engine: working hours minus blocks, appointments and
//! live holds, walked into bookable slot candidates.

use std::sync::Arc;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use uuid::Uuid;

use crate::{
    clock::{salon_now, Clock},
    config::BookingConfig,
    error::{AppError, AppResult},
    models::{slot::NextAvailability, FreeSlot},
    repository::Repository,
};

/// Half-open interval in seconds from midnight; `end` may be 86400 so a
/// busy range can cover the rest of the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Span {
    pub start: u32,
    pub end: u32,
}

const DAY_SECS: u32 = 86_400;

fn secs(t: NaiveTime) -> u32 {
    t.num_seconds_from_midnight()
}

fn time(s: u32) -> NaiveTime {
    NaiveTime::from_num_seconds_from_midnight_opt(s, 0).unwrap_or(NaiveTime::MIN)
}

/// Subtract every busy range from the open ranges, preserving order.
pub(crate) fn carve(open: Vec<Span>, busy: &[Span]) -> Vec<Span> {
    let mut result = open;
    for b in busy {
        let mut next = Vec::with_capacity(result.len() + 1);
        for o in result {
            if b.end <= o.start || o.end <= b.start {
                next.push(o);
                continue;
            }
            if b.start > o.start {
                next.push(Span { start: o.start, end: b.start });
            }
            if b.end < o.end {
                next.push(Span { start: b.end, end: o.end });
            }
        }
        result = next;
    }
    result
}

/// Walk each open range in granularity steps, emitting every start whose
/// service interval fits entirely inside that range. Deterministic:
/// identical inputs yield identical candidates.
pub(crate) fn candidates(open: &[Span], duration_secs: u32, granularity_secs: u32) -> Vec<Span> {
    let mut slots = Vec::new();
    if duration_secs == 0 || granularity_secs == 0 {
        return slots;
    }
    for o in open {
        let mut t = o.start;
        while t + duration_secs <= o.end {
            slots.push(Span { start: t, end: t + duration_secs });
            t += granularity_secs;
        }
    }
    slots
}

/// Clip a salon-local datetime window to one day's seconds
fn clip_to_day(starts_at: NaiveDateTime, ends_at: NaiveDateTime, date: NaiveDate) -> Option<Span> {
    let day_start = date.and_hms_opt(0, 0, 0).expect("midnight");
    let day_end = day_start + Duration::days(1);
    let s = starts_at.max(day_start);
    let e = ends_at.min(day_end);
    if s >= e {
        return None;
    }
    let start = secs(s.time());
    let end = if e == day_end { DAY_SECS } else { secs(e.time()) };
    Some(Span { start, end })
}

#[derive(Clone)]
pub struct AvailabilityService {
    repository: Repository,
    clock: Arc<dyn Clock>,
    booking: BookingConfig,
}

impl AvailabilityService {
    pub fn new(repository: Repository, clock: Arc<dyn Clock>, booking: BookingConfig) -> Self {
        Self { repository, clock, booking }
    }

    /// Free slot candidates for one professional and day, in
    /// chronological order. No working hours means no availability, not
    /// an error; pending blocks never restrict.
    pub async fn free_slots(
        &self,
        _salon_id: Uuid,
        professional_id: Uuid,
        date: NaiveDate,
        service_duration_minutes: i32,
        granularity_minutes: u32,
    ) -> AppResult<Vec<FreeSlot>> {
        if service_duration_minutes <= 0 {
            return Err(AppError::Validation(
                "Service duration must be positive".to_string(),
            ));
        }

        let day_of_week = date.weekday().num_days_from_monday() as i16;
        let hours = self
            .repository
            .working_hours
            .for_day(professional_id, day_of_week)
            .await?;
        if hours.is_empty() {
            return Ok(Vec::new());
        }
        let open: Vec<Span> = hours
            .iter()
            .map(|h| Span { start: secs(h.start_time), end: secs(h.end_time) })
            .collect();

        let now = self.clock.now_utc();
        let mut busy: Vec<Span> = Vec::new();

        for block in self
            .repository
            .blocks
            .approved_for_date(professional_id, date)
            .await?
        {
            if let Some(span) = clip_to_day(block.starts_at, block.ends_at, date) {
                busy.push(span);
            }
        }

        for appointment in self
            .repository
            .appointments
            .active_for_date(professional_id, date)
            .await?
        {
            let start = secs(appointment.start_time);
            let end = (start + appointment.duration_minutes as u32 * 60).min(DAY_SECS);
            busy.push(Span { start, end });
        }

        // Live holds count as occupied so a slot mid-checkout elsewhere
        // is never offered; expiry is checked against now, not the sweep
        for hold in self
            .repository
            .holds
            .live_for_date(professional_id, date, now)
            .await?
        {
            let start = secs(hold.start_time);
            let end = (start + hold.duration_minutes as u32 * 60).min(DAY_SECS);
            busy.push(Span { start, end });
        }

        // Never offer slots already in the past today
        let local = salon_now(self.clock.as_ref(), self.booking.utc_offset_minutes);
        if date == local.date() {
            let cutoff = secs(local.time());
            if cutoff > 0 {
                busy.push(Span { start: 0, end: cutoff });
            }
        } else if date < local.date() {
            return Ok(Vec::new());
        }

        let open = carve(open, &busy);
        let slots = candidates(
            &open,
            service_duration_minutes as u32 * 60,
            granularity_minutes.max(1) * 60,
        );
        Ok(slots
            .into_iter()
            .map(|s| FreeSlot { start_time: time(s.start), end_time: time(s.end) })
            .collect())
    }

    /// Free slots for a service, using the configured granularity
    pub async fn free_slots_for_service(
        &self,
        salon_id: Uuid,
        professional_id: Uuid,
        service_id: Uuid,
        date: NaiveDate,
    ) -> AppResult<Vec<FreeSlot>> {
        let service = self.repository.catalog.get_service(salon_id, service_id).await?;
        self.repository
            .catalog
            .get_professional(salon_id, professional_id)
            .await?;
        self.free_slots(
            salon_id,
            professional_id,
            date,
            service.duration_minutes,
            self.booking.slot_granularity_minutes,
        )
        .await
    }

    /// Scan forward day-by-day until a professional has a free slot for
    /// the service, bounded by the configured horizon.
    pub async fn next_available(
        &self,
        salon_id: Uuid,
        service_id: Uuid,
        professional_id: Option<Uuid>,
    ) -> AppResult<NextAvailability> {
        let service = self.repository.catalog.get_service(salon_id, service_id).await?;

        let professionals = match professional_id {
            Some(id) => {
                vec![self.repository.catalog.get_professional(salon_id, id).await?]
            }
            None => self.repository.catalog.list_active_professionals(salon_id).await?,
        };
        if professionals.is_empty() {
            return Err(AppError::NotFound(
                "Salon has no active professionals".to_string(),
            ));
        }

        let today = salon_now(self.clock.as_ref(), self.booking.utc_offset_minutes).date();
        for day in 0..self.booking.next_available_horizon_days as i64 {
            let date = today + Duration::days(day);
            for professional in &professionals {
                let slots = self
                    .free_slots(
                        salon_id,
                        professional.id,
                        date,
                        service.duration_minutes,
                        self.booking.slot_granularity_minutes,
                    )
                    .await?;
                if !slots.is_empty() {
                    return Ok(NextAvailability {
                        professional_id: professional.id,
                        date,
                        slots,
                    });
                }
            }
        }
        Err(AppError::NotFound(format!(
            "No availability within the next {} days",
            self.booking.next_available_horizon_days
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hm(h: u32, m: u32) -> u32 {
        h * 3600 + m * 60
    }

    fn span(start: u32, end: u32) -> Span {
        Span { start, end }
    }

    #[test]
    fn carve_leaves_untouched_ranges_alone() {
        let open = vec![span(hm(9, 0), hm(12, 0))];
        let out = carve(open.clone(), &[span(hm(13, 0), hm(14, 0))]);
        assert_eq!(out, open);
    }

    #[test]
    fn carve_splits_around_a_busy_range() {
        let open = vec![span(hm(9, 0), hm(12, 0))];
        let out = carve(open, &[span(hm(10, 0), hm(10, 30))]);
        assert_eq!(out, vec![span(hm(9, 0), hm(10, 0)), span(hm(10, 30), hm(12, 0))]);
    }

    #[test]
    fn carve_truncates_edges_and_swallows_covered_ranges() {
        let open = vec![span(hm(9, 0), hm(12, 0)), span(hm(14, 0), hm(15, 0))];
        let out = carve(open, &[span(hm(8, 0), hm(9, 30)), span(hm(13, 30), hm(16, 0))]);
        assert_eq!(out, vec![span(hm(9, 30), hm(12, 0))]);
    }

    #[test]
    fn candidates_respect_duration_and_granularity() {
        // Working 09:00-12:00 with a 10:00-10:30 appointment, 30-minute
        // service at 15-minute steps
        let open = carve(
            vec![span(hm(9, 0), hm(12, 0))],
            &[span(hm(10, 0), hm(10, 30))],
        );
        let slots = candidates(&open, 30 * 60, 15 * 60);
        let starts: Vec<u32> = slots.iter().map(|s| s.start).collect();
        assert_eq!(
            starts,
            vec![
                hm(9, 0),
                hm(9, 15),
                hm(9, 30),
                hm(10, 30),
                hm(10, 45),
                hm(11, 0),
                hm(11, 15),
                hm(11, 30),
            ]
        );
        // 09:45 would run into the appointment, 11:45 past closing
        assert!(!starts.contains(&hm(9, 45)));
        assert!(!starts.contains(&hm(11, 45)));
    }

    #[test]
    fn candidates_empty_when_service_outlasts_every_range() {
        let open = vec![span(hm(9, 0), hm(9, 45))];
        assert!(candidates(&open, 60 * 60, 15 * 60).is_empty());
    }

    #[test]
    fn candidates_walk_split_shifts_independently() {
        let open = vec![span(hm(9, 0), hm(10, 0)), span(hm(14, 0), hm(15, 0))];
        let slots = candidates(&open, 60 * 60, 30 * 60);
        let starts: Vec<u32> = slots.iter().map(|s| s.start).collect();
        assert_eq!(starts, vec![hm(9, 0), hm(14, 0)]);
    }

    #[test]
    fn clip_to_day_handles_multi_day_blocks() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        // Vacation spanning the whole day
        let clipped = clip_to_day(
            NaiveDate::from_ymd_opt(2025, 3, 8).unwrap().and_hms_opt(0, 0, 0).unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 12).unwrap().and_hms_opt(0, 0, 0).unwrap(),
            date,
        )
        .unwrap();
        assert_eq!(clipped, span(0, DAY_SECS));

        // Afternoon block on the day itself
        let clipped = clip_to_day(
            date.and_hms_opt(13, 0, 0).unwrap(),
            date.and_hms_opt(18, 0, 0).unwrap(),
            date,
        )
        .unwrap();
        assert_eq!(clipped, span(hm(13, 0), hm(18, 0)));

        // Block entirely elsewhere
        assert!(clip_to_day(
            NaiveDate::from_ymd_opt(2025, 3, 11).unwrap().and_hms_opt(9, 0, 0).unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 11).unwrap().and_hms_opt(10, 0, 0).unwrap(),
            date,
        )
        .is_none());
    }
}
