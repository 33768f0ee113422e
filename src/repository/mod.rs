//! Repository layer for database operations

pub mod appointments;
pub mod blocks;
pub mod booking_rules;
pub mod catalog;
pub mod deposits;
pub mod holds;
mod overlap;
pub mod working_hours;

use sqlx::{Pool, Postgres};

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub appointments: appointments::AppointmentsRepository,
    pub blocks: blocks::BlocksRepository,
    pub booking_rules: booking_rules::BookingRulesRepository,
    pub catalog: catalog::CatalogRepository,
    pub deposits: deposits::DepositsRepository,
    pub holds: holds::HoldsRepository,
    pub working_hours: working_hours::WorkingHoursRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            appointments: appointments::AppointmentsRepository::new(pool.clone()),
            blocks: blocks::BlocksRepository::new(pool.clone()),
            booking_rules: booking_rules::BookingRulesRepository::new(pool.clone()),
            catalog: catalog::CatalogRepository::new(pool.clone()),
            deposits: deposits::DepositsRepository::new(pool.clone()),
            holds: holds::HoldsRepository::new(pool.clone()),
            working_hours: working_hours::WorkingHoursRepository::new(pool.clone()),
            pool,
        }
    }
}
