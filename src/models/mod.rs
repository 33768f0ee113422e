//! Data models for Navalha

pub mod appointment;
pub mod block;
pub mod booking_rule;
pub mod catalog;
pub mod deposit;
pub mod enums;
pub mod hold;
pub mod slot;
pub mod working_hour;

// Re-export commonly used types
pub use appointment::Appointment;
pub use block::ProfessionalBlock;
pub use booking_rule::BookingRule;
pub use catalog::{Client, Professional, Service};
pub use deposit::Deposit;
pub use enums::{
    AppointmentStatus, ApprovalStatus, BookingRuleType, CreatedVia, DepositStatus, HoldStatus,
};
pub use hold::Hold;
pub use slot::{FreeSlot, NextAvailability};
pub use working_hour::WorkingHour;
