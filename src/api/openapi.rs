//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{appointments, availability, blocks, health, holds, payments, working_hours};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Navalha API",
        version = "0.9.0",
        description = "Salon Management System REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html"),
        contact(name = "Navalha Team", email = "contato@navalha.app")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Availability
        availability::free_slots,
        availability::next_available,
        // Holds
        holds::acquire,
        holds::extend,
        holds::confirm,
        holds::release,
        holds::cleanup,
        // Appointments
        appointments::list,
        appointments::get,
        appointments::create,
        appointments::confirm,
        appointments::start,
        appointments::complete,
        appointments::no_show,
        appointments::cancel,
        appointments::reschedule,
        // Working hours
        working_hours::list,
        working_hours::create,
        working_hours::delete,
        // Blocks
        blocks::list,
        blocks::create,
        blocks::approve,
        blocks::reject,
        blocks::delete,
        // Payments
        payments::webhook,
    ),
    components(
        schemas(
            // Availability
            crate::models::FreeSlot,
            crate::models::NextAvailability,
            crate::models::slot::FreeSlotQuery,
            crate::models::slot::NextAvailabilityQuery,
            // Holds
            crate::models::Hold,
            crate::models::hold::AcquireHold,
            crate::models::hold::ExtendHold,
            crate::models::hold::ConfirmHold,
            holds::HoldResponse,
            holds::CleanupResponse,
            // Appointments
            crate::models::Appointment,
            crate::models::appointment::CreateAppointment,
            crate::models::appointment::CancelAppointment,
            crate::models::appointment::RescheduleAppointment,
            crate::models::appointment::AppointmentQuery,
            appointments::RescheduleResponse,
            // Working hours
            crate::models::WorkingHour,
            crate::models::working_hour::CreateWorkingHour,
            // Blocks
            crate::models::ProfessionalBlock,
            crate::models::block::CreateBlock,
            crate::models::block::BlockQuery,
            blocks::BlockDecisionResponse,
            // Deposits / payments
            crate::models::Deposit,
            crate::models::deposit::PaymentWebhook,
            payments::WebhookResponse,
            // Catalog
            crate::models::Professional,
            crate::models::Client,
            crate::models::Service,
            // Enums
            crate::models::enums::AppointmentStatus,
            crate::models::enums::HoldStatus,
            crate::models::enums::ApprovalStatus,
            crate::models::enums::DepositStatus,
            crate::models::enums::BookingRuleType,
            crate::models::enums::CreatedVia,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "availability", description = "Free-slot computation"),
        (name = "holds", description = "Online-booking slot holds"),
        (name = "appointments", description = "Appointment lifecycle"),
        (name = "working-hours", description = "Professional working hours"),
        (name = "blocks", description = "Professional time-off blocks"),
        (name = "payments", description = "Deposit gateway callbacks")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
