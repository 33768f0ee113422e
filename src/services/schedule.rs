//! Schedule administration: working hours and time-off blocks

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        enums::ApprovalStatus, working_hour::CreateWorkingHour, Appointment, ProfessionalBlock,
        WorkingHour,
    },
    repository::{blocks::NewBlock, Repository},
    services::parse_time,
};

#[derive(Clone)]
pub struct ScheduleService {
    repository: Repository,
}

impl ScheduleService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    // ---- Working hours ----

    pub async fn list_working_hours(
        &self,
        salon_id: Uuid,
        professional_id: Uuid,
    ) -> AppResult<Vec<WorkingHour>> {
        self.repository
            .catalog
            .get_professional(salon_id, professional_id)
            .await?;
        self.repository.working_hours.list(professional_id).await
    }

    pub async fn create_working_hour(
        &self,
        salon_id: Uuid,
        professional_id: Uuid,
        data: &CreateWorkingHour,
    ) -> AppResult<WorkingHour> {
        self.repository
            .catalog
            .get_professional(salon_id, professional_id)
            .await?;
        let start_time = parse_time(&data.start_time)?;
        let end_time = parse_time(&data.end_time)?;
        self.repository
            .working_hours
            .create(salon_id, professional_id, data.day_of_week, start_time, end_time)
            .await
    }

    pub async fn delete_working_hour(&self, id: Uuid) -> AppResult<()> {
        self.repository.working_hours.delete(id).await
    }

    // ---- Blocks ----

    pub async fn list_blocks(
        &self,
        salon_id: Uuid,
        professional_id: Option<Uuid>,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> AppResult<Vec<ProfessionalBlock>> {
        self.repository.blocks.list(salon_id, professional_id, from, to).await
    }

    pub async fn create_block(&self, block: &NewBlock) -> AppResult<ProfessionalBlock> {
        self.repository
            .catalog
            .get_professional(block.salon_id, block.professional_id)
            .await?;
        self.repository.blocks.create(block).await
    }

    /// Approve a pending block and report which active appointments it
    /// collides with; the manager follows up, nothing is auto-cancelled.
    pub async fn approve_block(
        &self,
        id: Uuid,
    ) -> AppResult<(ProfessionalBlock, Vec<Appointment>)> {
        let block = self.repository.blocks.decide(id, ApprovalStatus::Approved).await?;
        let conflicts = self.repository.blocks.conflicting_appointments(&block).await?;
        if !conflicts.is_empty() {
            tracing::info!(
                block_id = %block.id,
                conflicts = conflicts.len(),
                "approved block collides with existing appointments"
            );
        }
        Ok((block, conflicts))
    }

    pub async fn reject_block(&self, id: Uuid) -> AppResult<ProfessionalBlock> {
        self.repository.blocks.decide(id, ApprovalStatus::Rejected).await
    }

    pub async fn delete_block(&self, id: Uuid) -> AppResult<()> {
        self.repository.blocks.delete(id).await
    }
}
