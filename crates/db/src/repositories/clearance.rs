//! Clearance repository.
//!
//! Persists clearance requests and their approval steps. Every write goes
//! through the rules in `clearance_core::clearance`; this module only
//! decides what to load, lock and store.

use std::collections::{BTreeSet, HashMap};

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DatabaseTransaction, DbErr,
    EntityTrait, JoinType, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait,
    Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use clearance_core::clearance::{
    ActionType, AdminCapability, ApproverInput, ApproverLedger, BulkAction, BulkOutcome,
    ClearanceError, ClearanceStatus, NotesUpdate, RequestType, StatusEngine, StepStatus,
};
use clearance_shared::types::id::{ApprovalStepId, ClearanceId, StudentId};
use clearance_shared::types::{PageRequest, PageResponse};

use crate::entities::{clearance_approvers, clearances, students};

/// Input for creating a clearance request.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateClearanceInput {
    /// Requesting student.
    pub student_id: StudentId,
    /// Section or context.
    pub section: String,
    /// Course.
    pub course: Option<String>,
    /// Request type.
    pub request_type: RequestType,
    /// Free-text note.
    pub notes: Option<String>,
    /// Approvers, in display order.
    pub approvers: Vec<ApproverInput>,
}

/// Editable request details.
///
/// Status is not editable here; it changes through step updates and bulk
/// actions only.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateClearanceInput {
    /// New section.
    pub section: Option<String>,
    /// New request type.
    pub request_type: Option<RequestType>,
    /// New notes.
    pub notes: Option<String>,
}

/// Input for a step decision.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStepInput {
    /// New step status.
    pub status: StepStatus,
    /// Approver remarks.
    pub remarks: Option<String>,
}

/// Input for a bulk action.
#[derive(Debug, Clone, Deserialize)]
pub struct BulkActionInput {
    /// Target requests.
    pub ids: Vec<ClearanceId>,
    /// Action to apply.
    pub action: BulkAction,
    /// Remarks (become the notes on `reject`).
    pub remarks: Option<String>,
}

/// Result of a bulk action.
#[derive(Debug, Clone, Serialize)]
pub struct BulkActionResult {
    /// Applied action.
    pub action: BulkAction,
    /// Number of requests changed or removed.
    pub affected_count: usize,
}

/// List filters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClearanceFilter {
    /// Substring of the student number or name.
    pub search: Option<String>,
    /// Exact status.
    pub status: Option<ClearanceStatus>,
    /// Exact request type.
    pub request_type: Option<RequestType>,
    /// Student year level.
    pub year_level: Option<String>,
    /// Request section.
    pub section: Option<String>,
}

/// A clearance request with its student, steps and action type.
#[derive(Debug, Clone, Serialize)]
pub struct ClearanceView {
    /// The request.
    #[serde(flatten)]
    pub clearance: clearances::Model,
    /// The requesting student.
    pub student: Option<students::Model>,
    /// Steps ordered by position.
    pub approvers: Vec<clearance_approvers::Model>,
    /// Presentation hint.
    pub action_type: ActionType,
}

impl ClearanceView {
    fn assemble(
        clearance: clearances::Model,
        student: Option<students::Model>,
        approvers: Vec<clearance_approvers::Model>,
    ) -> Self {
        let steps = step_statuses(&approvers);
        let action_type =
            StatusEngine::determine_action_type(clearance.status.into(), &steps);
        Self {
            clearance,
            student,
            approvers,
            action_type,
        }
    }
}

/// Clearance repository.
#[derive(Debug, Clone)]
pub struct ClearanceRepository {
    db: DatabaseConnection,
}

impl ClearanceRepository {
    /// Creates a new clearance repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a request and all of its steps in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for bad input, `StudentNotFound` for an unknown
    /// student and `TransactionFailed` if the write is rolled back.
    pub async fn create_clearance(
        &self,
        cap: &AdminCapability,
        input: CreateClearanceInput,
    ) -> Result<ClearanceView, ClearanceError> {
        let planned = ApproverLedger::plan_steps(&input.approvers)?;
        let section = input.section.trim().to_string();
        if section.is_empty() {
            return Err(ClearanceError::Validation(
                "section must not be blank".to_string(),
            ));
        }

        let student = students::Entity::find_by_id(input.student_id.into_inner())
            .one(&self.db)
            .await
            .map_err(|e| ClearanceError::Database(e.to_string()))?
            .ok_or(ClearanceError::StudentNotFound(input.student_id))?;

        let txn = self.db.begin().await.map_err(tx_failed)?;

        let now = Utc::now().into();
        let clearance = clearances::ActiveModel {
            id: Set(ClearanceId::new().into_inner()),
            student_id: Set(student.id),
            section: Set(section),
            course: Set(input.course),
            request_type: Set(input.request_type.into()),
            status: Set(ClearanceStatus::Pending.into()),
            notes: Set(input.notes),
            submitted_at: Set(Some(now)),
            approved_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
        }
        .insert(&txn)
        .await
        .map_err(tx_failed)?;

        let mut approvers = Vec::with_capacity(planned.len());
        for step in planned {
            let row = clearance_approvers::ActiveModel {
                id: Set(ApprovalStepId::new().into_inner()),
                clearance_id: Set(clearance.id),
                approver_role: Set(step.role),
                approver_name: Set(step.name),
                position: Set(step.position),
                status: Set(step.status.into()),
                remarks: Set(None),
                approved_at: Set(None),
                created_at: Set(now),
                updated_at: Set(now),
            }
            .insert(&txn)
            .await
            .map_err(tx_failed)?;
            approvers.push(row);
        }

        txn.commit().await.map_err(tx_failed)?;

        info!(
            admin = %cap.user_id(),
            clearance_id = %clearance.id,
            student_id = %student.id,
            steps = approvers.len(),
            "Clearance request created"
        );

        Ok(ClearanceView::assemble(clearance, Some(student), approvers))
    }

    /// Fetches a live (not soft-deleted) request.
    ///
    /// # Errors
    ///
    /// Returns `ClearanceNotFound` if it does not exist or is deleted.
    pub async fn get(
        &self,
        cap: &AdminCapability,
        id: ClearanceId,
    ) -> Result<ClearanceView, ClearanceError> {
        debug!(admin = %cap.user_id(), clearance_id = %id, "Fetching clearance request");
        let clearance = self.find_live(id).await?;
        let mut views = self.assemble_views(vec![clearance]).await?;
        views.pop().ok_or(ClearanceError::ClearanceNotFound(id))
    }

    /// Lists live requests, newest first.
    ///
    /// # Errors
    ///
    /// Returns `Database` if a query fails.
    pub async fn list(
        &self,
        cap: &AdminCapability,
        filter: &ClearanceFilter,
        page: &PageRequest,
    ) -> Result<PageResponse<ClearanceView>, ClearanceError> {
        debug!(admin = %cap.user_id(), page = page.page, "Listing clearance requests");
        let mut query = clearances::Entity::find()
            .join(JoinType::InnerJoin, clearances::Relation::Students.def())
            .filter(clearances::Column::DeletedAt.is_null());

        if let Some(term) = filter.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            query = query.filter(
                Condition::any()
                    .add(students::Column::StudentNumber.contains(term))
                    .add(students::Column::Name.contains(term)),
            );
        }
        if let Some(status) = filter.status {
            query = query.filter(
                clearances::Column::Status
                    .eq(crate::entities::sea_orm_active_enums::ClearanceStatus::from(status)),
            );
        }
        if let Some(request_type) = filter.request_type {
            query = query.filter(
                clearances::Column::RequestType
                    .eq(crate::entities::sea_orm_active_enums::RequestType::from(request_type)),
            );
        }
        if let Some(year_level) = filter.year_level.as_deref().filter(|y| !y.is_empty()) {
            query = query.filter(students::Column::YearLevel.eq(year_level));
        }
        if let Some(section) = filter.section.as_deref().filter(|s| !s.is_empty()) {
            query = query.filter(clearances::Column::Section.eq(section));
        }

        let total = query
            .clone()
            .count(&self.db)
            .await
            .map_err(|e| ClearanceError::Database(e.to_string()))?;

        let rows = query
            .order_by_desc(clearances::Column::CreatedAt)
            .order_by_desc(clearances::Column::Id)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .map_err(|e| ClearanceError::Database(e.to_string()))?;

        let views = self.assemble_views(rows).await?;
        Ok(PageResponse::new(views, page.page, page.per_page, total))
    }

    /// Edits section, request type and notes.
    ///
    /// # Errors
    ///
    /// Returns `ClearanceNotFound` or `Validation` for a blank section.
    pub async fn update_details(
        &self,
        cap: &AdminCapability,
        id: ClearanceId,
        input: UpdateClearanceInput,
    ) -> Result<ClearanceView, ClearanceError> {
        let clearance = self.find_live(id).await?;

        let mut active: clearances::ActiveModel = clearance.into();
        if let Some(section) = input.section {
            let section = section.trim().to_string();
            if section.is_empty() {
                return Err(ClearanceError::Validation(
                    "section must not be blank".to_string(),
                ));
            }
            active.section = Set(section);
        }
        if let Some(request_type) = input.request_type {
            active.request_type = Set(request_type.into());
        }
        if let Some(notes) = input.notes {
            active.notes = Set(Some(notes));
        }
        active.updated_at = Set(Utc::now().into());

        let updated = active
            .update(&self.db)
            .await
            .map_err(|e| ClearanceError::Database(e.to_string()))?;

        info!(admin = %cap.user_id(), clearance_id = %id, "Clearance details updated");

        let mut views = self.assemble_views(vec![updated]).await?;
        views.pop().ok_or(ClearanceError::ClearanceNotFound(id))
    }

    /// Soft-deletes a request.
    ///
    /// # Errors
    ///
    /// Returns `ClearanceNotFound` if it does not exist or is already deleted.
    pub async fn soft_delete(
        &self,
        cap: &AdminCapability,
        id: ClearanceId,
    ) -> Result<(), ClearanceError> {
        let clearance = self.find_live(id).await?;

        let now = Utc::now().into();
        let mut active: clearances::ActiveModel = clearance.into();
        active.deleted_at = Set(Some(now));
        active.updated_at = Set(now);
        active
            .update(&self.db)
            .await
            .map_err(|e| ClearanceError::Database(e.to_string()))?;

        info!(admin = %cap.user_id(), clearance_id = %id, "Clearance soft-deleted");
        Ok(())
    }

    /// Restores a soft-deleted request.
    ///
    /// # Errors
    ///
    /// Returns `ClearanceNotFound` if no deleted request has this id.
    pub async fn restore(
        &self,
        cap: &AdminCapability,
        id: ClearanceId,
    ) -> Result<ClearanceView, ClearanceError> {
        let clearance = clearances::Entity::find_by_id(id.into_inner())
            .filter(clearances::Column::DeletedAt.is_not_null())
            .one(&self.db)
            .await
            .map_err(|e| ClearanceError::Database(e.to_string()))?
            .ok_or(ClearanceError::ClearanceNotFound(id))?;

        let mut active: clearances::ActiveModel = clearance.into();
        active.deleted_at = Set(None);
        active.updated_at = Set(Utc::now().into());
        let restored = active
            .update(&self.db)
            .await
            .map_err(|e| ClearanceError::Database(e.to_string()))?;

        info!(admin = %cap.user_id(), clearance_id = %id, "Clearance restored");

        let mut views = self.assemble_views(vec![restored]).await?;
        views.pop().ok_or(ClearanceError::ClearanceNotFound(id))
    }

    /// Applies an administrative override to several requests atomically.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for an empty or unknown id set (nothing is
    /// changed) and `TransactionFailed` if the write is rolled back.
    pub async fn bulk_action(
        &self,
        cap: &AdminCapability,
        input: BulkActionInput,
    ) -> Result<BulkActionResult, ClearanceError> {
        let ids: BTreeSet<Uuid> = input.ids.iter().map(|id| id.into_inner()).collect();
        if ids.is_empty() {
            return Err(ClearanceError::Validation(
                "ids must contain at least one clearance".to_string(),
            ));
        }

        let txn = self.db.begin().await.map_err(tx_failed)?;

        let targets = clearances::Entity::find()
            .filter(clearances::Column::Id.is_in(ids.iter().copied()))
            .filter(clearances::Column::DeletedAt.is_null())
            .lock_exclusive()
            .all(&txn)
            .await
            .map_err(tx_failed)?;

        if targets.len() != ids.len() {
            let found: BTreeSet<Uuid> = targets.iter().map(|c| c.id).collect();
            let missing: Vec<String> = ids.difference(&found).map(Uuid::to_string).collect();
            warn!(action = %input.action, missing = ?missing, "Bulk action references unknown clearances");
            return Err(ClearanceError::Validation(format!(
                "unknown clearance ids: {}",
                missing.join(", ")
            )));
        }

        let outcome = StatusEngine::apply_bulk_action(input.action, input.remarks.as_deref());
        let now = Utc::now();

        match outcome {
            BulkOutcome::Delete => {
                clearances::Entity::delete_many()
                    .filter(clearances::Column::Id.is_in(ids.iter().copied()))
                    .exec(&txn)
                    .await
                    .map_err(tx_failed)?;
            }
            BulkOutcome::SetStatus { status, notes } => {
                for clearance in targets {
                    let previous: ClearanceStatus = clearance.status.into();
                    let current_approved = clearance.approved_at.map(|t| t.to_utc());
                    let mut active: clearances::ActiveModel = clearance.into();
                    active.status = Set(status.into());
                    active.approved_at = Set(StatusEngine::approval_timestamp(
                        previous,
                        status,
                        current_approved,
                        now,
                    )
                    .map(Into::into));
                    if let NotesUpdate::Replace(ref replacement) = notes {
                        active.notes = Set(replacement.clone());
                    }
                    active.updated_at = Set(now.into());
                    active.update(&txn).await.map_err(tx_failed)?;
                }
            }
        }

        txn.commit().await.map_err(tx_failed)?;

        info!(
            admin = %cap.user_id(),
            action = %input.action,
            affected = ids.len(),
            "Bulk action applied"
        );

        Ok(BulkActionResult {
            action: input.action,
            affected_count: ids.len(),
        })
    }

    /// Records an approver decision and recomputes the request status.
    ///
    /// The parent row is locked `FOR UPDATE` first so concurrent decisions
    /// on the same request serialize.
    ///
    /// # Errors
    ///
    /// Returns `ClearanceNotFound`, `StepNotFound` if the step belongs to
    /// another request, and `TransactionFailed` if the write is rolled back.
    pub async fn update_step(
        &self,
        cap: &AdminCapability,
        clearance_id: ClearanceId,
        step_id: ApprovalStepId,
        input: UpdateStepInput,
    ) -> Result<ClearanceView, ClearanceError> {
        let txn = self.db.begin().await.map_err(tx_failed)?;

        let clearance = clearances::Entity::find_by_id(clearance_id.into_inner())
            .filter(clearances::Column::DeletedAt.is_null())
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(tx_failed)?
            .ok_or(ClearanceError::ClearanceNotFound(clearance_id))?;

        let step = clearance_approvers::Entity::find_by_id(step_id.into_inner())
            .one(&txn)
            .await
            .map_err(tx_failed)?
            .ok_or(ClearanceError::StepNotFound {
                clearance_id,
                step_id,
            })?;
        ApproverLedger::ensure_owned_by(
            ClearanceId::from_uuid(step.clearance_id),
            clearance_id,
            step_id,
        )?;

        let now = Utc::now();
        let change = ApproverLedger::apply_update(input.status, input.remarks, now);

        let mut active_step: clearance_approvers::ActiveModel = step.into();
        active_step.status = Set(change.status.into());
        active_step.remarks = Set(change.remarks);
        active_step.approved_at = Set(change.approved_at.map(Into::into));
        active_step.updated_at = Set(now.into());
        active_step.update(&txn).await.map_err(tx_failed)?;

        let approvers = load_steps(&txn, clearance.id).await.map_err(tx_failed)?;
        let next = StatusEngine::recompute(&step_statuses(&approvers))?;

        let previous: ClearanceStatus = clearance.status.into();
        let current_approved = clearance.approved_at.map(|t| t.to_utc());
        let mut active: clearances::ActiveModel = clearance.into();
        active.status = Set(next.into());
        active.approved_at = Set(
            StatusEngine::approval_timestamp(previous, next, current_approved, now)
                .map(Into::into),
        );
        active.updated_at = Set(now.into());
        let updated = active.update(&txn).await.map_err(tx_failed)?;

        txn.commit().await.map_err(tx_failed)?;

        info!(
            admin = %cap.user_id(),
            clearance_id = %clearance_id,
            step_id = %step_id,
            step_status = %input.status,
            from = %previous,
            to = %next,
            "Approval step updated"
        );

        let student = students::Entity::find_by_id(updated.student_id)
            .one(&self.db)
            .await
            .map_err(|e| ClearanceError::Database(e.to_string()))?;

        Ok(ClearanceView::assemble(updated, student, approvers))
    }

    async fn find_live(&self, id: ClearanceId) -> Result<clearances::Model, ClearanceError> {
        clearances::Entity::find_by_id(id.into_inner())
            .filter(clearances::Column::DeletedAt.is_null())
            .one(&self.db)
            .await
            .map_err(|e| ClearanceError::Database(e.to_string()))?
            .ok_or(ClearanceError::ClearanceNotFound(id))
    }

    /// Loads students and steps for a page of requests with two queries.
    async fn assemble_views(
        &self,
        rows: Vec<clearances::Model>,
    ) -> Result<Vec<ClearanceView>, ClearanceError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let clearance_ids: Vec<Uuid> = rows.iter().map(|c| c.id).collect();
        let student_ids: BTreeSet<Uuid> = rows.iter().map(|c| c.student_id).collect();

        let mut steps_by_clearance: HashMap<Uuid, Vec<clearance_approvers::Model>> =
            HashMap::new();
        let steps = clearance_approvers::Entity::find()
            .filter(clearance_approvers::Column::ClearanceId.is_in(clearance_ids))
            .order_by_asc(clearance_approvers::Column::Position)
            .all(&self.db)
            .await
            .map_err(|e| ClearanceError::Database(e.to_string()))?;
        for step in steps {
            steps_by_clearance
                .entry(step.clearance_id)
                .or_default()
                .push(step);
        }

        let students: HashMap<Uuid, students::Model> = students::Entity::find()
            .filter(students::Column::Id.is_in(student_ids))
            .all(&self.db)
            .await
            .map_err(|e| ClearanceError::Database(e.to_string()))?
            .into_iter()
            .map(|s| (s.id, s))
            .collect();

        Ok(rows
            .into_iter()
            .map(|clearance| {
                let student = students.get(&clearance.student_id).cloned();
                let approvers = steps_by_clearance.remove(&clearance.id).unwrap_or_default();
                ClearanceView::assemble(clearance, student, approvers)
            })
            .collect())
    }
}

async fn load_steps(
    txn: &DatabaseTransaction,
    clearance_id: Uuid,
) -> Result<Vec<clearance_approvers::Model>, DbErr> {
    clearance_approvers::Entity::find()
        .filter(clearance_approvers::Column::ClearanceId.eq(clearance_id))
        .order_by_asc(clearance_approvers::Column::Position)
        .all(txn)
        .await
}

fn step_statuses(approvers: &[clearance_approvers::Model]) -> Vec<StepStatus> {
    approvers.iter().map(|a| a.status.into()).collect()
}

#[allow(clippy::needless_pass_by_value)]
fn tx_failed(err: DbErr) -> ClearanceError {
    ClearanceError::TransactionFailed(err.to_string())
}
