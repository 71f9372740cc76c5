//! Student repository.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use serde::Deserialize;
use tracing::{debug, info};

use clearance_core::clearance::{AdminCapability, ClearanceError};
use clearance_shared::types::id::StudentId;
use clearance_shared::types::{PageRequest, PageResponse};

use crate::entities::students;

/// Input for registering a student.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateStudentInput {
    /// School-issued student number.
    pub student_number: String,
    /// Full name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Year level.
    pub year_level: Option<String>,
    /// Section.
    pub section: Option<String>,
    /// Program.
    pub program: Option<String>,
    /// Course.
    pub course: Option<String>,
    /// Contact number.
    pub contact_number: Option<String>,
}

impl CreateStudentInput {
    fn validate(&self) -> Result<(), ClearanceError> {
        if self.student_number.trim().is_empty() {
            return Err(ClearanceError::Validation(
                "student_number must not be blank".to_string(),
            ));
        }
        if self.name.trim().is_empty() {
            return Err(ClearanceError::Validation(
                "name must not be blank".to_string(),
            ));
        }
        let email = self.email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(ClearanceError::Validation(format!(
                "'{email}' is not a valid email address"
            )));
        }
        Ok(())
    }
}

/// Student repository.
#[derive(Debug, Clone)]
pub struct StudentRepository {
    db: DatabaseConnection,
}

impl StudentRepository {
    /// Creates a new student repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Registers a student.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for blank fields, `Conflict` if the student
    /// number or email is taken.
    pub async fn create(
        &self,
        cap: &AdminCapability,
        input: CreateStudentInput,
    ) -> Result<students::Model, ClearanceError> {
        input.validate()?;

        let student_number = input.student_number.trim().to_string();
        let email = input.email.trim().to_lowercase();

        let clash = students::Entity::find()
            .filter(
                Condition::any()
                    .add(students::Column::StudentNumber.eq(student_number.clone()))
                    .add(students::Column::Email.eq(email.clone())),
            )
            .one(&self.db)
            .await
            .map_err(|e| ClearanceError::Database(e.to_string()))?;
        if let Some(existing) = clash {
            let field = if existing.student_number == student_number {
                "student number"
            } else {
                "email"
            };
            return Err(ClearanceError::Conflict(format!("{field} is already registered")));
        }

        let now = Utc::now().into();
        let student = students::ActiveModel {
            id: Set(StudentId::new().into_inner()),
            student_number: Set(student_number),
            name: Set(input.name.trim().to_string()),
            email: Set(email),
            year_level: Set(input.year_level),
            section: Set(input.section),
            program: Set(input.program),
            course: Set(input.course),
            contact_number: Set(input.contact_number),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
        .map_err(|e| {
            if e.to_string().contains("duplicate key") {
                ClearanceError::Conflict("student number or email is already registered".into())
            } else {
                ClearanceError::Database(e.to_string())
            }
        })?;

        info!(
            admin = %cap.user_id(),
            student_id = %student.id,
            student_number = %student.student_number,
            "Student registered"
        );
        Ok(student)
    }

    /// Finds a student by id.
    ///
    /// # Errors
    ///
    /// Returns `StudentNotFound` if no such student exists.
    pub async fn find(
        &self,
        cap: &AdminCapability,
        id: StudentId,
    ) -> Result<students::Model, ClearanceError> {
        debug!(admin = %cap.user_id(), student_id = %id, "Fetching student");
        students::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(|e| ClearanceError::Database(e.to_string()))?
            .ok_or(ClearanceError::StudentNotFound(id))
    }

    /// Lists students, optionally matching number or name, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `Database` if the query fails.
    pub async fn list(
        &self,
        cap: &AdminCapability,
        search: Option<&str>,
        page: &PageRequest,
    ) -> Result<PageResponse<students::Model>, ClearanceError> {
        debug!(admin = %cap.user_id(), page = page.page, "Listing students");
        let mut query = students::Entity::find();
        if let Some(term) = search.map(str::trim).filter(|t| !t.is_empty()) {
            query = query.filter(
                Condition::any()
                    .add(students::Column::StudentNumber.contains(term))
                    .add(students::Column::Name.contains(term)),
            );
        }

        let total = query
            .clone()
            .count(&self.db)
            .await
            .map_err(|e| ClearanceError::Database(e.to_string()))?;

        let data = query
            .order_by_asc(students::Column::Name)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .map_err(|e| ClearanceError::Database(e.to_string()))?;

        Ok(PageResponse::new(data, page.page, page.per_page, total))
    }
}
