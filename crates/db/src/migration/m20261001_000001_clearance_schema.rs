//! Initial database migration.
//!
//! Creates the enums, the students, clearances and clearance_approvers
//! tables, their indexes and the `updated_at` trigger.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(ENUMS_SQL).await?;
        db.execute_unprepared(STUDENTS_SQL).await?;
        db.execute_unprepared(CLEARANCES_SQL).await?;
        db.execute_unprepared(CLEARANCE_APPROVERS_SQL).await?;
        db.execute_unprepared(TRIGGERS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

const ENUMS_SQL: &str = r"
CREATE TYPE clearance_status AS ENUM (
    'pending',
    'in_progress',
    'approved',
    'rejected',
    'completed'
);

CREATE TYPE approval_step_status AS ENUM ('pending', 'approved', 'rejected');

CREATE TYPE request_type AS ENUM (
    'enrollment',
    'course_change',
    'financial_aid',
    'document_submission',
    'graduation',
    'transfer',
    'leave_of_absence'
);
";

const STUDENTS_SQL: &str = r"
CREATE TABLE students (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    student_number VARCHAR(50) NOT NULL UNIQUE,
    name VARCHAR(255) NOT NULL,
    email VARCHAR(255) NOT NULL UNIQUE,
    year_level VARCHAR(20),
    section VARCHAR(50),
    program VARCHAR(100),
    course VARCHAR(100),
    contact_number VARCHAR(30),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_students_name ON students(name);
";

const CLEARANCES_SQL: &str = r"
CREATE TABLE clearances (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    student_id UUID NOT NULL REFERENCES students(id) ON DELETE CASCADE,
    section VARCHAR(50) NOT NULL,
    course VARCHAR(100),
    request_type request_type NOT NULL,
    status clearance_status NOT NULL DEFAULT 'pending',
    notes TEXT,
    submitted_at TIMESTAMPTZ,
    approved_at TIMESTAMPTZ,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    deleted_at TIMESTAMPTZ
);

CREATE INDEX idx_clearances_student ON clearances(student_id);
CREATE INDEX idx_clearances_status ON clearances(status) WHERE deleted_at IS NULL;
CREATE INDEX idx_clearances_created ON clearances(created_at DESC) WHERE deleted_at IS NULL;
";

const CLEARANCE_APPROVERS_SQL: &str = r"
CREATE TABLE clearance_approvers (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    clearance_id UUID NOT NULL REFERENCES clearances(id) ON DELETE CASCADE,
    approver_role VARCHAR(100) NOT NULL,
    approver_name VARCHAR(255) NOT NULL,
    position INTEGER NOT NULL CHECK (position >= 1),
    status approval_step_status NOT NULL DEFAULT 'pending',
    remarks TEXT,
    approved_at TIMESTAMPTZ,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_clearance_approvers_position UNIQUE (clearance_id, position),
    CONSTRAINT chk_approved_at_matches_status
        CHECK ((status = 'approved') = (approved_at IS NOT NULL))
);

CREATE INDEX idx_clearance_approvers_role ON clearance_approvers(approver_role);
";

const TRIGGERS_SQL: &str = r"
CREATE OR REPLACE FUNCTION set_updated_at()
RETURNS TRIGGER AS $$
BEGIN
    NEW.updated_at = now();
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_students_updated_at
    BEFORE UPDATE ON students
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_clearances_updated_at
    BEFORE UPDATE ON clearances
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_clearance_approvers_updated_at
    BEFORE UPDATE ON clearance_approvers
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS clearance_approvers CASCADE;
DROP TABLE IF EXISTS clearances CASCADE;
DROP TABLE IF EXISTS students CASCADE;
DROP FUNCTION IF EXISTS set_updated_at() CASCADE;
DROP TYPE IF EXISTS request_type;
DROP TYPE IF EXISTS approval_step_status;
DROP TYPE IF EXISTS clearance_status;
";
