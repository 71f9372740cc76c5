//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod clearance;
pub mod report;
pub mod student;

pub use clearance::{
    BulkActionInput, BulkActionResult, ClearanceFilter, ClearanceRepository, ClearanceView,
    CreateClearanceInput, UpdateClearanceInput, UpdateStepInput,
};
pub use report::ReportRepository;
pub use student::{CreateStudentInput, StudentRepository};
