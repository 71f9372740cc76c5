//! Database seeder for development and testing.
//!
//! Registers demo students, files a clearance request for each with some
//! approver decisions already recorded, and prints an admin token for
//! trying the API.
//!
//! Usage: cargo run --bin seeder

use sea_orm::DatabaseConnection;
use uuid::Uuid;

use clearance_core::clearance::{
    AdminCapability, ApproverInput, Caller, CallerRole, RequestType, StepStatus,
};
use clearance_db::entities::students;
use clearance_db::repositories::{
    ClearanceFilter, ClearanceRepository, CreateClearanceInput, CreateStudentInput,
    StudentRepository, UpdateStepInput,
};
use clearance_shared::types::PageRequest;
use clearance_shared::types::id::{ApprovalStepId, ClearanceId, StudentId, UserId};
use clearance_shared::{AppConfig, JwtConfig, JwtService};

/// Seed admin user ID (stable across runs)
const SEED_ADMIN_ID: &str = "00000000-0000-0000-0000-000000000001";

/// (student number, name, email, year level, section, course)
const STUDENTS: [(&str, &str, &str, &str, &str, &str); 4] = [
    ("2021-00001", "Maria Clara", "maria.clara@example.edu", "4", "BSIT-4A", "BSIT"),
    ("2022-00017", "Jose Rizal", "jose.rizal@example.edu", "3", "BSCS-3B", "BSCS"),
    ("2023-00102", "Andres Bonifacio", "andres.b@example.edu", "2", "BSIT-2C", "BSIT"),
    ("2024-00250", "Gabriela Silang", "gabriela.s@example.edu", "1", "BSED-1A", "BSED"),
];

/// Request type and decisions per step, one entry per student.
const SCENARIOS: [(RequestType, &[StepStatus]); 4] = [
    (
        RequestType::Graduation,
        &[StepStatus::Approved, StepStatus::Approved, StepStatus::Approved],
    ),
    (
        RequestType::Enrollment,
        &[StepStatus::Approved, StepStatus::Rejected],
    ),
    (RequestType::FinancialAid, &[StepStatus::Approved]),
    (RequestType::LeaveOfAbsence, &[]),
];

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().expect("Failed to load configuration");

    println!("Connecting to database...");
    let db = clearance_db::connect(&config.database.url)
        .await
        .expect("Failed to connect to database");

    let admin = Caller::new(UserId::from_uuid(seed_admin_id()), CallerRole::Admin)
        .authorize_admin()
        .expect("admin caller is always authorized");

    println!("Seeding students...");
    let students = seed_students(&db, &admin).await;

    println!("Seeding clearance requests...");
    seed_clearances(&db, &admin, &students).await;

    println!("Issuing admin token...");
    let jwt = JwtService::new(JwtConfig {
        secret: config.jwt.secret.clone(),
        access_token_expires_minutes: 24 * 60,
    });
    let token = jwt
        .generate_access_token(seed_admin_id(), CallerRole::Admin.as_str())
        .expect("Failed to issue admin token");
    println!("  Authorization: Bearer {token}");

    println!("Seeding complete!");
}

fn seed_admin_id() -> Uuid {
    Uuid::parse_str(SEED_ADMIN_ID).expect("seed admin id is a valid UUID")
}

/// Registers the demo students, reusing any that already exist.
async fn seed_students(db: &DatabaseConnection, admin: &AdminCapability) -> Vec<students::Model> {
    let repo = StudentRepository::new(db.clone());
    let mut seeded = Vec::with_capacity(STUDENTS.len());

    for (number, name, email, year_level, section, course) in STUDENTS {
        let existing = repo
            .list(admin, Some(number), &PageRequest::default())
            .await
            .expect("Failed to look up student")
            .data
            .into_iter()
            .find(|s| s.student_number == number);

        if let Some(student) = existing {
            println!("  {number} already exists, skipping...");
            seeded.push(student);
            continue;
        }

        let student = repo
            .create(
                admin,
                CreateStudentInput {
                    student_number: number.to_string(),
                    name: name.to_string(),
                    email: email.to_string(),
                    year_level: Some(year_level.to_string()),
                    section: Some(section.to_string()),
                    program: None,
                    course: Some(course.to_string()),
                    contact_number: None,
                },
            )
            .await
            .expect("Failed to create student");
        println!("  Registered {number} {name}");
        seeded.push(student);
    }

    seeded
}

/// Files one request per student and records the scenario's decisions.
async fn seed_clearances(
    db: &DatabaseConnection,
    admin: &AdminCapability,
    students: &[students::Model],
) {
    let repo = ClearanceRepository::new(db.clone());

    for (student, (request_type, decisions)) in students.iter().zip(SCENARIOS) {
        let filter = ClearanceFilter {
            search: Some(student.student_number.clone()),
            ..ClearanceFilter::default()
        };
        let existing = repo
            .list(admin, &filter, &PageRequest::default())
            .await
            .expect("Failed to look up clearances");
        if existing.meta.total > 0 {
            println!("  {} already has a request, skipping...", student.student_number);
            continue;
        }

        let view = repo
            .create_clearance(
                admin,
                CreateClearanceInput {
                    student_id: StudentId::from_uuid(student.id),
                    section: student.section.clone().unwrap_or_else(|| "General".to_string()),
                    course: student.course.clone(),
                    request_type,
                    notes: None,
                    approvers: vec![
                        ApproverInput::new("organization_treasurer", "Ana Reyes"),
                        ApproverInput::new("organization_adviser", "Prof. Santos"),
                        ApproverInput::new("dean", "Dean Cruz"),
                    ],
                },
            )
            .await
            .expect("Failed to create clearance request");

        let clearance_id = ClearanceId::from_uuid(view.clearance.id);
        let mut status = view.clearance.status;
        for (step, decision) in view.approvers.iter().zip(decisions) {
            let updated = repo
                .update_step(
                    admin,
                    clearance_id,
                    ApprovalStepId::from_uuid(step.id),
                    UpdateStepInput {
                        status: *decision,
                        remarks: None,
                    },
                )
                .await
                .expect("Failed to record approver decision");
            status = updated.clearance.status;
        }

        println!(
            "  {} {} -> {:?}",
            student.student_number,
            request_type.as_str(),
            status
        );
    }
}
