//! In-memory SQLite database and insert helpers for tests

use crate::entities::{schedule, school_class, student, subject, teacher};
use chrono::NaiveTime;
use migration::{Migrator, MigratorTrait};
use models::DayOfWeek;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ConnectOptions, Database, DatabaseConnection, DbErr,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use uuid::Uuid;

static SEQUENCE: AtomicUsize = AtomicUsize::new(0);

/// Opens a fresh in-memory database with all migrations applied
pub async fn setup_db() -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new("sqlite::memory:");
    // Every pooled connection to :memory: would be a separate database
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(options).await?;
    Migrator::up(&db, None).await?;

    Ok(db)
}

pub async fn create_teacher(db: &DatabaseConnection, name: &str) -> Result<teacher::Model, DbErr> {
    teacher::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_owned()),
    }
    .insert(db)
    .await
}

pub async fn create_subject(
    db: &DatabaseConnection,
    name: &str,
    teacher_id: Uuid,
) -> Result<subject::Model, DbErr> {
    subject::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_owned()),
        teacher_id: Set(teacher_id),
    }
    .insert(db)
    .await
}

pub async fn create_school_class(
    db: &DatabaseConnection,
    name: &str,
) -> Result<school_class::Model, DbErr> {
    school_class::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_owned()),
    }
    .insert(db)
    .await
}

pub async fn create_student(
    db: &DatabaseConnection,
    name: &str,
    school_class_id: Uuid,
) -> Result<student::Model, DbErr> {
    student::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_owned()),
        school_class_id: Set(school_class_id),
    }
    .insert(db)
    .await
}

pub async fn create_schedule(
    db: &DatabaseConnection,
    school_class_id: Uuid,
    subject_id: Uuid,
    day_of_week: DayOfWeek,
    hour: NaiveTime,
) -> Result<schedule::Model, DbErr> {
    schedule::ActiveModel {
        id: Set(Uuid::new_v4()),
        school_class_id: Set(school_class_id),
        subject_id: Set(subject_id),
        day_of_week: Set(day_of_week),
        hour: Set(hour),
    }
    .insert(db)
    .await
}

/// Creates a schedule along with a new class of three students, a subject
/// and its teacher. Generated names are unique within the process.
pub async fn seed_schedule(
    db: &DatabaseConnection,
    day_of_week: DayOfWeek,
    hour: NaiveTime,
) -> Result<schedule::Model, DbErr> {
    let n = SEQUENCE.fetch_add(1, Ordering::Relaxed);

    let class = create_school_class(db, &format!("S{}", n % 1000)).await?;
    for i in 0..3 {
        create_student(db, &format!("Student #{n}.{i}"), class.id).await?;
    }
    let teacher = create_teacher(db, &format!("Teacher #{n}")).await?;
    let subject = create_subject(db, &format!("Subject #{n}"), teacher.id).await?;

    create_schedule(db, class.id, subject.id, day_of_week, hour).await
}
