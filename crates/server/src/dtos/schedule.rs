use chrono::NaiveTime;
use database::services::schedule::ScheduleRow;
use serde::Serialize;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Serialize, ToSchema)]
pub struct ScheduleResponse {
    /// Serialized as `class`, which cannot be a Rust field name
    #[serde(rename = "class")]
    pub school_class: ClassResponse,
    pub subject: SubjectResponse,
    /// 0 = Monday through 6 = Sunday
    #[schema(minimum = 0, maximum = 6)]
    pub day_of_week: u8,
    #[schema(value_type = String, example = "08:00:00")]
    pub hour: NaiveTime,
    pub teacher: TeacherResponse,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ClassResponse {
    pub name: String,
    pub student_count: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SubjectResponse {
    pub name: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TeacherResponse {
    pub name: String,
}

impl From<ScheduleRow> for ScheduleResponse {
    fn from(row: ScheduleRow) -> Self {
        Self {
            school_class: ClassResponse {
                name: row.class_name,
                student_count: row.student_count,
            },
            subject: SubjectResponse {
                name: row.subject_name,
            },
            day_of_week: row.day_of_week.index(),
            hour: row.hour,
            teacher: TeacherResponse {
                name: row.teacher_name,
            },
        }
    }
}

/// Query string of the schedule listing.
///
/// Values stay strings so a malformed or repeated flag can be ignored
/// rather than rejected by the extractor.
#[derive(Debug, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ScheduleQueryParams {
    /// Exact class name, case-insensitive
    pub class_name: Option<String>,
    /// `true` to only list today's schedules
    #[param(value_type = Option<bool>)]
    pub for_today: Option<String>,
}

/// Parses a boolean-like query value. Empty means absent.
pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}
