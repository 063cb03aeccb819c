use crate::{
    dtos::schedule::{ClassResponse, ScheduleResponse, SubjectResponse, TeacherResponse},
    routes::{health, root, schedule},
};
use utoipa::OpenApi;

/// API Documentation
#[derive(OpenApi)]
#[openapi(
    paths(root::root, health::health, schedule::list_schedules),
    components(schemas(ScheduleResponse, ClassResponse, SubjectResponse, TeacherResponse)),
    tags(
        (name = "Health", description = "Service status endpoints"),
        (name = "Schedule", description = "Weekly class schedules"),
    ),
    info(
        title = "School Schedule API",
        version = "1.0.0",
        description = "Read-only listing of weekly school class schedules",
        license(
            name = "MIT OR Apache-2.0",
        )
    )
)]
pub struct ApiDoc;
