use crate::{
    dtos::schedule::{ScheduleQueryParams, ScheduleResponse, parse_flag},
    error::ApiError,
    routes::AppState,
};
use axum::{
    Json,
    extract::{Query, State},
};
use database::services::schedule::{ScheduleFilter, ScheduleService};
use log::debug;

/// List weekly schedules ordered by day and hour
#[utoipa::path(
    get,
    path = "/schedule/",
    params(ScheduleQueryParams),
    responses(
        (status = 200, description = "Matching schedules, possibly none", body = Vec<ScheduleResponse>),
        (status = 400, description = "Malformed query parameter (strict mode only)"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Schedule"
)]
pub async fn list_schedules(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<ScheduleResponse>>, ApiError> {
    let params = collect_params(pairs, state.strict_query_params)?;
    let filter = build_filter(&state, params)?;

    let rows = ScheduleService::list(&state.db, &filter).await?;
    debug!("Returning {} schedules", rows.len());

    Ok(Json(rows.into_iter().map(ScheduleResponse::from).collect()))
}

/// Picks the known parameters out of the raw query pairs. A repeated key
/// keeps its last value, or is rejected in strict mode.
fn collect_params(
    pairs: Vec<(String, String)>,
    strict: bool,
) -> Result<ScheduleQueryParams, ApiError> {
    let mut params = ScheduleQueryParams::default();

    for (key, value) in pairs {
        let (name, slot) = match key.as_str() {
            "class_name" => ("class_name", &mut params.class_name),
            "for_today" => ("for_today", &mut params.for_today),
            _ => continue,
        };

        if slot.is_some() {
            if strict {
                return Err(ApiError::InvalidQuery { name, value });
            }
            debug!("Repeated {name}, keeping {value:?}");
        }
        *slot = Some(value);
    }

    Ok(params)
}

fn build_filter(
    state: &AppState,
    params: ScheduleQueryParams,
) -> Result<ScheduleFilter, ApiError> {
    let for_today = match params.for_today {
        Some(value) if !value.trim().is_empty() => match parse_flag(&value) {
            Some(flag) => flag,
            None if state.strict_query_params => {
                return Err(ApiError::InvalidQuery {
                    name: "for_today",
                    value,
                });
            }
            None => {
                debug!("Ignoring malformed for_today value {value:?}");
                false
            }
        },
        _ => false,
    };

    Ok(ScheduleFilter {
        class_name: params.class_name.filter(|name| !name.is_empty()),
        day_of_week: for_today.then(|| state.clock.today()),
    })
}

#[cfg(test)]
mod tests {
    use crate::{
        routes::{AppState, router},
        utils::clock::FixedClock,
    };
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use chrono::{DateTime, NaiveTime};
    use database::testing::{
        create_schedule, create_school_class, create_student, create_subject, create_teacher,
        seed_schedule, setup_db,
    };
    use models::DayOfWeek;
    use sea_orm::DatabaseConnection;
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn at(hour: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, 0, 0).unwrap()
    }

    /// Thursday, 16 May 2024
    fn thursday_state(db: DatabaseConnection) -> AppState {
        AppState {
            db,
            clock: Arc::new(FixedClock(
                DateTime::parse_from_rfc3339("2024-05-16T10:00:00+00:00").unwrap(),
            )),
            strict_query_params: false,
        }
    }

    async fn get(state: AppState, uri: &str) -> (StatusCode, Value) {
        let response = router(state)
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    fn len(value: &Value) -> usize {
        value.as_array().map(Vec::len).unwrap()
    }

    #[tokio::test]
    async fn test_lists_class_with_student_count() {
        let db = setup_db().await.unwrap();
        let class = create_school_class(&db, "3H").await.unwrap();
        for name in ["Ann", "Bob", "Cid"] {
            create_student(&db, name, class.id).await.unwrap();
        }
        let teacher = create_teacher(&db, "Mrs Smith").await.unwrap();
        let subject = create_subject(&db, "Maths", teacher.id).await.unwrap();
        create_schedule(&db, class.id, subject.id, DayOfWeek::Monday, at(8))
            .await
            .unwrap();

        let (status, body) = get(thursday_state(db), "/schedule/").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(len(&body), 1);
        let entry = &body[0];
        assert_eq!(entry["class"]["name"], "3H");
        assert_eq!(entry["class"]["student_count"], 3);
        assert_eq!(entry["subject"]["name"], "Maths");
        assert_eq!(entry["teacher"]["name"], "Mrs Smith");
        assert_eq!(entry["day_of_week"], 0);
        assert_eq!(entry["hour"], "08:00:00");
    }

    #[tokio::test]
    async fn test_for_today_true_with_matching_schedule() {
        let db = setup_db().await.unwrap();
        seed_schedule(&db, DayOfWeek::Thursday, at(9)).await.unwrap();
        seed_schedule(&db, DayOfWeek::Friday, at(9)).await.unwrap();

        let (status, body) = get(thursday_state(db), "/schedule/?for_today=true").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(len(&body), 1);
        assert_eq!(body[0]["day_of_week"], 3);
    }

    #[tokio::test]
    async fn test_for_today_true_without_matching_schedule() {
        let db = setup_db().await.unwrap();
        seed_schedule(&db, DayOfWeek::Friday, at(9)).await.unwrap();

        let (status, body) = get(thursday_state(db), "/schedule/?for_today=true").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(len(&body), 0);
    }

    #[tokio::test]
    async fn test_for_today_false_or_absent_lists_everything() {
        let db = setup_db().await.unwrap();
        for day in DayOfWeek::ALL {
            seed_schedule(&db, day, at(9)).await.unwrap();
        }
        let state = thursday_state(db);

        for uri in ["/schedule/?for_today=false", "/schedule/", "/schedule/?for_today="] {
            let (status, body) = get(state.clone(), uri).await;
            assert_eq!(status, StatusCode::OK, "{uri}");
            assert_eq!(len(&body), DayOfWeek::ALL.len(), "{uri}");
        }
    }

    #[tokio::test]
    async fn test_malformed_for_today_is_ignored() {
        let db = setup_db().await.unwrap();
        seed_schedule(&db, DayOfWeek::Thursday, at(9)).await.unwrap();
        seed_schedule(&db, DayOfWeek::Friday, at(9)).await.unwrap();

        let (status, body) = get(thursday_state(db), "/schedule/?for_today=maybe").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(len(&body), 2);
    }

    #[tokio::test]
    async fn test_malformed_for_today_rejected_in_strict_mode() {
        let db = setup_db().await.unwrap();
        let state = AppState {
            strict_query_params: true,
            ..thursday_state(db)
        };

        let (status, body) = get(state.clone(), "/schedule/?for_today=maybe").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("for_today"));

        // Well-formed values still pass
        let (status, _) = get(state, "/schedule/?for_today=1").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_repeated_parameters_keep_last_value() {
        let db = setup_db().await.unwrap();
        let class = create_school_class(&db, "3H").await.unwrap();
        let teacher = create_teacher(&db, "Mrs Smith").await.unwrap();
        let subject = create_subject(&db, "Maths", teacher.id).await.unwrap();
        create_schedule(&db, class.id, subject.id, DayOfWeek::Thursday, at(8))
            .await
            .unwrap();
        seed_schedule(&db, DayOfWeek::Friday, at(9)).await.unwrap();
        let state = thursday_state(db);

        let (status, body) = get(state.clone(), "/schedule/?for_today=true&for_today=false").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(len(&body), 2);

        let (status, body) = get(state.clone(), "/schedule/?for_today=false&for_today=true").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(len(&body), 1);
        assert_eq!(body[0]["day_of_week"], 3);

        let (status, body) = get(state, "/schedule/?class_name=zz&class_name=3h").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(len(&body), 1);
        assert_eq!(body[0]["class"]["name"], "3H");
    }

    #[tokio::test]
    async fn test_repeated_parameters_rejected_in_strict_mode() {
        let db = setup_db().await.unwrap();
        let state = AppState {
            strict_query_params: true,
            ..thursday_state(db)
        };

        for (uri, name) in [
            ("/schedule/?for_today=true&for_today=false", "for_today"),
            ("/schedule/?class_name=a&class_name=b", "class_name"),
        ] {
            let (status, body) = get(state.clone(), uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert!(body["error"].as_str().unwrap().contains(name), "{uri}");
        }
    }

    #[tokio::test]
    async fn test_database_failure_is_generic_server_error() {
        let db = setup_db().await.unwrap();
        let state = thursday_state(db.clone());
        db.close().await.unwrap();

        let (status, body) = get(state, "/schedule/").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "Internal server error" }));
    }

    #[tokio::test]
    async fn test_class_name_filter() {
        let db = setup_db().await.unwrap();
        let class = create_school_class(&db, "3H").await.unwrap();
        let teacher = create_teacher(&db, "Mrs Smith").await.unwrap();
        let subject = create_subject(&db, "Maths", teacher.id).await.unwrap();
        create_schedule(&db, class.id, subject.id, DayOfWeek::Monday, at(8))
            .await
            .unwrap();
        seed_schedule(&db, DayOfWeek::Monday, at(9)).await.unwrap();
        let state = thursday_state(db);

        let (status, body) = get(state.clone(), "/schedule/?class_name=3h").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(len(&body), 1);
        assert_eq!(body[0]["class"]["name"], "3H");

        let (status, body) = get(state, "/schedule/?class_name=3Ha").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(len(&body), 0);
    }

    #[tokio::test]
    async fn test_unknown_class_is_empty_list() {
        let db = setup_db().await.unwrap();
        seed_schedule(&db, DayOfWeek::Monday, at(9)).await.unwrap();

        let (status, body) = get(thursday_state(db), "/schedule/?class_name=doesnotexist").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, Value::Array(vec![]));
    }

    #[tokio::test]
    async fn test_response_order() {
        let db = setup_db().await.unwrap();
        seed_schedule(&db, DayOfWeek::Wednesday, at(8)).await.unwrap();
        seed_schedule(&db, DayOfWeek::Monday, at(13)).await.unwrap();
        seed_schedule(&db, DayOfWeek::Monday, at(12)).await.unwrap();

        let (_, body) = get(thursday_state(db), "/schedule/").await;

        let slots: Vec<_> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|entry| {
                (
                    entry["day_of_week"].as_u64().unwrap(),
                    entry["hour"].as_str().unwrap().to_string(),
                )
            })
            .collect();
        assert_eq!(
            slots,
            vec![
                (0, "12:00:00".to_string()),
                (0, "13:00:00".to_string()),
                (2, "08:00:00".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_versioned_and_unversioned_paths() {
        let db = setup_db().await.unwrap();
        seed_schedule(&db, DayOfWeek::Monday, at(9)).await.unwrap();
        let state = thursday_state(db);

        for uri in [
            "/schedule",
            "/schedule/",
            "/api/v1/schedule",
            "/api/v1/schedule/",
        ] {
            let (status, body) = get(state.clone(), uri).await;
            assert_eq!(status, StatusCode::OK, "{uri}");
            assert_eq!(len(&body), 1, "{uri}");
        }
    }
}
