use crate::entities::{schedule, school_class, student, subject, teacher};
use log::debug;
use models::DayOfWeek;
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, FromQueryResult, JoinType,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait,
    prelude::{Expr, Time},
    sea_query::Func,
};

/// Filters applied to the schedule listing, combined with AND
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleFilter {
    /// Exact class name, compared ignoring case
    pub class_name: Option<String>,
    /// Only schedules on this day
    pub day_of_week: Option<DayOfWeek>,
}

impl ScheduleFilter {
    fn condition(&self) -> Condition {
        let mut condition = Condition::all();

        if let Some(class_name) = self.class_name.as_deref()
            && !class_name.is_empty()
        {
            condition = condition.add(
                Expr::expr(Func::lower(Expr::col((
                    school_class::Entity,
                    school_class::Column::Name,
                ))))
                .eq(Func::lower(Expr::val(class_name))),
            );
        }

        if let Some(day) = self.day_of_week {
            condition = condition.add(schedule::Column::DayOfWeek.eq(day));
        }

        condition
    }
}

/// One listed schedule entry with its class, subject and teacher resolved
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct ScheduleRow {
    pub class_name: String,
    /// Students currently in the class, counted at query time
    pub student_count: i64,
    pub subject_name: String,
    pub teacher_name: String,
    pub day_of_week: DayOfWeek,
    pub hour: Time,
}

pub struct ScheduleService;

impl ScheduleService {
    /// List schedules matching `filter`, ordered by day and hour.
    ///
    /// Runs a single query no matter how many rows match: the student count
    /// is aggregated over a left join instead of being fetched per class.
    pub async fn list(
        db: &DatabaseConnection,
        filter: &ScheduleFilter,
    ) -> Result<Vec<ScheduleRow>, DbErr> {
        debug!("Listing schedules with {filter:?}");

        schedule::Entity::find()
            .select_only()
            .column_as(school_class::Column::Name, "class_name")
            .column_as(
                Expr::col((student::Entity, student::Column::Id)).count(),
                "student_count",
            )
            .column_as(subject::Column::Name, "subject_name")
            .column_as(teacher::Column::Name, "teacher_name")
            .column_as(schedule::Column::DayOfWeek, "day_of_week")
            .column_as(schedule::Column::Hour, "hour")
            .join(JoinType::InnerJoin, schedule::Relation::SchoolClass.def())
            .join(JoinType::InnerJoin, schedule::Relation::Subject.def())
            .join(JoinType::InnerJoin, subject::Relation::Teacher.def())
            .join(JoinType::LeftJoin, school_class::Relation::Students.def())
            .filter(filter.condition())
            // Grouping by every joined key keeps the selected columns valid on Postgres
            .group_by(schedule::Column::Id)
            .group_by(school_class::Column::Id)
            .group_by(subject::Column::Id)
            .group_by(teacher::Column::Id)
            .order_by_asc(schedule::Column::DayOfWeek)
            .order_by_asc(schedule::Column::Hour)
            .order_by_asc(school_class::Column::Name)
            .order_by_asc(subject::Column::Name)
            .order_by_asc(schedule::Column::Id)
            .into_model::<ScheduleRow>()
            .all(db)
            .await
    }
}
