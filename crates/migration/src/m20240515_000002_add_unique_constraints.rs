use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Class names are unique ignoring case, which needs an expression index
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX IF NOT EXISTS idx_school_classes_name_lower \
                 ON school_classes (LOWER(name))",
            )
            .await?;

        // One slot per class, subject, day and hour
        manager
            .create_index(
                Index::create()
                    .name("idx_schedules_unique_slot")
                    .table(Schedules::Table)
                    .col(Schedules::SchoolClassId)
                    .col(Schedules::SubjectId)
                    .col(Schedules::DayOfWeek)
                    .col(Schedules::Hour)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Listing sorts by day and hour
        manager
            .create_index(
                Index::create()
                    .name("idx_schedules_day_hour")
                    .table(Schedules::Table)
                    .col(Schedules::DayOfWeek)
                    .col(Schedules::Hour)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_schedules_day_hour")
                    .table(Schedules::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_schedules_unique_slot")
                    .table(Schedules::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared("DROP INDEX IF EXISTS idx_school_classes_name_lower")
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Schedules {
    Table,
    SchoolClassId,
    SubjectId,
    DayOfWeek,
    Hour,
}
