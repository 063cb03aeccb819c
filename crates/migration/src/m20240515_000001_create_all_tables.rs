use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create teachers table
        manager
            .create_table(
                Table::create()
                    .table(Teachers::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Teachers::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Teachers::Name).string_len(64).not_null())
                    .to_owned(),
            )
            .await?;

        // Create subjects table
        manager
            .create_table(
                Table::create()
                    .table(Subjects::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Subjects::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Subjects::Name).string_len(64).not_null())
                    .col(ColumnDef::new(Subjects::TeacherId).uuid().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-subjects-teacher_id")
                            .from(Subjects::Table, Subjects::TeacherId)
                            .to(Teachers::Table, Teachers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create school_classes table
        manager
            .create_table(
                Table::create()
                    .table(SchoolClasses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SchoolClasses::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SchoolClasses::Name)
                            .string_len(4)
                            .not_null()
                            // SQLite ignores the declared length
                            .check(Expr::cust("LENGTH(name) <= 4")),
                    )
                    .to_owned(),
            )
            .await?;

        // Create students table
        manager
            .create_table(
                Table::create()
                    .table(Students::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Students::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Students::Name).string_len(64).not_null())
                    .col(ColumnDef::new(Students::SchoolClassId).uuid().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-students-school_class_id")
                            .from(Students::Table, Students::SchoolClassId)
                            .to(SchoolClasses::Table, SchoolClasses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create schedules table
        manager
            .create_table(
                Table::create()
                    .table(Schedules::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Schedules::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Schedules::SchoolClassId).uuid().not_null())
                    .col(ColumnDef::new(Schedules::SubjectId).uuid().not_null())
                    .col(
                        ColumnDef::new(Schedules::DayOfWeek)
                            .small_integer()
                            .not_null()
                            .check(Expr::col(Schedules::DayOfWeek).between(0, 6)),
                    )
                    .col(ColumnDef::new(Schedules::Hour).time().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-schedules-school_class_id")
                            .from(Schedules::Table, Schedules::SchoolClassId)
                            .to(SchoolClasses::Table, SchoolClasses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-schedules-subject_id")
                            .from(Schedules::Table, Schedules::SubjectId)
                            .to(Subjects::Table, Subjects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index on students.school_class_id for the student count join
        manager
            .create_index(
                Index::create()
                    .name("idx_students_school_class_id")
                    .table(Students::Table)
                    .col(Students::SchoolClassId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop tables in reverse order due to foreign key constraints
        manager
            .drop_table(Table::drop().table(Schedules::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Students::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(SchoolClasses::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Subjects::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Teachers::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Teachers {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum Subjects {
    Table,
    Id,
    Name,
    TeacherId,
}

#[derive(DeriveIden)]
enum SchoolClasses {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum Students {
    Table,
    Id,
    Name,
    SchoolClassId,
}

#[derive(DeriveIden)]
enum Schedules {
    Table,
    Id,
    SchoolClassId,
    SubjectId,
    DayOfWeek,
    Hour,
}
