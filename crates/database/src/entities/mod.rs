pub mod schedule;
pub mod school_class;
pub mod student;
pub mod subject;
pub mod teacher;
