pub mod day_of_week;

pub use day_of_week::DayOfWeek;
