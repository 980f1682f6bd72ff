pub mod add_exercise;
pub mod get_logs;
