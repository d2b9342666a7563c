//! SeaORM entity definitions.

pub mod project;
pub mod project_member;
pub mod scenario;
pub mod test_case;
pub mod test_run;
pub mod test_run_result;
pub mod user;
