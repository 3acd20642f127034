pub mod contest;
pub mod refresh_log;
pub mod result;
pub mod run_lock;
pub mod user;
