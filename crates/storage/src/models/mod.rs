mod contest;
mod contest_result;
mod division;
mod refresh_log;
mod user;

pub use contest::Contest;
pub use contest_result::ContestResult;
pub use division::DivisionTier;
pub use refresh_log::RefreshLog;
pub use user::User;
