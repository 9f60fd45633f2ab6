//! Application glue: file logging and the dashboard session runner.

mod logging;
mod session;

pub use logging::{
    crash_log_path, init_logging, log_debug, log_debug_content, log_file_path, log_panic,
};
pub use session::{drive, run_session, SessionPlan, SessionReport};
