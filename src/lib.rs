pub mod app;
pub mod config;
pub mod dashboard;
pub mod dispatch;
mod error;
mod lock;
pub mod pane;
pub mod progress;
pub mod render_loop;
mod telemetry;
pub mod terminal_restore;
pub mod text;
pub mod utf8_safe;

pub(crate) use lock::lock_or_recover;
pub use app::{
    crash_log_path, drive, init_logging, log_debug, log_debug_content, log_file_path, log_panic,
    run_session, SessionPlan, SessionReport,
};
pub use dashboard::{Dashboard, DashboardOptions, LogLevel, LogSink, PaneLogSink};
pub use dispatch::{CancelToken, DispatchObserver, Dispatcher, Operation, WorkItem, WorkState};
pub use error::DashboardError;
pub use render_loop::{CrosstermInput, InputSource, LoopExit, NoInput, RenderLoop, RenderPhase};
