//! CLI library for testing purposes

pub mod backends;
pub mod config;
pub mod convert;
pub mod locate;
pub mod view;

pub use backends::backend_for;
pub use config::CliConfig;
pub use convert::{restyle, run_convert_command, run_format_command};
pub use locate::{LocateReport, locate};
pub use view::{print_view, render_view};
