//! UI module for consistent CLI output
//!
//! Uses `cliclack` for interactive output with automatic fallback to plain
//! `[OK]`/`[INFO]` lines in CI, where forgepy usually runs.
//!
//! # Example
//!
//! ```rust,ignore
//! use forgepy::ui::{self, UiContext};
//!
//! let ctx = UiContext::detect();
//! ui::intro(&ctx, "Setup Python 3.10");
//! ui::step_ok_detail(&ctx, "Miniforge ready", "/cache/miniforge");
//! ```

mod context;
mod output;
mod progress;
mod prompts;

pub use context::UiContext;
pub use output::{
    intro, key_value, outro_success, remark, step_error_detail, step_info, step_ok,
    step_ok_detail, step_warn_hint,
};
pub use progress::{DownloadProgress, TaskSpinner};
pub use prompts::confirm;
