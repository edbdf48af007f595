//! Console logging using env_logger
//!
//! Defaults to `info`; override with `RUST_LOG` (e.g. `RUST_LOG=state_store=trace`).

use env_logger::{Builder, Env};

pub fn init() {
    Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();
}
