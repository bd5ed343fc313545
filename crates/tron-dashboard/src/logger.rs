//! stderr logging using env_logger
//!
//! Log lines go to stderr so they never interleave with the followed
//! logfile on stdout. The filter defaults to `info` and honors `RUST_LOG`.

use env_logger::Env;

pub fn init() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();
}
