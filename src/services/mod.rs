//! Services: the external-filter pipeline and logging infrastructure

pub mod filter;
pub mod log_dirs;
#[cfg(feature = "runtime")]
pub mod tracing_setup;
