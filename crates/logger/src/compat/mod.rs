//! Compatibility bridges for other logging facades

#[cfg(feature = "log-compat")]
pub mod log_bridge;
