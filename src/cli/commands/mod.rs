//! Command implementations

pub mod diagnose;
pub mod finalize;
pub mod init;
pub mod validate;
