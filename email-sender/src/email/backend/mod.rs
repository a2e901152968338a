//! Email backend implementations
//!
//! This module provides different backend implementations for delivering emails:
//! - **SMTP**: Send emails via SMTP server (production)
//! - **Console**: Print emails to console (development)

pub mod console;
pub mod smtp;
