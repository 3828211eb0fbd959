//! Data models for requisitions, correction results and configuration.

pub mod config;
pub mod correction;
pub mod requisition;
