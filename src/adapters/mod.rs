//! Concrete adapter implementations for ports.

pub mod csv_adapter;
pub mod file_config_adapter;
pub mod file_log_adapter;
pub mod json_data_adapter;
pub mod json_store_adapter;
