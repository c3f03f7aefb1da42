pub mod cors;
pub mod structured_logger;
