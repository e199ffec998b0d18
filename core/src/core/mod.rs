pub mod command;
pub mod embed;
pub mod report;
pub mod response;
pub mod result_aggregator;
pub mod target_manager;
