pub mod plugin;
pub mod sitecheck;
