pub mod client;
pub mod config;
pub mod logging;
pub mod pricing;
pub mod util;
