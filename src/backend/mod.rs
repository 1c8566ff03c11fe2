pub mod analysis;
pub mod chart;
pub mod cleaning;
pub mod dataset;
pub mod error;
pub mod export;
pub mod insights;
pub mod loader;
pub mod parser;
pub mod settings;
pub mod store;
pub mod value;
