pub mod data_entry;
pub mod settings;
