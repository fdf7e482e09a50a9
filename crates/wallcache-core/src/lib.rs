pub mod config;
pub mod logging;

pub mod cache_store;
pub mod dedupe;
pub mod entry;
pub mod harvest;
pub mod probe;
pub mod url_model;
pub mod validate;
