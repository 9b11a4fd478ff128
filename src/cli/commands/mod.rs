pub mod catalog;
pub mod config;
pub mod scan;
pub mod search;
