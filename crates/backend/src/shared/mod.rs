pub mod cancel;
pub mod config;
pub mod data;
pub mod errors;
pub mod parse;
