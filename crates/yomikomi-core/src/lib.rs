pub mod catalog;
pub mod config;
pub mod error;
pub mod favorites;
pub mod filter;
pub mod hero;
pub mod home;
pub mod kv;
pub mod models;
pub mod navigator;
pub mod paths;
pub mod progress;
pub mod reader;
pub mod session;
pub mod storage;
pub mod upload;

#[cfg(test)]
mod test_http;
