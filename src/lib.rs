pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod reading_cache;
pub mod realtime;
pub mod sensors;

#[cfg(test)]
mod test_utils;
