pub mod api_utils;
pub mod audio;
pub mod config;
pub mod realtime;
pub mod state;
