pub mod auth_cmd;
pub mod bookmarks;
pub mod common;
pub mod completions;
pub mod config;
pub mod prefs;
pub mod services;
pub mod subs;
