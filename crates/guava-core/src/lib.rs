//! guava-core - Core library for Guava
//!
//! This crate holds the storage abstraction, auth token handling, the REST
//! client and the bookmark/preference synchronisation used by every Guava
//! front-end.

pub mod api;
pub mod auth;
pub mod bookmarks;
pub mod catalog;
pub mod config;
pub mod error;
pub mod models;
pub mod prefs;
pub mod pricing;
pub mod session;
pub mod storage;
pub mod subscriptions;
pub mod util;

pub use error::{Error, Result};
pub use models::{Bookmark, Plan, Preferences, Service, Subscription};
