//! Shiftdesk API Library
//!
//! Employee scheduling: users, companies and the shifts that tie them
//! together. The same library runs as a monolith or as a separate user
//! service and shift service, selected by [`config::ServiceRole`].

pub mod api;
pub mod app;
pub mod config;
pub mod domain;
pub mod infrastructure;
