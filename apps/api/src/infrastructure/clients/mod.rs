// Outbound HTTP adapters for services owned by other processes

pub mod user_service_client;

pub use user_service_client::{HttpUserDirectory, USER_SERVICE};
