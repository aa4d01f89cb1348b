// Domain layer module exports
// Following Hexagonal Architecture and DDD principles
// Domain is independent of infrastructure concerns

pub mod company;
pub mod errors;
pub mod ports;
pub mod repositories;
pub mod services;
pub mod shift;
pub mod user;
