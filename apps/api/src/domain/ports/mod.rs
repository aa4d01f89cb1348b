// Outbound ports the domain services depend on

pub mod user_directory;

pub use user_directory::{LocalUserDirectory, TrustingUserDirectory, UserDirectory};
