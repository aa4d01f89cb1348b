// User domain module
// Contains the user aggregate and its value objects

#![allow(clippy::module_inception)]

pub mod user;
pub mod value_objects;

pub use user::{NewUser, User, UserPatch};
pub use value_objects::Email;
