// Domain services: uniqueness, reference and merge rules per aggregate

pub mod company_service;
pub mod shift_service;
pub mod user_service;

pub use company_service::CompanyService;
pub use shift_service::ShiftService;
pub use user_service::UserService;
