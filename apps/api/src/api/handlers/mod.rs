// HTTP handlers, one module per resource

pub mod companies;
pub mod health;
pub mod shifts;
pub mod users;
