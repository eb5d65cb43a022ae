//! The employee resource

mod model;

pub use model::Employee;
