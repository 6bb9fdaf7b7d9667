//! Database entities

pub mod employee;
pub mod project;
pub mod project_employee;

pub use employee::Entity as Employee;
pub use project::Entity as Project;
pub use project_employee::Entity as ProjectEmployee;
