//! Department enumerations.

pub mod code;
pub mod other;
pub mod user_department;

pub use code::Department;
pub use other::OtherDepartment;
pub use user_department::UserDepartment;
