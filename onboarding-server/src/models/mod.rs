//! Data models

pub mod user;
pub mod department;
pub mod employee;
pub mod survey;
pub mod enrollment;
pub mod statistics;
pub mod prediction;

pub use user::*;
pub use department::*;
pub use employee::*;
pub use survey::*;
pub use enrollment::*;
pub use statistics::*;
pub use prediction::*;
