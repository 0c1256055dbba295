pub mod compiler;
pub mod deployment;
pub mod error;

pub use error::DomainError;
