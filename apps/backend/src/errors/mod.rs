pub mod domain;

pub use domain::{ConflictKind, DomainError, ValidationKind};
