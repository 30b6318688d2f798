pub mod domain;

pub use domain::{DomainError, GameFinished};
