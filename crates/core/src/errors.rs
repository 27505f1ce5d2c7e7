use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("required field `{0}` is missing or blank")]
    MissingField(&'static str),
}
