use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CalcError {
    #[error("division by zero")]
    DivisionByZero,

    #[error("unknown operation '{0}'")]
    UnknownOperation(String),

    #[error("unknown currency '{0}'")]
    UnknownCurrency(String),
}
