use serde::{Deserialize, Serialize};

use crate::CalcError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operation {
    pub fn symbol(self) -> char {
        match self {
            Operation::Add => '+',
            Operation::Subtract => '-',
            Operation::Multiply => '*',
            Operation::Divide => '/',
        }
    }
}

impl core::str::FromStr for Operation {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "add" => Ok(Operation::Add),
            "subtract" => Ok(Operation::Subtract),
            "multiply" => Ok(Operation::Multiply),
            "divide" => Ok(Operation::Divide),
            other => Err(CalcError::UnknownOperation(other.to_string())),
        }
    }
}

pub fn calculate(a: f64, b: f64, op: Operation) -> Result<f64, CalcError> {
    match op {
        Operation::Add => Ok(a + b),
        Operation::Subtract => Ok(a - b),
        Operation::Multiply => Ok(a * b),
        Operation::Divide if b == 0.0 => Err(CalcError::DivisionByZero),
        Operation::Divide => Ok(a / b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn four_operations() {
        assert_eq!(calculate(6.0, 3.0, "add".parse().unwrap()), Ok(9.0));
        assert_eq!(calculate(6.0, 3.0, "subtract".parse().unwrap()), Ok(3.0));
        assert_eq!(calculate(6.0, 3.0, "multiply".parse().unwrap()), Ok(18.0));
        assert_eq!(calculate(6.0, 3.0, "divide".parse().unwrap()), Ok(2.0));
    }

    #[test]
    fn divide_by_zero_is_an_error() {
        assert_eq!(calculate(1.0, 0.0, Operation::Divide), Err(CalcError::DivisionByZero));
        assert_eq!(calculate(1.0, -0.0, Operation::Divide), Err(CalcError::DivisionByZero));
    }

    #[test]
    fn operation_names_are_exact() {
        assert_eq!(
            "modulo".parse::<Operation>(),
            Err(CalcError::UnknownOperation("modulo".into()))
        );
        assert!("Add".parse::<Operation>().is_err());
    }
}
