//! Wire and domain models for the equations API.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Server-assigned equation identifier.
pub type EquationId = i64;

/// A single equation as served by `GET equations/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Equation {
    pub id: EquationId,
    pub equation_string: String,
    /// Known solutions in the order the server accepted them.
    #[serde(default)]
    pub solutions: Vec<f64>,
    #[serde(rename = "polynomial", default)]
    pub rational_form: RationalForm,
}

impl Equation {
    pub fn new(id: EquationId, equation_string: impl Into<String>) -> Self {
        Self {
            id,
            equation_string: equation_string.into(),
            solutions: Vec::new(),
            rational_form: RationalForm::default(),
        }
    }

    pub fn with_solutions(mut self, solutions: impl IntoIterator<Item = f64>) -> Self {
        self.solutions = solutions.into_iter().collect();
        self
    }

    pub fn with_rational_form(mut self, rational_form: RationalForm) -> Self {
        self.rational_form = rational_form;
        self
    }

    pub fn solution_count(&self) -> usize {
        self.solutions.len()
    }
}

/// Numerator/denominator coefficients keyed by exponent.
///
/// An exponent missing from a map has a zero coefficient. The server owns
/// this representation; the client only displays it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RationalForm {
    #[serde(default)]
    pub numerator_coefficients: BTreeMap<i32, f64>,
    #[serde(default)]
    pub denominator_coefficients: BTreeMap<i32, f64>,
}

impl RationalForm {
    pub fn numerator_coefficient(&self, exponent: i32) -> f64 {
        self.numerator_coefficients.get(&exponent).copied().unwrap_or(0.0)
    }

    pub fn denominator_coefficient(&self, exponent: i32) -> f64 {
        self.denominator_coefficients.get(&exponent).copied().unwrap_or(0.0)
    }

    /// Highest exponent with a non-zero numerator coefficient.
    pub fn numerator_degree(&self) -> Option<i32> {
        degree(&self.numerator_coefficients)
    }

    /// Highest exponent with a non-zero denominator coefficient.
    pub fn denominator_degree(&self) -> Option<i32> {
        degree(&self.denominator_coefficients)
    }

    /// True when the denominator is absent or the constant 1.
    pub fn is_polynomial(&self) -> bool {
        match self.denominator_degree() {
            None => true,
            Some(0) => self.denominator_coefficient(0) == 1.0,
            Some(_) => false,
        }
    }
}

fn degree(coefficients: &BTreeMap<i32, f64>) -> Option<i32> {
    coefficients
        .iter()
        .rev()
        .find(|(_, c)| **c != 0.0)
        .map(|(e, _)| *e)
}

/// Request body for `POST equations`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEquation {
    pub equation: String,
}

impl NewEquation {
    pub fn new(equation: impl Into<String>) -> Self {
        Self { equation: equation.into() }
    }
}
