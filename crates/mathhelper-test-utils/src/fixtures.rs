//! Sample equations shared by tests

use mathhelper_common::{Equation, RationalForm};

use crate::mock_gateway::MockGateway;

/// `x^2-1=0` with one of its two roots already known
pub fn quadratic() -> Equation {
    let mut form = RationalForm::default();
    form.numerator_coefficients.insert(2, 1.0);
    form.numerator_coefficients.insert(0, -1.0);
    form.denominator_coefficients.insert(0, 1.0);
    Equation::new(1, "x^2-1=0")
        .with_solutions([1.0])
        .with_rational_form(form)
}

/// Records with ids 1..=3 and the roots the mock server accepts for each
pub fn sample_equations() -> Vec<(Equation, Vec<f64>)> {
    vec![
        (quadratic(), vec![1.0, -1.0]),
        (Equation::new(2, "x+3=0").with_solutions([-3.0]), vec![-3.0]),
        (Equation::new(3, "1/x=2"), vec![0.5]),
    ]
}

/// A mock gateway serving `sample_equations`
pub fn seeded_gateway() -> MockGateway {
    sample_equations()
        .into_iter()
        .fold(MockGateway::new(), |gateway, (eq, roots)| gateway.with_equation(eq, roots))
}
