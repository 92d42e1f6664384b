//! Plain-text equation cards.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use mathhelper_common::number::canonical_number;
use mathhelper_common::Equation;

/// `x^2 - 1`, highest exponent first. Zero coefficients are skipped.
pub fn polynomial(coefficients: &BTreeMap<i32, f64>) -> String {
    let mut out = String::new();
    for (&exponent, &coefficient) in coefficients.iter().rev() {
        if coefficient == 0.0 {
            continue;
        }
        let negative = coefficient < 0.0;
        if out.is_empty() {
            if negative {
                out.push('-');
            }
        } else {
            out.push_str(if negative { " - " } else { " + " });
        }

        let magnitude = coefficient.abs();
        let variable = match exponent {
            0 => String::new(),
            1 => "x".to_string(),
            e => format!("x^{e}"),
        };
        if variable.is_empty() || magnitude != 1.0 {
            out.push_str(&canonical_number(magnitude));
        }
        out.push_str(&variable);
    }
    if out.is_empty() {
        out.push('0');
    }
    out
}

pub fn solutions(equation: &Equation) -> String {
    if equation.solutions.is_empty() {
        return "none".to_string();
    }
    equation
        .solutions
        .iter()
        .map(|s| canonical_number(*s))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn card(equation: &Equation) -> String {
    let form = &equation.rational_form;
    let mut out = String::new();
    let _ = writeln!(out, "#{}  {}", equation.id, equation.equation_string);
    let _ = writeln!(out, "    Known solutions: {}", solutions(equation));
    if form.numerator_degree().is_some() {
        if form.is_polynomial() {
            let _ = writeln!(out, "    Polynomial: {}", polynomial(&form.numerator_coefficients));
        } else {
            let _ = writeln!(
                out,
                "    Rational form: ({}) / ({})",
                polynomial(&form.numerator_coefficients),
                polynomial(&form.denominator_coefficients)
            );
        }
    }
    out
}

pub fn cards(equations: &[Equation]) -> String {
    if equations.is_empty() {
        return "No equations match the current filters.\n".to_string();
    }
    equations.iter().map(card).collect::<Vec<_>>().join("\n")
}
