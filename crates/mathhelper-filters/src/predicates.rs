//! Pure acceptance tests for a single record against the current filters.

use mathhelper_common::number::canonical_number;
use mathhelper_common::Equation;

use crate::filters::Filters;

/// Prefix match on the equation text; case-sensitive.
pub fn matches_search(filters: &Filters, equation: &Equation) -> bool {
    match &filters.search {
        Some(prefix) => equation.equation_string.starts_with(prefix.as_str()),
        None => true,
    }
}

/// At least one known solution is among the wanted values. An empty list
/// imposes no constraint.
pub fn matches_solutions(filters: &Filters, equation: &Equation) -> bool {
    if filters.solutions.is_empty() {
        return true;
    }
    equation
        .solutions
        .iter()
        .map(|s| canonical_number(*s))
        .any(|s| filters.solutions.contains(&s))
}

pub fn matches_solutions_count(filters: &Filters, equation: &Equation) -> bool {
    filters
        .solutions_count
        .map_or(true, |range| range.contains(equation.solution_count()))
}

/// Logical AND of every criterion.
pub fn matches(filters: &Filters, equation: &Equation) -> bool {
    matches_search(filters, equation)
        && matches_solutions(filters, equation)
        && matches_solutions_count(filters, equation)
}

/// Records that pass `filters`, in collection order.
pub fn visible<'a>(
    filters: &'a Filters,
    equations: &'a [Equation],
) -> impl Iterator<Item = &'a Equation> + 'a {
    equations.iter().filter(move |e| matches(filters, e))
}

/// Upper end of the solution-count slider: the largest known solution
/// count, or 1 for an empty collection.
pub fn solutions_count_ceiling(equations: &[Equation]) -> usize {
    equations
        .iter()
        .map(Equation::solution_count)
        .max()
        .unwrap_or(1)
}
