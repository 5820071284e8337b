//! Aggregate reducers
//!
//! The evaluator computes the argument once per detail row; these fold the
//! per-row values. Empty row sets give 0 rather than NaN so printed totals
//! stay readable.

use bandwork_core::Scalar;

fn numbers(values: &[Scalar]) -> impl Iterator<Item = f64> + '_ {
    values
        .iter()
        .filter(|v| !v.is_blank())
        .filter_map(Scalar::as_number)
}

/// Non-blank values
pub fn reduce_count(values: &[Scalar]) -> Scalar {
    Scalar::from(values.iter().filter(|v| !v.is_blank()).count())
}

/// Sum, non-numeric values count as 0
pub fn reduce_sum(values: &[Scalar]) -> Scalar {
    Scalar::Number(values.iter().filter_map(Scalar::as_number).sum())
}

/// Sum divided by the row count
pub fn reduce_avg(values: &[Scalar]) -> Scalar {
    if values.is_empty() {
        return Scalar::Number(0.0);
    }
    let sum: f64 = values.iter().filter_map(Scalar::as_number).sum();
    Scalar::Number(sum / values.len() as f64)
}

pub fn reduce_max(values: &[Scalar]) -> Scalar {
    Scalar::Number(numbers(values).reduce(f64::max).unwrap_or(0.0))
}

pub fn reduce_min(values: &[Scalar]) -> Scalar {
    Scalar::Number(numbers(values).reduce(f64::min).unwrap_or(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values() -> Vec<Scalar> {
        vec![
            Scalar::from(10.0),
            Scalar::from("x"),
            Scalar::Null,
            Scalar::from("5"),
        ]
    }

    #[test]
    fn test_sum_treats_non_numeric_as_zero() {
        assert_eq!(reduce_sum(&values()), Scalar::Number(15.0));
        assert_eq!(reduce_sum(&[]), Scalar::Number(0.0));
    }

    #[test]
    fn test_sum_ignores_non_finite_text() {
        let vals = vec![Scalar::from(2.0), Scalar::from("inf"), Scalar::from("NaN")];
        assert_eq!(reduce_sum(&vals), Scalar::Number(2.0));
        assert_eq!(reduce_max(&vals), Scalar::Number(2.0));
    }

    #[test]
    fn test_avg_divides_by_row_count() {
        assert_eq!(reduce_avg(&values()), Scalar::Number(3.75));
        assert_eq!(reduce_avg(&[]), Scalar::Number(0.0));
    }

    #[test]
    fn test_extremes_skip_blanks() {
        let vals = vec![Scalar::from(-3.0), Scalar::Null, Scalar::from(7.0)];
        assert_eq!(reduce_max(&vals), Scalar::Number(7.0));
        assert_eq!(reduce_min(&vals), Scalar::Number(-3.0));
        assert_eq!(reduce_max(&[]), Scalar::Number(0.0));
        assert_eq!(reduce_min(&[Scalar::Null]), Scalar::Number(0.0));
    }

    #[test]
    fn test_count_non_blank() {
        assert_eq!(reduce_count(&values()), Scalar::Number(3.0));
    }
}
