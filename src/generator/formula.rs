use crate::generator::template::py_str;
use crate::study::record::InputSpec;

/// Strategy that emits the Python expression computing one output value
/// inside the generated artifact. The mock policy below stands in for real
/// simulation backends, which plug in by implementing this trait; the
/// templating layer never hard-codes an output formula.
pub trait OutputFormula: Send + Sync {
    /// `ordinal` is 1-based, in the stored output order.
    fn expression(&self, ordinal: usize, inputs: &[InputSpec]) -> String;
}

/// Placeholder computation: `(sum of all sampled inputs) * ordinal *
/// uniform(0.9, 1.1)`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ScaledSumFormula;

impl OutputFormula for ScaledSumFormula {
    fn expression(&self, ordinal: usize, inputs: &[InputSpec]) -> String {
        let sum = if inputs.is_empty() {
            "0.0".to_string()
        } else {
            inputs
                .iter()
                .map(|input| format!("row[{}]", py_str(&input.name)))
                .collect::<Vec<_>>()
                .join(" + ")
        };
        format!("({sum}) * {ordinal} * random.uniform(0.9, 1.1)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_formula_scales_the_input_sum_by_ordinal() {
        let inputs = vec![
            InputSpec {
                name: "speed".to_string(),
                lower_bound: 0.0,
                upper_bound: 5.5,
            },
            InputSpec {
                name: "agility".to_string(),
                lower_bound: -10.0,
                upper_bound: 10.0,
            },
        ];
        assert_eq!(
            ScaledSumFormula.expression(3, &inputs),
            "(row[\"speed\"] + row[\"agility\"]) * 3 * random.uniform(0.9, 1.1)"
        );
    }

    #[test]
    fn mock_formula_degrades_to_zero_sum_without_inputs() {
        assert_eq!(
            ScaledSumFormula.expression(1, &[]),
            "(0.0) * 1 * random.uniform(0.9, 1.1)"
        );
    }
}
