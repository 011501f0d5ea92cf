/// Asserts that two floats are within `$prec` of each other.
#[macro_export]
macro_rules! assert_almost_eq {
    ($a:expr, $b:expr, $prec:expr $(,)?) => {
        if !$crate::numeric::almost_eq($a, $b, $prec) {
            panic!(
                "assertion failed: `abs(left - right) < {:e}`, (left: `{}`, right: `{}`)",
                $prec, $a, $b
            );
        }
    };
}

/// Asserts that a `CompartmentState` matches the expected `[E, I, A, H, S]` values,
/// compartment by compartment, within `$prec`.
#[macro_export]
macro_rules! assert_state_eq {
    ($state:expr, $expected:expr, $prec:expr $(,)?) => {{
        let actual: [f64; 5] = $state.to_array();
        let expected: [f64; 5] = $expected;
        for (compartment, (a, e)) in $crate::compartments::Compartment::ALL
            .iter()
            .zip(actual.iter().zip(expected.iter()))
        {
            if !$crate::numeric::almost_eq(*a, *e, $prec) {
                panic!(
                    "assertion failed: {} differs by more than {:e}, (left: `{}`, right: `{}`)",
                    compartment, $prec, a, e
                );
            }
        }
    }};
}

#[cfg(test)]
mod tests {
    use crate::compartments::CompartmentState;

    #[test]
    fn state_macro_passes() {
        let state = CompartmentState::from([4.95, 8.0, 0.0, 1.0, 985.05]);
        assert_state_eq!(state, [4.95, 8.0, 0.0, 1.0, 985.05], 1e-12);
    }

    #[test]
    #[should_panic(expected = "Hospitalized differs")]
    fn state_macro_names_offending_compartment() {
        let state = CompartmentState::from([4.95, 8.0, 0.0, 1.5, 985.05]);
        assert_state_eq!(state, [4.95, 8.0, 0.0, 1.0, 985.05], 1e-12);
    }
}
