use epicurve_model::{ModelError, ParameterName, ParameterSet, ParameterValue};
use proptest::prelude::*;

proptest! {
    #[test]
    fn prop_whole_smoothing_windows_accepted(window in 1u32..=30) {
        let next = ParameterSet::default()
            .with_parameter(ParameterName::SmoothingDays, ParameterValue::from(window))
            .unwrap();
        prop_assert_eq!(next.derivation.smoothing_days, window);
    }

    #[test]
    fn prop_fractional_lags_rejected(lag in 0.0f64..30.0) {
        prop_assume!(lag.fract() != 0.0);
        let res = ParameterSet::default()
            .with_parameter(ParameterName::Days, ParameterValue::Number(lag));
        let is_out_of_domain = matches!(res, Err(ModelError::OutOfDomain { .. }));
        prop_assert!(is_out_of_domain);
    }

    #[test]
    fn prop_every_numeric_parameter_rejects_text(idx in 0usize..8, text in "[a-z]{1,8}") {
        let name = ParameterName::ALL[idx];
        let res = ParameterSet::default().with_parameter(name, ParameterValue::Text(text));
        if name.kind().is_numeric() {
            let is_mismatch = matches!(res, Err(ModelError::TypeMismatch { .. }));
            prop_assert!(is_mismatch);
        }
    }
}

#[test]
fn unchanged_set_survives_failed_update() {
    let params = ParameterSet::default();
    let _ = params.with_parameter(ParameterName::Mortality, ParameterValue::Number(-1.0));
    assert_eq!(params.derivation.mortality, 0.5);
}
