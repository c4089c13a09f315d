//! Control surface
//!
//! Describes the eight interactive controls and converts raw widget input
//! into typed parameter values. Range checking happens here so that the core
//! only ever sees type-correct values.

use crate::error::{CoreError, CoreResult};
use epicurve_model::{ParameterKind, ParameterName, ParameterSet, ParameterValue, Region};
use serde::Serialize;

/// Bounds of a numeric range control
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RangeBounds {
    /// Lowest selectable value
    pub min: f64,
    /// Highest selectable value
    pub max: f64,
    /// Slider step
    pub step: f64,
}

impl RangeBounds {
    const fn new(min: f64, max: f64, step: f64) -> Self {
        Self { min, max, step }
    }

    /// Whether `value` lies within the bounds
    #[inline]
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// Bounds of the numeric control for `name`
#[must_use]
pub fn range_bounds(name: ParameterName) -> Option<RangeBounds> {
    let bounds = match name {
        ParameterName::SmoothingDays => RangeBounds::new(1.0, 30.0, 1.0),
        ParameterName::HospitalizationDays | ParameterName::Days => {
            RangeBounds::new(0.0, 30.0, 1.0)
        }
        ParameterName::Mortality => RangeBounds::new(0.0, 5.0, 0.01),
        ParameterName::MissedCaseMultiplier | ParameterName::HospitalizationFactor => {
            RangeBounds::new(1.0, 10.0, 0.1)
        }
        ParameterName::Region | ParameterName::StartDate => return None,
    };
    Some(bounds)
}

/// Human-readable label of a control
#[must_use]
pub fn label(name: ParameterName) -> &'static str {
    match name {
        ParameterName::Region => "Region",
        ParameterName::StartDate => "Start date",
        ParameterName::SmoothingDays => "Moving average days",
        ParameterName::HospitalizationDays => "Case to hospital days",
        ParameterName::Days => "Case to death days",
        ParameterName::Mortality => "Mortality",
        ParameterName::MissedCaseMultiplier => "Missed case multiplier",
        ParameterName::HospitalizationFactor => "Hospitalization factor",
    }
}

/// Widget presenting a control
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ControlWidget {
    /// Drop-down of region names
    Select {
        /// Selectable regions, national first
        options: Vec<Region>,
    },
    /// Calendar date input
    DatePicker,
    /// Numeric slider
    Range(RangeBounds),
}

/// One control with its current value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControlSpec {
    /// Parameter the control sets
    pub name: ParameterName,
    /// Label shown next to the widget
    pub label: &'static str,
    /// Widget
    pub widget: ControlWidget,
    /// Current value
    pub value: ParameterValue,
}

/// All controls in page order
#[must_use]
pub fn control_specs(regions: &[Region], params: &ParameterSet) -> Vec<ControlSpec> {
    ParameterName::ALL
        .iter()
        .map(|&name| {
            let widget = match (name.kind(), range_bounds(name)) {
                (ParameterKind::Text, _) => ControlWidget::Select {
                    options: regions.to_vec(),
                },
                (_, Some(bounds)) => ControlWidget::Range(bounds),
                _ => ControlWidget::DatePicker,
            };
            ControlSpec {
                name,
                label: label(name),
                widget,
                value: params.get(name),
            }
        })
        .collect()
}

/// Convert raw widget input into a parameter value
///
/// # Errors
/// - `CoreError::InvalidControlInput` if numeric input does not parse
/// - `CoreError::OutOfRange` if it lies outside the control's bounds
pub fn parse_control_input(name: ParameterName, raw: &str) -> CoreResult<ParameterValue> {
    let Some(bounds) = range_bounds(name) else {
        return Ok(ParameterValue::Text(raw.trim().to_string()));
    };

    let value: f64 = raw
        .trim()
        .parse()
        .ok()
        .filter(|v: &f64| v.is_finite())
        .ok_or_else(|| CoreError::InvalidControlInput {
            control: name,
            input: raw.to_string(),
        })?;

    if !bounds.contains(value) {
        return Err(CoreError::OutOfRange {
            control: name,
            value,
            min: bounds.min,
            max: bounds.max,
        });
    }
    Ok(ParameterValue::Number(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn eight_controls_in_page_order() {
        let specs = control_specs(&[Region::national(), Region::new("Ohio")], &ParameterSet::default());
        let labels: Vec<&str> = specs.iter().map(|s| s.label).collect();
        assert_eq!(
            labels,
            [
                "Region",
                "Start date",
                "Moving average days",
                "Case to hospital days",
                "Case to death days",
                "Mortality",
                "Missed case multiplier",
                "Hospitalization factor",
            ]
        );
        assert!(matches!(&specs[0].widget, ControlWidget::Select { options } if options.len() == 2));
        assert_eq!(specs[1].widget, ControlWidget::DatePicker);
        assert_eq!(specs[2].value, ParameterValue::Number(7.0));
    }

    #[test]
    fn slider_bounds() {
        assert_eq!(range_bounds(ParameterName::SmoothingDays), Some(RangeBounds::new(1.0, 30.0, 1.0)));
        assert_eq!(range_bounds(ParameterName::Mortality), Some(RangeBounds::new(0.0, 5.0, 0.01)));
        assert_eq!(
            range_bounds(ParameterName::HospitalizationFactor),
            Some(RangeBounds::new(1.0, 10.0, 0.1))
        );
        assert_eq!(range_bounds(ParameterName::Region), None);
    }

    #[test]
    fn numeric_input_parsed() {
        assert_eq!(
            parse_control_input(ParameterName::Days, " 12 ").unwrap(),
            ParameterValue::Number(12.0)
        );
        assert_eq!(
            parse_control_input(ParameterName::Mortality, "0.75").unwrap(),
            ParameterValue::Number(0.75)
        );
    }

    #[test]
    fn text_input_passes_through() {
        assert_eq!(
            parse_control_input(ParameterName::Region, "Ohio").unwrap(),
            ParameterValue::Text("Ohio".into())
        );
        assert_eq!(
            parse_control_input(ParameterName::StartDate, "2021-02-01").unwrap(),
            ParameterValue::Text("2021-02-01".into())
        );
    }

    #[test]
    fn non_numeric_input_rejected() {
        for raw in ["abc", "", "NaN", "inf"] {
            let err = parse_control_input(ParameterName::SmoothingDays, raw).unwrap_err();
            assert!(matches!(err, CoreError::InvalidControlInput { .. }), "{raw}");
        }
    }

    #[test]
    fn out_of_range_input_rejected() {
        assert!(matches!(
            parse_control_input(ParameterName::SmoothingDays, "0"),
            Err(CoreError::OutOfRange { .. })
        ));
        assert!(matches!(
            parse_control_input(ParameterName::MissedCaseMultiplier, "10.5"),
            Err(CoreError::OutOfRange { .. })
        ));
    }

    #[test]
    fn specs_serialize_with_widget_tag() {
        let specs = control_specs(&[Region::national()], &ParameterSet::default());
        let json = serde_json::to_value(&specs).unwrap();
        assert_eq!(json[0]["widget"]["type"], "select");
        assert_eq!(json[2]["name"], "smoothingDays");
        assert_eq!(json[2]["widget"]["type"], "range");
        assert_eq!(json[2]["widget"]["max"], 30.0);
    }
}
