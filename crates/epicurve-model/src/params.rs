//! User-adjustable parameters
//!
//! The parameter set is an immutable value: [`ParameterSet::with_parameter`]
//! validates one change and returns a new set, leaving the original intact.
//! Only [`DerivationParams`] feed the derivation; region and start date merely
//! select and filter an already derived series.

use crate::date::{parse_date, DateKey};
use crate::error::{ModelError, ModelResult};
use crate::region::Region;
use crate::CalendarDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Parameters that change the derived series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DerivationParams {
    /// Rolling-average window in days (>= 1)
    pub smoothing_days: u32,
    /// Case-to-death lag in days
    pub days: u32,
    /// Case-to-hospitalization lag in days
    pub hospitalization_days: u32,
    /// Assumed mortality in percent (> 0)
    pub mortality: f64,
    /// Scale applied to reported cases (>= 1)
    pub missed_case_multiplier: f64,
    /// Scale applied to hospitalizations (>= 1)
    pub hospitalization_factor: f64,
}

impl DerivationParams {
    /// Check every field against its domain
    ///
    /// # Errors
    /// `ModelError::OutOfDomain` for the first offending field.
    pub fn validate(&self) -> ModelResult<()> {
        if self.smoothing_days < 1 {
            return Err(ModelError::out_of_domain(
                ParameterName::SmoothingDays.as_str(),
                f64::from(self.smoothing_days),
                "must be >= 1",
            ));
        }
        check_real(ParameterName::Mortality, self.mortality)?;
        check_real(ParameterName::MissedCaseMultiplier, self.missed_case_multiplier)?;
        check_real(ParameterName::HospitalizationFactor, self.hospitalization_factor)?;
        Ok(())
    }
}

impl Default for DerivationParams {
    fn default() -> Self {
        Self {
            smoothing_days: 7,
            days: 18,
            hospitalization_days: 9,
            mortality: 0.5,
            missed_case_multiplier: 3.0,
            hospitalization_factor: 5.0,
        }
    }
}

/// The complete interactive parameter set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParameterSet {
    /// Selected region
    pub region: Region,
    /// First date shown
    pub start_date: CalendarDate,
    /// Parameters feeding the derivation
    #[serde(flatten)]
    pub derivation: DerivationParams,
}

impl ParameterSet {
    /// Create default parameter set
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With region
    #[inline]
    #[must_use]
    pub fn with_region(mut self, region: impl Into<Region>) -> Self {
        self.region = region.into();
        self
    }

    /// With start date
    #[inline]
    #[must_use]
    pub fn with_start_date(mut self, start_date: CalendarDate) -> Self {
        self.start_date = start_date;
        self
    }

    /// With derivation parameters
    #[inline]
    #[must_use]
    pub fn with_derivation(mut self, derivation: DerivationParams) -> Self {
        self.derivation = derivation;
        self
    }

    /// Return a new set with one parameter changed
    ///
    /// # Errors
    /// - `ModelError::TypeMismatch` if the value's type does not match the parameter
    /// - `ModelError::OutOfDomain` if a numeric value is outside its domain
    /// - `ModelError::InvalidDate` / `ModelError::EmptyRegion` for bad text values
    pub fn with_parameter(&self, name: ParameterName, value: ParameterValue) -> ModelResult<Self> {
        let mut next = self.clone();
        match name {
            ParameterName::Region => {
                let region = expect_text(name, value)?;
                if region.trim().is_empty() {
                    return Err(ModelError::EmptyRegion);
                }
                next.region = Region::new(region);
            }
            ParameterName::StartDate => {
                next.start_date = parse_date(&expect_text(name, value)?)?;
            }
            ParameterName::SmoothingDays => {
                next.derivation.smoothing_days = expect_integer(name, value, 1)?;
            }
            ParameterName::Days => {
                next.derivation.days = expect_integer(name, value, 0)?;
            }
            ParameterName::HospitalizationDays => {
                next.derivation.hospitalization_days = expect_integer(name, value, 0)?;
            }
            ParameterName::Mortality => {
                next.derivation.mortality = expect_real(name, value)?;
            }
            ParameterName::MissedCaseMultiplier => {
                next.derivation.missed_case_multiplier = expect_real(name, value)?;
            }
            ParameterName::HospitalizationFactor => {
                next.derivation.hospitalization_factor = expect_real(name, value)?;
            }
        }
        Ok(next)
    }

    /// Current value of a parameter
    #[must_use]
    pub fn get(&self, name: ParameterName) -> ParameterValue {
        let d = &self.derivation;
        match name {
            ParameterName::Region => ParameterValue::Text(self.region.to_string()),
            ParameterName::StartDate => {
                ParameterValue::Text(DateKey::from_date(self.start_date).to_string())
            }
            ParameterName::SmoothingDays => ParameterValue::Number(f64::from(d.smoothing_days)),
            ParameterName::Days => ParameterValue::Number(f64::from(d.days)),
            ParameterName::HospitalizationDays => {
                ParameterValue::Number(f64::from(d.hospitalization_days))
            }
            ParameterName::Mortality => ParameterValue::Number(d.mortality),
            ParameterName::MissedCaseMultiplier => ParameterValue::Number(d.missed_case_multiplier),
            ParameterName::HospitalizationFactor => ParameterValue::Number(d.hospitalization_factor),
        }
    }

    /// Check the whole set, e.g. after loading it from a config file
    ///
    /// # Errors
    /// The first domain violation found.
    pub fn validate(&self) -> ModelResult<()> {
        if self.region.as_str().trim().is_empty() {
            return Err(ModelError::EmptyRegion);
        }
        self.derivation.validate()
    }
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self {
            region: Region::national(),
            start_date: CalendarDate::from_ymd_opt(2020, 1, 1).unwrap_or_default(),
            derivation: DerivationParams::default(),
        }
    }
}

/// Declared type of a parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterKind {
    /// Free text (region name)
    Text,
    /// `YYYY-MM-DD` date string
    Date,
    /// Whole number
    Integer,
    /// Real number
    Real,
}

impl ParameterKind {
    /// Whether values of this kind are numbers
    #[inline]
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Integer | Self::Real)
    }
}

impl fmt::Display for ParameterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Text => "text",
            Self::Date => "date",
            Self::Integer => "integer",
            Self::Real => "number",
        })
    }
}

/// Name of an interactive parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParameterName {
    /// Displayed region
    Region,
    /// First displayed date
    StartDate,
    /// Smoothing window
    SmoothingDays,
    /// Case-to-death lag
    Days,
    /// Case-to-hospitalization lag
    HospitalizationDays,
    /// Assumed mortality percentage
    Mortality,
    /// Reported-case multiplier
    MissedCaseMultiplier,
    /// Hospitalization multiplier
    HospitalizationFactor,
}

impl ParameterName {
    /// All parameters, in control order
    pub const ALL: [ParameterName; 8] = [
        ParameterName::Region,
        ParameterName::StartDate,
        ParameterName::SmoothingDays,
        ParameterName::HospitalizationDays,
        ParameterName::Days,
        ParameterName::Mortality,
        ParameterName::MissedCaseMultiplier,
        ParameterName::HospitalizationFactor,
    ];

    /// Wire name used by the control surface
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Region => "region",
            Self::StartDate => "startDate",
            Self::SmoothingDays => "smoothingDays",
            Self::Days => "days",
            Self::HospitalizationDays => "hospitalizationDays",
            Self::Mortality => "mortality",
            Self::MissedCaseMultiplier => "missedCaseMultiplier",
            Self::HospitalizationFactor => "hospitalizationFactor",
        }
    }

    /// Declared value type
    #[must_use]
    pub fn kind(&self) -> ParameterKind {
        match self {
            Self::Region => ParameterKind::Text,
            Self::StartDate => ParameterKind::Date,
            Self::SmoothingDays | Self::Days | Self::HospitalizationDays => ParameterKind::Integer,
            Self::Mortality | Self::MissedCaseMultiplier | Self::HospitalizationFactor => {
                ParameterKind::Real
            }
        }
    }

    /// Whether changing this parameter invalidates derived series
    #[inline]
    #[must_use]
    pub fn affects_derivation(&self) -> bool {
        !matches!(self, Self::Region | Self::StartDate)
    }
}

impl fmt::Display for ParameterName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParameterName {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = match s {
            "region" | "state" => Self::Region,
            "startDate" | "start_date" => Self::StartDate,
            "smoothingDays" | "smoothing_days" => Self::SmoothingDays,
            "days" => Self::Days,
            "hospitalizationDays" | "hospitalization_days" => Self::HospitalizationDays,
            "mortality" => Self::Mortality,
            "missedCaseMultiplier" | "missed_case_multiplier" => Self::MissedCaseMultiplier,
            "hospitalizationFactor" | "hospitalization_factor" => Self::HospitalizationFactor,
            other => return Err(ModelError::UnknownParameter(other.to_string())),
        };
        Ok(name)
    }
}

/// A parameter value as delivered by a control
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterValue {
    /// Numeric input
    Number(f64),
    /// String input (region, date)
    Text(String),
}

impl ParameterValue {
    /// Name of the value's type, for error messages
    #[inline]
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Number(_) => "number",
            Self::Text(_) => "text",
        }
    }
}

impl From<f64> for ParameterValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<u32> for ParameterValue {
    fn from(value: u32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<&str> for ParameterValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ParameterValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

fn expect_text(name: ParameterName, value: ParameterValue) -> ModelResult<String> {
    match value {
        ParameterValue::Text(text) => Ok(text),
        other => Err(ModelError::TypeMismatch {
            parameter: name.as_str(),
            expected: name.kind(),
            actual: other.type_name(),
        }),
    }
}

fn expect_number(name: ParameterName, value: ParameterValue) -> ModelResult<f64> {
    match value {
        ParameterValue::Number(n) if n.is_finite() => Ok(n),
        ParameterValue::Number(n) => Err(ModelError::out_of_domain(name.as_str(), n, "must be finite")),
        other => Err(ModelError::TypeMismatch {
            parameter: name.as_str(),
            expected: name.kind(),
            actual: other.type_name(),
        }),
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn expect_integer(name: ParameterName, value: ParameterValue, min: u32) -> ModelResult<u32> {
    let n = expect_number(name, value)?;
    if n.fract() != 0.0 {
        return Err(ModelError::out_of_domain(name.as_str(), n, "must be a whole number"));
    }
    if n < f64::from(min) || n > f64::from(u32::MAX) {
        let reason = if min == 0 { "must be >= 0" } else { "must be >= 1" };
        return Err(ModelError::out_of_domain(name.as_str(), n, reason));
    }
    Ok(n as u32)
}

fn expect_real(name: ParameterName, value: ParameterValue) -> ModelResult<f64> {
    let n = expect_number(name, value)?;
    check_real(name, n)?;
    Ok(n)
}

fn check_real(name: ParameterName, n: f64) -> ModelResult<()> {
    if !n.is_finite() {
        return Err(ModelError::out_of_domain(name.as_str(), n, "must be finite"));
    }
    match name {
        ParameterName::Mortality if n <= 0.0 => {
            Err(ModelError::out_of_domain(name.as_str(), n, "must be > 0"))
        }
        ParameterName::MissedCaseMultiplier | ParameterName::HospitalizationFactor if n < 1.0 => {
            Err(ModelError::out_of_domain(name.as_str(), n, "must be >= 1"))
        }
        _ => Ok(()),
    }
}
