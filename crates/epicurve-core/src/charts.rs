//! Chart slots and render frames
//!
//! Five fixed chart slots, each bound to one or more derived fields. A
//! [`RenderFrame`] is everything a charting front end needs for one paint:
//! the filtered derived days and, per slot, one point list per line. NaN
//! values become `None` so they are drawn as gaps.

use epicurve_model::{CalendarDate, DerivedDay, DerivedSeries, ParameterSet, Region};
use serde::Serialize;
use std::fmt;

/// Stroke colour of case lines
pub const COLOR_CASES: &str = "#e88";
/// Stroke colour of death lines
pub const COLOR_DEATHS: &str = "#999";
/// Stroke colour of hospitalization lines
pub const COLOR_HOSPITALIZATIONS: &str = "#99f";
/// Stroke colour of the vaccinated share
pub const COLOR_VACCINATED: &str = "#4f8b7d";
/// Stroke colour of the vaccination rate
pub const COLOR_VACCINES: &str = "#00f5";

/// Derived field plotted by a chart line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MetricField {
    /// Smoothed, multiplied cases per 100k
    CasesPer100k,
    /// Lagged deaths per 100k
    DeathsPer100k,
    /// Cases implied by deaths and mortality
    DeathsPer100kScaled,
    /// Lagged hospitalizations per 100k
    HospitalPer100k,
    /// Cases implied by hospitalizations
    HospitalPer100kScaled,
    /// Share with a first dose
    PercentVaccinated,
    /// Smoothed first doses per 100k
    VaccinesPer100k,
}

impl MetricField {
    /// Field name as serialized in a derived day
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CasesPer100k => "casesPer100k",
            Self::DeathsPer100k => "deathsPer100k",
            Self::DeathsPer100kScaled => "deathsPer100kScaled",
            Self::HospitalPer100k => "hospitalPer100k",
            Self::HospitalPer100kScaled => "hospitalPer100kScaled",
            Self::PercentVaccinated => "percentVaccinated",
            Self::VaccinesPer100k => "vaccinesPer100k",
        }
    }

    /// Read the field from a day
    #[must_use]
    pub fn value(&self, day: &DerivedDay) -> f64 {
        match self {
            Self::CasesPer100k => day.cases_per_100k,
            Self::DeathsPer100k => day.deaths_per_100k,
            Self::DeathsPer100kScaled => day.deaths_per_100k_scaled,
            Self::HospitalPer100k => day.hospital_per_100k,
            Self::HospitalPer100kScaled => day.hospital_per_100k_scaled,
            Self::PercentVaccinated => day.percent_vaccinated,
            Self::VaccinesPer100k => day.vaccines_per_100k,
        }
    }
}

impl fmt::Display for MetricField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static description of one line in a chart
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSpec {
    /// Plotted field
    pub field: MetricField,
    /// Stroke colour
    pub color: &'static str,
}

const CASES_LINES: [LineSpec; 3] = [
    LineSpec {
        field: MetricField::DeathsPer100kScaled,
        color: COLOR_DEATHS,
    },
    LineSpec {
        field: MetricField::CasesPer100k,
        color: COLOR_CASES,
    },
    LineSpec {
        field: MetricField::HospitalPer100kScaled,
        color: COLOR_HOSPITALIZATIONS,
    },
];
const DEATHS_LINES: [LineSpec; 1] = [LineSpec {
    field: MetricField::DeathsPer100k,
    color: COLOR_DEATHS,
}];
const HOSPITAL_LINES: [LineSpec; 1] = [LineSpec {
    field: MetricField::HospitalPer100k,
    color: COLOR_HOSPITALIZATIONS,
}];
const VACCINATED_LINES: [LineSpec; 1] = [LineSpec {
    field: MetricField::PercentVaccinated,
    color: COLOR_VACCINATED,
}];
const VACCINATIONS_LINES: [LineSpec; 1] = [LineSpec {
    field: MetricField::VaccinesPer100k,
    color: COLOR_VACCINES,
}];

/// The five chart slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartSlot {
    /// Cases with implied cases from deaths and hospitalizations
    Cases,
    /// Deaths only
    Deaths,
    /// Hospitalizations only
    Hospital,
    /// Share of the population with a first dose
    Vaccinated,
    /// First-dose rate
    Vaccinations,
}

impl ChartSlot {
    /// All slots, in page order
    pub const ALL: [ChartSlot; 5] = [
        ChartSlot::Cases,
        ChartSlot::Deaths,
        ChartSlot::Hospital,
        ChartSlot::Vaccinated,
        ChartSlot::Vaccinations,
    ];

    /// Element id of the slot
    #[must_use]
    pub fn id(&self) -> &'static str {
        match self {
            Self::Cases => "cases-chart",
            Self::Deaths => "deaths-chart",
            Self::Hospital => "hospital-chart",
            Self::Vaccinated => "vaccinated-chart",
            Self::Vaccinations => "vaccinations-chart",
        }
    }

    /// Lines drawn in this slot
    #[must_use]
    pub fn lines(&self) -> &'static [LineSpec] {
        match self {
            Self::Cases => &CASES_LINES,
            Self::Deaths => &DEATHS_LINES,
            Self::Hospital => &HOSPITAL_LINES,
            Self::Vaccinated => &VACCINATED_LINES,
            Self::Vaccinations => &VACCINATIONS_LINES,
        }
    }

    /// Fixed y-axis domain, if any
    #[must_use]
    pub fn y_domain(&self) -> Option<[f64; 2]> {
        match self {
            Self::Vaccinated => Some([0.0, 100.0]),
            _ => None,
        }
    }
}

/// One plotted point; `None` is a gap
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChartPoint {
    /// X coordinate
    pub date: CalendarDate,
    /// Y coordinate
    pub value: Option<f64>,
}

/// One line with its points
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartLine {
    /// Plotted field
    pub field: MetricField,
    /// Stroke colour
    pub color: &'static str,
    /// Points in date order
    pub points: Vec<ChartPoint>,
}

impl ChartLine {
    fn from_days(spec: LineSpec, days: &[DerivedDay]) -> Self {
        let points = days
            .iter()
            .map(|day| {
                let value = spec.field.value(day);
                ChartPoint {
                    date: day.date,
                    value: (!value.is_nan()).then_some(value),
                }
            })
            .collect();
        Self {
            field: spec.field,
            color: spec.color,
            points,
        }
    }
}

/// One chart ready to draw
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chart {
    /// Slot
    pub slot: ChartSlot,
    /// Element id
    pub id: &'static str,
    /// Fixed y-axis domain
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_domain: Option<[f64; 2]>,
    /// Lines in drawing order
    pub lines: Vec<ChartLine>,
}

impl Chart {
    /// Build a slot's chart from filtered days
    #[must_use]
    pub fn build(slot: ChartSlot, days: &[DerivedDay]) -> Self {
        Self {
            slot,
            id: slot.id(),
            y_domain: slot.y_domain(),
            lines: slot
                .lines()
                .iter()
                .map(|spec| ChartLine::from_days(*spec, days))
                .collect(),
        }
    }
}

/// Everything needed for one paint
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderFrame {
    /// Displayed region
    pub region: Region,
    /// First displayed date
    pub start_date: CalendarDate,
    /// Population the rates were normalized by
    pub population: Option<u64>,
    /// Parameters the frame was computed with
    pub parameters: ParameterSet,
    /// Derived days on or after the start date
    pub days: Vec<DerivedDay>,
    /// Charts in slot order
    pub charts: Vec<Chart>,
}

impl RenderFrame {
    /// Build a frame from a derived series, filtered to the start date
    #[must_use]
    pub fn new(parameters: &ParameterSet, series: &DerivedSeries) -> Self {
        let days = series.since(parameters.start_date).to_vec();
        let charts = ChartSlot::ALL
            .iter()
            .map(|slot| Chart::build(*slot, &days))
            .collect();
        Self {
            region: series.region().clone(),
            start_date: parameters.start_date,
            population: series.population(),
            parameters: parameters.clone(),
            days,
            charts,
        }
    }

    /// Chart of a slot
    #[must_use]
    pub fn chart(&self, slot: ChartSlot) -> Option<&Chart> {
        self.charts.iter().find(|chart| chart.slot == slot)
    }

    /// Serialize to JSON
    ///
    /// # Errors
    /// Serialization failure.
    pub fn to_json(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }
}
