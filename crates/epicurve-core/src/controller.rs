//! Parameter-reactive recompute controller
//!
//! Owns the loaded datasets, one cumulative snapshot per region (built once,
//! independent of parameters) and a cache of derived series. Every accepted
//! parameter change ends in exactly one render.
//!
//! - A derivation parameter change rebuilds every cached region.
//! - A region or start date change renders from the cache, deriving the
//!   target region only if its cached series is missing or stale.

use crate::charts::RenderFrame;
use crate::config::EpicurveConfig;
use crate::controls::parse_control_input;
use crate::error::{CoreError, CoreResult};
use crate::render::Renderer;
use epicurve_ingest::{load_datasets, Datasets, SourceFetcher};
use epicurve_model::{
    CumulativeSeries, DerivedSeries, ParameterName, ParameterSet, ParameterValue, Region,
};
use epicurve_pipeline::{DerivedMetricCalculator, RegionalSeriesBuilder, SourceTables};
use std::collections::HashMap;

/// Recomputes derived series as parameters change and renders the result
#[derive(Debug)]
pub struct RecomputeController<R> {
    datasets: Datasets,
    snapshots: HashMap<Region, CumulativeSeries>,
    cache: HashMap<Region, DerivedSeries>,
    params: ParameterSet,
    renderer: R,
}

impl<R: Renderer> RecomputeController<R> {
    /// Create controller and derive every known region
    ///
    /// Nothing is rendered until [`recompute`](Self::recompute) or a
    /// parameter change.
    ///
    /// # Errors
    /// - `CoreError::Parameter` if `params` is out of domain
    /// - `CoreError::UnknownRegion` if the selected region is not known
    pub fn new(datasets: Datasets, params: ParameterSet, renderer: R) -> CoreResult<Self> {
        params.validate()?;
        if !datasets.regions.contains(&params.region) {
            return Err(CoreError::UnknownRegion(params.region));
        }

        let snapshots = build_snapshots(&datasets);
        let mut controller = Self {
            datasets,
            snapshots,
            cache: HashMap::new(),
            params,
            renderer,
        };
        controller.rebuild_all()?;
        Ok(controller)
    }

    /// Load every source and create a controller from configuration
    ///
    /// # Errors
    /// Any load failure, or as [`new`](Self::new).
    pub async fn load<F>(config: &EpicurveConfig, fetcher: &F, renderer: R) -> CoreResult<Self>
    where
        F: SourceFetcher + ?Sized,
    {
        let datasets = load_datasets(fetcher, &config.sources, &config.ingest_options()).await?;
        Self::new(datasets, config.parameters.clone(), renderer)
    }

    /// Current parameter set
    #[inline]
    #[must_use]
    pub fn params(&self) -> &ParameterSet {
        &self.params
    }

    /// Known regions, national first
    #[inline]
    #[must_use]
    pub fn regions(&self) -> &[Region] {
        &self.datasets.regions
    }

    /// Loaded datasets
    #[inline]
    #[must_use]
    pub fn datasets(&self) -> &Datasets {
        &self.datasets
    }

    /// Cached derived series of a region
    #[inline]
    #[must_use]
    pub fn series(&self, region: &Region) -> Option<&DerivedSeries> {
        self.cache.get(region)
    }

    /// Render sink
    #[inline]
    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Mutable render sink
    #[inline]
    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Consume the controller, returning the render sink
    #[inline]
    pub fn into_renderer(self) -> R {
        self.renderer
    }

    /// Validate and apply one parameter change, then render
    ///
    /// # Errors
    /// - `CoreError::Parameter` for a type mismatch or out-of-domain value
    /// - `CoreError::UnknownRegion` for a region that is not known
    /// - render failures
    pub fn set_parameter(&mut self, name: ParameterName, value: ParameterValue) -> CoreResult<()> {
        let next = self.params.with_parameter(name, value)?;
        if name == ParameterName::Region && !self.datasets.regions.contains(&next.region) {
            return Err(CoreError::UnknownRegion(next.region));
        }

        tracing::debug!(parameter = %name, value = ?next.get(name), "parameter changed");
        self.params = next;
        if name.affects_derivation() {
            self.rebuild_all()?;
        } else {
            let region = self.params.region.clone();
            self.ensure_current(&region)?;
        }
        self.render()
    }

    /// As [`set_parameter`](Self::set_parameter), with the name given as text
    ///
    /// # Errors
    /// `CoreError::Parameter` for an unknown name, otherwise as `set_parameter`.
    pub fn set_parameter_by_name(&mut self, name: &str, value: ParameterValue) -> CoreResult<()> {
        self.set_parameter(name.parse()?, value)
    }

    /// Apply raw widget input, as a control change event would
    ///
    /// # Errors
    /// Control-layer rejections, otherwise as `set_parameter`.
    pub fn apply_control_input(&mut self, name: &str, raw: &str) -> CoreResult<()> {
        let name: ParameterName = name.parse()?;
        let value = parse_control_input(name, raw)?;
        self.set_parameter(name, value)
    }

    /// Rebuild every cached series with the current parameters and render
    ///
    /// # Errors
    /// Render failures.
    pub fn recompute(&mut self) -> CoreResult<()> {
        self.rebuild_all()?;
        self.render()
    }

    /// Frame for the current region and start date
    ///
    /// # Errors
    /// `CoreError::UnknownRegion` if the region has no cached series.
    pub fn frame(&self) -> CoreResult<RenderFrame> {
        let series = self
            .cache
            .get(&self.params.region)
            .ok_or_else(|| CoreError::UnknownRegion(self.params.region.clone()))?;
        Ok(RenderFrame::new(&self.params, series))
    }

    fn render(&mut self) -> CoreResult<()> {
        let frame = self.frame()?;
        self.renderer.render(&frame)
    }

    fn rebuild_all(&mut self) -> CoreResult<()> {
        let calculator = DerivedMetricCalculator::new(self.params.derivation)?;
        self.cache = self
            .snapshots
            .iter()
            .map(|(region, snapshot)| {
                let population = self.datasets.population.get(region);
                (region.clone(), calculator.derive(snapshot, population))
            })
            .collect();
        tracing::info!(regions = self.cache.len(), "recomputed derived series");
        Ok(())
    }

    fn ensure_current(&mut self, region: &Region) -> CoreResult<()> {
        let fresh = self
            .cache
            .get(region)
            .is_some_and(|series| series.params() == &self.params.derivation);
        if fresh {
            return Ok(());
        }

        let snapshot = self
            .snapshots
            .get(region)
            .ok_or_else(|| CoreError::UnknownRegion(region.clone()))?;
        let calculator = DerivedMetricCalculator::new(self.params.derivation)?;
        let series = calculator.derive(snapshot, self.datasets.population.get(region));
        tracing::debug!(%region, "derived stale region");
        self.cache.insert(region.clone(), series);
        Ok(())
    }
}

fn build_snapshots(datasets: &Datasets) -> HashMap<Region, CumulativeSeries> {
    let tables = SourceTables {
        state_cases: &datasets.state_cases,
        vaccinations: &datasets.vaccinations,
        hospitalizations: &datasets.hospitalizations,
        national: &datasets.national,
    };
    let builder = RegionalSeriesBuilder::new(tables, datasets.national_region.clone());

    datasets
        .regions
        .iter()
        .map(|region| {
            if datasets.population.get(region).is_none() {
                tracing::warn!(%region, "no population entry; per-capita values will be missing");
            }
            (region.clone(), builder.build(region))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::LatestFrame;
    use epicurve_ingest::{Datasets, IngestOptions, RawDocuments};
    use epicurve_model::ModelError;
    use epicurve_test_utils as fixtures;

    fn documents() -> RawDocuments {
        RawDocuments {
            state_cases: fixtures::STATE_CASES_CSV.into(),
            national: fixtures::NATIONAL_CSV.into(),
            vaccinations: fixtures::VACCINATIONS_CSV.into(),
            hospitalizations: fixtures::HOSPITALIZATIONS_JSON.into(),
            population: fixtures::POPULATION_JSON.into(),
            abbreviations: fixtures::ABBREVIATIONS_JSON.into(),
        }
    }

    fn datasets() -> Datasets {
        Datasets::from_documents(&documents(), &IngestOptions::default()).unwrap()
    }

    fn controller() -> RecomputeController<LatestFrame> {
        RecomputeController::new(datasets(), ParameterSet::default(), LatestFrame::new()).unwrap()
    }

    #[test]
    fn derives_every_region_up_front() {
        let controller = controller();
        for region in controller.regions() {
            let series = controller.series(region).unwrap();
            assert_eq!(series.len(), fixtures::AXIS_DAYS as usize);
        }
        assert_eq!(controller.renderer().renders(), 0);
    }

    #[test]
    fn unknown_initial_region_rejected() {
        let params = ParameterSet::default().with_region("Atlantis");
        let err = RecomputeController::new(datasets(), params, LatestFrame::new()).unwrap_err();
        assert!(matches!(err, CoreError::UnknownRegion(_)));
    }

    #[test]
    fn renamed_national_region_builds_controller() {
        let config = EpicurveConfig::from_toml_str("national_region = \"USA\"\n").unwrap();
        let datasets = Datasets::from_documents(&documents(), &config.ingest_options()).unwrap();
        let controller =
            RecomputeController::new(datasets, config.parameters, LatestFrame::new()).unwrap();

        assert_eq!(controller.regions()[0].as_str(), "USA");
        let frame = controller.frame().unwrap();
        assert_eq!(frame.region.as_str(), "USA");
        assert_eq!(
            frame.population,
            Some(fixtures::ALPHA_POPULATION + fixtures::BETA_POPULATION)
        );
    }

    #[test]
    fn derivation_change_rebuilds_all_regions() {
        let mut controller = controller();
        controller
            .set_parameter(ParameterName::SmoothingDays, ParameterValue::Number(3.0))
            .unwrap();

        for region in controller.regions() {
            assert_eq!(controller.series(region).unwrap().params().smoothing_days, 3);
        }
        assert_eq!(controller.renderer().renders(), 1);
    }

    #[test]
    fn region_change_renders_target() {
        let mut controller = controller();
        controller.apply_control_input("region", "Beta").unwrap();

        let frame = controller.renderer().frame().unwrap();
        assert_eq!(frame.region.as_str(), "Beta");
        assert_eq!(frame.population, Some(fixtures::BETA_POPULATION));
    }

    #[test]
    fn start_date_filters_rendered_days() {
        let mut controller = controller();
        controller.apply_control_input("startDate", "2021-01-06").unwrap();

        let frame = controller.renderer().frame().unwrap();
        assert_eq!(frame.days.len(), 5);
        assert_eq!(frame.days[0].date, fixtures::axis_day(6));
    }

    #[test]
    fn rejected_change_leaves_state_untouched() {
        let mut controller = controller();
        let before = controller.params().clone();

        let err = controller
            .set_parameter(ParameterName::Days, ParameterValue::Text("soon".into()))
            .unwrap_err();
        assert!(matches!(err, CoreError::Parameter(ModelError::TypeMismatch { .. })));
        assert!(controller.apply_control_input("region", "Atlantis").is_err());
        assert!(controller.apply_control_input("smoothingDays", "45").is_err());
        assert!(controller.apply_control_input("colour", "red").is_err());

        assert_eq!(controller.params(), &before);
        assert_eq!(controller.renderer().renders(), 0);
    }

    #[test]
    fn recompute_is_bitwise_idempotent() {
        let mut controller = controller();
        controller.recompute().unwrap();
        let first = controller.renderer_mut().take().unwrap();
        controller.recompute().unwrap();
        let second = controller.renderer_mut().take().unwrap();

        for (a, b) in first.days.iter().zip(&second.days) {
            assert_eq!(a.cases.to_bits(), b.cases.to_bits());
            assert_eq!(a.deaths.to_bits(), b.deaths.to_bits());
            assert_eq!(a.hospital_per_100k_scaled.to_bits(), b.hospital_per_100k_scaled.to_bits());
            assert_eq!(a.percent_immune.to_bits(), b.percent_immune.to_bits());
        }
    }
}
