//! # Load and Margin Pipeline
//!
//! Stages are evaluated on demand and memoized, so asking for any curve runs
//! exactly the stages it depends on, in dependency order:
//!
//! ```text
//! inertia ─┬──────────────────────────────┐
//!          │                              ▼
//! lift → shear → moment ─┬→ rotation → deflection
//!                        ├→ panel stress ─→ skin buckling
//!                        └→ column buckling
//! torsion ──→ twist
//! shear + torsion ──→ web buckling
//! ```
//!
//! Each stage is a fork-join over the span grid on the [`SpanEvaluator`]; the
//! first failing position aborts the stage and the error propagates out of
//! the run. Structural checks never fail the run; they are logged and
//! collected into the [`AnalysisReport`].
//!
//! ## Example
//!
//! ```rust
//! use wingbox_core::analysis::Analysis;
//! use wingbox_core::case::CaseFile;
//!
//! let case = CaseFile::sample().unwrap();
//! let analysis = Analysis::from_case(&case).unwrap();
//! let shear = analysis.shear().unwrap();
//! assert!(shear.at(0.0) > 0.0);
//! ```

pub mod buckling;
pub mod deflection;
pub mod inertia;
pub mod loads;
pub mod margins;
pub mod stress;

use std::sync::Arc;

use chrono::Utc;
use once_cell::sync::OnceCell;

use crate::case::{AnalysisSettings, CaseFile, SCHEMA_VERSION};
use crate::coefficients::BucklingTables;
use crate::errors::WingBoxResult;
use crate::geometry::{InertiaCurves, Surface, WingBox};
use crate::loads::{LoadCase, Wing};
use crate::numerics::{Curve, Interpolation, SpanEvaluator};
use crate::report::{names, AnalysisReport, ReportMetadata, TrimSummary};

pub use deflection::StiffnessCheck;
pub use margins::{MarginRow, MarginSample, MarginTable};
pub use stress::{PanelStress, YieldCheck};

/// Read-only view of everything a stage needs, shared by the workers
#[derive(Debug, Clone, Copy)]
pub struct StageContext<'a> {
    pub load_case: &'a LoadCase,
    pub settings: &'a AnalysisSettings,
    pub tables: &'a BucklingTables,
    pub evaluator: SpanEvaluator,
    /// Known discontinuities strictly inside the box range
    pub breakpoints: &'a [f64],
}

impl<'a> StageContext<'a> {
    pub fn wing(&self) -> &'a Wing {
        self.load_case.wing()
    }

    pub fn wing_box(&self) -> &'a WingBox {
        self.load_case.wing().wing_box()
    }

    pub fn grid(&self) -> &'a [f64] {
        self.load_case.grid()
    }

    pub fn dynamic_pressure(&self) -> f64 {
        self.load_case.dynamic_pressure()
    }

    /// Upper limit of the y→tip integrals
    pub fn end_y(&self) -> f64 {
        self.wing_box().end_y()
    }
}

/// One analysis run over a load case, with memoized stage results
pub struct Analysis<'a> {
    load_case: &'a LoadCase,
    settings: &'a AnalysisSettings,
    tables: &'a BucklingTables,
    evaluator: SpanEvaluator,
    breakpoints: Vec<f64>,
    lift: OnceCell<Arc<Curve>>,
    shear: OnceCell<Arc<Curve>>,
    moment: OnceCell<Arc<Curve>>,
    rotation: OnceCell<Arc<Curve>>,
    deflection: OnceCell<Arc<Curve>>,
    torsion: OnceCell<Arc<Curve>>,
    twist: OnceCell<Arc<Curve>>,
    panel_stress: OnceCell<PanelStress>,
}

impl<'a> Analysis<'a> {
    /// Prepare a run; nothing is evaluated until a stage is requested.
    pub fn new(load_case: &'a LoadCase, settings: &'a AnalysisSettings, tables: &'a BucklingTables) -> WingBoxResult<Self> {
        settings.validate()?;
        let breakpoints = loads::breakpoints(load_case);
        log::debug!("Integration breakpoints: {:?}", breakpoints);
        Ok(Analysis {
            load_case,
            settings,
            tables,
            evaluator: settings.evaluator(),
            breakpoints,
            lift: OnceCell::new(),
            shear: OnceCell::new(),
            moment: OnceCell::new(),
            rotation: OnceCell::new(),
            deflection: OnceCell::new(),
            torsion: OnceCell::new(),
            twist: OnceCell::new(),
            panel_stress: OnceCell::new(),
        })
    }

    pub fn from_case(case: &'a CaseFile) -> WingBoxResult<Self> {
        Analysis::new(&case.load_case, &case.settings, &case.tables)
    }

    pub fn context(&self) -> StageContext<'_> {
        StageContext {
            load_case: self.load_case,
            settings: self.settings,
            tables: self.tables,
            evaluator: self.evaluator,
            breakpoints: &self.breakpoints,
        }
    }

    pub fn load_case(&self) -> &LoadCase {
        self.load_case
    }

    fn stage<F>(&self, cell: &OnceCell<Arc<Curve>>, name: &str, f: F) -> WingBoxResult<Arc<Curve>>
    where
        F: Fn(f64) -> WingBoxResult<f64> + Sync,
    {
        cell.get_or_try_init(|| {
            log::info!("Stage {name}: start");
            let curve = self.evaluator.curve(self.load_case.grid(), f, Interpolation::Cubic)?;
            let (y, peak) = curve.peak_magnitude();
            log::info!("Stage {name}: done (peak {peak:.4e} at y = {y:.2} m)");
            Ok(Arc::new(curve))
        })
        .cloned()
    }

    /// Ixx and J curves, cached on the wing box
    pub fn inertia(&self) -> WingBoxResult<&'a InertiaCurves> {
        inertia::inertia_curves(self.load_case.wing().wing_box(), self.load_case.grid(), &self.evaluator)
    }

    pub fn lift(&self) -> WingBoxResult<Arc<Curve>> {
        let ctx = self.context();
        self.stage(&self.lift, names::LIFT, |y| Ok(loads::lift_at(&ctx, y)))
    }

    pub fn shear(&self) -> WingBoxResult<Arc<Curve>> {
        let ctx = self.context();
        self.stage(&self.shear, names::SHEAR, |y| loads::shear_at(&ctx, y))
    }

    pub fn moment(&self) -> WingBoxResult<Arc<Curve>> {
        let shear = self.shear()?;
        let ctx = self.context();
        self.stage(&self.moment, names::MOMENT, |y| loads::moment_at(&ctx, &shear, y))
    }

    pub fn rotation(&self) -> WingBoxResult<Arc<Curve>> {
        let inertia = self.inertia()?;
        let moment = self.moment()?;
        let ctx = self.context();
        self.stage(&self.rotation, names::ROTATION, |y| {
            deflection::rotation_at(&ctx, &moment, inertia, y)
        })
    }

    pub fn deflection(&self) -> WingBoxResult<Arc<Curve>> {
        let rotation = self.rotation()?;
        let ctx = self.context();
        self.stage(&self.deflection, names::DEFLECTION, |y| {
            deflection::deflection_at(&ctx, &rotation, y)
        })
    }

    pub fn torsion(&self) -> WingBoxResult<Arc<Curve>> {
        let ctx = self.context();
        self.stage(&self.torsion, names::TORSION, |y| loads::torsion_at(&ctx, y))
    }

    pub fn twist(&self) -> WingBoxResult<Arc<Curve>> {
        let inertia = self.inertia()?;
        let torsion = self.torsion()?;
        let ctx = self.context();
        self.stage(&self.twist, names::TWIST, |y| deflection::twist_at(&ctx, &torsion, inertia, y))
    }

    /// Top and bottom skin stress curves
    pub fn panel_stress(&self) -> WingBoxResult<&PanelStress> {
        self.inertia()?;
        let moment = self.moment()?;
        self.panel_stress.get_or_try_init(|| {
            log::info!("Stage panel stress: start");
            let wing_box = self.load_case.wing().wing_box();
            let grid = self.load_case.grid();
            let surface_curve = |surface: Surface| -> WingBoxResult<Arc<Curve>> {
                let curve = self.evaluator.curve(
                    grid,
                    |y| stress::panel_stress_at(wing_box, &moment, surface, y),
                    Interpolation::Cubic,
                )?;
                Ok(Arc::new(curve))
            };
            let stress = PanelStress {
                top: surface_curve(Surface::Top)?,
                bottom: surface_curve(Surface::Bottom)?,
            };
            log::info!("Stage panel stress: done");
            Ok(stress)
        })
    }

    /// Box structure weight including the skin/rib allowance [N]
    pub fn structure_weight(&self) -> WingBoxResult<f64> {
        loads::structure_weight(&self.context())
    }

    pub fn deflection_check(&self) -> WingBoxResult<StiffnessCheck> {
        let curve = self.deflection()?;
        let end_y = self.load_case.wing().wing_box().end_y();
        Ok(deflection::deflection_check(&curve, end_y, self.load_case.limits().deflection_percent))
    }

    pub fn twist_check(&self) -> WingBoxResult<StiffnessCheck> {
        let curve = self.twist()?;
        let end_y = self.load_case.wing().wing_box().end_y();
        Ok(deflection::twist_check(&curve, end_y, self.load_case.limits().twist_deg))
    }

    /// Yield check of both skins, top first
    pub fn yield_checks(&self) -> WingBoxResult<[YieldCheck; 2]> {
        let stress = self.panel_stress()?;
        let yield_stress = self.load_case.wing().wing_box().material().yield_stress;
        Ok(Surface::BOTH.map(|surface| YieldCheck::evaluate(surface, stress.surface(surface), yield_stress)))
    }

    pub fn web_buckling(&self) -> WingBoxResult<MarginTable> {
        self.inertia()?;
        let shear = self.shear()?;
        let torsion = self.torsion()?;
        log::info!("Stage {}: start", buckling::WEB_CHECK);
        let table = buckling::web_buckling(&self.context(), &shear, &torsion)?;
        table.log();
        Ok(table)
    }

    pub fn skin_buckling(&self) -> WingBoxResult<MarginTable> {
        let stress = self.panel_stress()?;
        log::info!("Stage {}: start", buckling::SKIN_CHECK);
        let table = buckling::skin_buckling(&self.context(), stress)?;
        table.log();
        Ok(table)
    }

    pub fn column_buckling(&self) -> WingBoxResult<MarginTable> {
        self.inertia()?;
        let moment = self.moment()?;
        log::info!("Stage {}: start", buckling::COLUMN_CHECK);
        let table = buckling::column_buckling(&self.context(), &moment)?;
        table.log();
        Ok(table)
    }

    /// Run every stage selected by `settings.analyses` and collect the report
    pub fn run(&self) -> WingBoxResult<AnalysisReport> {
        let scope = self.settings.analyses;
        let wing = self.load_case.wing();
        log::info!(
            "Analysis '{}': {} span positions, {} workers, scope {:?}",
            self.load_case.name(),
            self.load_case.grid().len(),
            self.evaluator.workers(),
            scope
        );

        let mut report = AnalysisReport::new(
            ReportMetadata {
                version: SCHEMA_VERSION.to_string(),
                case_name: self.load_case.name().to_string(),
                generated: Utc::now(),
                workers: self.evaluator.workers(),
                grid_points: self.load_case.grid().len(),
                step: self.load_case.step(),
            },
            TrimSummary {
                blend: wing.blend(),
                aoa_deg: wing.aoa().to_degrees(),
                dynamic_pressure: self.load_case.dynamic_pressure(),
            },
        );
        report.structure_weight = self.structure_weight()?;
        log::info!("Wing box structure weight {:.1} N", report.structure_weight);
        report.add_curve(names::LIFT, &*self.lift()?);

        let bending = scope.includes_deflection() || scope.includes_stress();
        let torsional = scope.includes_twist() || scope.includes_stress();
        let inertia = self.inertia()?;
        if bending {
            report.add_curve(names::MOI_XX, &*inertia.moi_xx);
            report.add_curve(names::SHEAR, &*self.shear()?);
            report.add_curve(names::MOMENT, &*self.moment()?);
        }
        if torsional {
            report.add_curve(names::MOI_POLAR, &*inertia.moi_polar);
            report.add_curve(names::TORSION, &*self.torsion()?);
        }
        if scope.includes_deflection() {
            report.add_curve(names::ROTATION, &*self.rotation()?);
            report.add_curve(names::DEFLECTION, &*self.deflection()?);
            report.deflection = Some(self.deflection_check()?);
        }
        if scope.includes_twist() {
            report.add_curve(names::TWIST, &*self.twist()?);
            report.twist = Some(self.twist_check()?);
        }
        if scope.includes_stress() {
            let stress = self.panel_stress()?;
            report.add_curve(names::TOP_PANEL_STRESS, &*stress.top);
            report.add_curve(names::BOTTOM_PANEL_STRESS, &*stress.bottom);
            report.panel_stress = self.yield_checks()?.to_vec();
            report.margins.push(self.web_buckling()?);
            report.margins.push(self.skin_buckling()?);
            report.margins.push(self.column_buckling()?);
        }

        if report.passed() {
            log::info!("All checks passed");
        } else {
            for check in report.checks().iter().filter(|c| !c.passed) {
                log::warn!("Check failed: {} ({})", check.name, check.detail);
            }
        }
        Ok(report)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Small uniform wing used by the stage tests: a 10 m box of constant
    //! 1.0 × 0.2 m section in two 5 m sections, chord 2 m, lift set per metre.

    use super::*;
    use crate::geometry::{WingBoxSection, WingBoxSpec};
    use crate::loads::{AeroPolar, FlightCondition, Limits, WingSpec};
    use crate::materials::Material;

    /// Dynamic pressure of the fixture flight condition (V = 10 m/s, ρ = 1)
    pub const Q: f64 = 50.0;
    pub const CHORD: f64 = 2.0;

    fn flat(v: f64) -> Curve {
        Curve::constant(v, 0.0, 10.0).unwrap()
    }

    fn polar(cl: f64, total_cl: f64) -> AeroPolar {
        AeroPolar {
            cl: flat(cl),
            cd: flat(0.01),
            cm: flat(-0.05),
            xcp: flat(0.3),
            total_cl,
        }
    }

    fn sections() -> Vec<WingBoxSection> {
        vec![
            WingBoxSection::uniform(0.0, 5.0, 0.005, 0.004),
            WingBoxSection::uniform(5.0, 10.0, 0.005, 0.004),
        ]
    }

    fn wing_box(sections: Vec<WingBoxSection>, material: Material) -> WingBox {
        let mut spec = WingBoxSpec::new("fixture", 0.0, 10.0, material);
        spec.sections = sections;
        WingBox::new(spec).unwrap()
    }

    /// Wing description with uniform lift `lift_per_m` [N/m] at blend 0
    pub fn wing_spec(lift_per_m: f64, wing_box: WingBox) -> WingSpec {
        let cl = lift_per_m / (Q * CHORD);
        WingSpec {
            name: "fixture".into(),
            surface_area: 20.0,
            chord: flat(CHORD),
            polar_0: polar(cl, 0.2),
            polar_10: polar(cl + 0.8, 1.0),
            blend: 0.0,
            aoa: 0.0,
            wing_box,
            engine: None,
            fuel_tank: None,
        }
    }

    fn flight() -> FlightCondition {
        FlightCondition {
            load_factor: 1.0,
            velocity: 10.0,
            air_density: 1.0,
            aircraft_weight: 1000.0,
        }
    }

    fn load_case(spec: WingSpec) -> LoadCase {
        LoadCase::new("fixture", Wing::new(spec).unwrap(), flight(), 0.5, Limits::default()).unwrap()
    }

    /// Load case over the fixture box with `modify` applied to the wing description
    pub fn uniform_case(modify: impl FnOnce(&mut WingSpec), lift_per_m: f64) -> LoadCase {
        let mut spec = wing_spec(lift_per_m, wing_box(sections(), Material::default()));
        modify(&mut spec);
        load_case(spec)
    }

    /// Owned inputs of a [`StageContext`]
    pub struct StageFixture {
        pub load_case: LoadCase,
        pub settings: AnalysisSettings,
        pub tables: BucklingTables,
        pub breakpoints: Vec<f64>,
    }

    impl StageFixture {
        fn from_case(load_case: LoadCase) -> Self {
            let breakpoints = loads::breakpoints(&load_case);
            StageFixture {
                load_case,
                settings: AnalysisSettings {
                    workers: Some(2),
                    ..AnalysisSettings::default()
                },
                tables: BucklingTables::standard(),
                breakpoints,
            }
        }

        /// Fixture with real material weight
        pub fn with(lift_per_m: f64, modify: impl FnOnce(&mut WingSpec)) -> Self {
            StageFixture::from_case(uniform_case(modify, lift_per_m))
        }

        /// Fixture whose structure weighs (numerically) nothing
        pub fn weightless_with(lift_per_m: f64, modify: impl FnOnce(&mut WingSpec)) -> Self {
            let material = Material {
                density: f64::MIN_POSITIVE,
                ..Material::default()
            };
            let mut spec = wing_spec(lift_per_m, wing_box(sections(), material));
            modify(&mut spec);
            StageFixture::from_case(load_case(spec))
        }

        pub fn weightless(lift_per_m: f64) -> Self {
            StageFixture::weightless_with(lift_per_m, |_| {})
        }

        /// Weightless fixture with custom sections and 1 kN/m lift
        pub fn with_sections(sections: Vec<WingBoxSection>) -> Self {
            let material = Material {
                density: f64::MIN_POSITIVE,
                ..Material::default()
            };
            StageFixture::from_case(load_case(wing_spec(1000.0, wing_box(sections, material))))
        }

        /// Weightless fixture whose box starts outboard at `start_y`, 1 kN/m lift
        pub fn outboard_box(start_y: f64) -> Self {
            let material = Material {
                density: f64::MIN_POSITIVE,
                ..Material::default()
            };
            let spec = WingBoxSpec::new("fixture", start_y, 10.0, material)
                .with_section(WingBoxSection::uniform(start_y, 10.0, 0.005, 0.004));
            StageFixture::from_case(load_case(wing_spec(1000.0, WingBox::new(spec).unwrap())))
        }

        pub fn context(&self) -> StageContext<'_> {
            StageContext {
                load_case: &self.load_case,
                settings: &self.settings,
                tables: &self.tables,
                evaluator: self.settings.evaluator(),
                breakpoints: &self.breakpoints,
            }
        }
    }
}
