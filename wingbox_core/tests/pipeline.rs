//! End-to-end checks of the load pipeline through the public API.

use std::sync::Arc;

use approx::assert_relative_eq;
use wingbox_core::analysis::{deflection, StageContext, YieldCheck};
use wingbox_core::coefficients::BucklingTables;
use wingbox_core::geometry::{
    partition_plates, InertiaCurves, StringerSet, StringerType, Surface, WingBox, WingBoxSection, WingBoxSpec,
};
use wingbox_core::loads::{AeroPolar, Engine, FlightCondition, FuelTank, Limits, LoadCase, Wing, WingSpec};
use wingbox_core::materials::Material;
use wingbox_core::numerics::{Curve, Interpolation};
use wingbox_core::{file_io, Analysis, AnalysisReport, AnalysisSettings, CaseFile};

const SPAN: f64 = 10.0;
const CHORD: f64 = 2.0;
/// V = 10 m/s, ρ = 1 kg/m³
const Q: f64 = 50.0;

fn flat(v: f64) -> Curve {
    Curve::constant(v, 0.0, SPAN).unwrap()
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

fn weightless() -> Material {
    Material {
        density: f64::MIN_POSITIVE,
        ..Material::default()
    }
}

fn single_section_box(material: Material) -> WingBox {
    WingBox::new(
        WingBoxSpec::new("uniform", 0.0, SPAN, material).with_section(WingBoxSection::uniform(0.0, SPAN, 0.005, 0.004)),
    )
    .unwrap()
}

/// Untrimmed wing carrying `lift_per_m` uniformly
fn wing(lift_per_m: f64, wing_box: WingBox, engine: Option<Engine>, fuel_tank: Option<FuelTank>) -> Wing {
    let cl = lift_per_m / (Q * CHORD);
    Wing::new(WingSpec {
        name: "uniform".into(),
        surface_area: 20.0,
        chord: flat(CHORD),
        polar_0: polar(cl, 0.2),
        polar_10: polar(cl + 0.8, 1.0),
        blend: 0.0,
        aoa: 0.0,
        wing_box,
        engine,
        fuel_tank,
    })
    .unwrap()
}

fn load_case(wing: Wing) -> LoadCase {
    let flight = FlightCondition {
        load_factor: 1.0,
        velocity: 10.0,
        air_density: 1.0,
        aircraft_weight: 1000.0,
    };
    LoadCase::new("uniform", wing, flight, 0.5, Limits::default()).unwrap()
}

fn settings() -> AnalysisSettings {
    AnalysisSettings {
        workers: Some(3),
        ..AnalysisSettings::default()
    }
}

#[test]
fn uniform_lift_gives_closed_form_root_loads() {
    let case = load_case(wing(1000.0, single_section_box(weightless()), None, None));
    let settings = settings();
    let tables = BucklingTables::standard();
    let analysis = Analysis::new(&case, &settings, &tables).unwrap();

    let shear = analysis.shear().unwrap();
    let moment = analysis.moment().unwrap();
    assert_relative_eq!(shear.at(0.0), 1000.0 * SPAN, max_relative = 1e-9);
    assert_relative_eq!(moment.at(0.0), 1000.0 * SPAN * SPAN / 2.0, max_relative = 1e-6);
    assert!(shear.at(SPAN).abs() < 1e-6);
}

#[test]
fn constant_moment_reproduces_quadratic_deflection() {
    let case = load_case(wing(0.0, single_section_box(Material::default()), None, None));
    let settings = settings();
    let tables = BucklingTables::standard();
    let breakpoints = Vec::new();
    let ctx = StageContext {
        load_case: &case,
        settings: &settings,
        tables: &tables,
        evaluator: settings.evaluator(),
        breakpoints: &breakpoints,
    };

    let (m, i) = (2.0e5, 1.0e-3);
    let e = Material::default().e_modulus;
    let moment = flat(m);
    let inertia = InertiaCurves {
        moi_xx: Arc::new(flat(i)),
        moi_polar: Arc::new(flat(i)),
    };

    let rotation = ctx
        .evaluator
        .curve(case.grid(), |y| deflection::rotation_at(&ctx, &moment, &inertia, y), Interpolation::Cubic)
        .unwrap();
    for y in [1.0, 4.5, SPAN] {
        let expected = m * y * y / (2.0 * e * i);
        let got = deflection::deflection_at(&ctx, &rotation, y).unwrap();
        assert_relative_eq!(got, expected, max_relative = 1e-6);
    }
}

#[test]
fn yield_margin_of_two_passes_and_half_fails() {
    let stress = Curve::linear(&[0.0, SPAN], &[-100e6, 0.0]).unwrap();
    let ok = YieldCheck::evaluate(Surface::Top, &stress, 200e6);
    assert_relative_eq!(ok.margin, 2.0, max_relative = 1e-12);
    assert!(ok.passed);

    let failed = YieldCheck::evaluate(Surface::Top, &stress, 50e6);
    assert_relative_eq!(failed.margin, 0.5, max_relative = 1e-12);
    assert!(!failed.passed);
}

#[test]
fn boundary_position_belongs_to_following_section() {
    let wing_box = WingBox::new(
        WingBoxSpec::new("split", 0.0, SPAN, Material::default())
            .with_section(WingBoxSection::uniform(0.0, 4.0, 0.005, 0.004))
            .with_section(WingBoxSection::uniform(4.0, SPAN, 0.004, 0.003)),
    )
    .unwrap();

    assert_eq!(wing_box.active_section(4.0).unwrap().index(), 1);
    assert_eq!(wing_box.active_section(3.999).unwrap().index(), 0);
    assert_eq!(wing_box.active_section(SPAN).unwrap().index(), 1);
    assert!(wing_box.active_section(SPAN + 0.1).is_err());
}

#[test]
fn sections_must_tile_the_box() {
    let gap = WingBoxSpec::new("gap", 0.0, SPAN, Material::default())
        .with_section(WingBoxSection::uniform(0.0, 4.0, 0.005, 0.004))
        .with_section(WingBoxSection::uniform(4.5, SPAN, 0.005, 0.004));
    assert!(WingBox::new(gap).is_err());

    let short = WingBoxSpec::new("short", 0.0, SPAN, Material::default())
        .with_section(WingBoxSection::uniform(0.0, 9.0, 0.005, 0.004));
    assert!(WingBox::new(short).is_err());
}

#[test]
fn four_stringer_stations_cut_three_plates_per_surface() {
    let at = |x: f64, surface: Surface| StringerSet {
        stringer: StringerType::Tee,
        amount: 1,
        width: 0.02,
        height: 0.02,
        thickness: 0.002,
        start_x: x,
        end_x: x,
        surface,
    };
    let mut section = WingBoxSection::uniform(0.0, SPAN, 0.005, 0.004);
    for x in [0.0, 0.3, 0.7, 1.0] {
        section = section.with_stringers(at(x, Surface::Top)).with_stringers(at(x, Surface::Bottom));
    }

    let plates = partition_plates(&section);
    for surface in Surface::BOTH {
        let widths: Vec<f64> = plates
            .iter()
            .filter(|p| p.surface == surface)
            .map(|p| p.width_fraction())
            .collect();
        assert_eq!(widths.len(), 3);
        assert_relative_eq!(widths[0], 0.3, epsilon = 1e-12);
        assert_relative_eq!(widths[1], 0.4, epsilon = 1e-12);
        assert_relative_eq!(widths[2], 0.3, epsilon = 1e-12);
    }
}

#[test]
fn engine_steps_shear_only_at_its_station() {
    let engine = Engine {
        x: -0.5,
        y: 4.25,
        z: -0.4,
        thrust: 2000.0,
        weight: 3000.0,
    };
    let case = load_case(wing(1000.0, single_section_box(weightless()), Some(engine), None));
    let settings = settings();
    let tables = BucklingTables::standard();
    let analysis = Analysis::new(&case, &settings, &tables).unwrap();

    let shear = analysis.shear().unwrap();
    let torsion = analysis.torsion().unwrap();
    let step = case.step();
    for (pair, values) in case.grid().windows(2).zip(shear.y().windows(2)) {
        let drop = values[0] - values[1];
        if pair[0] < engine.y && engine.y < pair[1] {
            assert_relative_eq!(drop, 1000.0 * step - engine.weight, max_relative = 1e-6);
        } else {
            assert_relative_eq!(drop, 1000.0 * step, max_relative = 1e-6);
        }
    }

    let torque = engine.thrust * engine.z + engine.weight * engine.x;
    let inboard = torsion.y()[8] - torsion.y()[9];
    let outboard = torsion.y()[10] - torsion.y()[11];
    assert_relative_eq!(inboard - outboard, torque, max_relative = 1e-6);
}

#[test]
fn fuel_relieves_shear_inside_the_tank() {
    let dry = load_case(wing(1000.0, single_section_box(weightless()), None, None));
    let wet = load_case(wing(1000.0, single_section_box(weightless()), None, Some(FuelTank::new(2.0, 6.0))));
    let settings = settings();
    let tables = BucklingTables::standard();

    let dry_shear = Analysis::new(&dry, &settings, &tables).unwrap().shear().unwrap();
    let wet_shear = Analysis::new(&wet, &settings, &tables).unwrap().shear().unwrap();

    // Outboard of the tank nothing changes
    assert_relative_eq!(wet_shear.at(7.0), dry_shear.at(7.0), max_relative = 1e-9);
    // Inboard of the tank the full fuel weight is carried
    let area = wet.wing().wing_box().enclosed_area(3.0).unwrap();
    let fuel_weight = area * 4.0 * FuelTank::new(2.0, 6.0).density * settings.gravity;
    assert_relative_eq!(dry_shear.at(1.0) - wet_shear.at(1.0), fuel_weight, max_relative = 1e-6);
}

#[test]
fn sample_case_runs_and_report_survives_save() {
    let case = CaseFile::sample().unwrap();
    let analysis = Analysis::from_case(&case).unwrap();
    let report = analysis.run().unwrap();

    assert_eq!(report.margins.len(), 3);
    assert_eq!(report.panel_stress.len(), 2);
    assert!(report.deflection.is_some());
    assert!(report.twist.is_some());
    assert!(report.structure_weight > 0.0);
    for table in &report.margins {
        assert_eq!(table.rows.len(), case.load_case.wing().wing_box().sections().len());
    }
    // Upward bending compresses the top skin
    let top = report.curve("top_panel_stress").unwrap();
    assert!(top.at(0.0) < 0.0);

    let path = std::env::temp_dir().join(format!("wingbox_report_{}.json", std::process::id()));
    file_io::save_report(&report, &path).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    let back: AnalysisReport = serde_json::from_str(&text).unwrap();
    assert_eq!(back.checks().len(), report.checks().len());
    let _ = std::fs::remove_file(&path);
}

#[test]
fn worker_count_does_not_change_results() {
    let case = CaseFile::sample().unwrap();
    let tables = BucklingTables::standard();
    let one = AnalysisSettings {
        workers: Some(1),
        ..AnalysisSettings::default()
    };
    let many = AnalysisSettings {
        workers: Some(4),
        ..AnalysisSettings::default()
    };

    let a = Analysis::new(&case.load_case, &one, &tables).unwrap().moment().unwrap();
    let b = Analysis::new(&case.load_case, &many, &tables).unwrap().moment().unwrap();
    assert_eq!(a.y(), b.y());
}
