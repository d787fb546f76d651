use std::path::PathBuf;

use approx::assert_relative_eq;

use orbsim::{load_scenario, ScenarioConfig, Simulator};
use orbsim::{Body, EnergyReport, Engine, NVec2, Parameters, G};
use orbsim::{CheckpointConfig, ConfigError, SimulationError, UpdateOrderConfig};

const MARS_M: f64 = 6.4171e23;
const PHOBOS_M: f64 = 1.0659e16;

fn mars() -> Body {
    Body::new("Mars", MARS_M, NVec2::new(0.0, 0.0), NVec2::new(0.0, 0.0))
}

fn phobos() -> Body {
    Body::new("Phobos", PHOBOS_M, NVec2::new(9234000.0, 0.0), NVec2::new(0.0, 2138.0))
}

/// Two equal, heavy masses one metre apart, at rest
fn close_pair() -> [Body; 2] {
    [
        Body::new("A", 1.0e10, NVec2::new(0.0, 0.0), NVec2::zeros()),
        Body::new("B", 1.0e10, NVec2::new(1.0, 0.0), NVec2::zeros()),
    ]
}

fn simulator(iteration_count: u64, time_step: f64, engine: Engine) -> Simulator {
    Simulator::new(engine, Parameters { iteration_count, time_step }, [mars(), phobos()]).unwrap()
}

/// Run to completion and collect every energy report
fn run_reports(sim: &mut Simulator) -> Vec<EnergyReport> {
    let mut reports: Vec<EnergyReport> = Vec::new();
    sim.run(&mut reports).unwrap();
    reports
}

fn elapsed_times(reports: &[EnergyReport]) -> Vec<f64> {
    reports.iter().map(|r| r.elapsed_time).collect()
}

// ==================================================================================
// Body update tests
// ==================================================================================

#[test]
fn body_update_matches_closed_form() {
    let mut a = Body::new("A", 2.0e12, NVec2::new(1.0, 2.0), NVec2::new(0.5, -0.25));
    let b = Body::new("B", 3.0e12, NVec2::new(4.0, 6.0), NVec2::new(9.0, 9.0));
    let dt = 0.1;

    let dir = b.x - a.x; // (3, 4), |dir| = 5
    let acc = G * b.m * dir / 125.0;
    let v = a.v + acc * dt;
    let x = a.x + v * dt;

    a.update(&b, dt).unwrap();

    assert_relative_eq!(a.v.x, v.x, max_relative = 1e-12);
    assert_relative_eq!(a.v.y, v.y, max_relative = 1e-12);
    assert_relative_eq!(a.x.x, x.x, max_relative = 1e-12);
    assert_relative_eq!(a.x.y, x.y, max_relative = 1e-12);
}

#[test]
fn body_update_leaves_other_untouched() {
    let [mut a, b] = close_pair();
    let before = b.clone();
    a.update(&b, 0.01).unwrap();
    assert_eq!(b, before);
    assert_eq!(a.m, 1.0e10);
}

#[test]
fn gravity_points_toward_other_body() {
    let [mut a, b] = close_pair();
    a.update(&b, 0.01).unwrap();
    assert!(a.v.x > 0.0, "velocity does not point toward the other body");
    assert_eq!(a.v.y, 0.0);
}

#[test]
fn update_order_changes_trajectory() {
    let [mut a, mut b] = close_pair();
    a.update(&b, 0.01).unwrap();
    b.update(&a, 0.01).unwrap();

    let [mut a_rev, mut b_rev] = close_pair();
    b_rev.update(&a_rev, 0.01).unwrap();
    a_rev.update(&b_rev, 0.01).unwrap();

    assert_ne!(a.x, a_rev.x);
    assert_ne!(b.x, b_rev.x);
}

#[test]
fn coincident_bodies_fail_with_singularity() {
    let mut a = Body::new("A", 1.0, NVec2::new(3.0, 3.0), NVec2::zeros());
    let b = Body::new("B", 1.0, NVec2::new(3.0, 3.0), NVec2::zeros());
    let err = a.update(&b, 1.0).unwrap_err();
    assert_eq!(err, SimulationError::Singularity { body: "A".into(), other: "B".into() });
    // state untouched on failure
    assert_eq!(a.x, NVec2::new(3.0, 3.0));
}

#[test]
fn overflowing_state_is_flagged() {
    let mut a = Body::new("A", 1.0, NVec2::new(0.0, 0.0), NVec2::zeros());
    let b = Body::new("B", 1.0e308, NVec2::new(1.0e-100, 0.0), NVec2::zeros());
    let err = a.update(&b, 1.0).unwrap_err();
    assert_eq!(err, SimulationError::NonFinite { body: "A".into() });
    // state untouched on failure
    assert_eq!(a.x, NVec2::zeros());
    assert_eq!(a.v, NVec2::zeros());
}

#[test]
fn kinetic_energy_of_body() {
    let b = phobos();
    assert_relative_eq!(b.kinetic_energy(), 0.5 * PHOBOS_M * 2138.0 * 2138.0, max_relative = 1e-15);
    assert_eq!(mars().kinetic_energy(), 0.0);
}

// ==================================================================================
// Simulator stepping tests
// ==================================================================================

#[test]
fn mars_phobos_single_step_matches_manual_computation() {
    let mut sim = simulator(1, 10.0, Engine::default());
    let mut reports: Vec<EnergyReport> = Vec::new();
    let positions = sim.step(&mut reports).unwrap();

    let dt = 10.0;

    // Mars goes first, pulled by Phobos at its initial position
    let r_m = phobos().x - mars().x;
    let v_m = G * PHOBOS_M * r_m / r_m.norm().powi(3) * dt;
    let x_m = mars().x + v_m * dt;

    // Phobos second, pulled by the already moved Mars
    let r_p = x_m - phobos().x;
    let v_p = phobos().v + G * MARS_M * r_p / r_p.norm().powi(3) * dt;
    let x_p = phobos().x + v_p * dt;

    let [m, p] = sim.bodies();
    assert_relative_eq!(m.x.x, x_m.x, max_relative = 1e-6);
    assert_relative_eq!(p.x.x, x_p.x, max_relative = 1e-6);
    assert_relative_eq!(p.x.y, x_p.y, max_relative = 1e-6);
    assert_relative_eq!(p.v.x, v_p.x, max_relative = 1e-6);
    assert_relative_eq!(p.v.y, v_p.y, max_relative = 1e-6);
    assert_eq!(positions, [m.x, p.x]);

    assert_eq!(sim.tick(), 1);
    assert_eq!(sim.elapsed_time(), 10.0);
    assert!(sim.is_finished());
}

#[test]
fn snapshot_order_keeps_momentum_balanced() {
    let engine = Engine { update_order: UpdateOrderConfig::Snapshot, ..Engine::default() };
    let mut sim = Simulator::new(engine, Parameters { iteration_count: 20, time_step: 0.01 }, close_pair()).unwrap();
    run_reports(&mut sim);

    let [a, b] = sim.bodies();
    let p = a.m * a.v + b.m * b.v;
    assert!(p.norm() <= 1e-12 * (a.m * a.v.norm()), "net momentum {:?}", p);
}

#[test]
fn sequential_order_breaks_momentum_balance() {
    let mut sim = Simulator::new(Engine::default(), Parameters { iteration_count: 20, time_step: 0.01 }, close_pair()).unwrap();
    run_reports(&mut sim);

    let [a, b] = sim.bodies();
    let p = a.m * a.v + b.m * b.v;
    assert!(p.norm() > 0.0);
}

#[test]
fn coincident_bodies_fail_first_step() {
    let bodies = [
        Body::new("A", 1.0, NVec2::new(5.0, 5.0), NVec2::zeros()),
        Body::new("B", 2.0, NVec2::new(5.0, 5.0), NVec2::new(1.0, 0.0)),
    ];
    let mut sim = Simulator::new(Engine::default(), Parameters { iteration_count: 3, time_step: 1.0 }, bodies).unwrap();
    let mut reports: Vec<EnergyReport> = Vec::new();

    let err = sim.step(&mut reports).unwrap_err();
    assert!(matches!(err, SimulationError::Singularity { .. }));
    assert_eq!(sim.tick(), 0);
    assert_eq!(sim.elapsed_time(), 0.0);
}

#[test]
fn failed_tick_leaves_both_bodies_and_clock_untouched() {
    // the heavy body moves first without trouble, the light one then overflows
    let bodies = [
        Body::new("A", 1.0e308, NVec2::new(0.0, 0.0), NVec2::zeros()),
        Body::new("B", 1.0, NVec2::new(1.0e-100, 0.0), NVec2::zeros()),
    ];
    let initial = bodies.clone();
    let mut sim = Simulator::new(Engine::default(), Parameters { iteration_count: 3, time_step: 1.0e-150 }, bodies).unwrap();
    let mut reports: Vec<EnergyReport> = Vec::new();

    let err = sim.step(&mut reports).unwrap_err();
    assert_eq!(err, SimulationError::NonFinite { body: "B".into() });
    assert_eq!(sim.bodies(), &initial);
    assert_eq!(sim.tick(), 0);
    assert_eq!(sim.elapsed_time(), 0.0);
}

#[test]
fn simulator_rejects_invalid_parameters_and_bodies() {
    let params = |iteration_count, time_step| Parameters { iteration_count, time_step };
    let new = |p, bodies| Simulator::new(Engine::default(), p, bodies);

    assert!(matches!(new(params(0, 10.0), [mars(), phobos()]), Err(ConfigError::NonPositive { .. })));
    assert!(matches!(new(params(5, 0.0), [mars(), phobos()]), Err(ConfigError::NonPositive { .. })));
    assert!(matches!(new(params(5, -1.0), [mars(), phobos()]), Err(ConfigError::NonPositive { .. })));
    assert!(matches!(new(params(5, f64::INFINITY), [mars(), phobos()]), Err(ConfigError::NonPositive { .. })));

    let mut massless = phobos();
    massless.m = 0.0;
    assert!(matches!(new(params(5, 10.0), [mars(), massless]), Err(ConfigError::NonPositive { .. })));

    let mut lost = phobos();
    lost.v.y = f64::NAN;
    assert!(matches!(new(params(5, 10.0), [mars(), lost]), Err(ConfigError::NonFinite { .. })));
}

#[test]
fn step_after_last_tick_is_rejected() {
    let mut sim = simulator(2, 10.0, Engine::default());
    let mut reports: Vec<EnergyReport> = Vec::new();
    sim.step(&mut reports).unwrap();
    sim.step(&mut reports).unwrap();
    assert_eq!(sim.step(&mut reports).unwrap_err(), SimulationError::Exhausted(2));
}

#[test]
fn run_consumes_every_tick() {
    let mut sim = simulator(100, 10.0, Engine::default());
    run_reports(&mut sim);
    assert_eq!(sim.tick(), 100);
    assert_relative_eq!(sim.elapsed_time(), 1000.0, max_relative = 1e-12);
    assert_relative_eq!(sim.progress(), 1.0, max_relative = 1e-12);
}

// ==================================================================================
// Kinetic energy reporting tests
// ==================================================================================

#[test]
fn first_report_uses_initial_velocities() {
    let mut sim = simulator(4, 1.0, Engine::default());
    let expected = 0.5 * (MARS_M * 0.0 + PHOBOS_M * 2138.0 * 2138.0);
    let reports = run_reports(&mut sim);

    assert_eq!(reports[0].progress, 0.0);
    assert_eq!(reports[0].tick, 0);
    assert_relative_eq!(reports[0].kinetic_energy, expected, max_relative = 1e-15);
}

#[test]
fn four_unit_ticks_report_at_every_checkpoint() {
    let mut sim = simulator(4, 1.0, Engine::default());
    let reports = run_reports(&mut sim);

    assert_eq!(reports.len(), 5);
    assert_eq!(elapsed_times(&reports), vec![0.0, 1.0, 2.0, 3.0, 4.0]);
    let progress: Vec<f64> = reports.iter().map(|r| r.progress).collect();
    assert_eq!(progress, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
}

#[test]
fn exact_checkpoints_miss_quarters_that_fall_between_ticks() {
    // total 30 s: 7.5 s and 22.5 s are never reached at 3 s per tick
    let mut sim = simulator(10, 3.0, Engine::default());
    let reports = run_reports(&mut sim);

    assert!(reports.len() < 5);
    assert_eq!(elapsed_times(&reports), vec![0.0, 15.0, 30.0]);
}

#[test]
fn tick_schedule_reports_all_five_checkpoints() {
    let engine = Engine { checkpoints: CheckpointConfig::Ticks, ..Engine::default() };
    let mut sim = simulator(10, 3.0, engine);
    let reports = run_reports(&mut sim);

    let ticks: Vec<u64> = reports.iter().map(|r| r.tick).collect();
    assert_eq!(ticks, vec![0, 3, 5, 8, 10]);
    assert_eq!(elapsed_times(&reports), vec![0.0, 9.0, 15.0, 24.0, 30.0]);
}

#[test]
fn reports_track_the_current_kinetic_energy() {
    let mut sim = simulator(4, 10.0, Engine::default());
    let mut reports: Vec<EnergyReport> = Vec::new();
    for _ in 0..4 {
        sim.step(&mut reports).unwrap();
        assert_eq!(reports.last().unwrap().kinetic_energy, sim.total_kinetic_energy());
    }
    assert_eq!(reports.len(), 5);
}

#[test]
fn report_message_names_joules() {
    let mut sim = simulator(1, 10.0, Engine::default());
    let reports = run_reports(&mut sim);
    let msg = reports[0].to_string();
    assert!(msg.starts_with("Total KE: "));
    assert!(msg.ends_with(" J"));
}

// ==================================================================================
// Loading tests
// ==================================================================================

fn scenario_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(name)
}

#[test]
fn bundled_scenarios_load() {
    let txt = load_scenario(&scenario_path("mars_phobos.txt")).unwrap();
    let yaml = load_scenario(&scenario_path("mars_phobos.yaml")).unwrap();

    assert_eq!(txt.bodies[0].name, "Mars");
    assert_eq!(txt.bodies[1].m, yaml.bodies[1].m);
    assert_eq!(yaml.engine.checkpoints, CheckpointConfig::Ticks);
    assert!(Simulator::from_config(&txt).is_ok());
}

#[test]
fn malformed_file_fails_before_any_step() {
    let path = std::env::temp_dir().join(format!("orbsim-malformed-{}.txt", std::process::id()));
    std::fs::write(&path, "1;10\nMars;6.4171e23;0;0\nPhobos;1.0659e16;9234000;0;0;2138\n").unwrap();

    let result = load_scenario(&path);
    std::fs::remove_file(&path).unwrap();

    assert!(matches!(result, Err(ConfigError::FieldCount { found: 4, .. })));
}

#[test]
fn missing_file_is_an_io_error() {
    assert!(matches!(load_scenario(&scenario_path("no_such_scenario.txt")), Err(ConfigError::Io(_))));
}

#[test]
fn simulator_from_text_scenario() {
    let cfg = ScenarioConfig::from_text("1;10\nMars;6.4171e23;0;0;0;0\nPhobos;1.0659e16;9234000;0;0;2138").unwrap();
    let from_cfg = Simulator::from_config(&cfg).unwrap();
    assert_eq!(from_cfg.bodies(), &[mars(), phobos()]);
    assert_eq!(from_cfg.parameters(), Parameters { iteration_count: 1, time_step: 10.0 });
}

// ==================================================================================
// Benchmark tests
// ==================================================================================

#[test]
fn bench_runs_both_update_orders_from_the_same_start() {
    let sim = simulator(50, 10.0, Engine::default());
    let results = orbsim::bench_update_orders(&sim).unwrap();

    let orders: Vec<UpdateOrderConfig> = results.iter().map(|r| r.update_order).collect();
    assert_eq!(orders, vec![UpdateOrderConfig::Sequential, UpdateOrderConfig::Snapshot]);
    assert!(results.iter().all(|r| r.steps_per_second > 0.0 && r.relative_ke_change.is_finite()));
    // the input simulator is left untouched
    assert_eq!(sim.tick(), 0);
}
