//! End-to-end behaviour of the engine model through its public API.

use approx::assert_abs_diff_eq;

use turbo_sim::engine::{ControlInput, EngineConfig, Shift, SimulationState};
use turbo_sim::physics::{FUEL_CUT_TORQUE, LIMITER_ENGAGE_MARGIN, LIMITER_RELEASE_MARGIN};
use turbo_sim::sim::{self, FixedDraws, FixedTimestep, Simulation, DT, TICK_RATE};

fn full_throttle() -> ControlInput {
    ControlInput::throttle(1.0)
}

fn random_input(rng: &mut fastrand::Rng) -> ControlInput {
    let shift = match rng.u8(0..20) {
        0 => Shift::Up,
        1 => Shift::Down,
        _ => Shift::Hold,
    };
    ControlInput::throttle(rng.f64() * 2.0 - 0.5)
        .with_brake(rng.u8(0..10) == 0)
        .with_shift(shift)
        .with_load(rng.f64() * 1.4 - 0.2)
}

// ---------------------------------------------------------------------------
// Invariants
// ---------------------------------------------------------------------------

#[test]
fn state_stays_in_range_for_any_input_and_timestep() {
    let cfg = EngineConfig::default();

    for (seed, dt) in [(1, DT), (2, 1.0 / 30.0), (3, 0.005), (4, 0.1), (5, 0.5)] {
        let mut inputs = fastrand::Rng::with_seed(seed);
        let mut draws = sim::random::seeded(seed);
        let mut state = SimulationState::idle(&cfg);
        let mut was_limp = false;

        for _ in 0..3000 {
            let input = random_input(&mut inputs);
            let out = sim::step(&mut state, &cfg, &input, dt, &mut draws);

            assert!(state.rpm.is_finite() && state.rpm >= 0.0, "rpm {}", state.rpm);
            assert!((0.0..=cfg.max_boost()).contains(&state.boost), "boost {}", state.boost);
            assert!(state.coolant_temp >= cfg.ambient_temp());
            assert!(state.vehicle_speed.is_finite() && state.vehicle_speed >= 0.0);
            assert!(state.gear <= cfg.gear_count());
            assert!((0.0..=1.0).contains(&out.eff_throttle));
            if state.fuel_cut {
                assert_eq!(state.torque, FUEL_CUT_TORQUE);
            }
            if was_limp {
                assert!(state.limp_mode, "limp mode cleared without reset");
                assert!(out.eff_throttle <= 0.5);
            }
            was_limp = state.limp_mode;
        }
    }
}

#[test]
fn limiter_hysteresis_holds_every_tick() {
    let cfg = EngineConfig::default();
    let engage = cfg.redline() + LIMITER_ENGAGE_MARGIN;
    let release = cfg.redline() - LIMITER_RELEASE_MARGIN;
    let mut sim = Simulation::new(cfg, 0);
    let (mut engaged, mut released) = (0, 0);

    for _ in 0..1200 {
        let before = sim.state().clone();
        let t = sim.apply(&full_throttle());

        match (before.fuel_cut, t.fuel_cut) {
            (false, true) => {
                assert!(before.rpm > engage);
                engaged += 1;
            }
            (true, false) => {
                assert!(before.rpm < release);
                released += 1;
            }
            (false, false) => assert!(before.rpm <= engage),
            (true, true) => assert!(before.rpm >= release),
        }
    }

    assert!(engaged > 1, "limiter engaged {engaged} times");
    assert!(released > 1);
}

#[test]
fn just_over_engage_point_cuts_fuel_immediately() {
    let cfg = EngineConfig::default();
    let mut state = SimulationState::idle(&cfg);
    state.rpm = cfg.redline() + LIMITER_ENGAGE_MARGIN + 1.0;

    sim::step(&mut state, &cfg, &full_throttle(), DT, &mut FixedDraws::constant(0.9));

    assert!(state.fuel_cut);
    assert_eq!(state.torque, FUEL_CUT_TORQUE);
}

#[test]
fn limiter_cuts_for_a_few_ticks_then_releases() {
    let cfg = EngineConfig::default();
    let release = cfg.redline() - LIMITER_RELEASE_MARGIN;
    let mut state = SimulationState::idle(&cfg);
    state.rpm = cfg.redline() + 60.0;
    state.fuel_cut = true;
    let mut draws = FixedDraws::constant(0.9);

    let mut cut_ticks = 0;
    loop {
        let rpm_before = state.rpm;
        sim::step(&mut state, &cfg, &full_throttle(), DT, &mut draws);
        if rpm_before >= release {
            assert!(state.fuel_cut);
            assert_eq!(state.torque, FUEL_CUT_TORQUE);
            cut_ticks += 1;
            assert!(cut_ticks < 100, "limiter never released");
        } else {
            assert!(!state.fuel_cut);
            assert!(state.torque > 0.0);
            break;
        }
    }

    assert!((1..10).contains(&cut_ticks), "cut for {cut_ticks} ticks");
}

// ---------------------------------------------------------------------------
// Neutral rev-up
// ---------------------------------------------------------------------------

#[test]
fn neutral_full_throttle_revs_and_spools() {
    let cfg = EngineConfig::default();
    let mut sim = Simulation::new(cfg.clone(), 0);

    let mut prev_rpm = sim.state().rpm;
    let mut prev_boost = 0.0;
    let mut rising = true;
    for tick in 0..(5 * TICK_RATE) {
        let t = sim.apply(&full_throttle());
        assert!(t.boost <= cfg.max_boost());

        // rpm climbs until the limiter first bites
        if rising && !t.fuel_cut {
            assert!(t.rpm > prev_rpm, "rpm fell at tick {tick}");
        } else {
            rising = false;
        }
        assert!(t.boost >= prev_boost - 1e-12, "boost fell at tick {tick}");
        prev_rpm = t.rpm;
        prev_boost = t.boost;
    }

    let t = sim.telemetry();
    assert_abs_diff_eq!(t.boost, cfg.max_boost(), epsilon = 1e-9);
    assert!(t.rpm > cfg.redline() - LIMITER_RELEASE_MARGIN - 500.0);
    assert!(!t.limp_mode);
    assert_eq!(t.speed, 0.0);
}

// ---------------------------------------------------------------------------
// Limp mode
// ---------------------------------------------------------------------------

#[test]
fn overheat_latches_limp_until_reset() {
    let cfg = EngineConfig::builder().heat_coefficient(0.3).build().unwrap();
    let mut sim = Simulation::new(cfg.clone(), 5);

    let mut ticks = 0;
    while !sim.state().limp_mode {
        sim.apply(&full_throttle());
        ticks += 1;
        assert!(ticks < 2400, "never overheated");
    }
    assert!(sim.state().coolant_temp > cfg.coolant_max());

    let t = sim.apply(&full_throttle());
    assert_eq!(t.throttle, 1.0);
    assert_eq!(t.eff_throttle, 0.5);

    // Cool well below the limit; the latch holds.
    for _ in 0..2000 {
        sim.apply(&ControlInput::throttle(0.0));
    }
    assert!(sim.state().coolant_temp < cfg.coolant_max() - 50.0);
    assert!(sim.state().limp_mode);

    let t = sim.apply(&ControlInput::reset());
    assert!(!t.limp_mode);
    let t = sim.apply(&full_throttle());
    assert_eq!(t.eff_throttle, 1.0);
}

#[test]
fn reset_is_idempotent() {
    let cfg = EngineConfig::default();
    let mut sim = Simulation::new(cfg.clone(), 9);
    for _ in 0..300 {
        sim.apply(&full_throttle().with_shift(Shift::Up));
    }

    sim.apply(&ControlInput::reset());
    let once = sim.state().clone();
    sim.apply(&ControlInput::reset());
    let twice = sim.state().clone();

    assert_eq!(once, twice);
    assert_eq!(once, SimulationState::idle(&cfg));
    assert_eq!(once.gear, 0);
    assert!(!once.fuel_cut);
}

// ---------------------------------------------------------------------------
// Backfire
// ---------------------------------------------------------------------------

#[test]
fn backfire_needs_both_lift_off_and_high_rpm() {
    let cfg = EngineConfig::default();
    let mut draws = FixedDraws::constant(0.0);
    let mut sim = Simulation::with_rng(cfg, &mut draws);

    // Rev to the limiter.
    for _ in 0..67 {
        assert!(!sim.apply(&full_throttle()).backfire);
    }
    assert!(sim.state().rpm > 7000.0);

    // Small lift at high rpm: not armed.
    assert!(!sim.apply(&ControlInput::throttle(0.75)).backfire);
    // Big lift at high rpm: armed, and a zero draw always fires.
    assert!(sim.apply(&ControlInput::throttle(0.0)).backfire);
    // Transient.
    assert!(!sim.apply(&ControlInput::throttle(0.0)).backfire);

    // Big lift at low rpm: not armed.
    while sim.state().rpm >= 1500.0 {
        sim.apply(&ControlInput::throttle(0.0));
    }
    sim.apply(&full_throttle());
    assert!(sim.state().rpm < 4500.0);
    assert!(!sim.apply(&ControlInput::throttle(0.0)).backfire);

    drop(sim);
    assert_eq!(draws.calls(), 1, "random source consulted when not armed");
}

#[test]
fn unlucky_draw_suppresses_backfire() {
    let cfg = EngineConfig::default();
    let mut sim = Simulation::with_rng(cfg, FixedDraws::constant(0.4));
    for _ in 0..67 {
        sim.apply(&full_throttle());
    }
    assert!(!sim.apply(&ControlInput::throttle(0.0)).backfire);
}

// ---------------------------------------------------------------------------
// Frame-rate independence
// ---------------------------------------------------------------------------

#[test]
fn wall_clock_frames_map_to_fixed_ticks() {
    let cfg = EngineConfig::default();
    let mut by_frame = Simulation::new(cfg.clone(), 3);
    let mut by_tick = Simulation::new(cfg, 3);
    let mut clock = FixedTimestep::new(DT);

    // 2 s of uneven frames
    let frames = [1.0 / 144.0, 1.0 / 60.0, 1.0 / 24.0, 0.011, 0.02];
    let mut elapsed = 0.0;
    let mut ticks = 0;
    while elapsed < 2.0 {
        let frame = frames[ticks % frames.len()];
        elapsed += frame;
        for _ in 0..clock.advance(frame) {
            by_frame.apply(&full_throttle());
        }
        ticks += 1;
    }

    for _ in 0..by_frame.tick() {
        by_tick.apply(&full_throttle());
    }
    assert_eq!(by_frame.state(), by_tick.state());
    assert!((by_frame.tick() as f64 * DT - elapsed).abs() < DT + 1e-9);
}
