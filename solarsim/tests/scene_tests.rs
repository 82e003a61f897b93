use std::io::Cursor;
use std::path::PathBuf;
use std::time::Duration;

use approx::assert_relative_eq;

use solarsim::configuration::config::SimulatorConfig;
use solarsim::persistence::scene::{read_scene, write_scene, SceneError, SceneStore, TextSceneFile};
use solarsim::simulation::engine::{Renderer, SimulationController};
use solarsim::simulation::errors::SimError;
use solarsim::simulation::params::{Parameters, DEFAULT_SPEED, DEFAULT_TIME_STEP, GRAVITATIONAL_CONSTANT};
use solarsim::simulation::scheduler::{ManualScheduler, Scheduler};
use solarsim::simulation::states::{Body, BodyKind, NVec2, System};
use solarsim::visualization::timer::TimerScheduler;
use solarsim::visualization::viewport::{time_label, FrameRenderer, Viewport};

fn parse(text: &str) -> Result<solarsim::persistence::scene::LoadedScene, SceneError> {
    read_scene(Cursor::new(text.as_bytes()))
}

/// Unique file under the system temp dir
fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("solarsim-{}-{name}", std::process::id()))
}

// ==================================================================================
// Scene parsing tests
// ==================================================================================

#[test]
fn parses_star_line() {
    let scene = parse("Star 10 red 1000 1 2 3 4\n").unwrap();

    assert_eq!(scene.bodies.len(), 1);
    let b = &scene.bodies[0];
    assert_eq!(b.kind, BodyKind::Star);
    assert_eq!(b.radius, 10.0);
    assert_eq!(b.color, "red");
    assert_eq!(b.m, 1000.0);
    assert_eq!(b.x, NVec2::new(1.0, 2.0));
    assert_eq!(b.v, NVec2::new(3.0, 4.0));
    assert_eq!(b.f, NVec2::zeros());
}

#[test]
fn skips_comments_and_blank_lines() {
    let text = "# header\n\n   \nPlanet 5 blue 5.974E24 1.496E11 0 0 29780\n  # indented comment\n";
    let scene = parse(text).unwrap();

    assert_eq!(scene.bodies.len(), 1);
    assert_eq!(scene.bodies[0].kind, BodyKind::Planet);
    assert_eq!(scene.bodies[0].m, 5.974e24);
    assert!(scene.warnings.is_empty());
}

#[test]
fn kind_is_case_insensitive() {
    let scene = parse("STAR 1 red 1 0 0 0 0\nplanet 1 red 1 1 0 0 0\n").unwrap();
    let kinds: Vec<BodyKind> = scene.bodies.iter().map(|b| b.kind).collect();
    assert_eq!(kinds, vec![BodyKind::Star, BodyKind::Planet]);
}

#[test]
fn unknown_kind_is_skipped_with_one_warning() {
    let text = "Comet 3 white 10 5 5 0 0\nStar 30 yellow 1.98892E30 0 0 0 0\n";
    let scene = parse(text).unwrap();

    assert_eq!(scene.bodies.len(), 1);
    assert_eq!(scene.bodies[0].kind, BodyKind::Star);
    assert_eq!(scene.warnings.len(), 1);
    assert_eq!(scene.warnings[0].line, 1);
    assert_eq!(scene.warnings[0].token, "Comet");
}

#[test]
fn body_order_follows_file_order() {
    let text = "Planet 1 a 1 1 0 0 0\nStar 1 b 1 2 0 0 0\nPlanet 1 c 1 3 0 0 0\n";
    let colors: Vec<String> = parse(text).unwrap().bodies.into_iter().map(|b| b.color).collect();
    assert_eq!(colors, vec!["a", "b", "c"]);
}

#[test]
fn extra_trailing_tokens_are_ignored() {
    let scene = parse("Star 10 red 1000 1 2 3 4 extra\n").unwrap();
    assert_eq!(scene.bodies.len(), 1);
}

#[test]
fn malformed_number_fails_the_whole_file() {
    let text = "Star 10 red 1000 0 0 0 0\nPlanet 5 blue 1O0 1 0 0 0\nStar 10 red 1000 5 0 0 0\n";
    let err = parse(text).unwrap_err();

    match err {
        SceneError::Parse { line, message } => {
            assert_eq!(line, 2);
            assert!(message.contains("mass"), "unexpected message: {message}");
        }
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn missing_fields_fail() {
    let err = parse("Planet 5 blue 100 1 0 0\n").unwrap_err();
    assert!(matches!(err, SceneError::Parse { line: 1, .. }));

    let err = parse("Star 5\n").unwrap_err();
    assert!(matches!(err, SceneError::Parse { line: 1, .. }));
}

#[test]
fn non_finite_numbers_fail() {
    let err = parse("Star 5 red inf 0 0 0 0\n").unwrap_err();
    assert!(matches!(err, SceneError::Parse { .. }));

    let err = parse("Star 5 red 1 NaN 0 0 0\n").unwrap_err();
    assert!(matches!(err, SceneError::Parse { .. }));
}

#[test]
fn zero_or_negative_mass_is_rejected_at_load() {
    let err = parse("Star 5 red 0 0 0 0 0\n").unwrap_err();
    assert!(matches!(
        err,
        SceneError::InvalidBody { line: 1, source: SimError::InvalidMass(m) } if m == 0.0
    ));

    let err = parse("# c\nPlanet 5 red -3 0 0 0 0\n").unwrap_err();
    assert!(matches!(err, SceneError::InvalidBody { line: 2, .. }));
}

#[test]
fn negative_radius_is_rejected_at_load() {
    let err = parse("Planet -5 red 3 0 0 0 0\n").unwrap_err();
    assert!(matches!(
        err,
        SceneError::InvalidBody { source: SimError::InvalidRadius(_), .. }
    ));
}

// ==================================================================================
// Scene writing tests
// ==================================================================================

#[test]
fn writes_one_line_per_body() {
    let bodies = vec![
        Body::new(BodyKind::Star, 10.0, "red", 1000.0, NVec2::new(1.0, 2.0), NVec2::new(3.0, 4.0)).unwrap(),
        Body::new(BodyKind::Planet, 2.5, "blue", 0.5, NVec2::new(-1.5, 0.0), NVec2::new(0.0, -0.25)).unwrap(),
    ];
    let mut out = Vec::new();
    write_scene(&mut out, &bodies).unwrap();

    assert_eq!(
        String::from_utf8(out).unwrap(),
        "Star 10 red 1000 1 2 3 4\nPlanet 2.5 blue 0.5 -1.5 0 0 -0.25\n"
    );
}

#[test]
fn save_then_load_round_trips_after_simulation() {
    let scene = parse(
        "Star 30 yellow 1.98892E30 0 0 0 0\nPlanet 5 blue 5.974E24 1.496E11 0 0 29780\n",
    )
    .unwrap();
    let mut controller = SimulationController::new(
        Parameters::new(3600.0, 50, GRAVITATIONAL_CONSTANT).unwrap(),
        FrameRenderer::new(800, 800),
        ManualScheduler::new(),
        TextSceneFile,
    );
    controller.load_bodies(scene.bodies);
    controller.start().unwrap();
    controller.run_pending(23).unwrap();

    let mut out = Vec::new();
    write_scene(&mut out, controller.bodies()).unwrap();
    let reloaded = read_scene(Cursor::new(out)).unwrap();

    assert_eq!(reloaded.bodies.len(), 2);
    for (a, b) in controller.bodies().iter().zip(&reloaded.bodies) {
        assert_eq!(a.kind, b.kind);
        assert_eq!(a.color, b.color);
        assert_eq!(a.radius, b.radius);
        assert_eq!(a.m, b.m);
        assert_eq!(a.x, b.x);
        assert_eq!(a.v, b.v);
    }
}

#[test]
fn text_scene_file_round_trip() {
    let path = temp_path("round_trip.txt");
    let bodies = vec![
        Body::new(BodyKind::Star, 30.0, "yellow", 1.98892e30, NVec2::zeros(), NVec2::zeros()).unwrap(),
        Body::new(BodyKind::Planet, 5.0, "#3366ff", 6.419e23, NVec2::new(2.279e11, 0.0), NVec2::new(0.0, 24130.0)).unwrap(),
    ];

    TextSceneFile.save(&path, &bodies).unwrap();
    let loaded = TextSceneFile.load(&path).unwrap();
    let _ = std::fs::remove_file(&path);

    assert_eq!(loaded.bodies, bodies);
}

#[test]
fn missing_file_is_an_io_error() {
    let err = TextSceneFile.load(&temp_path("does-not-exist.txt")).unwrap_err();
    assert!(matches!(err, SceneError::Io(_)));
}

#[test]
fn bundled_scenarios_parse_cleanly() {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios");
    for name in ["one_satellite.txt", "double_star.txt", "solar_system.txt"] {
        let scene = TextSceneFile.load(&dir.join(name)).unwrap();
        assert!(!scene.bodies.is_empty(), "{name} has no bodies");
        assert!(scene.warnings.is_empty(), "{name} has warnings");
    }
}

// ==================================================================================
// Configuration tests
// ==================================================================================

#[test]
fn config_defaults() {
    let cfg = SimulatorConfig::default();
    assert_eq!(cfg.parameters.time_step, DEFAULT_TIME_STEP);
    assert_eq!(cfg.parameters.speed, DEFAULT_SPEED);
    assert_eq!(cfg.parameters.gravitational_constant, GRAVITATIONAL_CONSTANT);
    assert_eq!(cfg.window.width, 800);
    assert_eq!(cfg.scene, None);

    let params = cfg.parameters.build().unwrap();
    assert_eq!(params.time_step(), 1.0);
    assert_eq!(params.G(), GRAVITATIONAL_CONSTANT);
}

#[test]
fn config_partial_yaml_keeps_defaults() {
    let cfg = SimulatorConfig::from_yaml_str("parameters:\n  G: 1.0\n  speed: 0\nscene: double_star.txt\n").unwrap();

    assert_eq!(cfg.parameters.gravitational_constant, 1.0);
    assert_eq!(cfg.parameters.time_step, DEFAULT_TIME_STEP);
    assert_eq!(cfg.window.height, 800);
    assert_eq!(cfg.scene, Some(PathBuf::from("double_star.txt")));

    // speed is clamped, not rejected
    assert_eq!(cfg.parameters.build().unwrap().speed(), 1);
}

#[test]
fn config_rejects_bad_time_step() {
    let cfg = SimulatorConfig::from_yaml_str("parameters:\n  time_step: -2.0\n").unwrap();
    assert_eq!(cfg.parameters.build(), Err(SimError::InvalidTimeStep(-2.0)));
}

#[test]
fn config_rejects_bad_gravitational_constant() {
    let cfg = SimulatorConfig::from_yaml_str("parameters:\n  G: 0.0\n").unwrap();
    assert_eq!(cfg.parameters.build(), Err(SimError::InvalidGravitationalConstant(0.0)));
}

#[test]
fn bundled_config_loads() {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join("default.yaml");
    let cfg = SimulatorConfig::from_yaml_file(&path).unwrap();
    assert_eq!(cfg.parameters.time_step, 3600.0);
    assert_eq!(cfg.scene, Some(PathBuf::from("solar_system.txt")));
}

// ==================================================================================
// Viewport / renderer tests
// ==================================================================================

fn system_with(points: &[[f64; 2]]) -> System {
    System::new(
        points
            .iter()
            .map(|p| Body::new(BodyKind::Planet, 5.0, "white", 1.0, NVec2::new(p[0], p[1]), NVec2::zeros()).unwrap())
            .collect(),
    )
}

#[test]
fn viewport_fits_outermost_body() {
    let mut viewport = Viewport::new(800, 600);
    let scale = viewport.fit(&system_with(&[[0.0, 0.0], [100.0, -300.0]])).unwrap();

    assert_relative_eq!(scale, 0.4 * 600.0 / 300.0);
    let p = viewport.to_screen(NVec2::new(100.0, -300.0));
    assert_relative_eq!(p.x, 80.0);
    assert_relative_eq!(p.y, -240.0);
}

#[test]
fn viewport_empty_scene_keeps_scale() {
    let mut viewport = Viewport::new(800, 800);
    viewport.scale_factor = 2.0;

    assert_eq!(viewport.fit(&System::default()), Err(SimError::EmptyScene));
    assert_eq!(viewport.scale_factor, 2.0);

    // single body at the origin has zero extent
    assert_eq!(viewport.fit(&system_with(&[[0.0, 0.0]])), Ok(2.0));
}

#[test]
fn viewport_off_screen_detection() {
    let viewport = Viewport::new(200, 100);

    assert!(!viewport.is_off_screen(NVec2::new(0.0, 0.0), 5.0));
    assert!(!viewport.is_off_screen(NVec2::new(103.0, 0.0), 5.0));
    assert!(viewport.is_off_screen(NVec2::new(106.0, 0.0), 5.0));
    assert!(viewport.is_off_screen(NVec2::new(0.0, -60.0), 5.0));
}

#[test]
fn frame_renderer_tracks_loads_and_redraws() {
    let mut renderer = FrameRenderer::new(800, 800);
    let mut sys = system_with(&[[1.0, 0.0], [-2.0, 0.0]]);

    renderer.scene_loaded(&sys);
    assert!(renderer.take_respawn());
    assert!(!renderer.take_respawn());
    assert!(renderer.take_dirty());
    assert_relative_eq!(renderer.viewport.scale_factor, 160.0);

    sys.t = 3600.0;
    renderer.redraw(&sys);
    assert!(!renderer.take_respawn());
    assert!(renderer.take_dirty());
    assert_eq!(renderer.time_label(), "3600.0 seconds gone");
}

#[test]
fn time_label_has_one_decimal() {
    assert_eq!(time_label(0.0), "0.0 seconds gone");
    assert_eq!(time_label(12.34), "12.3 seconds gone");
}

// ==================================================================================
// Timer scheduler tests
// ==================================================================================

#[test]
fn timer_scheduler_fires_once_after_delay() {
    let mut s = TimerScheduler::default();
    assert_eq!(s.advance(Duration::from_millis(50)), None);

    s.schedule(Duration::from_millis(10));
    assert!(s.is_pending());
    assert_eq!(s.advance(Duration::from_millis(6)), None);
    assert_eq!(s.advance(Duration::from_millis(6)), Some(Duration::from_millis(2)));
    assert!(!s.is_pending());
    assert_eq!(s.advance(Duration::from_millis(100)), None);
}

#[test]
fn timer_scheduler_replaces_pending_request() {
    let mut s = TimerScheduler::default();
    s.schedule(Duration::from_millis(100));
    s.schedule(Duration::from_millis(5));

    assert_eq!(s.advance(Duration::from_millis(5)), Some(Duration::ZERO));
}

fn timer_controller(speed: u32) -> SimulationController<FrameRenderer, TimerScheduler, TextSceneFile> {
    let mut c = SimulationController::new(
        Parameters::default(),
        FrameRenderer::new(800, 800),
        TimerScheduler::default(),
        TextSceneFile,
    );
    c.set_speed(speed);
    c.load_bodies(vec![
        Body::new(BodyKind::Star, 5.0, "yellow", 1.0e30, NVec2::zeros(), NVec2::zeros()).unwrap(),
        Body::new(BodyKind::Planet, 2.0, "blue", 1.0e24, NVec2::new(1.0e11, 0.0), NVec2::new(0.0, 3.0e4)).unwrap(),
    ]);
    c
}

#[test]
fn frame_fires_every_tick_whose_delay_elapsed() {
    // speed 100 asks for a 1 ms delay between ticks
    let mut c = timer_controller(100);
    c.start().unwrap();

    assert_eq!(c.advance_frame(Duration::from_millis(16), 100), Ok(16));
    assert_eq!(c.physical_time(), 17.0 * DEFAULT_TIME_STEP);
    assert!(c.scheduler().is_pending());

    assert_eq!(c.advance_frame(Duration::from_millis(50), 10), Ok(10));
}

#[test]
fn frame_at_slow_speed_waits_for_the_delay() {
    // speed 1 asks for 100 ms
    let mut c = timer_controller(1);
    c.start().unwrap();

    assert_eq!(c.advance_frame(Duration::from_millis(60), 100), Ok(0));
    assert_eq!(c.advance_frame(Duration::from_millis(60), 100), Ok(1));

    c.stop();
    assert_eq!(c.advance_frame(Duration::from_millis(500), 100), Ok(0));
    assert!(!c.scheduler().is_pending());
}
