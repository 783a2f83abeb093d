use glam::Vec2;
use skitter::config::PathKind;
use skitter::{GifCapture, PixelCanvas, PointerPath, Runner, SimConfig};

fn small_config(path: PathKind, ticks: u64) -> SimConfig {
    let mut config = SimConfig::default();
    config.lizard.legs = 2;
    config.lizard.tail = 4;
    config.run.path = path;
    config.run.ticks = ticks;
    config
}

#[test]
fn fixed_pointer_run_closes_distance() {
    let config = small_config(PathKind::Fixed, 800);
    let mut runner = Runner::from_config(&config).unwrap();
    let start = runner.creature().position().distance(Vec2::from(config.run.fixed));

    let stats = runner.run(config.run.ticks, |_| {}).clone();

    assert_eq!(stats.ticks, 800);
    // two leg pairs
    assert_eq!(stats.landings.len(), 4);
    assert_eq!(runner.creature().legs().len(), 4);
    assert!(stats.distance > 0.0);
    assert!(
        stats.final_pointer_distance < start / 2.0,
        "ended {} from pointer, started {}",
        stats.final_pointer_distance,
        start
    );
    assert!(stats.total_landings() > 0);
    let planted = stats.mean_planted_fraction();
    assert!((0.0..=1.0).contains(&planted));
}

#[test]
fn same_seed_same_stats() {
    let config = small_config(PathKind::Orbit, 200);
    let mut a = Runner::from_config(&config).unwrap();
    let mut b = Runner::from_config(&config).unwrap();

    let stats_a = a.run(config.run.ticks, |_| {}).clone();
    let stats_b = b.run(config.run.ticks, |_| {}).clone();

    assert_eq!(stats_a, stats_b);
    assert_eq!(a.creature().position(), b.creature().position());
}

#[test]
fn runner_reports_pointer_from_path() {
    let config = small_config(PathKind::Orbit, 1);
    let mut runner = Runner::from_config(&config).unwrap();
    runner.step();

    let expected = Vec2::from(config.run.start) + Vec2::X * config.run.orbit_radius;
    assert!((runner.pointer() - expected).length() < 1e-3);
    assert_eq!(runner.tick(), 1);
}

#[test]
fn empty_waypoints_rejected() {
    let mut config = small_config(PathKind::Waypoints, 10);
    config.run.waypoints.clear();
    assert!(Runner::from_config(&config).is_err());
    assert!(PointerPath::from_config(&config.run).is_err());
}

#[test]
fn rendered_frames_encode_to_gif() {
    let config = small_config(PathKind::Fixed, 20);
    let mut runner = Runner::from_config(&config).unwrap();
    let mut canvas = PixelCanvas::new(96, 64, 0.5);
    let mut gif = GifCapture::for_canvas(&canvas, 10).unwrap();

    runner.run(config.run.ticks, |runner| {
        if runner.tick() % 5 == 0 {
            canvas.render(runner.creature(), runner.pointer());
            gif.capture_frame(&canvas);
        }
    });

    assert_eq!(gif.frame_count(), 4);
    assert!(canvas.ink() > 0);

    let dir = tempfile::tempdir().unwrap();
    let gif_path = dir.path().join("run.gif");
    gif.save(&gif_path).unwrap();
    assert!(std::fs::metadata(&gif_path).unwrap().len() > 0);

    let png_path = dir.path().join("last.png");
    canvas.save_png(&png_path).unwrap();
    assert!(std::fs::metadata(&png_path).unwrap().len() > 0);
}
