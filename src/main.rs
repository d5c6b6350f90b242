use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use liraster::logging::init_logging;
use liraster::prelude::*;

/// Render a JSON scene with a CPU rasterizer.
#[derive(Parser, Debug)]
#[command(name = "liraster", version, about)]
struct Args {
    /// Scene description to load.
    scene: PathBuf,

    /// Settings file; missing keys keep their defaults.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Where to write the final frame.
    #[arg(short, long, default_value = "Out/img.png")]
    output: PathBuf,

    /// Exit after this many frames.
    #[arg(long)]
    max_frames: Option<u64>,

    /// Rotation about X, Y, and Z in degrees, applied in that order.
    #[arg(long, num_args = 3, value_names = ["X", "Y", "Z"], default_values_t = [0.0, 10.0, 0.0], allow_negative_numbers = true)]
    rotation: Vec<f32>,

    /// Translation applied after the rotation.
    #[arg(long, num_args = 3, value_names = ["X", "Y", "Z"], default_values_t = [0.0, 0.0, -3.0], allow_negative_numbers = true)]
    translation: Vec<f32>,

    #[arg(long, value_enum, default_value_t = RenderMode::Filled)]
    render_mode: RenderMode,

    #[arg(long, value_enum, default_value_t = ShadingMode::Flat)]
    shading: ShadingMode,

    #[arg(long, value_enum, default_value_t = ToneMap::Clamp)]
    tone_map: ToneMap,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let settings = match &args.config {
        Some(path) => Settings::load(path),
        None => Ok(Settings::default()),
    };
    let settings = match settings {
        Ok(settings) => settings,
        Err(err) => {
            init_logging(false);
            log::error!("failed to load settings: {err}");
            return ExitCode::FAILURE;
        }
    };
    init_logging(settings.debug);

    match run(&args, settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args, settings: Settings) -> anyhow::Result<()> {
    settings.log_summary();

    let scene = Scene::load(&args.scene)
        .with_context(|| format!("failed to load scene {}", args.scene.display()))?;

    let (width, height) = (settings.width, settings.height);
    let mut engine = Engine::new(settings)?;
    engine.set_render_mode(args.render_mode);
    engine.set_shading_mode(args.shading);
    engine.set_tone_map(args.tone_map);
    engine.load_scene(scene);

    let (r, t) = (&args.rotation, &args.translation);
    let mut transform = Transform::new();
    transform
        .set_rotation_degrees(r[0], r[1], r[2])
        .set_translation_xyz(t[0], t[1], t[2]);
    engine.prepare(&transform);

    let mut window = Window::new("LiRaster", width, height)?;
    let options = RunOptions {
        max_frames: args.max_frames,
        output: Some(args.output.clone()),
    };
    let summary = engine.run(&mut window, &options)?;
    log::info!("rendered {} frames", summary.frames);
    Ok(())
}
