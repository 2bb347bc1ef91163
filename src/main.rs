use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use road_rush::{App, RunOptions};

#[derive(Parser)]
#[command(name = "road-rush", about = "Load a road-rush scene and render it headlessly")]
struct Cli {
    /// App config (resolution plus scene documents)
    #[arg(default_value = "config/app.json")]
    config: PathBuf,

    /// Scene key, e.g. `scene`, `menu-scene` or `gameover-scene`
    #[arg(short, long)]
    scene: Option<String>,

    /// Number of frames to render
    #[arg(short, long, default_value_t = 60)]
    frames: u32,

    /// Seconds advanced per frame
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,
}

fn main() -> ExitCode {
    road_rush::init_logging();
    let cli = Cli::parse();

    let options = RunOptions {
        scene: cli.scene,
        frames: cli.frames,
        dt: cli.dt,
    };

    let result = App::from_config_path(&cli.config).and_then(|app| app.dry_run(&options));
    match result {
        Ok(report) => {
            log::info!(
                "{}: {} entities, {} frames, {} draw calls, all GPU objects released",
                report.scene,
                report.entities,
                report.frames.len(),
                report.total_draw_calls()
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("Application error: {}", err);
            ExitCode::FAILURE
        }
    }
}
