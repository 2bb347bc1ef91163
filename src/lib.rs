pub mod app;
pub mod asset;
pub mod gfx;
pub mod renderer;
pub mod scene;
pub mod settings;

pub use app::{App, AppError, RunOptions, RunReport};

/// Install the `env_logger` backend at `Info`, overridable through `RUST_LOG`.
pub fn init_logging() {
    let _ = env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .try_init();
}
