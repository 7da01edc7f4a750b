mod game;

use isocity::config::{self, DEFAULT_CONFIG_PATH, WindowSettings};
use macroquad::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn window_conf(window: &WindowSettings) -> Conf {
    Conf {
        window_title: window.title.clone(),
        window_width: window.width,
        window_height: window.height,
        fullscreen: false,
        ..Default::default()
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = config::load_settings(DEFAULT_CONFIG_PATH)?;
    info!("Opening {}x{} window", settings.window.width, settings.window.height);

    macroquad::Window::from_config(window_conf(&settings.window), game::run(settings));
    Ok(())
}
