use std::path::PathBuf;

use clap::Parser;
use tinyrast::config::{self, Config};
use tinyrast::render::FillRule;
use tinyrast::{App, FrameInput};

#[derive(Parser, Debug)]
#[command(name = "tinyrast", version, about = "Minimal CPU triangle rasterizer")]
struct Args {
    /// Model to draw (OBJ subset: v, vt, vn, f)
    model: Option<PathBuf>,

    /// Window width in screen pixels
    #[arg(long, default_value_t = config::WINDOW_WIDTH)]
    width: u32,

    /// Window height in screen pixels
    #[arg(long, default_value_t = config::WINDOW_HEIGHT)]
    height: u32,

    /// Screen pixels per buffer pixel
    #[arg(long, default_value_t = config::RASTER_SCALE)]
    scale: u32,

    /// Viewer frame rate target
    #[arg(long, default_value_t = config::FPS)]
    fps: u64,

    /// Seed for per-triangle colors
    #[arg(long, default_value_t = config::DEFAULT_SEED)]
    seed: u64,

    /// Use the top-left fill rule instead of the inclusive one
    #[arg(long)]
    top_left: bool,

    /// Snapshot path (.bmp uses the built-in encoder)
    #[arg(short, long, default_value = config::DEFAULT_SNAPSHOT)]
    output: PathBuf,

    /// Render a single frame to the snapshot path and exit
    #[arg(long)]
    headless: bool,
}

impl Args {
    fn into_config(self) -> Config {
        Config {
            window_width: self.width,
            window_height: self.height,
            scale: self.scale,
            fps: self.fps,
            seed: self.seed,
            fill_rule: if self.top_left {
                FillRule::TopLeft
            } else {
                FillRule::Inclusive
            },
            model: self.model,
            snapshot: self.output,
            ..Config::default()
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = Args::parse();
    let headless = args.headless;
    let app = App::new(args.into_config())?;

    if headless || !cfg!(feature = "window") {
        if !headless {
            log::warn!("Built without the `window` feature, rendering headless");
        }
        return run_headless(app);
    }
    run_windowed(app)
}

fn run_headless(mut app: App) -> Result<(), Box<dyn std::error::Error>> {
    app.frame(&FrameInput {
        save_snapshot: true,
        ..FrameInput::default()
    })?;
    Ok(())
}

#[cfg(feature = "window")]
fn run_windowed(mut app: App) -> Result<(), Box<dyn std::error::Error>> {
    use tinyrast::window::Window;
    use tinyrast::FrameLimiter;

    let (width, height) = app.config().buffer_size();
    let mut window = Window::new(config::WINDOW_TITLE, width, height, app.config().scale)?;
    let mut limiter = FrameLimiter::new(app.config().fps);

    log::info!("Keys: 1/2 pin a vertex, F toggles the fill rule, S saves, Esc quits");

    loop {
        let input = window.poll_input();
        if input.quit {
            break;
        }
        if let Err(err) = app.frame(&input.to_frame_input(window.scale())) {
            log::error!("{err}");
        }
        window.present(app.buffer())?;
        limiter.wait();
    }

    log::info!("Shutting down");
    Ok(())
}

#[cfg(not(feature = "window"))]
fn run_windowed(app: App) -> Result<(), Box<dyn std::error::Error>> {
    run_headless(app)
}
