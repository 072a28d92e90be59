use std::path::PathBuf;

use mathshooter::config::{GameConfig, DEFAULT_CONFIG_PATH};
use mathshooter::display::{Display, InputEvent, RenderTarget, DEFAULT_HEIGHT, DEFAULT_WIDTH};
use mathshooter::game::{Game, GameAssets, Input};
use mathshooter::render::Renderer;
use mathshooter::util::FrameClock;
use sdl2::keyboard::Keycode;

/// Command-line overrides on top of the config file
struct Args {
    config: PathBuf,
    width: Option<u32>,
    height: Option<u32>,
    no_vsync: bool,
}

/// Parse command line arguments
fn parse_args() -> Args {
    let args: Vec<String> = std::env::args().collect();
    let mut parsed = Args {
        config: PathBuf::from(DEFAULT_CONFIG_PATH),
        width: None,
        height: None,
        no_vsync: false,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--no-vsync" => parsed.no_vsync = true,
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    parsed.config = PathBuf::from(&args[i + 1]);
                    i += 1;
                }
            },
            "--width" | "-w" => {
                if i + 1 < args.len() {
                    if let Ok(w) = args[i + 1].parse::<u32>() {
                        parsed.width = Some(w);
                    }
                    i += 1;
                }
            },
            "--height" | "-h" => {
                if i + 1 < args.len() {
                    if let Ok(h) = args[i + 1].parse::<u32>() {
                        parsed.height = Some(h);
                    }
                    i += 1;
                }
            },
            "--resolution" | "-r" => {
                if i + 1 < args.len() {
                    // Parse WxH format (e.g., 1920x1080)
                    if let Some((w, h)) = args[i + 1].split_once('x') {
                        if let (Ok(w), Ok(h)) = (w.parse::<u32>(), h.parse::<u32>()) {
                            parsed.width = Some(w);
                            parsed.height = Some(h);
                        }
                    }
                    i += 1;
                }
            },
            "--help" => {
                println!("Usage: mathshooter [OPTIONS]");
                println!();
                println!("Options:");
                println!(
                    "  --config PATH, -c PATH    Config file (default: {})",
                    DEFAULT_CONFIG_PATH
                );
                println!(
                    "  --width W, -w W           Set window width (default: {})",
                    DEFAULT_WIDTH
                );
                println!(
                    "  --height H, -h H          Set window height (default: {})",
                    DEFAULT_HEIGHT
                );
                println!("  --resolution WxH, -r WxH  Set resolution (e.g., 1920x1080)");
                println!("  --no-vsync                Disable VSync and pace frames in software");
                println!("  --help                    Show this help message");
                std::process::exit(0);
            },
            other => log::warn!("Ignoring unknown argument {:?}", other),
        }
        i += 1;
    }

    parsed
}

fn main() -> Result<(), String> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = parse_args();
    let mut config = GameConfig::load_or_default(&args.config);
    if let Some(w) = args.width {
        config.window.width = w;
    }
    if let Some(h) = args.height {
        config.window.height = h;
    }
    if args.no_vsync {
        config.window.vsync = false;
    }

    let window = &config.window;
    let (mut display, texture_creator) =
        Display::with_options(&window.title, window.width, window.height, window.vsync)?;
    let mut target = RenderTarget::with_size(&texture_creator, window.width, window.height)?;
    let mut renderer = Renderer::new(
        window.width,
        window.height,
        config.render.background,
        config.render.camera_speed,
    );

    let assets = GameAssets::load(&config.assets).map_err(|e| e.to_string())?;
    let mut game =
        Game::new(&config.game, assets, renderer.buffer_size()).map_err(|e| e.to_string())?;
    let mut input = Input::new();

    log::info!(
        "{} at {}x{}, VSync {}",
        window.title,
        window.width,
        window.height,
        if window.vsync { "on" } else { "off" }
    );
    log::info!("Controls: Left/Right move, Up jumps, Space fires, Escape quits");

    let mut clock = FrameClock::new(
        config.render.target_frame_time,
        config.render.max_frame_time,
        !config.window.vsync,
    );
    let mut focused = true;
    let mut dt = 0.0;
    let mut frame: u64 = 0;

    'main: loop {
        input.begin_frame();

        for event in display.poll_events() {
            match event {
                InputEvent::Quit | InputEvent::KeyDown(Keycode::Escape) => break 'main,
                InputEvent::KeyDown(key) => {
                    if focused {
                        input.handle_key(key, true);
                    }
                },
                InputEvent::KeyUp(key) => {
                    input.handle_key(key, false);
                },
                InputEvent::Resized { width, height } => {
                    renderer.resize(width, height);
                    target = RenderTarget::with_size(&texture_creator, width, height)?;
                },
                InputEvent::FocusLost => {
                    focused = false;
                    input.release_all();
                },
                InputEvent::FocusGained => focused = true,
            }
        }

        if focused {
            game.update(&mut renderer, &input);
        } else {
            game.draw(&mut renderer);
        }
        renderer.run_frame(dt);
        display.present(&mut target, renderer.buffer())?;

        dt = clock.tick(focused);
        frame += 1;
        if frame % 600 == 0 {
            log::debug!("{:.1} fps", clock.avg_fps());
        }
    }

    Ok(())
}
