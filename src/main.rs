//! Keyboard-to-Gamepad Translator
//!
//! Main entry point: config loading, device setup and the shutdown wait.

use anyhow::{Context, Result};
use clap::Parser;
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use tracing::{info, warn};

use kbd_gamepad::config::GamepadConfig;
use kbd_gamepad::gamepad::{GamepadHandle, VirtualGamepad};
use kbd_gamepad::keyboard::{keyboard_name, list_keyboards, open_keyboard};
use kbd_gamepad::pump::{EventPump, PumpError, PumpExit};
use kbd_gamepad::shutdown::Shutdown;

#[derive(Parser)]
#[command(name = "kbd-gamepad")]
#[command(about = "Use a keyboard as a virtual gamepad")]
struct Cli {
    /// Config file path (default: ~/.config/kbd-gamepad/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Keyboard event device (e.g. /dev/input/event2); overrides the config
    #[arg(short, long)]
    device: Option<PathBuf>,

    /// Grab the keyboard so its keys no longer reach other applications
    #[arg(long)]
    grab: bool,

    /// List keyboards under /dev/input and exit
    #[arg(long)]
    list_devices: bool,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    print_config: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    if cli.list_devices {
        let keyboards = list_keyboards();
        if keyboards.is_empty() {
            println!("No keyboards found (try running as root or joining the 'input' group)");
        }
        for kb in keyboards {
            println!("{}  {}", kb.path.display(), kb.name);
        }
        return Ok(());
    }

    // Load config
    let config_path = cli.config.unwrap_or_else(GamepadConfig::default_path);
    info!("Loading config from {:?}", config_path);
    let mut config = GamepadConfig::load(&config_path)
        .with_context(|| format!("Failed to load config {}", config_path.display()))?;
    if cli.device.is_some() {
        config.keyboard = cli.device;
    }
    config.grab |= cli.grab;

    if cli.print_config {
        print!("{}", toml::to_string_pretty(&config)?);
        return Ok(());
    }

    let translator = config.build_translator().context("Invalid key mapping")?;

    run(config, translator)
}

fn run(config: GamepadConfig, translator: kbd_gamepad::Translator) -> Result<()> {
    let (keyboard, keyboard_path) = open_keyboard(config.keyboard.as_deref(), config.grab)?;
    info!(
        "Using keyboard device: {} ({})",
        keyboard_name(&keyboard),
        keyboard_path.display()
    );

    let mut gamepad = VirtualGamepad::new(&config.device_name, &config.device_buttons())?;
    info!("Created virtual gamepad: {}", config.device_name);
    if let Some(path) = gamepad.device_path() {
        info!("Device path: {}", path.display());
    }
    let gamepad = GamepadHandle::new(gamepad);

    let shutdown = Arc::new(Shutdown::new());
    let handler_shutdown = Arc::clone(&shutdown);
    ctrlc::set_handler(move || {
        info!("Stopping listener...");
        handler_shutdown.trigger();
    })
    .context("Failed to install signal handler")?;

    // Filled in by the worker before it wakes the main thread
    let pump_result: Arc<Mutex<Option<Result<PumpExit, PumpError>>>> = Arc::new(Mutex::new(None));

    let pump_shutdown = Arc::clone(&shutdown);
    let worker_result = Arc::clone(&pump_result);
    let mut pump = EventPump::new(keyboard, translator, gamepad.clone());
    thread::Builder::new()
        .name("event-pump".to_string())
        .spawn(move || {
            let result = pump.run(&pump_shutdown);
            *worker_result.lock() = Some(result);
            pump_shutdown.trigger();
        })
        .context("Failed to start event pump")?;

    info!("Listening for keyboard input... (Ctrl+C to stop)");
    shutdown.wait();

    gamepad.teardown();

    // None: stopped by signal while the worker is still parked in a blocking read
    let outcome = pump_result.lock().take().unwrap_or(Ok(PumpExit::Shutdown));

    match outcome {
        Ok(PumpExit::SourceClosed) => warn!("Keyboard closed; stopping"),
        Ok(PumpExit::Shutdown) => {}
        Err(e) => return Err(e).context("Event pump failed"),
    }

    info!("Virtual gamepad stopped cleanly.");
    Ok(())
}
