mod app;
mod config;
mod launcher;
mod logger;
mod registry;
mod ui;

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

use app::{App, Effect};
use config::Config;
use launcher::LaunchError;

#[derive(Parser)]
#[command(name = "browserselector", version)]
#[command(about = "Choose which installed browser opens a URL")]
struct Cli {
    /// URL to pre-fill. Arguments after it are ignored
    #[arg(value_name = "URL", allow_hyphen_values = true, trailing_var_arg = true)]
    args: Vec<String>,

    /// Print what is launched and log at debug level
    #[arg(short, long)]
    verbose: bool,

    /// Use this config file instead of the one in the OS config directory
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

fn is_verbose_flag(arg: &str) -> bool {
    arg == "-v" || arg == "--verbose"
}

impl Cli {
    // `-v` after the URL lands in `args` but still counts
    fn verbose(&self) -> bool {
        self.verbose || self.args.iter().any(|a| is_verbose_flag(a))
    }

    fn url(&self) -> Option<&str> {
        self.args
            .iter()
            .map(String::as_str)
            .find(|a| !is_verbose_flag(a))
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let verbose = cli.verbose();
    let log_file = logger::init(verbose);

    log::info!("Starting browserselector");
    if let Some(path) = &log_file {
        log::debug!("Logging to {}", path.display());
    }

    let url = cli.url().unwrap_or_default().to_string();
    let config_path = match cli.config {
        Some(path) => path,
        None => config::config_path().unwrap_or_else(|e| {
            log::warn!("{}, using the current directory", e);
            PathBuf::from(config::CONFIG_FILE)
        }),
    };
    let config = Config::load_from(&config_path);
    let mut app = App::new(config, config_path, url);

    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let result = run_app(&mut terminal, &mut app);

    // Restore the terminal before a terminal browser gets it
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    let Some((index, url)) = result? else {
        log::info!("Exiting without launching");
        return Ok(());
    };
    if let Err(e) = launch_selected(&mut app, index, &url, verbose, &mut io::stdout()) {
        log::error!("{}", e);
        std::process::exit(1);
    }
    Ok(())
}

/// Spawn the chosen browser, then remember it as the next pre-selection.
fn launch_selected(
    app: &mut App,
    index: usize,
    url: &str,
    verbose: bool,
    out: &mut impl Write,
) -> Result<(), LaunchError> {
    let entry = app
        .config
        .browser(index)
        .cloned()
        .ok_or(LaunchError::NoSuchEntry(index))?;

    if verbose {
        let _ = writeln!(out, "Launching {} with URL {}", entry.name, url);
    }

    let child = launcher::launch(&entry, url)?;
    log::info!("Launched {} (pid {})", entry.name, child.id());
    if let Err(e) = app.finish_launch(index) {
        log::error!("{}", e);
    }
    Ok(())
}

/// Event loop. Returns the browser index and URL to launch, if any.
fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> io::Result<Option<(usize, String)>> {
    loop {
        terminal.draw(|frame| ui::render(app, frame))?;

        if !event::poll(Duration::from_millis(250))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        // Only process key press events (ignore key release)
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match app.handle_key(key) {
            Effect::None => {}
            Effect::Quit => return Ok(None),
            Effect::Launch { index, url } => return Ok(Some((index, url))),
            Effect::OpenConfigDir => {
                let dir = app
                    .config_path()
                    .parent()
                    .filter(|p| !p.as_os_str().is_empty())
                    .unwrap_or(Path::new("."))
                    .to_path_buf();
                if let Err(e) = launcher::open_directory(&dir) {
                    log::warn!("{}", e);
                    app.status = Some(e.to_string());
                }
            }
        }
    }
}
