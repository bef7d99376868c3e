use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style},
    widgets::Paragraph,
    Terminal,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

use icewatch::app::{App, View};
use icewatch::data::duration::parse_duration;
use icewatch::noaa::upstream::{MAX_HISTORY_DAYS, MIN_HISTORY_DAYS};
use icewatch::server::{self, AppState, ServeOptions};
use icewatch::source::{DataSource, FileSource, HttpSource};
use icewatch::{events, ui, IceData, IceFeed, Settings};

const DEFAULT_LOG_FILTER: &str = "icewatch=info,tower_http=info";

#[derive(Parser, Debug)]
#[command(name = "icewatch")]
#[command(about = "Great Lakes ice cover dashboard and NOAA proxy")]
struct Args {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the proxy and serve the static site
    Serve {
        /// Address to bind
        #[arg(long, env = "HOST")]
        host: Option<String>,

        /// Port to listen on
        #[arg(short, long, env = "PORT")]
        port: Option<u16>,

        /// Directory served for non-API paths
        #[arg(long)]
        site_dir: Option<PathBuf>,
    },

    /// Interactive terminal dashboard
    Watch {
        /// Local proxy to try before NOAA (e.g. http://localhost:8080)
        #[arg(long, conflicts_with = "file")]
        proxy: Option<String>,

        /// Read a saved payload instead of fetching
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Days of history to fetch (14-365)
        #[arg(short, long)]
        days: Option<u32>,

        /// Refresh interval (e.g. "30m", "600")
        #[arg(short, long)]
        refresh: Option<String>,

        /// Write logs here; the dashboard owns the terminal otherwise
        #[arg(long)]
        log_file: Option<PathBuf>,
    },

    /// Fetch once and write the summary JSON
    Export {
        /// Local proxy to try before NOAA
        #[arg(long)]
        proxy: Option<String>,

        /// Days of history to fetch (14-365)
        #[arg(short, long)]
        days: Option<u32>,

        /// Output file; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();
    let settings = Settings::load(args.config.as_deref())?;

    match args.command {
        Command::Serve {
            host,
            port,
            site_dir,
        } => {
            init_logging(None)?;
            let options = ServeOptions {
                host: host.unwrap_or(settings.server.host.clone()),
                port: port.unwrap_or(settings.server.port),
                site_dir: site_dir.unwrap_or(settings.server.site_dir.clone()),
            };
            run_server(&settings, options)
        }
        Command::Watch {
            proxy,
            file,
            days,
            refresh,
            log_file,
        } => {
            if let Some(ref path) = log_file {
                init_logging(Some(path))?;
            }
            let refresh = refresh.unwrap_or(settings.watch.refresh.clone());
            let refresh = parse_duration(&refresh)
                .with_context(|| format!("Invalid refresh interval: {}", refresh))?;

            match file {
                Some(path) => run_with_file(&path, refresh),
                None => {
                    let feed = build_feed(&settings, proxy)?;
                    let days = history_days(days, &settings);
                    run_with_http(feed, days, refresh)
                }
            }
        }
        Command::Export {
            proxy,
            days,
            output,
        } => {
            init_logging(None)?;
            let feed = build_feed(&settings, proxy)?;
            export_once(feed, history_days(days, &settings), output.as_deref())
        }
    }
}

/// Install the tracing subscriber, on stderr or appending to `log_file`.
fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    match log_file {
        Some(path) => {
            let file = File::options()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(io::stderr)
                .init();
        }
    }
    Ok(())
}

fn build_feed(settings: &Settings, proxy: Option<String>) -> Result<IceFeed> {
    let fetcher = settings
        .upstream
        .fetcher()
        .context("Failed to build HTTP client")?;
    let feed = IceFeed::new(fetcher, settings.upstream.upstream());
    Ok(match proxy.or(settings.watch.proxy_url.clone()) {
        Some(url) => feed.with_proxy(url),
        None => feed,
    })
}

fn history_days(days: Option<u32>, settings: &Settings) -> u32 {
    days.unwrap_or(settings.watch.history_days)
        .clamp(MIN_HISTORY_DAYS, MAX_HISTORY_DAYS)
}

fn run_server(settings: &Settings, options: ServeOptions) -> Result<()> {
    let fetcher = settings
        .upstream
        .fetcher()
        .context("Failed to build HTTP client")?;
    let state = AppState::new(fetcher, settings.upstream.upstream());

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(server::run(state, options))
}

/// Run with a file-based data source
fn run_with_file(path: &Path, refresh: Duration) -> Result<()> {
    let source = Box::new(FileSource::new(path));
    run_tui(source, refresh)
}

/// Run with the HTTP feed polling in the background
fn run_with_http(feed: IceFeed, days: u32, refresh: Duration) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    // HttpSource spawns onto the runtime; the TUI keeps the main thread
    let source = {
        let _guard = rt.enter();
        HttpSource::spawn(feed, days, refresh)
    };
    info!(days, refresh = ?refresh, "starting dashboard");

    // The source only delivers on its own schedule, so poll the channel often
    let result = run_tui(Box::new(source), Duration::from_millis(250));
    rt.shutdown_background();
    result
}

/// Run the TUI with the given data source
fn run_tui(source: Box<dyn DataSource>, poll_interval: Duration) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Restore the terminal before printing a panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic);
    }));

    let mut app = App::new(source);
    let _ = app.reload_data();

    let result = run_app(&mut terminal, &mut app, poll_interval);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    poll_interval: Duration,
) -> Result<()> {
    let mut last_poll = Instant::now();

    // Minimum terminal size for usable display
    const MIN_WIDTH: u16 = 60;
    const MIN_HEIGHT: u16 = 12;

    while app.running {
        terminal.draw(|frame| {
            let area = frame.area();

            if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
                let msg = format!(
                    "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
                    area.width, area.height, MIN_WIDTH, MIN_HEIGHT
                );
                let paragraph = Paragraph::new(msg)
                    .alignment(Alignment::Center)
                    .style(Style::default().fg(Color::Yellow));
                let centered = Rect::new(0, area.height.saturating_sub(4) / 2, area.width, 5);
                frame.render_widget(paragraph, centered);
                return;
            }

            let chunks = Layout::vertical([
                Constraint::Length(1), // Header bar
                Constraint::Length(1), // Tabs
                Constraint::Min(8),    // Content
                Constraint::Length(1), // Status bar
            ])
            .split(area);

            ui::common::render_header(frame, app, chunks[0]);
            ui::common::render_tabs(frame, app, chunks[1]);

            match app.current_view {
                View::Lakes => ui::lakes::render(frame, app, chunks[2]),
                View::Ranking => ui::ranking::render(frame, app, chunks[2]),
                View::Trends => ui::trends::render(frame, app, chunks[2]),
            }

            ui::common::render_status_bar(frame, app, chunks[3]);

            if app.show_detail_overlay {
                ui::detail::render_overlay(frame, app, area);
            }

            if app.show_help {
                ui::common::render_help(frame, app, area);
            }
        })?;

        if let Some(event) = events::poll_event(Duration::from_millis(100))? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key),
                // Content starts after header (1) + tabs (1)
                Event::Mouse(mouse) => events::handle_mouse_event(app, mouse, 2),
                _ => {}
            }
        }

        if last_poll.elapsed() >= poll_interval {
            let _ = app.reload_data();
            last_poll = Instant::now();
        }
    }

    Ok(())
}

/// Fetch one snapshot and write the summary JSON
fn export_once(feed: IceFeed, days: u32, output: Option<&Path>) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    let snapshot = rt
        .block_on(feed.fetch_snapshot(days))
        .context("Unable to fetch NOAA data")?;

    let data = IceData::from_snapshot(snapshot);
    let json = serde_json::to_string_pretty(&data.summary_json())?;

    match output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(path = %path.display(), "exported ice summary");
        }
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{}", json)?;
        }
    }
    Ok(())
}
