use std::{
    io::{self, Write},
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser};
use log::{debug, LevelFilter};
use markdown_report::{convert_from_path, convert_from_reader, RenderOptions, Rendered};
use markdown_report_config::{Config, LoadOptions};
use markdown_report_format::DocumentShell;

#[derive(Debug, Parser)]
#[command(name = "markdown-report", version, about, long_about = None)]
pub struct Cli {
    /// Title to use when the document has no level-1 heading
    #[arg(short, long)]
    title: Option<String>,

    /// Configuration file that takes precedence over discovered ones
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print only the rendered body, without the surrounding page
    #[arg(long)]
    body_only: bool,

    /// Increase log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Path to markdown file, or `-` for stdin (the default)
    #[arg(value_name = "FILE")]
    path: Option<PathBuf>,
}

/// Entry point for CLI execution.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    debug!("cli: {cli:?}");

    let mut load = LoadOptions::default();
    if let Some(path) = &cli.config {
        load = load.with_override_path(path);
    }
    let mut config = Config::load(load).context("Unable to load configuration")?;

    if let Some(title) = cli.title {
        if title.trim().is_empty() {
            bail!("--title cannot be empty");
        }
        config.document.default_title = title;
    }

    let options = config.render.render_options();
    let rendered = render_source(cli.path.as_deref(), &options)?;

    if cli.body_only {
        return emit(&rendered.body);
    }

    let shell = DocumentShell::from_config(&config);
    emit(&shell.render(&rendered))
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn render_source(path: Option<&Path>, options: &RenderOptions) -> Result<Rendered> {
    match path {
        None => render_stdin(options),
        Some(path) if path == Path::new("-") => render_stdin(options),
        Some(path) => convert_from_path(path, options).with_context(|| {
            format!("Unable to read markdown at path: {}", path.display())
        }),
    }
}

fn render_stdin(options: &RenderOptions) -> Result<Rendered> {
    let stdin = io::stdin();
    let mut handle = stdin.lock();
    convert_from_reader(&mut handle, options).context("Unable to read markdown from stdin")
}

fn emit(html: &str) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    match handle.write_all(html.as_bytes()) {
        Ok(_) => {}
        Err(err) if should_ignore_pipe_error(&err) => return Ok(()),
        Err(err) => return Err(err).context("Failed to write html to stdout"),
    }

    match handle.flush() {
        Ok(_) => Ok(()),
        Err(err) if should_ignore_pipe_error(&err) => Ok(()),
        Err(err) => Err(err).context("Failed to flush stdout"),
    }
}

fn should_ignore_pipe_error(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::BrokenPipe | io::ErrorKind::WouldBlock
    )
}
