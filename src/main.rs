use anyhow::{Context, Result as AnyhowResult};
use clap::{Parser, Subcommand};
use ggu::app::headless::HeadlessHost;
use ggu::app::{Action, ActionOutcome, PluginState};
use ggu::config::PluginConfig;
use ggu::config_io::{self, DirectoryContext};
use ggu::model::document::Document;
use ggu::model::favourites::{Favourite, FavouriteMenuItem};
use ggu::primitives::path_utils::expand_tilde;
use ggu::services::{log_dirs, tracing_setup};
use rust_i18n::t;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

rust_i18n::i18n!("locales", fallback = "en");

/// Pretty-printers, pipe filter and favourites for text documents
#[derive(Parser, Debug)]
#[command(name = "ggu")]
#[command(about = "Format JSON/XML, filter text, list favourites", long_about = None)]
#[command(version)]
struct Args {
    /// Path to a geany.conf style configuration file
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<String>,

    /// Path to log file for diagnostics (default: XDG state dir)
    #[arg(long, value_name = "PATH", global = true)]
    log_file: Option<PathBuf>,

    /// Override the locale (e.g., 'en', 'de')
    #[arg(long, value_name = "LOCALE", global = true)]
    locale: Option<String>,

    /// Print the directories and files used by ggu and exit
    #[arg(long)]
    show_paths: bool,

    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    dump_config: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(clap::Args, Debug)]
struct Target {
    /// File to filter (default: stdin)
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Write the result back to FILE instead of stdout
    #[arg(long, short = 'i')]
    in_place: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Pretty-print JSON with the configured formatter
    Json(Target),
    /// Pretty-print XML or HTML with the configured formatter
    Xml(Target),
    /// Pipe the text through a shell command
    Pipe {
        /// Shell fragment, e.g. "sort -u" (default: the configured pipe_default)
        #[arg(long, short = 'c', value_name = "COMMAND")]
        command: Option<String>,

        #[command(flatten)]
        target: Target,
    },
    /// List the favourites menu
    Favourites {
        /// Also list entries hidden because their file does not exist
        #[arg(long)]
        all: bool,
    },
}

fn main() -> AnyhowResult<()> {
    let args = Args::parse();

    let locale = args.locale.clone().or_else(locale_from_env);
    if let Some(locale) = &locale {
        rust_i18n::set_locale(locale);
    }

    let dir_context =
        DirectoryContext::from_system().context("Failed to determine system directories")?;

    if args.show_paths {
        print_paths(&dir_context, args.config.as_deref());
        return Ok(());
    }

    let log_file = args
        .log_file
        .clone()
        .unwrap_or_else(log_dirs::main_log_path);
    if tracing_setup::init_global(&log_file).is_none() {
        eprintln!("Warning: could not open log file {}", log_file.display());
    }
    log_dirs::cleanup_stale_logs();
    tracing::info!("ggu starting (locale {:?})", locale);

    let config = load_config(&args, &dir_context)?;

    if args.dump_config {
        let json =
            serde_json::to_string_pretty(&config).context("Failed to serialize config")?;
        println!("{}", json);
        return Ok(());
    }

    let Some(command) = args.command else {
        use clap::CommandFactory;
        Args::command().print_help()?;
        return Ok(());
    };

    let home_dir = dir_context.home_dir.as_deref();
    match command {
        Command::Json(target) => run_filter(Action::JsonPretty, &target, None, config, home_dir),
        Command::Xml(target) => run_filter(Action::XmlPretty, &target, None, config, home_dir),
        Command::Pipe { command, target } => {
            let fragment = command.unwrap_or_else(|| config.pipe_default.clone());
            run_filter(Action::Pipe, &target, Some(fragment), config, home_dir)
        }
        Command::Favourites { all } => list_favourites(config, home_dir, all),
    }
}

fn load_config(args: &Args, dir_context: &DirectoryContext) -> AnyhowResult<PluginConfig> {
    match &args.config {
        Some(path) => {
            let path = expand_tilde(path);
            config_io::load_from_file(&path)
                .with_context(|| format!("Failed to load config from {}", path.display()))
        }
        None => config_io::load(dir_context).context("Invalid configuration"),
    }
}

/// Language part of `LC_ALL`/`LANG`, e.g. `de` for `de_DE.UTF-8`
fn locale_from_env() -> Option<String> {
    ["LC_ALL", "LC_MESSAGES", "LANG"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|value| !value.is_empty())
        .and_then(|value| {
            let lang = value.split(['_', '.', '@']).next()?.to_string();
            (!lang.is_empty() && lang != "C" && lang != "POSIX").then_some(lang)
        })
}

fn read_document(target: &Target) -> AnyhowResult<Document> {
    match &target.file {
        Some(path) => {
            Document::open(path).with_context(|| format!("Failed to read {}", path.display()))
        }
        None => {
            anyhow::ensure!(!target.in_place, t!("cli.in_place_needs_file").to_string());
            let text = io::read_to_string(io::stdin()).context("Failed to read stdin")?;
            Ok(Document::new(text))
        }
    }
}

fn run_filter(
    action: Action,
    target: &Target,
    pipe_command: Option<String>,
    config: PluginConfig,
    home_dir: Option<&Path>,
) -> AnyhowResult<()> {
    let mut host = HeadlessHost::with_document(read_document(target)?);
    if let Some(fragment) = pipe_command {
        host = host.answering(fragment);
    }

    let mut state = PluginState::load(config, home_dir, &mut host);
    let outcome = state.activate(action, &mut host);
    state.unload();

    match outcome {
        ActionOutcome::Applied | ActionOutcome::Handled => {}
        ActionOutcome::Cancelled => anyhow::bail!(t!("cli.no_pipe_command").to_string()),
        ActionOutcome::NoDocument => anyhow::bail!("No document to filter"),
        ActionOutcome::Failed(e) => {
            for message in host.errors() {
                eprintln!("{}", message.text);
            }
            return Err(e).context(format!("{} failed", action.label()));
        }
    }

    let Some(doc) = host.document.as_mut() else {
        anyhow::bail!("No document to filter");
    };
    match (&target.file, target.in_place) {
        (Some(path), true) => doc
            .save_as(path)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        _ => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(doc.text().as_bytes())
                .context("Failed to write stdout")?;
            stdout.flush()?;
        }
    }
    Ok(())
}

fn list_favourites(config: PluginConfig, home_dir: Option<&Path>, all: bool) -> AnyhowResult<()> {
    let mut host = HeadlessHost::default();
    let state = PluginState::load(config, home_dir, &mut host);
    let mut stdout = io::stdout().lock();

    if all {
        for favourite in state.favourites() {
            match favourite {
                Favourite::Entry { label, path } => {
                    let marker = if path.is_file() { ' ' } else { '!' };
                    writeln!(stdout, "{} {}\t{}", marker, label, path.display())?;
                }
                Favourite::Separator => writeln!(stdout, "  ---")?,
            }
        }
    } else {
        match state.favourites_menu() {
            Some(menu) if !menu.is_empty() => {
                for item in &menu.items {
                    match item {
                        FavouriteMenuItem::Open { label, path } => {
                            writeln!(stdout, "{}\t{}", label, path.display())?
                        }
                        FavouriteMenuItem::Separator => writeln!(stdout, "---")?,
                    }
                }
            }
            _ => eprintln!("{}", t!("favourites.none")),
        }
    }
    state.unload();
    Ok(())
}

fn print_paths(dir_context: &DirectoryContext, config_override: Option<&str>) {
    let config_path = config_override
        .map(expand_tilde)
        .unwrap_or_else(|| dir_context.effective_config_path());

    println!("ggu directories:");
    println!();
    println!("User config:    {}", dir_context.config_path().display());
    println!(
        "System config:  {}",
        dir_context.system_config_path().display()
    );
    println!("Effective:      {}", config_path.display());
    println!("Logs:           {}", log_dirs::log_dir().display());
    if let Some(home) = &dir_context.home_dir {
        println!("$HOME:          {}", home.display());
    }
}
