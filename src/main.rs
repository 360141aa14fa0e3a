use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use websync::app::App;
use websync::config::Config;
use websync::document::Document;
use websync::keybindings::KeybindingRegistry;
use websync::links::SystemOpener;
use websync::preferences::PreferenceManager;
use websync::storage::{FileStorage, Storage};
use websync::store::DocumentStore;
use websync::{search, transfer, ui};

/// Get the config directory path (~/.config/websync/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".config").join("websync"))
}

#[derive(Parser, Debug)]
#[command(name = "websync", about = "Terminal bookmark manager for your favourite websites")]
struct Args {
    /// Config file (default: ~/.config/websync/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory for stored bookmarks (overrides `data_dir` from config)
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Replace all bookmarks with the default categories before starting
    #[arg(long, conflicts_with = "import")]
    reset: bool,

    /// Replace bookmarks with a JSON document (the current ones are backed up)
    #[arg(long, value_name = "FILE")]
    import: Option<PathBuf>,

    /// Write bookmarks as JSON to FILE and exit
    #[arg(long, value_name = "FILE")]
    export: Option<PathBuf>,

    /// Print the bookmarks matching QUERY and exit
    #[arg(long, value_name = "QUERY")]
    filter: Option<String>,
}

/// Log to a file: the terminal belongs to the TUI.
fn init_tracing(config_dir: &std::path::Path) -> Result<()> {
    let log_path = config_dir.join("websync.log");
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {}", log_path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::sync::Mutex::new(log_file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Plain-text outline of a document for `--filter`.
fn print_document(document: &Document) {
    if document.is_empty() {
        println!("No categories or websites match your search.");
        return;
    }
    for category in document.categories() {
        println!("{} ({})", category.name, category.websites.len());
        for site in &category.websites {
            match &site.description {
                Some(description) => {
                    println!("  {}  {}  - {}", site.name, site.url, description)
                }
                None => println!("  {}  {}", site.name, site.url),
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_dir = get_config_dir()?;
    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir).context("Failed to create config directory")?;
    }

    // User-only access to the config directory
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if let Err(e) =
            std::fs::set_permissions(&config_dir, std::fs::Permissions::from_mode(0o700))
        {
            eprintln!(
                "Warning: failed to restrict permissions on {}: {}",
                config_dir.display(),
                e
            );
        }
    }

    init_tracing(&config_dir)?;

    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| config_dir.join("config.toml"));
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    let data_dir = args
        .data_dir
        .clone()
        .or_else(|| config.data_dir.clone())
        .unwrap_or_else(|| config_dir.clone());
    let storage = FileStorage::open(&data_dir)
        .with_context(|| format!("Failed to open data directory {}", data_dir.display()))?;

    let mut store = DocumentStore::load(Box::new(storage.clone()) as Box<dyn Storage>);

    if let Some(import_file) = &args.import {
        let document = transfer::read_document_file(import_file)
            .with_context(|| format!("Failed to import {}", import_file.display()))?;
        let backup = transfer::import_document(&mut store, document)
            .context("Failed to replace bookmarks; the previous ones are unchanged")?;
        if let Some(key) = backup {
            println!("Backed up previous bookmarks to: {}", storage.path_for(&key)?.display());
        }
        println!("Imported bookmarks from: {}", import_file.display());
    }

    if args.reset {
        store
            .reset_to_defaults()
            .context("Failed to reset bookmarks")?;
        println!("Bookmarks reset to defaults.");
    }

    if let Some(export_file) = &args.export {
        transfer::export_document(store.document(), export_file)
            .with_context(|| format!("Failed to export to {}", export_file.display()))?;
        println!("Exported bookmarks to: {}", export_file.display());
        return Ok(());
    }

    if let Some(query) = &args.filter {
        print_document(&search::filter(store.document(), query));
        return Ok(());
    }

    let mut keybindings = KeybindingRegistry::new();
    for warning in keybindings.apply_overrides(&config.keybindings) {
        tracing::warn!("{}", warning);
        eprintln!("Warning: {}", warning);
    }

    let prefs = PreferenceManager::load(&config, &storage);
    let mut app = App::new(store, prefs, keybindings, Box::new(SystemOpener));

    ui::run(&mut app).await?;

    println!("Goodbye!");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_and_import_conflict() {
        let err = Args::try_parse_from(["websync", "--reset", "--import", "backup.json"])
            .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);

        let args = Args::try_parse_from(["websync", "--import", "backup.json", "--export", "out.json"])
            .unwrap();
        assert!(!args.reset);
        assert_eq!(args.import, Some(PathBuf::from("backup.json")));
    }
}
