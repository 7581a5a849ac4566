use blackboard::Mode;
use blackboard::core::config::{self, CliOverrides, ResolvedConfig};
use blackboard::core::export::Export;
use blackboard::core::state::Surface;
use blackboard::core::storage::{self, FileStore};
use blackboard::tui;
use clap::Parser;
use simplelog::{ConfigBuilder, WriteLogger};
use std::fs::{self, File};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "blackboard", about = "A minimal editor with slash commands")]
struct Args {
    /// Editing surface to open
    #[arg(short, long, value_enum)]
    mode: Option<Mode>,

    /// Directory holding the saved document and the log file
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Directory that receives exported Markdown
    #[arg(long)]
    export_dir: Option<PathBuf>,

    /// Export the saved document to Markdown and exit
    #[arg(long)]
    export: bool,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();

    let file_config = config::load_config().unwrap_or_else(|e| {
        eprintln!("{e}; falling back to defaults");
        config::BlackboardConfig::default()
    });
    let config = config::resolve(
        &file_config,
        &CliOverrides {
            mode: args.mode,
            data_dir: args.data_dir,
            export_dir: args.export_dir,
        },
    );

    // Initialize file logger - writes to blackboard.log in the data directory
    fs::create_dir_all(&config.data_dir)?;
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    if let Ok(log_file) = File::create(config.data_dir.join("blackboard.log")) {
        let _ = WriteLogger::init(config.log_level, log_config, log_file);
    }

    log::info!(
        "Blackboard starting up in {} mode (data dir {})",
        config.mode.label(),
        config.data_dir.display()
    );
    for warning in &config.warnings {
        log::warn!("{}", warning);
    }

    if args.export {
        return export_once(&config);
    }

    tui::run(config)
}

/// Write the saved document to `blackboard-YYYY-MM-DD.md` without opening the editor.
fn export_once(config: &ResolvedConfig) -> std::io::Result<()> {
    let store = FileStore::new(&config.data_dir)?;
    let surface = Surface::from_snapshot(config.mode, storage::load(&store));
    let path = surface.export(Export::today()).write_to(&config.export_dir)?;
    println!("{}", path.display());
    Ok(())
}
