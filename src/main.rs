use camino::Utf8PathBuf;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use mod_packer_lib::commands::{self, build, install, recover, validate};
use mod_packer_lib::config::AppSettings;
use mod_packer_lib::models::error::PackError;
use mod_packer_lib::models::pack::PackType;
use mod_packer_lib::utils::logging;
use std::io::{BufRead, Write};
use std::process::ExitCode;
use tracing::{error, warn};

#[derive(Parser)]
#[command(name = "pack", version, about = "Build, validate, install and recover modpacks")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Export a pack archive from an authoring directory holding pack.toml
    Build {
        source: Utf8PathBuf,
        output: Utf8PathBuf,
    },
    /// Check a pack archive without installing it
    Validate { archive: Utf8PathBuf },
    /// Print the manifest of a pack archive
    Info { archive: Utf8PathBuf },
    /// Install a pack into a game data root
    Install {
        archive: Utf8PathBuf,
        target: Utf8PathBuf,
        /// Use this policy instead of the pack's own
        #[arg(long, value_enum)]
        policy: Option<Policy>,
        /// Move raw backups here instead of leaving them in the data root
        #[arg(long)]
        backup_dir: Option<Utf8PathBuf>,
    },
    /// Restore a data root from a recovery unit
    Recover {
        target: Utf8PathBuf,
        /// Recovery unit to restore; defaults to the newest one
        #[arg(long)]
        unit: Option<Utf8PathBuf>,
        /// Do not ask for confirmation
        #[arg(long)]
        yes: bool,
    },
    /// List the recovery units of a data root, newest first
    Backups { target: Utf8PathBuf },
}

#[derive(Clone, Copy, ValueEnum)]
enum Policy {
    Distribute,
    Shadow,
    Override,
}

impl From<Policy> for PackType {
    fn from(p: Policy) -> Self {
        match p {
            Policy::Distribute => PackType::Distribute,
            Policy::Shadow => PackType::Shadow,
            Policy::Override => PackType::Override,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let settings = AppSettings::load().unwrap_or_else(|e| {
        eprintln!("failed to load settings, using defaults: {e}");
        AppSettings::default()
    });
    let level = if cli.verbose > 0 {
        logging::level_for(cli.verbose).to_string()
    } else {
        settings.log_level.clone()
    };
    let _guard = logging::init(&level);

    match run(cli.command, settings).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

async fn run(command: Command, settings: AppSettings) -> Result<(), PackError> {
    match command {
        Command::Build { source, output } => {
            let (tx, printer) = commands::status_channel();
            let written = commands::settle(build::build(source, output, tx).await, printer).await?;
            println!("{written}");
        }
        Command::Validate { archive } => {
            let (tx, printer) = commands::status_channel();
            let report = commands::settle(validate::validate(archive, tx).await, printer).await?;

            println!(
                "{} {} by {} ({}): {} mods, {} files",
                report.manifest.display_name,
                report.manifest.version,
                report.manifest.author,
                report.manifest.pack_type,
                report.manifest.mods.len(),
                report.files.len()
            );
            for file in &report.files {
                println!("  file: {file}");
            }
            println!("status {}", report.status);
            for problem in report.status.describe() {
                println!("  {problem}");
            }
            for unmet in &report.unmet {
                println!("  unmet: {unmet}");
            }
            report.outcome()?;
        }
        Command::Info { archive } => {
            let manifest = validate::info(&archive)?;
            println!("{}", serde_json::to_string_pretty(&manifest)?);
        }
        Command::Install {
            archive,
            target,
            policy,
            backup_dir,
        } => {
            let request = install::InstallRequest {
                archive,
                target,
                policy: policy.map(PackType::from),
                backup_dir: backup_dir.or(settings.backup_dir),
            };
            let (tx, printer) = commands::status_channel();
            let report = commands::settle(install::install(request, tx).await, printer).await?;

            println!(
                "{}: {} imported, {} unchanged, {} files copied, {} skipped",
                report.policy,
                report.imported.len(),
                report.unchanged.len(),
                report.files_copied,
                report.files_skipped
            );
            if let Some(backup) = report.backup {
                println!("backup: {backup}");
            }
        }
        Command::Recover { target, unit, yes } => {
            let chosen = recover::pending_unit(&target, unit.as_ref())?;
            if !yes && !confirm(&format!("Restore {target} from {chosen}? Everything else is deleted."))? {
                warn!("recovery aborted");
                return Ok(());
            }

            let (tx, printer) = commands::status_channel();
            let result = recover::recover(target, Some(chosen), tx).await;
            let report = commands::settle(result, printer).await?;

            println!("restored {} files from {}", report.restored, report.unit);
            if report.verified == Some(false) {
                println!("warning: restored files do not match the recorded digest");
            }
        }
        Command::Backups { target } => {
            let units = recover::backups(&target)?;
            if units.is_empty() {
                println!("no recovery units in {target}");
            }
            for unit in units {
                let state = if unit.enabled { "enabled" } else { "disabled" };
                println!("{}\t{}\t{state}\t{}", unit.created, unit.name, unit.file);
            }
        }
    }
    Ok(())
}

fn confirm(prompt: &str) -> Result<bool, PackError> {
    print!("{prompt} [y/N] ");
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}
