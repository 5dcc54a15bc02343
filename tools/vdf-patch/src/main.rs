use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use modloader_installer::{vdf, AppId};

/// Read and patch Steam VDF files. Close Steam before patching.
#[derive(Parser)]
#[command(name = "vdf-patch")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the internal name of a compatibility tool descriptor
    InternalName { path: PathBuf },
    /// Print the display name of a compatibility tool descriptor
    DisplayName { path: PathBuf },
    /// Set Apps/<app-id>/LaunchOptions in a localconfig.vdf
    LaunchOpts {
        path: PathBuf,
        app_id: AppId,
        /// Full launch options string, e.g. 'FOO=1 %command%'
        options: String,
    },
    /// Map <app-id> to a compatibility tool in config.vdf
    CompatTool {
        path: PathBuf,
        app_id: AppId,
        tool: String,
    },
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::InternalName { path } => {
            if let Some(name) = vdf::internal_name(&fs::read_to_string(&path)?)? {
                println!("{name}");
            }
        }
        Command::DisplayName { path } => {
            if let Some(name) = vdf::display_name(&fs::read_to_string(&path)?)? {
                println!("{name}");
            }
        }
        Command::LaunchOpts {
            path,
            app_id,
            options,
        } => {
            vdf::patch_launch_options(&path, &app_id, &options)?;
            println!("OK");
        }
        Command::CompatTool { path, app_id, tool } => {
            vdf::patch_compat_tool(&path, &app_id, &tool)?;
            println!("OK");
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
