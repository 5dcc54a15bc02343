use anyhow::Context;
use clap::Parser;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use modloader_installer::{
    AppId, DisplayServer, GpuClass, Installer, LaunchSettings, Prompter, SteamInstall, Verbosity,
    DEFAULT_APP_ID, DEFAULT_DLL_OVERRIDE,
};

/// Configure Steam so a Proton game loads its mod loader.
#[derive(Parser)]
#[command(name = "modloader-install")]
struct Args {
    /// Steam client root (defaults to STEAM_ROOT or the usual locations).
    #[arg(long)]
    steam_root: Option<PathBuf>,

    /// Steam app id of the game.
    #[arg(long, default_value = DEFAULT_APP_ID)]
    app_id: AppId,

    /// GPU class: amd, intel, nvidia or other.
    #[arg(long)]
    gpu: Option<GpuClass>,

    /// Display server: x11 or wayland.
    #[arg(long)]
    display: Option<DisplayServer>,

    /// Compatibility tool internal name to force for the game.
    #[arg(long, conflicts_with = "keep_compat_tool")]
    compat_tool: Option<String>,

    /// Leave the game's compatibility tool as it is.
    #[arg(long)]
    keep_compat_tool: bool,

    /// DLL the mod loader proxies.
    #[arg(long, default_value = DEFAULT_DLL_OVERRIDE)]
    dll_override: String,

    /// Also enable PROTON_LOG in the launch options.
    #[arg(long)]
    proton_log: bool,

    /// Debug output (asked interactively when neither -v nor -q is given).
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Warnings and errors only.
    #[arg(short, long)]
    quiet: bool,

    /// Do not ask anything; use defaults for values not given as flags.
    #[arg(short, long)]
    yes: bool,
}

impl Args {
    fn verbosity(&self) -> Option<Verbosity> {
        if self.verbose {
            Some(Verbosity::Verbose)
        } else if self.quiet {
            Some(Verbosity::Quiet)
        } else {
            None
        }
    }
}

/// Everything the wizard gathered before touching Steam's files.
struct WizardConfig {
    verbosity: Verbosity,
    app_id: AppId,
    launch: LaunchSettings,
    compat_tool: Option<String>,
}

type StdPrompter = Prompter<io::StdinLock<'static>, io::Stdout>;

fn pick<T: Copy + PartialEq + ToString>(
    prompter: &mut Option<StdPrompter>,
    given: Option<T>,
    title: &str,
    all: &[T],
    default: T,
) -> anyhow::Result<T> {
    if let Some(v) = given {
        return Ok(v);
    }
    let Some(p) = prompter else {
        return Ok(default);
    };
    let labels: Vec<String> = all.iter().map(ToString::to_string).collect();
    let default_idx = all.iter().position(|v| *v == default).unwrap_or(0);
    Ok(all[p.choose(title, &labels, default_idx)?])
}

fn choose_compat_tool(
    prompter: &mut Option<StdPrompter>,
    args: &Args,
    steam: &SteamInstall,
) -> anyhow::Result<Option<String>> {
    if args.keep_compat_tool {
        return Ok(None);
    }
    if let Some(tool) = &args.compat_tool {
        if !steam.compat_tools().iter().any(|t| &t.name == tool) {
            log::warn!("compatibility tool {tool} is not installed as a custom tool");
        }
        return Ok(Some(tool.clone()));
    }

    let tools = steam.compat_tools();
    let Some(p) = prompter else {
        return Ok(None);
    };
    if tools.is_empty() {
        println!("No custom compatibility tools found, keeping Steam's choice.");
        return Ok(None);
    }

    let current = steam.current_compat_tool(&args.app_id);
    let mut labels = vec![format!(
        "Keep current ({})",
        current.as_deref().unwrap_or("Steam default")
    )];
    labels.extend(tools.iter().map(|t| t.display_name.clone()));

    let idx = p.choose("Compatibility tool:", &labels, 0)?;
    Ok(idx.checked_sub(1).map(|i| tools[i].name.clone()))
}

fn locate_steam(prompter: &mut Option<StdPrompter>, given: Option<&Path>) -> anyhow::Result<SteamInstall> {
    if let Some(root) = given {
        return Ok(SteamInstall::at(root));
    }
    let err = match SteamInstall::detect() {
        Ok(steam) => return Ok(steam),
        Err(e) => e,
    };
    let Some(p) = prompter else {
        return Err(err).context("pass --steam-root");
    };
    log::warn!("{err}");
    match p.path("Steam directory (empty to give up):")? {
        Some(root) if root.is_dir() => Ok(SteamInstall::at(root)),
        Some(root) => anyhow::bail!("{} is not a directory", root.display()),
        None => Err(err).context("locate Steam or pass --steam-root"),
    }
}

fn run(args: Args) -> anyhow::Result<bool> {
    let mut prompter: Option<StdPrompter> =
        (!args.yes).then(|| Prompter::new(io::stdin().lock(), io::stdout()));

    // Asked first: the logger is set up from the answer.
    let verbosity = pick(
        &mut prompter,
        args.verbosity(),
        "Verbosity:",
        &Verbosity::ALL,
        Verbosity::default(),
    )?;
    let level = verbosity.level_filter().to_string();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let steam = locate_steam(&mut prompter, args.steam_root.as_deref())?;
    log::info!("steam root: {}", steam.root().display());

    match steam.game_dir(&args.app_id) {
        Ok(dir) => println!("Game directory: {}", dir.display()),
        Err(e) => log::warn!("{e}; Steam settings are patched anyway"),
    }

    let gpu = pick(&mut prompter, args.gpu, "GPU:", &GpuClass::ALL, GpuClass::default())?;
    let display = pick(
        &mut prompter,
        args.display,
        "Display server:",
        &DisplayServer::ALL,
        DisplayServer::default(),
    )?;
    let config = WizardConfig {
        verbosity,
        app_id: args.app_id.clone(),
        launch: LaunchSettings {
            dll_override: args.dll_override.clone(),
            gpu,
            display,
            proton_log: args.proton_log,
        },
        compat_tool: choose_compat_tool(&mut prompter, &args, &steam)?,
    };
    log::debug!("verbosity {}, gpu {gpu}, display {display}", config.verbosity);

    let installer = Installer::new(steam, config.app_id)
        .launch_settings(config.launch)
        .compat_tool(config.compat_tool);

    println!("Launch options: {}", installer.launch_options());
    if installer.steam().user_configs().is_empty() {
        log::warn!("no Steam profiles found under {}/userdata", installer.steam().root().display());
    }

    if let Some(p) = prompter.as_mut() {
        if !p.confirm("Steam must be closed before continuing. Patch Steam config now?", true)? {
            println!("Nothing changed.");
            return Ok(true);
        }
    }

    let outcomes = installer.apply();
    for o in &outcomes {
        match &o.result {
            Ok(()) => println!("patched {}", o.path.display()),
            Err(e) => eprintln!("warning: {}: {e}", o.path.display()),
        }
    }
    Ok(outcomes.iter().all(|o| o.is_ok()))
}

fn main() -> ExitCode {
    match run(Args::parse()) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(2),
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
