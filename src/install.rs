use crate::app_id::AppId;
use crate::error::{InstallerError, Result};
use crate::launch::LaunchSettings;
use crate::steam::compat::{self, CompatTool};
use crate::steam::{library, steam_root, userdata};
use crate::vdf;
use std::fmt;
use std::path::{Path, PathBuf};

/// How chatty the installer is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Warnings and errors only.
    Quiet,
    /// Progress lines for each file written.
    #[default]
    Normal,
    /// Also every block and key located or created.
    Verbose,
}

impl Verbosity {
    /// Menu order used by the wizard.
    pub const ALL: [Verbosity; 3] = [Self::Quiet, Self::Normal, Self::Verbose];

    /// Log level used when `RUST_LOG` is not set.
    pub fn level_filter(self) -> log::LevelFilter {
        match self {
            Self::Quiet => log::LevelFilter::Warn,
            Self::Normal => log::LevelFilter::Info,
            Self::Verbose => log::LevelFilter::Debug,
        }
    }
}

impl fmt::Display for Verbosity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Quiet => "quiet",
            Self::Normal => "normal",
            Self::Verbose => "verbose",
        })
    }
}

/// Snapshot of a Steam client installation and everything the installer edits in it.
#[derive(Debug, Clone)]
pub struct SteamInstall {
    root: PathBuf,
    libraries: Vec<PathBuf>,
    compat_tools: Vec<CompatTool>,
    user_configs: Vec<PathBuf>,
    client_config: Option<PathBuf>,
}

impl SteamInstall {
    /// Detect Steam on this machine.
    pub fn detect() -> Result<Self> {
        let root = steam_root::detect_steam_root().ok_or(InstallerError::SteamNotFound)?;
        Ok(Self::at(root))
    }

    /// Inspect a Steam root given explicitly.
    pub fn at(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            libraries: library::library_roots(&root),
            compat_tools: compat::compat_tools(&root),
            user_configs: userdata::user_config_files(&root),
            client_config: userdata::client_config_file(&root),
            root,
        }
    }

    /// Steam client root this snapshot was taken from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Library roots, client root first.
    pub fn libraries(&self) -> &[PathBuf] {
        &self.libraries
    }

    /// Installed custom compatibility tools.
    pub fn compat_tools(&self) -> &[CompatTool] {
        &self.compat_tools
    }

    /// One `localconfig.vdf` per local Steam profile.
    pub fn user_configs(&self) -> &[PathBuf] {
        &self.user_configs
    }

    /// `config/config.vdf`, if Steam has written one.
    pub fn client_config(&self) -> Option<&Path> {
        self.client_config.as_deref()
    }

    /// Install directory of `app_id`.
    pub fn game_dir(&self, app_id: &AppId) -> Result<PathBuf> {
        library::find_game_dir(&self.libraries, app_id)
    }

    /// Compatibility tool currently mapped to `app_id`.
    pub fn current_compat_tool(&self, app_id: &AppId) -> Option<String> {
        compat::current_compat_tool(&self.root, app_id)
    }
}

/// Result of patching one file.
#[derive(Debug)]
pub struct PatchOutcome {
    /// File that was patched.
    pub path: PathBuf,
    /// Why it failed, if it did. A failed file is left unchanged.
    pub result: Result<()>,
}

impl PatchOutcome {
    /// Whether the file was written.
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Set launch options in every file. A failure is logged and the next file is still patched.
pub fn patch_launch_options_all(files: &[PathBuf], app_id: &AppId, options: &str) -> Vec<PatchOutcome> {
    files
        .iter()
        .map(|path| {
            let result = vdf::patch_launch_options(path, app_id, options);
            report(path, result)
        })
        .collect()
}

/// Map `app_id` to `tool` in the client config.
pub fn patch_compat_tool(file: &Path, app_id: &AppId, tool: &str) -> PatchOutcome {
    report(file, vdf::patch_compat_tool(file, app_id, tool))
}

fn report(path: &Path, result: Result<()>) -> PatchOutcome {
    match &result {
        Ok(()) => log::info!("patched {}", path.display()),
        Err(e) => log::warn!("could not patch {}: {e}", path.display()),
    }
    PatchOutcome {
        path: path.to_path_buf(),
        result,
    }
}

/// Applies the installer's Steam configuration changes for one game.
#[derive(Debug, Clone)]
pub struct Installer {
    steam: SteamInstall,
    app_id: AppId,
    launch: LaunchSettings,
    compat_tool: Option<String>,
}

impl Installer {
    /// Installer for `app_id` with default launch settings and no compatibility tool change.
    pub fn new(steam: SteamInstall, app_id: AppId) -> Self {
        Self {
            steam,
            app_id,
            launch: LaunchSettings::default(),
            compat_tool: None,
        }
    }

    /// Settings used to render the launch options.
    pub fn launch_settings(mut self, settings: LaunchSettings) -> Self {
        self.launch = settings;
        self
    }

    /// Compatibility tool to force for the game. `None` leaves Steam's choice alone.
    pub fn compat_tool(mut self, tool: Option<String>) -> Self {
        self.compat_tool = tool;
        self
    }

    /// The Steam installation being patched.
    pub fn steam(&self) -> &SteamInstall {
        &self.steam
    }

    /// The launch options string that will be written.
    pub fn launch_options(&self) -> String {
        self.launch.render()
    }

    /// Patch every profile's launch options, then the compatibility tool mapping.
    ///
    /// Each file is attempted regardless of earlier failures; inspect the outcomes.
    pub fn apply(&self) -> Vec<PatchOutcome> {
        let options = self.launch_options();
        let mut outcomes =
            patch_launch_options_all(self.steam.user_configs(), &self.app_id, &options);

        if let Some(tool) = &self.compat_tool {
            match self.steam.client_config() {
                Some(cfg) => outcomes.push(patch_compat_tool(cfg, &self.app_id, tool)),
                None => log::warn!(
                    "no config/config.vdf under {}, compatibility tool not set",
                    self.steam.root().display()
                ),
            }
        }

        outcomes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn one_bad_profile_does_not_stop_the_rest() {
        let d = tempdir().unwrap();
        let good = d.path().join("good.vdf");
        let bad = d.path().join("bad.vdf");
        let missing = d.path().join("missing.vdf");
        fs::write(&good, "\"Apps\"\n{\n}\n").unwrap();
        fs::write(&bad, "\"Other\"\n{\n}\n").unwrap();

        let app: AppId = "322170".parse().unwrap();
        let outcomes = patch_launch_options_all(
            &[bad.clone(), missing.clone(), good.clone()],
            &app,
            "%command%",
        );

        assert_eq!(outcomes.len(), 3);
        assert!(matches!(outcomes[0].result, Err(InstallerError::MissingSection { .. })));
        assert!(matches!(outcomes[1].result, Err(InstallerError::Read { .. })));
        assert!(outcomes[2].is_ok());
        assert!(fs::read_to_string(&good).unwrap().contains("\"LaunchOptions\"\t\t\"%command%\""));
        assert_eq!(fs::read_to_string(&bad).unwrap(), "\"Other\"\n{\n}\n");
        assert!(!vdf::backup_path(&bad).exists());
    }

    #[test]
    fn verbosity_levels() {
        assert_eq!(Verbosity::Quiet.level_filter(), log::LevelFilter::Warn);
        assert_eq!(Verbosity::default().level_filter(), log::LevelFilter::Info);
        assert_eq!(Verbosity::Verbose.level_filter(), log::LevelFilter::Debug);
        let labels: Vec<String> = Verbosity::ALL.iter().map(ToString::to_string).collect();
        assert_eq!(labels, ["quiet", "normal", "verbose"]);
    }

    #[test]
    fn installer_without_profiles_or_config_patches_nothing() {
        let d = tempdir().unwrap();
        let installer = Installer::new(SteamInstall::at(d.path()), "322170".parse().unwrap())
            .compat_tool(Some("GE-Proton9-1".to_string()));
        assert_eq!(installer.steam().root(), d.path());
        assert!(installer.apply().is_empty());
    }
}
