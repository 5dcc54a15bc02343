#![doc = r#"
`modloader-installer` prepares a Steam game for a Proton-hosted mod loader.

Core capabilities:
- Detect the Steam root, its libraries, installed compatibility tools and the game directory
- Edit Steam's VDF files structurally, touching only the block being changed
- Set per-profile `LaunchOptions` in `localconfig.vdf`
- Map the game to a compatibility tool in `config/config.vdf`

Every edited file gets a `<file>.bak` copy of its previous content before it is overwritten.
Steam rewrites these files on exit, so it must not be running while they are patched.
"#]

mod app_id;
mod error;
mod install;
mod launch;
mod prompt;
mod steam;
pub mod vdf;

pub use crate::app_id::AppId;
pub use crate::error::{InstallerError, Result};
pub use crate::install::{
    patch_compat_tool, patch_launch_options_all, Installer, PatchOutcome, SteamInstall, Verbosity,
};
pub use crate::launch::{DisplayServer, GpuClass, LaunchSettings, COMMAND_PLACEHOLDER, DEFAULT_DLL_OVERRIDE};
pub use crate::prompt::Prompter;

pub use crate::steam::compat::{compat_tools, current_compat_tool, CompatTool, ToolSource};
pub use crate::steam::consts::DEFAULT_APP_ID;
pub use crate::steam::library::{find_game_dir, library_roots};
pub use crate::steam::steam_root::detect_steam_root;
pub use crate::steam::userdata::{client_config_file, user_config_files};
