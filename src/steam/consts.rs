/// Steam App ID of the game the installer targets by default (Geometry Dash).
pub const DEFAULT_APP_ID: &str = "322170";

/// Env override for the Steam client root.
pub(crate) const ENV_STEAM_ROOT: &str = "STEAM_ROOT";

/// Env override for the installed game directory.
pub(crate) const ENV_GAME_DIR: &str = "MODLOADER_GAME_DIR";

/// Per-install and system-wide locations of custom compatibility tools.
pub(crate) const COMPAT_TOOLS_DIR_NAME: &str = "compatibilitytools.d";
pub(crate) const SYSTEM_COMPAT_TOOLS_DIR: &str = "/usr/share/steam/compatibilitytools.d";
pub(crate) const COMPAT_TOOL_DESCRIPTOR: &str = "compatibilitytool.vdf";

/// Relative locations of the files the installer patches.
pub(crate) const CLIENT_CONFIG_REL: &str = "config/config.vdf";
pub(crate) const USER_LOCALCONFIG_REL: &str = "config/localconfig.vdf";
