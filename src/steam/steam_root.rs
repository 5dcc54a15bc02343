use crate::steam::consts::ENV_STEAM_ROOT;
use std::path::{Path, PathBuf};

/// Locate the Steam client root (the directory holding `steamapps/` and `config/`).
///
/// Checks `STEAM_ROOT`, then the usual native and Flatpak locations on Linux, or the
/// registry and default install paths on Windows.
pub fn detect_steam_root() -> Option<PathBuf> {
    if let Some(p) = std::env::var_os(ENV_STEAM_ROOT).map(PathBuf::from) {
        if looks_like_steam_root(&p) {
            return Some(p);
        }
        log::warn!("{ENV_STEAM_ROOT}={} is not a steam root, ignoring", p.display());
    }

    let found = platform_candidates()
        .into_iter()
        .find(|p| looks_like_steam_root(p));
    if let Some(p) = &found {
        log::debug!("steam root: {}", p.display());
    }
    found
}

pub(crate) fn looks_like_steam_root(p: &Path) -> bool {
    p.join("config/config.vdf").is_file() || p.join("steamapps").is_dir()
}

#[cfg(target_os = "linux")]
fn platform_candidates() -> Vec<PathBuf> {
    let Some(home) = std::env::var_os("HOME").map(PathBuf::from) else {
        return vec![];
    };
    vec![
        home.join(".steam/steam"),
        home.join(".steam/root"),
        home.join(".local/share/Steam"),
        home.join(".var/app/com.valvesoftware.Steam/.steam/steam"),
        home.join(".var/app/com.valvesoftware.Steam/.local/share/Steam"),
    ]
}

#[cfg(target_os = "windows")]
fn platform_candidates() -> Vec<PathBuf> {
    let mut out = Vec::new();
    out.extend(detect_from_registry(winreg::enums::HKEY_CURRENT_USER));
    out.extend(detect_from_registry(winreg::enums::HKEY_LOCAL_MACHINE));
    out.push(PathBuf::from(r"C:\Program Files (x86)\Steam"));
    out.push(PathBuf::from(r"C:\Program Files\Steam"));
    out
}

#[cfg(not(any(target_os = "linux", target_os = "windows")))]
fn platform_candidates() -> Vec<PathBuf> {
    vec![]
}

#[cfg(target_os = "windows")]
fn detect_from_registry(root: winreg::HKEY) -> Option<PathBuf> {
    use winreg::RegKey;

    let hk = RegKey::predef(root);
    let steam = hk.open_subkey(r"Software\Valve\Steam").ok()?;

    if let Ok(dir) = steam.get_value::<String, _>("SteamPath") {
        return Some(PathBuf::from(dir.trim_matches('"')));
    }

    steam
        .get_value::<String, _>("SteamExe")
        .ok()
        .and_then(|exe| PathBuf::from(exe.trim_matches('"')).parent().map(Path::to_path_buf))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn recognizes_root_by_config_or_steamapps() {
        let d = tempdir().unwrap();
        assert!(!looks_like_steam_root(d.path()));

        fs::create_dir_all(d.path().join("config")).unwrap();
        fs::write(d.path().join("config/config.vdf"), "").unwrap();
        assert!(looks_like_steam_root(d.path()));

        let e = tempdir().unwrap();
        fs::create_dir_all(e.path().join("steamapps")).unwrap();
        assert!(looks_like_steam_root(e.path()));
    }
}
