use crate::app_id::AppId;
use crate::error::{InstallerError, Result};
use crate::steam::consts::ENV_GAME_DIR;
use crate::vdf::Vdf;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Steam library roots: the client root itself plus every `path` listed in
/// `steamapps/libraryfolders.vdf`. Only roots with a `steamapps/` directory are kept.
pub fn library_roots(steam_root: &Path) -> Vec<PathBuf> {
    let mut seen: BTreeSet<PathBuf> = BTreeSet::new();
    let mut out: Vec<PathBuf> = Vec::new();

    if steam_root.join("steamapps").is_dir() && seen.insert(steam_root.to_path_buf()) {
        out.push(steam_root.to_path_buf());
    }

    let libraryfolders = steam_root.join("steamapps/libraryfolders.vdf");
    let Ok(txt) = fs::read_to_string(&libraryfolders) else {
        return out;
    };
    let vdf = match Vdf::parse(&txt) {
        Ok(v) => v,
        Err(e) => {
            log::warn!("ignoring {}: {e}", libraryfolders.display());
            return out;
        }
    };

    for (k, v) in vdf.entries() {
        let kl = k.to_ascii_lowercase();
        if !kl.starts_with("libraryfolders/") || !kl.ends_with("/path") {
            continue;
        }

        let p = PathBuf::from(v);
        if p.join("steamapps").is_dir() && seen.insert(p.clone()) {
            out.push(p);
        }
    }

    out
}

/// Install directory of `app_id`, resolved from `appmanifest_<id>.acf` in the first
/// library that has one. `MODLOADER_GAME_DIR` takes precedence when it names a directory.
pub fn find_game_dir(libraries: &[PathBuf], app_id: &AppId) -> Result<PathBuf> {
    if let Some(p) = std::env::var_os(ENV_GAME_DIR).map(PathBuf::from) {
        if p.is_dir() {
            return Ok(p);
        }
    }

    for lib in libraries {
        if let Some(dir) = game_dir_in_library(lib, app_id)? {
            log::debug!("app {app_id} installed at {}", dir.display());
            return Ok(dir);
        }
    }

    Err(InstallerError::GameNotFound {
        app_id: app_id.to_string(),
    })
}

fn game_dir_in_library(library_root: &Path, app_id: &AppId) -> Result<Option<PathBuf>> {
    let steamapps = library_root.join("steamapps");
    let manifest = steamapps.join(format!("appmanifest_{app_id}.acf"));
    let Ok(txt) = fs::read_to_string(&manifest) else {
        return Ok(None);
    };

    let vdf = Vdf::parse(&txt)?;
    let Some(installdir) = vdf.get("AppState/installdir") else {
        return Ok(None);
    };

    let dir = steamapps.join("common").join(installdir);
    Ok(dir.is_dir().then_some(dir))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn reads_extra_libraries_and_manifest() {
        let d = tempdir().unwrap();
        let root = d.path().join("Steam");
        let extra = d.path().join("Games");
        fs::create_dir_all(root.join("steamapps")).unwrap();
        fs::create_dir_all(extra.join("steamapps/common/Geometry Dash")).unwrap();

        fs::write(
            root.join("steamapps/libraryfolders.vdf"),
            format!(
                "\"libraryfolders\"\n{{\n\t\"0\"\n\t{{\n\t\t\"path\"\t\t\"{}\"\n\t}}\n\t\"1\"\n\t{{\n\t\t\"path\"\t\t\"{}\"\n\t\t\"apps\"\n\t\t{{\n\t\t\t\"322170\"\t\t\"1\"\n\t\t}}\n\t}}\n}}\n",
                root.display(),
                extra.display()
            ),
        )
        .unwrap();
        fs::write(
            extra.join("steamapps/appmanifest_322170.acf"),
            "\"AppState\"\n{\n\t\"appid\"\t\t\"322170\"\n\t\"installdir\"\t\t\"Geometry Dash\"\n}\n",
        )
        .unwrap();

        let libs = library_roots(&root);
        assert_eq!(libs, vec![root.clone(), extra.clone()]);

        let app: AppId = "322170".parse().unwrap();
        let dir = game_dir_in_library(&extra, &app).unwrap().unwrap();
        assert_eq!(dir, extra.join("steamapps/common/Geometry Dash"));
        assert!(game_dir_in_library(&root, &app).unwrap().is_none());
    }
}
