use crate::steam::consts::{CLIENT_CONFIG_REL, USER_LOCALCONFIG_REL};
use std::fs;
use std::path::{Path, PathBuf};

/// Every `userdata/<account>/config/localconfig.vdf`, one per local Steam profile,
/// sorted by path.
pub fn user_config_files(steam_root: &Path) -> Vec<PathBuf> {
    let Ok(rd) = fs::read_dir(steam_root.join("userdata")) else {
        return vec![];
    };

    let mut out: Vec<PathBuf> = rd
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().bytes().all(|b| b.is_ascii_digit()))
        .map(|e| e.path().join(USER_LOCALCONFIG_REL))
        .filter(|p| p.is_file())
        .collect();
    out.sort();
    out
}

/// The client-wide `config/config.vdf`, if present.
pub fn client_config_file(steam_root: &Path) -> Option<PathBuf> {
    let p = steam_root.join(CLIENT_CONFIG_REL);
    p.is_file().then_some(p)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn finds_profile_configs() {
        let d = tempdir().unwrap();
        for id in ["123", "456", "ac"] {
            let cfg = d.path().join("userdata").join(id).join("config");
            fs::create_dir_all(&cfg).unwrap();
            fs::write(cfg.join("localconfig.vdf"), "").unwrap();
        }
        fs::create_dir_all(d.path().join("userdata/789")).unwrap();

        let files = user_config_files(d.path());
        assert_eq!(
            files,
            vec![
                d.path().join("userdata/123/config/localconfig.vdf"),
                d.path().join("userdata/456/config/localconfig.vdf"),
            ]
        );
        assert_eq!(client_config_file(d.path()), None);
    }
}
