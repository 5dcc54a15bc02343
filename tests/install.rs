//! Integration tests for discovering and patching a whole Steam tree.
use modloader_installer::{
    AppId, DisplayServer, GpuClass, Installer, LaunchSettings, SteamInstall, ToolSource,
};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const LOCALCONFIG: &str = "\"UserLocalConfigStore\"\n{\n\t\"Software\"\n\t{\n\t\t\"Valve\"\n\t\t{\n\t\t\t\"Steam\"\n\t\t\t{\n\t\t\t\t\"apps\"\n\t\t\t\t{\n\t\t\t\t}\n\t\t\t}\n\t\t}\n\t}\n}\n";
const CONFIG: &str = "\"InstallConfigStore\"\n{\n\t\"Software\"\n\t{\n\t\t\"Valve\"\n\t\t{\n\t\t\t\"Steam\"\n\t\t\t{\n\t\t\t\t\"CompatToolMapping\"\n\t\t\t\t{\n\t\t\t\t}\n\t\t\t}\n\t\t}\n\t}\n}\n";

fn write(path: &Path, text: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, text).unwrap();
}

fn steam_tree(root: &Path) {
    fs::create_dir_all(root.join("steamapps/common/Geometry Dash")).unwrap();
    write(
        &root.join("steamapps/appmanifest_322170.acf"),
        "\"AppState\"\n{\n\t\"installdir\"\t\t\"Geometry Dash\"\n}\n",
    );
    write(&root.join("config/config.vdf"), CONFIG);
    write(&root.join("userdata/1001/config/localconfig.vdf"), LOCALCONFIG);
    write(
        &root.join("userdata/1002/config/localconfig.vdf"),
        "\"UserLocalConfigStore\"\n{\n}\n",
    );
    write(&root.join("userdata/1003/config/localconfig.vdf"), LOCALCONFIG);
    write(
        &root.join("compatibilitytools.d/GE-Proton9-1/compatibilitytool.vdf"),
        "\"compatibilitytools\"\n{\n\t\"compat_tools\"\n\t{\n\t\t\"GE-Proton9-1\"\n\t\t{\n\t\t\t\"display_name\"\t\"GE-Proton 9-1\"\n\t\t}\n\t}\n}\n",
    );
}

#[test]
fn detects_tree() {
    let d = tempdir().unwrap();
    steam_tree(d.path());

    let steam = SteamInstall::at(d.path());
    let app: AppId = "322170".parse().unwrap();
    assert_eq!(steam.libraries(), &[d.path().to_path_buf()]);
    assert_eq!(steam.user_configs().len(), 3);
    assert_eq!(
        steam.game_dir(&app).unwrap(),
        d.path().join("steamapps/common/Geometry Dash")
    );
    let user_tools: Vec<_> = steam
        .compat_tools()
        .iter()
        .filter(|t| t.source == ToolSource::User)
        .collect();
    assert_eq!(user_tools.len(), 1);
    assert_eq!(user_tools[0].display_name, "GE-Proton 9-1");
}

#[test]
fn applies_to_every_profile_and_continues_past_failures() {
    let d = tempdir().unwrap();
    steam_tree(d.path());

    let app: AppId = "322170".parse().unwrap();
    let installer = Installer::new(SteamInstall::at(d.path()), app.clone())
        .launch_settings(LaunchSettings {
            gpu: GpuClass::Nvidia,
            display: DisplayServer::X11,
            ..LaunchSettings::default()
        })
        .compat_tool(Some("GE-Proton9-1".into()));

    let outcomes = installer.apply();
    assert_eq!(outcomes.len(), 4);
    assert_eq!(outcomes.iter().filter(|o| o.is_ok()).count(), 3);
    assert!(!outcomes[1].is_ok());

    for id in ["1001", "1003"] {
        let text = fs::read_to_string(d.path().join(format!("userdata/{id}/config/localconfig.vdf"))).unwrap();
        assert!(text.contains(
            "\t\t\t\t\t\"322170\"\n\t\t\t\t\t{\n\t\t\t\t\t\t\"LaunchOptions\"\t\t\"WINEDLLOVERRIDES=\\\"xinput1_4=n,b\\\" PROTON_ENABLE_NVAPI=1 %command%\"\n\t\t\t\t\t}\n"
        ));
    }

    let steam = SteamInstall::at(d.path());
    assert_eq!(steam.current_compat_tool(&app).as_deref(), Some("GE-Proton9-1"));
    assert_eq!(
        fs::read_to_string(d.path().join("config/config.vdf.bak")).unwrap(),
        CONFIG
    );
}
