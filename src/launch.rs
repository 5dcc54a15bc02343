use std::fmt;
use std::str::FromStr;

/// Steam placeholder replaced by the game's own command line.
pub const COMMAND_PLACEHOLDER: &str = "%command%";

/// DLL the mod loader ships as a proxy; Wine must load it native-then-builtin.
pub const DEFAULT_DLL_OVERRIDE: &str = "xinput1_4";

/// GPU vendor class, as picked in the wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GpuClass {
    Amd,
    Intel,
    Nvidia,
    #[default]
    Other,
}

/// Display server class, as picked in the wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayServer {
    #[default]
    X11,
    Wayland,
}

impl GpuClass {
    /// Menu order used by the wizard.
    pub const ALL: [GpuClass; 4] = [Self::Amd, Self::Intel, Self::Nvidia, Self::Other];
}

impl DisplayServer {
    /// Menu order used by the wizard.
    pub const ALL: [DisplayServer; 2] = [Self::X11, Self::Wayland];
}

impl fmt::Display for GpuClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Amd => "amd",
            Self::Intel => "intel",
            Self::Nvidia => "nvidia",
            Self::Other => "other",
        })
    }
}

impl FromStr for GpuClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|g| g.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown gpu class {s:?} (expected amd, intel, nvidia or other)"))
    }
}

impl fmt::Display for DisplayServer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::X11 => "x11",
            Self::Wayland => "wayland",
        })
    }
}

impl FromStr for DisplayServer {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|d| d.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown display server {s:?} (expected x11 or wayland)"))
    }
}

/// Inputs for the Steam launch options string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchSettings {
    pub dll_override: String,
    pub gpu: GpuClass,
    pub display: DisplayServer,
    /// Ask Proton to write `steam-<appid>.log`.
    pub proton_log: bool,
}

impl Default for LaunchSettings {
    fn default() -> Self {
        Self {
            dll_override: DEFAULT_DLL_OVERRIDE.to_string(),
            gpu: GpuClass::default(),
            display: DisplayServer::default(),
            proton_log: false,
        }
    }
}

impl LaunchSettings {
    /// Environment assignments, in the order they are written.
    pub fn env(&self) -> Vec<(&'static str, String)> {
        let mut env = vec![(
            "WINEDLLOVERRIDES",
            format!("\"{}=n,b\"", self.dll_override),
        )];
        if self.gpu == GpuClass::Nvidia {
            env.push(("PROTON_ENABLE_NVAPI", "1".into()));
        }
        if self.display == DisplayServer::Wayland {
            env.push(("PROTON_ENABLE_WAYLAND", "1".into()));
        }
        if self.proton_log {
            env.push(("PROTON_LOG", "1".into()));
        }
        env
    }

    /// `KEY=value ... %command%`
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (k, v) in self.env() {
            out.push_str(k);
            out.push('=');
            out.push_str(&v);
            out.push(' ');
        }
        out.push_str(COMMAND_PLACEHOLDER);
        out
    }
}
