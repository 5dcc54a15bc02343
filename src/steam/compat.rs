use crate::app_id::AppId;
use crate::error::Result;
use crate::steam::consts::*;
use crate::vdf::{self, Vdf};
use std::fs;
use std::path::{Path, PathBuf};

/// Where a compatibility tool was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolSource {
    /// `<steam root>/compatibilitytools.d`
    User,
    /// `/usr/share/steam/compatibilitytools.d`
    System,
}

/// An installed custom compatibility tool (e.g. GE-Proton).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompatTool {
    /// Internal name, the value Steam stores in `CompatToolMapping`.
    pub name: String,
    /// Label shown to the user.
    pub display_name: String,
    /// Directory holding `compatibilitytool.vdf`.
    pub dir: PathBuf,
    pub source: ToolSource,
}

/// Installed compatibility tools, user-installed first, each group sorted by directory name.
///
/// Descriptors that cannot be read or carry no internal name are skipped.
pub fn compat_tools(steam_root: &Path) -> Vec<CompatTool> {
    let mut out = Vec::new();
    let dirs = [
        (steam_root.join(COMPAT_TOOLS_DIR_NAME), ToolSource::User),
        (PathBuf::from(SYSTEM_COMPAT_TOOLS_DIR), ToolSource::System),
    ];
    for (dir, source) in dirs {
        out.extend(tools_in(&dir, source));
    }
    out
}

fn tools_in(dir: &Path, source: ToolSource) -> Vec<CompatTool> {
    let Ok(rd) = fs::read_dir(dir) else {
        return vec![];
    };

    let mut tool_dirs: Vec<PathBuf> = rd
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.join(COMPAT_TOOL_DESCRIPTOR).is_file())
        .collect();
    tool_dirs.sort();

    tool_dirs
        .into_iter()
        .filter_map(|tool_dir| match read_descriptor(&tool_dir, source) {
            Ok(tool) => tool,
            Err(e) => {
                log::warn!("skipping compatibility tool {}: {e}", tool_dir.display());
                None
            }
        })
        .collect()
}

fn read_descriptor(tool_dir: &Path, source: ToolSource) -> Result<Option<CompatTool>> {
    let txt = fs::read_to_string(tool_dir.join(COMPAT_TOOL_DESCRIPTOR))?;
    let Some(name) = vdf::internal_name(&txt)? else {
        return Ok(None);
    };
    let display_name = vdf::display_name(&txt)?.unwrap_or_else(|| name.clone());
    Ok(Some(CompatTool {
        name,
        display_name,
        dir: tool_dir.to_path_buf(),
        source,
    }))
}

/// Tool currently mapped to `app_id` in `config/config.vdf`, if any.
pub fn current_compat_tool(steam_root: &Path, app_id: &AppId) -> Option<String> {
    let txt = fs::read_to_string(steam_root.join(CLIENT_CONFIG_REL)).ok()?;
    let cfg = Vdf::parse(&txt).ok()?;

    let suffix = format!("compattoolmapping/{app_id}/name");
    let found = cfg
        .entries()
        .find(|(k, _)| k.to_ascii_lowercase().ends_with(&suffix))
        .map(|(_, v)| v.to_string())
        .filter(|v| !v.is_empty());
    found
}
