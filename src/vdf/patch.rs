use crate::app_id::AppId;
use crate::error::{InstallerError, Result};
use crate::vdf::{Document, Vdf};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

/// Suffix of the pre-edit copy written next to every patched file.
pub const BACKUP_SUFFIX: &str = "bak";

pub(crate) const APPS_SECTION: &str = "Apps";
pub(crate) const COMPAT_TOOL_MAPPING_SECTION: &str = "CompatToolMapping";
pub(crate) const LAUNCH_OPTIONS_KEY: &str = "LaunchOptions";

/// Priority Steam records for a compatibility tool picked by the user.
pub(crate) const COMPAT_TOOL_PRIORITY: &str = "250";

/// `<path>.bak`
pub fn backup_path(path: &Path) -> PathBuf {
    let mut s: OsString = path.as_os_str().to_os_string();
    s.push(".");
    s.push(BACKUP_SUFFIX);
    PathBuf::from(s)
}

/// Set `Apps/<app_id>/LaunchOptions`, creating the app block if needed.
///
/// Fails with [`InstallerError::MissingSection`] if the document has no `Apps` block.
pub fn set_launch_options(doc: &mut Document, app_id: &AppId, options: &str) -> Result<()> {
    let apps = required_section(doc, APPS_SECTION)?;
    let app = doc.child_or_insert(apps, app_id.as_str())?;
    doc.set_value(app, LAUNCH_OPTIONS_KEY, options)?;
    Ok(())
}

/// Map `app_id` to compatibility tool `tool` under `CompatToolMapping`.
///
/// Fails with [`InstallerError::MissingSection`] if the document has no `CompatToolMapping` block.
pub fn set_compat_tool(doc: &mut Document, app_id: &AppId, tool: &str) -> Result<()> {
    let mapping = required_section(doc, COMPAT_TOOL_MAPPING_SECTION)?;
    let app = doc.child_or_insert(mapping, app_id.as_str())?;
    let app = doc.set_value(app, "name", tool)?;
    let app = doc.set_value(app, "config", "")?;
    doc.set_value(app, "priority", COMPAT_TOOL_PRIORITY)?;
    Ok(())
}

/// [`set_launch_options`] applied to a file, with a backup written first.
pub fn patch_launch_options(path: &Path, app_id: &AppId, options: &str) -> Result<()> {
    patch_file(path, |doc| set_launch_options(doc, app_id, options))
}

/// [`set_compat_tool`] applied to a file, with a backup written first.
pub fn patch_compat_tool(path: &Path, app_id: &AppId, tool: &str) -> Result<()> {
    patch_file(path, |doc| set_compat_tool(doc, app_id, tool))
}

/// Read `path`, apply `edit`, back the original up to [`backup_path`] and write the result.
///
/// Nothing is written if reading or editing fails.
pub fn patch_file<F>(path: &Path, edit: F) -> Result<()>
where
    F: FnOnce(&mut Document) -> Result<()>,
{
    let original = fs::read_to_string(path).map_err(|source| InstallerError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let mut doc = Document::new(original.as_str());
    edit(&mut doc)?;

    commit(path, &original, doc.as_str(), |p, text| fs::write(p, text))
}

/// Write the backup, then hand the new text to `write`. The original is only
/// overwritten once the backup is on disk.
pub(crate) fn commit<W>(path: &Path, original: &str, updated: &str, write: W) -> Result<()>
where
    W: FnOnce(&Path, &str) -> std::io::Result<()>,
{
    let backup = backup_path(path);
    fs::write(&backup, original).map_err(|source| InstallerError::Backup {
        path: backup.clone(),
        source,
    })?;
    log::info!("backed up {} to {}", path.display(), backup.display());

    write(path, updated).map_err(|source| InstallerError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("wrote {}", path.display());
    Ok(())
}

/// Internal name of a compatibility tool descriptor (`compatibilitytool.vdf`).
///
/// This is the first block name under `compat_tools`, or a flat `internal_name` key.
pub fn internal_name(text: &str) -> Result<Option<String>> {
    let doc = Document::new(text);
    if let Some(tools) = doc.find_section("compat_tools")? {
        if let Some(first) = doc.child_names(tools)?.into_iter().next() {
            return Ok(Some(first));
        }
    }
    Ok(Vdf::parse(text)?.find_leaf("internal_name").map(str::to_string))
}

/// Human-readable `display_name` of a compatibility tool descriptor.
pub fn display_name(text: &str) -> Result<Option<String>> {
    Ok(Vdf::parse(text)?.find_leaf("display_name").map(str::to_string))
}

fn required_section(doc: &Document, name: &str) -> Result<crate::vdf::BlockSpan> {
    doc.find_section(name)?
        .ok_or_else(|| InstallerError::MissingSection {
            section: name.to_string(),
        })
}
