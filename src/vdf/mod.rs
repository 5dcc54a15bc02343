//! Reading and structural editing of Valve's KeyValues text format (VDF).

mod document;
mod patch;
mod reader;
mod scan;

pub use document::Document;
pub use patch::{
    backup_path, display_name, internal_name, patch_compat_tool, patch_file,
    patch_launch_options, set_compat_tool, set_launch_options, BACKUP_SUFFIX,
};
pub use reader::Vdf;
pub use scan::BlockSpan;
