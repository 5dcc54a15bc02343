//! Steam client discovery: install root, libraries, compatibility tools and the
//! configuration files the installer edits.

pub(crate) mod compat;
pub(crate) mod consts;
pub(crate) mod library;
pub(crate) mod steam_root;
pub(crate) mod userdata;
