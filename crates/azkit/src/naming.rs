//! Resource naming rules enforced by the Resource Manager.

use crate::error::{Error, Result};
use regex::Regex;
use std::sync::LazyLock;

const DISK_NAME_MAX: usize = 80;
const RESOURCE_GROUP_NAME_MAX: usize = 90;

static DISK_NAME_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_.\-]+$").expect("valid disk name pattern"));

static RESOURCE_GROUP_NAME_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w.()\-]+$").expect("valid resource group name pattern"));

/// Check a managed disk name.
///
/// 1-80 characters of letters, digits, `_`, `.` and `-`; starts with a
/// letter or digit and ends with a letter, digit or `_`.
pub fn validate_disk_name(name: &str) -> Result<()> {
    let invalid = |reason| Error::InvalidName {
        kind: "disk",
        name: name.to_string(),
        reason,
    };

    if name.is_empty() {
        return Err(invalid("must not be empty"));
    }
    if name.chars().count() > DISK_NAME_MAX {
        return Err(invalid("must be at most 80 characters"));
    }
    if !DISK_NAME_CHARS.is_match(name) {
        return Err(invalid(
            "may only contain letters, digits, '_', '.' and '-'",
        ));
    }
    if !name.starts_with(|c: char| c.is_ascii_alphanumeric()) {
        return Err(invalid("must start with a letter or digit"));
    }
    if !name.ends_with(|c: char| c.is_ascii_alphanumeric() || c == '_') {
        return Err(invalid("must end with a letter, digit or '_'"));
    }
    Ok(())
}

/// Check a resource group name.
///
/// 1-90 characters of word characters, `.`, `(`, `)` and `-`; must not end
/// with a period.
pub fn validate_resource_group_name(name: &str) -> Result<()> {
    let invalid = |reason| Error::InvalidName {
        kind: "resource group",
        name: name.to_string(),
        reason,
    };

    if name.is_empty() {
        return Err(invalid("must not be empty"));
    }
    if name.chars().count() > RESOURCE_GROUP_NAME_MAX {
        return Err(invalid("must be at most 90 characters"));
    }
    if !RESOURCE_GROUP_NAME_CHARS.is_match(name) {
        return Err(invalid(
            "may only contain letters, digits, '_', '.', '(', ')' and '-'",
        ));
    }
    if name.ends_with('.') {
        return Err(invalid("must not end with a period"));
    }
    Ok(())
}
