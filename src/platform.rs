use std::collections::HashMap;
use std::env;
use std::fs;

/// Platform identifier used to key catalog lookups when none is given.
///
/// Linux hosts report their distribution (`ubuntu-22.04`), falling back to
/// `<os>-<arch>` everywhere else.
pub fn current_platform() -> String {
    let os = normalize_platform(env::consts::OS);

    if os == "linux" {
        if let Some(platform) = fs::read_to_string("/etc/os-release")
            .ok()
            .and_then(|contents| os_release_platform(&contents))
        {
            return platform;
        }
    }

    format!("{}-{}", os, normalize_platform(env::consts::ARCH))
}

/// Lowercased, trimmed form used for every platform comparison.
pub fn normalize_platform(value: &str) -> String {
    value.trim().to_ascii_lowercase()
}

/// `<id>-<version_id>` from the contents of an `os-release` file.
pub fn os_release_platform(contents: &str) -> Option<String> {
    let mut values = HashMap::new();
    for line in contents.lines() {
        if let Some((key, value)) = line.split_once('=') {
            let trimmed = value.trim().trim_matches('"').trim().to_ascii_lowercase();
            values.insert(key.trim().to_ascii_lowercase(), trimmed);
        }
    }

    let id = values.get("id").filter(|id| !id.is_empty())?;
    match values.get("version_id").filter(|version| !version.is_empty()) {
        Some(version) => Some(format!("{id}-{version}")),
        None => Some(id.clone()),
    }
}
