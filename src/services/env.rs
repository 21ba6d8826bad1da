//! Process environment
//! Editors started from a desktop launcher often have a minimal PATH, so the
//! assistant would not be found. The spawned process gets an extended PATH
//! with Homebrew, user-local and nvm locations.

use std::fs;
use std::path::Path;

/// `bin` of the nvm default node, or of the newest one installed. An alias
/// like `20` picks the newest `v20.x.y`.
pub fn nvm_node_bin(home: &str) -> Option<String> {
    let nvm = Path::new(home).join(".nvm");
    let versions_dir = nvm.join("versions").join("node");

    let mut versions: Vec<String> = fs::read_dir(&versions_dir)
        .ok()?
        .filter_map(|entry| entry.ok()?.file_name().into_string().ok())
        .filter(|name| name.starts_with('v'))
        .collect();
    sort_versions_semver(&mut versions);

    let alias = fs::read_to_string(nvm.join("alias").join("default")).ok();
    let alias = alias.as_deref().map(str::trim).filter(|a| !a.is_empty());
    let matches_alias = |version: &&String, alias: &str| {
        let bare = version.trim_start_matches('v');
        bare == alias || bare.starts_with(&format!("{}.", alias))
    };

    let selected = alias
        .and_then(|alias| versions.iter().rev().find(|v| matches_alias(v, alias)))
        .or_else(|| versions.last())?;

    let bin = versions_dir.join(selected).join("bin");
    bin.is_dir().then(|| bin.to_string_lossy().into_owned())
}

/// Numeric ordering, so `v9` sorts before `v20`.
pub fn sort_versions_semver(versions: &mut [String]) {
    versions.sort_by_key(|v| {
        let nums: Vec<u32> = v
            .trim_start_matches('v')
            .split('.')
            .filter_map(|s| s.parse().ok())
            .collect();
        (
            nums.first().copied().unwrap_or(0),
            nums.get(1).copied().unwrap_or(0),
            nums.get(2).copied().unwrap_or(0),
        )
    });
}

/// PATH for the given home directory, ending with the inherited PATH.
pub fn extended_path(home: &str, inherited: &str) -> String {
    let mut paths = vec![
        "/opt/homebrew/bin".to_string(),
        "/opt/homebrew/sbin".to_string(),
        "/usr/local/bin".to_string(),
        "/usr/local/sbin".to_string(),
        format!("{}/.local/bin", home),
        "/usr/bin".to_string(),
        "/bin".to_string(),
        "/usr/sbin".to_string(),
        "/sbin".to_string(),
    ];

    if let Some(nvm_bin) = nvm_node_bin(home) {
        paths.insert(0, nvm_bin);
    }

    if !inherited.is_empty() {
        paths.push(inherited.to_string());
    }

    paths.join(":")
}

/// Extended PATH built from the current process environment.
pub fn build_extended_path() -> String {
    let home = std::env::var("HOME").unwrap_or_default();
    let inherited = std::env::var("PATH").unwrap_or_default();
    extended_path(&home, &inherited)
}
