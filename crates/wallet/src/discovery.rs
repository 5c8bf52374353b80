use std::path::{Path, PathBuf};

use regex::Regex;

use primitives::Address;

use crate::error::WalletError;

/// How the wallet recognises which files in the key directory name an
/// address. The two modes are mutually exclusive.
#[derive(Debug, Clone)]
pub enum DiscoveryMode {
    /// Basename is the address, with a fixed trailing extension.
    Extension(String),
    /// A regular expression with exactly one capture group yielding the
    /// address hex.
    Regex(Regex),
}

impl DiscoveryMode {
    pub fn extension(ext: impl Into<String>) -> Self {
        DiscoveryMode::Extension(ext.into())
    }

    pub fn regex(pattern: &str) -> Result<Self, WalletError> {
        let re = Regex::new(pattern).map_err(|e| WalletError::TemplateExpansion(e.to_string()))?;
        if re.captures_len() != 2 {
            return Err(WalletError::TemplateExpansion(
                "discovery regex must have exactly one capture group".to_string(),
            ));
        }
        Ok(DiscoveryMode::Regex(re))
    }

    /// Returns the address this file's name encodes, or `None` if it
    /// doesn't match this discovery mode at all. A match with an address
    /// string that fails to parse is logged and skipped by the caller.
    fn address_hex(&self, file_name: &str) -> Option<String> {
        match self {
            DiscoveryMode::Extension(ext) => {
                file_name.strip_suffix(ext.as_str()).map(|base| base.to_string())
            }
            DiscoveryMode::Regex(re) => re
                .captures(file_name)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().to_string()),
        }
    }
}

/// One discovered file: the address it names and its full path.
#[derive(Debug, Clone)]
pub struct DiscoveredFile {
    pub address: Address,
    pub path: PathBuf,
}

/// Matches a single file against `mode`, touching only that path rather
/// than the rest of the directory. Used both by [`scan_directory`] and by
/// the filesystem listener, which must be able to pick up one
/// late-arriving file without a full rescan.
pub fn match_file(path: &Path, mode: &DiscoveryMode) -> Option<DiscoveredFile> {
    if path.is_dir() {
        return None;
    }
    let file_name = path.file_name().and_then(|n| n.to_str())?;
    let hex = mode.address_hex(file_name)?;
    match Address::parse(&hex) {
        Ok(address) => Some(DiscoveredFile {
            address,
            path: path.to_path_buf(),
        }),
        Err(e) => {
            tracing::warn!(file = %file_name, error = %e, "skipping key file with invalid address");
            None
        }
    }
}

/// Scans `dir` for files matching `mode`, in directory-iteration order.
/// Non-matching entries (including subdirectories) are ignored; files
/// whose extracted hex fails to parse as an address are logged and
/// skipped rather than aborting the scan.
pub fn scan_directory(dir: &Path, mode: &DiscoveryMode) -> Result<Vec<DiscoveredFile>, WalletError> {
    let entries = std::fs::read_dir(dir).map_err(|e| WalletError::ReadDir(e.to_string()))?;

    let mut found = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| WalletError::ReadDir(e.to_string()))?;
        if let Some(discovered) = match_file(&entry.path(), mode) {
            found.push(discovered);
        }
    }

    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_mode_extracts_address() {
        let mode = DiscoveryMode::extension(".key.json");
        let dir = tempfile::tempdir().unwrap();
        let addr = "5aaeb6053f3e94c9b9a09f33669435e7ef1beaed";
        std::fs::write(dir.path().join(format!("{addr}.key.json")), "{}").unwrap();
        std::fs::write(dir.path().join("ignored.txt"), "{}").unwrap();

        let found = scan_directory(dir.path(), &mode).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].address.to_hex_bare(), addr);
    }

    #[test]
    fn regex_mode_extracts_captured_address() {
        let mode = DiscoveryMode::regex(r"^wallet-([0-9a-fA-F]{40})\.json$").unwrap();
        let dir = tempfile::tempdir().unwrap();
        let addr = "5aaeb6053f3e94c9b9a09f33669435e7ef1beaed";
        std::fs::write(dir.path().join(format!("wallet-{addr}.json")), "{}").unwrap();
        std::fs::write(dir.path().join("unrelated.json"), "{}").unwrap();

        let found = scan_directory(dir.path(), &mode).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].address.to_hex_bare(), addr);
    }

    #[test]
    fn invalid_address_is_skipped_not_fatal() {
        let mode = DiscoveryMode::extension(".key.json");
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("not-an-address.key.json"), "{}").unwrap();

        let found = scan_directory(dir.path(), &mode).unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn regex_with_wrong_capture_group_count_is_rejected() {
        assert!(DiscoveryMode::regex(r"^wallet-\d+\.json$").is_err());
    }
}
