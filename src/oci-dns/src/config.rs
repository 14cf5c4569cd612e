// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Parses OCI configuration files.
//!
//! The file is INI-like: `[PROFILE]` headers followed by `key=value` lines.
//! Profiles inherit any key they do not set from `[DEFAULT]`.

use std::collections::HashMap;
use std::path::PathBuf;

pub(crate) const DEFAULT_PROFILE: &str = "DEFAULT";

/// The environment variable overriding the location of the file.
pub(crate) const CONFIG_FILE_ENV: &str = "OCI_CONFIG_FILE";
/// The environment variable overriding the profile name.
pub(crate) const PROFILE_ENV: &str = "OCI_CLI_PROFILE";

const UNIX_HOME: &str = "HOME";
const WINDOWS_HOME: &str = "USERPROFILE";

#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct ConfigFile {
    sections: HashMap<String, HashMap<String, String>>,
}

impl ConfigFile {
    pub(crate) fn parse(contents: &str) -> Self {
        let mut sections: HashMap<String, HashMap<String, String>> = HashMap::new();
        let mut current: Option<String> = None;
        for line in contents.lines().map(str::trim) {
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }
            if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                let name = name.trim().to_string();
                sections.entry(name.clone()).or_default();
                current = Some(name);
                continue;
            }
            // Lines before the first header have no profile.
            let (Some(section), Some((key, value))) = (current.as_ref(), line.split_once('='))
            else {
                continue;
            };
            sections
                .entry(section.clone())
                .or_default()
                .insert(key.trim().to_string(), value.trim().to_string());
        }
        Self { sections }
    }

    /// Returns the keys for `profile`, merged over `[DEFAULT]`.
    pub(crate) fn profile(&self, profile: &str) -> Option<HashMap<String, String>> {
        let values = self.sections.get(profile)?;
        let mut merged = self
            .sections
            .get(DEFAULT_PROFILE)
            .cloned()
            .unwrap_or_default();
        merged.extend(values.iter().map(|(k, v)| (k.clone(), v.clone())));
        Some(merged)
    }
}

pub(crate) fn home_dir() -> Option<PathBuf> {
    let var = if cfg!(windows) { WINDOWS_HOME } else { UNIX_HOME };
    std::env::var_os(var).map(PathBuf::from)
}

/// Returns `~/.oci/config`, or the path in `OCI_CONFIG_FILE`.
pub(crate) fn default_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_FILE_ENV) {
        return Some(expand_home(&PathBuf::from(path)));
    }
    let mut path = home_dir()?;
    path.push(".oci");
    path.push("config");
    Some(path)
}

pub(crate) fn default_profile() -> String {
    std::env::var(PROFILE_ENV).unwrap_or_else(|_| DEFAULT_PROFILE.to_string())
}

/// Replaces a leading `~` with the home directory.
pub(crate) fn expand_home(path: &std::path::Path) -> PathBuf {
    match (path.strip_prefix("~"), home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use scoped_env::ScopedEnv;
    use serial_test::serial;

    const CONFIG: &str = r#"
# A comment
ignored=before any profile

[DEFAULT]
user=ocid1.user.oc1..default
tenancy = ocid1.tenancy.oc1..aaa
region=us-ashburn-1
key_file=~/.oci/key.pem

[ADMIN]
user=ocid1.user.oc1..admin
; another comment
fingerprint=aa:bb:cc
"#;

    #[test]
    fn default_profile_values() {
        let file = ConfigFile::parse(CONFIG);
        let got = file.profile("DEFAULT").unwrap_or_default();
        assert_eq!(got.get("user").map(String::as_str), Some("ocid1.user.oc1..default"));
        assert_eq!(got.get("tenancy").map(String::as_str), Some("ocid1.tenancy.oc1..aaa"));
        assert_eq!(got.get("ignored"), None);
        assert_eq!(got.len(), 4, "{got:?}");
    }

    #[test]
    fn profile_inherits_default() {
        let file = ConfigFile::parse(CONFIG);
        let got = file.profile("ADMIN").unwrap_or_default();
        assert_eq!(got.get("user").map(String::as_str), Some("ocid1.user.oc1..admin"));
        assert_eq!(got.get("fingerprint").map(String::as_str), Some("aa:bb:cc"));
        assert_eq!(got.get("region").map(String::as_str), Some("us-ashburn-1"));
    }

    #[test]
    fn missing_profile() {
        let file = ConfigFile::parse(CONFIG);
        assert_eq!(file.profile("OTHER"), None);
    }

    #[test]
    #[serial]
    fn paths() {
        let _home = ScopedEnv::set(UNIX_HOME, "/home/test");
        let _file = ScopedEnv::remove(CONFIG_FILE_ENV);
        if !cfg!(windows) {
            assert_eq!(default_path(), Some(PathBuf::from("/home/test/.oci/config")));
            assert_eq!(
                expand_home(std::path::Path::new("~/.oci/key.pem")),
                PathBuf::from("/home/test/.oci/key.pem")
            );
        }
        assert_eq!(
            expand_home(std::path::Path::new("/etc/key.pem")),
            PathBuf::from("/etc/key.pem")
        );
    }

    #[test]
    #[serial]
    fn path_from_env() {
        let _file = ScopedEnv::set(CONFIG_FILE_ENV, "/tmp/oci-config");
        let _profile = ScopedEnv::set(PROFILE_ENV, "ADMIN");
        assert_eq!(default_path(), Some(PathBuf::from("/tmp/oci-config")));
        assert_eq!(default_profile(), "ADMIN");
    }
}
