use std::collections::BTreeMap;
use std::env;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Default, Deserialize, Serialize, Clone)]
pub struct ConfigFile {
    pub template: Option<String>,
    pub preset: Option<String>,
    pub presets: Option<BTreeMap<String, String>>,
    pub placeholder: Option<char>,
    #[serde(alias = "guard_len")]
    pub protected_len: Option<usize>,
    #[serde(alias = "min_length")]
    pub min_len: Option<usize>,
    pub script: Option<String>,
    pub output: Option<String>,
    pub output_format: Option<String>,
    pub no_color: Option<bool>,
}

pub const BUILTIN_PRESETS: &[(&str, &str)] = &[
    ("ru", "+7 (___) ___ ____"),
    ("us", "+1 (___) ___-____"),
    ("de", "+49 ____ _______"),
    ("uk", "+44 ____ ______"),
];

/// Looks a preset up in the config file first, then in the built-ins.
pub fn resolve_preset(name: &str, custom: Option<&BTreeMap<String, String>>) -> Option<String> {
    let key = name.trim().to_ascii_lowercase();
    if let Some(template) = custom.and_then(|m| m.get(&key).or_else(|| m.get(name.trim()))) {
        return Some(template.clone());
    }
    BUILTIN_PRESETS
        .iter()
        .find(|(preset, _)| *preset == key)
        .map(|(_, template)| template.to_string())
}

pub fn preset_names(custom: Option<&BTreeMap<String, String>>) -> Vec<String> {
    let mut names: Vec<String> = BUILTIN_PRESETS
        .iter()
        .map(|(name, _)| name.to_string())
        .collect();
    if let Some(custom) = custom {
        for name in custom.keys() {
            if !names.contains(name) {
                names.push(name.clone());
            }
        }
    }
    names
}

fn home_dir() -> Option<PathBuf> {
    env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(|| env::var_os("USERPROFILE").map(PathBuf::from))
        .or_else(|| {
            let drive = env::var_os("HOMEDRIVE")?;
            let path = env::var_os("HOMEPATH")?;
            Some(PathBuf::from(drive).join(path))
        })
}

pub fn default_config_path() -> Option<PathBuf> {
    Some(home_dir()?.join(".phonemask").join("config.yml"))
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/").or_else(|| path.strip_prefix("~\\")) {
        if let Some(home) = home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

pub fn parse_config(contents: &str) -> Result<ConfigFile, String> {
    serde_yaml::from_str::<ConfigFile>(contents).map_err(|e| e.to_string())
}

pub fn load_config(path: &PathBuf, allow_missing: bool) -> Result<ConfigFile, String> {
    match std::fs::read_to_string(path) {
        Ok(contents) => parse_config(&contents)
            .map_err(|e| format!("failed to parse config '{}': {e}", path.display())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound && allow_missing => {
            Ok(ConfigFile::default())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(format!("config file not found '{}'", path.display()))
        }
        Err(e) => Err(format!("failed to read config '{}': {e}", path.display())),
    }
}

fn default_config_yaml() -> String {
    r#"# Phonemask config
#
# Location (default):
#   ~/.phonemask/config.yml

# Mask (template wins over preset)
# template: "+7 (___) ___ ____"
preset: ru
# placeholder: "_"

# Extra presets, looked up before the built-in ones (ru, us, de, uk)
# presets:
#   fr: "+33 _ __ __ __ __"

# Guards (derived from the template when omitted)
# protected_len: 3
# min_len: 5

# Default keystroke script when none is given on the command line
# script: "focus; type 9123456789; blur"

# Output (optional)
# output: ./trace.json
output_format: text

# Output styling
no_color: false
"#
    .to_string()
}

pub fn ensure_default_config_file(path: &PathBuf) -> Result<(), String> {
    if path.exists() {
        return Ok(());
    }
    let parent = path
        .parent()
        .ok_or_else(|| format!("invalid config path '{}'", path.display()))?;
    std::fs::create_dir_all(parent).map_err(|e| {
        format!(
            "failed to create config directory '{}': {e}",
            parent.display()
        )
    })?;
    let contents = default_config_yaml();
    std::fs::write(path, contents)
        .map_err(|e| format!("failed to write config file '{}': {e}", path.display()))?;
    Ok(())
}
