use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// 0 draws a fresh seed from the OS on every launch.
    pub seed: u64,
    pub fps_cap: u32,
    pub enable_color: bool,
    pub enable_sound: bool,
    /// Derive the hour of day from uptime instead of the wall clock.
    pub synthetic_clock: bool,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: 0,
            fps_cap: 30,
            enable_color: true,
            enable_sound: true,
            synthetic_clock: false,
            log_filter: "info".to_string(),
        }
    }
}

pub struct Paths {
    pub save_path: PathBuf,
    pub settings_path: PathBuf,
    pub log_path: PathBuf,
}

pub fn project_paths() -> Result<Paths> {
    let proj = ProjectDirs::from("com", "pocketpet", "PocketPet")
        .context("could not resolve project directories")?;
    let dir = proj.data_local_dir().to_path_buf();
    fs::create_dir_all(&dir)
        .with_context(|| format!("could not create data directory {}", dir.display()))?;
    Ok(Paths {
        save_path: dir.join("save.json"),
        settings_path: dir.join("settings.json"),
        log_path: dir.join("pocketpet.log"),
    })
}

/// Missing or malformed settings fall back to defaults.
pub fn load_settings(path: &Path) -> Settings {
    fs::read_to_string(path)
        .ok()
        .and_then(|s| serde_json::from_str::<Settings>(&s).ok())
        .unwrap_or_default()
}

pub fn save_settings_atomic(path: &Path, s: &Settings) -> Result<()> {
    let tmp = path.with_extension("json.tmp");
    let data = serde_json::to_vec_pretty(s)?;
    fs::write(&tmp, data)?;
    atomic_rename(&tmp, path)?;
    Ok(())
}

pub fn atomic_rename(from: &Path, to: &Path) -> std::io::Result<()> {
    // rename-over-existing is not atomic on Windows; remove first there.
    if cfg!(windows) && to.exists() {
        let _ = fs::remove_file(to);
    }
    fs::rename(from, to)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_settings_fill_in_defaults() {
        let s: Settings = serde_json::from_str(r#"{ "seed": 99, "synthetic_clock": true }"#).unwrap();
        assert_eq!(s.seed, 99);
        assert!(s.synthetic_clock);
        assert_eq!(s.fps_cap, 30);
        assert_eq!(s.log_filter, "info");
    }

    #[test]
    fn settings_round_trip_through_disk() {
        let dir = std::env::temp_dir().join(format!("pocketpet-settings-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("settings.json");

        assert_eq!(load_settings(&path), Settings::default());
        let s = Settings {
            fps_cap: 60,
            enable_sound: false,
            ..Settings::default()
        };
        save_settings_atomic(&path, &s).unwrap();
        assert_eq!(load_settings(&path), s);

        fs::write(&path, "not json").unwrap();
        assert_eq!(load_settings(&path), Settings::default());

        fs::remove_dir_all(&dir).ok();
    }
}
