use std::path::{Path, PathBuf};

use anyhow::Context;
use wingman_core::SessionSettings;

/// JSON-on-disk settings persistence.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> anyhow::Result<SessionSettings> {
        let bytes = std::fs::read(&self.path)
            .with_context(|| format!("read settings: {}", self.path.display()))?;
        let settings: SessionSettings =
            serde_json::from_slice(&bytes).context("decode settings JSON")?;
        Ok(settings)
    }

    /// First run or unreadable file both land on defaults; only the latter
    /// is worth a warning.
    pub fn load_or_default(&self) -> SessionSettings {
        if !self.path.exists() {
            return SessionSettings::default();
        }
        match self.load() {
            Ok(settings) => settings,
            Err(err) => {
                log::warn!("settings unreadable ({err:#}); falling back to defaults");
                SessionSettings::default()
            }
        }
    }

    pub fn save(&self, settings: &SessionSettings) -> anyhow::Result<()> {
        let json = serde_json::to_vec_pretty(settings).context("encode settings JSON")?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create settings directory: {}", parent.display()))?;
        }

        // Atomic-ish write: write temp then replace.
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json).with_context(|| format!("write temp: {}", tmp.display()))?;
        replace_file(&tmp, &self.path)
            .with_context(|| format!("replace file: {}", self.path.display()))?;
        Ok(())
    }
}

/// Rename-over-destination that works on platforms where rename refuses an
/// existing target. The previous file survives as `.bak` until the next save.
fn replace_file(tmp: &Path, dst: &Path) -> anyhow::Result<()> {
    let backup = dst.with_extension("bak");

    if dst.exists() {
        let _ = std::fs::remove_file(&backup);
        std::fs::rename(dst, &backup).with_context(|| {
            format!("rename {} -> {}", dst.display(), backup.display())
        })?;
    }

    if let Err(e) = std::fs::rename(tmp, dst) {
        // Put the previous file back if we had one.
        if backup.exists() {
            let _ = std::fs::rename(&backup, dst);
        }
        let _ = std::fs::remove_file(tmp);
        return Err(anyhow::Error::new(e)
            .context(format!("rename {} -> {}", tmp.display(), dst.display())));
    }
    Ok(())
}
