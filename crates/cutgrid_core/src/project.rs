use crate::error::Result;
use crate::types::*;
use std::path::Path;
use uuid::Uuid;

impl Project {
    /// Create a new empty project with the given name and settings.
    pub fn new(name: impl Into<String>, settings: ProjectSettings) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            settings,
            timeline: Timeline::new(),
        }
    }

    /// Output canvas the layout engine works in.
    pub fn canvas(&self) -> Canvas {
        Canvas::new(self.settings.width as f64, self.settings.height as f64)
    }

    /// Save project to a file as pretty-printed JSON.
    /// Appends the `.cutgrid` extension if it is missing.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = ensure_extension(path.as_ref());
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path.as_ref())?;
        let project: Project = serde_json::from_str(&data)?;
        Ok(project)
    }
}

/// 1920x1080 30fps preset.
pub fn preset_1080p() -> ProjectSettings {
    ProjectSettings {
        width: 1920,
        height: 1080,
        fps: 30.0,
    }
}

/// 1280x720 30fps preset.
pub fn preset_720p() -> ProjectSettings {
    ProjectSettings {
        width: 1280,
        height: 720,
        fps: 30.0,
    }
}

/// 1080x1920 30fps (vertical) preset.
pub fn preset_shorts() -> ProjectSettings {
    ProjectSettings {
        width: 1080,
        height: 1920,
        fps: 30.0,
    }
}

pub fn preset_4k() -> ProjectSettings {
    ProjectSettings {
        width: 3840,
        height: 2160,
        fps: 30.0,
    }
}

fn ensure_extension(path: &Path) -> std::path::PathBuf {
    if path.extension().and_then(|e| e.to_str()) == Some("cutgrid") {
        path.to_path_buf()
    } else {
        let mut p = path.to_path_buf();
        let mut name = p.file_name().unwrap_or_default().to_os_string();
        name.push(".cutgrid");
        p.set_file_name(name);
        p
    }
}
