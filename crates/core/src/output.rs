use std::path::Path;

use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::{error::Result, types::Playlist};

/// Document shape written for the id-only variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdListDocument {
    pub video_ids: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputShape {
    /// `{"videos": [{"id", "duration", "start_time"}, ...], "loop_length"}`
    #[default]
    Full,
    /// `{"video_ids": [...]}`
    IdsOnly,
}

/// Render a playlist as pretty-printed JSON
pub fn render_playlist(playlist: &Playlist, shape: OutputShape) -> Result<String> {
    let json = match shape {
        OutputShape::Full => serde_json::to_string_pretty(playlist)?,
        OutputShape::IdsOnly => serde_json::to_string_pretty(&IdListDocument {
            video_ids: playlist.ids(),
        })?,
    };
    Ok(json)
}

/// Save a playlist to a file, creating parent directories as needed
pub async fn save_playlist(playlist: &Playlist, shape: OutputShape, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }
    let json = render_playlist(playlist, shape)?;
    fs::write(path, json).await?;
    Ok(())
}

/// Load a full-shape playlist from a file
pub async fn load_playlist(path: &Path) -> Result<Playlist> {
    let json_content = fs::read_to_string(path).await?;
    let playlist: Playlist = serde_json::from_str(&json_content)?;
    Ok(playlist)
}
