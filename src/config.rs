//! User-facing configuration.
//!
//! `RenderConfig` reads camelCase JSON; every field has a default so a
//! partial document (or `{}`) is valid.

use crate::error::PipelineError;
use folio_afp::Rotation;
use folio_render_afp::{AfpRendererConfig, FontConfig, default_fonts};
use serde::Deserialize;

/// AFP positions are 2-byte signed values in several records.
const MAX_RESOLUTION: u32 = 14_400;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderConfig {
    /// AFP units per inch.
    pub resolution: u32,
    /// Page rotation in degrees: 0, 90, 180 or 270.
    pub rotation: i32,
    /// Spill pages waiting on forward references to temporary files.
    pub conserve_memory: bool,
    /// Paint background colors as dithered shading.
    pub shading: bool,
    pub document_name: String,
    pub fonts: Vec<FontConfig>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            resolution: 240,
            rotation: 0,
            conserve_memory: false,
            shading: true,
            document_name: "FOLIODOC".to_string(),
            fonts: default_fonts(),
        }
    }
}

impl RenderConfig {
    pub fn from_json(json: &str) -> Result<Self, PipelineError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Validates the configuration and produces the renderer's copy.
    pub fn to_renderer_config(&self) -> Result<AfpRendererConfig, PipelineError> {
        if self.resolution == 0 || self.resolution > MAX_RESOLUTION {
            return Err(PipelineError::Config(format!(
                "resolution must be between 1 and {} units per inch, got {}",
                MAX_RESOLUTION, self.resolution
            )));
        }
        let rotation = Rotation::try_from(self.rotation)
            .map_err(|_| PipelineError::Config(format!("rotation must be 0, 90, 180 or 270, got {}", self.rotation)))?;
        let name = self.document_name.trim();
        if name.is_empty() || name.chars().count() > 8 {
            return Err(PipelineError::Config(format!(
                "document name must be 1 to 8 characters, got '{}'",
                self.document_name
            )));
        }
        if self.fonts.is_empty() {
            return Err(PipelineError::Config("at least one font mapping is required".to_string()));
        }
        Ok(AfpRendererConfig {
            resolution: self.resolution,
            rotation,
            shading: self.shading,
            document_name: name.to_string(),
            fonts: self.fonts.clone(),
        })
    }
}
