//! Renderer-side configuration.

use folio_afp::Rotation;
use folio_area::FontKey;
use serde::Deserialize;

/// Maps a font face chosen by layout onto an AFP character set and code
/// page.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontConfig {
    pub family: String,
    #[serde(default = "default_weight")]
    pub weight: u16,
    #[serde(default)]
    pub italic: bool,
    pub character_set: String,
    pub code_page: String,
    /// Outline fonts are scaled by the printer and carry a size in the
    /// coded font map; raster fonts are fixed-size.
    #[serde(default = "default_outline")]
    pub outline: bool,
}

fn default_weight() -> u16 {
    400
}

fn default_outline() -> bool {
    true
}

impl FontConfig {
    pub fn new(family: &str, weight: u16, italic: bool, character_set: &str, code_page: &str) -> Self {
        Self {
            family: family.to_string(),
            weight,
            italic,
            character_set: character_set.to_string(),
            code_page: code_page.to_string(),
            outline: true,
        }
    }

    fn is_bold(&self) -> bool {
        self.weight >= 600
    }
}

const LATIN1_CODE_PAGE: &str = "T1V10500";

/// The outline fonts every AFP printer resident set carries.
pub fn default_fonts() -> Vec<FontConfig> {
    let faces = [
        ("Helvetica", ["CZH200", "CZH300", "CZH400", "CZH500"]),
        ("Times", ["CZN200", "CZN300", "CZN400", "CZN500"]),
        ("Courier", ["CZ4200", "CZ4300", "CZ4400", "CZ4500"]),
    ];
    faces
        .iter()
        .flat_map(|(family, [regular, italic, bold, bold_italic])| {
            [
                FontConfig::new(family, 400, false, regular, LATIN1_CODE_PAGE),
                FontConfig::new(family, 400, true, italic, LATIN1_CODE_PAGE),
                FontConfig::new(family, 700, false, bold, LATIN1_CODE_PAGE),
                FontConfig::new(family, 700, true, bold_italic, LATIN1_CODE_PAGE),
            ]
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AfpRendererConfig {
    /// AFP units per inch.
    pub resolution: u32,
    pub rotation: Rotation,
    /// Paint block and region backgrounds as dithered shading.
    pub shading: bool,
    pub document_name: String,
    pub fonts: Vec<FontConfig>,
}

impl Default for AfpRendererConfig {
    fn default() -> Self {
        Self {
            resolution: 240,
            rotation: Rotation::Deg0,
            shading: true,
            document_name: "FOLIODOC".to_string(),
            fonts: default_fonts(),
        }
    }
}

impl AfpRendererConfig {
    /// Picks the configured font for `key`: the same family and style,
    /// then the same family, then the first configured font.
    pub fn font_for(&self, key: &FontKey) -> Option<(usize, &FontConfig)> {
        let bold = key.weight >= 600;
        let same_family = |font: &&FontConfig| font.family.eq_ignore_ascii_case(&key.family);
        self.fonts
            .iter()
            .enumerate()
            .find(|(_, font)| same_family(font) && font.is_bold() == bold && font.italic == key.italic)
            .or_else(|| self.fonts.iter().enumerate().find(|(_, font)| same_family(font)))
            .or_else(|| self.fonts.iter().enumerate().next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_lookup_prefers_style_then_family() {
        let config = AfpRendererConfig::default();
        let (_, bold_italic) = config.font_for(&FontKey::new("helvetica", 700, true, 10_000)).unwrap();
        assert_eq!(bold_italic.character_set, "CZH500");

        let (_, fallback) = config.font_for(&FontKey::new("Unknown", 400, false, 10_000)).unwrap();
        assert_eq!(fallback.character_set, "CZH200");

        let empty = AfpRendererConfig { fonts: Vec::new(), ..AfpRendererConfig::default() };
        assert!(empty.font_for(&FontKey::new("Times", 400, false, 10_000)).is_none());
    }

    #[test]
    fn test_font_config_from_json() {
        let font: FontConfig =
            serde_json::from_str(r#"{"family":"Arial","characterSet":"C0H20000","codePage":"T1V10500"}"#).unwrap();
        assert_eq!(font.weight, 400);
        assert!(font.outline);
        assert!(!font.italic);
    }
}
