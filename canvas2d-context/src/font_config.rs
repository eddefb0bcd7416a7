//! Font discovery configuration for text rendering.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

/// Where fonts come from and how generic CSS families resolve.
#[derive(Clone, Debug)]
pub struct FontConfig {
    /// Font files supplied in memory.
    pub custom_fonts: Vec<CustomFont>,
    /// Preference lists for the generic family names.
    pub generic_families: GenericFamilyMap,
    /// Scan the platform font directories (default: true).
    pub load_system_fonts: bool,
    /// Extra directories to scan.
    pub font_dirs: Vec<PathBuf>,
    /// Grid-fit glyph outlines (default: false).
    pub hinting_enabled: bool,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            custom_fonts: Vec::new(),
            generic_families: GenericFamilyMap::defaults(),
            load_system_fonts: true,
            font_dirs: Vec::new(),
            hinting_enabled: false,
        }
    }
}

/// Raw TTF/OTF data registered with the font database.
#[derive(Clone, Debug)]
pub struct CustomFont {
    pub data: Arc<Vec<u8>>,
}

/// Concrete family candidates for each generic family, first available wins.
#[derive(Clone, Debug, Default)]
pub struct GenericFamilyMap {
    pub serif: Vec<String>,
    pub sans_serif: Vec<String>,
    pub monospace: Vec<String>,
    pub cursive: Vec<String>,
    pub fantasy: Vec<String>,
}

impl GenericFamilyMap {
    pub fn defaults() -> Self {
        let names = |list: &[&str]| list.iter().map(|s| s.to_string()).collect();
        Self {
            serif: names(&["Times New Roman", "Times", "Liberation Serif", "DejaVu Serif"]),
            sans_serif: names(&["Arial", "Helvetica", "Liberation Sans", "DejaVu Sans"]),
            monospace: names(&["Courier New", "Courier", "Liberation Mono", "DejaVu Sans Mono"]),
            cursive: names(&["Comic Sans MS", "Apple Chancery"]),
            fantasy: names(&["Impact", "Papyrus"]),
        }
    }
}

/// Build a font database from a configuration.
pub fn font_config_to_fontdb(config: &FontConfig) -> fontdb::Database {
    let mut db = fontdb::Database::new();
    if config.load_system_fonts {
        db.load_system_fonts();
    }
    for dir in &config.font_dirs {
        db.load_fonts_dir(dir);
    }
    for font in &config.custom_fonts {
        db.load_font_data(font.data.as_ref().clone());
    }
    apply_generic_families(&mut db, &config.generic_families);
    log::debug!(target: "canvas", "font database loaded with {} faces", db.len());
    db
}

fn apply_generic_families(db: &mut fontdb::Database, families: &GenericFamilyMap) {
    let available: HashSet<String> = db
        .faces()
        .flat_map(|face| face.families.iter().map(|(name, _)| name.clone()))
        .collect();
    let pick = |candidates: &[String]| candidates.iter().find(|c| available.contains(*c)).cloned();

    if let Some(name) = pick(&families.serif) {
        db.set_serif_family(name);
    }
    if let Some(name) = pick(&families.sans_serif) {
        db.set_sans_serif_family(name);
    }
    if let Some(name) = pick(&families.monospace) {
        db.set_monospace_family(name);
    }
    if let Some(name) = pick(&families.cursive) {
        db.set_cursive_family(name);
    }
    if let Some(name) = pick(&families.fantasy) {
        db.set_fantasy_family(name);
    }
}
