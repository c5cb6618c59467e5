use std::path::{Path, PathBuf};

use formats::{LINE_NAME_COLUMN, LINE_RANK_COLUMN, REGIME_COLUMN};
use selection::{LookupKey, SyncPolicy};
use serde::{Deserialize, Serialize};

use crate::symbology::StyleStrategy;
use crate::table::{NumberFormat, TableColumn};

const SEGMENT_HELP: &str = "<b>Mode d'emploi</b>\
<p>La sélection d'une ou plusieurs lignes est possible directement sur la carte (shift + clic) ou dans la table (shift/ctrl + clic).</p>\
<p>On peut aussi sélectionner une ligne en indiquant son numéro de ligne et de rang dans l'entrée texte située en haut à droite. \
Le bouton \"Affiche les extrémités\" permet de rendre visibles ou non les extrémités des lignes sélectionnées.</p>\
<p>En cas de problème, utiliser l'outil reset sur la droite de la carte.</p>";

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Json { path: PathBuf, source: serde_json::Error },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "failed to read {}: {source}", path.display())
            }
            ConfigError::Json { path, source } => {
                write!(f, "invalid map config {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Json { source, .. } => Some(source),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Heading shown above the table.
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Explicit column list; every descriptive column when absent.
    pub columns: Option<Vec<TableColumn>>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            title: "Tronçons".to_string(),
            width: 500,
            height: 200,
            columns: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    pub key: LookupKey,
    /// Input label; the key column name when absent.
    pub title: Option<String>,
    pub max_width: u32,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            key: LookupKey::RowId,
            title: None,
            max_width: 80,
        }
    }
}

impl LookupConfig {
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or_else(|| self.key.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    pub size: f32,
    pub color: String,
    pub label: String,
    pub visible: bool,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            size: 4.0,
            color: "DarkSlateGray".to_string(),
            label: "Affiche les extrémités".to_string(),
            visible: false,
        }
    }
}

/// Everything a linked map needs besides the data itself.
///
/// Every field has a default so a JSON override file only names what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub title: String,
    /// Background tiles under the map.
    pub tiles: bool,
    pub fig_height: u32,
    pub save_dir: Option<PathBuf>,
    pub table: TableConfig,
    pub lookup: LookupConfig,
    pub endpoints: EndpointConfig,
    pub sync: SyncPolicy,
    pub style: StyleStrategy,
    pub help_text: String,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self::segments()
    }
}

impl MapConfig {
    /// Base segment map.
    pub fn segments() -> Self {
        Self {
            title: "carte_tronçons".to_string(),
            tiles: true,
            fig_height: 760,
            save_dir: None,
            table: TableConfig::default(),
            lookup: LookupConfig::default(),
            endpoints: EndpointConfig::default(),
            sync: SyncPolicy::segment_map(),
            style: StyleStrategy::default(),
            help_text: SEGMENT_HELP.to_string(),
        }
    }

    /// Line map coloured by operating regime.
    pub fn rail_lines() -> Self {
        Self {
            title: "Carte des lignes".to_string(),
            table: TableConfig {
                columns: Some(vec![
                    TableColumn::new(LINE_RANK_COLUMN).with_width(55),
                    TableColumn::new("long_km")
                        .with_width(40)
                        .with_format(NumberFormat::OneDecimal),
                    TableColumn::new("pkd").with_width(60),
                    TableColumn::new("pkf").with_width(60),
                    TableColumn::new(LINE_NAME_COLUMN)
                        .with_title("ligne")
                        .with_width(200),
                    TableColumn::new(REGIME_COLUMN).with_width(100),
                ]),
                ..TableConfig::default()
            },
            lookup: LookupConfig {
                key: LookupKey::column(LINE_RANK_COLUMN),
                title: Some("ligne_rg (ex: 001000-1)".to_string()),
                max_width: 150,
            },
            sync: SyncPolicy::line_map(),
            style: StyleStrategy::Regime,
            ..Self::segments()
        }
    }

    pub fn from_json_str(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Where the rendered page is saved, `<save_dir>/<title>.html`.
    pub fn output_path(&self) -> Option<PathBuf> {
        self.save_dir
            .as_ref()
            .map(|dir| dir.join(format!("{}.html", self.title)))
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, MapConfig};
    use selection::{LookupKey, LookupPolicy, TableFilter};
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    #[test]
    fn segment_defaults() {
        let c = MapConfig::default();
        assert_eq!(c.title, "carte_tronçons");
        assert!(c.tiles);
        assert_eq!(c.fig_height, 760);
        assert_eq!(c.table.width, 500);
        assert_eq!(c.table.height, 200);
        assert_eq!(c.lookup.title(), "id");
        assert_eq!(c.lookup.max_width, 80);
        assert_eq!(c.endpoints.size, 4.0);
        assert!(!c.endpoints.visible);
        assert_eq!(c.sync.lookup, LookupPolicy::SyncSegments);
    }

    #[test]
    fn rail_line_preset() {
        let c = MapConfig::rail_lines();
        assert_eq!(c.title, "Carte des lignes");
        assert_eq!(c.lookup.key, LookupKey::column("lig_rg"));
        assert_eq!(c.lookup.title(), "ligne_rg (ex: 001000-1)");
        assert_eq!(c.lookup.max_width, 150);
        assert_eq!(c.sync.lookup, LookupPolicy::MarkersOnly);
        assert_eq!(c.sync.table, TableFilter::ShowAll);
        let fields: Vec<&str> = c
            .table
            .columns
            .iter()
            .flatten()
            .map(|col| col.field.as_str())
            .collect();
        assert_eq!(
            fields,
            vec!["lig_rg", "long_km", "pkd", "pkf", "lib_ligne", "exploitation"]
        );
    }

    #[test]
    fn json_overrides_only_named_fields() {
        let c = MapConfig::from_json_str(
            r#"{"title":"Réseau","save_dir":"/tmp/out","endpoints":{"visible":true}}"#,
        )
        .unwrap();
        assert_eq!(c.title, "Réseau");
        assert!(c.endpoints.visible);
        assert_eq!(c.endpoints.color, "DarkSlateGray");
        assert_eq!(c.fig_height, 760);
        assert_eq!(c.output_path(), Some(PathBuf::from("/tmp/out/Réseau.html")));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = MapConfig::from_json_file("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
