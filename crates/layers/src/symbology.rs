use formats::{LINE_NAME_COLUMN, REGIME_COLUMN, SegmentRow};
use selection::{SegmentStyle, SegmentStyler};
use serde::{Deserialize, Serialize};

/// Operating regime group sharing one line style.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RegimeGroup {
    pub label: &'static str,
    pub regimes: &'static [&'static str],
    pub color: &'static str,
    pub width: f32,
}

// First three shades of the 8-class Purples scheme.
const PURPLE_1: &str = "#4a1486";
const PURPLE_2: &str = "#6a51a3";
const PURPLE_3: &str = "#807dba";

pub const REGIME_GROUPS: [RegimeGroup; 3] = [
    RegimeGroup {
        label: "Voie double ou banalisée",
        regimes: &["Double voie", "Voie banalisée"],
        color: PURPLE_1,
        width: 2.0,
    },
    RegimeGroup {
        label: "Voie unique",
        regimes: &[
            "Voie unique",
            "Voie unique à trafic restreint (consigne de ligne)",
            "Voie unique à signalisation simplifiée",
            "Régime particulier de voie unique autre que trafic restreint",
        ],
        color: PURPLE_2,
        width: 1.0,
    },
    RegimeGroup {
        label: "Autres",
        regimes: &["_Autre", "Régime en navette"],
        color: PURPLE_3,
        width: 1.0,
    },
];

pub const LGV_LABEL: &str = "LGV";
pub const LGV_COLOR: &str = "DodgerBlue";
pub const LGV_WIDTH: f32 = 3.0;

/// Entry of the map legend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub label: String,
    pub style: SegmentStyle,
}

/// How segment lines are drawn, chosen once when the index is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StyleStrategy {
    /// Same colour and width for every segment.
    Uniform { color: String, width: f32 },
    /// Colour and width from the operating regime; high-speed lines stand out.
    Regime,
}

impl Default for StyleStrategy {
    fn default() -> Self {
        let style = SegmentStyle::default();
        StyleStrategy::Uniform {
            color: style.color,
            width: style.width,
        }
    }
}

impl StyleStrategy {
    /// Empty for the uniform style, which needs no legend.
    pub fn legend(&self) -> Vec<LegendEntry> {
        match self {
            StyleStrategy::Uniform { .. } => Vec::new(),
            StyleStrategy::Regime => {
                let mut out = vec![LegendEntry {
                    label: LGV_LABEL.to_string(),
                    style: SegmentStyle::new(LGV_COLOR, LGV_WIDTH),
                }];
                out.extend(REGIME_GROUPS.iter().map(|g| LegendEntry {
                    label: g.label.to_string(),
                    style: SegmentStyle::new(g.color, g.width),
                }));
                out
            }
        }
    }
}

impl SegmentStyler for StyleStrategy {
    fn style(&self, row: &SegmentRow) -> SegmentStyle {
        match self {
            StyleStrategy::Uniform { color, width } => SegmentStyle::new(color.clone(), *width),
            StyleStrategy::Regime => regime_style(row),
        }
    }
}

fn regime_style(row: &SegmentRow) -> SegmentStyle {
    let is_lgv = row
        .property_text(LINE_NAME_COLUMN)
        .is_some_and(|name| name.contains(LGV_LABEL));
    if is_lgv {
        return SegmentStyle::new(LGV_COLOR, LGV_WIDTH);
    }
    let regime = row.property_text(REGIME_COLUMN);
    // Unlisted regimes fall into the last group.
    let group = regime
        .as_deref()
        .and_then(|r| REGIME_GROUPS.iter().find(|g| g.regimes.contains(&r)))
        .unwrap_or(&REGIME_GROUPS[REGIME_GROUPS.len() - 1]);
    SegmentStyle::new(group.color, group.width)
}
