//! Display/behavior configuration for a chart session.
//!
//! Everything here has a default matching the stock visualization; hosts
//! override selectively via TOML. The config is plain data; the core never
//! reads files itself outside the CLI.

use serde::{Deserialize, Serialize};

use crate::{
    error::CivigraphError,
    properties::{EntityClass, Jurisdiction},
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margins {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Default for Margins {
    fn default() -> Self {
        Margins {
            top: 40.0,
            right: 40.0,
            bottom: 40.0,
            left: 40.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Label of the synthetic super-root node.
    pub title: String,
    pub city_label: String,
    pub county_label: String,
    pub regional_label: String,
    /// Maximum hits the search dropdown shows.
    pub search_limit: usize,
    /// Quiet period before a search recomputes.
    pub debounce_ms: u64,
    /// Network-view node radius per entity class.
    pub elected_radius: f32,
    pub departments_radius: f32,
    pub boards_radius: f32,
    /// Departments get a label only above this radius; elected always do.
    pub label_radius_threshold: f32,
    /// Tree-view node radius per level; the last entry covers deeper levels.
    pub level_radii: Vec<f32>,
    pub margins: Margins,
    /// Fallback canvas size before the first resize event arrives.
    pub width: f32,
    pub height: f32,
}

impl Default for ChartConfig {
    fn default() -> Self {
        ChartConfig {
            title: "Organization".to_string(),
            city_label: "City".to_string(),
            county_label: "County".to_string(),
            regional_label: "Regional Authorities".to_string(),
            search_limit: 10,
            debounce_ms: 150,
            elected_radius: 12.0,
            departments_radius: 8.0,
            boards_radius: 6.0,
            label_radius_threshold: 8.0,
            level_radii: vec![8.0, 12.0, 10.0, 8.0, 6.0],
            margins: Margins::default(),
            width: 960.0,
            height: 600.0,
        }
    }
}

impl ChartConfig {
    pub fn from_toml(text: &str) -> Result<Self, CivigraphError> {
        Ok(toml::from_str(text)?)
    }

    pub fn jurisdiction_label(&self, jurisdiction: Jurisdiction) -> &str {
        match jurisdiction {
            Jurisdiction::City => &self.city_label,
            Jurisdiction::County => &self.county_label,
            Jurisdiction::Regional => &self.regional_label,
        }
    }

    pub fn class_radius(&self, class: EntityClass) -> f32 {
        match class {
            EntityClass::Elected => self.elected_radius,
            EntityClass::Departments => self.departments_radius,
            EntityClass::Boards => self.boards_radius,
        }
    }

    /// Labeling policy for network nodes: elected officials always, other
    /// classes only when drawn large enough to anchor a label.
    pub fn show_label(&self, class: EntityClass) -> bool {
        class == EntityClass::Elected || self.class_radius(class) > self.label_radius_threshold
    }

    pub fn level_radius(&self, level: u32) -> f32 {
        let index = (level as usize).min(self.level_radii.len().saturating_sub(1));
        self.level_radii.get(index).copied().unwrap_or(6.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_overrides_defaults() {
        let config = ChartConfig::from_toml(
            r#"
            title = "San Diego Government"
            city_label = "City of San Diego"
            debounce_ms = 300
        "#,
        )
        .unwrap();
        assert_eq!(config.title, "San Diego Government");
        assert_eq!(config.city_label, "City of San Diego");
        assert_eq!(config.debounce_ms, 300);
        assert_eq!(config.search_limit, 10);
        assert_eq!(config.jurisdiction_label(Jurisdiction::County), "County");
    }

    #[test]
    fn level_radius_clamps_to_deepest_entry() {
        let config = ChartConfig::default();
        assert_eq!(config.level_radius(1), 12.0);
        assert_eq!(config.level_radius(9), 6.0);
    }

    #[test]
    fn label_policy() {
        let config = ChartConfig::default();
        assert!(config.show_label(EntityClass::Elected));
        assert!(!config.show_label(EntityClass::Departments));
        assert!(!config.show_label(EntityClass::Boards));
    }
}
