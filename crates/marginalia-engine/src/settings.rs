use marginalia_config::Config;

use crate::anchors::DecorationStyle;

/// The parts of [`Config`] the engine reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSettings {
    pub style: DecorationStyle,
    /// Attribute carrying the annotation id on the anchor element.
    pub id_attribute: String,
    /// Undo levels kept (0 = unlimited)
    pub history_depth: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for EngineSettings {
    fn from(config: &Config) -> Self {
        Self {
            style: DecorationStyle {
                highlight_class: config.decorations.highlight_class.clone(),
                active_class: config.decorations.active_class.clone(),
            },
            id_attribute: config.markup.id_attribute.clone(),
            history_depth: config.history.depth,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_come_from_config_defaults() {
        let settings = EngineSettings::default();
        assert_eq!(settings.style, DecorationStyle::default());
        assert_eq!(settings.id_attribute, "data-anchor-id");
        assert_eq!(settings.history_depth, 100);
    }

    #[test]
    fn reads_config_values() {
        let mut config = Config::default();
        config.decorations.active_class = "focused".to_string();
        config.markup.id_attribute = "data-comment".to_string();
        config.history.depth = 0;

        let settings = EngineSettings::from(&config);
        assert_eq!(settings.style.active_class, "focused");
        assert_eq!(settings.id_attribute, "data-comment");
        assert_eq!(settings.history_depth, 0);
    }
}
