use std::path::Path;

use anyhow::{Context, Result};

use super::LifecycleConfig;

impl LifecycleConfig {
    /// Parses a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(src: &str) -> Result<Self> {
        let cfg: LifecycleConfig = toml::from_str(src).context("invalid kiln config")?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reads and parses a TOML config file.
    pub fn load(path: &Path) -> Result<Self> {
        let src = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_toml_str(&src).with_context(|| format!("in {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GraphicsApi;

    #[test]
    fn empty_document_yields_defaults() {
        let cfg = LifecycleConfig::from_toml_str("").unwrap();
        assert_eq!(cfg.title, "kiln");
        assert_eq!((cfg.width, cfg.height), (1280, 800));
    }

    #[test]
    fn partial_document_overrides() {
        let cfg = LifecycleConfig::from_toml_str(
            r#"
            title = "Hello"
            width = 800
            graphics_api = "gl"
            vsync = false

            [ui]
            font_size = 16.0
            font_path = "fonts/body.ttf"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.title, "Hello");
        assert_eq!(cfg.width, 800);
        assert_eq!(cfg.height, 800);
        assert_eq!(cfg.graphics_api, GraphicsApi::OpenGL);
        assert!(!cfg.vsync);
        assert_eq!(cfg.ui.font_size, 16.0);
        assert!(cfg.ui.font_path.is_some());
        assert!(cfg.ui.font_data.is_none());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        LifecycleConfig::from_toml_str("fullscreen = true").unwrap_err();
    }

    #[test]
    fn invalid_values_are_rejected() {
        LifecycleConfig::from_toml_str("height = 0").unwrap_err();
        LifecycleConfig::from_toml_str(r#"graphics_api = "metal""#).unwrap_err();
        LifecycleConfig::from_toml_str("minimized_sleep_ms = 0").unwrap_err();
        LifecycleConfig::from_toml_str("minimized_sleep_ms = 86400000").unwrap_err();

        let cfg = LifecycleConfig::from_toml_str("minimized_sleep_ms = 25").unwrap();
        assert_eq!(cfg.minimized_sleep(), std::time::Duration::from_millis(25));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = LifecycleConfig::load(Path::new("/nonexistent/kiln.toml")).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/kiln.toml"));
    }
}
