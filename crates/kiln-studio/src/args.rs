use std::path::PathBuf;

use anyhow::{Context, Result, bail};

use kiln_engine::config::{GraphicsApi, LifecycleConfig};

pub const USAGE: &str = "\
usage: kiln-studio [options]

  --config <file>     load settings from a TOML file (flags below override it)
  --title <text>      window title
  --size <w>x<h>      initial window size in logical pixels
  --api <name>        graphics api: vulkan | gl | none
  --no-vsync          present without waiting for vblank
  --fixed-size        make the window non-resizable
  --font <file>       TTF font for the ui
  -v, --verbose       debug logging for the engine
  -h, --help          print this help";

/// Command-line options. Unset fields leave the config value alone.
#[derive(Debug, Default, PartialEq)]
pub struct StudioArgs {
    pub config: Option<PathBuf>,
    pub title: Option<String>,
    pub size: Option<(u32, u32)>,
    pub api: Option<GraphicsApi>,
    pub no_vsync: bool,
    pub fixed_size: bool,
    pub font: Option<PathBuf>,
    pub verbose: bool,
    pub help: bool,
}

impl StudioArgs {
    pub fn parse<I>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut out = Self::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            let mut value = |flag: &str| {
                args.next()
                    .with_context(|| format!("{flag} expects a value"))
            };

            match arg.as_str() {
                "--config" => out.config = Some(value("--config")?.into()),
                "--title" => out.title = Some(value("--title")?),
                "--size" => out.size = Some(parse_size(&value("--size")?)?),
                "--api" => {
                    let name = value("--api")?;
                    let api = GraphicsApi::parse(&name)
                        .with_context(|| format!("unknown graphics api '{name}'"))?;
                    out.api = Some(api);
                }
                "--no-vsync" => out.no_vsync = true,
                "--fixed-size" => out.fixed_size = true,
                "--font" => out.font = Some(value("--font")?.into()),
                "-v" | "--verbose" => out.verbose = true,
                "-h" | "--help" => out.help = true,
                other => bail!("unrecognized argument '{other}'"),
            }
        }

        Ok(out)
    }

    /// Loads the config file (if any), applies flag overrides and reads the
    /// font file into memory.
    pub fn resolve_config(&self) -> Result<LifecycleConfig> {
        let mut config = match &self.config {
            Some(path) => LifecycleConfig::load(path)?,
            None => LifecycleConfig::default().title("kiln studio"),
        };

        if let Some(title) = &self.title {
            config.title = title.clone();
        }
        if let Some((w, h)) = self.size {
            config.width = w;
            config.height = h;
        }
        if let Some(api) = self.api {
            config.graphics_api = api;
        }
        if self.no_vsync {
            config.vsync = false;
        }
        if self.fixed_size {
            config.resizable = false;
        }
        if let Some(font) = &self.font {
            config.ui.font_path = Some(font.clone());
        }

        if let Some(path) = &config.ui.font_path {
            let data = std::fs::read(path)
                .with_context(|| format!("failed to read font {}", path.display()))?;
            log::info!("loaded font {} ({} bytes)", path.display(), data.len());
            config.ui.font_data = Some(data);
        }

        config.validate()?;
        Ok(config)
    }
}

fn parse_size(s: &str) -> Result<(u32, u32)> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .with_context(|| format!("size '{s}' is not <width>x<height>"))?;
    let w = w.trim().parse().with_context(|| format!("bad width in '{s}'"))?;
    let h = h.trim().parse().with_context(|| format!("bad height in '{s}'"))?;
    Ok((w, h))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<StudioArgs> {
        StudioArgs::parse(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn no_args_is_default() {
        assert_eq!(parse(&[]).unwrap(), StudioArgs::default());
    }

    #[test]
    fn flags_are_parsed() {
        let args = parse(&[
            "--title", "Demo", "--size", "640x480", "--api", "gl", "--no-vsync", "-v",
        ])
        .unwrap();
        assert_eq!(args.title.as_deref(), Some("Demo"));
        assert_eq!(args.size, Some((640, 480)));
        assert_eq!(args.api, Some(GraphicsApi::OpenGL));
        assert!(args.no_vsync);
        assert!(args.verbose);
        assert!(!args.fixed_size);
    }

    #[test]
    fn bad_input_is_rejected() {
        parse(&["--size", "640"]).unwrap_err();
        parse(&["--api", "metal"]).unwrap_err();
        parse(&["--title"]).unwrap_err();
        parse(&["--fullscreen"]).unwrap_err();
    }

    #[test]
    fn overrides_apply_to_defaults() {
        let args = parse(&["--size", "800x600", "--api", "none", "--fixed-size"]).unwrap();
        let cfg = args.resolve_config().unwrap();
        assert_eq!(cfg.title, "kiln studio");
        assert_eq!((cfg.width, cfg.height), (800, 600));
        assert_eq!(cfg.graphics_api, GraphicsApi::None);
        assert!(!cfg.resizable);
        assert!(cfg.vsync);
    }

    #[test]
    fn zero_size_fails_validation() {
        let args = parse(&["--size", "0x600"]).unwrap();
        args.resolve_config().unwrap_err();
    }

    #[test]
    fn missing_font_is_an_error() {
        let args = parse(&["--font", "/nonexistent/font.ttf"]).unwrap();
        let err = args.resolve_config().unwrap_err();
        assert!(format!("{err:#}").contains("failed to read font"));
    }
}
