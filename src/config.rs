use crate::billboard::BillboardOptions;
use crate::font_source::FontResolver;
use crate::output::{OutputStore, DEFAULT_RETENTION};
use crate::BillboardError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Settings for producing billboards, usually read from a JSON file. Every field
/// is optional in the file.
///
/// ```json
/// {
///   "background": "static/img/billboard-bg.png",
///   "fonts": [{ "named": "Impact" }, { "path": "/opt/fonts/Anton.ttf" }],
///   "output_dir": "/tmp",
///   "retention_secs": 3600,
///   "options": { "font_size": 80, "text_colour": "#000000" }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Background image; the plain fallback canvas is used when absent or unreadable
    pub background: Option<PathBuf>,
    pub fonts: FontResolver,
    pub output_dir: PathBuf,
    pub retention_secs: u64,
    pub options: BillboardOptions,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            background: None,
            fonts: FontResolver::default_chain(),
            output_dir: std::env::temp_dir(),
            retention_secs: DEFAULT_RETENTION.as_secs(),
            options: BillboardOptions::default(),
        }
    }
}

impl Config {
    /// Read a JSON config file. Relative paths inside it are resolved against the
    /// file's directory
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Config, BillboardError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let mut config = Config::from_json(&text)?;

        if let Some(base) = path.parent() {
            config.rebase(base);
        }
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Config, BillboardError> {
        let config: Config = serde_json::from_str(text)?;
        config.options.validate()?;
        Ok(config)
    }

    fn rebase(&mut self, base: &Path) {
        let rebase = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };

        if let Some(background) = self.background.as_mut() {
            rebase(background);
        }
        rebase(&mut self.output_dir);
        for candidate in self.fonts.candidates.iter_mut() {
            if let crate::FontSource::Path(p) = candidate {
                rebase(p);
            }
        }
    }

    pub fn retention(&self) -> Duration {
        Duration::from_secs(self.retention_secs)
    }

    pub fn output_store(&self) -> OutputStore {
        OutputStore::new(&self.output_dir, self.retention())
    }
}
