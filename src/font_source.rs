use crate::{BillboardError, Font};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One place a font might be found
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontSource {
    /// A font file anywhere in the system font directories whose file name (without
    /// extension) matches, ignoring case. `"Impact"` finds `impact.ttf`
    Named(String),
    /// A font file at an exact path
    Path(PathBuf),
    /// Raw font data
    #[serde(skip)]
    Bytes(Vec<u8>),
}

impl FontSource {
    pub fn load(&self) -> Result<Font, BillboardError> {
        match self {
            FontSource::Named(name) => {
                let path = find_system_font(name).ok_or_else(|| {
                    std::io::Error::new(
                        std::io::ErrorKind::NotFound,
                        format!("no font file named `{name}` in system font directories"),
                    )
                })?;
                Font::load_from_path(path)
            }
            FontSource::Path(path) => Font::load_from_path(path),
            FontSource::Bytes(bytes) => Font::load(bytes.clone()),
        }
    }
}

impl std::fmt::Display for FontSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FontSource::Named(name) => write!(f, "font named `{name}`"),
            FontSource::Path(path) => write!(f, "font file {}", path.display()),
            FontSource::Bytes(bytes) => write!(f, "{} bytes of font data", bytes.len()),
        }
    }
}

/// An ordered list of font candidates. The first one that loads wins
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FontResolver {
    pub candidates: Vec<FontSource>,
}

impl FontResolver {
    pub fn new(candidates: Vec<FontSource>) -> FontResolver {
        FontResolver { candidates }
    }

    /// Heavy display faces first, then whatever sans-serif is commonly installed
    pub fn default_chain() -> FontResolver {
        FontResolver::new(vec![
            FontSource::Named("Impact".into()),
            FontSource::Named("arialbd".into()),
            FontSource::Path(PathBuf::from(
                "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
            )),
            FontSource::Named("DejaVuSans-Bold".into()),
            FontSource::Named("DejaVuSans".into()),
        ])
    }

    /// Try `source` before every other candidate
    pub fn prefer(mut self, source: FontSource) -> FontResolver {
        self.candidates.insert(0, source);
        self
    }

    pub fn resolve(&self) -> Result<Font, BillboardError> {
        for candidate in &self.candidates {
            match candidate.load() {
                Ok(font) => {
                    tracing::debug!(%candidate, family = ?font.family(), "resolved font");
                    return Ok(font);
                }
                Err(error) => tracing::debug!(%candidate, %error, "font candidate unavailable"),
            }
        }

        Err(BillboardError::NoFontAvailable {
            tried: self.candidates.len(),
        })
    }
}

/// Directories searched for [FontSource::Named] fonts
pub fn system_font_dirs() -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = Vec::new();

    if cfg!(target_os = "windows") {
        let windir = std::env::var_os("WINDIR").unwrap_or_else(|| "C:\\Windows".into());
        dirs.push(Path::new(&windir).join("Fonts"));
        if let Some(local) = std::env::var_os("LOCALAPPDATA") {
            dirs.push(Path::new(&local).join("Microsoft").join("Windows").join("Fonts"));
        }
    } else if cfg!(target_os = "macos") {
        dirs.push("/System/Library/Fonts".into());
        dirs.push("/Library/Fonts".into());
        if let Some(home) = std::env::var_os("HOME") {
            dirs.push(Path::new(&home).join("Library").join("Fonts"));
        }
    } else {
        dirs.push("/usr/share/fonts".into());
        dirs.push("/usr/local/share/fonts".into());
        if let Some(home) = std::env::var_os("HOME") {
            dirs.push(Path::new(&home).join(".fonts"));
            dirs.push(Path::new(&home).join(".local").join("share").join("fonts"));
        }
    }

    dirs
}

fn is_font_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| matches!(ext.to_ascii_lowercase().as_str(), "ttf" | "otf" | "ttc"))
        .unwrap_or(false)
}

/// Looks for a font file called `name` in the system font directories
pub fn find_system_font(name: &str) -> Option<PathBuf> {
    system_font_dirs()
        .iter()
        .find_map(|dir| find_font_in(dir, name, 0))
}

const MAX_SEARCH_DEPTH: usize = 6;

/// Depth-first search of `dir` for a font file whose stem (or full file name)
/// matches `name` case-insensitively. Unreadable directories are skipped
pub fn find_font_in(dir: &Path, name: &str, depth: usize) -> Option<PathBuf> {
    if depth > MAX_SEARCH_DEPTH {
        return None;
    }

    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)
        .ok()?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .collect();
    // deterministic across filesystems
    entries.sort();

    let wanted = name.to_lowercase();
    let matches = |path: &Path| {
        let stem = path.file_stem().and_then(|s| s.to_str()).map(str::to_lowercase);
        let file = path.file_name().and_then(|s| s.to_str()).map(str::to_lowercase);
        stem.as_deref() == Some(wanted.as_str()) || file.as_deref() == Some(wanted.as_str())
    };

    if let Some(found) = entries
        .iter()
        .find(|path| path.is_file() && is_font_file(path) && matches(path))
    {
        return Some(found.clone());
    }

    entries
        .iter()
        .filter(|path| path.is_dir())
        .find_map(|sub| find_font_in(sub, name, depth + 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_chain_reports_nothing_tried() {
        let err = FontResolver::default().resolve().unwrap_err();
        assert!(matches!(err, BillboardError::NoFontAvailable { tried: 0 }));
    }

    #[test]
    fn all_failing_candidates_are_counted() {
        let resolver = FontResolver::new(vec![
            FontSource::Path("/no/such/font.ttf".into()),
            FontSource::Bytes(b"nope".to_vec()),
            FontSource::Named("surely-no-font-is-called-this".into()),
        ]);
        assert!(matches!(
            resolver.resolve(),
            Err(BillboardError::NoFontAvailable { tried: 3 })
        ));
    }

    #[test]
    fn prefer_puts_source_first() {
        let resolver = FontResolver::default_chain().prefer(FontSource::Path("a.ttf".into()));
        assert_eq!(resolver.candidates[0], FontSource::Path("a.ttf".into()));
        assert_eq!(resolver.candidates[1], FontSource::Named("Impact".into()));
    }

    #[test]
    fn finds_fonts_by_stem_in_nested_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("truetype").join("acme");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(nested.join("Acme-Bold.TTF"), b"").unwrap();
        std::fs::write(dir.path().join("acme-bold.txt"), b"").unwrap();

        let found = find_font_in(dir.path(), "acme-bold", 0).unwrap();
        assert_eq!(found, nested.join("Acme-Bold.TTF"));
        assert_eq!(find_font_in(dir.path(), "Acme-Bold.ttf", 0), Some(found));
        assert_eq!(find_font_in(dir.path(), "other", 0), None);
    }

    #[test]
    fn candidates_deserialize_from_config() {
        let resolver: FontResolver =
            serde_json::from_str(r#"[{"named": "Impact"}, {"path": "/fonts/a.ttf"}]"#).unwrap();
        assert_eq!(
            resolver.candidates,
            vec![
                FontSource::Named("Impact".into()),
                FontSource::Path("/fonts/a.ttf".into()),
            ]
        );
    }
}
