use anyhow::{Context, Result};
use std::path::Path;

/// Page templates, read once at startup. A missing template file aborts
/// startup rather than turning into per-request 500s.
#[derive(Debug, Clone)]
pub struct Pages {
    pub index: String,
    pub stats: String,
}

impl Pages {
    pub fn load(templates_dir: &str) -> Result<Self> {
        let dir = Path::new(templates_dir);
        let index = std::fs::read_to_string(dir.join("index.html"))
            .with_context(|| format!("failed to read {}/index.html", templates_dir))?;
        let stats = std::fs::read_to_string(dir.join("stats.html"))
            .with_context(|| format!("failed to read {}/stats.html", templates_dir))?;
        Ok(Self { index, stats })
    }
}
