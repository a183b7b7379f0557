//! Filesystem template loader.
//!
//! Scans a directory recursively for files with the template suffix and
//! turns them into registry sources. The logical template name is the file
//! name without the suffix, regardless of the subdirectory the file lives
//! in; a name seen again later in the scan overrides the earlier body.

use std::collections::HashMap;
use std::path::Path;

use tokio::fs;
use tracing::{debug, warn};

use crate::engine::{TemplateSource, TEMPLATE_SUFFIX};
use crate::error::{Error, Result};

/// Load every `*.tmpl` file under `dir` (recursively) as a template source.
///
/// Returns the sources sorted by logical name. Files without the template
/// suffix are ignored.
pub async fn load_template_dir(dir: &Path) -> Result<Vec<TemplateSource>> {
    if !dir.is_dir() {
        return Err(Error::config(format!(
            "template folder '{}' does not exist or is not a directory",
            dir.display()
        )));
    }

    let mut sources: Vec<TemplateSource> = Vec::new();
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut pending = vec![dir.to_path_buf()];

    while let Some(current) = pending.pop() {
        let mut entries = fs::read_dir(&current).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if entry.file_type().await?.is_dir() {
                pending.push(path);
                continue;
            }

            let Some(name) = template_name(&path) else {
                continue;
            };
            let body = fs::read_to_string(&path).await?;
            debug!(template = %name, path = %path.display(), "loaded template source");

            match seen.get(&name).copied() {
                Some(index) => {
                    warn!(
                        template = %name,
                        path = %path.display(),
                        "duplicate template name, overriding earlier definition"
                    );
                    sources[index] = TemplateSource::new(name, body);
                }
                None => {
                    seen.insert(name.clone(), sources.len());
                    sources.push(TemplateSource::new(name, body));
                }
            }
        }
    }

    sources.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(sources)
}

/// Logical name of a template file, or `None` if the file is not one.
fn template_name(path: &Path) -> Option<String> {
    path.file_name()?
        .to_str()?
        .strip_suffix(TEMPLATE_SUFFIX)
        .filter(|stem| !stem.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn write(dir: &Path, rel: &str, content: &str) {
        let path = dir.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.unwrap();
        }
        fs::write(path, content).await.unwrap();
    }

    #[tokio::test]
    async fn test_load_template_dir_recursive() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "case.tmpl", "case body").await;
        write(temp_dir.path(), "special/bearing.tmpl", "bearing body").await;
        write(temp_dir.path(), "notes.txt", "not a template").await;

        let sources = load_template_dir(temp_dir.path()).await.unwrap();

        let names: Vec<&str> = sources.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["bearing", "case"]);
        assert_eq!(sources[0].body, "bearing body");
    }

    #[tokio::test]
    async fn test_load_template_dir_duplicate_overrides() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "a/case.tmpl", "first").await;
        write(temp_dir.path(), "b/case.tmpl", "second").await;

        let sources = load_template_dir(temp_dir.path()).await.unwrap();
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].name, "case");
        // one of the two bodies won; which one depends on scan order
        assert!(sources[0].body == "first" || sources[0].body == "second");
    }

    #[tokio::test]
    async fn test_load_template_dir_missing_directory() {
        let err = load_template_dir(Path::new("/nonexistent/templates"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
