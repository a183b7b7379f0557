//! Output sinks: where rendered text goes.
//!
//! Before each template execution the executor calls [`OutputSink::set_out`]
//! with the logical output name the following writes belong to. The
//! directory sink maps each name to a file (created or truncated); the
//! stdout sink ignores the name and streams everything to standard output.

use std::io;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// Receives rendered text, routed by logical output name.
///
/// Concurrency note: the engine itself does not serialize sink access. If
/// generation items are rendered concurrently against a shared registry,
/// the sink implementation must serialize or isolate writes per logical
/// output name.
#[async_trait]
pub trait OutputSink {
    /// Route subsequent writes to the given logical output.
    async fn set_out(&mut self, name: &str) -> io::Result<()>;

    /// Write rendered text to the current output.
    async fn write_text(&mut self, text: &str) -> io::Result<()>;
}

/// Sink writing each logical output to a file under a root directory.
///
/// `set_out` creates (or truncates) `<root>/<name>`, creating intermediate
/// directories as needed. Writing before the first `set_out` is an error.
pub struct DirectorySink {
    root: PathBuf,
    current: Option<fs::File>,
}

impl DirectorySink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            current: None,
        }
    }
}

#[async_trait]
impl OutputSink for DirectorySink {
    async fn set_out(&mut self, name: &str) -> io::Result<()> {
        let path = self.root.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        debug!(path = %path.display(), "opening output file");
        self.current = Some(fs::File::create(&path).await?);
        Ok(())
    }

    async fn write_text(&mut self, text: &str) -> io::Result<()> {
        match &mut self.current {
            Some(file) => {
                file.write_all(text.as_bytes()).await?;
                file.flush().await
            }
            None => Err(io::Error::other("no output selected, call set_out first")),
        }
    }
}

/// Sink streaming every output to standard output; `set_out` is a no-op.
pub struct StdoutSink {
    stdout: tokio::io::Stdout,
}

impl StdoutSink {
    pub fn new() -> Self {
        Self {
            stdout: tokio::io::stdout(),
        }
    }
}

impl Default for StdoutSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OutputSink for StdoutSink {
    async fn set_out(&mut self, _name: &str) -> io::Result<()> {
        Ok(())
    }

    async fn write_text(&mut self, text: &str) -> io::Result<()> {
        self.stdout.write_all(text.as_bytes()).await?;
        self.stdout.flush().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_directory_sink_writes_files() {
        let temp_dir = TempDir::new().unwrap();
        let mut sink = DirectorySink::new(temp_dir.path().join("out"));

        sink.set_out("a.txt").await.unwrap();
        sink.write_text("alpha").await.unwrap();
        sink.set_out("sub/b.txt").await.unwrap();
        sink.write_text("beta").await.unwrap();

        let a = std::fs::read_to_string(temp_dir.path().join("out/a.txt")).unwrap();
        let b = std::fs::read_to_string(temp_dir.path().join("out/sub/b.txt")).unwrap();
        assert_eq!(a, "alpha");
        assert_eq!(b, "beta");
    }

    #[tokio::test]
    async fn test_directory_sink_truncates_existing_output() {
        let temp_dir = TempDir::new().unwrap();
        let mut sink = DirectorySink::new(temp_dir.path());

        sink.set_out("a.txt").await.unwrap();
        sink.write_text("first run with long content").await.unwrap();
        sink.set_out("a.txt").await.unwrap();
        sink.write_text("short").await.unwrap();

        let content = std::fs::read_to_string(temp_dir.path().join("a.txt")).unwrap();
        assert_eq!(content, "short");
    }

    #[tokio::test]
    async fn test_directory_sink_write_before_set_out() {
        let temp_dir = TempDir::new().unwrap();
        let mut sink = DirectorySink::new(temp_dir.path());

        let err = sink.write_text("orphan").await.unwrap_err();
        assert!(err.to_string().contains("set_out"));
    }
}
