//! Reader/Writer traits and format dispatch
//!
//! Readers load a host [`GraphSnapshot`] from disk. Writers persist a computed
//! [`LayoutSnapshot`] (positioned nodes plus edges) for a renderer to pick up.

use std::fs;
use std::path::Path;

use serde::Serialize;
use thiserror::Error;

use crate::layout::LayoutSnapshot;
use crate::model::GraphSnapshot;

/// Errors that can occur during reading or writing
#[derive(Error, Debug)]
pub enum IoError {
    /// The file format is not supported
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// The file extension could not be determined
    #[error("could not determine file format from path: {0}")]
    UnknownExtension(String),

    /// An I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A parsing error occurred
    #[error("parse error: {0}")]
    Parse(String),

    /// A serialization error occurred
    #[error("write error: {0}")]
    Write(String),
}

/// Result type for reader/writer operations
pub type IoResult<T> = Result<T, IoError>;

/// A reader parses an input file into a graph snapshot
pub trait Reader {
    fn read(&self, input: &Path) -> IoResult<GraphSnapshot>;

    /// File extensions this reader can handle (e.g., ["yaml", "yml"])
    fn supported_extensions(&self) -> &[&str];

    /// Check if this reader can handle the given file extension
    fn supports_extension(&self, ext: &str) -> bool {
        self.supported_extensions()
            .iter()
            .any(|e| e.eq_ignore_ascii_case(ext))
    }
}

/// A writer outputs a computed layout in a specific format
pub trait Writer {
    fn write(&self, layout: &LayoutSnapshot, output: &Path) -> IoResult<()>;

    /// Identifier for this output format (e.g., "json", "yaml")
    fn format_id(&self) -> &str;
}

/// JSON snapshot reader
pub struct JsonReader;

impl Reader for JsonReader {
    fn read(&self, input: &Path) -> IoResult<GraphSnapshot> {
        let content = fs::read_to_string(input)?;
        serde_json::from_str(&content).map_err(|e| IoError::Parse(e.to_string()))
    }

    fn supported_extensions(&self) -> &[&str] {
        &["json"]
    }
}

/// YAML snapshot reader
pub struct YamlReader;

impl Reader for YamlReader {
    fn read(&self, input: &Path) -> IoResult<GraphSnapshot> {
        let content = fs::read_to_string(input)?;
        serde_yaml::from_str(&content).map_err(|e| IoError::Parse(e.to_string()))
    }

    fn supported_extensions(&self) -> &[&str] {
        &["yaml", "yml"]
    }
}

/// Pretty-printed JSON layout writer
pub struct JsonWriter;

impl Writer for JsonWriter {
    fn write(&self, layout: &LayoutSnapshot, output: &Path) -> IoResult<()> {
        write_json(layout, output)
    }

    fn format_id(&self) -> &str {
        "json"
    }
}

/// YAML layout writer
pub struct YamlWriter;

impl Writer for YamlWriter {
    fn write(&self, layout: &LayoutSnapshot, output: &Path) -> IoResult<()> {
        write_yaml(layout, output)
    }

    fn format_id(&self) -> &str {
        "yaml"
    }
}

fn ensure_parent(output: &Path) -> IoResult<()> {
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

fn write_json<T: Serialize>(value: &T, output: &Path) -> IoResult<()> {
    let json = serde_json::to_string_pretty(value).map_err(|e| IoError::Write(e.to_string()))?;
    ensure_parent(output)?;
    fs::write(output, json)?;
    Ok(())
}

fn write_yaml<T: Serialize>(value: &T, output: &Path) -> IoResult<()> {
    let yaml = serde_yaml::to_string(value).map_err(|e| IoError::Write(e.to_string()))?;
    ensure_parent(output)?;
    fs::write(output, yaml)?;
    Ok(())
}

/// Save a host snapshot, picking JSON or YAML from the file extension
pub fn save_snapshot(snapshot: &GraphSnapshot, output: &Path) -> IoResult<()> {
    let ext = FormatRegistry::extension_from_path(output)
        .ok_or_else(|| IoError::UnknownExtension(output.display().to_string()))?;
    match ext.to_ascii_lowercase().as_str() {
        "json" => write_json(snapshot, output),
        "yaml" | "yml" => write_yaml(snapshot, output),
        other => Err(IoError::UnsupportedFormat(other.to_string())),
    }
}

/// Registry of available readers and writers
pub struct FormatRegistry {
    readers: Vec<Box<dyn Reader + Send + Sync>>,
    writers: Vec<Box<dyn Writer + Send + Sync>>,
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FormatRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            readers: Vec::new(),
            writers: Vec::new(),
        }
    }

    /// Create a registry with the JSON and YAML readers and writers registered
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register_reader(Box::new(JsonReader));
        registry.register_reader(Box::new(YamlReader));
        registry.register_writer(Box::new(JsonWriter));
        registry.register_writer(Box::new(YamlWriter));
        registry
    }

    pub fn register_reader(&mut self, reader: Box<dyn Reader + Send + Sync>) {
        self.readers.push(reader);
    }

    pub fn register_writer(&mut self, writer: Box<dyn Writer + Send + Sync>) {
        self.writers.push(writer);
    }

    /// Find a reader for the given file extension
    pub fn reader_for_extension(&self, ext: &str) -> Option<&dyn Reader> {
        self.readers
            .iter()
            .find(|r| r.supports_extension(ext))
            .map(|r| r.as_ref() as &dyn Reader)
    }

    /// Find a writer by format ID
    pub fn writer_for_format(&self, format_id: &str) -> Option<&dyn Writer> {
        self.writers
            .iter()
            .find(|w| w.format_id().eq_ignore_ascii_case(format_id))
            .map(|w| w.as_ref() as &dyn Writer)
    }

    /// Get file extension from a path
    pub fn extension_from_path(path: &Path) -> Option<&str> {
        path.extension().and_then(|e| e.to_str())
    }

    /// Find a reader for the given path based on its extension
    pub fn reader_for_path(&self, path: &Path) -> IoResult<&dyn Reader> {
        let ext = Self::extension_from_path(path)
            .ok_or_else(|| IoError::UnknownExtension(path.display().to_string()))?;

        self.reader_for_extension(ext)
            .ok_or_else(|| IoError::UnsupportedFormat(ext.to_string()))
    }

    /// Read a snapshot, dispatching on the file extension
    pub fn read_snapshot(&self, path: &Path) -> IoResult<GraphSnapshot> {
        self.reader_for_path(path)?.read(path)
    }
}
