//! clipdb-render
//!
//! Formats the per-book text files produced by the pipeline. Each book is
//! read back, re-collapsed, assembled into a [`Document`] and handed to a
//! [`Renderer`].

pub mod document;
pub mod reader;
pub mod renderer;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use clipdb_core::TextCodec;

pub use document::{Document, DocumentBuilder, Highlight};
pub use reader::read_book;
pub use renderer::{HtmlRenderer, MarkdownRenderer, OutputFormat, Renderer, UnknownFormat};

/// Render one book file next to itself. For [`OutputFormat::Txt`] the book
/// file already is the artifact and its path is returned unchanged.
pub fn render_book(path: &Path, format: OutputFormat, codec: &TextCodec) -> Result<PathBuf> {
    let Some(renderer) = format.renderer() else {
        return Ok(path.to_path_buf());
    };
    let title = path.file_stem().map(|s| s.to_string_lossy().to_string()).unwrap_or_default();
    let highlights = read_book(path, codec).with_context(|| format!("reading {}", path.display()))?;
    let document = DocumentBuilder::new(title).entries(highlights).build();

    let out = path.with_extension(renderer.extension());
    std::fs::write(&out, renderer.render(&document))
        .with_context(|| format!("writing {}", out.display()))?;
    tracing::info!(book = %document.title(), output = %out.display(), "rendered book");
    Ok(out)
}

pub fn render_all<'a, I>(paths: I, format: OutputFormat, codec: &TextCodec) -> Result<Vec<PathBuf>>
where
    I: IntoIterator<Item = &'a PathBuf>,
{
    let paths: Vec<&PathBuf> = paths.into_iter().collect();
    tracing::info!(format = %format, books = paths.len(), "converting highlights");
    paths.into_iter().map(|p| render_book(p, format, codec)).collect()
}

/// Book files (`*.txt`) directly under `dir`, sorted.
pub fn book_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(walkdir::DirEntry::into_path)
        .filter(|p| p.extension().and_then(|s| s.to_str()) == Some("txt"))
        .collect();
    files.sort();
    files
}
