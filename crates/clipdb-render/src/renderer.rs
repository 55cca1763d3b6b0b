use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::document::Document;

/// Turns a finished document into the contents of an output file.
pub trait Renderer {
    fn extension(&self) -> &'static str;
    fn render(&self, document: &Document) -> String;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Txt,
    Markdown,
    Html,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown output format {0:?} (expected txt, md or html)")]
pub struct UnknownFormat(pub String);

impl FromStr for OutputFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "txt" | "text" => Ok(Self::Txt),
            "md" | "markdown" => Ok(Self::Markdown),
            "html" | "htm" => Ok(Self::Html),
            _ => Err(UnknownFormat(s.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Txt => "txt",
            Self::Markdown => "md",
            Self::Html => "html",
        })
    }
}

impl OutputFormat {
    /// `None` for plain text: the book file is already the output.
    pub fn renderer(self) -> Option<Box<dyn Renderer>> {
        match self {
            Self::Txt => None,
            Self::Markdown => Some(Box::new(MarkdownRenderer)),
            Self::Html => Some(Box::new(HtmlRenderer)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownRenderer;

impl Renderer for MarkdownRenderer {
    fn extension(&self) -> &'static str {
        "md"
    }

    fn render(&self, document: &Document) -> String {
        let mut out = format!("# {}\n\n", document.title());
        for entry in document.entries() {
            out.push_str(&entry.body);
            out.push_str("\n\n");
            if let Some(meta) = &entry.metadata {
                out.push_str(&format!("*{}*\n\n", meta.trim()));
            }
            out.push_str("---\n\n");
        }
        out
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRenderer;

impl Renderer for HtmlRenderer {
    fn extension(&self) -> &'static str {
        "html"
    }

    fn render(&self, document: &Document) -> String {
        let title = escape_html(document.title());
        let mut out = format!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
             <title>{title}</title>\n<style>\n\
             body {{ margin: 40px 25px; font-family: Georgia, serif; }}\n\
             h1 {{ text-align: center; }}\n\
             .highlight {{ font-size: 15pt; color: #000; }}\n\
             .meta {{ font-size: 11pt; color: #4d4d4d; }}\n\
             hr {{ border: 0; border-top: 1px solid #bfbfbf; width: 60%; }}\n\
             </style>\n</head>\n<body>\n<h1>{title}</h1>\n"
        );
        for entry in document.entries() {
            out.push_str(&format!("<p class=\"highlight\">{}</p>\n", escape_html(&entry.body)));
            if let Some(meta) = &entry.metadata {
                out.push_str(&format!("<p class=\"meta\">{}</p>\n", escape_html(meta)));
            }
            out.push_str("<hr>\n");
        }
        out.push_str("</body>\n</html>\n");
        out
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
