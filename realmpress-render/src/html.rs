//! Markdown-to-HTML conversion.
//!
//! pulldown-cmark does the heavy lifting; post-processing then turns the
//! assembler's `((+…))` slug markers into heading ids and hierarchy
//! classes, and makes external links open in a new browsing context.

use crate::css::DEFAULT_CSS;
use crate::error::{RenderError, RenderResult};
use once_cell::sync::Lazy;
use pulldown_cmark::{html, Options, Parser};
use regex::{Captures, Regex};
use std::path::{Path, PathBuf};
use tracing::warn;

static MARKED_HEADING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<h([1-6])>(.*?)\s*\(\((\++)([\w-]+)\)\)</h[1-6]>").unwrap()
});
static EXTERNAL_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"<a href="(https?://[^"]*)">"#).unwrap());
static IMG_SRC: Lazy<Regex> = Lazy::new(|| Regex::new(r#"<img src="([^"]+)""#).unwrap());

#[derive(Clone, Debug, Default)]
pub struct HtmlOptions {
    pub title: String,
    /// External CSS file; the embedded default is used when this is
    /// absent or unreadable.
    pub stylesheet: Option<PathBuf>,
    /// Directory local image references resolve against. Images found
    /// there are inlined as base64 data URIs so the document is
    /// self-contained; missing files keep their original reference.
    pub image_root: Option<PathBuf>,
}

/// Renders the worldbook Markdown into one self-contained HTML document.
pub fn render_html(markdown: &str, options: &HtmlOptions) -> RenderResult<String> {
    let mut cmark_opts = Options::empty();
    cmark_opts.insert(Options::ENABLE_TABLES);
    cmark_opts.insert(Options::ENABLE_STRIKETHROUGH);
    let parser = Parser::new_ext(markdown, cmark_opts);

    let mut body = String::with_capacity(markdown.len() * 2);
    html::push_html(&mut body, parser);

    let body = MARKED_HEADING.replace_all(&body, |caps: &Captures| {
        let level = &caps[1];
        let text = caps[2].trim_end();
        let depth = caps[3].len();
        let anchor = &caps[4];
        format!(r#"<h{level} id="{anchor}" class="hierarchy-level-{depth}">{text}</h{level}>"#)
    });
    let body = EXTERNAL_LINK.replace_all(
        &body,
        r#"<a href="$1" target="_blank" rel="noopener noreferrer">"#,
    );
    let body = embed_local_images(&body, options.image_root.as_deref());

    let css = load_stylesheet(options.stylesheet.as_deref());
    Ok(format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{}</title>\n<style>{}</style>\n</head>\n<body>\n{}</body>\n</html>\n",
        escape_html(&options.title),
        css,
        body
    ))
}

/// Inlines local image references as base64 data URIs.
///
/// Remote (`http…`) and already-inlined (`data:`) sources pass through.
/// A reference that does not resolve to a readable file is logged and
/// left as-is, never an abort.
fn embed_local_images(body: &str, image_root: Option<&Path>) -> String {
    use base64::{engine::general_purpose::STANDARD, Engine};

    IMG_SRC
        .replace_all(body, |caps: &regex::Captures| {
            let src = &caps[1];
            if src.starts_with("http://") || src.starts_with("https://") || src.starts_with("data:")
            {
                return caps[0].to_string();
            }
            let path = match image_root {
                Some(root) => root.join(src),
                None => PathBuf::from(src),
            };
            match std::fs::read(&path) {
                Ok(bytes) => {
                    let mime = image_mime(&path);
                    format!(r#"<img src="data:{mime};base64,{}""#, STANDARD.encode(bytes))
                }
                Err(err) => {
                    warn!(src, path = %path.display(), %err, "image not embedded");
                    caps[0].to_string()
                }
            }
        })
        .into_owned()
}

fn image_mime(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        _ => "image/jpeg",
    }
}

/// Loads the configured stylesheet, falling back to the embedded default.
/// A missing or unreadable file is logged and never aborts the render.
fn load_stylesheet(path: Option<&Path>) -> String {
    match path {
        Some(path) => match std::fs::read_to_string(path) {
            Ok(css) => css,
            Err(err) => {
                warn!(path = %path.display(), %err, "stylesheet unreadable, using default");
                DEFAULT_CSS.to_string()
            }
        },
        None => DEFAULT_CSS.to_string(),
    }
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Writes the rendered document to disk.
pub fn write_html(path: &Path, html: &str) -> RenderResult<()> {
    std::fs::write(path, html).map_err(|source| RenderError::Io {
        path: path.to_path_buf(),
        source,
    })
}
