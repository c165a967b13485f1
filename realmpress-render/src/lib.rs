//! Rendering adapters for RealmPress.
//!
//! Two stages: [`render_html`] turns the assembled Markdown into one
//! styled, self-contained HTML document; [`PdfRenderer`] is the pluggable
//! seam to an external HTML-to-PDF tool, implemented for wkhtmltopdf.

mod css;
mod error;
mod html;
mod pdf;

pub use error::{RenderError, RenderResult};
pub use html::{render_html, write_html, HtmlOptions};
pub use pdf::{PdfRenderer, Wkhtmltopdf};
