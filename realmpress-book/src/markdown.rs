//! HTML-to-Markdown conversion and anchor utilities.
//!
//! Entity bodies arrive as the rich-text HTML the source system stores.
//! The worldbook is Markdown, so a small regex-driven converter handles
//! the tag subset that actually occurs in campaign entries. Anything it
//! does not recognize is stripped rather than leaked into the output.

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

static BR: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<br\s*/?>").unwrap());
static P_OPEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<p[^>]*>").unwrap());
static P_CLOSE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)</p>").unwrap());
static HR: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<hr\s*/?>").unwrap());
static STRONG_OPEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<(strong|b)>").unwrap());
static STRONG_CLOSE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)</(strong|b)>").unwrap());
static EM_OPEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<(em|i)>").unwrap());
static EM_CLOSE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)</(em|i)>").unwrap());
static HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<h[1-6][^>]*>(.*?)</h[1-6]>").unwrap());
static IMG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<img\b[^>]*>").unwrap());
static IMG_SRC: Lazy<Regex> = Lazy::new(|| Regex::new(r#"(?i)\bsrc="([^"]*)""#).unwrap());
static IMG_ALT: Lazy<Regex> = Lazy::new(|| Regex::new(r#"(?i)\balt="([^"]*)""#).unwrap());
static LIST_ITEM: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<li[^>]*>").unwrap());
static LIST_ITEM_CLOSE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)</li>").unwrap());
static LIST_WRAP: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)</?(ul|ol)[^>]*>").unwrap());
static LEFTOVER_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());
static BLANK_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

/// Converts an entity body from HTML to Markdown.
///
/// Handles paragraphs, line breaks, rules, bold, italics, lists, images,
/// and inline headings (demoted to bold so they never collide with
/// chapter structure). Remaining tags are dropped, entities unescaped.
pub fn html_to_markdown(html: &str) -> String {
    let mut text = html.to_string();

    text = HEADING.replace_all(&text, "\n\n**$1**\n\n").into_owned();
    text = BR.replace_all(&text, "\n").into_owned();
    text = P_OPEN.replace_all(&text, "").into_owned();
    text = P_CLOSE.replace_all(&text, "\n\n").into_owned();
    text = HR.replace_all(&text, "\n---\n").into_owned();
    text = STRONG_OPEN.replace_all(&text, "**").into_owned();
    text = STRONG_CLOSE.replace_all(&text, "**").into_owned();
    text = EM_OPEN.replace_all(&text, "*").into_owned();
    text = EM_CLOSE.replace_all(&text, "*").into_owned();
    text = IMG
        .replace_all(&text, |caps: &regex::Captures| {
            let tag = &caps[0];
            let Some(src) = IMG_SRC.captures(tag).map(|c| c[1].to_string()) else {
                return String::new();
            };
            let alt = IMG_ALT
                .captures(tag)
                .map(|c| c[1].to_string())
                .unwrap_or_default();
            format!("![{alt}]({src})")
        })
        .into_owned();
    text = LIST_ITEM.replace_all(&text, "\n- ").into_owned();
    text = LIST_ITEM_CLOSE.replace_all(&text, "").into_owned();
    text = LIST_WRAP.replace_all(&text, "\n").into_owned();
    text = LEFTOVER_TAG.replace_all(&text, "").into_owned();

    text = unescape_entities(&text);
    text = BLANK_RUNS.replace_all(&text, "\n\n").into_owned();
    text.trim().to_string()
}

fn unescape_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// Builds an anchor slug from a display name.
///
/// NFKD-normalizes and drops combining marks so accented names slug to
/// their ASCII skeletons (`Árvíztűrő` becomes `arvizturo`), lowercases,
/// maps whitespace to hyphens, and drops anything else outside `[\w-]`.
pub fn anchor_slug(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for ch in name.nfkd() {
        if is_combining_mark(ch) {
            continue;
        }
        if ch.is_whitespace() {
            slug.push('-');
        } else if ch.is_alphanumeric() || ch == '_' || ch == '-' {
            for lower in ch.to_lowercase() {
                slug.push(lower);
            }
        }
    }
    slug
}

/// Escapes characters that would change meaning inside Markdown text.
pub fn md_escape(text: &str) -> String {
    text.replace('_', r"\_").replace('*', r"\*")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paragraphs_and_breaks() {
        let md = html_to_markdown("<p>First</p><p>Second<br/>line</p>");
        assert_eq!(md, "First\n\nSecond\nline");
    }

    #[test]
    fn bold_and_italic() {
        assert_eq!(html_to_markdown("<strong>a</strong> <em>b</em>"), "**a** *b*");
        assert_eq!(html_to_markdown("<b>a</b> <i>b</i>"), "**a** *b*");
    }

    #[test]
    fn lists_become_dashes() {
        let md = html_to_markdown("<ul><li>one</li><li>two</li></ul>");
        assert_eq!(md, "- one\n- two");
    }

    #[test]
    fn inline_headings_demote_to_bold() {
        let md = html_to_markdown("<h2>History</h2><p>Long ago.</p>");
        assert_eq!(md, "**History**\n\nLong ago.");
    }

    #[test]
    fn images_become_markdown_images() {
        let md = html_to_markdown(r#"<p><img src="gallery/map.png" alt="The Realm"></p>"#);
        assert_eq!(md, "![The Realm](gallery/map.png)");
    }

    #[test]
    fn image_attribute_order_does_not_matter() {
        let md = html_to_markdown(r#"<img alt="Crest" class="w-full" src="gallery/crest.jpg"/>"#);
        assert_eq!(md, "![Crest](gallery/crest.jpg)");
    }

    #[test]
    fn image_without_src_is_dropped() {
        assert_eq!(html_to_markdown(r#"<img alt="broken">"#), "");
    }

    #[test]
    fn unknown_tags_are_stripped() {
        assert_eq!(html_to_markdown("<figure>x</figure>"), "x");
    }

    #[test]
    fn entities_unescaped() {
        assert_eq!(html_to_markdown("Tom &amp; Jerry&nbsp;&lt;3"), "Tom & Jerry <3");
    }

    #[test]
    fn accented_slug() {
        assert_eq!(anchor_slug("Árvíztűrő tükörfúrógép"), "arvizturo-tukorfurogep");
    }

    #[test]
    fn slug_drops_punctuation() {
        assert_eq!(anchor_slug("The Inn (of Bree)!"), "the-inn-of-bree");
    }

    #[test]
    fn escape_underscores() {
        assert_eq!(md_escape("dark_lord"), r"dark\_lord");
    }
}
