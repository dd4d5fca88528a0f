//! Structured (rich) text as returned by the CMS, with plain-text and HTML
//! conversions

use serde::{Deserialize, Serialize};

use crate::helpers::{html_escape, post_path};

/// An ordered sequence of rich text blocks
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RichText(pub Vec<Block>);

/// A single block: heading, paragraph, list item, image, embed...
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Block {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub spans: Vec<Span>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oembed: Option<Embed>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Inline styling over a character range of a block's text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub data: Option<SpanData>,
}

/// Payload of hyperlink and label spans
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpanData {
    pub link_type: Option<String>,
    pub url: Option<String>,
    pub uid: Option<String>,
    pub target: Option<String>,
    pub label: Option<String>,
}

/// oEmbed payload of an embed block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Embed {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub embed_url: Option<String>,
    pub html: Option<String>,
}

impl Block {
    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }
}

impl RichText {
    pub fn blocks(&self) -> &[Block] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Plain text of every block, joined by a space
    pub fn as_text(&self) -> String {
        self.0
            .iter()
            .filter_map(|block| block.text.as_deref())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Render the blocks to HTML; consecutive list items share one list
    pub fn as_html(&self) -> String {
        let mut html = String::new();
        let mut open_list: Option<&'static str> = None;

        for block in &self.0 {
            let list = match block.kind.as_str() {
                "list-item" => Some("ul"),
                "o-list-item" => Some("ol"),
                _ => None,
            };

            if open_list != list {
                if let Some(tag) = open_list {
                    html.push_str(&format!("</{}>", tag));
                }
                if let Some(tag) = list {
                    html.push_str(&format!("<{}>", tag));
                }
                open_list = list;
            }

            html.push_str(&render_block(block));
        }

        if let Some(tag) = open_list {
            html.push_str(&format!("</{}>", tag));
        }

        html
    }
}

fn render_block(block: &Block) -> String {
    match block.kind.as_str() {
        "heading1" | "heading2" | "heading3" | "heading4" | "heading5" | "heading6" => {
            let level = &block.kind["heading".len()..];
            format!("<h{0}>{1}</h{0}>", level, render_spans(block))
        }
        "paragraph" => format!("<p{}>{}</p>", class_attr(block), render_spans(block)),
        "preformatted" => format!("<pre>{}</pre>", render_spans(block)),
        "list-item" | "o-list-item" => format!("<li>{}</li>", render_spans(block)),
        "image" => match &block.url {
            Some(url) => format!(
                r#"<p class="block-img"><img src="{}" alt="{}" /></p>"#,
                html_escape(url),
                html_escape(block.alt.as_deref().unwrap_or(""))
            ),
            None => String::new(),
        },
        "embed" => match &block.oembed {
            Some(embed) => format!(
                r#"<div data-oembed="{}" data-oembed-type="{}">{}</div>"#,
                html_escape(embed.embed_url.as_deref().unwrap_or("")),
                html_escape(embed.kind.as_deref().unwrap_or("")),
                embed.html.as_deref().unwrap_or("")
            ),
            None => String::new(),
        },
        other => {
            tracing::debug!("Skipping unsupported rich text block: {}", other);
            String::new()
        }
    }
}

fn class_attr(block: &Block) -> String {
    block
        .label
        .as_ref()
        .map(|label| format!(r#" class="{}""#, html_escape(label)))
        .unwrap_or_default()
}

/// A span with its offsets moved from UTF-16 units to char positions
struct Placed<'a> {
    start: usize,
    end: usize,
    span: &'a Span,
}

/// Render a block's text with its spans as properly nested tags.
///
/// Span offsets count UTF-16 code units, as the API reports them.
/// Overlapping spans are closed and reopened around the boundary so the
/// output stays well formed.
fn render_spans(block: &Block) -> String {
    let chars: Vec<char> = block.text().chars().collect();
    let len = chars.len();

    // UTF-16 offset at which each char starts, plus the end of the text
    let mut offsets = Vec::with_capacity(len + 1);
    let mut offset = 0;
    for c in &chars {
        offsets.push(offset);
        offset += c.len_utf16();
    }
    offsets.push(offset);
    let to_char = |unit: usize| offsets.partition_point(|&o| o < unit).min(len);

    let mut spans: Vec<Placed> = block
        .spans
        .iter()
        .map(|span| Placed {
            start: to_char(span.start),
            end: to_char(span.end),
            span,
        })
        .filter(|p| p.start < p.end && p.start < len)
        .collect();
    spans.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));

    let mut out = String::new();
    let mut stack: Vec<&Placed> = Vec::new();
    let mut next = 0;

    for pos in 0..=len {
        if let Some(first_done) = stack.iter().position(|p| p.end <= pos) {
            let reopened: Vec<&Placed> = stack.drain(first_done..).rev().collect();
            for placed in &reopened {
                out.push_str(&close_tag(placed.span));
            }
            for placed in reopened.into_iter().rev() {
                if placed.end > pos {
                    out.push_str(&open_tag(placed.span));
                    stack.push(placed);
                }
            }
        }

        while next < spans.len() && spans[next].start == pos {
            out.push_str(&open_tag(spans[next].span));
            stack.push(&spans[next]);
            next += 1;
        }

        match chars.get(pos) {
            Some('\n') => out.push_str("<br />"),
            Some('&') => out.push_str("&amp;"),
            Some('<') => out.push_str("&lt;"),
            Some('>') => out.push_str("&gt;"),
            Some('"') => out.push_str("&quot;"),
            Some('\'') => out.push_str("&#39;"),
            Some(&c) => out.push(c),
            None => {}
        }
    }

    out
}

fn open_tag(span: &Span) -> String {
    match span.kind.as_str() {
        "strong" => "<strong>".to_string(),
        "em" => "<em>".to_string(),
        "hyperlink" => {
            let data = span.data.as_ref();
            let href = data.and_then(resolve_link).unwrap_or_else(|| "#".to_string());
            let target = data
                .and_then(|d| d.target.as_deref())
                .map(|t| format!(r#" target="{}" rel="noopener""#, html_escape(t)))
                .unwrap_or_default();
            format!(r#"<a href="{}"{}>"#, html_escape(&href), target)
        }
        "label" => {
            let label = span
                .data
                .as_ref()
                .and_then(|d| d.label.as_deref())
                .unwrap_or("");
            format!(r#"<span class="{}">"#, html_escape(label))
        }
        _ => String::new(),
    }
}

fn close_tag(span: &Span) -> String {
    match span.kind.as_str() {
        "strong" => "</strong>".to_string(),
        "em" => "</em>".to_string(),
        "hyperlink" => "</a>".to_string(),
        "label" => "</span>".to_string(),
        _ => String::new(),
    }
}

/// Resolve a hyperlink target: web and media links keep their URL, document
/// links point at the post page of their uid
fn resolve_link(data: &SpanData) -> Option<String> {
    match data.link_type.as_deref() {
        Some("Document") => data.uid.as_deref().map(post_path),
        _ => data.url.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> RichText {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_as_text_joins_blocks() {
        let rt = parse(
            r#"[
                {"type": "heading1", "text": "Como utilizar Hooks", "spans": []},
                {"type": "paragraph", "text": "Pensando em sincronização", "spans": []},
                {"type": "image", "url": "https://images.prismic.io/x.png"}
            ]"#,
        );
        assert_eq!(rt.as_text(), "Como utilizar Hooks Pensando em sincronização");
    }

    #[test]
    fn test_as_html_escapes_text() {
        let rt = parse(r#"[{"type": "paragraph", "text": "a < b & c", "spans": []}]"#);
        assert_eq!(rt.as_html(), "<p>a &lt; b &amp; c</p>");
    }

    #[test]
    fn test_headings_and_preformatted() {
        let rt = parse(
            r#"[
                {"type": "heading2", "text": "Título", "spans": []},
                {"type": "preformatted", "text": "let x = 1;\nx", "spans": []}
            ]"#,
        );
        assert_eq!(
            rt.as_html(),
            "<h2>Título</h2><pre>let x = 1;<br />x</pre>"
        );
    }

    #[test]
    fn test_spans_render_inline_markup() {
        let rt = parse(
            r#"[{"type": "paragraph", "text": "Olá mundo bonito", "spans": [
                {"start": 0, "end": 3, "type": "strong"},
                {"start": 4, "end": 9, "type": "hyperlink",
                 "data": {"link_type": "Web", "url": "https://rocketseat.com.br", "target": "_blank"}}
            ]}]"#,
        );
        assert_eq!(
            rt.as_html(),
            r#"<p><strong>Olá</strong> <a href="https://rocketseat.com.br" target="_blank" rel="noopener">mundo</a> bonito</p>"#
        );
    }

    #[test]
    fn test_overlapping_spans_stay_well_formed() {
        let rt = parse(
            r#"[{"type": "paragraph", "text": "abcdef", "spans": [
                {"start": 0, "end": 4, "type": "strong"},
                {"start": 2, "end": 6, "type": "em"}
            ]}]"#,
        );
        assert_eq!(
            rt.as_html(),
            "<p><strong>ab<em>cd</em></strong><em>ef</em></p>"
        );
    }

    #[test]
    fn test_span_offsets_count_utf16_units() {
        // The rocket takes two UTF-16 units, so "abc" starts at 3
        let rt = parse(
            r#"[{"type": "paragraph", "text": "🚀 abc é🎉x", "spans": [
                {"start": 3, "end": 6, "type": "strong"},
                {"start": 7, "end": 11, "type": "em"}
            ]}]"#,
        );
        assert_eq!(
            rt.as_html(),
            "<p>🚀 <strong>abc</strong> <em>é🎉x</em></p>"
        );
    }

    #[test]
    fn test_nested_spans() {
        let rt = parse(
            r#"[{"type": "paragraph", "text": "abcd", "spans": [
                {"start": 1, "end": 3, "type": "em"},
                {"start": 0, "end": 4, "type": "strong"}
            ]}]"#,
        );
        assert_eq!(rt.as_html(), "<p><strong>a<em>bc</em>d</strong></p>");
    }

    #[test]
    fn test_document_link_points_at_post() {
        let rt = parse(
            r#"[{"type": "paragraph", "text": "leia", "spans": [
                {"start": 0, "end": 4, "type": "hyperlink",
                 "data": {"link_type": "Document", "uid": "como-utilizar-hooks"}}
            ]}]"#,
        );
        assert_eq!(
            rt.as_html(),
            r#"<p><a href="/post/como-utilizar-hooks">leia</a></p>"#
        );
    }

    #[test]
    fn test_list_items_are_grouped() {
        let rt = parse(
            r#"[
                {"type": "list-item", "text": "um", "spans": []},
                {"type": "list-item", "text": "dois", "spans": []},
                {"type": "o-list-item", "text": "três", "spans": []},
                {"type": "paragraph", "text": "fim", "spans": []}
            ]"#,
        );
        assert_eq!(
            rt.as_html(),
            "<ul><li>um</li><li>dois</li></ul><ol><li>três</li></ol><p>fim</p>"
        );
    }

    #[test]
    fn test_image_and_embed_blocks() {
        let rt = parse(
            r#"[
                {"type": "image", "url": "https://images.prismic.io/a.png", "alt": "A \"quote\""},
                {"type": "embed", "oembed": {"type": "video", "embed_url": "https://youtu.be/x", "html": "<iframe></iframe>"}}
            ]"#,
        );
        assert_eq!(
            rt.as_html(),
            r#"<p class="block-img"><img src="https://images.prismic.io/a.png" alt="A &quot;quote&quot;" /></p><div data-oembed="https://youtu.be/x" data-oembed-type="video"><iframe></iframe></div>"#
        );
    }

    #[test]
    fn test_unknown_blocks_are_skipped() {
        let rt = parse(r#"[{"type": "something-new", "text": "?"}]"#);
        assert_eq!(rt.as_html(), "");
        assert!(!rt.is_empty());
    }
}
