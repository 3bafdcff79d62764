use ego_tree::NodeRef;
use frameprobe_core::{DocumentSnapshot, FormInfo, InputField};
use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Elements whose text never renders.
const HIDDEN_TEXT: &[&str] = &["script", "style", "noscript", "template", "head"];
/// Elements that break text onto a new line when rendered.
const BLOCK_LEVEL: &[&str] = &[
    "address", "article", "aside", "blockquote", "br", "dd", "div", "dl", "dt", "fieldset",
    "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr",
    "li", "main", "nav", "ol", "p", "pre", "section", "table", "td", "th", "tr", "ul",
];

/// Where a document came from, as the document reports it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentOrigin<'a> {
    pub url: &'a str,
    pub character_set: &'a str,
    pub referrer: &'a str,
}

/// Parses `html` and captures the state probes read from a document.
pub fn snapshot_document(html: &str, origin: &DocumentOrigin<'_>) -> DocumentSnapshot {
    let doc = Html::parse_document(html);
    let base = Url::parse(origin.url).ok();

    let title = select_first(&doc, "title")
        .map(|title| collapse_whitespace(&title.text().collect::<String>()))
        .unwrap_or_default();
    let domain = base
        .as_ref()
        .and_then(|url| url.host_str())
        .unwrap_or_default()
        .to_string();

    let body_text = select_first(&doc, "body").map(|body| {
        let mut text = String::new();
        collect_rendered_text(*body, &mut text);
        collapse_whitespace(&text)
    });

    DocumentSnapshot {
        title,
        url: origin.url.to_string(),
        domain,
        ready_state: "complete".to_string(),
        character_set: origin.character_set.to_string(),
        element_count: count(&doc, "*"),
        image_count: count(&doc, "img"),
        link_count: count(&doc, "a[href], area[href]"),
        input_count: count(&doc, "input"),
        forms: collect_forms(&doc, base.as_ref()),
        body_text,
        referrer: origin.referrer.to_string(),
    }
}

/// Wraps plain text the way a browser displays a `text/plain` document.
pub fn plain_text_document(text: &str) -> String {
    let escaped = text
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;");
    format!("<html><head></head><body><pre>{escaped}</pre></body></html>")
}

fn selector(css: &str) -> Option<Selector> {
    Selector::parse(css).ok()
}

fn count(doc: &Html, css: &str) -> usize {
    selector(css).map_or(0, |sel| doc.select(&sel).count())
}

fn select_first<'a>(doc: &'a Html, css: &str) -> Option<ElementRef<'a>> {
    let sel = selector(css)?;
    doc.select(&sel).next()
}

fn collect_forms(doc: &Html, base: Option<&Url>) -> Vec<FormInfo> {
    let (Some(form_sel), Some(input_sel)) = (selector("form"), selector("input")) else {
        return Vec::new();
    };

    doc.select(&form_sel)
        .map(|form| {
            let element = form.value();
            let action = element
                .attr("action")
                .map(str::trim)
                .filter(|action| !action.is_empty())
                .map(|action| resolve_action(action, base))
                .unwrap_or_default();
            let method = element
                .attr("method")
                .map(|method| method.trim().to_ascii_lowercase())
                .unwrap_or_default();
            let inputs = form
                .select(&input_sel)
                .map(|input| {
                    let input = input.value();
                    InputField {
                        name: input.attr("name").map(str::to_string),
                        input_type: input
                            .attr("type")
                            .map(|kind| kind.trim().to_ascii_lowercase())
                            .filter(|kind| !kind.is_empty())
                            .unwrap_or_else(|| "text".to_string()),
                        value: input.attr("value").unwrap_or_default().to_string(),
                    }
                })
                .collect();
            FormInfo {
                action,
                method,
                inputs,
            }
        })
        .collect()
}

fn resolve_action(action: &str, base: Option<&Url>) -> String {
    base.and_then(|base| base.join(action).ok())
        .map(|url| url.to_string())
        .unwrap_or_else(|| action.to_string())
}

fn collect_rendered_text(node: NodeRef<'_, Node>, out: &mut String) {
    match node.value() {
        Node::Text(text) => out.push_str(text),
        Node::Element(element) => {
            let name = element.name();
            if HIDDEN_TEXT.contains(&name) {
                return;
            }
            let block = BLOCK_LEVEL.contains(&name);
            if block {
                out.push(' ');
            }
            for child in node.children() {
                collect_rendered_text(child, out);
            }
            if block {
                out.push(' ');
            }
        }
        _ => {
            for child in node.children() {
                collect_rendered_text(child, out);
            }
        }
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
