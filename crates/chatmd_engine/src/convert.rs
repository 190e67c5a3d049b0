use ego_tree::NodeRef;
use scraper::node::Node;
use scraper::ElementRef;

/// One child of a rich-text element, classified by how it renders.
#[derive(Debug, Clone, Copy)]
pub enum RichNode<'a> {
    Text(&'a str),
    Bold(ElementRef<'a>),
    Italic(ElementRef<'a>),
    InlineCode(ElementRef<'a>),
    CodeBlock(ElementRef<'a>),
    Link(ElementRef<'a>),
    LineBreak,
    UnorderedList(ElementRef<'a>),
    OrderedList(ElementRef<'a>),
    ListItem(ElementRef<'a>),
    Block(ElementRef<'a>),
    Other(ElementRef<'a>),
    /// Comments, doctypes and processing instructions.
    Ignored,
}

impl<'a> RichNode<'a> {
    pub fn classify(node: NodeRef<'a, Node>) -> Self {
        match node.value() {
            Node::Text(text) => RichNode::Text(text),
            Node::Element(_) => match ElementRef::wrap(node) {
                Some(element) => Self::classify_element(element),
                None => RichNode::Ignored,
            },
            _ => RichNode::Ignored,
        }
    }

    fn classify_element(element: ElementRef<'a>) -> Self {
        let tag = element.value().name().to_ascii_lowercase();
        match tag.as_str() {
            "b" | "strong" => RichNode::Bold(element),
            "i" | "em" => RichNode::Italic(element),
            "code" => RichNode::InlineCode(element),
            "pre" => RichNode::CodeBlock(element),
            "a" => RichNode::Link(element),
            "br" => RichNode::LineBreak,
            "ul" => RichNode::UnorderedList(element),
            "ol" => RichNode::OrderedList(element),
            "li" => RichNode::ListItem(element),
            "div" => RichNode::Block(element),
            _ => RichNode::Other(element),
        }
    }
}

/// Converts a message body subtree into markdown, keeping emphasis, code,
/// links, lists and block breaks.
///
/// The element passed in is the container: only its children are rendered,
/// so the body `<div>` itself adds no trailing newline.
#[derive(Debug, Default, Clone, Copy)]
pub struct RichTextConverter;

impl RichTextConverter {
    pub fn new() -> Self {
        Self
    }

    /// Markdown for an optional element; a missing element converts to `""`.
    pub fn to_markdown(&self, element: Option<ElementRef<'_>>) -> String {
        element.map(|e| self.convert(e)).unwrap_or_default()
    }

    pub fn convert(&self, element: ElementRef<'_>) -> String {
        let mut out = String::new();
        for child in element.children() {
            self.render_node(RichNode::classify(child), &mut out);
        }
        out
    }

    fn render_node(&self, node: RichNode<'_>, out: &mut String) {
        match node {
            RichNode::Text(text) => out.push_str(text),
            RichNode::Bold(element) => wrap_trimmed(out, "**", &self.convert(element)),
            RichNode::Italic(element) => wrap_trimmed(out, "*", &self.convert(element)),
            RichNode::InlineCode(element) => {
                out.push('`');
                out.push_str(&self.convert(element));
                out.push('`');
            }
            RichNode::CodeBlock(element) => {
                out.push_str("```\n");
                out.push_str(self.convert(element).trim());
                out.push_str("\n```");
            }
            RichNode::Link(element) => render_link(element, out),
            RichNode::LineBreak => out.push('\n'),
            RichNode::UnorderedList(element) => {
                for item in list_items(element) {
                    out.push_str("* ");
                    out.push_str(self.convert(item).trim());
                    out.push('\n');
                }
            }
            RichNode::OrderedList(element) => {
                for (idx, item) in list_items(element).enumerate() {
                    out.push_str(&format!("{}. ", idx + 1));
                    out.push_str(self.convert(item).trim());
                    out.push('\n');
                }
            }
            RichNode::ListItem(element) | RichNode::Other(element) => {
                out.push_str(&self.convert(element));
            }
            RichNode::Block(element) => {
                let inner = self.convert(element);
                if !inner.is_empty() {
                    out.push_str(&inner);
                    out.push('\n');
                }
            }
            RichNode::Ignored => {}
        }
    }
}

fn wrap_trimmed(out: &mut String, marker: &str, inner: &str) {
    let inner = inner.trim();
    if inner.is_empty() {
        return;
    }
    out.push_str(marker);
    out.push_str(inner);
    out.push_str(marker);
}

fn render_link(element: ElementRef<'_>, out: &mut String) {
    let text = element.text().collect::<String>();
    let text = text.trim();
    let href = element.value().attr("href").unwrap_or_default();
    match (text.is_empty(), href.is_empty()) {
        (false, false) => out.push_str(&format!("[{text}]({href})")),
        (true, false) => out.push_str(href),
        _ => {}
    }
}

/// Direct `<li>` children only; nested lists render through their own item.
fn list_items<'a>(list: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    list.children()
        .filter_map(ElementRef::wrap)
        .filter(|child| child.value().name().eq_ignore_ascii_case("li"))
}
