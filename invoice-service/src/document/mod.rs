//! Renderer-independent document description.
//!
//! A document is an immutable tree of [`Node`]s built bottom-up by a
//! composer and handed once to a [`DocumentRenderer`].

pub mod fonts;
pub mod layout;
pub mod render;
pub mod style;

pub use render::{DocumentRenderer, PdfRenderer, RenderError};
pub use style::{Align, Color, FontWeight, Justify, Length, Style, TextAlign};

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Root container. Direct children are kept whole across page breaks.
    Page { style: Style, children: Vec<Node> },
    /// Lays children out left to right.
    Row { style: Style, children: Vec<Node> },
    /// Lays children out top to bottom.
    Column { style: Style, children: Vec<Node> },
    Text { style: Style, content: String },
    /// Raster image fetched from `source` at render time.
    Image { style: Style, source: String },
}

impl Node {
    pub fn page(style: Style, children: Vec<Node>) -> Self {
        Node::Page { style, children }
    }

    pub fn row(style: Style, children: Vec<Node>) -> Self {
        Node::Row { style, children }
    }

    pub fn column(style: Style, children: Vec<Node>) -> Self {
        Node::Column { style, children }
    }

    pub fn text(style: Style, content: impl Into<String>) -> Self {
        Node::Text {
            style,
            content: content.into(),
        }
    }

    pub fn image(style: Style, source: impl Into<String>) -> Self {
        Node::Image {
            style,
            source: source.into(),
        }
    }

    pub fn style(&self) -> &Style {
        match self {
            Node::Page { style, .. }
            | Node::Row { style, .. }
            | Node::Column { style, .. }
            | Node::Text { style, .. }
            | Node::Image { style, .. } => style,
        }
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Node::Page { children, .. }
            | Node::Row { children, .. }
            | Node::Column { children, .. } => children,
            Node::Text { .. } | Node::Image { .. } => &[],
        }
    }

    /// Every image source in document order, without duplicates.
    pub fn image_sources(&self) -> Vec<&str> {
        let mut sources = Vec::new();
        self.collect_image_sources(&mut sources);
        sources
    }

    fn collect_image_sources<'a>(&'a self, sources: &mut Vec<&'a str>) {
        if let Node::Image { source, .. } = self {
            if !sources.contains(&source.as_str()) {
                sources.push(source.as_str());
            }
        }
        for child in self.children() {
            child.collect_image_sources(sources);
        }
    }

    /// Concatenated text of every `Text` leaf, one per line.
    pub fn plain_text(&self) -> String {
        let mut lines = Vec::new();
        self.collect_text(&mut lines);
        lines.join("\n")
    }

    fn collect_text<'a>(&'a self, lines: &mut Vec<&'a str>) {
        if let Node::Text { content, .. } = self {
            lines.push(content.as_str());
        }
        for child in self.children() {
            child.collect_text(lines);
        }
    }
}
