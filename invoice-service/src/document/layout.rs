//! Box layout for document trees.
//!
//! Coordinates are points from the top-left corner of the page, y growing
//! downwards. Page breaks only happen between direct children of the root
//! `Page`; a child taller than the page is placed anyway and overflows.

use super::fonts::{text_width, wrap};
use super::style::{Align, Color, FontWeight, Justify, TextAlign};
use super::Node;
use thiserror::Error;

pub const A4_WIDTH: f32 = 595.28;
pub const A4_HEIGHT: f32 = 841.89;

const LINE_HEIGHT: f32 = 1.2;
const DEFAULT_FONT_SIZE: f32 = 12.0;

#[derive(Debug, Error, PartialEq)]
pub enum LayoutError {
    #[error("document root must be a page")]
    RootNotPage,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Text {
        x: f32,
        baseline: f32,
        size: f32,
        weight: FontWeight,
        color: Color,
        content: String,
    },
    Image {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        source: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout {
    pub width: f32,
    pub height: f32,
    pub elements: Vec<Element>,
}

impl PageLayout {
    fn a4() -> Self {
        Self {
            width: A4_WIDTH,
            height: A4_HEIGHT,
            elements: Vec::new(),
        }
    }
}

/// Inherited text properties.
#[derive(Debug, Clone, Copy)]
struct TextContext {
    size: f32,
    weight: FontWeight,
    color: Color,
    align: TextAlign,
}

impl Default for TextContext {
    fn default() -> Self {
        Self {
            size: DEFAULT_FONT_SIZE,
            weight: FontWeight::Normal,
            color: Color::BLACK,
            align: TextAlign::Left,
        }
    }
}

impl TextContext {
    fn inherit(self, node: &Node) -> Self {
        let style = node.style();
        Self {
            size: style.font_size.unwrap_or(self.size),
            weight: style.font_weight.unwrap_or(self.weight),
            color: style.color.unwrap_or(self.color),
            align: style.text_align.unwrap_or(self.align),
        }
    }

    fn line_height(&self) -> f32 {
        self.size * LINE_HEIGHT
    }
}

/// Lay out a `Page` tree on as many A4 pages as its top-level children need.
pub fn layout(root: &Node) -> Result<Vec<PageLayout>, LayoutError> {
    let Node::Page { style, children } = root else {
        return Err(LayoutError::RootNotPage);
    };

    let ctx = TextContext::default().inherit(root);
    let inner_x = style.padding;
    let inner_width = A4_WIDTH - 2.0 * style.padding;
    let top = style.padding;
    let bottom = A4_HEIGHT - style.padding;

    let mut pages = Vec::new();
    let mut page = PageLayout::a4();
    let mut cursor = top;

    for child in children {
        let child_style = child.style();
        let width = child_width(child, inner_width, style.align_items, ctx);
        let height = node_height(child, width, ctx);
        let needed = child_style.margin_top + height + child_style.margin_bottom;

        if cursor + needed > bottom && !page.elements.is_empty() {
            pages.push(std::mem::replace(&mut page, PageLayout::a4()));
            cursor = top;
        }

        cursor += child_style.margin_top;
        let x = inner_x + cross_offset(style.align_items, inner_width, width);
        place(child, x, cursor, width, ctx, &mut page.elements);
        cursor += height + child_style.margin_bottom;
    }

    pages.push(page);
    Ok(pages)
}

fn cross_offset(align: Align, available: f32, used: f32) -> f32 {
    match align {
        Align::Stretch | Align::Start => 0.0,
        Align::Center => (available - used) / 2.0,
        Align::End => available - used,
    }
}

/// Width of a child inside a column-like parent.
fn child_width(child: &Node, inner: f32, align: Align, ctx: TextContext) -> f32 {
    match child.style().width {
        Some(width) => width.resolve(inner),
        None if align == Align::Stretch => inner,
        None => intrinsic_width(child, inner, ctx),
    }
}

/// Width of a child inside a row: declared width, else content width.
fn row_child_width(child: &Node, inner: f32, ctx: TextContext) -> f32 {
    match child.style().width {
        Some(width) => width.resolve(inner),
        None => intrinsic_width(child, inner, ctx),
    }
}

fn intrinsic_width(node: &Node, available: f32, ctx: TextContext) -> f32 {
    let style = node.style();
    if let Some(width) = style.width {
        return width.resolve(available);
    }

    let ctx = ctx.inherit(node);
    let pad = 2.0 * style.padding;
    let inner = (available - pad).max(0.0);
    let content = match node {
        Node::Text { content, .. } => text_width(content, ctx.size, ctx.weight),
        Node::Image { .. } => 0.0,
        Node::Page { children, .. } | Node::Column { children, .. } => children
            .iter()
            .map(|child| intrinsic_width(child, inner, ctx))
            .fold(0.0, f32::max),
        Node::Row { children, .. } => children
            .iter()
            .map(|child| row_child_width(child, inner, ctx))
            .sum(),
    };
    (content + pad).min(available)
}

fn node_height(node: &Node, width: f32, ctx: TextContext) -> f32 {
    let style = node.style();
    if let Some(height) = style.height {
        return height;
    }

    let ctx = ctx.inherit(node);
    let pad = 2.0 * style.padding;
    let inner = (width - pad).max(0.0);
    let content = match node {
        Node::Text { content, .. } => {
            let lines = wrap(content, inner, ctx.size, ctx.weight);
            lines.len() as f32 * ctx.line_height()
        }
        Node::Image { .. } => 0.0,
        Node::Page { children, .. } | Node::Column { children, .. } => children
            .iter()
            .map(|child| {
                let w = child_width(child, inner, style.align_items, ctx);
                let s = child.style();
                s.margin_top + node_height(child, w, ctx) + s.margin_bottom
            })
            .sum(),
        Node::Row { children, .. } => children
            .iter()
            .map(|child| {
                let w = row_child_width(child, inner, ctx);
                let s = child.style();
                s.margin_top + node_height(child, w, ctx) + s.margin_bottom
            })
            .fold(0.0, f32::max),
    };
    content + pad
}

fn place(node: &Node, x: f32, y: f32, width: f32, ctx: TextContext, out: &mut Vec<Element>) {
    let style = node.style();
    let ctx = ctx.inherit(node);
    let inner_x = x + style.padding;
    let inner_y = y + style.padding;
    let inner = (width - 2.0 * style.padding).max(0.0);

    match node {
        Node::Text { content, .. } => {
            for (i, line) in wrap(content, inner, ctx.size, ctx.weight)
                .into_iter()
                .enumerate()
            {
                let line_width = text_width(&line, ctx.size, ctx.weight);
                let dx = match ctx.align {
                    TextAlign::Left => 0.0,
                    TextAlign::Center => (inner - line_width) / 2.0,
                    TextAlign::Right => inner - line_width,
                };
                out.push(Element::Text {
                    x: inner_x + dx,
                    baseline: inner_y + i as f32 * ctx.line_height() + ctx.size,
                    size: ctx.size,
                    weight: ctx.weight,
                    color: ctx.color,
                    content: line,
                });
            }
        }
        Node::Image { source, .. } => out.push(Element::Image {
            x,
            y,
            width,
            height: style.height.unwrap_or(0.0),
            source: source.clone(),
        }),
        Node::Page { children, .. } | Node::Column { children, .. } => {
            let mut cursor = inner_y;
            for child in children {
                let s = child.style();
                let w = child_width(child, inner, style.align_items, ctx);
                let h = node_height(child, w, ctx);
                cursor += s.margin_top;
                let cx = inner_x + cross_offset(style.align_items, inner, w);
                place(child, cx, cursor, w, ctx, out);
                cursor += h + s.margin_bottom;
            }
        }
        Node::Row { children, .. } => {
            let widths: Vec<f32> = children
                .iter()
                .map(|child| row_child_width(child, inner, ctx))
                .collect();
            let heights: Vec<f32> = children
                .iter()
                .zip(&widths)
                .map(|(child, w)| node_height(child, *w, ctx))
                .collect();
            let row_height = children
                .iter()
                .zip(&heights)
                .map(|(child, h)| child.style().margin_top + h + child.style().margin_bottom)
                .fold(0.0, f32::max);

            let free = (inner - widths.iter().sum::<f32>()).max(0.0);
            let (mut cursor, gap) = match style.justify {
                Justify::Start => (inner_x, 0.0),
                Justify::Center => (inner_x + free / 2.0, 0.0),
                Justify::End => (inner_x + free, 0.0),
                Justify::SpaceBetween if children.len() > 1 => {
                    (inner_x, free / (children.len() - 1) as f32)
                }
                Justify::SpaceBetween => (inner_x, 0.0),
            };

            for ((child, w), h) in children.iter().zip(&widths).zip(&heights) {
                let s = child.style();
                let outer = s.margin_top + h + s.margin_bottom;
                let cy = inner_y
                    + s.margin_top
                    + match style.align_items {
                        Align::Stretch | Align::Start => 0.0,
                        Align::Center => (row_height - outer) / 2.0,
                        Align::End => row_height - outer,
                    };
                place(child, cursor, cy, *w, ctx, out);
                cursor += w + gap;
            }
        }
    }
}
