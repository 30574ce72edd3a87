//! Style value objects attached to every document node.
//!
//! Units are PDF points. Text properties (`font_weight`, `font_size`,
//! `color`, `text_align`) inherit down the tree when unset; box properties
//! apply to the node that carries them.

/// A box dimension, either fixed or relative to the parent's content box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Length {
    Points(f32),
    Percent(f32),
}

impl Length {
    pub fn resolve(self, container: f32) -> f32 {
        match self {
            Length::Points(value) => value,
            Length::Percent(pct) => container * pct / 100.0,
        }
    }
}

/// Distribution of children along a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Justify {
    #[default]
    Start,
    Center,
    End,
    SpaceBetween,
}

/// Placement of children across the container's cross axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Stretch,
    Start,
    Center,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Components scaled to `0.0..=1.0`.
    pub fn unit(self) -> (f32, f32, f32) {
        (
            f32::from(self.r) / 255.0,
            f32::from(self.g) / 255.0,
            f32::from(self.b) / 255.0,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Style {
    pub padding: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
    pub width: Option<Length>,
    pub height: Option<f32>,
    pub justify: Justify,
    pub align_items: Align,
    pub font_weight: Option<FontWeight>,
    pub font_size: Option<f32>,
    pub color: Option<Color>,
    pub text_align: Option<TextAlign>,
}

impl Style {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn padding(mut self, padding: f32) -> Self {
        self.padding = padding;
        self
    }

    pub fn margin_top(mut self, margin: f32) -> Self {
        self.margin_top = margin;
        self
    }

    pub fn margin_bottom(mut self, margin: f32) -> Self {
        self.margin_bottom = margin;
        self
    }

    pub fn width(mut self, width: Length) -> Self {
        self.width = Some(width);
        self
    }

    pub fn height(mut self, height: f32) -> Self {
        self.height = Some(height);
        self
    }

    pub fn justify(mut self, justify: Justify) -> Self {
        self.justify = justify;
        self
    }

    pub fn align_items(mut self, align: Align) -> Self {
        self.align_items = align;
        self
    }

    pub fn bold(mut self) -> Self {
        self.font_weight = Some(FontWeight::Bold);
        self
    }

    pub fn font_size(mut self, size: f32) -> Self {
        self.font_size = Some(size);
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn text_align(mut self, align: TextAlign) -> Self {
        self.text_align = Some(align);
        self
    }
}
