//! Document tree to PDF bytes.

use super::layout::{layout, Element, LayoutError, PageLayout};
use super::style::FontWeight;
use super::Node;
use async_trait::async_trait;
use futures::future::try_join_all;
use printpdf::image_crate::{self, DynamicImage, RgbImage};
use printpdf::{BuiltinFont, ImageTransform, Mm, PdfDocument, Pt};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error("failed to fetch image {url}: {reason}")]
    ImageFetch { url: String, reason: String },

    #[error("failed to decode image {url}: {reason}")]
    ImageDecode { url: String, reason: String },

    #[error("image {0} was not loaded")]
    ImageMissing(String),

    #[error("failed to write PDF: {0}")]
    Pdf(String),
}

/// Turns a document tree into a paginated binary document.
///
/// Output is all-or-nothing: any failure yields an error and no bytes.
#[async_trait]
pub trait DocumentRenderer: Send + Sync {
    async fn render(&self, tree: &Node) -> Result<Vec<u8>, RenderError>;
}

/// Decoded raster, flattened onto white.
struct LoadedImage {
    pixels: DynamicImage,
    width: u32,
    height: u32,
}

#[derive(Clone)]
pub struct PdfRenderer {
    http: reqwest::Client,
    title: String,
}

impl PdfRenderer {
    pub fn new(http: reqwest::Client, title: impl Into<String>) -> Self {
        Self {
            http,
            title: title.into(),
        }
    }

    async fn fetch_image(&self, url: &str) -> Result<(String, LoadedImage), RenderError> {
        let fetch_error = |e: reqwest::Error| RenderError::ImageFetch {
            url: url.to_string(),
            reason: e.to_string(),
        };

        let bytes = self
            .http
            .get(url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(fetch_error)?
            .bytes()
            .await
            .map_err(fetch_error)?;

        let decoded =
            image_crate::load_from_memory(&bytes).map_err(|e| RenderError::ImageDecode {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        tracing::debug!(url = %url, size = bytes.len(), "Fetched document image");
        Ok((url.to_string(), flatten_onto_white(&decoded)))
    }
}

#[async_trait]
impl DocumentRenderer for PdfRenderer {
    async fn render(&self, tree: &Node) -> Result<Vec<u8>, RenderError> {
        let pages = layout(tree)?;

        let images: HashMap<String, LoadedImage> = try_join_all(
            tree.image_sources()
                .into_iter()
                .map(|url| self.fetch_image(url)),
        )
        .await?
        .into_iter()
        .collect();

        let title = self.title.clone();
        tokio::task::spawn_blocking(move || write_pdf(&title, &pages, &images))
            .await
            .map_err(|e| RenderError::Pdf(e.to_string()))?
    }
}

fn flatten_onto_white(image: &DynamicImage) -> LoadedImage {
    let rgba = image.to_rgba8();
    let rgb = RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let alpha = u16::from(a);
        let blend = |c: u8| ((u16::from(c) * alpha + 255 * (255 - alpha)) / 255) as u8;
        image_crate::Rgb([blend(r), blend(g), blend(b)])
    });
    LoadedImage {
        width: rgb.width(),
        height: rgb.height(),
        pixels: DynamicImage::ImageRgb8(rgb),
    }
}

fn pdf_error(err: impl std::fmt::Display) -> RenderError {
    RenderError::Pdf(err.to_string())
}

fn mm(points: f32) -> Mm {
    Mm::from(Pt(points))
}

fn write_pdf(
    title: &str,
    pages: &[PageLayout],
    images: &HashMap<String, LoadedImage>,
) -> Result<Vec<u8>, RenderError> {
    let Some(first) = pages.first() else {
        return Err(RenderError::Pdf("document has no pages".to_string()));
    };

    let (doc, first_page, first_layer) =
        PdfDocument::new(title, mm(first.width), mm(first.height), "Layer 1");
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(pdf_error)?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(pdf_error)?;

    for (index, page) in pages.iter().enumerate() {
        let layer = if index == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page_index, layer_index) =
                doc.add_page(mm(page.width), mm(page.height), "Layer 1");
            doc.get_page(page_index).get_layer(layer_index)
        };

        for element in &page.elements {
            match element {
                Element::Text {
                    x,
                    baseline,
                    size,
                    weight,
                    color,
                    content,
                } => {
                    let (r, g, b) = color.unit();
                    layer.set_fill_color(printpdf::Color::Rgb(printpdf::Rgb::new(r, g, b, None)));
                    let font = match weight {
                        FontWeight::Normal => &regular,
                        FontWeight::Bold => &bold,
                    };
                    layer.use_text(
                        content.as_str(),
                        *size,
                        mm(*x),
                        mm(page.height - baseline),
                        font,
                    );
                }
                Element::Image {
                    x,
                    y,
                    width,
                    height,
                    source,
                } => {
                    let image = images
                        .get(source)
                        .ok_or_else(|| RenderError::ImageMissing(source.clone()))?;
                    // At 72 dpi one pixel is one point.
                    let transform = ImageTransform {
                        translate_x: Some(mm(*x)),
                        translate_y: Some(mm(page.height - y - height)),
                        scale_x: Some(width / image.width as f32),
                        scale_y: Some(height / image.height as f32),
                        dpi: Some(72.0),
                        ..Default::default()
                    };
                    printpdf::Image::from_dynamic_image(&image.pixels)
                        .add_to_layer(layer.clone(), transform);
                }
            }
        }
    }

    doc.save_to_bytes().map_err(pdf_error)
}
