//! Proxy sheet PDF output.
//!
//! Renders a flattened print list onto landscape letter pages following a
//! [`PageLayout`]. Images that fail to load are replaced by an outlined
//! placeholder with the card name, and rendering carries on with the rest.
//!
//! Each distinct image is JPEG-compressed once and embedded at most once per
//! page; further copies on that page draw the same image object again.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use chrono::NaiveDate;
use image::DynamicImage;
use image::codecs::jpeg::JpegEncoder;
use image::ColorType;
use printpdf::lopdf::content::Operation;
use printpdf::lopdf::Object;
use printpdf::{
    BuiltinFont, Color, ColorBits, ColorSpace, CurTransMat, Image, ImageFilter, ImageTransform,
    ImageXObject, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Point, Px, Rgb,
};

use crate::config;
use crate::error::{CompanionError, Result};
use crate::layout::{CardPlacement, LayoutParams, PageLayout};
use crate::models::PrintListItem;

/// Resolution images are embedded at before scaling to card size.
const EMBED_DPI: f32 = 300.0;
const PLACEHOLDER_FONT_SIZE: f32 = 10.0;
const PLACEHOLDER_LINE_MM: f32 = 0.4;
const JPEG_QUALITY: u8 = 90;
const PT_PER_INCH: f64 = 72.0;

/// `proxy-cards-<YYYY-MM-DD>.pdf`
pub fn proxy_filename(date: NaiveDate) -> String {
    format!("proxy-cards-{}.pdf", date.format("%Y-%m-%d"))
}

/// File name for a sheet generated today.
pub fn default_proxy_filename() -> String {
    proxy_filename(chrono::Local::now().date_naive())
}

/// Summary of a rendered document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderReport {
    pub pages: usize,
    pub cards: usize,
    /// Names of cards drawn as placeholders.
    pub placeholders: Vec<String>,
}

/// Writes proxy cards into a PDF document.
pub struct ProxySheetWriter {
    params: LayoutParams,
    title: String,
}

impl ProxySheetWriter {
    pub fn new(params: LayoutParams) -> Self {
        Self {
            params,
            title: "Proxy Cards".to_string(),
        }
    }

    pub fn title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    /// Lay out `items` (one per physical copy) and draw them.
    ///
    /// `load` is called once per distinct image URL. An error from it turns
    /// every copy of that card into a placeholder.
    pub fn render<F>(
        &self,
        items: &[&PrintListItem],
        mut load: F,
    ) -> Result<(PdfDocumentReference, RenderReport)>
    where
        F: FnMut(&PrintListItem) -> Result<DynamicImage>,
    {
        let layout = PageLayout::compute(&self.params, items.len())?;
        if layout.total_pages == 0 {
            return Err(CompanionError::InvalidArgument(
                "Print list is empty".to_string(),
            ));
        }

        let (page_w, page_h) = (mm(self.params.paper_width), mm(self.params.paper_height));
        let (doc, first_page, first_layer) = PdfDocument::new(&self.title, page_w, page_h, "Cards");
        let font = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| CompanionError::Pdf(e.to_string()))?;

        let mut layers = vec![doc.get_page(first_page).get_layer(first_layer)];
        for _ in 1..layout.total_pages {
            let (page, layer) = doc.add_page(page_w, page_h, "Cards");
            layers.push(doc.get_page(page).get_layer(layer));
        }

        let mut images: HashMap<&str, Option<EncodedImage>> = HashMap::new();
        // Image XObjects already placed on each page, by URL.
        let mut embedded: Vec<HashMap<&str, String>> = vec![HashMap::new(); layout.total_pages];
        let mut placeholders = Vec::new();

        for (&item, placement) in items.iter().zip(layout.placements()) {
            let url = item.card_url.as_str();
            let encoded = images.entry(url).or_insert_with(|| {
                match load(item).and_then(EncodedImage::encode) {
                    Ok(img) => Some(img),
                    Err(e) => {
                        log::warn!(
                            "Image for '{}' failed to load ({}); using placeholder",
                            item.name,
                            e
                        );
                        None
                    }
                }
            });
            let layer = &layers[placement.page];
            let on_page = &mut embedded[placement.page];
            match encoded {
                Some(img) => match on_page.get(url) {
                    Some(name) => draw_again(layer, name, &self.params, &placement),
                    None => {
                        let name = draw_image(layer, img, on_page.len(), &self.params, &placement);
                        on_page.insert(url, name);
                    }
                },
                None => {
                    draw_placeholder(layer, &font, item, &self.params, &placement);
                    placeholders.push(item.name.clone());
                }
            }
        }

        let report = RenderReport {
            pages: layout.total_pages,
            cards: items.len(),
            placeholders,
        };
        Ok((doc, report))
    }

    /// Render and write the document to `path`.
    pub fn write<F, P>(&self, items: &[&PrintListItem], load: F, path: P) -> Result<RenderReport>
    where
        F: FnMut(&PrintListItem) -> Result<DynamicImage>,
        P: AsRef<Path>,
    {
        let (doc, report) = self.render(items, load)?;
        let file = File::create(path.as_ref())?;
        let mut writer = BufWriter::new(file);
        doc.save(&mut writer)
            .map_err(|e| CompanionError::Pdf(e.to_string()))?;
        log::info!(
            "Wrote {} cards on {} pages to {}",
            report.cards,
            report.pages,
            path.as_ref().display()
        );
        Ok(report)
    }
}

/// An image decoded and re-encoded as baseline JPEG for embedding.
struct EncodedImage {
    width: u32,
    height: u32,
    jpeg: Vec<u8>,
}

impl EncodedImage {
    fn encode(img: DynamicImage) -> Result<Self> {
        let rgb = img.to_rgb8();
        let (width, height) = rgb.dimensions();
        let mut jpeg = Vec::new();
        JpegEncoder::new_with_quality(&mut jpeg, JPEG_QUALITY).encode(
            rgb.as_raw(),
            width,
            height,
            ColorType::Rgb8,
        )?;
        Ok(Self {
            width,
            height,
            jpeg,
        })
    }
}

fn mm(inches: f64) -> Mm {
    Mm((inches * config::MM_PER_INCH) as f32)
}

/// Bottom-left corner of a placement in PDF coordinates.
fn pdf_origin(params: &LayoutParams, placement: &CardPlacement) -> (Mm, Mm) {
    let bottom = params.paper_height - placement.y - placement.height;
    (mm(placement.x), mm(bottom))
}

/// Embed `img` on the page of `layer` and draw it into `placement`.
///
/// `page_index` is the number of XObjects already added to that page; the
/// returned name refers to the new one (printpdf names page XObjects `X<n>`
/// in insertion order).
fn draw_image(
    layer: &PdfLayerReference,
    img: &EncodedImage,
    page_index: usize,
    params: &LayoutParams,
    placement: &CardPlacement,
) -> String {
    let image = Image::from(ImageXObject {
        width: Px(img.width as usize),
        height: Px(img.height as usize),
        color_space: ColorSpace::Rgb,
        bits_per_component: ColorBits::Bit8,
        interpolate: true,
        image_data: img.jpeg.clone(),
        image_filter: Some(ImageFilter::DCT),
        clipping_bbox: None,
        smask: None,
    });

    // Natural size at EMBED_DPI, stretched to exactly the card size.
    let natural_w = img.width as f32 / EMBED_DPI;
    let natural_h = img.height as f32 / EMBED_DPI;
    let (x, y) = pdf_origin(params, placement);

    image.add_to_layer(
        layer.clone(),
        ImageTransform {
            translate_x: Some(x),
            translate_y: Some(y),
            dpi: Some(EMBED_DPI),
            scale_x: Some(placement.width as f32 / natural_w),
            scale_y: Some(placement.height as f32 / natural_h),
            ..Default::default()
        },
    );
    format!("X{}", page_index)
}

/// Draw an image already embedded on this page into `placement`.
fn draw_again(layer: &PdfLayerReference, name: &str, params: &LayoutParams, placement: &CardPlacement) {
    let bottom = params.paper_height - placement.y - placement.height;
    layer.save_graphics_state();
    layer.add_operation(CurTransMat::Raw([
        (placement.width * PT_PER_INCH) as f32,
        0.0,
        0.0,
        (placement.height * PT_PER_INCH) as f32,
        (placement.x * PT_PER_INCH) as f32,
        (bottom * PT_PER_INCH) as f32,
    ]));
    layer.add_operation(Operation::new(
        "Do",
        vec![Object::Name(name.as_bytes().to_vec())],
    ));
    layer.restore_graphics_state();
}

fn draw_placeholder(
    layer: &PdfLayerReference,
    font: &IndirectFontRef,
    item: &PrintListItem,
    params: &LayoutParams,
    placement: &CardPlacement,
) {
    let (Mm(x), Mm(y)) = pdf_origin(params, placement);
    let w = mm(placement.width).0;
    let h = mm(placement.height).0;

    layer.set_outline_color(Color::Rgb(Rgb::new(0.4, 0.4, 0.4, None)));
    layer.set_outline_thickness(PLACEHOLDER_LINE_MM);
    layer.add_line(Line {
        points: vec![
            (Point::new(Mm(x), Mm(y)), false),
            (Point::new(Mm(x + w), Mm(y)), false),
            (Point::new(Mm(x + w), Mm(y + h)), false),
            (Point::new(Mm(x), Mm(y + h)), false),
        ],
        is_closed: true,
    });

    layer.set_fill_color(Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)));
    let text_x = x + 3.0;
    let mut text_y = y + h / 2.0 + 2.0;
    for line in wrap_name(&placeholder_label(item), 22) {
        layer.use_text(line, PLACEHOLDER_FONT_SIZE, Mm(text_x), Mm(text_y), font);
        text_y -= 5.0;
    }
}

fn placeholder_label(item: &PrintListItem) -> String {
    match (&item.set_name, &item.number) {
        (Some(set), Some(num)) => format!("{} ({} #{})", item.name, set, num),
        (Some(set), None) => format!("{} ({})", item.name, set),
        _ => item.name.clone(),
    }
}

/// Greedy word wrap at `width` characters. Long words are kept whole.
fn wrap_name(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
