use crate::common::*;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use matrix_util::common_io::mkdir_parent;
use std::io::Write;

/// PDF points per pixel (100 dpi)
const POINTS_PER_PIXEL: f32 = 0.72;

/// Multi-page PDF of raster pages, one image per page
#[derive(Default)]
pub struct PdfPages {
    pages: Vec<RgbPage>,
}

impl PdfPages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_page(&mut self, page: RgbPage) {
        self.pages.push(page);
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Write every page to `file`; returns the number of pages
    pub fn save(&self, file: &str) -> anyhow::Result<usize> {
        if self.pages.is_empty() {
            return Err(anyhow::anyhow!("no page to write in {}", file));
        }

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let mut kids: Vec<Object> = Vec::with_capacity(self.pages.len());
        for page in self.pages.iter() {
            let image_id = doc.add_object(Stream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Image",
                    "Width" => page.width as i64,
                    "Height" => page.height as i64,
                    "ColorSpace" => "DeviceRGB",
                    "BitsPerComponent" => 8,
                    "Filter" => "FlateDecode",
                },
                deflate(&page.rgb)?,
            ));

            let w = page.width as f32 * POINTS_PER_PIXEL;
            let h = page.height as f32 * POINTS_PER_PIXEL;

            let content = Content {
                operations: vec![
                    Operation::new("q", vec![]),
                    Operation::new(
                        "cm",
                        vec![w.into(), 0.into(), 0.into(), h.into(), 0.into(), 0.into()],
                    ),
                    Operation::new("Do", vec!["Im0".into()]),
                    Operation::new("Q", vec![]),
                ],
            };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));

            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "MediaBox" => vec![0.into(), 0.into(), w.into(), h.into()],
                "Resources" => dictionary! {
                    "XObject" => dictionary! {
                        "Im0" => image_id,
                    },
                },
            });
            kids.push(page_id.into());
        }

        let pages = dictionary! {
            "Type" => "Pages",
            "Count" => kids.len() as i64,
            "Kids" => kids,
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        mkdir_parent(file)?;
        doc.save(file)
            .map_err(|e| anyhow::anyhow!("failed to write {}: {}", file, e))?;

        info!("wrote {} page(s) to {}", self.pages.len(), file);
        Ok(self.pages.len())
    }
}

fn deflate(data: &[u8]) -> anyhow::Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}
