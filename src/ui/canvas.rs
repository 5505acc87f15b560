//! Drawing surfaces the render loop paints onto.
//!
//! `Framebuffer` rasterizes in software and backs headless snapshots.
//! `DisplayList` records draw commands which the board view turns into
//! gpui elements.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::{Rgba, RgbaImage, imageops};

use crate::ui::atlas::VisualAsset;
use crate::ui::board_layout::PixelPos;
use crate::ui::theme::Rgb;

/// Axis-aligned rectangle in board pixels
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// The drawing operations the render loop needs from a backend
pub trait Canvas {
    fn fill_rect(&mut self, rect: Rect, color: Rgb);

    /// Draw an image with its top-left corner at `at`, alpha blended
    fn blit(&mut self, asset: &Arc<VisualAsset>, at: PixelPos);

    /// Make the frame drawn since the last present visible
    fn present(&mut self);

    /// Give up backend resources. Called once, when the loop terminates.
    fn release(&mut self) {}
}

/// Software RGBA surface
#[derive(Debug)]
pub struct Framebuffer {
    buffer: RgbaImage,
    presented: Option<RgbaImage>,
    /// Presented frames are also written here as PNG
    capture: Option<PathBuf>,
}

impl Framebuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            buffer: RgbaImage::new(width, height),
            presented: None,
            capture: None,
        }
    }

    /// A framebuffer whose presented frames are saved to `path`
    pub fn with_capture(width: u32, height: u32, path: &Path) -> Self {
        Self {
            capture: Some(path.to_path_buf()),
            ..Self::new(width, height)
        }
    }

    /// The most recently presented frame
    #[allow(dead_code)]
    pub fn presented(&self) -> Option<&RgbaImage> {
        self.presented.as_ref()
    }
}

impl Canvas for Framebuffer {
    fn fill_rect(&mut self, rect: Rect, color: Rgb) {
        let x_end = (rect.x + rect.width).min(self.buffer.width());
        let y_end = (rect.y + rect.height).min(self.buffer.height());
        let pixel = Rgba([color.0, color.1, color.2, 255]);
        for y in rect.y..y_end {
            for x in rect.x..x_end {
                self.buffer.put_pixel(x, y, pixel);
            }
        }
    }

    fn blit(&mut self, asset: &Arc<VisualAsset>, at: PixelPos) {
        imageops::overlay(&mut self.buffer, &asset.image, at.x as i64, at.y as i64);
    }

    fn present(&mut self) {
        if let Some(path) = &self.capture {
            if let Err(e) = self.buffer.save(path) {
                tracing::error!(path = %path.display(), "failed to write frame: {e}");
            }
        }
        self.presented = Some(self.buffer.clone());
    }

    fn release(&mut self) {
        self.buffer = RgbaImage::new(0, 0);
    }
}

/// One recorded draw operation
#[derive(Clone, Debug)]
pub enum DrawCommand {
    Fill { rect: Rect, color: Rgb },
    Blit { asset: Arc<VisualAsset>, at: PixelPos },
}

/// Records draw commands; a presented list is what the view renders
#[derive(Debug, Default)]
pub struct DisplayList {
    pending: Vec<DrawCommand>,
    presented: Vec<DrawCommand>,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn presented(&self) -> &[DrawCommand] {
        &self.presented
    }
}

impl Canvas for DisplayList {
    fn fill_rect(&mut self, rect: Rect, color: Rgb) {
        self.pending.push(DrawCommand::Fill { rect, color });
    }

    fn blit(&mut self, asset: &Arc<VisualAsset>, at: PixelPos) {
        self.pending.push(DrawCommand::Blit {
            asset: Arc::clone(asset),
            at,
        });
    }

    fn present(&mut self) {
        self.presented = std::mem::take(&mut self.pending);
    }

    fn release(&mut self) {
        self.pending.clear();
        self.presented.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PieceColor, PieceKind};

    fn asset(image: RgbaImage) -> Arc<VisualAsset> {
        Arc::new(VisualAsset {
            kind: PieceKind::Queen,
            color: PieceColor::Black,
            image,
        })
    }

    #[test]
    fn test_fill_is_clipped() {
        let mut fb = Framebuffer::new(10, 10);
        fb.fill_rect(
            Rect {
                x: 8,
                y: 8,
                width: 5,
                height: 5,
            },
            Rgb(1, 2, 3),
        );
        fb.present();
        let frame = fb.presented().unwrap();
        assert_eq!(*frame.get_pixel(9, 9), Rgba([1, 2, 3, 255]));
        assert_eq!(*frame.get_pixel(7, 7), Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn test_blit_respects_transparency() {
        let mut fb = Framebuffer::new(4, 4);
        fb.fill_rect(
            Rect {
                x: 0,
                y: 0,
                width: 4,
                height: 4,
            },
            Rgb(9, 9, 9),
        );
        let mut sprite = RgbaImage::new(2, 2);
        sprite.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        fb.blit(&asset(sprite), PixelPos { x: 1, y: 1 });
        fb.present();

        let frame = fb.presented().unwrap();
        assert_eq!(*frame.get_pixel(1, 1), Rgba([255, 0, 0, 255]));
        // transparent sprite pixel leaves the background alone
        assert_eq!(*frame.get_pixel(2, 2), Rgba([9, 9, 9, 255]));
    }

    #[test]
    fn test_nothing_visible_before_present() {
        let mut fb = Framebuffer::new(2, 2);
        fb.fill_rect(
            Rect {
                x: 0,
                y: 0,
                width: 2,
                height: 2,
            },
            Rgb(5, 5, 5),
        );
        assert!(fb.presented().is_none());
    }

    #[test]
    fn test_capture_writes_png() {
        let path = std::env::temp_dir().join("chessboard-gui-capture.png");
        let _ = std::fs::remove_file(&path);
        let mut fb = Framebuffer::with_capture(3, 3, &path);
        fb.fill_rect(
            Rect {
                x: 0,
                y: 0,
                width: 3,
                height: 3,
            },
            Rgb(236, 208, 166),
        );
        fb.present();

        let written = image::open(&path).unwrap().to_rgba8();
        assert_eq!(written.dimensions(), (3, 3));
        assert_eq!(*written.get_pixel(1, 1), Rgba([236, 208, 166, 255]));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_display_list_swaps_on_present() {
        let mut list = DisplayList::new();
        let rect = Rect {
            x: 0,
            y: 0,
            width: 1,
            height: 1,
        };
        list.fill_rect(rect, Rgb(1, 1, 1));
        list.blit(&asset(RgbaImage::new(1, 1)), PixelPos { x: 3, y: 4 });
        assert!(list.presented().is_empty());

        list.present();
        assert_eq!(list.presented().len(), 2);
        assert!(matches!(
            list.presented()[1],
            DrawCommand::Blit {
                at: PixelPos { x: 3, y: 4 },
                ..
            }
        ));

        list.present();
        assert!(list.presented().is_empty());
    }
}
