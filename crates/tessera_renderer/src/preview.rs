//! Live preview buffer.
//!
//! Tile tasks render into their own buffers; only the scheduler thread
//! publishes, and it does so one finished tile at a time under a lock. A
//! snapshot therefore never contains part of a tile.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use crate::error::RenderResult;
use crate::film::{FilmTile, CHANNELS};

#[derive(Debug)]
pub struct PreviewBuffer {
    width: u32,
    height: u32,
    front: Mutex<Vec<u8>>,
    published: AtomicUsize,
}

impl PreviewBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            front: Mutex::new(vec![0; width as usize * height as usize * CHANNELS]),
            published: AtomicUsize::new(0),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of tiles published so far.
    pub fn published_tiles(&self) -> usize {
        self.published.load(Ordering::Acquire)
    }

    /// Copies a finished tile into the front buffer.
    pub fn publish(&self, tile: &FilmTile, rgb: &[u8]) {
        let row_bytes = tile.width() as usize * CHANNELS;
        if row_bytes == 0
            || rgb.len() != tile.pixel_count() * CHANNELS
            || tile.x1 > self.width
            || tile.y1 > self.height
        {
            log::warn!("Ignoring preview update that does not fit {:?}", tile);
            return;
        }

        let mut front = self.front.lock().unwrap_or_else(PoisonError::into_inner);
        for (row, src) in rgb.chunks_exact(row_bytes).enumerate() {
            let y = (tile.y0 as usize) + row;
            let offset = (y * self.width as usize + tile.x0 as usize) * CHANNELS;
            front[offset..offset + row_bytes].copy_from_slice(src);
        }
        drop(front);

        self.published.fetch_add(1, Ordering::AcqRel);
    }

    /// Copy of the current front buffer.
    pub fn snapshot(&self) -> Vec<u8> {
        self.front
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn save_png(&self, path: impl AsRef<Path>) -> RenderResult<()> {
        let data = self.snapshot();
        image::save_buffer_with_format(
            path,
            &data,
            self.width,
            self.height,
            image::ColorType::Rgb8,
            image::ImageFormat::Png,
        )?;
        Ok(())
    }
}
