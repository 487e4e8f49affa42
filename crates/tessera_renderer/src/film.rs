//! Output pixel buffer and its partition into tiles.
//!
//! The film is split into rectangular tiles once, at construction. Tiles
//! never overlap and together cover every pixel exactly once, which is what
//! lets tile tasks render without coordinating with each other.

use std::path::Path;

use crate::error::RenderResult;
use tessera_math::Color;

/// Default tile edge in pixels.
pub const DEFAULT_TILE_SIZE: u32 = 16;

/// Bytes per pixel in the film buffer (RGB8).
pub const CHANNELS: usize = 3;

/// Half-open pixel rectangle `[x0, x1) x [y0, y1)`, row 0 at the top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FilmTile {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
}

impl FilmTile {
    pub fn new(x0: u32, y0: u32, x1: u32, y1: u32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub fn width(&self) -> u32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> u32 {
        self.y1 - self.y0
    }

    pub fn pixel_count(&self) -> usize {
        self.width() as usize * self.height() as usize
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x0 && x < self.x1 && y >= self.y0 && y < self.y1
    }

    /// Pixel coordinates in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        (self.y0..self.y1).flat_map(move |y| (self.x0..self.x1).map(move |x| (x, y)))
    }
}

/// Splits a `width x height` image into tiles of edge `tile_size`.
///
/// Tiles are produced row-major; the last tile of each row and column is
/// clipped to the image.
pub fn partition(width: u32, height: u32, tile_size: u32) -> Vec<FilmTile> {
    let tile_size = tile_size.max(1);
    let mut tiles = Vec::new();

    let mut y = 0;
    while y < height {
        let y1 = y.saturating_add(tile_size).min(height);
        let mut x = 0;
        while x < width {
            let x1 = x.saturating_add(tile_size).min(width);
            tiles.push(FilmTile::new(x, y, x1, y1));
            x = x1;
        }
        y = y1;
    }

    tiles
}

/// Sort tiles by distance from image center (spiral order).
///
/// The stable sort keeps row-major order among equidistant tiles.
pub fn sort_spiral(tiles: &mut [FilmTile], width: u32, height: u32) {
    let center_x = width as f64 / 2.0;
    let center_y = height as f64 / 2.0;
    let distance = |t: &FilmTile| {
        let cx = (t.x0 + t.x1) as f64 / 2.0;
        let cy = (t.y0 + t.y1) as f64 / 2.0;
        (cx - center_x).powi(2) + (cy - center_y).powi(2)
    };

    tiles.sort_by(|a, b| distance(a).total_cmp(&distance(b)));
}

/// Clamp, gamma-correct (gamma 2) and quantize a linear color to RGB8.
#[inline]
pub fn quantize(color: Color) -> [u8; 3] {
    let encode = |c: f64| (255.99 * c.clamp(0.0, 1.0).sqrt()) as u8;
    [encode(color.x), encode(color.y), encode(color.z)]
}

/// RGB8 framebuffer plus its fixed tile partition.
#[derive(Debug, Clone)]
pub struct Film {
    width: u32,
    height: u32,
    tile_size: u32,
    tiles: Vec<FilmTile>,
    data: Vec<u8>,
}

impl Film {
    /// Black film with tiles in spiral order.
    pub fn new(width: u32, height: u32, tile_size: u32) -> Self {
        let mut tiles = partition(width, height, tile_size);
        sort_spiral(&mut tiles, width, height);
        Self {
            width,
            height,
            tile_size: tile_size.max(1),
            tiles,
            data: vec![0; width as usize * height as usize * CHANNELS],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    pub fn tiles(&self) -> &[FilmTile] {
        &self.tiles
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * CHANNELS
    }

    /// Quantizes `color` into pixel `(x, y)`.
    pub fn write_color(&mut self, x: u32, y: u32, color: Color) {
        let offset = self.offset(x, y);
        self.data[offset..offset + CHANNELS].copy_from_slice(&quantize(color));
    }

    /// Copies a tile's row-major RGB8 pixels into place.
    ///
    /// # Panics
    ///
    /// If `rgb` does not hold exactly `tile.pixel_count()` pixels or the tile
    /// lies outside the film.
    pub fn write_tile(&mut self, tile: &FilmTile, rgb: &[u8]) {
        assert_eq!(
            rgb.len(),
            tile.pixel_count() * CHANNELS,
            "tile buffer does not match tile size"
        );
        assert!(
            tile.x1 <= self.width && tile.y1 <= self.height,
            "tile {:?} outside {}x{} film",
            tile,
            self.width,
            self.height
        );

        let row_bytes = tile.width() as usize * CHANNELS;
        if row_bytes == 0 {
            return;
        }
        for (row, src) in rgb.chunks_exact(row_bytes).enumerate() {
            let offset = self.offset(tile.x0, tile.y0 + row as u32);
            self.data[offset..offset + row_bytes].copy_from_slice(src);
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let offset = self.offset(x, y);
        [self.data[offset], self.data[offset + 1], self.data[offset + 2]]
    }

    pub fn to_image(&self) -> image::RgbImage {
        image::RgbImage::from_fn(self.width, self.height, |x, y| image::Rgb(self.pixel(x, y)))
    }

    pub fn save_png(&self, path: impl AsRef<Path>) -> RenderResult<()> {
        let path = path.as_ref();
        self.to_image()
            .save_with_format(path, image::ImageFormat::Png)?;
        log::info!("Saved {}x{} image to {}", self.width, self.height, path.display());
        Ok(())
    }
}
