//! Bounded, newest-first picture history and grid composition.
//!
//! Holds the most recent pictures in memory only. The oldest picture is
//! evicted once the capacity is reached.

use std::collections::VecDeque;
use std::path::Path;

use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageError, ImageFormat, Rgba, RgbaImage};

use crate::resolver::LoadedImage;

/// Default number of pictures retained (fills a 4×4 grid).
pub const DEFAULT_HISTORY_SIZE: usize = 16;

/// Default edge length of one grid cell in pixels.
pub const DEFAULT_CELL_SIZE: u32 = 256;

/// Largest history kept.
pub const MAX_HISTORY_SIZE: usize = 64;

/// Largest grid cell edge in pixels.
pub const MAX_CELL_SIZE: u32 = 2048;

/// Most-recent-first store of loaded pictures.
#[derive(Debug, Clone)]
pub struct ImageHistory {
    items: VecDeque<LoadedImage>,
    capacity: usize,
}

impl Default for ImageHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_SIZE)
    }
}

impl ImageHistory {
    /// Creates an empty history with capacity clamped to
    /// `1..=MAX_HISTORY_SIZE`.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.clamp(1, MAX_HISTORY_SIZE);
        Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Inserts a picture at the front, evicting from the back when full.
    ///
    /// Returns the evicted picture, if any.
    pub fn push(&mut self, picture: LoadedImage) -> Option<LoadedImage> {
        self.items.push_front(picture);
        if self.items.len() > self.capacity {
            self.items.pop_back()
        } else {
            None
        }
    }

    /// Newest picture.
    pub fn latest(&self) -> Option<&LoadedImage> {
        self.items.front()
    }

    /// Pictures from newest to oldest.
    pub fn iter(&self) -> impl Iterator<Item = &LoadedImage> {
        self.items.iter()
    }

    /// Lays the pictures out in a `cols × rows` grid of square cells.
    ///
    /// The newest picture is placed top-left, continuing in row-major order.
    /// Pictures beyond `cols × rows` are left out; empty cells stay
    /// transparent. `cols` and `rows` are clamped to `1..=MAX_HISTORY_SIZE`
    /// and `cell_size` to `1..=MAX_CELL_SIZE`.
    pub fn compose_grid(&self, cols: u32, rows: u32, cell_size: u32) -> RgbaImage {
        let max_cells = MAX_HISTORY_SIZE as u32;
        let cols = cols.clamp(1, max_cells);
        let rows = rows.clamp(1, max_cells);
        let cell_size = cell_size.clamp(1, MAX_CELL_SIZE);

        let mut canvas =
            RgbaImage::from_pixel(cols * cell_size, rows * cell_size, Rgba([0, 0, 0, 0]));
        let slots = (cols * rows) as usize;

        for (index, picture) in self.items.iter().take(slots).enumerate() {
            let col = index as u32 % cols;
            let row = index as u32 / cols;
            let cell = imageops::resize(
                &picture.image().to_rgba8(),
                cell_size,
                cell_size,
                FilterType::Triangle,
            );
            imageops::replace(
                &mut canvas,
                &cell,
                (col * cell_size) as i64,
                (row * cell_size) as i64,
            );
        }

        canvas
    }

    /// Composes the grid and writes it to `path`, format from the extension.
    ///
    /// Formats without an alpha channel (JPEG) get the grid flattened to RGB.
    pub fn save_grid(
        &self,
        path: &Path,
        cols: u32,
        rows: u32,
        cell_size: u32,
    ) -> Result<(), ImageError> {
        let grid = self.compose_grid(cols, rows, cell_size);
        match ImageFormat::from_path(path) {
            Ok(ImageFormat::Jpeg) => DynamicImage::ImageRgba8(grid).to_rgb8().save(path),
            _ => grid.save(path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, RgbImage};

    fn picture(name: &str, shade: u8) -> LoadedImage {
        let image = RgbImage::from_pixel(8, 8, image::Rgb([shade, shade, shade]));
        LoadedImage::new(name, DynamicImage::ImageRgb8(image))
    }

    #[test]
    fn test_push_is_newest_first() {
        let mut history = ImageHistory::new(4);
        history.push(picture("a", 0));
        history.push(picture("b", 0));

        let urls: Vec<_> = history.iter().map(|p| p.url().to_string()).collect();
        assert_eq!(urls, vec!["b", "a"]);
        assert_eq!(history.latest().unwrap().url(), "b");
    }

    #[test]
    fn test_evicts_oldest_beyond_capacity() {
        let mut history = ImageHistory::new(2);
        assert!(history.push(picture("a", 0)).is_none());
        assert!(history.push(picture("b", 0)).is_none());

        let evicted = history.push(picture("c", 0)).unwrap();
        assert_eq!(evicted.url(), "a");
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_default_capacity_is_sixteen() {
        let mut history = ImageHistory::default();
        for i in 0..20 {
            history.push(picture(&i.to_string(), 0));
        }
        assert_eq!(history.len(), 16);
        assert_eq!(history.latest().unwrap().url(), "19");
        assert_eq!(history.iter().last().unwrap().url(), "4");
    }

    #[test]
    fn test_zero_capacity_is_raised() {
        let history = ImageHistory::new(0);
        assert_eq!(history.capacity(), 1);
    }

    #[test]
    fn test_capacity_is_capped() {
        let history = ImageHistory::new(10_000);
        assert_eq!(history.capacity(), MAX_HISTORY_SIZE);
    }

    #[test]
    fn test_compose_grid_caps_cell_size() {
        let history = ImageHistory::new(1);
        let grid = history.compose_grid(1, 1, u32::MAX);
        assert_eq!(grid.dimensions(), (MAX_CELL_SIZE, MAX_CELL_SIZE));
    }

    #[test]
    fn test_save_grid_as_jpeg() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grid.jpg");

        let mut history = ImageHistory::new(4);
        history.push(picture("a", 120));
        history.save_grid(&path, 2, 2, 8).unwrap();

        let saved = image::open(&path).unwrap();
        assert_eq!((saved.width(), saved.height()), (16, 16));
    }

    #[test]
    fn test_save_grid_as_png_keeps_alpha() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grid.png");

        let mut history = ImageHistory::new(4);
        history.push(picture("a", 120));
        history.save_grid(&path, 2, 1, 4).unwrap();

        let saved = image::open(&path).unwrap().to_rgba8();
        assert_eq!(saved.dimensions(), (8, 4));
        assert_eq!(saved.get_pixel(6, 1)[3], 0);
    }

    #[test]
    fn test_compose_grid_places_newest_top_left() {
        let mut history = ImageHistory::new(4);
        history.push(picture("old", 50));
        history.push(picture("new", 200));

        let grid = history.compose_grid(2, 2, 4);
        assert_eq!(grid.dimensions(), (8, 8));
        assert_eq!(grid.get_pixel(1, 1), &Rgba([200, 200, 200, 255]));
        assert_eq!(grid.get_pixel(5, 1), &Rgba([50, 50, 50, 255]));
        assert_eq!(grid.get_pixel(1, 5)[3], 0);
        assert_eq!(grid.get_pixel(5, 5)[3], 0);
    }

    #[test]
    fn test_compose_grid_drops_overflow() {
        let mut history = ImageHistory::new(8);
        for shade in [10, 20, 30] {
            history.push(picture("p", shade));
        }

        let grid = history.compose_grid(1, 1, 2);
        assert_eq!(grid.dimensions(), (2, 2));
        assert_eq!(grid.get_pixel(0, 0), &Rgba([30, 30, 30, 255]));
    }
}
