use bytemuck::{Pod, Zeroable};
use log::trace;

use crate::{
    error::{Error, Result},
    lanes::{F32x16, LANES},
    pixel::{Colour, BACKGROUND},
};

#[repr(C)]
#[derive(Pod, Zeroable, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn pixels(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Lane-width chunks in one row.
    pub const fn chunks_per_row(&self) -> usize {
        self.width as usize / LANES
    }

    /// Rows are filled one vector register at a time, so the width must be a
    /// non-zero multiple of [`LANES`].
    pub const fn is_lane_aligned(&self) -> bool {
        self.width > 0 && self.width as usize % LANES == 0 && self.height > 0
    }

    pub fn validate(self) -> Result<Self> {
        if self.is_lane_aligned() {
            Ok(self)
        } else {
            Err(Error::InvalidSize {
                width: self.width,
                height: self.height,
            })
        }
    }
}

/// Dimensions of the benchmark frame.
pub const SIZE: Size = Size {
    width: 32,
    height: 8,
};

const _: () = assert!(SIZE.is_lane_aligned());

/// Linear mapping from the pixel grid onto the complex plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    size: Size,
    pub x_step: f32,
    pub y_step: f32,
    pub x_offset: f32,
    pub y_offset: f32,
}

impl Viewport {
    pub fn new(size: Size) -> Result<Self> {
        Ok(Self::mapping(size.validate()?))
    }

    fn mapping(size: Size) -> Self {
        Self {
            size,
            x_step: 2.5 / size.width as f32,
            y_step: 2.0 / size.height as f32,
            x_offset: -2.0,
            y_offset: -1.0,
        }
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn y0(&self, row: u32) -> f32 {
        self.y_step * row as f32 + self.y_offset
    }

    /// Real parts for the sixteen pixels of a row starting at `first_column`.
    pub fn x0(&self, first_column: u32) -> F32x16 {
        (F32x16::lane_indices() + first_column as f32) * self.x_step + self.x_offset
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::mapping(SIZE)
    }
}

pub struct Row {
    pub y0: f32,
    pub x0: Vec<F32x16>,
}

/// Every pixel coordinate of a [`Viewport`], computed once.
pub struct Grid {
    size: Size,
    rows: Vec<Row>,
}

impl Grid {
    pub fn new(viewport: Viewport) -> Self {
        let size = viewport.size;
        let rows = (0..size.height)
            .map(|row| Row {
                y0: viewport.y0(row),
                x0: (0..size.width)
                    .step_by(LANES)
                    .map(|column| viewport.x0(column))
                    .collect(),
            })
            .collect();
        Self { size, rows }
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /// A frame of the same size as this grid.
    pub fn frame(&self) -> Frame {
        Frame::sized(self.size)
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Calls `fill_one` for every sixteen-pixel chunk of `frame`, row by row.
    ///
    /// Panics if `frame` was not sized for this grid.
    pub fn fill<F>(&self, frame: &mut Frame, mut fill_one: F)
    where
        F: FnMut(&mut [Colour; LANES], F32x16, f32),
    {
        trace!("begin fill");
        assert_eq!(frame.size(), self.size, "frame does not match the grid");

        let chunks_per_row = self.size.chunks_per_row();
        for (out_row, row) in frame.lane_chunks_mut().chunks_mut(chunks_per_row).zip(&self.rows) {
            for (out, x0) in out_row.iter_mut().zip(&row.x0) {
                fill_one(out, *x0, row.y0);
            }
        }

        trace!("end fill");
    }
}

/// Row-major output buffer shared by every benchmark variant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    size: Size,
    colours: Vec<Colour>,
}

impl Frame {
    pub fn new(size: Size) -> Result<Self> {
        Ok(Self::sized(size.validate()?))
    }

    fn sized(size: Size) -> Self {
        Self {
            size,
            colours: vec![BACKGROUND; size.pixels()],
        }
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn colours(&self) -> &[Colour] {
        &self.colours
    }

    pub fn lane_chunks_mut(&mut self) -> &mut [[Colour; LANES]] {
        bytemuck::cast_slice_mut(&mut self.colours)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_maps_corners() {
        let viewport = Viewport::default();
        assert_eq!(viewport.y0(0), -1.0);
        assert_eq!(viewport.x0(0).lane(0), -2.0);
        let last = viewport.x0(SIZE.width - LANES as u32).lane(LANES - 1);
        let expected = (SIZE.width - 1) as f32 * viewport.x_step - 2.0;
        assert_eq!(last, expected);
    }

    #[test]
    fn grid_covers_every_pixel_once() {
        let grid = Grid::new(Viewport::default());
        assert_eq!(grid.rows().len(), SIZE.height as usize);
        assert!(grid
            .rows()
            .iter()
            .all(|row| row.x0.len() == SIZE.chunks_per_row()));

        let mut frame = grid.frame();
        let mut calls = 0;
        grid.fill(&mut frame, |out, _, _| {
            calls += 1;
            *out = [calls; LANES];
        });
        assert_eq!(calls as usize, SIZE.pixels() / LANES);
        let colours = frame.colours();
        assert_eq!(colours[0], 1);
        assert_eq!(colours[LANES], 2);
        assert_eq!(colours[SIZE.pixels() - 1], calls);
    }

    #[test]
    fn rejects_sizes_that_do_not_fill_whole_registers() {
        for (width, height) in [(24, 4), (8, 4), (0, 4), (32, 0)] {
            let size = Size { width, height };
            assert!(matches!(
                Viewport::new(size),
                Err(Error::InvalidSize { .. })
            ));
            assert!(matches!(Frame::new(size), Err(Error::InvalidSize { .. })));
        }
    }

    #[test]
    fn custom_size_fills_every_pixel() {
        let size = Size {
            width: 48,
            height: 3,
        };
        let grid = Grid::new(Viewport::new(size).unwrap());
        let mut frame = Frame::new(size).unwrap();
        grid.fill(&mut frame, |out, _, _| *out = [1; LANES]);
        assert!(frame.colours().iter().all(|&colour| colour == 1));
    }

    #[test]
    #[should_panic(expected = "frame does not match the grid")]
    fn fill_rejects_a_frame_of_another_size() {
        let grid = Grid::new(Viewport::default());
        let mut frame = Frame::new(Size {
            width: 16,
            height: SIZE.height,
        })
        .unwrap();
        grid.fill(&mut frame, |_, _, _| {});
    }
}
