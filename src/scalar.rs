//! Reference kernel: one coordinate, one colour.

use crate::{
    pixel::{escape_colour, Colour, BACKGROUND, MAX_ITERATIONS},
    screen::{Frame, Grid},
};

/// Colour of the point `(x0, y0)`, iterating at most `max_iterations` times.
pub fn kernel(x0: f32, y0: f32, max_iterations: u32) -> Colour {
    let mut x = 0.0f32;
    let mut y = 0.0f32;

    for iteration in 0..max_iterations {
        let x_squared = x * x;
        let y_squared = y * y;
        if x_squared + y_squared >= 4.0 {
            return escape_colour(iteration);
        }

        y = x * y * 2.0 + y0;
        x = x_squared - y_squared + x0;
    }

    BACKGROUND
}

pub fn fill_frame(grid: &Grid, frame: &mut Frame) {
    grid.fill(frame, |out, x0, y0| {
        for (lane, colour) in out.iter_mut().enumerate() {
            *colour = kernel(x0.lane(lane), y0, MAX_ITERATIONS);
        }
    });
}
