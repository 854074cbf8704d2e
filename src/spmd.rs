//! The scalar kernel, launched once per lane through a [`Dispatch`].

use crate::{
    dispatch::Dispatch,
    lanes::{F32x16, LANES},
    pixel::{Colour, MAX_ITERATIONS},
    scalar,
    screen::{Frame, Grid},
};

/// Colours of the sixteen points `(x0[i], y0)`, one dispatched invocation per lane.
pub fn kernel<D: Dispatch>(
    dispatcher: &D,
    out: &mut [Colour; LANES],
    x0: F32x16,
    y0: f32,
    max_iterations: u32,
) {
    dispatcher.dispatch(out, |lane, colour| {
        *colour = scalar::kernel(x0.lane(lane), y0, max_iterations);
    });
}

pub fn fill_frame<D: Dispatch>(dispatcher: &D, grid: &Grid, frame: &mut Frame) {
    grid.fill(frame, |out, x0, y0| {
        kernel(dispatcher, out, x0, y0, MAX_ITERATIONS)
    });
}
