/*!
Hand-vectorized kernel.

Sixteen horizontally adjacent pixels share one row (`y0`) and run the escape
loop together. The lanes execute in lockstep, so a lane that has escaped, or
has run out of iterations, cannot leave the loop on its own. Instead, each
step:

1. squares `x` and `y` in every lane;
2. clears the [`Mask16`] bit of every lane that is outside the escape radius
   or at the iteration cap (bits are only ever cleared, never set);
3. stops if no bit is left;
4. computes the next `x`, `y` and iteration count for every lane, then keeps the
   new values only where the mask bit is set.

Inactive lanes still go through the arithmetic, but their state is frozen by
the blend in step 4. After the loop, one select turns frozen iteration counts
into colours: a count at the cap means the lane never escaped.
*/

use crate::{
    lanes::{F32x16, Mask16, U32x16, LANES},
    pixel::{Colour, Complex, IterationState, BACKGROUND, MAX_ITERATIONS, OPAQUE},
    screen::{Frame, Grid},
};

/// Escape loop state for sixteen lanes.
pub struct LaneLoop {
    x0: F32x16,
    y0: f32,
    max_iterations: U32x16,
    x: F32x16,
    y: F32x16,
    iteration: U32x16,
    active: Mask16,
}

impl LaneLoop {
    pub fn new(x0: F32x16, y0: f32, max_iterations: u32) -> Self {
        Self {
            x0,
            y0,
            max_iterations: U32x16::splat(max_iterations),
            x: F32x16::ZERO,
            y: F32x16::ZERO,
            iteration: U32x16::ZERO,
            active: Mask16::ALL,
        }
    }

    /// Runs one lockstep iteration. Returns `false` once every lane is done;
    /// the state is left untouched by that final call apart from the mask.
    pub fn step(&mut self) -> bool {
        let x_squared = self.x * self.x;
        let y_squared = self.y * self.y;

        self.active &= (x_squared + y_squared).simd_lt(F32x16::splat(4.0));
        self.active &= self.iteration.simd_ult(self.max_iterations);
        if self.active.is_empty() {
            return false;
        }

        let y0 = F32x16::splat(self.y0);
        let y = self.x * self.y * 2.0 + y0;
        let x = x_squared - y_squared + self.x0;

        self.y = self.active.select_f32(y, self.y);
        self.x = self.active.select_f32(x, self.x);
        self.iteration = self
            .active
            .select_u32(self.iteration + U32x16::splat(1), self.iteration);

        true
    }

    pub fn run(&mut self) {
        while self.step() {}
    }

    pub fn active(&self) -> Mask16 {
        self.active
    }

    pub fn state(&self, lane: usize) -> IterationState {
        IterationState {
            current_value: Complex {
                real: self.x.lane(lane),
                imaginary: self.y.lane(lane),
            },
            iteration_count: self.iteration.lane(lane),
        }
    }

    /// Colour of every lane, from the iteration counts as they stand now.
    pub fn colours(&self) -> U32x16 {
        let escaped = (self.iteration << 2) + U32x16::splat(80);
        self.iteration
            .simd_uge(self.max_iterations)
            .select_u32(U32x16::splat(BACKGROUND), escaped | U32x16::splat(OPAQUE))
    }
}

/// Colours of the sixteen points `(x0[i], y0)`.
pub fn kernel(out: &mut [Colour; LANES], x0: F32x16, y0: f32, max_iterations: u32) {
    let mut lanes = LaneLoop::new(x0, y0, max_iterations);
    lanes.run();
    *out = lanes.colours().0;
}

pub fn fill_frame(grid: &Grid, frame: &mut Frame) {
    grid.fill(frame, |out, x0, y0| kernel(out, x0, y0, MAX_ITERATIONS));
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::{
        pixel::escape_colour,
        scalar,
        screen::{Viewport, SIZE},
    };

    fn vectorized_lanes(x0: F32x16, y0: f32) -> [Colour; LANES] {
        let mut out = [0; LANES];
        kernel(&mut out, x0, y0, MAX_ITERATIONS);
        out
    }

    fn scalar_lanes(x0: F32x16, y0: f32) -> [Colour; LANES] {
        std::array::from_fn(|lane| scalar::kernel(x0.lane(lane), y0, MAX_ITERATIONS))
    }

    #[test]
    fn known_points_match_scalar() {
        // Lanes 0..4: escapes after one step, never escapes, boundary point.
        let mut x0 = F32x16::lane_indices() * 0.1 + -2.1;
        x0.0[0] = 2.0;
        x0.0[1] = 0.0;
        x0.0[2] = -0.75;

        let far = vectorized_lanes(x0, 2.0);
        assert_eq!(far[0], escape_colour(1));
        assert_eq!(far, scalar_lanes(x0, 2.0));

        let near = vectorized_lanes(x0, 0.0);
        assert_eq!(near[1], BACKGROUND);
        assert_eq!(near, scalar_lanes(x0, 0.0));

        let boundary = vectorized_lanes(x0, 0.03);
        assert_ne!(boundary[2], BACKGROUND);
        assert_ne!(boundary[2], escape_colour(1));
        assert_eq!(boundary, scalar_lanes(x0, 0.03));
    }

    #[test]
    fn frame_matches_scalar_frame() {
        let grid = Grid::new(Viewport::default());
        let mut expected = Frame::new(SIZE).unwrap();
        scalar::fill_frame(&grid, &mut expected);

        let mut frame = Frame::new(SIZE).unwrap();
        fill_frame(&grid, &mut frame);
        assert_eq!(frame, expected);

        // No state is carried between calls.
        fill_frame(&grid, &mut frame);
        assert_eq!(frame, expected);
    }

    #[test]
    fn all_lanes_capped_report_background() {
        let mut lanes = LaneLoop::new(F32x16::splat(-0.1), 0.1, 7);
        lanes.run();
        assert!(lanes.active().is_empty());
        for lane in 0..LANES {
            assert_eq!(lanes.state(lane).iteration_count, 7);
        }
        assert_eq!(lanes.colours(), U32x16::splat(BACKGROUND));
    }

    #[test]
    fn zero_cap_stops_before_any_arithmetic() {
        let mut lanes = LaneLoop::new(F32x16::splat(1.0), 1.0, 0);
        assert!(!lanes.step());
        for lane in 0..LANES {
            assert_eq!(lanes.state(lane), IterationState::START);
        }
    }

    fn x0_lanes() -> impl Strategy<Value = F32x16> {
        prop::array::uniform16(-2.5f32..1.0f32).prop_map(F32x16)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn prop_matches_scalar(x0 in x0_lanes(), y0 in -1.5f32..1.5f32) {
            prop_assert_eq!(vectorized_lanes(x0, y0), scalar_lanes(x0, y0));
        }

        #[test]
        fn prop_mask_only_shrinks(x0 in x0_lanes(), y0 in -1.5f32..1.5f32) {
            let mut lanes = LaneLoop::new(x0, y0, MAX_ITERATIONS);
            let mut previous = lanes.active();
            prop_assert_eq!(previous, Mask16::ALL);
            let mut steps = 0;
            while lanes.step() {
                prop_assert!(lanes.active().is_subset_of(previous));
                previous = lanes.active();
                steps += 1;
            }
            prop_assert!(lanes.active().is_subset_of(previous));
            prop_assert!(steps <= MAX_ITERATIONS);
        }

        #[test]
        fn prop_inactive_lanes_are_frozen(x0 in x0_lanes(), y0 in -1.5f32..1.5f32) {
            let mut lanes = LaneLoop::new(x0, y0, MAX_ITERATIONS);
            let mut frozen: [Option<IterationState>; LANES] = [None; LANES];
            loop {
                let running = lanes.step();
                for (lane, slot) in frozen.iter_mut().enumerate() {
                    if slot.is_none() && !lanes.active().test(lane) {
                        *slot = Some(lanes.state(lane));
                    }
                }
                if !running {
                    break;
                }
            }
            for (lane, slot) in frozen.iter().enumerate() {
                let state = lanes.state(lane);
                prop_assert_eq!(Some(state), *slot);
                prop_assert!(state.iteration_count <= MAX_ITERATIONS);
            }
        }
    }
}
