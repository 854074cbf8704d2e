use bytemuck::{Pod, Zeroable};

/// Packed ARGB colour of one output element.
pub type Colour = u32;

/// Iteration cap of the escape loop.
pub const MAX_ITERATIONS: u32 = 255;

/// Alpha byte of the packed colour format; set on every escaped element.
pub const OPAQUE: Colour = 0xff00_0000;

/// Colour of elements that never escape.
pub const BACKGROUND: Colour = 0;

/// Escaped elements are drawn brighter the longer they took to escape.
pub fn escape_colour(iteration: u32) -> Colour {
    ((iteration << 2) + 80) | OPAQUE
}

#[repr(C)]
#[derive(Pod, Zeroable, Clone, Copy, Debug, PartialEq)]
pub struct Complex {
    pub real: f32,
    pub imaginary: f32,
}

impl Complex {
    pub const ZERO: Self = Complex {
        real: 0.0,
        imaginary: 0.0,
    };
}

/// Escape-loop state of a single element.
#[repr(C)]
#[derive(Pod, Zeroable, Clone, Copy, Debug, PartialEq)]
pub struct IterationState {
    pub current_value: Complex,
    pub iteration_count: u32,
}

impl IterationState {
    pub const START: Self = IterationState {
        current_value: Complex::ZERO,
        iteration_count: 0,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_colour_is_opaque_and_offset() {
        assert_eq!(escape_colour(0), 0xff00_0050);
        assert_eq!(escape_colour(1), 0xff00_0054);
        assert_eq!(escape_colour(MAX_ITERATIONS - 1) & !OPAQUE, (254 << 2) + 80);
    }
}
