/*!
Sixteen-lane vectors for the hand-vectorized kernel.

Every operation here executes on all lanes at once. Divergence is expressed with
[`Mask16`]: comparisons produce a mask, and [`Mask16::select_f32`] /
[`Mask16::select_u32`] blend two vectors lane by lane. There is no per-lane
branching anywhere in this module.
*/

use std::ops::{Add, BitAnd, BitAndAssign, BitOr, Mul, Shl, Sub};

use bytemuck::{Pod, Zeroable};

/// Number of lanes in a vector register.
pub const LANES: usize = 16;

#[repr(transparent)]
#[derive(Pod, Zeroable, Clone, Copy, Debug, PartialEq)]
pub struct F32x16(pub [f32; LANES]);

#[repr(transparent)]
#[derive(Pod, Zeroable, Clone, Copy, Debug, PartialEq, Eq)]
pub struct U32x16(pub [u32; LANES]);

/// One bit per lane; bit `i` is lane `i`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Mask16(u16);

fn lanewise<A: Copy, B>(a: [A; LANES], f: impl Fn(A) -> B) -> [B; LANES] {
    a.map(f)
}

fn zip_lanes<A: Copy, B: Copy, C>(
    a: [A; LANES],
    b: [B; LANES],
    f: impl Fn(A, B) -> C,
) -> [C; LANES] {
    std::array::from_fn(|lane| f(a[lane], b[lane]))
}

fn compare<A: Copy>(a: [A; LANES], b: [A; LANES], f: impl Fn(A, A) -> bool) -> Mask16 {
    let mut bits = 0u16;
    for lane in 0..LANES {
        if f(a[lane], b[lane]) {
            bits |= 1 << lane;
        }
    }
    Mask16(bits)
}

impl F32x16 {
    pub const ZERO: Self = F32x16([0.0; LANES]);

    pub fn splat(value: f32) -> Self {
        F32x16([value; LANES])
    }

    /// `[0.0, 1.0, .., 15.0]`.
    pub fn lane_indices() -> Self {
        F32x16(std::array::from_fn(|lane| lane as f32))
    }

    pub fn lane(&self, lane: usize) -> f32 {
        self.0[lane]
    }

    pub fn simd_lt(self, other: Self) -> Mask16 {
        compare(self.0, other.0, |a, b| a < b)
    }
}

impl Add for F32x16 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        F32x16(zip_lanes(self.0, rhs.0, |a, b| a + b))
    }
}

impl Add<f32> for F32x16 {
    type Output = Self;

    fn add(self, rhs: f32) -> Self {
        F32x16(lanewise(self.0, |a| a + rhs))
    }
}

impl Sub for F32x16 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        F32x16(zip_lanes(self.0, rhs.0, |a, b| a - b))
    }
}

impl Mul for F32x16 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        F32x16(zip_lanes(self.0, rhs.0, |a, b| a * b))
    }
}

impl Mul<f32> for F32x16 {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self {
        F32x16(lanewise(self.0, |a| a * rhs))
    }
}

impl U32x16 {
    pub const ZERO: Self = U32x16([0; LANES]);

    pub fn splat(value: u32) -> Self {
        U32x16([value; LANES])
    }

    pub fn lane(&self, lane: usize) -> u32 {
        self.0[lane]
    }

    /// Unsigned `self < other`.
    pub fn simd_ult(self, other: Self) -> Mask16 {
        compare(self.0, other.0, |a, b| a < b)
    }

    /// Unsigned `self >= other`.
    pub fn simd_uge(self, other: Self) -> Mask16 {
        compare(self.0, other.0, |a, b| a >= b)
    }
}

impl Add for U32x16 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        U32x16(zip_lanes(self.0, rhs.0, u32::wrapping_add))
    }
}

impl Shl<u32> for U32x16 {
    type Output = Self;

    fn shl(self, rhs: u32) -> Self {
        U32x16(lanewise(self.0, |a| a << rhs))
    }
}

impl BitOr for U32x16 {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        U32x16(zip_lanes(self.0, rhs.0, |a, b| a | b))
    }
}

impl Mask16 {
    pub const ALL: Self = Mask16(u16::MAX);
    pub const NONE: Self = Mask16(0);

    pub fn bits(self) -> u16 {
        self.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn test(self, lane: usize) -> bool {
        self.0 & (1 << lane) != 0
    }

    pub fn is_subset_of(self, other: Self) -> bool {
        self.0 & !other.0 == 0
    }

    /// Lane `i` of the result is `if_set[i]` when bit `i` is set, `if_clear[i]` otherwise.
    pub fn select_f32(self, if_set: F32x16, if_clear: F32x16) -> F32x16 {
        F32x16(std::array::from_fn(|lane| {
            if self.test(lane) {
                if_set.0[lane]
            } else {
                if_clear.0[lane]
            }
        }))
    }

    pub fn select_u32(self, if_set: U32x16, if_clear: U32x16) -> U32x16 {
        U32x16(std::array::from_fn(|lane| {
            if self.test(lane) {
                if_set.0[lane]
            } else {
                if_clear.0[lane]
            }
        }))
    }
}

impl BitAnd for Mask16 {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Mask16(self.0 & rhs.0)
    }
}

impl BitAndAssign for Mask16 {
    fn bitand_assign(&mut self, rhs: Self) {
        self.0 &= rhs.0;
    }
}
