/*!
Scalar, SPMD and hand-vectorized versions of an escape-time Mandelbrot kernel,
and a cycle-counting harness that compares them.

All three variants fill the same [`screen::Frame`] from the same precomputed
[`screen::Grid`] and must produce identical colours. The [`bench::Runner`]
times each variant with a [`clock::Timer`] and prints one report line per
benchmark.
*/

pub mod analysis;
pub mod bench;
pub mod clock;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod lanes;
pub mod pixel;
pub mod scalar;
pub mod screen;
pub mod spmd;
pub mod vectorized;
