//! Image output of the matrix.

pub mod svg;

pub use svg::{MatrixLayout, render_matrix_svg, write_matrix_svg};
