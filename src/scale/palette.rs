//! Stepped temperature palette, coldest first.

/// An sRGB color shared by the SVG and terminal front-ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// 0 °C (top of the legend) to 40 °C (bottom).
pub const PALETTE: [Rgb; 11] = [
    Rgb(0x6b, 0x66, 0xb8),
    Rgb(0x4f, 0x8f, 0xcd),
    Rgb(0x5f, 0xbe, 0xc0),
    Rgb(0x8e, 0xd0, 0x8e),
    Rgb(0xd4, 0xe3, 0x92),
    Rgb(0xf2, 0xef, 0xba),
    Rgb(0xef, 0xc6, 0x6e),
    Rgb(0xf2, 0xa5, 0x56),
    Rgb(0xef, 0x6b, 0x47),
    Rgb(0xd9, 0x3d, 0x58),
    Rgb(0xb1, 0x00, 0x5f),
];

/// Fill for months without readings.
pub const NO_DATA: Rgb = Rgb(0xd4, 0xd7, 0xce);

/// Sparkline of daily maxima.
pub const SPARK_MAX: Rgb = Rgb(0x2b, 0x2b, 0x2b);
/// Sparkline of daily minima.
pub const SPARK_MIN: Rgb = Rgb(0xff, 0xff, 0xff);

/// Legend frame and axis text.
pub const INK: Rgb = Rgb(0x5a, 0x5a, 0x5a);
