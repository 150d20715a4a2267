/// 8-bit straight-alpha RGBA color, as stored in vertex records.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ColorRgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl ColorRgba {
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub const fn black() -> Self {
        Self::new(0, 0, 0, 0xff)
    }

    #[inline]
    pub const fn white() -> Self {
        Self::new(0xff, 0xff, 0xff, 0xff)
    }

    /// Unpacks a `0xRRGGBBAA` value.
    #[inline]
    pub const fn from_rgba_u32(v: u32) -> Self {
        Self::new((v >> 24) as u8, (v >> 16) as u8, (v >> 8) as u8, v as u8)
    }

    #[inline]
    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for ColorRgba {
    fn default() -> Self {
        Self::white()
    }
}
