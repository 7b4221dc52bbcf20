/// Decodes one sRGB-encoded channel in `[0, 1]` to linear light.
#[inline]
pub fn srgb_to_linear(c: f32) -> f32 {
    let c = c.clamp(0.0, 1.0);
    if c <= 0.040_45 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Encodes one linear channel in `[0, 1]` to sRGB.
#[inline]
pub fn linear_to_srgb(c: f32) -> f32 {
    let c = c.clamp(0.0, 1.0);
    if c <= 0.003_130_8 {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

/// Linear premultiplied RGBA color.
///
/// Invariant:
/// - `rgb` components are expected to be multiplied by `a` (premultiplied alpha).
///
/// Colors authored in display space (named colors, `0..255` bytes, `[0, 1]`
/// triples) enter through the `from_srgb*` constructors.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32, // premultiplied
    pub g: f32, // premultiplied
    pub b: f32, // premultiplied
    pub a: f32,
}

impl Color {
    pub const BLACK: Color = Color::from_premul(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Color = Color::from_premul(1.0, 1.0, 1.0, 1.0);

    #[inline]
    pub const fn transparent() -> Self {
        Self { r: 0.0, g: 0.0, b: 0.0, a: 0.0 }
    }

    /// Creates a premultiplied linear color from straight sRGB bytes (`0`–`255`).
    #[inline]
    pub fn from_srgb_u8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::from_srgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, a as f32 / 255.0)
    }

    /// Creates a premultiplied linear color from straight sRGB `f32` components in `[0, 1]`.
    ///
    /// Alpha is never gamma-encoded and is taken as is.
    #[inline]
    pub fn from_srgb(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self::from_straight(srgb_to_linear(r), srgb_to_linear(g), srgb_to_linear(b), a)
    }

    /// Creates a premultiplied color from premultiplied components.
    #[inline]
    pub const fn from_premul(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a premultiplied color from straight alpha linear components.
    #[inline]
    pub fn from_straight(r: f32, g: f32, b: f32, a: f32) -> Self {
        let a = a.clamp(0.0, 1.0);
        Self {
            r: (r.clamp(0.0, 1.0)) * a,
            g: (g.clamp(0.0, 1.0)) * a,
            b: (b.clamp(0.0, 1.0)) * a,
            a,
        }
    }

    /// Returns a straight-alpha representation.
    ///
    /// For `a == 0`, RGB is returned as 0.
    #[inline]
    pub fn to_straight(self) -> (f32, f32, f32, f32) {
        if self.a <= 0.0 {
            (0.0, 0.0, 0.0, 0.0)
        } else {
            let inv = 1.0 / self.a;
            (self.r * inv, self.g * inv, self.b * inv, self.a)
        }
    }

    /// Straight-alpha sRGB-encoded channels, the inverse of [`from_srgb`](Self::from_srgb).
    pub fn to_srgb(self) -> [f32; 4] {
        let (r, g, b, a) = self.to_straight();
        [linear_to_srgb(r), linear_to_srgb(g), linear_to_srgb(b), a]
    }

    /// Same color with alpha scaled by `opacity`.
    #[inline]
    pub fn with_opacity(self, opacity: f32) -> Self {
        let k = opacity.clamp(0.0, 1.0);
        Self { r: self.r * k, g: self.g * k, b: self.b * k, a: self.a * k }
    }

    #[inline]
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite() && self.a.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn srgb_endpoints_are_fixed() {
        assert_eq!(srgb_to_linear(0.0), 0.0);
        assert!(close(srgb_to_linear(1.0), 1.0));
        assert!(close(linear_to_srgb(1.0), 1.0));
    }

    #[test]
    fn srgb_round_trip_mid_grey() {
        let lin = srgb_to_linear(0.5);
        assert!(close(lin, 0.214_04));
        assert!(close(linear_to_srgb(lin), 0.5));
    }

    #[test]
    fn from_straight_premultiplies() {
        let c = Color::from_straight(1.0, 0.5, 0.0, 0.5);
        assert_eq!(c, Color::from_premul(0.5, 0.25, 0.0, 0.5));
        let (r, g, _, a) = c.to_straight();
        assert!(close(r, 1.0) && close(g, 0.5) && close(a, 0.5));
    }

    #[test]
    fn to_srgb_inverts_from_srgb() {
        let c = Color::from_srgb(0.1, 0.2, 0.4, 1.0);
        let [r, g, b, a] = c.to_srgb();
        assert!(close(r, 0.1) && close(g, 0.2) && close(b, 0.4) && close(a, 1.0));
    }

    #[test]
    fn opacity_scales_all_channels() {
        let c = Color::WHITE.with_opacity(0.25);
        assert_eq!(c, Color::from_premul(0.25, 0.25, 0.25, 0.25));
    }
}
