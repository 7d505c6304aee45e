//! Color conversions between panel-facing sRGB hex values and linear RGB.

/// Convert a packed sRGB hex color (0xRRGGBB) to linear RGB components.
pub fn linear_rgb_from_srgb_hex(hex: u32) -> [f32; 3] {
    let r = ((hex >> 16) & 0xff) as f32 / 255.0;
    let g = ((hex >> 8) & 0xff) as f32 / 255.0;
    let b = (hex & 0xff) as f32 / 255.0;
    [srgb_to_linear(r), srgb_to_linear(g), srgb_to_linear(b)]
}

/// Convert linear RGB components back to a packed sRGB hex color.
pub fn srgb_hex_from_linear_rgb(rgb: [f32; 3]) -> u32 {
    let to_u8 = |c: f32| (linear_to_srgb(c).clamp(0.0, 1.0) * 255.0).round() as u32;
    (to_u8(rgb[0]) << 16) | (to_u8(rgb[1]) << 8) | to_u8(rgb[2])
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

fn linear_to_srgb(c: f32) -> f32 {
    if c <= 0.0031308 {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_white_and_black_are_fixed_points() {
        assert_eq!(linear_rgb_from_srgb_hex(0xffffff), [1.0, 1.0, 1.0]);
        assert_eq!(linear_rgb_from_srgb_hex(0x000000), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_hex_roundtrip() {
        for hex in [0x2d4ea0u32, 0xff8040, 0x123456, 0xffffff, 0x000000] {
            let rgb = linear_rgb_from_srgb_hex(hex);
            assert_eq!(srgb_hex_from_linear_rgb(rgb), hex, "hex {hex:06x}");
        }
    }

    #[test]
    fn test_gamma_expands_midtones() {
        // sRGB mid gray is darker in linear space.
        let [r, _, _] = linear_rgb_from_srgb_hex(0x808080);
        assert!(r < 0.5 && r > 0.2, "mid gray mapped to {r}");
    }
}
