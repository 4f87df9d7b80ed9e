//! # Utility Module
//!
//! Colour helpers shared by the renderers.

/// Linear blend of two 8-bit channels, `alpha` being the weight of `over`.
///
/// ```
/// use menger_sponge::utils::util::blend_channel;
///
/// assert_eq!(blend_channel(0, 255, 0.75), 64);
/// ```
pub fn blend_channel(over: u8, under: u8, alpha: f64) -> u8 {
    let alpha = alpha.clamp(0.0, 1.0);
    let mixed = over as f64 * alpha + under as f64 * (1.0 - alpha);
    mixed.round().clamp(0.0, 255.0) as u8
}

/// Blends two RGB colours channel by channel.
pub fn blend_rgb(over: [u8; 3], under: [u8; 3], alpha: f64) -> [u8; 3] {
    [
        blend_channel(over[0], under[0], alpha),
        blend_channel(over[1], under[1], alpha),
        blend_channel(over[2], under[2], alpha),
    ]
}

/// Scales an RGB colour towards black by `factor` in `[0, 1]`.
pub fn shade_rgb(color: [u8; 3], factor: f64) -> [u8; 3] {
    blend_rgb(color, [0, 0, 0], factor)
}
