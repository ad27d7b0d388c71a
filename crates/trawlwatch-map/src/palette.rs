//! Colours used by the derived layers.

/// RGBA, 0-255 per channel
pub type Rgba = [u8; 4];

/// Tracked-vessel colours, assigned by position in the tracked list
pub const TRACK_PALETTE: [Rgba; 10] = [
    [30, 224, 171, 255],
    [216, 136, 255, 255],
    [117, 172, 255, 255],
    [255, 160, 87, 255],
    [255, 231, 112, 255],
    [240, 98, 146, 255],
    [124, 231, 255, 255],
    [168, 255, 96, 255],
    [255, 120, 120, 255],
    [178, 153, 255, 255],
];

/// The vessel whose preview card is open
pub const HIGHLIGHT: Rgba = [255, 255, 255, 255];

/// Every other vessel marker
pub const NEUTRAL: Rgba = [94, 141, 239, 255];

/// Segments without a known speed
pub const UNKNOWN_SPEED: Rgba = [128, 128, 128, 255];

pub const PORT: Rgba = [226, 232, 240, 255];

/// Speed mapped to the top of the gradient, in knots
pub const MAX_GRADIENT_SPEED: f64 = 20.0;

/// Stable colour for the `index`-th tracked vessel, cycling over the palette
#[must_use]
pub fn color_for_index(index: usize) -> Rgba {
    TRACK_PALETTE[index % TRACK_PALETTE.len()]
}

/// Red at 0 knots to yellow at 20 knots, clamped outside that range
#[must_use]
pub fn speed_color(speed: Option<f64>) -> Rgba {
    match speed {
        Some(knots) if knots.is_finite() => {
            let t = (knots / MAX_GRADIENT_SPEED).clamp(0.0, 1.0);
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let green = (255.0 * t).round() as u8;
            [255, green, 0, 255]
        }
        _ => UNKNOWN_SPEED,
    }
}

/// Replace the alpha channel with `opacity` in `[0, 1]`
#[must_use]
pub fn with_opacity(color: Rgba, opacity: f32) -> Rgba {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let alpha = (255.0 * opacity.clamp(0.0, 1.0)).round() as u8;
    [color[0], color[1], color[2], alpha]
}

/// `#rrggbb`, for renderers that take CSS colours
#[must_use]
pub fn to_hex(color: Rgba) -> String {
    format!("#{:02x}{:02x}{:02x}", color[0], color[1], color[2])
}

/// Alpha channel as a CSS opacity
#[must_use]
pub fn opacity(color: Rgba) -> f32 {
    f32::from(color[3]) / 255.0
}
