//! Color utility functions shared by the renderers.
//!
//! Labels get a deterministic display color from their id. In control mode,
//! every handle is drawn in a color that encodes `(label index, handle index)`
//! so that a renderer can resolve the handle under the pointer by reading back
//! a single pixel.

/// Golden angle in degrees; successive ids get well separated hues.
const GOLDEN_ANGLE: f32 = 137.507_77;

/// Convert HSV to RGB.
///
/// # Arguments
/// * `h` - Hue in degrees (0-360)
/// * `s` - Saturation (0.0-1.0)
/// * `v` - Value/brightness (0.0-1.0)
///
/// # Returns
/// RGB tuple with values in range 0.0-1.0
pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> (f32, f32, f32) {
    let c = v * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = v - c;

    let (r, g, b) = if h < 60.0 {
        (c, x, 0.0)
    } else if h < 120.0 {
        (x, c, 0.0)
    } else if h < 180.0 {
        (0.0, c, x)
    } else if h < 240.0 {
        (0.0, x, c)
    } else if h < 300.0 {
        (x, 0.0, c)
    } else {
        (c, 0.0, x)
    };

    (r + m, g + m, b + m)
}

/// Deterministic display color for a label id.
pub fn color_for_id(id: u64) -> [u8; 3] {
    let hue = ((id % 1_000_000) as f32 * GOLDEN_ANGLE) % 360.0;
    let (r, g, b) = hsv_to_rgb(hue, 0.65, 0.95);
    [to_byte(r), to_byte(g), to_byte(b)]
}

fn to_byte(channel: f32) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Largest label index that fits in a control color.
pub const MAX_CONTROL_LABEL_INDEX: usize = 0xFFFE;

/// Largest handle index that fits in a control color.
pub const MAX_CONTROL_HANDLE_INDEX: usize = 0xFF;

/// Encode a `(label index, handle index)` pair as a control color.
///
/// Black (`[0, 0, 0]`) is reserved for the background. Returns `None` when
/// either index is out of range.
pub fn encode_control_color(label_index: usize, handle_index: usize) -> Option<[u8; 3]> {
    if label_index > MAX_CONTROL_LABEL_INDEX || handle_index > MAX_CONTROL_HANDLE_INDEX {
        return None;
    }
    let label = label_index + 1;
    Some([(label >> 8) as u8, (label & 0xFF) as u8, handle_index as u8])
}

/// Decode a control color back into `(label index, handle index)`.
pub fn decode_control_color(color: [u8; 3]) -> Option<(usize, usize)> {
    let label = (usize::from(color[0]) << 8) | usize::from(color[1]);
    if label == 0 {
        return None;
    }
    Some((label - 1, usize::from(color[2])))
}
