/// A pixel in 8-bit HSV, hue in half-degrees `[0, 180)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hsv {
    pub h: u8,
    pub s: u8,
    pub v: u8,
}

impl Hsv {
    /// 8-bit conversion: hue in half-degrees `[0, 180)`, S and V in `[0, 255]`
    pub fn from_rgb([r, g, b]: [u8; 3]) -> Self {
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = (max - min) as f32;

        let v = max;
        let s = if max == 0 {
            0
        } else {
            (255.0 * delta / max as f32).round() as u8
        };

        let h = if delta == 0.0 {
            0.0
        } else if max == r {
            60.0 * (g as f32 - b as f32) / delta
        } else if max == g {
            120.0 + 60.0 * (b as f32 - r as f32) / delta
        } else {
            240.0 + 60.0 * (r as f32 - g as f32) / delta
        };
        let h = if h < 0.0 { h + 360.0 } else { h };
        // half-degrees so the full circle fits a byte; 359.x rounds back to 0
        let h = ((h / 2.0).round() as u16 % 180) as u8;

        Self { h, s, v }
    }
}
