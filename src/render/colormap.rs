use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Color used for NaN and infinite samples.
pub const BAD_RGBA: [u8; 4] = [255, 255, 255, 255];

// ColorBrewer RdBu, 11 classes, red end first.
const RDBU: [[u8; 3]; 11] = [
    [103, 0, 31],
    [178, 24, 43],
    [214, 96, 77],
    [244, 165, 130],
    [253, 219, 199],
    [247, 247, 247],
    [209, 229, 240],
    [146, 197, 222],
    [67, 147, 195],
    [33, 102, 172],
    [5, 48, 97],
];

const GRAY: [[u8; 3]; 2] = [[0, 0, 0], [255, 255, 255]];

/// Colormaps available to the animator and the CLI.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Colormap {
    /// Diverging red (low) to blue (high).
    #[default]
    #[serde(rename = "RdBu")]
    RdBu,
    /// [`Colormap::RdBu`] reversed.
    #[serde(rename = "RdBu_r")]
    RdBuR,
    /// Black (low) to white (high).
    #[serde(rename = "gray")]
    Gray,
}

impl Colormap {
    /// Map `t` in `[0, 1]` to an opaque RGBA8 color. Out-of-range values are clamped.
    pub fn sample(self, t: f64) -> [u8; 4] {
        if !t.is_finite() {
            return BAD_RGBA;
        }
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::RdBu => lerp_table(&RDBU, t),
            Self::RdBuR => lerp_table(&RDBU, 1.0 - t),
            Self::Gray => lerp_table(&GRAY, t),
        }
    }

    /// Map `v` from the symmetric range `[-vmax, vmax]`.
    ///
    /// A zero `vmax` puts every finite sample at the center of the map.
    pub fn sample_symmetric(self, v: f64, vmax: f64) -> [u8; 4] {
        if vmax > 0.0 {
            self.sample((v + vmax) / (2.0 * vmax))
        } else if v.is_finite() {
            self.sample(0.5)
        } else {
            BAD_RGBA
        }
    }
}

impl FromStr for Colormap {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "RdBu" => Ok(Self::RdBu),
            "RdBu_r" => Ok(Self::RdBuR),
            "gray" | "grey" => Ok(Self::Gray),
            other => Err(format!(
                "unknown colormap \"{other}\" (expected RdBu, RdBu_r or gray)"
            )),
        }
    }
}

fn lerp_table(table: &[[u8; 3]], t: f64) -> [u8; 4] {
    let last = table.len() - 1;
    let pos = t * last as f64;
    let lo = (pos.floor() as usize).min(last);
    let hi = (lo + 1).min(last);
    let frac = pos - lo as f64;

    let channel = |c: usize| {
        let a = f64::from(table[lo][c]);
        let b = f64::from(table[hi][c]);
        (a + (b - a) * frac).round().clamp(0.0, 255.0) as u8
    };
    [channel(0), channel(1), channel(2), 255]
}

#[cfg(test)]
#[path = "../../tests/unit/render/colormap.rs"]
mod tests;
