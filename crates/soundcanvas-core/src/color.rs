//! Named five-colour palettes and CSS colour string helpers.
//!
//! Colours travel to the surface as CSS strings because that is what a 2D
//! canvas consumes. Particles keep the compact [`Rgb`] form and format on draw.

use crate::error::{CoreError, CoreResult};
use fnv::FnvHashMap;
use rand::Rng;

pub const PALETTE_SIZE: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn rgba(self, alpha: f32) -> String {
        format!(
            "rgba({}, {}, {}, {})",
            self.r,
            self.g,
            self.b,
            format_alpha(alpha)
        )
    }

    /// Parse `#rgb` or `#rrggbb`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#')?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        match digits.len() {
            3 => {
                let mut it = digits.chars().filter_map(|c| c.to_digit(16));
                let r = it.next()? as u8;
                let g = it.next()? as u8;
                let b = it.next()? as u8;
                Some(Self::new(r * 17, g * 17, b * 17))
            }
            6 => {
                let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
                Some(Self::new(channel(0)?, channel(2)?, channel(4)?))
            }
            _ => None,
        }
    }
}

fn format_alpha(alpha: f32) -> String {
    let a = if alpha.is_finite() {
        alpha.clamp(0.0, 1.0)
    } else {
        0.0
    };
    format!("{}", (a * 1000.0).round() / 1000.0)
}

/// Parse the channel list of `rgb(..)` / `rgba(..)`.
fn parse_functional(color: &str) -> Option<Rgb> {
    let body = color
        .strip_prefix("rgba(")
        .or_else(|| color.strip_prefix("rgb("))?
        .strip_suffix(')')?;
    let mut parts = body.split(',').map(|p| p.trim().parse::<f32>().ok());
    let mut channel = || -> Option<u8> { Some(parts.next()??.round().clamp(0.0, 255.0) as u8) };
    Some(Rgb::new(channel()?, channel()?, channel()?))
}

/// Re-encode `color` with the given alpha, keeping its channels.
///
/// Hex and `rgb(..)` become `rgba(..)`; `rgba(..)` gets its alpha replaced.
/// Anything unrecognised comes back unchanged.
pub fn adjust_opacity(color: &str, alpha: f32) -> String {
    let color = color.trim();
    let parsed = if color.starts_with('#') {
        Rgb::from_hex(color)
    } else {
        parse_functional(color)
    };
    match parsed {
        Some(rgb) => rgb.rgba(alpha),
        None => color.to_string(),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    pub name: &'static str,
    pub colors: [Rgb; PALETTE_SIZE],
}

impl Palette {
    /// Colour at `index`, wrapping around the palette.
    #[inline]
    pub fn color(&self, index: usize) -> Rgb {
        self.colors[index % PALETTE_SIZE]
    }

    pub fn hex(&self) -> [String; PALETTE_SIZE] {
        self.colors.map(Rgb::to_hex)
    }
}

pub const SCHEMES: [Palette; 6] = [
    Palette {
        name: "cosmic",
        colors: [
            Rgb::new(0x7b, 0x2f, 0xf7),
            Rgb::new(0xf1, 0x07, 0xa3),
            Rgb::new(0x00, 0xd4, 0xff),
            Rgb::new(0xff, 0xd6, 0x0a),
            Rgb::new(0x3a, 0x0c, 0xa3),
        ],
    },
    Palette {
        name: "sunset",
        colors: [
            Rgb::new(0xff, 0x6b, 0x35),
            Rgb::new(0xf7, 0xc5, 0x9f),
            Rgb::new(0xef, 0x47, 0x6f),
            Rgb::new(0xff, 0xd1, 0x66),
            Rgb::new(0x9d, 0x02, 0x08),
        ],
    },
    Palette {
        name: "ocean",
        colors: [
            Rgb::new(0x00, 0x77, 0xb6),
            Rgb::new(0x00, 0xb4, 0xd8),
            Rgb::new(0x90, 0xe0, 0xef),
            Rgb::new(0x03, 0x04, 0x5e),
            Rgb::new(0xca, 0xf0, 0xf8),
        ],
    },
    Palette {
        name: "forest",
        colors: [
            Rgb::new(0x2d, 0x6a, 0x4f),
            Rgb::new(0x52, 0xb7, 0x88),
            Rgb::new(0x95, 0xd5, 0xb2),
            Rgb::new(0x1b, 0x43, 0x32),
            Rgb::new(0xd8, 0xf3, 0xdc),
        ],
    },
    Palette {
        name: "neon",
        colors: [
            Rgb::new(0x39, 0xff, 0x14),
            Rgb::new(0xff, 0x07, 0x3a),
            Rgb::new(0x04, 0xd9, 0xff),
            Rgb::new(0xff, 0xf0, 0x1f),
            Rgb::new(0xbc, 0x13, 0xfe),
        ],
    },
    Palette {
        name: "monochrome",
        colors: [
            Rgb::new(0xff, 0xff, 0xff),
            Rgb::new(0xcc, 0xcc, 0xcc),
            Rgb::new(0x99, 0x99, 0x99),
            Rgb::new(0x66, 0x66, 0x66),
            Rgb::new(0x33, 0x33, 0x33),
        ],
    },
];

pub struct ColorRegistry {
    schemes: FnvHashMap<&'static str, Palette>,
    current: Palette,
}

impl Default for ColorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ColorRegistry {
    pub fn new() -> Self {
        let schemes = SCHEMES.iter().map(|p| (p.name, *p)).collect();
        Self {
            schemes,
            current: SCHEMES[0],
        }
    }

    /// Scheme names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> {
        SCHEMES.iter().map(|p| p.name)
    }

    pub fn palette(&self, name: &str) -> CoreResult<&Palette> {
        self.schemes
            .get(name)
            .ok_or_else(|| CoreError::UnknownColorScheme(name.to_string()))
    }

    pub fn current(&self) -> &Palette {
        &self.current
    }

    pub fn set_current(&mut self, name: &str) -> CoreResult<()> {
        let palette = *self.palette(name)?;
        self.current = palette;
        log::info!("[palette] switched to {}", palette.name);
        Ok(())
    }

    pub fn sample_rgb<R: Rng>(&self, rng: &mut R) -> Rgb {
        self.current.colors[rng.gen_range(0..PALETTE_SIZE)]
    }

    /// Uniform pick from the current palette, translucent when `alpha < 1`.
    pub fn sample<R: Rng>(&self, rng: &mut R, alpha: Option<f32>) -> String {
        let hex = self.sample_rgb(rng).to_hex();
        match alpha {
            Some(a) if a < 1.0 => adjust_opacity(&hex, a),
            _ => hex,
        }
    }
}
