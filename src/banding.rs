use std::fmt;
use serde::Deserialize;
use crate::errors::ConfigError;

const COMPONENT: &str = "banding";

/// Marker used for every optional value that is missing
pub const UNAVAILABLE: &str = "unavailable";

/// An RGB color
#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(try_from = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Color {
        Color { r, g, b }
    }

    /// Parses a color given as hex, with or without a leading '#'
    ///
    /// # Arguments
    ///
    /// * 'hex' - color such as "#00a0ff"
    pub fn from_hex(hex: &str) -> Option<Color> {
        let hex = hex.trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

        Some(Color { r, g, b })
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::from_hex(&value).ok_or(format!("invalid color '{}'", value))
    }
}

/// One band of a classification table, 'high' is exclusive and absent on the last tier
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct ColorTier {
    pub low: f64,
    pub high: Option<f64>,
    pub color: Color,
    pub label: String,
}

impl ColorTier {
    fn new(low: f64, high: Option<f64>, color: Color, label: &str) -> ColorTier {
        ColorTier { low, high, color, label: label.to_string() }
    }
}

/// Result of classifying a value
#[derive(Clone, Debug, PartialEq)]
pub struct Band {
    pub color: Color,
    pub label: String,
}

/// An ordered table of color tiers together with the color used for missing values
#[derive(Clone, Debug)]
pub struct BandTable {
    tiers: Vec<ColorTier>,
    neutral: Color,
}

impl BandTable {
    /// Returns a validated band table
    ///
    /// Tiers must be non-empty, ascending and contiguous, and only the last tier may be open-ended.
    ///
    /// # Arguments
    ///
    /// * 'tiers' - the tiers in ascending order
    /// * 'neutral' - color to use when a value is missing
    pub fn new(tiers: Vec<ColorTier>, neutral: Color) -> Result<BandTable, ConfigError> {
        if tiers.is_empty() {
            return Err(ConfigError::new(COMPONENT, "band table has no tiers".to_string(), ""));
        }

        for (i, tier) in tiers.iter().enumerate() {
            let is_last = i == tiers.len() - 1;
            match tier.high {
                Some(high) => {
                    if high <= tier.low {
                        return Err(ConfigError::new(COMPONENT, format!("high {} not above low {}", high, tier.low), &tier.label));
                    }
                    if !is_last && tiers[i + 1].low != high {
                        return Err(ConfigError::new(COMPONENT, format!("not contiguous with tier '{}'", tiers[i + 1].label), &tier.label));
                    }
                },
                None => {
                    if !is_last {
                        return Err(ConfigError::new(COMPONENT, "only the last tier may be open-ended".to_string(), &tier.label));
                    }
                },
            }
        }

        Ok(BandTable { tiers, neutral })
    }

    /// Default UV index table
    pub fn uv() -> BandTable {
        BandTable {
            tiers: vec![
                ColorTier::new(0.0, Some(3.0), Color::rgb(0x2e, 0x9e, 0x3c), "low"),
                ColorTier::new(3.0, Some(6.0), Color::rgb(0xf5, 0x9b, 0x00), "medium"),
                ColorTier::new(6.0, Some(8.0), Color::rgb(0xd7, 0x26, 0x1e), "high"),
                ColorTier::new(8.0, None, Color::rgb(0x8e, 0x3c, 0xb7), "very-high"),
            ],
            neutral: Color::rgb(0xb0, 0xb0, 0xb0),
        }
    }

    /// Default precipitation probability table, values in percent
    pub fn precipitation() -> BandTable {
        BandTable {
            tiers: vec![
                ColorTier::new(0.0, Some(30.0), Color::rgb(0xc6, 0xdb, 0xef), "low"),
                ColorTier::new(30.0, Some(60.0), Color::rgb(0x6b, 0xae, 0xd6), "medium"),
                ColorTier::new(60.0, None, Color::rgb(0x21, 0x71, 0xb5), "high"),
            ],
            neutral: Color::rgb(0xb0, 0xb0, 0xb0),
        }
    }

    pub fn neutral(&self) -> Color {
        self.neutral
    }

    /// Classifies a value, values below the first tier belong to the first tier
    ///
    /// # Arguments
    ///
    /// * 'value' - the value to classify, None (or NaN) renders as unavailable
    pub fn classify(&self, value: Option<f64>) -> Band {
        let value = match value {
            Some(v) if !v.is_nan() => v,
            _ => return Band { color: self.neutral, label: UNAVAILABLE.to_string() },
        };

        let tier = self.tiers.iter()
            .find(|t| t.high.is_none_or(|h| value < h))
            .unwrap_or(&self.tiers[self.tiers.len() - 1]);

        Band { color: tier.color, label: tier.label.clone() }
    }
}

/// Classifies a value against the given table
///
/// # Arguments
///
/// * 'value' - the value to classify
/// * 'table' - the band table to use
pub fn classify(value: Option<f64>, table: &BandTable) -> Band {
    table.classify(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uv_label(value: Option<f64>) -> String {
        classify(value, &BandTable::uv()).label
    }

    #[test]
    fn test_uv_boundaries() {
        assert_eq!(uv_label(Some(2.9)), "low");
        assert_eq!(uv_label(Some(3.0)), "medium");
        assert_eq!(uv_label(Some(7.999)), "high");
        assert_eq!(uv_label(Some(8.0)), "very-high");
        assert_eq!(uv_label(Some(14.0)), "very-high");
        assert_eq!(uv_label(None), "unavailable");
    }

    #[test]
    fn test_unavailable_uses_neutral_color() {
        let table = BandTable::uv();
        let band = table.classify(None);
        assert_eq!(band.color, table.neutral());
        assert_eq!(table.classify(Some(f64::NAN)).label, UNAVAILABLE);
    }

    #[test]
    fn test_below_first_tier_clamps_to_first() {
        assert_eq!(uv_label(Some(-1.0)), "low");
    }

    #[test]
    fn test_precipitation_table() {
        let table = BandTable::precipitation();
        assert_eq!(table.classify(Some(29.0)).label, "low");
        assert_eq!(table.classify(Some(30.0)).label, "medium");
        assert_eq!(table.classify(Some(100.0)).label, "high");
    }

    #[test]
    fn test_custom_table_validation() {
        let grey = Color::rgb(0, 0, 0);
        let ok = BandTable::new(vec![
            ColorTier::new(0.0, Some(5.0), grey, "a"),
            ColorTier::new(5.0, None, grey, "b"),
        ], grey);
        assert!(ok.is_ok());

        let gap = BandTable::new(vec![
            ColorTier::new(0.0, Some(5.0), grey, "a"),
            ColorTier::new(6.0, None, grey, "b"),
        ], grey);
        let err = gap.unwrap_err();
        assert_eq!(err.component, "banding");
        assert_eq!(err.input, "a");

        let open_middle = BandTable::new(vec![
            ColorTier::new(0.0, None, grey, "a"),
            ColorTier::new(5.0, None, grey, "b"),
        ], grey);
        assert!(open_middle.is_err());

        assert!(BandTable::new(Vec::new(), grey).is_err());
    }

    #[test]
    fn test_color_hex() {
        assert_eq!(Color::from_hex("#00a0ff"), Some(Color::rgb(0, 160, 255)));
        assert_eq!(Color::from_hex("zzzzzz"), None);
        assert_eq!(Color::rgb(0, 160, 255).to_string(), "#00a0ff");
    }
}
