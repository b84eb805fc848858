// Severity classification for scalar readings shown as status badges
use serde::Serialize;

/// Colors and text for one rendered badge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BadgeStyle {
    pub background: &'static str,
    pub foreground: &'static str,
    pub label: String,
}

/// One tier of a band table. `lower` is inclusive; the tier extends up to the
/// next tier's `lower` (exclusive).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeverityBand {
    pub code: &'static str,
    pub lower: f64,
    pub background: &'static str,
    pub foreground: &'static str,
}

/// Band table for one classified quantity.
#[derive(Debug, Clone, Copy)]
pub struct BandTable {
    pub decimals: usize,
    pub unit: Option<&'static str>,
    pub unknown_background: &'static str,
    pub unknown_foreground: &'static str,
    /// Ascending by `lower`; the first entry is the lowest (unlabelled) band.
    pub bands: &'static [SeverityBand],
}

pub const UNKNOWN_LABEL: &str = "—";

/// Planetary K index, 0..9.
pub const KP_INDEX: BandTable = BandTable {
    decimals: 2,
    unit: None,
    unknown_background: "#eef6ff",
    unknown_foreground: "#111",
    bands: &[
        SeverityBand { code: "Quiet", lower: 0.0, background: "#C7F2C8", foreground: "#0B3D0B" },
        SeverityBand { code: "G1", lower: 4.0, background: "#FFF3B0", foreground: "#5C4800" },
        SeverityBand { code: "G2", lower: 5.0, background: "#FFD8A8", foreground: "#5A3A00" },
        SeverityBand { code: "G3", lower: 6.0, background: "#FFC078", foreground: "#5A2A00" },
        SeverityBand { code: "G4", lower: 7.0, background: "#FFA8A8", foreground: "#5A0B0B" },
        SeverityBand { code: "G5", lower: 9.0, background: "#FF6B6B", foreground: "#fff" },
    ],
};

/// Total electron content, in TEC units.
pub const TEC_DENSITY: BandTable = BandTable {
    decimals: 0,
    unit: Some("TECu"),
    unknown_background: "#f6efff",
    unknown_foreground: "#111",
    bands: &[
        SeverityBand { code: "Quiet", lower: 0.0, background: "#C7F2C8", foreground: "#0B3D0B" },
        SeverityBand { code: "Moderate", lower: 125.0, background: "#FFC078", foreground: "#5A2A00" },
        SeverityBand { code: "Severe", lower: 175.0, background: "#FF6B6B", foreground: "#fff" },
    ],
};

impl BandTable {
    /// Highest band whose lower bound is at or below `value`. Values under
    /// the first bound fall into the lowest band.
    pub fn band_for(&self, value: f64) -> Option<&SeverityBand> {
        if !value.is_finite() {
            return None;
        }
        self.bands
            .iter()
            .rev()
            .find(|band| value >= band.lower)
            .or_else(|| self.bands.first())
    }

    pub fn classify(&self, value: f64) -> BadgeStyle {
        let Some(band) = self.band_for(value) else {
            return BadgeStyle {
                background: self.unknown_background,
                foreground: self.unknown_foreground,
                label: UNKNOWN_LABEL.to_string(),
            };
        };

        let mut label = format!("{:.*}", self.decimals, value);
        if let Some(unit) = self.unit {
            label.push(' ');
            label.push_str(unit);
        }
        let is_lowest = self.bands.first().is_some_and(|b| b.code == band.code);
        if !is_lowest {
            label.push_str(&format!(" ({})", band.code));
        }

        BadgeStyle {
            background: band.background,
            foreground: band.foreground,
            label,
        }
    }
}

pub fn classify_index(kp: f64) -> BadgeStyle {
    KP_INDEX.classify(kp)
}

pub fn classify_density(tec: f64) -> BadgeStyle {
    TEC_DENSITY.classify(tec)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(table: &BandTable, value: f64) -> Option<&'static str> {
        table.band_for(value).map(|b| b.code)
    }

    #[test]
    fn test_index_boundaries() {
        assert_eq!(code(&KP_INDEX, 0.0), Some("Quiet"));
        assert_eq!(code(&KP_INDEX, 3.99), Some("Quiet"));
        assert_eq!(code(&KP_INDEX, 4.0), Some("G1"));
        assert_eq!(code(&KP_INDEX, 5.0), Some("G2"));
        assert_eq!(code(&KP_INDEX, 6.5), Some("G3"));
        assert_eq!(code(&KP_INDEX, 8.99), Some("G4"));
        assert_eq!(code(&KP_INDEX, 9.0), Some("G5"));
        assert_eq!(code(&KP_INDEX, 12.0), Some("G5"));
    }

    #[test]
    fn test_index_labels() {
        assert_eq!(classify_index(3.333).label, "3.33");
        assert_eq!(classify_index(4.0).label, "4.00 (G1)");
        let storm = classify_index(9.0);
        assert_eq!(storm.label, "9.00 (G5)");
        assert_eq!(storm.background, "#FF6B6B");
        assert_eq!(storm.foreground, "#fff");
    }

    #[test]
    fn test_non_finite_is_unknown() {
        for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let kp = classify_index(value);
            assert_eq!(kp.label, UNKNOWN_LABEL);
            assert_eq!(kp.background, "#eef6ff");

            let tec = classify_density(value);
            assert_eq!(tec.label, UNKNOWN_LABEL);
            assert_eq!(tec.background, "#f6efff");
        }
    }

    #[test]
    fn test_density_boundaries() {
        assert_eq!(code(&TEC_DENSITY, 124.0), Some("Quiet"));
        assert_eq!(code(&TEC_DENSITY, 125.0), Some("Moderate"));
        assert_eq!(code(&TEC_DENSITY, 174.0), Some("Moderate"));
        assert_eq!(code(&TEC_DENSITY, 175.0), Some("Severe"));
    }

    #[test]
    fn test_density_labels() {
        assert_eq!(classify_density(87.4).label, "87 TECu");
        assert_eq!(classify_density(130.0).label, "130 TECu (Moderate)");
        assert_eq!(classify_density(200.0).label, "200 TECu (Severe)");
    }

    #[test]
    fn test_negative_reading_falls_into_lowest_band() {
        assert_eq!(code(&KP_INDEX, -0.5), Some("Quiet"));
    }
}
