use eframe::egui::Color32;

/// Colors handed out to newly added series, cycled by current series count.
pub const PRESET_COLORS: [&str; 8] = [
    "#3B82F6", "#10B981", "#F59E0B", "#EF4444", "#8B5CF6", "#EC4899", "#06B6D4", "#6366F1",
];

/// Per-slice fallback colors for pie charts, cycled by slice index.
pub const PIE_COLORS: [&str; 6] = [
    "#3B82F6", "#10B981", "#F59E0B", "#EF4444", "#8B5CF6", "#EC4899",
];

pub const DEFAULT_SERIES_COLOR: &str = "#3B82F6";

/// Parse a `#RRGGBB` hex string. Returns `None` for anything else.
pub fn parse_hex(color: &str) -> Option<Color32> {
    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color32::from_rgb(r, g, b))
}

pub fn to_hex(color: Color32) -> String {
    format!("#{:02X}{:02X}{:02X}", color.r(), color.g(), color.b())
}

/// Color for a series: its own hex value if present and valid, otherwise the
/// preset palette entry for its position.
pub fn series_color(explicit: Option<&str>, index: usize) -> Color32 {
    explicit
        .and_then(parse_hex)
        .or_else(|| parse_hex(PRESET_COLORS[index % PRESET_COLORS.len()]))
        .unwrap_or(Color32::LIGHT_BLUE)
}

pub fn pie_color(index: usize) -> Color32 {
    parse_hex(PIE_COLORS[index % PIE_COLORS.len()]).unwrap_or(Color32::LIGHT_BLUE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_preset_colors() {
        for c in PRESET_COLORS {
            assert!(parse_hex(c).is_some(), "{c} should parse");
        }
    }

    #[test]
    fn rejects_malformed_hex() {
        assert!(parse_hex("3B82F6").is_none());
        assert!(parse_hex("#3B82F").is_none());
        assert!(parse_hex("#GGGGGG").is_none());
    }

    #[test]
    fn hex_round_trip() {
        let c = parse_hex("#10B981").unwrap();
        assert_eq!(to_hex(c), "#10B981");
    }

    #[test]
    fn explicit_color_wins_over_palette() {
        assert_eq!(series_color(Some("#EC4899"), 0), parse_hex("#EC4899").unwrap());
        assert_eq!(series_color(None, 1), parse_hex(PRESET_COLORS[1]).unwrap());
        assert_eq!(series_color(Some("bogus"), 2), parse_hex(PRESET_COLORS[2]).unwrap());
    }
}
