use eframe::egui::Color32;
use rand::Rng;

/// the named colors the typing buffer understands
pub fn named_color(name: &str) -> Option<Color32> {
    let color = match name {
        "red" => Color32::from_rgb(0xFF, 0x00, 0x00),
        "green" => Color32::from_rgb(0x00, 0xFF, 0x00),
        "blue" => Color32::from_rgb(0x00, 0x00, 0xFF),
        "yellow" => Color32::from_rgb(0xFF, 0xFF, 0x00),
        "purple" => Color32::from_rgb(0x80, 0x00, 0x80),
        "orange" => Color32::from_rgb(0xFF, 0xA5, 0x00),
        "pink" => Color32::from_rgb(0xFF, 0xC0, 0xCB),
        "black" => Color32::from_rgb(0x00, 0x00, 0x00),
        "white" => Color32::from_rgb(0xFF, 0xFF, 0xFF),
        "gray" => Color32::from_rgb(0x80, 0x80, 0x80),
        _ => return None,
    };
    Some(color)
}

/// parse a typed color: a known name (case-insensitive), or hex. 6-digit
/// codes work with or without the leading `#`; 3-digit codes expand
/// CSS-style (`#abc` -> `#aabbcc`) but require the `#` to be typed, so a
/// bare `abc` stays an unfinished 6-digit code instead of matching early.
/// anything else is no color at all.
pub fn parse_color(text: &str) -> Option<Color32> {
    let key = text.to_ascii_lowercase();
    if let Some(color) = named_color(&key) {
        return Some(color);
    }

    let (digits, has_hash) = match key.strip_prefix('#') {
        Some(rest) => (rest, true),
        None => (key.as_str(), false),
    };
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    match digits.len() {
        3 if has_hash => {
            let r = u8::from_str_radix(&digits[0..1], 16).ok()?;
            let g = u8::from_str_radix(&digits[1..2], 16).ok()?;
            let b = u8::from_str_radix(&digits[2..3], 16).ok()?;
            Some(Color32::from_rgb(r * 17, g * 17, b * 17))
        }
        6 => {
            let r = u8::from_str_radix(&digits[0..2], 16).ok()?;
            let g = u8::from_str_radix(&digits[2..4], 16).ok()?;
            let b = u8::from_str_radix(&digits[4..6], 16).ok()?;
            Some(Color32::from_rgb(r, g, b))
        }
        _ => None,
    }
}

/// a uniformly random opaque `#RRGGBB`
pub fn random_color(rng: &mut impl Rng) -> Color32 {
    Color32::from_rgb(
        rng.gen_range(0..=u8::MAX),
        rng.gen_range(0..=u8::MAX),
        rng.gen_range(0..=u8::MAX),
    )
}
