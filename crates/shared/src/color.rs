//! RGB hex colour helpers

/// Colour given to objects when nothing else is specified
pub const DEFAULT_COLOR: &str = "#8b5cf6";

/// Normalize a 6-hex-digit RGB code to lowercase `#rrggbb`.
///
/// The leading `#` is optional on input. Anything else (3-digit shorthand,
/// named colours, `hsl(...)`) is rejected.
pub fn normalize_hex(input: &str) -> Option<String> {
    let s = input.trim();
    let digits = s.strip_prefix('#').unwrap_or(s);
    if digits.len() == 6 && digits.chars().all(|c| c.is_ascii_hexdigit()) {
        Some(format!("#{}", digits.to_ascii_lowercase()))
    } else {
        None
    }
}

/// Fixed palette used when a colour is given by name
pub const NAMED_COLORS: [(&str, &str); 12] = [
    ("red", "#ef4444"),
    ("blue", "#3b82f6"),
    ("green", "#10b981"),
    ("yellow", "#f59e0b"),
    ("purple", "#8b5cf6"),
    ("orange", "#f97316"),
    ("pink", "#ec4899"),
    ("cyan", "#06b6d4"),
    ("white", "#ffffff"),
    ("black", "#000000"),
    ("gray", "#6b7280"),
    ("grey", "#6b7280"),
];

/// Look up a palette colour by name (case-insensitive)
pub fn named_color(name: &str) -> Option<&'static str> {
    let name = name.trim();
    NAMED_COLORS
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|(_, hex)| *hex)
}

/// Resolve either a hex code or a palette name to `#rrggbb`
pub fn resolve_color(input: &str) -> Option<String> {
    normalize_hex(input).or_else(|| named_color(input).map(str::to_string))
}

/// Convert HSL (hue in degrees, saturation and lightness in [0,1]) to `#rrggbb`
pub fn hsl_to_hex(hue: f64, saturation: f64, lightness: f64) -> String {
    let h = hue.rem_euclid(360.0);
    let s = saturation.clamp(0.0, 1.0);
    let l = lightness.clamp(0.0, 1.0);

    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = l - c / 2.0;

    let (r, g, b) = match (h / 60.0) as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    let to_byte = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    format!("#{:02x}{:02x}{:02x}", to_byte(r), to_byte(g), to_byte(b))
}
