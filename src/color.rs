//! Background colour parsing.
//!
//! Accepts the colour syntaxes people type on a command line: hex
//! (`#RGB`, `#RGBA`, `#RRGGBB`, `#RRGGBBAA`), `rgb()`/`rgba()` with integer
//! or percentage channels, `hsl()`, `hsv()`/`hsb()`, and the 148 CSS named
//! colours. Matching is case-insensitive. Alpha is accepted and dropped
//! because posters are opaque.

use crate::error::PosterError;
use image::Rgb;

/// Parse a colour specification into an RGB triple.
///
/// # Example
/// ```rust
/// use image::Rgb;
/// use pdf_poster::parse_color;
///
/// assert_eq!(parse_color("#f7f7f7").unwrap(), Rgb([247, 247, 247]));
/// assert_eq!(parse_color("hsl(0, 0%, 97%)").unwrap(), Rgb([247, 247, 247]));
/// assert_eq!(parse_color("Lavender").unwrap(), Rgb([230, 230, 250]));
/// ```
pub fn parse_color(spec: &str) -> Result<Rgb<u8>, PosterError> {
    let s = spec.trim().to_ascii_lowercase();
    let invalid = || PosterError::InvalidConfig(format!("Unrecognised colour '{spec}'"));

    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex(hex).ok_or_else(invalid);
    }

    if let Some((name, args)) = function_call(&s) {
        let rgb = match name {
            "rgb" => rgb_channels(&args, 3),
            "rgba" => rgb_channels(&args, 4),
            "hsl" => hsl(&args),
            "hsv" | "hsb" => hsv(&args),
            _ => None,
        };
        return rgb.map(Rgb).ok_or_else(invalid);
    }

    NAMED_COLORS
        .binary_search_by(|(name, _)| (*name).cmp(s.as_str()))
        .map(|i| Rgb(NAMED_COLORS[i].1))
        .map_err(|_| invalid())
}

fn parse_hex(hex: &str) -> Option<Rgb<u8>> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |i: usize, width: usize| -> Option<u8> {
        let v = u8::from_str_radix(hex.get(i * width..(i + 1) * width)?, 16).ok()?;
        // #abc is shorthand for #aabbcc
        Some(if width == 1 { v * 17 } else { v })
    };
    let width = match hex.len() {
        3 | 4 => 1,
        6 | 8 => 2,
        _ => return None,
    };
    Some(Rgb([channel(0, width)?, channel(1, width)?, channel(2, width)?]))
}

/// Split `name(a, b, c)` into the name and its trimmed arguments.
fn function_call(s: &str) -> Option<(&str, Vec<&str>)> {
    let (name, rest) = s.split_once('(')?;
    let body = rest.strip_suffix(')')?;
    Some((name.trim(), body.split(',').map(str::trim).collect()))
}

/// A finite, non-negative number.
fn number(arg: &str) -> Option<f64> {
    let v: f64 = arg.parse().ok()?;
    (v.is_finite() && v >= 0.0).then_some(v)
}

/// `0%`..=`100%` as a fraction.
fn percent(arg: &str) -> Option<f64> {
    let v = number(arg.strip_suffix('%')?.trim())?;
    (v <= 100.0).then_some(v / 100.0)
}

fn unit_to_u8(x: f64) -> u8 {
    (x * 255.0 + 0.5).floor().clamp(0.0, 255.0) as u8
}

/// Integer (`0..=255`) or percentage channels, with an optional trailing alpha.
fn rgb_channels(args: &[&str], expected: usize) -> Option<[u8; 3]> {
    if args.len() != expected {
        return None;
    }
    if expected == 4 {
        number(args[3])?;
    }
    let channel = |arg: &str| -> Option<u8> {
        if arg.ends_with('%') {
            percent(arg).map(unit_to_u8)
        } else {
            arg.parse().ok()
        }
    };
    Some([channel(args[0])?, channel(args[1])?, channel(args[2])?])
}

/// `hue` in degrees, the other two as percentages.
fn hue_and_percents(args: &[&str]) -> Option<(f64, f64, f64)> {
    match args {
        [h, a, b] => Some((number(h)? / 360.0, percent(a)?, percent(b)?)),
        _ => None,
    }
}

fn hsl(args: &[&str]) -> Option<[u8; 3]> {
    let (h, s, l) = hue_and_percents(args)?;
    if s == 0.0 {
        let v = unit_to_u8(l);
        return Some([v, v, v]);
    }
    let m2 = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let m1 = 2.0 * l - m2;
    let component = |hue: f64| -> u8 {
        let hue = hue.rem_euclid(1.0);
        let v = if hue < 1.0 / 6.0 {
            m1 + (m2 - m1) * hue * 6.0
        } else if hue < 0.5 {
            m2
        } else if hue < 2.0 / 3.0 {
            m1 + (m2 - m1) * (2.0 / 3.0 - hue) * 6.0
        } else {
            m1
        };
        unit_to_u8(v)
    };
    Some([
        component(h + 1.0 / 3.0),
        component(h),
        component(h - 1.0 / 3.0),
    ])
}

fn hsv(args: &[&str]) -> Option<[u8; 3]> {
    let (h, s, v) = hue_and_percents(args)?;
    if s == 0.0 {
        let v = unit_to_u8(v);
        return Some([v, v, v]);
    }
    let h6 = h.rem_euclid(1.0) * 6.0;
    let sector = h6.floor();
    let f = h6 - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));
    let (r, g, b) = match sector as u8 % 6 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    Some([unit_to_u8(r), unit_to_u8(g), unit_to_u8(b)])
}

/// CSS named colours, sorted by name for binary search.
const NAMED_COLORS: &[(&str, [u8; 3])] = &[
    ("aliceblue", [240, 248, 255]),
    ("antiquewhite", [250, 235, 215]),
    ("aqua", [0, 255, 255]),
    ("aquamarine", [127, 255, 212]),
    ("azure", [240, 255, 255]),
    ("beige", [245, 245, 220]),
    ("bisque", [255, 228, 196]),
    ("black", [0, 0, 0]),
    ("blanchedalmond", [255, 235, 205]),
    ("blue", [0, 0, 255]),
    ("blueviolet", [138, 43, 226]),
    ("brown", [165, 42, 42]),
    ("burlywood", [222, 184, 135]),
    ("cadetblue", [95, 158, 160]),
    ("chartreuse", [127, 255, 0]),
    ("chocolate", [210, 105, 30]),
    ("coral", [255, 127, 80]),
    ("cornflowerblue", [100, 149, 237]),
    ("cornsilk", [255, 248, 220]),
    ("crimson", [220, 20, 60]),
    ("cyan", [0, 255, 255]),
    ("darkblue", [0, 0, 139]),
    ("darkcyan", [0, 139, 139]),
    ("darkgoldenrod", [184, 134, 11]),
    ("darkgray", [169, 169, 169]),
    ("darkgreen", [0, 100, 0]),
    ("darkgrey", [169, 169, 169]),
    ("darkkhaki", [189, 183, 107]),
    ("darkmagenta", [139, 0, 139]),
    ("darkolivegreen", [85, 107, 47]),
    ("darkorange", [255, 140, 0]),
    ("darkorchid", [153, 50, 204]),
    ("darkred", [139, 0, 0]),
    ("darksalmon", [233, 150, 122]),
    ("darkseagreen", [143, 188, 143]),
    ("darkslateblue", [72, 61, 139]),
    ("darkslategray", [47, 79, 79]),
    ("darkslategrey", [47, 79, 79]),
    ("darkturquoise", [0, 206, 209]),
    ("darkviolet", [148, 0, 211]),
    ("deeppink", [255, 20, 147]),
    ("deepskyblue", [0, 191, 255]),
    ("dimgray", [105, 105, 105]),
    ("dimgrey", [105, 105, 105]),
    ("dodgerblue", [30, 144, 255]),
    ("firebrick", [178, 34, 34]),
    ("floralwhite", [255, 250, 240]),
    ("forestgreen", [34, 139, 34]),
    ("fuchsia", [255, 0, 255]),
    ("gainsboro", [220, 220, 220]),
    ("ghostwhite", [248, 248, 255]),
    ("gold", [255, 215, 0]),
    ("goldenrod", [218, 165, 32]),
    ("gray", [128, 128, 128]),
    ("green", [0, 128, 0]),
    ("greenyellow", [173, 255, 47]),
    ("grey", [128, 128, 128]),
    ("honeydew", [240, 255, 240]),
    ("hotpink", [255, 105, 180]),
    ("indianred", [205, 92, 92]),
    ("indigo", [75, 0, 130]),
    ("ivory", [255, 255, 240]),
    ("khaki", [240, 230, 140]),
    ("lavender", [230, 230, 250]),
    ("lavenderblush", [255, 240, 245]),
    ("lawngreen", [124, 252, 0]),
    ("lemonchiffon", [255, 250, 205]),
    ("lightblue", [173, 216, 230]),
    ("lightcoral", [240, 128, 128]),
    ("lightcyan", [224, 255, 255]),
    ("lightgoldenrodyellow", [250, 250, 210]),
    ("lightgray", [211, 211, 211]),
    ("lightgreen", [144, 238, 144]),
    ("lightgrey", [211, 211, 211]),
    ("lightpink", [255, 182, 193]),
    ("lightsalmon", [255, 160, 122]),
    ("lightseagreen", [32, 178, 170]),
    ("lightskyblue", [135, 206, 250]),
    ("lightslategray", [119, 136, 153]),
    ("lightslategrey", [119, 136, 153]),
    ("lightsteelblue", [176, 196, 222]),
    ("lightyellow", [255, 255, 224]),
    ("lime", [0, 255, 0]),
    ("limegreen", [50, 205, 50]),
    ("linen", [250, 240, 230]),
    ("magenta", [255, 0, 255]),
    ("maroon", [128, 0, 0]),
    ("mediumaquamarine", [102, 205, 170]),
    ("mediumblue", [0, 0, 205]),
    ("mediumorchid", [186, 85, 211]),
    ("mediumpurple", [147, 112, 219]),
    ("mediumseagreen", [60, 179, 113]),
    ("mediumslateblue", [123, 104, 238]),
    ("mediumspringgreen", [0, 250, 154]),
    ("mediumturquoise", [72, 209, 204]),
    ("mediumvioletred", [199, 21, 133]),
    ("midnightblue", [25, 25, 112]),
    ("mintcream", [245, 255, 250]),
    ("mistyrose", [255, 228, 225]),
    ("moccasin", [255, 228, 181]),
    ("navajowhite", [255, 222, 173]),
    ("navy", [0, 0, 128]),
    ("oldlace", [253, 245, 230]),
    ("olive", [128, 128, 0]),
    ("olivedrab", [107, 142, 35]),
    ("orange", [255, 165, 0]),
    ("orangered", [255, 69, 0]),
    ("orchid", [218, 112, 214]),
    ("palegoldenrod", [238, 232, 170]),
    ("palegreen", [152, 251, 152]),
    ("paleturquoise", [175, 238, 238]),
    ("palevioletred", [219, 112, 147]),
    ("papayawhip", [255, 239, 213]),
    ("peachpuff", [255, 218, 185]),
    ("peru", [205, 133, 63]),
    ("pink", [255, 192, 203]),
    ("plum", [221, 160, 221]),
    ("powderblue", [176, 224, 230]),
    ("purple", [128, 0, 128]),
    ("rebeccapurple", [102, 51, 153]),
    ("red", [255, 0, 0]),
    ("rosybrown", [188, 143, 143]),
    ("royalblue", [65, 105, 225]),
    ("saddlebrown", [139, 69, 19]),
    ("salmon", [250, 128, 114]),
    ("sandybrown", [244, 164, 96]),
    ("seagreen", [46, 139, 87]),
    ("seashell", [255, 245, 238]),
    ("sienna", [160, 82, 45]),
    ("silver", [192, 192, 192]),
    ("skyblue", [135, 206, 235]),
    ("slateblue", [106, 90, 205]),
    ("slategray", [112, 128, 144]),
    ("slategrey", [112, 128, 144]),
    ("snow", [255, 250, 250]),
    ("springgreen", [0, 255, 127]),
    ("steelblue", [70, 130, 180]),
    ("tan", [210, 180, 140]),
    ("teal", [0, 128, 128]),
    ("thistle", [216, 191, 216]),
    ("tomato", [255, 99, 71]),
    ("turquoise", [64, 224, 208]),
    ("violet", [238, 130, 238]),
    ("wheat", [245, 222, 179]),
    ("white", [255, 255, 255]),
    ("whitesmoke", [245, 245, 245]),
    ("yellow", [255, 255, 0]),
    ("yellowgreen", [154, 205, 50]),
];
