use std::collections::BTreeMap;

use super::repo::TenantBranding;

/// Converts a branding row into the CSS variable map served to the
/// storefront shell. Only variables whose stored color parses as 6-digit
/// hex are emitted; a malformed value simply leaves the shell's own
/// default in place.
pub fn resolve(branding: &TenantBranding) -> BTreeMap<String, String> {
    let mut vars = BTreeMap::new();
    let pairs = [
        ("--primary", branding.primary_color.as_deref()),
        ("--secondary", branding.secondary_color.as_deref()),
        ("--background", branding.background_color.as_deref()),
        ("--foreground", branding.text_color.as_deref()),
    ];
    for (name, color) in pairs {
        if let Some(hsl) = color.and_then(hex_to_hsl_var) {
            vars.insert(name.to_string(), hsl);
        }
    }
    vars
}

pub fn is_valid_hex(s: &str) -> bool {
    parse_hex(s).is_some()
}

/// `#RRGGBB` → `"H S% L%"`, the space-separated HSL form the shell's
/// stylesheet expects. Deterministic: same input, same output.
pub fn hex_to_hsl_var(hex: &str) -> Option<String> {
    let (r, g, b) = parse_hex(hex)?;
    let (h, s, l) = rgb_to_hsl(r, g, b);
    Some(format!("{} {}% {}%", h, s, l))
}

fn parse_hex(s: &str) -> Option<(u8, u8, u8)> {
    let hex = s.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some((r, g, b))
}

/// Standard RGB→HSL, with hue in rounded degrees and saturation/lightness
/// as rounded percentages.
fn rgb_to_hsl(r: u8, g: u8, b: u8) -> (i64, i64, i64) {
    let r = f64::from(r) / 255.0;
    let g = f64::from(g) / 255.0;
    let b = f64::from(b) / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    if (max - min).abs() < f64::EPSILON {
        return (0, 0, (l * 100.0).round() as i64);
    }

    let d = max - min;
    let s = if l > 0.5 {
        d / (2.0 - max - min)
    } else {
        d / (max + min)
    };

    let h = if (max - r).abs() < f64::EPSILON {
        ((g - b) / d + if g < b { 6.0 } else { 0.0 }) * 60.0
    } else if (max - g).abs() < f64::EPSILON {
        ((b - r) / d + 2.0) * 60.0
    } else {
        ((r - g) / d + 4.0) * 60.0
    };

    (
        h.round() as i64 % 360,
        (s * 100.0).round() as i64,
        (l * 100.0).round() as i64,
    )
}

#[cfg(test)]
mod theme_tests {
    use super::*;
    use uuid::Uuid;

    fn branding_with(primary: Option<&str>) -> TenantBranding {
        let mut branding = crate::tenants::services::default_branding(Uuid::new_v4());
        branding.primary_color = primary.map(Into::into);
        branding
    }

    #[test]
    fn known_conversions() {
        assert_eq!(hex_to_hsl_var("#ffffff").as_deref(), Some("0 0% 100%"));
        assert_eq!(hex_to_hsl_var("#000000").as_deref(), Some("0 0% 0%"));
        assert_eq!(hex_to_hsl_var("#ff0000").as_deref(), Some("0 100% 50%"));
        assert_eq!(hex_to_hsl_var("#00ff00").as_deref(), Some("120 100% 50%"));
        assert_eq!(hex_to_hsl_var("#0000ff").as_deref(), Some("240 100% 50%"));
    }

    #[test]
    fn conversion_is_deterministic() {
        let first = hex_to_hsl_var("#0891b2").expect("valid hex");
        for _ in 0..10 {
            assert_eq!(hex_to_hsl_var("#0891b2").as_deref(), Some(first.as_str()));
        }
    }

    #[test]
    fn malformed_hex_yields_none() {
        assert_eq!(hex_to_hsl_var("0891b2"), None);
        assert_eq!(hex_to_hsl_var("#08f"), None);
        assert_eq!(hex_to_hsl_var("#gg91b2"), None);
        assert_eq!(hex_to_hsl_var("#0891b2ff"), None);
        assert_eq!(hex_to_hsl_var(""), None);
    }

    #[test]
    fn malformed_color_skips_the_variable() {
        let vars = resolve(&branding_with(Some("not-a-color")));
        assert!(!vars.contains_key("--primary"));
        // The remaining defaults still resolve.
        assert!(vars.contains_key("--background"));
    }

    #[test]
    fn valid_color_overrides_primary() {
        let vars = resolve(&branding_with(Some("#0891b2")));
        assert_eq!(
            vars.get("--primary").map(String::as_str),
            hex_to_hsl_var("#0891b2").as_deref()
        );
    }

    #[test]
    fn hex_validation() {
        assert!(is_valid_hex("#0891b2"));
        assert!(is_valid_hex("#FFFFFF"));
        assert!(!is_valid_hex("#fff"));
        assert!(!is_valid_hex("blue"));
    }
}
