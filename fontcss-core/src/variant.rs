//! Variant resolution: axis groups → concrete (style, weight) pairs (fontcss https://github.com/fontcss/fontcss)

use std::cmp::Ordering;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::specifier::{AxisName, AxisSpec, AxisValue, ParsedFamily};

/// The weights a `start..end` range can expand to.
pub const STANDARD_WEIGHTS: [u16; 9] = [100, 200, 300, 400, 500, 600, 700, 800, 900];

pub const DEFAULT_WEIGHT: &str = "400";
pub const BOLD_WEIGHT: &str = "700";

const SHORTHAND: [&str; 8] = [
    "i",
    "italic",
    "b",
    "bold",
    "bi",
    "ib",
    "bolditalic",
    "italicbold",
];

static NUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(?:\.\d+)?$").expect("valid regex"));
static ALPHABETIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z]+$").expect("valid regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    Normal,
    Italic,
}

impl FontStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            FontStyle::Normal => "normal",
            FontStyle::Italic => "italic",
        }
    }
}

impl fmt::Display for FontStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One face to emit. The weight stays a string so values like `451` survive untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ResolvedVariant {
    pub style: FontStyle,
    pub weight: String,
}

impl ResolvedVariant {
    pub fn new(style: FontStyle, weight: impl Into<String>) -> Self {
        Self {
            style,
            weight: weight.into(),
        }
    }

    pub fn regular() -> Self {
        Self::new(FontStyle::Normal, DEFAULT_WEIGHT)
    }
}

/// Standard weights inside `[start, end]`; reversed bounds are swapped.
pub fn expand_range(start: u16, end: u16) -> impl Iterator<Item = u16> {
    let (lo, hi) = if start <= end {
        (start, end)
    } else {
        (end, start)
    };
    STANDARD_WEIGHTS
        .into_iter()
        .filter(move |w| (lo..=hi).contains(w))
}

/// Whether `raw` is a plain weight number such as `400` or `450.5`.
pub fn is_weight_number(raw: &str) -> bool {
    NUMERIC.is_match(raw)
}

/// Apply the shorthand rules to a single weight token.
///
/// Returns the weight and, when the token implies one, a style. `None` means
/// the token contributes nothing (it was empty).
///
/// Purely alphabetic tokens outside the shorthand table (`regular`, `thin`)
/// mean 400. Otherwise an `i`/`italic` marks the face italic and any `b`
/// left over after removing it forces 700, so `100bi` is italic/700.
pub fn normalize_weight_token(raw: &str) -> Option<(Option<FontStyle>, String)> {
    let token = raw.trim().to_ascii_lowercase();
    if token.is_empty() {
        return None;
    }

    if is_weight_number(&token) {
        return Some((None, token));
    }

    if ALPHABETIC.is_match(&token) && !SHORTHAND.contains(&token.as_str()) {
        return Some((None, DEFAULT_WEIGHT.to_string()));
    }

    let (style, rest) = if token.contains("italic") {
        (Some(FontStyle::Italic), token.replacen("italic", "", 1))
    } else if token.contains('i') {
        (Some(FontStyle::Italic), token.replacen('i', "", 1))
    } else {
        (None, token)
    };

    let weight = if rest.contains('b') {
        BOLD_WEIGHT.to_string()
    } else if rest.is_empty() {
        DEFAULT_WEIGHT.to_string()
    } else if is_weight_number(&rest) {
        rest
    } else {
        log::warn!("unrecognised weight token {raw:?}, using {DEFAULT_WEIGHT}");
        DEFAULT_WEIGHT.to_string()
    };

    Some((style, weight))
}

/// Expand a parsed family into its sorted, deduplicated variants.
///
/// Ordering is ascending numeric weight, then normal before italic. A family
/// with nothing usable resolves to normal/400.
pub fn resolve_variants(parsed: &ParsedFamily) -> Vec<ResolvedVariant> {
    let mut variants: Vec<ResolvedVariant> = parsed.axes.iter().flat_map(resolve_group).collect();

    variants.sort_by(compare_variants);
    variants.dedup();

    if variants.is_empty() {
        variants.push(ResolvedVariant::regular());
    }

    log::debug!(
        "{} resolved to {} variant(s)",
        parsed.normalized_id,
        variants.len()
    );
    variants
}

fn resolve_group(group: &AxisSpec) -> Vec<ResolvedVariant> {
    let axis_style = group.value_of(&AxisName::Italic).map(|value| match value {
        AxisValue::Number { value } if value == "0" => FontStyle::Normal,
        _ => FontStyle::Italic,
    });

    let weights: Vec<(Option<FontStyle>, String)> = match group.value_of(&AxisName::Weight) {
        None => vec![(None, DEFAULT_WEIGHT.to_string())],
        Some(AxisValue::Number { value }) => vec![(None, value.clone())],
        Some(AxisValue::Range { start, end }) => expand_range(*start, *end)
            .map(|w| (None, w.to_string()))
            .collect(),
        Some(AxisValue::Token { value }) => normalize_weight_token(value).into_iter().collect(),
    };

    weights
        .into_iter()
        .map(|(token_style, weight)| {
            let style = axis_style.or(token_style).unwrap_or(FontStyle::Normal);
            ResolvedVariant { style, weight }
        })
        .collect()
}

fn compare_variants(a: &ResolvedVariant, b: &ResolvedVariant) -> Ordering {
    let by_number = match (a.weight.parse::<f64>(), b.weight.parse::<f64>()) {
        (Ok(x), Ok(y)) => x.total_cmp(&y),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => Ordering::Equal,
    };

    by_number
        .then_with(|| a.weight.cmp(&b.weight))
        .then_with(|| a.style.cmp(&b.style))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::FamilyAliases;
    use crate::specifier::{parse_family, ParseMode};

    fn resolve(token: &str) -> Vec<(FontStyle, String)> {
        let parsed = parse_family(token, ParseMode::Lenient, &FamilyAliases::default()).unwrap();
        resolve_variants(&parsed)
            .into_iter()
            .map(|v| (v.style, v.weight))
            .collect()
    }

    fn v(style: FontStyle, weight: &str) -> (FontStyle, String) {
        (style, weight.to_string())
    }

    use FontStyle::{Italic, Normal};

    #[test]
    fn bare_family_defaults_to_regular() {
        assert_eq!(resolve("Roboto"), vec![v(Normal, "400")]);
    }

    #[test]
    fn single_weight_and_single_italic() {
        assert_eq!(resolve("Roboto:wght@700"), vec![v(Normal, "700")]);
        assert_eq!(resolve("Roboto:ital@1"), vec![v(Italic, "400")]);
        assert_eq!(
            resolve("Lato:ital@0;1"),
            vec![v(Normal, "400"), v(Italic, "400")]
        );
    }

    #[test]
    fn ital_wght_pairs_are_sorted_by_weight_then_style() {
        assert_eq!(
            resolve("Roboto:ital,wght@1,700;1,400;0,700;0,400"),
            vec![
                v(Normal, "400"),
                v(Italic, "400"),
                v(Normal, "700"),
                v(Italic, "700"),
            ]
        );
    }

    #[test]
    fn groups_are_paired_not_cross_multiplied() {
        assert_eq!(
            resolve("Roboto:ital,wght@0,400;1,700"),
            vec![v(Normal, "400"), v(Italic, "700")]
        );
    }

    #[test]
    fn ranges_expand_over_standard_weights_only() {
        let weights: Vec<String> = resolve("Roboto:wght@300..700")
            .into_iter()
            .map(|(_, w)| w)
            .collect();
        assert_eq!(weights, vec!["300", "400", "500", "600", "700"]);

        let weights: Vec<String> = resolve("Inter:wght@150..450")
            .into_iter()
            .map(|(_, w)| w)
            .collect();
        assert_eq!(weights, vec!["200", "300", "400"]);
    }

    #[test]
    fn two_styles_over_full_range_give_eighteen_variants() {
        let variants = resolve("Jost:ital,wght@0,100..900;1,100..900");
        assert_eq!(variants.len(), 18);
        assert_eq!(variants.first(), Some(&v(Normal, "100")));
        assert_eq!(variants.last(), Some(&v(Italic, "900")));
    }

    #[test]
    fn non_standard_weights_are_kept_verbatim() {
        assert_eq!(
            resolve("Inter:wght@675;175;425"),
            vec![v(Normal, "175"), v(Normal, "425"), v(Normal, "675")]
        );
    }

    #[test]
    fn duplicates_collapse() {
        assert_eq!(
            resolve("Roboto:wght@400;400;300..400"),
            vec![v(Normal, "300"), v(Normal, "400")]
        );
    }

    #[test]
    fn legacy_shorthand_tokens() {
        assert_eq!(
            resolve("Roboto:400,700i,b"),
            vec![v(Normal, "400"), v(Normal, "700"), v(Italic, "700")]
        );
        assert_eq!(resolve("Roboto:italic"), vec![v(Italic, "400")]);
        assert_eq!(resolve("Roboto:bolditalic"), vec![v(Italic, "700")]);
        assert_eq!(resolve("Roboto:regular"), vec![v(Normal, "400")]);
        assert_eq!(resolve("Roboto:300italic"), vec![v(Italic, "300")]);
    }

    #[test]
    fn axis_style_wins_over_token_style() {
        assert_eq!(resolve("Roboto:ital,wght@0,700i"), vec![v(Normal, "700")]);
    }

    #[test]
    fn empty_range_falls_back_to_regular() {
        assert_eq!(resolve("Roboto:wght@410..450"), vec![v(Normal, "400")]);
    }

    #[test]
    fn reversed_range_is_swapped() {
        let weights: Vec<u16> = expand_range(900, 700).collect();
        assert_eq!(weights, vec![700, 800, 900]);
    }

    #[test]
    fn normalizes_shorthand_directly() {
        assert_eq!(normalize_weight_token(""), None);
        assert_eq!(
            normalize_weight_token("IB"),
            Some((Some(Italic), "700".to_string()))
        );
        assert_eq!(normalize_weight_token("4x0"), Some((None, "400".to_string())));
        assert_eq!(normalize_weight_token("thin"), Some((None, "400".to_string())));
    }

    #[test]
    fn mixed_tokens_with_b_force_bold() {
        assert_eq!(resolve("Roboto:700b"), vec![v(Normal, "700")]);
        assert_eq!(resolve("Roboto:300bold"), vec![v(Normal, "700")]);
        assert_eq!(resolve("Roboto:100bi"), vec![v(Italic, "700")]);
        assert_eq!(resolve("Roboto:300bolditalic"), vec![v(Italic, "700")]);
    }

    #[test]
    fn trailing_dot_is_not_a_weight() {
        assert!(!is_weight_number("400."));
        assert!(!is_weight_number(".5"));
        assert!(is_weight_number("450.5"));
        assert_eq!(resolve("Roboto:wght@400."), vec![v(Normal, "400")]);
        assert_eq!(resolve("Roboto:700.i"), vec![v(Italic, "400")]);
    }
}
