//! Family specifier parsing (fontcss https://github.com/fontcss/fontcss)
//!
//! Decodes one `family` token into a name, a normalized id and the raw axis
//! groups. Two grammars share the same entry point:
//!
//! - css2: `Roboto:ital,wght@0,400;1,100..900`
//! - legacy css: `Roboto:400,700i,bold`
//!
//! Nothing here expands ranges or applies shorthand rules; that is the job of
//! [`crate::variant`].

use serde::Serialize;

use crate::error::{CssError, Result};
use crate::registry::FamilyAliases;
use crate::variant::is_weight_number;

/// How to treat values the grammar does not cover.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParseMode {
    /// Drop unknown axes and malformed values, falling back to defaults.
    #[default]
    Lenient,
    /// Reject the token with [`CssError::InvalidSpecifier`].
    Strict,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisName {
    /// `wght`
    Weight,
    /// `ital`
    Italic,
}

impl AxisName {
    fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "wght" => Some(AxisName::Weight),
            "ital" => Some(AxisName::Italic),
            _ => None,
        }
    }
}

/// A single value as written in the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum AxisValue {
    /// Digits, kept verbatim (`400`, `451`, `1`).
    Number { value: String },
    /// `start..end`, bounds in the order given.
    Range { start: u16, end: u16 },
    /// Anything alphabetic or mixed (`bold`, `700i`, `regular`).
    Token { value: String },
}

/// One value group, with each value already paired with its axis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AxisSpec {
    pub values: Vec<(AxisName, AxisValue)>,
}

impl AxisSpec {
    pub fn value_of(&self, axis: &AxisName) -> Option<&AxisValue> {
        self.values.iter().find(|(a, _)| a == axis).map(|(_, v)| v)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedFamily {
    pub family_name: String,
    pub normalized_id: String,
    pub axes: Vec<AxisSpec>,
}

/// Lower-case the name and replace spaces with hyphens (`Open Sans` → `open-sans`).
pub fn family_id(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "-")
}

/// Parse one family token.
///
/// In lenient mode this only fails when `token` is blank after trimming;
/// everything else degrades to fewer axis groups.
pub fn parse_family(token: &str, mode: ParseMode, aliases: &FamilyAliases) -> Result<ParsedFamily> {
    let trimmed = token.trim();
    let (name, params) = match trimmed.split_once(':') {
        Some((name, params)) => (name.trim(), Some(params.trim())),
        None => (trimmed, None),
    };

    if name.is_empty() {
        return Err(CssError::invalid(token, "family name is empty"));
    }

    let axes = match params {
        None | Some("") => Vec::new(),
        Some(params) if params.contains('@') => parse_axis_groups(token, params, mode)?,
        Some(params) => parse_legacy_list(token, params, mode)?,
    };

    let normalized_id = aliases.resolve(&family_id(name)).to_string();
    log::debug!(
        "parsed {token:?} as {normalized_id} with {} axis group(s)",
        axes.len()
    );

    Ok(ParsedFamily {
        family_name: name.to_string(),
        normalized_id,
        axes,
    })
}

fn parse_axis_groups(token: &str, params: &str, mode: ParseMode) -> Result<Vec<AxisSpec>> {
    let (axis_list, value_list) = params.split_once('@').unwrap_or((params, ""));

    let mut axes = Vec::new();
    for tag in axis_list.split(',').map(str::trim) {
        match AxisName::from_tag(tag) {
            Some(axis) => axes.push(Some(axis)),
            None => {
                reject_or_warn(token, mode, format!("unsupported axis {tag:?}"))?;
                // Keep the slot so later values stay aligned with their axes.
                axes.push(None);
            }
        }
    }

    let mut groups = Vec::new();
    for group in value_list.split(';').map(str::trim).filter(|g| !g.is_empty()) {
        let parts: Vec<&str> = group.split(',').map(str::trim).collect();
        if parts.len() != axes.len() {
            reject_or_warn(
                token,
                mode,
                format!(
                    "value group {group:?} has {} value(s) for {} axis(es)",
                    parts.len(),
                    axes.len()
                ),
            )?;
        }

        let mut spec = AxisSpec::default();
        for (axis, part) in axes.iter().zip(parts) {
            let Some(axis) = axis else { continue };
            if part.is_empty() {
                continue;
            }
            if let Some(value) = parse_axis_value(token, axis, part, mode)? {
                spec.values.push((axis.clone(), value));
            }
        }

        if !spec.values.is_empty() {
            groups.push(spec);
        }
    }

    if groups.is_empty() {
        reject_or_warn(token, mode, "no usable axis values")?;
    }

    Ok(groups)
}

fn parse_legacy_list(token: &str, params: &str, mode: ParseMode) -> Result<Vec<AxisSpec>> {
    let mut groups = Vec::new();
    for part in params.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        if let Some(value) = parse_axis_value(token, &AxisName::Weight, part, mode)? {
            groups.push(AxisSpec {
                values: vec![(AxisName::Weight, value)],
            });
        }
    }
    Ok(groups)
}

fn parse_axis_value(
    token: &str,
    axis: &AxisName,
    raw: &str,
    mode: ParseMode,
) -> Result<Option<AxisValue>> {
    match axis {
        AxisName::Italic => {
            if mode == ParseMode::Strict && raw != "0" && raw != "1" {
                return Err(CssError::invalid(token, format!("ital value must be 0 or 1, got {raw:?}")));
            }
            Ok(Some(AxisValue::Number {
                value: raw.to_string(),
            }))
        }
        AxisName::Weight => {
            if let Some((start, end)) = raw.split_once("..") {
                return match (parse_bound(start), parse_bound(end)) {
                    (Some(start), Some(end)) => Ok(Some(AxisValue::Range { start, end })),
                    _ => {
                        reject_or_warn(token, mode, format!("malformed weight range {raw:?}"))?;
                        Ok(None)
                    }
                };
            }

            if is_weight_number(raw) {
                Ok(Some(AxisValue::Number {
                    value: raw.to_string(),
                }))
            } else {
                Ok(Some(AxisValue::Token {
                    value: raw.to_string(),
                }))
            }
        }
    }
}

fn parse_bound(raw: &str) -> Option<u16> {
    let raw = raw.trim();
    if let Ok(value) = raw.parse::<u16>() {
        return Some(value);
    }
    // Fractional bounds (`100.5..900`) round down to whole weights.
    raw.parse::<f32>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0 && *v <= f32::from(u16::MAX))
        .map(|v| v as u16)
}

fn reject_or_warn(token: &str, mode: ParseMode, reason: impl Into<String>) -> Result<()> {
    let reason = reason.into();
    match mode {
        ParseMode::Strict => Err(CssError::invalid(token, reason)),
        ParseMode::Lenient => {
            log::warn!("ignoring part of family specifier {token:?}: {reason}");
            Ok(())
        }
    }
}
