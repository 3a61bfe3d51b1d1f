//! `@font-face` generation (fontcss https://github.com/fontcss/fontcss)

use std::fmt;
use std::str::FromStr;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Serialize;

use crate::error::{CssError, Result};
use crate::registry::{CapabilitySource, FamilyRegistry};
use crate::specifier::{ParseMode, ParsedFamily};
use crate::subsets::{SubsetCatalog, SubsetEntry};
use crate::variant::{FontStyle, ResolvedVariant};

/// encodeURIComponent, minus `'()` which would end an unquoted `url(...)`.
const URL_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*');

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FontDisplay {
    Auto,
    Block,
    Swap,
    Fallback,
    Optional,
}

impl FontDisplay {
    pub fn as_str(self) -> &'static str {
        match self {
            FontDisplay::Auto => "auto",
            FontDisplay::Block => "block",
            FontDisplay::Swap => "swap",
            FontDisplay::Fallback => "fallback",
            FontDisplay::Optional => "optional",
        }
    }
}

impl fmt::Display for FontDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FontDisplay {
    type Err = CssError;

    fn from_str(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(FontDisplay::Auto),
            "block" => Ok(FontDisplay::Block),
            "swap" => Ok(FontDisplay::Swap),
            "fallback" => Ok(FontDisplay::Fallback),
            "optional" => Ok(FontDisplay::Optional),
            _ => Err(CssError::invalid(
                raw,
                "font-display must be one of auto, block, swap, fallback, optional",
            )),
        }
    }
}

/// Where each face's binary lives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UrlLayout {
    /// One file per style and weight: `{weight}.woff2`.
    #[default]
    SharedBinary,
    /// One file per subset as well: `{weight}-{subset}.woff2`.
    PerSubset,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Host serving the binaries, without scheme.
    pub domain: String,
    pub url_layout: UrlLayout,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            domain: "localhost".to_string(),
            url_layout: UrlLayout::default(),
        }
    }
}

/// Per-request rendering knobs (`display=` and `text=`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderOptions {
    pub display: Option<FontDisplay>,
    pub text: Option<String>,
}

impl RenderOptions {
    /// Build options from already URL-decoded query values.
    ///
    /// Unknown `display` values are dropped in lenient mode and rejected in
    /// strict mode. Empty values count as absent.
    pub fn from_query(display: Option<&str>, text: Option<&str>, mode: ParseMode) -> Result<Self> {
        let display = match display.map(str::trim).filter(|d| !d.is_empty()) {
            None => None,
            Some(raw) => match raw.parse::<FontDisplay>() {
                Ok(display) => Some(display),
                Err(err) if mode == ParseMode::Strict => return Err(err),
                Err(_) => {
                    log::warn!("dropping unsupported display value {raw:?}");
                    None
                }
            },
        };

        let text = text.filter(|t| !t.is_empty()).map(str::to_string);
        Ok(Self { display, text })
    }
}

/// One rendered `@font-face` block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FontFaceRule {
    /// Subset name, written as the leading comment.
    pub comment: String,
    pub family: String,
    pub style: FontStyle,
    pub weight: String,
    pub display: Option<FontDisplay>,
    pub src_url: String,
    pub unicode_range: String,
}

impl FontFaceRule {
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for FontFaceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "/* {} */", self.comment.replace("*/", "* /"))?;
        writeln!(f, "@font-face {{")?;
        writeln!(f, "  font-family: '{}';", escape_family(&self.family))?;
        writeln!(f, "  font-style: {};", self.style)?;
        writeln!(f, "  font-weight: {};", self.weight)?;
        if let Some(display) = self.display {
            writeln!(f, "  font-display: {display};")?;
        }
        writeln!(f, "  src: url({}) format('woff2');", self.src_url)?;
        writeln!(f, "  unicode-range: {};", self.unicode_range)?;
        write!(f, "}}")
    }
}

fn escape_family(name: &str) -> String {
    name.replace('\\', "\\\\").replace('\'', "\\'")
}

/// Percent-encode a text hint for use in a query string.
pub fn encode_text(text: &str) -> String {
    utf8_percent_encode(text, URL_COMPONENT).to_string()
}

/// Turns resolved variants into rules using the shared catalog and registry.
#[derive(Debug, Clone, Copy)]
pub struct FaceGenerator<'a> {
    catalog: &'a SubsetCatalog,
    registry: &'a FamilyRegistry,
    config: &'a GeneratorConfig,
}

impl<'a> FaceGenerator<'a> {
    pub fn new(
        catalog: &'a SubsetCatalog,
        registry: &'a FamilyRegistry,
        config: &'a GeneratorConfig,
    ) -> Self {
        Self {
            catalog,
            registry,
            config,
        }
    }

    /// One rule per variant × subset, variants outermost, subsets in registry order.
    ///
    /// Fails with [`CssError::UnknownFamily`] when the registry has no
    /// capabilities for the family.
    pub fn generate(
        &self,
        family: &ParsedFamily,
        variants: &[ResolvedVariant],
        opts: &RenderOptions,
    ) -> Result<Vec<FontFaceRule>> {
        let caps = self
            .registry
            .capabilities(&family.normalized_id)
            .ok_or_else(|| CssError::UnknownFamily {
                id: family.normalized_id.clone(),
            })?;

        if caps.source == CapabilitySource::Fallback {
            log::debug!("{} is not in the registry, using fallback subsets", caps.id);
        }

        let subsets = self.catalog.entries_for(caps.subsets);
        let mut rules = Vec::with_capacity(variants.len() * subsets.len());
        for variant in variants {
            for subset in &subsets {
                rules.push(self.rule(family, variant, subset, opts));
            }
        }
        Ok(rules)
    }

    fn rule(
        &self,
        family: &ParsedFamily,
        variant: &ResolvedVariant,
        subset: &SubsetEntry,
        opts: &RenderOptions,
    ) -> FontFaceRule {
        FontFaceRule {
            comment: subset.name.clone(),
            family: family.family_name.clone(),
            style: variant.style,
            weight: variant.weight.clone(),
            display: opts.display,
            src_url: self.src_url(&family.normalized_id, variant, &subset.name, opts.text.as_deref()),
            unicode_range: subset.unicode_range.clone(),
        }
    }

    pub fn src_url(
        &self,
        family_id: &str,
        variant: &ResolvedVariant,
        subset: &str,
        text: Option<&str>,
    ) -> String {
        let file = match self.config.url_layout {
            UrlLayout::SharedBinary => format!("{}.woff2", variant.weight),
            UrlLayout::PerSubset => format!("{}-{subset}.woff2", variant.weight),
        };
        let mut url = format!(
            "https://{}/{family_id}/{}/{file}",
            self.config.domain, variant.style
        );
        if let Some(text) = text {
            url.push_str("?text=");
            url.push_str(&encode_text(text));
        }
        url
    }
}
