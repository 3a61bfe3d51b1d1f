//! Response assembly: family tokens in, one CSS payload out (fontcss https://github.com/fontcss/fontcss)

use crate::error::{CssError, Result};
use crate::face::{FaceGenerator, FontFaceRule, GeneratorConfig, RenderOptions};
use crate::registry::FamilyRegistry;
use crate::specifier::{parse_family, ParseMode, ParsedFamily};
use crate::subsets::SubsetCatalog;
use crate::variant::{resolve_variants, ResolvedVariant};

/// Body served, with status 200, when a requested family is not in the registry.
pub const NOT_AVAILABLE_NOTICE: &str = "This font is not available. <br>If you think this is a bug, <a href=\"https://github.com/fontcss/fontcss/issues\">let us know</a>.";

/// Body served with [`CssError::EmptyResolution`].
pub const EMPTY_RESOLUTION_MESSAGE: &str = "Wrong request. Please <a href=\"https://github.com/fontcss/fontcss/issues\">contact us</a> if you think this is a bug.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    Css,
    Html,
}

impl ContentType {
    pub fn mime(self) -> &'static str {
        match self {
            ContentType::Css => "text/css; charset=utf-8",
            ContentType::Html => "text/html; charset=utf-8",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CssResponse {
    pub content_type: ContentType,
    pub body: String,
}

impl CssResponse {
    pub fn css(body: String) -> Self {
        Self {
            content_type: ContentType::Css,
            body,
        }
    }

    pub fn not_available() -> Self {
        Self {
            content_type: ContentType::Html,
            body: NOT_AVAILABLE_NOTICE.to_string(),
        }
    }

    pub fn is_css(&self) -> bool {
        self.content_type == ContentType::Css
    }
}

/// Accept both `family=A&family=B` and `family=A|B`.
pub fn split_family_tokens<S: AsRef<str>>(values: &[S]) -> Vec<String> {
    values
        .iter()
        .flat_map(|v| v.as_ref().split('|'))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Process-wide, read-only state behind every request.
#[derive(Debug, Clone, Default)]
pub struct CssEngine {
    catalog: SubsetCatalog,
    registry: FamilyRegistry,
    config: GeneratorConfig,
    mode: ParseMode,
}

impl CssEngine {
    pub fn new(catalog: SubsetCatalog, registry: FamilyRegistry, config: GeneratorConfig) -> Self {
        Self {
            catalog,
            registry,
            config,
            mode: ParseMode::default(),
        }
    }

    pub fn with_mode(mut self, mode: ParseMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> ParseMode {
        self.mode
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn registry(&self) -> &FamilyRegistry {
        &self.registry
    }

    pub fn catalog(&self) -> &SubsetCatalog {
        &self.catalog
    }

    /// Parse and resolve a single token without touching the registry.
    pub fn resolve(&self, token: &str) -> Result<(ParsedFamily, Vec<ResolvedVariant>)> {
        let parsed = parse_family(token, self.mode, self.registry.aliases())?;
        let variants = resolve_variants(&parsed);
        Ok((parsed, variants))
    }

    /// Every rule for the request, in input order.
    ///
    /// Unlike [`CssEngine::generate_css`] this reports unknown families as
    /// [`CssError::UnknownFamily`].
    pub fn rules(&self, tokens: &[String], opts: &RenderOptions) -> Result<Vec<FontFaceRule>> {
        let tokens = split_family_tokens(tokens);
        if tokens.is_empty() {
            return Err(CssError::MissingFamilyParameter);
        }

        let generator = FaceGenerator::new(&self.catalog, &self.registry, &self.config);
        let mut rules = Vec::new();
        for token in &tokens {
            let (parsed, variants) = match self.resolve(token) {
                Ok(resolved) => resolved,
                Err(err) if self.mode == ParseMode::Lenient => {
                    log::warn!("skipping family token: {err}");
                    continue;
                }
                Err(err) => return Err(err),
            };
            rules.extend(generator.generate(&parsed, &variants, opts)?);
        }

        if rules.is_empty() {
            return Err(CssError::EmptyResolution);
        }
        Ok(rules)
    }

    /// The single entry point behind `/css2` and `/css`.
    ///
    /// An unknown family replaces the whole response with
    /// [`NOT_AVAILABLE_NOTICE`]; the other families are not rendered.
    pub fn generate_css(&self, tokens: &[String], opts: &RenderOptions) -> Result<CssResponse> {
        let rules = match self.rules(tokens, opts) {
            Ok(rules) => rules,
            Err(CssError::UnknownFamily { id }) => {
                log::info!("requested family is not available: {id}");
                return Ok(CssResponse::not_available());
            }
            Err(err) => return Err(err),
        };

        let mut body = String::new();
        if let Some(text) = &opts.text {
            body.push_str(&format!(
                "/* Optimized for text: {} */\n",
                text.replace("*/", "* /")
            ));
        }

        let blocks: Vec<String> = rules.iter().map(FontFaceRule::render).collect();
        body.push_str(&blocks.join("\n"));
        body.push('\n');

        Ok(CssResponse::css(body))
    }
}

/// Stylesheet served by `/icon`.
pub fn icon_css(domain: &str) -> String {
    format!(
        "/* fallback */
@font-face {{
  font-family: 'Material Icons';
  font-style: normal;
  font-weight: 400;
  src: url(https://{domain}/icons/material-icons/v125.woff2) format('woff2');
}}

.material-icons {{
  font-family: 'Material Icons';
  font-weight: normal;
  font-style: normal;
  font-size: 24px;
  line-height: 1;
  letter-spacing: normal;
  text-transform: none;
  display: inline-block;
  white-space: nowrap;
  word-wrap: normal;
  direction: ltr;
  -webkit-font-feature-settings: 'liga';
  -webkit-font-smoothing: antialiased;
}}
"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_pipes_and_drops_blanks() {
        let raw = vec!["Roboto|Lato".to_string(), " ".to_string(), "Open Sans".to_string()];
        assert_eq!(split_family_tokens(&raw), vec!["Roboto", "Lato", "Open Sans"]);
    }

    #[test]
    fn icon_css_points_at_domain() {
        let css = icon_css("cdn.example.com");
        assert!(css.contains("url(https://cdn.example.com/icons/material-icons/v125.woff2)"));
        assert!(css.contains(".material-icons {"));
    }

    #[test]
    fn content_types_carry_charset() {
        assert_eq!(ContentType::Css.mime(), "text/css; charset=utf-8");
        assert!(CssResponse::not_available().content_type == ContentType::Html);
    }
}
