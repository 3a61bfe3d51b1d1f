//! fontcss-core: the engine behind a drop-in web font CSS API
//!
//! Takes the `family=` specifiers a browser sends to a css2-style endpoint
//! and produces the `@font-face` rules that point at self-hosted WOFF2
//! binaries.
//!
//! ## Pipeline
//!
//! 1. [`specifier`] splits `Roboto:ital,wght@0,400;1,100..900` into a family
//!    name, a normalized id and raw axis groups.
//! 2. [`variant`] expands ranges over the nine standard weights, applies the
//!    `i`/`b` shorthands and yields sorted, unique (style, weight) pairs.
//! 3. [`face`] crosses those pairs with the family's subsets from the
//!    [`registry`] and looks up each unicode-range in the [`subsets`] catalog.
//! 4. [`css`] runs the above for every requested family and assembles the
//!    final payload, or the "not available" notice.
//!
//! Everything here is synchronous and allocation-only; the catalog and
//! registry are loaded once and shared read-only across requests.
//!
//! ```rust
//! use fontcss_core::css::CssEngine;
//! use fontcss_core::face::{GeneratorConfig, RenderOptions};
//! use fontcss_core::registry::{FamilyRecord, FamilyRegistry};
//! use fontcss_core::subsets::SubsetCatalog;
//!
//! let catalog = SubsetCatalog::new().with_range("latin", "U+0000-00FF");
//! let registry = FamilyRegistry::from_records([FamilyRecord {
//!     id: "roboto".into(),
//!     family: Some("Roboto".into()),
//!     subsets: vec!["latin".into()],
//!     variants: Vec::new(),
//! }]);
//! let engine = CssEngine::new(catalog, registry, GeneratorConfig::default());
//!
//! let response = engine.generate_css(
//!     &["Roboto:wght@100..900".to_string()],
//!     &RenderOptions::default(),
//! )?;
//! assert_eq!(response.body.matches("@font-face").count(), 9);
//! # Ok::<(), fontcss_core::error::CssError>(())
//! ```

pub mod css;
pub mod error;
pub mod face;
pub mod output;
pub mod registry;
pub mod specifier;
pub mod subsets;
pub mod variant;
