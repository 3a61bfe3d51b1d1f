use std::fs;

use tempfile::tempdir;

use fontcss_core::css::CssEngine;
use fontcss_core::face::{GeneratorConfig, RenderOptions};
use fontcss_core::registry::FamilyRegistry;
use fontcss_core::subsets::SubsetCatalog;

#[test]
fn loads_catalog_and_registry_from_disk() {
    let tmp = tempdir().expect("tempdir");
    let subsets_path = tmp.path().join("subsets.json");
    let registry_path = tmp.path().join("fonts.json");

    fs::write(
        &subsets_path,
        r#"{"latin": "U+0000-00FF", "greek": "U+0370-03FF"}"#,
    )
    .expect("write subsets");
    fs::write(
        &registry_path,
        r#"[
            {"id": "open-sans", "family": "Open Sans", "subsets": ["greek", "latin"],
             "variants": ["regular", "italic", "700"], "category": "sans-serif"},
            {"id": "lato", "family": "Lato", "subsets": ["latin"]}
        ]"#,
    )
    .expect("write registry");

    let catalog = SubsetCatalog::load(&subsets_path).expect("catalog");
    let registry = FamilyRegistry::load(&registry_path).expect("registry");
    assert_eq!(catalog.len(), 2);
    assert_eq!(registry.len(), 2);
    assert_eq!(
        registry.get("open-sans").map(|r| r.variants.len()),
        Some(3)
    );

    let engine = CssEngine::new(catalog, registry, GeneratorConfig::default());
    let response = engine
        .generate_css(&["Open Sans:wght@400".to_string()], &RenderOptions::default())
        .expect("css");
    assert!(response.body.contains("unicode-range: U+0370-03FF;"));
    assert!(response.body.contains("font-family: 'Open Sans';"));
}

#[test]
fn load_errors_name_the_file() {
    let tmp = tempdir().expect("tempdir");
    let bad = tmp.path().join("broken.json");
    fs::write(&bad, "{not json").expect("write");

    let err = FamilyRegistry::load(&bad).unwrap_err();
    assert!(format!("{err:#}").contains("broken.json"), "{err:#}");

    let missing = tmp.path().join("missing.json");
    let err = SubsetCatalog::load(&missing).unwrap_err();
    assert!(format!("{err:#}").contains("missing.json"), "{err:#}");
}
