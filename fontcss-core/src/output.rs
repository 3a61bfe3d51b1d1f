//! Output helpers for the CLI (fontcss https://github.com/fontcss/fontcss)

use std::io::Write;

use anyhow::Result;

use crate::css::CssResponse;
use crate::face::FontFaceRule;

/// Write the assembled payload exactly as the server would send it.
pub fn write_css(response: &CssResponse, mut w: impl Write) -> Result<()> {
    w.write_all(response.body.as_bytes())?;
    if !response.body.ends_with('\n') {
        w.write_all(b"\n")?;
    }
    Ok(())
}

/// Write rules as prettified JSON array.
pub fn write_rules_json_pretty(rules: &[FontFaceRule], mut w: impl Write) -> Result<()> {
    let json = serde_json::to_string_pretty(rules)?;
    w.write_all(json.as_bytes())?;
    w.write_all(b"\n")?;
    Ok(())
}

/// Write rules as newline-delimited JSON (NDJSON).
pub fn write_rules_ndjson(rules: &[FontFaceRule], mut w: impl Write) -> Result<()> {
    for rule in rules {
        let line = serde_json::to_string(rule)?;
        w.write_all(line.as_bytes())?;
        w.write_all(b"\n")?;
    }
    Ok(())
}
