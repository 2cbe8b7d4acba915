//! Structured CSS repairs.
//!
//! A repair is data: a width scope, a list of `(selector, property, value,
//! scaled)` rules and a per-width scale ramp. It only becomes CSS text at
//! the injection boundary, which keeps repair equality and tests exact
//! instead of string-diffing.

use std::fmt::Write as _;
use std::sync::OnceLock;

use regex::Regex;
use reflow_core::{Error, Range, Result};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Declaration {
    pub property: String,
    pub value: String,
    /// True when the value was rewritten from donor pixels to a `calc()`
    /// viewport expression.
    pub scaled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CssRule {
    pub selector: String,
    pub declarations: Vec<Declaration>,
}

/// One step of the transform ramp: at exactly `width`, scale the repaired
/// subtree by `ratio = width / donor`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScaleStep {
    pub width: i32,
    pub ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Repair {
    pub scope: Range,
    pub donor_width: i32,
    pub rules: Vec<CssRule>,
    pub ramp_selector: String,
    pub ramp: Vec<ScaleStep>,
}

impl Repair {
    pub fn to_css(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "@media (min-width: {}px) and (max-width: {}px) {{",
            self.scope.min, self.scope.max
        );
        for rule in &self.rules {
            let _ = writeln!(out, "  {} {{", rule.selector);
            for decl in &rule.declarations {
                let _ = writeln!(out, "    {}: {};", decl.property, decl.value);
            }
            let _ = writeln!(out, "  }}");
        }
        let _ = writeln!(out, "}}");
        for step in &self.ramp {
            let _ = writeln!(
                out,
                "@media (min-width: {w}px) and (max-width: {w}px) {{ {sel} {{ transform: scale({ratio:.4}); }} }}",
                w = step.width,
                sel = self.ramp_selector,
                ratio = step.ratio,
            );
        }
        out
    }
}

fn px_token() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(-?\d+(?:\.\d+)?)px").unwrap())
}

/// Parse a single `<number>px` value; anything else is the fatal pixel-unit
/// error of the repair pipeline.
pub fn parse_px(property: &str, value: &str) -> Result<f64> {
    static FULL: OnceLock<Regex> = OnceLock::new();
    let full = FULL.get_or_init(|| Regex::new(r"^(-?\d+(?:\.\d+)?)px$").unwrap());
    let captures = full.captures(value.trim()).ok_or_else(|| Error::PixelUnit {
        property: property.to_string(),
        value: value.to_string(),
    })?;
    captures[1].parse::<f64>().map_err(|_| Error::PixelUnit {
        property: property.to_string(),
        value: value.to_string(),
    })
}

/// Rewrite every `<number>px` token of a computed value into the donor-scaled
/// viewport expression `calc((100vw/<denominator>)*<number>)`. Returns `None`
/// for values with no pixel component (kept verbatim).
pub fn scaled_value(value: &str, denominator: i32) -> Option<String> {
    if !px_token().is_match(value) {
        return None;
    }
    let rewritten = px_token().replace_all(value, |caps: &regex::Captures<'_>| {
        format!("calc((100vw/{denominator})*{})", &caps[1])
    });
    Some(rewritten.into_owned())
}

/// Computed length properties resolve to a single `<number>px` in every
/// browser. A px-bearing value here that is anything else means the driver
/// handed back something the scaler cannot trust.
const LENGTH_PROPERTIES: &[&str] = &[
    "width",
    "height",
    "top",
    "right",
    "bottom",
    "left",
    "margin-top",
    "margin-right",
    "margin-bottom",
    "margin-left",
    "padding-top",
    "padding-right",
    "padding-bottom",
    "padding-left",
];

/// Build one rule from a computed-style map, scaling pixel values. Malformed
/// length properties on the donor abort synthesis.
pub fn rule_from_computed_style<'a>(
    selector: String,
    properties: impl Iterator<Item = (&'a str, &'a str)>,
    denominator: i32,
) -> Result<CssRule> {
    let mut declarations = Vec::new();
    for (property, value) in properties {
        if LENGTH_PROPERTIES.contains(&property) && px_token().is_match(value) {
            parse_px(property, value)?;
        }
        match scaled_value(value, denominator) {
            Some(scaled) => declarations.push(Declaration {
                property: property.to_string(),
                value: scaled,
                scaled: true,
            }),
            None => declarations.push(Declaration {
                property: property.to_string(),
                value: value.to_string(),
                scaled: false,
            }),
        }
    }
    Ok(CssRule {
        selector,
        declarations,
    })
}

/// Convert a structural path (`/html/body/div[2]/p[1]`) into a CSS selector
/// (`body > div:nth-of-type(2) > p:nth-of-type(1)`).
pub fn selector_for_path(path: &str) -> String {
    let mut parts: Vec<String> = Vec::new();
    for segment in path.split('/').filter(|s| !s.is_empty()) {
        if segment == "html" && parts.is_empty() {
            continue;
        }
        match segment.split_once('[') {
            Some((name, index)) => {
                let index = index.trim_end_matches(']');
                parts.push(format!("{name}:nth-of-type({index})"));
            }
            None => parts.push(segment.to_string()),
        }
    }
    parts.join(" > ")
}
