//! CSS font declaration parsing and formatting.
//!
//! Parses declarations like "12px Arial" or "italic bold 14pt 'Times New
//! Roman', serif" into the components cosmic-text needs, and formats them
//! back so serialized objects round-trip.

use crate::error::{ArcTextError, ArcTextResult};
use cosmic_text::{Style, Weight};
use std::fmt;

/// A parsed CSS font declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    /// Font style (normal, italic, oblique).
    pub style: Style,
    /// Font weight (100-900 or keywords like bold).
    pub weight: Weight,
    /// Font size in pixels.
    pub size_px: f32,
    /// Font families in order of preference.
    pub families: Vec<String>,
}

impl Default for FontSpec {
    fn default() -> Self {
        // The Canvas 2D default font.
        Self {
            style: Style::Normal,
            weight: Weight::NORMAL,
            size_px: 10.0,
            families: vec!["sans-serif".to_string()],
        }
    }
}

impl FontSpec {
    /// Parse a CSS font declaration.
    ///
    /// Supports format: `[style] [variant] [weight] size[/line-height] family[, family]*`
    ///
    /// Examples:
    /// - "12px Arial"
    /// - "bold 14px sans-serif"
    /// - "italic bold 12pt 'Times New Roman', serif"
    /// - "700 16px/20px Helvetica"
    pub fn parse(decl: &str) -> ArcTextResult<Self> {
        let decl = decl.trim();
        if decl.is_empty() {
            return Ok(FontSpec::default());
        }

        let mut spec = FontSpec::default();
        let mut remaining = decl;

        // Leading style, variant and weight keywords, in any order.
        loop {
            let trimmed = remaining.trim_start();
            let end = trimmed.find(char::is_whitespace).unwrap_or(trimmed.len());
            let (token, rest) = trimmed.split_at(end);
            match token {
                "italic" => spec.style = Style::Italic,
                "oblique" => spec.style = Style::Oblique,
                // "normal" may be style, variant or weight; consume it either way
                "normal" | "small-caps" => {}
                "bold" => spec.weight = Weight::BOLD,
                "bolder" => spec.weight = Weight::EXTRA_BOLD,
                "lighter" => spec.weight = Weight::LIGHT,
                _ => match numeric_weight(token) {
                    Some(weight) => spec.weight = weight,
                    None => {
                        remaining = trimmed;
                        break;
                    }
                },
            }
            remaining = rest;
        }

        // Required size, then an optional /line-height we only skip over.
        let (size, rest) = parse_size(remaining)?;
        spec.size_px = size;
        remaining = rest.trim_start();
        if let Some(rest) = remaining.strip_prefix('/') {
            remaining = skip_line_height(rest);
        }

        remaining = remaining.trim_start();
        if !remaining.is_empty() {
            spec.families = parse_families(remaining);
        }

        Ok(spec)
    }
}

impl fmt::Display for FontSpec {
    /// Formats the spec as a CSS declaration with the size in px. Parsing the
    /// result yields an equal spec, which is what object records rely on.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.style {
            Style::Normal => {}
            Style::Italic => write!(f, "italic ")?,
            Style::Oblique => write!(f, "oblique ")?,
        }
        if self.weight != Weight::NORMAL {
            write!(f, "{} ", self.weight.0)?;
        }
        write!(f, "{}px", self.size_px)?;
        for (i, family) in self.families.iter().enumerate() {
            let sep = if i == 0 { " " } else { ", " };
            if family.chars().any(|c| c.is_whitespace() || c == ',') {
                write!(f, "{}'{}'", sep, family)?;
            } else {
                write!(f, "{}{}", sep, family)?;
            }
        }
        Ok(())
    }
}

/// Parse a whole token as a numeric weight (100-900, multiples of 100).
fn numeric_weight(token: &str) -> Option<Weight> {
    let value: u16 = token.parse().ok()?;
    if (100..=900).contains(&value) && value % 100 == 0 {
        Some(Weight(value))
    } else {
        None
    }
}

/// Parse the font size with its unit, returning pixels and the rest of the
/// declaration.
fn parse_size(s: &str) -> ArcTextResult<(f32, &str)> {
    let num_end = s
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit() && *c != '.')
        .map(|(i, _)| i)
        .unwrap_or(s.len());

    if num_end == 0 {
        return Err(ArcTextError::FontParseError(format!(
            "expected font size, got: {}",
            s
        )));
    }

    let num_str = &s[..num_end];
    let rest = &s[num_end..];

    let size: f32 = num_str
        .parse()
        .map_err(|_| {
            ArcTextError::FontParseError(format!("invalid font size number: {}", num_str))
        })?;

    let (multiplier, unit_len) = if rest.starts_with("px") {
        (1.0, 2)
    } else if rest.starts_with("pt") {
        (4.0 / 3.0, 2) // 1pt = 4/3 px
    } else if rest.starts_with("em") {
        (16.0, 2) // Assume 1em = 16px
    } else if rest.starts_with("rem") {
        (16.0, 3)
    } else if rest.starts_with('%') {
        (16.0 / 100.0, 1) // Percentage of default 16px
    } else {
        // Assume pixels if no unit
        (1.0, 0)
    };

    Ok((size * multiplier, &rest[unit_len..]))
}

/// Skip a line-height specification after '/'.
fn skip_line_height(s: &str) -> &str {
    let end = s
        .char_indices()
        .find(|(_, c)| c.is_whitespace())
        .map(|(i, _)| i)
        .unwrap_or(s.len());
    &s[end..]
}

/// Parse a comma-separated font family list.
fn parse_families(s: &str) -> Vec<String> {
    let mut families = Vec::new();
    let mut remaining = s.trim();

    while !remaining.is_empty() {
        let (family, rest) = split_family(remaining);
        if !family.is_empty() {
            families.push(family);
        }
        remaining = match rest.trim_start().strip_prefix(',') {
            Some(rest) => rest.trim_start(),
            None => break,
        };
    }

    if families.is_empty() {
        families.push("sans-serif".to_string());
    }

    families
}

/// Split off one family name, quoted or bare.
fn split_family(s: &str) -> (String, &str) {
    let s = s.trim_start();

    if let Some(quote) = s.chars().next().filter(|c| *c == '"' || *c == '\'') {
        let body = &s[1..];
        return match body.find(quote) {
            Some(end) => (body[..end].to_string(), &body[end + 1..]),
            None => (body.to_string(), ""),
        };
    }

    let end = s.find(',').unwrap_or(s.len());
    (s[..end].trim().to_string(), &s[end..])
}
