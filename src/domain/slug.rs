//! Heading anchor slugs.
//!
//! ASCII slugification comes from the `slug` crate; Chinese text is
//! transliterated through `pinyin` first so a heading like “基线对齐” becomes
//! `ji-xian-dui-qi` instead of disappearing.

use std::collections::HashSet;

use pinyin::{Pinyin, ToPinyin};
use slug::slugify;
use thiserror::Error;

/// Base used when a heading has no representable text.
pub const FALLBACK_ANCHOR: &str = "section";

const MAX_SUFFIX_ATTEMPTS: usize = 32;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SlugError {
    #[error("slug source text is empty")]
    EmptyInput,
    #[error("failed to derive slug from `{input}`")]
    Unrepresentable { input: String },
    #[error("exhausted attempts to find a unique slug for `{base}`")]
    Exhausted { base: String },
}

/// Derive a base slug from the provided human-readable text.
pub fn derive_slug(input: &str) -> Result<String, SlugError> {
    if input.trim().is_empty() {
        return Err(SlugError::EmptyInput);
    }

    let transliterated = transliterate_to_ascii(input);
    let candidate = slugify(&transliterated);

    if candidate.is_empty() {
        return Err(SlugError::Unrepresentable {
            input: input.to_string(),
        });
    }

    Ok(candidate)
}

/// Produce a slug that does not collide according to the supplied predicate.
///
/// `is_unique` returns `true` when the candidate is still free. Collisions
/// are retried with a monotonic counter suffix (`-2`, `-3`, ...).
pub fn generate_unique_slug<F>(input: &str, mut is_unique: F) -> Result<String, SlugError>
where
    F: FnMut(&str) -> bool,
{
    let base = derive_slug(input)?;

    if is_unique(&base) {
        return Ok(base);
    }

    for attempt in 2..=MAX_SUFFIX_ATTEMPTS + 1 {
        let candidate = format!("{base}-{attempt}");
        if is_unique(&candidate) {
            return Ok(candidate);
        }
    }

    Err(SlugError::Exhausted { base })
}

/// Deterministically generate unique anchor slugs within a single document.
///
/// Headings processed in order will receive monotonic suffixes when duplicates
/// occur (e.g. `section`, `section-2`, `section-3`). A suffixed slug never
/// reuses an anchor a literal heading already took, so `A`, `A`, `A 2`
/// yields `a`, `a-2`, `a-2-2`.
#[derive(Default, Debug)]
pub struct AnchorSlugger {
    issued: HashSet<String>,
}

impl AnchorSlugger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slug for the heading text, unique within this slugger. Headings that
    /// cannot produce a slug share the [`FALLBACK_ANCHOR`] base.
    pub fn anchor_for(&mut self, heading: &str) -> String {
        let base = derive_slug(heading).unwrap_or_else(|_| FALLBACK_ANCHOR.to_string());
        let issued = &self.issued;
        let anchor = match generate_unique_slug(&base, |candidate| !issued.contains(candidate)) {
            Ok(anchor) => anchor,
            Err(_) => (MAX_SUFFIX_ATTEMPTS + 2..)
                .map(|attempt| format!("{base}-{attempt}"))
                .find(|candidate| !issued.contains(candidate))
                .unwrap_or_else(|| base.clone()),
        };
        self.issued.insert(anchor.clone());
        anchor
    }
}

fn transliterate_to_ascii(input: &str) -> String {
    let mut output = String::with_capacity(input.len());

    for ch in input.chars() {
        if ch.is_ascii() {
            output.push(ch);
            continue;
        }

        match ch.to_pinyin() {
            Some(py) => append_pinyin(&mut output, py),
            None if ch.is_whitespace() => output.push(' '),
            None => output.push(ch),
        }
    }

    output
}

fn append_pinyin(buffer: &mut String, pinyin: Pinyin) {
    if !buffer.is_empty() && !buffer.ends_with(' ') {
        buffer.push(' ');
    }
    buffer.push_str(pinyin.plain());
}
