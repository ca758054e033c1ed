//! Extraction of `<template>` fragments from fetched HTML.
//!
//! The loader concatenates every fetched source into one string and pulls
//! the top-level `<template>` elements out of it. The `id` attribute names
//! the component, the remaining attribute names become the observed
//! attribute list, and any `<script>` bodies are stripped out of the markup
//! into the template's init script source.

/// One component fragment extracted from a template source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    /// Component name, taken from the template's `id` attribute.
    pub name: String,
    /// All attribute names on the template element, in declaration order.
    pub attributes: Vec<String>,
    /// Template body with `<script>` elements removed.
    pub markup: String,
    /// Concatenated text of the removed `<script>` elements.
    pub script: String,
}

/// Extract every `<template id="...">` block from `html`.
///
/// Templates without an `id` attribute are skipped, as are malformed blocks
/// missing a closing tag. Nested templates are not descended into.
pub fn extract_templates(html: &str) -> Vec<Template> {
    let mut templates = Vec::new();
    let mut cursor = 0;

    while let Some(open_rel) = find_ci(&html[cursor..], "<template") {
        let open = cursor + open_rel;
        let Some(tag_end_rel) = html[open..].find('>') else {
            break;
        };
        let tag_end = open + tag_end_rel;
        let attrs = parse_attributes(&html[open + "<template".len()..tag_end]);

        let body_start = tag_end + 1;
        let Some(close_rel) = find_ci(&html[body_start..], "</template>") else {
            break;
        };
        let body = &html[body_start..body_start + close_rel];
        cursor = body_start + close_rel + "</template>".len();

        let Some(name) = attrs
            .iter()
            .find(|(name, _)| name == "id")
            .and_then(|(_, value)| value.clone())
        else {
            tracing::debug!("skipping template without id attribute");
            continue;
        };

        let (markup, script) = strip_scripts(body);
        templates.push(Template {
            name,
            attributes: attrs.into_iter().map(|(name, _)| name).collect(),
            markup,
            script,
        });
    }

    templates
}

/// ASCII case-insensitive substring search.
fn find_ci(haystack: &str, needle: &str) -> Option<usize> {
    let haystack_bytes = haystack.as_bytes();
    let needle_bytes = needle.as_bytes();
    if needle_bytes.is_empty() || haystack_bytes.len() < needle_bytes.len() {
        return None;
    }
    (0..=haystack_bytes.len() - needle_bytes.len()).find(|&i| {
        haystack_bytes[i..i + needle_bytes.len()]
            .iter()
            .zip(needle_bytes)
            .all(|(a, b)| a.eq_ignore_ascii_case(b))
    })
}

/// Parse `name`, `name=value`, `name="value"` pairs from an open tag.
fn parse_attributes(tag: &str) -> Vec<(String, Option<String>)> {
    let mut attrs = Vec::new();
    let mut chars = tag.char_indices().peekable();

    while let Some(&(start, c)) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        // Attribute name runs to whitespace, '=', or end of tag
        let mut name_end = tag.len();
        while let Some(&(i, c)) = chars.peek() {
            if c.is_whitespace() || c == '=' {
                name_end = i;
                break;
            }
            chars.next();
        }
        let name = tag[start..name_end.min(tag.len())].to_string();
        if name.is_empty() {
            break;
        }

        // Skip whitespace before a possible '='
        while matches!(chars.peek(), Some(&(_, c)) if c.is_whitespace()) {
            chars.next();
        }

        let value = if matches!(chars.peek(), Some(&(_, '='))) {
            chars.next();
            while matches!(chars.peek(), Some(&(_, c)) if c.is_whitespace()) {
                chars.next();
            }
            match chars.peek().copied() {
                Some((value_start, quote)) if quote == '"' || quote == '\'' => {
                    chars.next();
                    let mut value_end = tag.len();
                    for (i, c) in chars.by_ref() {
                        if c == quote {
                            value_end = i;
                            break;
                        }
                    }
                    Some(tag[value_start + 1..value_end].to_string())
                }
                Some((value_start, _)) => {
                    let mut value_end = tag.len();
                    while let Some(&(i, c)) = chars.peek() {
                        if c.is_whitespace() {
                            value_end = i;
                            break;
                        }
                        chars.next();
                    }
                    Some(tag[value_start..value_end].to_string())
                }
                None => Some(String::new()),
            }
        } else {
            None
        };

        attrs.push((name, value));
    }

    attrs
}

/// Remove every `<script>...</script>` element from `body`, returning the
/// remaining markup and the concatenated script text.
fn strip_scripts(body: &str) -> (String, String) {
    let mut markup = String::with_capacity(body.len());
    let mut script = String::new();
    let mut rest = body;

    loop {
        let Some(open) = find_ci(rest, "<script") else {
            markup.push_str(rest);
            break;
        };
        let after_open = &rest[open..];
        let Some(tag_end) = after_open.find('>') else {
            markup.push_str(rest);
            break;
        };
        let Some(close) = find_ci(&after_open[tag_end + 1..], "</script>") else {
            markup.push_str(rest);
            break;
        };

        markup.push_str(&rest[..open]);
        script.push_str(&after_open[tag_end + 1..tag_end + 1 + close]);
        rest = &after_open[tag_end + 1 + close + "</script>".len()..];
    }

    (markup, script)
}
