use scraper::{ElementRef, Html, Selector};

/// Cypress/jQuery pseudo-class restricting matches to rendered elements.
pub const VISIBLE: &str = ":visible";

/// Cypress/jQuery pseudo-class keeping only the first match.
pub const FIRST: &str = ":first";

/// Structural paths (`/html/body/div[3]`) are XPath, everything else CSS.
pub fn is_structural(selector: &str) -> bool {
    selector.starts_with('/')
}

/// Split the trailing Cypress-only qualifiers off a selector.
///
/// Returns the base selector and whether `:first` was present.
pub fn split_qualifiers(selector: &str) -> (&str, bool) {
    let mut base = selector;
    let mut first = false;

    loop {
        if let Some(rest) = base.strip_suffix(FIRST) {
            base = rest;
            first = true;
        } else if let Some(rest) = base.strip_suffix(VISIBLE) {
            base = rest;
        } else {
            return (base, first);
        }
    }
}

/// Evaluate an emitted selector against a document.
///
/// Visibility is not modelled (a static document has no layout), so
/// `:visible` is ignored. Returns `None` when the base selector cannot be
/// parsed.
pub fn query_all<'a>(document: &'a Html, selector: &str) -> Option<Vec<ElementRef<'a>>> {
    let (base, first) = split_qualifiers(selector);

    let mut matches = if is_structural(base) {
        eval_path(document, base)?
    } else {
        let parsed = Selector::parse(base).ok()?;
        document.select(&parsed).collect()
    };

    if first {
        matches.truncate(1);
    }
    Some(matches)
}

pub fn count_matches(document: &Html, selector: &str) -> Option<usize> {
    query_all(document, selector).map(|m| m.len())
}

/// Evaluate a `/tag/tag[i]/...` path from the document root.
fn eval_path<'a>(document: &'a Html, path: &str) -> Option<Vec<ElementRef<'a>>> {
    let mut steps = path.split('/').filter(|s| !s.is_empty()).map(parse_step);

    let (root_tag, root_index) = steps.next()??;
    let root = document.root_element();
    if root.value().name() != root_tag || root_index.is_some_and(|i| i != 1) {
        return Some(Vec::new());
    }

    let mut current = vec![root];
    for step in steps {
        let (tag, index) = step?;
        let mut next = Vec::new();
        for parent in &current {
            let same_tag: Vec<ElementRef<'a>> = parent
                .children()
                .filter_map(ElementRef::wrap)
                .filter(|c| c.value().name() == tag)
                .collect();
            match index {
                Some(i) => next.extend(same_tag.get(i.wrapping_sub(1)).copied()),
                None => next.extend(same_tag),
            }
        }
        current = next;
    }

    Some(current)
}

fn parse_step(segment: &str) -> Option<(&str, Option<usize>)> {
    match segment.split_once('[') {
        Some((tag, rest)) => {
            let index = rest.strip_suffix(']')?.parse().ok()?;
            Some((tag, Some(index)))
        }
        None => Some((segment, None)),
    }
}
