//! Minimal DOM tree and CSS selector matcher.
//!
//! Supports the selector subset the page objects use: type, `#id`, `.class`,
//! `[attr]`, `[attr="value"]`, `:nth-child(n)`, descendant combinators and
//! comma-separated lists.

// ============================================================================
// Imports
// ============================================================================

use crate::browser::locator::Locator;
use crate::error::{Error, Result};

use super::storefront::Action;

// ============================================================================
// Node
// ============================================================================

/// Path of child indices from the root.
pub(crate) type NodePath = Vec<usize>;

/// An element in the rendered page.
#[derive(Debug, Clone, Default)]
pub(crate) struct Node {
    pub tag: &'static str,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attrs: Vec<(String, String)>,
    pub text: String,
    pub hidden: bool,
    pub on_click: Option<Action>,
    pub children: Vec<Node>,
}

impl Node {
    #[inline]
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn class(mut self, classes: &str) -> Self {
        self.classes
            .extend(classes.split_whitespace().map(str::to_string));
        self
    }

    #[must_use]
    pub fn attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.attrs.push((name.to_string(), value.into()));
        self
    }

    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    #[must_use]
    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    #[must_use]
    pub fn on_click(mut self, action: Action) -> Self {
        self.on_click = Some(action);
        self
    }

    #[must_use]
    pub fn child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    #[must_use]
    pub fn children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(children);
        self
    }

    /// Returns the attribute value, including `id` and `class`.
    pub fn attribute(&self, name: &str) -> Option<String> {
        match name {
            "id" => self.id.clone(),
            "class" if !self.classes.is_empty() => Some(self.classes.join(" ")),
            _ => self
                .attrs
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.clone()),
        }
    }

    /// Concatenated text of this node and its descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        out.push_str(&self.text);
        for child in &self.children {
            child.collect_text(out);
        }
    }

    /// Returns the node at `path`.
    pub fn at(&self, path: &[usize]) -> Option<&Node> {
        path.iter()
            .try_fold(self, |node, &index| node.children.get(index))
    }

    /// Returns `true` if the node at `path` and all its ancestors are shown.
    pub fn is_rendered(&self, path: &[usize]) -> bool {
        let mut node = self;
        if node.hidden {
            return false;
        }
        for &index in path {
            match node.children.get(index) {
                Some(child) if !child.hidden => node = child,
                _ => return false,
            }
        }
        true
    }

    /// Resolves a locator to element paths in document order.
    pub fn resolve(&self, locator: &Locator) -> Result<Vec<NodePath>> {
        let mut scope: Option<Vec<NodePath>> = None;

        for segment in locator.segments() {
            let selector = Selector::parse(&segment.css)?;
            let all = self.query(&selector);

            let mut found: Vec<NodePath> = match &scope {
                None => all,
                Some(roots) => all
                    .into_iter()
                    .filter(|path| {
                        roots
                            .iter()
                            .any(|root| path.len() > root.len() && path.starts_with(root))
                    })
                    .collect(),
            };

            if let Some(needle) = &segment.has_text {
                let needle = normalize(needle);
                found.retain(|path| {
                    self.at(path)
                        .is_some_and(|node| normalize(&node.text_content()).contains(&needle))
                });
            }

            if let Some(nth) = segment.nth {
                found = found.into_iter().nth(nth).into_iter().collect();
            }

            scope = Some(found);
        }

        Ok(scope.unwrap_or_default())
    }

    /// Returns every descendant matching `selector`.
    fn query(&self, selector: &Selector) -> Vec<NodePath> {
        let mut out = Vec::new();
        let mut ancestors = Vec::new();
        let mut path = Vec::new();
        for (index, child) in self.children.iter().enumerate() {
            path.push(index);
            child.walk(index + 1, selector, &mut ancestors, &mut path, &mut out);
            path.pop();
        }
        out
    }

    fn walk<'a>(
        &'a self,
        position: usize,
        selector: &Selector,
        ancestors: &mut Vec<(&'a Node, usize)>,
        path: &mut NodePath,
        out: &mut Vec<NodePath>,
    ) {
        if selector.matches(self, position, ancestors) {
            out.push(path.clone());
        }

        ancestors.push((self, position));
        for (index, child) in self.children.iter().enumerate() {
            path.push(index);
            child.walk(index + 1, selector, ancestors, path, out);
            path.pop();
        }
        ancestors.pop();
    }
}

/// Collapses whitespace and lowercases, for text matching.
pub(crate) fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

// ============================================================================
// Selector
// ============================================================================

/// A single compound selector such as `td:nth-child(2)` or `a.nav-link`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<(String, Option<String>)>,
    nth_child: Option<usize>,
}

impl Compound {
    fn parse(input: &str) -> Result<Self> {
        let invalid = || Error::script(format!("Unsupported selector: {input}"));
        let mut compound = Self::default();
        let mut rest = input;

        let tag_end = rest.find(['#', '.', '[', ':']).unwrap_or(rest.len());
        let tag = &rest[..tag_end];
        if !tag.is_empty() && tag != "*" {
            compound.tag = Some(tag.to_ascii_lowercase());
        }
        rest = &rest[tag_end..];

        while let Some(first) = rest.chars().next() {
            match first {
                '#' | '.' => {
                    let body = &rest[1..];
                    let end = body.find(['#', '.', '[', ':']).unwrap_or(body.len());
                    let name = body[..end].to_string();
                    if name.is_empty() {
                        return Err(invalid());
                    }
                    if first == '#' {
                        compound.id = Some(name);
                    } else {
                        compound.classes.push(name);
                    }
                    rest = &body[end..];
                }
                '[' => {
                    let end = rest.find(']').ok_or_else(invalid)?;
                    let body = &rest[1..end];
                    let attr = match body.split_once('=') {
                        Some((name, value)) => (
                            name.trim().to_string(),
                            Some(value.trim().trim_matches(['"', '\'']).to_string()),
                        ),
                        None => (body.trim().to_string(), None),
                    };
                    compound.attrs.push(attr);
                    rest = &rest[end + 1..];
                }
                ':' => {
                    let body = rest
                        .strip_prefix(":nth-child(")
                        .ok_or_else(invalid)?;
                    let end = body.find(')').ok_or_else(invalid)?;
                    compound.nth_child = Some(body[..end].trim().parse().map_err(|_| invalid())?);
                    rest = &body[end + 1..];
                }
                _ => return Err(invalid()),
            }
        }

        Ok(compound)
    }

    fn matches(&self, node: &Node, position: usize) -> bool {
        self.tag.as_deref().is_none_or(|tag| tag == node.tag)
            && self
                .id
                .as_deref()
                .is_none_or(|id| node.id.as_deref() == Some(id))
            && self
                .classes
                .iter()
                .all(|class| node.classes.iter().any(|c| c == class))
            && self.attrs.iter().all(|(name, expected)| {
                match (node.attribute(name), expected) {
                    (Some(actual), Some(expected)) => &actual == expected,
                    (Some(_), None) => true,
                    (None, _) => false,
                }
            })
            && self.nth_child.is_none_or(|n| n == position)
    }
}

/// A comma-separated list of descendant chains.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Selector {
    alternatives: Vec<Vec<Compound>>,
}

impl Selector {
    fn parse(input: &str) -> Result<Self> {
        let alternatives = split_outside_brackets(input, ',')
            .into_iter()
            .map(|alternative| {
                split_outside_brackets(alternative, ' ')
                    .into_iter()
                    .filter(|part| !part.is_empty())
                    .map(Compound::parse)
                    .collect::<Result<Vec<_>>>()
            })
            .collect::<Result<Vec<_>>>()?;

        if alternatives.iter().any(Vec::is_empty) {
            return Err(Error::script(format!("Empty selector: {input:?}")));
        }

        Ok(Self { alternatives })
    }

    fn matches(&self, node: &Node, position: usize, ancestors: &[(&Node, usize)]) -> bool {
        self.alternatives.iter().any(|chain| {
            let Some((last, parents)) = chain.split_last() else {
                return false;
            };
            if !last.matches(node, position) {
                return false;
            }

            // Descendant combinator: match the remaining compounds nearest-first
            let mut remaining = parents.iter().rev().peekable();
            for (ancestor, ancestor_position) in ancestors.iter().rev() {
                match remaining.peek() {
                    Some(compound) if compound.matches(ancestor, *ancestor_position) => {
                        remaining.next();
                    }
                    Some(_) => {}
                    None => break,
                }
            }
            remaining.peek().is_none()
        })
    }
}

/// Splits on `separator` except inside `[...]` or `(...)`.
fn split_outside_brackets(input: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (index, ch) in input.char_indices() {
        match ch {
            '[' | '(' => depth += 1,
            ']' | ')' => depth = depth.saturating_sub(1),
            c if c == separator && depth == 0 => {
                parts.push(input[start..index].trim());
                start = index + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(input[start..].trim());
    parts
}

// ============================================================================
// Tests
// ============================================================================
