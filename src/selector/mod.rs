//! Structural path queries over a parsed HTML tree.
//!
//! Evaluation is a pure function of (context, expression): it preserves
//! document order, removes duplicates and never fails. An empty context, or a
//! step that matches nothing, simply yields an empty sequence.

pub mod path;

use std::collections::HashSet;

use scraper::{ElementRef, Html};

pub use path::{Extract, PathExpression, Predicate, Relation, Step, Subject};

/// An immutable parsed HTML document.
pub struct Document {
    html: Html,
}

impl Document {
    pub fn parse(html: &str) -> Self {
        Document {
            html: Html::parse_document(html),
        }
    }

    pub fn root(&self) -> ElementRef<'_> {
        self.html.root_element()
    }

    /// Evaluate `path` with the root element as context.
    pub fn select(&self, path: &PathExpression) -> Vec<Value<'_>> {
        evaluate(&[self.root()], path)
    }
}

impl From<Html> for Document {
    fn from(html: Html) -> Self {
        Document { html }
    }
}

/// One item produced by a path, depending on its terminal instruction.
#[derive(Debug, Clone)]
pub enum Value<'a> {
    Node(ElementRef<'a>),
    Attribute(String),
    Text(String),
}

impl<'a> Value<'a> {
    pub fn as_node(&self) -> Option<ElementRef<'a>> {
        match self {
            Value::Node(el) => Some(*el),
            _ => None,
        }
    }

    /// Raw string form. Elements yield their string value (all descendant text).
    pub fn into_string(self) -> String {
        match self {
            Value::Node(el) => el.text().collect(),
            Value::Attribute(s) | Value::Text(s) => s,
        }
    }
}

/// Keep only the element values.
pub fn nodes<'a>(values: Vec<Value<'a>>) -> Vec<ElementRef<'a>> {
    values.iter().filter_map(Value::as_node).collect()
}

/// Raw strings in document order.
pub fn strings(values: Vec<Value<'_>>) -> Vec<String> {
    values.into_iter().map(Value::into_string).collect()
}

/// Evaluate `path` against every node of `context`.
///
/// Relative expressions start from the context nodes. Absolute expressions
/// start from the document node of the tree the context belongs to.
pub fn evaluate<'a>(context: &[ElementRef<'a>], path: &PathExpression) -> Vec<Value<'a>> {
    let Some(&anchor) = context.first() else {
        return Vec::new();
    };

    let mut steps = path.steps().iter();
    let mut current = if path.is_absolute() {
        let top = document_elements(anchor);
        match steps.next() {
            Some(step) => {
                // The document node is the implicit parent of the top elements.
                let mut groups = vec![top.clone()];
                if step.relation == Relation::Descendant {
                    groups.extend(child_groups(&top, Relation::Descendant));
                }
                apply_step(groups, step)
            }
            None => {
                return match path.extract() {
                    Extract::Text(Relation::Descendant) => extract(&top, path.extract()),
                    _ => Vec::new(),
                };
            }
        }
    } else {
        in_document_order(context.to_vec())
    };

    for step in steps {
        if current.is_empty() {
            break;
        }
        current = apply_step(child_groups(&current, step.relation), step);
    }

    extract(&current, path.extract())
}

fn document_elements<'a>(anchor: ElementRef<'a>) -> Vec<ElementRef<'a>> {
    match anchor.ancestors().last() {
        Some(top) => top.children().filter_map(ElementRef::wrap).collect(),
        None => vec![anchor],
    }
}

fn child_elements<'a>(el: ElementRef<'a>) -> Vec<ElementRef<'a>> {
    el.children().filter_map(ElementRef::wrap).collect()
}

/// Candidate groups for the next step, one group per parent. Positional
/// predicates count within a group.
fn child_groups<'a>(parents: &[ElementRef<'a>], relation: Relation) -> Vec<Vec<ElementRef<'a>>> {
    let mut seen = HashSet::new();
    let mut groups = Vec::new();

    for parent in parents {
        let scopes: Vec<ElementRef<'a>> = match relation {
            Relation::Child => vec![*parent],
            Relation::Descendant => parent.descendants().filter_map(ElementRef::wrap).collect(),
        };
        for scope in scopes {
            if seen.insert(scope.id()) {
                groups.push(child_elements(scope));
            }
        }
    }

    groups
}

fn apply_step<'a>(groups: Vec<Vec<ElementRef<'a>>>, step: &Step) -> Vec<ElementRef<'a>> {
    let mut selected = Vec::new();

    for group in groups {
        let mut candidates: Vec<ElementRef<'a>> = group
            .into_iter()
            .filter(|el| tag_matches(el, step))
            .collect();
        for predicate in &step.predicates {
            candidates = candidates
                .into_iter()
                .enumerate()
                .filter(|(i, el)| holds(predicate, *el, i + 1))
                .map(|(_, el)| el)
                .collect();
        }
        selected.extend(candidates);
    }

    in_document_order(selected)
}

fn in_document_order<'a>(nodes: Vec<ElementRef<'a>>) -> Vec<ElementRef<'a>> {
    if nodes.len() < 2 {
        return nodes;
    }
    let wanted: HashSet<_> = nodes.iter().map(|n| n.id()).collect();
    let top = nodes[0].ancestors().last().unwrap_or(*nodes[0]);
    top.descendants()
        .filter(|n| wanted.contains(&n.id()))
        .filter_map(ElementRef::wrap)
        .collect()
}

fn tag_matches(el: &ElementRef<'_>, step: &Step) -> bool {
    step.tag
        .as_deref()
        .map_or(true, |tag| el.value().name() == tag)
}

fn holds(predicate: &Predicate, el: ElementRef<'_>, position: usize) -> bool {
    match predicate {
        Predicate::Position(n) => position == *n,
        Predicate::HasChild(tag) => el
            .children()
            .filter_map(ElementRef::wrap)
            .any(|c| c.value().name() == tag.as_str()),
        Predicate::HasAttribute(name) => el.value().attr(name).is_some(),
        Predicate::AttributeEquals { name, value } => el.value().attr(name) == Some(value.as_str()),
        Predicate::Contains { subject, needle } => {
            string_value(subject, el).contains(needle.as_str())
        }
    }
}

fn string_value(subject: &Subject, el: ElementRef<'_>) -> String {
    match subject {
        Subject::Attribute(name) => el.value().attr(name).unwrap_or_default().to_string(),
        Subject::Context => el.text().collect(),
        Subject::OwnText => el
            .children()
            .find_map(|c| c.value().as_text().map(|t| String::from(&**t)))
            .unwrap_or_default(),
        // A node-set converts to the string value of its first node.
        Subject::FirstChild => el
            .children()
            .find_map(ElementRef::wrap)
            .map(|c| c.text().collect())
            .unwrap_or_default(),
    }
}

fn extract<'a>(nodes: &[ElementRef<'a>], extract: &Extract) -> Vec<Value<'a>> {
    match extract {
        Extract::Element => nodes.iter().copied().map(Value::Node).collect(),
        Extract::Attribute(name) => nodes
            .iter()
            .filter_map(|el| el.value().attr(name))
            .map(|v| Value::Attribute(v.to_string()))
            .collect(),
        Extract::Text(relation) => {
            let mut seen = HashSet::new();
            let mut out = Vec::new();
            for el in nodes {
                let candidates: Vec<_> = match relation {
                    Relation::Child => el.children().collect(),
                    Relation::Descendant => el.descendants().collect(),
                };
                for node in candidates {
                    if let Some(text) = node.value().as_text() {
                        if seen.insert(node.id()) {
                            out.push(Value::Text(String::from(&**text)));
                        }
                    }
                }
            }
            out
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html><body>
<div id="outer" class="box">
  <h2>Title <em>here</em></h2>
  <ul>
    <li><a href="/a">A1</a><a href="/b">A2</a></li>
    <li><a href="/c">C1</a></li>
  </ul>
  <div id="inner" class="box inner"><p>One</p><p>Two</p></div>
</div>
</body></html>"#;

    fn path(src: &str) -> PathExpression {
        PathExpression::parse(src).unwrap()
    }

    fn select_strings(doc: &Document, src: &str) -> Vec<String> {
        strings(doc.select(&path(src)))
    }

    fn by_id<'a>(doc: &'a Document, id: &str) -> ElementRef<'a> {
        let found = nodes(doc.select(&path(&format!("//*[@id='{id}']"))));
        assert_eq!(found.len(), 1, "expected one element with id {id}");
        found[0]
    }

    #[test]
    fn descendant_text_in_document_order() {
        let doc = Document::parse(PAGE);
        assert_eq!(select_strings(&doc, "//a/text()"), vec!["A1", "A2", "C1"]);
    }

    #[test]
    fn position_counts_per_parent() {
        let doc = Document::parse(PAGE);
        assert_eq!(select_strings(&doc, "//a[1]/text()"), vec!["A1", "C1"]);
        assert_eq!(select_strings(&doc, "//a[2]/text()"), vec!["A2"]);
    }

    #[test]
    fn attribute_extraction() {
        let doc = Document::parse(PAGE);
        assert_eq!(select_strings(&doc, "//li/a/@href"), vec!["/a", "/b", "/c"]);
        assert_eq!(select_strings(&doc, "/html/body/div/@id"), vec!["outer"]);
    }

    #[test]
    fn first_child_string_value_and_has_child() {
        let doc = Document::parse(PAGE);
        assert_eq!(
            select_strings(&doc, "//div[h2][contains(./*, 'Title here')]/@id"),
            vec!["outer"]
        );
        assert!(select_strings(&doc, "//div[h3]/@id").is_empty());
        assert!(select_strings(&doc, "//div[contains(*, 'A1')]/@id").is_empty());
    }

    #[test]
    fn class_contains_matches_in_document_order() {
        let doc = Document::parse(PAGE);
        assert_eq!(
            select_strings(&doc, "//div[contains(@class, 'box')]/@id"),
            vec!["outer", "inner"]
        );
    }

    #[test]
    fn other_predicates() {
        let doc = Document::parse(PAGE);
        assert_eq!(select_strings(&doc, "//a[@href='/c']/text()"), vec!["C1"]);
        assert_eq!(select_strings(&doc, "//li[contains(., 'A2')]/a/text()"), vec!["A1", "A2"]);
        assert_eq!(select_strings(&doc, "//h2[contains(text(), 'Title')]//text()"), vec!["Title ", "here"]);
        assert_eq!(select_strings(&doc, "//*[@href]/@href").len(), 3);
    }

    #[test]
    fn relative_paths_are_scoped_to_context() {
        let doc = Document::parse(PAGE);
        let outer = by_id(&doc, "outer");
        let texts = strings(evaluate(&[outer], &path("./div/p/text()")));
        assert_eq!(texts, vec!["One", "Two"]);
        assert!(evaluate(&[outer], &path("./p")).is_empty());
        assert_eq!(evaluate(&[outer], &path(".//p")).len(), 2);
    }

    #[test]
    fn nested_contexts_do_not_duplicate() {
        let doc = Document::parse(PAGE);
        let outer = by_id(&doc, "outer");
        let inner = by_id(&doc, "inner");
        let found = strings(evaluate(&[inner, outer], &path(".//p/text()")));
        assert_eq!(found, vec!["One", "Two"]);
    }

    #[test]
    fn absolute_paths_ignore_context_position() {
        let doc = Document::parse(PAGE);
        let inner = by_id(&doc, "inner");
        assert_eq!(evaluate(&[inner], &path("//li")).len(), 2);
    }

    #[test]
    fn empty_context_yields_empty() {
        assert!(evaluate(&[], &path("//a")).is_empty());
        assert!(evaluate(&[], &path("./div/text()")).is_empty());
    }

    #[test]
    fn missing_section_yields_empty() {
        let doc = Document::parse("<html><body><p>nothing here</p></body></html>");
        let region = nodes(doc.select(&path("//div[contains(@class, 'box')]")));
        assert!(region.is_empty());
        assert!(evaluate(&region, &path("./div/h4/text()")).is_empty());
    }

    #[test]
    fn element_values_stringify_to_text() {
        let doc = Document::parse(PAGE);
        assert_eq!(select_strings(&doc, "//h2"), vec!["Title here"]);
    }

    #[test]
    fn evaluation_is_deterministic() {
        let doc = Document::parse(PAGE);
        let first = select_strings(&doc, "//div//a[1]/@href");
        let second = select_strings(&doc, "//div//a[1]/@href");
        assert_eq!(first, second);
        assert_eq!(first, vec!["/a", "/c"]);
    }
}
