use std::fmt;
use std::str::FromStr;

use crate::error::{PathErrorKind, PathExpressionError};

/// How a step reaches its candidates from the current context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    /// `/`: direct children only.
    Child,
    /// `//`: anything below the context.
    Descendant,
}

/// Left-hand side of `contains(SUBJECT, 'needle')`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Subject {
    /// `@name`
    Attribute(String),
    /// `.`: string value of the candidate itself.
    Context,
    /// `text()`: first text child of the candidate.
    OwnText,
    /// `*` or `./*`: string value of the first child element.
    FirstChild,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// `[N]`, 1-based among candidates sharing a parent.
    Position(usize),
    /// `[tag]`
    HasChild(String),
    /// `[@name]`
    HasAttribute(String),
    /// `[@name='value']`
    AttributeEquals { name: String, value: String },
    /// `[contains(subject, 'needle')]`
    Contains { subject: Subject, needle: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub relation: Relation,
    /// `None` for `*`.
    pub tag: Option<String>,
    pub predicates: Vec<Predicate>,
}

/// What the expression yields once all element steps have run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extract {
    Element,
    Text(Relation),
    Attribute(String),
}

/// A compiled structural path, an XPath 1.0 subset. Parse once, evaluate
/// against any number of documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathExpression {
    source: String,
    absolute: bool,
    steps: Vec<Step>,
    extract: Extract,
}

impl PathExpression {
    pub fn parse(source: &str) -> Result<Self, PathExpressionError> {
        Cursor::new(source.trim()).expression()
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_absolute(&self) -> bool {
        self.absolute
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn extract(&self) -> &Extract {
        &self.extract
    }
}

impl FromStr for PathExpression {
    type Err = PathExpressionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for PathExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

struct Cursor<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(src: &'a str) -> Self {
        Cursor { src, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        let src: &'a str = self.src;
        &src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn eat(&mut self, token: &str) -> bool {
        if self.rest().starts_with(token) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    fn skip_ws(&mut self) {
        let trimmed = self.rest().trim_start();
        self.pos = self.src.len() - trimmed.len();
    }

    fn fail(&self, kind: PathErrorKind) -> PathExpressionError {
        PathExpressionError {
            expression: self.src.to_string(),
            position: self.pos,
            kind,
        }
    }

    fn unexpected(&self, expected: &'static str) -> PathExpressionError {
        match self.peek() {
            Some(found) => self.fail(PathErrorKind::UnexpectedChar { expected, found }),
            None => self.fail(PathErrorKind::UnexpectedEnd { expected }),
        }
    }

    fn expect(&mut self, token: &'static str) -> Result<(), PathExpressionError> {
        if self.eat(token) {
            Ok(())
        } else {
            Err(self.unexpected(token))
        }
    }

    fn name(&mut self) -> Option<&'a str> {
        let rest = self.rest();
        let mut chars = rest.char_indices();
        match chars.next() {
            Some((_, c)) if c.is_ascii_alphabetic() || c == '_' => {}
            _ => return None,
        }
        let end = chars
            .find(|(_, c)| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '-'))
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        self.pos += end;
        Some(&rest[..end])
    }

    fn expression(mut self) -> Result<PathExpression, PathExpressionError> {
        if self.at_end() {
            return Err(self.fail(PathErrorKind::Empty));
        }

        let (absolute, mut relation) = if self.eat("//") {
            (true, Relation::Descendant)
        } else if self.eat("/") {
            (true, Relation::Child)
        } else if self.eat(".//") {
            (false, Relation::Descendant)
        } else if self.eat("./") {
            (false, Relation::Child)
        } else if self.src == "." {
            return Ok(PathExpression {
                source: self.src.to_string(),
                absolute: false,
                steps: Vec::new(),
                extract: Extract::Element,
            });
        } else {
            (false, Relation::Child)
        };

        let mut steps = Vec::new();
        let mut extract = Extract::Element;

        loop {
            if self.eat("text()") {
                extract = Extract::Text(relation);
                if !self.at_end() {
                    return Err(self.fail(PathErrorKind::ExtractionNotLast("text()")));
                }
                break;
            }
            if self.eat("@") {
                if relation == Relation::Descendant {
                    return Err(self.fail(PathErrorKind::DescendantAttribute));
                }
                let name = self.name().ok_or_else(|| self.unexpected("attribute name"))?;
                extract = Extract::Attribute(name.to_string());
                if !self.at_end() {
                    return Err(self.fail(PathErrorKind::ExtractionNotLast("@attribute")));
                }
                break;
            }

            let tag = if self.eat("*") {
                None
            } else {
                let name = self.name().ok_or_else(|| self.unexpected("tag name or `*`"))?;
                Some(name.to_ascii_lowercase())
            };

            let mut predicates = Vec::new();
            while self.eat("[") {
                self.skip_ws();
                predicates.push(self.predicate()?);
                self.skip_ws();
                self.expect("]")?;
            }

            steps.push(Step {
                relation,
                tag,
                predicates,
            });

            if self.at_end() {
                break;
            }
            relation = if self.eat("//") {
                Relation::Descendant
            } else if self.eat("/") {
                Relation::Child
            } else {
                return Err(self.unexpected("`/` or `//`"));
            };
        }

        Ok(PathExpression {
            source: self.src.to_string(),
            absolute,
            steps,
            extract,
        })
    }

    fn predicate(&mut self) -> Result<Predicate, PathExpressionError> {
        if self.peek().is_some_and(|c| c.is_ascii_digit()) {
            let start = self.pos;
            let digits = self.rest().chars().take_while(|c| c.is_ascii_digit()).count();
            self.pos += digits;
            let n: usize = self.src[start..self.pos]
                .parse()
                .map_err(|_| self.unexpected("position"))?;
            if n == 0 {
                self.pos = start;
                return Err(self.fail(PathErrorKind::ZeroPosition));
            }
            return Ok(Predicate::Position(n));
        }

        if self.eat("@") {
            let name = self.name().ok_or_else(|| self.unexpected("attribute name"))?.to_string();
            self.skip_ws();
            if self.eat("=") {
                self.skip_ws();
                let value = self.literal()?;
                return Ok(Predicate::AttributeEquals { name, value });
            }
            return Ok(Predicate::HasAttribute(name));
        }

        let start = self.pos;
        let name = self.name().ok_or_else(|| self.unexpected("predicate"))?;
        self.skip_ws();
        if self.peek() != Some('(') {
            return Ok(Predicate::HasChild(name.to_ascii_lowercase()));
        }
        if name != "contains" {
            self.pos = start;
            return Err(self.fail(PathErrorKind::UnsupportedFunction(name.to_string())));
        }

        self.expect("(")?;
        self.skip_ws();
        let subject = self.subject()?;
        self.skip_ws();
        self.expect(",")?;
        self.skip_ws();
        let needle = self.literal()?;
        self.skip_ws();
        self.expect(")")?;
        Ok(Predicate::Contains { subject, needle })
    }

    fn subject(&mut self) -> Result<Subject, PathExpressionError> {
        if self.eat("text()") {
            Ok(Subject::OwnText)
        } else if self.eat("./*") || self.eat("*") {
            Ok(Subject::FirstChild)
        } else if self.eat("@") {
            let name = self.name().ok_or_else(|| self.unexpected("attribute name"))?;
            Ok(Subject::Attribute(name.to_string()))
        } else if self.eat(".") {
            Ok(Subject::Context)
        } else {
            Err(self.unexpected("`@name`, `.`, `*`, `./*` or `text()`"))
        }
    }

    fn literal(&mut self) -> Result<String, PathExpressionError> {
        let quote = match self.peek() {
            Some(q @ ('\'' | '"')) => q,
            _ => return Err(self.unexpected("string literal")),
        };
        let start = self.pos;
        self.pos += 1;
        match self.rest().find(quote) {
            Some(len) => {
                let value = self.rest()[..len].to_string();
                self.pos += len + 1;
                Ok(value)
            }
            None => {
                self.pos = start;
                Err(self.fail(PathErrorKind::UnterminatedLiteral))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind(src: &str) -> PathErrorKind {
        PathExpression::parse(src).unwrap_err().kind
    }

    #[test]
    fn absolute_descendant_with_predicates() {
        let p = PathExpression::parse(
            "//div[h2][contains(./*, 'Current Legislative Activities')]//div[contains(@class, 'row')]",
        )
        .unwrap();
        assert!(p.is_absolute());
        assert_eq!(p.steps().len(), 2);
        assert_eq!(p.steps()[0].relation, Relation::Descendant);
        assert_eq!(p.steps()[0].tag.as_deref(), Some("div"));
        assert_eq!(
            p.steps()[0].predicates,
            vec![
                Predicate::HasChild("h2".into()),
                Predicate::Contains {
                    subject: Subject::FirstChild,
                    needle: "Current Legislative Activities".into(),
                },
            ]
        );
        assert_eq!(
            p.steps()[1].predicates,
            vec![Predicate::Contains {
                subject: Subject::Attribute("class".into()),
                needle: "row".into(),
            }]
        );
        assert_eq!(p.extract(), &Extract::Element);
    }

    #[test]
    fn relative_with_text_terminal() {
        let p = PathExpression::parse("./div[contains(@class, 'status')]//a[1]/text()").unwrap();
        assert!(!p.is_absolute());
        assert_eq!(p.steps().len(), 2);
        assert_eq!(p.steps()[0].relation, Relation::Child);
        assert_eq!(p.steps()[1].relation, Relation::Descendant);
        assert_eq!(p.steps()[1].predicates, vec![Predicate::Position(1)]);
        assert_eq!(p.extract(), &Extract::Text(Relation::Child));
    }

    #[test]
    fn bare_relative_and_attribute_terminal() {
        let p = PathExpression::parse("div/a/@href").unwrap();
        assert!(!p.is_absolute());
        assert_eq!(p.steps().len(), 2);
        assert_eq!(p.extract(), &Extract::Attribute("href".into()));
    }

    #[test]
    fn attribute_predicates_and_wildcard() {
        let p = PathExpression::parse(r#".//*[@id][@role="main"]"#).unwrap();
        assert_eq!(p.steps()[0].tag, None);
        assert_eq!(
            p.steps()[0].predicates,
            vec![
                Predicate::HasAttribute("id".into()),
                Predicate::AttributeEquals {
                    name: "role".into(),
                    value: "main".into(),
                },
            ]
        );
    }

    #[test]
    fn tag_names_are_lowercased() {
        let p = PathExpression::parse("//DIV[H2]").unwrap();
        assert_eq!(p.steps()[0].tag.as_deref(), Some("div"));
        assert_eq!(p.steps()[0].predicates, vec![Predicate::HasChild("h2".into())]);
    }

    #[test]
    fn self_only() {
        let p = PathExpression::parse(".").unwrap();
        assert!(p.steps().is_empty());
        assert_eq!(p.extract(), &Extract::Element);
    }

    #[test]
    fn display_round_trips_source() {
        let src = "./div[contains(@class, 'legislative-activities')]/div/h4/text()";
        assert_eq!(src.parse::<PathExpression>().unwrap().to_string(), src);
    }

    #[test]
    fn rejects_malformed_expressions() {
        assert_eq!(kind(""), PathErrorKind::Empty);
        assert_eq!(kind("   "), PathErrorKind::Empty);
        assert_eq!(kind("//div[0]"), PathErrorKind::ZeroPosition);
        assert_eq!(
            kind("//div[starts-with(@class, 'x')]"),
            PathErrorKind::UnsupportedFunction("starts-with".into())
        );
        assert_eq!(kind("//div/text()/a"), PathErrorKind::ExtractionNotLast("text()"));
        assert_eq!(kind("//a/@href/b"), PathErrorKind::ExtractionNotLast("@attribute"));
        assert_eq!(kind("//a//@href"), PathErrorKind::DescendantAttribute);
        assert_eq!(kind("//div[contains(@class, 'x)]"), PathErrorKind::UnterminatedLiteral);
        assert_eq!(
            kind("//div[h2"),
            PathErrorKind::UnexpectedEnd { expected: "]" }
        );
        assert_eq!(
            kind("//div]"),
            PathErrorKind::UnexpectedChar {
                expected: "`/` or `//`",
                found: ']'
            }
        );
        assert!(matches!(kind("//"), PathErrorKind::UnexpectedEnd { .. }));
    }

    #[test]
    fn error_position_points_at_problem() {
        let err = PathExpression::parse("//div[foo(1)]").unwrap_err();
        assert_eq!(err.position, 6);
        assert_eq!(err.expression, "//div[foo(1)]");
    }
}
