//! Literal values and their SQL rendering
//!
//! Literals are either written inline as escaped SQL text or, with
//! [`ParameterStyle::Numbered`], replaced by `$n` markers whose values are
//! collected in order of appearance.

use crate::errors::QueryGenerationError;
use chrono::NaiveDate;
use config::ParameterStyle;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// Input and output format of date literals
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A literal operand as produced by the form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Literal {
    Null,
    String(String),
    Integer(i64),
    Float(f64),
    /// Unparsed `YYYY-MM-DD` text, checked at render time
    Date(String),
    /// Ordered, homogeneous list of scalar literals
    Set(Vec<Literal>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    Null,
    String,
    Integer,
    Float,
    Date,
    Set,
}

impl Literal {
    pub fn string(value: impl Into<String>) -> Self {
        Literal::String(value.into())
    }

    pub fn date(value: impl Into<String>) -> Self {
        Literal::Date(value.into())
    }

    pub fn set<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Literal>,
    {
        Literal::Set(items.into_iter().map(Into::into).collect())
    }

    /// Parse numeric form input into an integer or float literal
    pub fn numeric(text: &str) -> Result<Self, QueryGenerationError> {
        let trimmed = text.trim();
        if let Ok(value) = trimmed.parse::<i64>() {
            return Ok(Literal::Integer(value));
        }
        match trimmed.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(Literal::Float(value)),
            Ok(_) => Err(QueryGenerationError::invalid_literal(
                text,
                "number is not finite",
            )),
            Err(_) => Err(QueryGenerationError::invalid_literal(text, "not a number")),
        }
    }

    pub fn kind(&self) -> LiteralKind {
        match self {
            Literal::Null => LiteralKind::Null,
            Literal::String(_) => LiteralKind::String,
            Literal::Integer(_) => LiteralKind::Integer,
            Literal::Float(_) => LiteralKind::Float,
            Literal::Date(_) => LiteralKind::Date,
            Literal::Set(_) => LiteralKind::Set,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Literal::Integer(_) | Literal::Float(_))
    }

    /// Short text used in error messages
    pub(crate) fn describe(&self) -> String {
        match self {
            Literal::Null => "NULL".to_string(),
            Literal::String(s) | Literal::Date(s) => s.clone(),
            Literal::Integer(i) => i.to_string(),
            Literal::Float(f) => f.to_string(),
            Literal::Set(items) => format!(
                "({})",
                items.iter().map(Literal::describe).collect::<Vec<_>>().join(", ")
            ),
        }
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Literal::String(value.to_string())
    }
}

impl From<String> for Literal {
    fn from(value: String) -> Self {
        Literal::String(value)
    }
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Literal::Integer(value)
    }
}

impl From<i32> for Literal {
    fn from(value: i32) -> Self {
        Literal::Integer(value.into())
    }
}

impl From<f64> for Literal {
    fn from(value: f64) -> Self {
        Literal::Float(value)
    }
}

/// Wrap a string in single quotes, doubling embedded quotes
pub fn escape_string(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Parse `YYYY-MM-DD` date text
pub fn parse_date(text: &str) -> Result<NaiveDate, QueryGenerationError> {
    NaiveDate::parse_from_str(text.trim(), DATE_FORMAT)
        .map_err(|_| QueryGenerationError::invalid_literal(text, "expected a YYYY-MM-DD date"))
}

/// Render a literal inline
pub fn render(literal: &Literal) -> Result<String, QueryGenerationError> {
    LiteralRenderer::inline().render(literal)
}

/// Check that two literals form a usable range.
///
/// Both bounds must be numbers, dates, or strings; numeric and date ranges must not
/// be inverted.
pub fn check_range_bounds(low: &Literal, high: &Literal) -> Result<(), QueryGenerationError> {
    let describe = || format!("{} .. {}", low.describe(), high.describe());

    match (low, high) {
        (Literal::Date(start), Literal::Date(end)) => {
            if parse_date(start)? > parse_date(end)? {
                return Err(QueryGenerationError::invalid_literal(
                    describe(),
                    "range start is after range end",
                ));
            }
        }
        (low, high) if low.is_numeric() && high.is_numeric() => {
            if as_f64(low) > as_f64(high) {
                return Err(QueryGenerationError::invalid_literal(
                    describe(),
                    "range start is after range end",
                ));
            }
        }
        (Literal::String(_), Literal::String(_)) => {}
        _ => {
            return Err(QueryGenerationError::invalid_literal(
                describe(),
                "range bounds must both be numbers, dates, or strings",
            ));
        }
    }

    Ok(())
}

fn as_f64(literal: &Literal) -> f64 {
    match literal {
        Literal::Integer(i) => *i as f64,
        Literal::Float(f) => *f,
        _ => f64::NAN,
    }
}

/// Renders literals for one build, collecting bound values in order
#[derive(Debug, Clone)]
pub struct LiteralRenderer {
    style: ParameterStyle,
    params: Vec<Value>,
}

impl LiteralRenderer {
    pub fn new(style: ParameterStyle) -> Self {
        Self {
            style,
            params: Vec::new(),
        }
    }

    pub fn inline() -> Self {
        Self::new(ParameterStyle::Inline)
    }

    pub fn render(&mut self, literal: &Literal) -> Result<String, QueryGenerationError> {
        match literal {
            // NULL never becomes a bound value
            Literal::Null => Ok("NULL".to_string()),
            Literal::Set(items) => self.render_set(items),
            scalar => self.render_scalar(scalar),
        }
    }

    /// Render `(a, b, c)`; sets must be non-empty and flat, and hold one kind of
    /// value (integers and floats count as one numeric kind)
    pub fn render_set(&mut self, items: &[Literal]) -> Result<String, QueryGenerationError> {
        let Some(first) = items.first() else {
            return Err(QueryGenerationError::invalid_literal("()", "set is empty"));
        };

        let describe = || Literal::Set(items.to_vec()).describe();
        for item in items {
            if matches!(item, Literal::Set(_) | Literal::Null) {
                return Err(QueryGenerationError::invalid_literal(
                    describe(),
                    "sets may only contain scalar values",
                ));
            }
            let same_kind =
                item.kind() == first.kind() || (item.is_numeric() && first.is_numeric());
            if !same_kind {
                return Err(QueryGenerationError::invalid_literal(
                    describe(),
                    "set mixes value types",
                ));
            }
        }

        let rendered = items
            .iter()
            .map(|item| self.render_scalar(item))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(format!("({})", rendered.join(", ")))
    }

    fn render_scalar(&mut self, literal: &Literal) -> Result<String, QueryGenerationError> {
        let (inline, value) = match literal {
            Literal::String(s) => (escape_string(s), Value::String(s.clone())),
            Literal::Integer(i) => (i.to_string(), Value::from(*i)),
            Literal::Float(f) => {
                let number = Number::from_f64(*f).ok_or_else(|| {
                    QueryGenerationError::invalid_literal(f.to_string(), "number is not finite")
                })?;
                (f.to_string(), Value::Number(number))
            }
            Literal::Date(text) => {
                let normalized = parse_date(text)?.format(DATE_FORMAT).to_string();
                (format!("'{}'", normalized), Value::String(normalized))
            }
            Literal::Null | Literal::Set(_) => {
                return Err(QueryGenerationError::invalid_literal(
                    literal.describe(),
                    "expected a scalar value",
                ));
            }
        };

        match self.style {
            ParameterStyle::Inline => Ok(inline),
            ParameterStyle::Numbered => {
                self.params.push(value);
                let marker = format!("${}", self.params.len());
                if matches!(literal, Literal::Date(_)) {
                    Ok(format!("CAST({} AS DATE)", marker))
                } else {
                    Ok(marker)
                }
            }
        }
    }

    pub fn params(&self) -> &[Value] {
        &self.params
    }

    pub fn into_params(self) -> Vec<Value> {
        self.params
    }
}
