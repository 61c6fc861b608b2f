//! Query grammar: `key:value` operators mixed with free-text words

use super::normalize::normalize;
use crate::types::Priority;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Due-date filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DueFilter {
    Overdue,
    Week,
    Any,
}

impl DueFilter {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "overdue" => Some(Self::Overdue),
            "week" => Some(Self::Week),
            "any" => Some(Self::Any),
            _ => None,
        }
    }
}

/// Comparison operator of an estimation filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EstOp {
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = "=")]
    Eq,
}

impl EstOp {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "<" => Some(Self::Lt),
            "<=" => Some(Self::Le),
            ">" => Some(Self::Gt),
            ">=" => Some(Self::Ge),
            "=" => Some(Self::Eq),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Eq => "=",
        }
    }

    /// Apply the operator as `lhs <op> rhs`
    pub fn compare(&self, lhs: u32, rhs: u32) -> bool {
        match self {
            Self::Lt => lhs < rhs,
            Self::Le => lhs <= rhs,
            Self::Gt => lhs > rhs,
            Self::Ge => lhs >= rhs,
            Self::Eq => lhs == rhs,
        }
    }
}

impl fmt::Display for EstOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Estimation filter, e.g. `est:<60`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimationFilter {
    pub operator: EstOp,
    pub value: u32,
}

/// A parsed query. Unset filters match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    pub free_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_filter: Option<DueFilter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimation: Option<EstimationFilter>,
}

impl SearchQuery {
    /// True when no filter is set and there is no free text
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

static EST_REGEX: OnceLock<Regex> = OnceLock::new();

fn est_regex() -> &'static Regex {
    EST_REGEX.get_or_init(|| {
        Regex::new(r"^(<=|>=|<|>|=)?\s*([0-9]+)$").expect("Invalid estimation regex")
    })
}

fn parse_estimation(raw: &str) -> Option<EstimationFilter> {
    let caps = est_regex().captures(raw.trim())?;
    let operator = match caps.get(1) {
        Some(op) => EstOp::parse(op.as_str())?,
        None => EstOp::Eq,
    };
    let value = caps.get(2)?.as_str().parse().ok()?;
    Some(EstimationFilter { operator, value })
}

/// Parse a query string. Never fails: anything that does not form a valid
/// operator is kept as free text.
pub fn parse_query(input: &str) -> SearchQuery {
    let mut query = SearchQuery::default();
    let mut free: Vec<&str> = Vec::new();

    let mut in_phrase = false;
    for token in input.split_whitespace() {
        if in_phrase || token.starts_with('"') {
            let (literal, closed) = phrase_word(token, in_phrase);
            in_phrase = !closed;
            if !literal.is_empty() {
                free.push(literal);
            }
            continue;
        }

        let Some((raw_key, raw_value)) = token.split_once(':') else {
            free.push(token);
            continue;
        };

        let key = normalize(raw_key);
        let value = normalize(raw_value);
        if value.is_empty() {
            continue;
        }

        match key.as_str() {
            "tag" => query.tag = Some(value),
            "p" | "priority" => match value.parse::<Priority>() {
                Ok(priority) => query.priority = Some(priority),
                Err(_) => free.push(token),
            },
            "due" => match DueFilter::parse(&value) {
                Some(due) => query.due_filter = Some(due),
                None => free.push(token),
            },
            "est" => match parse_estimation(raw_value) {
                Some(est) => query.estimation = Some(est),
                None => free.push(token),
            },
            _ => free.push(token),
        }
    }

    query.free_text = free.join(" ");
    query
}

/// One word of a `"..."` phrase with its quote marks removed, and whether
/// the word closes the phrase. An unclosed phrase runs to the end of input.
fn phrase_word(token: &str, continuing: bool) -> (&str, bool) {
    let word = if continuing {
        token
    } else {
        token.strip_prefix('"').unwrap_or(token)
    };
    match word.strip_suffix('"') {
        Some(inner) => (inner, true),
        None => (word, false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_full_example() {
        let q = parse_query("\"cliente\" tag:compliance p:high due:week est:<60");
        assert_eq!(
            q,
            SearchQuery {
                free_text: "cliente".into(),
                tag: Some("compliance".into()),
                priority: Some(Priority::High),
                due_filter: Some(DueFilter::Week),
                estimation: Some(EstimationFilter {
                    operator: EstOp::Lt,
                    value: 60
                }),
            }
        );
    }

    #[rstest]
    #[case::invalid_priority("p:urgent", "p:urgent")]
    #[case::invalid_due("due:tomorrow", "due:tomorrow")]
    #[case::invalid_est("est:abc", "est:abc")]
    #[case::unknown_key("owner:ana", "owner:ana")]
    #[case::plain_words("revisar   Cliente", "revisar Cliente")]
    #[case::quoted_operator("\"p:high\"", "p:high")]
    #[case::quoted_phrase("\"llamar cliente\"", "llamar cliente")]
    #[case::operators_inside_phrase("\"p:high due:week\" extra", "p:high due:week extra")]
    #[case::unclosed_phrase("\"est:<60 tag:x", "est:<60 tag:x")]
    #[case::mixed("alpha p:nope beta", "alpha p:nope beta")]
    fn test_fallback_to_free_text(#[case] input: &str, #[case] expected: &str) {
        let q = parse_query(input);
        assert_eq!(q.free_text, expected);
        assert_eq!(q.priority, None);
        assert_eq!(q.due_filter, None);
        assert_eq!(q.estimation, None);
    }

    #[rstest]
    #[case::empty_value("tag:")]
    #[case::empty_quotes("\"\"")]
    #[case::whitespace("   ")]
    #[case::empty("")]
    fn test_tokens_dropped(#[case] input: &str) {
        assert!(parse_query(input).is_empty());
    }

    #[rstest]
    #[case::lt("est:<60", EstOp::Lt, 60)]
    #[case::le("est:<=30", EstOp::Le, 30)]
    #[case::gt("est:>15", EstOp::Gt, 15)]
    #[case::ge("est:>=120", EstOp::Ge, 120)]
    #[case::eq("est:=45", EstOp::Eq, 45)]
    #[case::bare("est:30", EstOp::Eq, 30)]
    fn test_estimation_operators(#[case] input: &str, #[case] op: EstOp, #[case] value: u32) {
        assert_eq!(
            parse_query(input).estimation,
            Some(EstimationFilter {
                operator: op,
                value
            })
        );
    }

    #[test]
    fn test_keys_and_values_are_normalized() {
        let q = parse_query("TAG:Revisión PRIORITY:High DUE:Overdue");
        assert_eq!(q.tag.as_deref(), Some("revision"));
        assert_eq!(q.priority, Some(Priority::High));
        assert_eq!(q.due_filter, Some(DueFilter::Overdue));
    }

    #[test]
    fn test_operators_after_phrase_still_parse() {
        let q = parse_query("\"quarterly review\" p:high");
        assert_eq!(q.free_text, "quarterly review");
        assert_eq!(q.priority, Some(Priority::High));
    }

    #[test]
    fn test_later_operator_wins() {
        let q = parse_query("p:low p:high");
        assert_eq!(q.priority, Some(Priority::High));
    }

    #[test]
    fn test_overflowing_estimate_is_free_text() {
        let q = parse_query("est:99999999999");
        assert_eq!(q.estimation, None);
        assert_eq!(q.free_text, "est:99999999999");
    }

    #[test]
    fn test_query_serializes_operator_symbols() {
        let json = serde_json::to_value(parse_query("est:>=10")).unwrap();
        assert_eq!(json["estimation"]["operator"], ">=");
        assert_eq!(json["freeText"], "");
    }
}
