use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

pub mod client;
pub mod documents;

pub use client::{ConfigReport, ConnectionReport, GraphQLClient, RequestOptions};

/// The POST body understood by the GraphQL endpoint and by `/api/graphql`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GraphQLRequest {
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub variables: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_name: Option<String>,
}

impl GraphQLRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            variables: None,
            operation_name: None,
        }
    }

    pub fn with_variables(mut self, variables: Map<String, Value>) -> Self {
        self.variables = Some(variables);
        self
    }

    pub fn kind(&self) -> OperationKind {
        OperationKind::detect(&self.query)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct GraphQLErrorItem {
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub locations: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub path: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphQLResponse {
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub errors: Option<Vec<GraphQLErrorItem>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Query,
    Mutation,
}

impl OperationKind {
    /// Classifies a document by its top-level operation keywords, ignoring
    /// comments, strings and anything nested inside `{}` or `()`. A document
    /// that declares any `mutation` (or `subscription`) is a mutation; so is
    /// one with no recognisable operation, since it must not be retried.
    pub fn detect(document: &str) -> Self {
        let mut saw_query = false;
        let mut in_definition = false;
        let mut depth = 0usize;
        let mut chars = document.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '#' => {
                    for c in chars.by_ref() {
                        if c == '\n' || c == '\r' {
                            break;
                        }
                    }
                }
                '"' => skip_string(&mut chars),
                '{' | '(' | '[' => {
                    // A top-level `{` without a keyword is the query shorthand.
                    if depth == 0 && c == '{' && !in_definition {
                        saw_query = true;
                    }
                    depth += 1;
                }
                '}' | ')' | ']' => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 && c == '}' {
                        in_definition = false;
                    }
                }
                c if depth == 0 && (c.is_ascii_alphabetic() || c == '_') => {
                    let mut word = String::from(c);
                    while let Some(&next) = chars.peek() {
                        if next.is_ascii_alphanumeric() || next == '_' {
                            word.push(next);
                            chars.next();
                        } else {
                            break;
                        }
                    }
                    match word.to_ascii_lowercase().as_str() {
                        "mutation" | "subscription" => return OperationKind::Mutation,
                        "query" => {
                            saw_query = true;
                            in_definition = true;
                        }
                        "fragment" => in_definition = true,
                        _ => {}
                    }
                }
                _ => {}
            }
        }

        if saw_query {
            OperationKind::Query
        } else {
            OperationKind::Mutation
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OperationKind::Query => "query",
            OperationKind::Mutation => "mutation",
        }
    }
}

fn skip_string(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) {
    let block = chars.peek() == Some(&'"') && {
        let mut ahead = chars.clone();
        ahead.next();
        ahead.next() == Some('"')
    };
    if block {
        chars.next();
        chars.next();
        let mut quotes = 0;
        for c in chars.by_ref() {
            quotes = if c == '"' { quotes + 1 } else { 0 };
            if quotes == 3 {
                return;
            }
        }
        return;
    }
    let mut escaped = false;
    for c in chars.by_ref() {
        match c {
            '\\' if !escaped => escaped = true,
            '"' if !escaped => return,
            _ => escaped = false,
        }
    }
}

const INTROSPECTION_PATTERNS: [&str; 3] = ["__schema", "__type", "introspection"];

/// Case-insensitive check for schema introspection markers. Note that
/// `__typename` also matches `__type`.
pub fn is_introspection(query: &str) -> bool {
    let lower = query.to_lowercase();
    INTROSPECTION_PATTERNS.iter().any(|p| lower.contains(p))
}

/// Builds a variables map from `(name, value)` pairs.
pub fn variables<I, K>(pairs: I) -> Map<String, Value>
where
    I: IntoIterator<Item = (K, Value)>,
    K: Into<String>,
{
    pairs.into_iter().map(|(k, v)| (k.into(), v)).collect()
}

/// Odoo search domain, sent as a list of `[field, operator, value]` terms
/// that are implicitly AND-ed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Domain(Vec<Value>);

impl Domain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn term(mut self, field: &str, operator: &str, value: impl Into<Value>) -> Self {
        self.0.push(Value::Array(vec![
            Value::from(field),
            Value::from(operator),
            value.into(),
        ]));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// An empty domain is sent as `null`, which the server reads as "all".
    pub fn into_value(self) -> Value {
        if self.0.is_empty() {
            Value::Null
        } else {
            Value::Array(self.0)
        }
    }
}
