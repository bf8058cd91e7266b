//! GraphQL [responses](https://spec.graphql.org/October2021/#sec-Response):
//! the data/errors contract produced by execution.

use gryphon_parser::line_column;
use gryphon_parser::NodeLocation;
use serde::Deserialize;
use serde::Serialize;

pub type JsonValue = serde_json::Value;
pub type JsonMap = serde_json::Map<String, JsonValue>;

/// A complete GraphQL response, serializable as JSON.
///
/// The `errors` entry is serialized first and omitted when empty;
/// `data` is omitted only when execution never started (a syntax error),
/// and is explicitly `null` when a request error aborted execution or a
/// field error propagated all the way to the root.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Response {
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub errors: Vec<GraphQLError>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub data: Option<JsonValue>,
}

/// A serializable [error](https://spec.graphql.org/October2021/#sec-Errors)
/// in a GraphQL response.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct GraphQLError {
    /// The error message.
    pub message: String,

    /// Locations relevant to the error, if any.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub locations: Vec<GraphQLLocation>,

    /// If non-empty, the path of the response field which experienced the error.
    ///
    /// Keyed by response key (alias or field name), not by field name.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub path: Vec<PathSegment>,

    /// Free-form map carried over verbatim from the error that was raised.
    #[serde(skip_serializing_if = "JsonMap::is_empty", default)]
    pub extensions: JsonMap,
}

/// A `(line, column)` location in a GraphQL document, both 1-indexed.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Eq, PartialEq)]
pub struct GraphQLLocation {
    pub line: usize,
    pub column: usize,
}

/// One step in the response-key traversal from the operation root to a field.
#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq, Hash)]
#[serde(untagged)]
pub enum PathSegment {
    /// The relevant key in an object value
    Field(String),
    /// The index of the relevant item in a list value
    ListIndex(usize),
}

impl Response {
    /// A response for a request error: no execution took place,
    /// `data` is explicitly `null` next to a single error.
    pub(crate) fn request_error(error: GraphQLError) -> Self {
        Self {
            errors: vec![error],
            data: Some(JsonValue::Null),
        }
    }
}

impl GraphQLError {
    pub fn new(
        message: impl Into<String>,
        location: Option<NodeLocation>,
        source: Option<&str>,
    ) -> Self {
        Self {
            message: message.into(),
            locations: GraphQLLocation::from_node(location, source)
                .into_iter()
                .collect(),
            path: Vec::new(),
            extensions: JsonMap::new(),
        }
    }
}

impl GraphQLLocation {
    /// Convert a node's span into a 1-indexed line/column pair,
    /// given the source text it was parsed from.
    pub fn from_node(location: Option<NodeLocation>, source: Option<&str>) -> Option<Self> {
        let location = location?;
        let (line, column) = line_column(source?, location.start);
        Some(Self { line, column })
    }
}
