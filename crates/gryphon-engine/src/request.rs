//! Request errors: failures raised before any field is executed.

use crate::execution::input_coercion::InputCoercionError;
use crate::response::GraphQLError;
use gryphon_parser::NodeLocation;

/// An error raised during an early phase of execution, indicating that the
/// request as a whole is faulty: no operation could be selected, the schema
/// does not support the requested operation type, or variable coercion
/// failed.
///
/// A request error aborts execution entirely. The resulting response carries
/// `"data": null` next to the error, which is distinct from a response whose
/// `data` contains `null`s propagated from field errors.
#[derive(thiserror::Error, Debug, Clone)]
#[error("{message}")]
pub struct RequestError {
    pub(crate) message: String,
    pub(crate) location: Option<NodeLocation>,
}

impl RequestError {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            location: None,
        }
    }

    pub(crate) fn at(mut self, location: Option<NodeLocation>) -> Self {
        self.location = location;
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn location(&self) -> Option<NodeLocation> {
        self.location
    }

    pub(crate) fn into_graphql_error(self, source: Option<&str>) -> GraphQLError {
        GraphQLError::new(self.message, self.location, source)
    }
}

impl From<InputCoercionError> for RequestError {
    fn from(error: InputCoercionError) -> Self {
        Self {
            message: error.message,
            location: error.location,
        }
    }
}
