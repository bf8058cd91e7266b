//! Executable-document view of a parsed GraphQL document: operations keyed
//! by name, fragments keyed by name, and the source text kept around for
//! error locations.

use crate::request::RequestError;
use gryphon_parser::ast;
use gryphon_parser::ast::Name;
use gryphon_parser::Node;
use gryphon_parser::SyntaxError;
use indexmap::IndexMap;
use std::sync::Arc;

#[derive(Clone, Debug, Default)]
pub struct ExecutableDocument {
    /// The original source text, when this document was parsed rather than
    /// built programmatically. Used to derive error locations.
    pub source: Option<Arc<str>>,

    pub anonymous_operation: Option<Node<ast::OperationDefinition>>,
    pub named_operations: IndexMap<Name, Node<ast::OperationDefinition>>,
    pub fragments: IndexMap<Name, Node<ast::FragmentDefinition>>,
}

impl ExecutableDocument {
    /// Parse an executable document. Type system definitions are a syntax
    /// error here.
    pub fn parse(source: &str) -> Result<Self, SyntaxError> {
        let document = gryphon_parser::Parser::new(source)
            .allow_type_system(false)
            .parse_document()?;
        Ok(Self::from_document(&document, Some(source)))
    }

    /// Build the view from an already-parsed document, keeping non-executable
    /// definitions out. `source` enables error locations when available.
    pub fn from_document(document: &ast::Document, source: Option<&str>) -> Self {
        let mut executable = Self {
            source: source.map(Arc::from),
            ..Self::default()
        };
        for definition in &document.definitions {
            match definition {
                ast::Definition::OperationDefinition(operation) => match &operation.name {
                    Some(name) => {
                        executable
                            .named_operations
                            .insert(name.clone(), operation.clone());
                    }
                    None => executable.anonymous_operation = Some(operation.clone()),
                },
                ast::Definition::FragmentDefinition(fragment) => {
                    executable
                        .fragments
                        .insert(fragment.name.clone(), fragment.clone());
                }
                _ => {}
            }
        }
        executable
    }

    pub fn operations(&self) -> impl Iterator<Item = &Node<ast::OperationDefinition>> {
        self.anonymous_operation
            .iter()
            .chain(self.named_operations.values())
    }

    /// Select the operation to execute.
    ///
    /// With a name request, the named operation must exist. Without one,
    /// the document must contain exactly one operation.
    pub fn get_operation(
        &self,
        name_request: Option<&str>,
    ) -> Result<&Node<ast::OperationDefinition>, RequestError> {
        if let Some(name) = name_request {
            self.named_operations
                .get(name)
                .ok_or_else(|| RequestError::new(format!(r#"No operation "{name}" in document"#)))
        } else {
            let mut operations = self.operations();
            let operation = operations
                .next()
                .ok_or_else(|| RequestError::new("Expected at least one operation definition"))?;
            if operations.next().is_some() {
                Err(RequestError::new(
                    "Operation name is required when the document contains multiple operations",
                )
                .at(operation.location()))
            } else {
                Ok(operation)
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::ExecutableDocument;

    #[test]
    fn selects_the_only_operation() {
        let document = ExecutableDocument::parse("{ hello }").unwrap();
        let operation = document.get_operation(None).unwrap();
        assert_eq!(operation.name, None);
    }

    #[test]
    fn empty_document_has_no_operation() {
        let document = ExecutableDocument::parse("fragment F on Query { hello }").unwrap();
        let error = document.get_operation(None).unwrap_err();
        assert_eq!(error.message(), "Expected at least one operation definition");
    }

    #[test]
    fn multiple_operations_require_a_name() {
        let document =
            ExecutableDocument::parse("query A { hello }\nquery B { hello }").unwrap();
        let error = document.get_operation(None).unwrap_err();
        assert_eq!(
            error.message(),
            "Operation name is required when the document contains multiple operations"
        );
        let operation = document.get_operation(Some("B")).unwrap();
        assert_eq!(operation.name.as_deref(), Some("B"));
        let error = document.get_operation(Some("C")).unwrap_err();
        assert_eq!(error.message(), r#"No operation "C" in document"#);
    }
}
