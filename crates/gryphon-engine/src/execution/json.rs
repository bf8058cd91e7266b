//! A default resolver over plain JSON data: fields resolve by key lookup.

use crate::execution::resolver::FieldError;
use crate::execution::resolver::ResolveInfo;
use crate::execution::resolver::ResolvedValue;
use crate::execution::resolver::Resolver;
use crate::response::JsonMap;
use crate::response::JsonValue;
use futures::future::BoxFuture;
use std::sync::Arc;

/// Resolves fields of a JSON object by looking up the field name as a key.
///
/// Missing keys resolve to `null`. Nested objects become [`JsonObject`]s
/// themselves; their type name is taken from a `"__typename"` entry when
/// present, falling back to the field's declared type, so abstract types
/// work as long as the data is tagged.
#[derive(Clone, Debug)]
pub struct JsonObject {
    type_name: String,
    fields: JsonMap,
}

impl JsonObject {
    pub fn new(type_name: impl Into<String>, fields: JsonMap) -> Self {
        Self {
            type_name: type_name.into(),
            fields,
        }
    }
}

impl Resolver for JsonObject {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn resolve_field<'a>(
        &'a self,
        info: &'a ResolveInfo,
    ) -> BoxFuture<'a, Result<ResolvedValue, FieldError>> {
        let value = self
            .fields
            .get(info.field_name())
            .cloned()
            .unwrap_or(JsonValue::Null);
        let declared = info.field_definition().ty.inner_named_type().clone();
        Box::pin(async move { Ok(resolved_from_json(value, &declared)) })
    }
}

fn resolved_from_json(value: JsonValue, declared_type: &str) -> ResolvedValue {
    match value {
        JsonValue::Array(items) => ResolvedValue::List(
            items
                .into_iter()
                .map(|item| resolved_from_json(item, declared_type))
                .collect(),
        ),
        JsonValue::Object(fields) => {
            let type_name = fields
                .get("__typename")
                .and_then(JsonValue::as_str)
                .unwrap_or(declared_type)
                .to_owned();
            ResolvedValue::Object(Arc::new(JsonObject { type_name, fields }))
        }
        leaf => ResolvedValue::Leaf(leaf),
    }
}
