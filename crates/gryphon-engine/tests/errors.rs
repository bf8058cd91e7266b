use futures::future::BoxFuture;
use gryphon_engine::ExecutableDocument;
use gryphon_engine::Execution;
use gryphon_engine::FieldError;
use gryphon_engine::GraphQLLocation;
use gryphon_engine::JsonObject;
use gryphon_engine::JsonValue;
use gryphon_engine::PathSegment;
use gryphon_engine::ResolveInfo;
use gryphon_engine::ResolvedValue;
use gryphon_engine::Resolver;
use gryphon_engine::Response;
use gryphon_engine::Schema;
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn execute_json(sdl: &str, query: &str, data: &str) -> Response {
    let schema = Arc::new(Schema::parse(sdl).unwrap());
    let document = Arc::new(ExecutableDocument::parse(query).unwrap());
    let root = Arc::new(JsonObject::new(
        "Query",
        serde_json::from_str(data).unwrap(),
    ));
    Execution::new(schema, document).execute_blocking(root)
}

fn field_path(segments: &[&str]) -> Vec<PathSegment> {
    segments
        .iter()
        .map(|segment| PathSegment::Field(segment.to_string()))
        .collect()
}

#[test]
fn null_propagates_to_nearest_nullable_ancestor() {
    let response = execute_json(
        "type Query { nest: Nest }\n\
         type Nest { inner: Inner! }\n\
         type Inner { value: String! }",
        "{ nest { inner { value } } }",
        r#"{"nest": {"inner": {"value": null}}}"#,
    );
    // `value` and `inner` are both non-null, so the null climbs to `nest`.
    assert_eq!(response.data, Some(serde_json::json!({ "nest": null })));
    assert_eq!(response.errors.len(), 1);
    assert_eq!(
        response.errors[0].message,
        "non-null type String! resolved to null"
    );
    assert_eq!(
        response.errors[0].path,
        field_path(&["nest", "inner", "value"])
    );
}

#[test]
fn non_null_root_field_nulls_the_whole_data() {
    let response = execute_json(
        "type Query { name: String! }",
        "{ name }",
        r#"{"name": null}"#,
    );
    assert_eq!(response.data, Some(JsonValue::Null));
    assert_eq!(response.errors.len(), 1);
}

struct HeroQuery;
struct Hero;

impl Resolver for HeroQuery {
    fn type_name(&self) -> &str {
        "Query"
    }

    fn resolve_field<'a>(
        &'a self,
        info: &'a ResolveInfo,
    ) -> BoxFuture<'a, Result<ResolvedValue, FieldError>> {
        Box::pin(async move {
            match info.field_name() {
                "hero" => Ok(ResolvedValue::object(Hero)),
                other => Err(FieldError::new(format!("unknown field {other}"))),
            }
        })
    }
}

impl Resolver for Hero {
    fn type_name(&self) -> &str {
        "Hero"
    }

    fn resolve_field<'a>(
        &'a self,
        info: &'a ResolveInfo,
    ) -> BoxFuture<'a, Result<ResolvedValue, FieldError>> {
        Box::pin(async move {
            match info.field_name() {
                "name" => Ok(ResolvedValue::leaf("R2-D2")),
                "story" => {
                    let mut extensions = gryphon_engine::JsonMap::new();
                    extensions.insert("code".to_owned(), 42.into());
                    Err(FieldError::new("Story of this hero is not available")
                        .with_extensions(extensions))
                }
                other => Err(FieldError::new(format!("unknown field {other}"))),
            }
        })
    }
}

const HERO_SDL: &str = "type Query { hero: Hero }\n\
                        type Hero { name: String story: String }";

#[test]
fn resolver_errors_carry_path_and_extensions() {
    let schema = Arc::new(Schema::parse(HERO_SDL).unwrap());
    let document =
        Arc::new(ExecutableDocument::parse("{ mainHero: hero { name story } }").unwrap());
    let response = Execution::new(schema, document).execute_blocking(Arc::new(HeroQuery));

    // The erroring field is nulled; its sibling is unaffected.
    assert_eq!(
        response.data,
        Some(serde_json::json!({ "mainHero": { "name": "R2-D2", "story": null } })),
    );
    assert_eq!(response.errors.len(), 1);
    let error = &response.errors[0];
    assert_eq!(error.message, "Story of this hero is not available");
    // The path is keyed by response key, so the alias shows up.
    assert_eq!(error.path, field_path(&["mainHero", "story"]));
    assert_eq!(error.extensions.get("code"), Some(&serde_json::json!(42)));
    assert_eq!(error.locations, [GraphQLLocation { line: 1, column: 25 }]);
}

#[test]
fn missing_required_argument() {
    let response = execute_json(
        "type Query { user(id: String!): String }",
        "{ user }",
        r#"{"user": "u1"}"#,
    );
    let expected = expect_test::expect![[r#"
        {
          "errors": [
            {
              "message": "Argument \"id\" of required type \"String!\" was not provided",
              "locations": [
                {
                  "line": 1,
                  "column": 3
                }
              ],
              "path": [
                "user"
              ]
            }
          ],
          "data": {
            "user": null
          }
        }"#]];
    expected.assert_eq(&serde_json::to_string_pretty(&response).unwrap());
}

#[test]
fn missing_non_null_variable_is_a_request_error() {
    let schema = Arc::new(Schema::parse("type Query { hello(name: String): String }").unwrap());
    let document = Arc::new(
        ExecutableDocument::parse("query Q($name: String!) { hello(name: $name) }").unwrap(),
    );
    let root = Arc::new(JsonObject::new("Query", gryphon_engine::JsonMap::new()));
    let response = Execution::new(schema, document).execute_blocking(root);
    assert_eq!(response.data, Some(JsonValue::Null));
    assert_eq!(
        response.errors[0].message,
        r#"Missing value for non-null variable "name""#
    );
}

#[test]
fn unsupported_root_operation() {
    let schema = Arc::new(Schema::parse("type Query { hello: String }").unwrap());
    let document = Arc::new(ExecutableDocument::parse("mutation { setHello }").unwrap());
    let root = Arc::new(JsonObject::new("Mutation", gryphon_engine::JsonMap::new()));
    let response = Execution::new(schema, document).execute_blocking(root);
    assert_eq!(response.data, Some(JsonValue::Null));
    assert_eq!(
        response.errors[0].message,
        "Schema doesn't support mutation operation"
    );
}

#[test]
fn unknown_operation_name() {
    let schema = Arc::new(Schema::parse("type Query { hello: String }").unwrap());
    let document = Arc::new(ExecutableDocument::parse("query A { hello }").unwrap());
    let root = Arc::new(JsonObject::new("Query", gryphon_engine::JsonMap::new()));
    let response = Execution::new(schema, document)
        .operation_name("B")
        .execute_blocking(root);
    assert_eq!(response.data, Some(JsonValue::Null));
    assert_eq!(response.errors[0].message, r#"No operation "B" in document"#);
}

#[test]
fn unserializable_leaf_aborts_execution() {
    // An Int out of 32-bit range is a contract violation, not a field
    // error: data is nulled entirely.
    let response = execute_json(
        "type Query { big: Int name: String }",
        "{ name big }",
        r#"{"big": 5000000000, "name": "x"}"#,
    );
    assert_eq!(response.data, Some(JsonValue::Null));
    assert_eq!(response.errors.len(), 1);
    assert_eq!(
        response.errors[0].message,
        r#"Could not serialize value 5000000000 as leaf type "Int""#
    );
}

#[test]
fn list_items_fail_independently() {
    let response = execute_json(
        "type Query { heroes: [Hero] }\n\
         type Hero { name: String! }",
        "{ heroes { name } }",
        r#"{"heroes": [{"name": "Luke"}, {"name": null}, {"name": "Leia"}]}"#,
    );
    // The failing item nulls out; its neighbors survive.
    assert_eq!(
        response.data,
        Some(serde_json::json!({
            "heroes": [{ "name": "Luke" }, null, { "name": "Leia" }]
        })),
    );
    assert_eq!(response.errors.len(), 1);
    assert_eq!(
        response.errors[0].path,
        vec![
            PathSegment::Field("heroes".to_owned()),
            PathSegment::ListIndex(1),
            PathSegment::Field("name".to_owned()),
        ],
    );
}
