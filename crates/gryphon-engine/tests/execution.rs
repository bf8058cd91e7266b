use futures::future::BoxFuture;
use gryphon_engine::ExecutableDocument;
use gryphon_engine::Execution;
use gryphon_engine::FieldError;
use gryphon_engine::FieldHook;
use gryphon_engine::JsonMap;
use gryphon_engine::JsonObject;
use gryphon_engine::JsonValue;
use gryphon_engine::ResolveInfo;
use gryphon_engine::ResolvedValue;
use gryphon_engine::Resolver;
use gryphon_engine::Response;
use gryphon_engine::Schema;
use pretty_assertions::assert_eq;
use std::sync::atomic::AtomicI64;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::sync::Mutex;

fn execute_json(sdl: &str, query: &str, data: &str) -> Response {
    execute_json_with_variables(sdl, query, data, JsonMap::new())
}

fn execute_json_with_variables(
    sdl: &str,
    query: &str,
    data: &str,
    variables: JsonMap,
) -> Response {
    let schema = Arc::new(Schema::parse(sdl).unwrap());
    let document = Arc::new(ExecutableDocument::parse(query).unwrap());
    let root = Arc::new(JsonObject::new(
        "Query",
        serde_json::from_str(data).unwrap(),
    ));
    Execution::new(schema, document)
        .variables(variables)
        .execute_blocking(root)
}

fn to_json(response: &Response) -> String {
    serde_json::to_string(response).unwrap()
}

#[test]
fn resolves_scalars_objects_and_lists() {
    let response = execute_json(
        "type Query { name: String age: Int scores: [Float] friend: Query }",
        "{ name age scores friend { name } }",
        r#"{"name": "Alice", "age": 42, "scores": [1.5, 2.5], "friend": {"name": "Bob"}}"#,
    );
    assert_eq!(
        to_json(&response),
        r#"{"data":{"name":"Alice","age":42,"scores":[1.5,2.5],"friend":{"name":"Bob"}}}"#,
    );
}

#[test]
fn aliases_key_the_response() {
    let response = execute_json(
        "type Query { name: String }",
        "{ first: name second: name }",
        r#"{"name": "Alice"}"#,
    );
    assert_eq!(
        to_json(&response),
        r#"{"data":{"first":"Alice","second":"Alice"}}"#,
    );
}

#[test]
fn fragments_merge_into_one_selection() {
    let response = execute_json(
        "type Query { hero: Hero }\n\
         type Hero { deep: Deep }\n\
         type Deep { one: Int two: Int }",
        "{ hero { ...One ...Two } }\n\
         fragment One on Hero { deep { one } }\n\
         fragment Two on Hero { deep { two } }",
        r#"{"hero": {"deep": {"one": 1, "two": 2}}}"#,
    );
    assert_eq!(
        to_json(&response),
        r#"{"data":{"hero":{"deep":{"one":1,"two":2}}}}"#,
    );
}

#[test]
fn skip_wins_over_include() {
    let variables = serde_json::from_str(r#"{"yes": true, "no": false}"#).unwrap();
    let response = execute_json_with_variables(
        "type Query { hello: String }",
        "query Q($yes: Boolean!, $no: Boolean!) {\n\
           a: hello @skip(if: $no)\n\
           b: hello @include(if: $no)\n\
           c: hello @skip(if: true) @include(if: true)\n\
           d: hello @include(if: $yes)\n\
         }",
        r#"{"hello": "hi"}"#,
        variables,
    );
    assert_eq!(to_json(&response), r#"{"data":{"a":"hi","d":"hi"}}"#);
}

#[test]
fn typename_and_abstract_types() {
    let response = execute_json(
        "type Query { pet: Named }\n\
         interface Named { name: String }\n\
         type Dog implements Named { name: String barks: Boolean }\n\
         type Cat implements Named { name: String meows: Boolean }",
        "{ __typename pet { __typename name ... on Dog { barks } ... on Cat { meows } } }",
        r#"{"pet": {"__typename": "Dog", "name": "Rex", "barks": true, "meows": false}}"#,
    );
    assert_eq!(
        to_json(&response),
        r#"{"data":{"__typename":"Query","pet":{"__typename":"Dog","name":"Rex","barks":true}}}"#,
    );
}

#[test]
fn union_member_selected_by_type_name() {
    let response = execute_json(
        "type Query { media: Media }\n\
         union Media = Book | Film\n\
         type Book { title: String pages: Int }\n\
         type Film { title: String minutes: Int }",
        "{ media { ... on Book { title pages } ... on Film { title minutes } } }",
        r#"{"media": {"__typename": "Film", "title": "Arrival", "minutes": 116}}"#,
    );
    assert_eq!(
        to_json(&response),
        r#"{"data":{"media":{"title":"Arrival","minutes":116}}}"#,
    );
}

struct EchoArgs;

impl Resolver for EchoArgs {
    fn type_name(&self) -> &str {
        "Query"
    }

    fn resolve_field<'a>(
        &'a self,
        info: &'a ResolveInfo,
    ) -> BoxFuture<'a, Result<ResolvedValue, FieldError>> {
        Box::pin(async move {
            Ok(ResolvedValue::leaf(JsonValue::Object(
                info.arguments().clone(),
            )))
        })
    }
}

const ECHO_SDL: &str = "scalar Json\n\
                        type Query { echo(name: String! = \"world\", shout: Boolean): Json }";

#[test]
fn argument_defaults_apply() {
    let schema = Arc::new(Schema::parse(ECHO_SDL).unwrap());
    let document = Arc::new(ExecutableDocument::parse("{ echo(shout: true) }").unwrap());
    let response = Execution::new(schema, document).execute_blocking(Arc::new(EchoArgs));
    assert_eq!(
        to_json(&response),
        r#"{"data":{"echo":{"name":"world","shout":true}}}"#,
    );
}

#[test]
fn variables_flow_into_arguments() {
    let schema = Arc::new(Schema::parse(ECHO_SDL).unwrap());
    let document = Arc::new(
        ExecutableDocument::parse("query Q($shout: Boolean!) { echo(shout: $shout) }").unwrap(),
    );
    let response = Execution::new(schema, document)
        .variables(serde_json::from_str(r#"{"shout": false}"#).unwrap())
        .execute_blocking(Arc::new(EchoArgs));
    assert_eq!(
        to_json(&response),
        r#"{"data":{"echo":{"name":"world","shout":false}}}"#,
    );
}

struct Counter {
    root: &'static str,
    value: Arc<AtomicI64>,
}

impl Resolver for Counter {
    fn type_name(&self) -> &str {
        self.root
    }

    fn resolve_field<'a>(
        &'a self,
        info: &'a ResolveInfo,
    ) -> BoxFuture<'a, Result<ResolvedValue, FieldError>> {
        Box::pin(async move {
            match info.field_name() {
                "increment" => Ok(ResolvedValue::leaf(
                    self.value.fetch_add(1, Ordering::SeqCst) + 1,
                )),
                "counter" => Ok(ResolvedValue::leaf(self.value.load(Ordering::SeqCst))),
                other => Err(FieldError::new(format!("unknown field {other}"))),
            }
        })
    }
}

const COUNTER_SDL: &str = "type Query { counter: Int }\n\
                           type Mutation { increment: Int counter: Int }";

#[test]
fn mutation_fields_run_in_document_order() {
    let schema = Arc::new(Schema::parse(COUNTER_SDL).unwrap());
    let value = Arc::new(AtomicI64::new(0));

    let document =
        Arc::new(ExecutableDocument::parse("mutation { a: increment b: increment counter }").unwrap());
    let response = Execution::new(schema.clone(), document).execute_blocking(Arc::new(Counter {
        root: "Mutation",
        value: value.clone(),
    }));
    assert_eq!(to_json(&response), r#"{"data":{"a":1,"b":2,"counter":2}}"#);

    let document = Arc::new(ExecutableDocument::parse("{ counter }").unwrap());
    let response = Execution::new(schema, document).execute_blocking(Arc::new(Counter {
        root: "Query",
        value,
    }));
    assert_eq!(to_json(&response), r#"{"data":{"counter":2}}"#);
}

#[test]
fn repeated_runs_serialize_identically() {
    let sdl = "type Query { name: String friend: Query nums: [Int] }";
    let query = "{ name nums friend { name nums } }";
    let data = r#"{"name": "a", "nums": [1, 2], "friend": {"name": "b", "nums": []}}"#;
    let first = to_json(&execute_json(sdl, query, data));
    let second = to_json(&execute_json(sdl, query, data));
    assert_eq!(first, second);
}

struct Trace {
    events: Mutex<Vec<String>>,
}

impl FieldHook for Trace {
    fn on_field_start(&self, info: &ResolveInfo) {
        self.events
            .lock()
            .unwrap()
            .push(format!("start {}", info.field_name()));
    }

    fn on_field_end(&self, info: &ResolveInfo, outcome: Result<(), &FieldError>) {
        let verdict = if outcome.is_ok() { "ok" } else { "err" };
        self.events
            .lock()
            .unwrap()
            .push(format!("end {} {verdict}", info.field_name()));
    }
}

#[test]
fn hooks_observe_each_field() {
    let schema = Arc::new(Schema::parse("type Query { hello: String goodbye: String }").unwrap());
    let document = Arc::new(ExecutableDocument::parse("{ hello goodbye }").unwrap());
    let root = Arc::new(JsonObject::new(
        "Query",
        serde_json::from_str(r#"{"hello": "hi", "goodbye": "bye"}"#).unwrap(),
    ));
    let trace = Arc::new(Trace {
        events: Mutex::new(Vec::new()),
    });
    let response = Execution::new(schema, document)
        .hook(trace.clone())
        .execute_blocking(root);
    assert!(response.errors.is_empty());
    assert_eq!(
        *trace.events.lock().unwrap(),
        ["start hello", "end hello ok", "start goodbye", "end goodbye ok"],
    );
}
