use futures::future::BoxFuture;
use gryphon_engine::ExecutableDocument;
use gryphon_engine::Execution;
use gryphon_engine::FieldError;
use gryphon_engine::JsonObject;
use gryphon_engine::JsonValue;
use gryphon_engine::ResolveInfo;
use gryphon_engine::ResolvedValue;
use gryphon_engine::Resolver;
use gryphon_engine::Schema;
use gryphon_engine::ThreadPoolExecutor;
use gryphon_engine::TokioExecutor;
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;

const SDL: &str = "type Query { name: String friend: Query nums: [Int] }";
const QUERY: &str = "{ name nums friend { name friend { nums } } }";
const DATA: &str = r#"{
    "name": "a",
    "nums": [1, 2, 3],
    "friend": {"name": "b", "friend": {"nums": []}}
}"#;

fn fixture() -> (Arc<Schema>, Arc<ExecutableDocument>, Arc<JsonObject>) {
    let schema = Arc::new(Schema::parse(SDL).unwrap());
    let document = Arc::new(ExecutableDocument::parse(QUERY).unwrap());
    let root = Arc::new(JsonObject::new(
        "Query",
        serde_json::from_str(DATA).unwrap(),
    ));
    (schema, document, root)
}

#[test]
fn strategies_agree_on_the_response() {
    let (schema, document, root) = fixture();
    let blocking =
        Execution::new(schema.clone(), document.clone()).execute_blocking(root.clone());

    // Pool results arrive through channels, so this strategy needs a real
    // (if minimal) async driver rather than a single poll.
    let pooled = futures::executor::block_on(
        Execution::new(schema.clone(), document.clone())
            .executor(Arc::new(ThreadPoolExecutor::new(2).unwrap()))
            .execute(root.clone()),
    );
    assert_eq!(
        serde_json::to_string(&blocking).unwrap(),
        serde_json::to_string(&pooled).unwrap(),
    );

    let runtime = tokio::runtime::Runtime::new().unwrap();
    // Built from the handle: there is no ambient runtime on this thread.
    let executor = Arc::new(TokioExecutor::with_handle(runtime.handle().clone()));
    let spawned = runtime.block_on(
        Execution::new(schema, document)
            .executor(executor)
            .execute(root),
    );
    assert_eq!(
        serde_json::to_string(&blocking).unwrap(),
        serde_json::to_string(&spawned).unwrap(),
    );
}

struct Stuck;

impl Resolver for Stuck {
    fn type_name(&self) -> &str {
        "Query"
    }

    fn resolve_field<'a>(
        &'a self,
        _info: &'a ResolveInfo,
    ) -> BoxFuture<'a, Result<ResolvedValue, FieldError>> {
        Box::pin(futures::future::pending())
    }
}

#[test]
fn blocking_execution_rejects_a_pending_resolver() {
    let schema = Arc::new(Schema::parse("type Query { name: String }").unwrap());
    let document = Arc::new(ExecutableDocument::parse("{ name }").unwrap());
    let response = Execution::new(schema, document).execute_blocking(Arc::new(Stuck));
    assert_eq!(response.data, Some(JsonValue::Null));
    assert_eq!(
        response.errors[0].message,
        "Execution did not complete synchronously"
    );
}

struct Slow;

impl Resolver for Slow {
    fn type_name(&self) -> &str {
        "Query"
    }

    fn resolve_field<'a>(
        &'a self,
        _info: &'a ResolveInfo,
    ) -> BoxFuture<'a, Result<ResolvedValue, FieldError>> {
        Box::pin(async {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(ResolvedValue::leaf("late"))
        })
    }
}

#[tokio::test]
async fn timeout_discards_partial_results() {
    let schema = Arc::new(Schema::parse("type Query { name: String }").unwrap());
    let document = Arc::new(ExecutableDocument::parse("{ name }").unwrap());
    let response = Execution::new(schema, document)
        .executor(Arc::new(TokioExecutor::new()))
        .timeout(Duration::from_millis(10))
        .execute(Arc::new(Slow))
        .await;
    assert_eq!(response.data, Some(JsonValue::Null));
    assert_eq!(response.errors[0].message, "Execution timed out after 10ms");
}

struct BlockingWork;

impl Resolver for BlockingWork {
    fn type_name(&self) -> &str {
        "Query"
    }

    fn resolve_field<'a>(
        &'a self,
        _info: &'a ResolveInfo,
    ) -> BoxFuture<'a, Result<ResolvedValue, FieldError>> {
        Box::pin(async {
            // Stands in for a synchronous database call.
            std::thread::sleep(Duration::from_millis(5));
            Ok(ResolvedValue::leaf("done"))
        })
    }

    fn is_blocking(&self) -> bool {
        true
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn blocking_resolvers_offload_to_worker_threads() {
    let schema = Arc::new(Schema::parse("type Query { a: String b: String }").unwrap());
    let document = Arc::new(ExecutableDocument::parse("{ a b }").unwrap());
    let response = Execution::new(schema, document)
        .executor(Arc::new(TokioExecutor::new()))
        .execute(Arc::new(BlockingWork))
        .await;
    assert_eq!(
        serde_json::to_string(&response).unwrap(),
        r#"{"data":{"a":"done","b":"done"}}"#,
    );
}
