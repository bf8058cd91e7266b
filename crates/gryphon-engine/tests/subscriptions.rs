use futures::future::BoxFuture;
use futures::StreamExt;
use gryphon_engine::ExecutableDocument;
use gryphon_engine::Execution;
use gryphon_engine::FieldError;
use gryphon_engine::ResolveInfo;
use gryphon_engine::ResolvedValue;
use gryphon_engine::Resolver;
use gryphon_engine::Schema;
use gryphon_engine::SourceStream;
use gryphon_engine::TokioExecutor;
use pretty_assertions::assert_eq;
use std::sync::Arc;

const SDL: &str = "type Query { unused: Int }\n\
                   type Subscription { tick: Int }";

struct Ticker;

impl Resolver for Ticker {
    fn type_name(&self) -> &str {
        "Subscription"
    }

    fn resolve_field<'a>(
        &'a self,
        info: &'a ResolveInfo,
    ) -> BoxFuture<'a, Result<ResolvedValue, FieldError>> {
        let name = info.field_name().to_owned();
        Box::pin(async move { Err(FieldError::new(format!("{name} is not resolvable here"))) })
    }

    fn resolve_stream(&self, _info: &ResolveInfo) -> Result<SourceStream, FieldError> {
        Ok(Box::pin(futures::stream::iter(vec![
            Ok(ResolvedValue::leaf(1)),
            Err(FieldError::new("tick failed")),
            Ok(ResolvedValue::leaf(3)),
        ])))
    }
}

#[tokio::test]
async fn each_event_becomes_a_response() {
    let schema = Arc::new(Schema::parse(SDL).unwrap());
    let document = Arc::new(ExecutableDocument::parse("subscription { tick }").unwrap());
    let stream = Execution::new(schema, document)
        .executor(Arc::new(TokioExecutor::new()))
        .subscribe(Arc::new(Ticker))
        .unwrap();
    let responses: Vec<String> = stream
        .map(|response| serde_json::to_string(&response).unwrap())
        .collect()
        .await;
    assert_eq!(
        responses,
        [
            r#"{"data":{"tick":1}}"#,
            // The failed event nulls the field and reports the error.
            r#"{"errors":[{"message":"tick failed","locations":[{"line":1,"column":16}],"path":["tick"]}],"data":{"tick":null}}"#,
            // Errors do not leak into the next event.
            r#"{"data":{"tick":3}}"#,
        ],
    );
}

#[test]
fn blocking_strategy_rejects_subscriptions() {
    let schema = Arc::new(Schema::parse(SDL).unwrap());
    let document = Arc::new(ExecutableDocument::parse("subscription { tick }").unwrap());
    let response = Execution::new(schema, document)
        .subscribe(Arc::new(Ticker))
        .err().unwrap();
    assert_eq!(
        response.errors[0].message,
        "The configured executor does not support subscriptions"
    );
    assert_eq!(response.data, Some(gryphon_engine::JsonValue::Null));
}

#[tokio::test]
async fn subscriptions_require_one_root_field() {
    let schema = Arc::new(Schema::parse(SDL).unwrap());
    let document =
        Arc::new(ExecutableDocument::parse("subscription { a: tick b: tick }").unwrap());
    let response = Execution::new(schema, document)
        .executor(Arc::new(TokioExecutor::new()))
        .subscribe(Arc::new(Ticker))
        .err().unwrap();
    assert_eq!(
        response.errors[0].message,
        "Subscriptions must have exactly one root field"
    );
}

#[tokio::test]
async fn subscription_operations_are_rejected_by_execute() {
    let schema = Arc::new(Schema::parse(SDL).unwrap());
    let document = Arc::new(ExecutableDocument::parse("subscription { tick }").unwrap());
    let response = Execution::new(schema, document)
        .executor(Arc::new(TokioExecutor::new()))
        .execute(Arc::new(Ticker))
        .await;
    assert_eq!(
        response.errors[0].message,
        "Subscription operations must be executed through subscribe"
    );
}

struct NoStream;

impl Resolver for NoStream {
    fn type_name(&self) -> &str {
        "Subscription"
    }

    fn resolve_field<'a>(
        &'a self,
        _info: &'a ResolveInfo,
    ) -> BoxFuture<'a, Result<ResolvedValue, FieldError>> {
        Box::pin(async { Ok(ResolvedValue::null()) })
    }
}

#[tokio::test]
async fn missing_source_stream_is_a_request_error() {
    let schema = Arc::new(Schema::parse(SDL).unwrap());
    let document = Arc::new(ExecutableDocument::parse("subscription { tick }").unwrap());
    let response = Execution::new(schema, document)
        .executor(Arc::new(TokioExecutor::new()))
        .subscribe(Arc::new(NoStream))
        .err().unwrap();
    assert_eq!(
        response.errors[0].message,
        r#"Subscription field "tick" did not provide a source stream"#
    );
}
