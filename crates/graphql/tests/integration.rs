//! Integration tests for the methodgraph-graphql crate.
#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use {
    async_graphql::Request,
    methodgraph_config::EngineConfig,
    methodgraph_graphql::{MethodSchema, ObjectDefinition, ObjectTypeRegistry, SchemaBuilder},
    methodgraph_service_traits::{
        AccessControl, AccessRequest, CallOptions, Invocation, ModelRuntime, RequestContext,
        ServiceResult,
    },
    serde_json::{Value, json},
};

// ── Mock model runtime ──────────────────────────────────────────────────────

/// Model runtime that records invocations and returns preset responses.
struct MockModel {
    name: String,
    methods: Vec<Value>,
    responses: Mutex<HashMap<String, Result<Value, String>>>,
    calls: Mutex<Vec<Invocation>>,
}

impl MockModel {
    fn new(name: &str, methods: Vec<Value>) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            methods,
            responses: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn set_response(&self, method: &str, response: Value) {
        self.responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(method.to_string(), Ok(response));
    }

    fn set_error(&self, method: &str, message: &str) {
        self.responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(method.to_string(), Err(message.to_string()));
    }

    fn call_count(&self) -> usize {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    fn last_call(&self) -> Option<Invocation> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .last()
            .cloned()
    }
}

#[async_trait::async_trait]
impl ModelRuntime for MockModel {
    fn model_name(&self) -> &str {
        &self.name
    }

    fn list_methods(&self) -> Vec<Value> {
        self.methods.clone()
    }

    async fn invoke(&self, invocation: Invocation) -> ServiceResult {
        let method = invocation.method.clone();
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(invocation);
        let responses = self.responses.lock().unwrap_or_else(|e| e.into_inner());
        match responses.get(&method) {
            Some(Ok(v)) => Ok(v.clone()),
            Some(Err(message)) => Err(message.as_str().into()),
            None => Err(format!("no mock response for {method}").into()),
        }
    }
}

// ── Mock access control ─────────────────────────────────────────────────────

/// Denies the listed methods and records every request it sees.
struct MockAccess {
    denied: Vec<String>,
    requests: Mutex<Vec<AccessRequest>>,
}

impl MockAccess {
    fn denying(methods: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            denied: methods.iter().map(|m| m.to_string()).collect(),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn last_request(&self) -> Option<AccessRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .last()
            .cloned()
    }
}

#[async_trait::async_trait]
impl AccessControl for MockAccess {
    async fn check_access(&self, request: &AccessRequest) -> ServiceResult<()> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(request.clone());
        if self.denied.contains(&request.method) {
            return Err(format!("Authorization Required for {}", request.method).into());
        }
        Ok(())
    }
}

// ── Fixtures ────────────────────────────────────────────────────────────────

fn widget_methods() -> Vec<Value> {
    vec![
        json!({
            "name": "find",
            "accessType": "READ",
            "http": { "verb": "get", "path": "/" },
            "accepts": [{ "arg": "filter", "type": "object" }],
            "returns": [{ "arg": "data", "type": ["Widget"], "root": true }],
            "description": "Find all instances of the model.",
        }),
        json!({
            "name": "findById",
            "accessType": "READ",
            "http": { "verb": "get", "path": "/:id" },
            "accepts": [
                { "arg": "id", "type": "any", "http": { "source": "path" } },
                { "arg": "filter", "type": "object" },
            ],
            "returns": [{ "arg": "data", "type": "Widget", "root": true }],
        }),
        json!({
            "name": "count",
            "accessType": "READ",
            "http": { "verb": "get", "path": "/count" },
            "accepts": [{ "arg": "where", "type": "object" }],
            "returns": [{ "arg": "count", "type": "number" }],
        }),
        json!({
            "name": "greet",
            "http": { "verb": "get", "path": "/greet" },
            "accepts": [
                { "arg": "a", "type": "string" },
                { "arg": "b", "type": "number" },
                { "arg": "c", "type": "boolean" },
                { "arg": "req", "type": "object", "http": { "source": "req" } },
            ],
            "returns": [{ "arg": "greeting", "type": "string" }],
        }),
        json!({
            "name": "create",
            "accessType": "WRITE",
            "http": { "verb": "post", "path": "/" },
            "accepts": [{ "arg": "data", "type": "Widget" }],
            "returns": [{ "arg": "data", "type": "Widget", "root": true }],
        }),
        json!({
            "name": "attach",
            "http": { "verb": "post", "path": "/attach" },
            "accepts": [{ "arg": "file", "type": "Blob" }],
            "returns": [{ "arg": "receipt", "type": "Blob" }],
        }),
        json!({
            "name": "destroyById",
            "accessType": "WRITE",
            "http": { "verb": "del", "path": "/:id" },
            "accepts": [{ "arg": "id", "type": "any" }],
        }),
        json!({
            "name": "createChangeStream",
            "http": [{ "verb": "post" }, { "verb": "get" }],
        }),
        json!({
            "name": "updateAttributes",
            "isStatic": false,
            "accessType": "WRITE",
            "http": { "verb": "put", "path": "/" },
        }),
        json!({ "name": "unmounted" }),
        json!({ "http": { "verb": "get" } }),
    ]
}

fn account_methods() -> Vec<Value> {
    vec![json!({
        "name": "login",
        "http": { "verb": "post", "path": "/login" },
        "accepts": [
            { "arg": "credentials", "type": "object" },
            { "arg": "options", "type": "object", "http": "optionsFromRequest" },
        ],
        "returns": [{ "arg": "accessToken", "type": "object", "root": true }],
    })]
}

fn registry() -> ObjectTypeRegistry {
    ObjectTypeRegistry::default().with_object(
        ObjectDefinition::from_properties(
            "Widget",
            &json!({ "id": "number", "name": "string", "tags": ["string"] }),
        )
        .expect("valid definition"),
    )
}

fn build_test_schema(
    widget: Arc<MockModel>,
    account: Arc<MockModel>,
    access: Arc<MockAccess>,
) -> MethodSchema {
    SchemaBuilder::new(EngineConfig::default())
        .with_registry(registry())
        .access_control(access)
        .model(widget)
        .model(account)
        .build()
        .expect("schema builds")
}

fn fixtures() -> (Arc<MockModel>, Arc<MockModel>, Arc<MockAccess>) {
    (
        MockModel::new("Widget", widget_methods()),
        MockModel::new("Account", account_methods()),
        MockAccess::denying(&[]),
    )
}

fn context() -> RequestContext {
    RequestContext::anonymous().with_access_token("tok-1")
}

async fn run(schema: &MethodSchema, query: &str, ctx: RequestContext) -> Value {
    let res = schema.schema.execute(Request::new(query).data(ctx)).await;
    serde_json::to_value(&res).expect("serialize response")
}

fn error_code(res: &Value) -> &Value {
    &res["errors"][0]["extensions"]["code"]
}

// ── Field catalogue ─────────────────────────────────────────────────────────

#[tokio::test]
async fn fields_are_named_model_then_method_and_split_by_verb() {
    let (widget, account, access) = fixtures();
    let schema = build_test_schema(widget, account, access);

    let queries: Vec<&str> = schema.queries.iter().map(|e| e.name.as_str()).collect();
    let mutations: Vec<&str> = schema.mutations.iter().map(|e| e.name.as_str()).collect();

    assert_eq!(
        queries,
        ["WidgetFind", "WidgetFindById", "WidgetCount", "WidgetGreet"]
    );
    assert_eq!(
        mutations,
        [
            "WidgetCreate",
            "WidgetAttach",
            "WidgetDestroyById",
            "AccountLogin"
        ]
    );
    assert_eq!(schema.entries().count(), 8);
}

#[tokio::test]
async fn excluded_instance_and_unmounted_methods_are_absent() {
    let (widget, account, access) = fixtures();
    let schema = build_test_schema(widget, account, access);

    for entry in schema.entries() {
        assert!(!entry.name.contains("Stream"), "{} exposed", entry.name);
        assert_ne!(entry.name, "WidgetUpdateAttributes");
        assert_ne!(entry.name, "WidgetUnmounted");
    }
}

#[tokio::test]
async fn introspection_lists_query_and_mutation_fields() {
    let (widget, account, access) = fixtures();
    let schema = build_test_schema(widget, account, access);

    let res = run(
        &schema,
        r#"{ __schema { queryType { fields { name } } mutationType { fields { name } } } }"#,
        context(),
    )
    .await;

    assert!(res.get("errors").is_none(), "errors: {res}");
    let names = |root: &str| -> Vec<String> {
        res["data"]["__schema"][root]["fields"]
            .as_array()
            .unwrap()
            .iter()
            .map(|f| f["name"].as_str().unwrap().to_string())
            .collect()
    };
    assert!(names("queryType").contains(&"WidgetCount".to_string()));
    assert!(names("mutationType").contains(&"AccountLogin".to_string()));
    assert!(!names("queryType").contains(&"WidgetCreate".to_string()));
}

#[tokio::test]
async fn schema_without_mutations_has_no_mutation_root() {
    let widget = MockModel::new("Widget", vec![json!({
        "name": "count",
        "http": { "verb": "head" },
        "returns": [{ "arg": "count", "type": "number" }],
    })]);
    let schema = SchemaBuilder::new(EngineConfig::default())
        .model(widget)
        .build()
        .unwrap();

    assert!(schema.mutations.is_empty());
    let res = run(&schema, "{ __schema { mutationType { name } } }", context()).await;
    assert_eq!(res["data"]["__schema"]["mutationType"], Value::Null);
}

#[tokio::test]
async fn unregistered_types_fall_back_to_json() {
    let (widget, account, access) = fixtures();
    let schema = build_test_schema(widget, account, access);

    let res = run(
        &schema,
        r#"{ __type(name: "WidgetAttachInput") { inputFields { name type { name } } } }"#,
        context(),
    )
    .await;

    let fields = res["data"]["__type"]["inputFields"].as_array().unwrap();
    let file = fields.iter().find(|f| f["name"] == "file").unwrap();
    assert_eq!(file["type"]["name"], "JSON");

    let attach = schema
        .mutations
        .iter()
        .find(|e| e.name == "WidgetAttach")
        .unwrap();
    assert_eq!(attach.output_type.type_name(), "JSON");
}

// ── Query resolution ────────────────────────────────────────────────────────

#[tokio::test]
async fn object_result_resolves_registered_fields() {
    let (widget, account, access) = fixtures();
    widget.set_response(
        "findById",
        json!({ "id": 7, "name": "sprocket", "tags": ["a", "b"] }),
    );
    let schema = build_test_schema(widget.clone(), account, access.clone());

    let res = run(&schema, "{ WidgetFindById(id: 7) { id name tags } }", context()).await;

    assert!(res.get("errors").is_none(), "errors: {res}");
    assert_eq!(res["data"]["WidgetFindById"]["name"], "sprocket");
    assert_eq!(res["data"]["WidgetFindById"]["tags"], json!(["a", "b"]));

    let call = widget.last_call().expect("should have called");
    assert_eq!(call.method, "findById");
    assert_eq!(call.args, vec![Some(json!(7))]);
    assert_eq!(
        call.options,
        Some(CallOptions::Token {
            access_token: Some("tok-1".into())
        })
    );

    let request = access.last_request().expect("access checked");
    assert_eq!(request.model, "Widget");
    assert_eq!(request.method, "findById");
    assert_eq!(request.id, Some(json!(7)));
    assert_eq!(request.access_token.as_deref(), Some("tok-1"));
}

#[tokio::test]
async fn custom_method_keeps_placeholders_and_falsy_values() {
    let (widget, account, access) = fixtures();
    widget.set_response("greet", json!("hello"));
    let schema = build_test_schema(widget.clone(), account, access);

    let ctx = context().with_value("req", json!({ "ip": "10.0.0.1" }));
    let res = run(&schema, r#"{ WidgetGreet(a: "", b: 0, c: false) }"#, ctx).await;

    assert!(res.get("errors").is_none(), "errors: {res}");
    assert_eq!(res["data"]["WidgetGreet"], "hello");

    let call = widget.last_call().unwrap();
    assert_eq!(
        call.args,
        vec![
            None,
            Some(json!(0)),
            Some(json!(false)),
            Some(json!({ "ip": "10.0.0.1" })),
        ]
    );
    assert_eq!(call.options, None);
}

#[tokio::test]
async fn standard_method_drops_missing_arguments() {
    let (widget, account, access) = fixtures();
    widget.set_response("count", json!(3));
    let schema = build_test_schema(widget.clone(), account, access);

    let res = run(&schema, "{ WidgetCount }", context()).await;

    assert_eq!(res["data"]["WidgetCount"], 3);
    assert!(widget.last_call().unwrap().args.is_empty());
}

#[tokio::test]
async fn list_results_are_paginated_as_connections() {
    let (widget, account, access) = fixtures();
    widget.set_response(
        "find",
        json!([
            { "id": 1, "name": "a" },
            { "id": 2, "name": "b" },
            { "id": 3, "name": "c" },
        ]),
    );
    let schema = build_test_schema(widget.clone(), account, access);

    let res = run(
        &schema,
        r#"{ WidgetFind(filter: { where: { name: "x" } }, first: 2) {
            edges { cursor node { id name } }
            pageInfo { hasNextPage hasPreviousPage startCursor endCursor }
        } }"#,
        context(),
    )
    .await;

    assert!(res.get("errors").is_none(), "errors: {res}");
    let connection = &res["data"]["WidgetFind"];
    let edges = connection["edges"].as_array().unwrap();
    assert_eq!(edges.len(), 2);
    assert_eq!(edges[0]["node"]["name"], "a");
    assert_eq!(edges[1]["node"]["id"], 2);
    assert_eq!(connection["pageInfo"]["hasNextPage"], true);
    assert_eq!(connection["pageInfo"]["hasPreviousPage"], false);
    assert_eq!(connection["pageInfo"]["endCursor"], edges[1]["cursor"]);

    let call = widget.last_call().unwrap();
    assert_eq!(
        call.args,
        vec![Some(json!({ "where": { "name": "x" } }))],
        "pagination arguments are not forwarded"
    );
}

#[tokio::test]
async fn after_cursor_continues_the_page() {
    let (widget, account, access) = fixtures();
    widget.set_response("find", json!([{ "id": 1 }, { "id": 2 }, { "id": 3 }]));
    let schema = build_test_schema(widget, account, access);

    let first = run(
        &schema,
        "{ WidgetFind(first: 1) { edges { cursor } } }",
        context(),
    )
    .await;
    let cursor = first["data"]["WidgetFind"]["edges"][0]["cursor"]
        .as_str()
        .unwrap()
        .to_string();

    let query = format!(
        r#"{{ WidgetFind(after: "{cursor}") {{ edges {{ node {{ id }} }} pageInfo {{ hasPreviousPage }} }} }}"#
    );
    let res = run(&schema, &query, context()).await;
    let ids: Vec<&Value> = res["data"]["WidgetFind"]["edges"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| &e["node"]["id"])
        .collect();
    assert_eq!(ids, [&json!(2), &json!(3)]);
}

#[tokio::test]
async fn null_list_result_is_an_empty_connection() {
    let (widget, account, access) = fixtures();
    widget.set_response("find", Value::Null);
    let schema = build_test_schema(widget, account, access);

    let res = run(
        &schema,
        "{ WidgetFind { edges { cursor } pageInfo { hasNextPage startCursor } } }",
        context(),
    )
    .await;

    assert!(res.get("errors").is_none(), "errors: {res}");
    assert_eq!(res["data"]["WidgetFind"]["edges"], json!([]));
    assert_eq!(res["data"]["WidgetFind"]["pageInfo"]["startCursor"], Value::Null);
}

#[tokio::test]
async fn non_list_result_for_list_field_is_an_error() {
    let (widget, account, access) = fixtures();
    widget.set_response("find", json!({ "id": 1 }));
    let schema = build_test_schema(widget, account, access);

    let res = run(&schema, "{ WidgetFind { edges { cursor } } }", context()).await;

    assert_eq!(error_code(&res), "BAD_RESULT");
}

#[tokio::test]
async fn negative_page_size_is_rejected_before_the_call() {
    let (widget, account, access) = fixtures();
    widget.set_response("find", json!([]));
    let schema = build_test_schema(widget.clone(), account, access);

    let res = run(&schema, "{ WidgetFind(first: -1) { edges { cursor } } }", context()).await;

    assert_eq!(error_code(&res), "BAD_PAGINATION");
    assert_eq!(widget.call_count(), 0);
}

// ── Access control and errors ───────────────────────────────────────────────

#[tokio::test]
async fn denied_access_short_circuits_the_call() {
    let widget = MockModel::new("Widget", widget_methods());
    widget.set_response("count", json!(1));
    let account = MockModel::new("Account", account_methods());
    let schema = build_test_schema(widget.clone(), account, MockAccess::denying(&["count"]));

    let res = run(&schema, "{ WidgetCount }", context()).await;

    assert_eq!(error_code(&res), "ACCESS_DENIED");
    assert_eq!(
        res["errors"][0]["message"],
        "Authorization Required for count"
    );
    assert_eq!(widget.call_count(), 0);
}

#[tokio::test]
async fn service_error_message_is_passed_through() {
    let (widget, account, access) = fixtures();
    widget.set_error("count", "database offline");
    let schema = build_test_schema(widget, account, access);

    let res = run(&schema, "{ WidgetCount }", context()).await;

    assert_eq!(res["errors"][0]["message"], "database offline");
    assert_eq!(error_code(&res), "CALL_FAILED");
    assert_eq!(res["data"]["WidgetCount"], Value::Null);
}

#[tokio::test]
async fn missing_request_context_resolves_anonymously() {
    let (widget, account, access) = fixtures();
    widget.set_response("count", json!(0));
    let schema = build_test_schema(widget.clone(), account, access.clone());

    let res = schema.schema.execute(Request::new("{ WidgetCount }")).await;

    assert!(res.errors.is_empty(), "errors: {:?}", res.errors);
    assert_eq!(access.last_request().unwrap().access_token, None);
    assert_eq!(
        widget.last_call().unwrap().options,
        Some(CallOptions::Token { access_token: None })
    );
}

// ── Mutations ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn mutation_echoes_client_mutation_id() {
    let (widget, account, access) = fixtures();
    widget.set_response("create", json!({ "id": 9, "name": "gear" }));
    let schema = build_test_schema(widget.clone(), account, access);

    let res = run(
        &schema,
        r#"mutation {
            WidgetCreate(input: { clientMutationId: "m-1", data: { name: "gear" } }) {
                clientMutationId
                obj { id name }
            }
        }"#,
        context(),
    )
    .await;

    assert!(res.get("errors").is_none(), "errors: {res}");
    assert_eq!(res["data"]["WidgetCreate"]["clientMutationId"], "m-1");
    assert_eq!(res["data"]["WidgetCreate"]["obj"]["id"], 9);

    let call = widget.last_call().unwrap();
    assert_eq!(call.method, "create");
    assert_eq!(call.args, vec![Some(json!({ "name": "gear" }))]);
}

#[tokio::test]
async fn delete_alias_mounts_as_mutation() {
    let (widget, account, access) = fixtures();
    widget.set_response("destroyById", json!({ "count": 1 }));
    let schema = build_test_schema(widget.clone(), account, access);

    let res = run(
        &schema,
        r#"mutation { WidgetDestroyById(input: { id: "w-1" }) { clientMutationId obj } }"#,
        context(),
    )
    .await;

    assert!(res.get("errors").is_none(), "errors: {res}");
    assert_eq!(res["data"]["WidgetDestroyById"]["clientMutationId"], Value::Null);
    assert_eq!(res["data"]["WidgetDestroyById"]["obj"], json!({ "count": 1 }));
    assert_eq!(widget.last_call().unwrap().args, vec![Some(json!("w-1"))]);
}

#[tokio::test]
async fn login_is_called_with_the_empty_marker() {
    let (widget, account, access) = fixtures();
    account.set_response("login", json!({ "id": "token-xyz", "ttl": 1209600 }));
    let schema = build_test_schema(widget, account.clone(), access);

    let res = run(
        &schema,
        r#"mutation {
            AccountLogin(input: { credentials: { email: "a@b.c", password: "pw" } }) { obj }
        }"#,
        context(),
    )
    .await;

    assert!(res.get("errors").is_none(), "errors: {res}");
    assert_eq!(res["data"]["AccountLogin"]["obj"]["id"], "token-xyz");

    let call = account.last_call().unwrap();
    assert_eq!(
        call.args,
        vec![
            Some(json!({ "email": "a@b.c", "password": "pw" })),
            Some(json!("")),
        ]
    );
    assert_eq!(call.options, Some(CallOptions::Empty));
}

#[tokio::test]
async fn login_with_execute_access_type_suppresses_a_missing_token() {
    let widget = MockModel::new("Widget", widget_methods());
    let account = MockModel::new("Account", vec![json!({
        "name": "login",
        "accessType": "EXECUTE",
        "http": { "verb": "post", "path": "/login" },
        "accepts": [
            { "arg": "credentials", "type": "object" },
            { "arg": "include", "type": "string" },
            { "arg": "options", "type": "object", "http": "optionsFromRequest" },
        ],
        "returns": [{ "arg": "accessToken", "type": "object", "root": true }],
    })]);
    account.set_response("login", json!({ "id": "token-abc" }));
    let schema = build_test_schema(widget, account.clone(), MockAccess::denying(&[]));

    let res = run(
        &schema,
        r#"mutation { AccountLogin(input: { credentials: { email: "a@b.c" } }) { obj } }"#,
        RequestContext::anonymous(),
    )
    .await;

    assert!(res.get("errors").is_none(), "errors: {res}");
    let call = account.last_call().unwrap();
    assert_eq!(
        call.args,
        vec![Some(json!({ "email": "a@b.c" })), Some(json!(""))],
        "standard methods drop the missing include slot"
    );
    assert_eq!(call.options, Some(CallOptions::Empty));
}

// ── Naming and type collisions ──────────────────────────────────────────────

#[tokio::test]
async fn double_underscore_parameter_is_skipped() {
    let widget = MockModel::new("Widget", vec![
        json!({
            "name": "count",
            "http": { "verb": "get" },
            "returns": [{ "arg": "count", "type": "number" }],
        }),
        json!({
            "name": "weird",
            "http": { "verb": "get" },
            "accepts": [{ "arg": "__x", "type": "string" }, { "arg": "y", "type": "string" }],
            "returns": [{ "arg": "r", "type": "string" }],
        }),
    ]);
    widget.set_response("weird", json!("ok"));
    let schema = SchemaBuilder::new(EngineConfig::default())
        .model(widget.clone())
        .build()
        .expect("schema builds");

    let weird = schema
        .queries
        .iter()
        .find(|e| e.name == "WidgetWeird")
        .unwrap();
    let args: Vec<&str> = weird.input_shape.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(args, ["y"]);
    assert!(schema.queries.iter().any(|e| e.name == "WidgetCount"));

    let res = run(&schema, r#"{ WidgetWeird(y: "v") }"#, context()).await;
    assert_eq!(res["data"]["WidgetWeird"], "ok");
    assert_eq!(widget.last_call().unwrap().args, vec![Some(json!("v"))]);
}

#[tokio::test]
async fn object_named_like_a_generated_type_is_not_swapped() {
    let widget = MockModel::new("Widget", vec![
        json!({
            "name": "info",
            "http": { "verb": "get" },
            "returns": [{ "arg": "info", "type": "PageInfo" }],
        }),
        json!({
            "name": "find",
            "http": { "verb": "get" },
            "returns": [{ "arg": "data", "type": ["string"] }],
        }),
    ]);
    widget.set_response("info", json!({ "title": "home" }));
    let registry = ObjectTypeRegistry::default().with_object(
        ObjectDefinition::from_properties("PageInfo", &json!({ "title": "string" })).unwrap(),
    );
    let schema = SchemaBuilder::new(EngineConfig::default())
        .with_registry(registry)
        .model(widget)
        .build()
        .expect("schema builds");

    let info = schema.queries.iter().find(|e| e.name == "WidgetInfo").unwrap();
    assert_eq!(info.output_type.type_name(), "JSON");

    let res = run(&schema, "{ WidgetInfo }", context()).await;
    assert!(res.get("errors").is_none(), "errors: {res}");
    assert_eq!(res["data"]["WidgetInfo"], json!({ "title": "home" }));
}

#[tokio::test]
async fn mutation_whose_envelope_name_is_taken_is_skipped() {
    let widget = MockModel::new("Widget", vec![
        json!({
            "name": "count",
            "http": { "verb": "get" },
            "returns": [{ "arg": "count", "type": "number" }],
        }),
        json!({
            "name": "create",
            "http": { "verb": "post" },
            "returns": [{ "arg": "data", "type": "object" }],
        }),
        json!({
            "name": "remove",
            "http": { "verb": "delete" },
        }),
    ]);
    // `WidgetCreate` also defines the `WidgetCreateInput` input type.
    let registry = ObjectTypeRegistry::default().with_object(
        ObjectDefinition::from_properties("WidgetCreate", &json!({ "name": "string" })).unwrap(),
    );
    let schema = SchemaBuilder::new(EngineConfig::default())
        .with_registry(registry)
        .model(widget)
        .build()
        .expect("schema builds");

    let mutations: Vec<&str> = schema.mutations.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(mutations, ["WidgetRemove"]);

    let res = run(
        &schema,
        r#"{ __type(name: "WidgetCreateInput") { inputFields { name } } }"#,
        context(),
    )
    .await;
    assert_eq!(
        res["data"]["__type"]["inputFields"],
        json!([{ "name": "name" }])
    );
}

#[tokio::test]
async fn declared_client_mutation_id_does_not_replace_the_envelope_field() {
    let widget = MockModel::new("Widget", vec![
        json!({
            "name": "count",
            "http": { "verb": "get" },
            "returns": [{ "arg": "count", "type": "number" }],
        }),
        json!({
            "name": "tag",
            "http": { "verb": "post" },
            "accepts": [
                { "arg": "clientMutationId", "type": "number" },
                { "arg": "label", "type": "string" },
            ],
        }),
    ]);
    widget.set_response("tag", json!(true));
    let schema = SchemaBuilder::new(EngineConfig::default())
        .model(widget)
        .build()
        .expect("schema builds");

    let res = run(
        &schema,
        r#"{ __type(name: "WidgetTagInput") { inputFields { name type { name } } } }"#,
        context(),
    )
    .await;
    let fields = res["data"]["__type"]["inputFields"].as_array().unwrap();
    let ids: Vec<&Value> = fields
        .iter()
        .filter(|f| f["name"] == "clientMutationId")
        .collect();
    assert_eq!(ids.len(), 1);
    assert_eq!(ids[0]["type"]["name"], "String");

    let res = run(
        &schema,
        r#"mutation { WidgetTag(input: { clientMutationId: "m-7", label: "red" }) { clientMutationId obj } }"#,
        context(),
    )
    .await;
    assert!(res.get("errors").is_none(), "errors: {res}");
    assert_eq!(res["data"]["WidgetTag"]["clientMutationId"], "m-7");
}

#[tokio::test]
async fn mutation_only_models_still_build() {
    let widget = MockModel::new("Widget", vec![json!({
        "name": "create",
        "http": { "verb": "post" },
        "accepts": [{ "arg": "name", "type": "string" }],
    })]);
    widget.set_response("create", json!({ "id": 1 }));
    let schema = SchemaBuilder::new(EngineConfig::default())
        .model(widget.clone())
        .build()
        .expect("schema builds");

    assert!(schema.queries.is_empty());
    let res = run(&schema, "{ _empty }", context()).await;
    assert!(res.get("errors").is_none(), "errors: {res}");
    assert_eq!(res["data"]["_empty"], Value::Null);

    let res = run(
        &schema,
        r#"mutation { WidgetCreate(input: { name: "w" }) { obj } }"#,
        context(),
    )
    .await;
    assert_eq!(res["data"]["WidgetCreate"]["obj"], json!({ "id": 1 }));
    assert_eq!(widget.last_call().unwrap().args, vec![Some(json!("w"))]);
}
