//! End-to-end registration against the recording web server.

use http::StatusCode;
use restmount::prelude::*;
use restmount_test::{RecordingServer, TestRequest};

mod controllers {
    pub mod section1 {
        use restmount::prelude::*;

        /// Lives under `controllers::section1`, so it mounts at `/section1`.
        pub struct Reports;

        impl Controller for Reports {
            fn methods(&self) -> MethodSet {
                MethodSet::from([Method::Get])
            }

            fn get(&self, route: &mut Route) -> CapabilityResult {
                route.set_handler(handler(|_| response::text("reports")));
                Ok(())
            }
        }
    }
}

struct Feed;

impl Controller for Feed {
    fn methods(&self) -> MethodSet {
        MethodSet::from([Method::Get])
    }

    fn get(&self, route: &mut Route) -> CapabilityResult {
        route
            .set_handler(handler(|_| response::text("feed")))
            .set_summary("Latest entries");
        Ok(())
    }
}

struct Users;

impl Controller for Users {
    fn methods(&self) -> MethodSet {
        MethodSet::from([Method::Get, Method::Post])
    }

    fn get(&self, route: &mut Route) -> CapabilityResult {
        route
            .set_handler(handler(|ctx| {
                let id = ctx
                    .param("id")
                    .ok_or_else(|| HandlerError::bad_request("missing id"))?;
                response::json(&serde_json::json!({ "id": id }))
            }))
            .path_param("id", "User id")
            .set_response("200", Response::new("The user").with_schema(Schema::reference("User")));
        Ok(())
    }

    fn post(&self, route: &mut Route) -> CapabilityResult {
        route
            .set_handler(handler(|ctx| {
                let body: serde_json::Value = ctx.json()?;
                response::json_with_status(StatusCode::CREATED, &body)
            }))
            .set_body("User", "User to create")
            .consumes(["application/json"]);
        Ok(())
    }
}

fn start(server: &mut Server<RecordingServer>) {
    server.start().expect("server starts");
}

#[test]
fn suffix_spliced_into_explicit_path() {
    let mut server = Server::new(RecordingServer::new(), ServerConfig::default());
    server
        .register(Feed)
        .set_path("/section1/1_2")
        .set_suffix([Suffix::new(0, "v1")]);
    start(&mut server);

    assert_eq!(
        server.web_server().routes(),
        vec![(Method::Get, "/v1/section1/1_2/feed")]
    );

    let doc = server.document().expect("document frozen");
    assert_eq!(doc.paths.len(), 1);
    let path_item = &doc.paths["/v1/section1/1_2/feed"];
    assert_eq!(path_item.len(), 1);
    let operation = &path_item["get"];
    assert_eq!(operation.summary.as_deref(), Some("Latest entries"));
    // The literal suffix is documented as a required path parameter.
    assert_eq!(operation.parameters.len(), 1);
    assert_eq!(operation.parameters[0].name, "v1");
    assert!(operation.parameters[0].required);
}

#[test]
fn module_path_becomes_mount_path() {
    let mut server = Server::new(RecordingServer::new(), ServerConfig::default());
    server.register(controllers::section1::Reports);
    start(&mut server);

    assert_eq!(
        server.web_server().routes(),
        vec![(Method::Get, "/section1/reports")]
    );
    assert_eq!(server.document().unwrap().tags[0].name, "section1/reports");
}

#[test]
fn only_implemented_verbs_are_bound() {
    let mut server = Server::new(RecordingServer::new(), ServerConfig::default());
    server.register(Users).set_path("/api");
    start(&mut server);

    let routes = server.web_server().routes();
    assert_eq!(
        routes,
        vec![(Method::Get, "/api/users/:id"), (Method::Post, "/api/users")]
    );
    assert!(routes
        .iter()
        .all(|(method, _)| !matches!(method, Method::Put | Method::Delete)));
}

#[test]
fn requests_reach_handlers_with_params() {
    let mut server = Server::new(RecordingServer::new(), ServerConfig::default());
    server.register(Users).set_path("/api");
    start(&mut server);

    let response = server
        .web_server()
        .dispatch(TestRequest::get("/api/users/42").build().unwrap())
        .unwrap();
    response.assert_status(StatusCode::OK);
    assert_eq!(response.json::<serde_json::Value>().unwrap()["id"], "42");

    let response = server
        .web_server()
        .dispatch(
            TestRequest::post("/api/users")
                .json(&serde_json::json!({ "name": "Alice" }))
                .build()
                .unwrap(),
        )
        .unwrap();
    response.assert_status(StatusCode::CREATED);

    let response = server
        .web_server()
        .dispatch(TestRequest::post("/api/users").body("not json").build().unwrap())
        .unwrap();
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[test]
fn model_references_resolve_against_definitions() {
    let user = NamedModel::new(
        "User",
        Schema::object()
            .property("id", Schema::integer().with_format("int64"))
            .property("name", Schema::string())
            .required_property("id"),
    );
    let mut server = Server::new(RecordingServer::new(), ServerConfig::default());
    server.set_definitions(&[&user, &user]);
    server.register(Users).set_path("/api");
    start(&mut server);

    let doc = server.document().unwrap();
    assert_eq!(doc.definitions.len(), 1);

    let get = &doc.paths["/api/users/{id}"]["get"];
    assert_eq!(
        get.responses["200"].schema.as_ref().unwrap().reference.as_deref(),
        Some("#/definitions/User")
    );
    let post = &doc.paths["/api/users"]["post"];
    let body = post.parameters.iter().find(|p| p.name == "body").unwrap();
    assert_eq!(
        body.schema.as_ref().unwrap().reference.as_deref(),
        Some("#/definitions/User")
    );
}

#[test]
fn unknown_models_stay_bare() {
    let mut server = Server::new(RecordingServer::new(), ServerConfig::default());
    server.register(Users).set_path("/api");
    start(&mut server);

    let get = &server.document().unwrap().paths["/api/users/{id}"]["get"];
    assert_eq!(
        get.responses["200"].schema.as_ref().unwrap().reference.as_deref(),
        Some("User")
    );
}

#[test]
fn base_path_gates_documentation_only() {
    let mut config = ServerConfig::builder();
    let mut docs = restmount::config::Settings::default().docs;
    docs.base_path = "/api".to_string();
    config = config.docs(docs);

    let mut server = Server::new(RecordingServer::new(), config.build());
    server.register(Users).set_path("/api");
    server.register(Feed).set_path("/internal");
    start(&mut server);

    assert_eq!(server.web_server().routes().len(), 3);
    let doc = server.document().unwrap();
    assert_eq!(doc.base_path, "/api");
    let keys: Vec<_> = doc.paths.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["/users/{id}", "/users"]);
}

#[test]
fn hidden_controller_is_bound_but_undocumented() {
    let mut server = Server::new(RecordingServer::new(), ServerConfig::default());
    server.register(Feed).hide();
    start(&mut server);

    assert_eq!(server.web_server().routes(), vec![(Method::Get, "/feed")]);
    let doc = server.document().unwrap();
    assert!(doc.paths.is_empty());
    assert!(doc.tags.is_empty());
}

#[test]
fn docs_controller_serves_document() {
    let mut server = Server::new(RecordingServer::new(), ServerConfig::default());
    server.register(Users).set_path("/api").set_description("User accounts");
    server
        .register(ApiDocsController)
        .set_path("/")
        .set_name("swagger.json")
        .hide();
    start(&mut server);

    let response = server
        .web_server()
        .dispatch(TestRequest::get("/swagger.json").build().unwrap())
        .unwrap();
    response.assert_status(StatusCode::OK);
    assert_eq!(response.content_type(), Some("application/json"));

    let json: serde_json::Value = response.json().unwrap();
    assert_eq!(json["swagger"], "2.0");
    assert_eq!(json["host"], "localhost:8080");
    assert_eq!(json["schemes"], serde_json::json!(["http"]));
    assert!(json["paths"]["/api/users/{id}"]["get"].is_object());
    assert!(json["paths"].get("/swagger.json").is_none());
    assert_eq!(json["tags"][0]["name"], "api/users");
    assert_eq!(json["tags"][0]["description"], "User accounts");
}

#[test]
fn empty_param_alias_is_bound_not_documented() {
    struct Items;

    impl Controller for Items {
        fn methods(&self) -> MethodSet {
            MethodSet::from([Method::Get])
        }

        fn get(&self, route: &mut Route) -> CapabilityResult {
            route
                .set_handler(handler(|ctx| {
                    response::text(ctx.param("id").unwrap_or("all").to_string())
                }))
                .path_param("id", "Item id")
                .empty_param();
            Ok(())
        }
    }

    let mut server = Server::new(RecordingServer::new(), ServerConfig::default());
    server.register(Items);
    start(&mut server);

    assert_eq!(
        server.web_server().routes(),
        vec![(Method::Get, "/items/:id"), (Method::Get, "/items")]
    );
    let doc = server.document().unwrap();
    assert_eq!(doc.paths.keys().collect::<Vec<_>>(), vec!["/items/{id}"]);

    let all = server
        .web_server()
        .dispatch(TestRequest::get("/items").build().unwrap())
        .unwrap();
    assert_eq!(all.text().unwrap(), "all");
}

#[test]
fn registration_is_deterministic() {
    fn build() -> Vec<u8> {
        let mut server = Server::new(RecordingServer::new(), ServerConfig::default());
        server.register(Users).set_path("/api");
        server.register(Feed).set_suffix([Suffix::new(0, "v2")]);
        server.start().unwrap();
        server.document().unwrap().to_json().unwrap()
    }

    assert_eq!(build(), build());
}
