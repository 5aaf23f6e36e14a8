//! Authorization wiring through finalized handlers.

use http::StatusCode;
use restmount::prelude::*;
use restmount_test::{RecordingServer, TestRequest};

struct Reports;

impl Controller for Reports {
    fn methods(&self) -> MethodSet {
        MethodSet::from([Method::Get, Method::Delete])
    }

    fn get(&self, route: &mut Route) -> CapabilityResult {
        route.set_handler(handler(|ctx| {
            let user = ctx.identity().map(Identity::log_id).unwrap_or_default();
            response::text(user)
        }));
        Ok(())
    }

    fn delete(&self, route: &mut Route) -> CapabilityResult {
        route
            .set_handler(handler(|_| response::status(StatusCode::NO_CONTENT)))
            .permission();
        Ok(())
    }
}

struct Health;

impl Controller for Health {
    fn methods(&self) -> MethodSet {
        MethodSet::from([Method::Get])
    }

    fn get(&self, route: &mut Route) -> CapabilityResult {
        route
            .set_handler(handler(|_| response::text("ok")))
            .clear_security();
        Ok(())
    }
}

fn basic_server() -> Server<RecordingServer> {
    let config = ServerConfig::builder()
        .authorization(
            Authorization::new()
                .all_routes(AuthScheme::Basic)
                .basic(BasicAuth::new(|user, pass| pass == "secret" && !user.is_empty())),
        )
        .permission(Permission::new(|user, _path| user == r"CORP\admin"))
        .build();
    let mut server = Server::new(RecordingServer::new(), config);
    server.register(Reports);
    server.register(Health);
    server.start().unwrap();
    server
}

#[test]
fn global_scheme_protects_routes() {
    let server = basic_server();

    let response = server
        .web_server()
        .dispatch(TestRequest::get("/reports").build().unwrap())
        .unwrap();
    response.assert_status(StatusCode::UNAUTHORIZED);
    assert!(response
        .header_str("www-authenticate")
        .unwrap()
        .starts_with("Basic realm="));

    let response = server
        .web_server()
        .dispatch(TestRequest::get("/reports").basic_auth("alice", "secret").build().unwrap())
        .unwrap();
    response.assert_status(StatusCode::OK);
    assert_eq!(response.text().unwrap(), "Basic:alice");
}

#[test]
fn cleared_security_is_public() {
    let server = basic_server();
    let response = server
        .web_server()
        .dispatch(TestRequest::get("/health").build().unwrap())
        .unwrap();
    response.assert_status(StatusCode::OK);

    let doc = server.document().unwrap();
    assert!(doc.paths["/health"]["get"].security.is_empty());
    assert_eq!(
        doc.paths["/reports"]["get"].security_schemes().collect::<Vec<_>>(),
        vec!["Basic"]
    );
    assert_eq!(
        serde_json::to_value(&doc.security_definitions["Basic"]).unwrap(),
        serde_json::json!({ "type": "basic" })
    );
}

#[test]
fn permission_checked_route_forbids_other_users() {
    let server = basic_server();

    let response = server
        .web_server()
        .dispatch(TestRequest::delete("/reports").basic_auth("alice", "secret").build().unwrap())
        .unwrap();
    response.assert_status(StatusCode::FORBIDDEN);

    let response = server
        .web_server()
        .dispatch(
            TestRequest::delete("/reports")
                .basic_auth(r"CORP\admin", "secret")
                .build()
                .unwrap(),
        )
        .unwrap();
    response.assert_status(StatusCode::NO_CONTENT);
}

#[test]
fn api_key_in_query_with_unauthorized_hook() {
    let config = ServerConfig::builder()
        .authorization(
            Authorization::new()
                .all_routes(AuthScheme::ApiKey)
                .api_key(ApiKeyAuth::new("token", ApiKeyLocation::Query, |key| {
                    (key == "abc").then(|| "svc".to_string())
                }))
                .on_unauthorized(|_, status| {
                    response::json_with_status(status, &serde_json::json!({ "denied": status.as_u16() }))
                }),
        )
        .build();
    let mut server = Server::new(RecordingServer::new(), config);
    server.register(Reports);
    server.start().unwrap();

    let response = server
        .web_server()
        .dispatch(TestRequest::get("/reports").query("token", "abc").build().unwrap())
        .unwrap();
    response.assert_status(StatusCode::OK);
    assert_eq!(response.text().unwrap(), "ApiKey:svc");

    let response = server
        .web_server()
        .dispatch(TestRequest::get("/reports").query("token", "nope").build().unwrap())
        .unwrap();
    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(response.json::<serde_json::Value>().unwrap()["denied"], 401);

    let definition = serde_json::to_value(&server.document().unwrap().security_definitions["ApiKey"]).unwrap();
    assert_eq!(
        definition,
        serde_json::json!({ "type": "apiKey", "name": "token", "in": "query" })
    );
}

#[test]
fn oauth2_bearer_and_documented_flow() {
    struct Scoped;

    impl Controller for Scoped {
        fn methods(&self) -> MethodSet {
            MethodSet::from([Method::Get])
        }

        fn get(&self, route: &mut Route) -> CapabilityResult {
            route
                .set_handler(handler(|_| response::text("scoped")))
                .set_security_scopes(AuthScheme::OAuth2, ["read"]);
            Ok(())
        }
    }

    let config = ServerConfig::builder()
        .authorization(Authorization::new().oauth2(
            OAuth2Auth::new(OAuth2Flow::Implicit, |token| (token == "t").then(|| "carol".to_string()))
                .authorization_url("https://auth.example.com/authorize")
                .scope("read", "Read access"),
        ))
        .build();
    let mut server = Server::new(RecordingServer::new(), config);
    server.register(Scoped);
    server.start().unwrap();

    let ok = server
        .web_server()
        .dispatch(TestRequest::get("/scoped").bearer_token("t").build().unwrap())
        .unwrap();
    ok.assert_status(StatusCode::OK);

    let denied = server
        .web_server()
        .dispatch(TestRequest::get("/scoped").bearer_token("x").build().unwrap())
        .unwrap();
    denied.assert_status(StatusCode::UNAUTHORIZED);

    let doc = server.document().unwrap();
    assert_eq!(doc.paths["/scoped"]["get"].security[0]["OAuth2"], vec!["read".to_string()]);
    let definition = serde_json::to_value(&doc.security_definitions["OAuth2"]).unwrap();
    assert_eq!(definition["flow"], "implicit");
    assert_eq!(definition["authorizationUrl"], "https://auth.example.com/authorize");
}

#[test]
fn required_scheme_without_verifier_rejects() {
    let config = ServerConfig::builder()
        .authorization(Authorization::new().all_routes(AuthScheme::Basic))
        .build();
    let mut server = Server::new(RecordingServer::new(), config);
    server.register(Reports);
    server.start().unwrap();

    let response = server
        .web_server()
        .dispatch(TestRequest::get("/reports").basic_auth("a", "b").build().unwrap())
        .unwrap();
    response.assert_status(StatusCode::UNAUTHORIZED);
    assert!(server.document().unwrap().security_definitions.contains_key("Basic"));
}
