//! `test-utils` is used for testing `poeapi-lib`.
//! This crate does not depend on `poeapi-lib`, else we would get a dependency cycle.
//! Macros are used instead, so that the importer is responsible for providing the dependencies.

/// Create a mock web server, which responds with a predefined status when
/// handling any `GET` request
///
/// Extra methods are applied to the response template, e.g.
/// `mock_server!(StatusCode::OK, set_body_string("{}"))`.
#[macro_export]
macro_rules! mock_server {
    ($status:expr $(, $func:tt ($($arg:expr),*))*) => {{
        let mock_server = wiremock::MockServer::start().await;
        let response_template = wiremock::ResponseTemplate::new(http::StatusCode::from($status));
        let template = response_template$(.$func($($arg),*))*;
        wiremock::Mock::given(wiremock::matchers::method("GET")).respond_with(template).mount(&mock_server).await;
        mock_server
    }};
}

/// Build a client that sends its API requests to the given mock server over
/// plain HTTP
///
/// Further builder fields can be set with `field = value` pairs, e.g.
/// `mock_client!(mock_server, use_cache = false)`. `host` and `use_ssl` are
/// already taken.
///
/// The importer must have `ClientBuilder` in scope.
#[macro_export]
macro_rules! mock_client {
    ($server:expr $(, $field:ident = $value:expr)* $(,)?) => {
        ClientBuilder::builder()
            .host($server.address().to_string())
            .use_ssl(false)
            $(.$field($value))*
            .build()
            .client()
            .unwrap()
    };
}
