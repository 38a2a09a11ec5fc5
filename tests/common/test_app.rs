use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use tower::ServiceExt;

pub struct TestApp {
    pub router: Router,
}

impl TestApp {
    pub fn new(router: Router) -> Self {
        Self { router }
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        self.send("GET", path, None, Body::empty()).await
    }

    pub async fn get_with_token(&self, path: &str, authorization: &str) -> TestResponse {
        self.send("GET", path, Some(authorization), Body::empty()).await
    }

    pub async fn post_json(
        &self,
        path: &str,
        authorization: Option<&str>,
        body: impl Into<Body>,
    ) -> TestResponse {
        self.send("POST", path, authorization, body.into()).await
    }

    async fn send(
        &self,
        method: &str,
        path: &str,
        authorization: Option<&str>,
        body: Body,
    ) -> TestResponse {
        let mut builder = Request::builder()
            .uri(path)
            .method(method)
            .header("content-type", "application/json");
        if let Some(value) = authorization {
            builder = builder.header("Authorization", value);
        }

        let response = self.router.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
        TestResponse::new(response).await
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub body: String,
}

impl TestResponse {
    async fn new(response: axum::response::Response) -> Self {
        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = String::from_utf8(body_bytes.to_vec()).unwrap();

        Self { status, body }
    }

    pub fn assert_status(&self, expected: StatusCode) {
        assert_eq!(self.status, expected, "Response body: {}", self.body);
    }

    pub fn json<T>(&self) -> T
    where
        T: serde::de::DeserializeOwned,
    {
        serde_json::from_str(&self.body).unwrap()
    }

    pub fn error_message(&self) -> String {
        let value: serde_json::Value = self.json();
        value["error"]["message"].as_str().unwrap_or_default().to_string()
    }
}
