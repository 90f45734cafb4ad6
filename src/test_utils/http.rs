use axum::{body::Body, http::StatusCode, response::Response};

#[track_caller]
pub(crate) fn assert_status_ok(response: &Response<Body>) {
    assert_eq!(response.status(), StatusCode::OK);
}

#[track_caller]
pub(crate) fn assert_hx_redirect(response: &Response<Body>, endpoint: &str) {
    let location = response
        .headers()
        .get("hx-redirect")
        .expect("Headers missing hx-redirect")
        .to_str()
        .expect("Could not convert to str");

    assert_eq!(location, endpoint);
}
