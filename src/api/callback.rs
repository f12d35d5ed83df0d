use std::collections::HashMap;

use axum::{Extension, extract::Query, response::Html};

use crate::{server::SharedPendingAuth, warning};

/// Receives the provider redirect and records the authorization code.
///
/// The code is only stored; the login flow performs the token exchange.
pub async fn callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(pending): Extension<SharedPendingAuth>,
) -> Html<&'static str> {
    let mut pending = pending.lock().await;

    if let Some(error) = params.get("error") {
        warning!("Authorization was declined: {}", error);
        pending.error = Some(format!("provider returned error: {}", error));
        return Html("<h4>Login cancelled.</h4>");
    }

    if params.get("state").map(String::as_str) != Some(pending.state.as_str()) {
        pending.error = Some("state parameter did not match".to_string());
        return Html("<h4>Login failed: unexpected state.</h4>");
    }

    match params.get("code") {
        Some(code) if !code.is_empty() => {
            pending.code = Some(code.clone());
            Html("<h2>Authentication successful.</h2><p>Close this window and return to the terminal.</p>")
        }
        _ => Html("<h4>Missing authorization code.</h4>"),
    }
}
