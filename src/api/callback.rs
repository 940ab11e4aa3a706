use std::collections::HashMap;

use axum::{Extension, extract::Query, response::Html};

use crate::{ExportError, spotify, types::SharedAuthState, warning};

pub async fn callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(shared_state): Extension<SharedAuthState>,
) -> Html<&'static str> {
    let exchange = {
        let mut auth = shared_state.lock().await;
        if auth.outcome.is_some() {
            return Html("<h4>Authorization already completed. Close this window.</h4>");
        }

        if let Some(reason) = params.get("error") {
            auth.outcome = Some(Err(ExportError::Auth(format!(
                "authorization denied: {}",
                reason
            ))));
            return Html("<h4>Login failed.</h4>");
        }

        // a foreign state means the request did not come from our redirect
        if params.get("state") != Some(&auth.state) {
            return Html("<h4>State mismatch.</h4>");
        }

        auth.exchange.clone()
    };

    let Some(code) = params.get("code") else {
        return Html("<h4>Missing authorization code.</h4>");
    };

    // the lock is free while the token endpoint answers
    let result = spotify::auth::exchange_code(&exchange, code).await;

    let mut auth = shared_state.lock().await;
    if auth.outcome.is_some() {
        return Html("<h4>Authorization already completed. Close this window.</h4>");
    }

    match result {
        Ok(token) => {
            auth.outcome = Some(Ok(token));
            Html("<h2>Authentication successful.</h2><p>Close browser window.</p>")
        }
        Err(e) => {
            warning!("Token exchange failed: {}", e);
            auth.outcome = Some(Err(e));
            Html("<h4>Login failed.</h4>")
        }
    }
}
