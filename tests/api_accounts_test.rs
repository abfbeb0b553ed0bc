//! Integration tests for registration, login and logout

mod test_utils;

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::json;
    use tower::util::ServiceExt;

    use webmail::api::public::{ErrorResponse, accounts::LoginResponse, accounts::RegisterResponse};

    use crate::test_utils::{
        body_to_json, body_to_string, json_request, list_emails, login, register,
        register_and_login, test_app, test_app_with, test_config,
    };

    /// Tests registering, registering again, and logging in with wrong
    /// and right passwords
    #[tokio::test]
    async fn it_registers_and_logs_in() {
        let app = test_app().await;

        let response = register(&app, "a@t.com", "p1").await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_to_string(response.into_body()).await;
        let created: RegisterResponse = serde_json::from_str(&body).unwrap();
        assert_eq!(created.user.email, "a@t.com");
        assert_eq!(created.user.display_name.as_deref(), Some("a"));
        assert!(!body.contains("p1"));
        assert!(!body.contains("password"));

        let response = register(&app, "a@t.com", "p1").await;
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let response = login(&app, "a@t.com", "wrong").await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = login(&app, "a@t.com", "p1").await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_to_string(response.into_body()).await;
        let session: LoginResponse = serde_json::from_str(&body).unwrap();
        assert!(!session.token.is_empty());
        assert_eq!(session.user.id, created.user.id);
        assert_eq!(session.user.email, "a@t.com");
    }

    /// Tests the display name is kept when given
    #[tokio::test]
    async fn it_registers_with_display_name() {
        let app = test_app().await;

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/register",
                json!({ "email": "b@t.com", "password": "pw", "display_name": "Bee" }),
                None,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_to_json(response.into_body()).await;
        assert_eq!(body["user"]["display_name"], "Bee");
        assert_eq!(body["message"], "User created successfully");
    }

    /// Tests that only one of two concurrent registrations succeeds
    #[tokio::test]
    async fn it_allows_one_account_per_email_under_concurrency() {
        let app = test_app().await;

        let (first, second) = tokio::join!(
            register(&app, "race@t.com", "p1"),
            register(&app, "race@t.com", "p2")
        );

        let mut statuses = vec![first.status(), second.status()];
        statuses.sort();
        assert_eq!(statuses, vec![StatusCode::CREATED, StatusCode::CONFLICT]);
    }

    /// Tests that emails differing only in case are distinct accounts
    #[tokio::test]
    async fn it_treats_email_case_sensitively() {
        let app = test_app().await;

        assert_eq!(
            register(&app, "case@t.com", "p1").await.status(),
            StatusCode::CREATED
        );
        assert_eq!(
            register(&app, "Case@t.com", "p1").await.status(),
            StatusCode::CREATED
        );
    }

    /// Tests registration returns 400 for missing or empty fields
    #[tokio::test]
    async fn it_returns_400_for_missing_fields() {
        let app = test_app().await;

        for payload in [
            json!({ "password": "p1" }),
            json!({ "email": "a@t.com" }),
            json!({ "email": "", "password": "p1" }),
            json!({ "email": "a@t.com", "password": null }),
        ] {
            let response = app
                .clone()
                .oneshot(json_request("POST", "/api/register", payload, None))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);

            let body = body_to_string(response.into_body()).await;
            let error: ErrorResponse = serde_json::from_str(&body).unwrap();
            assert_eq!(error.error, "Email and password are required");
        }
    }

    /// Tests a malformed body is a validation error
    #[tokio::test]
    async fn it_returns_400_for_malformed_json() {
        let app = test_app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/register")
                    .method("POST")
                    .header("content-type", "application/json")
                    .body(Body::from("{\"email\": "))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_to_json(response.into_body()).await;
        assert!(body["error"].is_string());
    }

    /// Tests unknown emails and wrong passwords fail the same way
    #[tokio::test]
    async fn it_returns_identical_401_for_any_credential_failure() {
        let app = test_app().await;
        register(&app, "a@t.com", "p1").await;

        let wrong_password = login(&app, "a@t.com", "nope").await;
        let unknown_email = login(&app, "nobody@t.com", "p1").await;
        let missing_fields = app
            .clone()
            .oneshot(json_request("POST", "/api/login", json!({}), None))
            .await
            .unwrap();

        let mut bodies = Vec::new();
        for response in [wrong_password, unknown_email, missing_fields] {
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
            bodies.push(body_to_string(response.into_body()).await);
        }
        assert!(bodies.iter().all(|b| b == &bodies[0]));
        assert!(bodies[0].contains("Invalid credentials"));
    }

    /// Tests each login mints a different token and both stay valid
    #[tokio::test]
    async fn it_issues_a_new_token_per_login() {
        let app = test_app().await;
        let first = register_and_login(&app, "a@t.com", "p1").await;

        let response = login(&app, "a@t.com", "p1").await;
        let second = body_to_json(response.into_body()).await["token"]
            .as_str()
            .unwrap()
            .to_string();

        assert_ne!(first, second);
        assert!(!first.contains("a@t.com"));
        assert_eq!(list_emails(&app, &first).await.status(), StatusCode::OK);
        assert_eq!(list_emails(&app, &second).await.status(), StatusCode::OK);
    }

    /// Tests logout revokes the session
    #[tokio::test]
    async fn it_revokes_token_on_logout() {
        let app = test_app().await;
        let token = register_and_login(&app, "a@t.com", "p1").await;

        let response = app
            .clone()
            .oneshot(json_request("POST", "/api/logout", json!({}), Some(&token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        assert_eq!(
            list_emails(&app, &token).await.status(),
            StatusCode::UNAUTHORIZED
        );
    }

    /// Tests logout requires a valid token
    #[tokio::test]
    async fn it_returns_401_for_logout_without_token() {
        let app = test_app().await;

        let response = app
            .oneshot(json_request("POST", "/api/logout", json!({}), None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    /// Tests that without a session cache logins succeed but tokens are
    /// never accepted
    #[tokio::test]
    async fn it_rejects_tokens_when_session_cache_is_disabled() {
        let mut config = test_config();
        config.session_cache_url = String::from("disabled");
        let app = test_app_with(config).await;

        let token = register_and_login(&app, "a@t.com", "p1").await;
        assert!(!token.is_empty());

        assert_eq!(
            list_emails(&app, &token).await.status(),
            StatusCode::UNAUTHORIZED
        );
    }
}
