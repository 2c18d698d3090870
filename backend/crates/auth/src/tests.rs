//! Use case and router tests against an in-memory store

#[cfg(test)]
mod support {
    use std::sync::{Arc, Mutex};

    use chrono::{DateTime, Utc};
    use kernel::pagination::PageRequest;
    use platform::password::HashCost;

    use crate::application::AuthConfig;
    use crate::domain::entity::{RefreshToken, User};
    use crate::domain::repository::{RefreshTokenRepository, UserRepository};
    use crate::domain::value_object::{Email, UserId, Username};
    use crate::error::{AuthError, AuthResult};

    #[derive(Default)]
    struct Tables {
        users: Vec<User>,
        tokens: Vec<RefreshToken>,
    }

    /// Shared between clones, like a pool.
    #[derive(Clone, Default)]
    pub struct MemoryRepo {
        tables: Arc<Mutex<Tables>>,
    }

    impl MemoryRepo {
        pub fn token_count(&self) -> usize {
            self.tables.lock().unwrap().tokens.len()
        }
    }

    impl UserRepository for MemoryRepo {
        async fn create(&self, user: &User) -> AuthResult<()> {
            let mut tables = self.tables.lock().unwrap();
            if tables.users.iter().any(|u| u.email == user.email) {
                return Err(AuthError::EmailTaken);
            }
            if tables.users.iter().any(|u| u.username == user.username) {
                return Err(AuthError::UsernameTaken);
            }
            tables.users.push(user.clone());
            Ok(())
        }

        async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
            let tables = self.tables.lock().unwrap();
            Ok(tables.users.iter().find(|u| u.user_id == *user_id).cloned())
        }

        async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
            let tables = self.tables.lock().unwrap();
            Ok(tables.users.iter().find(|u| u.email == *email).cloned())
        }

        async fn find_by_username(&self, username: &Username) -> AuthResult<Option<User>> {
            let tables = self.tables.lock().unwrap();
            Ok(tables.users.iter().find(|u| u.username == *username).cloned())
        }

        async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
            Ok(self.find_by_email(email).await?.is_some())
        }

        async fn exists_by_username(&self, username: &Username) -> AuthResult<bool> {
            Ok(self.find_by_username(username).await?.is_some())
        }

        async fn update(&self, user: &User) -> AuthResult<()> {
            let mut tables = self.tables.lock().unwrap();
            match tables.users.iter_mut().find(|u| u.user_id == user.user_id) {
                Some(slot) => {
                    *slot = user.clone();
                    Ok(())
                }
                None => Err(AuthError::UserNotFound),
            }
        }

        async fn page(&self, page: &PageRequest) -> AuthResult<Vec<User>> {
            let tables = self.tables.lock().unwrap();
            Ok(page.apply(tables.users.iter().cloned()))
        }
    }

    impl RefreshTokenRepository for MemoryRepo {
        async fn record(&self, token: &RefreshToken) -> AuthResult<()> {
            self.tables.lock().unwrap().tokens.push(token.clone());
            Ok(())
        }

        async fn find_active(
            &self,
            token_digest: &str,
            now: DateTime<Utc>,
        ) -> AuthResult<Option<RefreshToken>> {
            let tables = self.tables.lock().unwrap();
            Ok(tables
                .tokens
                .iter()
                .find(|t| t.token_digest == token_digest && t.is_active_at(now))
                .cloned())
        }

        async fn revoke(&self, user_id: &UserId, token_digest: &str) -> AuthResult<bool> {
            let mut tables = self.tables.lock().unwrap();
            let before = tables.tokens.len();
            tables
                .tokens
                .retain(|t| !(t.user_id == *user_id && t.token_digest == token_digest));
            Ok(tables.tokens.len() < before)
        }

        async fn revoke_all(&self, user_id: &UserId) -> AuthResult<u64> {
            let mut tables = self.tables.lock().unwrap();
            let before = tables.tokens.len();
            tables.tokens.retain(|t| t.user_id != *user_id);
            Ok((before - tables.tokens.len()) as u64)
        }

        async fn cleanup_expired(&self) -> AuthResult<u64> {
            let mut tables = self.tables.lock().unwrap();
            let before = tables.tokens.len();
            let now = Utc::now();
            tables.tokens.retain(|t| t.is_active_at(now));
            Ok((before - tables.tokens.len()) as u64)
        }
    }

    /// Store whose existence checks always miss, like a sign-up that loses
    /// the race to a concurrent one. Only the insert sees the duplicate.
    #[derive(Clone, Default)]
    pub struct RacingRepo {
        pub inner: MemoryRepo,
    }

    impl UserRepository for RacingRepo {
        async fn create(&self, user: &User) -> AuthResult<()> {
            UserRepository::create(&self.inner, user).await
        }

        async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
            self.inner.find_by_id(user_id).await
        }

        async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
            self.inner.find_by_email(email).await
        }

        async fn find_by_username(&self, username: &Username) -> AuthResult<Option<User>> {
            self.inner.find_by_username(username).await
        }

        async fn exists_by_email(&self, _email: &Email) -> AuthResult<bool> {
            Ok(false)
        }

        async fn exists_by_username(&self, _username: &Username) -> AuthResult<bool> {
            Ok(false)
        }

        async fn update(&self, user: &User) -> AuthResult<()> {
            self.inner.update(user).await
        }

        async fn page(&self, page: &PageRequest) -> AuthResult<Vec<User>> {
            self.inner.page(page).await
        }
    }

    pub fn test_config() -> AuthConfig {
        let mut config = AuthConfig::new("access-secret-for-tests", "refresh-secret-for-tests");
        config.password_cost = HashCost::minimal();
        config
    }
}

#[cfg(test)]
mod use_case_tests {
    use std::sync::Arc;

    use super::support::{MemoryRepo, RacingRepo, test_config};
    use crate::application::{
        RefreshUseCase, SignInInput, SignInUseCase, SignOutUseCase, SignUpInput, SignUpOutput,
        SignUpUseCase, TokenIssuer,
    };
    use crate::error::AuthError;
    use kernel::error::kind::ErrorKind;

    fn input(username: &str, email: &str) -> SignUpInput {
        SignUpInput {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            username: username.into(),
            email: email.into(),
            password: "analytical-engine".into(),
            bio: None,
        }
    }

    struct Harness {
        repo: Arc<MemoryRepo>,
        issuer: Arc<TokenIssuer>,
        sign_up: SignUpUseCase<MemoryRepo, MemoryRepo>,
    }

    fn harness() -> Harness {
        let config = Arc::new(test_config());
        let repo = Arc::new(MemoryRepo::default());
        let issuer = Arc::new(TokenIssuer::new(&config));
        let sign_up = SignUpUseCase::new(repo.clone(), repo.clone(), issuer.clone(), config);
        Harness {
            repo,
            issuer,
            sign_up,
        }
    }

    async fn signed_up(h: &Harness) -> SignUpOutput {
        h.sign_up
            .execute(input("ada", "Ada@Example.com"))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_sign_up_normalizes_email_and_records_token() {
        let h = harness();
        let output = signed_up(&h).await;

        assert_eq!(output.user.email.as_str(), "ada@example.com");
        assert_eq!(h.repo.token_count(), 1);

        let claims = h.issuer.verify_access_token(&output.tokens.access_token).unwrap();
        assert_eq!(claims.user_id(), output.user.user_id);
    }

    #[tokio::test]
    async fn test_sign_up_duplicates() {
        let h = harness();
        signed_up(&h).await;

        let err = h
            .sign_up
            .execute(input("other", "ada@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::EmailTaken));

        let err = h
            .sign_up
            .execute(input("ada", "other@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::UsernameTaken));
    }

    #[tokio::test]
    async fn test_sign_up_validation() {
        let h = harness();
        let mut bad = input("ada", "ada@example.com");
        bad.password = "short".into();
        let err = h.sign_up.execute(bad).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadRequest);

        let err = h
            .sign_up
            .execute(input("a!", "ada@example.com"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadRequest);
        assert_eq!(h.repo.token_count(), 0);
    }

    #[tokio::test]
    async fn test_login() {
        let h = harness();
        signed_up(&h).await;
        let sign_in = SignInUseCase::new(h.repo.clone(), h.repo.clone(), h.issuer.clone());

        let output = sign_in
            .execute(SignInInput {
                email: "ADA@example.com".into(),
                password: "analytical-engine".into(),
            })
            .await
            .unwrap();
        assert_eq!(output.user.username.as_str(), "ada");
        // One row per device
        assert_eq!(h.repo.token_count(), 2);

        let err = sign_in
            .execute(SignInInput {
                email: "ada@example.com".into(),
                password: "difference-engine".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));

        let err = sign_in
            .execute(SignInInput {
                email: "nobody@example.com".into(),
                password: "analytical-engine".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::UserNotFound));
    }

    #[tokio::test]
    async fn test_logout_revokes_refresh_token() {
        let h = harness();
        let output = signed_up(&h).await;
        let user_id = output.user.user_id;
        let refresh = output.tokens.refresh_token;

        let refresh_use_case = RefreshUseCase::new(h.repo.clone(), h.issuer.clone());
        let access = refresh_use_case.execute(&refresh).await.unwrap();
        assert!(h.issuer.verify_access_token(&access).is_ok());

        let sign_out = SignOutUseCase::new(h.repo.clone(), h.repo.clone());
        sign_out.execute(&user_id, &refresh).await.unwrap();

        let err = refresh_use_case.execute(&refresh).await.unwrap_err();
        assert!(matches!(err, AuthError::Unauthorized));

        let err = sign_out.execute(&user_id, &refresh).await.unwrap_err();
        assert!(matches!(err, AuthError::RefreshTokenNotFound));
    }

    #[tokio::test]
    async fn test_logout_all_devices() {
        let h = harness();
        let output = signed_up(&h).await;
        let user_id = output.user.user_id;
        let sign_in = SignInUseCase::new(h.repo.clone(), h.repo.clone(), h.issuer.clone());
        let second = sign_in
            .execute(SignInInput {
                email: "ada@example.com".into(),
                password: "analytical-engine".into(),
            })
            .await
            .unwrap();

        let sign_out = SignOutUseCase::new(h.repo.clone(), h.repo.clone());
        assert_eq!(sign_out.execute_all(&user_id).await.unwrap(), 2);

        let refresh_use_case = RefreshUseCase::new(h.repo.clone(), h.issuer.clone());
        for token in [&output.tokens.refresh_token, &second.tokens.refresh_token] {
            let err = refresh_use_case.execute(token).await.unwrap_err();
            assert!(matches!(err, AuthError::Unauthorized));
        }

        let err = sign_out.execute_all(&user_id).await.unwrap_err();
        assert!(matches!(err, AuthError::NoActiveSessions));
    }

    #[tokio::test]
    async fn test_logout_all_leaves_other_users_signed_in() {
        let h = harness();
        let ada = signed_up(&h).await;
        let bob = h
            .sign_up
            .execute(input("bob", "bob@example.com"))
            .await
            .unwrap();

        let sign_out = SignOutUseCase::new(h.repo.clone(), h.repo.clone());
        assert_eq!(sign_out.execute_all(&ada.user.user_id).await.unwrap(), 1);

        let refresh_use_case = RefreshUseCase::new(h.repo.clone(), h.issuer.clone());
        assert!(refresh_use_case.execute(&bob.tokens.refresh_token).await.is_ok());
    }

    #[tokio::test]
    async fn test_logout_with_someone_elses_token() {
        let h = harness();
        let ada = signed_up(&h).await;
        let bob = h
            .sign_up
            .execute(input("bob", "bob@example.com"))
            .await
            .unwrap();

        let sign_out = SignOutUseCase::new(h.repo.clone(), h.repo.clone());
        let err = sign_out
            .execute(&bob.user.user_id, &ada.tokens.refresh_token)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::RefreshTokenNotFound));
        assert_eq!(h.repo.token_count(), 2);

        let refresh_use_case = RefreshUseCase::new(h.repo.clone(), h.issuer.clone());
        assert!(refresh_use_case.execute(&ada.tokens.refresh_token).await.is_ok());
    }

    #[tokio::test]
    async fn test_sign_up_race_is_still_a_conflict() {
        let config = Arc::new(test_config());
        let repo = Arc::new(RacingRepo::default());
        let issuer = Arc::new(TokenIssuer::new(&config));
        let sign_up = SignUpUseCase::new(repo.clone(), Arc::new(repo.inner.clone()), issuer, config);

        sign_up
            .execute(input("ada", "ada@example.com"))
            .await
            .unwrap();

        let err = sign_up
            .execute(input("other", "ada@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::EmailTaken));
        assert_eq!(err.kind(), ErrorKind::Conflict);

        let err = sign_up
            .execute(input("ada", "other@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::UsernameTaken));

        // Losing sign-ups never start a session
        assert_eq!(repo.inner.token_count(), 1);
    }

    #[tokio::test]
    async fn test_refresh_rejects_access_token() {
        let h = harness();
        let output = signed_up(&h).await;
        let refresh_use_case = RefreshUseCase::new(h.repo.clone(), h.issuer.clone());

        let err = refresh_use_case
            .execute(&output.tokens.access_token)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Unauthorized));
    }
}

#[cfg(test)]
mod router_tests {
    use std::sync::Arc;

    use axum::Router;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::support::{MemoryRepo, test_config};
    use crate::presentation::router::auth_router_generic;

    fn app() -> Router {
        auth_router_generic(MemoryRepo::default(), Arc::new(test_config()))
    }

    fn post(uri: &str, bearer: Option<&str>, body: Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = bearer {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn sign_up_body() -> Value {
        json!({
            "firstName": "Grace",
            "lastName": "Hopper",
            "username": "grace",
            "email": "grace@example.com",
            "password": "cobol-forever"
        })
    }

    #[tokio::test]
    async fn test_sign_up_then_logout_flow() {
        let app = app();

        let response = app
            .clone()
            .oneshot(post("/sign-up", None, sign_up_body()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = json_body(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Account created successfully");
        assert_eq!(body["data"]["user"]["username"], "grace");
        assert!(body["data"]["user"].get("password").is_none());

        let access = body["data"]["accessToken"].as_str().unwrap().to_string();
        let refresh = body["data"]["refreshToken"].as_str().unwrap().to_string();

        let response = app
            .clone()
            .oneshot(post("/refresh-token", None, json!({ "refreshToken": refresh })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = json_body(response).await;
        assert!(body["data"]["accessToken"].is_string());

        let response = app
            .clone()
            .oneshot(post("/logout", Some(&access), json!({ "refreshToken": refresh })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = json_body(response).await;
        assert_eq!(body["message"], "Logged out successfully");
        assert!(body["data"].is_null());

        let response = app
            .oneshot(post("/refresh-token", None, json!({ "refreshToken": refresh })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_logout_requires_access_token() {
        let response = app()
            .oneshot(post("/logout", None, json!({ "refreshToken": "x" })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = json_body(response).await;
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_duplicate_sign_up_conflict() {
        let app = app();
        let first = app
            .clone()
            .oneshot(post("/sign-up", None, sign_up_body()))
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::CREATED);

        let second = app
            .oneshot(post("/sign-up", None, sign_up_body()))
            .await
            .unwrap();
        assert_eq!(second.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_cookie_mode_sets_cookies() {
        let mut config = test_config();
        config.cookie_mode = true;
        let app = auth_router_generic(MemoryRepo::default(), Arc::new(config));

        let response = app
            .oneshot(post("/sign-up", None, sign_up_body()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let cookies: Vec<String> = response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect();
        assert_eq!(cookies.len(), 2);
        assert!(cookies.iter().any(|c| c.starts_with("accessToken=")));
        assert!(cookies.iter().any(|c| c.starts_with("refreshToken=")));

        let body = json_body(response).await;
        assert!(body["data"].get("accessToken").is_none());
    }
}
