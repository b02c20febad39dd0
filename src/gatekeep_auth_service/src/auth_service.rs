use axum::{
    Router,
    http::{HeaderValue, Method, request},
    middleware,
    routing::{get, post},
};
use gatekeep_adapters::{
    auth::JwtConfig,
    config::{AllowedOrigins, OtpPolicy},
    http::{
        bearer_auth,
        routes::{
            change_password, login, logout, me, refresh, register, verify_mail, verify_otp,
            verify_reset_otp,
        },
    },
};
use gatekeep_core::{ActivityLogStore, EmailClient, ResetOtpStore, SignupCacheStore, UserStore};
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::tracing::{make_span_with_request_id, on_request, on_response};

/// The authentication service with every credential-lifecycle route wired up.
pub struct AuthService {
    router: Router,
}

impl AuthService {
    /// Assemble the service from its stores, email client, and policies.
    ///
    /// Stores implement Clone via internal Arc for thread-safe sharing, so
    /// each route is handed only the state it actually needs.
    pub fn new<U, C, R, A, E>(
        user_store: U,
        signup_cache: C,
        reset_otp_store: R,
        activity_log: A,
        email_client: E,
        jwt_config: JwtConfig,
        otp_policy: OtpPolicy,
    ) -> Self
    where
        U: UserStore + Clone + 'static,
        C: SignupCacheStore + Clone + 'static,
        R: ResetOtpStore + Clone + 'static,
        A: ActivityLogStore + Clone + 'static,
        E: EmailClient + Clone + 'static,
    {
        let router = Router::new()
            // Registration stashes the pending signup and mails the OTP
            .route("/register", post(register::<U, C, E>))
            .with_state((
                user_store.clone(),
                signup_cache.clone(),
                email_client.clone(),
                otp_policy.clone(),
            ))
            // OTP verification promotes the cached signup into the user store
            .route("/verify-otp", post(verify_otp::<U, C, E, A>))
            .with_state((
                user_store.clone(),
                signup_cache,
                email_client.clone(),
                activity_log.clone(),
            ))
            // Login issues the access token and refresh cookie
            .route("/login", post(login::<U, A>))
            .with_state((
                user_store.clone(),
                activity_log.clone(),
                jwt_config.clone(),
            ))
            // Refresh rotates both token and cookie
            .route("/refresh", post(refresh::<U>))
            .with_state((user_store.clone(), jwt_config.clone()))
            // Logout only clears the cookie
            .route("/log", post(logout))
            .with_state(jwt_config.clone())
            // Password reset: request OTP, verify it, then change the password
            .route("/forgetPassword/verifyMail", post(verify_mail::<U, R, E, A>))
            .with_state((
                user_store.clone(),
                reset_otp_store.clone(),
                email_client,
                activity_log.clone(),
                otp_policy.clone(),
            ))
            .route("/forgetPassword/verifyOtp", post(verify_reset_otp::<U, R, A>))
            .with_state((
                user_store.clone(),
                reset_otp_store.clone(),
                activity_log.clone(),
                otp_policy.clone(),
            ))
            .route(
                "/forgetPassword/changePassword",
                post(change_password::<U, R, A>),
            )
            .with_state((
                user_store.clone(),
                reset_otp_store,
                activity_log.clone(),
                otp_policy,
            ))
            // Who-am-I for authenticated principals
            .route("/me", get(me::<U, A>))
            .with_state((user_store.clone(), activity_log))
            // Bearer auth runs on every request; public paths pass through
            .layer(middleware::from_fn_with_state(
                (user_store, jwt_config),
                bearer_auth::<U>,
            ));

        Self { router }
    }

    fn with_trace_layer(mut self) -> Self {
        self.router = self.router.layer(
            TraceLayer::new_for_http()
                .make_span_with(make_span_with_request_id)
                .on_request(on_request)
                .on_response(on_response),
        );
        self
    }

    /// Convert the service into a router that can be nested under another
    /// application, with optional CORS restricted to `allowed_origins`.
    pub fn as_nested_router(mut self, allowed_origins: Option<AllowedOrigins>) -> Router {
        if let Some(allowed_origins) = allowed_origins {
            let cors = CorsLayer::new()
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
                .allow_credentials(true)
                .allow_origin(AllowOrigin::predicate(
                    move |origin: &HeaderValue, _request_parts: &request::Parts| {
                        allowed_origins.contains(origin)
                    },
                ));

            self.router = self.router.layer(cors);
        }
        self.with_trace_layer().router
    }

    /// Run the auth service as a standalone server on `listener`.
    pub async fn run_standalone(
        self,
        listener: TcpListener,
        allowed_origins: Option<AllowedOrigins>,
    ) -> Result<(), std::io::Error> {
        let router = self.as_nested_router(allowed_origins);

        tracing::info!("Auth service listening on {}", listener.local_addr()?);

        axum_server::Server::<std::net::SocketAddr>::from_listener(listener)
            .serve(router.into_make_service())
            .await
    }
}
