#[cfg(test)]
pub mod test_utils {
    use std::sync::{Arc, Mutex};

    use crate::auth::hash_password;
    use crate::clients::{ClientError, ContactMessage, Mailer, PaymentClient, Subscription};
    use crate::router::create_router;
    use crate::schemas::AppState;
    use crate::service::ApiService;
    use crate::store::{NewUser, UserStore};
    use async_trait::async_trait;
    use axum::http::HeaderValue;
    use axum::Router;
    use axum_test::TestServer;
    use chrono::{Duration, Utc};
    use migration::{Migrator, MigratorTrait};
    use model::entities::user;
    use sea_orm::{ConnectionTrait, Database, DatabaseConnection};
    use serde_json::{json, Value};
    use tracing::Level;
    use tracing_subscriber::FmtSubscriber;

    pub const TEST_PASSWORD: &str = "sup3r-secret";

    /// Create an in-memory SQLite database for testing
    pub async fn setup_test_db() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to connect to in-memory database");

        db.execute_unprepared("PRAGMA foreign_keys = ON")
            .await
            .expect("Failed to enable foreign keys");

        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        db
    }

    #[derive(Debug, Default)]
    pub struct FakeBilling {
        pub customers: Vec<String>,
        pub cards: Vec<(String, String)>,
        pub subscriptions: Vec<Subscription>,
        pub canceled: Vec<String>,
    }

    /// In-process payment processor recording every call.
    #[derive(Debug, Default)]
    pub struct FakePaymentClient {
        pub billing: Mutex<FakeBilling>,
    }

    impl FakePaymentClient {
        /// Adds a subscription owned by someone else.
        pub fn seed_subscription(&self, id: &str, customer_id: &str) {
            let now = Utc::now();
            self.billing.lock().unwrap().subscriptions.push(Subscription {
                id: id.to_string(),
                plan_id: "plan_monthly".to_string(),
                product_id: "prod_vip".to_string(),
                customer_id: customer_id.to_string(),
                provider: "stripe".to_string(),
                auto_renewal: true,
                created_at: now,
                expires_at: now + Duration::days(30),
            });
        }
    }

    #[async_trait]
    impl PaymentClient for FakePaymentClient {
        async fn create_customer(&self, _email: &str) -> Result<String, ClientError> {
            let mut billing = self.billing.lock().unwrap();
            let id = format!("cus_{}", billing.customers.len() + 1);
            billing.customers.push(id.clone());
            Ok(id)
        }

        async fn set_payment_card(&self, customer_id: &str, source_id: &str) -> Result<(), ClientError> {
            self.billing
                .lock()
                .unwrap()
                .cards
                .push((customer_id.to_string(), source_id.to_string()));
            Ok(())
        }

        async fn create_subscription(
            &self,
            customer_id: &str,
            plan_id: &str,
        ) -> Result<Subscription, ClientError> {
            let mut billing = self.billing.lock().unwrap();
            let now = Utc::now();
            let subscription = Subscription {
                id: format!("sub_{}", billing.subscriptions.len() + 1),
                plan_id: plan_id.to_string(),
                product_id: "prod_vip".to_string(),
                customer_id: customer_id.to_string(),
                provider: "stripe".to_string(),
                auto_renewal: true,
                created_at: now,
                expires_at: now + Duration::days(30),
            };
            billing.subscriptions.push(subscription.clone());
            Ok(subscription)
        }

        async fn list_subscriptions(&self, customer_id: &str) -> Result<Vec<Subscription>, ClientError> {
            Ok(self
                .billing
                .lock()
                .unwrap()
                .subscriptions
                .iter()
                .filter(|s| s.customer_id == customer_id)
                .cloned()
                .collect())
        }

        async fn cancel_subscription(&self, subscription_id: &str) -> Result<(), ClientError> {
            self.billing
                .lock()
                .unwrap()
                .canceled
                .push(subscription_id.to_string());
            Ok(())
        }
    }

    /// Keeps every contact message instead of sending it.
    #[derive(Debug, Default)]
    pub struct RecordingMailer {
        pub sent: Mutex<Vec<ContactMessage>>,
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send_contact(&self, message: &ContactMessage) -> Result<(), ClientError> {
            self.sent.lock().unwrap().push(message.clone());
            Ok(())
        }
    }

    /// The application state together with handles on its fake clients.
    pub struct TestContext {
        pub state: AppState,
        pub payment: Arc<FakePaymentClient>,
        pub mailer: Arc<RecordingMailer>,
    }

    /// Create AppState for testing
    pub async fn setup_test_context() -> TestContext {
        let db = setup_test_db().await;
        let payment = Arc::new(FakePaymentClient::default());
        let mailer = Arc::new(RecordingMailer::default());
        let service = ApiService::new(
            db.clone(),
            payment.clone(),
            mailer.clone(),
            Duration::hours(48),
        );
        TestContext {
            state: AppState { db, service },
            payment,
            mailer,
        }
    }

    pub async fn setup_test_app_state() -> AppState {
        setup_test_context().await.state
    }

    /// Inserts an active user with [`TEST_PASSWORD`] directly through the store.
    pub async fn insert_user(db: &DatabaseConnection, email: &str, admin: bool) -> user::Model {
        let users = UserStore::new(db.clone());
        let user = users
            .create(NewUser {
                email: email.to_string(),
                password_hash: hash_password(TEST_PASSWORD).unwrap(),
                firstname: "Test".to_string(),
                lastname: "User".to_string(),
                username: email.split('@').next().unwrap_or("user").to_string(),
                phone_number: None,
            })
            .await
            .expect("Failed to create test user");
        if admin {
            users.set_admin(user, true).await.expect("Failed to grant admin")
        } else {
            user
        }
    }

    /// Initialize tracing for tests with output to STDERR.
    ///
    /// The log level is read from RUST_LOG and defaults to WARN.
    pub fn init_test_tracing() -> tracing::subscriber::DefaultGuard {
        let log_level = std::env::var("RUST_LOG")
            .ok()
            .and_then(|level| match level.to_uppercase().as_str() {
                "ERROR" => Some(Level::ERROR),
                "WARN" => Some(Level::WARN),
                "INFO" => Some(Level::INFO),
                "DEBUG" => Some(Level::DEBUG),
                "TRACE" => Some(Level::TRACE),
                _ => None,
            })
            .unwrap_or(Level::WARN);

        let subscriber = FmtSubscriber::builder()
            .with_max_level(log_level)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    /// Create axum app for testing
    pub async fn setup_test_app() -> Router {
        create_router(setup_test_app_state().await)
    }

    /// Test server plus the fakes behind it.
    pub async fn setup_test_server() -> (TestServer, TestContext) {
        let context = setup_test_context().await;
        let server = TestServer::new(create_router(context.state.clone())).unwrap();
        (server, context)
    }

    pub fn user_payload(email: &str) -> Value {
        json!({
            "email": email,
            "password": TEST_PASSWORD,
            "firstname": "Jean",
            "lastname": "Dupont",
            "username": email.split('@').next().unwrap_or("user"),
        })
    }

    /// Registers a user over HTTP and returns its bearer token.
    pub async fn register_and_login(server: &TestServer, email: &str) -> String {
        server
            .post("/api/v1/users")
            .json(&user_payload(email))
            .await
            .assert_status(axum::http::StatusCode::CREATED);
        login(server, email, TEST_PASSWORD).await
    }

    pub async fn login(server: &TestServer, email: &str, password: &str) -> String {
        let response = server
            .post("/api/v1/login")
            .json(&json!({ "email": email, "password": password }))
            .await;
        response.assert_status(axum::http::StatusCode::CREATED);
        let body: Value = response.json();
        body["data"]["access_token"]
            .as_str()
            .expect("login response carries a token")
            .to_string()
    }

    /// Registers a user, grants admin rights and returns its bearer token.
    pub async fn admin_token(server: &TestServer, context: &TestContext) -> String {
        let email = "admin@pronostics.test";
        let token = register_and_login(server, email).await;
        context
            .state
            .service
            .grant_admin(email)
            .await
            .expect("Failed to grant admin");
        token
    }

    /// `Authorization` header value for a bearer token.
    pub fn bearer(token: &str) -> HeaderValue {
        HeaderValue::from_str(&format!("Bearer {token}")).unwrap()
    }
}
