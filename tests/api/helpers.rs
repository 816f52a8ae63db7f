use member_search::{
    app_state::{AppState, MemberStoreType},
    domain::{MemberStore, NewMember, TeamName, Username},
    get_postgres_pool,
    services::data_stores::PostgresMemberStore,
    utils::constants::{test, DATABASE_URL},
    Application,
};
use reqwest::Response;
use secrecy::{ExposeSecret, Secret};
use serde_json::Value;
use sqlx::{
    postgres::{PgConnectOptions, PgConnection, PgPoolOptions},
    Connection, Executor, PgPool,
};
use std::{str::FromStr, sync::Arc};
use test_context::AsyncTestContext;
use tokio::sync::RwLock;
use uuid::Uuid;

pub struct TestApp {
    pub address: String,
    pub http_client: reqwest::Client,
    pub member_store: MemberStoreType,
    pub tmp_db_name: String,
}

impl TestApp {
    pub async fn new() -> Self {
        let tmp_db_name = Uuid::new_v4().to_string();
        let pg_pool = configure_postgresql(&tmp_db_name).await;
        let member_store: MemberStoreType =
            Arc::new(RwLock::new(PostgresMemberStore::new(pg_pool)));
        let app_state = AppState::new(member_store.clone());

        let app = Application::build(app_state, test::APP_ADDRESS)
            .await
            .expect("Failed to build app");
        let address = format!("http://{}", app.address.clone());

        #[allow(clippy::let_underscore_future)]
        let _ = tokio::spawn(app.run());

        let http_client = reqwest::Client::builder()
            .build()
            .expect("Failed to build HTTP client");

        Self {
            address,
            http_client,
            member_store,
            tmp_db_name,
        }
    }

    pub async fn get_members<Query>(&self, query: &Query) -> Response
    where
        Query: serde::Serialize + ?Sized,
    {
        self.http_client
            .get(format!("{}/v1/members", &self.address))
            .query(query)
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// teamA: member1 (10), member2 (20); teamB: member3 (30), member4 (40)
    pub async fn seed_members(&self) {
        let mut store = self.member_store.write().await;
        let team_a = store
            .add_team(TeamName::parse("teamA").unwrap())
            .await
            .unwrap();
        let team_b = store
            .add_team(TeamName::parse("teamB").unwrap())
            .await
            .unwrap();

        for (name, age, team) in [
            ("member1", 10, &team_a),
            ("member2", 20, &team_a),
            ("member3", 30, &team_b),
            ("member4", 40, &team_b),
        ] {
            store
                .add_member(NewMember::new(
                    Some(Username::parse(name).unwrap()),
                    age,
                    Some(team.team_id),
                ))
                .await
                .unwrap();
        }
    }
}

impl AsyncTestContext for TestApp {
    async fn setup() -> TestApp {
        TestApp::new().await
    }

    async fn teardown(self) {
        delete_database(&self.tmp_db_name).await;
    }
}

pub async fn get_json_response_body(response: Response) -> Value {
    response
        .json::<Value>()
        .await
        .expect("Failed to parse response body as JSON")
}

async fn configure_postgresql(db_name: &str) -> PgPool {
    let postgresql_conn_url = DATABASE_URL.to_owned();

    configure_database(&postgresql_conn_url, db_name).await;

    let postgresql_conn_url_with_db = Secret::new(format!(
        "{}/{}",
        postgresql_conn_url.expose_secret(),
        db_name
    ));

    get_postgres_pool(&postgresql_conn_url_with_db)
        .await
        .expect("Failed to create Postgres connection pool!")
}

async fn configure_database(db_conn_string: &Secret<String>, db_name: &str) {
    let connection = PgPoolOptions::new()
        .connect(db_conn_string.expose_secret())
        .await
        .expect("Failed to create Postgres connection pool.");

    connection
        .execute(format!(r#"CREATE DATABASE "{}";"#, db_name).as_str())
        .await
        .expect("Failed to create database.");

    let db_conn_string =
        format!("{}/{}", db_conn_string.expose_secret(), db_name);

    let connection = PgPoolOptions::new()
        .connect(&db_conn_string)
        .await
        .expect("Failed to create Postgres connection pool.");

    sqlx::migrate!()
        .run(&connection)
        .await
        .expect("Failed to migrate the database");
}

async fn delete_database(db_name: &str) {
    let postgresql_conn_url: String = DATABASE_URL.expose_secret().to_owned();

    let connection_options = PgConnectOptions::from_str(&postgresql_conn_url)
        .expect("Failed to parse PostgreSQL connection string");

    let mut connection = PgConnection::connect_with(&connection_options)
        .await
        .expect("Failed to connect to Postgres");

    // Drop any pool connections still held by the spawned app.
    connection
        .execute(
            format!(
                r#"
                SELECT pg_terminate_backend(pg_stat_activity.pid)
                FROM pg_stat_activity
                WHERE pg_stat_activity.datname = '{}'
                  AND pid <> pg_backend_pid();
                "#,
                db_name
            )
            .as_str(),
        )
        .await
        .expect("Failed to drop the database.");

    connection
        .execute(format!(r#"DROP DATABASE "{}";"#, db_name).as_str())
        .await
        .expect("Failed to drop the database.");
}
