use std::sync::{Mutex, MutexGuard, OnceLock};

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request},
    Router,
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::api;
use crate::core::{config::Settings, security, state::AppState, time::primitive_now_utc};
use crate::db::models::User;
use crate::db::types::UserRole;
use crate::repositories;

const TEST_SECRET_KEY: &str = "test-secret";

pub(crate) struct TestContext {
    pub(crate) state: AppState,
    pub(crate) app: Router,
    _guard: MutexGuard<'static, ()>,
}

/// Serializes tests that touch process environment or the shared test
/// database. Poisoning is ignored so one failing test does not cascade.
pub(crate) fn env_lock() -> MutexGuard<'static, ()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Integration tests need a throwaway Postgres database; they skip when
/// `MINDAGROW_TEST_DATABASE_URL` is absent so the suite still passes in
/// environments without one.
pub(crate) fn test_database_url() -> Option<String> {
    dotenvy::dotenv().ok();
    std::env::var("MINDAGROW_TEST_DATABASE_URL").ok().filter(|url| !url.is_empty())
}

fn set_test_env(database_url: &str) {
    std::env::set_var("MINDAGROW_ENV", "test");
    std::env::set_var("MINDAGROW_STRICT_CONFIG", "0");
    std::env::set_var("SECRET_KEY", TEST_SECRET_KEY);
    std::env::set_var("DATABASE_URL", database_url);
    std::env::set_var("PROMETHEUS_ENABLED", "0");
    std::env::remove_var("PROJECT_NAME");
    std::env::remove_var("API_STR");
    std::env::remove_var("BACKEND_CORS_ORIGINS");
    std::env::remove_var("FIRST_ADMIN_PASSWORD");
}

pub(crate) async fn setup_test_context() -> Option<TestContext> {
    let guard = env_lock();

    let Some(database_url) = test_database_url() else {
        eprintln!("skipping: MINDAGROW_TEST_DATABASE_URL is not set");
        return None;
    };
    set_test_env(&database_url);

    let settings = Settings::load().expect("settings");
    let db = prepare_db(&settings).await;

    let state = AppState::new(settings, db);
    let app = api::router::router(state.clone());

    Some(TestContext { state, app, _guard: guard })
}

async fn prepare_db(settings: &Settings) -> PgPool {
    let db = crate::db::init_pool(settings).await.expect("db pool");
    let current_db: String = sqlx::query_scalar("SELECT current_database()")
        .fetch_one(&db)
        .await
        .expect("current database");
    assert!(
        current_db.contains("test"),
        "refusing to reset database {current_db}: name must contain \"test\""
    );

    reset_public_schema(&db).await.expect("reset schema");
    crate::db::run_migrations(&db).await.expect("migrations");
    db
}

async fn reset_public_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("DROP SCHEMA IF EXISTS public CASCADE").execute(pool).await?;
    sqlx::query("CREATE SCHEMA public").execute(pool).await?;
    Ok(())
}

pub(crate) async fn insert_user(
    pool: &PgPool,
    email: &str,
    full_name: &str,
    password: &str,
    role: UserRole,
) -> User {
    let hashed_password = security::hash_password(password).expect("hash password");
    let now = primitive_now_utc();

    repositories::users::create(
        pool,
        repositories::users::CreateUser {
            id: &Uuid::new_v4().to_string(),
            email,
            hashed_password,
            full_name,
            role,
            is_active: true,
            created_at: now,
            updated_at: now,
        },
    )
    .await
    .expect("insert user")
}

pub(crate) async fn insert_course(pool: &PgPool, title: &str, teacher_id: &str) -> String {
    let id = Uuid::new_v4().to_string();
    let now = primitive_now_utc();
    sqlx::query(
        "INSERT INTO courses (id, title, description, teacher_id, created_at, updated_at)
         VALUES ($1,$2,'',$3,$4,$4)",
    )
    .bind(&id)
    .bind(title)
    .bind(teacher_id)
    .bind(now)
    .execute(pool)
    .await
    .expect("insert course");
    id
}

pub(crate) async fn insert_module(pool: &PgPool, course_id: &str, title: &str) -> String {
    let id = Uuid::new_v4().to_string();
    let now = primitive_now_utc();
    sqlx::query(
        "INSERT INTO modules (id, course_id, title, position, created_at, updated_at)
         VALUES ($1,$2,$3,1,$4,$4)",
    )
    .bind(&id)
    .bind(course_id)
    .bind(title)
    .bind(now)
    .execute(pool)
    .await
    .expect("insert module");
    id
}

pub(crate) async fn insert_lesson(pool: &PgPool, module_id: &str, title: &str) -> String {
    let id = Uuid::new_v4().to_string();
    let now = primitive_now_utc();
    sqlx::query(
        "INSERT INTO lessons (id, module_id, title, content, position, created_at, updated_at)
         VALUES ($1,$2,$3,'',1,$4,$4)",
    )
    .bind(&id)
    .bind(module_id)
    .bind(title)
    .bind(now)
    .execute(pool)
    .await
    .expect("insert lesson");
    id
}

pub(crate) async fn insert_enrollment(pool: &PgPool, course_id: &str, student_id: &str) {
    sqlx::query(
        "INSERT INTO enrollments (id, course_id, student_id, enrolled_at) VALUES ($1,$2,$3,$4)",
    )
    .bind(Uuid::new_v4().to_string())
    .bind(course_id)
    .bind(student_id)
    .bind(primitive_now_utc())
    .execute(pool)
    .await
    .expect("insert enrollment");
}

pub(crate) struct LessonFixture {
    pub(crate) course_id: String,
    pub(crate) lesson_id: String,
}

/// One course with one module and one lesson, owned by the given teacher.
pub(crate) async fn create_lesson_for_teacher(pool: &PgPool, teacher_id: &str) -> LessonFixture {
    let course_id = insert_course(pool, "Matematika Kelas 5", teacher_id).await;
    let module_id = insert_module(pool, &course_id, "Pecahan").await;
    let lesson_id = insert_lesson(pool, &module_id, "Pecahan Senilai").await;
    LessonFixture { course_id, lesson_id }
}

pub(crate) fn bearer_token(user_id: &str, settings: &Settings) -> String {
    security::create_access_token(user_id, settings, None).expect("token")
}

pub(crate) fn json_request(
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    if let Some(body) = body {
        let bytes = serde_json::to_vec(&body).expect("serialize body");
        builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(bytes))
            .expect("request body")
    } else {
        builder.body(Body::empty()).expect("request body")
    }
}

pub(crate) async fn read_json(response: axum::response::Response<Body>) -> serde_json::Value {
    let body = to_bytes(response.into_body(), usize::MAX).await.expect("response body");
    serde_json::from_slice(&body).unwrap_or_else(|err| {
        let body_text = String::from_utf8_lossy(&body);
        panic!("json parse: {err}; body: {body_text}");
    })
}
