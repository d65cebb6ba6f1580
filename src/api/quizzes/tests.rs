use axum::http::{Method, StatusCode};
use serde_json::json;
use tower::ServiceExt;
use uuid::Uuid;

use crate::api::messages;
use crate::db::types::UserRole;
use crate::repositories;
use crate::test_support::{self, TestContext};

/// Two questions: the first has one correct option of two, the second has two
/// correct options of three.
fn quiz_payload() -> serde_json::Value {
    json!({
        "title": "Quiz Pecahan Senilai",
        "description": "Pilih semua jawaban yang benar",
        "passing_percentage": 70,
        "questions": [
            {
                "question_text": "Pecahan yang senilai dengan 1/2 adalah?",
                "question_type": "multiple_choice",
                "options": [
                    { "option_text": "2/4", "is_correct": true },
                    { "option_text": "2/3", "is_correct": false }
                ]
            },
            {
                "question_text": "Manakah yang senilai dengan 2/3?",
                "question_type": "multiple_choice",
                "options": [
                    { "option_text": "3/4", "is_correct": false },
                    { "option_text": "4/6", "is_correct": true },
                    { "option_text": "6/9", "is_correct": true }
                ]
            }
        ]
    })
}

struct QuizScenario {
    teacher_token: String,
    student_token: String,
    lesson_id: String,
    student_id: String,
    quiz_id: String,
}

/// Owner teacher, one enrolled student, and a freshly created quiz built from
/// `quiz_payload()`.
async fn seed_quiz(ctx: &TestContext) -> QuizScenario {
    let teacher =
        test_support::insert_user(ctx.state.db(), "guru@example.com", "Bu Ani", "guru-pass", UserRole::Guru)
            .await;
    let student =
        test_support::insert_user(ctx.state.db(), "siswa@example.com", "Budi", "siswa-pass", UserRole::Siswa)
            .await;
    let fixture = test_support::create_lesson_for_teacher(ctx.state.db(), &teacher.id).await;
    test_support::insert_enrollment(ctx.state.db(), &fixture.course_id, &student.id).await;

    let teacher_token = test_support::bearer_token(&teacher.id, ctx.state.settings());
    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/lessons/{}/quizzes", fixture.lesson_id),
            Some(&teacher_token),
            Some(quiz_payload()),
        ))
        .await
        .expect("create quiz");

    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::CREATED, "response: {body}");
    let quiz_id = body["quiz"]["id"].as_str().expect("quiz id").to_string();

    QuizScenario {
        teacher_token,
        student_token: test_support::bearer_token(&student.id, ctx.state.settings()),
        lesson_id: fixture.lesson_id,
        student_id: student.id,
        quiz_id,
    }
}

async fn fetch_student_view(ctx: &TestContext, token: &str, quiz_id: &str) -> serde_json::Value {
    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/quizzes/{quiz_id}/student"),
            Some(token),
            None,
        ))
        .await
        .expect("student quiz view");

    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {body}");
    body
}

/// Picks the correct option ids out of the sanitized student view by position:
/// `quiz_payload()` marks option 1 of question 1 and options 2 and 3 of
/// question 2 as correct.
fn all_correct_answers(student_view: &serde_json::Value) -> serde_json::Value {
    let questions = student_view["quiz"]["questions"].as_array().expect("questions");
    let first = &questions[0];
    let second = &questions[1];

    json!({
        "answers": [
            {
                "question_id": first["id"],
                "selected_option_ids": [first["options"][0]["id"]]
            },
            {
                "question_id": second["id"],
                "selected_option_ids": [second["options"][1]["id"], second["options"][2]["id"]]
            }
        ]
    })
}

async fn submit(
    ctx: &TestContext,
    token: &str,
    quiz_id: &str,
    answers: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/quizzes/{quiz_id}/submit"),
            Some(token),
            Some(answers),
        ))
        .await
        .expect("submit quiz");

    let status = response.status();
    let body = test_support::read_json(response).await;
    (status, body)
}

async fn lesson_has_quiz(ctx: &TestContext, lesson_id: &str) -> bool {
    sqlx::query_scalar("SELECT has_quiz FROM lessons WHERE id = $1")
        .bind(lesson_id)
        .fetch_one(ctx.state.db())
        .await
        .expect("lesson has_quiz flag")
}

async fn progress_completed(ctx: &TestContext, lesson_id: &str, student_id: &str) -> Option<bool> {
    sqlx::query_scalar(
        "SELECT completed FROM lesson_progress WHERE lesson_id = $1 AND student_id = $2",
    )
    .bind(lesson_id)
    .bind(student_id)
    .fetch_optional(ctx.state.db())
    .await
    .expect("lesson progress row")
}

#[tokio::test]
async fn creating_a_quiz_echoes_questions_and_marks_the_lesson() {
    let Some(ctx) = test_support::setup_test_context().await else {
        return;
    };

    let teacher =
        test_support::insert_user(ctx.state.db(), "guru@example.com", "Bu Ani", "guru-pass", UserRole::Guru)
            .await;
    let fixture = test_support::create_lesson_for_teacher(ctx.state.db(), &teacher.id).await;
    let token = test_support::bearer_token(&teacher.id, ctx.state.settings());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/lessons/{}/quizzes", fixture.lesson_id),
            Some(&token),
            Some(quiz_payload()),
        ))
        .await
        .expect("create quiz");

    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::CREATED, "response: {body}");
    assert_eq!(body["message"], messages::QUIZ_CREATED);
    assert_eq!(body["quiz"]["lesson_id"], fixture.lesson_id.as_str());
    assert_eq!(body["quiz"]["passing_percentage"], 70);
    assert_eq!(body["quiz"]["questions"].as_array().expect("questions").len(), 2);
    assert!(lesson_has_quiz(&ctx, &fixture.lesson_id).await);
}

#[tokio::test]
async fn deleting_the_last_quiz_clears_the_lesson_flag() {
    let Some(ctx) = test_support::setup_test_context().await else {
        return;
    };
    let scenario = seed_quiz(&ctx).await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::DELETE,
            &format!("/api/quizzes/{}", scenario.quiz_id),
            Some(&scenario.teacher_token),
            None,
        ))
        .await
        .expect("delete quiz");

    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {body}");
    assert_eq!(body["message"], messages::QUIZ_DELETED);
    assert!(!lesson_has_quiz(&ctx, &scenario.lesson_id).await);

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/quizzes/{}", scenario.quiz_id),
            Some(&scenario.teacher_token),
            None,
        ))
        .await
        .expect("detail after delete");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn passing_submission_records_attempt_and_completes_lesson() {
    let Some(ctx) = test_support::setup_test_context().await else {
        return;
    };
    let scenario = seed_quiz(&ctx).await;

    let view = fetch_student_view(&ctx, &scenario.student_token, &scenario.quiz_id).await;
    let (status, body) =
        submit(&ctx, &scenario.student_token, &scenario.quiz_id, all_correct_answers(&view)).await;

    assert_eq!(status, StatusCode::OK, "response: {body}");
    assert_eq!(body["message"], messages::QUIZ_PASSED);
    assert_eq!(body["result"]["score_percentage"], 100);
    assert_eq!(body["result"]["is_passed"], true);
    assert_eq!(body["result"]["correct_count"], 2);
    assert_eq!(body["result"]["total_questions"], 2);
    assert_eq!(body["result"]["passing_percentage"], 70);
    for answer in body["result"]["answers"].as_array().expect("answers") {
        assert_eq!(answer["is_correct"], true, "answer: {answer}");
    }

    assert_eq!(progress_completed(&ctx, &scenario.lesson_id, &scenario.student_id).await, Some(true));

    let attempts =
        repositories::quiz_attempts::list_for_student(ctx.state.db(), &scenario.quiz_id, &scenario.student_id)
            .await
            .expect("attempts");
    assert_eq!(attempts.len(), 1);
    assert!(attempts[0].is_passed);
}

#[tokio::test]
async fn failing_submission_leaves_progress_untouched() {
    let Some(ctx) = test_support::setup_test_context().await else {
        return;
    };
    let scenario = seed_quiz(&ctx).await;

    let view = fetch_student_view(&ctx, &scenario.student_token, &scenario.quiz_id).await;
    let mut answers = all_correct_answers(&view);
    // Wrong option on question 1: one of two correct, 50 < 70.
    answers["answers"][0]["selected_option_ids"] =
        json!([view["quiz"]["questions"][0]["options"][1]["id"]]);

    let (status, body) = submit(&ctx, &scenario.student_token, &scenario.quiz_id, answers).await;

    assert_eq!(status, StatusCode::OK, "response: {body}");
    assert_eq!(body["message"], messages::QUIZ_FAILED);
    assert_eq!(body["result"]["score_percentage"], 50);
    assert_eq!(body["result"]["is_passed"], false);
    assert_eq!(body["result"]["correct_count"], 1);
    assert_eq!(progress_completed(&ctx, &scenario.lesson_id, &scenario.student_id).await, None);
}

#[tokio::test]
async fn failing_attempt_never_unmarks_a_completed_lesson() {
    let Some(ctx) = test_support::setup_test_context().await else {
        return;
    };
    let scenario = seed_quiz(&ctx).await;

    let view = fetch_student_view(&ctx, &scenario.student_token, &scenario.quiz_id).await;
    let (status, _) =
        submit(&ctx, &scenario.student_token, &scenario.quiz_id, all_correct_answers(&view)).await;
    assert_eq!(status, StatusCode::OK);

    let mut wrong = all_correct_answers(&view);
    wrong["answers"][0]["selected_option_ids"] = json!([]);
    wrong["answers"][1]["selected_option_ids"] = json!([]);
    let (status, body) = submit(&ctx, &scenario.student_token, &scenario.quiz_id, wrong).await;

    assert_eq!(status, StatusCode::OK, "response: {body}");
    assert_eq!(body["result"]["is_passed"], false);
    assert_eq!(progress_completed(&ctx, &scenario.lesson_id, &scenario.student_id).await, Some(true));
}

#[tokio::test]
async fn answers_for_unknown_questions_are_ignored() {
    let Some(ctx) = test_support::setup_test_context().await else {
        return;
    };
    let scenario = seed_quiz(&ctx).await;

    let view = fetch_student_view(&ctx, &scenario.student_token, &scenario.quiz_id).await;
    let mut answers = all_correct_answers(&view);
    answers["answers"]
        .as_array_mut()
        .expect("answers array")
        .push(json!({
            "question_id": Uuid::new_v4().to_string(),
            "selected_option_ids": [Uuid::new_v4().to_string()]
        }));

    let (status, body) = submit(&ctx, &scenario.student_token, &scenario.quiz_id, answers).await;

    assert_eq!(status, StatusCode::OK, "response: {body}");
    assert_eq!(body["result"]["total_questions"], 2);
    assert_eq!(body["result"]["score_percentage"], 100);
    assert_eq!(body["result"]["answers"].as_array().expect("answers").len(), 2);
}

#[tokio::test]
async fn quiz_update_replaces_the_question_set() {
    let Some(ctx) = test_support::setup_test_context().await else {
        return;
    };
    let scenario = seed_quiz(&ctx).await;

    let view = fetch_student_view(&ctx, &scenario.student_token, &scenario.quiz_id).await;
    let old_ids: Vec<String> = view["quiz"]["questions"]
        .as_array()
        .expect("questions")
        .iter()
        .map(|question| question["id"].as_str().expect("question id").to_string())
        .collect();

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::PUT,
            &format!("/api/quizzes/{}", scenario.quiz_id),
            Some(&scenario.teacher_token),
            Some(json!({
                "title": "Quiz Pecahan Senilai (revisi)",
                "questions": [
                    {
                        "question_text": "Bentuk paling sederhana dari 4/8 adalah?",
                        "options": [
                            { "option_text": "1/2", "is_correct": true },
                            { "option_text": "2/3", "is_correct": false }
                        ]
                    },
                    {
                        "question_text": "Bentuk paling sederhana dari 6/9 adalah?",
                        "options": [
                            { "option_text": "2/3", "is_correct": true },
                            { "option_text": "3/4", "is_correct": false }
                        ]
                    }
                ]
            })),
        ))
        .await
        .expect("update quiz");

    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {body}");
    assert_eq!(body["message"], messages::QUIZ_UPDATED);

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/quizzes/{}", scenario.quiz_id),
            Some(&scenario.teacher_token),
            None,
        ))
        .await
        .expect("detail after update");
    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {body}");
    assert_eq!(body["quiz"]["title"], "Quiz Pecahan Senilai (revisi)");

    let questions = body["quiz"]["questions"].as_array().expect("questions");
    assert_eq!(questions.len(), 2);
    assert_eq!(questions[0]["position"], 1);
    assert_eq!(questions[1]["position"], 2);
    for question in questions {
        let id = question["id"].as_str().expect("question id");
        assert!(!old_ids.iter().any(|old| old == id), "old question {id} survived the update");
    }
}

#[tokio::test]
async fn invalid_question_aborts_quiz_creation_entirely() {
    let Some(ctx) = test_support::setup_test_context().await else {
        return;
    };

    let teacher =
        test_support::insert_user(ctx.state.db(), "guru@example.com", "Bu Ani", "guru-pass", UserRole::Guru)
            .await;
    let fixture = test_support::create_lesson_for_teacher(ctx.state.db(), &teacher.id).await;
    let token = test_support::bearer_token(&teacher.id, ctx.state.settings());

    let mut payload = quiz_payload();
    payload["questions"][1]["options"] = json!([]);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/lessons/{}/quizzes", fixture.lesson_id),
            Some(&token),
            Some(payload),
        ))
        .await
        .expect("create quiz with broken question");

    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "response: {body}");
    assert_eq!(body["detail"], messages::invalid_question(2));

    let quiz_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM quizzes WHERE lesson_id = $1")
        .bind(&fixture.lesson_id)
        .fetch_one(ctx.state.db())
        .await
        .expect("quiz count");
    assert_eq!(quiz_count, 0);
    assert!(!lesson_has_quiz(&ctx, &fixture.lesson_id).await);
}

#[tokio::test]
async fn invalid_update_leaves_the_old_questions_intact() {
    let Some(ctx) = test_support::setup_test_context().await else {
        return;
    };
    let scenario = seed_quiz(&ctx).await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::PUT,
            &format!("/api/quizzes/{}", scenario.quiz_id),
            Some(&scenario.teacher_token),
            Some(json!({
                "title": "Revisi gagal",
                "questions": [
                    { "question_text": "", "options": [{ "option_text": "1/2", "is_correct": true }] }
                ]
            })),
        ))
        .await
        .expect("update with broken question");

    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "response: {body}");
    assert_eq!(body["detail"], messages::invalid_question(1));

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/quizzes/{}", scenario.quiz_id),
            Some(&scenario.teacher_token),
            None,
        ))
        .await
        .expect("detail after failed update");
    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {body}");
    assert_eq!(body["quiz"]["title"], "Quiz Pecahan Senilai");
    assert_eq!(body["quiz"]["questions"].as_array().expect("questions").len(), 2);
}

#[tokio::test]
async fn quiz_authoring_is_owner_only() {
    let Some(ctx) = test_support::setup_test_context().await else {
        return;
    };
    let scenario = seed_quiz(&ctx).await;

    let other =
        test_support::insert_user(ctx.state.db(), "lain@example.com", "Pak Dodi", "guru-pass", UserRole::Guru)
            .await;
    let other_token = test_support::bearer_token(&other.id, ctx.state.settings());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/lessons/{}/quizzes", scenario.lesson_id),
            Some(&other_token),
            Some(quiz_payload()),
        ))
        .await
        .expect("create as other teacher");
    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::FORBIDDEN, "response: {body}");
    assert_eq!(body["detail"], messages::QUIZ_CREATE_FORBIDDEN);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::PUT,
            &format!("/api/quizzes/{}", scenario.quiz_id),
            Some(&other_token),
            Some(quiz_payload()),
        ))
        .await
        .expect("update as other teacher");
    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::FORBIDDEN, "response: {body}");
    assert_eq!(body["detail"], messages::QUIZ_UPDATE_FORBIDDEN);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::DELETE,
            &format!("/api/quizzes/{}", scenario.quiz_id),
            Some(&other_token),
            None,
        ))
        .await
        .expect("delete as other teacher");
    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::FORBIDDEN, "response: {body}");
    assert_eq!(body["detail"], messages::QUIZ_DELETE_FORBIDDEN);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/quizzes/{}", scenario.quiz_id),
            Some(&other_token),
            None,
        ))
        .await
        .expect("detail as other teacher");
    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::FORBIDDEN, "response: {body}");
    assert_eq!(body["detail"], messages::QUIZ_VIEW_FORBIDDEN);

    let admin =
        test_support::insert_user(ctx.state.db(), "admin@example.com", "Admin", "admin-pass", UserRole::Admin)
            .await;
    let admin_token = test_support::bearer_token(&admin.id, ctx.state.settings());
    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/quizzes/{}", scenario.quiz_id),
            Some(&admin_token),
            None,
        ))
        .await
        .expect("detail as admin");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn student_view_never_reveals_correct_options() {
    let Some(ctx) = test_support::setup_test_context().await else {
        return;
    };
    let scenario = seed_quiz(&ctx).await;

    let view = fetch_student_view(&ctx, &scenario.student_token, &scenario.quiz_id).await;
    assert_eq!(view["message"], messages::QUIZ_OK);
    assert_eq!(view["quiz"]["has_passed"], false);
    assert_eq!(view["quiz"]["questions"].as_array().expect("questions").len(), 2);
    assert!(
        !view.to_string().contains("is_correct"),
        "student view leaked answer flags: {view}"
    );

    let (status, _) =
        submit(&ctx, &scenario.student_token, &scenario.quiz_id, all_correct_answers(&view)).await;
    assert_eq!(status, StatusCode::OK);

    let view = fetch_student_view(&ctx, &scenario.student_token, &scenario.quiz_id).await;
    assert_eq!(view["quiz"]["has_passed"], true);
}

#[tokio::test]
async fn delivery_requires_enrollment() {
    let Some(ctx) = test_support::setup_test_context().await else {
        return;
    };
    let scenario = seed_quiz(&ctx).await;

    let outsider =
        test_support::insert_user(ctx.state.db(), "luar@example.com", "Caca", "siswa-pass", UserRole::Siswa)
            .await;
    let outsider_token = test_support::bearer_token(&outsider.id, ctx.state.settings());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/quizzes/{}/student", scenario.quiz_id),
            Some(&outsider_token),
            None,
        ))
        .await
        .expect("student view unenrolled");
    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::FORBIDDEN, "response: {body}");
    assert_eq!(body["detail"], messages::NOT_ENROLLED);

    let (status, body) = submit(
        &ctx,
        &outsider_token,
        &scenario.quiz_id,
        json!({ "answers": [{ "question_id": "x", "selected_option_ids": [] }] }),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN, "response: {body}");
    assert_eq!(body["detail"], messages::NOT_ENROLLED);

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/quizzes/{}/results", scenario.quiz_id),
            Some(&outsider_token),
            None,
        ))
        .await
        .expect("results unenrolled");
    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::FORBIDDEN, "response: {body}");
    assert_eq!(body["detail"], messages::NOT_ENROLLED);
}

#[tokio::test]
async fn results_before_any_attempt_return_an_empty_history() {
    let Some(ctx) = test_support::setup_test_context().await else {
        return;
    };
    let scenario = seed_quiz(&ctx).await;

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/quizzes/{}/results", scenario.quiz_id),
            Some(&scenario.student_token),
            None,
        ))
        .await
        .expect("results without attempts");

    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {body}");
    assert_eq!(body["message"], messages::NO_ATTEMPTS);
    assert_eq!(body["quiz"]["title"], "Quiz Pecahan Senilai");
    assert_eq!(body["attempts"].as_array().expect("attempts").len(), 0);
    assert!(body["last_attempt_details"].is_null());
}

#[tokio::test]
async fn results_expose_the_latest_attempt_with_option_review() {
    let Some(ctx) = test_support::setup_test_context().await else {
        return;
    };
    let scenario = seed_quiz(&ctx).await;

    let view = fetch_student_view(&ctx, &scenario.student_token, &scenario.quiz_id).await;
    let mut wrong = all_correct_answers(&view);
    wrong["answers"][0]["selected_option_ids"] = json!([]);
    let (status, _) = submit(&ctx, &scenario.student_token, &scenario.quiz_id, wrong).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) =
        submit(&ctx, &scenario.student_token, &scenario.quiz_id, all_correct_answers(&view)).await;
    assert_eq!(status, StatusCode::OK);

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/quizzes/{}/results", scenario.quiz_id),
            Some(&scenario.student_token),
            None,
        ))
        .await
        .expect("results after attempts");

    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {body}");
    assert_eq!(body["message"], messages::RESULTS_OK);

    let attempts = body["attempts"].as_array().expect("attempts");
    assert_eq!(attempts.len(), 2);
    assert_eq!(attempts[0]["is_passed"], true, "newest attempt first");
    assert_eq!(attempts[1]["is_passed"], false);

    let latest = &body["last_attempt_details"];
    assert_eq!(latest["is_passed"], true);
    assert_eq!(latest["score_percentage"], 100);

    let answers = latest["answers"].as_array().expect("review answers");
    assert_eq!(answers.len(), 2);
    for answer in answers {
        assert_eq!(answer["is_correct"], true, "answer: {answer}");
        assert!(answer["question_text"].as_str().is_some_and(|text| !text.is_empty()));
        let options = answer["options"].as_array().expect("review options");
        assert!(!options.is_empty());
        for option in options {
            assert!(option["is_correct"].is_boolean(), "review must carry answer flags: {option}");
        }
    }
}

#[tokio::test]
async fn submitting_to_a_quiz_without_questions_is_rejected() {
    let Some(ctx) = test_support::setup_test_context().await else {
        return;
    };
    let scenario = seed_quiz(&ctx).await;

    // Question rows are created through the API only, so an empty quiz is
    // seeded straight into the table.
    let empty_quiz_id = Uuid::new_v4().to_string();
    sqlx::query(
        "INSERT INTO quizzes (id, lesson_id, title, created_at, updated_at)
         VALUES ($1,$2,'Quiz kosong',NOW(),NOW())",
    )
    .bind(&empty_quiz_id)
    .bind(&scenario.lesson_id)
    .execute(ctx.state.db())
    .await
    .expect("insert empty quiz");

    let (status, body) = submit(
        &ctx,
        &scenario.student_token,
        &empty_quiz_id,
        json!({ "answers": [{ "question_id": "x", "selected_option_ids": [] }] }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST, "response: {body}");
    assert_eq!(body["detail"], messages::QUIZ_HAS_NO_QUESTIONS);
}

#[tokio::test]
async fn submission_requires_at_least_one_answer() {
    let Some(ctx) = test_support::setup_test_context().await else {
        return;
    };
    let scenario = seed_quiz(&ctx).await;

    let (status, body) =
        submit(&ctx, &scenario.student_token, &scenario.quiz_id, json!({ "answers": [] })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST, "response: {body}");
    assert_eq!(body["detail"], "Array jawaban wajib diisi");
}

#[tokio::test]
async fn missing_quiz_returns_not_found_everywhere() {
    let Some(ctx) = test_support::setup_test_context().await else {
        return;
    };
    let scenario = seed_quiz(&ctx).await;
    let missing = Uuid::new_v4().to_string();

    for uri in [
        format!("/api/quizzes/{missing}"),
        format!("/api/quizzes/{missing}/student"),
        format!("/api/quizzes/{missing}/results"),
    ] {
        let response = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::GET,
                &uri,
                Some(&scenario.student_token),
                None,
            ))
            .await
            .expect("missing quiz");
        let status = response.status();
        let body = test_support::read_json(response).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri} response: {body}");
        assert_eq!(body["detail"], messages::QUIZ_NOT_FOUND, "uri: {uri}");
    }

    let (status, body) = submit(
        &ctx,
        &scenario.student_token,
        &missing,
        json!({ "answers": [{ "question_id": "x", "selected_option_ids": [] }] }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND, "response: {body}");
    assert_eq!(body["detail"], messages::QUIZ_NOT_FOUND);
}
