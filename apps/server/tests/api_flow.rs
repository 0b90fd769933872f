//! End-to-end flows through the full router: store, memory cache, and
//! rule-based insights, with a throwaway SQLite database per test.

mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{get, post, request, signup_and_login, spawn_app};

#[tokio::test]
async fn jar_lifecycle_with_balance_guard() {
    let app = spawn_app().await;
    let token = signup_and_login(&app.router).await;

    let (status, jar) = post(
        &app.router,
        "/api/jars",
        &token,
        json!({ "jarName": "Trip", "goalAmount": 1000 }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(jar["amountSaved"], 0.0);
    let jar_id = jar["id"].as_str().unwrap().to_string();

    // Withdrawing more than the balance is a business error.
    let (status, body) = post(
        &app.router,
        &format!("/api/jars/{jar_id}/withdraw"),
        &token,
        json!({ "amount": 1500 }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Withdrawal amount cannot be greater than the saved amount."
    );

    let (status, jar) = post(
        &app.router,
        &format!("/api/jars/{jar_id}/deposit"),
        &token,
        json!({ "amount": 200 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(jar["amountSaved"], 200.0);

    // The list read (cache-aside) observes the deposit immediately.
    let (status, jars) = get(&app.router, "/api/jars", &token).await;
    assert_eq!(status, StatusCode::OK);
    let jars = jars.as_array().unwrap();
    assert_eq!(jars.len(), 1);
    assert_eq!(jars[0]["amountSaved"], 200.0);

    // Deposits and withdrawals leave ledger transactions behind.
    let (status, page) = get(&app.router, "/api/transactions", &token).await;
    assert_eq!(status, StatusCode::OK);
    let items = page["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["category"], "Savings");
    assert_eq!(items[0]["type"], "Expense");
}

#[tokio::test]
async fn goal_contributions_complete_and_lock_the_goal() {
    let app = spawn_app().await;
    let token = signup_and_login(&app.router).await;

    let (status, goal) = post(
        &app.router,
        "/api/goals",
        &token,
        json!({
            "goalName": "Emergency Fund",
            "targetAmount": 300,
            "targetDate": "2027-01-01T00:00:00Z"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(goal["status"], "In Progress");
    let goal_id = goal["id"].as_str().unwrap().to_string();

    let (_, goal) = post(
        &app.router,
        &format!("/api/goals/{goal_id}/contribute"),
        &token,
        json!({ "amount": 299 }),
    )
    .await;
    assert_eq!(goal["status"], "In Progress");

    let (_, goal) = post(
        &app.router,
        &format!("/api/goals/{goal_id}/contribute"),
        &token,
        json!({ "amount": 1 }),
    )
    .await;
    assert_eq!(goal["status"], "Completed");
    assert_eq!(goal["amountSaved"], 300.0);

    let (status, body) = post(
        &app.router,
        &format!("/api/goals/{goal_id}/contribute"),
        &token,
        json!({ "amount": 1 }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "This goal has already been completed.");

    // The single-goal read reflects the completed state.
    let (status, goal) = get(&app.router, &format!("/api/goals/{goal_id}"), &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(goal["status"], "Completed");
}

#[tokio::test]
async fn overdue_charges_become_due_on_read_and_pay_links_a_transaction() {
    let app = spawn_app().await;
    let token = signup_and_login(&app.router).await;

    let (status, charge) = post(
        &app.router,
        "/api/charges",
        &token,
        json!({
            "chargeName": "Electric bill",
            "field": "Utilities",
            "dueDate": "2020-01-01T00:00:00Z",
            "amount": 120
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(charge["status"], "Upcoming");
    let charge_id = charge["id"].as_str().unwrap().to_string();

    // The due date is long past, so the first read sweeps it to Due.
    let (status, dues) = get(&app.router, "/api/charges/dues", &token).await;
    assert_eq!(status, StatusCode::OK);
    let dues = dues.as_array().unwrap();
    assert_eq!(dues.len(), 1);
    assert_eq!(dues[0]["status"], "Due");

    let (status, charge) = request(
        &app.router,
        Method::PATCH,
        &format!("/api/charges/{charge_id}/mark-paid"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(charge["status"], "Paid");
    assert_eq!(charge["isPaid"], true);

    // Paying created a transaction linked by charge id.
    let (_, page) = get(&app.router, "/api/transactions", &token).await;
    let items = page["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["chargeId"], charge_id.as_str());
    assert_eq!(items[0]["amount"], 120.0);

    let (status, charge) = request(
        &app.router,
        Method::PATCH,
        &format!("/api/charges/{charge_id}/mark-not-paid"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(charge["isPaid"], false);
    assert_eq!(charge["status"], "Due");

    let (_, page) = get(&app.router, "/api/transactions", &token).await;
    assert!(page["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn transactions_paginate_and_summarize() {
    let app = spawn_app().await;
    let token = signup_and_login(&app.router).await;

    for i in 1..=12 {
        let (status, _) = post(
            &app.router,
            "/api/transactions",
            &token,
            json!({
                "amount": i,
                "type": if i % 2 == 0 { "Income" } else { "Expense" },
                "category": "Misc"
            }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, page) = get(&app.router, "/api/transactions?page=1&limit=5", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["items"].as_array().unwrap().len(), 5);
    assert_eq!(page["totalPages"], 3);
    assert_eq!(page["currentPage"], 1);

    let (status, page) = get(
        &app.router,
        "/api/transactions?page=1&limit=20&type=Income",
        &token,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["items"].as_array().unwrap().len(), 6);

    // 2+4+...+12 income, 1+3+...+11 expense.
    let (status, summary) = get(&app.router, "/api/transactions/summary", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["totalIncome"], 42.0);
    assert_eq!(summary["totalExpense"], 36.0);

    let (status, trend) = get(&app.router, "/api/transactions/spending-trend", &token).await;
    assert_eq!(status, StatusCode::OK);
    let trend = trend.as_array().unwrap();
    assert!(trend.len() >= 28);
    let today_total: f64 = trend
        .iter()
        .map(|p| p["amount"].as_f64().unwrap())
        .sum();
    assert_eq!(today_total, 36.0);
}

#[tokio::test]
async fn onboarding_applies_profile_goals_jars_and_first_month() {
    let app = spawn_app().await;
    let token = signup_and_login(&app.router).await;

    let payload = json!({
        "income": {
            "monthlyIncome": 4000,
            "incomeType": "monthly",
            "additionalSources": [{ "name": "Freelance", "amount": 500 }]
        },
        "expenses": {
            "predefinedExpenses": { "rent": 1200 },
            "customExpenses": [{ "name": "Gym", "amount": 50 }]
        },
        "goals": {
            "predefinedGoals": { "trip": { "amount": 1500 } },
            "customGoals": [{ "name": "New Bike", "amount": 800 }],
            "financeTips": true
        }
    });

    let (status, body) = post(&app.router, "/api/onboarding/submit", &token, payload.clone()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Onboarding completed successfully!");
    assert_eq!(body["user"]["onboardingDone"], true);
    assert_eq!(body["user"]["monthlyIncome"], 4000.0);
    assert_eq!(body["user"]["recurringExpenses"].as_array().unwrap().len(), 2);

    // Goals and jars mirror each other.
    let (_, goals) = get(&app.router, "/api/goals", &token).await;
    assert_eq!(goals.as_array().unwrap().len(), 2);
    let (_, jars) = get(&app.router, "/api/jars", &token).await;
    assert_eq!(jars.as_array().unwrap().len(), 2);

    // First month materialized: 2 recurring incomes + 2 recurring expenses.
    let (_, page) = get(&app.router, "/api/transactions?limit=50", &token).await;
    assert_eq!(page["items"].as_array().unwrap().len(), 4);

    // Profile access right after onboarding must not materialize again.
    let (status, profile) = get(&app.router, "/api/users/profile", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["monthlyIncome"], 4000.0);
    let (_, page) = get(&app.router, "/api/transactions?limit=50", &token).await;
    assert_eq!(page["items"].as_array().unwrap().len(), 4);

    // Onboarding is one-shot.
    let (status, body) = post(&app.router, "/api/onboarding/submit", &token, payload).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Onboarding already completed.");
}

#[tokio::test]
async fn insights_come_back_for_any_account_state() {
    let app = spawn_app().await;
    let token = signup_and_login(&app.router).await;

    let (status, insights) = get(&app.router, "/api/insights/all", &token).await;
    assert_eq!(status, StatusCode::OK);
    let insights = insights.as_array().unwrap();
    assert!(!insights.is_empty());
    for insight in insights {
        assert!(insight["title"].is_string());
        assert!(insight["description"].is_string());
        assert!(["positive", "tip", "suggestion", "reminder"]
            .contains(&insight["kind"].as_str().unwrap()));
    }
}

#[tokio::test]
async fn validation_failures_are_bad_requests() {
    let app = spawn_app().await;
    let token = signup_and_login(&app.router).await;

    let (status, _) = post(
        &app.router,
        "/api/jars",
        &token,
        json!({ "jarName": "Trip", "goalAmount": -10 }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post(
        &app.router,
        "/api/transactions",
        &token,
        json!({ "amount": 10, "type": "RecurringIncome" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = get(&app.router, "/api/charges?status=Bogus", &token).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn foreign_entities_read_as_not_found() {
    let app = spawn_app().await;
    let token = signup_and_login(&app.router).await;

    // Jane owns a goal; John must not see it, and the response must not
    // distinguish "missing" from "not yours".
    let (status, _) = request(
        &app.router,
        Method::POST,
        "/api/auth/signup",
        None,
        Some(json!({
            "fullName": "Jane Roe",
            "email": "jane@y.org",
            "password": "password456"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let (_, login) = request(
        &app.router,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "email": "jane@y.org", "password": "password456" })),
    )
    .await;
    let jane_token = login["token"].as_str().unwrap().to_string();

    let (_, goal) = post(
        &app.router,
        "/api/goals",
        &jane_token,
        json!({
            "goalName": "Jane's Goal",
            "targetAmount": 100,
            "targetDate": "2027-01-01T00:00:00Z"
        }),
    )
    .await;
    let goal_id = goal["id"].as_str().unwrap();

    let (status, body) = get(&app.router, &format!("/api/goals/{goal_id}"), &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Goal not found or access denied.");

    let (status, missing) = get(&app.router, "/api/goals/does-not-exist", &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(missing["message"], "Goal not found or access denied.");
}
