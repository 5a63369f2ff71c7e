mod common;

use axum::http::{Method, StatusCode};
use common::TestApp;
use serde_json::json;

const WEEK: &str = "2026-10-12";

#[tokio::test]
async fn entries_copy_recipe_data_and_feed_the_weekly_summary() {
    let app = TestApp::new();
    let cookie = app.register("ana@example.com").await;

    let (status, recipe) = app
        .send(
            Method::POST,
            "/recipes",
            &cookie,
            Some(json!({ "title": "Oat porridge", "calories": 350 })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, entry) = app
        .send(
            Method::POST,
            "/meal-plans",
            &cookie,
            Some(json!({
                "weekStart": WEEK,
                "day": "monday",
                "mealType": "breakfast",
                "recipeId": recipe["id"]
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(entry["recipeTitle"], "Oat porridge");
    assert_eq!(entry["calories"], 350.0);

    for (day, slot, title, calories) in [
        ("monday", "breakfast", "Coffee", 5),
        ("wednesday", "dinner", "Salmon bowl", 640),
        ("sunday", "nightSnack", "Yoghurt", 120),
    ] {
        let (status, _) = app
            .send(
                Method::POST,
                "/meal-plans",
                &cookie,
                Some(json!({
                    "weekStart": WEEK,
                    "day": day,
                    "mealType": slot,
                    "recipeTitle": title,
                    "calories": calories
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, entries) = app
        .send(
            Method::GET,
            &format!("/meal-plans?week_start={}", WEEK),
            &cookie,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "query key is camelCase");
    assert!(entries.is_null());

    let (status, entries) = app
        .send(
            Method::GET,
            &format!("/meal-plans?weekStart={}", WEEK),
            &cookie,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let titles: Vec<&str> = entries
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["recipeTitle"].as_str().unwrap())
        .collect();
    assert_eq!(titles, ["Oat porridge", "Coffee", "Salmon bowl", "Yoghurt"]);

    let (status, summary) = app
        .send(
            Method::GET,
            &format!("/meal-plans/summary?weekStart={}", WEEK),
            &cookie,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["weeklyTotal"], 1115.0);
    // 1115 / 7 = 159.29
    assert_eq!(summary["weeklyAverage"], 159);
    assert_eq!(summary["days"][0]["day"], "monday");
    assert_eq!(summary["days"][0]["totalCalories"], 355.0);
    assert_eq!(summary["days"][0]["entryCount"], 2);
    assert_eq!(summary["days"][1]["totalCalories"], 0.0);
    assert_eq!(summary["days"][6]["totalCalories"], 120.0);
}

#[tokio::test]
async fn other_weeks_are_empty() {
    let app = TestApp::new();
    let cookie = app.register("ana@example.com").await;
    app.send(
        Method::POST,
        "/meal-plans",
        &cookie,
        Some(json!({
            "weekStart": WEEK, "day": "friday", "mealType": "lunch", "recipeTitle": "Soup", "calories": 200
        })),
    )
    .await;

    let (_, summary) = app
        .send(
            Method::GET,
            "/meal-plans/summary?weekStart=2026-10-19",
            &cookie,
            None,
        )
        .await;
    assert_eq!(summary["weeklyTotal"], 0.0);
    assert_eq!(summary["weeklyAverage"], 0);
    assert_eq!(summary["days"].as_array().unwrap().len(), 7);
}

#[tokio::test]
async fn entry_needs_a_recipe_or_a_title() {
    let app = TestApp::new();
    let cookie = app.register("ana@example.com").await;

    let (status, _) = app
        .send(
            Method::POST,
            "/meal-plans",
            &cookie,
            Some(json!({ "weekStart": WEEK, "day": "monday", "mealType": "lunch" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .send(
            Method::POST,
            "/meal-plans",
            &cookie,
            Some(json!({
                "weekStart": WEEK,
                "day": "monday",
                "mealType": "lunch",
                "recipeId": "00000000-0000-0000-0000-000000000000"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleting_an_entry_removes_it_from_the_week() {
    let app = TestApp::new();
    let cookie = app.register("ana@example.com").await;
    let other = app.register("ben@example.com").await;

    let (_, entry) = app
        .send(
            Method::POST,
            "/meal-plans",
            &cookie,
            Some(json!({
                "weekStart": WEEK, "day": "monday", "mealType": "dinner", "recipeTitle": "Pasta", "calories": 700
            })),
        )
        .await;
    let path = format!("/meal-plans/{}", entry["id"].as_str().unwrap());

    let (status, _) = app.send(Method::DELETE, &path, &other, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.send(Method::DELETE, &path, &cookie, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, entries) = app
        .send(
            Method::GET,
            &format!("/meal-plans?weekStart={}", WEEK),
            &cookie,
            None,
        )
        .await;
    assert!(entries.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn fractional_and_huge_calories_are_summed_exactly() {
    let app = TestApp::new();
    let cookie = app.register("ana@example.com").await;

    for (day, title, calories) in [
        ("monday", "Toast", json!(250.5)),
        ("monday", "Feast", json!(u32::MAX)),
        ("tuesday", "Feast", json!(3_000_000_000u64)),
    ] {
        let (status, entry) = app
            .send(
                Method::POST,
                "/meal-plans",
                &cookie,
                Some(json!({
                    "weekStart": WEEK, "day": day, "mealType": "dinner", "recipeTitle": title, "calories": calories
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(entry["calories"].as_f64(), calories.as_f64());
    }

    let (status, summary) = app
        .send(
            Method::GET,
            &format!("/meal-plans/summary?weekStart={}", WEEK),
            &cookie,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let monday = 250.5 + f64::from(u32::MAX);
    assert_eq!(summary["days"][0]["totalCalories"], monday);
    assert_eq!(summary["weeklyTotal"], monday + 3_000_000_000.0);
    assert_eq!(
        summary["weeklyAverage"],
        ((monday + 3_000_000_000.0) / 7.0 + 0.5).floor() as u64
    );

    let (status, body) = app
        .send(
            Method::POST,
            "/meal-plans",
            &cookie,
            Some(json!({
                "weekStart": WEEK, "day": "friday", "mealType": "lunch", "recipeTitle": "Soup", "calories": -10
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "calories must be a non-negative number");

    let (status, _) = app
        .send(
            Method::POST,
            "/recipes",
            &cookie,
            Some(json!({ "title": "Broth", "calories": -1.5 })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
