//! End-to-end smoke tests driving the router over an in-memory database.

use anyhow::Result;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use chrono::Datelike;
use rust_decimal::Decimal;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

use bookings::auth::{ROLE_HEADER, TENANT_HEADER, USER_HEADER};
use bookings::config::AppConfig;
use bookings::mail::default::LogMailer;
use bookings::server::{AppState, create_app};

#[path = "test_utils/mod.rs"]
mod test_utils;
use test_utils::*;

struct Fixture {
    app: Router,
    tenant: Uuid,
    client: Uuid,
    staff: Uuid,
    admin: Uuid,
    service: Uuid,
}

async fn setup() -> Result<Fixture> {
    let db = setup_test_db().await?;

    let tenant = create_test_tenant(&db).await?;
    let client = create_client(&db, tenant).await?;
    let staff = create_staff(&db, tenant).await?;
    let admin = create_admin(&db, tenant).await?;
    let service = create_service(&db, tenant, 30, Decimal::new(4500, 2), true).await?;
    assign_service(&db, tenant, staff, service).await?;
    add_all_week_hours(&db, tenant, staff).await?;

    let state = AppState::new(
        Arc::new(AppConfig::default()),
        db,
        Arc::new(LogMailer::new()),
    );

    Ok(Fixture {
        app: create_app(state),
        tenant,
        client,
        staff,
        admin,
        service,
    })
}

fn authed(request: Request<Body>, tenant: Uuid, user: Uuid, role: &str) -> Request<Body> {
    let (mut parts, body) = request.into_parts();
    parts.headers.insert(TENANT_HEADER, tenant.to_string().parse().unwrap());
    parts.headers.insert(USER_HEADER, user.to_string().parse().unwrap());
    parts.headers.insert(ROLE_HEADER, role.parse().unwrap());
    Request::from_parts(parts, body)
}

async fn body_json(response: axum::response::Response) -> Result<Value> {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[tokio::test]
async fn root_is_public_and_api_requires_context() -> Result<()> {
    let fixture = setup().await?;

    let root = fixture
        .app
        .clone()
        .oneshot(Request::builder().uri("/").body(Body::empty())?)
        .await?;
    assert_eq!(root.status(), StatusCode::OK);

    let unauthed = fixture
        .app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/v1/appointments")
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(unauthed.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

#[tokio::test]
async fn booking_flow_round_trips_through_the_api() -> Result<()> {
    let fixture = setup().await?;
    let start = future_start(2, 10, 0);

    // Availability offers the slot we are about to book.
    let availability = fixture
        .app
        .clone()
        .oneshot(authed(
            Request::builder()
                .uri(format!(
                    "/api/v1/availability?staff_id={}&date={}&service_ids={}",
                    fixture.staff,
                    start.date_naive(),
                    fixture.service
                ))
                .body(Body::empty())?,
            fixture.tenant,
            fixture.client,
            "client",
        ))
        .await?;
    assert_eq!(availability.status(), StatusCode::OK);
    let listing = body_json(availability).await?;
    assert_eq!(listing["duration_minutes"], 30);
    assert!(
        listing["slots"]
            .as_array()
            .unwrap()
            .iter()
            .any(|s| s.as_str().unwrap().contains("10:00")),
        "expected the 10:00 slot in {listing}"
    );

    // Book it.
    let book_body = serde_json::json!({
        "staff_id": fixture.staff,
        "start_at": start.to_rfc3339(),
        "service_ids": [fixture.service],
    });
    let booked = fixture
        .app
        .clone()
        .oneshot(authed(
            Request::builder()
                .method("POST")
                .uri("/api/v1/appointments")
                .header("content-type", "application/json")
                .body(Body::from(book_body.to_string()))?,
            fixture.tenant,
            fixture.client,
            "client",
        ))
        .await?;
    assert_eq!(booked.status(), StatusCode::CREATED);
    let view = body_json(booked).await?;
    assert_eq!(view["status"], "scheduled");
    assert_eq!(view["client"]["id"], fixture.client.to_string());
    assert_eq!(view["services"].as_array().unwrap().len(), 1);
    let appointment_id = view["id"].as_str().unwrap().to_string();

    // A second booking of the same slot conflicts.
    let duplicate = fixture
        .app
        .clone()
        .oneshot(authed(
            Request::builder()
                .method("POST")
                .uri("/api/v1/appointments")
                .header("content-type", "application/json")
                .body(Body::from(book_body.to_string()))?,
            fixture.tenant,
            fixture.client,
            "client",
        ))
        .await?;
    assert_eq!(duplicate.status(), StatusCode::CONFLICT);

    // The staff calendar shows it for that day.
    let calendar = fixture
        .app
        .clone()
        .oneshot(authed(
            Request::builder()
                .uri(format!(
                    "/api/v1/staff/appointments?date={}",
                    start.date_naive()
                ))
                .body(Body::empty())?,
            fixture.tenant,
            fixture.staff,
            "staff",
        ))
        .await?;
    assert_eq!(calendar.status(), StatusCode::OK);
    let listing = body_json(calendar).await?;
    assert_eq!(listing["appointments"].as_array().unwrap().len(), 1);

    // The client cancels; the row comes back canceled with the reason.
    let canceled = fixture
        .app
        .clone()
        .oneshot(authed(
            Request::builder()
                .method("POST")
                .uri(format!("/api/v1/appointments/{appointment_id}/cancel"))
                .header("content-type", "application/json")
                .body(Body::from(
                    serde_json::json!({ "reason": "can't make it" }).to_string(),
                ))?,
            fixture.tenant,
            fixture.client,
            "client",
        ))
        .await?;
    assert_eq!(canceled.status(), StatusCode::OK);
    let view = body_json(canceled).await?;
    assert_eq!(view["status"], "canceled");
    assert_eq!(view["canceled_by"], "client");

    Ok(())
}

#[tokio::test]
async fn explicit_duration_overrides_the_service_sum() -> Result<()> {
    let fixture = setup().await?;
    let date = future_start(2, 10, 0).date_naive();

    // The seeded service runs 30 minutes; asking for 60 must widen the slots.
    let widened = fixture
        .app
        .clone()
        .oneshot(authed(
            Request::builder()
                .uri(format!(
                    "/api/v1/availability?staff_id={}&date={date}&service_ids={}&duration_minutes=60",
                    fixture.staff, fixture.service
                ))
                .body(Body::empty())?,
            fixture.tenant,
            fixture.client,
            "client",
        ))
        .await?;
    assert_eq!(widened.status(), StatusCode::OK);
    let widened = body_json(widened).await?;
    assert_eq!(widened["duration_minutes"], 60);

    // Without the override the sum of the listed services decides.
    let derived = fixture
        .app
        .clone()
        .oneshot(authed(
            Request::builder()
                .uri(format!(
                    "/api/v1/availability?staff_id={}&date={date}&service_ids={}",
                    fixture.staff, fixture.service
                ))
                .body(Body::empty())?,
            fixture.tenant,
            fixture.client,
            "client",
        ))
        .await?;
    assert_eq!(derived.status(), StatusCode::OK);
    let derived = body_json(derived).await?;
    assert_eq!(derived["duration_minutes"], 30);

    // Longer slots run out of room earlier in the day.
    assert!(
        widened["slots"].as_array().unwrap().len() < derived["slots"].as_array().unwrap().len()
    );

    Ok(())
}

#[tokio::test]
async fn staff_cancel_requires_a_reason() -> Result<()> {
    let fixture = setup().await?;

    let response = fixture
        .app
        .clone()
        .oneshot(authed(
            Request::builder()
                .method("POST")
                .uri(format!("/api/v1/staff/appointments/{}/cancel", Uuid::new_v4()))
                .header("content-type", "application/json")
                .body(Body::from(serde_json::json!({ "reason": "  " }).to_string()))?,
            fixture.tenant,
            fixture.staff,
            "staff",
        ))
        .await?;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    Ok(())
}

#[tokio::test]
async fn admins_manage_working_hours_for_named_staff() -> Result<()> {
    let fixture = setup().await?;
    let start = future_start(2, 10, 0);
    let weekday = start.date_naive().weekday().num_days_from_sunday();

    // Admin without staff_id is a validation error.
    let missing = fixture
        .app
        .clone()
        .oneshot(authed(
            Request::builder()
                .uri("/api/v1/staff/working-hours")
                .body(Body::empty())?,
            fixture.tenant,
            fixture.admin,
            "admin",
        ))
        .await?;
    assert_eq!(missing.status(), StatusCode::UNPROCESSABLE_ENTITY);

    // With staff_id the listing shows the seeded all-week hours.
    let listing = fixture
        .app
        .clone()
        .oneshot(authed(
            Request::builder()
                .uri(format!(
                    "/api/v1/staff/working-hours?staff_id={}&weekday={weekday}",
                    fixture.staff
                ))
                .body(Body::empty())?,
            fixture.tenant,
            fixture.admin,
            "admin",
        ))
        .await?;
    assert_eq!(listing.status(), StatusCode::OK);
    let body = body_json(listing).await?;
    assert_eq!(body["working_hours"].as_array().unwrap().len(), 1);

    Ok(())
}

#[tokio::test]
async fn requests_from_another_tenant_cannot_see_appointments() -> Result<()> {
    let fixture = setup().await?;
    let start = future_start(2, 10, 0);

    let book_body = serde_json::json!({
        "staff_id": fixture.staff,
        "start_at": start.to_rfc3339(),
        "service_ids": [fixture.service],
    });
    let booked = fixture
        .app
        .clone()
        .oneshot(authed(
            Request::builder()
                .method("POST")
                .uri("/api/v1/appointments")
                .header("content-type", "application/json")
                .body(Body::from(book_body.to_string()))?,
            fixture.tenant,
            fixture.client,
            "client",
        ))
        .await?;
    assert_eq!(booked.status(), StatusCode::CREATED);
    let view = body_json(booked).await?;
    let appointment_id = view["id"].as_str().unwrap().to_string();

    // A caller from a different tenant is rejected outright.
    let foreign_tenant = Uuid::new_v4();
    let cross = fixture
        .app
        .clone()
        .oneshot(authed(
            Request::builder()
                .method("POST")
                .uri(format!("/api/v1/appointments/{appointment_id}/cancel"))
                .header("content-type", "application/json")
                .body(Body::from(serde_json::json!({}).to_string()))?,
            foreign_tenant,
            fixture.client,
            "client",
        ))
        .await?;
    assert_eq!(cross.status(), StatusCode::FORBIDDEN);

    Ok(())
}
