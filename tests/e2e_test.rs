//! End-to-end test: boots the real server against a throwaway data file and
//! drives the whole booking flow over HTTP, from fleet setup and customer
//! registration through quoting, conflict rejection, approval, the handover
//! checklist and a late return with overtime.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use bigdecimal::BigDecimal;
use rental_service::{build_server, JsonStore};
use reqwest::Client;
use serde_json::{json, Value};
use uuid::Uuid;

fn free_port() -> u16 {
    // Bind to port 0 to let the OS assign a free port, then release it.
    // There is a small TOCTOU window, but it is acceptable for test usage.
    std::net::TcpListener::bind("127.0.0.1:0")
        .expect("bind failed")
        .local_addr()
        .expect("addr failed")
        .port()
}

/// Wait until `url` answers at all, retrying every `interval` for up to
/// `timeout` total. Panics if the service never comes up.
async fn wait_for_http(url: &str, timeout: Duration, interval: Duration) {
    let client = Client::builder()
        .timeout(Duration::from_secs(3))
        .build()
        .unwrap();
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        if tokio::time::Instant::now() > deadline {
            panic!("server did not become ready within {:?}", timeout);
        }
        // Any HTTP response (even 4xx) means the server is up.
        if client.get(url).send().await.is_ok() {
            return;
        }
        tokio::time::sleep(interval).await;
    }
}

fn money(body: &Value, key: &str) -> BigDecimal {
    let text = body[key]
        .as_str()
        .unwrap_or_else(|| panic!("field '{}' missing or not a string in {}", key, body));
    BigDecimal::from_str(text).unwrap_or_else(|_| panic!("field '{}' is not a decimal", key))
}

#[tokio::test]
async fn booking_flow_end_to_end() {
    let data_file = std::env::temp_dir().join(format!("rental-e2e-{}.json", Uuid::new_v4()));
    let store = Arc::new(JsonStore::open(&data_file).expect("Failed to open data file"));

    let port = free_port();
    let server = build_server(store, "127.0.0.1", port).expect("Failed to bind the server");
    tokio::spawn(server);

    let base = format!("http://127.0.0.1:{}", port);
    wait_for_http(
        &format!("{}/cars", base),
        Duration::from_secs(10),
        Duration::from_millis(200),
    )
    .await;

    let http = Client::new();

    // ── Fleet setup ──────────────────────────────────────────────────────────
    let resp = http
        .post(format!("{}/cars", base))
        .json(&json!({
            "name": "Avanza",
            "brand": "Toyota",
            "plate": "B 1234 XY",
            "category": "MPV",
            "pricing": { "24 Hour": "300000" },
            "price_24h": "350000",
            "driver_salary": "150000"
        }))
        .send()
        .await
        .expect("POST /cars failed");
    assert_eq!(resp.status(), 201);
    let car: Value = resp.json().await.expect("car body");
    let car_id = car["id"].as_str().expect("car id").to_string();

    let resp = http
        .post(format!("{}/drivers", base))
        .json(&json!({ "name": "Pak Dedi", "phone": "0813", "daily_rate": "150000" }))
        .send()
        .await
        .expect("POST /drivers failed");
    assert_eq!(resp.status(), 201);

    // A far-away season window; it must not touch June pricing.
    let resp = http
        .post(format!("{}/high-seasons", base))
        .json(&json!({
            "name": "Year end",
            "start_date": "2024-12-20T00:00:00Z",
            "end_date": "2025-01-05T00:00:00Z",
            "price_increase": "50000"
        }))
        .send()
        .await
        .expect("POST /high-seasons failed");
    assert_eq!(resp.status(), 201);

    // ── Public customer registration ─────────────────────────────────────────
    let resp = http
        .post(format!("{}/customers/register", base))
        .json(&json!({
            "name": "Rina",
            "phone": "0812",
            "address": "Jl. Melati 1",
            "id_card_image": "ktp.jpg"
        }))
        .send()
        .await
        .expect("POST /customers/register failed");
    assert_eq!(resp.status(), 201);
    let customer: Value = resp.json().await.expect("customer body");
    assert_eq!(customer["status"], "PENDING");
    let customer_id = customer["id"].as_str().expect("customer id").to_string();

    // ── Quote: 3 days at 300,000 plus delivery minus discount ────────────────
    let resp = http
        .post(format!("{}/bookings/quote", base))
        .json(&json!({
            "car_id": car_id,
            "package_type": "24 Hour",
            "start_date": "2024-06-01T08:00:00Z",
            "end_date": "2024-06-04T08:00:00Z",
            "delivery_fee": "50000",
            "discount": "100000"
        }))
        .send()
        .await
        .expect("POST /bookings/quote failed");
    assert_eq!(resp.status(), 200);
    let quote: Value = resp.json().await.expect("quote body");
    assert_eq!(quote["duration_days"], 3);
    assert_eq!(money(&quote, "base_price"), BigDecimal::from(900_000));
    assert_eq!(money(&quote, "total_price"), BigDecimal::from(850_000));
    assert!(quote["car_conflict"].is_null());

    // ── Create the booking ───────────────────────────────────────────────────
    let resp = http
        .post(format!("{}/bookings", base))
        .json(&json!({
            "car_id": car_id,
            "customer_name": "Rina",
            "customer_phone": "0812",
            "package_type": "24 Hour",
            "start_date": "2024-06-01T08:00:00Z",
            "end_date": "2024-06-04T08:00:00Z",
            "delivery_fee": "50000",
            "discount": "100000"
        }))
        .send()
        .await
        .expect("POST /bookings failed");
    assert_eq!(resp.status(), 201);
    let booking: Value = resp.json().await.expect("booking body");
    let booking_id = booking["id"].as_str().expect("booking id").to_string();
    assert_eq!(booking["status"], "BOOKED");
    assert_eq!(booking["payment_status"], "UNPAID");
    assert_eq!(money(&booking, "total_price"), BigDecimal::from(850_000));

    // ── An overlapping window is rejected with the other customer ────────────
    let resp = http
        .post(format!("{}/bookings", base))
        .json(&json!({
            "car_id": car_id,
            "customer_name": "Budi",
            "customer_phone": "0819",
            "package_type": "24 Hour",
            "start_date": "2024-06-03T08:00:00Z",
            "end_date": "2024-06-05T08:00:00Z"
        }))
        .send()
        .await
        .expect("POST /bookings (conflict) failed");
    assert_eq!(resp.status(), 409);
    let err: Value = resp.json().await.expect("conflict body");
    assert!(err["error"].as_str().unwrap().contains("Rina"));

    // ── Public submission and approval ───────────────────────────────────────
    let resp = http
        .post(format!("{}/bookings/submissions", base))
        .json(&json!({
            "car_id": car_id,
            "customer_id": customer_id,
            "customer_name": "Rina",
            "customer_phone": "0812",
            "package_type": "24 Hour",
            "start_date": "2024-06-10T08:00:00Z",
            "end_date": "2024-06-12T08:00:00Z"
        }))
        .send()
        .await
        .expect("POST /bookings/submissions failed");
    assert_eq!(resp.status(), 201);
    let submission: Value = resp.json().await.expect("submission body");
    assert_eq!(submission["status"], "PENDING_APPROVAL");
    let submission_id = submission["id"].as_str().expect("submission id").to_string();

    let resp = http
        .post(format!("{}/bookings/{}/approve", base, submission_id))
        .send()
        .await
        .expect("approve failed");
    assert_eq!(resp.status(), 200);
    let approved: Value = resp.json().await.expect("approved body");
    assert_eq!(approved["status"], "BOOKED");

    // The linked customer was approved in the same commit.
    let resp = http
        .get(format!("{}/customers?status=APPROVED", base))
        .send()
        .await
        .expect("GET /customers failed");
    let approved_customers: Value = resp.json().await.expect("customers body");
    assert!(approved_customers
        .as_array()
        .unwrap()
        .iter()
        .any(|c| c["id"] == customer_id.as_str()));

    // ── Handover checklist activates the rental ──────────────────────────────
    let resp = http
        .post(format!("{}/bookings/{}/checklist", base, booking_id))
        .json(&json!({
            "odometer": 45210,
            "fuel_level": "Full",
            "notes": "small scratch on rear bumper"
        }))
        .send()
        .await
        .expect("checklist failed");
    assert_eq!(resp.status(), 200);
    let active: Value = resp.json().await.expect("active body");
    assert_eq!(active["status"], "ACTIVE");

    // ── Late return: 3 hours over at 10% of the daily rate per hour ──────────
    let resp = http
        .put(format!("{}/bookings/{}", base, booking_id))
        .json(&json!({
            "car_id": car_id,
            "customer_name": "Rina",
            "customer_phone": "0812",
            "package_type": "24 Hour",
            "start_date": "2024-06-01T08:00:00Z",
            "end_date": "2024-06-04T08:00:00Z",
            "actual_return_date": "2024-06-04T11:00:00Z",
            "delivery_fee": "50000",
            "discount": "100000",
            "amount_paid": "940000"
        }))
        .send()
        .await
        .expect("PUT /bookings failed");
    assert_eq!(resp.status(), 200);
    let completed: Value = resp.json().await.expect("completed body");
    assert_eq!(completed["status"], "COMPLETED");
    assert_eq!(completed["payment_status"], "PAID");
    assert_eq!(money(&completed, "overtime_fee"), BigDecimal::from(90_000));
    assert_eq!(money(&completed, "total_price"), BigDecimal::from(940_000));
    // The handover checklist survives the edit.
    assert_eq!(completed["checklist"]["odometer"], 45210);

    // ── The payment landed in the ledger ─────────────────────────────────────
    let resp = http
        .get(format!("{}/transactions", base))
        .send()
        .await
        .expect("GET /transactions failed");
    let transactions: Value = resp.json().await.expect("transactions body");
    let payment = transactions
        .as_array()
        .unwrap()
        .iter()
        .find(|t| t["category"] == "Rental Payment")
        .expect("payment entry missing");
    assert_eq!(payment["kind"], "INCOME");
    assert_eq!(money(payment, "amount"), BigDecimal::from(940_000));

    // ── List filter sees the completed booking ───────────────────────────────
    let resp = http
        .get(format!("{}/bookings?status=COMPLETED", base))
        .send()
        .await
        .expect("GET /bookings failed");
    let completed_list: Value = resp.json().await.expect("list body");
    assert_eq!(completed_list.as_array().unwrap().len(), 1);

    // ── Settings roundtrip keeps the overtime policy explicit ────────────────
    let resp = http
        .get(format!("{}/settings", base))
        .send()
        .await
        .expect("GET /settings failed");
    let settings: Value = resp.json().await.expect("settings body");
    assert_eq!(settings["overtime"]["kind"], "PERCENTAGE");
    assert_eq!(money(&settings["overtime"], "value"), BigDecimal::from(10));

    let resp = http
        .put(format!("{}/settings", base))
        .json(&json!({
            "company_name": "Arka Rent",
            "rental_packages": ["12 Hour", "24 Hour"],
            "car_categories": ["City Car", "MPV", "SUV"],
            "overtime": { "kind": "PERCENTAGE", "value": "10" }
        }))
        .send()
        .await
        .expect("PUT /settings failed");
    assert_eq!(resp.status(), 200);
    let saved: Value = resp.json().await.expect("saved settings body");
    assert_eq!(saved["company_name"], "Arka Rent");

    let _ = std::fs::remove_file(&data_file);
}
