mod common;

use anyhow::Result;
use enquiry_api_rust::auth::{generate_jwt, Claims};
use enquiry_api_rust::domain::Role;
use reqwest::StatusCode;

#[tokio::test]
async fn protected_route_requires_token() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/api/enquiries", server.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Missing Authorization header");
    Ok(())
}

#[tokio::test]
async fn garbage_bearer_token_is_rejected() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/api/enquiries", server.base_url))
        .header("Authorization", "Bearer not.a.jwt")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["success"], false);
    Ok(())
}

#[tokio::test]
async fn non_bearer_scheme_is_rejected() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/api/enquiries", server.base_url))
        .header("Authorization", "Basic dXNlcjpwYXNz")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

// The test process and the spawned server share the same environment, so
// both resolve the same JWT secret and tokens minted here validate there.
#[tokio::test]
async fn valid_staff_token_passes_validation() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let token = generate_jwt(&Claims::staff(1, "admin@example.com", Role::Admin))?;

    let res = client
        .get(format!("{}/api/auth/validate-token", server.base_url))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["id"], 1);
    assert_eq!(body["data"]["email"], "admin@example.com");
    assert_eq!(body["data"]["role"], "ADMIN");
    Ok(())
}

#[tokio::test]
async fn staff_token_rejected_on_student_route() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let token = generate_jwt(&Claims::staff(1, "admin@example.com", Role::Admin))?;

    let res = client
        .get(format!("{}/api/enquiry-students/me", server.base_url))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["message"], "Student token required");
    Ok(())
}

#[tokio::test]
async fn student_token_rejected_on_staff_route() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let token = generate_jwt(&Claims::enquiry_student(7, "student@example.com"))?;

    let res = client
        .get(format!("{}/api/auth/validate-token", server.base_url))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["message"], "Staff token required");
    Ok(())
}
