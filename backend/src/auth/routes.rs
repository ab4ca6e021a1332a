use actix_web::{web, HttpResponse};
use shared::{LoginRequest, LoginResponse, MessageResponse, RegisterRequest};
use std::collections::BTreeMap;

use super::directory::{DirectoryError, UserDirectory};
use super::models::{UserProfile, UserRecord};

pub async fn register(
    directory: web::Data<dyn UserDirectory>,
    request: web::Json<RegisterRequest>,
) -> Result<HttpResponse, DirectoryError> {
    directory
        .register(UserRecord::from(request.into_inner()))
        .await?;
    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "User registered successfully".to_string(),
    }))
}

pub async fn login(
    directory: web::Data<dyn UserDirectory>,
    credentials: web::Json<LoginRequest>,
) -> Result<HttpResponse, DirectoryError> {
    let name = directory
        .login(&credentials.email, &credentials.password)
        .await?;
    Ok(HttpResponse::Ok().json(LoginResponse {
        message: "Login successful".to_string(),
        user: name,
    }))
}

/// Every registered user keyed by email.
pub async fn list_users(directory: web::Data<dyn UserDirectory>) -> HttpResponse {
    let users: BTreeMap<String, UserProfile> = directory
        .list_users()
        .await
        .iter()
        .map(|user| (user.email.clone(), UserProfile::from(user)))
        .collect();
    HttpResponse::Ok().json(users)
}
