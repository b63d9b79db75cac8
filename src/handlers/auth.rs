// src/handlers/auth.rs
use axum::{extract::State, Json};

use crate::dtos::auth::{LoginRequest, LoginResponse};
use crate::error::AppError;
use crate::state::AppState;

// POST /login - static credential check, nothing more.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    if req.username == state.config.admin_username && req.password == state.config.admin_password {
        Ok(Json(LoginResponse {
            success: true,
            redirect: "/dashboard",
        }))
    } else {
        Err(AppError::unauthorized("Invalid username or password"))
    }
}
