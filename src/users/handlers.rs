use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};
use uuid::Uuid;

use crate::db::models::{UpdateUserRequest, UserPage};
use crate::error::{AppError, DatabaseError};
use crate::validation::validate_profile_update;
use crate::AppState;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_RECORDS_PER_PAGE: i64 = 10;

/// Raw pagination parameters. Anything that is not a positive integer falls back to the
/// default instead of failing the request.
#[derive(Debug, Default, Deserialize)]
pub struct ListUsersQuery {
    pub page: Option<String>,
    #[serde(rename = "recordPerPage")]
    pub record_per_page: Option<String>,
}

impl ListUsersQuery {
    pub fn page(&self) -> i64 {
        positive_or(self.page.as_deref(), DEFAULT_PAGE)
    }

    pub fn record_per_page(&self) -> i64 {
        positive_or(self.record_per_page.as_deref(), DEFAULT_RECORDS_PER_PAGE)
    }
}

fn positive_or(raw: Option<&str>, default: i64) -> i64 {
    raw.and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(default)
}

fn parse_user_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| AppError::ValidationError("user_id must be a valid UUID".to_string()))
}

/// GET /users
pub async fn list_users(
    query: web::Query<ListUsersQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let page = query.page();
    let record_per_page = query.record_per_page();
    let offset = (page - 1).saturating_mul(record_per_page);
    debug!("Listing users page={} recordPerPage={}", page, record_per_page);

    let total_count = state.store.count_users().await?;
    let users = state.store.list_users(offset, record_per_page).await?;

    Ok(HttpResponse::Ok().json(UserPage {
        total_count,
        users,
        page,
        record_per_page,
    }))
}

/// GET /users/{user_id}
pub async fn get_user(
    path: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user_id = parse_user_id(&path)?;

    match state.store.find_by_id(user_id).await? {
        Some(user) => Ok(HttpResponse::Ok().json(user)),
        None => Err(AppError::NotFound("user not found".to_string())),
    }
}

/// PUT /users/{user_id}
pub async fn update_user(
    path: web::Path<String>,
    req: web::Json<UpdateUserRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user_id = parse_user_id(&path)?;
    let update = validate_profile_update(req.into_inner())?;

    let applied = match state.store.update_profile(user_id, &update, Utc::now()).await {
        Ok(applied) => applied,
        Err(AppError::DatabaseError(DatabaseError::Duplicate)) => {
            return Err(AppError::Conflict("this email already exists".to_string()));
        }
        Err(e) => return Err(e),
    };

    if !applied {
        return Err(AppError::NotFound("user not found".to_string()));
    }

    info!("Updated profile for user {}", user_id);
    Ok(HttpResponse::Ok().json(json!({
        "message": "user updated successfully"
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(page: Option<&str>, per_page: Option<&str>) -> ListUsersQuery {
        ListUsersQuery {
            page: page.map(String::from),
            record_per_page: per_page.map(String::from),
        }
    }

    #[test]
    fn test_pagination_defaults() {
        let q = query(None, None);
        assert_eq!(q.page(), 1);
        assert_eq!(q.record_per_page(), 10);

        let q = query(Some("0"), Some("-5"));
        assert_eq!(q.page(), 1);
        assert_eq!(q.record_per_page(), 10);

        let q = query(Some("two"), Some("1.5"));
        assert_eq!(q.page(), 1);
        assert_eq!(q.record_per_page(), 10);
    }

    #[test]
    fn test_pagination_values() {
        let q = query(Some("2"), Some("5"));
        assert_eq!(q.page(), 2);
        assert_eq!(q.record_per_page(), 5);
    }

    #[test]
    fn test_parse_user_id() {
        let id = Uuid::new_v4();
        assert_eq!(parse_user_id(&id.to_string()).unwrap(), id);
        assert!(matches!(
            parse_user_id("507f1f77bcf86cd799439011"),
            Err(AppError::ValidationError(_))
        ));
    }
}
