use serde::{Deserialize, Serialize};

use crate::db::models::LinkDetail;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub key: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
}

#[derive(Debug, Deserialize)]
pub struct CreateLinkRequest {
    pub code: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateLinkResponse {
    pub success: bool,
    pub code: String,
    pub url: String,
}

#[derive(Serialize)]
pub struct LinksResponse {
    pub links: Vec<LinkDetail>,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
}
