//! Public types for the emails API
use serde::{Deserialize, Serialize};

/// A stored message as returned by the list endpoint
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Email {
    pub id: i64,
    pub user_id: Option<i64>,
    pub sender_email: String,
    pub recipient_email: String,
    pub subject: Option<String>,
    pub body: Option<String>,
    pub is_read: bool,
    pub is_starred: bool,
    pub labels: Vec<String>,
    pub created_at: String,
    /// Display name of the sender when they have an account here
    pub sender_display: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SendEmailRequest {
    pub to: Option<String>,
    pub subject: Option<String>,
    pub body: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SendEmailResponse {
    pub message: String,
    #[serde(rename = "emailId")]
    pub email_id: i64,
}
