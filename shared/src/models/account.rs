//! Account and session models

use serde::{Deserialize, Serialize};

/// Response body for `POST /signin`
///
/// The token replaces the legacy raw-cookie user id: the server derives
/// identity from the token claims on every authenticated request instead of
/// trusting a client-supplied id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInResponse {
    pub user_id: i64,
    pub token: String,
    pub message: String,
}

/// Response body for `GET /profile/:user_id`
///
/// Field spelling follows the original wire format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub firstname: String,
    pub lastname: String,
    pub email: String,
}
