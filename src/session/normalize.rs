//! Auth response normalization.
//!
//! The backend has answered login/signup in two shapes over its lifetime:
//!
//! - legacy: `{message: "Login successful", user: {id, email, user_metadata:
//!   {role, name, photo}}, session: {access_token}}`
//! - current: `{success, data: {user, session: {access_token} | token,
//!   userType | role}}`
//!
//! Shape detection is a pure classification step; anything that matches
//! neither shape is an explicit `UnrecognizedShape` failure, never a silent
//! fallthrough.

use serde_json::Value;

use crate::error::AuthError;
use crate::session::{Session, SessionUser, UserType};

/// Normalize a login/signup response body into the canonical [`Session`].
pub fn normalize_auth_response(body: &Value) -> Result<Session, AuthError> {
    // A reported failure carries the server's message when it has one.
    if body.get("success").and_then(Value::as_bool) == Some(false) {
        let message = str_field(body, "message").unwrap_or("Authentication failed");
        return Err(AuthError::Rejected(message.to_string()));
    }

    if body.get("success").and_then(Value::as_bool) == Some(true) {
        if let Some(data) = body.get("data") {
            return normalize_current(data);
        }
    }

    // Legacy shape: no success flag, literal message text, embedded metadata.
    if str_field(body, "message") == Some("Login successful") {
        if let Some(user) = body.get("user") {
            return Ok(normalize_legacy(user, body.get("session")));
        }
    }

    tracing::warn!("Auth response matched neither known shape");
    Err(AuthError::UnrecognizedShape)
}

/// Current shape: `data.user` (or, for signup, the record is `data` itself),
/// token under `data.session.access_token` or `data.token`, role under
/// `data.userType` or `data.role`.
fn normalize_current(data: &Value) -> Result<Session, AuthError> {
    let user = data.get("user").unwrap_or(data);
    if !user.is_object() {
        return Err(AuthError::UnrecognizedShape);
    }

    let token = data
        .get("session")
        .and_then(|s| str_field(s, "access_token"))
        .or_else(|| str_field(data, "token"))
        .unwrap_or_default();

    // Explicit userType wins over anything embedded in user metadata.
    let user_type = str_field(data, "userType")
        .or_else(|| str_field(data, "role"))
        .map(UserType::from_role)
        .unwrap_or_else(|| infer_user_type(user));

    let user = extract_user(user);
    if user.id.is_empty() && user.email.is_empty() && token.is_empty() {
        return Err(AuthError::UnrecognizedShape);
    }

    Ok(Session {
        user,
        token: token.to_string(),
        user_type,
    })
}

/// Legacy shape: role and display name live in `user.user_metadata`.
fn normalize_legacy(user: &Value, session: Option<&Value>) -> Session {
    let metadata = user.get("user_metadata");
    let email = str_field(user, "email").unwrap_or_default();

    let name = metadata
        .and_then(|m| str_field(m, "name"))
        .unwrap_or(email);
    let photo = metadata.and_then(|m| str_field(m, "photo")).unwrap_or("");
    let user_type = metadata
        .and_then(|m| str_field(m, "role"))
        .map(UserType::from_role)
        .unwrap_or(UserType::Student);

    Session {
        user: SessionUser {
            id: str_field(user, "id").unwrap_or_default().to_string(),
            email: email.to_string(),
            name: name.to_string(),
            photo: photo.to_string(),
        },
        token: session
            .and_then(|s| str_field(s, "access_token"))
            .unwrap_or_default()
            .to_string(),
        user_type,
    }
}

fn extract_user(user: &Value) -> SessionUser {
    let metadata = user.get("user_metadata");
    let email = str_field(user, "email").unwrap_or_default();

    // Signup may return the raw student/educator record instead of a
    // generic user object.
    let id = str_field(user, "id")
        .or_else(|| str_field(user, "student_id"))
        .or_else(|| str_field(user, "educator_id"))
        .unwrap_or_default();

    let name = str_field(user, "name")
        .or_else(|| str_field(user, "student_name"))
        .or_else(|| str_field(user, "educator_name"))
        .or_else(|| metadata.and_then(|m| str_field(m, "name")))
        .unwrap_or(email);

    let photo = str_field(user, "photo")
        .or_else(|| metadata.and_then(|m| str_field(m, "photo")))
        .unwrap_or("");

    SessionUser {
        id: id.to_string(),
        email: email.to_string(),
        name: name.to_string(),
        photo: photo.to_string(),
    }
}

/// Last-resort role inference when the response names no role at all.
fn infer_user_type(user: &Value) -> UserType {
    if user.get("educator_id").is_some() {
        UserType::Educator
    } else if let Some(role) = user
        .get("user_metadata")
        .and_then(|m| str_field(m, "role"))
    {
        UserType::from_role(role)
    } else {
        UserType::Student
    }
}

fn str_field<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(key).and_then(Value::as_str)
}
