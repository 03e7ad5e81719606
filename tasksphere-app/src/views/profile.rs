//! Profile panel

use tasksphere_shared::models::user::UserSummary;

use super::format::cell;
use super::LOADING_TEXT;
use crate::app::AppState;

pub fn render_user(user: &UserSummary) -> String {
    let full_name = user.full_name();
    [
        if full_name.is_empty() {
            user.username.clone()
        } else {
            full_name
        },
        cell(Some(&user.role)),
        String::new(),
        format!("Username: {}", user.username),
        format!("Email:    {}", cell(user.email.as_deref())),
        format!("Role:     {}", cell(Some(&user.role))),
        String::new(),
        "Account Actions: logout".to_string(),
    ]
    .join("\n")
}

/// Current profile text; loading until the user is known
pub fn render(state: &AppState) -> String {
    match state.session.user() {
        Some(user) => render_user(&user),
        None => LOADING_TEXT.to_string(),
    }
}
