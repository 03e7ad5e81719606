//! Navigation bar

use tasksphere_client::session::Session;

use crate::routes::Route;

pub const BRAND: &str = "TaskSphere";

/// One line: brand, main links with the active one marked, then either the
/// user menu or the Login/Register links
pub fn render(session: &Session, active: Route) -> String {
    let link = |route: Route| {
        if route == active {
            format!("[{}]", route.title())
        } else {
            route.title().to_string()
        }
    };

    let mut parts = vec![BRAND.to_string()];

    if session.is_authenticated() {
        parts.extend(Route::MAIN.iter().map(|r| link(*r)));
        let name = session
            .user
            .as_ref()
            .map(|u| u.username.clone())
            .unwrap_or_default();
        parts.push(format!("{} ({} | Logout)", name, link(Route::Profile)));
    } else {
        parts.push(link(Route::Login));
        parts.push(link(Route::Register));
    }

    parts.join("  ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tasksphere_client::session::SessionPhase;
    use tasksphere_shared::models::user::UserSummary;

    #[test]
    fn test_anonymous_links() {
        let session = Session {
            phase: SessionPhase::Anonymous,
            ..Default::default()
        };
        assert_eq!(render(&session, Route::Login), "TaskSphere  [Login]  Register");
    }

    #[test]
    fn test_authenticated_links() {
        let session = Session {
            phase: SessionPhase::Authenticated,
            token: Some("t".to_string()),
            user: Some(UserSummary {
                id: None,
                username: "alice".to_string(),
                role: "USER".to_string(),
                first_name: None,
                last_name: None,
                email: None,
            }),
        };

        let bar = render(&session, Route::Tasks);
        assert_eq!(bar, "TaskSphere  Dashboard  Projects  [Tasks]  alice (Profile | Logout)");
    }
}
