/*!
Handlers for the login surface and the role-filtered dashboard.
*/
use std::sync::Arc;

use axum::{
    extract::{Extension, Form, Path},
    response::Redirect,
};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::RwLock;

use crate::{
    access::{self, ModuleId},
    config::Glob,
    content,
    user::{demo_user, Role, User, ALL_ROLES},
};

use super::*;

/// Data type to read the form data from a front-page login request.
///
/// The demo flow ignores the credentials; the role selection decides
/// which canned account logs in.
#[derive(Deserialize, Debug)]
pub struct LoginData {
    pub role: String,
    pub email: String,
    pub password: String,
}

/// `GET /`: the login page, or straight to the dashboard if a session
/// is already live.
pub async fn front(
    Extension(glob): Extension<Arc<RwLock<Glob>>>
) -> Response {
    log::trace!("front( [ global state ] ) called.");

    if glob.read().await.user.is_some() {
        return Redirect::to("/dashboard").into_response();
    }

    let roles: Vec<serde_json::Value> = ALL_ROLES.iter()
        .map(|r| json!({
            "token": r.token(),
            "account": demo_user(*r).name,
        }))
        .collect();

    serve_template(
        StatusCode::OK,
        "login",
        &json!({ "roles": roles }),
    )
}

/// `POST /login`: the role-selection login form.
pub async fn login(
    Extension(glob): Extension<Arc<RwLock<Glob>>>,
    Form(form): Form<LoginData>,
) -> Response {
    log::trace!("login( {:?} ) called.", &form);

    let role: Role = match form.role.parse() {
        Ok(role) => role,
        Err(e) => { return respond_login_error(&e); },
    };

    do_login(glob, demo_user(role)).await
}

/// `GET /demo/:role`: the one-click demo-account shortcut.
pub async fn demo_login(
    Path(role_token): Path<String>,
    Extension(glob): Extension<Arc<RwLock<Glob>>>,
) -> Response {
    log::trace!("demo_login( {:?} ) called.", &role_token);

    let role: Role = match role_token.parse() {
        Ok(role) => role,
        Err(e) => { return respond_bad_request(e); },
    };

    do_login(glob, demo_user(role)).await
}

async fn do_login(glob: Arc<RwLock<Glob>>, user: User) -> Response {
    let mut glob = glob.write().await;
    match glob.log_in(user) {
        Ok(()) => Redirect::to("/dashboard").into_response(),
        Err(msg) => respond_login_error(&msg),
    }
}

/// `POST /logout`: always lands back on the login page.
pub async fn logout(
    Extension(glob): Extension<Arc<RwLock<Glob>>>
) -> Response {
    log::trace!("logout( [ global state ] ) called.");

    glob.write().await.log_out();
    Redirect::to("/").into_response()
}

/// `GET /dashboard`: the landing module for the current role.
pub async fn dashboard(
    Extension(glob): Extension<Arc<RwLock<Glob>>>
) -> Response {
    render_for(glob, None).await
}

/// `GET /module/:module`: one module's view, subject to the content
/// guard and navigation visibility.
pub async fn module_view(
    Path(token): Path<String>,
    Extension(glob): Extension<Arc<RwLock<Glob>>>,
) -> Response {
    render_for(glob, Some(token)).await
}

/**
Which module actually renders for `role` requesting `token` (`None` is
the landing request).

The content guard is applied first; navigation visibility is re-checked
after it as defense in depth, so a role can never reach content its menu
would not offer. Both checks fail toward the Dashboard, never open.
*/
fn choose_module(role: Role, token: Option<&str>) -> Result<ModuleId, String> {
    let requested = match token {
        None => access::default_module(role),
        Some(t) => t.parse::<ModuleId>()?,
    };

    let shown = access::content_module(role, requested);
    if shown != ModuleId::Dashboard && !access::visible_modules(role).contains(&shown) {
        log::info!(
            "Role {} requested module {} outside its navigation; landing on the dashboard.",
            &role, &shown
        );
        return Ok(access::default_module(role));
    }

    Ok(shown)
}

async fn render_for(glob: Arc<RwLock<Glob>>, token: Option<String>) -> Response {
    let glob = glob.read().await;
    let user = match &glob.user {
        Some(user) => user,
        None => { return Redirect::to("/").into_response(); },
    };

    let shown = match choose_module(user.role, token.as_deref()) {
        Ok(module) => module,
        Err(e) => { return respond_bad_request(e); },
    };

    serve_template(
        StatusCode::OK,
        "dashboard",
        &page_data(user, shown),
    )
}

/// Template data for the dashboard page: the user header, the
/// role-filtered navigation, and the shown module's table plus its
/// mutation affordances.
fn page_data(user: &User, shown: ModuleId) -> serde_json::Value {
    let nav: Vec<serde_json::Value> = access::visible_modules(user.role)
        .iter()
        .map(|m| json!({
            "token": m.token(),
            "label": m.label(),
            "active": *m == shown,
        }))
        .collect();

    json!({
        "user": {
            "name": &user.name,
            "email": &user.email,
            "role": user.role.token(),
            "initials": user.initials(),
        },
        "nav": nav,
        "module": {
            "token": shown.token(),
            "label": shown.label(),
        },
        "can_mutate": access::can_mutate(user.role, shown),
        "dataset": content::dataset(shown),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::ensure_logging;

    #[test]
    fn landing_request_is_the_dashboard() {
        ensure_logging();
        for role in ALL_ROLES.iter() {
            assert_eq!(choose_module(*role, None), Ok(ModuleId::Dashboard));
        }
    }

    #[test]
    fn admin_attendance_request_renders_dashboard_content() {
        ensure_logging();
        assert_eq!(
            choose_module(Role::Admin, Some("attendance")),
            Ok(ModuleId::Dashboard)
        );
        assert_eq!(
            choose_module(Role::Teacher, Some("attendance")),
            Ok(ModuleId::Attendance)
        );
    }

    #[test]
    fn off_menu_request_falls_back_to_dashboard() {
        ensure_logging();
        // Fees is not in a teacher's navigation.
        assert_eq!(
            choose_module(Role::Teacher, Some("fees")),
            Ok(ModuleId::Dashboard)
        );
        assert_eq!(
            choose_module(Role::Admin, Some("fees")),
            Ok(ModuleId::Fees)
        );
    }

    #[test]
    fn unknown_module_token_is_an_error() {
        ensure_logging();
        assert!(choose_module(Role::Admin, Some("gradebook")).is_err());
    }

    #[test]
    fn page_data_gates_affordances() {
        ensure_logging();
        let admin = demo_user(Role::Admin);
        let student = demo_user(Role::Student);

        let d = page_data(&admin, ModuleId::Students);
        assert_eq!(d["can_mutate"], json!(true));
        assert_eq!(d["module"]["token"], json!("students"));

        let d = page_data(&student, ModuleId::Fees);
        assert_eq!(d["can_mutate"], json!(false));
        assert_eq!(d["user"]["role"], json!("student"));
    }
}
