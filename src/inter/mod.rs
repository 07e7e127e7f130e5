/*!
Interoperation between the client (user) and server.

(Not the application and the session file; that's covered by `session`.)
*/
use std::fmt::Debug;
use std::path::Path;

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use handlebars::Handlebars;
use once_cell::sync::OnceCell;
use serde::Serialize;
use serde_json::json;

pub mod dash;

static TEMPLATES: OnceCell<Handlebars> = OnceCell::new();

static HTML_500: &str = r#"<!doctype html>
<html>
<head>
<meta charset="utf-8">
<title>EduManage | Error</title>
<link rel="stylesheet" href="/static/edum.css">
</head>
<body>
<h1>Something went wrong</h1>
<p>(Error 500)</p>
<p>We encountered an unexpected error. Please refresh the page or
contact support if the problem persists.</p>
<p><a href="/">Back to start</a></p>
</body>
</html>"#;

/**
Initializes the resources used in this module. This function should be
called before any functionality of this module or any of its submodules
is used.

Currently the only thing that happens here is loading the templates used
by `serve_template()`, which will panic unless `init()` has been called
first.

The argument is the path to the directory where the templates used by
`serve_template()` can be found.
*/
pub fn init<P: AsRef<Path>>(template_dir: P) -> Result<(), String> {
    if TEMPLATES.get().is_some() {
        log::warn!("Templates directory already initialized; ignoring.");
        return Ok(())
    }

    let template_dir = template_dir.as_ref();

    let mut h = Handlebars::new();
    #[cfg(debug_assertions)]
    h.set_dev_mode(true);
    h.register_templates_directory(".html", template_dir)
        .map_err(|e| format!(
            "Error registering templates directory {}: {}",
            template_dir.display(), &e
        ))?;

    TEMPLATES.set(h)
        .map_err(|old_h| {
            let mut estr = String::from("Templates directory already registered w/templates:");
            for template_name in old_h.get_templates().keys() {
                estr.push('\n');
                estr.push_str(template_name.as_str());
            }
            estr
        })?;

    Ok(())
}

/**
Return an HTML response in the case of an unrecoverable* error.

(*"Unrecoverable" from the perspective of fielding the current request,
not from the perspective of the program crashing.)
*/
pub fn html_500() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Html(HTML_500)
    ).into_response()
}

pub fn serve_template<S>(
    code: StatusCode,
    template_name: &str,
    data: &S,
) -> Response
where
    S: Serialize + Debug
{
    log::trace!("serve_template( {}, {:?}, ... ) called.", &code, template_name);

    match TEMPLATES.get().unwrap().render(template_name, data) {
        Ok(response_body) => (
            code,
            Html(response_body)
        ).into_response(),
        Err(e) => {
            log::error!(
                "Error rendering template {:?} with data {:?}:\n{}",
                template_name, data, &e
            );
            html_500()
        },
    }
}

pub fn respond_bad_request(msg: String) -> Response {
    log::trace!("respond_bad_request( {:?} ) called.", &msg);

    (
        StatusCode::BAD_REQUEST,
        msg
    ).into_response()
}

/// The login page again, with a user-visible warning attached.
pub fn respond_login_error(msg: &str) -> Response {
    log::trace!("respond_login_error( {:?} ) called.", msg);

    let data = json!({
        "error_message": msg,
    });

    serve_template(
        StatusCode::UNAUTHORIZED,
        "login_error",
        &data,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::ensure_logging;

    /// Registers the repo's template directory and renders from it, so
    /// a build without directory registration support cannot pass.
    #[test]
    fn templates_register_and_render() {
        ensure_logging();
        init("templates").unwrap();
        // A second init is a no-op, not an error.
        init("templates").unwrap();

        let body = TEMPLATES.get().unwrap()
            .render("login_error", &json!({ "error_message": "no such account" }))
            .unwrap();
        assert!(body.contains("no such account"));
    }
}
