/*!
Here we go!
*/
use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    Router,
    routing::{get, get_service, post},
};
use simplelog::{ColorChoice, TerminalMode, TermLogger};
use tokio::sync::RwLock;
use tower_http::services::fs::ServeDir;

use edumanage::config::{self, Cfg};
use edumanage::inter;

async fn catchall_error_handler(e: std::io::Error) -> impl IntoResponse {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        format!("Unhandled internal error: {}", &e)
    )
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let log_cfg = simplelog::ConfigBuilder::new()
        .add_filter_allow_str("edumanage")
        .build();
    TermLogger::init(
        edumanage::log_level_from_env(),
        log_cfg,
        TerminalMode::Stdout,
        ColorChoice::Auto
    ).unwrap();
    log::info!("Logging started.");

    let cfg = match std::env::args().nth(1) {
        Some(path) => Cfg::from_file(&path).unwrap(),
        None => Cfg::default(),
    };

    inter::init(&cfg.template_dir).unwrap();

    let glob = config::load_configuration(cfg);
    let addr = glob.addr;
    let static_dir = glob.static_dir.clone();
    let glob = Arc::new(RwLock::new(glob));

    let serve_static = get_service(ServeDir::new(static_dir))
        .handle_error(catchall_error_handler);

    let app = Router::new()
        .route("/", get(inter::dash::front))
        .route("/login", post(inter::dash::login))
        .route("/demo/:role", get(inter::dash::demo_login))
        .route("/logout", post(inter::dash::logout))
        .route("/dashboard", get(inter::dash::dashboard))
        .route("/module/:module", get(inter::dash::module_view))
        .nest_service("/static", serve_static)
        .layer(Extension(glob));

    log::info!("Listening on {}", &addr);

    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await
        .unwrap();
}
