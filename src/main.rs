#[macro_use]
extern crate rocket;

use log::info;
use rocket::fairing::AdHoc;
use std::env;

use pathrace_snake::bot::Bot;
use pathrace_snake::config::Config;
use pathrace_snake::debug_logger::DebugLogger;

mod handler;

#[launch]
async fn rocket() -> _ {
    // Hosts hand us PORT; Rocket reads ROCKET_PORT
    if let Ok(port) = env::var("PORT") {
        env::set_var("ROCKET_PORT", &port);
    }

    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }

    env_logger::init();

    let config = Config::load_or_default();
    info!(
        "Starting pathrace snake ({}ms per move, decision log {})",
        config.timing.effective_budget_ms(),
        if config.debug.enabled { config.debug.log_file_path.as_str() } else { "off" }
    );

    let logger = DebugLogger::new(config.debug.enabled, &config.debug.log_file_path).await;
    let bot = Bot::with_logger(config, logger);

    rocket::build()
        .manage(bot)
        .attach(AdHoc::on_response("Server ID Middleware", |_, res| {
            Box::pin(async move {
                res.set_raw_header("Server", "battlesnake/github/pathrace-snake");
            })
        }))
        .mount(
            "/",
            routes![
                handler::index,
                handler::ping,
                handler::start,
                handler::get_move,
                handler::end
            ],
        )
}
