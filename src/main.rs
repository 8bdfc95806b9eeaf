use std::error::Error;
use std::sync::Arc;

use warp::Filter;

use futures::future::FutureExt;
use log::{info, initialize_logger};
use time::OffsetDateTime;
use tokio::sync::mpsc;

use tribunals::config::{get_variable, get_variable_or};
use tribunals::environment::{Clock, Config, Environment};
use tribunals::routes;
use tribunals::store::MemoryStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv::dotenv().ok();

    let logger = initialize_logger();

    let main_port: u16 = get_variable("TRIBUNALS_PORT")
        .parse()
        .expect("parse TRIBUNALS_PORT as u16");
    let admin_port: u16 = get_variable("TRIBUNALS_ADMIN_PORT")
        .parse()
        .expect("parse TRIBUNALS_ADMIN_PORT as u16");

    info!(logger, "Starting..."; "main_port" => main_port, "admin_port" => admin_port);
    let logger = Arc::new(logger);

    let store = Arc::new(MemoryStore::new());
    let clock: Arc<Clock> = Arc::new(|| OffsetDateTime::now_utc().date());

    let config = Config::new(get_variable_or("TRIBUNALS_CALLBACK_PATH", "callbacks"));
    let environment = Environment::new(logger.clone(), store, clock, config);

    let (termination_sender, mut termination_receiver) = mpsc::channel::<()>(1);

    let terminate = Arc::new(move || {
        let termination_sender = termination_sender.clone();

        async move {
            let termination_sender = termination_sender.clone();
            termination_sender.send(()).await.unwrap();
        }
        .boxed()
    });

    let should_terminate = async move {
        termination_receiver.recv().await;
    }
    .shared();

    let ctrlc = {
        let should_terminate = should_terminate.clone();
        let terminate = terminate.clone();

        let signal = tokio::signal::ctrl_c();

        async move {
            let terminate = terminate.clone();

            tokio::select! {
                _ = should_terminate => {},
                _ = signal => {
                    terminate().await;
                }
            }
        }
    };

    let main_server = {
        let should_terminate = should_terminate.clone();

        let logger2 = logger.clone();

        let about_to_start_route = routes::make_about_to_start_route(environment.clone());
        let mid_event_route = routes::make_mid_event_route(environment.clone());
        let about_to_submit_route = routes::make_about_to_submit_route(environment.clone());
        let case_route = routes::make_case_route(environment.clone());

        let routes = about_to_start_route
            .or(mid_event_route)
            .or(about_to_submit_route)
            .or(case_route)
            .recover(move |r| routes::format_rejection(logger2.clone(), r));

        let (_, main_server) =
            warp::serve(routes).bind_with_graceful_shutdown(([0, 0, 0, 0], main_port), async {
                should_terminate.await;
            });

        main_server
    };

    let admin_server = {
        let should_terminate = should_terminate.clone();
        let terminate = terminate.clone();

        let routes = routes::admin::make_healthz_route(environment.clone()).or(
            routes::admin::make_termination_route(environment.clone(), terminate),
        );

        let (_, admin_server) =
            warp::serve(routes).bind_with_graceful_shutdown(([0, 0, 0, 0], admin_port), async {
                should_terminate.await;
            });

        admin_server
    };

    tokio::join!(ctrlc, main_server, admin_server);

    info!(logger, "Exiting gracefully...");

    Ok(())
}
