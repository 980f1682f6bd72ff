use std::sync::Arc;

use hyper::{
    service::{make_service_fn, service_fn},
    Server,
};
use lib::{app::App, Webserver};
use structopt::StructOpt;

#[macro_use]
extern crate log;

#[tokio::main]
async fn main() {
    let env = std::env::var("TRACKER_ENV").unwrap_or_else(|_| "test".to_string());

    let env_file_name = format!("{}.env", env);
    let env_file_result = dotenv::from_filename(&env_file_name);

    pretty_env_logger::formatted_timed_builder()
        .parse_filters(&lib::get_required_env_var("RUST_LOG"))
        .init();

    if let Err(e) = env_file_result {
        warn!(
            "environment file not found: {}, error: {}",
            env_file_name, e
        );
    }

    let opts = Opts::from_args();
    let opts = lib::Opts::from(opts);

    let app = Arc::new(App::new(opts.clone()).await);

    let webserver = Arc::new(Webserver::new(app));

    let addr = ([0, 0, 0, 0], opts.port).into();

    let service = make_service_fn(|_| {
        let webserver = webserver.clone();
        async {
            Ok::<_, hyper::Error>(service_fn(move |request| {
                let webserver = webserver.clone();
                lib::entry_point(webserver, request)
            }))
        }
    });

    let server = Server::bind(&addr).serve(service);

    info!("starting server on {:?}", addr);
    let _ = server.await;
}

#[derive(StructOpt, Debug, Clone)]
pub struct Opts {
    #[structopt(long, default_value = "3000", env = "TRACKER_LISTEN_PORT")]
    port: u16,
    #[structopt(long, env = "TRACKER_DATABASE_ADDR")]
    database_addr: String,
}

impl From<Opts> for lib::Opts {
    fn from(Opts {
        port,
        database_addr,
    }: Opts) -> Self {
        lib::Opts {
            port,
            database_addr,
        }
    }
}
