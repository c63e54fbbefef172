use actix::Actor;
use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::process;

#[macro_use]
extern crate log;

mod auth;
mod cli;
mod config;
mod database;
mod errors;
mod job;
mod routes;
mod sql;
#[cfg(test)]
mod test_common;

use config::{Config, Overrides, Settings};
use errors::JoblyError;

pub struct Context {
    pub secret: String,
}

fn init_logger(verbose: bool) {
    let filter = if verbose {
        "jobly=debug,actix_web=info"
    } else {
        "jobly=info,actix_web=info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();
}

fn load_settings(matches: &clap::ArgMatches, overrides: Overrides) -> Result<Settings, JoblyError> {
    let config_path = matches
        .get_one::<String>("config")
        .map(String::as_str)
        .unwrap_or(".joblyrc");

    let config = Config::load(config_path)?;
    Settings::resolve(overrides, config)
}

async fn serve(settings: Settings) -> std::io::Result<()> {
    let database = match database::Database::open(&settings.database) {
        Ok(database) => database.start(),
        Err(err) => {
            eprintln!("{}", err);
            process::exit(1);
        }
    };

    let localhost = IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1));
    let socket = SocketAddr::new(localhost, settings.port);
    let context = web::Data::new(Context {
        secret: settings.secret,
    });
    let database = web::Data::new(database);

    info!("Starting Jobly at {}", &socket);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(Cors::permissive().supports_credentials())
            .app_data(context.clone())
            .app_data(database.clone())
            .app_data(routes::json_config())
            .app_data(routes::query_config())
            .configure(routes::configure)
    })
    .bind(socket)?
    .run()
    .await
}

#[actix_rt::main]
async fn main() -> std::io::Result<()> {
    let matches = cli::ask().get_matches();

    match matches.subcommand() {
        Some(("serve", serve_matches)) => {
            init_logger(serve_matches.get_flag("verbose"));

            match load_settings(serve_matches, cli::overrides(serve_matches)) {
                Ok(settings) => serve(settings).await,
                Err(err) => {
                    eprintln!("{}", err);
                    process::exit(1);
                }
            }
        }
        Some(("token", token_matches)) => {
            init_logger(token_matches.get_flag("verbose"));

            let overrides = Overrides {
                secret: token_matches.get_one::<String>("secret").cloned(),
                ..Overrides::default()
            };
            let secret = match load_settings(token_matches, overrides) {
                Ok(settings) => settings.secret,
                Err(err) => {
                    eprintln!("{}", err);
                    process::exit(1);
                }
            };

            let permissions: Vec<auth::Permissions> = token_matches
                .get_many::<auth::Permissions>("permissions")
                .map(|permissions| permissions.cloned().collect())
                .unwrap_or_default();
            let duration = token_matches
                .get_one::<i64>("duration")
                .copied()
                .unwrap_or(43800);

            match auth::create_token(&secret, permissions, duration) {
                Ok(token) => println!("Bearer {}", token),
                Err(err) => eprintln!("Failed to create token {}", err),
            }
            Ok(())
        }
        _ => Ok(()),
    }
}
