// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::rt::System;
use actix_web::{App, HttpServer, middleware::Logger, web};
use log::info;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use folio::app_state::AppState;
use folio::auth::AuthService;
use folio::auth::gate::AdminGate;
use folio::auth::middleware::SessionMiddlewareFactory;
use folio::bootstrap::{self, BootstrapResult};
use folio::config::ValidatedConfig;
use folio::routes;
use folio::runtime_paths::RuntimePaths;

const HELP_TEXT: &str = "Usage: folio [-C <root>]\n\n\
  -C <root>    Runtime directory holding config.yaml, data/ and public/ (default: .)\n\
  -h, --help   Show this help\n";

fn main() {
    let exit_code = run();
    std::process::exit(exit_code);
}

fn run() -> i32 {
    let parsed_args = match parse_args() {
        Ok(args) => args,
        Err(error) => {
            eprintln!("❌ Invalid command line arguments: {}", error);
            eprintln!("❌ Use -C <root> to set the runtime directory.");
            return 1;
        }
    };

    if matches!(parsed_args.mode, RunMode::Help) {
        print!("{}", HELP_TEXT);
        return 0;
    }

    let bootstrap = match bootstrap::bootstrap_runtime(&parsed_args.runtime_root) {
        Ok(result) => result,
        Err(error) => {
            eprintln!("❌ Bootstrap error: {}", error);
            eprintln!("❌ Application cannot start with invalid configuration.");
            return 1;
        }
    };

    let result = System::new().block_on(run_server(bootstrap));
    match result {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("❌ Server failed to start: {}", error);
            1
        }
    }
}

fn init_logging(config: &ValidatedConfig) -> std::io::Result<()> {
    // Configure logging with a stable format
    env_logger::Builder::from_default_env()
        .filter_level(config.log_level_filter())
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] {}: {}",
                chrono::Utc::now().format("%Y-%m-%d %H:%M:%S%.3f UTC"),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .try_init()
        .map_err(|error| {
            eprintln!("❌ Failed to initialize logger: {}", error);
            std::io::Error::other(error.to_string())
        })
}

async fn run_server(bootstrap: BootstrapResult) -> std::io::Result<()> {
    let BootstrapResult {
        validated_config,
        runtime_paths,
        ..
    } = bootstrap;

    init_logging(&validated_config)?;
    log_startup_info(&validated_config, &runtime_paths);

    let auth_service = match AuthService::from_config(&validated_config) {
        Ok(service) => Arc::new(service),
        Err(error) => {
            eprintln!("❌ Failed to initialize authentication: {}", error);
            return Err(std::io::Error::other(error.to_string()));
        }
    };

    let app_state = match AppState::new(&validated_config, &runtime_paths) {
        Ok(state) => Arc::new(state),
        Err(error) => {
            eprintln!("❌ Failed to open content store: {}", error);
            return Err(std::io::Error::other(error.to_string()));
        }
    };

    let workers = validated_config.server.workers;
    let bind_address = (validated_config.server.host.clone(), validated_config.server.port);
    let validated_config = Arc::new(validated_config);
    let public_dir = runtime_paths.public_dir.clone();

    let factory = move || {
        let gate = AdminGate::new(&validated_config);
        let public_dir = public_dir.clone();

        App::new()
            .app_data(web::Data::from(validated_config.clone()))
            .app_data(web::Data::from(app_state.clone()))
            .app_data(web::Data::from(auth_service.clone()))
            .wrap(SessionMiddlewareFactory)
            .wrap(gate)
            .wrap(Logger::new(
                r#"%a "%r" %s %b "%{Referer}i" "%{User-Agent}i" %T"#,
            ))
            .configure(move |cfg| routes::configure(cfg, &public_dir))
    };

    HttpServer::new(factory)
        .workers(workers)
        .bind(bind_address)?
        .run()
        .await
}

fn log_startup_info(config: &ValidatedConfig, runtime_paths: &RuntimePaths) {
    info!("Starting {} - {}", config.app.name, config.app.description);
    info!("Workers: {}", config.server.workers);
    info!(
        "Listening on http://{}:{}",
        config.server.host, config.server.port
    );
    info!(
        "Admin panel available at: http://{}:{}{}",
        config.server.host, config.server.port, config.admin.path
    );
    match &config.backend.base_url {
        Some(url) => info!("Section video delegate: {}", url),
        None => info!("Section video delegate not configured"),
    }

    info!(
        "Data directory (canonical): {}",
        runtime_paths.data_dir.display()
    );
    info!(
        "Collections directory (canonical): {}",
        runtime_paths.collections_dir.display()
    );
    info!(
        "Public directory (canonical): {}",
        runtime_paths.public_dir.display()
    );
    info!("Config file: {}", runtime_paths.config_file.display());
    info!("Runtime root: {}", runtime_paths.root.display());

    if let Ok(current_dir) = std::env::current_dir() {
        info!("Working directory: {}", current_dir.display());
    }
}

#[derive(Debug)]
enum RunMode {
    Serve,
    Help,
}

#[derive(Debug)]
struct ParsedArgs {
    runtime_root: PathBuf,
    mode: RunMode,
}

fn parse_args() -> Result<ParsedArgs, String> {
    parse_args_from(std::env::args().skip(1))
}

fn parse_args_from<I>(args: I) -> Result<ParsedArgs, String>
where
    I: IntoIterator<Item = String>,
{
    let args: Vec<String> = args.into_iter().collect();
    if args.iter().any(|arg| is_help_flag(arg)) {
        return Ok(ParsedArgs {
            runtime_root: PathBuf::from("."),
            mode: RunMode::Help,
        });
    }

    let mut args = args.into_iter();
    let mut runtime_root = PathBuf::from(".");

    while let Some(arg) = args.next() {
        if arg == "--" {
            continue;
        } else if arg == "-C" {
            let value = args
                .next()
                .ok_or_else(|| "Missing value for -C".to_string())?;
            runtime_root = PathBuf::from(value);
        } else {
            return Err(format!("Unexpected argument: {}", arg));
        }
    }

    Ok(ParsedArgs {
        runtime_root: make_runtime_root_absolute(runtime_root)?,
        mode: RunMode::Serve,
    })
}

fn make_runtime_root_absolute(runtime_root: PathBuf) -> Result<PathBuf, String> {
    if runtime_root.is_absolute() {
        return Ok(runtime_root);
    }

    let current_dir = std::env::current_dir()
        .map_err(|error| format!("Failed to resolve current directory: {}", error))?;
    Ok(current_dir.join(runtime_root))
}

fn is_help_flag(arg: &str) -> bool {
    arg == "-h" || arg == "--help"
}
