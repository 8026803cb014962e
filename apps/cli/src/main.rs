mod args;
mod config;
mod data_dir;

use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use app_api::AppContext;
use args::{Cli, Command};
use frost_app::{
    AppConfig, AppPaths, AppState, RangeParams, ensure_app_data_dir, resolve_dates, today,
};
use frost_core::{GrowthRates, ResourceKind, TimeRange};
use http_api::HttpState;

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[tokio::main]
async fn main() -> CliResult<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    let config = config::load_or_create().map_err(io::Error::other)?;
    if config.created {
        println!(
            "Created config at {} (default port {}).",
            config.paths.file.display(),
            config.config.port
        );
    }

    let data_dir = data_dir::resolve_data_dir(cli.data_dir.clone()).map_err(io::Error::other)?;
    if data_dir.matched_existing {
        tracing::info!(dir = %data_dir.dir.display(), "using existing data dir");
    } else {
        tracing::info!(dir = %data_dir.dir.display(), "using data dir");
    }

    let paths = AppPaths::new(data_dir.dir);
    ensure_app_data_dir(&paths).map_err(|err| io::Error::other(err.to_string()))?;

    let warehouse_path: Option<PathBuf> = cli.warehouse.clone().or_else(|| {
        config
            .config
            .warehouse_path
            .as_deref()
            .map(config::expand_home)
    });
    let app_config = AppConfig {
        db_path: paths.db_path,
        warehouse_path,
        cache_ttl: Duration::from_secs(config.config.cache_ttl_secs),
        default_price_per_credit: config.config.price_per_credit,
        session_idle_timeout: Duration::from_secs(config.config.session_idle_secs),
    };
    let app_state = AppState::new(app_config);
    app_state
        .setup_db()
        .map_err(|err| io::Error::other(format!("failed to initialize database: {}", err)))?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            let port = cli.port.unwrap_or(config.config.port);
            let context = AppContext::new(app_state);
            serve(context, port).await
        }
        Command::Tags => {
            for tag in app_state.services.tags.list()?.into_iter().skip(1) {
                println!("{tag}");
            }
            Ok(())
        }
        Command::Presets => {
            for name in app_state.services.presets.list()? {
                println!("{name}");
            }
            Ok(())
        }
        Command::Report {
            preset,
            range,
            start,
            end,
            price,
            growth_rate,
        } => {
            let params = RangeParams { range, start, end };
            report(&app_state, preset, &params, price, growth_rate)
        }
    }
}

async fn serve(context: AppContext, port: u16) -> CliResult<()> {
    let router = http_api::router(HttpState::new(context));

    let (listener, actual_port, used_fallback) = bind_port(port).await?;
    let url = format!("http://127.0.0.1:{actual_port}");

    if used_fallback {
        tracing::warn!(
            configured = port,
            actual = actual_port,
            "configured port unavailable, using fallback for this run"
        );
    }

    println!("FrostForecast is running at {url}");
    println!("Press Ctrl+C to stop.");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn report(
    app_state: &AppState,
    preset: Option<String>,
    params: &RangeParams,
    price: Option<f64>,
    growth_rate: Option<f64>,
) -> CliResult<()> {
    let filter = match preset.as_deref() {
        Some(name) => Some(app_state.services.presets.load(name)?.spec),
        None => None,
    };
    let (start, end) = resolve_dates(params, today())?;
    let range = TimeRange::from_dates(start, end);

    // Reuse the session rules for validating user-supplied numbers.
    let mut session = app_state.new_session();
    if let Some(price) = price {
        session.set_price(price)?;
    }
    if let Some(rate) = growth_rate {
        for kind in ResourceKind::ALL {
            session.set_growth_rate(kind, rate)?;
        }
    }
    let rates: &GrowthRates = &session.growth_rates;

    let overview = app_state.services.dashboard.overview(
        filter.as_ref(),
        &range,
        session.price_per_credit,
        rates,
    )?;

    println!("Usage {} .. {}", start, end);
    for tile in &overview.report.totals {
        println!("{:<28} {}", tile.title, tile.display);
    }
    for summary in &overview.report.kinds {
        println!();
        println!("{}", summary.kind.display_name());
        for tile in &summary.tiles {
            println!("  {:<26} {}", tile.title, tile.display);
        }
    }

    let receipt = overview.projection.receipt();
    if overview.projection.rows.is_empty() {
        println!();
        println!("No costs to project.");
        return Ok(());
    }
    println!();
    print!("{:<20} {:>14}", "Section", "Current");
    for days in frost_core::HORIZONS {
        print!(" {:>14}", format!("{days} days"));
    }
    println!();
    for line in receipt {
        print!("{:<20} {:>14}", line.section, line.current_cost);
        for cost in line.horizons.values() {
            print!(" {:>14}", cost);
        }
        println!();
    }
    Ok(())
}

async fn bind_port(port: u16) -> Result<(tokio::net::TcpListener, u16, bool), io::Error> {
    if port == 0 {
        let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let actual_port = listener.local_addr()?.port();
        return Ok((listener, actual_port, false));
    }

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => Ok((listener, port, false)),
        Err(_) => {
            let listener =
                tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
            let actual_port = listener.local_addr()?.port();
            Ok((listener, actual_port, true))
        }
    }
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
