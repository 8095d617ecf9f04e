use anyhow::Context;
use dotenvy::dotenv;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::net::SocketAddr;
use std::sync::Arc;
use structopt::StructOpt;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use werewolf_server::app;
use werewolf_server::models::{cli::Opt, config::ServerConfig};
use werewolf_server::services::{game_service, ActionBroker, NullBroker, PhaseOrchestrator};
use werewolf_server::state::AppState;
use werewolf_server::utils::connection::{accept_players, Lobby};

fn init_logger() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("werewolf_server=info,tower_http=debug")),
        )
        .with_target(true)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = dotenv() {
        eprintln!("Warning: could not load .env: {}", e);
    }
    init_logger();

    let config = Opt::from_args().apply(ServerConfig::from_env()?);
    config.validate()?;
    info!(
        "table of {} seats: {} humans and {} bots",
        config.total_players(),
        config.human_players,
        config.ai_players
    );

    let (state, observer) = AppState::new();
    if config.http_port != 0 {
        let addr: SocketAddr = format!("{}:{}", config.host, config.http_port)
            .parse()
            .context("invalid status API address")?;
        let listener = TcpListener::bind(addr).await?;
        info!("status API listening on http://{}", addr);
        let app = app::create_app(state);
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                warn!("status API stopped: {}", e);
            }
        });
    }

    let (humans, broker): (Vec<String>, Arc<dyn ActionBroker>) = if config.human_players == 0 {
        (Vec::new(), Arc::new(NullBroker) as Arc<dyn ActionBroker>)
    } else {
        let addr = format!("{}:{}", config.host, config.port);
        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("cannot bind game port {}", addr))?;
        info!(
            "waiting for {} players on {}",
            config.human_players, addr
        );
        match accept_players(&listener, config.human_players).await? {
            Lobby::Ready { players, broker } => (players, Arc::new(broker) as Arc<dyn ActionBroker>),
            Lobby::Cancelled => {
                info!("a player declined, game cancelled");
                return Ok(());
            }
        }
    };

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let game = game_service::start_game(&config, humans, &mut rng)?;
    let mut orchestrator =
        PhaseOrchestrator::new(game, broker, (&config).into(), Some(rng.gen()))
            .with_observer(observer);

    let result = orchestrator.run().await;
    info!("session finished: {:?}", result);
    Ok(())
}
