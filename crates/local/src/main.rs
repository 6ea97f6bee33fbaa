//! Binary to run the lock plugin locally.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use clap::Parser;
use simplelock_core::{Core, PLUGIN_ID, SimpleLock, SimpleLockOptions};
use simplelock_http_insecure::InsecureHttpServer;
use simplelock_local::{Config, Console, Error, Result, stdin_lines};
use simplelock_locks::LockManager;
use simplelock_locks_store::StoreLockManager;
use simplelock_store::Store1;
use simplelock_store_fs::FsStore1;
use simplelock_store_memory::MemoryStore1;
use simplelock_users::UserDirectory;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Port for the release callback server
    #[arg(long, env = "SIMPLELOCK_PORT", default_value_t = 8065)]
    port: u16,

    /// Path to the TOML config file
    #[arg(long, env = "SIMPLELOCK_CONFIG", default_value = "simplelock.toml")]
    config: PathBuf,

    /// Plugin id used in the callback route
    #[arg(long, env = "SIMPLELOCK_PLUGIN_ID", default_value = PLUGIN_ID)]
    plugin_id: String,

    /// Keep locks in this directory instead of in memory
    #[arg(long, env = "SIMPLELOCK_STORE_DIR")]
    store_dir: Option<PathBuf>,

    /// User id the console acts as
    #[arg(long, env = "SIMPLELOCK_USER", default_value = "console")]
    user: String,

    /// Maximum log level
    #[arg(long, env = "SIMPLELOCK_LOG_LEVEL", default_value_t = Level::INFO)]
    log_level: Level,
}

#[tokio::main(worker_threads = 8)]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing::subscriber::set_global_default(
        FmtSubscriber::builder()
            .with_max_level(args.log_level)
            .with_writer(std::io::stderr)
            .finish(),
    )?;

    info!(path = %args.config.display(), "loading config");
    let config = Config::load(&args.config).await?;

    let Some(dir) = args.store_dir.clone() else {
        info!("using memory store, locks are lost on exit");
        return run(args, config, MemoryStore1::new()).await;
    };

    info!(dir = %dir.display(), "using file store");
    run(args, config, FsStore1::new(dir)).await
}

async fn run<S>(args: Args, config: Config, store: S) -> Result<()>
where
    S: Store1,
{
    let plugin = SimpleLock::new(SimpleLockOptions {
        lock_manager: StoreLockManager::new(store.scope(args.plugin_id.as_str())),
        plugin_id: args.plugin_id.clone(),
        server_config: config.server_config(),
        user_directory: config.user_directory(),
    });

    let core = Core::new(plugin.clone());

    let http_sock_addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, args.port));
    let http_server = InsecureHttpServer::new(http_sock_addr);

    let core_handle = core.start(http_server).await?;

    let console = Console::new(plugin.clone(), args.user);

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("shutting down");
        }
        result = console.run(stdin_lines(), tokio::io::stdout()) => {
            result?;
            info!("end of input, shutting down");
        }
        result = reload_on_hangup(args.config, plugin) => {
            result?;
        }
        result = core_handle => {
            error!("core exited");
            result??;
        }
    }

    core.shutdown().await;

    Ok(())
}

/// Re-reads the config file on every SIGHUP and hands the new host
/// configuration to the plugin. Users are only read at startup.
#[cfg(unix)]
async fn reload_on_hangup<LM, UD>(path: PathBuf, plugin: SimpleLock<LM, UD>) -> Result<()>
where
    LM: LockManager,
    UD: UserDirectory,
{
    use tokio::signal::unix::{SignalKind, signal};

    let mut hangup = signal(SignalKind::hangup())
        .map_err(|e| Error::Io("failed to install SIGHUP handler", e))?;

    while hangup.recv().await.is_some() {
        info!(path = %path.display(), "received SIGHUP, reloading config");

        match Config::load(&path).await {
            Ok(config) => plugin.on_configuration_change(config.server_config()),
            Err(e) => error!(error = %e, "failed to reload config, keeping current"),
        }
    }

    Ok(())
}

#[cfg(not(unix))]
async fn reload_on_hangup<LM, UD>(_path: PathBuf, _plugin: SimpleLock<LM, UD>) -> Result<()>
where
    LM: LockManager,
    UD: UserDirectory,
{
    std::future::pending().await
}
