//! galera-init — startup coordinator for one Galera cluster node.
//!
//! Runs once per pod boot and exits: 0 when the node may start its
//! database process (bootstrap marker written, predecessor ready, or
//! already initialized), 1 on any fatal error or cancellation.  The
//! orchestration platform re-invokes the pod on failure, so there are
//! no top-level retries here.

use clap::Parser;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use galera_init::address::{pod_fqdn, ClusterAddressSet};
use galera_init::config::{Environment, ReadinessStrategy, Settings};
use galera_init::decision::{decide, BootstrapDecision};
use galera_init::errors::InitError;
use galera_init::files::FileManager;
use galera_init::identity::{pod_name, NodeIdentity};
use galera_init::kube::KubeClient;
use galera_init::poller::wait_until_ready;
use galera_init::readiness::platform::PlatformOracle;
use galera_init::readiness::probe::DirectProbeOracle;
use galera_init::readiness::ReadinessOracle;
use galera_init::render::{render, BOOTSTRAP_FILE, BOOTSTRAP_FILE_NAME, CONFIG_FILE_NAME};
use galera_init::state::{inspect, InitPolicy};
use galera_init::topology::TopologyDescriptor;

/// Command-line arguments for the init coordinator.
#[derive(Parser, Debug)]
#[command(
    name = "galera-init",
    version,
    about = "Startup coordinator for Galera cluster nodes"
)]
struct Cli {
    /// Directory that receives the rendered MariaDB configuration files.
    #[arg(long, default_value = "/etc/mysql/mariadb.conf.d")]
    config_dir: String,

    /// Directory that contains the MariaDB state files.
    #[arg(long, default_value = "/var/lib/mysql")]
    state_dir: String,

    /// Name of the MariaDB resource to be initialized.
    #[arg(long)]
    mariadb_name: String,

    /// Namespace of the MariaDB resource to be initialized.
    #[arg(long)]
    mariadb_namespace: String,

    /// How to detect an already-initialized state directory.
    #[arg(long, value_enum, default_value_t = InitPolicy::MarkerFile)]
    init_policy: InitPolicy,

    /// Readiness oracle used to gate joining nodes.
    #[arg(long, value_enum, default_value_t = ReadinessStrategy::Platform)]
    readiness: ReadinessStrategy,

    /// Emit logs as JSON.
    #[arg(long)]
    log_json: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    if cli.log_json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    // Shutdown signals cancel the token; the poll loop observes it.
    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            shutdown_signal().await;
            cancel.cancel();
        });
    }

    info!("Starting init");
    if let Err(err) = run(cli, cancel).await {
        match err.downcast_ref::<InitError>() {
            Some(InitError::Cancelled) => info!("Init cancelled by shutdown signal"),
            _ => error!("Init failed: {err:#}"),
        }
        std::process::exit(1);
    }
    info!("Init done");
}

async fn run(cli: Cli, cancel: CancellationToken) -> anyhow::Result<()> {
    let settings = Settings {
        config_dir: cli.config_dir.into(),
        state_dir: cli.state_dir.into(),
        mariadb_name: cli.mariadb_name,
        mariadb_namespace: cli.mariadb_namespace,
        init_policy: cli.init_policy,
        readiness: cli.readiness,
    };
    let env = Environment::from_process()?;

    let kube = KubeClient::in_cluster()?;
    let resource = kube
        .mariadb(&settings.mariadb_name, &settings.mariadb_namespace)
        .await?;
    let topology = TopologyDescriptor::from_resource(resource, env.root_password)?;
    info!(
        group = %topology.group_name,
        replicas = topology.replica_count,
        sst = topology.sst_method.keyword(),
        "Topology descriptor fetched"
    );

    let identity = NodeIdentity::from_pod_name(&env.pod_name)?;
    let addresses = ClusterAddressSet::build(&topology, identity.ordinal)?;

    // The config is (re)written on every boot, before the decision is
    // evaluated: rendering is deterministic, so repeating it on an
    // already-initialized node just keeps the file in sync with the
    // current topology.
    let files = FileManager::new(&settings.config_dir)?;
    let config = render(&topology, &identity, &addresses)?;
    files.write_config(CONFIG_FILE_NAME, config.as_bytes())?;
    info!(ordinal = identity.ordinal, "Galera config written");

    let state = inspect(&settings.state_dir, settings.init_policy)?;
    match decide(state, &identity)? {
        BootstrapDecision::SkipAlreadyInitialized => {
            info!("Already initialized");
        }
        BootstrapDecision::Bootstrap => {
            files.write_config(BOOTSTRAP_FILE_NAME, BOOTSTRAP_FILE.as_bytes())?;
            info!("Bootstrap marker written, this node founds the cluster");
        }
        BootstrapDecision::Join {
            predecessor_ordinal,
        } => {
            let predecessor = pod_name(&topology.group_name, predecessor_ordinal);
            let oracle: Arc<dyn ReadinessOracle> = match settings.readiness {
                ReadinessStrategy::Platform => Arc::new(PlatformOracle::new(
                    kube.clone(),
                    predecessor.clone(),
                    settings.mariadb_namespace.clone(),
                )),
                ReadinessStrategy::Probe => Arc::new(DirectProbeOracle::new(&pod_fqdn(
                    &topology,
                    predecessor_ordinal,
                ))?),
            };
            info!(pod = %predecessor, "Waiting for previous pod to be ready");
            wait_until_ready(oracle.as_ref(), &cancel).await?;
            info!(pod = %predecessor, "Previous pod ready");
        }
    }
    Ok(())
}

/// Wait for SIGTERM or SIGINT (Ctrl+C).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received SIGINT, shutting down");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down");
        },
    }
}
