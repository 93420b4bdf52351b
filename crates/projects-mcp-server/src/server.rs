use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use bon::bon;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};
use rmcp::ServiceExt as _;
use rmcp::transport::streamable_http_server::session::local::LocalSessionManager;
use rmcp::transport::{StreamableHttpService, stdio};
use schemars::JsonSchema;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};
use url::Url;

use crate::errors::ServerError;
use crate::graphql::GraphQLClient;
use crate::mutation_mode::MutationMode;
use crate::server_handler::ProjectsServerHandler;
use crate::tools::Tools;

/// An MCP server exposing GitHub Projects tools
pub struct Server {
    transport: Transport,
    endpoint: Url,
    headers: HeaderMap,
    timeout: Duration,
    mutation_mode: MutationMode,
}

/// How clients connect to the server
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Transport {
    /// Exchange messages over stdin and stdout
    #[default]
    Stdio,

    /// Serve the streamable HTTP transport at `/mcp`
    StreamableHttp {
        /// The IP address to bind to
        #[serde(default = "defaults::address")]
        address: IpAddr,

        /// The port to bind to
        #[serde(default = "defaults::port")]
        port: u16,
    },
}

mod defaults {
    use std::net::{IpAddr, Ipv4Addr};

    pub(super) fn address() -> IpAddr {
        IpAddr::V4(Ipv4Addr::LOCALHOST)
    }

    pub(super) fn port() -> u16 {
        5000
    }
}

#[bon]
impl Server {
    #[builder]
    pub fn new(
        transport: Transport,
        endpoint: Url,
        headers: HeaderMap,
        timeout: Duration,
        mutation_mode: MutationMode,
    ) -> Self {
        let headers = {
            let mut headers = headers;
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            headers.entry(USER_AGENT).or_insert(HeaderValue::from_static(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            )));
            headers
        };
        Self {
            transport,
            endpoint,
            headers,
            timeout,
            mutation_mode,
        }
    }

    /// Serve until the transport closes or a shutdown signal arrives
    pub async fn start(self) -> Result<(), ServerError> {
        let client = GraphQLClient::new(self.endpoint, self.headers, self.timeout)
            .map_err(ServerError::HttpClient)?;
        let tools = Arc::new(Tools::new(self.mutation_mode));
        info!(
            endpoint = %client.endpoint(),
            tools = tools.len(),
            mutation_mode = ?self.mutation_mode,
            "Configured GitHub Projects tools"
        );
        let handler = ProjectsServerHandler::new(tools, client);

        let cancellation_token = CancellationToken::new();
        tokio::spawn({
            let cancellation_token = cancellation_token.clone();
            async move {
                shutdown_signal().await;
                info!("Shutting down");
                cancellation_token.cancel();
            }
        });

        match self.transport {
            Transport::StreamableHttp { address, port } => {
                info!(port = ?port, address = ?address, "Starting MCP server in Streamable HTTP mode");
                let service = StreamableHttpService::new(
                    move || Ok(handler.clone()),
                    LocalSessionManager::default().into(),
                    Default::default(),
                );
                let router = axum::Router::new().nest_service("/mcp", service);
                let listener = tokio::net::TcpListener::bind(SocketAddr::new(address, port)).await?;
                axum::serve(listener, router)
                    .with_graceful_shutdown(cancellation_token.cancelled_owned())
                    .await?;
            }
            Transport::Stdio => {
                info!("Starting MCP server in stdio mode");
                let service = handler
                    .serve(stdio())
                    .await
                    .inspect_err(|e| {
                        error!("serving error: {:?}", e);
                    })
                    .map_err(|e| ServerError::Transport(e.to_string()))?;

                tokio::select! {
                    quit_reason = service.waiting() => {
                        debug!(?quit_reason, "Stdio transport closed");
                        quit_reason?;
                    }
                    _ = cancellation_token.cancelled() => {}
                }
            }
        }

        Ok(())
    }
}

/// Resolve once the process is asked to stop
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install CTRL+C signal handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
