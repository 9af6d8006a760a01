//! Command-line and environment configuration for the relay server

use crate::error::ServerError;
use axum::http::HeaderValue;
use clap::Parser;
use shared::{DEFAULT_ALLOWED_ORIGIN, DEFAULT_PORT};
use std::net::{IpAddr, SocketAddr};

/// Relay server for colonization game actions
#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
pub struct ServerConfig {
    /// IP address to bind to
    #[arg(short = 'H', long, env = "RELAY_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on (0 picks a free port)
    #[arg(short, long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Browser origin allowed to call the API
    #[arg(short = 'o', long, env = "ALLOWED_ORIGIN", default_value = DEFAULT_ALLOWED_ORIGIN)]
    pub allowed_origin: String,
}

impl ServerConfig {
    /// Resolves the socket address the listener binds to
    pub fn bind_addr(&self) -> Result<SocketAddr, ServerError> {
        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ServerError::InvalidHost {
                host: self.host.clone(),
                source,
            })?;
        Ok(SocketAddr::new(ip, self.port))
    }

    /// Validates the allowed origin as a CORS header value
    pub fn cors_origin(&self) -> Result<HeaderValue, ServerError> {
        HeaderValue::from_str(&self.allowed_origin).map_err(|source| ServerError::InvalidOrigin {
            origin: self.allowed_origin.clone(),
            source,
        })
    }
}
