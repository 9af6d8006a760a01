//! Errors raised while configuring and starting the relay server

use std::io;
use std::net::{AddrParseError, SocketAddr};

use axum::http::header::InvalidHeaderValue;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid host address {host:?}")]
    InvalidHost {
        host: String,
        #[source]
        source: AddrParseError,
    },

    #[error("invalid allowed origin {origin:?}")]
    InvalidOrigin {
        origin: String,
        #[source]
        source: InvalidHeaderValue,
    },

    #[error("failed to bind {addr}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Io(#[from] io::Error),
}
