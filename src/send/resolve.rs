//! Destination lookup for the sending side.

use std::net::{IpAddr, ToSocketAddrs};

use crate::common::TransferError;

/// Turn a user-supplied destination into one address to connect to.
///
/// Literal IPv4/IPv6 addresses are used as-is. Hostnames go through the
/// system resolver and the first IPv4 result wins.
#[tracing::instrument]
pub fn resolve(destination: &str) -> Result<IpAddr, TransferError> {
    if let Ok(ip) = destination.parse::<IpAddr>() {
        return Ok(ip);
    }

    let candidates = (destination, 0)
        .to_socket_addrs()
        .map_err(|source| TransferError::HostUnreachable {
            host: destination.to_string(),
            source: Some(source),
        })?;

    let ip = candidates
        .map(|addr| addr.ip())
        .find(IpAddr::is_ipv4)
        .ok_or_else(|| TransferError::HostUnreachable {
            host: destination.to_string(),
            source: None,
        })?;

    tracing::debug!(%ip, "Resolved destination");
    Ok(ip)
}
