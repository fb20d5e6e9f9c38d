//! # Server Utilities
//!
//! File: cli/src/commands/srv/utils.rs
//!
//! ## Overview
//!
//! Helpers for the startup banner printed by `run_server`.
//!
use std::net::{IpAddr, UdpSocket};
use tracing::{debug, warn};

/// # Get Local IP (`get_local_ip`)
///
/// Finds the address of the interface that would route to the public
/// internet, for printing a "Network URL". Connecting a UDP socket sends no
/// packets; it only asks the OS to choose a source address.
///
/// ## Returns
///
/// * `Option<IpAddr>`: The non-loopback local address, or `None` if it
///   could not be determined (offline host, no default route).
pub fn get_local_ip() -> Option<IpAddr> {
    let socket = match UdpSocket::bind("0.0.0.0:0") {
        Ok(socket) => socket,
        Err(e) => {
            warn!("Could not open UDP socket to detect local IP: {}", e);
            return None;
        }
    };
    if let Err(e) = socket.connect("8.8.8.8:80") {
        debug!("No route for local IP detection: {}", e);
        return None;
    }
    match socket.local_addr() {
        Ok(addr) if !addr.ip().is_loopback() && !addr.ip().is_unspecified() => {
            debug!("Found local IP: {}", addr.ip());
            Some(addr.ip())
        }
        _ => None,
    }
}

/// Formats the URL a browser on this machine should open for `host:port`.
pub fn local_url(host: IpAddr, port: u16) -> String {
    if host.is_unspecified() || host.is_loopback() {
        format!("http://localhost:{}", port)
    } else {
        format!("http://{}:{}", host, port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[test]
    fn test_get_local_ip_is_never_loopback() {
        if let Some(ip) = get_local_ip() {
            assert!(!ip.is_loopback());
        }
    }

    #[test]
    fn test_local_url() {
        assert_eq!(local_url(Ipv4Addr::LOCALHOST.into(), 5000), "http://localhost:5000");
        assert_eq!(local_url(Ipv4Addr::UNSPECIFIED.into(), 80), "http://localhost:80");
        assert_eq!(
            local_url(Ipv4Addr::new(192, 168, 1, 20).into(), 8080),
            "http://192.168.1.20:8080"
        );
    }
}
