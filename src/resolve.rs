use std::net::{IpAddr, Ipv4Addr};

use crate::PingError;

/// Resolves `host` to an IPv4 address. Literal addresses parse without a
/// DNS round trip.
pub fn lookup_host_v4(host: &str) -> Result<Ipv4Addr, PingError> {
    if let Ok(ip) = host.parse::<Ipv4Addr>() {
        return Ok(ip);
    }
    let ips = dns_lookup::lookup_host(host)?;
    ips.into_iter()
        .find_map(|ip| match ip {
            IpAddr::V4(v4) => Some(v4),
            IpAddr::V6(_) => None,
        })
        .ok_or_else(|| PingError {
            message: format!("could not resolve {host} to an IPv4 address"),
        })
}
