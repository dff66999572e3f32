//! Listener binding with port walk-up.

use tokio::net::TcpListener;

/// How many consecutive ports to try before giving up.
pub const MAX_BIND_ATTEMPTS: u16 = 10;

/// Ports to try, clipped at the top of the u16 range.
fn candidate_ports(preferred: u16) -> impl Iterator<Item = u16> {
    (0..MAX_BIND_ATTEMPTS).map_while(move |offset| preferred.checked_add(offset))
}

/// Bind the preferred port, walking upward on `AddrInUse` so a second
/// instance on the same host comes up without manual configuration.
pub async fn bind_with_retry(host: &str, preferred: u16) -> anyhow::Result<TcpListener> {
    for port in candidate_ports(preferred) {
        match TcpListener::bind((host, port)).await {
            Ok(listener) => return Ok(listener),
            Err(e) if e.kind() == std::io::ErrorKind::AddrInUse => {
                tracing::warn!(port, "port in use, trying the next one");
            }
            Err(e) => return Err(e.into()),
        }
    }
    anyhow::bail!("no free port within {MAX_BIND_ATTEMPTS} ports of {preferred}")
}
