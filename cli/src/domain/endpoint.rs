//! REST endpoint URL construction from operator-supplied host strings.

use std::sync::LazyLock;

use regex::Regex;

/// Port used when the host string carries none.
pub const DEFAULT_PORT: u16 = 28081;

/// Path of the REST API under the sandbox deployment.
pub const DEFAULT_REST_PATH: &str = "/sandbox/rest";

#[allow(clippy::unwrap_used)] // compile-time constant pattern
static HOST_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3}|[a-zA-Z0-9.-]+)(:\d+)?$").unwrap()
});

/// Build the REST base URL for `host`.
///
/// - `http://…` / `https://…` is returned unchanged.
/// - `host` or `host:port` becomes `http://host:port/sandbox/rest`, with
///   port 28081 when absent.
/// - Anything else is returned unchanged so the connection fails with the
///   operator's own input in the error.
#[must_use]
pub fn rest_url(host: &str) -> String {
    if host.starts_with("http://") || host.starts_with("https://") {
        return host.to_string();
    }
    let Some(caps) = HOST_RE.captures(host) else {
        return host.to_string();
    };
    let name = &caps[1];
    let port = caps
        .get(2)
        .map_or_else(|| format!(":{DEFAULT_PORT}"), |m| m.as_str().to_string());
    format!("http://{name}{port}{DEFAULT_REST_PATH}")
}

/// Web UI URL matching [`rest_url`] (`…/sandbox/app`).
#[must_use]
pub fn app_url(host: &str) -> String {
    let rest = rest_url(host);
    match rest.strip_suffix("/rest") {
        Some(base) => format!("{base}/app"),
        None => rest,
    }
}
