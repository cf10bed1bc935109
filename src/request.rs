use crate::config::BenchmarkConfig;
use crate::error::BenchError;

/// Longest URL we accept, in bytes.
pub const MAX_URL_LEN: usize = 1500;
pub const DEFAULT_HTTP_PORT: u16 = 80;
pub const USER_AGENT: &str = "httpbench/0.1";

/// The serialized request plus the address the workers must dial.
///
/// Built exactly once per run and shared read-only across every worker;
/// nothing mutates it after construction.
#[derive(Debug, Clone)]
pub struct BuiltRequest {
    pub connect_host: String,
    pub connect_port: u16,
    pub bytes: Vec<u8>,
}

/// Parses `url` and serializes the one request every transaction will send.
///
/// Without a proxy the request-target is the path portion and a `Host:`
/// header names the origin; with a proxy the target is the absolute URL and
/// no `Host:` header is emitted. No method carries a body, so the request
/// ends at the blank line after the headers.
pub fn build_request(config: &BenchmarkConfig, url: &str) -> Result<BuiltRequest, BenchError> {
    if config.proxy.is_none() {
        let scheme_ok = url.len() >= 7 && url.as_bytes()[..7].eq_ignore_ascii_case(b"http://");
        if !scheme_ok {
            return Err(BenchError::UnsupportedScheme);
        }
    }
    let sep = url
        .find("://")
        .ok_or_else(|| BenchError::InvalidUrl(format!("missing \"://\" in {url}")))?;
    let authority_and_path = &url[sep + 3..];
    let slash = authority_and_path
        .find('/')
        .ok_or_else(|| BenchError::InvalidUrl("host must end with a path".to_string()))?;
    if url.len() > MAX_URL_LEN {
        return Err(BenchError::UrlTooLong(url.len()));
    }

    let authority = &authority_and_path[..slash];
    let path = &authority_and_path[slash..];
    let (host, port) = match authority.split_once(':') {
        Some((host, port)) => (host, parse_port(port)),
        None => (authority, DEFAULT_HTTP_PORT),
    };

    // A proxy needs the absolute URI as the request-target.
    let target = if config.proxy.is_some() { url } else { path };

    let mut request = String::with_capacity(target.len() + 128);
    request.push_str(config.method.as_str());
    request.push(' ');
    request.push_str(target);
    request.push_str(" HTTP/1.1\r\n");
    request.push_str("User-Agent: ");
    request.push_str(USER_AGENT);
    request.push_str("\r\n");
    if config.proxy.is_none() {
        request.push_str("Host: ");
        request.push_str(host);
        request.push_str("\r\n");
    }
    if config.reload && config.proxy.is_some() {
        request.push_str("Pragma: no-cache\r\n");
    }
    request.push_str("Connection: close\r\n\r\n");

    let (connect_host, connect_port) = match &config.proxy {
        Some(proxy) => (proxy.host.clone(), proxy.port),
        None => (host.to_string(), port),
    };

    Ok(BuiltRequest {
        connect_host,
        connect_port,
        bytes: request.into_bytes(),
    })
}

// The original tool treats port 0 as "use the default"; a non-numeric port
// falls back the same way rather than failing the whole URL.
fn parse_port(raw: &str) -> u16 {
    match raw.parse::<u16>() {
        Ok(0) | Err(_) => DEFAULT_HTTP_PORT,
        Ok(port) => port,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{HttpMethod, Proxy};
    use std::time::Duration;

    fn config(method: HttpMethod, proxy: Option<Proxy>, reload: bool) -> BenchmarkConfig {
        BenchmarkConfig {
            method,
            proxy,
            clients: 1,
            duration: Duration::from_secs(30),
            force: false,
            reload,
        }
    }

    fn proxy() -> Proxy {
        Proxy {
            host: "10.0.0.1".to_string(),
            port: 3128,
        }
    }

    fn text(built: &BuiltRequest) -> String {
        String::from_utf8(built.bytes.clone()).unwrap()
    }

    #[test]
    fn origin_request_targets_path_with_host_header() {
        let cfg = config(HttpMethod::Get, None, false);
        let built = build_request(&cfg, "http://example.com:8080/index.html").unwrap();

        assert_eq!(built.connect_host, "example.com");
        assert_eq!(built.connect_port, 8080);
        let req = text(&built);
        assert!(req.starts_with("GET /index.html HTTP/1.1\r\n"));
        assert!(req.contains("Host: example.com\r\n"));
        assert!(req.contains("Connection: close\r\n"));
        assert!(req.ends_with("\r\n\r\n"));
    }

    #[test]
    fn proxy_request_targets_absolute_url() {
        let cfg = config(HttpMethod::Get, Some(proxy()), true);
        let built = build_request(&cfg, "http://example.com/").unwrap();

        assert_eq!(built.connect_host, "10.0.0.1");
        assert_eq!(built.connect_port, 3128);
        let req = text(&built);
        assert!(req.starts_with("GET http://example.com/ HTTP/1.1\r\n"));
        assert!(req.contains("Pragma: no-cache\r\n"));
        assert!(!req.contains("Host:"));
    }

    #[test]
    fn pragma_needs_both_proxy_and_reload() {
        let cfg = config(HttpMethod::Get, Some(proxy()), false);
        let built = build_request(&cfg, "http://example.com/").unwrap();
        assert!(!text(&built).contains("Pragma"));

        // Reload without a proxy has nothing to tell the origin.
        let cfg = config(HttpMethod::Get, None, true);
        let built = build_request(&cfg, "http://example.com/").unwrap();
        assert!(!text(&built).contains("Pragma"));
    }

    #[test]
    fn missing_scheme_separator_is_invalid() {
        let cfg = config(HttpMethod::Get, Some(proxy()), false);
        let err = build_request(&cfg, "example.com/").unwrap_err();
        assert!(matches!(err, BenchError::InvalidUrl(_)));
    }

    #[test]
    fn host_without_trailing_path_is_invalid() {
        let cfg = config(HttpMethod::Get, None, false);
        let err = build_request(&cfg, "http://example.com").unwrap_err();
        assert!(matches!(err, BenchError::InvalidUrl(_)));
    }

    #[test]
    fn non_http_scheme_without_proxy_is_unsupported() {
        let cfg = config(HttpMethod::Get, None, false);
        let err = build_request(&cfg, "ftp://example.com/").unwrap_err();
        assert!(matches!(err, BenchError::UnsupportedScheme));

        // The same URL is fine once a proxy carries it.
        let cfg = config(HttpMethod::Get, Some(proxy()), false);
        build_request(&cfg, "ftp://example.com/").unwrap();
    }

    #[test]
    fn scheme_check_is_case_insensitive() {
        let cfg = config(HttpMethod::Get, None, false);
        let built = build_request(&cfg, "HTTP://Example.Com/").unwrap();
        assert_eq!(built.connect_host, "Example.Com");
    }

    #[test]
    fn overlong_url_is_rejected() {
        let cfg = config(HttpMethod::Get, None, false);
        let url = format!("http://example.com/{}", "a".repeat(MAX_URL_LEN));
        let err = build_request(&cfg, &url).unwrap_err();
        assert!(matches!(err, BenchError::UrlTooLong(_)));
    }

    #[test]
    fn zero_or_garbage_port_falls_back_to_default() {
        let cfg = config(HttpMethod::Get, None, false);
        let built = build_request(&cfg, "http://example.com:0/").unwrap();
        assert_eq!(built.connect_port, DEFAULT_HTTP_PORT);

        let built = build_request(&cfg, "http://example.com:http/").unwrap();
        assert_eq!(built.connect_port, DEFAULT_HTTP_PORT);
    }

    #[test]
    fn method_names_appear_in_the_request_line() {
        for (method, name) in [
            (HttpMethod::Get, "GET"),
            (HttpMethod::Head, "HEAD"),
            (HttpMethod::Options, "OPTIONS"),
            (HttpMethod::Trace, "TRACE"),
        ] {
            let cfg = config(method, None, false);
            let built = build_request(&cfg, "http://example.com/").unwrap();
            assert!(text(&built).starts_with(&format!("{name} / HTTP/1.1\r\n")));
        }
    }
}
