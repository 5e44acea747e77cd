use std::collections::HashMap;
use std::time::Duration;
use tokio::time::Instant;
use url::Url;

/// Key used for pacing: host plus effective port.
pub fn host_key(url: &Url) -> String {
    format!(
        "{}:{}",
        url.host_str().unwrap_or_default(),
        url.port_or_known_default().unwrap_or_default()
    )
}

/// Remembers when each host was last fetched.
///
/// A host may be fetched again once `delay` has passed since the previous fetch
/// to it started. Not synchronized on its own; the frontier owns it.
#[derive(Debug)]
pub struct HostPacer {
    delay: Duration,
    last_start: HashMap<String, Instant>,
}

impl HostPacer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            last_start: HashMap::new(),
        }
    }

    /// `None` if the host may be fetched at `now`, otherwise when it may.
    pub fn ready_at(&self, host: &str, now: Instant) -> Option<Instant> {
        self.last_start
            .get(host)
            .map(|started| *started + self.delay)
            .filter(|due| *due > now)
    }

    pub fn mark_started(&mut self, host: &str, now: Instant) {
        self.last_start.insert(host.to_string(), now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_host_is_ready() {
        let pacer = HostPacer::new(Duration::from_millis(500));
        assert!(pacer.ready_at("example.com:443", Instant::now()).is_none());
    }

    #[test]
    fn host_waits_for_delay_after_start() {
        let mut pacer = HostPacer::new(Duration::from_millis(500));
        let start = Instant::now();
        pacer.mark_started("example.com:443", start);

        assert_eq!(
            pacer.ready_at("example.com:443", start + Duration::from_millis(100)),
            Some(start + Duration::from_millis(500))
        );
        assert!(pacer.ready_at("example.com:443", start + Duration::from_millis(500)).is_none());
        // other hosts are unaffected
        assert!(pacer.ready_at("other.com:443", start).is_none());
    }

    #[test]
    fn zero_delay_never_holds() {
        let mut pacer = HostPacer::new(Duration::ZERO);
        let now = Instant::now();
        pacer.mark_started("example.com:80", now);
        assert!(pacer.ready_at("example.com:80", now).is_none());
    }

    #[test]
    fn host_key_includes_port() {
        let a = Url::parse("http://127.0.0.1:8080/a").unwrap();
        let b = Url::parse("http://127.0.0.1:9090/a").unwrap();
        let c = Url::parse("https://example.com/x").unwrap();
        assert_ne!(host_key(&a), host_key(&b));
        assert_eq!(host_key(&c), "example.com:443");
    }
}
