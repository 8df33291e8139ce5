/// Per-client sliding-window rate limiter, keyed by source address.
///
/// The only shared mutable state in the service: a mutex-guarded map of
/// recent request timestamps per client. Check-and-record is a single
/// critical section so concurrent bursts from one client cannot race past
/// the limit.
use std::collections::{HashMap, VecDeque};
use std::net::IpAddr;
use std::sync::Mutex;
use std::time::{Duration, Instant};

pub struct RateLimiter {
    max_requests: usize,
    window: Duration,
    clients: Mutex<HashMap<IpAddr, VecDeque<Instant>>>,
}

impl RateLimiter {
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            clients: Mutex::new(HashMap::new()),
        }
    }

    /// Admits the request iff the client has made fewer than `max_requests`
    /// admitted requests in the trailing window. Rejected requests do not
    /// consume window capacity.
    pub fn check(&self, key: IpAddr) -> bool {
        self.check_at(key, Instant::now())
    }

    fn check_at(&self, key: IpAddr, now: Instant) -> bool {
        let mut clients = self.clients.lock().expect("rate limiter lock poisoned");

        let admitted = {
            let window = clients.entry(key).or_default();
            while let Some(&front) = window.front() {
                if now.duration_since(front) >= self.window {
                    window.pop_front();
                } else {
                    break;
                }
            }
            if window.len() < self.max_requests {
                window.push_back(now);
                true
            } else {
                false
            }
        };

        // Drop fully-expired clients so the map does not grow without bound.
        clients.retain(|_, w| !w.is_empty());

        admitted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(last: u8) -> IpAddr {
        IpAddr::from([127, 0, 0, last])
    }

    #[test]
    fn test_fifth_request_admitted_sixth_rejected() {
        let limiter = RateLimiter::new(5, Duration::from_secs(60));
        let now = Instant::now();
        for _ in 0..5 {
            assert!(limiter.check_at(addr(1), now));
        }
        assert!(!limiter.check_at(addr(1), now));
    }

    #[test]
    fn test_window_expiry_readmits() {
        let limiter = RateLimiter::new(5, Duration::from_secs(60));
        let start = Instant::now();
        for _ in 0..5 {
            assert!(limiter.check_at(addr(1), start));
        }
        assert!(!limiter.check_at(addr(1), start + Duration::from_secs(59)));
        assert!(limiter.check_at(addr(1), start + Duration::from_secs(60)));
    }

    #[test]
    fn test_clients_are_limited_independently() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));
        let now = Instant::now();
        assert!(limiter.check_at(addr(1), now));
        assert!(!limiter.check_at(addr(1), now));
        assert!(limiter.check_at(addr(2), now));
    }

    #[test]
    fn test_rejected_requests_do_not_extend_the_window() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));
        let start = Instant::now();
        assert!(limiter.check_at(addr(1), start));
        // Hammering while limited must not push the reset point out.
        for s in 1..60 {
            assert!(!limiter.check_at(addr(1), start + Duration::from_secs(s)));
        }
        assert!(limiter.check_at(addr(1), start + Duration::from_secs(60)));
    }
}
