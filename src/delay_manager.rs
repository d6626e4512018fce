use std::ops::RangeInclusive;
use std::time::Duration;
use std::thread;
use rand::Rng;
use log::debug;

/// Optional random sleep before every provider request.
///
/// Disabled by default: each lookup already waits on the operator, which keeps
/// the request rate low. Enable it for unattended use.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pacing {
    range_secs: Option<RangeInclusive<u64>>,
}

impl Pacing {
    pub fn disabled() -> Self {
        Pacing { range_secs: None }
    }

    pub fn between(min_secs: u64, max_secs: u64) -> Self {
        Pacing {
            range_secs: Some(min_secs.min(max_secs)..=max_secs.max(min_secs)),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.range_secs.is_some()
    }

    pub fn next_delay(&self) -> Option<Duration> {
        let range = self.range_secs.clone()?;
        let mut rng = rand::thread_rng();
        Some(Duration::from_secs(rng.gen_range(range)))
    }

    pub fn wait(&self) {
        if let Some(delay) = self.next_delay() {
            debug!("Waiting for {} seconds before the next request...", delay.as_secs());
            thread::sleep(delay);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_has_no_delay() {
        assert_eq!(Pacing::disabled().next_delay(), None);
        assert!(!Pacing::default().is_enabled());
    }

    #[test]
    fn test_delay_within_range() {
        let pacing = Pacing::between(5, 2);
        for _ in 0..20 {
            let secs = pacing.next_delay().unwrap().as_secs();
            assert!((2..=5).contains(&secs));
        }
    }
}
