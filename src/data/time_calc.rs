use std::time::Duration;

/// Accumulated durations per pipeline stage (`0` preprocess, `1` inference, `2` postprocess).
#[derive(Debug, Default, Clone)]
pub struct TimeCalc {
    n: usize,
    duration: Vec<Duration>,
}

impl TimeCalc {
    pub fn total(&self) -> Duration {
        self.duration.iter().sum::<Duration>()
    }

    /// Number of completed runs.
    pub fn n(&self) -> usize {
        if self.duration.is_empty() {
            0
        } else {
            self.n / self.duration.len()
        }
    }

    pub fn avg(&self) -> Duration {
        match self.n() {
            0 => Duration::ZERO,
            n => self.total() / n as u32,
        }
    }

    pub fn avg_i(&self, i: usize) -> Duration {
        match (self.duration.get(i), self.n()) {
            (Some(d), n) if n > 0 => *d / n as u32,
            _ => Duration::ZERO,
        }
    }

    pub fn ts(&self) -> &Vec<Duration> {
        &self.duration
    }

    pub fn add_or_push(&mut self, i: usize, x: Duration) {
        match self.duration.get_mut(i) {
            Some(elem) => *elem += x,
            None => {
                if i >= self.duration.len() {
                    self.duration.push(x)
                }
            }
        }
        self.n += 1;
    }

    pub fn clear(&mut self) {
        self.n = Default::default();
        self.duration = Default::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn averages_per_stage() {
        let mut t = TimeCalc::default();
        assert_eq!(t.avg(), Duration::ZERO);
        for _ in 0..2 {
            t.add_or_push(0, Duration::from_millis(2));
            t.add_or_push(1, Duration::from_millis(10));
            t.add_or_push(2, Duration::from_millis(4));
        }
        assert_eq!(t.n(), 2);
        assert_eq!(t.avg_i(1), Duration::from_millis(10));
        assert_eq!(t.avg(), Duration::from_millis(16));
        t.clear();
        assert_eq!(t.avg_i(0), Duration::ZERO);
    }
}
