#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassifierState {
    /// Model and labels loaded.
    Ready,
    /// Loading failed; only sentinel results are produced.
    Degraded,
    /// Released. Terminal.
    Closed,
}

// Hardcoded state names.
const READY: &str = "Ready";
const DEGRADED: &str = "Degraded";
const CLOSED: &str = "Closed";

impl ClassifierState {
    pub fn str(&self) -> &'static str {
        match self {
            ClassifierState::Ready => READY,
            ClassifierState::Degraded => DEGRADED,
            ClassifierState::Closed => CLOSED,
        }
    }
}

impl std::fmt::Display for ClassifierState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.str())
    }
}
