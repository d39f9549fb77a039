/// Recoverable failures reported by the platform ports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayError {
    /// Screen grab denied, or the requested rect is empty or off-screen.
    CaptureFailure { reason: String },
    /// Screen geometry could not be queried.
    PlatformQueryFailure { reason: String },
}

impl OverlayError {
    pub fn capture(reason: impl Into<String>) -> Self {
        Self::CaptureFailure {
            reason: reason.into(),
        }
    }

    pub fn platform_query(reason: impl Into<String>) -> Self {
        Self::PlatformQueryFailure {
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for OverlayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CaptureFailure { reason } => write!(f, "screen capture failed: {reason}"),
            Self::PlatformQueryFailure { reason } => {
                write!(f, "screen geometry query failed: {reason}")
            }
        }
    }
}

impl std::error::Error for OverlayError {}
