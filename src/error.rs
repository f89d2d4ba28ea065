#[allow(clippy::module_name_repetitions)]
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ErrorKind {
    OOB,
    Timeout,
    FrameBroken,
    FrameCRCError,
    HeaderMismatch,
    NoTransport,
    TransportError,
}

impl ErrorKind {
    /// Errors which are expected on a noisy line and cost a single reading only
    pub fn is_transient(self) -> bool {
        matches!(
            self,
            ErrorKind::Timeout
                | ErrorKind::FrameBroken
                | ErrorKind::FrameCRCError
                | ErrorKind::HeaderMismatch
        )
    }
}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg: &str = match self {
            ErrorKind::OOB => "OUT OF BUFFER",
            ErrorKind::Timeout => "TIMED OUT WAITING FOR FRAME END",
            ErrorKind::FrameBroken => "FRAME BROKEN",
            ErrorKind::FrameCRCError => "FRAME CRC ERROR",
            ErrorKind::HeaderMismatch => "RESPONSE HEADER DOES NOT MATCH REQUEST",
            ErrorKind::NoTransport => "TRANSPORT NOT SET",
            ErrorKind::TransportError => "TRANSPORT WRITE FAILED",
        };
        write!(f, "{}", msg)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ErrorKind {}
