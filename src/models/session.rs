/// Lifecycle of the single attached interactive child process.
///
/// `Exited(None)` is the spawn-failure arm: the process never came up, so
/// there is no valid exit code to report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    Starting,
    Live,
    AwaitingInput,
    Exited(Option<i32>),
    Stopped,
}

impl SessionPhase {
    /// True while a process handle is (or is about to be) attached.
    pub fn is_attached(&self) -> bool {
        matches!(
            self,
            SessionPhase::Starting | SessionPhase::Live | SessionPhase::AwaitingInput
        )
    }

    /// Status label the host shows next to the terminal tab.
    pub fn status_label(&self) -> String {
        match self {
            SessionPhase::Idle => "IDLE".to_string(),
            SessionPhase::Starting => "STARTING".to_string(),
            SessionPhase::Live => "LIVE".to_string(),
            SessionPhase::AwaitingInput => "INPUT NEEDED".to_string(),
            SessionPhase::Exited(Some(code)) => format!("EXITED ({code})"),
            SessionPhase::Exited(None) => "EXITED".to_string(),
            SessionPhase::Stopped => "STOPPED".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attached_phases() {
        assert!(SessionPhase::Starting.is_attached());
        assert!(SessionPhase::Live.is_attached());
        assert!(SessionPhase::AwaitingInput.is_attached());
        assert!(!SessionPhase::Idle.is_attached());
        assert!(!SessionPhase::Exited(Some(0)).is_attached());
        assert!(!SessionPhase::Stopped.is_attached());
    }

    #[test]
    fn exit_labels() {
        assert_eq!(SessionPhase::Exited(Some(1)).status_label(), "EXITED (1)");
        assert_eq!(SessionPhase::Exited(None).status_label(), "EXITED");
    }
}
