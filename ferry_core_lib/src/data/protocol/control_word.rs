use std::fmt;

/// Literal tokens exchanged on the control, job and terminate streams.
/// They are never file content and are matched case-insensitively.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ControlWord {
    NotFound,
    Exists,
    Ready,
    Sent,
    Received,
    Quit,
    Terminating,
    UnknownId,
}

impl ControlWord {
    pub fn as_str(&self) -> &'static str {
        match self {
            ControlWord::NotFound => "NOT FOUND",
            ControlWord::Exists => "EXISTS",
            ControlWord::Ready => "READY",
            ControlWord::Sent => "SENT",
            ControlWord::Received => "RECEIVED",
            ControlWord::Quit => "QUIT",
            ControlWord::Terminating => "TERMINATING",
            ControlWord::UnknownId => "UNKNOWN ID",
        }
    }

    pub fn from_line(line: &str) -> Option<ControlWord> {
        let line = line.trim();
        [
            ControlWord::NotFound,
            ControlWord::Exists,
            ControlWord::Ready,
            ControlWord::Sent,
            ControlWord::Received,
            ControlWord::Quit,
            ControlWord::Terminating,
            ControlWord::UnknownId,
        ]
        .into_iter()
        .find(|word| word.as_str().eq_ignore_ascii_case(line))
    }

    pub fn matches(&self, line: &str) -> bool {
        self.as_str().eq_ignore_ascii_case(line.trim())
    }
}

impl fmt::Display for ControlWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
