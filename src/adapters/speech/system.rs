//! Platform text-to-speech via an external command (`say`, `espeak-ng`, or configured).

use crate::ports::SpeechPort;
use tracing::{debug, info, warn};

/// Speaks by spawning a TTS command with the text as its last argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemSpeech {
    program: String,
    args: Vec<String>,
}

impl SystemSpeech {
    /// Pick the platform's usual Japanese-capable voice.
    pub fn detect() -> Self {
        if cfg!(target_os = "macos") {
            Self::new("say", ["-v", "Kyoko"])
        } else {
            Self::new("espeak-ng", ["-v", "ja"])
        }
    }

    pub fn new<I, S>(program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.to_string(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse a whitespace-separated command line such as `espeak-ng -v ja`.
    /// Returns None for a blank line.
    pub fn from_command_line(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace();
        let program = parts.next()?;
        Some(Self::new(program, parts))
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl SpeechPort for SystemSpeech {
    fn speak(&self, text: &str, locale: &str) {
        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                warn!("no async runtime; dropping speech request");
                return;
            }
        };

        let mut cmd = tokio::process::Command::new(&self.program);
        cmd.args(&self.args)
            .arg(text)
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null());
        let program = self.program.clone();
        debug!(program = %program, locale, "speaking");

        handle.spawn(async move {
            match cmd.status().await {
                Ok(status) if status.success() => {}
                Ok(status) => warn!(program = %program, %status, "speech command failed"),
                Err(e) => warn!(program = %program, error = %e, "speech command could not start"),
            }
        });
    }
}

/// Speech sink that only logs. Used when no TTS command is available.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentSpeech;

impl SpeechPort for SilentSpeech {
    fn speak(&self, text: &str, locale: &str) {
        info!(locale, chars = text.chars().count(), "speech disabled; skipping");
    }
}
