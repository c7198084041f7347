use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::Mutex;

use base64::Engine;

use crate::error::{Result, VectorWebError};

/// Destination for copied result text.
///
/// Implementations:
/// - `SystemClipboard`: platform clipboard tool, or an OSC 52 terminal escape
/// - `MemoryClipboard`: in-process buffer, for tests and headless use
pub trait Clipboard: Send + Sync {
    fn set_text(&self, text: &str) -> Result<()>;
}

/// External clipboard tools, in preference order, with the environment
/// variable that must be set for each to be usable.
const TOOLS: &[(&str, &[&str], Option<&str>)] = &[
    ("pbcopy", &[], None),
    ("wl-copy", &[], Some("WAYLAND_DISPLAY")),
    ("xclip", &["-selection", "clipboard"], Some("DISPLAY")),
    ("xsel", &["--clipboard", "--input"], Some("DISPLAY")),
    ("clip.exe", &[], None),
];

#[derive(Debug, Clone)]
enum Method {
    Tool {
        program: PathBuf,
        args: &'static [&'static str],
    },
    Osc52,
}

#[derive(Debug, Clone)]
pub struct SystemClipboard {
    method: Method,
}

impl SystemClipboard {
    /// Pick the first available clipboard tool, falling back to OSC 52.
    pub fn detect() -> Self {
        for &(name, args, env) in TOOLS {
            if let Some(var) = env {
                if std::env::var_os(var).is_none() {
                    continue;
                }
            }
            if let Ok(program) = which::which(name) {
                tracing::debug!(tool = name, "clipboard: using external tool");
                return Self {
                    method: Method::Tool { program, args },
                };
            }
        }
        tracing::debug!("clipboard: no tool found, using OSC 52");
        Self {
            method: Method::Osc52,
        }
    }

    pub fn osc52() -> Self {
        Self {
            method: Method::Osc52,
        }
    }

    pub fn describe(&self) -> String {
        match &self.method {
            Method::Tool { program, .. } => program.display().to_string(),
            Method::Osc52 => "osc52".to_string(),
        }
    }
}

/// OSC 52 "set clipboard" escape sequence for `text`.
pub fn osc52_sequence(text: &str) -> String {
    let payload = base64::engine::general_purpose::STANDARD.encode(text);
    format!("\x1b]52;c;{payload}\x07")
}

fn pipe_to(program: &Path, args: &[&str], text: &str) -> Result<()> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;
    let status = feed(&mut child, text)?;
    if !status.success() {
        return Err(VectorWebError::Clipboard(format!(
            "{} exited with {status}",
            program.display()
        )));
    }
    Ok(())
}

/// Write `text` to the child's stdin and reap it. The child is waited on even
/// when the write fails.
fn feed(child: &mut Child, text: &str) -> Result<ExitStatus> {
    let written = match child.stdin.take() {
        Some(mut stdin) => stdin.write_all(text.as_bytes()),
        None => Ok(()),
    };
    let status = child.wait()?;
    written?;
    Ok(status)
}

impl Clipboard for SystemClipboard {
    fn set_text(&self, text: &str) -> Result<()> {
        match &self.method {
            Method::Tool { program, args } => pipe_to(program, args, text),
            Method::Osc52 => {
                let mut stdout = std::io::stdout();
                stdout.write_all(osc52_sequence(text).as_bytes())?;
                stdout.flush()?;
                Ok(())
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct MemoryClipboard {
    contents: Mutex<Option<String>>,
    deny: bool,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// A clipboard that rejects every write, like a platform denying access.
    pub fn denying() -> Self {
        Self {
            contents: Mutex::new(None),
            deny: true,
        }
    }

    pub fn contents(&self) -> Option<String> {
        self.contents.lock().ok().and_then(|c| c.clone())
    }
}

impl Clipboard for MemoryClipboard {
    fn set_text(&self, text: &str) -> Result<()> {
        if self.deny {
            return Err(VectorWebError::Clipboard("access denied".into()));
        }
        let mut contents = self
            .contents
            .lock()
            .map_err(|_| VectorWebError::Clipboard("clipboard lock poisoned".into()))?;
        *contents = Some(text.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_osc52_sequence() {
        assert_eq!(osc52_sequence("hi"), "\x1b]52;c;aGk=\x07");
    }

    #[test]
    fn test_memory_clipboard() {
        let clip = MemoryClipboard::new();
        assert!(clip.contents().is_none());
        clip.set_text("AI history").unwrap();
        assert_eq!(clip.contents().as_deref(), Some("AI history"));
    }

    #[test]
    fn test_denying_clipboard() {
        let clip = MemoryClipboard::denying();
        assert!(clip.set_text("x").is_err());
        assert!(clip.contents().is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_feed_reaps_child_when_write_fails() {
        let mut child = Command::new("true")
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .spawn()
            .unwrap();
        // Far more than a pipe buffer, so the write hits a closed pipe.
        let text = "x".repeat(4 * 1024 * 1024);
        assert!(feed(&mut child, &text).is_err());
        assert!(child.try_wait().unwrap().is_some());
    }

    #[cfg(unix)]
    #[test]
    fn test_feed_success() {
        let mut child = Command::new("cat")
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .spawn()
            .unwrap();
        let status = feed(&mut child, "AI history").unwrap();
        assert!(status.success());
    }

    #[test]
    fn test_osc52_describe() {
        assert_eq!(SystemClipboard::osc52().describe(), "osc52");
    }
}
