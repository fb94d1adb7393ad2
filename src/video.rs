use std::process::{Child, Command, Stdio};

use webbrowser::Browser;

use crate::channel::Channel;

/// Transport contract for the playback subsystem. Playback is a black box:
/// the core never inspects its status and every failure is absorbed.
pub trait VideoPlayer {
    /// Begins playback of the channel, replacing any current stream
    fn select_channel(&mut self, channel: &Channel);
    fn play(&mut self);
    fn pause(&mut self);
}

/// Hands the stream URL to an external player command (mpv, vlc, ...), or to
/// the default browser when no command is configured.
pub struct ExternalPlayer {
    player_cmd: Option<String>,
    child: Option<Child>,
}

impl ExternalPlayer {
    pub fn new(player_cmd: Option<String>) -> Self {
        Self {
            player_cmd,
            child: None,
        }
    }

    fn build_command(player_cmd: &str, url: &str) -> Option<Command> {
        let mut parts = player_cmd.split_whitespace();
        let program = parts.next()?;
        let mut cmd = Command::new(program);
        cmd.args(parts)
            .arg(url)
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        Some(cmd)
    }

    fn stop(&mut self) {
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

impl VideoPlayer for ExternalPlayer {
    fn select_channel(&mut self, channel: &Channel) {
        self.stop();
        match &self.player_cmd {
            Some(player_cmd) => {
                self.child = Self::build_command(player_cmd, &channel.url)
                    .and_then(|mut cmd| cmd.spawn().ok());
            }
            None => {
                if Browser::is_available() {
                    webbrowser::open(&channel.url).unwrap_or_default();
                }
            }
        }
    }

    // The spawned player owns its own transport controls; there is no IPC
    // channel here to drive them.
    fn play(&mut self) {}

    fn pause(&mut self) {}
}

impl Drop for ExternalPlayer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Player that does nothing; used with --no-video and in tests
#[derive(Debug, Default)]
pub struct NullPlayer;

impl VideoPlayer for NullPlayer {
    fn select_channel(&mut self, _channel: &Channel) {}
    fn play(&mut self) {}
    fn pause(&mut self) {}
}
