//! Sound playback through an external audio player process

use std::{io::ErrorKind, process::Stdio, sync::Arc};
use tokio::{io::AsyncWriteExt, process::Command, task::JoinHandle};
use tracing::{debug, info, warn};

use super::sound::{ClipId, Repeat, SoundBackend, SoundKind};

/// Program and arguments of the audio player. The clip is written to its stdin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl PlayerCommand {
    /// Split a command line such as `aplay -q -` on whitespace
    pub fn parse(command_line: &str) -> Option<Self> {
        let mut parts = command_line.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
        })
    }
}

/// Check that the player program can be spawned at all
pub async fn check_player_available(command: &PlayerCommand) -> Result<(), String> {
    match Command::new(&command.program)
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await
    {
        Ok(_) => {
            info!("Audio player {} is available", command.program);
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Err(format!(
            "Audio player {} is not installed",
            command.program
        )),
        Err(e) => Err(format!("Failed to run audio player {}: {}", command.program, e)),
    }
}

#[derive(Debug)]
struct Stream {
    clip: ClipId,
    repeat: Repeat,
    handle: JoinHandle<()>,
}

/// Plays clips by piping them into one player process per playback
#[derive(Debug)]
pub struct PlayerBackend {
    command: PlayerCommand,
    clips: Vec<Arc<[u8]>>,
    streams: Vec<Stream>,
    paused: Vec<ClipId>,
}

impl PlayerBackend {
    pub fn new(command: PlayerCommand) -> Self {
        Self {
            command,
            clips: Vec::new(),
            streams: Vec::new(),
            paused: Vec::new(),
        }
    }

    fn spawn_stream(&mut self, clip: ClipId, repeat: Repeat) {
        let Some(bytes) = self.clips.get(clip.0).cloned() else {
            warn!("Unknown clip {:?}", clip);
            return;
        };
        self.streams.retain(|stream| !stream.handle.is_finished());

        let command = self.command.clone();
        let handle = tokio::spawn(async move {
            play_stream(command, bytes, repeat).await;
        });
        self.streams.push(Stream { clip, repeat, handle });
    }
}

impl SoundBackend for PlayerBackend {
    fn load(&mut self, kind: SoundKind, bytes: Arc<[u8]>) -> Result<ClipId, String> {
        debug!("Keeping {} bytes of {} sound in memory", bytes.len(), kind.name());
        self.clips.push(bytes);
        Ok(ClipId(self.clips.len() - 1))
    }

    fn play(&mut self, clip: ClipId, repeat: Repeat) {
        self.paused.retain(|paused| *paused != clip);
        self.spawn_stream(clip, repeat);
    }

    /// Stops every player process. Looping clips are remembered so that
    /// `resume_all` can start them again; one-shot clips are dropped.
    fn pause_all(&mut self) {
        for stream in self.streams.drain(..) {
            if stream.handle.is_finished() {
                continue;
            }
            stream.handle.abort();
            if stream.repeat == Repeat::Forever && !self.paused.contains(&stream.clip) {
                self.paused.push(stream.clip);
            }
        }
    }

    fn resume_all(&mut self) {
        for clip in std::mem::take(&mut self.paused) {
            self.spawn_stream(clip, Repeat::Forever);
        }
    }

    fn stop_all(&mut self) {
        for stream in self.streams.drain(..) {
            stream.handle.abort();
        }
        self.paused.clear();
    }

    fn release(&mut self) {
        self.stop_all();
        self.clips.clear();
    }
}

impl Drop for PlayerBackend {
    fn drop(&mut self) {
        self.release();
    }
}

async fn play_stream(command: PlayerCommand, bytes: Arc<[u8]>, repeat: Repeat) {
    loop {
        if let Err(e) = play_clip(&command, &bytes).await {
            warn!("Sound playback stopped: {}", e);
            return;
        }
        if repeat == Repeat::Once {
            return;
        }
    }
}

/// Run the player once over the whole clip. The process is killed if the
/// surrounding task is aborted.
async fn play_clip(command: &PlayerCommand, bytes: &[u8]) -> Result<(), String> {
    let mut child = Command::new(&command.program)
        .args(&command.args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| format!("Failed to start {}: {}", command.program, e))?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(bytes)
            .await
            .map_err(|e| format!("Failed to stream clip to {}: {}", command.program, e))?;
    }

    let status = child
        .wait()
        .await
        .map_err(|e| format!("Failed to wait for {}: {}", command.program, e))?;

    if !status.success() {
        return Err(format!("{} exited with {}", command.program, status));
    }
    Ok(())
}
