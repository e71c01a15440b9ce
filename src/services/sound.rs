//! Ticking and bell sound effects

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// The two clips the timer uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundKind {
    Ticking,
    Bell,
}

impl SoundKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Ticking => "ticking",
            Self::Bell => "bell",
        }
    }
}

/// Handle of a clip loaded into a backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClipId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repeat {
    Once,
    Forever,
}

/// Something that can play in-memory clips
pub trait SoundBackend {
    /// Keep `bytes` in memory and return a handle for later playback
    fn load(&mut self, kind: SoundKind, bytes: Arc<[u8]>) -> Result<ClipId, String>;
    fn play(&mut self, clip: ClipId, repeat: Repeat);
    fn pause_all(&mut self);
    fn resume_all(&mut self);
    /// Stop every clip and forget anything paused
    fn stop_all(&mut self);
    fn release(&mut self);
}

impl<T: SoundBackend + ?Sized> SoundBackend for Box<T> {
    fn load(&mut self, kind: SoundKind, bytes: Arc<[u8]>) -> Result<ClipId, String> {
        (**self).load(kind, bytes)
    }

    fn play(&mut self, clip: ClipId, repeat: Repeat) {
        (**self).play(clip, repeat)
    }

    fn pause_all(&mut self) {
        (**self).pause_all()
    }

    fn resume_all(&mut self) {
        (**self).resume_all()
    }

    fn stop_all(&mut self) {
        (**self).stop_all()
    }

    fn release(&mut self) {
        (**self).release()
    }
}

/// Backend used when sound is muted
#[derive(Debug, Default)]
pub struct SilentBackend {
    loaded: usize,
}

impl SoundBackend for SilentBackend {
    fn load(&mut self, _kind: SoundKind, _bytes: Arc<[u8]>) -> Result<ClipId, String> {
        self.loaded += 1;
        Ok(ClipId(self.loaded - 1))
    }

    fn play(&mut self, _clip: ClipId, _repeat: Repeat) {}

    fn pause_all(&mut self) {}

    fn resume_all(&mut self) {}

    fn stop_all(&mut self) {}

    fn release(&mut self) {}
}

/// Asset locations for both clips
#[derive(Debug, Clone)]
pub struct SoundAssets {
    pub ticking: PathBuf,
    pub bell: PathBuf,
}

/// Result of reading one asset from disk
#[derive(Debug)]
pub struct SoundLoaded {
    pub kind: SoundKind,
    pub result: Result<Vec<u8>, String>,
}

/// Owns the clip handles and forwards playback to the backend.
///
/// Every play call on a clip whose handle is absent (not loaded yet, or
/// failed to load) is a no-op. After [`SoundEffects::release`] every call
/// is a no-op.
#[derive(Debug)]
pub struct SoundEffects<B> {
    backend: B,
    ticking: Option<ClipId>,
    bell: Option<ClipId>,
    released: bool,
}

impl<B: SoundBackend> SoundEffects<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            ticking: None,
            bell: None,
            released: false,
        }
    }

    /// Read both assets in the background; each completion is sent to
    /// `loaded_tx` and must be handed back through [`SoundEffects::on_loaded`].
    pub fn load(&self, assets: &SoundAssets, loaded_tx: mpsc::UnboundedSender<SoundLoaded>) {
        spawn_read(SoundKind::Ticking, assets.ticking.clone(), loaded_tx.clone());
        spawn_read(SoundKind::Bell, assets.bell.clone(), loaded_tx);
    }

    /// Register a finished read with the backend
    pub fn on_loaded(&mut self, loaded: SoundLoaded) {
        if self.released {
            debug!("Ignoring {} clip loaded after release", loaded.kind.name());
            return;
        }

        let kind = loaded.kind;
        let handle = loaded.result.and_then(|bytes| {
            if bytes.is_empty() {
                return Err("file is empty".to_string());
            }
            self.backend.load(kind, Arc::from(bytes))
        });

        match handle {
            Ok(clip) => {
                info!("Loaded {} sound", kind.name());
                *self.slot(kind) = Some(clip);
            }
            Err(e) => {
                warn!("Failed to load {} sound, it will stay muted: {}", kind.name(), e);
                *self.slot(kind) = None;
            }
        }
    }

    pub fn handle(&self, kind: SoundKind) -> Option<ClipId> {
        match kind {
            SoundKind::Ticking => self.ticking,
            SoundKind::Bell => self.bell,
        }
    }

    pub fn play_looping(&mut self, kind: SoundKind) {
        self.play(kind, Repeat::Forever);
    }

    pub fn play_once(&mut self, kind: SoundKind) {
        self.play(kind, Repeat::Once);
    }

    pub fn pause_all(&mut self) {
        if !self.released {
            self.backend.pause_all();
        }
    }

    pub fn resume_all(&mut self) {
        if !self.released {
            self.backend.resume_all();
        }
    }

    /// Silence everything so that a later `resume_all` has nothing to restart
    pub fn stop_all(&mut self) {
        if !self.released {
            self.backend.stop_all();
        }
    }

    /// Free all clips; later calls do nothing
    pub fn release(&mut self) {
        if self.released {
            return;
        }
        info!("Releasing sound resources");
        self.backend.release();
        self.ticking = None;
        self.bell = None;
        self.released = true;
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn play(&mut self, kind: SoundKind, repeat: Repeat) {
        if self.released {
            return;
        }
        match self.handle(kind) {
            Some(clip) => self.backend.play(clip, repeat),
            None => debug!("No {} sound loaded, skipping playback", kind.name()),
        }
    }

    fn slot(&mut self, kind: SoundKind) -> &mut Option<ClipId> {
        match kind {
            SoundKind::Ticking => &mut self.ticking,
            SoundKind::Bell => &mut self.bell,
        }
    }
}

fn spawn_read(kind: SoundKind, path: PathBuf, loaded_tx: mpsc::UnboundedSender<SoundLoaded>) {
    tokio::spawn(async move {
        let result = read_clip(&path).await;
        let _ = loaded_tx.send(SoundLoaded { kind, result });
    });
}

async fn read_clip(path: &Path) -> Result<Vec<u8>, String> {
    tokio::fs::read(path)
        .await
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))
}
