//! Gated cue registry
//!
//! No cue handle exists until the first user interaction. The granting call
//! constructs every handle, preloads it, and primes it: the cue starts at
//! level 0 and, once `priming_delay` has passed, is stopped and its
//! configured level restored. Later grants are no-ops.
//!
//! Play requests rewind and restart their cue; the newest request wins.
//! Engine failures are logged and swallowed and never touch the gate.

use crate::media::{CueCatalog, CueHandle, CueId, MediaEngine};
use std::time::{Duration, Instant};
use tracing::{debug, info, trace, warn};

/// Interaction gate plus the handles it unlocked
#[derive(Debug, Clone, Default)]
pub struct MediaGateState {
    interaction_granted: bool,
    hover_cue: Option<CueHandle>,
    launch_cue: Option<CueHandle>,
    /// One slot per icon position; `None` where the binding names no cue
    icon_cues: Vec<Option<CueHandle>>,
}

impl MediaGateState {
    pub fn interaction_granted(&self) -> bool {
        self.interaction_granted
    }

    pub fn hover_cue(&self) -> Option<&CueHandle> {
        self.hover_cue.as_ref()
    }

    pub fn launch_cue(&self) -> Option<&CueHandle> {
        self.launch_cue.as_ref()
    }

    /// Indexed by icon position
    pub fn icon_cues(&self) -> &[Option<CueHandle>] {
        &self.icon_cues
    }

    pub fn icon_cue(&self, position: usize) -> Option<&CueHandle> {
        self.icon_cues.get(position).and_then(Option::as_ref)
    }

    fn handle(&self, cue: CueId) -> Option<&CueHandle> {
        match cue {
            CueId::Hover => self.hover_cue.as_ref(),
            CueId::Launch => self.launch_cue.as_ref(),
            CueId::Icon(position) => self.icon_cue(position),
        }
    }

    fn handles(&self) -> impl Iterator<Item = &CueHandle> {
        self.hover_cue
            .iter()
            .chain(self.launch_cue.iter())
            .chain(self.icon_cues.iter().flatten())
    }
}

#[derive(Debug, Clone, Copy)]
struct PendingPrime {
    cue: CueId,
    deadline: Instant,
}

/// Owner of the media gate and the engine
pub struct CueRegistry {
    engine: Box<dyn MediaEngine>,
    cues: CueCatalog,
    /// Cue index for each icon position
    icon_bindings: Vec<usize>,
    gate: MediaGateState,
    priming_delay: Duration,
    priming: Vec<PendingPrime>,
    priming_passes: usize,
}

impl CueRegistry {
    pub fn new(
        engine: Box<dyn MediaEngine>,
        cues: CueCatalog,
        icon_bindings: Vec<usize>,
        priming_delay: Duration,
    ) -> Self {
        Self {
            engine,
            cues,
            icon_bindings,
            gate: MediaGateState::default(),
            priming_delay,
            priming: Vec::new(),
            priming_passes: 0,
        }
    }

    /// Unlock audio. Only the first call does anything; it returns `true`.
    pub fn grant_interaction(&mut self, now: Instant) -> bool {
        if self.gate.interaction_granted {
            return false;
        }
        self.gate.interaction_granted = true;

        self.gate.hover_cue = Some(CueHandle {
            id: CueId::Hover,
            source: self.cues.hover.file.clone(),
            volume: self.cues.hover.volume,
        });
        self.gate.launch_cue = Some(CueHandle {
            id: CueId::Launch,
            source: self.cues.launch.file.clone(),
            volume: self.cues.launch.volume,
        });
        let cues = &self.cues;
        self.gate.icon_cues = self
            .icon_bindings
            .iter()
            .enumerate()
            .map(|(position, &binding)| {
                let handle = cues.icons.get(binding).map(|spec| CueHandle {
                    id: CueId::Icon(position),
                    source: spec.file.clone(),
                    volume: spec.volume,
                });
                if handle.is_none() {
                    warn!("Icon {} is bound to missing cue {}", position, binding);
                }
                handle
            })
            .collect();

        let handles: Vec<CueHandle> = self.gate.handles().cloned().collect();
        for handle in &handles {
            self.preload_and_prime(handle, now);
        }
        self.priming_passes += 1;

        info!(
            "Interaction granted: {} cues constructed, {} priming",
            handles.len(),
            self.priming.len()
        );
        true
    }

    fn preload_and_prime(&mut self, handle: &CueHandle, now: Instant) {
        if let Err(e) = self.engine.preload(handle) {
            warn!("Cue {} preload failed ({}): {}", handle.id, handle.source.display(), e);
            return;
        }
        if let Err(e) = self.engine.set_volume(handle.id, 0.0) {
            warn!("Cue {} could not be muted for priming: {}", handle.id, e);
            return;
        }
        match self.engine.play_from_start(handle.id) {
            Ok(()) => self.priming.push(PendingPrime {
                cue: handle.id,
                deadline: now + self.priming_delay,
            }),
            Err(e) => {
                warn!("Cue {} priming playback rejected: {}", handle.id, e);
                self.restore_level(handle.id, handle.volume);
            }
        }
    }

    fn restore_level(&mut self, cue: CueId, volume: f32) {
        if let Err(e) = self.engine.set_volume(cue, volume) {
            warn!("Cue {} level restore failed: {}", cue, e);
        }
    }

    fn finish_priming(&mut self, cue: CueId) {
        self.priming.retain(|pending| pending.cue != cue);
        let Some(volume) = self.gate.handle(cue).map(|h| h.volume) else {
            return;
        };
        if let Err(e) = self.engine.stop(cue) {
            warn!("Cue {} priming stop failed: {}", cue, e);
        }
        self.restore_level(cue, volume);
        trace!("Cue {} primed", cue);
    }

    /// Complete priming passes whose delay has elapsed. Returns how many.
    pub fn poll(&mut self, now: Instant) -> usize {
        let due: Vec<CueId> = self
            .priming
            .iter()
            .filter(|pending| pending.deadline <= now)
            .map(|pending| pending.cue)
            .collect();
        for cue in &due {
            self.finish_priming(*cue);
        }
        due.len()
    }

    /// Earliest pending priming deadline
    pub fn next_deadline(&self) -> Option<Instant> {
        self.priming.iter().map(|pending| pending.deadline).min()
    }

    pub fn play_hover(&mut self) {
        self.play(CueId::Hover);
    }

    /// Play the cue bound to icon `position`; unbound positions do nothing
    pub fn play_icon_cue(&mut self, position: usize) {
        self.play(CueId::Icon(position));
    }

    pub fn play_launch_cue(&mut self) {
        self.play(CueId::Launch);
    }

    fn play(&mut self, cue: CueId) {
        if !self.gate.interaction_granted {
            trace!("Cue {} dropped: interaction not granted", cue);
            return;
        }
        if self.gate.handle(cue).is_none() {
            trace!("Cue {} has no handle", cue);
            return;
        }
        // The first audible play must not inherit the priming mute
        if self.is_priming(cue) {
            self.finish_priming(cue);
        }
        match self.engine.play_from_start(cue) {
            Ok(()) => debug!("Cue {} playing", cue),
            Err(e) => warn!("Cue {} playback rejected: {}", cue, e),
        }
    }

    /// Stop every cue, completing any priming still in progress
    pub fn stop_all(&mut self) {
        let pending: Vec<CueId> = self.priming.iter().map(|p| p.cue).collect();
        for cue in pending {
            self.finish_priming(cue);
        }
        let ids: Vec<CueId> = self.gate.handles().map(|h| h.id).collect();
        for cue in ids {
            if let Err(e) = self.engine.stop(cue) {
                warn!("Cue {} stop failed: {}", cue, e);
            }
        }
    }

    pub fn is_granted(&self) -> bool {
        self.gate.interaction_granted
    }

    pub fn is_priming(&self, cue: CueId) -> bool {
        self.priming.iter().any(|pending| pending.cue == cue)
    }

    /// Number of priming passes run; never more than one
    pub fn priming_passes(&self) -> usize {
        self.priming_passes
    }

    pub fn gate(&self) -> &MediaGateState {
        &self.gate
    }
}
