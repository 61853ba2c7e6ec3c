// Frame-stepped game session for a host that cannot hold a command list.
//
// The browser delivers input whenever the pointer moves, not in frame-sorted
// batches. `GameSession` buffers input as `SimCommand`s stamped for the next
// frame, applies them on `advance()`, and keeps every emitted `SimEvent`
// until the host drains them. It owns exactly one `SimState` and advances it
// one frame at a time, so ticks never overlap.
//
// See also: `sim_bridge.rs` for the JavaScript-facing wrapper,
// `flood_flock_sim::sim` for `SimState::step()`.

use flood_flock_sim::command::{SimAction, SimCommand};
use flood_flock_sim::config::GameConfig;
use flood_flock_sim::error::SimResult;
use flood_flock_sim::event::SimEvent;
use flood_flock_sim::sim::SimState;
use flood_flock_sim::types::FaceId;

pub struct GameSession {
    sim: SimState,
    pending: Vec<SimCommand>,
    events: Vec<SimEvent>,
}

impl GameSession {
    pub fn new(seed: &str) -> SimResult<Self> {
        Ok(Self::wrap(SimState::new(seed)?))
    }

    pub fn from_config_json(json: &str) -> SimResult<Self> {
        let config = GameConfig::from_json(json)?;
        Ok(Self::wrap(SimState::with_config(config)?))
    }

    fn wrap(sim: SimState) -> Self {
        Self {
            sim,
            pending: Vec::new(),
            events: Vec::new(),
        }
    }

    pub fn sim(&self) -> &SimState {
        &self.sim
    }

    fn queue(&mut self, action: SimAction) {
        self.pending.push(SimCommand {
            frame: self.sim.frame() + 1,
            action,
        });
    }

    pub fn click_face(&mut self, face: u32) {
        self.queue(SimAction::ClickFace { face: FaceId(face) });
    }

    pub fn hover_face(&mut self, face: u32) {
        self.queue(SimAction::HoverFace { face: FaceId(face) });
    }

    pub fn clear_hover(&mut self) {
        self.queue(SimAction::ClearHover);
    }

    /// Run `frames` frames, applying queued input on the first.
    pub fn advance(&mut self, frames: u32) {
        let target = self.sim.frame() + u64::from(frames);
        let commands = std::mem::take(&mut self.pending);
        let result = self.sim.step(&commands, target);
        self.events.extend(result.events);
    }

    /// Take every event emitted since the last drain.
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn pending_events(&self) -> usize {
        self.events.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flood_flock_sim::event::SimEventKind;

    fn small_session() -> GameSession {
        let mut config = GameConfig::default();
        config.mesh.resolution = 12;
        let json = serde_json::to_string(&config).unwrap();
        GameSession::from_config_json(&json).unwrap()
    }

    #[test]
    fn click_applies_on_next_frame() {
        let mut session = small_session();
        let peak = session.sim().mesh().highest_face();
        session.click_face(peak.0);
        assert_eq!(session.sim().flock_point(), None);
        session.advance(1);
        assert_eq!(session.sim().flock_point(), Some(peak));
        assert_eq!(session.sim().frame(), 1);
    }

    #[test]
    fn events_accumulate_until_drained() {
        let mut session = small_session();
        let peak = session.sim().mesh().highest_face();
        session.click_face(peak.0);
        session.advance(1);
        session.advance(3);
        let events = session.drain_events();
        assert!(
            events
                .iter()
                .any(|e| matches!(e.kind, SimEventKind::FlockPointSet { .. }))
        );
        assert_eq!(session.pending_events(), 0);
        assert!(session.drain_events().is_empty());
    }

    #[test]
    fn bad_config_json_is_an_error() {
        assert!(GameSession::from_config_json("{}").is_err());
    }

    #[test]
    fn hover_then_clear() {
        let mut session = small_session();
        session.hover_face(4);
        session.advance(1);
        assert_eq!(session.sim().terrain().highlight(), Some(FaceId(4)));
        session.clear_hover();
        session.advance(1);
        assert_eq!(session.sim().terrain().highlight(), None);
    }
}
