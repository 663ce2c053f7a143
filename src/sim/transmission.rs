//! Rotation transmission
//!
//! A [`RotationSource`] fans a [`Rotation`] out to the sinks linked to it, in
//! the order they were linked. Sinks and sources refer to their owners by
//! [`ComponentId`]; the machine resolves ids to components when it delivers.

use serde::Serialize;

use super::component::ComponentId;

/// One rotation command: absolute angle in turns and speed in turns per
/// second
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Rotation {
    pub angle: f32,
    pub speed: f32,
}

impl Rotation {
    pub fn new(angle: f32, speed: f32) -> Self {
        Self { angle, speed }
    }
}

/// Driving end of a transmission link
#[derive(Debug, Clone, Default)]
pub struct RotationSource {
    owner: Option<ComponentId>,
    sinks: Vec<ComponentId>,
}

impl RotationSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn owner(&self) -> Option<ComponentId> {
        self.owner
    }

    pub(crate) fn set_owner(&mut self, owner: ComponentId) {
        self.owner = Some(owner);
    }

    /// Link `sink` to this source. The sink is appended after any existing
    /// sinks and remembers this source as its driver. A sink that belongs to
    /// no component is left unlinked.
    pub fn add_sink(&mut self, sink: &mut RotationSink) {
        let Some(owner) = sink.owner() else {
            log::warn!("Sink with no owner not linked to source {:?}", self.owner);
            return;
        };
        self.sinks.push(owner);
        sink.source = self.owner;
    }

    /// Linked sink owners, in link order
    pub fn sinks(&self) -> &[ComponentId] {
        &self.sinks
    }

    /// Deliver `rotation` to every sink, in link order
    pub fn rotate(&self, rotation: Rotation, mut deliver: impl FnMut(ComponentId, Rotation)) {
        for &sink in &self.sinks {
            deliver(sink, rotation);
        }
    }
}

/// Driven end of a transmission link
#[derive(Debug, Clone, Copy, Default)]
pub struct RotationSink {
    owner: Option<ComponentId>,
    source: Option<ComponentId>,
}

impl RotationSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn owner(&self) -> Option<ComponentId> {
        self.owner
    }

    pub(crate) fn set_owner(&mut self, owner: ComponentId) {
        self.owner = Some(owner);
    }

    /// Owner of the source driving this sink
    pub fn source(&self) -> Option<ComponentId> {
        self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sink(id: usize) -> RotationSink {
        let mut sink = RotationSink::new();
        sink.set_owner(ComponentId(id));
        sink
    }

    #[test]
    fn test_fan_out_in_link_order() {
        let mut source = RotationSource::new();
        source.set_owner(ComponentId(0));
        let mut a = sink(3);
        let mut b = sink(1);
        let mut c = sink(2);
        source.add_sink(&mut a);
        source.add_sink(&mut b);
        source.add_sink(&mut c);

        let mut delivered = Vec::new();
        source.rotate(Rotation::new(0.5, 2.0), |id, r| delivered.push((id, r)));
        assert_eq!(
            delivered,
            vec![
                (ComponentId(3), Rotation::new(0.5, 2.0)),
                (ComponentId(1), Rotation::new(0.5, 2.0)),
                (ComponentId(2), Rotation::new(0.5, 2.0)),
            ]
        );
    }

    #[test]
    fn test_add_sink_back_links_source() {
        let mut source = RotationSource::new();
        source.set_owner(ComponentId(7));
        let mut driven = sink(8);
        assert_eq!(driven.source(), None);
        source.add_sink(&mut driven);
        assert_eq!(driven.source(), Some(ComponentId(7)));
        assert_eq!(source.sinks(), &[ComponentId(8)]);
    }

    #[test]
    fn test_unowned_sink_stays_unlinked() {
        let mut source = RotationSource::new();
        source.set_owner(ComponentId(7));
        let mut stray = RotationSink::new();
        source.add_sink(&mut stray);
        assert_eq!(stray.source(), None);
        assert!(source.sinks().is_empty());
    }

    #[test]
    fn test_source_without_sinks_is_silent() {
        let source = RotationSource::new();
        let mut calls = 0;
        source.rotate(Rotation::new(1.0, 1.0), |_, _| calls += 1);
        assert_eq!(calls, 0);
    }
}
