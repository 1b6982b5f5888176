//! Frame rendering.
//!
//! [`Renderer::render`] is a pure function of garden state, time and viewport. It
//! produces a [`Frame`]: draw commands grouped into ordered layers, back to front.

mod command;
mod geometry;
mod heads;
mod layers;

pub use command::*;
pub use geometry::*;
pub use heads::{Channel, ChannelPass, chromatic_passes, head_extent};
pub use layers::STEM_CURVE;

use serde::{Deserialize, Serialize};

use crate::garden::{GardenState, Viewport};
use crate::schema::RenderConfig;

/// Drawing layers, back to front.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Layer {
    Background,
    Grain,
    Stars,
    Grass,
    Stems,
    Heads,
    Fog,
}

impl Layer {
    pub const ALL: [Layer; 7] = [
        Layer::Background,
        Layer::Grain,
        Layer::Stars,
        Layer::Grass,
        Layer::Stems,
        Layer::Heads,
        Layer::Fog,
    ];
}

/// Commands of one layer in draw order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerBatch {
    pub layer: Layer,
    pub commands: Vec<DrawCommand>,
}

/// A rendered frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub time: f64,
    pub viewport: Viewport,
    pub layers: Vec<LayerBatch>,
}

impl Frame {
    pub fn empty(time: f64, viewport: Viewport) -> Self {
        Self {
            time,
            viewport,
            layers: Vec::new(),
        }
    }

    pub fn layer(&self, layer: Layer) -> Option<&LayerBatch> {
        self.layers.iter().find(|b| b.layer == layer)
    }

    /// Total commands including groups and everything nested in them.
    pub fn command_count(&self) -> usize {
        self.layers
            .iter()
            .flat_map(|b| &b.commands)
            .map(DrawCommand::count)
            .sum()
    }

    /// Every primitive (non-group) command in draw order.
    pub fn flatten(&self) -> Vec<&DrawCommand> {
        fn walk<'a>(commands: &'a [DrawCommand], out: &mut Vec<&'a DrawCommand>) {
            for command in commands {
                match command {
                    DrawCommand::Group { commands, .. } => walk(commands, out),
                    primitive => out.push(primitive),
                }
            }
        }
        let mut out = Vec::new();
        for batch in &self.layers {
            walk(&batch.commands, &mut out);
        }
        out
    }
}

/// Everything a layer builder reads.
pub(crate) struct Scene<'a> {
    pub state: &'a GardenState,
    pub config: &'a RenderConfig,
    pub time: f64,
    pub viewport: Viewport,
    /// Baseline y for this viewport.
    pub ground: f32,
}

/// Builds frames from garden state.
#[derive(Debug, Clone)]
pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Render `state` at `time` into `viewport`.
    ///
    /// An invalid viewport yields an empty frame. Hidden layers are omitted.
    pub fn render(&self, state: &GardenState, time: f64, viewport: Viewport) -> Frame {
        let time = if time.is_finite() {
            time
        } else {
            state.current_time()
        };
        if !viewport.is_valid() {
            log::warn!("render skipped for invalid viewport {viewport:?}");
            return Frame::empty(time, viewport);
        }

        let scene = Scene {
            state,
            config: &self.config,
            time,
            viewport,
            ground: state.baseline(viewport),
        };
        let visuals = state.visuals();

        let mut batches = Vec::with_capacity(Layer::ALL.len());
        let mut push = |layer, commands| batches.push(LayerBatch { layer, commands });
        push(Layer::Background, layers::background(&scene));
        push(Layer::Grain, layers::grain(&scene));
        if visuals.show_stars {
            push(Layer::Stars, layers::stars(&scene));
        }
        if visuals.show_grass {
            push(Layer::Grass, layers::grass(&scene));
        }
        push(Layer::Stems, layers::stems(&scene));
        push(Layer::Heads, heads::flower_heads(&scene));
        push(Layer::Fog, layers::fog(&scene));

        let frame = Frame {
            time,
            viewport,
            layers: batches,
        };
        log::trace!("rendered {} commands", frame.command_count());
        frame
    }
}
