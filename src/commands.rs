//! Command surface - serde-tagged operations for UI collaborators
//!
//! A collaborator sends one `EngineCommand` per operation together with the
//! current `PaintSettings` snapshot and gets a `CommandResult` back.

use serde::{Deserialize, Serialize};

use crate::color::Rgb;
use crate::core::errors::CoreError;
use crate::engine::{LayerInfo, PaintEngine};
use crate::fill::GradientVector;
use crate::input::InputSample;
use crate::raster::Rect;
use crate::settings::PaintSettings;

/// Largest canvas edge accepted through the command surface
pub const MAX_CANVAS_EDGE: u32 = 16384;

fn default_pressure() -> f32 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum EngineCommand {
    Resize {
        width: u32,
        height: u32,
    },
    StartStroke {
        x: f32,
        y: f32,
        #[serde(default = "default_pressure")]
        pressure: f32,
        #[serde(default)]
        tilt_x: f32,
        #[serde(default)]
        tilt_y: f32,
    },
    DrawBatch {
        points: Vec<InputSample>,
    },
    EndStroke,
    DrawLasso {
        points: Vec<(f32, f32)>,
    },
    DrawLassoFill {
        points: Vec<(f32, f32)>,
    },
    DrawRectLassoFill {
        x0: f32,
        y0: f32,
        x1: f32,
        y1: f32,
    },
    DrawGradBlendLasso {
        points: Vec<(f32, f32)>,
        gradient: GradientVector,
    },
    DrawStippleLasso {
        points: Vec<(f32, f32)>,
    },
    DrawPatternLasso {
        points: Vec<(f32, f32)>,
    },
    DrawPatternLine {
        points: Vec<(f32, f32)>,
    },
    CapturePattern {
        rect: Rect,
    },
    ClearMask,
    InvertMask,
    AddLayer,
    RemoveLayer {
        id: u32,
    },
    SetActiveLayer {
        id: u32,
    },
    ToggleLayerVisibility {
        id: u32,
    },
    ToggleLayerGlow {
        id: u32,
    },
    Undo,
    Redo,
    PickColor {
        x: i32,
        y: i32,
    },
    Describe,
}

impl EngineCommand {
    /// Parse one command from JSON
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let command: EngineCommand = serde_json::from_str(json)?;
        if let EngineCommand::Resize { width, height } = command {
            if width > MAX_CANVAS_EDGE || height > MAX_CANVAS_EDGE {
                return Err(CoreError::InvalidInput(format!(
                    "canvas {}x{} exceeds {} pixels",
                    width, height, MAX_CANVAS_EDGE
                )));
            }
        }
        Ok(command)
    }
}

/// Engine state summary for diagnostics
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineInfo {
    pub width: u32,
    pub height: u32,
    pub active_layer: u32,
    pub layers: Vec<LayerInfo>,
    pub can_undo: bool,
    pub can_redo: bool,
    pub history_bytes: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum CommandResult {
    Done,
    /// Canvas region that changed; empty when nothing did
    Dirty { rect: Rect },
    Layer { id: u32 },
    /// Outcome of a refusable or toggling operation
    Flag { value: bool },
    Color { color: Option<Rgb> },
    Pattern {
        width: u32,
        height: u32,
        content_hash: String,
    },
    NoPattern,
    Info(EngineInfo),
}

impl PaintEngine {
    /// Run one command against the engine
    pub fn dispatch(&mut self, command: EngineCommand, settings: &PaintSettings) -> CommandResult {
        tracing::trace!("Dispatch {:?}", command);
        match command {
            EngineCommand::Resize { width, height } => {
                self.resize(width, height);
                CommandResult::Done
            }
            EngineCommand::StartStroke {
                x,
                y,
                pressure,
                tilt_x,
                tilt_y,
            } => {
                self.start_stroke(InputSample::with_tilt(x, y, pressure, tilt_x, tilt_y), settings);
                CommandResult::Done
            }
            EngineCommand::DrawBatch { points } => {
                let samples: Vec<InputSample> = points
                    .iter()
                    .map(|p| InputSample::with_tilt(p.x, p.y, p.pressure, p.tilt_x, p.tilt_y))
                    .collect();
                CommandResult::Dirty {
                    rect: self.draw_batch(&samples, settings),
                }
            }
            EngineCommand::EndStroke => {
                self.end_stroke();
                CommandResult::Done
            }
            EngineCommand::DrawLasso { points } => CommandResult::Dirty {
                rect: self.draw_lasso(&points),
            },
            EngineCommand::DrawLassoFill { points } => CommandResult::Dirty {
                rect: self.draw_lasso_fill(&points, settings),
            },
            EngineCommand::DrawRectLassoFill { x0, y0, x1, y1 } => CommandResult::Dirty {
                rect: self.draw_rect_lasso_fill(x0, y0, x1, y1, settings),
            },
            EngineCommand::DrawGradBlendLasso { points, gradient } => CommandResult::Dirty {
                rect: self.draw_grad_blend_lasso(&points, gradient, settings),
            },
            EngineCommand::DrawStippleLasso { points } => CommandResult::Dirty {
                rect: self.draw_stipple_lasso(&points, settings),
            },
            EngineCommand::DrawPatternLasso { points } => CommandResult::Dirty {
                rect: self.draw_pattern_lasso(&points, settings),
            },
            EngineCommand::DrawPatternLine { points } => CommandResult::Dirty {
                rect: self.draw_pattern_line(&points, settings),
            },
            EngineCommand::CapturePattern { rect } => match self.capture_pattern(rect) {
                Some(p) => CommandResult::Pattern {
                    width: p.width(),
                    height: p.height(),
                    content_hash: p.content_hash().to_string(),
                },
                None => CommandResult::NoPattern,
            },
            EngineCommand::ClearMask => {
                self.clear_mask();
                CommandResult::Done
            }
            EngineCommand::InvertMask => {
                self.invert_mask();
                CommandResult::Done
            }
            EngineCommand::AddLayer => CommandResult::Layer { id: self.add_layer() },
            EngineCommand::RemoveLayer { id } => CommandResult::Flag {
                value: self.remove_layer(id),
            },
            EngineCommand::SetActiveLayer { id } => CommandResult::Flag {
                value: self.set_active_layer(id),
            },
            EngineCommand::ToggleLayerVisibility { id } => match self.toggle_layer_visibility(id) {
                Some(value) => CommandResult::Flag { value },
                None => CommandResult::Done,
            },
            EngineCommand::ToggleLayerGlow { id } => match self.toggle_layer_glow(id) {
                Some(value) => CommandResult::Flag { value },
                None => CommandResult::Done,
            },
            EngineCommand::Undo => CommandResult::Flag { value: self.undo() },
            EngineCommand::Redo => CommandResult::Flag { value: self.redo() },
            EngineCommand::PickColor { x, y } => CommandResult::Color {
                color: self.pick_color(x, y, settings),
            },
            EngineCommand::Describe => CommandResult::Info(self.describe()),
        }
    }

    pub fn describe(&self) -> EngineInfo {
        EngineInfo {
            width: self.width(),
            height: self.height(),
            active_layer: self.active_layer_id(),
            layers: self.layers().iter().map(|l| l.info()).collect(),
            can_undo: self.history().can_undo(),
            can_redo: self.history().can_redo(),
            history_bytes: self.history().total_bytes(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EngineConfig;

    fn engine() -> PaintEngine {
        PaintEngine::new(64, 64, EngineConfig::default())
    }

    #[test]
    fn test_parse_commands() {
        let cmd = EngineCommand::from_json(r#"{"op":"startStroke","x":1.5,"y":2.0,"tiltX":10}"#).unwrap();
        assert_eq!(
            cmd,
            EngineCommand::StartStroke {
                x: 1.5,
                y: 2.0,
                pressure: 1.0,
                tilt_x: 10.0,
                tilt_y: 0.0
            }
        );

        let cmd = EngineCommand::from_json(r#"{"op":"drawLassoFill","points":[[0,0],[10,0],[5,8]]}"#).unwrap();
        assert_eq!(
            cmd,
            EngineCommand::DrawLassoFill {
                points: vec![(0.0, 0.0), (10.0, 0.0), (5.0, 8.0)]
            }
        );

        assert_eq!(EngineCommand::from_json(r#"{"op":"undo"}"#).unwrap(), EngineCommand::Undo);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(matches!(
            EngineCommand::from_json(r#"{"op":"paintEverything"}"#),
            Err(CoreError::Settings(_))
        ));
        assert!(matches!(
            EngineCommand::from_json(r#"{"op":"resize","width":20000,"height":10}"#),
            Err(CoreError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_dispatch_fill_and_undo() {
        let mut engine = engine();
        let settings = PaintSettings::default();
        let result = engine.dispatch(
            EngineCommand::DrawRectLassoFill {
                x0: 0.0,
                y0: 0.0,
                x1: 10.0,
                y1: 10.0,
            },
            &settings,
        );
        assert_eq!(result, CommandResult::Dirty { rect: Rect::new(0, 0, 10, 10) });
        assert_eq!(
            engine.dispatch(EngineCommand::PickColor { x: 5, y: 5 }, &settings),
            CommandResult::Color {
                color: Some(Rgb::BLACK)
            }
        );
        assert_eq!(engine.dispatch(EngineCommand::Undo, &settings), CommandResult::Flag { value: true });
        assert_eq!(engine.dispatch(EngineCommand::Undo, &settings), CommandResult::Flag { value: false });
    }

    #[test]
    fn test_dispatch_layers() {
        let mut engine = engine();
        let settings = PaintSettings::default();
        assert_eq!(
            engine.dispatch(EngineCommand::RemoveLayer { id: 1 }, &settings),
            CommandResult::Flag { value: false }
        );
        assert_eq!(engine.dispatch(EngineCommand::AddLayer, &settings), CommandResult::Layer { id: 2 });

        let CommandResult::Info(info) = engine.dispatch(EngineCommand::Describe, &settings) else {
            panic!("describe must return info");
        };
        assert_eq!(info.layers.len(), 2);
        assert_eq!(info.active_layer, 2);
        assert!(!info.can_undo);
    }

    #[test]
    fn test_dispatch_capture_without_content() {
        let mut engine = engine();
        let result = engine.dispatch(
            EngineCommand::CapturePattern {
                rect: Rect::new(0, 0, 8, 8),
            },
            &PaintSettings::default(),
        );
        assert_eq!(result, CommandResult::NoPattern);
    }

    #[test]
    fn test_result_serializes_tagged() {
        let json = serde_json::to_string(&CommandResult::Flag { value: true }).unwrap();
        assert_eq!(json, r#"{"kind":"flag","value":true}"#);
    }
}
