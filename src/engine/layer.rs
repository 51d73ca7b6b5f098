//! Paint layers

use serde::Serialize;

use crate::raster::Surface;

/// One raster layer. Layers are kept bottom first.
#[derive(Debug, Clone)]
pub struct Layer {
    id: u32,
    pub name: String,
    pub visible: bool,
    /// Excluded from the sky glow pass
    pub ignore_atmosphere: bool,
    surface: Surface,
}

/// Serializable summary for collaborators
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerInfo {
    pub id: u32,
    pub name: String,
    pub visible: bool,
    pub ignore_atmosphere: bool,
}

impl Layer {
    pub fn new(id: u32, name: impl Into<String>, width: u32, height: u32) -> Self {
        Self::with_surface(id, name, Surface::new(width, height))
    }

    pub fn with_surface(id: u32, name: impl Into<String>, surface: Surface) -> Self {
        Self {
            id,
            name: name.into(),
            visible: true,
            ignore_atmosphere: false,
            surface,
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut Surface {
        &mut self.surface
    }

    pub fn info(&self) -> LayerInfo {
        LayerInfo {
            id: self.id,
            name: self.name.clone(),
            visible: self.visible,
            ignore_atmosphere: self.ignore_atmosphere,
        }
    }
}
