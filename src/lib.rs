//! Gouache - bristle brush painting core with wet pigment mixing
//!
//! The crate is UI-agnostic: collaborators drive a [`PaintEngine`] through
//! its methods or the serde [`EngineCommand`] surface, passing a
//! [`PaintSettings`] snapshot with every call.

pub mod brush;
pub mod color;
pub mod commands;
pub mod core;
pub mod engine;
pub mod fill;
pub mod history;
pub mod input;
pub mod noise;
pub mod raster;
pub mod settings;
pub mod sky;
pub mod texture;

pub use commands::{CommandResult, EngineCommand};
pub use crate::core::errors::CoreError;
pub use engine::{EngineConfig, PaintEngine};
pub use settings::PaintSettings;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install the default tracing subscriber.
///
/// `RUST_LOG` overrides the default `gouache=debug` filter. Calling it again
/// after a subscriber is installed does nothing.
pub fn init_logging() {
    let installed = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gouache=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .is_ok();

    if installed {
        tracing::info!("Gouache logging initialized");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_is_repeatable() {
        init_logging();
        init_logging();
    }
}
