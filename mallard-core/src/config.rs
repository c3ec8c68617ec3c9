//! Engine configuration, supplied at construction by the composition root.

/// Window placement and size. `None` position means "let the platform pick".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowConfig {
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderConfig {
    pub accelerated: bool,
    pub vsync: bool,
}

/// Configuration for one engine instance. The engine title is a config
/// value, not a process-wide constant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub title: String,
    pub window: WindowConfig,
    pub render: RenderConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            title: "Mallard Engine".to_string(),
            window: WindowConfig {
                x: None,
                y: None,
                width: 800,
                height: 600,
            },
            render: RenderConfig {
                accelerated: true,
                vsync: false,
            },
        }
    }
}
