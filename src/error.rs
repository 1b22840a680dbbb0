//! Backdrop errors
//!
//! Only setup can fail. Per-frame problems are logged and the frame is skipped.

pub type BackdropResult<T> = Result<T, BackdropError>;

#[derive(thiserror::Error, Debug)]
pub enum BackdropError {
    #[error("invalid color: {0}")]
    InvalidColor(String),

    #[error("invalid zone: {0}")]
    InvalidZone(String),

    #[error("settings error: {0}")]
    Settings(#[from] serde_json::Error),

    #[error("mount error: {0}")]
    Mount(String),

    #[error(transparent)]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error(transparent)]
    RequestAdapter(#[from] wgpu::RequestAdapterError),

    #[error(transparent)]
    RequestDevice(#[from] wgpu::RequestDeviceError),
}

impl BackdropError {
    pub fn invalid_color(msg: impl Into<String>) -> Self {
        Self::InvalidColor(msg.into())
    }

    pub fn invalid_zone(msg: impl Into<String>) -> Self {
        Self::InvalidZone(msg.into())
    }

    pub fn mount(msg: impl Into<String>) -> Self {
        Self::Mount(msg.into())
    }
}
