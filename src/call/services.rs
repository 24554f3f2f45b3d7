//! Seams to the hosted services the app delegates to: identity, token
//! issuance, local media devices, and the video-calling service itself.
//! Everything behind these traits is external; the controller only
//! orchestrates.

use async_trait::async_trait;

use crate::models::{Identity, Participant};

/// Failure reported by a hosted-service call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    /// The video service could not be reached (network, WS handshake, DNS).
    #[error("connection failed: {0}")]
    Connectivity(String),

    /// The service answered but refused the operation.
    #[error("request rejected: {0}")]
    Rejected(String),

    #[error("{0}")]
    Other(String),
}

/// Camera acquisition failure, classified by cause.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeviceError {
    #[error("camera permission denied")]
    PermissionDenied,

    /// Another application holds the device.
    #[error("camera is in use")]
    Busy,

    #[error("device error: {0}")]
    Unknown(String),
}

/// Local camera track handed to the session at join time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraTrack {
    pub device_label: String,
}

/// External identity provider. Resolves once the provider has loaded;
/// `None` means no authenticated user. The controller trusts the answer.
#[async_trait]
pub trait IdentityProvider {
    async fn current_user(&self) -> Result<Option<Identity>, ServiceError>;
}

/// Fetches a video-service credential for a user id.
#[async_trait]
pub trait TokenProvider {
    async fn fetch_token(&self, user_id: &str) -> Result<String, ServiceError>;
}

/// Local media device access. The browser/OS arbitrates the hardware; this
/// only requests and releases it.
#[async_trait]
pub trait MediaDevices {
    async fn acquire_camera(&self) -> Result<CameraTrack, DeviceError>;
}

/// Hosted video service entry point: a credential plus an identity buys an
/// established session.
#[async_trait]
pub trait VideoService {
    type Session: CallSession;

    async fn connect(
        &self,
        identity: &Identity,
        token: &str,
    ) -> Result<Self::Session, ServiceError>;
}

/// An established session with the hosted video service.
#[async_trait]
pub trait CallSession {
    /// Join `room_id`, creating the room on the service if it does not
    /// already exist.
    async fn join(
        &mut self,
        room_id: &str,
        camera: Option<CameraTrack>,
    ) -> Result<(), ServiceError>;

    async fn leave(&mut self) -> Result<(), ServiceError>;

    async fn disconnect(&mut self) -> Result<(), ServiceError>;

    async fn set_microphone_enabled(&mut self, enabled: bool) -> Result<(), ServiceError>;

    async fn set_camera_enabled(&mut self, enabled: bool) -> Result<(), ServiceError>;

    async fn set_screen_sharing(&mut self, enabled: bool) -> Result<(), ServiceError>;

    /// Participant list as currently published by the service.
    fn participants(&self) -> Vec<Participant>;
}
