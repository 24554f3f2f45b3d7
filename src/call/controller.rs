//! Call session lifecycle: resolve identity, fetch a credential, connect to
//! the hosted video service, join the room, mirror media state, tear down.

use std::time::Duration;

use tokio::time::{sleep, timeout};
use uuid::Uuid;

use crate::call::services::{
    CallSession, CameraTrack, DeviceError, IdentityProvider, MediaDevices, ServiceError,
    TokenProvider, VideoService,
};
use crate::models::{dedup_by_user, Identity, Participant};

/// Lifecycle of one rendered meeting view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallPhase {
    Uninitialized,
    AwaitingIdentity,
    RequestingToken,
    Connecting,
    JoiningRoom,
    Active,
    Left,
    Errored(CallError),
}

/// Terminal, user-facing call failure. Recovery is reconnect, not resume.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CallError {
    #[error("User not authenticated")]
    NotAuthenticated,

    /// The video service stayed unreachable through every attempt.
    #[error("Failed to connect to video servers. Check your network connection.")]
    VideoServersUnreachable,

    #[error("Failed to initialize meeting: {0}")]
    InitFailed(String),

    #[error("Call already in progress")]
    AlreadyActive,

    #[error("No active call session")]
    NotActive,

    #[error("Call operation failed: {0}")]
    SessionFailed(String),
}

/// Non-terminal media problem surfaced to the user while the call proceeds.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MediaWarning {
    #[error("Camera access was denied. Check browser permissions.")]
    CameraPermissionDenied,

    #[error("Camera unavailable: {0}")]
    CameraUnavailable(String),
}

/// Local media toggle state mirrored from the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LocalMedia {
    pub microphone_enabled: bool,
    pub camera_enabled: bool,
    pub screen_sharing: bool,
}

/// Connect policy: a fixed small attempt budget with a fixed delay, and a
/// short camera-acquisition budget.
#[derive(Debug, Clone)]
pub struct CallOptions {
    pub connect_attempts: u32,
    pub retry_delay: Duration,
    pub camera_timeout: Duration,
}

impl Default for CallOptions {
    fn default() -> Self {
        Self {
            connect_attempts: 3,
            retry_delay: Duration::from_secs(2),
            camera_timeout: Duration::from_secs(1),
        }
    }
}

/// Orchestrates one call session over the external services. Owns the
/// session handle for its lifetime; teardown always runs leave then
/// disconnect.
pub struct CallController<I, T, D, V>
where
    V: VideoService,
{
    identity: I,
    tokens: T,
    devices: D,
    video: V,
    options: CallOptions,

    phase: CallPhase,
    session: Option<V::Session>,
    local: LocalMedia,
    media_warning: Option<MediaWarning>,
}

impl<I, T, D, V> CallController<I, T, D, V>
where
    I: IdentityProvider,
    T: TokenProvider,
    D: MediaDevices,
    V: VideoService,
{
    pub fn new(identity: I, tokens: T, devices: D, video: V) -> Self {
        Self::with_options(identity, tokens, devices, video, CallOptions::default())
    }

    pub fn with_options(
        identity: I,
        tokens: T,
        devices: D,
        video: V,
        options: CallOptions,
    ) -> Self {
        Self {
            identity,
            tokens,
            devices,
            video,
            options,
            phase: CallPhase::Uninitialized,
            session: None,
            local: LocalMedia::default(),
            media_warning: None,
        }
    }

    pub fn phase(&self) -> &CallPhase {
        &self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase == CallPhase::Active
    }

    pub fn local_media(&self) -> LocalMedia {
        self.local
    }

    pub fn media_warning(&self) -> Option<&MediaWarning> {
        self.media_warning.as_ref()
    }

    /// Deduplicated participant tiles: one per user, newest session wins.
    pub fn participants(&self) -> Vec<Participant> {
        match &self.session {
            Some(session) => dedup_by_user(&session.participants()),
            None => Vec::new(),
        }
    }

    /// Run the full connect sequence and join `room_id`.
    ///
    /// Token request, service connect and room join form one sequence that
    /// is retried as a whole on failure, with a fixed delay between
    /// attempts. Camera acquisition runs once up front; its failures never
    /// abort the call.
    pub async fn connect(&mut self, room_id: &str) -> Result<(), CallError> {
        match self.phase {
            CallPhase::Uninitialized | CallPhase::Left | CallPhase::Errored(_) => {}
            _ => return Err(CallError::AlreadyActive),
        }

        let conn_id = Uuid::new_v4();
        self.local = LocalMedia::default();
        self.media_warning = None;

        self.phase = CallPhase::AwaitingIdentity;
        let user = match self.identity.current_user().await {
            Ok(Some(user)) => user,
            Ok(None) => return self.fail(CallError::NotAuthenticated),
            Err(e) => return self.fail(CallError::InitFailed(e.to_string())),
        };

        tracing::info!(
            conn_id = %conn_id,
            user_id = %user.id,
            room_id = %room_id,
            "Starting call session"
        );

        let camera = self.acquire_camera().await;

        let mut last_error: Option<ServiceError> = None;
        for attempt in 1..=self.options.connect_attempts {
            if attempt > 1 {
                sleep(self.options.retry_delay).await;
            }

            match self.try_connect(&user, room_id, camera.clone()).await {
                Ok(session) => {
                    self.session = Some(session);
                    self.local.microphone_enabled = true;
                    self.local.camera_enabled = camera.is_some();
                    self.phase = CallPhase::Active;
                    tracing::info!(conn_id = %conn_id, attempt, "Call joined");
                    return Ok(());
                }
                Err(e) => {
                    tracing::warn!(
                        conn_id = %conn_id,
                        attempt,
                        max_attempts = self.options.connect_attempts,
                        error = %e,
                        "Connect attempt failed"
                    );
                    last_error = Some(e);
                }
            }
        }

        let error = match last_error {
            Some(ServiceError::Connectivity(_)) => CallError::VideoServersUnreachable,
            Some(e) => CallError::InitFailed(e.to_string()),
            None => CallError::InitFailed("connect never attempted".to_string()),
        };
        self.fail(error)
    }

    /// One pass through token / connect / join. A session that connected
    /// but failed to join is released before the error is reported.
    async fn try_connect(
        &mut self,
        user: &Identity,
        room_id: &str,
        camera: Option<CameraTrack>,
    ) -> Result<V::Session, ServiceError> {
        self.phase = CallPhase::RequestingToken;
        let token = self.tokens.fetch_token(&user.id).await?;

        self.phase = CallPhase::Connecting;
        let mut session = self.video.connect(user, &token).await?;

        self.phase = CallPhase::JoiningRoom;
        if let Err(e) = session.join(room_id, camera).await {
            teardown(&mut session).await;
            return Err(e);
        }

        Ok(session)
    }

    /// Camera acquisition with a short budget. Busy devices and timeouts
    /// degrade silently; denied and unknown failures surface a warning.
    /// The call joins without video in every failure case.
    async fn acquire_camera(&mut self) -> Option<CameraTrack> {
        match timeout(self.options.camera_timeout, self.devices.acquire_camera()).await {
            Ok(Ok(track)) => Some(track),
            Ok(Err(DeviceError::Busy)) | Err(_) => {
                tracing::debug!("Camera busy or slow to acquire, joining without video");
                None
            }
            Ok(Err(DeviceError::PermissionDenied)) => {
                self.media_warning = Some(MediaWarning::CameraPermissionDenied);
                None
            }
            Ok(Err(DeviceError::Unknown(msg))) => {
                self.media_warning = Some(MediaWarning::CameraUnavailable(msg));
                None
            }
        }
    }

    pub async fn toggle_microphone(&mut self) -> Result<(), CallError> {
        let enabled = !self.local.microphone_enabled;
        self.active_session()?
            .set_microphone_enabled(enabled)
            .await
            .map_err(|e| CallError::SessionFailed(e.to_string()))?;
        self.local.microphone_enabled = enabled;
        Ok(())
    }

    pub async fn toggle_camera(&mut self) -> Result<(), CallError> {
        let enabled = !self.local.camera_enabled;
        self.active_session()?
            .set_camera_enabled(enabled)
            .await
            .map_err(|e| CallError::SessionFailed(e.to_string()))?;
        self.local.camera_enabled = enabled;
        Ok(())
    }

    pub async fn toggle_screen_share(&mut self) -> Result<(), CallError> {
        let enabled = !self.local.screen_sharing;
        self.active_session()?
            .set_screen_sharing(enabled)
            .await
            .map_err(|e| CallError::SessionFailed(e.to_string()))?;
        self.local.screen_sharing = enabled;
        Ok(())
    }

    /// Leave the room and disconnect, in that order, tolerating failure in
    /// either. Safe to call from any phase; idempotent. An errored phase
    /// stays errored so the view keeps showing the recovery action.
    pub async fn leave(&mut self) {
        if let Some(mut session) = self.session.take() {
            teardown(&mut session).await;
        }

        self.local = LocalMedia::default();
        if !matches!(self.phase, CallPhase::Errored(_)) {
            self.phase = CallPhase::Left;
        }
    }

    fn fail(&mut self, error: CallError) -> Result<(), CallError> {
        self.phase = CallPhase::Errored(error.clone());
        Err(error)
    }

    fn active_session(&mut self) -> Result<&mut V::Session, CallError> {
        if self.phase != CallPhase::Active {
            return Err(CallError::NotActive);
        }
        self.session.as_mut().ok_or(CallError::NotActive)
    }
}

/// Leave then disconnect, logging failures instead of propagating them.
async fn teardown<S: CallSession>(session: &mut S) {
    if let Err(e) = session.leave().await {
        tracing::warn!(error = %e, "Error leaving call");
    }
    if let Err(e) = session.disconnect().await {
        tracing::warn!(error = %e, "Error disconnecting client");
    }
}
