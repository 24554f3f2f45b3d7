pub mod controller;
pub mod services;
pub mod token_provider;

pub use controller::{
    CallController, CallError, CallOptions, CallPhase, LocalMedia, MediaWarning,
};
pub use services::{
    CallSession, CameraTrack, DeviceError, IdentityProvider, MediaDevices, ServiceError,
    TokenProvider, VideoService,
};
pub use token_provider::{HttpTokenProvider, IssuerTokenProvider};
