//! Error kinds raised during binding initialisation. Nothing on the render path returns a
//! `Result`: a dropped event there is reported through the boolean FIFO-push contract instead,
//! since allocating or formatting an error value is itself disallowed on the audio thread.

use thiserror::Error;

use super::performer::{EndpointHandle, FrameType};

/// Raised only from binding initialisation, never from the render path.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DispatchError {
    /// An audio endpoint's declared frame type and the caller-requested channel count disagree.
    #[error(
        "endpoint {endpoint:?}: channel count {requested_channels} does not match frame type {frame_type:?}"
    )]
    ChannelCountMismatch {
        endpoint: EndpointHandle,
        frame_type: FrameType,
        requested_channels: u32,
    },

    /// A binding refers to an endpoint name the performer does not declare.
    #[error("no endpoint named '{name}' was found on the performer")]
    UnknownEndpoint { name: String },
}
