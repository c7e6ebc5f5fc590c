#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User picked an image for captioning.
    ImageSelected(crate::ImageFile),
    /// The upload call tagged with `request` resolved.
    UploadFinished {
        request: crate::RequestId,
        result: Result<String, crate::UploadError>,
    },
    /// Fallback for placeholder wiring.
    NoOp,
}
