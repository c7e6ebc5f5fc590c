#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Issue exactly one upload call for `image`, tagged with `request`.
    SubmitImage {
        request: crate::RequestId,
        image: crate::ImageFile,
    },
}
