/// Flat render-ready projection of [`crate::AppState`]. The presentation
/// layer reads this and nothing else.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub is_uploading: bool,
    /// Name of the file currently being captioned, while uploading.
    pub selected_file: Option<String>,
    pub caption: Option<String>,
    pub error_text: Option<String>,
    pub dirty: bool,
}
