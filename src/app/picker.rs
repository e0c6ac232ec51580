use rfd::FileDialog;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "gif", "webp"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
}

/// An asset returned by the picker. `uri` is a file path or a `data:` URI.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PickedAsset {
    pub uri: String,
}

pub trait ImagePicker {
    fn request_permission(&mut self) -> PermissionStatus;

    /// Empty when the user cancelled.
    fn pick(&mut self) -> Vec<PickedAsset>;
}

/// Native file dialog. Desktop file access needs no runtime permission.
#[derive(Default)]
pub struct DialogImagePicker;

impl ImagePicker for DialogImagePicker {
    fn request_permission(&mut self) -> PermissionStatus {
        PermissionStatus::Granted
    }

    fn pick(&mut self) -> Vec<PickedAsset> {
        FileDialog::new()
            .set_title("Pick Image")
            .add_filter("Images", IMAGE_EXTENSIONS)
            .pick_file()
            .map(|path| PickedAsset {
                uri: path.to_string_lossy().to_string(),
            })
            .into_iter()
            .collect()
    }
}
