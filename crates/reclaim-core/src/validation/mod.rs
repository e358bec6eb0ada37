//! Validation helpers

use std::path::Path;

/// Extensions (lowercase, without the dot) treated as video evidence.
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "mov", "avi", "mkv", "m4v", "wmv"];

/// Whether a file name carries one of the video extensions, ignoring case.
pub fn is_video_file(file_name: &str) -> bool {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            VIDEO_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognises_video_extensions() {
        for name in [
            "clip.mp4",
            "clip.webm",
            "clip.mov",
            "clip.avi",
            "clip.mkv",
            "clip.m4v",
            "clip.wmv",
        ] {
            assert!(is_video_file(name), "{name} should be a video");
        }
    }

    #[test]
    fn extension_check_ignores_case() {
        assert!(is_video_file("Doorstep Visit.MP4"));
        assert!(is_video_file("interview.MoV"));
    }

    #[test]
    fn rejects_other_files() {
        assert!(!is_video_file("statement.pdf"));
        assert!(!is_video_file("mp4"));
        assert!(!is_video_file("archive.mp4.zip"));
        assert!(!is_video_file(""));
    }

    #[test]
    fn handles_paths() {
        assert!(is_video_file("uploads/case-12/evidence.mkv"));
    }
}
