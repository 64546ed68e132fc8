//! Image storage on the local filesystem. Payloads arrive as base64 JSON
//! fields; validated files are written under
//! `{base}/users-post/{userId}/{postId}/` and
//! `{base}/users-profile-picture/{userId}/`.

use base64::{engine::general_purpose, Engine as _};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::dtos::post_dtos::ImageUpload;
use crate::errors::ApiError;
use crate::models::object_id::ObjectId;

const ALLOWED_IMAGE_SUBTYPES: &[&str] = &["jpeg", "jpg", "png", "gif", "webp"];

/// Writes a post's images into its directory and returns the stored paths in
/// upload order. The directory is cleared first, so re-running for the same
/// post replaces the previous set instead of accumulating files.
pub fn save_post_images(
    base: &Path,
    user_id: &ObjectId,
    post_id: &ObjectId,
    files: &[ImageUpload],
) -> Result<Vec<String>, ApiError> {
    let dir = post_dir(base, user_id, post_id);
    reset_dir(&dir)?;

    let mut stored = Vec::with_capacity(files.len());
    for file in files {
        let bytes = decode_image(file)?;
        let name = sanitize_file_name(&file.file_name)?;
        let path = dir.join(&name);
        fs::write(&path, &bytes)?;
        stored.push(path.display().to_string());
    }
    Ok(stored)
}

/// Removes a post's image directory; missing directories are fine.
pub fn remove_post_dir(base: &Path, user_id: &ObjectId, post_id: &ObjectId) -> Result<(), ApiError> {
    match fs::remove_dir_all(post_dir(base, user_id, post_id)) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err.into()),
    }
}

/// A user has a single profile picture; the directory is replaced wholesale.
pub fn save_profile_image(
    base: &Path,
    user_id: &ObjectId,
    file: &ImageUpload,
) -> Result<String, ApiError> {
    let dir = base.join("users-profile-picture").join(user_id.as_str());
    reset_dir(&dir)?;

    let bytes = decode_image(file)?;
    let name = sanitize_file_name(&file.file_name)?;
    let path = dir.join(&name);
    fs::write(&path, &bytes)?;
    Ok(path.display().to_string())
}

fn post_dir(base: &Path, user_id: &ObjectId, post_id: &ObjectId) -> PathBuf {
    base.join("users-post")
        .join(user_id.as_str())
        .join(post_id.as_str())
}

fn reset_dir(dir: &Path) -> Result<(), ApiError> {
    match fs::remove_dir_all(dir) {
        Ok(()) => {}
        Err(err) if err.kind() == ErrorKind::NotFound => {}
        Err(err) => return Err(err.into()),
    }
    fs::create_dir_all(dir)?;
    Ok(())
}

fn decode_image(file: &ImageUpload) -> Result<Vec<u8>, ApiError> {
    let mime: mime::Mime = file
        .content_type
        .parse()
        .map_err(|_| ApiError::bad_request("Invalid content type"))?;
    if mime.type_() != mime::IMAGE || !ALLOWED_IMAGE_SUBTYPES.contains(&mime.subtype().as_str()) {
        return Err(ApiError::bad_request(
            "Invalid file type. Only JPEG, PNG, GIF and WEBP are allowed.",
        ));
    }

    // Clients may send a data URL; everything before the comma is metadata.
    let data = match file.image_data.split_once(',') {
        Some((_, rest)) => rest,
        None => file.image_data.as_str(),
    };

    general_purpose::STANDARD
        .decode(data.trim())
        .map_err(|_| ApiError::bad_request("Invalid base64 image data"))
}

/// Keeps only the final path component of the client-supplied name.
fn sanitize_file_name(name: &str) -> Result<String, ApiError> {
    Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .ok_or_else(|| ApiError::bad_request("Invalid file name"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose, Engine as _};

    fn upload(file_name: &str, content_type: &str, bytes: &[u8]) -> ImageUpload {
        ImageUpload {
            file_name: file_name.to_string(),
            content_type: content_type.to_string(),
            image_data: general_purpose::STANDARD.encode(bytes),
        }
    }

    #[test]
    fn saves_files_and_returns_paths_in_order() {
        let tmp = tempfile::tempdir().unwrap();
        let user = ObjectId::new();
        let post = ObjectId::new();
        let files = vec![
            upload("first.png", "image/png", b"one"),
            upload("second.jpg", "image/jpeg", b"two"),
        ];

        let stored = save_post_images(tmp.path(), &user, &post, &files).unwrap();

        assert_eq!(stored.len(), 2);
        assert!(stored[0].ends_with("first.png"));
        assert!(stored[1].ends_with("second.jpg"));
        assert_eq!(fs::read(&stored[0]).unwrap(), b"one");
        assert_eq!(fs::read(&stored[1]).unwrap(), b"two");
    }

    #[test]
    fn rewriting_a_post_replaces_previous_images() {
        let tmp = tempfile::tempdir().unwrap();
        let user = ObjectId::new();
        let post = ObjectId::new();

        let first = vec![upload("old.png", "image/png", b"old")];
        let old_paths = save_post_images(tmp.path(), &user, &post, &first).unwrap();

        let second = vec![upload("new.png", "image/png", b"new")];
        let new_paths = save_post_images(tmp.path(), &user, &post, &second).unwrap();

        assert!(!Path::new(&old_paths[0]).exists());
        assert!(Path::new(&new_paths[0]).exists());
    }

    #[test]
    fn rejects_non_image_content_types() {
        let tmp = tempfile::tempdir().unwrap();
        let user = ObjectId::new();
        let post = ObjectId::new();
        let files = vec![upload("evil.html", "text/html", b"<script>")];

        let err = save_post_images(tmp.path(), &user, &post, &files).unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[test]
    fn rejects_unknown_image_subtypes() {
        let tmp = tempfile::tempdir().unwrap();
        let user = ObjectId::new();
        let post = ObjectId::new();
        let files = vec![upload("pic.tiff", "image/tiff", b"tiff")];

        assert!(save_post_images(tmp.path(), &user, &post, &files).is_err());
    }

    #[test]
    fn accepts_data_url_prefixes() {
        let tmp = tempfile::tempdir().unwrap();
        let user = ObjectId::new();
        let post = ObjectId::new();
        let encoded = general_purpose::STANDARD.encode(b"pixels");
        let files = vec![ImageUpload {
            file_name: "shot.png".to_string(),
            content_type: "image/png".to_string(),
            image_data: format!("data:image/png;base64,{encoded}"),
        }];

        let stored = save_post_images(tmp.path(), &user, &post, &files).unwrap();
        assert_eq!(fs::read(&stored[0]).unwrap(), b"pixels");
    }

    #[test]
    fn rejects_invalid_base64() {
        let tmp = tempfile::tempdir().unwrap();
        let user = ObjectId::new();
        let post = ObjectId::new();
        let files = vec![ImageUpload {
            file_name: "bad.png".to_string(),
            content_type: "image/png".to_string(),
            image_data: "not base64 at all!!!".to_string(),
        }];

        assert!(save_post_images(tmp.path(), &user, &post, &files).is_err());
    }

    #[test]
    fn file_names_lose_directory_components() {
        assert_eq!(
            sanitize_file_name("../../etc/passwd").unwrap(),
            "passwd".to_string()
        );
        assert_eq!(sanitize_file_name("plain.png").unwrap(), "plain.png");
        assert!(sanitize_file_name("..").is_err());
    }

    #[test]
    fn removing_a_missing_post_dir_is_ok() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(remove_post_dir(tmp.path(), &ObjectId::new(), &ObjectId::new()).is_ok());
    }

    #[test]
    fn removing_an_existing_post_dir_deletes_it() {
        let tmp = tempfile::tempdir().unwrap();
        let user = ObjectId::new();
        let post = ObjectId::new();
        let files = vec![upload("pic.png", "image/png", b"data")];
        let stored = save_post_images(tmp.path(), &user, &post, &files).unwrap();

        remove_post_dir(tmp.path(), &user, &post).unwrap();
        assert!(!Path::new(&stored[0]).exists());
    }
}
