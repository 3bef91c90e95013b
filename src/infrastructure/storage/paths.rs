use std::path::{Component, Path, PathBuf};

pub fn sanitize_filename(name: &str) -> String {
    let mut s = name.trim().to_string();
    let invalid = ['/', '\\', ':', '*', '?', '"', '<', '>', '|', '\0'];
    for ch in invalid {
        s = s.replace(ch, "-");
    }
    s = s.replace(' ', "_");
    if s.len() > 100 {
        let mut cut = 100;
        while !s.is_char_boundary(cut) {
            cut -= 1;
        }
        s.truncate(cut);
    }
    if s.is_empty() || s.chars().all(|c| c == '.') {
        s = "image".into();
    }
    s
}

/// Splits a sanitized name into a non-empty stem and a lower-cased extension.
pub fn split_name(name: &str) -> (String, String) {
    let p = Path::new(name);
    let stem = p
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("image")
        .to_string();
    let ext = p
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    (stem, ext)
}

/// Joins a client-supplied relative path onto `root`, rejecting anything that
/// could escape it.
pub fn resolve_under(root: &Path, relative: &str) -> anyhow::Result<PathBuf> {
    let mut out = PathBuf::new();
    for component in Path::new(relative.trim_start_matches('/')).components() {
        match component {
            Component::Normal(part) => out.push(part),
            Component::CurDir => continue,
            _ => anyhow::bail!("forbidden"),
        }
    }
    if out.as_os_str().is_empty() {
        anyhow::bail!("forbidden");
    }
    Ok(root.join(out))
}

pub fn relative_from_uploads(uploads_root: &Path, full: &Path) -> String {
    let rel = full.strip_prefix(uploads_root).unwrap_or(full);
    rel.components()
        .filter_map(|c| match c {
            Component::Normal(part) => part.to_str(),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitizes_dangerous_characters() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "..-..-etc-passwd");
        assert_eq!(sanitize_filename("my cat.png"), "my_cat.png");
        assert_eq!(sanitize_filename("  "), "image");
        assert_eq!(sanitize_filename(".."), "image");
    }

    #[test]
    fn splits_and_lowercases_extension() {
        assert_eq!(split_name("Cat.PNG"), ("Cat".into(), "png".into()));
        assert_eq!(split_name("noext"), ("noext".into(), String::new()));
    }

    #[test]
    fn resolve_rejects_traversal() {
        let root = Path::new("/srv/uploads");
        assert_eq!(
            resolve_under(root, "tweets/a.png").unwrap(),
            PathBuf::from("/srv/uploads/tweets/a.png")
        );
        assert!(resolve_under(root, "../secret").is_err());
        assert!(resolve_under(root, "tweets/../../x").is_err());
        assert!(resolve_under(root, "").is_err());
    }

    #[test]
    fn relative_paths_use_forward_slashes() {
        let root = Path::new("/srv/uploads");
        let full = root.join("avatars").join("me.png");
        assert_eq!(relative_from_uploads(root, &full), "avatars/me.png");
    }
}
