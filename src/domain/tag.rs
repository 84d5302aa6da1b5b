/// Prefix every release tag carries
pub const TAG_PREFIX: &str = "v";

/// Decoration git prints in front of a tag name in `%D`
const REF_TAG_PREFIX: &str = "tag: ";

/// Format the tag for a version string (e.g., "1.2.3" -> "v1.2.3")
pub fn tag_for(version: &str) -> String {
    format!("{}{}", TAG_PREFIX, version)
}

/// Pull the first tag name out of a ref decoration
///
/// Accepts the bare form ("tag: v0.1.0") as well as git's full `%D` list
/// ("HEAD -> main, tag: v0.1.0, origin/main").
pub fn tag_from_ref(decoration: &str) -> Option<&str> {
    decoration
        .split(',')
        .map(str::trim)
        .find_map(|part| part.strip_prefix(REF_TAG_PREFIX))
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
}

/// Version named by the tag in a ref decoration (e.g., "tag: v0.1.0" -> "0.1.0")
pub fn previous_version_from_ref(decoration: &str) -> Option<String> {
    tag_from_ref(decoration).map(|tag| {
        tag.strip_prefix(TAG_PREFIX)
            .unwrap_or(tag)
            .to_string()
    })
}
