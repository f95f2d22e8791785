use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;
use std::{fs, path::Path};

lazy_static! {
    // applicationId "com.foo" / applicationId = "com.foo" (groovy and kotlin dsl)
    static ref APPLICATION_ID_RE: Regex =
        Regex::new(r#"\bapplicationId\s*=?\s*["']([A-Za-z][A-Za-z0-9._]*)["']"#).unwrap();

    static ref NAMESPACE_RE: Regex =
        Regex::new(r#"\bnamespace\s*=?\s*["']([A-Za-z][A-Za-z0-9._]*)["']"#).unwrap();

    static ref MANIFEST_PACKAGE_RE: Regex =
        Regex::new(r#"(?s)<manifest\b[^>]*?\bpackage\s*=\s*"([^"]+)""#).unwrap();

    static ref APP_NAME_RE: Regex =
        Regex::new(r#"<string\s+name\s*=\s*"app_name"[^>]*>([^<]*)</string>"#).unwrap();
}

pub const GRADLE_FILES: [&str; 2] = ["build.gradle", "build.gradle.kts"];

fn first_capture(re: &Regex, text: &str) -> Option<String> {
    // commented-out lines are common in generated gradle files
    text.lines()
        .filter(|line| !line.trim_start().starts_with("//"))
        .find_map(|line| re.captures(line))
        .map(|caps| caps[1].to_string())
}

/// `applicationId`, or `namespace` when the app id is not spelled out
pub fn gradle_package_name(gradle: &str) -> Option<String> {
    first_capture(&APPLICATION_ID_RE, gradle).or_else(|| first_capture(&NAMESPACE_RE, gradle))
}

pub fn manifest_package_name(manifest_xml: &str) -> Option<String> {
    MANIFEST_PACKAGE_RE
        .captures(manifest_xml)
        .map(|caps| caps[1].trim().to_string())
        .filter(|name| !name.is_empty())
}

pub fn string_resource_app_name(strings_xml: &str) -> Option<String> {
    APP_NAME_RE
        .captures(strings_xml)
        .map(|caps| caps[1].trim().to_string())
        .filter(|name| !name.is_empty())
}

fn read_json(path: &Path) -> Option<Value> {
    let text = fs::read_to_string(path).ok()?;
    match serde_json::from_str(&text) {
        Ok(value) => Some(value),
        Err(e) => {
            log::debug!("Ignoring unparsable {}: {}", path.display(), e);
            None
        }
    }
}

fn string_field<'a>(value: &'a Value, path: &[&str]) -> Option<&'a str> {
    path.iter()
        .try_fold(value, |value, key| value.get(key))?
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// `name` from package.json
pub fn package_json_name(project_dir: &Path) -> Option<String> {
    let value = read_json(&project_dir.join("package.json"))?;
    string_field(&value, &["name"]).map(str::to_string)
}

/// `displayName` from app.json, falling back to `expo.name` and then `name`
pub fn app_json_display_name(project_dir: &Path) -> Option<String> {
    let value = read_json(&project_dir.join("app.json"))?;
    string_field(&value, &["displayName"])
        .or_else(|| string_field(&value, &["expo", "name"]))
        .or_else(|| string_field(&value, &["name"]))
        .map(str::to_string)
}
