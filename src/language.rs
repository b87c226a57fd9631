// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Fixed lookup tables for classifying changed files and coloring languages.
//!
//! The extension table decides what counts as code and the color table decides
//! how a language is drawn. The color table also covers forge-detected
//! languages (markup, styles, container files) that only appear in footprint
//! reports.

/// Color used for any language missing from the display-color table.
pub const DEFAULT_COLOR: &str = "#858585";

/// Maps a file path to the canonical language name of its extension.
///
/// The extension is the substring after the final `.` of the file name,
/// compared case-insensitively. Extensionless paths, dotfiles such as
/// `.gitignore`, and extensions outside the table yield `None`. Markup, style
/// sheets and data files are not classified.
///
/// # Examples
///
/// ```
/// use clir::classify;
///
/// assert_eq!(classify("src/Main.RS",), Some("Rust"));
/// assert_eq!(classify("README.md",), None);
/// assert_eq!(classify("Dockerfile",), None);
/// ```
pub fn classify(path: &str,) -> Option<&'static str,>
{
    let extension = extension_of(path,)?.to_ascii_lowercase();

    let language = match extension.as_str() {
        "py" | "pyi" => "Python",
        "js" | "jsx" | "mjs" | "cjs" => "JavaScript",
        "ts" | "tsx" | "mts" | "cts" => "TypeScript",
        "dart" => "Dart",
        "cs" => "C#",
        "java" => "Java",
        "sh" | "bash" | "zsh" => "Shell",
        "sql" => "SQL",
        "cpp" | "cc" | "cxx" | "hpp" | "hh" | "hxx" => "C++",
        "c" | "h" => "C",
        "go" => "Go",
        "rs" => "Rust",
        "php" => "PHP",
        "rb" => "Ruby",
        "swift" => "Swift",
        "kt" | "kts" => "Kotlin",
        "vue" => "Vue",
        "svelte" => "Svelte",
        _ => return None,
    };

    Some(language,)
}

/// Returns the display color for a language name.
///
/// Names outside the table fall back to [`DEFAULT_COLOR`].
///
/// # Examples
///
/// ```
/// use clir::{DEFAULT_COLOR, color_for};
///
/// assert_eq!(color_for("Go",), "#00ADD8");
/// assert_eq!(color_for("COBOL",), DEFAULT_COLOR);
/// ```
pub fn color_for(language: &str,) -> &'static str
{
    match language {
        "Python" => "#3572A5",
        "JavaScript" => "#f1e05a",
        "TypeScript" => "#3178c6",
        "Dart" => "#00B4AB",
        "C#" => "#178600",
        "Java" => "#b07219",
        "HTML" => "#e34c26",
        "CSS" => "#563d7c",
        "SCSS" => "#c6538c",
        "Shell" => "#89e051",
        "Dockerfile" => "#384d54",
        "SQL" => "#e38c00",
        "C++" => "#f34b7d",
        "C" => "#555555",
        "Go" => "#00ADD8",
        "Rust" => "#dea584",
        "PHP" => "#4F5D95",
        "Ruby" => "#701516",
        "Swift" => "#F05138",
        "Kotlin" => "#A97BFF",
        "Vue" => "#41b883",
        "Svelte" => "#ff3e00",
        _ => DEFAULT_COLOR,
    }
}

fn extension_of(path: &str,) -> Option<&str,>
{
    let file_name = path.rsplit(['/', '\\',],).next().unwrap_or(path,);
    let (stem, extension,) = file_name.rsplit_once('.',)?;

    if stem.is_empty() || extension.is_empty() {
        return None;
    }

    Some(extension,)
}
