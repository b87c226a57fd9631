// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Badge and statistics record rendering.
//!
//! Summaries are first reduced to a [`BadgeModel`] (header lines plus ranked
//! rows) and a serializable record. [`write_artifacts`] is the only part
//! touching the filesystem and overwrites whatever a previous run produced.

use std::{
    borrow::Cow,
    fmt::Write as _,
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::{Path, PathBuf}
};

use serde::{Deserialize, Serialize};

use crate::{
    aggregate::AggregateSummary,
    error::{self, Error},
    footprint::{FOOTPRINT_TOP_N, LanguageFootprint, estimate_lines},
    ranking::{IMAGE_TOP_N, RECORD_TOP_N}
};

const WIDTH: u32 = 450;
const ROW_HEIGHT: u32 = 36;
const PADDING: u32 = 20;
const HEADER_HEIGHT: u32 = 70;
/// Horizontal space reserved right of the bars for the line and percentage
/// labels.
const STATS_COLUMN: u32 = 160;
const BAR_WIDTH: u32 = WIDTH - PADDING * 2 - STATS_COLUMN;
const FONT_FAMILY: &str = "'JetBrains Mono', 'SF Mono', monospace";

/// Locations of the two output artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    /// Path of the SVG badge.
    pub svg_path:  PathBuf,
    /// Path of the JSON statistics record.
    pub json_path: PathBuf
}

/// One ranked language row of the badge.
#[derive(Debug, Clone, PartialEq)]
pub struct BadgeRow {
    /// Language name.
    pub name:       String,
    /// Display color of the language.
    pub color:      &'static str,
    /// Amount the bar length is derived from.
    pub weight:     u64,
    /// Lines shown next to the bar.
    pub lines:      u64,
    /// Share of the grand total in percent.
    pub percentage: f64
}

/// Everything drawn on a badge.
#[derive(Debug, Clone, PartialEq)]
pub struct BadgeModel {
    /// Title line.
    pub title:    String,
    /// Totals line under the title.
    pub subtitle: String,
    /// Ranked rows, at most [`IMAGE_TOP_N`].
    pub rows:     Vec<BadgeRow>
}

impl BadgeModel {
    /// Badge for the contribution summary.
    pub fn contributions(summary: &AggregateSummary) -> Self {
        let rows = summary
            .ranked(IMAGE_TOP_N)
            .into_iter()
            .map(|entry| BadgeRow {
                name:       entry.name,
                color:      entry.color,
                weight:     entry.amount,
                lines:      entry.amount,
                percentage: entry.percentage
            })
            .collect();

        Self {
            title: "Code Contributions".to_owned(),
            subtitle: format!(
                "{} lines added · {} commits · {} repos",
                format_number(summary.total_lines_added),
                summary.total_commits,
                summary.repos_with_contributions
            ),
            rows
        }
    }

    /// Badge for the repository-wide language footprint.
    pub fn footprint(footprint: &LanguageFootprint) -> Self {
        let rows = footprint
            .ranked(IMAGE_TOP_N)
            .into_iter()
            .map(|entry| BadgeRow {
                lines:      estimate_lines(entry.amount),
                name:       entry.name,
                color:      entry.color,
                weight:     entry.amount,
                percentage: entry.percentage
            })
            .collect();

        Self {
            title: "Code Statistics".to_owned(),
            subtitle: format!(
                "~{} lines · {} repos",
                format_number(footprint.total_lines()),
                footprint.total_repos
            ),
            rows
        }
    }

    /// Canvas height: header, one row per language, padding on both ends.
    pub fn height(&self) -> u32 {
        HEADER_HEIGHT + self.rows.len() as u32 * ROW_HEIGHT + PADDING * 2
    }
}

/// Language entry of the contribution record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordLanguage {
    pub name:       String,
    pub lines:      u64,
    pub percentage: f64,
    pub color:      String
}

/// Machine-readable contribution summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContributionRecord {
    /// Repositories analyzed.
    pub total_repos:       u64,
    pub total_lines_added: u64,
    pub total_commits:     u64,
    /// Up to [`RECORD_TOP_N`] languages, descending by lines.
    pub languages:         Vec<RecordLanguage>
}

impl ContributionRecord {
    /// Builds the record from a contribution summary.
    pub fn from_summary(summary: &AggregateSummary) -> Self {
        Self {
            total_repos:       summary.total_repos_scanned,
            total_lines_added: summary.total_lines_added,
            total_commits:     summary.total_commits,
            languages:         summary
                .ranked(RECORD_TOP_N)
                .into_iter()
                .map(|entry| RecordLanguage {
                    name:       entry.name,
                    lines:      entry.amount,
                    percentage: entry.percentage,
                    color:      entry.color.to_owned()
                })
                .collect()
        }
    }
}

/// Language entry of the footprint record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FootprintLanguage {
    pub name:       String,
    pub bytes:      u64,
    /// Estimated from bytes.
    pub lines:      u64,
    pub percentage: f64,
    pub color:      String
}

/// Machine-readable footprint summary with up to [`FOOTPRINT_TOP_N`]
/// languages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FootprintRecord {
    pub total_repos: u64,
    pub total_bytes: u64,
    /// Estimated from bytes.
    pub total_lines: u64,
    pub languages:   Vec<FootprintLanguage>
}

impl FootprintRecord {
    /// Builds the record from a language footprint.
    pub fn from_footprint(footprint: &LanguageFootprint) -> Self {
        Self {
            total_repos: footprint.total_repos,
            total_bytes: footprint.total_bytes(),
            total_lines: footprint.total_lines(),
            languages:   footprint
                .ranked(FOOTPRINT_TOP_N)
                .into_iter()
                .map(|entry| FootprintLanguage {
                    lines:      estimate_lines(entry.amount),
                    bytes:      entry.amount,
                    name:       entry.name,
                    percentage: entry.percentage,
                    color:      entry.color.to_owned()
                })
                .collect()
        }
    }
}

/// Writes the SVG badge and the JSON record, replacing existing files.
///
/// Both documents are rendered in memory and written to hidden sibling files
/// first. The real paths are only replaced once both staged files are
/// complete, so a failed run leaves previous artifacts untouched. Missing
/// parent directories are created.
///
/// # Errors
///
/// Returns [`Error::ArtifactIo`](Error::ArtifactIo) when directories or files
/// cannot be created and [`Error::Serialize`](Error::Serialize) if the record
/// cannot be encoded.
///
/// # Example
///
/// ```no_run
/// use std::path::PathBuf;
///
/// use clir::{AggregateSummary, ArtifactPaths, BadgeModel, ContributionRecord, write_artifacts};
///
/// # fn main() -> Result<(), clir::Error> {
/// let summary = AggregateSummary::default();
/// let paths = ArtifactPaths {
///     svg_path:  PathBuf::from("code-stats.svg"),
///     json_path: PathBuf::from("stats.json")
/// };
/// write_artifacts(
///     &paths,
///     &BadgeModel::contributions(&summary),
///     &ContributionRecord::from_summary(&summary)
/// )?;
/// # Ok(())
/// # }
/// ```
pub fn write_artifacts<R>(paths: &ArtifactPaths, badge: &BadgeModel, record: &R) -> Result<(), Error>
where
    R: Serialize
{
    let svg = build_svg_content(badge);
    let mut json = serde_json::to_vec_pretty(record)?;
    json.push(b'\n');

    let staged_svg = stage(&paths.svg_path, svg.as_bytes())?;
    let staged_json = match stage(&paths.json_path, &json) {
        Ok(staged) => staged,
        Err(error) => {
            discard(&staged_svg);
            return Err(error);
        }
    };

    if let Err(error) = promote(&staged_json, &paths.json_path) {
        discard(&staged_svg);
        discard(&staged_json);
        return Err(error);
    }
    promote(&staged_svg, &paths.svg_path).inspect_err(|_| discard(&staged_svg))
}

fn ensure_parent(path: &Path) -> Result<(), Error> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|source| error::artifact_io_error(parent, source))
        }
        _ => Ok(())
    }
}

/// Hidden sibling used while `path` is being written.
fn staging_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.tmp"))
}

/// Writes `contents` next to `path` and returns the staged location.
fn stage(path: &Path, contents: &[u8]) -> Result<PathBuf, Error> {
    if path.is_dir() {
        return Err(error::artifact_io_error(
            path,
            io::Error::new(io::ErrorKind::IsADirectory, "artifact path is a directory")
        ));
    }
    ensure_parent(path)?;

    let staged = staging_path(path);
    let written = File::create(&staged).and_then(|file| {
        let mut writer = BufWriter::new(file);
        writer.write_all(contents)?;
        writer.flush()
    });

    match written {
        Ok(()) => Ok(staged),
        Err(source) => {
            discard(&staged);
            Err(error::artifact_io_error(path, source))
        }
    }
}

fn promote(staged: &Path, path: &Path) -> Result<(), Error> {
    fs::rename(staged, path).map_err(|source| error::artifact_io_error(path, source))
}

fn discard(staged: &Path) {
    let _ = fs::remove_file(staged);
}

/// Renders the badge as a self-contained SVG document.
///
/// Bar lengths are proportional to each row's share of the displayed rows,
/// so the leading language does not necessarily fill its bar.
pub fn build_svg_content(badge: &BadgeModel) -> String {
    let height = badge.height();
    let displayed_total: u64 = badge.rows.iter().map(|row| row.weight).sum();
    let mut buffer = String::with_capacity(1024 + badge.rows.len() * 640);

    let _ = writeln!(
        buffer,
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<svg xmlns=\"http://www.w3.org/2000/svg\" role=\"img\" aria-label=\"{title}\" width=\"{WIDTH}\" height=\"{height}\" viewBox=\"0 0 {WIDTH} {height}\">",
        title = escape_xml(&badge.title),
    );
    let _ = writeln!(
        buffer,
        "  <style>\n    .title {{ font-family: {FONT_FAMILY}; font-size: 16px; font-weight: 600; fill: #58a6ff; }}\n    .subtitle {{ font-family: {FONT_FAMILY}; font-size: 11px; fill: #8b949e; }}\n    .lang-name {{ font-family: {FONT_FAMILY}; font-size: 12px; font-weight: 600; fill: #c9d1d9; }}\n    .lang-stats {{ font-family: {FONT_FAMILY}; font-size: 11px; fill: #8b949e; }}\n  </style>",
    );
    let _ = writeln!(
        buffer,
        "  <rect width=\"{WIDTH}\" height=\"{height}\" rx=\"8\" fill=\"#0d1117\"/>\n  <rect x=\"0.5\" y=\"0.5\" width=\"{}\" height=\"{}\" rx=\"8\" fill=\"none\" stroke=\"#30363d\" stroke-width=\"1\"/>",
        WIDTH - 1,
        height - 1,
    );
    let _ = writeln!(
        buffer,
        "  <text x=\"{PADDING}\" y=\"32\" class=\"title\">{}</text>\n  <text x=\"{PADDING}\" y=\"54\" class=\"subtitle\">{}</text>",
        escape_xml(&badge.title),
        escape_xml(&badge.subtitle),
    );

    let mut y_offset = HEADER_HEIGHT + 10;
    for row in &badge.rows {
        let fill_width = if displayed_total == 0 {
            0.0
        } else {
            row.weight as f64 / displayed_total as f64 * f64::from(BAR_WIDTH)
        };

        let _ = writeln!(
            buffer,
            "  <g transform=\"translate({PADDING}, {y_offset})\">\n    <circle cx=\"5\" cy=\"8\" r=\"5\" fill=\"{color}\"/>\n    <text x=\"16\" y=\"12\" class=\"lang-name\">{name}</text>\n    <rect x=\"0\" y=\"18\" width=\"{BAR_WIDTH}\" height=\"8\" rx=\"4\" fill=\"#21262d\"/>\n    <rect x=\"0\" y=\"18\" width=\"{fill_width:.1}\" height=\"8\" rx=\"4\" fill=\"{color}\"/>\n    <text x=\"{stats_x}\" y=\"12\" class=\"lang-stats\">{lines} lines</text>\n    <text x=\"{stats_x}\" y=\"26\" class=\"lang-stats\">{percentage:.1}%</text>\n  </g>",
            color = row.color,
            name = escape_xml(&row.name),
            stats_x = BAR_WIDTH + 10,
            lines = format_number(row.lines),
            percentage = row.percentage,
        );
        y_offset += ROW_HEIGHT;
    }

    buffer.push_str("</svg>\n");
    buffer
}

/// Formats counts compactly: `1.2M`, `35k`, `999`.
pub fn format_number(value: u64) -> String {
    if value >= 1_000_000 {
        format!("{:.1}M", value as f64 / 1_000_000.0)
    } else if value >= 1_000 {
        format!("{:.0}k", value as f64 / 1_000.0)
    } else {
        value.to_string()
    }
}

fn escape_xml(value: &str) -> Cow<'_, str> {
    if value
        .chars()
        .any(|character| matches!(character, '&' | '<' | '>' | '\"' | '\''))
    {
        let mut escaped = String::with_capacity(value.len());
        for character in value.chars() {
            match character {
                '&' => escaped.push_str("&amp;"),
                '<' => escaped.push_str("&lt;"),
                '>' => escaped.push_str("&gt;"),
                '\"' => escaped.push_str("&quot;"),
                '\'' => escaped.push_str("&apos;"),
                other => escaped.push(other)
            }
        }
        Cow::Owned(escaped)
    } else {
        Cow::Borrowed(value)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Value;
    use tempfile::tempdir;

    use super::*;
    use crate::totals::LanguageTotals;

    fn sample_summary() -> AggregateSummary {
        AggregateSummary {
            total_repos_scanned:      3,
            repos_with_contributions: 2,
            total_lines_added:        240,
            total_commits:            8,
            per_language:             [("Python", 150), ("Go", 90)].into_iter().collect()
        }
    }

    fn wide_summary(languages: usize) -> AggregateSummary {
        let per_language: LanguageTotals = (0..languages)
            .map(|index| (format!("Lang{index:02}"), (index as u64 + 1) * 10))
            .collect();
        AggregateSummary {
            total_repos_scanned:      1,
            repos_with_contributions: 1,
            total_lines_added:        per_language.sum(),
            total_commits:            1,
            per_language
        }
    }

    #[test]
    fn contribution_badge_lists_ranked_languages() {
        let badge = BadgeModel::contributions(&sample_summary());

        assert_eq!(badge.rows.len(), 2);
        assert_eq!(badge.rows[0].name, "Python");
        assert_eq!(badge.rows[1].name, "Go");
        assert_eq!(badge.subtitle, "240 lines added · 8 commits · 2 repos");
    }

    #[test]
    fn badge_height_grows_linearly_with_rows() {
        let empty = BadgeModel::contributions(&AggregateSummary::default());
        let two = BadgeModel::contributions(&sample_summary());

        assert_eq!(empty.height(), HEADER_HEIGHT + PADDING * 2);
        assert_eq!(two.height(), empty.height() + 2 * ROW_HEIGHT);
    }

    #[test]
    fn badge_keeps_top_eight_and_record_top_ten() {
        let summary = wide_summary(12);

        let badge = BadgeModel::contributions(&summary);
        let record = ContributionRecord::from_summary(&summary);

        assert_eq!(badge.rows.len(), IMAGE_TOP_N);
        assert_eq!(record.languages.len(), RECORD_TOP_N);
        assert_eq!(badge.rows[0].name, "Lang11");
        assert_eq!(record.languages[9].name, "Lang02");
    }

    #[test]
    fn svg_contains_header_rows_and_dimensions() {
        let badge = BadgeModel::contributions(&sample_summary());
        let svg = build_svg_content(&badge);

        assert!(svg.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(svg.contains(&format!("height=\"{}\"", badge.height())));
        assert!(svg.contains("Code Contributions"));
        assert!(svg.contains("240 lines added"));
        assert!(svg.contains(">Python</text>"));
        assert!(svg.contains("62.5%"));
        assert!(svg.contains("37.5%"));
        assert!(svg.contains("fill=\"#3572A5\""));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn svg_bars_use_share_of_displayed_rows() {
        let badge = BadgeModel {
            title:    "t".to_owned(),
            subtitle: "s".to_owned(),
            rows:     vec![BadgeRow {
                name:       "Rust".to_owned(),
                color:      "#dea584",
                weight:     10,
                lines:      10,
                percentage: 12.5
            }]
        };

        let svg = build_svg_content(&badge);

        assert!(svg.contains(&format!("width=\"{:.1}\"", f64::from(BAR_WIDTH))));
        assert!(svg.contains("12.5%"));
    }

    #[test]
    fn svg_escapes_dynamic_content() {
        let badge = BadgeModel {
            title:    "A & B".to_owned(),
            subtitle: "<none>".to_owned(),
            rows:     vec![BadgeRow {
                name:       "C<#>".to_owned(),
                color:      "#858585",
                weight:     1,
                lines:      1,
                percentage: 100.0
            }]
        };

        let svg = build_svg_content(&badge);

        assert!(svg.contains("A &amp; B"));
        assert!(svg.contains("&lt;none&gt;"));
        assert!(svg.contains("C&lt;#&gt;"));
    }

    #[test]
    fn escape_xml_returns_borrowed_when_no_escaping_needed() {
        let input = "no special characters";
        match escape_xml(input) {
            Cow::Borrowed(s) => assert_eq!(s, input),
            Cow::Owned(_) => panic!("expected borrowed variant")
        }
    }

    #[test]
    fn format_number_uses_compact_suffixes() {
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(12_300), "12k");
        assert_eq!(format_number(2_340_000), "2.3M");
    }

    #[test]
    fn contribution_record_matches_summary() {
        let record = ContributionRecord::from_summary(&sample_summary());

        assert_eq!(record.total_repos, 3);
        assert_eq!(record.total_lines_added, 240);
        assert_eq!(record.total_commits, 8);
        assert_eq!(
            record.languages[0],
            RecordLanguage {
                name:       "Python".to_owned(),
                lines:      150,
                percentage: 62.5,
                color:      "#3572A5".to_owned()
            }
        );
    }

    #[test]
    fn footprint_record_estimates_lines_from_bytes() {
        let footprint = LanguageFootprint {
            total_repos:  2,
            per_language: [("Rust", 4_000), ("HTML", 1_000)].into_iter().collect()
        };

        let record = FootprintRecord::from_footprint(&footprint);
        let badge = BadgeModel::footprint(&footprint);

        assert_eq!(record.total_bytes, 5_000);
        assert_eq!(record.total_lines, 125);
        assert_eq!(record.languages[0].bytes, 4_000);
        assert_eq!(record.languages[0].lines, 100);
        assert_eq!(record.languages[0].percentage, 80.0);
        assert_eq!(badge.rows[1].lines, 25);
        assert_eq!(badge.rows[1].weight, 1_000);
    }

    #[test]
    fn footprint_record_keeps_eight_languages() {
        let footprint = LanguageFootprint {
            total_repos:  4,
            per_language: (0..12u64)
                .map(|index| (format!("Lang{index:02}"), (index + 1) * 400))
                .collect()
        };

        let record = FootprintRecord::from_footprint(&footprint);

        assert_eq!(record.languages.len(), FOOTPRINT_TOP_N);
        assert_eq!(record.languages[0].name, "Lang11");
        assert_eq!(record.languages[7].name, "Lang04");
        assert_eq!(record.total_bytes, footprint.total_bytes());
    }

    #[test]
    fn write_artifacts_creates_and_overwrites_files() {
        let directory = tempdir().expect("failed to create temp dir");
        let paths = ArtifactPaths {
            svg_path:  directory.path().join("out/code-stats.svg"),
            json_path: directory.path().join("out/stats.json")
        };
        fs::create_dir_all(directory.path().join("out")).expect("mkdir");
        fs::write(&paths.json_path, "stale").expect("seed stale record");

        let summary = sample_summary();
        write_artifacts(
            &paths,
            &BadgeModel::contributions(&summary),
            &ContributionRecord::from_summary(&summary)
        )
        .expect("artifacts written");

        let svg = fs::read_to_string(&paths.svg_path).expect("svg readable");
        assert!(svg.contains("Python"));

        let record = fs::read_to_string(&paths.json_path).expect("record readable");
        let value: Value = serde_json::from_str(&record).expect("valid json");
        assert_eq!(value["total_repos"], 3);
        assert_eq!(value["total_lines_added"], 240);
        assert_eq!(value["total_commits"], 8);
        assert_eq!(value["languages"][0]["name"], "Python");
        assert_eq!(value["languages"][0]["percentage"], 62.5);
        assert_eq!(value["languages"][1]["color"], "#00ADD8");
    }

    #[test]
    fn failed_record_write_leaves_previous_badge_untouched() {
        let directory = tempdir().expect("failed to create temp dir");
        let paths = ArtifactPaths {
            svg_path:  directory.path().join("code-stats.svg"),
            json_path: directory.path().join("stats.json")
        };
        fs::write(&paths.svg_path, "previous badge").expect("seed previous badge");
        fs::create_dir(&paths.json_path).expect("occupy record path with a directory");

        let summary = sample_summary();
        let error = write_artifacts(
            &paths,
            &BadgeModel::contributions(&summary),
            &ContributionRecord::from_summary(&summary)
        )
        .expect_err("record path is a directory");

        assert!(matches!(error, Error::ArtifactIo { .. }));
        let badge = fs::read_to_string(&paths.svg_path).expect("badge readable");
        assert_eq!(badge, "previous badge");
        assert!(paths.json_path.is_dir());

        let leftovers: Vec<_> = fs::read_dir(directory.path())
            .expect("list output directory")
            .filter_map(Result::ok)
            .filter(|entry| entry.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty(), "staged files left behind: {leftovers:?}");
    }

    #[test]
    fn failed_record_write_creates_no_badge() {
        let directory = tempdir().expect("failed to create temp dir");
        let paths = ArtifactPaths {
            svg_path:  directory.path().join("code-stats.svg"),
            json_path: directory.path().join("stats.json")
        };
        fs::create_dir(&paths.json_path).expect("occupy record path with a directory");

        let result = write_artifacts(
            &paths,
            &BadgeModel::contributions(&AggregateSummary::default()),
            &ContributionRecord::from_summary(&AggregateSummary::default())
        );

        assert!(result.is_err());
        assert!(!paths.svg_path.exists());
    }

    #[test]
    fn staging_path_is_a_hidden_sibling() {
        assert_eq!(
            staging_path(Path::new("/srv/out/stats.json")),
            Path::new("/srv/out/.stats.json.tmp")
        );
    }

    #[test]
    fn write_artifacts_reports_unwritable_location() {
        let directory = tempdir().expect("failed to create temp dir");
        let blocker = directory.path().join("blocked");
        File::create(&blocker).expect("failed to create placeholder file");
        let paths = ArtifactPaths {
            svg_path:  blocker.join("code-stats.svg"),
            json_path: blocker.join("stats.json")
        };

        let error = write_artifacts(
            &paths,
            &BadgeModel::contributions(&AggregateSummary::default()),
            &ContributionRecord::from_summary(&AggregateSummary::default())
        )
        .expect_err("expected io failure");

        match error {
            Error::ArtifactIo {
                path, ..
            } => assert_eq!(path, blocker),
            other => panic!("unexpected error variant: {other:?}")
        }
    }
}
