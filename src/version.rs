use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use rustc_hash::FxHashSet;

use crate::error::{Error, Result};
use crate::oracle::{self, GlyphOracle};
use crate::sequence::{self, Codepoint};

/// An Emoji specification version. Ordered numerically, so `15.1 > 5.0`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EmojiVersion {
    pub major: u16,
    pub minor: u16,
}

impl EmojiVersion {
    pub const fn new(major: u16, minor: u16) -> EmojiVersion {
        EmojiVersion { major, minor }
    }
}

impl FromStr for EmojiVersion {
    type Err = Error;

    /// Accepts `15.1`, `15` and the corpus comment form `E15.1`.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidVersion(s.to_string());
        let digits = s.trim();
        let digits = digits.strip_prefix('E').unwrap_or(digits);
        let (major, minor) = match digits.split_once('.') {
            Some((major, minor)) => (major, minor),
            None => (digits, "0"),
        };
        let number = |part: &str| {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            part.parse::<u16>().map_err(|_| invalid())
        };
        Ok(EmojiVersion::new(number(major)?, number(minor)?))
    }
}

impl fmt::Display for EmojiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// A sequence that needs every glyph introduced in `version`.
#[derive(Clone, Debug, PartialEq, Eq, new)]
pub struct VersionMarker {
    version: EmojiVersion,
    representative: Vec<Codepoint>,
}

impl VersionMarker {
    pub fn version(&self) -> EmojiVersion {
        self.version
    }

    pub fn representative(&self) -> &[Codepoint] {
        &self.representative
    }
}

/// Result of a version estimation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Estimate {
    Version(EmojiVersion),
    Unknown,
}

impl Estimate {
    pub fn version(&self) -> Option<EmojiVersion> {
        match self {
            Estimate::Version(version) => Some(*version),
            Estimate::Unknown => None,
        }
    }
}

impl fmt::Display for Estimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Estimate::Version(version) => fmt::Display::fmt(version, f),
            Estimate::Unknown => f.write_str("unknown"),
        }
    }
}

// One newly introduced sequence per release. Adding a release is one row.
const BUILTIN_MARKERS: &[(EmojiVersion, &[char])] = &[
    // face with bags under eyes
    (EmojiVersion::new(16, 0), &['\u{1FAE9}']),
    // phoenix
    (EmojiVersion::new(15, 1), &['\u{1F426}', '\u{200D}', '\u{1F525}']),
    // shaking face
    (EmojiVersion::new(15, 0), &['\u{1FAE8}']),
    // melting face
    (EmojiVersion::new(14, 0), &['\u{1FAE0}']),
    // face in clouds
    (
        EmojiVersion::new(13, 1),
        &['\u{1F636}', '\u{200D}', '\u{1F32B}', '\u{FE0F}'],
    ),
    // smiling face with tear
    (EmojiVersion::new(13, 0), &['\u{1F972}']),
    // person: red hair
    (EmojiVersion::new(12, 1), &['\u{1F9D1}', '\u{200D}', '\u{1F9B0}']),
    // yawning face
    (EmojiVersion::new(12, 0), &['\u{1F971}']),
    // smiling face with hearts
    (EmojiVersion::new(11, 0), &['\u{1F970}']),
    // zany face
    (EmojiVersion::new(5, 0), &['\u{1F92A}']),
    // man health worker
    (
        EmojiVersion::new(4, 0),
        &['\u{1F468}', '\u{200D}', '\u{2695}', '\u{FE0F}'],
    ),
    // rolling on the floor laughing
    (EmojiVersion::new(3, 0), &['\u{1F923}']),
    // eye in speech bubble
    (
        EmojiVersion::new(2, 0),
        &['\u{1F441}', '\u{FE0F}', '\u{200D}', '\u{1F5E8}', '\u{FE0F}'],
    ),
    // grinning face
    (EmojiVersion::new(1, 0), &['\u{1F600}']),
];

static BUILTIN: Lazy<MarkerTable> = Lazy::new(|| {
    MarkerTable::sorted(
        BUILTIN_MARKERS
            .iter()
            .map(|(version, chars)| {
                let representative = chars.iter().copied().map(Codepoint::new).collect();
                VersionMarker::new(*version, representative)
            })
            .collect(),
    )
});

/// Version markers, always sorted by descending version.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MarkerTable {
    markers: Vec<VersionMarker>,
}

impl MarkerTable {
    /// Validates and sorts `markers`.
    pub fn new(markers: Vec<VersionMarker>) -> Result<MarkerTable> {
        if markers.is_empty() {
            return Err(Error::NoMarkers);
        }
        let mut seen = FxHashSet::default();
        for marker in &markers {
            if !seen.insert(marker.version) {
                return Err(Error::DuplicateVersion(marker.version));
            }
        }
        Ok(MarkerTable::sorted(markers))
    }

    fn sorted(mut markers: Vec<VersionMarker>) -> MarkerTable {
        // stable, descending
        markers.sort_by(|a, b| b.version.cmp(&a.version));
        MarkerTable { markers }
    }

    pub fn builtin() -> &'static MarkerTable {
        &BUILTIN
    }

    /// Reads `major.minor ; hex hex ...  # comment` lines.
    pub fn parse(text: &str) -> Result<MarkerTable> {
        let mut markers = Vec::new();
        for (idx, line) in text.lines().enumerate() {
            let line_no = idx + 1;
            let data = match line.split_once('#') {
                Some((data, _comment)) => data,
                None => line,
            }
            .trim();
            if data.is_empty() {
                continue;
            }
            let malformed = |reason: String| Error::MalformedMarker {
                line: line_no,
                reason,
            };
            let (version, field) = data
                .split_once(';')
                .ok_or_else(|| malformed("missing ';'".to_string()))?;
            let version = version
                .trim()
                .parse::<EmojiVersion>()
                .map_err(|err| malformed(err.to_string()))?;
            let representative =
                sequence::parse(field).map_err(|err| malformed(err.to_string()))?;
            if representative.is_empty() {
                return Err(malformed("empty sequence".to_string()));
            }
            markers.push(VersionMarker::new(version, representative));
        }
        MarkerTable::new(markers)
    }

    pub fn markers(&self) -> &[VersionMarker] {
        &self.markers
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Queries every marker; highest version first.
    pub fn survey<O>(&self, oracle: &mut O) -> Vec<(EmojiVersion, bool)>
    where
        O: GlyphOracle + ?Sized,
    {
        self.markers
            .iter()
            .map(|marker| {
                let text = sequence::format(&marker.representative);
                (marker.version, oracle::query(&mut *oracle, &text))
            })
            .collect()
    }
}

/// The highest version whose marker renders.
///
/// Support is not monotonic on every stack, so this is a linear walk from
/// the newest marker down, never a bisection.
pub fn estimate<O: GlyphOracle + ?Sized>(table: &MarkerTable, oracle: &mut O) -> Estimate {
    for marker in table.markers() {
        let text = sequence::format(marker.representative());
        if oracle::query(&mut *oracle, &text) {
            log::info!(
                "version marker {} ({}) renders",
                marker.version,
                sequence::to_hex(marker.representative())
            );
            return Estimate::Version(marker.version);
        }
        log::debug!("version marker {} does not render", marker.version);
    }
    Estimate::Unknown
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marker(version: &str, field: &str) -> VersionMarker {
        VersionMarker::new(version.parse().unwrap(), sequence::parse(field).unwrap())
    }

    #[test]
    fn numeric_ordering() {
        let v15_1: EmojiVersion = "15.1".parse().unwrap();
        let v5: EmojiVersion = "5.0".parse().unwrap();
        assert!(v15_1 > v5);
        assert!("12.1".parse::<EmojiVersion>().unwrap() > "12.0".parse().unwrap());
        assert!("0.7".parse::<EmojiVersion>().unwrap() < "1.0".parse().unwrap());
    }

    #[test]
    fn version_forms() {
        assert_eq!("E13.1".parse::<EmojiVersion>().unwrap(), EmojiVersion::new(13, 1));
        assert_eq!("11".parse::<EmojiVersion>().unwrap(), EmojiVersion::new(11, 0));
        assert_eq!(EmojiVersion::new(15, 1).to_string(), "15.1");
        assert!("".parse::<EmojiVersion>().is_err());
        assert!("15.x".parse::<EmojiVersion>().is_err());
        assert!("1.2.3".parse::<EmojiVersion>().is_err());
    }

    #[test]
    fn first_rendering_marker_wins() {
        let table =
            MarkerTable::new(vec![marker("16.0", "1FAE9"), marker("1.0", "1F600")]).unwrap();
        let mut oracle = |text: &str| text == "\u{1F600}";
        assert_eq!(
            estimate(&table, &mut oracle),
            Estimate::Version(EmojiVersion::new(1, 0))
        );
    }

    #[test]
    fn nothing_renders() {
        let mut oracle = |_: &str| false;
        let estimate = estimate(MarkerTable::builtin(), &mut oracle);
        assert_eq!(estimate, Estimate::Unknown);
        assert_eq!(estimate.to_string(), "unknown");
    }

    #[test]
    fn unsorted_table_is_sorted_numerically() {
        let table = MarkerTable::new(vec![
            marker("5.0", "1F92A"),
            marker("15.1", "1F426 200D 1F525"),
            marker("11.0", "1F970"),
        ])
        .unwrap();
        let versions: Vec<String> = table
            .markers()
            .iter()
            .map(|m| m.version().to_string())
            .collect();
        assert_eq!(versions, ["15.1", "11.0", "5.0"]);

        let mut everything = |_: &str| true;
        assert_eq!(estimate(&table, &mut everything).to_string(), "15.1");
    }

    #[test]
    fn non_monotonic_stack_reports_highest_passing_marker() {
        let table = MarkerTable::new(vec![
            marker("15.0", "1FAE8"),
            marker("14.0", "1FAE0"),
            marker("13.1", "1F636 200D 1F32B FE0F"),
        ])
        .unwrap();
        // isolated late glyph present, compound sequence missing
        let mut oracle = |text: &str| text == "\u{1FAE0}";
        assert_eq!(estimate(&table, &mut oracle).to_string(), "14.0");
        assert_eq!(
            table.survey(&mut oracle),
            vec![
                (EmojiVersion::new(15, 0), false),
                (EmojiVersion::new(14, 0), true),
                (EmojiVersion::new(13, 1), false),
            ]
        );
    }

    #[test]
    fn rejects_bad_tables() {
        assert!(matches!(MarkerTable::new(vec![]), Err(Error::NoMarkers)));
        assert!(matches!(
            MarkerTable::new(vec![marker("1.0", "1F600"), marker("1.0", "1F601")]),
            Err(Error::DuplicateVersion(v)) if v == EmojiVersion::new(1, 0)
        ));
    }

    #[test]
    fn builtin_table_is_descending_and_unique() {
        let table = MarkerTable::builtin();
        assert!(!table.is_empty());
        for pair in table.markers().windows(2) {
            assert!(pair[0].version() > pair[1].version());
        }
        assert_eq!(table.markers()[0].version(), EmojiVersion::new(16, 0));
    }

    #[test]
    fn parses_marker_text() {
        let table = MarkerTable::parse(
            "# markers\n\n1.0 ; 1F600 # grinning face\n15.1;1F426 200D 1F525\n",
        )
        .unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.markers()[0].version(), EmojiVersion::new(15, 1));
        assert_eq!(table.markers()[0].representative().len(), 3);
    }

    #[test]
    fn marker_text_errors_carry_line_numbers() {
        match MarkerTable::parse("1.0 ; 1F600\n2.0 1F441\n") {
            Err(Error::MalformedMarker { line, .. }) => assert_eq!(line, 2),
            other => panic!("unexpected {:?}", other),
        }
        assert!(matches!(
            MarkerTable::parse("1.0 ; ZZZZ"),
            Err(Error::MalformedMarker { line: 1, .. })
        ));
        assert!(matches!(MarkerTable::parse("# empty\n"), Err(Error::NoMarkers)));
    }
}
