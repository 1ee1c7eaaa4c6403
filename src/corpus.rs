//! Reader for the `emoji-test.txt` corpus.
//!
//! ```text
//! # group: Smileys & Emotion
//! # subgroup: face-smiling
//! 1F600  ; fully-qualified  # 😀 E1.0 grinning face
//! ```

use std::fmt;
use std::str::Lines;

use crate::error::{Error, Result};
use crate::sequence::{self, Codepoint};
use crate::version::EmojiVersion;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Qualification {
    FullyQualified,
    MinimallyQualified,
    Unqualified,
    Component,
}

impl Qualification {
    pub const ALL: [Qualification; 4] = [
        Qualification::FullyQualified,
        Qualification::MinimallyQualified,
        Qualification::Unqualified,
        Qualification::Component,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Qualification::FullyQualified => "fully-qualified",
            Qualification::MinimallyQualified => "minimally-qualified",
            Qualification::Unqualified => "unqualified",
            Qualification::Component => "component",
        }
    }

    /// The status tag of a data line, `None` for anything unknown.
    fn from_tag(tag: &str) -> Option<Qualification> {
        Qualification::ALL
            .iter()
            .copied()
            .find(|q| q.as_str() == tag)
    }

    fn bit(&self) -> u8 {
        match self {
            Qualification::FullyQualified => 0b0001,
            Qualification::MinimallyQualified => 0b0010,
            Qualification::Unqualified => 0b0100,
            Qualification::Component => 0b1000,
        }
    }
}


impl fmt::Display for Qualification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which qualifications take part in an evaluation.
///
/// The default drops minimally-qualified and unqualified sequences: they are
/// alternate spellings of fully-qualified ones and would count an emoji twice.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QualificationFilter {
    accepted: u8,
}

impl QualificationFilter {
    pub fn none() -> QualificationFilter {
        QualificationFilter { accepted: 0 }
    }

    pub fn all() -> QualificationFilter {
        Qualification::ALL
            .iter()
            .fold(QualificationFilter::none(), |filter, q| filter.include(*q))
    }

    pub fn include(mut self, qualification: Qualification) -> QualificationFilter {
        self.accepted |= qualification.bit();
        self
    }

    pub fn exclude(mut self, qualification: Qualification) -> QualificationFilter {
        self.accepted &= !qualification.bit();
        self
    }

    pub fn accepts(&self, qualification: Qualification) -> bool {
        self.accepted & qualification.bit() != 0
    }
}

impl Default for QualificationFilter {
    fn default() -> Self {
        QualificationFilter::none()
            .include(Qualification::FullyQualified)
            .include(Qualification::Component)
    }
}

/// One data line of the corpus.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TestRecord {
    codepoints: Vec<Codepoint>,
    qualification: Qualification,
    comment: Option<String>,
    group: Option<String>,
    subgroup: Option<String>,
}

impl TestRecord {
    pub fn new(
        codepoints: Vec<Codepoint>,
        qualification: Qualification,
        comment: Option<String>,
    ) -> TestRecord {
        TestRecord {
            codepoints,
            qualification,
            comment,
            group: None,
            subgroup: None,
        }
    }

    pub fn codepoints(&self) -> &[Codepoint] {
        &self.codepoints
    }

    pub fn qualification(&self) -> Qualification {
        self.qualification
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    pub fn subgroup(&self) -> Option<&str> {
        self.subgroup.as_deref()
    }

    /// The scalar sequence to hand to a renderer.
    pub fn text(&self) -> String {
        sequence::format(&self.codepoints)
    }

    /// The `E<version>` a comment like `😀 E1.0 grinning face` carries.
    pub fn introduced(&self) -> Option<EmojiVersion> {
        self.version_token().map(|(version, _)| version)
    }

    /// The short name following the version in the comment.
    pub fn name(&self) -> Option<&str> {
        self.version_token()
            .map(|(_, name)| name)
            .filter(|name| !name.is_empty())
    }

    fn version_token(&self) -> Option<(EmojiVersion, &str)> {
        let comment = self.comment.as_deref()?;
        let mut rest = comment;
        loop {
            rest = rest.trim_start();
            if rest.is_empty() {
                return None;
            }
            let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
            let (token, tail) = rest.split_at(end);
            if token.starts_with('E') {
                if let Ok(version) = token.parse::<EmojiVersion>() {
                    return Some((version, tail.trim()));
                }
            }
            rest = tail;
        }
    }
}

impl fmt::Display for TestRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ; {}",
            sequence::to_hex(&self.codepoints),
            self.qualification
        )?;
        if let Some(comment) = &self.comment {
            write!(f, " # {}", comment)?;
        }
        Ok(())
    }
}

/// Corpus text handed over by the host.
///
/// Records are produced lazily; [`Corpus::records`] restarts from the top
/// every time it is called.
#[derive(Clone, Derivative)]
#[derivative(Debug)]
pub struct Corpus {
    #[derivative(Debug = "ignore")]
    text: String,
    filter: QualificationFilter,
}

impl Corpus {
    /// Fails with [`Error::NoCorpus`] when there is no text at all. A corpus
    /// that has text but no usable records is still a corpus.
    pub fn new<S: Into<String>>(text: S) -> Result<Corpus> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(Error::NoCorpus);
        }
        Ok(Corpus {
            text,
            filter: QualificationFilter::default(),
        })
    }

    pub fn with_filter(mut self, filter: QualificationFilter) -> Corpus {
        self.filter = filter;
        self
    }

    pub fn filter(&self) -> QualificationFilter {
        self.filter
    }

    /// The `# Version:` header.
    pub fn version(&self) -> Option<EmojiVersion> {
        self.text
            .lines()
            .filter_map(|line| line.trim_start().strip_prefix('#'))
            .find_map(|header| header.trim().strip_prefix("Version:"))
            .and_then(|version| version.trim().parse().ok())
    }

    pub fn records(&self) -> Records<'_> {
        Records {
            lines: self.text.lines(),
            filter: self.filter,
            group: None,
            subgroup: None,
        }
    }
}

pub struct Records<'a> {
    lines: Lines<'a>,
    filter: QualificationFilter,
    group: Option<String>,
    subgroup: Option<String>,
}

impl<'a> Records<'a> {
    fn header(&mut self, header: &str) {
        let header = header.trim();
        if let Some(group) = header.strip_prefix("group:") {
            self.group = Some(group.trim().to_string());
            self.subgroup = None;
        } else if let Some(subgroup) = header.strip_prefix("subgroup:") {
            self.subgroup = Some(subgroup.trim().to_string());
        }
    }
}

impl<'a> Iterator for Records<'a> {
    type Item = TestRecord;

    fn next(&mut self) -> Option<TestRecord> {
        loop {
            let line = self.lines.next()?;
            let trimmed = line.trim_start();
            if trimmed.is_empty() {
                continue;
            }
            if let Some(header) = trimmed.strip_prefix('#') {
                self.header(header);
                continue;
            }
            let mut record = match parse_line(line) {
                Some(record) => record,
                None => {
                    log::trace!("dropping malformed corpus line {:?}", line);
                    continue;
                }
            };
            if !self.filter.accepts(record.qualification) {
                continue;
            }
            record.group = self.group.clone();
            record.subgroup = self.subgroup.clone();
            return Some(record);
        }
    }
}

fn parse_line(line: &str) -> Option<TestRecord> {
    let (data, comment) = match line.split_once('#') {
        Some((data, comment)) => (data, Some(comment.trim()).filter(|c| !c.is_empty())),
        None => (line, None),
    };
    let (field, tag) = data.split_once(';')?;
    let qualification = Qualification::from_tag(tag.trim())?;
    let codepoints = sequence::parse(field).ok()?;
    if codepoints.is_empty() {
        return None;
    }
    Some(TestRecord::new(
        codepoints,
        qualification,
        comment.map(str::to_string),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
1F600 ; fully-qualified # A
1F468 200D 1F469 ; minimally-qualified # B
1F3F3 FE0F 200D 1F308 ; unqualified # C
";

    const HEADED: &str = "\
# emoji-test.txt
# Version: 15.1

# group: Smileys & Emotion

# subgroup: face-smiling
1F600                                                  ; fully-qualified     # 😀 E1.0 grinning face
263A FE0F                                              ; fully-qualified     # ☺️ E0.6 smiling face
263A                                                   ; unqualified         # ☺ E0.6 smiling face

# group: Component

# subgroup: skin-tone
1F3FB                                                  ; component           # 🏻 E1.0 light skin tone
";

    #[test]
    fn qualification_tags() {
        for q in Qualification::ALL.iter() {
            assert_eq!(Qualification::from_tag(q.as_str()), Some(*q));
        }
        assert_eq!(Qualification::from_tag("Fully-Qualified"), None);
        assert_eq!(Qualification::from_tag(""), None);
        assert!(parse_line("1F600 ; sort-of-qualified # x").is_none());
    }

    #[test]
    fn filters_qualifications() {
        let corpus = Corpus::new(SAMPLE).unwrap();
        let records: Vec<_> = corpus.records().collect();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].qualification(), Qualification::FullyQualified);
        assert_eq!(records[0].text(), "\u{1F600}");
        assert_eq!(records[0].comment(), Some("A"));
    }

    #[test]
    fn custom_filter() {
        let filter = QualificationFilter::default().include(Qualification::MinimallyQualified);
        let corpus = Corpus::new(SAMPLE).unwrap().with_filter(filter);
        assert_eq!(corpus.records().count(), 2);

        let corpus = Corpus::new(SAMPLE)
            .unwrap()
            .with_filter(QualificationFilter::all());
        assert_eq!(corpus.records().count(), 3);
    }

    #[test]
    fn restartable() {
        let corpus = Corpus::new(HEADED).unwrap();
        let first: Vec<_> = corpus.records().collect();
        let second: Vec<_> = corpus.records().collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
    }

    #[test]
    fn headers() {
        let corpus = Corpus::new(HEADED).unwrap();
        assert_eq!(corpus.version(), Some(EmojiVersion::new(15, 1)));

        let records: Vec<_> = corpus.records().collect();
        assert_eq!(records[0].group(), Some("Smileys & Emotion"));
        assert_eq!(records[0].subgroup(), Some("face-smiling"));
        assert_eq!(records[2].group(), Some("Component"));
        assert_eq!(records[2].subgroup(), Some("skin-tone"));
        assert_eq!(records[2].qualification(), Qualification::Component);
    }

    #[test]
    fn comment_metadata() {
        let records: Vec<_> = Corpus::new(HEADED).unwrap().records().collect();
        assert_eq!(records[0].introduced(), Some(EmojiVersion::new(1, 0)));
        assert_eq!(records[0].name(), Some("grinning face"));
        assert_eq!(records[1].introduced(), Some(EmojiVersion::new(0, 6)));
        assert_eq!(records[1].codepoints().len(), 2);

        let bare = TestRecord::new(
            vec![Codepoint::new('\u{1F600}')],
            Qualification::FullyQualified,
            None,
        );
        assert_eq!(bare.introduced(), None);
        assert_eq!(bare.name(), None);
    }

    #[test]
    fn drops_malformed_lines() {
        let text = "\
1F600 fully-qualified # no separator
ZZZZ ; fully-qualified # not hex
D800 ; fully-qualified # surrogate
 ; fully-qualified # empty field
1F601 ; sort-of-qualified # unknown tag
1F602 ; fully-qualified
";
        let records: Vec<_> = Corpus::new(text).unwrap().records().collect();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].codepoints()[0].value(), 0x1F602);
        assert_eq!(records[0].comment(), None);
    }

    #[test]
    fn no_text_is_no_corpus() {
        assert!(matches!(Corpus::new(""), Err(Error::NoCorpus)));
        assert!(matches!(Corpus::new(" \n\n"), Err(Error::NoCorpus)));
        // only comments: a corpus, just an empty one
        let corpus = Corpus::new("# nothing here\n").unwrap();
        assert_eq!(corpus.records().count(), 0);
        assert_eq!(corpus.version(), None);
    }

    #[test]
    fn display_round_trips_the_data_part() {
        let record = Corpus::new(SAMPLE).unwrap().records().next().unwrap();
        assert_eq!(record.to_string(), "1F600 ; fully-qualified # A");
    }
}
