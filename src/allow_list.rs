use serde_json::Value;

/// URLs pre-approved for `rel="me"` annotation, in submission order.
///
/// Entries are kept verbatim; they are compared to page links by exact string
/// equality. Blank entries are dropped, duplicates are kept.
///
/// # Examples
///
/// ```
/// use realme::AllowList;
///
/// let list = AllowList::from_text("https://a.example\n\n   \nhttps://b.example\n");
/// assert_eq!(list.entries(), ["https://a.example", "https://b.example"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowList {
    entries: Vec<String>,
}

impl AllowList {
    /// Creates an empty allow-list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a multi-line preference value, one URL per line.
    ///
    /// A `\r` ending a CRLF line break is not part of the entry.
    pub fn from_text(text: &str) -> Self {
        Self {
            entries: candidate_lines(text).map(str::to_string).collect(),
        }
    }

    /// Reads an allow-list from a JSON config value.
    ///
    /// A string is a single entry; an array must contain only strings.
    /// Returns `None` for any other shape.
    pub fn from_json(value: &Value) -> Option<Self> {
        let candidates = json_candidates(value)?;
        Some(Self {
            entries: candidates
                .into_iter()
                .filter(|c| !is_blank(c))
                .map(str::to_string)
                .collect(),
        })
    }

    /// The entries, in order.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True if `url` is an entry, by exact string equality.
    pub fn contains(&self, url: &str) -> bool {
        self.entries.iter().any(|entry| entry == url)
    }

    /// Iterates over the entries.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }
}

impl FromIterator<String> for AllowList {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().filter(|e| !is_blank(e)).collect(),
        }
    }
}

/// Non-blank lines of a multi-line value, verbatim.
pub(crate) fn candidate_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines().filter(|line| !is_blank(line))
}

/// Every URL string attached to one config key, blank or not.
///
/// Returns `None` when the value is neither a string nor an array of strings.
pub(crate) fn json_candidates(value: &Value) -> Option<Vec<&str>> {
    match value {
        Value::String(url) => Some(vec![url.as_str()]),
        Value::Array(items) => items.iter().map(Value::as_str).collect(),
        _ => None,
    }
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}
