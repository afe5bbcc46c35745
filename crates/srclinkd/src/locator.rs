//! Source locators of the form `package:Type.java:line`.
//!
//! A locator names a type by package and file name plus the line to reveal.
//! Parsing is deliberately forgiving about the line number and strict about
//! shape: anything other than three segments is ignored rather than reported.

use std::fmt;

/// Source file suffixes removed from the type segment.
const SOURCE_SUFFIXES: [&str; 2] = [".java", ".scala"];

/// Line revealed when the locator's line segment is unusable.
pub const DEFAULT_LINE: u32 = 1;

/// Parsed `package:Type:line` locator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    package_name: String,
    type_name: String,
    line_number: u32,
}

impl Locator {
    /// Parses a decoded locator string.
    ///
    /// Returns `None` unless the string splits into exactly three
    /// colon-separated segments. Trailing empty segments are ignored, so
    /// `pkg:Type:` counts as two segments. A line segment that is not a
    /// positive integer yields [`DEFAULT_LINE`].
    ///
    /// ```
    /// use srclinkd::Locator;
    ///
    /// let locator = Locator::parse("com.example:Foo.java:42").expect("valid locator");
    /// assert_eq!(locator.fully_qualified_name(), "com.example.Foo");
    /// assert_eq!(locator.line_number(), 42);
    /// ```
    #[must_use]
    pub fn parse(source: &str) -> Option<Self> {
        let mut segments: Vec<&str> = source.split(':').collect();
        while segments.last().is_some_and(|segment| segment.is_empty()) {
            segments.pop();
        }
        let [package_name, type_name, line] = segments.as_slice() else {
            return None;
        };
        Some(Self {
            package_name: (*package_name).to_owned(),
            type_name: strip_source_suffix(type_name).to_owned(),
            line_number: parse_line(line),
        })
    }

    /// Dotted package name, e.g. `com.example`.
    #[must_use]
    pub fn package_name(&self) -> &str {
        &self.package_name
    }

    /// Type name with any `.java` or `.scala` suffix removed.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// One-based line to reveal.
    #[must_use]
    pub fn line_number(&self) -> u32 {
        self.line_number
    }

    /// `package.Type`, the name handed to the navigator.
    #[must_use]
    pub fn fully_qualified_name(&self) -> String {
        format!("{}.{}", self.package_name, self.type_name)
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "{}:{}:{}",
            self.package_name, self.type_name, self.line_number
        )
    }
}

fn strip_source_suffix(type_name: &str) -> &str {
    SOURCE_SUFFIXES
        .iter()
        .find_map(|suffix| type_name.strip_suffix(suffix))
        .unwrap_or(type_name)
}

fn parse_line(segment: &str) -> u32 {
    match segment.parse::<u32>() {
        Ok(line) if line > 0 => line,
        _ => DEFAULT_LINE,
    }
}
