use regex::Regex;
use std::ffi::OsStr;

///packaging markers and test modules, neither of which belongs in a composer bucket
pub const DEFAULT_EXCLUSIONS: &[&str] = &["__init__.py", "*_test.py"];

/// File-name globs that keep an entry out of the staging area.
///
/// `*` matches any run of characters, `?` matches exactly one, and everything else is literal.
/// A pattern has to match the whole name, not a substring of it.
#[derive(Debug, Clone)]
pub struct ExclusionPolicy {
    globs: Vec<String>,
    patterns: Vec<Regex>,
}

impl ExclusionPolicy {
    pub fn new<S: AsRef<str>>(globs: impl IntoIterator<Item = S>) -> color_eyre::Result<Self> {
        let mut kept = vec![];
        let mut patterns = vec![];
        for glob in globs {
            let glob = glob.as_ref();
            patterns.push(glob_to_regex(glob)?);
            kept.push(glob.to_string());
        }

        Ok(Self {
            globs: kept,
            patterns,
        })
    }

    pub fn excludes(&self, name: &OsStr) -> bool {
        let name = name.to_string_lossy();
        self.patterns.iter().any(|pattern| pattern.is_match(&name))
    }

    pub fn globs(&self) -> &[String] {
        &self.globs
    }
}

impl Default for ExclusionPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_EXCLUSIONS).expect("default exclusion globs are valid")
    }
}

fn glob_to_regex(glob: &str) -> Result<Regex, regex::Error> {
    let mut pattern = String::from("(?s)^");
    let mut buf = [0; 4];
    for c in glob.chars() {
        match c {
            '*' => pattern.push_str(".*"),
            '?' => pattern.push('.'),
            c => pattern.push_str(&regex::escape(c.encode_utf8(&mut buf))),
        }
    }
    pattern.push('$');

    Regex::new(&pattern)
}
