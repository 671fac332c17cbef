use indexmap::IndexMap;

/// Parsed core-metadata headers (`METADATA` / `PKG-INFO`).
///
/// Field names match case-insensitively and repeated fields keep their
/// order of appearance, so `get_all("Classifier")` returns every
/// classifier line as written. Only the header block is kept: the first
/// blank line ends it and the long-description body is discarded.
#[derive(Debug, Clone, Default)]
pub struct DistMetadata {
    fields: IndexMap<String, Vec<String>>,
}

impl DistMetadata {
    /// Parse RFC 822-style `Key: value` headers. Continuation lines
    /// (leading whitespace) fold into the previous value joined with a
    /// newline, which is how a multi-line `License` field survives intact.
    pub fn parse(content: &str) -> Self {
        let mut fields: IndexMap<String, Vec<String>> = IndexMap::new();
        let mut current: Option<String> = None;

        for line in content.lines() {
            if line.trim().is_empty() {
                break;
            }
            if line.starts_with(' ') || line.starts_with('\t') {
                if let Some(values) = current.as_ref().and_then(|key| fields.get_mut(key)) {
                    if let Some(last) = values.last_mut() {
                        last.push('\n');
                        last.push_str(line.trim());
                    }
                }
                continue;
            }
            match line.split_once(':') {
                Some((name, value)) => {
                    let key = name.trim().to_ascii_lowercase();
                    fields
                        .entry(key.clone())
                        .or_default()
                        .push(value.trim().to_string());
                    current = Some(key);
                }
                None => current = None,
            }
        }

        Self { fields }
    }

    /// First value of a field, if present.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .get(&name.to_ascii_lowercase())
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// All values of a repeated field, in order of appearance.
    pub fn get_all(&self, name: &str) -> &[String] {
        self.fields
            .get(&name.to_ascii_lowercase())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Extract the path column from every `RECORD` row (`path,hash,size`).
/// Paths containing commas are quoted per PEP 376.
pub fn parse_record_paths(content: &str) -> Vec<String> {
    content.lines().filter_map(record_path).collect()
}

fn record_path(line: &str) -> Option<String> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    if let Some(rest) = line.strip_prefix('"') {
        // CSV quoting: a doubled "" inside the field is a literal quote
        let mut path = String::new();
        let mut chars = rest.chars();
        while let Some(ch) = chars.next() {
            if ch != '"' {
                path.push(ch);
                continue;
            }
            match chars.next() {
                Some('"') => path.push('"'),
                _ => break,
            }
        }
        Some(path)
    } else {
        line.split(',').next().map(str::to_string)
    }
}

/// `SOURCES.txt` is the legacy egg-info manifest: one relative path per
/// line, no CSV framing.
pub fn parse_sources_paths(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
