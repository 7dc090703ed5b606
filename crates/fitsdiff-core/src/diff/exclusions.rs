use std::fs;

/// Keyword or field names excluded from one comparison category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusionSet {
    tokens: Vec<String>,
    caution: Option<String>,
}

impl ExclusionSet {
    /// Parses an exclusion request: a comma-separated name list, `*` to
    /// suppress the whole category, or `@file` naming a whitespace-separated
    /// list file. Names are folded to upper case; list entries are taken
    /// verbatim otherwise.
    pub fn parse(request: &str) -> Self {
        if let Some(list_path) = request.strip_prefix('@') {
            return Self::from_list_file(list_path);
        }

        let tokens = request
            .to_uppercase()
            .split(',')
            .map(str::to_string)
            .collect();
        Self {
            tokens,
            caution: None,
        }
    }

    /// An unreadable list file degrades to an empty set and records a caution
    /// for the report preamble instead of failing the run.
    fn from_list_file(list_path: &str) -> Self {
        match fs::read_to_string(list_path) {
            Ok(contents) => {
                let mut tokens: Vec<String> = contents
                    .to_uppercase()
                    .split_whitespace()
                    .map(str::to_string)
                    .collect();
                if tokens.is_empty() {
                    tokens.push(String::new());
                }
                Self {
                    tokens,
                    caution: None,
                }
            }
            Err(_) => Self {
                tokens: vec![String::new()],
                caution: Some(format!(
                    "CAUTION: exclusion list '{list_path}' cannot be read, assuming an empty list"
                )),
            },
        }
    }

    /// True when the single token `*` asks for this whole category to be
    /// skipped.
    pub fn excludes_all(&self) -> bool {
        self.tokens.len() == 1 && self.tokens[0] == "*"
    }

    /// Case-insensitive membership test; empty tokens never match anything.
    pub fn excludes(&self, name: &str) -> bool {
        let upper = name.to_uppercase();
        self.tokens
            .iter()
            .any(|token| !token.is_empty() && *token == upper)
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn caution(&self) -> Option<&str> {
        self.caution.as_deref()
    }
}
