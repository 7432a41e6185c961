use serde::{Deserialize, Serialize};

/// A group of consecutive pages produced from one page sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSequence {
    pub title: Option<String>,
    pub language: Option<String>,
    pub country: Option<String>,
}

impl PageSequence {
    pub fn new(title: Option<String>) -> Self {
        Self { title, ..Self::default() }
    }

    pub fn with_language(mut self, language: impl Into<String>, country: Option<String>) -> Self {
        self.language = Some(language.into());
        self.country = country;
        self
    }

    /// The language as a tag such as `en-GB`, if one was set.
    pub fn language_tag(&self) -> Option<String> {
        let language = self.language.as_deref()?;
        Some(match self.country.as_deref() {
            Some(country) => format!("{}-{}", language, country),
            None => language.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_tag() {
        let seq = PageSequence::new(None).with_language("en", Some("GB".to_string()));
        assert_eq!(seq.language_tag().as_deref(), Some("en-GB"));
        assert_eq!(PageSequence::new(None).language_tag(), None);
    }
}
