//! Output file naming.

use crate::defaults;
use crate::pipeline::types::VocabEntry;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How an entry's output file is named.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NamingScheme {
    /// Zero-based input position: `0.mp3`, `1.mp3`, ...
    #[default]
    Position,
    /// Short content hash of the word pair: `1a2b3.mp3`
    #[serde(rename = "hash")]
    ContentHash,
    /// Source word slug plus hash: `kot-1a2b3.mp3`
    Slug,
}

impl fmt::Display for NamingScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NamingScheme::Position => "position",
            NamingScheme::ContentHash => "hash",
            NamingScheme::Slug => "slug",
        })
    }
}

impl FromStr for NamingScheme {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "position" => Ok(NamingScheme::Position),
            "hash" => Ok(NamingScheme::ContentHash),
            "slug" => Ok(NamingScheme::Slug),
            other => Err(format!(
                "unknown naming scheme '{other}' (expected position, hash or slug)"
            )),
        }
    }
}

/// First hex digits of the MD5 of `source` followed by `target`.
pub fn content_hash(source: &str, target: &str) -> String {
    let digest = md5::compute(format!("{source}{target}"));
    let mut hex = format!("{digest:x}");
    hex.truncate(defaults::HASH_LENGTH);
    hex
}

/// File-name-safe form of `text`.
///
/// The text is transliterated to ASCII first (`dzień` becomes `dzien`).
/// Letters, digits and `_` are kept; every other run of characters becomes a
/// single `-`. Leading and trailing dashes are dropped.
pub fn slugify(text: &str) -> String {
    let ascii = deunicode::deunicode(text);
    let mut slug = String::with_capacity(ascii.len());
    for c in ascii.chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            slug.push(c);
        } else if !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_matches('-').to_string()
}

/// File name without extension for `entry` at zero-based `position`.
pub fn file_stem(scheme: NamingScheme, entry: &VocabEntry, position: usize) -> String {
    match scheme {
        NamingScheme::Position => position.to_string(),
        NamingScheme::ContentHash => content_hash(&entry.source, &entry.target),
        NamingScheme::Slug => {
            let hash = content_hash(&entry.source, &entry.target);
            match slugify(&entry.source) {
                slug if slug.is_empty() => hash,
                slug => format!("{slug}-{hash}"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_first_five_hex_digits_of_md5() {
        let expected = &format!("{:x}", md5::compute("kotcat"))[..5];
        assert_eq!(content_hash("kot", "cat"), expected);
        assert_eq!(content_hash("kot", "cat").len(), 5);
    }

    #[test]
    fn hash_is_stable_and_content_sensitive() {
        assert_eq!(content_hash("pies", "dog"), content_hash("pies", "dog"));
        assert_ne!(content_hash("pies", "dog"), content_hash("pies", "hound"));
    }

    #[test]
    fn slugify_replaces_runs_and_trims() {
        assert_eq!(slugify("dzień dobry!"), "dzien-dobry");
        assert_eq!(slugify("Żółć"), "Zolc");
        assert_eq!(slugify("  -a  b- "), "a-b");
        assert_eq!(slugify("snake_case"), "snake_case");
        assert_eq!(slugify("?!"), "");
    }

    #[test]
    fn file_stems_per_scheme() {
        let entry = VocabEntry::new("kot domowy", "house cat");
        let hash = content_hash("kot domowy", "house cat");

        assert_eq!(file_stem(NamingScheme::Position, &entry, 7), "7");
        assert_eq!(file_stem(NamingScheme::ContentHash, &entry, 7), hash);
        assert_eq!(
            file_stem(NamingScheme::Slug, &entry, 7),
            format!("kot-domowy-{hash}")
        );
    }

    #[test]
    fn slug_falls_back_to_hash_for_unsluggable_words() {
        let entry = VocabEntry::new("...", "dots");
        assert_eq!(
            file_stem(NamingScheme::Slug, &entry, 0),
            content_hash("...", "dots")
        );
    }

    #[test]
    fn scheme_parsing() {
        assert_eq!("hash".parse::<NamingScheme>().unwrap(), NamingScheme::ContentHash);
        assert_eq!("Slug".parse::<NamingScheme>().unwrap(), NamingScheme::Slug);
        assert!("random".parse::<NamingScheme>().is_err());
        assert_eq!(NamingScheme::ContentHash.to_string(), "hash");

        let parsed: NamingScheme = serde_json::from_str("\"hash\"").unwrap();
        assert_eq!(parsed, NamingScheme::ContentHash);
    }
}
