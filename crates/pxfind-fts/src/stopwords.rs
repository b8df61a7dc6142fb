//! Stopword filtering for the table analyzer.
//!
//! The base set is the short English list Lucene's standard analyzer uses
//! ("a", "and", "of", "the", ...), taken from tantivy. Setting
//! `extended_stopwords` adds the long English list from the `stop-words`
//! crate, and `custom_stopwords` are added on top of either. The same filters
//! run at index and at query time.

use std::collections::BTreeSet;

use stop_words::Language as StopWordsLanguage;
use tantivy::tokenizer::{Language, StopWordFilter};

use crate::types::SearchConfig;

/// Words removed in addition to the base English set.
///
/// Lowercased, deduplicated and sorted. Empty when stopwords are disabled.
pub fn extra_stopwords(config: &SearchConfig) -> Vec<String> {
    if !config.stopwords_enabled {
        return Vec::new();
    }

    let mut words = BTreeSet::new();
    if config.extended_stopwords {
        words.extend(
            stop_words::get(StopWordsLanguage::English)
                .iter()
                .map(|s| s.to_lowercase()),
        );
    }

    for word in &config.custom_stopwords {
        let word = word.trim().to_lowercase();
        if !word.is_empty() {
            words.insert(word);
        }
    }

    words.into_iter().collect()
}

/// Token filters for a configuration, in application order.
pub fn stopword_filters(config: &SearchConfig) -> Vec<StopWordFilter> {
    if !config.stopwords_enabled {
        return Vec::new();
    }

    let mut filters: Vec<StopWordFilter> = StopWordFilter::new(Language::English)
        .into_iter()
        .collect();

    let extra = extra_stopwords(config);
    if !extra.is_empty() {
        filters.push(StopWordFilter::remove(extra));
    }
    filters
}

/// Stable description of the analyzer a configuration produces.
///
/// Two configurations with the same signature tokenize identically.
pub fn analyzer_signature(config: &SearchConfig) -> String {
    if !config.stopwords_enabled {
        return "stopwords:off".to_string();
    }

    let base = if config.extended_stopwords {
        "stopwords:en+extended"
    } else {
        "stopwords:en"
    };

    let custom: BTreeSet<String> = config
        .custom_stopwords
        .iter()
        .map(|w| w.trim().to_lowercase())
        .filter(|w| !w.is_empty())
        .collect();

    if custom.is_empty() {
        base.to_string()
    } else {
        let custom: Vec<String> = custom.into_iter().collect();
        format!("{base};custom:{}", custom.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tantivy::tokenizer::{LowerCaser, SimpleTokenizer, TextAnalyzer, TokenStream};

    fn tokens(config: &SearchConfig, text: &str) -> Vec<String> {
        let mut builder = TextAnalyzer::builder(SimpleTokenizer::default())
            .filter(LowerCaser)
            .dynamic();
        for filter in stopword_filters(config) {
            builder = builder.filter_dynamic(filter);
        }
        let mut analyzer = builder.build();

        let mut out = Vec::new();
        let mut stream = analyzer.token_stream(text);
        while let Some(token) = stream.next() {
            out.push(token.text.clone());
        }
        out
    }

    #[test]
    fn test_base_set_removes_function_words_only() {
        let config = SearchConfig::default();
        assert_eq!(
            tokens(&config, "Number of new members by year and area"),
            vec!["number", "new", "members", "year", "area"]
        );
        assert_eq!(tokens(&config, "Consumer price index"), vec!["consumer", "price", "index"]);
    }

    #[test]
    fn test_extended_set_removes_more() {
        let config = SearchConfig {
            extended_stopwords: true,
            ..Default::default()
        };
        assert!(extra_stopwords(&config).iter().any(|w| w == "about"));
        assert!(!tokens(&config, "what about population").contains(&"about".to_string()));
        assert!(tokens(&config, "what about population").contains(&"population".to_string()));
    }

    #[test]
    fn test_custom_stopwords_are_added() {
        let config = SearchConfig {
            custom_stopwords: vec!["  Tabell ".to_string(), String::new()],
            ..Default::default()
        };
        assert_eq!(extra_stopwords(&config), vec!["tabell".to_string()]);
        assert_eq!(tokens(&config, "Tabell population"), vec!["population"]);
    }

    #[test]
    fn test_disabled_keeps_everything() {
        let config = SearchConfig {
            stopwords_enabled: false,
            custom_stopwords: vec!["tabell".to_string()],
            ..Default::default()
        };
        assert!(extra_stopwords(&config).is_empty());
        assert!(stopword_filters(&config).is_empty());
        assert_eq!(tokens(&config, "the tabell"), vec!["the", "tabell"]);
    }

    #[test]
    fn test_signature_tracks_analyzer_settings() {
        let default = SearchConfig::default();
        let reordered = SearchConfig {
            custom_stopwords: vec!["b".to_string(), " A ".to_string()],
            ..Default::default()
        };
        let same = SearchConfig {
            custom_stopwords: vec!["a".to_string(), "b".to_string()],
            ..Default::default()
        };
        let extended = SearchConfig {
            extended_stopwords: true,
            ..Default::default()
        };
        let off = SearchConfig {
            stopwords_enabled: false,
            ..Default::default()
        };

        assert_eq!(analyzer_signature(&reordered), analyzer_signature(&same));
        assert_ne!(analyzer_signature(&default), analyzer_signature(&same));
        assert_ne!(analyzer_signature(&default), analyzer_signature(&extended));
        assert_ne!(analyzer_signature(&default), analyzer_signature(&off));
    }
}
