use std::fmt;

use url::form_urlencoded;

/// Query component of a URL: parameter names mapped to one or more values,
/// in the order they appeared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pairs: Vec<(String, String)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `application/x-www-form-urlencoded` text. A leading `?` and
    /// anything before it (a path or a full URL) is ignored, as is a fragment.
    pub fn parse(raw: &str) -> Self {
        let query = match raw.find('?') {
            Some(pos) => &raw[pos + 1..],
            None if raw.contains('=') => raw,
            None => "",
        };
        let query = query.split('#').next().unwrap_or_default();

        form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect()
    }

    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((name.into(), value.into()));
    }

    /// First value for `name`
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.pairs
            .iter()
            .filter(move |(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.pairs.iter().any(|(key, _)| key == name)
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Query
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            pairs: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let encoded = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter())
            .finish();
        f.write_str(&encoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_urls_and_bare_queries() {
        let from_url = Query::parse("http://localhost:3000/?duration=7&countAdults=2#top");
        let bare = Query::parse("duration=7&countAdults=2");
        let with_mark = Query::parse("?duration=7&countAdults=2");

        assert_eq!(from_url, bare);
        assert_eq!(bare, with_mark);
        assert_eq!(bare.get("duration"), Some("7"));
    }

    #[test]
    fn path_without_query_is_empty() {
        assert!(Query::parse("/").is_empty());
        assert!(Query::parse("").is_empty());
    }

    #[test]
    fn get_outlives_the_name_it_was_asked_for() {
        let query = Query::parse("duration=10");
        let value = {
            let name = String::from("duration");
            query.get(&name)
        };
        assert_eq!(value, Some("10"));
    }

    #[test]
    fn keeps_repeated_values_in_order() {
        let query = Query::parse("a=1&b=2&a=3");
        assert_eq!(query.get_all("a").collect::<Vec<_>>(), vec!["1", "3"]);
        assert_eq!(query.get("a"), Some("1"));
        assert!(!query.contains_key("c"));
    }

    #[test]
    fn display_percent_encodes_values() {
        let query: Query = [("departureAirports", "MUC,FRA"), ("date", "2024-07-01T00:00:00.000Z")]
            .into_iter()
            .collect();
        let rendered = query.to_string();

        assert_eq!(
            rendered,
            "departureAirports=MUC%2CFRA&date=2024-07-01T00%3A00%3A00.000Z"
        );
        assert_eq!(Query::parse(&rendered), query);
    }
}
