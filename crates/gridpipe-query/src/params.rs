use crate::error::DecodeError;

/// Raw request parameters, in arrival order.
///
/// Duplicate keys are kept; [`get`](Self::get) returns the first one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an `application/x-www-form-urlencoded` query string
    /// (without the leading `?`).
    pub fn parse(query: &str) -> Result<Self, DecodeError> {
        let mut params = Self::new();
        for segment in query.split('&').filter(|s| !s.is_empty()) {
            let (key, value) = segment.split_once('=').unwrap_or((segment, ""));
            params.insert(form_decode(key)?, form_decode(value)?);
        }
        Ok(params)
    }

    pub fn from_uri(uri: &http::Uri) -> Result<Self, DecodeError> {
        Self::parse(uri.query().unwrap_or(""))
    }

    pub fn from_request<T>(req: &http::Request<T>) -> Result<Self, DecodeError> {
        Self::from_uri(req.uri())
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((key.into(), value.into()));
    }

    /// First value for `key`. Empty values count as absent.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .filter(|v| !v.is_empty())
    }

    /// Every non-empty value for `key`, in arrival order.
    pub fn get_all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.pairs
            .iter()
            .filter(move |(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .filter(|v| !v.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            pairs: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

fn form_decode(raw: &str) -> Result<String, DecodeError> {
    let spaced = raw.replace('+', " ");
    Ok(urlencoding::decode(&spaced)?.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_percent_encoded_query() {
        let params = QueryParams::parse(
            "filter=title~contains~%27aaaa%27&group=title-asc~owner.firstName-asc&page=1&pageSize=10",
        )
        .unwrap();
        assert_eq!(params.get("filter"), Some("title~contains~'aaaa'"));
        assert_eq!(params.get("group"), Some("title-asc~owner.firstName-asc"));
        assert_eq!(params.get("page"), Some("1"));
        assert_eq!(params.get("pageSize"), Some("10"));
        assert_eq!(params.get("sort"), None);
    }

    #[test]
    fn plus_decodes_to_space() {
        let params = QueryParams::parse("filter=name~eq~%27John+Smith%27").unwrap();
        assert_eq!(params.get("filter"), Some("name~eq~'John Smith'"));
    }

    #[test]
    fn empty_value_is_absent() {
        let params = QueryParams::parse("page=&pageSize").unwrap();
        assert_eq!(params.get("page"), None);
        assert_eq!(params.get("pageSize"), None);
        assert!(!params.is_empty());
    }

    #[test]
    fn first_value_wins_for_get() {
        let params = QueryParams::parse("sort=a-asc&sort=b-desc").unwrap();
        assert_eq!(params.get("sort"), Some("a-asc"));
        assert_eq!(params.get_all("sort").collect::<Vec<_>>(), ["a-asc", "b-desc"]);
    }

    #[test]
    fn invalid_utf8_fails() {
        let err = QueryParams::parse("filter=%FF").unwrap_err();
        assert!(matches!(err, DecodeError::QueryString(_)));
    }

    #[test]
    fn from_request_reads_uri_query() {
        let req = http::Request::builder()
            .uri("https://grid.test/data?page=2&pageSize=5")
            .body(())
            .unwrap();
        let params = QueryParams::from_request(&req).unwrap();
        assert_eq!(params.get("page"), Some("2"));
        assert_eq!(params.get("pageSize"), Some("5"));
    }

    #[test]
    fn from_uri_without_query() {
        let uri: http::Uri = "/data".parse().unwrap();
        assert!(QueryParams::from_uri(&uri).unwrap().is_empty());
    }
}
