use url::Url;

pub fn query_value(raw_url: &str, key: &str) -> Option<String> {
    let url = Url::parse(raw_url).ok()?;
    url.query_pairs()
        .find(|(name, _)| name == key)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

/// Sets `key` to `value`, dropping any duplicates of `key`. Other parameters
/// keep their order.
pub fn with_query_value(raw_url: &str, key: &str, value: &str) -> Option<String> {
    let mut url = Url::parse(raw_url).ok()?;
    let mut pairs = retained_pairs(&url, key);
    let position = url
        .query_pairs()
        .position(|(name, _)| name == key)
        .unwrap_or(pairs.len())
        .min(pairs.len());
    pairs.insert(position, (key.to_string(), value.to_string()));
    write_pairs(&mut url, &pairs);
    Some(url.into())
}

pub fn without_query_param(raw_url: &str, key: &str) -> Option<String> {
    let mut url = Url::parse(raw_url).ok()?;
    let pairs = retained_pairs(&url, key);
    write_pairs(&mut url, &pairs);
    Some(url.into())
}

fn retained_pairs(url: &Url, key: &str) -> Vec<(String, String)> {
    url.query_pairs()
        .filter(|(name, _)| name != key)
        .map(|(name, value)| (name.into_owned(), value.into_owned()))
        .collect()
}

fn write_pairs(url: &mut Url, pairs: &[(String, String)]) {
    if pairs.is_empty() {
        url.set_query(None);
        return;
    }
    url.query_pairs_mut().clear().extend_pairs(pairs);
}
